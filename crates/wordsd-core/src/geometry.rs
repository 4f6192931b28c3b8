//! Plain layout geometry in renderer units.

/// Width and height of a measured block.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Axis-aligned rectangle. `y` grows downward.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Half-open containment: the right and bottom edges are outside.
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_is_half_open() {
        let rect = Rect::new(2.0, 3.0, 4.0, 1.0);
        assert!(rect.contains(2.0, 3.0));
        assert!(rect.contains(5.9, 3.5));
        assert!(!rect.contains(6.0, 3.0));
        assert!(!rect.contains(2.0, 4.0));
        assert!(!rect.contains(1.9, 3.0));
    }

    #[test]
    fn test_edges() {
        let rect = Rect::new(1.0, 2.0, 10.0, 5.0);
        assert_eq!(rect.right(), 11.0);
        assert_eq!(rect.bottom(), 7.0);
    }
}
