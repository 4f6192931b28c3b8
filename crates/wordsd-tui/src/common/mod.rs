pub mod scrollbar;
pub mod style;

pub use scrollbar::Scrollbar;
