//! Message style descriptors mapped to terminal styles.

use ratatui::style::{Color, Modifier, Style};
use wordsd_core::MessageStyle;
use wordsd_core::entry::Rgb;

pub fn color(rgb: Rgb) -> Color {
    let Rgb(r, g, b) = rgb;
    Color::Rgb(r, g, b)
}

/// Terminal style for a message. Dimmed entries use the DIM attribute, the
/// closest a terminal gets to half opacity.
pub fn message_style(style: MessageStyle, dimmed: bool) -> Style {
    let descriptor = style.descriptor();
    let mut out = Style::default().fg(color(descriptor.color));
    if descriptor.bold {
        out = out.add_modifier(Modifier::BOLD);
    }
    if descriptor.interactive {
        out = out.add_modifier(Modifier::UNDERLINED);
    }
    if dimmed {
        out = out.add_modifier(Modifier::DIM);
    }
    out
}
