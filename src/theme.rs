use ratatui::style::{Color, Modifier, Style};

// Fixed palette. Kept as small helpers so call sites read the same whether
// a colour is a constant or derived.

pub const ACCENT_RGB: (u8, u8, u8) = (200, 100, 0);

pub fn accent() -> Color {
    Color::Rgb(ACCENT_RGB.0, ACCENT_RGB.1, ACCENT_RGB.2)
}

// Menu
pub fn menu_bg() -> Color {
    Color::DarkGray
}
pub fn menu_fg() -> Color {
    Color::White
}
pub fn menu_selected_bg() -> Color {
    Color::Gray
}
pub fn menu_selected_fg() -> Color {
    Color::Black
}
pub fn menu_border() -> Color {
    Color::Gray
}

pub fn menu_style() -> Style {
    Style::default().bg(menu_bg()).fg(menu_fg())
}

pub fn menu_selected_style() -> Style {
    Style::default()
        .bg(menu_selected_bg())
        .fg(menu_selected_fg())
        .add_modifier(Modifier::BOLD)
}

pub fn menu_disabled_style() -> Style {
    menu_style().add_modifier(Modifier::DIM)
}

// Floating window decorator
pub fn decorator_header_bg() -> Color {
    Color::Blue
}
pub fn decorator_header_fg() -> Color {
    Color::White
}
pub fn decorator_border() -> Color {
    Color::DarkGray
}
pub fn decorator_close() -> Color {
    accent()
}

/// Style modifier for a window drawn at reduced opacity.
pub fn faded(style: Style) -> Style {
    style.add_modifier(Modifier::DIM)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accent_is_rgb() {
        assert!(matches!(accent(), Color::Rgb(200, 100, 0)));
    }

    #[test]
    fn disabled_entries_are_dimmed() {
        assert!(menu_disabled_style().add_modifier.contains(Modifier::DIM));
        assert!(!menu_style().add_modifier.contains(Modifier::DIM));
    }
}
