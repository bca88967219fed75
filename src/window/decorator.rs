use ratatui::style::{Modifier, Style};
use ratatui::text::Line;

use crate::layout::Bounds;
use crate::ui::UiFrame;

/// Title shown in a window's header row.
#[derive(Debug, Clone, Copy)]
pub struct TitleView<'a> {
    pub text: &'a str,
    pub custom: Option<&'a Line<'static>>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DecorState {
    pub focused: bool,
    pub moving: bool,
}

pub trait WindowDecorator: std::fmt::Debug {
    fn render_window(&self, frame: &mut UiFrame<'_>, bounds: Bounds, title: TitleView<'_>, state: DecorState);

    /// Region that starts a drag.
    fn title_bounds(&self, bounds: Bounds) -> Bounds;

    /// Region of the close affordance.
    fn close_bounds(&self, bounds: Bounds) -> Bounds;

    /// Region handed to the window content.
    fn body_bounds(&self, bounds: Bounds) -> Bounds;
}

/// Box-drawn frame with a filled header row under the top border and a close
/// glyph at its right end.
#[derive(Debug, Default)]
pub struct BoxDecorator;

impl WindowDecorator for BoxDecorator {
    fn render_window(&self, frame: &mut UiFrame<'_>, bounds: Bounds, title: TitleView<'_>, state: DecorState) {
        let focused_header_style = Style::default()
            .bg(crate::theme::decorator_header_bg())
            .fg(crate::theme::decorator_header_fg())
            .add_modifier(Modifier::BOLD);
        let normal_header_style = Style::default()
            .bg(crate::theme::decorator_border())
            .fg(crate::theme::decorator_header_fg());
        let border_style = Style::default().fg(crate::theme::decorator_border());
        let header_style = if state.focused {
            focused_header_style
        } else {
            normal_header_style
        };

        if bounds.width() < 2 || bounds.height() < 2 {
            return;
        }
        frame.fill(bounds, Style::default());

        let inner = usize::try_from(bounds.width() - 2).unwrap_or(0);
        let horizontal = "─".repeat(inner);
        frame.set_string_signed(bounds.left, bounds.top, &format!("┌{horizontal}┐"), inner + 2, border_style);
        frame.set_string_signed(
            bounds.left,
            bounds.bottom - 1,
            &format!("└{horizontal}┘"),
            inner + 2,
            border_style,
        );
        for y in bounds.top + 1..bounds.bottom - 1 {
            frame.set_string_signed(bounds.left, y, "│", 1, border_style);
            frame.set_string_signed(bounds.right - 1, y, "│", 1, border_style);
        }

        // Header background & title
        let header_y = bounds.top + 1;
        if header_y >= bounds.bottom - 1 {
            return;
        }
        frame.fill(Bounds::new(bounds.left + 1, bounds.right - 1, header_y, header_y + 1), header_style);
        let close = self.close_bounds(bounds);
        let title_room = usize::try_from(close.left - bounds.left - 1).unwrap_or(0);
        match title.custom {
            Some(line) => frame.set_line_signed(bounds.left + 2, header_y, line, title_room.saturating_sub(1)),
            None => {
                let width = title.text.chars().count();
                let pad = title_room.saturating_sub(width) / 2;
                let x = bounds.left + 1 + i32::try_from(pad).unwrap_or(0);
                frame.set_string_signed(x, header_y, title.text, title_room, header_style);
            }
        }
        if close.width() > 0 {
            let close_style = header_style.fg(crate::theme::decorator_close());
            frame.set_string_signed(close.left + 1, header_y, "×", 1, close_style);
        }
    }

    fn title_bounds(&self, bounds: Bounds) -> Bounds {
        let close = self.close_bounds(bounds);
        Bounds::new(bounds.left, close.left.max(bounds.left), bounds.top, (bounds.top + 2).min(bounds.bottom))
    }

    fn close_bounds(&self, bounds: Bounds) -> Bounds {
        let right = bounds.right - 1;
        let left = (right - 3).max(bounds.left + 1);
        Bounds::new(left, right.max(left), bounds.top + 1, bounds.top + 2)
    }

    fn body_bounds(&self, bounds: Bounds) -> Bounds {
        let top = (bounds.top + 2).min(bounds.bottom - 1);
        Bounds::new(bounds.left + 1, (bounds.right - 1).max(bounds.left + 1), top, (bounds.bottom - 1).max(top))
    }
}
