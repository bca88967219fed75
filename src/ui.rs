//! UiFrame: a thin wrapper around `ratatui::Frame` that clamps drawing to the
//! visible area.
//!
//! Menu panels and floating windows are positioned in signed viewport
//! coordinates and routinely hang partly off screen while being dragged or
//! clamped. Every draw call goes through `UiFrame`, which clips to the buffer
//! so a stray rectangle can never write out of bounds.
use crate::layout::Bounds;
use ratatui::Frame;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::Line;
use ratatui::widgets::Widget;

pub struct UiFrame<'a> {
    area: Rect,
    buffer: &'a mut Buffer,
}

impl<'a> UiFrame<'a> {
    pub fn new(frame: &'a mut Frame<'_>) -> Self {
        let area = frame.area();
        let buffer = frame.buffer_mut();
        Self { area, buffer }
    }

    /// Construct a `UiFrame` directly from an area and buffer. Used for
    /// offscreen rendering and by tests.
    pub fn from_parts(area: Rect, buffer: &'a mut Buffer) -> Self {
        Self { area, buffer }
    }

    pub fn area(&self) -> Rect {
        self.area
    }

    pub fn buffer(&self) -> &Buffer {
        self.buffer
    }

    pub fn buffer_mut(&mut self) -> &mut Buffer {
        self.buffer
    }

    fn clip_rect(&self, rect: Rect) -> Option<Rect> {
        let clipped = rect.intersection(self.area);
        if clipped.width == 0 || clipped.height == 0 {
            None
        } else {
            Some(clipped)
        }
    }

    pub fn render_widget<W>(&mut self, widget: W, area: Rect)
    where
        W: Widget,
    {
        if let Some(clipped) = self.clip_rect(area) {
            widget.render(clipped, self.buffer);
        }
    }

    /// Paint every visible cell of `bounds` blank with `style`.
    pub fn fill(&mut self, bounds: Bounds, style: Style) {
        let rect = bounds.visible_rect(self.area);
        for y in rect.y..rect.y.saturating_add(rect.height) {
            for x in rect.x..rect.x.saturating_add(rect.width) {
                if let Some(cell) = self.buffer.cell_mut((x, y)) {
                    // Prevent potential color bleed-through
                    cell.reset();
                    cell.set_symbol(" ");
                    cell.set_style(style);
                }
            }
        }
    }

    /// Restyle the visible cells of `bounds` without touching symbols.
    pub fn patch_style(&mut self, bounds: Bounds, style: Style) {
        let rect = bounds.visible_rect(self.area);
        if rect.width > 0 && rect.height > 0 {
            self.buffer.set_style(rect, style);
        }
    }

    /// Write `text` starting at a signed position, clipped on both sides and
    /// to `max_width` columns.
    pub fn set_string_signed(&mut self, x: i32, y: i32, text: &str, max_width: usize, style: Style) {
        let text = truncate_to_width(text, max_width);
        let skip = usize::try_from(self.area.x as i32 - x).unwrap_or(0);
        let start = x.max(self.area.x as i32);
        let Ok(y) = u16::try_from(y) else {
            return;
        };
        let Ok(start) = u16::try_from(start) else {
            return;
        };
        let visible: String = text.chars().skip(skip).collect();
        safe_set_string(self.buffer, self.area, start, y, &visible, style);
    }

    /// Like [`Self::set_string_signed`] for a styled line.
    pub fn set_line_signed(&mut self, x: i32, y: i32, line: &Line<'_>, max_width: usize) {
        let mut cursor = x;
        let mut remaining = max_width;
        for span in &line.spans {
            if remaining == 0 {
                break;
            }
            let width = span.content.chars().count().min(remaining);
            let style = line.style.patch(span.style);
            self.set_string_signed(cursor, y, &span.content, width, style);
            cursor = cursor.saturating_add(width as i32);
            remaining -= width;
        }
    }

    /// Copy `src` onto this frame at a signed destination, skipping whatever
    /// falls outside the frame.
    pub fn blit_from_signed(&mut self, src: &Buffer, dest: Bounds) {
        let frame_x0 = self.area.x as i32;
        let frame_y0 = self.area.y as i32;
        let frame_x1 = frame_x0 + self.area.width as i32;
        let frame_y1 = frame_y0 + self.area.height as i32;
        for sy in 0..dest.height().max(0) {
            let dy = dest.top + sy;
            if dy < frame_y0 || dy >= frame_y1 {
                continue;
            }
            for sx in 0..dest.width().max(0) {
                let dx = dest.left + sx;
                if dx < frame_x0 || dx >= frame_x1 {
                    continue;
                }
                let (Ok(sx), Ok(sy)) = (u16::try_from(sx), u16::try_from(sy)) else {
                    continue;
                };
                if let (Some(src_cell), Some(dst_cell)) =
                    (src.cell((sx, sy)), self.buffer.cell_mut((dx as u16, dy as u16)))
                {
                    *dst_cell = src_cell.clone();
                }
            }
        }
    }
}

pub(crate) fn safe_set_string(
    buffer: &mut Buffer,
    bounds: Rect,
    x: u16,
    y: u16,
    text: &str,
    style: Style,
) {
    if bounds.width == 0 || bounds.height == 0 {
        return;
    }
    let max_x = bounds.x.saturating_add(bounds.width);
    let max_y = bounds.y.saturating_add(bounds.height);
    if x < bounds.x || x >= max_x || y < bounds.y || y >= max_y {
        return;
    }
    let available = max_x.saturating_sub(x);
    if available == 0 {
        return;
    }
    let text = truncate_to_width(text, available as usize);
    buffer.set_string(x, y, text, style);
}

pub(crate) fn truncate_to_width(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        return value.to_string();
    }
    value.chars().take(width).collect()
}
