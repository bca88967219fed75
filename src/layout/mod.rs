pub mod clamp;

pub use clamp::{Translation, clamp_translation, clamp_translation_with_margin};

use ratatui::prelude::Rect;
use std::ops::{Add, AddAssign};

/// Signed position in viewport units (pixels in the pixel preset,
/// cells in the terminal preset).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn from_cell(column: u16, row: u16) -> Self {
        Self {
            x: column as i32,
            y: row as i32,
        }
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point {
            x: self.x.saturating_add(rhs.x),
            y: self.y.saturating_add(rhs.y),
        }
    }
}

impl AddAssign for Point {
    fn add_assign(&mut self, rhs: Point) {
        *self = *self + rhs;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// A zero or negative extent means "not measured yet".
    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }
}

/// Rectangle expressed by its edges, the shape a bounding-box measurement
/// returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Bounds {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Bounds {
    pub const fn new(left: i32, right: i32, top: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn from_origin_size(origin: Point, size: Size) -> Self {
        Self {
            left: origin.x,
            top: origin.y,
            right: origin.x.saturating_add(size.width),
            bottom: origin.y.saturating_add(size.height),
        }
    }

    pub fn origin(&self) -> Point {
        Point::new(self.left, self.top)
    }

    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }

    pub fn size(&self) -> Size {
        Size::new(self.width(), self.height())
    }

    pub fn contains(&self, point: Point) -> bool {
        if self.width() <= 0 || self.height() <= 0 {
            return false;
        }
        point.x >= self.left && point.x < self.right && point.y >= self.top && point.y < self.bottom
    }

    pub fn translate(&self, by: Point) -> Self {
        Self {
            left: self.left.saturating_add(by.x),
            top: self.top.saturating_add(by.y),
            right: self.right.saturating_add(by.x),
            bottom: self.bottom.saturating_add(by.y),
        }
    }

    pub fn intersects(&self, other: &Bounds) -> bool {
        self.left < other.right
            && self.right > other.left
            && self.top < other.bottom
            && self.bottom > other.top
    }

    /// Portion of this rectangle that lands inside `area`, as a buffer rect.
    /// Negative origins are clipped rather than wrapped.
    pub fn visible_rect(&self, area: Rect) -> Rect {
        let x0 = self.left.max(area.x as i32);
        let y0 = self.top.max(area.y as i32);
        let x1 = self.right.min(area.x as i32 + area.width as i32);
        let y1 = self.bottom.min(area.y as i32 + area.height as i32);
        if x1 <= x0 || y1 <= y0 {
            return Rect::default();
        }
        Rect {
            x: x0 as u16,
            y: y0 as u16,
            width: (x1 - x0) as u16,
            height: (y1 - y0) as u16,
        }
    }
}

impl From<Rect> for Bounds {
    fn from(rect: Rect) -> Self {
        Self {
            left: rect.x as i32,
            top: rect.y as i32,
            right: rect.x as i32 + rect.width as i32,
            bottom: rect.y as i32 + rect.height as i32,
        }
    }
}

/// Visible area of the host. Origin is always `(0, 0)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Viewport {
    pub width: i32,
    pub height: i32,
}

impl Viewport {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::new(0, self.width, 0, self.height)
    }

    pub fn area(&self) -> Rect {
        Rect {
            x: 0,
            y: 0,
            width: self.width.clamp(0, u16::MAX as i32) as u16,
            height: self.height.clamp(0, u16::MAX as i32) as u16,
        }
    }
}

impl From<Rect> for Viewport {
    fn from(rect: Rect) -> Self {
        Self {
            width: rect.x as i32 + rect.width as i32,
            height: rect.y as i32 + rect.height as i32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_contains_is_half_open() {
        let b = Bounds::new(1, 4, 1, 4);
        assert!(b.contains(Point::new(1, 1)));
        assert!(b.contains(Point::new(3, 3)));
        assert!(!b.contains(Point::new(4, 1)));
        assert!(!Bounds::new(0, 0, 0, 5).contains(Point::new(0, 0)));
    }

    #[test]
    fn visible_rect_clips_negative_origin() {
        let area = Rect {
            x: 0,
            y: 0,
            width: 10,
            height: 5,
        };
        let b = Bounds::from_origin_size(Point::new(-3, -1), Size::new(6, 3));
        assert_eq!(
            b.visible_rect(area),
            Rect {
                x: 0,
                y: 0,
                width: 3,
                height: 2
            }
        );
        let off = Bounds::from_origin_size(Point::new(20, 20), Size::new(2, 2));
        assert_eq!(off.visible_rect(area), Rect::default());
    }

    #[test]
    fn translate_moves_every_edge() {
        let b = Bounds::new(0, 10, 0, 4).translate(Point::new(2, -1));
        assert_eq!(b, Bounds::new(2, 12, -1, 3));
        assert_eq!(b.size(), Size::new(10, 4));
    }
}
