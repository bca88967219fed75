//! Draggable floating windows.
//!
//! Each [`FloatingWindow`] owns its own lifecycle
//! (`Detached -> AttachedHidden -> AttachedVisible -> AttachedHidden -> Detached`)
//! and shares a [`WindowStack`] with the other windows of its group for
//! z-ordering. The most recently opened or clicked window is always on top.

pub mod decorator;
pub mod drag;
pub mod stack;

pub use decorator::{BoxDecorator, DecorState, TitleView, WindowDecorator};
pub use drag::HeaderDrag;
pub use stack::{WindowStack, WindowStackHandle, ZSlot};

use crossterm::event::{Event, MouseButton, MouseEvent, MouseEventKind};
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::Line;

use crate::components::{Component, ComponentContext};
use crate::constants::{FALLBACK_Z_INDEX, MIN_Z_INDEX, MOVING_OPACITY};
use crate::error::WidgetError;
use crate::host::{Host, TimerId, Wakeup, WakeupSink};
use crate::keybindings::{Action, KeyBindings};
use crate::layout::{Bounds, Point, Size, clamp_translation_with_margin};
use crate::ui::UiFrame;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowPhase {
    Detached,
    AttachedHidden,
    AttachedVisible,
}

/// Notifications drained with [`FloatingWindow::take_events`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowEvent {
    Opened,
    CloseRequested,
}

pub struct FloatingWindow {
    id: String,
    title: String,
    custom_title: Option<Line<'static>>,
    stack: Option<WindowStackHandle>,
    min_z_index: i64,
    min_size: Option<Size>,
    max_size: Option<Size>,
    size: Size,
    phase: WindowPhase,
    origin: Point,
    offset: Point,
    trigger: Bounds,
    position_timer: Option<TimerId>,
    detach_timer: Option<TimerId>,
    drag: Option<HeaderDrag>,
    warned_missing_stack: bool,
    events: Vec<WindowEvent>,
    decorator: Box<dyn WindowDecorator>,
    keys: KeyBindings,
    content: Option<Box<dyn Component>>,
}

impl std::fmt::Debug for FloatingWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FloatingWindow")
            .field("id", &self.id)
            .field("title", &self.title)
            .field("phase", &self.phase)
            .field("origin", &self.origin)
            .field("offset", &self.offset)
            .field("moving", &self.drag.is_some())
            .field("has_stack", &self.stack.is_some())
            .finish_non_exhaustive()
    }
}

impl FloatingWindow {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            custom_title: None,
            stack: None,
            min_z_index: MIN_Z_INDEX,
            min_size: None,
            max_size: None,
            size: Size::default(),
            phase: WindowPhase::Detached,
            origin: Point::default(),
            offset: Point::default(),
            trigger: Bounds::default(),
            position_timer: None,
            detach_timer: None,
            drag: None,
            warned_missing_stack: false,
            events: Vec::new(),
            decorator: Box::new(BoxDecorator),
            keys: KeyBindings::default(),
            content: None,
        }
    }

    pub fn with_stack(mut self, stack: WindowStackHandle) -> Self {
        self.stack = Some(stack);
        self
    }

    pub fn with_content(mut self, content: impl Component + 'static) -> Self {
        self.content = Some(Box::new(content));
        self
    }

    /// Styled title drawn in place of the plain text. The close tooltip still
    /// uses the plain title.
    pub fn with_custom_title(mut self, title: Line<'static>) -> Self {
        self.custom_title = Some(title);
        self
    }

    pub fn with_min_z_index(mut self, floor: i64) -> Self {
        self.min_z_index = floor;
        self
    }

    pub fn with_size_limits(mut self, min: Size, max: Size) -> Self {
        self.min_size = Some(min);
        self.max_size = Some(max);
        self
    }

    pub fn with_decorator(mut self, decorator: impl WindowDecorator + 'static) -> Self {
        self.decorator = Box::new(decorator);
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    /// Natural size of the window, borders included. It is kept within the
    /// size limits when laid out.
    pub fn set_size(&mut self, size: Size) {
        self.size = size;
    }

    pub fn phase(&self) -> WindowPhase {
        self.phase
    }

    pub fn is_attached(&self) -> bool {
        self.phase != WindowPhase::Detached
    }

    pub fn is_visible(&self) -> bool {
        self.phase == WindowPhase::AttachedVisible
    }

    pub fn is_moving(&self) -> bool {
        self.drag.is_some()
    }

    /// Text selection is suppressed for the duration of a drag.
    pub fn selection_suppressed(&self) -> bool {
        self.is_moving()
    }

    pub fn offset(&self) -> Point {
        self.offset
    }

    pub fn opacity(&self) -> f32 {
        if self.is_moving() {
            MOVING_OPACITY
        } else if self.is_visible() {
            1.0
        } else {
            0.0
        }
    }

    pub fn close_label(&self) -> &'static str {
        "Close"
    }

    pub fn close_tooltip(&self) -> String {
        let title = self.title.trim();
        if title.is_empty() {
            "Close window".to_string()
        } else {
            format!("Close {title}")
        }
    }

    pub fn z_index(&self) -> i64 {
        self.stack
            .as_ref()
            .and_then(|stack| stack.borrow().z_index(&self.id))
            .unwrap_or(FALLBACK_Z_INDEX)
    }

    pub fn take_events(&mut self) -> Vec<WindowEvent> {
        std::mem::take(&mut self.events)
    }

    fn limits(&self, host: &Host) -> (Size, Size) {
        let metrics = host.metrics();
        (
            self.min_size.unwrap_or(metrics.window_min),
            self.max_size.unwrap_or(metrics.window_max),
        )
    }

    fn laid_out_size(&self, host: &Host) -> Size {
        let (min, max) = self.limits(host);
        Size::new(
            self.size.width.max(min.width).min(max.width),
            self.size.height.max(min.height).min(max.height),
        )
    }

    /// Where the window is drawn: its placed origin plus the drag offset.
    pub fn bounds(&self, host: &Host) -> Bounds {
        Bounds::from_origin_size(self.origin + self.offset, self.laid_out_size(host))
    }

    /// Show or hide the window. `trigger` is the element it opens from.
    pub fn set_visible(&mut self, visible: bool, trigger: Bounds, host: &mut Host) {
        if visible {
            self.show(trigger, host);
        } else {
            self.hide(host);
        }
    }

    fn show(&mut self, trigger: Bounds, host: &mut Host) {
        self.trigger = trigger;
        if let Some(id) = self.detach_timer.take() {
            host.scheduler.clear_timeout(id);
            tracing::trace!(window = %self.id, "pending detach cancelled");
        }
        match self.phase {
            WindowPhase::AttachedVisible => {}
            WindowPhase::AttachedHidden => {
                if self.position_timer.is_none() {
                    self.open_attached(host);
                }
            }
            WindowPhase::Detached => {
                self.phase = WindowPhase::AttachedHidden;
                if let Some(stack) = self.stack.as_ref() {
                    stack.borrow_mut().register(&self.id);
                }
                // placed on the next tick, once attached
                self.position_timer = Some(host.scheduler.set_timeout(std::time::Duration::ZERO));
                tracing::debug!(window = %self.id, "window attached");
            }
        }
    }

    fn hide(&mut self, host: &mut Host) {
        if let Some(id) = self.position_timer.take() {
            host.scheduler.clear_timeout(id);
        }
        if let Some(drag) = self.drag.take() {
            drag.end(host);
        }
        if self.phase == WindowPhase::Detached || self.detach_timer.is_some() {
            return;
        }
        self.phase = WindowPhase::AttachedHidden;
        let grace = host.timings().window_detach_grace;
        self.detach_timer = Some(host.scheduler.set_timeout(grace));
        tracing::debug!(window = %self.id, "window hidden");
    }

    fn open_attached(&mut self, host: &mut Host) {
        let size = self.laid_out_size(host);
        let viewport = host.viewport();
        let top = if self.trigger.bottom + size.height < viewport.height {
            self.trigger.bottom
        } else {
            (self.trigger.top - size.height).max(0)
        };
        self.origin = Point::new(self.trigger.left, top);
        self.offset = Point::default();
        if let Err(err) = self.bring_to_front() {
            tracing::trace!(window = %self.id, %err, "opened without stacking");
        }
        self.events.push(WindowEvent::Opened);
        self.phase = WindowPhase::AttachedVisible;
        self.check_position(host);
        tracing::debug!(window = %self.id, x = self.origin.x, y = self.origin.y, "window opened");
    }

    fn detach(&mut self, host: &mut Host) {
        if let Some(drag) = self.drag.take() {
            drag.end(host);
        }
        self.phase = WindowPhase::Detached;
        if let Some(stack) = self.stack.as_ref() {
            stack.borrow_mut().deregister(&self.id);
        }
        tracing::debug!(window = %self.id, "window detached");
    }

    /// Raise the window above every other window of its group.
    pub fn bring_to_front(&mut self) -> Result<i64, WidgetError> {
        let stack = self
            .stack
            .as_ref()
            .ok_or_else(|| WidgetError::MissingStack(self.id.clone()))?;
        stack.borrow_mut().bring_to_front(&self.id, self.min_z_index)
    }

    /// Pull the window back inside the viewport.
    pub fn check_position(&mut self, host: &Host) {
        let margin = host.metrics().viewport_margin;
        let shift = clamp_translation_with_margin(Some(self.bounds(host)), host.viewport(), margin);
        self.offset += shift.as_point();
    }

    /// Forward a viewport change; a window being dragged is re-clamped.
    pub fn viewport_resized(&mut self, host: &mut Host) {
        if self.is_moving() {
            self.check_position(host);
        }
    }

    pub fn close_requested(&mut self) {
        tracing::debug!(window = %self.id, "close requested");
        self.events.push(WindowEvent::CloseRequested);
    }

    /// Capture-phase event handling. Returns true when the window consumed
    /// the event.
    pub fn handle_event(&mut self, event: &Event, host: &mut Host, ctx: &ComponentContext) -> bool {
        match event {
            Event::Mouse(mouse) => self.handle_mouse(mouse, host, ctx),
            Event::Resize(..) => {
                self.viewport_resized(host);
                false
            }
            Event::Key(key) if self.is_visible() => {
                if self.keys.matches(Action::WindowClose, key) {
                    self.close_requested();
                    return true;
                }
                let ctx = ctx.with_dimmed(self.is_moving());
                self.content
                    .as_mut()
                    .is_some_and(|content| content.handle_event(event, host, &ctx))
            }
            _ => false,
        }
    }

    fn handle_mouse(&mut self, mouse: &MouseEvent, host: &mut Host, ctx: &ComponentContext) -> bool {
        let at = Point::from_cell(mouse.column, mouse.row);
        if let Some(drag) = self.drag.as_mut() {
            match mouse.kind {
                MouseEventKind::Drag(_) | MouseEventKind::Moved => {
                    let delta = drag.step(at);
                    self.offset += delta;
                    return true;
                }
                MouseEventKind::Up(_) => {
                    if let Some(drag) = self.drag.take() {
                        drag.end(host);
                    }
                    self.check_position(host);
                    tracing::debug!(window = %self.id, x = self.offset.x, y = self.offset.y, "window moved");
                    return true;
                }
                _ => {}
            }
        }
        if !self.is_visible() {
            return false;
        }
        let bounds = self.bounds(host);
        if !bounds.contains(at) {
            return false;
        }
        if let MouseEventKind::Down(button) = mouse.kind {
            if let Err(err) = self.bring_to_front() {
                tracing::trace!(window = %self.id, %err, "click without stacking");
            }
            if button == MouseButton::Left {
                if self.decorator.close_bounds(bounds).contains(at) {
                    self.close_requested();
                    return true;
                }
                if self.decorator.title_bounds(bounds).contains(at) {
                    self.drag = Some(HeaderDrag::begin(at, host));
                    return true;
                }
            }
        }
        let body = self.decorator.body_bounds(bounds);
        if body.contains(at)
            && let Some(content) = self.content.as_mut()
        {
            let local = MouseEvent {
                column: u16::try_from(at.x - body.left).unwrap_or(0),
                row: u16::try_from(at.y - body.top).unwrap_or(0),
                ..*mouse
            };
            content.handle_event(&Event::Mouse(local), host, &ctx.with_dimmed(false));
        }
        true
    }

    pub fn render(&mut self, frame: &mut UiFrame<'_>, host: &Host, ctx: &ComponentContext) {
        if !self.is_attached() {
            return;
        }
        if self.stack.is_none() {
            if !self.warned_missing_stack {
                self.warned_missing_stack = true;
                tracing::warn!(window = %self.id, "floating window has no window stack, rendering in place");
            }
            let bounds = Bounds::from_origin_size(self.trigger.origin(), self.laid_out_size(host));
            self.render_content(frame, bounds, ctx);
            return;
        }
        if !self.is_visible() {
            return;
        }
        let bounds = self.bounds(host);
        let state = DecorState {
            focused: ctx.focused(),
            moving: self.is_moving(),
        };
        let title = TitleView {
            text: &self.title,
            custom: self.custom_title.as_ref(),
        };
        self.decorator.render_window(frame, bounds, title, state);
        let body = self.decorator.body_bounds(bounds);
        let ctx = ctx.with_dimmed(self.is_moving());
        self.render_content(frame, body, &ctx);
        if self.is_moving() {
            frame.patch_style(bounds, crate::theme::faded(Style::default()));
        }
    }

    fn render_content(&mut self, frame: &mut UiFrame<'_>, body: Bounds, ctx: &ComponentContext) {
        let Some(content) = self.content.as_mut() else {
            return;
        };
        let (Ok(width), Ok(height)) = (u16::try_from(body.width()), u16::try_from(body.height())) else {
            return;
        };
        if width == 0 || height == 0 {
            return;
        }
        let area = Rect::new(0, 0, width, height);
        let mut buffer = Buffer::empty(area);
        {
            let mut offscreen = UiFrame::from_parts(area, &mut buffer);
            content.render(&mut offscreen, area, ctx);
        }
        frame.blit_from_signed(&buffer, body);
    }

    /// Drop every timer and listener and leave the stack immediately.
    pub fn unmount(&mut self, host: &mut Host) {
        for id in [self.position_timer.take(), self.detach_timer.take()].into_iter().flatten() {
            host.scheduler.clear_timeout(id);
        }
        if self.is_attached() {
            self.detach(host);
        }
    }
}

impl WakeupSink for FloatingWindow {
    fn on_wakeup(&mut self, wakeup: Wakeup, host: &mut Host) -> bool {
        let Wakeup::Timer(fired) = wakeup else {
            return false;
        };
        if self.position_timer == Some(fired) {
            self.position_timer = None;
            self.open_attached(host);
            return true;
        }
        if self.detach_timer == Some(fired) {
            self.detach_timer = None;
            self.detach(host);
            return true;
        }
        false
    }
}
