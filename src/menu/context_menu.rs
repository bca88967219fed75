//! A rendered menu panel: rows, highlight, hit testing and the submenu
//! slots hanging off its group entries.

use std::collections::BTreeMap;
use std::rc::Rc;

use crossterm::event::Event;

use crate::config::Metrics;
use crate::error::WidgetError;
use crate::host::{EventTarget, Host, Wakeup};
use crate::keybindings::Action;
use crate::layout::{Bounds, Point};
use crate::menu::model::{Label, MenuEntry, RenderedLabel, SelectionEffect, SelectionTarget};
use crate::menu::positioning::estimated_panel_size;
use crate::menu::submenu::SubmenuSlot;
use crate::ui::UiFrame;

/// What an interaction did to the menu it was routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuOutcome {
    /// Not for this menu.
    Ignored,
    /// Handled; the menu stays open.
    Consumed,
    /// An entry was confirmed and the whole menu should close.
    Close,
}

pub(crate) fn row_bounds(origin: Point, width: i32, index: usize, metrics: &Metrics) -> Bounds {
    let index = i32::try_from(index).unwrap_or(i32::MAX);
    let top = origin
        .y
        .saturating_add(metrics.panel_padding / 2)
        .saturating_add(index.saturating_mul(metrics.entry_height));
    Bounds::new(origin.x, origin.x.saturating_add(width), top, top.saturating_add(metrics.entry_height))
}

/// Context for confirming an entry.
#[derive(Clone, Copy, Default)]
pub struct Confirm<'a> {
    pub target: Option<&'a SelectionTarget>,
    pub event: Option<&'a Event>,
}

#[derive(Debug)]
pub struct ContextMenu {
    entries: Rc<[MenuEntry]>,
    origin: Point,
    metrics: Metrics,
    highlighted: Option<usize>,
    slots: BTreeMap<usize, SubmenuSlot>,
}

impl ContextMenu {
    pub fn new(entries: Rc<[MenuEntry]>, origin: Point, metrics: Metrics) -> Self {
        Self::with_low_slots(entries, origin, metrics, false)
    }

    /// Panel whose submenus flow upward, as under a low menu bar.
    pub(crate) fn with_low_slots(
        entries: Rc<[MenuEntry]>,
        origin: Point,
        metrics: Metrics,
        low: bool,
    ) -> Self {
        let slots = entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.has_group())
            .map(|(index, _)| (index, SubmenuSlot::new(low)))
            .collect();
        Self {
            entries,
            origin,
            metrics,
            highlighted: None,
            slots,
        }
    }

    pub fn entries(&self) -> &Rc<[MenuEntry]> {
        &self.entries
    }

    pub fn origin(&self) -> Point {
        self.origin
    }

    pub fn set_origin(&mut self, origin: Point) {
        self.origin = origin;
    }

    pub fn highlighted(&self) -> Option<usize> {
        self.highlighted
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::from_origin_size(
            self.origin,
            estimated_panel_size(self.entries.len(), &self.metrics),
        )
    }

    pub fn row_bounds(&self, index: usize) -> Bounds {
        row_bounds(self.origin, self.metrics.panel_width, index, &self.metrics)
    }

    pub fn row_at(&self, point: Point) -> Option<usize> {
        (0..self.entries.len()).find(|i| self.row_bounds(*i).contains(point))
    }

    pub fn submenu(&self, index: usize) -> Option<&SubmenuSlot> {
        self.slots.get(&index)
    }

    /// This panel plus every visible submenu below it.
    pub fn tree_bounds(&self, out: &mut Vec<Bounds>) {
        out.push(self.bounds());
        for slot in self.slots.values() {
            slot.tree_bounds(out);
        }
    }

    pub fn contains(&self, point: Point) -> bool {
        let mut roots = Vec::new();
        self.tree_bounds(&mut roots);
        roots.iter().any(|b| b.contains(point))
    }

    /// Pointer moved to `at`: update the highlight and drive submenu hover.
    pub fn pointer_moved(&mut self, at: Point, host: &mut Host) {
        let width = self.metrics.panel_width;
        let mut over_child = None;
        for (index, slot) in self.slots.iter_mut() {
            let row = row_bounds(self.origin, width, *index, &self.metrics);
            let in_child = slot.child_contains(at);
            if in_child {
                over_child = Some(*index);
            }
            slot.hover(row.contains(at) || in_child, at, host);
            if let Some(child) = slot.child_mut() {
                child.pointer_moved(at, host);
            }
        }
        if let Some(index) = over_child {
            self.highlighted = Some(index);
        } else if self.bounds().contains(at) {
            self.highlighted = self
                .row_at(at)
                .filter(|i| self.entries.get(*i).is_some_and(MenuEntry::is_selectable));
        }
    }

    fn activate(&mut self, index: usize, confirm: Confirm<'_>, host: &mut Host) -> MenuOutcome {
        let Some(entry) = self.entries.get(index) else {
            return MenuOutcome::Ignored;
        };
        let effect = entry.activate(confirm.target, confirm.event);
        tracing::debug!(index, ?effect, label = entry.aria_label(), "menu entry confirmed");
        match effect {
            SelectionEffect::Inert => MenuOutcome::Consumed,
            SelectionEffect::OpenSubmenu => {
                let row = self.row_bounds(index);
                if let Some(slot) = self.slots.get_mut(&index) {
                    slot.open(row, host);
                }
                MenuOutcome::Consumed
            }
            SelectionEffect::Close => MenuOutcome::Close,
        }
    }

    /// Pointer-down at `target`. Submenus get first refusal since they are
    /// drawn on top; open submenus the click misses are dismissed.
    pub fn pointer_down(&mut self, target: &EventTarget, confirm: Confirm<'_>, host: &mut Host) -> MenuOutcome {
        let Some(at) = target.point() else {
            return MenuOutcome::Ignored;
        };
        for slot in self.slots.values_mut() {
            if slot.child_contains(at)
                && let Some(child) = slot.child_mut()
            {
                return child.pointer_down(target, confirm, host);
            }
        }
        let width = self.metrics.panel_width;
        for (index, slot) in self.slots.iter_mut() {
            let row = row_bounds(self.origin, width, *index, &self.metrics);
            slot.pointer_down(target, row, host);
        }
        if !self.bounds().contains(at) {
            return MenuOutcome::Ignored;
        }
        match self.row_at(at) {
            Some(index) => {
                self.highlighted = Some(index);
                self.activate(index, confirm, host)
            }
            None => MenuOutcome::Consumed,
        }
    }

    fn step_highlight(&mut self, forward: bool) {
        let len = self.entries.len();
        if len == 0 {
            return;
        }
        let mut index = match (self.highlighted, forward) {
            (Some(i), true) => (i + 1) % len,
            (Some(i), false) => (i + len - 1) % len,
            (None, true) => 0,
            (None, false) => len - 1,
        };
        for _ in 0..len {
            if self.entries[index].is_selectable() {
                self.highlighted = Some(index);
                return;
            }
            index = if forward {
                (index + 1) % len
            } else {
                (index + len - 1) % len
            };
        }
    }

    /// Keyboard navigation. Keys go to the deepest open submenu first.
    pub fn handle_action(&mut self, action: Action, confirm: Confirm<'_>, host: &mut Host) -> MenuOutcome {
        for slot in self.slots.values_mut() {
            if !slot.is_visible() {
                continue;
            }
            if let Some(child) = slot.child_mut() {
                let outcome = child.handle_action(action, confirm, host);
                if outcome == MenuOutcome::Ignored && action == Action::MenuClose {
                    slot.close(host);
                    return MenuOutcome::Consumed;
                }
                return outcome;
            }
        }
        match action {
            Action::MenuUp | Action::MenuPrev => {
                self.step_highlight(false);
                MenuOutcome::Consumed
            }
            Action::MenuDown | Action::MenuNext => {
                self.step_highlight(true);
                MenuOutcome::Consumed
            }
            Action::MenuSelect => match self.highlighted {
                Some(index) => self.activate(index, confirm, host),
                None => MenuOutcome::Consumed,
            },
            Action::MenuOpenSubmenu => {
                if let Some(index) = self.highlighted
                    && let Some(slot) = self.slots.get_mut(&index)
                {
                    let row = row_bounds(self.origin, self.metrics.panel_width, index, &self.metrics);
                    slot.open(row, host);
                }
                MenuOutcome::Consumed
            }
            _ => MenuOutcome::Ignored,
        }
    }

    /// Confirm the entry at `path`, descending through open submenus.
    pub fn select_path(&mut self, path: &[usize], confirm: Confirm<'_>, host: &mut Host) -> Result<MenuOutcome, WidgetError> {
        crate::menu::model::entry_at_path(&self.entries, path)?;
        let (first, rest) = path
            .split_first()
            .ok_or_else(|| WidgetError::UnknownEntry { path: path.to_vec() })?;
        if rest.is_empty() {
            self.highlighted = Some(*first);
            return Ok(self.activate(*first, confirm, host));
        }
        if let Some(child) = self.slots.get_mut(first).and_then(SubmenuSlot::child_mut) {
            return child.select_path(rest, confirm, host);
        }
        // submenu not open: confirm the entry directly
        let entry = crate::menu::model::entry_at_path(&self.entries, path)?;
        Ok(match entry.activate(confirm.target, confirm.event) {
            SelectionEffect::Close => MenuOutcome::Close,
            _ => MenuOutcome::Consumed,
        })
    }

    pub fn on_wakeup(&mut self, wakeup: Wakeup, host: &mut Host) -> bool {
        let width = self.metrics.panel_width;
        for (index, slot) in self.slots.iter_mut() {
            let row = row_bounds(self.origin, width, *index, &self.metrics);
            let group = self.entries.get(*index).and_then(MenuEntry::submenu).unwrap_or(&[]);
            if slot.on_wakeup(wakeup, row, group, &self.metrics, host) {
                return true;
            }
        }
        false
    }

    /// Drop every submenu now, releasing their timers and listeners.
    pub fn collapse(&mut self, host: &mut Host) {
        for slot in self.slots.values_mut() {
            slot.unmount(host);
        }
        self.highlighted = None;
    }

    pub fn render(&self, frame: &mut UiFrame<'_>) {
        let bounds = self.bounds();
        if !bounds.intersects(&Bounds::from(frame.area())) {
            return;
        }
        let base = crate::theme::menu_style();
        let border = base.fg(crate::theme::menu_border());
        frame.fill(bounds, base);
        let inner = usize::try_from(bounds.width() - 2).unwrap_or(0);
        let horizontal = "─".repeat(inner);
        frame.set_string_signed(bounds.left, bounds.top, &format!("┌{horizontal}┐"), inner + 2, border);
        frame.set_string_signed(bounds.left, bounds.bottom - 1, &format!("└{horizontal}┘"), inner + 2, border);
        for y in bounds.top + 1..bounds.bottom - 1 {
            frame.set_string_signed(bounds.left, y, "│", 1, border);
            frame.set_string_signed(bounds.right - 1, y, "│", 1, border);
        }
        for (index, entry) in self.entries.iter().enumerate() {
            let row = self.row_bounds(index);
            let style = if entry.disabled {
                crate::theme::menu_disabled_style()
            } else if self.highlighted == Some(index) {
                crate::theme::menu_selected_style()
            } else {
                base
            };
            let text_x = row.left + 1;
            if self.highlighted == Some(index) && !entry.disabled {
                frame.fill(Bounds::new(text_x, row.right - 1, row.top, row.top + 1), style);
            }
            match &entry.label {
                Label::Rendered(RenderedLabel::Rule) => {
                    frame.set_string_signed(text_x, row.top, &horizontal, inner, border);
                }
                Label::Rendered(RenderedLabel::Custom(line)) => {
                    frame.set_line_signed(text_x + 1, row.top, line, inner.saturating_sub(3));
                }
                Label::Text(text) => {
                    frame.set_string_signed(text_x + 1, row.top, text, inner.saturating_sub(3), style);
                }
            }
            if entry.has_group() {
                frame.set_string_signed(row.right - 3, row.top, "▸", 1, style);
            }
        }
        for slot in self.slots.values() {
            slot.render(frame);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{ListenerKind, WakeupSink};
    use crate::menu::hover_intent::HoverState;
    use ratatui::buffer::Buffer;
    use ratatui::layout::Rect;
    use std::cell::Cell;
    use std::time::Duration;

    struct Sink<'a>(&'a mut ContextMenu);

    impl WakeupSink for Sink<'_> {
        fn on_wakeup(&mut self, wakeup: Wakeup, host: &mut Host) -> bool {
            self.0.on_wakeup(wakeup, host)
        }
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn host() -> Host {
        Host::new(crate::layout::Viewport::new(80, 24)).with_metrics(Metrics::terminal())
    }

    fn sample(hits: &Rc<Cell<u32>>) -> Rc<[MenuEntry]> {
        let h = hits.clone();
        vec![
            MenuEntry::text("Copy").with_action(move |_, _| h.set(h.get() + 1)),
            MenuEntry::divider(),
            MenuEntry::text("Paste").disabled(true),
            MenuEntry::text("More").with_group(vec![MenuEntry::text("Inner")]),
        ]
        .into()
    }

    fn at(x: i32, y: i32) -> EventTarget {
        EventTarget::Cell(Point::new(x, y))
    }

    #[test]
    fn rows_follow_terminal_metrics() {
        let menu = ContextMenu::new(sample(&Rc::new(Cell::new(0))), Point::new(2, 3), Metrics::terminal());
        assert_eq!(menu.bounds(), Bounds::new(2, 22, 3, 9));
        assert_eq!(menu.row_bounds(0), Bounds::new(2, 22, 4, 5));
        assert_eq!(menu.row_at(Point::new(5, 7)), Some(3));
        assert_eq!(menu.row_at(Point::new(5, 3)), None);
    }

    #[test]
    fn clicking_an_entry_runs_its_action_once() {
        let hits = Rc::new(Cell::new(0));
        let mut host = host();
        let mut menu = ContextMenu::new(sample(&hits), Point::new(0, 0), Metrics::terminal());
        let outcome = menu.pointer_down(&at(4, 1), Confirm::default(), &mut host);
        assert_eq!(outcome, MenuOutcome::Close);
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn disabled_and_divider_rows_are_inert() {
        let hits = Rc::new(Cell::new(0));
        let mut host = host();
        let mut menu = ContextMenu::new(sample(&hits), Point::new(0, 0), Metrics::terminal());
        assert_eq!(menu.pointer_down(&at(4, 3), Confirm::default(), &mut host), MenuOutcome::Consumed);
        assert_eq!(menu.pointer_down(&at(4, 2), Confirm::default(), &mut host), MenuOutcome::Consumed);
        assert_eq!(hits.get(), 0);
        assert_eq!(menu.pointer_down(&at(40, 2), Confirm::default(), &mut host), MenuOutcome::Ignored);
    }

    #[test]
    fn group_entry_opens_submenu_instead_of_closing() {
        let mut host = host();
        let mut menu = ContextMenu::new(sample(&Rc::new(Cell::new(0))), Point::new(0, 0), Metrics::terminal());
        assert_eq!(menu.pointer_down(&at(4, 4), Confirm::default(), &mut host), MenuOutcome::Consumed);
        host.advance(&mut Sink(&mut menu), ms(1));
        let slot = menu.submenu(3).unwrap();
        assert!(slot.is_visible());
        // opened to the right of the row, one row up
        assert_eq!(slot.child().unwrap().origin(), Point::new(20, 3));
        assert!(menu.contains(Point::new(21, 4)));
    }

    #[test]
    fn hovering_group_row_opens_and_leaving_closes_after_delay() {
        let mut host = host();
        let mut menu = ContextMenu::new(sample(&Rc::new(Cell::new(0))), Point::new(0, 0), Metrics::terminal());
        menu.pointer_moved(Point::new(4, 4), &mut host);
        host.advance(&mut Sink(&mut menu), ms(1));
        assert!(menu.submenu(3).unwrap().is_visible());
        menu.pointer_moved(Point::new(4, 1), &mut host);
        host.advance(&mut Sink(&mut menu), ms(299));
        assert!(menu.submenu(3).unwrap().is_visible());
        host.advance(&mut Sink(&mut menu), ms(1));
        assert!(!menu.submenu(3).unwrap().is_mounted());
        assert_eq!(host.document.total_listeners(), 0);
    }

    #[test]
    fn moving_into_the_submenu_keeps_it_open() {
        let mut host = host();
        let mut menu = ContextMenu::new(sample(&Rc::new(Cell::new(0))), Point::new(0, 0), Metrics::terminal());
        menu.pointer_moved(Point::new(4, 4), &mut host);
        host.advance(&mut Sink(&mut menu), ms(1));
        // across the border gap and into the child panel
        menu.pointer_moved(Point::new(20, 2), &mut host);
        host.advance(&mut Sink(&mut menu), ms(100));
        menu.pointer_moved(Point::new(22, 4), &mut host);
        host.advance(&mut Sink(&mut menu), ms(1000));
        let slot = menu.submenu(3).unwrap();
        assert!(slot.is_visible());
        assert_eq!(slot.state(), HoverState::Open);
        assert_eq!(menu.highlighted(), Some(3));
    }

    #[test]
    fn keyboard_navigation_skips_dividers() {
        let hits = Rc::new(Cell::new(0));
        let mut host = host();
        let mut menu = ContextMenu::new(sample(&hits), Point::new(0, 0), Metrics::terminal());
        menu.handle_action(Action::MenuDown, Confirm::default(), &mut host);
        assert_eq!(menu.highlighted(), Some(0));
        menu.handle_action(Action::MenuDown, Confirm::default(), &mut host);
        assert_eq!(menu.highlighted(), Some(2));
        menu.handle_action(Action::MenuUp, Confirm::default(), &mut host);
        menu.handle_action(Action::MenuUp, Confirm::default(), &mut host);
        assert_eq!(menu.highlighted(), Some(3));
        menu.handle_action(Action::MenuOpenSubmenu, Confirm::default(), &mut host);
        host.advance(&mut Sink(&mut menu), ms(1));
        assert!(menu.submenu(3).unwrap().is_visible());
        // Left closes the submenu, not the menu
        assert_eq!(
            menu.handle_action(Action::MenuClose, Confirm::default(), &mut host),
            MenuOutcome::Consumed
        );
        assert!(!menu.submenu(3).unwrap().is_visible());
        assert_eq!(
            menu.handle_action(Action::MenuClose, Confirm::default(), &mut host),
            MenuOutcome::Ignored
        );
    }

    #[test]
    fn select_path_reports_unknown_entries() {
        let hits = Rc::new(Cell::new(0));
        let mut host = host();
        let mut menu = ContextMenu::new(sample(&hits), Point::new(0, 0), Metrics::terminal());
        assert_eq!(
            menu.select_path(&[9], Confirm::default(), &mut host),
            Err(WidgetError::UnknownEntry { path: vec![9] })
        );
        assert_eq!(menu.select_path(&[0], Confirm::default(), &mut host), Ok(MenuOutcome::Close));
        assert_eq!(menu.select_path(&[3, 0], Confirm::default(), &mut host), Ok(MenuOutcome::Close));
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn collapse_releases_submenu_resources() {
        let mut host = host();
        let mut menu = ContextMenu::new(sample(&Rc::new(Cell::new(0))), Point::new(0, 0), Metrics::terminal());
        menu.pointer_moved(Point::new(4, 4), &mut host);
        host.advance(&mut Sink(&mut menu), ms(1));
        assert_eq!(host.document.listener_count(ListenerKind::PointerDownCapture), 1);
        menu.pointer_moved(Point::new(4, 1), &mut host);
        menu.collapse(&mut host);
        assert_eq!(host.document.total_listeners(), 0);
        assert_eq!(host.scheduler.pending_timers(), 0);
    }

    #[test]
    fn renders_rows_with_markers() {
        let menu = ContextMenu::new(sample(&Rc::new(Cell::new(0))), Point::new(0, 0), Metrics::terminal());
        let area = Rect::new(0, 0, 30, 10);
        let mut buf = Buffer::empty(area);
        let mut frame = UiFrame::from_parts(area, &mut buf);
        menu.render(&mut frame);
        let row = |y: u16| -> String {
            (0..20u16)
                .map(|x| buf[(x, y)].symbol().to_string())
                .collect()
        };
        assert!(row(0).starts_with("┌───"));
        assert!(row(1).contains("Copy"));
        assert!(row(2).contains("────"));
        assert!(row(4).contains("More"));
        assert!(row(4).contains('▸'));
        assert!(buf[(3u16, 3u16)].modifier.contains(ratatui::style::Modifier::DIM));
    }
}
