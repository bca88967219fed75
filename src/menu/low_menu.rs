//! Hover menu: a bar of buttons hanging under the element that owns it.

use std::collections::BTreeMap;
use std::rc::Rc;

use crate::config::Metrics;
use crate::host::{EventTarget, Host, Wakeup};
use crate::layout::{Bounds, Point};
use crate::menu::context_menu::{Confirm, MenuOutcome};
use crate::menu::model::{Label, MenuEntry, RenderedLabel, SelectionEffect};
use crate::menu::submenu::SubmenuSlot;
use crate::ui::UiFrame;

pub const LOW_MENU_ARIA_LABEL: &str = "Low context menu";

/// Height of the bar for `metrics`.
pub fn low_menu_height(metrics: &Metrics) -> i32 {
    metrics.entry_height + metrics.panel_padding
}

fn button_width(entry: &MenuEntry) -> i32 {
    let label = match &entry.label {
        Label::Text(text) => text.chars().count(),
        Label::Rendered(RenderedLabel::Custom(line)) => line.width(),
        Label::Rendered(RenderedLabel::Rule) => 1,
    };
    let caret = if entry.has_group() { 2 } else { 0 };
    i32::try_from(label).unwrap_or(i32::MAX).saturating_add(2 + caret)
}

#[derive(Debug)]
pub struct LowMenu {
    entries: Rc<[MenuEntry]>,
    bounds: Bounds,
    metrics: Metrics,
    highlighted: Option<usize>,
    slots: BTreeMap<usize, SubmenuSlot>,
}

impl LowMenu {
    pub fn new(entries: Rc<[MenuEntry]>, bounds: Bounds, metrics: Metrics) -> Self {
        let slots = entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.has_group())
            .map(|(index, _)| (index, SubmenuSlot::new(true)))
            .collect();
        Self {
            entries,
            bounds,
            metrics,
            highlighted: None,
            slots,
        }
    }

    pub fn aria_label(&self) -> &'static str {
        LOW_MENU_ARIA_LABEL
    }

    pub fn entries(&self) -> &Rc<[MenuEntry]> {
        &self.entries
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn set_bounds(&mut self, bounds: Bounds) {
        self.bounds = bounds;
    }

    pub fn highlighted(&self) -> Option<usize> {
        self.highlighted
    }

    pub fn submenu(&self, index: usize) -> Option<&SubmenuSlot> {
        self.slots.get(&index)
    }

    /// Buttons run left to right inside the bar, clipped at its right edge.
    pub fn button_bounds(&self, index: usize) -> Bounds {
        button_bounds(&self.entries, self.bounds, &self.metrics, index)
    }

    pub fn button_at(&self, at: Point) -> Option<usize> {
        (0..self.entries.len()).find(|i| self.button_bounds(*i).contains(at))
    }

    pub fn tree_bounds(&self, out: &mut Vec<Bounds>) {
        out.push(self.bounds);
        for slot in self.slots.values() {
            slot.tree_bounds(out);
        }
    }

    pub fn contains(&self, at: Point) -> bool {
        let mut roots = Vec::new();
        self.tree_bounds(&mut roots);
        roots.iter().any(|b| b.contains(at))
    }

    pub fn pointer_moved(&mut self, at: Point, host: &mut Host) {
        let mut over_child = None;
        for (index, slot) in self.slots.iter_mut() {
            let button = button_bounds(&self.entries, self.bounds, &self.metrics, *index);
            let in_child = slot.child_contains(at);
            if in_child {
                over_child = Some(*index);
            }
            slot.hover(button.contains(at) || in_child, at, host);
            if let Some(child) = slot.child_mut() {
                child.pointer_moved(at, host);
            }
        }
        self.highlighted = over_child.or_else(|| self.button_at(at));
    }

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
        for (index, slot) in self.slots.iter_mut() {
            let button = button_bounds(&self.entries, self.bounds, &self.metrics, *index);
            slot.pointer_down(target, button, host);
        }
        if !self.bounds.contains(at) {
            return MenuOutcome::Ignored;
        }
        let Some(index) = self.button_at(at) else {
            return MenuOutcome::Consumed;
        };
        let Some(entry) = self.entries.get(index) else {
            return MenuOutcome::Consumed;
        };
        match entry.activate(confirm.target, confirm.event) {
            SelectionEffect::Inert => MenuOutcome::Consumed,
            SelectionEffect::OpenSubmenu => {
                let button = self.button_bounds(index);
                if let Some(slot) = self.slots.get_mut(&index) {
                    slot.open(button, host);
                }
                MenuOutcome::Consumed
            }
            SelectionEffect::Close => MenuOutcome::Close,
        }
    }

    pub fn on_wakeup(&mut self, wakeup: Wakeup, host: &mut Host) -> bool {
        for (index, slot) in self.slots.iter_mut() {
            let button = button_bounds(&self.entries, self.bounds, &self.metrics, *index);
            let group = self.entries.get(*index).and_then(MenuEntry::submenu).unwrap_or(&[]);
            if slot.on_wakeup(wakeup, button, group, &self.metrics, host) {
                return true;
            }
        }
        false
    }

    pub fn collapse(&mut self, host: &mut Host) {
        for slot in self.slots.values_mut() {
            slot.unmount(host);
        }
        self.highlighted = None;
    }

    pub fn render(&self, frame: &mut UiFrame<'_>) {
        let base = crate::theme::menu_style();
        frame.fill(self.bounds, base);
        let border = base.fg(crate::theme::menu_border());
        let inner = usize::try_from(self.bounds.width() - 2).unwrap_or(0);
        let horizontal = "─".repeat(inner);
        frame.set_string_signed(self.bounds.left, self.bounds.top, &format!("┌{horizontal}┐"), inner + 2, border);
        frame.set_string_signed(
            self.bounds.left,
            self.bounds.bottom - 1,
            &format!("└{horizontal}┘"),
            inner + 2,
            border,
        );
        for y in self.bounds.top + 1..self.bounds.bottom - 1 {
            frame.set_string_signed(self.bounds.left, y, "│", 1, border);
            frame.set_string_signed(self.bounds.right - 1, y, "│", 1, border);
        }
        for (index, entry) in self.entries.iter().enumerate() {
            let button = self.button_bounds(index);
            if button.width() <= 0 {
                break;
            }
            let style = if entry.disabled {
                crate::theme::menu_disabled_style()
            } else if self.highlighted == Some(index) {
                crate::theme::menu_selected_style()
            } else {
                base
            };
            let width = usize::try_from(button.width()).unwrap_or(0);
            frame.fill(Bounds::new(button.left, button.right, button.top, button.top + 1), style);
            match &entry.label {
                Label::Text(text) => frame.set_string_signed(button.left + 1, button.top, text, width, style),
                Label::Rendered(RenderedLabel::Custom(line)) => {
                    frame.set_line_signed(button.left + 1, button.top, line, width)
                }
                Label::Rendered(RenderedLabel::Rule) => {
                    frame.set_string_signed(button.left + 1, button.top, "│", 1, border)
                }
            }
            if entry.has_group() {
                frame.set_string_signed(button.right - 2, button.top, "▴", 1, style);
            }
        }
        for slot in self.slots.values() {
            slot.render(frame);
        }
    }
}

fn button_bounds(entries: &[MenuEntry], bar: Bounds, metrics: &Metrics, index: usize) -> Bounds {
    let top = bar.top + metrics.panel_padding / 2;
    let mut left = bar.left + 1;
    for entry in entries.iter().take(index) {
        left = left.saturating_add(button_width(entry));
    }
    let right = entries
        .get(index)
        .map_or(left, |entry| left.saturating_add(button_width(entry)))
        .min(bar.right - 1);
    Bounds::new(left, right.max(left), top, top + metrics.entry_height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::WakeupSink;
    use std::cell::Cell;
    use std::time::Duration;

    struct Sink<'a>(&'a mut LowMenu);

    impl WakeupSink for Sink<'_> {
        fn on_wakeup(&mut self, wakeup: Wakeup, host: &mut Host) -> bool {
            self.0.on_wakeup(wakeup, host)
        }
    }

    fn bar(hits: &Rc<Cell<u32>>) -> LowMenu {
        let h = hits.clone();
        let entries: Rc<[MenuEntry]> = vec![
            MenuEntry::text("Bold").with_action(move |_, _| h.set(h.get() + 1)),
            MenuEntry::text("Off").disabled(true),
            MenuEntry::text("Style").with_group(vec![MenuEntry::text("H1"), MenuEntry::text("H2")]),
        ]
        .into();
        LowMenu::new(entries, Bounds::new(0, 40, 10, 13), Metrics::terminal())
    }

    #[test]
    fn buttons_are_laid_out_left_to_right() {
        let menu = bar(&Rc::new(Cell::new(0)));
        assert_eq!(menu.button_bounds(0), Bounds::new(1, 7, 11, 12));
        assert_eq!(menu.button_bounds(1), Bounds::new(7, 12, 11, 12));
        assert_eq!(menu.button_bounds(2), Bounds::new(12, 21, 11, 12));
        assert_eq!(menu.button_at(Point::new(8, 11)), Some(1));
        assert_eq!(menu.aria_label(), "Low context menu");
    }

    #[test]
    fn buttons_confirm_like_menu_rows() {
        let hits = Rc::new(Cell::new(0));
        let mut host = Host::default();
        let mut menu = bar(&hits);
        let at = |x| EventTarget::Cell(Point::new(x, 11));
        assert_eq!(menu.pointer_down(&at(2), Confirm::default(), &mut host), MenuOutcome::Close);
        assert_eq!(menu.pointer_down(&at(8), Confirm::default(), &mut host), MenuOutcome::Consumed);
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn group_button_opens_submenu_above_the_bar() {
        let mut host = Host::default().with_metrics(Metrics::terminal());
        let mut menu = bar(&Rc::new(Cell::new(0)));
        menu.pointer_moved(Point::new(14, 11), &mut host);
        host.advance(&mut Sink(&mut menu), Duration::from_millis(1));
        let slot = menu.submenu(2).unwrap();
        assert!(slot.is_visible());
        let child = slot.child().unwrap();
        // two rows plus borders, ending on the button's row
        assert_eq!(child.origin(), Point::new(12, 11 - 2 - 2));
        assert_eq!(child.bounds().bottom, 11);
    }
}
