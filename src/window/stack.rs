//! Z-order registry shared by every floating window in a group.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use crate::error::WidgetError;

/// Stacking value of one registered window.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ZSlot {
    #[default]
    Unset,
    Value(i64),
    /// Written from outside as something that is not a number.
    Foreign(String),
}

impl ZSlot {
    pub fn value(&self) -> Option<i64> {
        match self {
            ZSlot::Value(z) => Some(*z),
            ZSlot::Unset | ZSlot::Foreign(_) => None,
        }
    }

    /// Interpret a raw value; anything that is not an integer is kept as
    /// `Foreign` and ignored for ordering.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().parse::<i64>() {
            Ok(z) => ZSlot::Value(z),
            Err(_) if raw.trim().is_empty() => ZSlot::Unset,
            Err(_) => ZSlot::Foreign(raw.to_string()),
        }
    }
}

#[derive(Debug, Default)]
pub struct WindowStack {
    slots: BTreeMap<String, ZSlot>,
}

pub type WindowStackHandle = Rc<RefCell<WindowStack>>;

impl WindowStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle() -> WindowStackHandle {
        Rc::new(RefCell::new(Self::new()))
    }

    pub fn register(&mut self, id: &str) {
        self.slots.entry(id.to_string()).or_default();
    }

    pub fn deregister(&mut self, id: &str) -> bool {
        self.slots.remove(id).is_some()
    }

    pub fn is_registered(&self, id: &str) -> bool {
        self.slots.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn z_index(&self, id: &str) -> Option<i64> {
        self.slots.get(id).and_then(ZSlot::value)
    }

    pub fn slot(&self, id: &str) -> Option<&ZSlot> {
        self.slots.get(id)
    }

    /// Highest numeric z-index, ignoring unset and foreign slots.
    pub fn max_z(&self) -> Option<i64> {
        self.slots.values().filter_map(ZSlot::value).max()
    }

    /// Give `id` a z-index one above every other window, or `floor` when no
    /// window has a numeric value yet.
    pub fn bring_to_front(&mut self, id: &str, floor: i64) -> Result<i64, WidgetError> {
        let top = self.max_z().unwrap_or(floor.saturating_sub(1));
        let slot = self
            .slots
            .get_mut(id)
            .ok_or_else(|| WidgetError::UnknownWindow(id.to_string()))?;
        let z = top.saturating_add(1);
        *slot = ZSlot::Value(z);
        tracing::debug!(window = %id, z, "window brought to front");
        Ok(z)
    }

    /// Overwrite a slot with a raw value from outside the stack.
    pub fn set_raw(&mut self, id: &str, raw: &str) -> Result<(), WidgetError> {
        let slot = self
            .slots
            .get_mut(id)
            .ok_or_else(|| WidgetError::UnknownWindow(id.to_string()))?;
        *slot = ZSlot::parse(raw);
        if let ZSlot::Foreign(value) = slot {
            tracing::warn!(window = %id, value = %value, "non-numeric z-index ignored");
        }
        Ok(())
    }

    /// Registered ids from bottom to top. Windows without a numeric value
    /// come first.
    pub fn order(&self) -> Vec<String> {
        let mut ids: Vec<(&String, Option<i64>)> =
            self.slots.iter().map(|(id, slot)| (id, slot.value())).collect();
        ids.sort_by_key(|(_, z)| *z);
        ids.into_iter().map(|(id, _)| id.clone()).collect()
    }
}
