//! Menu entry tree and the rules for combining nested menus.

use std::fmt;
use std::rc::Rc;

use crossterm::event::Event;
use ratatui::text::Line;

use crate::error::WidgetError;

/// Pre-rendered label content. The menu core never looks inside a custom
/// line; `Rule` is the one marker it recognises.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderedLabel {
    /// Horizontal rule used as a divider between entry groups.
    Rule,
    Custom(Line<'static>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Label {
    Text(String),
    Rendered(RenderedLabel),
}

impl Label {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Label::Text(text) => Some(text),
            Label::Rendered(_) => None,
        }
    }
}

impl From<&str> for Label {
    fn from(text: &str) -> Self {
        Label::Text(text.to_string())
    }
}

impl From<String> for Label {
    fn from(text: String) -> Self {
        Label::Text(text)
    }
}

impl From<Line<'static>> for Label {
    fn from(line: Line<'static>) -> Self {
        Label::Rendered(RenderedLabel::Custom(line))
    }
}

/// Text selection captured when a menu opened, handed to actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionTarget(pub String);

impl SelectionTarget {
    pub fn text(&self) -> &str {
        &self.0
    }
}

pub type MenuAction = Rc<dyn Fn(Option<&SelectionTarget>, Option<&Event>)>;

/// What confirming an entry does to the menu showing it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionEffect {
    /// Disabled: nothing happens and the menu stays open.
    Inert,
    OpenSubmenu,
    Close,
}

#[derive(Clone)]
pub struct MenuEntry {
    pub label: Label,
    pub disabled: bool,
    pub action: Option<MenuAction>,
    pub group: Option<Vec<MenuEntry>>,
}

impl fmt::Debug for MenuEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MenuEntry")
            .field("label", &self.label)
            .field("disabled", &self.disabled)
            .field("action", &self.action.is_some())
            .field("group", &self.group)
            .finish()
    }
}

impl MenuEntry {
    pub fn new(label: impl Into<Label>) -> Self {
        Self {
            label: label.into(),
            disabled: false,
            action: None,
            group: None,
        }
    }

    pub fn text(label: impl Into<String>) -> Self {
        Self::new(Label::Text(label.into()))
    }

    pub fn divider() -> Self {
        Self::new(Label::Rendered(RenderedLabel::Rule))
    }

    pub fn with_action<F>(mut self, action: F) -> Self
    where
        F: Fn(Option<&SelectionTarget>, Option<&Event>) + 'static,
    {
        self.action = Some(Rc::new(action));
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn with_group(mut self, group: Vec<MenuEntry>) -> Self {
        self.group = Some(group);
        self
    }

    pub fn is_divider(&self) -> bool {
        matches!(self.label, Label::Rendered(RenderedLabel::Rule))
    }

    /// Non-empty submenu, if any. An empty group behaves like no group.
    pub fn submenu(&self) -> Option<&[MenuEntry]> {
        self.group.as_deref().filter(|group| !group.is_empty())
    }

    pub fn has_group(&self) -> bool {
        self.submenu().is_some()
    }

    pub fn aria_label(&self) -> Option<&str> {
        self.label.as_text()
    }

    pub fn aria_disabled(&self) -> bool {
        self.disabled
    }

    /// Dividers can never be highlighted or confirmed.
    pub fn is_selectable(&self) -> bool {
        !self.is_divider()
    }

    pub fn selection_effect(&self) -> SelectionEffect {
        if self.disabled || self.is_divider() {
            SelectionEffect::Inert
        } else if self.has_group() {
            SelectionEffect::OpenSubmenu
        } else {
            SelectionEffect::Close
        }
    }

    /// Confirm this entry: runs the action when the effect is `Close`.
    pub fn activate(&self, target: Option<&SelectionTarget>, event: Option<&Event>) -> SelectionEffect {
        let effect = self.selection_effect();
        if effect == SelectionEffect::Close
            && let Some(action) = &self.action
        {
            action(target, event);
        }
        effect
    }
}

/// Outer entries, then a single divider when one is needed, then inner
/// entries.
pub fn compose_entries(outer: &[MenuEntry], inner: &[MenuEntry]) -> Vec<MenuEntry> {
    let mut out = Vec::with_capacity(outer.len() + inner.len() + 1);
    out.extend_from_slice(outer);
    let needs_divider = match (outer.last(), inner.first()) {
        (Some(last), Some(first)) => !last.is_divider() && !first.is_divider(),
        _ => false,
    };
    if needs_divider {
        out.push(MenuEntry::divider());
    }
    out.extend_from_slice(inner);
    out
}

/// Follow `path` through nested groups.
pub fn entry_at_path<'a>(entries: &'a [MenuEntry], path: &[usize]) -> Result<&'a MenuEntry, WidgetError> {
    let unknown = || WidgetError::UnknownEntry {
        path: path.to_vec(),
    };
    let (first, rest) = path.split_first().ok_or_else(unknown)?;
    let mut entry = entries.get(*first).ok_or_else(unknown)?;
    for index in rest {
        entry = entry
            .submenu()
            .and_then(|group| group.get(*index))
            .ok_or_else(unknown)?;
    }
    Ok(entry)
}

/// Memoised [`compose_entries`]. The result is reused for as long as both
/// inputs are the same allocations.
#[derive(Debug, Default)]
pub struct EntryComposer {
    inputs: Option<(Rc<[MenuEntry]>, Rc<[MenuEntry]>)>,
    composed: Option<Rc<[MenuEntry]>>,
    recomputed: usize,
}

impl EntryComposer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn compose(&mut self, outer: &Rc<[MenuEntry]>, inner: &Rc<[MenuEntry]>) -> Rc<[MenuEntry]> {
        if let (Some((o, i)), Some(composed)) = (&self.inputs, &self.composed)
            && Rc::ptr_eq(o, outer)
            && Rc::ptr_eq(i, inner)
        {
            return composed.clone();
        }
        let composed: Rc<[MenuEntry]> = compose_entries(outer, inner).into();
        self.inputs = Some((outer.clone(), inner.clone()));
        self.composed = Some(composed.clone());
        self.recomputed += 1;
        composed
    }

    /// How many times the composition actually ran.
    pub fn recomputed(&self) -> usize {
        self.recomputed
    }
}
