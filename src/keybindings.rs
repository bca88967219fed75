use std::collections::HashMap;
use std::fmt;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Quit,
    // Menu navigation
    MenuUp,
    MenuDown,
    MenuNext, // 'j'
    MenuPrev, // 'k'
    MenuSelect,
    MenuOpenSubmenu,
    MenuClose,
    // Floating windows
    WindowClose,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Action::Quit => "Quit",
            Action::MenuUp => "Menu up",
            Action::MenuDown => "Menu down",
            Action::MenuNext => "Menu next (j)",
            Action::MenuPrev => "Menu previous (k)",
            Action::MenuSelect => "Menu select",
            Action::MenuOpenSubmenu => "Open submenu",
            Action::MenuClose => "Close menu",
            Action::WindowClose => "Close window",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyCombo {
    pub code: KeyCode,
    pub mods: KeyModifiers,
}

impl KeyCombo {
    pub fn new(code: KeyCode, mods: KeyModifiers) -> Self {
        Self { code, mods }
    }

    pub fn matches(&self, key: &KeyEvent) -> bool {
        key.code == self.code && key.modifiers == self.mods
    }

    pub fn display(&self) -> String {
        let mut parts = Vec::new();
        if self.mods.contains(KeyModifiers::CONTROL) {
            parts.push("Ctrl".to_string());
        }
        if self.mods.contains(KeyModifiers::SHIFT) {
            parts.push("Shift".to_string());
        }
        if self.mods.contains(KeyModifiers::ALT) {
            parts.push("Alt".to_string());
        }
        let code = match self.code {
            KeyCode::Char(c) => c.to_ascii_uppercase().to_string(),
            KeyCode::Esc => "Esc".to_string(),
            KeyCode::Enter => "Enter".to_string(),
            KeyCode::Left => "Left".to_string(),
            KeyCode::Right => "Right".to_string(),
            KeyCode::Up => "Up".to_string(),
            KeyCode::Down => "Down".to_string(),
            _ => format!("{:?}", self.code),
        };
        parts.push(code);
        parts.join("+")
    }
}

impl fmt::Display for KeyCombo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}

#[derive(Debug, Clone)]
pub struct KeyBindings {
    map: HashMap<Action, Vec<KeyCombo>>,
}

impl KeyBindings {
    pub fn new() -> Self {
        Self {
            map: HashMap::new(),
        }
    }

    pub fn add(&mut self, action: Action, combo: KeyCombo) {
        self.map.entry(action).or_default().push(combo);
    }

    pub fn matches(&self, action: Action, key: &KeyEvent) -> bool {
        self.map
            .get(&action)
            .is_some_and(|list| list.iter().any(|c| c.matches(key)))
    }

    /// Menu action bound to `key`. Checked in a fixed order so keys shared
    /// between actions resolve the same way every time.
    pub fn menu_action(&self, key: &KeyEvent) -> Option<Action> {
        use Action::*;
        [
            MenuUp,
            MenuPrev,
            MenuDown,
            MenuNext,
            MenuSelect,
            MenuOpenSubmenu,
            MenuClose,
        ]
        .into_iter()
        .find(|action| self.matches(*action, key))
    }

    /// Return the display strings for all combos mapped to `action`.
    pub fn combos_for(&self, action: Action) -> Vec<String> {
        self.map
            .get(&action)
            .map(|list| list.iter().map(|c| c.display()).collect())
            .unwrap_or_default()
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        use Action::*;
        let mut kb = Self::new();
        kb.add(
            Quit,
            KeyCombo::new(KeyCode::Char('q'), KeyModifiers::CONTROL),
        );
        kb.add(MenuUp, KeyCombo::new(KeyCode::Up, KeyModifiers::NONE));
        kb.add(MenuDown, KeyCombo::new(KeyCode::Down, KeyModifiers::NONE));
        kb.add(
            MenuNext,
            KeyCombo::new(KeyCode::Char('j'), KeyModifiers::NONE),
        );
        kb.add(
            MenuPrev,
            KeyCombo::new(KeyCode::Char('k'), KeyModifiers::NONE),
        );
        kb.add(
            MenuSelect,
            KeyCombo::new(KeyCode::Enter, KeyModifiers::NONE),
        );
        kb.add(
            MenuOpenSubmenu,
            KeyCombo::new(KeyCode::Right, KeyModifiers::NONE),
        );
        kb.add(
            MenuOpenSubmenu,
            KeyCombo::new(KeyCode::Char('l'), KeyModifiers::NONE),
        );
        kb.add(MenuClose, KeyCombo::new(KeyCode::Esc, KeyModifiers::NONE));
        kb.add(MenuClose, KeyCombo::new(KeyCode::Left, KeyModifiers::NONE));
        kb.add(
            MenuClose,
            KeyCombo::new(KeyCode::Char('h'), KeyModifiers::NONE),
        );
        kb.add(
            WindowClose,
            KeyCombo::new(KeyCode::Char('w'), KeyModifiers::CONTROL),
        );
        kb
    }
}
