//! Centralized shortcut and action system.
//!
//! This module maps key events to actions per input context, so the page and
//! the picker overlay can share keys without stepping on each other.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::collections::HashMap;

/// Context active while the page has focus.
pub const PAGE_CONTEXT: &str = "page";

/// Context active while the character picker is open.
pub const PICKER_CONTEXT: &str = "picker";

/// All possible actions in the application.
///
/// This enum represents every action a user can take. It serves as the
/// bridge between keyboard shortcuts and application behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    // === PAGE SCROLLING ===
    /// Scroll one line up
    ScrollUp,
    /// Scroll one line down
    ScrollDown,
    /// Scroll one screen up
    PageUp,
    /// Scroll one screen down
    PageDown,
    /// Jump to the top of the page
    ScrollTop,
    /// Jump to the bottom of the page
    ScrollBottom,

    // === NAVIGATION ===
    /// Follow the numbered nav link (1-based)
    FollowLink(u8),

    // === PICKER ===
    /// Open the character picker
    OpenPicker,
    /// Move picker focus left
    FocusLeft,
    /// Move picker focus right
    FocusRight,
    /// Move picker focus up one row
    FocusUp,
    /// Move picker focus down one row
    FocusDown,
    /// Equip the focused character
    Equip,
    /// Close the picker
    ClosePicker,

    // === GENERAL ===
    /// Leave the application
    Quit,
}

impl Action {
    /// Stable action id, used in help text and logs.
    #[must_use]
    pub const fn id(&self) -> &'static str {
        match self {
            Self::ScrollUp => "scroll_up",
            Self::ScrollDown => "scroll_down",
            Self::PageUp => "page_up",
            Self::PageDown => "page_down",
            Self::ScrollTop => "scroll_top",
            Self::ScrollBottom => "scroll_bottom",
            Self::FollowLink(_) => "follow_link",
            Self::OpenPicker => "open_picker",
            Self::FocusLeft => "focus_left",
            Self::FocusRight => "focus_right",
            Self::FocusUp => "focus_up",
            Self::FocusDown => "focus_down",
            Self::Equip => "equip",
            Self::ClosePicker => "close_picker",
            Self::Quit => "quit",
        }
    }
}

/// Shortcut registry that maps key events to actions for a given context.
///
/// This is the central source of truth for all keyboard shortcuts in the application.
#[derive(Debug)]
pub struct ShortcutRegistry {
    /// Maps (context, key_binding) to Action
    bindings: HashMap<(&'static str, KeyBinding), Action>,
}

/// A key binding (key + modifiers).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyBinding {
    /// Key code
    pub code: KeyCode,
    /// Modifier keys held
    pub modifiers: KeyModifiers,
}

impl KeyBinding {
    /// Create a new key binding.
    #[must_use]
    pub const fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    /// Create a key binding from a KeyEvent.
    ///
    /// Shift is dropped for character keys, whose case already carries it.
    #[must_use]
    pub fn from_event(event: KeyEvent) -> Self {
        let modifiers = match event.code {
            KeyCode::Char(_) => event.modifiers - KeyModifiers::SHIFT,
            _ => event.modifiers,
        };
        Self {
            code: event.code,
            modifiers,
        }
    }
}

impl ShortcutRegistry {
    /// Create a new shortcut registry with default bindings.
    #[must_use]
    pub fn new() -> Self {
        let mut registry = Self {
            bindings: HashMap::new(),
        };

        registry.register_page_shortcuts();
        registry.register_picker_shortcuts();
        registry
    }

    /// Register all shortcuts for the page context.
    fn register_page_shortcuts(&mut self) {
        use KeyCode as K;
        use KeyModifiers as M;

        let ctx = PAGE_CONTEXT;

        // === SCROLLING ===
        self.register(ctx, K::Up, M::NONE, Action::ScrollUp);
        self.register(ctx, K::Down, M::NONE, Action::ScrollDown);
        self.register(ctx, K::Char('k'), M::NONE, Action::ScrollUp);
        self.register(ctx, K::Char('j'), M::NONE, Action::ScrollDown);
        self.register(ctx, K::PageUp, M::NONE, Action::PageUp);
        self.register(ctx, K::PageDown, M::NONE, Action::PageDown);
        self.register(ctx, K::Char(' '), M::NONE, Action::PageDown);
        self.register(ctx, K::Home, M::NONE, Action::ScrollTop);
        self.register(ctx, K::Char('g'), M::NONE, Action::ScrollTop);
        self.register(ctx, K::End, M::NONE, Action::ScrollBottom);
        self.register(ctx, K::Char('G'), M::NONE, Action::ScrollBottom);

        // === NAV LINKS ===
        for digit in 1..=9u8 {
            let key = char::from(b'0' + digit);
            self.register(ctx, K::Char(key), M::NONE, Action::FollowLink(digit));
        }

        // === PICKER ===
        self.register(ctx, K::Char('c'), M::NONE, Action::OpenPicker);

        // === GENERAL ===
        self.register(ctx, K::Char('q'), M::NONE, Action::Quit);
        self.register(ctx, K::Char('c'), M::CONTROL, Action::Quit);
    }

    /// Register all shortcuts for the picker context.
    fn register_picker_shortcuts(&mut self) {
        use KeyCode as K;
        use KeyModifiers as M;

        let ctx = PICKER_CONTEXT;

        // === FOCUS ===
        self.register(ctx, K::Left, M::NONE, Action::FocusLeft);
        self.register(ctx, K::Right, M::NONE, Action::FocusRight);
        self.register(ctx, K::Up, M::NONE, Action::FocusUp);
        self.register(ctx, K::Down, M::NONE, Action::FocusDown);
        self.register(ctx, K::Char('h'), M::NONE, Action::FocusLeft);
        self.register(ctx, K::Char('l'), M::NONE, Action::FocusRight);
        self.register(ctx, K::Char('k'), M::NONE, Action::FocusUp);
        self.register(ctx, K::Char('j'), M::NONE, Action::FocusDown);
        self.register(ctx, K::Tab, M::NONE, Action::FocusRight);
        self.register(ctx, K::BackTab, M::SHIFT, Action::FocusLeft);

        // === COMMIT & CLOSE ===
        self.register(ctx, K::Enter, M::NONE, Action::Equip);
        self.register(ctx, K::Char(' '), M::NONE, Action::Equip);
        self.register(ctx, K::Esc, M::NONE, Action::ClosePicker);
        self.register(ctx, K::Char('q'), M::NONE, Action::ClosePicker);
        self.register(ctx, K::Char('c'), M::CONTROL, Action::Quit);
    }

    /// Register a shortcut binding.
    fn register(
        &mut self,
        context: &'static str,
        code: KeyCode,
        modifiers: KeyModifiers,
        action: Action,
    ) {
        let binding = KeyBinding::new(code, modifiers);
        self.bindings.insert((context, binding), action);
    }

    /// Look up an action for a given context and key event.
    #[must_use]
    pub fn lookup(&self, context: &'static str, event: KeyEvent) -> Option<Action> {
        let binding = KeyBinding::from_event(event);
        self.bindings.get(&(context, binding)).copied()
    }

    /// Check if a key event matches a specific action in the given context.
    #[must_use]
    pub fn matches(&self, context: &'static str, event: KeyEvent, action: Action) -> bool {
        self.lookup(context, event) == Some(action)
    }
}

impl Default for ShortcutRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_basic_lookup() {
        let registry = ShortcutRegistry::new();

        assert_eq!(
            registry.lookup(PAGE_CONTEXT, key(KeyCode::Char('c'))),
            Some(Action::OpenPicker)
        );
        assert_eq!(
            registry.lookup(PAGE_CONTEXT, key(KeyCode::Char('3'))),
            Some(Action::FollowLink(3))
        );
        assert_eq!(registry.lookup(PAGE_CONTEXT, key(KeyCode::Char('0'))), None);
    }

    #[test]
    fn test_contexts_do_not_leak() {
        let registry = ShortcutRegistry::new();

        // 'q' quits the page but only closes the picker
        assert_eq!(
            registry.lookup(PAGE_CONTEXT, key(KeyCode::Char('q'))),
            Some(Action::Quit)
        );
        assert_eq!(
            registry.lookup(PICKER_CONTEXT, key(KeyCode::Char('q'))),
            Some(Action::ClosePicker)
        );
        assert_eq!(registry.lookup(PICKER_CONTEXT, key(KeyCode::Char('5'))), None);
    }

    #[test]
    fn test_vim_navigation() {
        let registry = ShortcutRegistry::new();

        assert!(registry.matches(PAGE_CONTEXT, key(KeyCode::Char('j')), Action::ScrollDown));
        assert!(registry.matches(PICKER_CONTEXT, key(KeyCode::Char('j')), Action::FocusDown));
        assert!(registry.matches(PICKER_CONTEXT, key(KeyCode::Char('h')), Action::FocusLeft));
    }

    #[test]
    fn test_shifted_characters_match() {
        let registry = ShortcutRegistry::new();
        let event = KeyEvent::new(KeyCode::Char('G'), KeyModifiers::SHIFT);
        assert_eq!(registry.lookup(PAGE_CONTEXT, event), Some(Action::ScrollBottom));
    }
}
