//! Generic input event types for cross-backend compatibility.

/// Generic key representation for cross-backend compatibility.
///
/// Backend implementations map their native key codes to these generic
/// key values; the region editor only acts on a handful of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// Regular character key (a-z, 0-9, symbols)
    Char(char),
    /// Escape key (cancel the selection)
    Escape,
    /// Return key (confirm the selection)
    Return,
    /// Keypad Enter (confirm the selection)
    KeypadEnter,
    /// Unmapped or unrecognized key
    Unknown,
}

impl Key {
    /// Keys that confirm the current selection.
    pub fn is_confirm(self) -> bool {
        matches!(self, Key::Return | Key::KeypadEnter)
    }
}

/// Mouse button identification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    /// Left mouse button (drag handles, double-click confirms)
    Left,
    /// Right mouse button (cancel action)
    Right,
    /// Middle mouse button (currently unused)
    Middle,
}
