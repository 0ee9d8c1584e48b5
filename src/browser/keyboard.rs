//! Non-text keys sent through `input.typeKey`.

// ============================================================================
// Key
// ============================================================================

/// A control key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// Enter/Return.
    Enter,
    /// Tab.
    Tab,
    /// Escape.
    Escape,
    /// Backspace.
    Backspace,
}

impl Key {
    /// `(key, code, keyCode, printable)` as a DOM `KeyboardEvent` carries them.
    #[must_use]
    pub const fn properties(self) -> (&'static str, &'static str, u32, bool) {
        match self {
            Self::Enter => ("Enter", "Enter", 13, false),
            Self::Tab => ("Tab", "Tab", 9, false),
            Self::Escape => ("Escape", "Escape", 27, false),
            Self::Backspace => ("Backspace", "Backspace", 8, false),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
