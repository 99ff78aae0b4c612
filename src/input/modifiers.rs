//! Keyboard modifier state tracking.

use serde::{Deserialize, Serialize};

/// Keyboard modifier state captured with a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Modifiers {
    /// Shift key pressed
    #[serde(default)]
    pub shift: bool,
    /// Ctrl key pressed
    #[serde(default)]
    pub ctrl: bool,
    /// Alt key pressed
    #[serde(default)]
    pub alt: bool,
    /// Meta (Command) key pressed
    #[serde(default)]
    pub meta: bool,
}

impl Modifiers {
    /// Creates a new Modifiers instance with all keys released.
    pub fn new() -> Self {
        Self::default()
    }

    /// Modifier state with only Ctrl held.
    pub fn ctrl() -> Self {
        Self {
            ctrl: true,
            ..Self::default()
        }
    }

    /// Whether this is a "ctrl + click" selection gesture.
    ///
    /// Meta counts as Ctrl so the gesture works with Command on macOS. A
    /// selection click goes straight to the viewer and never probes strokes.
    pub fn is_selection_click(&self) -> bool {
        self.ctrl || self.meta
    }
}
