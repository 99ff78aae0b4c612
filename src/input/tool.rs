//! Creation tool selection.

use crate::draw::ShapeKind;

/// The active tool.
///
/// `Select` is the resting state: a pointer-down either picks up an existing
/// stroke or falls through to the viewer. `Create` arms a creation mode for the
/// next gesture only; it is disarmed again on pointer-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tool {
    /// Selection / pass-through (default)
    #[default]
    Select,
    /// Draw one shape of the given kind
    Create(ShapeKind),
}

impl Tool {
    /// Whether a creation mode is armed.
    pub fn is_armed(self) -> bool {
        matches!(self, Tool::Create(_))
    }

    /// The armed shape kind, if any.
    pub fn creation_kind(self) -> Option<ShapeKind> {
        match self {
            Tool::Create(kind) => Some(kind),
            Tool::Select => None,
        }
    }
}
