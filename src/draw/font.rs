//! Font records carried by text-box annotations.

use super::color::AnnotationColor;
use serde::{Deserialize, Serialize};

/// One styled run of text inside a text box.
///
/// A freshly created text box carries a single empty record holding the font
/// size and color that were active when it was drawn; the inline editor fills
/// in `content` afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontRecord {
    /// Font size in points (unit space, independent of page zoom)
    pub font_size: f64,
    /// Text color
    pub color: AnnotationColor,
    /// Text content of this run
    pub content: String,
}

impl FontRecord {
    /// Creates the initial, empty record for a new text box.
    pub fn empty(font_size: f64, color: AnnotationColor) -> Self {
        Self {
            font_size,
            color,
            content: String::new(),
        }
    }

    /// Returns true when the record holds no text.
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}
