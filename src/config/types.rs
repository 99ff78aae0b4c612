//! Configuration type definitions.

use crate::draw::AnnotationColor;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Gesture interpretation settings.
///
/// All distances are in pixel space, i.e. measured on the rendered page.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct InteractionConfig {
    /// Lines and arrows shorter than this are discarded as accidental clicks
    /// (valid range: 1.0 - 100.0)
    #[serde(default = "default_line_min_length")]
    pub line_min_length_px: f64,

    /// Distance the pointer must travel from a stroke before the gesture
    /// becomes a drag-select instead of a click (valid range: 1.0 - 100.0)
    #[serde(default = "default_drag_select_threshold")]
    pub drag_select_threshold_px: f64,

    /// Minimum text box height as a multiple of the scaled font size
    #[serde(default = "default_text_min_height_factor")]
    pub text_min_height_factor: f64,

    /// Minimum text box width as a multiple of the scaled font size
    #[serde(default = "default_text_min_width_factor")]
    pub text_min_width_factor: f64,

    /// Keep the drafting preview inside the page canvas
    #[serde(default = "default_clamp_preview")]
    pub clamp_preview_to_page: bool,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            line_min_length_px: default_line_min_length(),
            drag_select_threshold_px: default_drag_select_threshold(),
            text_min_height_factor: default_text_min_height_factor(),
            text_min_width_factor: default_text_min_width_factor(),
            clamp_preview_to_page: default_clamp_preview(),
        }
    }
}

/// Defaults applied to newly drawn shapes.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DrawingConfig {
    /// Palette color for new shapes and text (red, yellow, green, blue, purple, black)
    #[serde(default)]
    pub default_color: AnnotationColor,

    /// Font size for new text boxes in points (valid range: 8.0 - 72.0)
    #[serde(default = "default_font_size")]
    pub default_font_size: f64,

    /// Stroke width of new shapes in unit space (valid range: 0.5 - 20.0)
    #[serde(default = "default_stroke_width")]
    pub stroke_width: f64,
}

impl Default for DrawingConfig {
    fn default() -> Self {
        Self {
            default_color: AnnotationColor::default(),
            default_font_size: default_font_size(),
            stroke_width: default_stroke_width(),
        }
    }
}

/// Stroke probing settings.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ProbeConfig {
    /// Extra hit distance around a stroke in unit space, added to half its
    /// width (valid range: 0.5 - 50.0)
    #[serde(default = "default_hit_tolerance")]
    pub hit_tolerance: f64,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            hit_tolerance: default_hit_tolerance(),
        }
    }
}

/// Commit gateway settings.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CommitConfig {
    /// Title of the confirmation prompt shown before deleting
    #[serde(default = "default_delete_confirm_title")]
    pub delete_confirm_title: String,

    /// Reload all annotations from the store after every successful mutation
    #[serde(default)]
    pub refresh_after_mutation: bool,
}

impl Default for CommitConfig {
    fn default() -> Self {
        Self {
            delete_confirm_title: default_delete_confirm_title(),
            refresh_after_mutation: false,
        }
    }
}

fn default_line_min_length() -> f64 {
    crate::geometry::MIN_LINE_LENGTH_PX
}

fn default_drag_select_threshold() -> f64 {
    10.0
}

fn default_text_min_height_factor() -> f64 {
    2.0
}

fn default_text_min_width_factor() -> f64 {
    6.0
}

fn default_clamp_preview() -> bool {
    true
}

fn default_font_size() -> f64 {
    14.0
}

fn default_stroke_width() -> f64 {
    2.0
}

fn default_hit_tolerance() -> f64 {
    4.0
}

fn default_delete_confirm_title() -> String {
    "Delete this annotation?".to_string()
}
