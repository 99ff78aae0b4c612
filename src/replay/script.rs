//! Replay script format.
//!
//! A script describes the pages of a document, the freehand strokes already
//! on them, how the in-memory collaborators behave, and the sequence of
//! steps to replay.
//!
//! # Example
//! ```toml
//! [probe]
//! latency_ms = 5
//!
//! [[pages]]
//! scale = 1.0
//! width = 800.0
//! height = 1000.0
//!
//! [[pages.strokes]]
//! id = "s1"
//! points = [[10.0, 10.0], [200.0, 10.0]]
//!
//! [[steps]]
//! action = "arm"
//! shape = "rectangle"
//!
//! [[steps]]
//! action = "down"
//! page = 0
//! x = 100.0
//! y = 100.0
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::draw::{AnnotationColor, ShapeKind};
use crate::input::PointerEventKind;
use crate::probe::StrokeRecord;

/// Errors raised while loading or running a script.
#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("failed to read script {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse script: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid script: {0}")]
    Invalid(String),
}

/// A rendered page.
#[derive(Debug, Clone, Deserialize)]
pub struct PageSpec {
    /// Render scale (pixel space / unit space)
    #[serde(default = "default_scale")]
    pub scale: f64,
    /// Canvas width in pixel space
    pub width: f64,
    /// Canvas height in pixel space
    pub height: f64,
    /// Existing freehand strokes, unit space
    #[serde(default)]
    pub strokes: Vec<StrokeRecord>,
    /// Makes stroke probes on this page fail
    #[serde(default)]
    pub unavailable: bool,
}

fn default_scale() -> f64 {
    1.0
}

/// Stroke probe behavior.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProbeSpec {
    /// Artificial delay before each probe answers
    #[serde(default)]
    pub latency_ms: u64,
}

/// In-memory store behavior.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StoreSpec {
    /// Number of upcoming creates that fail with a store error
    #[serde(default)]
    pub fail_creates: usize,
    /// Number of upcoming creates acknowledged without an id
    #[serde(default)]
    pub empty_ids: usize,
    /// Number of upcoming updates or deletes that fail with a store error
    #[serde(default)]
    pub fail_mutations: usize,
    /// Artificial delay before each store call answers
    #[serde(default)]
    pub latency_ms: u64,
}

/// Scripted answers to delete confirmations.
#[derive(Debug, Clone, Deserialize)]
pub struct ConfirmSpec {
    /// Answers handed out in order
    #[serde(default)]
    pub answers: Vec<bool>,
    /// Answer once `answers` is exhausted
    #[serde(default = "default_confirm")]
    pub default: bool,
}

impl Default for ConfirmSpec {
    fn default() -> Self {
        Self {
            answers: Vec::new(),
            default: default_confirm(),
        }
    }
}

fn default_confirm() -> bool {
    true
}

/// A pointer position on a page, or outside every page when `page` is absent.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PointerStep {
    pub page: Option<u32>,
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    /// Ctrl held
    #[serde(default)]
    pub ctrl: bool,
}

/// One replay step.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Step {
    /// Arm a one-shot creation mode
    Arm { shape: ShapeKind },
    /// Disarm the creation mode
    Disarm,
    /// Color for new shapes
    Color { color: AnnotationColor },
    /// Allow or forbid picking up existing strokes
    StrokeEditing { enabled: bool },
    Down(PointerStep),
    Move(PointerStep),
    Up(PointerStep),
    DoubleClick(PointerStep),
    Cancel,
    /// Pointer callback in container coordinates, resolved by the viewer
    Raw {
        kind: PointerEventKind,
        client_x: f64,
        client_y: f64,
        #[serde(default)]
        ctrl: bool,
    },
    /// Process every outstanding probe outcome
    SettleProbes,
    /// Process outstanding probes and wait for spawned commits
    Settle,
    /// Recolor a committed annotation
    Recolor { id: String, color: AnnotationColor },
    /// Move a committed annotation by a unit-space offset
    Translate { id: String, dx: f64, dy: f64 },
    /// Delete a committed annotation; `concurrent` issues two deletes at once
    Delete {
        id: String,
        #[serde(default)]
        concurrent: bool,
    },
    /// Delete an existing freehand stroke
    DeleteStroke { page: u32, stroke: String },
    /// Reload annotations from the store
    Refresh,
}

/// A complete replay script.
#[derive(Debug, Clone, Deserialize)]
pub struct Script {
    pub pages: Vec<PageSpec>,
    #[serde(default)]
    pub probe: ProbeSpec,
    #[serde(default)]
    pub store: StoreSpec,
    #[serde(default)]
    pub confirm: ConfirmSpec,
    #[serde(default)]
    pub steps: Vec<Step>,
}

impl Script {
    /// Parses and validates a script.
    pub fn from_toml(source: &str) -> Result<Self, ScriptError> {
        let script: Script = toml::from_str(source)?;
        script.validate()?;
        Ok(script)
    }

    /// Reads, parses and validates a script file.
    pub fn load(path: &Path) -> Result<Self, ScriptError> {
        let source = std::fs::read_to_string(path).map_err(|source| ScriptError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&source)
    }

    fn validate(&self) -> Result<(), ScriptError> {
        if self.pages.is_empty() {
            return Err(ScriptError::Invalid("at least one page is required".into()));
        }

        for (index, page) in self.pages.iter().enumerate() {
            if !(page.scale.is_finite() && page.scale > 0.0) {
                return Err(ScriptError::Invalid(format!(
                    "page {index} has invalid scale {}",
                    page.scale
                )));
            }
            if !(page.width > 0.0 && page.height > 0.0) {
                return Err(ScriptError::Invalid(format!(
                    "page {index} has an empty canvas"
                )));
            }
        }

        let page_count = self.pages.len() as u32;
        for (index, step) in self.steps.iter().enumerate() {
            let page = match step {
                Step::Down(at) | Step::Move(at) | Step::Up(at) | Step::DoubleClick(at) => at.page,
                Step::DeleteStroke { page, .. } => Some(*page),
                _ => None,
            };
            if let Some(page) = page.filter(|page| *page >= page_count) {
                return Err(ScriptError::Invalid(format!(
                    "step {index} refers to page {page}, but the script has {page_count} pages"
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_pages_and_steps() {
        let script = Script::from_toml(
            r#"
            [[pages]]
            scale = 2.0
            width = 800.0
            height = 600.0

            [[pages.strokes]]
            id = "s1"
            points = [[1.0, 2.0], [3.0, 4.0]]

            [[steps]]
            action = "arm"
            shape = "text_box"

            [[steps]]
            action = "down"
            page = 0
            x = 10.0
            y = 20.0

            [[steps]]
            action = "up"

            [[steps]]
            action = "delete"
            id = "a1"
            concurrent = true
            "#,
        )
        .unwrap();

        assert_eq!(script.pages[0].scale, 2.0);
        assert_eq!(script.pages[0].strokes[0].width, 2.0);
        assert!(matches!(
            script.steps[0],
            Step::Arm {
                shape: ShapeKind::TextBox
            }
        ));
        assert!(matches!(script.steps[1], Step::Down(PointerStep { page: Some(0), .. })));
        assert!(matches!(script.steps[2], Step::Up(PointerStep { page: None, .. })));
        assert!(matches!(
            script.steps[3],
            Step::Delete {
                concurrent: true,
                ..
            }
        ));
        assert!(script.confirm.default);
    }

    #[test]
    fn rejects_script_without_pages() {
        let err = Script::from_toml("pages = []").unwrap_err();
        assert!(matches!(err, ScriptError::Invalid(_)));
    }

    #[test]
    fn rejects_steps_on_missing_pages() {
        let err = Script::from_toml(
            r#"
            [[pages]]
            width = 100.0
            height = 100.0

            [[steps]]
            action = "down"
            page = 3
            "#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("page 3"));
    }

    #[test]
    fn rejects_unknown_action() {
        let err = Script::from_toml(
            r#"
            [[pages]]
            width = 100.0
            height = 100.0

            [[steps]]
            action = "teleport"
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ScriptError::Parse(_)));
    }
}
