//! Interaction state machine and input state management.

use super::draft::ShapeDraft;
use crate::commit::CreateRequest;
use crate::config::Config;
use crate::draw::{AnnotationColor, ShapeKind, ShapeStyle};
use crate::geometry::{MIN_LINE_LENGTH_PX, TextBoxMinimum};
use crate::input::{
    buffer::EventBuffer,
    events::{PointOnPage, PointerSample},
    tool::Tool,
};
use crate::probe::StrokeHit;
use crate::viewer::{DraftPreview, ViewerEvent};
use serde::Serialize;
use std::fmt;

/// Identifies one pointer-down session.
///
/// Ids are handed out in increasing order; a probe outcome is only applied
/// when its id matches the session that is currently probing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct SessionId(pub u64);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Thresholds that decide what a gesture means.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InteractionLimits {
    /// Lines and arrows shorter than this (pixel space) are discarded
    pub line_min_length_px: f64,
    /// Travel from the origin (pixel space) that turns a stroke hit into a drag
    pub drag_select_threshold_px: f64,
    /// Text box minimum size factors
    pub text_minimum: TextBoxMinimum,
    /// Clamp the drafting point into the page canvas
    pub clamp_preview_to_page: bool,
}

impl Default for InteractionLimits {
    fn default() -> Self {
        Self {
            line_min_length_px: MIN_LINE_LENGTH_PX,
            drag_select_threshold_px: 10.0,
            text_minimum: TextBoxMinimum::default(),
            clamp_preview_to_page: true,
        }
    }
}

/// How a session ended.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SessionEnd {
    /// Pointer released; `None` when released outside every page
    Released(Option<PointerSample>),
    /// Gesture cancelled by the platform
    Cancelled,
}

/// A pointer-down whose stroke probe has not settled yet.
#[derive(Debug)]
pub struct ProbeSession {
    pub id: SessionId,
    /// The pointer-down sample the probe was started for
    pub origin: PointerSample,
    /// Whether the down was a ctrl-click
    pub ctrl: bool,
    /// Moves received while the probe is outstanding
    pub buffer: EventBuffer,
    /// Set once the session ended before the probe settled
    pub ended: Option<SessionEnd>,
    /// Hover moves received after the session ended, still waiting on the probe
    pub trailing: Vec<PointerSample>,
}

impl ProbeSession {
    pub fn new(id: SessionId, origin: PointerSample, ctrl: bool) -> Self {
        Self {
            id,
            origin,
            ctrl,
            buffer: EventBuffer::new(),
            ended: None,
            trailing: Vec::new(),
        }
    }
}

/// A pointer-down that landed on an existing stroke.
///
/// Until the pointer travels beyond the drag-select threshold the gesture is
/// a click on the stroke; samples are held back so they can be replayed as
/// part of the drag if it becomes one.
#[derive(Debug)]
pub struct StrokeDrag {
    pub origin: PointerSample,
    pub hit: StrokeHit,
    pub dragging: bool,
    pub held: Vec<PointerSample>,
}

/// Current interaction mode.
///
/// Exactly one variant is active. At most one draft and at most one probe
/// exist because each lives inside its variant.
#[derive(Debug, Default)]
pub enum InteractionState {
    /// No pointer session in progress
    #[default]
    Idle,
    /// Drawing a new shape (creation mode was armed at pointer-down)
    Drafting(ShapeDraft),
    /// Draft cancelled while the pointer is still down; the rest of the
    /// gesture is swallowed
    DiscardingDraft,
    /// Waiting for the stroke probe of the current session
    Probing(ProbeSession),
    /// Session handed to the viewer as an ordinary gesture
    Forwarding,
    /// Session started on an existing stroke
    DraggingStroke(StrokeDrag),
}

/// Side effects requested by the state machine.
///
/// The state machine itself never touches a collaborator; its driver
/// performs these in order.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Deliver an event to the document viewer
    Forward(ViewerEvent),
    /// Start a stroke probe for `sample`, tagged with `session`
    StartProbe {
        session: SessionId,
        sample: PointerSample,
    },
    /// Place a live preview for a new draft
    ShowPreview(DraftPreview),
    /// Redraw the live preview
    UpdatePreview(DraftPreview),
    /// Remove the live preview without committing
    RemovePreview,
    /// Hand a finalized draft to the commit gateway; the preview stays up
    Commit(CreateRequest),
}

/// Input state of one document view.
///
/// Holds the active tool and style, the current interaction mode and the
/// counters used to stamp sessions and samples.
pub struct InputState {
    /// Active tool (selection or an armed creation mode)
    pub tool: Tool,
    /// Style applied to new shapes
    pub style: ShapeStyle,
    /// Whether existing strokes may be picked up (false for read-only viewers)
    pub stroke_editing: bool,
    /// Gesture thresholds
    pub limits: InteractionLimits,
    /// Current interaction mode
    pub state: InteractionState,
    next_session: u64,
    next_ordinal: u64,
}

impl InputState {
    /// Creates a new InputState.
    ///
    /// # Arguments
    /// * `style` - Style applied to new shapes
    /// * `limits` - Gesture thresholds
    pub fn with_defaults(style: ShapeStyle, limits: InteractionLimits) -> Self {
        Self {
            tool: Tool::Select,
            style,
            stroke_editing: true,
            limits,
            state: InteractionState::Idle,
            next_session: 0,
            next_ordinal: 0,
        }
    }

    /// Creates an InputState from the loaded configuration.
    pub fn from_config(config: &Config) -> Self {
        let interaction = &config.interaction;
        let limits = InteractionLimits {
            line_min_length_px: interaction.line_min_length_px,
            drag_select_threshold_px: interaction.drag_select_threshold_px,
            text_minimum: TextBoxMinimum {
                height_factor: interaction.text_min_height_factor,
                width_factor: interaction.text_min_width_factor,
            },
            clamp_preview_to_page: interaction.clamp_preview_to_page,
        };
        let style = ShapeStyle {
            color: config.drawing.default_color,
            font_size: config.drawing.default_font_size,
            stroke_width: config.drawing.stroke_width,
        };
        Self::with_defaults(style, limits)
    }

    /// Whether no session is in progress.
    pub fn is_idle(&self) -> bool {
        matches!(self.state, InteractionState::Idle)
    }

    /// Id of the session whose probe is outstanding, if any.
    pub fn probing_session(&self) -> Option<SessionId> {
        match &self.state {
            InteractionState::Probing(probe) => Some(probe.id),
            _ => None,
        }
    }

    /// The live draft, if one exists.
    pub fn draft(&self) -> Option<&ShapeDraft> {
        match &self.state {
            InteractionState::Drafting(draft) => Some(draft),
            _ => None,
        }
    }

    /// Arms a creation mode for the next pointer-down.
    pub fn arm(&mut self, kind: ShapeKind) {
        log::debug!("Creation mode armed: {:?}", kind);
        self.tool = Tool::Create(kind);
    }

    /// Disarms the creation mode.
    ///
    /// A draft in progress is cancelled and its preview removed.
    pub fn disarm(&mut self) -> Vec<Effect> {
        if self.tool.is_armed() {
            log::debug!("Creation mode disarmed");
        }
        self.tool = Tool::Select;
        if matches!(self.state, InteractionState::Drafting(_)) {
            log::debug!("Disarmed mid-draft; discarding draft");
            self.state = InteractionState::DiscardingDraft;
            return vec![Effect::RemovePreview];
        }
        Vec::new()
    }

    /// Switches tools, disarming through [`InputState::disarm`] when needed.
    pub fn set_tool(&mut self, tool: Tool) -> Vec<Effect> {
        match tool {
            Tool::Create(kind) => {
                self.arm(kind);
                Vec::new()
            }
            Tool::Select => self.disarm(),
        }
    }

    /// Sets the color used for new shapes.
    pub fn set_color(&mut self, color: AnnotationColor) {
        self.style.color = color;
    }

    /// Enables or disables picking up existing strokes.
    pub fn set_stroke_editing(&mut self, enabled: bool) {
        self.stroke_editing = enabled;
    }

    pub(super) fn begin_session(&mut self) -> SessionId {
        self.next_session += 1;
        SessionId(self.next_session)
    }

    /// Stamps a resolved point with the next arrival ordinal.
    pub(super) fn stamp(&mut self, point: PointOnPage) -> PointerSample {
        self.next_ordinal += 1;
        PointerSample {
            page: point.page,
            x: point.x,
            y: point.y,
            ordinal: self.next_ordinal,
        }
    }

    /// Drops whatever the previous session left behind.
    ///
    /// A pending probe and its buffer are discarded without replay; a draft
    /// that somehow outlived its pointer-up loses its preview.
    pub(super) fn abandon_session(&mut self, effects: &mut Vec<Effect>) {
        match std::mem::take(&mut self.state) {
            InteractionState::Idle
            | InteractionState::Forwarding
            | InteractionState::DiscardingDraft => {}
            InteractionState::Drafting(_) => {
                log::debug!("Discarding draft left over from previous session");
                effects.push(Effect::RemovePreview);
            }
            InteractionState::Probing(probe) => {
                log::debug!(
                    "Discarding probe session {} with {} buffered moves",
                    probe.id,
                    probe.buffer.len()
                );
            }
            InteractionState::DraggingStroke(drag) => {
                log::debug!("Abandoning gesture on stroke {}", drag.hit.stroke);
            }
        }
    }
}
