//! Pointer input and the interaction state machine.
//!
//! This module turns resolved pointer events into interaction effects: it
//! decides whether a pointer-down starts a new shape, picks up an existing
//! stroke or falls through to the document viewer, buffers moves while a
//! stroke probe is pending and replays them once it settles.

pub mod buffer;
pub mod events;
pub mod modifiers;
pub mod state;
pub mod tool;

pub use buffer::EventBuffer;
pub use events::{PointOnPage, PointerEvent, PointerEventKind, PointerSample, RawPointerEvent};
pub use modifiers::Modifiers;
pub use state::{Effect, InputState, InteractionLimits, InteractionState, SessionId, ShapeDraft};
pub use tool::Tool;
