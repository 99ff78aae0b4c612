mod core;
mod draft;
mod pointer;
mod settle;
#[cfg(test)]
mod tests;

pub use self::core::{
    Effect, InputState, InteractionLimits, InteractionState, ProbeSession, SessionEnd, SessionId,
    StrokeDrag,
};
pub use draft::{DraftOutcome, ShapeDraft};
