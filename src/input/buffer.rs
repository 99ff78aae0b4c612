//! Ordered buffer for pointer samples that arrive while a probe is pending.

use super::events::PointerSample;

/// Pointer-move samples captured for a single session.
///
/// Samples are appended in arrival order and handed back exactly once by
/// [`EventBuffer::drain_in_order`]. Draining consumes the buffer, so a sample
/// can never be replayed twice and a drained buffer cannot be refilled.
#[derive(Debug, Default)]
pub struct EventBuffer {
    samples: Vec<PointerSample>,
}

impl EventBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a sample.
    pub fn push(&mut self, sample: PointerSample) {
        debug_assert!(
            self.samples
                .last()
                .is_none_or(|last| last.ordinal < sample.ordinal),
            "samples must arrive in ordinal order"
        );
        self.samples.push(sample);
    }

    /// Returns every buffered sample in arrival order and disposes of the buffer.
    pub fn drain_in_order(self) -> Vec<PointerSample> {
        self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}
