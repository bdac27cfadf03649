//! Fixed capacity pattern storage

use crate::frame::{BLACK_FRAME, Frame};

/// Maximum number of frames a pattern can hold
pub const MAX_FRAMES: usize = 60;

/// Ordered sequence of up to [`MAX_FRAMES`] frames.
///
/// Backing storage persists across uploads; only the first `len()` frames
/// are valid.
#[derive(Debug, Clone)]
pub struct PatternStore {
    frames: [Frame; MAX_FRAMES],
    len: usize,
}

impl PatternStore {
    pub const fn new() -> Self {
        Self {
            frames: [BLACK_FRAME; MAX_FRAMES],
            len: 0,
        }
    }

    /// Number of valid frames
    pub const fn len(&self) -> usize {
        self.len
    }

    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Replace the pattern
    ///
    /// Takes at most [`MAX_FRAMES`] frames from `frames`; anything beyond
    /// that is left unconsumed in the iterator. The length is cleared before
    /// the first frame is written and set only after the last one, so the
    /// valid range never covers a frame that is still being written.
    /// Returns the new length.
    pub fn upload<I>(&mut self, frames: I) -> usize
    where
        I: IntoIterator<Item = Frame>,
    {
        self.len = 0;

        let mut count = 0;
        for (slot, frame) in self.frames.iter_mut().zip(frames) {
            *slot = frame;
            count += 1;
        }

        self.len = count;
        count
    }

    /// Frame at `index`
    ///
    /// Callers keep `index < len()` by wrapping with the pattern length;
    /// indexing past it is a bug.
    pub fn frame_at(&self, index: usize) -> &Frame {
        debug_assert!(index < self.len, "frame index past pattern length");
        &self.frames[index]
    }

    /// Valid frames
    pub fn frames(&self) -> &[Frame] {
        &self.frames[..self.len]
    }

    /// Index of the frame following `index`, wrapping at the pattern length
    pub const fn next_index(&self, index: usize) -> usize {
        if self.len == 0 {
            return 0;
        }
        (index + 1) % self.len
    }
}

impl Default for PatternStore {
    fn default() -> Self {
        Self::new()
    }
}
