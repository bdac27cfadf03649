//! Duty values shared between the main loop and the PWM interrupt.
//!
//! The main loop writes, the timer interrupt reads. Every multi-channel
//! access runs inside one critical section, so the interrupt sees either the
//! old set of twelve values or the new one, never a mix.

use core::cell::Cell;

use critical_section::Mutex;

use crate::frame::{BLACK_FRAME, Frame};

/// Live per-channel duty values.
///
/// Meant to live in a `static` shared by the PWM interrupt handler and the
/// controller:
///
/// ```ignore
/// static DUTY: SharedDuty = SharedDuty::new();
/// ```
pub struct SharedDuty {
    inner: Mutex<Cell<Frame>>,
}

impl SharedDuty {
    /// All channels start at zero
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(Cell::new(BLACK_FRAME)),
        }
    }

    /// Replace all twelve values at once
    pub fn store(&self, frame: Frame) {
        critical_section::with(|cs| self.inner.borrow(cs).set(frame));
    }

    /// Snapshot all twelve values at once
    pub fn load(&self) -> Frame {
        critical_section::with(|cs| self.inner.borrow(cs).get())
    }

    /// Update a single channel, leaving the others untouched
    ///
    /// Out of range channels are ignored.
    pub fn set_channel(&self, channel: usize, duty: u8) {
        critical_section::with(|cs| {
            let cell = self.inner.borrow(cs);
            let mut frame = cell.get();
            if let Some(value) = frame.get_mut(channel) {
                *value = duty;
                cell.set(frame);
            }
        });
    }

    /// Read a single channel
    pub fn channel(&self, channel: usize) -> Option<u8> {
        self.load().get(channel).copied()
    }
}

impl Default for SharedDuty {
    fn default() -> Self {
        Self::new()
    }
}
