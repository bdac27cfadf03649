use crate::frame::{CHANNEL_COUNT, Frame};

/// Interpolation progress value that completes one frame-to-frame step
pub const PROGRESS_FULL: u16 = 256;

/// Linear interpolation between two 8-bit values
///
/// Computes `a + (b - a) * progress / 256` with signed intermediates wide
/// enough for the full `-255..=255` difference range. Progress 0 returns `a`
/// exactly.
#[inline]
#[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
pub const fn lerp8(a: u8, b: u8, progress: u8) -> u8 {
    let delta = b as i32 - a as i32;
    let offset = delta * progress as i32 / PROGRESS_FULL as i32;

    (a as i32 + offset) as u8
}

/// Interpolate every channel of two frames
pub fn lerp_frame(from: &Frame, to: &Frame, progress: u8) -> Frame {
    let mut out = [0; CHANNEL_COUNT];
    for ((value, &a), &b) in out.iter_mut().zip(from).zip(to) {
        *value = lerp8(a, b, progress);
    }
    out
}
