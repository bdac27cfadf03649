//! Serial command protocol
//!
//! Every command starts with one opcode byte in `0xFB..=0xFF`, followed by a
//! fixed-size payload. Nothing is ever sent back to the host.
//!
//! | Opcode | Command          | Payload                       |
//! |--------|------------------|-------------------------------|
//! | `0xFF` | set static color | 12 duty bytes                 |
//! | `0xFE` | upload pattern   | frame count, count × 12 bytes |
//! | `0xFD` | set speed        | 1 byte                        |
//! | `0xFC` | start playback   | none                          |
//! | `0xFB` | stop playback    | none                          |

use heapless::Vec;

use crate::frame::{FRAME_SIZE, Frame};
use crate::pattern::MAX_FRAMES;
use crate::playback::Speed;

const OPCODE_SET_STATIC: u8 = 0xFF;
const OPCODE_UPLOAD: u8 = 0xFE;
const OPCODE_SET_SPEED: u8 = 0xFD;
const OPCODE_START: u8 = 0xFC;
const OPCODE_STOP: u8 = 0xFB;

/// Largest payload byte a host should send
pub const MAX_PAYLOAD_BYTE: u8 = 0xFE;

/// Size of the longest upload message: opcode, count and 60 frames
pub const MAX_UPLOAD_LEN: usize = 2 + MAX_FRAMES * FRAME_SIZE;

/// Encoded upload message
pub type UploadMessage = Vec<u8, MAX_UPLOAD_LEN>;

/// Known command opcodes
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Opcode {
    SetStatic = OPCODE_SET_STATIC,
    Upload = OPCODE_UPLOAD,
    SetSpeed = OPCODE_SET_SPEED,
    Start = OPCODE_START,
    Stop = OPCODE_STOP,
}

impl Opcode {
    /// Decode an opcode byte
    pub const fn from_raw(raw: u8) -> Option<Self> {
        match raw {
            OPCODE_SET_STATIC => Some(Self::SetStatic),
            OPCODE_UPLOAD => Some(Self::Upload),
            OPCODE_SET_SPEED => Some(Self::SetSpeed),
            OPCODE_START => Some(Self::Start),
            OPCODE_STOP => Some(Self::Stop),
            _ => None,
        }
    }

    pub const fn as_raw(self) -> u8 {
        self as u8
    }

    /// Payload bytes that follow the opcode, not counting upload frames
    pub const fn fixed_payload_len(self) -> usize {
        match self {
            Self::SetStatic => FRAME_SIZE,
            Self::Upload | Self::SetSpeed => 1,
            Self::Start | Self::Stop => 0,
        }
    }
}

/// A command as it was executed by the controller
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// Playback stopped, duty values replaced
    SetStatic(Frame),
    /// Pattern replaced and playback restarted
    Upload {
        /// Frames stored
        frames: u8,
        /// Frame count announced by the host
        declared: u8,
    },
    /// Speed changed (already clamped)
    SetSpeed(Speed),
    /// Start requested; `started` is false for an empty pattern
    Start { started: bool },
    /// Playback stopped
    Stop,
    /// Unknown byte, dropped
    Ignored(u8),
}

/// Keep a payload byte out of the opcode that resynchronizes a receiver
pub const fn sanitize_payload(byte: u8) -> u8 {
    if byte > MAX_PAYLOAD_BYTE {
        MAX_PAYLOAD_BYTE
    } else {
        byte
    }
}

/// Encode a set static color command
pub fn encode_static(frame: &Frame) -> [u8; 1 + FRAME_SIZE] {
    let mut message = [0; 1 + FRAME_SIZE];
    message[0] = OPCODE_SET_STATIC;
    for (slot, &value) in message[1..].iter_mut().zip(frame) {
        *slot = sanitize_payload(value);
    }
    message
}

/// Encode a pattern upload
///
/// Frames beyond [`MAX_FRAMES`] are dropped and the count byte reflects
/// what was encoded.
#[allow(clippy::cast_possible_truncation)]
pub fn encode_upload(frames: &[Frame]) -> UploadMessage {
    let frames = &frames[..frames.len().min(MAX_FRAMES)];

    let mut message = UploadMessage::new();
    let _ = message.push(OPCODE_UPLOAD);
    let _ = message.push(frames.len() as u8);
    for value in frames.iter().flatten() {
        let _ = message.push(sanitize_payload(*value));
    }
    message
}

/// Encode a set speed command, speed clamped to `1..=10`
pub const fn encode_speed(speed: u8) -> [u8; 2] {
    [OPCODE_SET_SPEED, Speed::new(speed).get()]
}

/// Encode a start playback command
pub const fn encode_start() -> [u8; 1] {
    [OPCODE_START]
}

/// Encode a stop playback command
pub const fn encode_stop() -> [u8; 1] {
    [OPCODE_STOP]
}
