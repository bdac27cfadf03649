//! Command processing module
//!
//! Reads opcodes from the serial link and applies them to the pattern store,
//! playback engine and live duty values.

#[cfg(feature = "esp32-log")]
use esp_println::println;

use crate::SerialPort;
use crate::command::{Command, Opcode};
use crate::duty::SharedDuty;
use crate::frame::{BLACK_FRAME, FRAME_SIZE, Frame};
use crate::pattern::{MAX_FRAMES, PatternStore};
use crate::playback::{PlaybackEngine, Speed};

/// Decodes and executes commands from a serial port
pub struct CommandProcessor<S: SerialPort> {
    serial: S,
}

impl<S: SerialPort> CommandProcessor<S> {
    pub const fn new(serial: S) -> Self {
        Self { serial }
    }

    /// Get a mutable reference to the serial port.
    pub fn serial_mut(&mut self) -> &mut S {
        &mut self.serial
    }

    /// Execute at most one command
    ///
    /// Returns `None` without blocking when no byte is waiting. Once an
    /// opcode has been read its whole payload is awaited synchronously.
    pub fn poll(
        &mut self,
        pattern: &mut PatternStore,
        playback: &mut PlaybackEngine,
        duty: &SharedDuty,
    ) -> Option<Command> {
        if !self.serial.byte_available() {
            return None;
        }

        let raw = self.serial.read_byte();
        let command = match Opcode::from_raw(raw) {
            Some(Opcode::SetStatic) => {
                playback.stop();
                let frame = self.read_frame();
                duty.store(frame);
                Command::SetStatic(frame)
            }
            Some(Opcode::Upload) => self.upload(pattern, playback, duty),
            Some(Opcode::SetSpeed) => {
                let speed = Speed::new(self.serial.read_byte());
                playback.set_speed(speed);
                Command::SetSpeed(speed)
            }
            Some(Opcode::Start) => Command::Start {
                started: playback.start(pattern, duty),
            },
            Some(Opcode::Stop) => {
                playback.stop();
                Command::Stop
            }
            None => Command::Ignored(raw),
        };

        #[cfg(feature = "esp32-log")]
        println!("[CommandProcessor.poll] {:?}", command);

        Some(command)
    }

    /// Receive a pattern and restart playback from its first frame
    ///
    /// The announced frame count is clamped to [`MAX_FRAMES`]. Payload for
    /// the frames that do not fit is still read and discarded, so the next
    /// byte on the wire is the next opcode.
    #[allow(clippy::cast_possible_truncation)]
    fn upload(
        &mut self,
        pattern: &mut PatternStore,
        playback: &mut PlaybackEngine,
        duty: &SharedDuty,
    ) -> Command {
        playback.stop();

        let declared = self.serial.read_byte();
        let kept = usize::from(declared).min(MAX_FRAMES);

        let serial = &mut self.serial;
        let stored = pattern.upload((0..kept).map(|_| read_frame(serial)));

        let excess = (usize::from(declared) - kept) * FRAME_SIZE;
        if excess > 0 {
            #[cfg(feature = "esp32-log")]
            println!(
                "[CommandProcessor.upload] {} frames declared, dropping {} bytes",
                declared, excess
            );
            for _ in 0..excess {
                self.serial.read_byte();
            }
        }

        playback.start(pattern, duty);

        Command::Upload {
            frames: stored as u8,
            declared,
        }
    }

    fn read_frame(&mut self) -> Frame {
        read_frame(&mut self.serial)
    }
}

fn read_frame<S: SerialPort>(serial: &mut S) -> Frame {
    let mut frame = BLACK_FRAME;
    for value in &mut frame {
        *value = serial.read_byte();
    }
    frame
}
