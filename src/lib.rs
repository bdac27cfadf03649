#![no_std]

pub mod command;
pub mod command_processor;
pub mod controller;
pub mod duty;
pub mod frame;
pub mod math8;
pub mod pattern;
pub mod playback;
pub mod pwm;
pub mod rx_queue;

pub use command::{Command, Opcode};
pub use command_processor::CommandProcessor;
pub use controller::{Controller, ControllerConfig};
pub use duty::SharedDuty;
pub use frame::{CHANNEL_COUNT, FRAME_SIZE, Frame, StripLayout, StripOrder};
pub use pattern::{MAX_FRAMES, PatternStore};
pub use playback::{PlaybackConfig, PlaybackEngine, PlaybackState, Speed};
pub use pwm::{ChannelLevels, PwmGenerator, PwmTiming};
pub use rx_queue::{RxOverflow, RxQueue};

pub use embassy_time::Duration;
pub use smart_leds::RGB8;

/// Abstract output driver trait
///
/// Implement this trait to drive the twelve physical output lines.
/// The PWM generator is generic over this trait.
pub trait OutputDriver {
    /// Drive one channel high or low
    fn set_level(&mut self, channel: usize, high: bool);

    /// Drive all channels from a level mask
    ///
    /// Override this to write both 6-line ports in one go, see
    /// [`ChannelLevels::low_port_bits`] and [`ChannelLevels::high_port_bits`].
    fn write_levels(&mut self, levels: ChannelLevels) {
        for channel in 0..CHANNEL_COUNT {
            self.set_level(channel, levels.is_high(channel));
        }
    }
}

/// Abstract serial receiver trait
///
/// The command processor polls `byte_available` and, once a command has
/// started, blocks in `read_byte` for each payload byte.
pub trait SerialPort {
    /// Check for a received byte without blocking
    fn byte_available(&mut self) -> bool;

    /// Wait for the next received byte
    fn read_byte(&mut self) -> u8;
}
