use crate::SerialPort;
use crate::command::Command;
use crate::command_processor::CommandProcessor;
use crate::duty::SharedDuty;
use crate::frame::BLACK_FRAME;
use crate::pattern::PatternStore;
use crate::playback::{PlaybackConfig, PlaybackEngine, Speed};

/// Configuration for the controller
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ControllerConfig {
    pub playback: PlaybackConfig,
    /// Speed used until the host sets one
    pub speed: Speed,
}

/// Controller - the main loop state
///
/// Owns the pattern, the playback engine and the serial port. The duty
/// values are borrowed because the PWM interrupt reads them as well.
///
/// ```ignore
/// let mut controller = Controller::new(&RX, &DUTY, &ControllerConfig::default());
/// loop {
///     controller.poll();
/// }
/// ```
pub struct Controller<'a, S: SerialPort> {
    // External dependencies
    processor: CommandProcessor<S>,
    duty: &'a SharedDuty,

    // Internal state
    pattern: PatternStore,
    playback: PlaybackEngine,
}

impl<'a, S: SerialPort> Controller<'a, S> {
    /// Create a controller in its boot state
    ///
    /// Playback is stopped, the pattern is empty and all channels are off.
    pub fn new(serial: S, duty: &'a SharedDuty, config: &ControllerConfig) -> Self {
        duty.store(BLACK_FRAME);
        Self {
            processor: CommandProcessor::new(serial),
            duty,
            pattern: PatternStore::new(),
            playback: PlaybackEngine::new(config.playback, config.speed),
        }
    }

    /// Run one main-loop iteration
    ///
    /// Advances playback by one tick, then executes at most one command.
    /// Returns the command that was executed, if any.
    pub fn poll(&mut self) -> Option<Command> {
        self.playback.tick(&self.pattern, self.duty);
        self.processor
            .poll(&mut self.pattern, &mut self.playback, self.duty)
    }

    /// Stored pattern
    pub fn pattern(&self) -> &PatternStore {
        &self.pattern
    }

    /// Playback engine state
    pub fn playback(&self) -> &PlaybackEngine {
        &self.playback
    }

    /// Shared duty values
    pub fn duty(&self) -> &'a SharedDuty {
        self.duty
    }

    /// Get a mutable reference to the serial port.
    pub fn serial_mut(&mut self) -> &mut S {
        self.processor.serial_mut()
    }
}
