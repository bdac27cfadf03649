//! Pattern playback with linear interpolation between frames.
//!
//! Playback advances once per main-loop iteration. Every `(11 - speed) * K`
//! iterations the interpolation progress moves forward by a fixed step; when
//! it reaches 256 the cursor moves on to the next frame, wrapping at the
//! pattern length. After every advance the live duty values are recomputed
//! from the current frame and its successor.

#[cfg(feature = "esp32-log")]
use esp_println::println;

use crate::duty::SharedDuty;
use crate::math8::{PROGRESS_FULL, lerp_frame};
use crate::pattern::PatternStore;

/// Playback speed, 1 (slowest) to 10 (fastest)
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Speed(u8);

impl Speed {
    pub const MIN: Self = Self(1);
    pub const MAX: Self = Self(10);
    pub const DEFAULT: Self = Self(5);

    /// Clamp a raw value into the valid range
    pub const fn new(raw: u8) -> Self {
        if raw < Self::MIN.0 {
            Self::MIN
        } else if raw > Self::MAX.0 {
            Self::MAX
        } else {
            Self(raw)
        }
    }

    pub const fn get(self) -> u8 {
        self.0
    }
}

impl Default for Speed {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl From<u8> for Speed {
    fn from(raw: u8) -> Self {
        Self::new(raw)
    }
}

/// Playback timing constants
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PlaybackConfig {
    /// Loop iterations per speed unit (K in `(11 - speed) * K`)
    pub tick_scale: u16,
    /// Progress added per interpolation step, out of 256
    pub progress_step: u16,
}

impl PlaybackConfig {
    /// Sixteen interpolation steps per frame, 60 iterations per speed unit
    pub const DEFAULT: Self = Self {
        tick_scale: 60,
        progress_step: 16,
    };

    /// Loop iterations between two interpolation steps at `speed`
    pub const fn threshold(self, speed: Speed) -> u16 {
        (11 - speed.get() as u16).saturating_mul(self.tick_scale)
    }
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PlaybackState {
    #[default]
    Stopped,
    Playing,
}

/// Position of playback within the pattern
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PlaybackCursor {
    /// Frame being interpolated from
    pub current_frame: usize,
    /// Position towards the next frame, `0..256`
    pub interp_progress: u16,
    /// Loop iterations since the last interpolation step
    pub tick_counter: u16,
}

/// Playback state machine
#[derive(Debug, Clone)]
pub struct PlaybackEngine {
    config: PlaybackConfig,
    state: PlaybackState,
    cursor: PlaybackCursor,
    speed: Speed,
}

impl PlaybackEngine {
    pub const fn new(config: PlaybackConfig, speed: Speed) -> Self {
        Self {
            config,
            state: PlaybackState::Stopped,
            cursor: PlaybackCursor {
                current_frame: 0,
                interp_progress: 0,
                tick_counter: 0,
            },
            speed,
        }
    }

    pub const fn state(&self) -> PlaybackState {
        self.state
    }

    pub const fn is_playing(&self) -> bool {
        matches!(self.state, PlaybackState::Playing)
    }

    pub const fn cursor(&self) -> PlaybackCursor {
        self.cursor
    }

    pub const fn speed(&self) -> Speed {
        self.speed
    }

    /// Change speed without touching playback state
    pub fn set_speed(&mut self, speed: Speed) {
        self.speed = speed;
    }

    /// Restart playback from frame 0
    ///
    /// Does nothing and returns `false` when the pattern is empty. Otherwise
    /// resets the cursor and loads frame 0 verbatim into the duty values.
    pub fn start(&mut self, pattern: &PatternStore, duty: &SharedDuty) -> bool {
        if pattern.is_empty() {
            return false;
        }

        self.cursor = PlaybackCursor::default();
        self.state = PlaybackState::Playing;
        duty.store(*pattern.frame_at(0));

        #[cfg(feature = "esp32-log")]
        println!(
            "[PlaybackEngine.start] {} frames at speed {}",
            pattern.len(),
            self.speed.get()
        );
        true
    }

    /// Stop playback; duty values keep their last state
    pub fn stop(&mut self) {
        #[cfg(feature = "esp32-log")]
        println!(
            "[PlaybackEngine.stop] {:?} at frame {}",
            self.state, self.cursor.current_frame
        );
        self.state = PlaybackState::Stopped;
    }

    /// Run one main-loop iteration
    ///
    /// Returns `true` when the duty values were recomputed.
    pub fn tick(&mut self, pattern: &PatternStore, duty: &SharedDuty) -> bool {
        if !self.is_playing() || pattern.is_empty() {
            return false;
        }

        self.cursor.tick_counter = self.cursor.tick_counter.saturating_add(1);
        if self.cursor.tick_counter < self.config.threshold(self.speed) {
            return false;
        }
        self.cursor.tick_counter = 0;

        self.cursor.interp_progress = self
            .cursor
            .interp_progress
            .saturating_add(self.config.progress_step);
        if self.cursor.interp_progress >= PROGRESS_FULL {
            self.cursor.interp_progress = 0;
            self.cursor.current_frame = pattern.next_index(self.cursor.current_frame);
        }

        self.render(pattern, duty);
        true
    }

    /// Write the interpolated frame for the current cursor
    #[allow(clippy::cast_possible_truncation)]
    fn render(&self, pattern: &PatternStore, duty: &SharedDuty) {
        let current = self.cursor.current_frame;
        let next = pattern.next_index(current);
        let progress = self.cursor.interp_progress.min(PROGRESS_FULL - 1) as u8;

        let frame = lerp_frame(pattern.frame_at(current), pattern.frame_at(next), progress);
        duty.store(frame);
    }
}

impl Default for PlaybackEngine {
    fn default() -> Self {
        Self::new(PlaybackConfig::DEFAULT, Speed::DEFAULT)
    }
}
