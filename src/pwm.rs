//! Timer driven software PWM
//!
//! One free running 8-bit accumulator is shared by all channels. On every
//! timer overflow each channel is driven high while its duty value is above
//! the accumulator, then the accumulator advances. A full sweep of 256 ticks
//! is one PWM period, identical for all twelve channels.

use embassy_time::Duration;

use crate::OutputDriver;
use crate::duty::SharedDuty;
use crate::frame::{CHANNEL_COUNT, Frame};

/// Number of channels on each output port
pub const PORT_WIDTH: usize = CHANNEL_COUNT / 2;

/// Accumulator ticks per PWM period
pub const TICKS_PER_PERIOD: u32 = 256;

const PORT_MASK: u16 = (1 << PORT_WIDTH) - 1;

/// First pin used on the low port (channels 0..6 sit on bits 2..=7)
const LOW_PORT_SHIFT: u8 = 2;

/// Output level of every channel for one tick, bit n is channel n
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ChannelLevels(u16);

impl ChannelLevels {
    pub const ALL_LOW: Self = Self(0);

    /// Raw 12-bit mask
    pub const fn bits(self) -> u16 {
        self.0
    }

    /// Check whether a channel is driven high
    pub const fn is_high(self, channel: usize) -> bool {
        channel < CHANNEL_COUNT && self.0 & (1 << channel) != 0
    }

    /// Number of channels driven high
    pub const fn count_high(self) -> u32 {
        self.0.count_ones()
    }

    /// Pin pattern for the port carrying channels 0..6
    #[allow(clippy::cast_possible_truncation)]
    pub const fn low_port_bits(self) -> u8 {
        ((self.0 & PORT_MASK) as u8) << LOW_PORT_SHIFT
    }

    /// Pin pattern for the port carrying channels 6..12
    #[allow(clippy::cast_possible_truncation)]
    pub const fn high_port_bits(self) -> u8 {
        ((self.0 >> PORT_WIDTH) & PORT_MASK) as u8
    }
}

/// Compare every duty value against the accumulator
///
/// A channel is high iff its duty value is strictly greater than the
/// accumulator, so duty 0 is always off and duty 255 is on for 255 of 256
/// ticks.
pub fn levels_for(duty: &Frame, accumulator: u8) -> ChannelLevels {
    let bits = duty
        .iter()
        .enumerate()
        .filter(|&(_, &value)| value > accumulator)
        .fold(0u16, |bits, (channel, _)| bits | (1 << channel));

    ChannelLevels(bits)
}

/// Calibration of the periodic timer that drives the PWM tick
///
/// Models an 8-bit up-counter that overflows into the PWM interrupt and is
/// reloaded so that the next overflow comes `counts_per_tick` counts later.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PwmTiming {
    /// Counter clock after the prescaler
    pub timer_clock_hz: u32,
    /// Timer counts between two overflows
    pub counts_per_tick: u8,
}

impl PwmTiming {
    /// 7.3728 MHz system clock divided by 8, reloaded every 25 counts
    pub const BOARD: Self = Self {
        timer_clock_hz: 7_372_800 / 8,
        counts_per_tick: 25,
    };

    /// Value added to the counter register on every overflow
    pub const fn reload_offset(self) -> u8 {
        0xFF - self.counts_per_tick.saturating_sub(1)
    }

    /// Tick interrupts per second
    pub const fn tick_hz(self) -> u32 {
        if self.counts_per_tick == 0 {
            return 0;
        }
        self.timer_clock_hz / self.counts_per_tick as u32
    }

    /// Full PWM periods per second
    pub const fn pwm_hz(self) -> u32 {
        self.tick_hz() / TICKS_PER_PERIOD
    }

    /// Interval between two ticks
    pub const fn tick_period(self) -> Duration {
        let hz = self.tick_hz();
        if hz == 0 {
            return Duration::from_micros(0);
        }
        Duration::from_micros(1_000_000 / hz as u64)
    }
}

impl Default for PwmTiming {
    fn default() -> Self {
        Self::BOARD
    }
}

/// Software PWM generator
///
/// Owned by the timer interrupt. Holds a read view of the shared duty values
/// and the accumulator, which nothing else touches.
///
/// ```ignore
/// static DUTY: SharedDuty = SharedDuty::new();
/// static PWM: Mutex<RefCell<Option<PwmGenerator<'static>>>> = Mutex::new(RefCell::new(None));
///
/// #[interrupt]
/// fn TIMER0_OVF() {
///     critical_section::with(|cs| {
///         if let Some(pwm) = PWM.borrow_ref_mut(cs).as_mut() {
///             pwm.tick(&mut PortDriver);
///         }
///     });
///     reload_timer(PwmTiming::BOARD.reload_offset());
/// }
/// ```
pub struct PwmGenerator<'a> {
    duty: &'a SharedDuty,
    accumulator: u8,
}

impl<'a> PwmGenerator<'a> {
    pub const fn new(duty: &'a SharedDuty) -> Self {
        Self {
            duty,
            accumulator: 0,
        }
    }

    /// Current accumulator value
    pub const fn accumulator(&self) -> u8 {
        self.accumulator
    }

    /// Run one timer overflow
    ///
    /// Drives every channel from one consistent duty snapshot, then advances
    /// the accumulator with wrap-around. Returns the levels that were written.
    pub fn tick<D: OutputDriver>(&mut self, driver: &mut D) -> ChannelLevels {
        let duty = self.duty.load();
        let levels = levels_for(&duty, self.accumulator);
        driver.write_levels(levels);

        self.accumulator = self.accumulator.wrapping_add(1);
        levels
    }
}
