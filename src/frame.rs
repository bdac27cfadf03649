//! Frames and strip channel layout
//!
//! A frame is one duty value per output channel. The twelve channels are
//! wired as four RGB strips of three channels each, and every strip can
//! have its own channel order.

use smart_leds::RGB8;

/// Number of physical output channels
pub const CHANNEL_COUNT: usize = 12;

/// Bytes per frame on the wire
pub const FRAME_SIZE: usize = CHANNEL_COUNT;

/// Number of RGB strips driven by the channels
pub const STRIP_COUNT: usize = CHANNEL_COUNT / 3;

/// One duty value per channel
pub type Frame = [u8; CHANNEL_COUNT];

/// All channels off
pub const BLACK_FRAME: Frame = [0; CHANNEL_COUNT];

/// Order in which a strip's three channels carry the color components
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StripOrder {
    Rgb,
    Rbg,
    Grb,
    Gbr,
    Brg,
    Bgr,
}

impl StripOrder {
    /// Place a color into three consecutive channel slots
    pub const fn place(self, color: RGB8) -> [u8; 3] {
        let RGB8 { r, g, b } = color;
        match self {
            Self::Rgb => [r, g, b],
            Self::Rbg => [r, b, g],
            Self::Grb => [g, r, b],
            Self::Gbr => [g, b, r],
            Self::Brg => [b, r, g],
            Self::Bgr => [b, g, r],
        }
    }

    /// Read a color back out of three consecutive channel slots
    pub const fn pick(self, slots: [u8; 3]) -> RGB8 {
        let [x, y, z] = slots;
        let (r, g, b) = match self {
            Self::Rgb => (x, y, z),
            Self::Rbg => (x, z, y),
            Self::Grb => (y, x, z),
            Self::Gbr => (z, x, y),
            Self::Brg => (y, z, x),
            Self::Bgr => (z, y, x),
        };
        RGB8 { r, g, b }
    }
}

/// Channel order of each strip, first strip on channels 0..3
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StripLayout {
    pub strips: [StripOrder; STRIP_COUNT],
}

impl StripLayout {
    /// Wiring of the reference controller board
    pub const BOARD: Self = Self {
        strips: [
            StripOrder::Grb,
            StripOrder::Grb,
            StripOrder::Rbg,
            StripOrder::Brg,
        ],
    };

    /// Every strip wired in plain RGB order
    pub const LINEAR: Self = Self {
        strips: [StripOrder::Rgb; STRIP_COUNT],
    };

    /// Build a frame from one color per strip
    pub fn frame_from_colors(&self, colors: [RGB8; STRIP_COUNT]) -> Frame {
        let mut frame = BLACK_FRAME;
        for ((slots, order), color) in frame
            .chunks_exact_mut(3)
            .zip(self.strips.iter())
            .zip(colors)
        {
            slots.copy_from_slice(&order.place(color));
        }
        frame
    }

    /// Split a frame back into one color per strip
    pub fn colors_from_frame(&self, frame: &Frame) -> [RGB8; STRIP_COUNT] {
        let mut colors = [RGB8::default(); STRIP_COUNT];
        for ((color, order), slots) in colors
            .iter_mut()
            .zip(self.strips.iter())
            .zip(frame.chunks_exact(3))
        {
            *color = order.pick([slots[0], slots[1], slots[2]]);
        }
        colors
    }
}

impl Default for StripLayout {
    fn default() -> Self {
        Self::BOARD
    }
}
