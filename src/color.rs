//! Color value types shared by the sampler, transitions, and sinks.
//!
//! Two domains are kept apart on purpose: [`Rgb`] is the 8-bit source
//! domain of decoded images, [`Percent`] is the 0-100 intensity scale the
//! lighting sink accepts. The only crossing point is [`Rgb::to_percent`].

use std::fmt;

use crate::error::{GlowError, Result};

/// An 8-bit RGB color in the image domain. No alpha.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Self = Self::new(0, 0, 0);

    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse a color from hex notation, with or without a leading `#`.
    pub fn from_hex(s: &str) -> Result<Self> {
        let digits = s.trim_start_matches('#');
        if digits.len() != 6 || !digits.is_ascii() {
            return Err(GlowError::InvalidColor { input: s.to_string() });
        }

        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16)
                .map_err(|_| GlowError::InvalidColor { input: s.to_string() })
        };

        Ok(Self::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }

    /// Quantize to the device's percentage scale, flooring each channel.
    ///
    /// 255 maps to 100, 0 to 0, 128 to 50. Output is clamped so a sink
    /// never sees an out-of-range intensity even if a caller violates the
    /// 8-bit contract upstream.
    #[must_use]
    pub fn to_percent(self) -> Percent {
        let scale = |ch: u8| (u32::from(ch) * 100 / 255) as u8;
        Percent::new(scale(self.r), scale(self.g), scale(self.b))
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// A color on the device's 0-100 intensity scale.
///
/// Fields are private; the constructor clamps, so a constructed value is
/// always in range.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Percent {
    r: u8,
    g: u8,
    b: u8,
}

impl Percent {
    pub const BLACK: Self = Self { r: 0, g: 0, b: 0 };

    /// Create a device color, clamping each channel to 100.
    #[must_use]
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: r.min(100),
            g: g.min(100),
            b: b.min(100),
        }
    }

    #[must_use]
    pub const fn r(self) -> u8 {
        self.r
    }

    #[must_use]
    pub const fn g(self) -> u8 {
        self.g
    }

    #[must_use]
    pub const fn b(self) -> u8 {
        self.b
    }

    /// The 8-bit equivalent, for rendering on targets that expect 0-255.
    #[must_use]
    pub fn to_rgb8(self) -> (u8, u8, u8) {
        let expand = |ch: u8| (u32::from(ch) * 255 / 100) as u8;
        (expand(self.r), expand(self.g), expand(self.b))
    }
}

impl fmt::Display for Percent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%/{}%/{}%", self.r, self.g, self.b)
    }
}
