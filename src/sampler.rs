//! Ambient color extraction from decoded wallpaper pixels.
//!
//! A wallpaper's "ambient" tone is the mean of its mid-range pixels:
//! pixels that are uniformly near-black or uniformly near-white carry no
//! hue information and would wash the average toward gray, so they are
//! excluded before averaging.

use image::RgbImage;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::color::Rgb;
use crate::error::{GlowError, Result};

/// Policy for images where every pixel fails the dark/bright filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackPolicy {
    /// Fall back to the mean over all pixels, ignoring the filter.
    #[default]
    UnfilteredMean,
    /// Fail the sampling pass with `NoQualifyingPixels`.
    Fail,
}

/// Running per-channel sums over counted pixels.
///
/// Created fresh per sampling pass and consumed once into a color.
#[derive(Debug, Default)]
struct SampleAccumulator {
    red: u64,
    green: u64,
    blue: u64,
    count: u64,
}

impl SampleAccumulator {
    fn add(&mut self, [r, g, b]: [u8; 3]) {
        self.red += u64::from(r);
        self.green += u64::from(g);
        self.blue += u64::from(b);
        self.count += 1;
    }

    /// Integer-truncated per-channel mean, or `None` if nothing was counted.
    fn mean(self) -> Option<Rgb> {
        if self.count == 0 {
            return None;
        }
        Some(Rgb::new(
            (self.red / self.count) as u8,
            (self.green / self.count) as u8,
            (self.blue / self.count) as u8,
        ))
    }
}

/// Computes the filtered average color of a pixel grid.
#[derive(Debug, Clone, Copy)]
pub struct Sampler {
    dark_threshold: u8,
    bright_threshold: u8,
    fallback: FallbackPolicy,
}

impl Sampler {
    /// Create a sampler. Thresholds are on the 0-255 scale and must
    /// satisfy `dark < bright`.
    pub fn new(dark_threshold: u8, bright_threshold: u8, fallback: FallbackPolicy) -> Result<Self> {
        if dark_threshold >= bright_threshold {
            return Err(GlowError::InvalidThresholds {
                dark: dark_threshold,
                bright: bright_threshold,
            });
        }
        Ok(Self {
            dark_threshold,
            bright_threshold,
            fallback,
        })
    }

    /// The ambient color of `pixels`.
    ///
    /// Scans every pixel once, accumulating both the filtered and the
    /// unfiltered mean so the fallback path never needs a second pass.
    /// An image with zero pixels is always `NoQualifyingPixels`.
    pub fn sample(&self, pixels: &RgbImage) -> Result<Rgb> {
        let mut filtered = SampleAccumulator::default();
        let mut unfiltered = SampleAccumulator::default();

        for pixel in pixels.pixels() {
            unfiltered.add(pixel.0);
            if self.qualifies(pixel.0) {
                filtered.add(pixel.0);
            }
        }

        let counted = filtered.count;
        if let Some(mean) = filtered.mean() {
            debug!(%mean, pixels = counted, "sampled filtered mean");
            return Ok(mean);
        }

        match self.fallback {
            FallbackPolicy::UnfilteredMean => {
                let mean = unfiltered.mean().ok_or(GlowError::NoQualifyingPixels)?;
                debug!(%mean, "no qualifying pixels; using unfiltered mean");
                Ok(mean)
            }
            FallbackPolicy::Fail => Err(GlowError::NoQualifyingPixels),
        }
    }

    /// A pixel qualifies unless all three channels are strictly below the
    /// dark threshold or all three strictly above the bright threshold.
    fn qualifies(&self, [r, g, b]: [u8; 3]) -> bool {
        let uniformly_dark =
            r < self.dark_threshold && g < self.dark_threshold && b < self.dark_threshold;
        let uniformly_bright =
            r > self.bright_threshold && g > self.bright_threshold && b > self.bright_threshold;
        !uniformly_dark && !uniformly_bright
    }
}
