//! Terminal-rendered lighting sink.
//!
//! Renders each color as a truecolor block on stdout. Stands in for a
//! hardware driver during development and powers the `glowd fade` demo;
//! a real deployment swaps in a sink backed by the device SDK.

use colored::Colorize;
use tracing::debug;

use super::LightingSink;
use crate::color::Percent;
use crate::error::Result;

/// Lighting sink that paints a color swatch per write.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleSink {
    /// Suppress swatch output (writes still count as applied).
    pub quiet: bool,
}

impl ConsoleSink {
    #[must_use]
    pub const fn new() -> Self {
        Self { quiet: false }
    }

    #[must_use]
    pub const fn quiet() -> Self {
        Self { quiet: true }
    }

    fn render(self, color: Percent) {
        if self.quiet {
            return;
        }
        let (r, g, b) = color.to_rgb8();
        println!("  {}  {}", "        ".on_truecolor(r, g, b), color);
    }
}

impl LightingSink for ConsoleSink {
    fn init(&mut self) -> Result<()> {
        debug!("console sink ready");
        Ok(())
    }

    fn set_color(&mut self, color: Percent) -> Result<()> {
        self.render(color);
        Ok(())
    }

    fn all_off(&mut self) -> Result<()> {
        self.render(Percent::BLACK);
        Ok(())
    }
}
