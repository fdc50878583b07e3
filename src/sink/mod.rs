//! Lighting sink abstraction.
//!
//! A sink is whatever renders an RGB percentage triple: a vendor LED SDK,
//! a smart bulb bridge, or the terminal. Only the contract is modeled
//! here; the daemon never inspects device state, it only writes.

pub mod console;
pub mod mock;

pub use console::ConsoleSink;

use crate::color::Percent;
use crate::error::Result;

/// Core lighting output trait.
///
/// Writes are synchronous and idempotent: re-applying the current color
/// is harmless, which lets the watcher re-push a target without checking
/// what the device shows.
pub trait LightingSink {
    /// Prepare the device. Invoked once before the first write; a failure
    /// here is fatal to the daemon.
    fn init(&mut self) -> Result<()>;

    /// Drive every zone of the device to the given color.
    fn set_color(&mut self, color: Percent) -> Result<()>;

    /// Turn all lighting off. Invoked once at shutdown.
    fn all_off(&mut self) -> Result<()>;
}
