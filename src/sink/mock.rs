//! Mock lighting sink for unit and integration testing.
//!
//! Records every operation for later assertion and supports scripted
//! failures, so watcher and transition behavior can be verified without
//! hardware.
//!
//! # Example
//!
//! ```rust,ignore
//! use glowd::color::Percent;
//! use glowd::sink::mock::{MockSink, Operation};
//! use glowd::sink::LightingSink;
//!
//! let mut mock = MockSink::new();
//! mock.set_color(Percent::new(50, 0, 0)).unwrap();
//! mock.assert_operations(&[Operation::SetColor(Percent::new(50, 0, 0))]);
//! ```

use tracing::trace;

use super::LightingSink;
use crate::color::Percent;
use crate::error::{GlowError, Result};

/// Recorded operation for assertions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Init,
    SetColor(Percent),
    AllOff,
}

/// Mock sink recording every write, with scriptable failures.
#[derive(Debug, Default)]
pub struct MockSink {
    ops: Vec<Operation>,
    fail_after_ops: Option<usize>,
    injected_error: Option<GlowError>,
}

impl MockSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail every operation after the first `ops` have succeeded.
    #[must_use]
    pub fn fail_after(mut self, ops: usize) -> Self {
        self.fail_after_ops = Some(ops);
        self
    }

    /// Fail the next operation with `error`, then recover.
    pub fn inject_error(&mut self, error: GlowError) {
        self.injected_error = Some(error);
    }

    // === Assertions ===

    /// All recorded operations, in order.
    #[must_use]
    pub fn operations(&self) -> &[Operation] {
        &self.ops
    }

    /// Just the colors written, in order.
    #[must_use]
    pub fn colors(&self) -> Vec<Percent> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                Operation::SetColor(c) => Some(*c),
                _ => None,
            })
            .collect()
    }

    /// The most recently written color, if any.
    #[must_use]
    pub fn last_color(&self) -> Option<Percent> {
        self.colors().last().copied()
    }

    /// Assert the exact operation sequence.
    ///
    /// # Panics
    ///
    /// Panics if the recorded operations differ.
    pub fn assert_operations(&self, expected: &[Operation]) {
        assert_eq!(
            self.ops, expected,
            "Operation mismatch.\nExpected: {expected:#?}\nActual: {:#?}",
            self.ops
        );
    }

    /// Drop the recorded log for fresh assertions.
    pub fn clear_operations(&mut self) {
        self.ops.clear();
    }

    // === Internal helpers ===

    fn check(&mut self) -> Result<()> {
        if let Some(error) = self.injected_error.take() {
            return Err(error);
        }
        if let Some(limit) = self.fail_after_ops {
            if self.ops.len() >= limit {
                return Err(GlowError::SinkWrite(
                    "mock failure after ops limit".to_string(),
                ));
            }
        }
        Ok(())
    }

    fn record(&mut self, op: Operation) {
        trace!(?op, "recording sink operation");
        self.ops.push(op);
    }
}

impl LightingSink for MockSink {
    fn init(&mut self) -> Result<()> {
        self.check()?;
        self.record(Operation::Init);
        Ok(())
    }

    fn set_color(&mut self, color: Percent) -> Result<()> {
        self.check()?;
        self.record(Operation::SetColor(color));
        Ok(())
    }

    fn all_off(&mut self) -> Result<()> {
        self.check()?;
        self.record(Operation::AllOff);
        Ok(())
    }
}
