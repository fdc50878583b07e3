//! Fade planning and playback.
//!
//! Planning is pure: a [`FadePlan`] turns into a finite step sequence with
//! no knowledge of devices or clocks, which is what makes the timing
//! semantics unit-testable. Playback is the only timed part: a
//! [`FadePlayer`] writes each step to a sink at a fixed cadence and yields
//! to a shutdown signal between ticks.

use std::time::Duration;

use tokio::sync::watch;
use tokio::time::sleep;
use tracing::trace;

use crate::color::Percent;
use crate::error::Result;
use crate::sink::LightingSink;

/// A fade between two device colors over a total duration.
///
/// Owned by the invocation that plays it; not retained afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FadePlan {
    pub from: Percent,
    pub to: Percent,
    pub duration: Duration,
}

impl FadePlan {
    #[must_use]
    pub const fn new(from: Percent, to: Percent, duration: Duration) -> Self {
        Self { from, to, duration }
    }

    /// The step sequence at the given tick cadence.
    ///
    /// Emits `duration / tick` steps. Each step advances every channel by
    /// the per-tick integer delta; the final step is forced to the exact
    /// target, since truncating division drifts short of the endpoint
    /// otherwise. A duration shorter than one tick yields the target as
    /// the single (immediate) step.
    #[must_use]
    pub fn steps(&self, tick: Duration) -> Vec<Percent> {
        let ticks = if tick.is_zero() {
            0
        } else {
            (self.duration.as_millis() / tick.as_millis()) as i32
        };
        if ticks == 0 {
            return vec![self.to];
        }

        let channel_delta =
            |from: u8, to: u8| (i32::from(to) - i32::from(from)) / ticks;
        let delta = [
            channel_delta(self.from.r(), self.to.r()),
            channel_delta(self.from.g(), self.to.g()),
            channel_delta(self.from.b(), self.to.b()),
        ];

        let mut current = [
            i32::from(self.from.r()),
            i32::from(self.from.g()),
            i32::from(self.from.b()),
        ];
        let mut steps = Vec::with_capacity(ticks as usize);
        for _ in 0..ticks {
            for (ch, d) in current.iter_mut().zip(delta) {
                *ch += d;
            }
            steps.push(Percent::new(
                current[0].clamp(0, 100) as u8,
                current[1].clamp(0, 100) as u8,
                current[2].clamp(0, 100) as u8,
            ));
        }
        if let Some(last) = steps.last_mut() {
            *last = self.to;
        }
        steps
    }

    /// Whether this plan has no intermediate ticks at the given cadence.
    #[must_use]
    pub fn is_immediate(&self, tick: Duration) -> bool {
        self.duration < tick
    }
}

/// How a playback ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Playback {
    /// Every step was written; the sink shows the plan's target.
    Completed,
    /// The shutdown signal fired mid-fade; remaining steps were dropped.
    Interrupted,
}

/// Plays fade plans against a lighting sink at a fixed cadence.
#[derive(Debug, Clone, Copy)]
pub struct FadePlayer {
    tick: Duration,
}

impl FadePlayer {
    #[must_use]
    pub const fn new(tick: Duration) -> Self {
        Self { tick }
    }

    /// Write the plan's steps to `sink`, sleeping one tick before each
    /// write. Returns as soon as the shutdown channel fires (or its sender
    /// is dropped), bounded by a single tick. A failed write aborts the
    /// remaining steps and surfaces the error.
    pub async fn play<S: LightingSink + ?Sized>(
        &self,
        plan: &FadePlan,
        sink: &mut S,
        shutdown: &mut watch::Receiver<bool>,
    ) -> Result<Playback> {
        if plan.is_immediate(self.tick) {
            sink.set_color(plan.to)?;
            return Ok(Playback::Completed);
        }

        for step in plan.steps(self.tick) {
            tokio::select! {
                () = sleep(self.tick) => {
                    trace!(color = %step, "fade step");
                    sink.set_color(step)?;
                }
                _ = shutdown.changed() => {
                    trace!("fade interrupted by shutdown");
                    return Ok(Playback::Interrupted);
                }
            }
        }
        Ok(Playback::Completed)
    }
}
