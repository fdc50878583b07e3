//! Periodic background watching and the change-response cycle.
//!
//! One task owns the whole timeline: it polls the provider, and when the
//! background changes it samples the new image and plays the fade-out /
//! fade-in pair inline. Because fades are awaited on this single task, at
//! most one writer ever touches the sink, and a change arriving mid-fade
//! is simply picked up by the next poll (bursts coalesce to the latest
//! background).

use std::path::PathBuf;

use tokio::sync::watch;
use tokio::time::{MissedTickBehavior, interval, timeout};
use tracing::{debug, info, warn};

use crate::color::{Percent, Rgb};
use crate::config::Config;
use crate::error::{GlowError, Result};
use crate::provider::{BackgroundProvider, decode};
use crate::sampler::Sampler;
use crate::sink::LightingSink;
use crate::transition::{FadePlan, FadePlayer, Playback};

/// Cross-tick state: what the device is currently showing.
///
/// An owned value threaded through ticks rather than process-global
/// state, so a single tick is testable in isolation. Not persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WatcherState {
    /// Identifier of the background the applied color was sampled from.
    /// `None` until the startup cycle has completed.
    pub background: Option<String>,
    /// Color currently applied to the sink.
    pub applied: Percent,
}

/// Outcome of a single poll tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Background unchanged; nothing was written.
    Unchanged,
    /// Background changed; the sink was faded to the new color.
    Applied,
    /// Shutdown fired mid-fade; the cycle was abandoned.
    Interrupted,
}

/// Watches the desktop background and drives the lighting sink.
pub struct Watcher<P, S> {
    provider: P,
    sink: S,
    sampler: Sampler,
    player: FadePlayer,
    config: Config,
    state: WatcherState,
}

impl<P: BackgroundProvider, S: LightingSink> Watcher<P, S> {
    pub fn new(provider: P, sink: S, config: &Config) -> Result<Self> {
        let sampler = Sampler::new(
            config.dark_threshold,
            config.bright_threshold,
            config.fallback,
        )?;
        Ok(Self {
            provider,
            sink,
            sampler,
            player: FadePlayer::new(config.fade_tick()),
            config: config.clone(),
            state: WatcherState::default(),
        })
    }

    #[must_use]
    pub const fn state(&self) -> &WatcherState {
        &self.state
    }

    /// The owned sink, for inspection in tests.
    #[must_use]
    pub const fn sink(&self) -> &S {
        &self.sink
    }

    /// Run until `shutdown` fires.
    ///
    /// The first cycle runs immediately rather than waiting out the poll
    /// interval, fading up from black. Per-tick errors are logged and the
    /// schedule continues; the sink is turned off before returning.
    pub async fn run(&mut self, mut shutdown: watch::Receiver<bool>) -> Result<()> {
        // Start dark; the startup cycle fades up from here.
        self.sink.set_color(Percent::BLACK)?;

        let mut ticker = interval(self.config.poll_interval());
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    match self.tick(&mut shutdown).await {
                        Ok(TickOutcome::Interrupted) => break,
                        Ok(_) => {}
                        Err(err) => warn!(%err, "tick failed; retrying on next poll"),
                    }
                }
                _ = shutdown.changed() => break,
            }
        }

        debug!("watcher stopping; clearing lighting");
        self.sink.all_off()
    }

    /// One poll: detect a change, recompute, fade.
    ///
    /// Collaborator work (provider lookup, decode, sampling) is bounded by
    /// the configured tick deadline. State is committed only after the
    /// whole cycle succeeds, so a failed tick leaves the previous baseline
    /// for the next poll to retry from.
    pub async fn tick(&mut self, shutdown: &mut watch::Receiver<bool>) -> Result<TickOutcome> {
        let deadline = self.config.tick_deadline();
        let deadline_err = || GlowError::TickDeadline {
            ms: self.config.tick_deadline_ms,
        };

        let current = timeout(deadline, self.provider.current())
            .await
            .map_err(|_| deadline_err())??;

        if self.state.background.as_deref() == Some(current.as_str()) {
            return Ok(TickOutcome::Unchanged);
        }

        info!(background = %current, "background changed; updating lighting");

        let target = timeout(deadline, self.resample(&current))
            .await
            .map_err(|_| deadline_err())??;

        let startup = self.state.background.is_none();
        if !startup {
            let fade_out = FadePlan::new(self.state.applied, Percent::BLACK, self.config.fade_out());
            if self.play(&fade_out, shutdown).await? == Playback::Interrupted {
                return Ok(TickOutcome::Interrupted);
            }
        }

        let up = if startup {
            self.config.startup_fade()
        } else {
            self.config.fade_in()
        };
        let fade_in = FadePlan::new(Percent::BLACK, target, up);
        if self.play(&fade_in, shutdown).await? == Playback::Interrupted {
            return Ok(TickOutcome::Interrupted);
        }

        self.state.background = Some(current);
        self.state.applied = target;
        debug!(color = %target, "lighting updated");
        Ok(TickOutcome::Applied)
    }

    async fn play(
        &mut self,
        plan: &FadePlan,
        shutdown: &mut watch::Receiver<bool>,
    ) -> Result<Playback> {
        self.player.play(plan, &mut self.sink, shutdown).await
    }

    /// Decode and sample the image behind `background` off the async
    /// runtime. A deadline hit abandons the blocking task; it finishes in
    /// the background without holding up later ticks.
    async fn resample(&self, background: &str) -> Result<Percent> {
        debug!(image = %background, "processing background image");

        let path = PathBuf::from(background);
        let sampler = self.sampler;
        let ambient = tokio::task::spawn_blocking(move || -> Result<Rgb> {
            let pixels = decode(&path)?;
            sampler.sample(&pixels)
        })
        .await
        .map_err(|e| GlowError::Decode {
            path: background.to_string(),
            reason: format!("sampling task failed: {e}"),
        })??;

        debug!(%ambient, image = %background, "sampled ambient color");
        Ok(ambient.to_percent())
    }
}
