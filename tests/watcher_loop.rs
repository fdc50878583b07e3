//! Integration tests for the watcher loop using the mock sink.
//!
//! Exercises change detection, fade sequencing, error tolerance, and
//! shutdown behavior end-to-end, with scripted providers and on-disk
//! image fixtures standing in for the host OS.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use image::RgbImage;
use tempfile::TempDir;
use tokio::sync::watch;

use glowd::color::{Percent, Rgb};
use glowd::config::Config;
use glowd::error::{GlowError, Result};
use glowd::provider::{BackgroundProvider, StaticProvider};
use glowd::sink::mock::{MockSink, Operation};
use glowd::watcher::{TickOutcome, Watcher};

/// One scripted provider response.
#[derive(Debug, Clone)]
enum Step {
    Path(String),
    Unavailable,
}

/// Provider that replays a script; the final step repeats forever.
struct ScriptedProvider {
    steps: Mutex<VecDeque<Step>>,
}

impl ScriptedProvider {
    fn new(steps: impl IntoIterator<Item = Step>) -> Self {
        Self {
            steps: Mutex::new(steps.into_iter().collect()),
        }
    }
}

impl BackgroundProvider for ScriptedProvider {
    async fn current(&self) -> Result<String> {
        let step = {
            let mut steps = self.steps.lock().unwrap();
            if steps.len() > 1 {
                steps.pop_front()
            } else {
                steps.front().cloned()
            }
        };
        match step {
            Some(Step::Path(path)) => Ok(path),
            Some(Step::Unavailable) | None => Err(GlowError::ProviderUnavailable(
                "scripted failure".to_string(),
            )),
        }
    }
}

/// Provider that never answers, for deadline tests.
struct HangingProvider;

impl BackgroundProvider for HangingProvider {
    async fn current(&self) -> Result<String> {
        std::future::pending::<()>().await;
        unreachable!("pending future resolved")
    }
}

fn write_image(dir: &TempDir, name: &str, color: [u8; 3]) -> String {
    let path = dir.path().join(name);
    RgbImage::from_pixel(4, 4, image::Rgb(color))
        .save(&path)
        .unwrap();
    path.display().to_string()
}

/// Short fades so step counts stay readable in assertions.
fn test_config() -> Config {
    Config {
        poll_interval_ms: 1000,
        startup_fade_ms: 500,
        fade_out_ms: 300,
        fade_in_ms: 400,
        fade_tick_ms: 100,
        ..Config::default()
    }
}

#[tokio::test(start_paused = true)]
async fn startup_fades_up_from_black() {
    let dir = TempDir::new().unwrap();
    let wall = write_image(&dir, "wall.png", [60, 120, 180]);
    let provider = ScriptedProvider::new([Step::Path(wall)]);
    let mut watcher = Watcher::new(provider, MockSink::new(), &test_config()).unwrap();
    let (_tx, mut rx) = watch::channel(false);

    let outcome = watcher.tick(&mut rx).await.unwrap();

    assert_eq!(outcome, TickOutcome::Applied);
    // (60, 120, 180) quantizes to (23, 47, 70); 500 ms at 100 ms cadence
    // is five steps, no fade-out since nothing was applied yet.
    let target = Rgb::new(60, 120, 180).to_percent();
    assert_eq!(target, Percent::new(23, 47, 70));
    let colors = watcher.sink().colors();
    assert_eq!(colors.len(), 5);
    assert_eq!(*colors.last().unwrap(), target);
    assert_eq!(watcher.state().applied, target);
}

#[tokio::test(start_paused = true)]
async fn change_fires_one_cycle_and_identical_backgrounds_fire_none() {
    let dir = TempDir::new().unwrap();
    let a = write_image(&dir, "a.png", [60, 120, 180]);
    let b = write_image(&dir, "b.png", [150, 150, 150]);
    let provider =
        ScriptedProvider::new([Step::Path(a.clone()), Step::Path(a), Step::Path(b.clone())]);
    let mut watcher = Watcher::new(provider, MockSink::new(), &test_config()).unwrap();
    let (_tx, mut rx) = watch::channel(false);

    // "A": startup cycle.
    assert_eq!(watcher.tick(&mut rx).await.unwrap(), TickOutcome::Applied);
    let after_startup = watcher.sink().colors().len();
    assert_eq!(after_startup, 5);

    // "A" again: no writes at all.
    assert_eq!(watcher.tick(&mut rx).await.unwrap(), TickOutcome::Unchanged);
    assert_eq!(watcher.sink().colors().len(), after_startup);

    // "B": fade out (3 steps to black) then fade in (4 steps to the new
    // target), exactly one recompute cycle.
    assert_eq!(watcher.tick(&mut rx).await.unwrap(), TickOutcome::Applied);
    let colors = watcher.sink().colors();
    assert_eq!(colors.len(), after_startup + 3 + 4);
    assert_eq!(colors[after_startup + 2], Percent::BLACK);
    assert_eq!(*colors.last().unwrap(), Percent::new(58, 58, 58));
    assert_eq!(watcher.state().background.as_deref(), Some(b.as_str()));
    assert_eq!(watcher.state().applied, Percent::new(58, 58, 58));
}

#[tokio::test(start_paused = true)]
async fn provider_failure_leaves_state_for_the_next_tick() {
    let dir = TempDir::new().unwrap();
    let wall = write_image(&dir, "wall.png", [128, 128, 128]);
    let provider = ScriptedProvider::new([Step::Unavailable, Step::Path(wall)]);
    let mut watcher = Watcher::new(provider, MockSink::new(), &test_config()).unwrap();
    let (_tx, mut rx) = watch::channel(false);

    let err = watcher.tick(&mut rx).await.unwrap_err();
    assert!(matches!(err, GlowError::ProviderUnavailable(_)));
    assert_eq!(watcher.state().background, None);
    assert!(watcher.sink().colors().is_empty());

    // Next tick recovers and runs the full startup cycle.
    assert_eq!(watcher.tick(&mut rx).await.unwrap(), TickOutcome::Applied);
    assert_eq!(watcher.state().applied, Percent::new(50, 50, 50));
}

#[tokio::test(start_paused = true)]
async fn decode_failure_is_contained_to_its_tick() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("gone.png").display().to_string();
    let wall = write_image(&dir, "wall.png", [128, 128, 128]);
    let provider = ScriptedProvider::new([Step::Path(missing), Step::Path(wall)]);
    let mut watcher = Watcher::new(provider, MockSink::new(), &test_config()).unwrap();
    let (_tx, mut rx) = watch::channel(false);

    let err = watcher.tick(&mut rx).await.unwrap_err();
    assert!(matches!(err, GlowError::Decode { .. }));
    assert_eq!(watcher.state().background, None);

    assert_eq!(watcher.tick(&mut rx).await.unwrap(), TickOutcome::Applied);
}

#[tokio::test(start_paused = true)]
async fn hung_provider_hits_the_tick_deadline() {
    let mut watcher = Watcher::new(HangingProvider, MockSink::new(), &test_config()).unwrap();
    let (_tx, mut rx) = watch::channel(false);

    let err = watcher.tick(&mut rx).await.unwrap_err();
    assert!(matches!(err, GlowError::TickDeadline { .. }));
    assert!(watcher.sink().colors().is_empty());
}

#[tokio::test(start_paused = true)]
async fn sink_failure_aborts_the_fade_but_not_the_watcher() {
    let dir = TempDir::new().unwrap();
    let wall = write_image(&dir, "wall.png", [128, 128, 128]);
    let provider = ScriptedProvider::new([Step::Path(wall)]);
    let sink = MockSink::new().fail_after(2);
    let mut watcher = Watcher::new(provider, sink, &test_config()).unwrap();
    let (_tx, mut rx) = watch::channel(false);

    let err = watcher.tick(&mut rx).await.unwrap_err();
    assert!(matches!(err, GlowError::SinkWrite(_)));
    // Two steps landed before the failure; nothing was committed.
    assert_eq!(watcher.sink().colors().len(), 2);
    assert_eq!(watcher.state().background, None);
}

#[tokio::test(start_paused = true)]
async fn shutdown_interrupts_a_fade_without_committing_state() {
    let dir = TempDir::new().unwrap();
    let wall = write_image(&dir, "wall.png", [128, 128, 128]);
    let provider = ScriptedProvider::new([Step::Path(wall)]);
    let mut watcher = Watcher::new(provider, MockSink::new(), &test_config()).unwrap();
    let (tx, mut rx) = watch::channel(false);
    tx.send(true).unwrap();

    let outcome = watcher.tick(&mut rx).await.unwrap();

    assert_eq!(outcome, TickOutcome::Interrupted);
    assert!(watcher.sink().colors().is_empty());
    assert_eq!(watcher.state().background, None);
}

#[tokio::test(start_paused = true)]
async fn run_loop_survives_failures_and_clears_the_sink_on_shutdown() {
    let dir = TempDir::new().unwrap();
    let wall = write_image(&dir, "wall.png", [60, 120, 180]);
    let provider = ScriptedProvider::new([Step::Unavailable, Step::Path(wall)]);
    let mut watcher = Watcher::new(provider, MockSink::new(), &test_config()).unwrap();
    let (tx, rx) = watch::channel(false);

    let driver = async {
        tokio::time::sleep(Duration::from_millis(3500)).await;
        tx.send(true).unwrap();
    };
    let (run_result, ()) = tokio::join!(watcher.run(rx), driver);
    run_result.unwrap();

    let ops = watcher.sink().operations();
    // Initial black write, a failed first poll, then the startup fade on
    // the second poll, then idle polls until shutdown turns lighting off.
    assert_eq!(ops.first(), Some(&Operation::SetColor(Percent::BLACK)));
    assert_eq!(ops.last(), Some(&Operation::AllOff));
    assert_eq!(watcher.sink().colors().len(), 1 + 5);
    assert_eq!(watcher.state().applied, Percent::new(23, 47, 70));
}

#[tokio::test(start_paused = true)]
async fn static_provider_only_ever_fires_the_startup_cycle() {
    let dir = TempDir::new().unwrap();
    let wall = write_image(&dir, "wall.png", [128, 128, 128]);
    let provider = StaticProvider::new(wall);
    let mut watcher = Watcher::new(provider, MockSink::new(), &test_config()).unwrap();
    let (tx, rx) = watch::channel(false);

    let driver = async {
        tokio::time::sleep(Duration::from_millis(4500)).await;
        tx.send(true).unwrap();
    };
    let (run_result, ()) = tokio::join!(watcher.run(rx), driver);
    run_result.unwrap();

    // Several polls elapsed, but the identifier never changed: one
    // initial black write plus one startup fade, nothing else.
    assert_eq!(watcher.sink().colors().len(), 1 + 5);
}
