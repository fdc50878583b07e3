//! glowd library - ambient wallpaper lighting for addressable RGB devices.
//!
//! The daemon polls the desktop background, derives a single ambient color
//! from it, and fades a lighting device to that color on every change. This
//! library exposes the core so integration tests (and other frontends) can
//! drive it without spawning the `glowd` binary.
//!
//! # Modules
//!
//! - `color`: RGB value types and device-scale quantization
//! - `sampler`: filtered-mean ambient color extraction
//! - `transition`: fade planning and cancellable playback
//! - `watcher`: the periodic change-detection loop
//! - `provider`: background-identifier lookup and image decoding
//! - `sink`: lighting output abstraction with console and mock backends
//! - `config`: TOML configuration surface
//! - `error`: error types with user-recoverable hints
#![forbid(unsafe_code)]

pub mod cli;
pub mod color;
pub mod config;
pub mod error;
pub mod logging;
pub mod provider;
pub mod sampler;
pub mod sink;
pub mod transition;
pub mod watcher;
