//! Daemon configuration surface.
//!
//! Loaded from a TOML file; every field has a default, so a missing file
//! means a fully usable default configuration. Timing values are stored in
//! milliseconds (matching the file format) with `Duration` accessors for
//! the rest of the crate.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{GlowError, Result};
use crate::provider::{CommandProvider, Provider, StaticProvider};
use crate::sampler::FallbackPolicy;

/// Top-level daemon configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Background poll interval in milliseconds.
    pub poll_interval_ms: u64,
    /// Channels all strictly below this count as near-black (0-255).
    pub dark_threshold: u8,
    /// Channels all strictly above this count as near-white (0-255).
    pub bright_threshold: u8,
    /// Duration of the initial fade up from black, in milliseconds.
    pub startup_fade_ms: u64,
    /// Duration of the fade down to black on a change, in milliseconds.
    pub fade_out_ms: u64,
    /// Duration of the fade up to the new color on a change, in milliseconds.
    pub fade_in_ms: u64,
    /// Cadence of individual fade steps, in milliseconds.
    pub fade_tick_ms: u64,
    /// Deadline for provider lookup + decode + sampling within one tick.
    pub tick_deadline_ms: u64,
    /// What to do when every pixel is filtered out.
    pub fallback: FallbackPolicy,
    /// Where the current background identifier comes from.
    pub background: BackgroundSource,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            poll_interval_ms: 1000,
            dark_threshold: 100,
            bright_threshold: 200,
            startup_fade_ms: 2000,
            fade_out_ms: 1000,
            fade_in_ms: 1000,
            fade_tick_ms: 100,
            tick_deadline_ms: 10_000,
            fallback: FallbackPolicy::default(),
            background: BackgroundSource::default(),
        }
    }
}

/// Background identifier source selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum BackgroundSource {
    /// A fixed image path.
    Static { path: PathBuf },
    /// A command whose stdout is the wallpaper path.
    Command {
        program: String,
        #[serde(default)]
        args: Vec<String>,
    },
}

impl Default for BackgroundSource {
    fn default() -> Self {
        Self::Command {
            program: "gsettings".to_string(),
            args: ["get", "org.gnome.desktop.background", "picture-uri"]
                .map(String::from)
                .to_vec(),
        }
    }
}

impl BackgroundSource {
    /// Build the provider this source describes.
    #[must_use]
    pub fn provider(&self) -> Provider {
        match self {
            Self::Static { path } => Provider::Static(StaticProvider::new(path.clone())),
            Self::Command { program, args } => {
                Provider::Command(CommandProvider::new(program.clone(), args.clone()))
            }
        }
    }
}

impl Config {
    /// Load configuration from `explicit` if given, otherwise from the
    /// default path when that file exists, otherwise defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        match Self::default_path() {
            Some(path) if path.exists() => Self::from_file(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Parse a specific configuration file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                GlowError::ConfigNotFound {
                    path: path.display().to_string(),
                }
            } else {
                GlowError::Io(e)
            }
        })?;
        let config: Self = toml::from_str(&raw)
            .map_err(|e| GlowError::ConfigParse(format!("{}: {e}", path.display())))?;
        config.validate()?;
        Ok(config)
    }

    /// The conventional config location: `<config dir>/glowd/config.toml`.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("glowd").join("config.toml"))
    }

    /// Reject values the watcher cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.dark_threshold >= self.bright_threshold {
            return Err(GlowError::InvalidThresholds {
                dark: self.dark_threshold,
                bright: self.bright_threshold,
            });
        }
        if self.poll_interval_ms == 0 {
            return Err(GlowError::ConfigParse(
                "poll_interval_ms must be at least 1".to_string(),
            ));
        }
        if self.fade_tick_ms == 0 {
            return Err(GlowError::ConfigParse(
                "fade_tick_ms must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    // === Duration accessors ===

    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    #[must_use]
    pub const fn startup_fade(&self) -> Duration {
        Duration::from_millis(self.startup_fade_ms)
    }

    #[must_use]
    pub const fn fade_out(&self) -> Duration {
        Duration::from_millis(self.fade_out_ms)
    }

    #[must_use]
    pub const fn fade_in(&self) -> Duration {
        Duration::from_millis(self.fade_in_ms)
    }

    #[must_use]
    pub const fn fade_tick(&self) -> Duration {
        Duration::from_millis(self.fade_tick_ms)
    }

    #[must_use]
    pub const fn tick_deadline(&self) -> Duration {
        Duration::from_millis(self.tick_deadline_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let c = Config::default();
        assert_eq!(c.poll_interval_ms, 1000);
        assert_eq!(c.dark_threshold, 100);
        assert_eq!(c.bright_threshold, 200);
        assert_eq!(c.startup_fade_ms, 2000);
        assert_eq!(c.fade_out_ms, 1000);
        assert_eq!(c.fade_in_ms, 1000);
        assert_eq!(c.fade_tick_ms, 100);
        assert_eq!(c.fallback, FallbackPolicy::UnfilteredMean);
        c.validate().unwrap();
    }

    #[test]
    fn empty_file_yields_defaults() {
        let c: Config = toml::from_str("").unwrap();
        assert_eq!(c, Config::default());
    }

    #[test]
    fn partial_file_overrides_selected_fields() {
        let c: Config = toml::from_str(
            r#"
            poll_interval_ms = 250
            fallback = "fail"

            [background]
            source = "static"
            path = "/home/u/wall.png"
            "#,
        )
        .unwrap();

        assert_eq!(c.poll_interval_ms, 250);
        assert_eq!(c.fallback, FallbackPolicy::Fail);
        assert_eq!(
            c.background,
            BackgroundSource::Static {
                path: PathBuf::from("/home/u/wall.png")
            }
        );
        // Untouched fields keep their defaults.
        assert_eq!(c.fade_tick_ms, 100);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(toml::from_str::<Config>("polling_interval = 5").is_err());
    }

    #[test]
    fn validate_rejects_inverted_thresholds() {
        let mut c = Config::default();
        c.dark_threshold = 220;
        assert!(matches!(
            c.validate(),
            Err(GlowError::InvalidThresholds { .. })
        ));
    }

    #[test]
    fn validate_rejects_zero_cadence() {
        let mut c = Config::default();
        c.fade_tick_ms = 0;
        assert!(c.validate().is_err());
    }

    #[test]
    fn missing_explicit_file_is_config_not_found() {
        let err = Config::from_file(Path::new("/nonexistent/glowd.toml")).unwrap_err();
        assert!(matches!(err, GlowError::ConfigNotFound { .. }));
    }

    #[test]
    fn config_round_trips_through_toml() {
        let c = Config::default();
        let serialized = toml::to_string_pretty(&c).unwrap();
        let back: Config = toml::from_str(&serialized).unwrap();
        assert_eq!(back, c);
    }
}
