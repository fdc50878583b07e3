//! Error types for ambient lighting operations.

use thiserror::Error;

/// Primary error type for glowd operations.
#[derive(Error, Debug)]
pub enum GlowError {
    // Provider errors
    #[error("Background provider unavailable: {0}")]
    ProviderUnavailable(String),

    #[error("Watcher tick exceeded its deadline of {ms} ms")]
    TickDeadline { ms: u64 },

    // Image errors
    #[error("Failed to decode image '{path}': {reason}")]
    Decode { path: String, reason: String },

    #[error("No pixel passed the dark/bright filter")]
    NoQualifyingPixels,

    // Sink errors
    #[error("Lighting sink write failed: {0}")]
    SinkWrite(String),

    #[error("Lighting sink initialization failed: {0}")]
    SinkInit(String),

    // Configuration errors
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: String },

    #[error("Configuration parse error: {0}")]
    ConfigParse(String),

    #[error("Dark threshold {dark} must be below bright threshold {bright}")]
    InvalidThresholds { dark: u8, bright: u8 },

    #[error("Invalid color '{input}': expected 6 hex digits (e.g. ff8800)")]
    InvalidColor { input: String },

    // General errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl GlowError {
    /// Returns true if the error is recoverable by the user.
    pub const fn is_user_recoverable(&self) -> bool {
        matches!(
            self,
            Self::ConfigNotFound { .. }
                | Self::ConfigParse(_)
                | Self::InvalidThresholds { .. }
                | Self::InvalidColor { .. }
        )
    }

    /// Returns a suggestion for how to fix the error.
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            Self::ProviderUnavailable(_) => {
                Some("Check the [background] section of the configuration")
            }
            Self::NoQualifyingPixels => {
                Some("Widen the dark/bright thresholds or use the unfiltered_mean fallback")
            }
            Self::ConfigNotFound { .. } => Some("Run: glowd config --path"),
            Self::InvalidThresholds { .. } => Some("Use thresholds with dark < bright, on 0-255"),
            Self::InvalidColor { .. } => Some("Use a hex color like ff8800 or #3a7bd5"),
            _ => None,
        }
    }
}

/// Convenience type alias for Results using GlowError.
pub type Result<T> = std::result::Result<T, GlowError>;
