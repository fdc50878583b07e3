//! Background identifier lookup and image decoding.
//!
//! Providers are thin adapters over whatever the host OS exposes for "what
//! is the wallpaper right now". The watcher only ever compares the returned
//! identifier by value, so anything stable per-background works.

use std::path::{Path, PathBuf};

use image::RgbImage;
use tracing::trace;

use crate::error::{GlowError, Result};

/// Source of the current desktop background identifier.
#[allow(async_fn_in_trait)] // callers are generic, never boxed
pub trait BackgroundProvider {
    /// The identifier (an image path) of the current background.
    async fn current(&self) -> Result<String>;
}

/// Provider pinned to a fixed image path.
///
/// Used by `glowd run --image` and as a deterministic provider in demos;
/// the identifier never changes, so only the startup fade fires.
#[derive(Debug, Clone)]
pub struct StaticProvider {
    path: PathBuf,
}

impl StaticProvider {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl BackgroundProvider for StaticProvider {
    async fn current(&self) -> Result<String> {
        Ok(self.path.display().to_string())
    }
}

/// Provider that runs a command printing the current wallpaper path.
///
/// The default configuration queries GNOME:
/// `gsettings get org.gnome.desktop.background picture-uri`. Any command
/// whose stdout is a path or `file://` URI will do.
#[derive(Debug, Clone)]
pub struct CommandProvider {
    program: String,
    args: Vec<String>,
}

impl CommandProvider {
    #[must_use]
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }
}

impl BackgroundProvider for CommandProvider {
    async fn current(&self) -> Result<String> {
        let output = tokio::process::Command::new(&self.program)
            .args(&self.args)
            .output()
            .await
            .map_err(|e| GlowError::ProviderUnavailable(format!("{}: {e}", self.program)))?;

        if !output.status.success() {
            return Err(GlowError::ProviderUnavailable(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        parse_identifier(&stdout).ok_or_else(|| {
            GlowError::ProviderUnavailable(format!("{} printed no path", self.program))
        })
    }
}

/// Normalize provider command output into a bare path.
///
/// Tolerates the quoting and `file://` scheme that `gsettings` wraps
/// around its values.
// TODO: decode percent-escapes in file:// URIs (paths with spaces).
fn parse_identifier(raw: &str) -> Option<String> {
    let trimmed = raw.trim().trim_matches(|c| c == '\'' || c == '"');
    let path = trimmed.strip_prefix("file://").unwrap_or(trimmed);
    if path.is_empty() {
        return None;
    }
    trace!(%path, "parsed background identifier");
    Some(path.to_string())
}

/// Provider selected by configuration.
#[derive(Debug, Clone)]
pub enum Provider {
    Static(StaticProvider),
    Command(CommandProvider),
}

impl BackgroundProvider for Provider {
    async fn current(&self) -> Result<String> {
        match self {
            Self::Static(p) => p.current().await,
            Self::Command(p) => p.current().await,
        }
    }
}

/// Decode the image behind a background identifier into RGB pixels.
pub fn decode(path: &Path) -> Result<RgbImage> {
    let image = image::open(path).map_err(|e| GlowError::Decode {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    Ok(image.to_rgb8())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifier_strips_gsettings_quoting() {
        assert_eq!(
            parse_identifier("'file:///home/u/walls/dunes.png'\n"),
            Some("/home/u/walls/dunes.png".to_string())
        );
    }

    #[test]
    fn identifier_accepts_bare_paths() {
        assert_eq!(
            parse_identifier("/home/u/walls/dunes.png"),
            Some("/home/u/walls/dunes.png".to_string())
        );
    }

    #[test]
    fn identifier_rejects_empty_output() {
        assert_eq!(parse_identifier(""), None);
        assert_eq!(parse_identifier("''\n"), None);
        assert_eq!(parse_identifier("file://"), None);
    }

    #[tokio::test]
    async fn static_provider_is_constant() {
        let p = StaticProvider::new("/tmp/wall.png");
        assert_eq!(p.current().await.unwrap(), "/tmp/wall.png");
        assert_eq!(p.current().await.unwrap(), "/tmp/wall.png");
    }

    #[tokio::test]
    async fn command_provider_reads_stdout() {
        let p = CommandProvider::new("echo", vec!["'file:///tmp/wall.png'".to_string()]);
        assert_eq!(p.current().await.unwrap(), "/tmp/wall.png");
    }

    #[tokio::test]
    async fn missing_command_is_provider_unavailable() {
        let p = CommandProvider::new("glowd-no-such-command", vec![]);
        assert!(matches!(
            p.current().await,
            Err(GlowError::ProviderUnavailable(_))
        ));
    }

    #[test]
    fn decode_reports_unreadable_files() {
        let err = decode(Path::new("/nonexistent/wall.png")).unwrap_err();
        assert!(matches!(err, GlowError::Decode { .. }));
    }
}
