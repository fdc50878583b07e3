//! CLI argument definitions.

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// glowd - ambient wallpaper lighting daemon.
///
/// Robot Mode: use --robot or --format=json for machine-parseable output.
#[derive(Parser, Debug)]
#[command(name = "glowd", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format (text for humans, json for agents/scripts)
    #[arg(
        long,
        short = 'f',
        default_value = "text",
        global = true,
        env = "GLOWD_FORMAT"
    )]
    pub format: OutputFormat,

    /// Robot mode: equivalent to --format=json
    #[arg(long, global = true)]
    pub robot: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(long, short = 'v', global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress non-essential output)
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Path to the configuration file
    #[arg(long, short = 'c', global = true, env = "GLOWD_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Output format selection.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text with optional color
    #[default]
    Text,
    /// JSON output for scripts and agents
    Json,
    /// Compact JSON (single line)
    JsonCompact,
}

impl Cli {
    /// Returns true if output should be JSON.
    pub const fn use_json(&self) -> bool {
        self.robot || matches!(self.format, OutputFormat::Json | OutputFormat::JsonCompact)
    }

    /// Returns true if output should be compact JSON.
    pub const fn use_compact_json(&self) -> bool {
        matches!(self.format, OutputFormat::JsonCompact)
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the ambient lighting daemon
    Run(RunArgs),

    /// Compute the ambient color of an image and print it
    Sample(SampleArgs),

    /// Play a fade between two colors on the console sink
    Fade(FadeArgs),

    /// Show the effective configuration
    Config(ConfigArgs),

    /// Show version and build information
    Version,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// === Argument Structs ===

#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Watch a fixed image path instead of the configured provider
    #[arg(long)]
    pub image: Option<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct SampleArgs {
    /// Path to the image to sample
    pub image: PathBuf,

    /// Override the near-black threshold (0-255)
    #[arg(long)]
    pub dark: Option<u8>,

    /// Override the near-white threshold (0-255)
    #[arg(long)]
    pub bright: Option<u8>,
}

#[derive(Parser, Debug)]
pub struct FadeArgs {
    /// Start color in hex (e.g. "000000")
    pub from: String,

    /// End color in hex (e.g. "ff8800" or "#ff8800")
    pub to: String,

    /// Fade duration in milliseconds
    #[arg(long, default_value = "1000")]
    pub duration_ms: u64,
}

#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Show the configuration file path instead of the contents
    #[arg(long)]
    pub path: bool,
}

#[derive(Parser, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
