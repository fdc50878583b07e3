//! glowd - ambient wallpaper lighting daemon.
//!
//! Tints an RGB lighting device to the dominant tone of the desktop
//! background, fading through black whenever the background changes.
#![forbid(unsafe_code)]

use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use colored::Colorize;
use tokio::sync::watch;
use tracing::info;

use glowd::cli::{self, Cli, Commands};
use glowd::color::Rgb;
use glowd::config::Config;
use glowd::error::{GlowError, Result};
use glowd::logging::init_logging;
use glowd::provider::{self, Provider, StaticProvider};
use glowd::sampler::Sampler;
use glowd::sink::{ConsoleSink, LightingSink};
use glowd::transition::{FadePlan, FadePlayer};
use glowd::watcher::Watcher;

/// Build information embedded at compile time.
mod build_info {
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");

    pub fn git_sha() -> &'static str {
        option_env!("VERGEN_GIT_SHA").unwrap_or("unknown")
    }

    pub fn git_dirty() -> &'static str {
        option_env!("VERGEN_GIT_DIRTY").unwrap_or("false")
    }

    pub fn build_timestamp() -> &'static str {
        option_env!("VERGEN_BUILD_TIMESTAMP").unwrap_or("unknown")
    }

    pub fn rustc_semver() -> &'static str {
        option_env!("VERGEN_RUSTC_SEMVER").unwrap_or("unknown")
    }

    pub fn target() -> &'static str {
        option_env!("VERGEN_CARGO_TARGET_TRIPLE").unwrap_or("unknown")
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if cli.no_color || !io::stdout().is_terminal() {
        colored::control::set_override(false);
    }

    init_logging(cli.use_json(), cli.verbose, cli.quiet);

    if let Err(e) = run(&cli).await {
        output_error(&cli, &e);
        std::process::exit(1);
    }
}

async fn run(cli: &Cli) -> Result<()> {
    match &cli.command {
        None => cmd_run(cli, None).await,
        Some(Commands::Run(args)) => cmd_run(cli, args.image.clone()).await,
        Some(Commands::Sample(args)) => cmd_sample(cli, args),
        Some(Commands::Fade(args)) => cmd_fade(cli, args).await,
        Some(Commands::Config(args)) => cmd_config(cli, args),
        Some(Commands::Version) => cmd_version(cli),
        Some(Commands::Completions(args)) => cmd_completions(args),
    }
}

// === Command Implementations ===

async fn cmd_run(cli: &Cli, image: Option<PathBuf>) -> Result<()> {
    let config = Config::load(cli.config.as_deref())?;
    config.validate()?;

    let provider = match image {
        Some(path) => Provider::Static(StaticProvider::new(path)),
        None => config.background.provider(),
    };

    let mut sink = if cli.quiet {
        ConsoleSink::quiet()
    } else {
        ConsoleSink::new()
    };
    // A sink that cannot initialize is the one fatal startup condition.
    sink.init()?;

    let (tx, rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("received ctrl-c; shutting down");
        }
        let _ = tx.send(true);
    });

    info!(version = build_info::VERSION, "glowd starting");
    let mut watcher = Watcher::new(provider, sink, &config)?;
    watcher.run(rx).await
}

fn cmd_sample(cli: &Cli, args: &cli::SampleArgs) -> Result<()> {
    let config = Config::load(cli.config.as_deref())?;
    let sampler = Sampler::new(
        args.dark.unwrap_or(config.dark_threshold),
        args.bright.unwrap_or(config.bright_threshold),
        config.fallback,
    )?;

    let pixels = provider::decode(&args.image)?;
    let ambient = sampler.sample(&pixels)?;
    let percent = ambient.to_percent();

    if cli.use_json() {
        output_json(
            cli,
            &serde_json::json!({
                "image": args.image.display().to_string(),
                "ambient": ambient.to_string(),
                "percent": { "r": percent.r(), "g": percent.g(), "b": percent.b() },
            }),
        );
    } else {
        let swatch = "        ".on_truecolor(ambient.r, ambient.g, ambient.b);
        println!("{swatch}  {ambient}  ({percent})");
    }
    Ok(())
}

async fn cmd_fade(cli: &Cli, args: &cli::FadeArgs) -> Result<()> {
    let config = Config::load(cli.config.as_deref())?;
    let from = Rgb::from_hex(&args.from)?.to_percent();
    let to = Rgb::from_hex(&args.to)?.to_percent();

    let mut sink = ConsoleSink::new();
    sink.init()?;

    let plan = FadePlan::new(from, to, Duration::from_millis(args.duration_ms));
    let (_tx, mut rx) = watch::channel(false);
    FadePlayer::new(config.fade_tick())
        .play(&plan, &mut sink, &mut rx)
        .await?;

    if !cli.quiet && !cli.use_json() {
        println!("Faded {} -> {} over {} ms", args.from, args.to, args.duration_ms);
    }
    Ok(())
}

fn cmd_config(cli: &Cli, args: &cli::ConfigArgs) -> Result<()> {
    if args.path {
        let path = cli
            .config
            .clone()
            .or_else(Config::default_path)
            .ok_or_else(|| GlowError::ConfigParse("no config directory available".to_string()))?;
        println!("{}", path.display());
        return Ok(());
    }

    let config = Config::load(cli.config.as_deref())?;
    if cli.use_json() {
        output_json(cli, &config);
    } else {
        let rendered = toml::to_string_pretty(&config)
            .map_err(|e| GlowError::ConfigParse(e.to_string()))?;
        print!("{rendered}");
    }
    Ok(())
}

fn cmd_version(cli: &Cli) -> Result<()> {
    if cli.use_json() {
        output_json(
            cli,
            &serde_json::json!({
                "version": build_info::VERSION,
                "git_sha": build_info::git_sha(),
                "git_dirty": build_info::git_dirty() == "true",
                "build_timestamp": build_info::build_timestamp(),
                "rustc_version": build_info::rustc_semver(),
                "target": build_info::target(),
            }),
        );
    } else {
        println!("glowd {}", build_info::VERSION);
        println!(
            "git: {}{}",
            build_info::git_sha(),
            if build_info::git_dirty() == "true" {
                " (dirty)"
            } else {
                ""
            }
        );
        println!("built: {}", build_info::build_timestamp());
        println!("rustc: {}", build_info::rustc_semver());
        println!("target: {}", build_info::target());
    }
    Ok(())
}

fn cmd_completions(args: &cli::CompletionsArgs) -> Result<()> {
    use clap::CommandFactory;
    clap_complete::generate(args.shell, &mut Cli::command(), "glowd", &mut io::stdout());
    Ok(())
}

// === Utility Functions ===

fn output_json<T: serde::Serialize>(cli: &Cli, data: &T) {
    let json = if cli.use_compact_json() {
        serde_json::to_string(data)
    } else {
        serde_json::to_string_pretty(data)
    };
    match json {
        Ok(json) => println!("{json}"),
        Err(e) => eprintln!("serialization failed: {e}"),
    }
}

fn output_error(cli: &Cli, error: &GlowError) {
    if cli.use_json() {
        let json = serde_json::json!({
            "error": true,
            "message": error.to_string(),
            "suggestion": error.suggestion(),
            "recoverable": error.is_user_recoverable(),
        });
        match serde_json::to_string_pretty(&json) {
            Ok(rendered) => eprintln!("{rendered}"),
            Err(_) => eprintln!("{error}"),
        }
    } else {
        eprintln!("{}: {error}", "Error".red().bold());
        if let Some(suggestion) = error.suggestion() {
            eprintln!("{}: {suggestion}", "Hint".yellow());
        }
    }
}
