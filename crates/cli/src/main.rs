//! git-thanos command-line tool.
//!
//! Picks half of a repository's authors at random and redacts their names
//! and addresses across all branches and tags.

mod report;
mod signals;
mod stones;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, reload, EnvFilter, Registry};

use git_thanos_core::errors::CoreError;
use git_thanos_core::{GitCliClient, SnapPipeline, ThanosConfig};

use stones::StoneFlags;

// ---------------------------------------------------------------------------
// CLI argument definitions
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "git-thanos",
    version,
    disable_version_flag = true,
    about = "Rebalance your open-source project with a snap of your finger"
)]
struct Cli {
    /// Print version
    #[arg(short = 'v', short_alias = 'V', long, action = ArgAction::Version)]
    version: Option<bool>,

    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Seed the random selection so a run can be reproduced.
    #[arg(long)]
    seed: Option<u64>,

    /// Select and report authors without rewriting history.
    #[arg(long)]
    dry_run: bool,

    #[command(flatten)]
    stones: StoneFlags,
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

/// Exit status after an interrupt, as a shell reports SIGINT.
const EXIT_INTERRUPTED: u8 = 130;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(exit_status(&e))
        }
    }
}

fn exit_status(err: &anyhow::Error) -> u8 {
    match err.downcast_ref::<CoreError>() {
        Some(CoreError::Interrupted) => EXIT_INTERRUPTED,
        _ => 1,
    }
}

async fn run(cli: Cli) -> Result<()> {
    let (log, subscriber) = build_subscriber(std::env::var("RUST_LOG").ok().as_deref());
    subscriber.init();

    let config = load_config(cli.config.as_deref())?;
    log.apply_config_level(&config.log_level)?;

    let cwd = std::env::current_dir().context("failed to read the current directory")?;
    let client = GitCliClient::discover(&cwd, &config)?;

    stones::check_hardware_support(&cli.stones)?;
    stones::check_hardware_locations(|var| std::env::var(var).ok())?;

    let mut rng = match cli.seed {
        Some(seed) => {
            debug!(seed, "using seeded rng");
            StdRng::seed_from_u64(seed)
        }
        None => StdRng::from_entropy(),
    };

    let pipeline = SnapPipeline::new(client, &config)?;
    let report = pipeline
        .run_until(&mut rng, cli.dry_run, signals::wait_for_interrupt())
        .await?;
    info!(
        seen = report.authors_seen,
        selected = report.selected.len(),
        rewritten = report.rewritten,
        "snap complete"
    );

    report::print_report(&report, cli.dry_run);
    Ok(())
}

// ---------------------------------------------------------------------------
// Logging
// ---------------------------------------------------------------------------

/// Level used until the config file has been read.
const DEFAULT_LOG_LEVEL: &str = "warn";

/// Switches the log filter to the configured level once config is loaded.
/// Holds no handle when `RUST_LOG` set the filter, which then stays put.
struct LogControl {
    handle: Option<reload::Handle<EnvFilter, Registry>>,
}

impl LogControl {
    fn apply_config_level(&self, level: &str) -> Result<()> {
        let Some(handle) = &self.handle else {
            return Ok(());
        };
        let filter = EnvFilter::try_new(level)
            .with_context(|| format!("invalid log_level '{level}'"))?;
        handle
            .reload(filter)
            .context("failed to apply configured log level")?;
        debug!(level, "log level set from config");
        Ok(())
    }
}

/// Stderr subscriber with a reloadable filter. Valid `RUST_LOG` directives
/// win over the configured level.
fn build_subscriber(
    env_directives: Option<&str>,
) -> (LogControl, impl tracing::Subscriber + Send + Sync + 'static) {
    let from_env = env_directives.and_then(|d| EnvFilter::try_new(d).ok());
    let pinned = from_env.is_some();
    let (filter, handle) =
        reload::Layer::new(from_env.unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_LEVEL)));

    let subscriber = tracing_subscriber::registry().with(filter).with(
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .without_time(),
    );
    let control = LogControl {
        handle: (!pinned).then_some(handle),
    };
    (control, subscriber)
}

// ---------------------------------------------------------------------------
// Config helpers
// ---------------------------------------------------------------------------

/// Default location of the user config file.
fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("git-thanos").join("config.toml"))
}

/// An explicit path must exist; the default path is optional.
fn load_config(explicit: Option<&Path>) -> Result<ThanosConfig> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => match default_config_path().filter(|p| p.exists()) {
            Some(path) => path,
            None => return Ok(ThanosConfig::default()),
        },
    };
    ThanosConfig::load_and_validate(&path)
        .with_context(|| format!("failed to load config from {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_all_flags() {
        let cli = Cli::try_parse_from([
            "git-thanos",
            "--enable-inf-stone-mind",
            "--enable-inf-stone-power",
            "--enable-inf-stone-reality",
            "--enable-inf-stone-soul",
            "--enable-inf-stone-space",
            "--enable-inf-stone-time",
            "--seed",
            "42",
            "--dry-run",
            "-c",
            "thanos.toml",
        ])
        .unwrap();
        assert_eq!(cli.seed, Some(42));
        assert!(cli.dry_run);
        assert_eq!(cli.config, Some(PathBuf::from("thanos.toml")));
        stones::check_hardware_support(&cli.stones).unwrap();
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["git-thanos"]).unwrap();
        assert!(cli.config.is_none());
        assert!(cli.seed.is_none());
        assert!(!cli.dry_run);
        assert!(!cli.stones.power);
        assert!(cli.version.is_none());
    }

    #[test]
    fn test_experimental_heading_in_help() {
        let mut cmd = Cli::command();
        let help = cmd.render_help().to_string();
        assert!(help.contains("Options (experimental)"));
        assert!(help.contains("--enable-inf-stone-time"));
        assert!(help.contains("Rebalance your open-source project"));
    }

    #[test]
    fn test_version_flags() {
        for flag in ["-v", "-V", "--version"] {
            let err = Cli::try_parse_from(["git-thanos", flag]).unwrap_err();
            assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion, "{flag}");
        }
    }

    #[test]
    fn test_interrupt_exit_code() {
        let interrupted = anyhow::Error::from(CoreError::Interrupted);
        assert_eq!(exit_status(&interrupted), 130);

        let other = anyhow::anyhow!("Unauthorized (401)");
        assert_eq!(exit_status(&other), 1);
    }

    #[test]
    fn test_config_level_applies_after_load() {
        let (log, subscriber) = build_subscriber(None);
        tracing::subscriber::with_default(subscriber, || {
            assert!(tracing::enabled!(tracing::Level::WARN));
            assert!(!tracing::enabled!(tracing::Level::INFO));
            log.apply_config_level("debug").unwrap();
            assert!(tracing::enabled!(tracing::Level::DEBUG));
        });
    }

    #[test]
    fn test_rust_log_wins_over_config_level() {
        let (log, subscriber) = build_subscriber(Some("info"));
        tracing::subscriber::with_default(subscriber, || {
            assert!(tracing::enabled!(tracing::Level::INFO));
            log.apply_config_level("trace").unwrap();
            assert!(!tracing::enabled!(tracing::Level::DEBUG));
        });
    }

    #[test]
    fn test_explicit_config_must_exist() {
        let err = load_config(Some(Path::new("/nonexistent/thanos.toml"))).unwrap_err();
        assert!(format!("{:#}", err).contains("configuration file not found"));
    }

    #[test]
    fn test_explicit_config_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("thanos.toml");
        std::fs::write(&path, "[selection]\nrival_pattern = \"Grace Hopper\"\n").unwrap();
        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.selection.rival_pattern, "Grace Hopper");
        assert_eq!(config.selection.tyrant_pattern, "Thanos");
    }
}
