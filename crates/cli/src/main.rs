//! Onboard CLI - Main Entry Point
//!
//! Runs the LenzaOS onboarding acceptance wizard against a WebDriver server
//! and reports the outcome through the process exit status.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use onboard_common::{config::parse_flag, RunConfig, UserData};
use std::path::PathBuf;

mod commands;
mod output;

use commands::{config, run, steps};

/// Onboard CLI - resilient browser acceptance suite
#[derive(Parser)]
#[command(name = "onboard")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Run configuration file (TOML)
    #[arg(long, default_value = "onboard.toml", global = true)]
    config: PathBuf,

    /// Fixture data file with a [fixtures] table
    #[arg(long, global = true)]
    fixtures: Option<PathBuf>,

    /// Output format
    #[arg(long, default_value = "table", global = true)]
    format: output::OutputFormat,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(flatten)]
    overrides: Overrides,

    #[command(subcommand)]
    command: Commands,
}

/// Settings that may come from flags or the environment, over the file
#[derive(Args, Default)]
struct Overrides {
    /// Application under test
    #[arg(long, env = "BASE_URL", global = true)]
    base_url: Option<String>,

    /// WebDriver server endpoint
    #[arg(long, env = "WEBDRIVER_URL", global = true)]
    webdriver_url: Option<String>,

    /// Walk the steps without touching the browser
    #[arg(long, env = "DRY_RUN", value_parser = flag, global = true)]
    dry_run: Option<bool>,

    /// Run the browser without a window
    #[arg(long, env = "HEADLESS", value_parser = flag, global = true)]
    headless: Option<bool>,

    /// Where failure diagnostics are written
    #[arg(long, env = "ARTIFACTS_DIR", global = true)]
    artifacts_dir: Option<PathBuf>,
}

fn flag(value: &str) -> Result<bool, String> {
    parse_flag(value).ok_or_else(|| format!("expected a boolean, got {:?}", value))
}

impl Overrides {
    fn apply(self, mut config: RunConfig) -> RunConfig {
        if let Some(base_url) = self.base_url {
            config.base_url = base_url;
        }
        if let Some(webdriver_url) = self.webdriver_url {
            config.webdriver_url = webdriver_url;
        }
        if let Some(dry_run) = self.dry_run {
            config.dry_run = dry_run;
        }
        if let Some(headless) = self.headless {
            config.headless = headless;
        }
        if let Some(artifacts_dir) = self.artifacts_dir {
            config.artifacts_dir = artifacts_dir;
        }
        config
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Run the onboarding wizard
    Run(run::RunArgs),

    /// Show the fixed step sequence
    Steps,

    /// Show the effective configuration
    Config(config::ConfigArgs),
}

fn load_fixtures(path: Option<&PathBuf>) -> Result<UserData> {
    match path {
        Some(path) => UserData::load(path)
            .with_context(|| format!("Failed to load fixtures from {}", path.display())),
        None => Ok(UserData::default()),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let overrides = cli.overrides;
    let config = RunConfig::load(&cli.config)
        .with_context(|| format!("Failed to load {}", cli.config.display()))
        .map(|config| overrides.apply(config));

    match cli.command {
        Commands::Run(args) => {
            let prepared = config.and_then(|config| {
                let fixtures = load_fixtures(cli.fixtures.as_ref())?;
                Ok((config, fixtures))
            });
            let code = match prepared {
                Ok((config, fixtures)) => run::execute(args, config, fixtures, cli.format).await?,
                Err(e) => run::setup_failed(&e),
            };
            std::process::exit(code);
        }
        Commands::Steps => steps::execute(cli.format),
        Commands::Config(args) => config::execute(args, &config?, cli.format)?,
    }

    Ok(())
}
