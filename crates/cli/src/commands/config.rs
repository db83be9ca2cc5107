//! Effective configuration

use anyhow::{Context, Result};
use clap::Args;
use onboard_common::RunConfig;
use std::path::PathBuf;

use crate::output::{print_success, OutputFormat};

#[derive(Args)]
pub struct ConfigArgs {
    /// Also write the effective configuration to this file
    #[arg(long)]
    pub write: Option<PathBuf>,
}

/// Effective configuration; TOML unless a machine format was asked for
pub fn render(config: &RunConfig, format: OutputFormat) -> Result<String> {
    Ok(match format {
        OutputFormat::Json => serde_json::to_string_pretty(config)?,
        OutputFormat::Yaml => serde_yaml::to_string(config)?,
        OutputFormat::Table | OutputFormat::Plain => toml::to_string_pretty(config)?,
    })
}

pub fn execute(args: ConfigArgs, config: &RunConfig, format: OutputFormat) -> Result<()> {
    println!("{}", render(config, format)?);

    if let Some(path) = args.write {
        config
            .save(&path)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        print_success(&format!("Configuration written to {}", path.display()));
    }
    Ok(())
}
