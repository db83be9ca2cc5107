//! Wizard run

use anyhow::Result;
use clap::Args;
use onboard_common::{RunConfig, UserData};
use onboard_e2e::{Orchestrator, RunResult};
use std::path::PathBuf;
use tracing::info;

use crate::output::{print_error, print_info, print_report, OutputFormat};

#[derive(Args)]
pub struct RunArgs {
    /// Where to write the JSON run report (defaults to the artifacts directory)
    #[arg(long)]
    pub report_dir: Option<PathBuf>,

    /// Do not write a JSON run report
    #[arg(long)]
    pub no_report: bool,
}

/// Report a run that could not start and return its exit status
pub fn setup_failed(err: &anyhow::Error) -> i32 {
    let result = RunResult::UnexpectedFailure {
        cause: format!("{:#}", err),
    };
    print_error(&format!(
        "Onboarding run not started: {}",
        result.cause().unwrap_or_default()
    ));
    result.exit_code()
}

/// Run the wizard once and return the process exit status
pub async fn execute(
    args: RunArgs,
    config: RunConfig,
    fixtures: UserData,
    format: OutputFormat,
) -> Result<i32> {
    if let Err(e) = config.validate() {
        let err = anyhow::Error::from(e).context("Invalid run configuration");
        return Ok(setup_failed(&err));
    }
    let report_dir = args
        .report_dir
        .unwrap_or_else(|| config.artifacts_dir.clone());

    info!(
        "Running onboarding wizard against {} via {}",
        config.base_url, config.webdriver_url
    );
    let orchestrator = Orchestrator::new(config, fixtures);
    let report = orchestrator.launch().await;

    print_report(&report, format);

    if !args.no_report {
        match report.write_json(&report_dir) {
            Ok(path) if format == OutputFormat::Table => {
                print_info(&format!("Report: {}", path.display()))
            }
            Ok(_) => {}
            Err(e) => print_error(&format!("Could not write run report: {}", e)),
        }
    }

    Ok(report.exit_code())
}
