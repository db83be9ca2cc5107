//! Wizard steps
//!
//! A step is a named unit of the onboarding flow. It reads fixture data and
//! configuration from the [`StepContext`] and talks to the browser only
//! through [`Actions`]. In dry mode every step returns
//! [`StepOutcome::Skipped`] before touching the driver.

use async_trait::async_trait;
use onboard_common::{RunConfig, UserData};
use parking_lot::Mutex;
use std::path::PathBuf;

use crate::actions::Actions;
use crate::diagnostics::{CaptureReport, Diagnostics};
use crate::driver::Driver;
use crate::error::E2eResult;

mod code;
mod email;
mod final_checks;
mod invites;
mod language;
mod profile;
mod workspace;

pub use code::ConfirmationCode;
pub use email::EmailEntry;
pub use final_checks::FinalChecks;
pub use invites::{ApprovedDomains, Invitations};
pub use language::LanguageSwitch;
pub use profile::{Birthdate, Profile};
pub use workspace::{WorkspaceName, WorkspaceOpened};

/// How a step finished when it did not fail
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    Completed,
    /// Nothing was done; carries the reason
    Skipped(String),
}

pub(crate) const DRY_RUN: &str = "dry run";

#[async_trait]
pub trait Step: Send + Sync {
    /// Display name
    fn name(&self) -> &'static str;

    /// Diagnostics category for failures of this step
    fn slug(&self) -> &'static str;

    async fn run(&self, ctx: &StepContext<'_>) -> E2eResult<StepOutcome>;
}

/// Everything a step may touch during one run
pub struct StepContext<'a> {
    pub driver: &'a dyn Driver,
    pub config: &'a RunConfig,
    pub fixtures: &'a UserData,
    diagnostics: &'a Diagnostics,
    artifacts: Mutex<Vec<PathBuf>>,
}

impl<'a> StepContext<'a> {
    pub fn new(
        driver: &'a dyn Driver,
        config: &'a RunConfig,
        fixtures: &'a UserData,
        diagnostics: &'a Diagnostics,
    ) -> Self {
        Self {
            driver,
            config,
            fixtures,
            diagnostics,
            artifacts: Mutex::new(Vec::new()),
        }
    }

    pub fn actions(&self) -> Actions<'a> {
        Actions::from_config(self.driver, self.config)
    }

    pub fn dry_run(&self) -> bool {
        self.config.dry_run
    }

    /// Save markup and screenshot now; paths end up in the run report
    pub async fn capture(&self, category: &str) -> CaptureReport {
        let report = self.diagnostics.capture(self.driver, category).await;
        self.artifacts.lock().extend(report.paths().cloned());
        report
    }

    /// Number of captures taken so far
    pub fn capture_count(&self) -> usize {
        self.artifacts.lock().len()
    }

    pub fn artifacts(&self) -> Vec<PathBuf> {
        self.artifacts.lock().clone()
    }
}

/// The fixed onboarding sequence
pub fn wizard() -> Vec<Box<dyn Step>> {
    vec![
        Box::new(LanguageSwitch),
        Box::new(EmailEntry),
        Box::new(ConfirmationCode),
        Box::new(WorkspaceOpened),
        Box::new(WorkspaceName),
        Box::new(Profile),
        Box::new(Birthdate),
        Box::new(Invitations),
        Box::new(ApprovedDomains),
        Box::new(FinalChecks),
    ]
}
