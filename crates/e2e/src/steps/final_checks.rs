use async_trait::async_trait;
use tracing::info;

use super::{Step, StepContext, StepOutcome, DRY_RUN};
use crate::error::{E2eError, E2eResult};
use crate::pages::onboarding::dashboard;

/// Step 10: the dashboard shows the profile that was just created
pub struct FinalChecks;

#[async_trait]
impl Step for FinalChecks {
    fn name(&self) -> &'static str {
        "Final checks"
    }

    fn slug(&self) -> &'static str {
        "final-checks"
    }

    async fn run(&self, ctx: &StepContext<'_>) -> E2eResult<StepOutcome> {
        if ctx.dry_run() {
            return Ok(StepOutcome::Skipped(DRY_RUN.to_string()));
        }

        let actions = ctx.actions();
        let data = ctx.fixtures;

        let name = actions.read_text(&dashboard::profile_name()).await?;
        if !(name.contains(&data.first_name) && name.contains(&data.last_name)) {
            return Err(E2eError::assertion(format!(
                "profile name mismatch: expected {:?}, dashboard shows {:?}",
                data.full_name(),
                name
            )));
        }

        let email = actions.read_text(&dashboard::profile_email()).await?;
        if email != data.email_valid {
            return Err(E2eError::assertion(format!(
                "profile email mismatch: expected {:?}, dashboard shows {:?}",
                data.email_valid, email
            )));
        }

        info!("Dashboard shows {} <{}>", name, email);
        Ok(StepOutcome::Completed)
    }
}
