use async_trait::async_trait;
use tracing::{debug, info};

use super::{Step, StepContext, StepOutcome, DRY_RUN};
use crate::error::{E2eError, E2eResult};
use crate::pages::onboarding::{birthdate, profile};

/// Step 6: avatar (when the asset exists), first and last name
pub struct Profile;

#[async_trait]
impl Step for Profile {
    fn name(&self) -> &'static str {
        "Profile"
    }

    fn slug(&self) -> &'static str {
        "profile"
    }

    async fn run(&self, ctx: &StepContext<'_>) -> E2eResult<StepOutcome> {
        if ctx.dry_run() {
            return Ok(StepOutcome::Skipped(DRY_RUN.to_string()));
        }

        let actions = ctx.actions();
        let avatar = ctx.config.avatar_path();
        if avatar.exists() {
            let absolute = std::fs::canonicalize(&avatar)?;
            actions.upload_file(&profile::avatar_input(), &absolute).await?;
            debug!("Uploaded avatar {}", absolute.display());
        } else {
            debug!("No avatar at {}, skipping upload", avatar.display());
        }

        actions
            .type_text(&profile::first_name(), &ctx.fixtures.first_name, true)
            .await?;
        actions
            .type_text(&profile::last_name(), &ctx.fixtures.last_name, true)
            .await?;

        let next = profile::continue_button();
        if !actions.is_enabled(&next).await? {
            return Err(E2eError::assertion(
                "profile Continue must be enabled after filling names",
            ));
        }
        actions.click(&next).await?;

        info!("Profile filled for {}", ctx.fixtures.full_name());
        Ok(StepOutcome::Completed)
    }
}

/// Step 7: day, month and year selects
pub struct Birthdate;

#[async_trait]
impl Step for Birthdate {
    fn name(&self) -> &'static str {
        "Birthdate"
    }

    fn slug(&self) -> &'static str {
        "birthdate"
    }

    async fn run(&self, ctx: &StepContext<'_>) -> E2eResult<StepOutcome> {
        if ctx.dry_run() {
            return Ok(StepOutcome::Skipped(DRY_RUN.to_string()));
        }

        let actions = ctx.actions();
        let data = ctx.fixtures;
        actions.select_option(&birthdate::day(), &data.birth_day).await?;
        actions.select_option(&birthdate::month(), &data.birth_month).await?;
        actions.select_option(&birthdate::year(), &data.birth_year).await?;
        actions.click(&birthdate::continue_button()).await?;
        Ok(StepOutcome::Completed)
    }
}
