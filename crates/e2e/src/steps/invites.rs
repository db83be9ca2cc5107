use async_trait::async_trait;

use super::{Step, StepContext, StepOutcome, DRY_RUN};
use crate::error::E2eResult;
use crate::pages::onboarding::{domains, invite};

/// Step 8: paste invite addresses, copy the link, postpone invites
pub struct Invitations;

#[async_trait]
impl Step for Invitations {
    fn name(&self) -> &'static str {
        "Invitations"
    }

    fn slug(&self) -> &'static str {
        "invites"
    }

    async fn run(&self, ctx: &StepContext<'_>) -> E2eResult<StepOutcome> {
        if ctx.dry_run() {
            return Ok(StepOutcome::Skipped(DRY_RUN.to_string()));
        }

        let actions = ctx.actions();
        let emails = ctx.fixtures.invite_emails.join("\n");
        actions.type_text(&invite::emails(), &emails, true).await?;
        actions.click(&invite::copy_link()).await?;
        actions.click(&invite::invite_later()).await?;
        Ok(StepOutcome::Completed)
    }
}

/// Step 9: skip approved domains
pub struct ApprovedDomains;

#[async_trait]
impl Step for ApprovedDomains {
    fn name(&self) -> &'static str {
        "Approved domains"
    }

    fn slug(&self) -> &'static str {
        "approved-domains"
    }

    async fn run(&self, ctx: &StepContext<'_>) -> E2eResult<StepOutcome> {
        if ctx.dry_run() {
            return Ok(StepOutcome::Skipped(DRY_RUN.to_string()));
        }

        ctx.actions().click(&domains::skip()).await?;
        Ok(StepOutcome::Completed)
    }
}
