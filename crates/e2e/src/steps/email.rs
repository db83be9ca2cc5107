use async_trait::async_trait;
use onboard_common::Candidates;
use tracing::{debug, info};

use super::{Step, StepContext, StepOutcome, DRY_RUN};
use crate::actions::Actions;
use crate::driver::KEY_TAB;
use crate::error::{E2eError, E2eResult};
use crate::pages::auth::{code, email};
use crate::pages::landing;
use crate::resolver::Requirement;

/// Step 2: email validation, then submit a valid address
pub struct EmailEntry;

#[async_trait]
impl Step for EmailEntry {
    fn name(&self) -> &'static str {
        "Email"
    }

    fn slug(&self) -> &'static str {
        "email"
    }

    async fn run(&self, ctx: &StepContext<'_>) -> E2eResult<StepOutcome> {
        if ctx.dry_run() {
            return Ok(StepOutcome::Skipped(DRY_RUN.to_string()));
        }

        let actions = ctx.actions();
        landing::open(&actions, ctx.config).await?;
        open_email_form(&actions).await?;

        for invalid in &ctx.fixtures.email_invalids {
            fill_email(&actions, invalid).await?;
            expect_rejected(&actions, invalid).await?;
            debug!("Email {:?} rejected", invalid);
        }

        submit_email(&actions, &ctx.fixtures.email_valid).await?;
        info!("Email accepted, code entry shown");
        Ok(StepOutcome::Completed)
    }
}

/// Click Start until the email field shows up, retrying once
async fn open_email_form(actions: &Actions<'_>) -> E2eResult<()> {
    let start = landing::start_button();
    let input = email::input();
    let timeout = actions.timeouts().default_timeout();

    actions.click(&start).await?;
    if actions
        .locate(&input, Requirement::Visible, timeout)
        .await
        .is_ok()
    {
        return Ok(());
    }

    debug!("Email field did not appear, clicking Start again");
    actions.click(&start).await?;
    actions.locate(&input, Requirement::Visible, timeout).await?;
    Ok(())
}

/// Replace the field content and blur it so validation runs
pub(crate) async fn fill_email(actions: &Actions<'_>, address: &str) -> E2eResult<()> {
    let input = email::input();
    if let Err(e) = actions.scroll_into_view(&input).await {
        debug!("Could not scroll email field into view: {}", e);
    }
    actions.type_text(&input, address, true).await?;
    actions.press_key(&input, KEY_TAB).await
}

/// Continue disabled, or an error shown, within the probe window
pub(crate) async fn expect_rejected(actions: &Actions<'_>, address: &str) -> E2eResult<()> {
    let next = email::continue_button();
    let error = email::error_text();
    blocked(actions, &next, &error)
        .await
        .map_err(|e| {
            if e.is_miss() {
                E2eError::assertion(format!("validation did not block email {:?}", address))
            } else {
                e
            }
        })
}

/// Enter a valid address, wait for Continue, submit and wait for the code field
pub(crate) async fn submit_email(actions: &Actions<'_>, address: &str) -> E2eResult<()> {
    let next = email::continue_button();
    fill_email(actions, address).await?;

    let next_ref = &next;
    actions
        .wait(actions.timeouts().default_timeout())
        .until_true("email continue enabled", || async move {
            actions.enabled_now(next_ref).await
        })
        .await?;
    actions.click(&next).await?;

    actions
        .locate(&code::inputs(), Requirement::Present, actions.timeouts().page_load())
        .await?;
    Ok(())
}

/// Wait until `next` is disabled or `error` is visible
pub(crate) async fn blocked(
    actions: &Actions<'_>,
    next: &Candidates,
    error: &Candidates,
) -> E2eResult<()> {
    actions
        .wait(actions.timeouts().probe())
        .until_true(&format!("{} blocked", next.control), || async move {
            Ok(!actions.enabled_now(next).await? || actions.visible_now(error).await?)
        })
        .await
}
