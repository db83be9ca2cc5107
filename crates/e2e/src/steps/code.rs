use async_trait::async_trait;
use tracing::{debug, info};

use super::email::submit_email;
use super::{Step, StepContext, StepOutcome, DRY_RUN};
use crate::actions::{Actions, Presence};
use crate::error::{E2eError, E2eResult};
use crate::pages::auth::{code, email, workspace};
use crate::resolver::Requirement;

/// Step 3: confirmation code negatives, optional Back, then the valid code
pub struct ConfirmationCode;

#[async_trait]
impl Step for ConfirmationCode {
    fn name(&self) -> &'static str {
        "Confirmation code"
    }

    fn slug(&self) -> &'static str {
        "code"
    }

    async fn run(&self, ctx: &StepContext<'_>) -> E2eResult<StepOutcome> {
        if ctx.dry_run() {
            return Ok(StepOutcome::Skipped(DRY_RUN.to_string()));
        }

        let actions = ctx.actions();
        actions
            .locate(&code::inputs(), Requirement::Present, actions.timeouts().default_timeout())
            .await?;

        // Negatives are best effort: the fields may be replaced while typing.
        for invalid in &ctx.fixtures.code_invalids {
            if let Err(e) = enter_code(&actions, invalid).await {
                debug!("Stopping invalid codes at {:?}: {}", invalid, e);
                break;
            }
        }

        let back = actions
            .click_if_present(&code::back_button(), actions.timeouts().probe())
            .await?;
        if back == Presence::Found {
            info!("Back from code entry, re-submitting email");
            actions
                .locate(&email::input(), Requirement::Visible, actions.timeouts().default_timeout())
                .await?;
            submit_email(&actions, &ctx.fixtures.email_valid).await?;
        }

        enter_code(&actions, &ctx.fixtures.code_valid).await?;
        reach_workspace(&actions).await?;
        info!("Code accepted, workspace page reached");
        Ok(StepOutcome::Completed)
    }
}

/// Type `value` into a single code field or spread it over per-digit fields
async fn enter_code(actions: &Actions<'_>, value: &str) -> E2eResult<()> {
    let located = actions
        .locate(&code::inputs(), Requirement::Visible, actions.timeouts().probe())
        .await?;
    let driver = actions.driver();

    actions
        .within(&located, async {
            if let [single] = located.elements.as_slice() {
                driver.clear(single).await?;
                return driver.send_keys(single, value).await;
            }
            for (field, digit) in located.elements.iter().zip(value.chars()) {
                driver.clear(field).await?;
                driver.send_keys(field, &digit.to_string()).await?;
            }
            Ok(())
        })
        .await
}

/// Wait for the workspace page, clicking Continue once if it does not auto-advance
async fn reach_workspace(actions: &Actions<'_>) -> E2eResult<()> {
    let timeout = actions.timeouts().default_timeout();
    if on_workspace_page(actions, timeout).await.is_ok() {
        return Ok(());
    }

    debug!("No auto-advance after code, trying Continue");
    actions
        .click_if_present(&code::continue_button(), actions.timeouts().probe())
        .await?;
    on_workspace_page(actions, timeout).await.map_err(|e| {
        if e.is_miss() {
            E2eError::assertion(format!("workspace page not reached after code entry: {}", e))
        } else {
            e
        }
    })
}

async fn on_workspace_page(actions: &Actions<'_>, timeout: std::time::Duration) -> E2eResult<()> {
    let input = workspace::name_input();
    let input = &input;
    let driver = actions.driver();

    actions
        .wait(timeout)
        .until_true("workspace page", || async move {
            if actions.visible_now(input).await? {
                return Ok(true);
            }
            Ok(driver.current_url().await?.contains(workspace::URL_MARKER))
        })
        .await
}
