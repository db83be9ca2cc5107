use async_trait::async_trait;
use tracing::{debug, info};

use super::email::blocked;
use super::{Step, StepContext, StepOutcome, DRY_RUN};
use crate::driver::KEY_TAB;
use crate::error::{E2eError, E2eResult};
use crate::pages::auth::workspace;
use crate::resolver::Requirement;

/// Step 4: the workspace name field is on screen and usable
pub struct WorkspaceOpened;

#[async_trait]
impl Step for WorkspaceOpened {
    fn name(&self) -> &'static str {
        "Workspace page"
    }

    fn slug(&self) -> &'static str {
        "workspace-open"
    }

    async fn run(&self, ctx: &StepContext<'_>) -> E2eResult<StepOutcome> {
        if ctx.dry_run() {
            return Ok(StepOutcome::Skipped(DRY_RUN.to_string()));
        }

        let actions = ctx.actions();
        actions
            .locate(
                &workspace::name_input(),
                Requirement::Clickable,
                actions.timeouts().default_timeout(),
            )
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    E2eError::assertion(format!("workspace name input not visible: {}", e))
                } else {
                    e
                }
            })?;
        Ok(StepOutcome::Completed)
    }
}

/// Step 5: invalid names block Next, a valid one enables it
pub struct WorkspaceName;

#[async_trait]
impl Step for WorkspaceName {
    fn name(&self) -> &'static str {
        "Workspace name"
    }

    fn slug(&self) -> &'static str {
        "workspace-name"
    }

    async fn run(&self, ctx: &StepContext<'_>) -> E2eResult<StepOutcome> {
        if ctx.dry_run() {
            return Ok(StepOutcome::Skipped(DRY_RUN.to_string()));
        }

        let actions = ctx.actions();
        let input = workspace::name_input();
        let next = workspace::next_button();
        let error = workspace::error_indicator();

        for invalid in &ctx.fixtures.workspace_name_invalids {
            actions.type_text(&input, invalid, true).await?;
            actions.press_key(&input, KEY_TAB).await?;
            blocked(&actions, &next, &error).await.map_err(|e| {
                if e.is_miss() {
                    E2eError::assertion(format!("workspace name {:?} was accepted", invalid))
                } else {
                    e
                }
            })?;
            debug!("Workspace name {:?} rejected", invalid);
        }

        let back = actions
            .click_if_present(&workspace::back_button(), actions.timeouts().probe())
            .await?;
        if back.is_found() {
            debug!("Workspace Back control exercised");
        }

        actions
            .type_text(&input, &ctx.fixtures.workspace_name_valid, true)
            .await?;
        actions.press_key(&input, KEY_TAB).await?;

        let (executor, next_ref) = (&actions, &next);
        actions
            .wait(actions.timeouts().default_timeout())
            .until_true("workspace next enabled", || async move {
                executor.enabled_now(next_ref).await
            })
            .await?;
        actions.click(&next).await?;

        info!("Workspace {:?} submitted", ctx.fixtures.workspace_name_valid);
        Ok(StepOutcome::Completed)
    }
}
