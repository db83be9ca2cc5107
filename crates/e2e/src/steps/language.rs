use async_trait::async_trait;
use tracing::{info, warn};

use super::{Step, StepContext, StepOutcome, DRY_RUN};
use crate::actions::Actions;
use crate::error::{E2eError, E2eResult};
use crate::menu::OverlayMenu;
use crate::pages::landing;

/// Menu label and locale path, in switching order
const LANGUAGES: [(&str, &str); 2] = [("English", "en"), ("Русский", "ru")];

/// Step 1: switch the landing page to English and back to Russian.
///
/// A switch counts once the trigger label or the URL changed. When the menu
/// path fails the locale URL is loaded instead and checked the same way.
pub struct LanguageSwitch;

#[async_trait]
impl Step for LanguageSwitch {
    fn name(&self) -> &'static str {
        "Language switch"
    }

    fn slug(&self) -> &'static str {
        "language"
    }

    async fn run(&self, ctx: &StepContext<'_>) -> E2eResult<StepOutcome> {
        if ctx.dry_run() {
            return Ok(StepOutcome::Skipped(DRY_RUN.to_string()));
        }

        let actions = ctx.actions();
        landing::open(&actions, ctx.config).await?;

        let menu = landing::language_menu();
        let has_trigger = actions.exists(&menu.trigger, None).await?;
        if !has_trigger {
            warn!("{} not found, switching by locale URL", menu.trigger.control);
        }

        for (label, locale) in LANGUAGES {
            switch_to(ctx, &actions, &menu, has_trigger, label, locale).await?;
        }
        Ok(StepOutcome::Completed)
    }
}

async fn switch_to(
    ctx: &StepContext<'_>,
    actions: &Actions<'_>,
    menu: &OverlayMenu,
    has_trigger: bool,
    label: &str,
    locale: &str,
) -> E2eResult<()> {
    let before_label = menu.trigger_label(actions).await.unwrap_or_default();
    let before_url = actions.driver().current_url().await?;
    info!("Switching language to {} (current label {:?})", label, before_label);

    let via_menu = async {
        if !has_trigger {
            return Err(E2eError::ElementNotFound {
                control: menu.trigger.control.clone(),
                candidates: menu.trigger.len(),
            });
        }
        menu.open(actions).await?;
        menu.select_by_text(actions, label).await?;
        wait_for_switch(actions, menu, label, &before_label, &before_url).await
    }
    .await;

    match via_menu {
        Ok(()) => {
            info!("Switched to {} via menu", label);
            Ok(())
        }
        Err(e) => {
            warn!("Menu switch to {} failed ({}), loading /{}", label, e, locale);
            actions.driver().goto(&ctx.config.url_for(locale)).await?;
            wait_for_switch(actions, menu, label, &before_label, &before_url).await?;
            info!("Switched to {} via /{}", label, locale);
            Ok(())
        }
    }
}

/// Wait until the trigger label or the URL differs from before
async fn wait_for_switch(
    actions: &Actions<'_>,
    menu: &OverlayMenu,
    label: &str,
    before_label: &str,
    before_url: &str,
) -> E2eResult<()> {
    let driver = actions.driver();
    actions
        .wait(actions.timeouts().default_timeout())
        .until_true(&format!("language switch to {}", label), || async move {
            let current = menu.trigger_label(actions).await.unwrap_or_default();
            if !current.is_empty() && current != before_label {
                return Ok(true);
            }
            Ok(driver.current_url().await? != before_url)
        })
        .await
}
