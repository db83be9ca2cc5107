//! Landing page: title, language menu, start button, cookie banner

use onboard_common::{Candidates, RunConfig};
use tracing::debug;

use crate::actions::{Actions, Presence};
use crate::error::E2eResult;
use crate::menu::OverlayMenu;
use crate::resolver::Requirement;

pub fn title() -> Candidates {
    Candidates::new("landing title").css("p.pr_slider_title")
}

pub fn language_trigger() -> Candidates {
    Candidates::new("language switch").css("button.lang-switch")
}

pub fn language_menu() -> OverlayMenu {
    OverlayMenu::context_menu(language_trigger())
}

pub fn start_button() -> Candidates {
    Candidates::new("start button")
        .xpath("//button[span[contains(normalize-space(.), 'Начать')]]")
        .xpath("//button[span[contains(normalize-space(.), 'Start')]]")
        .xpath("//button[contains(normalize-space(.), 'Начать')]")
        .xpath("//button[contains(normalize-space(.), 'Start')]")
}

pub fn cookie_accept() -> Candidates {
    Candidates::new("cookie banner accept")
        .xpath("//button[contains(., 'Принять') or contains(., 'Согласен') or contains(., 'Хорошо')]")
        .xpath("//button[contains(., 'Accept') or contains(., 'I agree') or contains(., 'Got it')]")
        .css("button.cookie-accept, button[data-testid='cookie-accept']")
}

/// Load the landing page and get the cookie banner out of the way.
///
/// Waiting for the title is best effort; a slow title only shows up later as
/// a missing control.
pub async fn open(actions: &Actions<'_>, config: &RunConfig) -> E2eResult<()> {
    actions.driver().goto(&config.base_url).await?;

    if let Err(e) = actions
        .locate(&title(), Requirement::Visible, actions.timeouts().page_load())
        .await
    {
        debug!("Landing title not visible yet: {}", e);
    }

    dismiss_cookies(actions).await?;
    Ok(())
}

pub async fn dismiss_cookies(actions: &Actions<'_>) -> E2eResult<Presence> {
    let presence = actions
        .click_if_present(&cookie_accept(), actions.timeouts().probe())
        .await?;
    if presence.is_found() {
        debug!("Cookie banner dismissed");
    }
    Ok(presence)
}
