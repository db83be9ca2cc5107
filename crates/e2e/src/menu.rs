//! Transient overlay menus
//!
//! An overlay is opened by a trigger control, may render inside an iframe and
//! identifies its options only by visible text. Selection first searches the
//! overlay itself, then falls back to any clickable element in the document
//! whose normalized text equals the label.

use onboard_common::{normalize_text, xpath_literal, Candidates, Locator};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::actions::{Actions, Presence};
use crate::driver::ElementHandle;
use crate::error::{E2eError, E2eResult};
use crate::resolver::{self, Located, Requirement};

/// One option as listed by [`OverlayMenu::list_options`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuOption {
    /// Position among all option titles in DOM order
    pub index: usize,
    pub text: String,
}

/// Which search found the option
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// Inside the overlay container
    Scoped,
    /// Document-wide text match
    Global,
}

#[derive(Debug, Clone)]
pub struct OverlayMenu {
    pub trigger: Candidates,
    /// List container of the open overlay
    pub container: Locator,
    /// Option title elements, relative to the container
    pub option_title: Locator,
    /// Clickable option element, relative to a title
    pub option_ancestor: Locator,
}

impl OverlayMenu {
    pub fn new(
        trigger: Candidates,
        container: Locator,
        option_title: Locator,
        option_ancestor: Locator,
    ) -> Self {
        Self {
            trigger,
            container,
            option_title,
            option_ancestor,
        }
    }

    /// Modal context menu markup used by the auth frontend
    pub fn context_menu(trigger: Candidates) -> Self {
        Self::new(
            trigger,
            Locator::css(".context-menu.context-menu--modal .context-menu__list"),
            Locator::css(".context-menu__option .list-item__title"),
            Locator::xpath("ancestor::*[contains(@class,'context-menu__option')][1]"),
        )
    }

    fn container_candidates(&self) -> Candidates {
        Candidates::single(format!("{} menu", self.trigger.control), self.container.clone())
    }

    /// Current trigger text, empty when the trigger is not visible right now
    pub async fn trigger_label(&self, actions: &Actions<'_>) -> E2eResult<String> {
        match actions
            .resolver()
            .find(&self.trigger, Requirement::Visible)
            .await?
        {
            Some(located) => {
                let text = actions
                    .within(&located, actions.driver().text(located.first()))
                    .await?;
                Ok(text.trim().to_string())
            }
            None => Ok(String::new()),
        }
    }

    /// Click the trigger and wait briefly for the list container.
    ///
    /// A container that does not show up is reported, not raised.
    pub async fn open(&self, actions: &Actions<'_>) -> E2eResult<Presence> {
        actions.click(&self.trigger).await?;

        match actions
            .locate(
                &self.container_candidates(),
                Requirement::Visible,
                actions.timeouts().probe(),
            )
            .await
        {
            Ok(_) => Ok(Presence::Found),
            Err(e) if e.is_timeout() => {
                debug!("{} did not become visible after opening", self.trigger.control);
                Ok(Presence::Absent)
            }
            Err(e) => Err(e),
        }
    }

    async fn find_container(&self, actions: &Actions<'_>) -> Option<Located> {
        match actions
            .resolver()
            .find(&self.container_candidates(), Requirement::Present)
            .await
        {
            Ok(found) => found,
            Err(e) => {
                debug!("Overlay lookup failed: {}", e);
                None
            }
        }
    }

    /// Non-empty option labels in DOM order; empty when the overlay is not found
    pub async fn list_options(&self, actions: &Actions<'_>) -> E2eResult<Vec<MenuOption>> {
        let Some(located) = self.find_container(actions).await else {
            return Ok(Vec::new());
        };

        let driver = actions.driver();
        let container = located.first();
        let title = &self.option_title;

        actions
            .within(&located, async {
                let titles = actions
                    .wait(actions.timeouts().probe())
                    .until("menu option titles", || async move {
                        let found = driver.find_within(container, title).await?;
                        Ok((!found.is_empty()).then_some(found))
                    })
                    .await
                    .unwrap_or_default();

                let mut options = Vec::with_capacity(titles.len());
                for (index, element) in titles.iter().enumerate() {
                    let Ok(text) = driver.text(element).await else {
                        continue;
                    };
                    let text = text.trim();
                    if !text.is_empty() {
                        options.push(MenuOption {
                            index,
                            text: text.to_string(),
                        });
                    }
                }
                Ok(options)
            })
            .await
    }

    /// Click the option labelled `label`, overlay first, then document-wide
    pub async fn select_by_text(&self, actions: &Actions<'_>, label: &str) -> E2eResult<Selection> {
        match self.select_scoped(actions, label).await {
            Ok(true) => return Ok(Selection::Scoped),
            Ok(false) => debug!("No overlay for {:?}, trying document-wide", label),
            Err(e) => debug!("Scoped selection of {:?} failed ({}), trying document-wide", label, e),
        }

        match self.select_global(actions, label).await {
            Ok(()) => Ok(Selection::Global),
            Err(e) => {
                debug!("Document-wide selection of {:?} failed: {}", label, e);
                Err(E2eError::OptionNotFound {
                    label: label.to_string(),
                })
            }
        }
    }

    /// `Ok(false)` when the overlay container is not on the page
    async fn select_scoped(&self, actions: &Actions<'_>, label: &str) -> E2eResult<bool> {
        let Some(located) = self.find_container(actions).await else {
            return Ok(false);
        };

        let driver = actions.driver();
        let container = located.first();
        let title_locator = &self.option_title;
        let wanted = normalize_text(label);
        let wanted = wanted.as_str();
        let probe = actions.timeouts().probe();

        actions
            .within(&located, async {
                let title = actions
                    .wait(probe)
                    .until(&format!("menu option {:?}", label), || async move {
                        for title in driver.find_within(container, title_locator).await? {
                            if !driver.is_displayed(&title).await.unwrap_or(false) {
                                continue;
                            }
                            let text = driver.text(&title).await.unwrap_or_default();
                            if normalize_text(&text) == wanted {
                                return Ok(Some(title));
                            }
                        }
                        Ok(None)
                    })
                    .await?;

                let option = self.option_for(actions, title).await;
                if let Err(e) = actions.scroll_element(&option).await {
                    debug!("Scrolling {} into view failed: {}", option, e);
                }

                let target = &option;
                actions
                    .wait(probe)
                    .until_true(&format!("clickable menu option {:?}", label), || async move {
                        Ok(resolver::meets(driver, target, Requirement::Clickable).await)
                    })
                    .await?;

                actions.click_element(&option).await?;
                Ok(true)
            })
            .await
    }

    /// Clickable ancestor of an option title, or the title itself
    async fn option_for(&self, actions: &Actions<'_>, title: ElementHandle) -> ElementHandle {
        match actions
            .driver()
            .find_within(&title, &self.option_ancestor)
            .await
        {
            Ok(found) => found.into_iter().next().unwrap_or(title),
            Err(_) => title,
        }
    }

    async fn select_global(&self, actions: &Actions<'_>, label: &str) -> E2eResult<()> {
        let candidates = global_option(label);
        let located = actions
            .locate(&candidates, Requirement::Clickable, actions.timeouts().probe())
            .await?;

        actions
            .within(&located, async {
                let element = located.first();
                if let Err(e) = actions.scroll_element(element).await {
                    debug!("Scrolling {} into view failed: {}", element, e);
                }
                actions.click_element(element).await?;
                Ok(())
            })
            .await
    }
}

/// Any list item, button, link or div whose text is exactly `label`
pub fn global_option(label: &str) -> Candidates {
    let literal = xpath_literal(&normalize_text(label));
    Candidates::single(
        format!("{:?} option", label),
        Locator::xpath(format!(
            "//*[self::li or self::button or self::a or self::div][normalize-space(.)={0} or .//span[normalize-space(text())={0}]]",
            literal
        )),
    )
}
