//! Action executor
//!
//! Composes resolution and waiting with click, type and read operations.
//! Every operation resolves its control first (clickable for clicks, visible
//! for typing and reading) and returns only once the interaction happened or
//! its budget is spent.

use onboard_common::{normalize_text, Candidates, Locator, RunConfig, TimeoutConfig};
use std::future::Future;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

use crate::driver::{Driver, ElementHandle};
use crate::error::{E2eError, E2eResult};
use crate::frame;
use crate::resolver::{FrameSearch, Located, Requirement, Resolver};
use crate::wait::Wait;

const CLICK_SCRIPT: &str = "arguments[0].click();";
const SCROLL_SCRIPT: &str = "arguments[0].scrollIntoView({block: 'center'});";

/// Which click tier went through
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickTier {
    /// Real pointer click
    Native,
    /// `element.click()` dispatched from script after the native click failed
    Programmatic,
}

/// Outcome of an optional interaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    Found,
    Absent,
}

impl Presence {
    pub fn is_found(self) -> bool {
        self == Presence::Found
    }
}

pub struct Actions<'a> {
    driver: &'a dyn Driver,
    timeouts: TimeoutConfig,
    search: FrameSearch,
}

impl<'a> Actions<'a> {
    pub fn new(driver: &'a dyn Driver, timeouts: TimeoutConfig, search: FrameSearch) -> Self {
        Self {
            driver,
            timeouts,
            search,
        }
    }

    pub fn from_config(driver: &'a dyn Driver, config: &RunConfig) -> Self {
        Self::new(
            driver,
            config.timeouts,
            FrameSearch::from_flag(config.frame_search),
        )
    }

    pub fn driver(&self) -> &'a dyn Driver {
        self.driver
    }

    pub fn timeouts(&self) -> &TimeoutConfig {
        &self.timeouts
    }

    pub fn resolver(&self) -> Resolver<'a> {
        Resolver::new(self.driver, self.search)
    }

    /// A wait with the configured poll interval
    pub fn wait(&self, timeout: Duration) -> Wait {
        Wait::new(timeout).with_poll(self.timeouts.poll())
    }

    /// Resolve `candidates` within `timeout`
    pub async fn locate(
        &self,
        candidates: &Candidates,
        requirement: Requirement,
        timeout: Duration,
    ) -> E2eResult<Located> {
        let resolver = self.resolver();
        let condition = format!("{} {}", requirement, candidates.control);
        self.wait(timeout)
            .until(&condition, || resolver.find(candidates, requirement))
            .await
    }

    /// Run `body` in the document context of `located`
    pub async fn within<T, Fut>(&self, located: &Located, body: Fut) -> E2eResult<T>
    where
        Fut: Future<Output = E2eResult<T>>,
    {
        frame::scoped(self.driver, &located.frame, body).await
    }

    pub async fn click(&self, candidates: &Candidates) -> E2eResult<ClickTier> {
        self.click_within(candidates, self.timeouts.default_timeout())
            .await
    }

    pub async fn click_within(
        &self,
        candidates: &Candidates,
        timeout: Duration,
    ) -> E2eResult<ClickTier> {
        let located = self.locate(candidates, Requirement::Clickable, timeout).await?;
        let tier = self.within(&located, self.click_element(located.first())).await?;
        debug!("Clicked {} ({:?})", candidates.control, tier);
        Ok(tier)
    }

    /// Click when the control shows up within `timeout`, otherwise report it absent
    pub async fn click_if_present(
        &self,
        candidates: &Candidates,
        timeout: Duration,
    ) -> E2eResult<Presence> {
        match self.click_within(candidates, timeout).await {
            Ok(_) => Ok(Presence::Found),
            Err(e) if e.is_timeout() => {
                debug!("{} not present, skipping", candidates.control);
                Ok(Presence::Absent)
            }
            Err(e) => Err(e),
        }
    }

    /// Two-tier click on an element of the current context.
    ///
    /// The programmatic dispatch runs only after the native click failed.
    pub async fn click_element(&self, element: &ElementHandle) -> E2eResult<ClickTier> {
        match self.driver.click(element).await {
            Ok(()) => Ok(ClickTier::Native),
            Err(native) => {
                debug!(
                    "Native click on {} failed ({}), dispatching from script",
                    element, native
                );
                self.driver
                    .execute(CLICK_SCRIPT, std::slice::from_ref(element))
                    .await
                    .map_err(|e| {
                        E2eError::Driver(format!(
                            "native click failed ({}), programmatic click failed ({})",
                            native, e
                        ))
                    })?;
                Ok(ClickTier::Programmatic)
            }
        }
    }

    /// Type into a visible field, clearing it first when asked
    pub async fn type_text(
        &self,
        candidates: &Candidates,
        text: &str,
        clear_first: bool,
    ) -> E2eResult<()> {
        let located = self
            .locate(candidates, Requirement::Visible, self.timeouts.default_timeout())
            .await?;
        let element = located.first();
        self.within(&located, async {
            if clear_first {
                self.driver.clear(element).await?;
            }
            self.driver.send_keys(element, text).await
        })
        .await
    }

    /// Trimmed visible text of the control
    pub async fn read_text(&self, candidates: &Candidates) -> E2eResult<String> {
        let located = self
            .locate(candidates, Requirement::Visible, self.timeouts.default_timeout())
            .await?;
        let text = self
            .within(&located, self.driver.text(located.first()))
            .await?;
        Ok(text.trim().to_string())
    }

    /// Whether the control appears within `timeout` (the probe budget when `None`)
    pub async fn exists(
        &self,
        candidates: &Candidates,
        timeout: Option<Duration>,
    ) -> E2eResult<bool> {
        let timeout = timeout.unwrap_or_else(|| self.timeouts.probe());
        match self.locate(candidates, Requirement::Present, timeout).await {
            Ok(_) => Ok(true),
            Err(e) if e.is_timeout() => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Wait for the control to be visible, then report whether it is enabled.
    ///
    /// A control that never becomes visible is reported as disabled.
    pub async fn is_enabled(&self, candidates: &Candidates) -> E2eResult<bool> {
        match self
            .locate(candidates, Requirement::Visible, self.timeouts.default_timeout())
            .await
        {
            Ok(located) => {
                self.within(&located, async { Ok(self.element_enabled(located.first()).await) })
                    .await
            }
            Err(e) if e.is_timeout() => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Single-pass enabled check for use inside other wait conditions
    pub async fn enabled_now(&self, candidates: &Candidates) -> E2eResult<bool> {
        match self.resolver().find(candidates, Requirement::Visible).await? {
            Some(located) => {
                self.within(&located, async { Ok(self.element_enabled(located.first()).await) })
                    .await
            }
            None => Ok(false),
        }
    }

    /// Single-pass visibility check for use inside other wait conditions
    pub async fn visible_now(&self, candidates: &Candidates) -> E2eResult<bool> {
        Ok(self
            .resolver()
            .find(candidates, Requirement::Visible)
            .await?
            .is_some())
    }

    /// Enabled per WebDriver, without a `disabled` class or `aria-disabled="true"`
    pub async fn element_enabled(&self, element: &ElementHandle) -> bool {
        if !self.driver.is_enabled(element).await.unwrap_or(false) {
            return false;
        }
        let class = self
            .driver
            .attr(element, "class")
            .await
            .ok()
            .flatten()
            .unwrap_or_default();
        if class.contains("disabled") {
            return false;
        }
        let aria = self
            .driver
            .attr(element, "aria-disabled")
            .await
            .ok()
            .flatten();
        aria.as_deref() != Some("true")
    }

    /// Send a key (see [`crate::driver::KEY_TAB`]) to a visible control
    pub async fn press_key(&self, candidates: &Candidates, key: &str) -> E2eResult<()> {
        self.type_text(candidates, key, false).await
    }

    pub async fn scroll_into_view(&self, candidates: &Candidates) -> E2eResult<()> {
        let located = self
            .locate(candidates, Requirement::Present, self.timeouts.probe())
            .await?;
        self.within(&located, self.scroll_element(located.first()))
            .await
    }

    pub async fn scroll_element(&self, element: &ElementHandle) -> E2eResult<()> {
        self.driver
            .execute(SCROLL_SCRIPT, std::slice::from_ref(element))
            .await?;
        Ok(())
    }

    /// Pick the `<option>` whose normalized text equals `label`
    pub async fn select_option(&self, candidates: &Candidates, label: &str) -> E2eResult<()> {
        let located = self
            .locate(candidates, Requirement::Visible, self.timeouts.default_timeout())
            .await?;
        let select = located.first();
        let wanted = normalize_text(label);

        self.within(&located, async {
            let options = self
                .driver
                .find_within(select, &Locator::xpath(".//option"))
                .await?;
            for option in &options {
                let text = self.driver.text(option).await.unwrap_or_default();
                if normalize_text(&text) == wanted {
                    self.click_element(option).await?;
                    return Ok(());
                }
            }
            Err(E2eError::OptionNotFound {
                label: label.to_string(),
            })
        })
        .await
    }

    /// Hand a local file path to a file input
    pub async fn upload_file(&self, candidates: &Candidates, path: &Path) -> E2eResult<()> {
        let located = self
            .locate(candidates, Requirement::Present, self.timeouts.default_timeout())
            .await?;
        let path = path.display().to_string();
        self.within(&located, self.driver.send_keys(located.first(), &path))
            .await
    }
}
