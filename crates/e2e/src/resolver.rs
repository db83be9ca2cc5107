//! Ordered-candidate element lookup with frame traversal
//!
//! Candidates are tried strictly in order; the first one with at least one
//! element meeting the [`Requirement`] wins, with no scoring and no merging.
//! When the top document has no match the resolver can probe each iframe and
//! one nested level below it. The session is back in the top document when
//! any resolver call returns.

use onboard_common::{Candidates, Locator};
use tracing::{debug, trace};

use crate::driver::{Driver, ElementHandle};
use crate::error::{E2eError, E2eResult};
use crate::frame::{self, FramePath};

/// How far the resolver looks beyond the top document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FrameSearch {
    TopOnly,
    /// Top document, then each iframe, then one level inside each iframe
    #[default]
    Nested,
}

impl FrameSearch {
    pub fn from_flag(enabled: bool) -> Self {
        if enabled {
            FrameSearch::Nested
        } else {
            FrameSearch::TopOnly
        }
    }
}

/// Element state a match must be in to count
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    Present,
    Visible,
    /// Visible and enabled
    Clickable,
}

impl std::fmt::Display for Requirement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Requirement::Present => write!(f, "present"),
            Requirement::Visible => write!(f, "visible"),
            Requirement::Clickable => write!(f, "clickable"),
        }
    }
}

/// Winning candidate of one resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Located {
    /// Position of the winning locator in the candidate list
    pub candidate: usize,
    pub locator: Locator,
    /// Where the elements live; re-enter it before touching them
    pub frame: FramePath,
    /// Every element of the winning locator that met the requirement, in DOM order
    pub elements: Vec<ElementHandle>,
}

impl Located {
    pub fn first(&self) -> &ElementHandle {
        &self.elements[0]
    }
}

const IFRAME: &str = "iframe";

pub struct Resolver<'a> {
    driver: &'a dyn Driver,
    search: FrameSearch,
}

impl<'a> Resolver<'a> {
    pub fn new(driver: &'a dyn Driver, search: FrameSearch) -> Self {
        Self { driver, search }
    }

    /// One non-blocking resolution pass
    pub async fn find(
        &self,
        candidates: &Candidates,
        requirement: Requirement,
    ) -> E2eResult<Option<Located>> {
        if let Some(hit) = self
            .probe_context(candidates, requirement, &FramePath::top())
            .await?
        {
            return Ok(Some(hit));
        }

        if self.search == FrameSearch::TopOnly {
            return Ok(None);
        }

        let outcome = self.probe_frames(candidates, requirement).await;
        frame::reset(self.driver).await;

        if let Ok(Some(hit)) = &outcome {
            debug!("{} resolved inside {}", candidates.control, hit.frame);
        }
        outcome
    }

    /// Like [`find`](Self::find) but a miss is `ElementNotFound`
    pub async fn locate(
        &self,
        candidates: &Candidates,
        requirement: Requirement,
    ) -> E2eResult<Located> {
        self.find(candidates, requirement)
            .await?
            .ok_or_else(|| E2eError::ElementNotFound {
                control: candidates.control.clone(),
                candidates: candidates.len(),
            })
    }

    async fn probe_frames(
        &self,
        candidates: &Candidates,
        requirement: Requirement,
    ) -> E2eResult<Option<Located>> {
        let top_frames = self.frame_count().await?;

        for i in 0..top_frames {
            let outer = FramePath::top().child(i);
            if let Err(e) = self.driver.enter_frame(i).await {
                trace!("Cannot enter {}: {}", outer, e);
                frame::reset(self.driver).await;
                continue;
            }

            if let Ok(Some(hit)) = self.probe_context(candidates, requirement, &outer).await {
                return Ok(Some(hit));
            }

            let nested_frames = self.frame_count().await.unwrap_or(0);
            for j in 0..nested_frames {
                let inner = outer.child(j);
                if let Err(e) = self.driver.enter_frame(j).await {
                    trace!("Cannot enter {}: {}", inner, e);
                    continue;
                }
                if let Ok(Some(hit)) = self.probe_context(candidates, requirement, &inner).await {
                    return Ok(Some(hit));
                }
                self.driver.enter_parent_frame().await?;
            }

            self.driver.enter_default_content().await?;
        }

        Ok(None)
    }

    async fn frame_count(&self) -> E2eResult<u16> {
        let frames = self.driver.find_all(&Locator::css(IFRAME)).await?;
        Ok(frames.len().min(u16::MAX as usize) as u16)
    }

    /// Try every candidate in the current context.
    ///
    /// A failing lookup is a miss for that candidate. Only when every
    /// candidate failed is the last error returned.
    async fn probe_context(
        &self,
        candidates: &Candidates,
        requirement: Requirement,
        path: &FramePath,
    ) -> E2eResult<Option<Located>> {
        let mut last_error = None;
        let mut failures = 0;

        for (index, locator) in candidates.iter().enumerate() {
            let found = match self.driver.find_all(locator).await {
                Ok(found) => found,
                Err(e) => {
                    trace!("Lookup {} failed in {}: {}", locator, path, e);
                    failures += 1;
                    last_error = Some(e);
                    continue;
                }
            };

            let mut elements = Vec::with_capacity(found.len());
            for element in found {
                if meets(self.driver, &element, requirement).await {
                    elements.push(element);
                }
            }

            if !elements.is_empty() {
                trace!(
                    "{} matched candidate #{} ({}) in {}",
                    candidates.control,
                    index,
                    locator,
                    path
                );
                return Ok(Some(Located {
                    candidate: index,
                    locator: locator.clone(),
                    frame: path.clone(),
                    elements,
                }));
            }
        }

        match last_error {
            Some(e) if failures == candidates.len() => Err(e),
            _ => Ok(None),
        }
    }
}

/// Whether `element` satisfies `requirement`; state read errors count as no
pub async fn meets(driver: &dyn Driver, element: &ElementHandle, requirement: Requirement) -> bool {
    match requirement {
        Requirement::Present => true,
        Requirement::Visible => driver.is_displayed(element).await.unwrap_or(false),
        Requirement::Clickable => {
            driver.is_displayed(element).await.unwrap_or(false)
                && driver.is_enabled(element).await.unwrap_or(false)
        }
    }
}
