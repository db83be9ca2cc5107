//! Browser driver collaborator
//!
//! The interaction layer never talks to a concrete client. Everything goes
//! through [`Driver`], which the WebDriver session implements for real runs
//! and which tests implement with an in-memory document.

use async_trait::async_trait;
use onboard_common::Locator;
use serde::{Deserialize, Serialize};

use crate::error::E2eResult;

/// WebDriver key code point for Tab, used to blur an input
pub const KEY_TAB: &str = "\u{E004}";

/// Opaque reference to a located DOM node.
///
/// Only meaningful inside the document context it was resolved in; never
/// kept across waits or navigation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ElementHandle(String);

impl ElementHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn id(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ElementHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "element#{}", self.0)
    }
}

/// An already configured browser session.
///
/// Frame switching mutates session state: after `enter_frame` every lookup
/// runs inside that frame until the context is changed again.
#[async_trait]
pub trait Driver: Send + Sync {
    async fn goto(&self, url: &str) -> E2eResult<()>;

    async fn current_url(&self) -> E2eResult<String>;

    /// Rendered markup of the current document
    async fn page_source(&self) -> E2eResult<String>;

    /// PNG screenshot of the viewport
    async fn screenshot(&self) -> E2eResult<Vec<u8>>;

    /// All matches in the current document context; empty when none match
    async fn find_all(&self, locator: &Locator) -> E2eResult<Vec<ElementHandle>>;

    /// All matches below `parent`
    async fn find_within(
        &self,
        parent: &ElementHandle,
        locator: &Locator,
    ) -> E2eResult<Vec<ElementHandle>>;

    /// Native pointer click
    async fn click(&self, element: &ElementHandle) -> E2eResult<()>;

    async fn clear(&self, element: &ElementHandle) -> E2eResult<()>;

    async fn send_keys(&self, element: &ElementHandle, text: &str) -> E2eResult<()>;

    /// Visible text of the element
    async fn text(&self, element: &ElementHandle) -> E2eResult<String>;

    async fn attr(&self, element: &ElementHandle, name: &str) -> E2eResult<Option<String>>;

    async fn is_displayed(&self, element: &ElementHandle) -> E2eResult<bool>;

    async fn is_enabled(&self, element: &ElementHandle) -> E2eResult<bool>;

    /// Run `script` with `args` bound to `arguments[0..]`
    async fn execute(
        &self,
        script: &str,
        args: &[ElementHandle],
    ) -> E2eResult<serde_json::Value>;

    /// Switch into the `index`-th frame of the current document
    async fn enter_frame(&self, index: u16) -> E2eResult<()>;

    async fn enter_parent_frame(&self) -> E2eResult<()>;

    async fn enter_default_content(&self) -> E2eResult<()>;

    /// End the browser session
    async fn quit(&self) -> E2eResult<()>;
}
