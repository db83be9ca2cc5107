//! W3C WebDriver session backed by fantoccini

use async_trait::async_trait;
use fantoccini::elements::{Element, ElementRef};
use fantoccini::{Client, ClientBuilder};
use onboard_common::{By, Locator, RunConfig};
use serde_json::json;
use tracing::{debug, info};

use crate::driver::{Driver, ElementHandle};
use crate::error::E2eResult;

/// W3C key under which element references travel in script arguments
const WEB_ELEMENT_KEY: &str = "element-6066-11e4-a52e-4f735466cecf";

/// Live browser session
pub struct WebDriverSession {
    client: Client,
}

impl WebDriverSession {
    /// Open a Chrome session on the configured WebDriver endpoint
    pub async fn connect(config: &RunConfig) -> E2eResult<Self> {
        info!(
            "Connecting to WebDriver at {} (headless: {})",
            config.webdriver_url, config.headless
        );

        let client = ClientBuilder::native()
            .capabilities(chrome_capabilities(config))
            .connect(&config.webdriver_url)
            .await?;

        debug!("WebDriver session established");
        Ok(Self { client })
    }

    fn element(&self, handle: &ElementHandle) -> Element {
        Element::from_element_id(self.client.clone(), ElementRef::from(handle.id().to_string()))
    }
}

fn chrome_capabilities(config: &RunConfig) -> serde_json::Map<String, serde_json::Value> {
    let mut args = Vec::new();
    if config.headless {
        args.push("--headless=new".to_string());
    }
    args.push(format!(
        "--window-size={},{}",
        config.window_width, config.window_height
    ));
    args.push("--no-sandbox".to_string());
    args.push("--disable-dev-shm-usage".to_string());
    args.push("--disable-gpu".to_string());

    let mut caps = serde_json::Map::new();
    caps.insert("browserName".to_string(), json!("chrome"));
    caps.insert("goog:chromeOptions".to_string(), json!({ "args": args }));
    caps
}

fn to_locator(locator: &Locator) -> fantoccini::Locator<'_> {
    match locator.by {
        By::Css => fantoccini::Locator::Css(&locator.expr),
        By::XPath => fantoccini::Locator::XPath(&locator.expr),
    }
}

fn to_handles(elements: Vec<Element>) -> Vec<ElementHandle> {
    elements
        .iter()
        .map(|e| ElementHandle::new(e.element_id().to_string()))
        .collect()
}

#[async_trait]
impl Driver for WebDriverSession {
    async fn goto(&self, url: &str) -> E2eResult<()> {
        debug!("Navigating to {}", url);
        self.client.goto(url).await?;
        Ok(())
    }

    async fn current_url(&self) -> E2eResult<String> {
        Ok(self.client.current_url().await?.to_string())
    }

    async fn page_source(&self) -> E2eResult<String> {
        Ok(self.client.source().await?)
    }

    async fn screenshot(&self) -> E2eResult<Vec<u8>> {
        Ok(self.client.screenshot().await?)
    }

    async fn find_all(&self, locator: &Locator) -> E2eResult<Vec<ElementHandle>> {
        let elements = self.client.find_all(to_locator(locator)).await?;
        Ok(to_handles(elements))
    }

    async fn find_within(
        &self,
        parent: &ElementHandle,
        locator: &Locator,
    ) -> E2eResult<Vec<ElementHandle>> {
        let elements = self.element(parent).find_all(to_locator(locator)).await?;
        Ok(to_handles(elements))
    }

    async fn click(&self, element: &ElementHandle) -> E2eResult<()> {
        self.element(element).click().await?;
        Ok(())
    }

    async fn clear(&self, element: &ElementHandle) -> E2eResult<()> {
        self.element(element).clear().await?;
        Ok(())
    }

    async fn send_keys(&self, element: &ElementHandle, text: &str) -> E2eResult<()> {
        self.element(element).send_keys(text).await?;
        Ok(())
    }

    async fn text(&self, element: &ElementHandle) -> E2eResult<String> {
        Ok(self.element(element).text().await?)
    }

    async fn attr(&self, element: &ElementHandle, name: &str) -> E2eResult<Option<String>> {
        Ok(self.element(element).attr(name).await?)
    }

    async fn is_displayed(&self, element: &ElementHandle) -> E2eResult<bool> {
        Ok(self.element(element).is_displayed().await?)
    }

    async fn is_enabled(&self, element: &ElementHandle) -> E2eResult<bool> {
        Ok(self.element(element).is_enabled().await?)
    }

    async fn execute(
        &self,
        script: &str,
        args: &[ElementHandle],
    ) -> E2eResult<serde_json::Value> {
        let args = args
            .iter()
            .map(|h| json!({ WEB_ELEMENT_KEY: h.id() }))
            .collect();
        Ok(self.client.execute(script, args).await?)
    }

    async fn enter_frame(&self, index: u16) -> E2eResult<()> {
        self.client.enter_frame(Some(index)).await?;
        Ok(())
    }

    async fn enter_parent_frame(&self) -> E2eResult<()> {
        self.client.enter_parent_frame().await?;
        Ok(())
    }

    async fn enter_default_content(&self) -> E2eResult<()> {
        self.client.enter_frame(None).await?;
        Ok(())
    }

    async fn quit(&self) -> E2eResult<()> {
        info!("Closing WebDriver session");
        self.client.clone().close().await?;
        Ok(())
    }
}
