//! Run configuration
//!
//! A single `RunConfig` value is built once at the process edge (file, then
//! environment and flags) and handed explicitly to the orchestrator and to
//! every step. Nothing below the CLI reads the environment.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{Error, Result};

/// Default auth application URL
pub const DEFAULT_BASE_URL: &str = "https://auth.lenzaos.com";

/// Default chromedriver endpoint
pub const DEFAULT_WEBDRIVER_URL: &str = "http://localhost:9515";

/// Run configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Base URL of the application under test
    pub base_url: String,

    /// WebDriver server endpoint
    pub webdriver_url: String,

    /// Walk every step without touching the browser
    pub dry_run: bool,

    /// Run the browser without a window
    pub headless: bool,

    /// Browser window width
    pub window_width: u32,

    /// Browser window height
    pub window_height: u32,

    /// Where failure markup and screenshots are written
    pub artifacts_dir: PathBuf,

    /// Directory holding upload fixtures (avatar.png)
    pub assets_dir: PathBuf,

    /// Search iframes when a control is missing from the top document
    pub frame_search: bool,

    /// Wait budgets
    pub timeouts: TimeoutConfig,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            webdriver_url: DEFAULT_WEBDRIVER_URL.to_string(),
            dry_run: true,
            headless: true,
            window_width: 1440,
            window_height: 900,
            artifacts_dir: PathBuf::from("_artifacts"),
            assets_dir: PathBuf::from("assets"),
            frame_search: true,
            timeouts: TimeoutConfig::default(),
        }
    }
}

/// Wait budgets, in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Budget for resolving a control before acting on it
    pub default_ms: u64,

    /// Budget for non-blocking existence checks
    pub probe_ms: u64,

    /// Sleep between two evaluations of a wait condition
    pub poll_ms: u64,

    /// Budget for the landing page to render after navigation
    pub page_load_ms: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            default_ms: 10_000,
            probe_ms: 3_000,
            poll_ms: 250,
            page_load_ms: 15_000,
        }
    }
}

impl TimeoutConfig {
    pub fn default_timeout(&self) -> Duration {
        Duration::from_millis(self.default_ms)
    }

    pub fn probe(&self) -> Duration {
        Duration::from_millis(self.probe_ms)
    }

    pub fn poll(&self) -> Duration {
        Duration::from_millis(self.poll_ms)
    }

    pub fn page_load(&self) -> Duration {
        Duration::from_millis(self.page_load_ms)
    }
}

impl RunConfig {
    /// Load configuration from file, falling back to defaults when absent
    pub fn load(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Self = toml::from_str(&content)?;
            Ok(config)
        } else {
            tracing::debug!("No config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Reject settings the interaction layer cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.base_url.trim().is_empty() {
            return Err(Error::InvalidConfig("base_url must not be empty".into()));
        }
        if self.timeouts.poll_ms == 0 {
            return Err(Error::InvalidConfig(
                "timeouts.poll_ms must be greater than zero".into(),
            ));
        }
        if self.timeouts.probe_ms > self.timeouts.default_ms {
            return Err(Error::InvalidConfig(format!(
                "timeouts.probe_ms ({}) exceeds timeouts.default_ms ({})",
                self.timeouts.probe_ms, self.timeouts.default_ms
            )));
        }
        Ok(())
    }

    /// Base URL joined with a locale or route segment
    pub fn url_for(&self, segment: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            segment.trim_start_matches('/')
        )
    }

    /// Avatar used by the profile step
    pub fn avatar_path(&self) -> PathBuf {
        self.assets_dir.join("avatar.png")
    }
}

/// Parse the boolean spellings accepted for environment toggles
pub fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
