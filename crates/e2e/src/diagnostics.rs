//! Failure diagnostics capture
//!
//! Persists the rendered markup and a viewport screenshot as
//! `<category>_<unix-timestamp>.{html,png}`. Every artifact is best effort:
//! a capture error is logged and never replaces the failure being diagnosed.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{info, warn};

use crate::driver::Driver;

/// Artifacts written by one capture
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureReport {
    pub html: Option<PathBuf>,
    pub screenshot: Option<PathBuf>,
}

impl CaptureReport {
    pub fn is_empty(&self) -> bool {
        self.html.is_none() && self.screenshot.is_none()
    }

    pub fn paths(&self) -> impl Iterator<Item = &PathBuf> {
        self.html.iter().chain(self.screenshot.iter())
    }
}

#[derive(Debug, Clone)]
pub struct Diagnostics {
    dir: PathBuf,
}

impl Diagnostics {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Capture markup and screenshot of the current page under `category`
    pub async fn capture(&self, driver: &dyn Driver, category: &str) -> CaptureReport {
        let mut report = CaptureReport::default();

        if let Err(e) = std::fs::create_dir_all(&self.dir) {
            warn!(
                "Cannot create diagnostics directory {}: {}",
                self.dir.display(),
                e
            );
            return report;
        }

        let stem = self.unique_stem(&slugify(category), chrono::Utc::now().timestamp());

        match driver.page_source().await {
            Ok(html) => {
                let path = self.dir.join(format!("{}.html", stem));
                match std::fs::write(&path, html) {
                    Ok(()) => report.html = Some(path),
                    Err(e) => warn!("Failed to write {}: {}", path.display(), e),
                }
            }
            Err(e) => warn!("Failed to read page source for diagnostics: {}", e),
        }

        match driver.screenshot().await {
            Ok(png) => {
                let path = self.dir.join(format!("{}.png", stem));
                match std::fs::write(&path, png) {
                    Ok(()) => report.screenshot = Some(path),
                    Err(e) => warn!("Failed to write {}: {}", path.display(), e),
                }
            }
            Err(e) => warn!("Failed to take screenshot for diagnostics: {}", e),
        }

        if !report.is_empty() {
            info!("Diagnostics saved under {} as {}", self.dir.display(), stem);
        }
        report
    }

    /// `<slug>_<ts>`, with `_<n>` appended while that stem is taken
    fn unique_stem(&self, slug: &str, timestamp: i64) -> String {
        let base = format!("{}_{}", slug, timestamp);
        let taken = |stem: &str| {
            self.dir.join(format!("{}.html", stem)).exists()
                || self.dir.join(format!("{}.png", stem)).exists()
        };

        if !taken(&base) {
            return base;
        }
        let mut n = 1;
        loop {
            let stem = format!("{}_{}", base, n);
            if !taken(&stem) {
                return stem;
            }
            n += 1;
        }
    }
}

/// Lowercase ASCII alphanumerics, everything else collapsed into `-`
pub fn slugify(category: &str) -> String {
    let mut slug = String::with_capacity(category.len());
    for c in category.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.ends_with('-') {
            slug.push('-');
        }
    }
    let slug = slug.trim_matches('-');
    if slug.is_empty() {
        "failure".to_string()
    } else {
        slug.to_string()
    }
}
