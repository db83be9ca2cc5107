//! Locator types shared by the interaction layer and the page objects

use serde::{Deserialize, Serialize};

/// Element lookup strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum By {
    Css,
    XPath,
}

impl std::fmt::Display for By {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            By::Css => write!(f, "css"),
            By::XPath => write!(f, "xpath"),
        }
    }
}

/// A (strategy, expression) pair identifying zero or more elements
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Locator {
    pub by: By,
    pub expr: String,
}

impl Locator {
    pub fn new(by: By, expr: impl Into<String>) -> Self {
        Self {
            by,
            expr: expr.into(),
        }
    }

    pub fn css(expr: impl Into<String>) -> Self {
        Self::new(By::Css, expr)
    }

    pub fn xpath(expr: impl Into<String>) -> Self {
        Self::new(By::XPath, expr)
    }
}

impl std::fmt::Display for Locator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}={}", self.by, self.expr)
    }
}

/// Ordered fallback list of locators for one logical UI control.
///
/// Order is the preference policy: the most specific, most stable selector
/// comes first and generic fallbacks come last. Resolution stops at the first
/// candidate that yields a usable element; candidates are never merged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidates {
    /// Human-readable control name used in logs and errors
    pub control: String,
    pub locators: Vec<Locator>,
}

impl Candidates {
    pub fn new(control: impl Into<String>) -> Self {
        Self {
            control: control.into(),
            locators: Vec::new(),
        }
    }

    /// Candidate list holding exactly one locator
    pub fn single(control: impl Into<String>, locator: Locator) -> Self {
        Self::new(control).with(locator)
    }

    pub fn with(mut self, locator: Locator) -> Self {
        self.locators.push(locator);
        self
    }

    pub fn css(self, expr: impl Into<String>) -> Self {
        self.with(Locator::css(expr))
    }

    pub fn xpath(self, expr: impl Into<String>) -> Self {
        self.with(Locator::xpath(expr))
    }

    pub fn len(&self) -> usize {
        self.locators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locators.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Locator> {
        self.locators.iter()
    }
}

impl std::fmt::Display for Candidates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({} candidate(s))", self.control, self.locators.len())
    }
}

/// Collapse runs of whitespace into single spaces and trim both ends,
/// matching XPath `normalize-space()`.
pub fn normalize_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Quote `text` as an XPath 1.0 string literal.
///
/// XPath 1.0 has no escape sequences, so text holding both quote kinds is
/// spliced together with `concat()`.
pub fn xpath_literal(text: &str) -> String {
    if !text.contains('\'') {
        return format!("'{}'", text);
    }
    if !text.contains('"') {
        return format!("\"{}\"", text);
    }

    let parts: Vec<String> = text
        .split('\'')
        .map(|part| format!("'{}'", part))
        .collect();
    format!("concat({})", parts.join(", \"'\", "))
}
