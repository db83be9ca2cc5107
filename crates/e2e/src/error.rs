//! Error types for the interaction layer and the wizard run

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum E2eError {
    #[error("Element not found: {control} (no match for {candidates} candidate locator(s))")]
    ElementNotFound { control: String, candidates: usize },

    #[error("Option not found in overlay or document: {label:?}")]
    OptionNotFound { label: String },

    #[error("Timeout after {} ms waiting for: {condition}{}", .elapsed.as_millis(), last_error_suffix(.last_error))]
    Timeout {
        condition: String,
        elapsed: Duration,
        last_error: Option<String>,
    },

    #[error("Assertion failed: {0}")]
    Assertion(String),

    #[error("Driver error: {0}")]
    Driver(String),

    #[error("Session error: {0}")]
    Session(String),

    #[error("Step panicked: {0}")]
    Panic(String),

    #[error("Configuration error: {0}")]
    Config(#[from] onboard_common::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

fn last_error_suffix(last_error: &Option<String>) -> String {
    match last_error {
        Some(e) => format!(" (last error: {})", e),
        None => String::new(),
    }
}

impl From<fantoccini::error::CmdError> for E2eError {
    fn from(e: fantoccini::error::CmdError) -> Self {
        E2eError::Driver(e.to_string())
    }
}

impl From<fantoccini::error::NewSessionError> for E2eError {
    fn from(e: fantoccini::error::NewSessionError) -> Self {
        E2eError::Session(e.to_string())
    }
}

impl E2eError {
    pub fn assertion(message: impl Into<String>) -> Self {
        E2eError::Assertion(message.into())
    }

    pub fn driver(message: impl Into<String>) -> Self {
        E2eError::Driver(message.into())
    }

    /// Reporting class of this failure
    pub fn kind(&self) -> FailureKind {
        match self {
            E2eError::Assertion(_)
            | E2eError::ElementNotFound { .. }
            | E2eError::OptionNotFound { .. } => FailureKind::Assertion,
            E2eError::Timeout { .. } => FailureKind::Timeout,
            _ => FailureKind::Unexpected,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, E2eError::Timeout { .. })
    }

    /// Expected UI was not there, as opposed to the session misbehaving
    pub fn is_miss(&self) -> bool {
        matches!(
            self,
            E2eError::ElementNotFound { .. }
                | E2eError::OptionNotFound { .. }
                | E2eError::Timeout { .. }
        )
    }
}

/// Terminal failure classes of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    Assertion,
    Timeout,
    Unexpected,
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailureKind::Assertion => write!(f, "assertion"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Unexpected => write!(f, "unexpected"),
        }
    }
}

pub type E2eResult<T> = Result<T, E2eError>;
