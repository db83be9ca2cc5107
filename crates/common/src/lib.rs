//! Onboard Common Library
//!
//! Locator types, run configuration and fixture data shared by the
//! interaction layer and the CLI.

pub mod config;
pub mod error;
pub mod fixtures;
pub mod types;

// Re-export commonly used types
pub use config::{RunConfig, TimeoutConfig};
pub use error::{Error, Result};
pub use fixtures::UserData;
pub use types::*;
