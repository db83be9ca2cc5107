//! Onboard E2E Interaction Layer
//!
//! This crate drives the onboarding wizard end to end through a WebDriver
//! session:
//! - Polls asynchronous page state with bounded waits
//! - Resolves controls from ordered candidate locators, including iframes
//! - Clicks with a programmatic fallback when the native click fails
//! - Reads transient overlay menus by option text
//! - Captures markup and screenshots when a step fails
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  Orchestrator (runner.rs)                   │
//! │    ├── owns the Driver, quits it exactly once               │
//! │    ├── Step 1..10 (steps/) over StepContext                 │
//! │    └── Diagnostics on failure -> <category>_<ts>.html/png   │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Actions (click / type_text / read_text / exists / ...)     │
//! │    ├── OverlayMenu (open / list_options / select_by_text)   │
//! │    ├── Wait (until / until_true)                            │
//! │    └── Resolver (candidates -> top, iframes, nested)        │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Driver trait                                               │
//! │    └── WebDriverSession (fantoccini)                        │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod actions;
pub mod diagnostics;
pub mod driver;
pub mod error;
pub mod frame;
pub mod menu;
pub mod pages;
pub mod resolver;
pub mod runner;
pub mod steps;
pub mod wait;
pub mod webdriver;

pub use actions::{Actions, ClickTier, Presence};
pub use diagnostics::{CaptureReport, Diagnostics};
pub use driver::{Driver, ElementHandle};
pub use error::{E2eError, E2eResult, FailureKind};
pub use frame::FramePath;
pub use menu::{MenuOption, OverlayMenu, Selection};
pub use resolver::{FrameSearch, Located, Requirement, Resolver};
pub use runner::{Orchestrator, RunReport, RunResult, RunState, StepRecord, StepStatus};
pub use steps::{Step, StepContext, StepOutcome};
pub use wait::Wait;
pub use webdriver::WebDriverSession;
