//! Step orchestrator that owns the browser session and classifies the run

use chrono::{DateTime, Utc};
use futures::FutureExt;
use onboard_common::{RunConfig, UserData};
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::diagnostics::Diagnostics;
use crate::driver::Driver;
use crate::error::{E2eError, E2eResult, FailureKind};
use crate::steps::{self, Step, StepContext, StepOutcome};
use crate::webdriver::WebDriverSession;

/// Orchestrator state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "detail", rename_all = "snake_case")]
pub enum RunState {
    Pending,
    /// Executing the step at this index
    Running(usize),
    Succeeded,
    Failed(FailureKind),
}

/// Input to [`RunState::next`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Start,
    StepPassed,
    StepFailed(FailureKind),
}

impl RunState {
    /// Next state for a run of `total` steps.
    ///
    /// Terminal states absorb every event; events that do not apply leave the
    /// state unchanged.
    pub fn next(self, event: Transition, total: usize) -> RunState {
        match (self, event) {
            (RunState::Pending, Transition::Start) if total == 0 => RunState::Succeeded,
            (RunState::Pending, Transition::Start) => RunState::Running(0),
            (RunState::Running(i), Transition::StepPassed) if i + 1 < total => {
                RunState::Running(i + 1)
            }
            (RunState::Running(_), Transition::StepPassed) => RunState::Succeeded,
            (RunState::Running(_), Transition::StepFailed(kind)) => RunState::Failed(kind),
            (state, _) => state,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, RunState::Succeeded | RunState::Failed(_))
    }
}

/// Terminal classification of one run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum RunResult {
    Success,
    AssertionFailure { cause: String },
    TimeoutFailure { cause: String },
    UnexpectedFailure { cause: String },
}

impl RunResult {
    pub fn from_error(err: &E2eError) -> Self {
        let cause = err.to_string();
        match err.kind() {
            FailureKind::Assertion => RunResult::AssertionFailure { cause },
            FailureKind::Timeout => RunResult::TimeoutFailure { cause },
            FailureKind::Unexpected => RunResult::UnexpectedFailure { cause },
        }
    }

    /// Process exit status: 0 success, 2 assertion or timeout, 3 anything else
    pub fn exit_code(&self) -> i32 {
        match self {
            RunResult::Success => 0,
            RunResult::AssertionFailure { .. } | RunResult::TimeoutFailure { .. } => 2,
            RunResult::UnexpectedFailure { .. } => 3,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, RunResult::Success)
    }

    pub fn cause(&self) -> Option<&str> {
        match self {
            RunResult::Success => None,
            RunResult::AssertionFailure { cause }
            | RunResult::TimeoutFailure { cause }
            | RunResult::UnexpectedFailure { cause } => Some(cause),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    Passed,
    Skipped,
    Failed,
    NotRun,
}

impl std::fmt::Display for StepStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StepStatus::Passed => write!(f, "passed"),
            StepStatus::Skipped => write!(f, "skipped"),
            StepStatus::Failed => write!(f, "failed"),
            StepStatus::NotRun => write!(f, "not run"),
        }
    }
}

/// Result of a single step
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepRecord {
    /// 1-based position in the wizard
    pub index: usize,
    pub name: String,
    pub status: StepStatus,
    pub duration_ms: u64,
    pub detail: Option<String>,
}

/// Result of one orchestrator invocation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub duration_ms: u64,
    pub base_url: String,
    pub dry_run: bool,
    pub steps: Vec<StepRecord>,
    pub state: RunState,
    pub result: RunResult,
    /// Diagnostics written during the run
    pub artifacts: Vec<PathBuf>,
}

impl RunReport {
    pub fn exit_code(&self) -> i32 {
        self.result.exit_code()
    }

    pub fn count(&self, status: StepStatus) -> usize {
        self.steps.iter().filter(|s| s.status == status).count()
    }

    /// Write the report as pretty JSON into `dir`
    pub fn write_json(&self, dir: &Path) -> E2eResult<PathBuf> {
        std::fs::create_dir_all(dir)?;

        let path = dir.join(format!("run-{}.json", self.run_id));
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, json)?;

        info!("Report written to: {}", path.display());
        Ok(path)
    }
}

/// Runs the wizard steps in order over one exclusively owned session
pub struct Orchestrator {
    config: RunConfig,
    fixtures: UserData,
    steps: Vec<Box<dyn Step>>,
}

impl Orchestrator {
    /// Orchestrator for the fixed onboarding sequence
    pub fn new(config: RunConfig, fixtures: UserData) -> Self {
        Self::with_steps(config, fixtures, steps::wizard())
    }

    pub fn with_steps(config: RunConfig, fixtures: UserData, steps: Vec<Box<dyn Step>>) -> Self {
        Self {
            config,
            fixtures,
            steps,
        }
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    pub fn step_names(&self) -> Vec<&'static str> {
        self.steps.iter().map(|s| s.name()).collect()
    }

    /// Open a WebDriver session and run on it.
    ///
    /// A session that cannot be created is an unexpected failure with no
    /// step executed.
    pub async fn launch(&self) -> RunReport {
        let started_at = Utc::now();
        let start = Instant::now();

        match WebDriverSession::connect(&self.config).await {
            Ok(session) => self.run(session).await,
            Err(e) => {
                error!("Could not start browser session: {}", e);
                let steps = self.records_from(0, Vec::new());
                let state = RunState::Failed(e.kind());
                self.report(started_at, start, steps, state, RunResult::from_error(&e), Vec::new())
            }
        }
    }

    /// Run every step on `driver`, then release it.
    ///
    /// `quit` is called exactly once whatever the outcome, panics in steps
    /// included.
    pub async fn run<D: Driver>(&self, driver: D) -> RunReport {
        let report = self.execute(&driver).await;
        if let Err(e) = driver.quit().await {
            warn!("Failed to close browser session: {}", e);
        }
        report
    }

    async fn execute(&self, driver: &dyn Driver) -> RunReport {
        let started_at = Utc::now();
        let start = Instant::now();
        let total = self.steps.len();

        let diagnostics = Diagnostics::new(&self.config.artifacts_dir);
        let ctx = StepContext::new(driver, &self.config, &self.fixtures, &diagnostics);

        info!(
            "Starting onboarding run against {} ({} steps, dry run: {})",
            self.config.base_url, total, self.config.dry_run
        );

        let mut state = RunState::Pending.next(Transition::Start, total);
        let mut records = Vec::with_capacity(total);
        let mut result = RunResult::Success;

        while let RunState::Running(i) = state {
            let step = &self.steps[i];
            info!("▶ {}. {}", i + 1, step.name());

            let captures_before = ctx.capture_count();
            let step_start = Instant::now();
            let outcome = AssertUnwindSafe(step.run(&ctx))
                .catch_unwind()
                .await
                .unwrap_or_else(|panic| Err(E2eError::Panic(panic_message(panic))));
            let duration_ms = step_start.elapsed().as_millis() as u64;

            let (status, detail) = match outcome {
                Ok(StepOutcome::Completed) => {
                    info!("✓ {}. {} ({} ms)", i + 1, step.name(), duration_ms);
                    state = state.next(Transition::StepPassed, total);
                    (StepStatus::Passed, None)
                }
                Ok(StepOutcome::Skipped(reason)) => {
                    info!("- {}. {} skipped: {}", i + 1, step.name(), reason);
                    state = state.next(Transition::StepPassed, total);
                    (StepStatus::Skipped, Some(reason))
                }
                Err(e) => {
                    error!("✗ {}. {} failed: {}", i + 1, step.name(), e);
                    if ctx.capture_count() == captures_before {
                        ctx.capture(step.slug()).await;
                    }
                    result = RunResult::from_error(&e);
                    state = state.next(Transition::StepFailed(e.kind()), total);
                    (StepStatus::Failed, Some(e.to_string()))
                }
            };

            records.push(StepRecord {
                index: i + 1,
                name: step.name().to_string(),
                status,
                duration_ms,
                detail,
            });
        }

        let records = self.records_from(records.len(), records);
        match &result {
            RunResult::Success => info!("All {} steps passed", total),
            failure => error!("Run failed ({})", failure.cause().unwrap_or_default()),
        }

        self.report(started_at, start, records, state, result, ctx.artifacts())
    }

    /// Fill in `NotRun` records for every step from `first` on
    fn records_from(&self, first: usize, mut records: Vec<StepRecord>) -> Vec<StepRecord> {
        for (i, step) in self.steps.iter().enumerate().skip(first) {
            records.push(StepRecord {
                index: i + 1,
                name: step.name().to_string(),
                status: StepStatus::NotRun,
                duration_ms: 0,
                detail: None,
            });
        }
        records
    }

    fn report(
        &self,
        started_at: DateTime<Utc>,
        start: Instant,
        steps: Vec<StepRecord>,
        state: RunState,
        result: RunResult,
        artifacts: Vec<PathBuf>,
    ) -> RunReport {
        RunReport {
            run_id: Uuid::new_v4(),
            started_at,
            duration_ms: start.elapsed().as_millis() as u64,
            base_url: self.config.base_url.clone(),
            dry_run: self.config.dry_run,
            steps,
            state,
            result,
            artifacts,
        }
    }
}

fn panic_message(panic: Box<dyn Any + Send>) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
