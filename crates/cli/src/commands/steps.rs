//! Step listing

use serde::Serialize;

use crate::output::{print_list, OutputFormat, TableDisplay};

#[derive(Debug, Serialize)]
pub struct StepInfo {
    pub index: usize,
    pub name: &'static str,
    /// Diagnostics file prefix used when the step fails
    pub slug: &'static str,
}

impl TableDisplay for StepInfo {
    fn headers() -> Vec<&'static str> {
        vec!["#", "Step", "Diagnostics prefix"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.index.to_string(),
            self.name.to_string(),
            self.slug.to_string(),
        ]
    }
}

pub fn sequence() -> Vec<StepInfo> {
    onboard_e2e::steps::wizard()
        .iter()
        .enumerate()
        .map(|(i, step)| StepInfo {
            index: i + 1,
            name: step.name(),
            slug: step.slug(),
        })
        .collect()
}

pub fn execute(format: OutputFormat) {
    print_list(&sequence(), format);
}
