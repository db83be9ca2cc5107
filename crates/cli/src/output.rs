//! Output formatting for CLI

use clap::ValueEnum;
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};
use onboard_e2e::{RunReport, StepRecord, StepStatus};
use serde::Serialize;

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable table format
    #[default]
    Table,
    /// JSON format
    Json,
    /// YAML format
    Yaml,
    /// Plain text format
    Plain,
}

/// Trait for items that can be displayed in a table
pub trait TableDisplay {
    fn headers() -> Vec<&'static str>;
    fn row(&self) -> Vec<String>;
}

impl TableDisplay for StepRecord {
    fn headers() -> Vec<&'static str> {
        vec!["#", "Step", "Status", "Duration", "Detail"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.index.to_string(),
            self.name.clone(),
            self.status.to_string(),
            format!("{} ms", self.duration_ms),
            self.detail.clone().unwrap_or_default(),
        ]
    }
}

fn table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

fn structured<T: Serialize + ?Sized>(value: &T, format: OutputFormat) -> Option<String> {
    match format {
        OutputFormat::Json => Some(serde_json::to_string_pretty(value).unwrap_or_default()),
        OutputFormat::Yaml => Some(serde_yaml::to_string(value).unwrap_or_default()),
        OutputFormat::Table | OutputFormat::Plain => None,
    }
}

fn plain_rows<T: TableDisplay>(items: &[T]) {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            println!("---");
        }
        for (header, value) in T::headers().iter().zip(item.row()) {
            println!("{}: {}", header, value);
        }
    }
}

/// Print a list of items
pub fn print_list<T: Serialize + TableDisplay>(items: &[T], format: OutputFormat) {
    if let Some(text) = structured(items, format) {
        println!("{}", text);
        return;
    }
    if items.is_empty() {
        println!("No items found.");
        return;
    }

    match format {
        OutputFormat::Plain => plain_rows(items),
        _ => {
            let mut table = table();
            table.set_header(T::headers());
            for item in items {
                table.add_row(item.row());
            }
            println!("{table}");
        }
    }
}

fn status_color(status: StepStatus) -> Color {
    match status {
        StepStatus::Passed => Color::Green,
        StepStatus::Skipped => Color::Yellow,
        StepStatus::Failed => Color::Red,
        StepStatus::NotRun => Color::DarkGrey,
    }
}

/// Print a finished run: step table, diagnostics, verdict
pub fn print_report(report: &RunReport, format: OutputFormat) {
    if let Some(text) = structured(report, format) {
        println!("{}", text);
        return;
    }

    match format {
        OutputFormat::Plain => plain_rows(&report.steps),
        _ => {
            let mut table = table();
            table.set_header(StepRecord::headers());
            for record in &report.steps {
                let mut cells: Vec<Cell> = record.row().into_iter().map(Cell::new).collect();
                cells[2] = Cell::new(record.status.to_string()).fg(status_color(record.status));
                table.add_row(cells);
            }
            println!("{table}");
        }
    }

    for path in &report.artifacts {
        print_info(&format!("Diagnostics: {}", path.display()));
    }

    let summary = format!(
        "{} passed, {} skipped, {} failed, {} not run in {} ms",
        report.count(StepStatus::Passed),
        report.count(StepStatus::Skipped),
        report.count(StepStatus::Failed),
        report.count(StepStatus::NotRun),
        report.duration_ms
    );
    if report.result.is_success() {
        print_success(&format!("Onboarding run passed ({})", summary));
    } else {
        print_error(&format!(
            "Onboarding run failed: {} ({})",
            report.result.cause().unwrap_or_default(),
            summary
        ));
    }
}

/// Print success message
pub fn print_success(message: &str) {
    println!("{} {}", "✔".green().bold(), message);
}

/// Print error message
pub fn print_error(message: &str) {
    eprintln!("{} {}", "✘".red().bold(), message.red());
}

/// Print info message
pub fn print_info(message: &str) {
    println!("{} {}", "ℹ".cyan(), message);
}
