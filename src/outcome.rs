//! Summary of a provisioning run
//!
//! Most pipeline steps degrade instead of aborting, so a run can finish
//! with the repository created but a board or report branch missing. The
//! run report collects those outcomes and prints them once at the end,
//! where they are much harder to miss than a warning that scrolled by.

use chrono::{DateTime, Utc};
use colored::Colorize;
use tabled::{
    Table, Tabled,
    settings::{Alignment, Modify, Style, object::Rows},
};

/// How a pipeline step ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    Completed,
    /// Finished in degraded form; the detail says what to fix by hand
    Warning(String),
}

/// Step outcomes for one provisioning run
#[derive(Debug)]
pub struct RunReport {
    started_at: DateTime<Utc>,
    steps: Vec<(String, StepOutcome)>,
}

impl RunReport {
    pub fn new() -> Self {
        Self {
            started_at: Utc::now(),
            steps: Vec::new(),
        }
    }

    pub fn complete(&mut self, step: impl Into<String>) {
        self.steps.push((step.into(), StepOutcome::Completed));
    }

    pub fn warn(&mut self, step: impl Into<String>, detail: impl Into<String>) {
        self.steps
            .push((step.into(), StepOutcome::Warning(detail.into())));
    }

    pub fn has_warnings(&self) -> bool {
        self.steps
            .iter()
            .any(|(_, outcome)| matches!(outcome, StepOutcome::Warning(_)))
    }

    /// Render the table plus one line per warning detail
    pub fn render(&self) -> String {
        if self.steps.is_empty() {
            return "No steps recorded.".to_string();
        }

        #[derive(Tabled)]
        struct Row {
            #[tabled(rename = "STEP")]
            step: String,
            #[tabled(rename = "OUTCOME")]
            outcome: String,
        }

        let rows: Vec<Row> = self
            .steps
            .iter()
            .map(|(step, outcome)| Row {
                step: step.clone(),
                outcome: match outcome {
                    StepOutcome::Completed => "done".to_string(),
                    StepOutcome::Warning(_) => "warning".to_string(),
                },
            })
            .collect();

        let mut table = Table::new(&rows);
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        let elapsed = (Utc::now() - self.started_at).num_seconds().max(0);
        let mut out = format!("{}\nFinished in {}", table, format_elapsed(elapsed));
        for (step, outcome) in &self.steps {
            if let StepOutcome::Warning(detail) = outcome {
                out.push_str(&format!("\n{} {}: {}", "⚠".yellow(), step, detail));
            }
        }
        out
    }
}

impl Default for RunReport {
    fn default() -> Self {
        Self::new()
    }
}

fn format_elapsed(seconds: i64) -> String {
    let mins = seconds / 60;
    let secs = seconds % 60;
    if mins > 0 {
        format!("{}m {}s", mins, secs)
    } else {
        format!("{}s", secs)
    }
}
