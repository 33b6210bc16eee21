//! Output formatting for the CLI.

use crate::error::Result;
use colored::*;
use logroll_archiver::PassReport;
use logroll_domain::{ArchiveEntryInfo, MergeDecision, MergeTask};
use std::time::{SystemTime, UNIX_EPOCH};
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output formatter.
pub struct Formatter {
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(color_enabled: bool) -> Self {
        Self { color_enabled }
    }

    /// Format a scan plan as a table.
    pub fn format_plan(&self, plan: &[MergeTask]) -> String {
        if plan.is_empty() {
            return self.colorize("No candidate logs found.", "yellow");
        }

        let mut builder = Builder::default();
        builder.push_record(["Source", "Entry", "Decision", "Policy", "Size", "Modified"]);

        for task in plan {
            let decision = match task.decision {
                MergeDecision::New => self.colorize("new", "green"),
                MergeDecision::Update => self.colorize("update", "cyan"),
                MergeDecision::Skip => task.decision.as_str().to_string(),
            };
            builder.push_record([
                task.source.name.clone(),
                task.entry_name.clone(),
                decision,
                task.policy.to_string(),
                task.source.len.to_string(),
                unix_secs(task.source.modified).to_string(),
            ]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        table.to_string()
    }

    /// Format a scan plan as JSON.
    pub fn format_plan_json(&self, plan: &[MergeTask]) -> Result<String> {
        let rows: Vec<serde_json::Value> = plan
            .iter()
            .map(|task| {
                serde_json::json!({
                    "source": task.source.name,
                    "entry": task.entry_name,
                    "decision": task.decision.as_str(),
                    "policy": task.policy.as_str(),
                    "size": task.source.len,
                    "modified": unix_secs(task.source.modified),
                })
            })
            .collect();

        Ok(serde_json::to_string_pretty(&rows)?)
    }

    /// Format archive entries as a table.
    pub fn format_entries(&self, entries: &[ArchiveEntryInfo]) -> String {
        if entries.is_empty() {
            return self.colorize("No archive entries found.", "yellow");
        }

        let mut builder = Builder::default();
        builder.push_record(["Entry", "Stored", "Modified"]);
        for entry in entries {
            builder.push_record([
                entry.name.clone(),
                entry.stored_len.to_string(),
                unix_secs(entry.modified).to_string(),
            ]);
        }

        let mut table = builder.build();
        table.with(Style::rounded());
        table.to_string()
    }

    /// Format the outcome of one pass.
    pub fn pass_result(&self, report: &PassReport) -> String {
        let msg = format!(
            "{} new, {} updated, {} skipped, {} failed ({} bytes stored)",
            report.archived_new, report.updated, report.skipped, report.failed, report.bytes_written
        );
        if report.failed > 0 {
            self.warning(&msg)
        } else {
            self.success(&msg)
        }
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            "cyan" => text.cyan().to_string(),
            _ => text.to_string(),
        }
    }
}

/// Seconds since the epoch, 0 for times before it
fn unix_secs(time: SystemTime) -> u64 {
    time.duration_since(UNIX_EPOCH).map(|d| d.as_secs()).unwrap_or(0)
}
