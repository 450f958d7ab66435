//! Run report generation
//!
//! A machine-readable record of one harness run, written next to the usual
//! console output when an output directory is requested.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::executor::CaseOutcome;

/// Everything one run did, group by group.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub timestamp: DateTime<Utc>,
    pub engine: String,
    pub update_mode: bool,
    pub total_tests: usize,
    pub total_errors: usize,
    pub groups: Vec<GroupReport>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupReport {
    pub description: String,
    pub directory: Option<String>,
    pub pattern: Option<String>,
    pub tests: usize,
    pub errors: usize,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub cases: Vec<CaseReport>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseReport {
    pub path: String,
    /// `pass`, `fail` or `skipped`
    pub outcome: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub message: Option<String>,
}

impl CaseReport {
    pub fn new(path: &Path, outcome: &CaseOutcome) -> Self {
        let (outcome, message) = match outcome {
            CaseOutcome::Pass => ("pass", None),
            CaseOutcome::Fail(messages) => ("fail", Some(messages.join("; "))),
            CaseOutcome::Skipped(reason) => ("skipped", Some(reason.clone())),
        };
        Self {
            path: path.display().to_string(),
            outcome: outcome.to_string(),
            message,
        }
    }

    pub fn is_failure(&self) -> bool {
        self.outcome == "fail"
    }
}

impl RunReport {
    pub fn new(engine: &str, update_mode: bool) -> Self {
        Self {
            timestamp: Utc::now(),
            engine: engine.to_string(),
            update_mode,
            total_tests: 0,
            total_errors: 0,
            groups: Vec::new(),
        }
    }

    /// Record a finished group and fold it into the totals.
    pub fn push_group(&mut self, group: GroupReport) {
        self.total_tests += group.tests;
        self.total_errors += group.errors;
        self.groups.push(group);
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn to_markdown(&self) -> String {
        let mut md = String::new();

        md.push_str(&format!("# {} Golden Test Report\n\n", self.engine));
        md.push_str(&format!(
            "**Date:** {}\n",
            self.timestamp.format("%Y-%m-%d %H:%M:%S UTC")
        ));
        if self.update_mode {
            md.push_str("**Mode:** update\n");
        }
        md.push_str(&format!(
            "**Total:** {} tests, {} errors\n\n",
            self.total_tests, self.total_errors
        ));

        md.push_str("## Groups\n\n");
        md.push_str("| Group | Tests | Errors |\n");
        md.push_str("|-------|-------|--------|\n");
        for group in &self.groups {
            md.push_str(&format!(
                "| {} | {} | {} |\n",
                group.description, group.tests, group.errors
            ));
        }
        md.push('\n');

        md.push_str("## Failed Tests\n\n");
        let failed: Vec<_> = self
            .groups
            .iter()
            .flat_map(|g| g.cases.iter().filter(|c| c.is_failure()).map(move |c| (g, c)))
            .collect();
        if failed.is_empty() {
            md.push_str("No failed tests!\n");
        } else {
            md.push_str("| Group | Fixture | Message |\n");
            md.push_str("|-------|---------|---------|\n");
            for (group, case) in failed {
                md.push_str(&format!(
                    "| {} | {} | {} |\n",
                    group.description,
                    case.path,
                    case.message.as_deref().unwrap_or("-")
                ));
            }
        }

        md
    }

    /// Write `report.json` and `report.md` into `dir`, creating it if needed.
    pub fn write_to_dir(&self, dir: &Path) -> Result<()> {
        fs::create_dir_all(dir)?;
        fs::write(dir.join("report.json"), self.to_json()?)?;
        fs::write(dir.join("report.md"), self.to_markdown())?;
        Ok(())
    }
}
