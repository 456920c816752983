// Copyright 2025 Webmobix Solutions AG
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUTHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Daily report value objects.
//!
//! A `DailyReport` is assembled upstream and handed to the sheet writer as
//! read-only input. The JSON form uses camelCase keys.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Health status written when a personnel entry does not carry one.
pub const DEFAULT_HEALTH_STATUS: &str = "Healthy";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyReport {
    /// Report date, also used verbatim as the destination tab name
    pub report_date: String,
    pub project_name: String,
    pub total_headcount: u32,
    pub total_regular_hours: f64,
    pub total_overtime_hours: f64,
    #[serde(default)]
    pub personnel: Vec<PersonnelEntry>,
    #[serde(default)]
    pub work_logs: Vec<WorkLogEntry>,
    #[serde(default)]
    pub constraints: Vec<ConstraintEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonnelEntry {
    pub full_name: String,
    pub go_by_name: String,
    pub position: String,
    pub team_assignment: String,
    #[serde(default)]
    pub health_status: Option<String>,
    #[serde(default)]
    pub hours_worked: Option<f64>,
    #[serde(default)]
    pub overtime_hours: Option<f64>,
}

impl PersonnelEntry {
    pub fn health_status_or_default(&self) -> &str {
        self.health_status
            .as_deref()
            .filter(|status| !status.trim().is_empty())
            .unwrap_or(DEFAULT_HEALTH_STATUS)
    }

    pub fn hours_worked_or_default(&self) -> f64 {
        self.hours_worked.unwrap_or(0.0)
    }

    pub fn overtime_hours_or_default(&self) -> f64 {
        self.overtime_hours.unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkLogEntry {
    pub team_id: String,
    pub task_description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConstraintEntry {
    pub level: String,
    pub description: String,
}

impl DailyReport {
    /// Number of rows in the combined tasks/constraints table.
    pub fn task_constraint_rows(&self) -> usize {
        self.work_logs.len().max(self.constraints.len())
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        serde_json::from_str(content).context("Failed to parse daily report JSON")
    }

    /// Loads a report from a JSON file on disk.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read report file: {:?}", path))?;
        let report = Self::from_json_str(&content)
            .with_context(|| format!("Invalid report file: {:?}", path))?;

        debug!(
            "📄 Loaded report '{}' for project '{}' ({} personnel, {} work logs, {} constraints)",
            report.report_date,
            report.project_name,
            report.personnel.len(),
            report.work_logs.len(),
            report.constraints.len()
        );

        Ok(report)
    }
}
