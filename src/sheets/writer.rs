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

//! Writes a daily report into a dated tab of a spreadsheet.
//!
//! One write runs three sequential steps against the same spreadsheet:
//! resolve (or create) the tab, write every layout range in one batch, then
//! apply template formatting. Only the first two can fail the write.
//!
//! Tab creation is check-then-create with no backend compare-and-swap, so
//! callers must serialize writes for the same report date.

use crate::report::DailyReport;
use crate::sheets::client::{CellRange, SpreadsheetClient};
use crate::sheets::format::{self, FormattingOutcome};
use crate::sheets::layout;
use crate::sheets::target::{self, SheetTarget};
use crate::utils::{ReportResult, ReportSheetsError};
use tracing::{debug, error, info, warn};

/// Tab lookup result from `ReportWriter::resolve_sheet`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SheetResolution {
    pub sheet_numeric_id: i32,
    pub created: bool,
}

/// Outcome of a successful `ReportWriter::write_daily_report`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteSummary {
    pub target: SheetTarget,
    pub created_tab: bool,
    pub ranges_written: usize,
    pub formatting: FormattingOutcome,
}

/// Report writer bound to one spreadsheet backend.
///
/// Owned by the caller and passed by reference to whatever triggers a write;
/// there is no process-wide instance.
pub struct ReportWriter<C> {
    client: C,
    organization: String,
}

impl<C: SpreadsheetClient> ReportWriter<C> {
    pub fn new(client: C, organization: impl Into<String>) -> Self {
        Self {
            client,
            organization: organization.into(),
        }
    }

    #[cfg(test)]
    pub fn client(&self) -> &C {
        &self.client
    }

    /// Read-only connectivity check. Never mutates the spreadsheet.
    pub async fn test_connection(&self, spreadsheet: &str) -> bool {
        let spreadsheet_id = match target::extract_spreadsheet_id(spreadsheet) {
            Ok(id) => id,
            Err(err) => {
                error!("❌ Connection test failed: {}", err);
                return false;
            }
        };

        match self.client.spreadsheet_metadata(&spreadsheet_id).await {
            Ok(metadata) => {
                info!(
                    "✅ Connected to spreadsheet '{}' ({} tabs)",
                    metadata.title,
                    metadata.tabs.len()
                );
                true
            }
            Err(err) => {
                error!(
                    "❌ Connection test failed for spreadsheet '{}': {:#}",
                    spreadsheet_id, err
                );
                false
            }
        }
    }

    /// Writes `report` into the tab named after its report date.
    ///
    /// Re-running with the same report finds the existing tab and overwrites
    /// the same ranges, so a failed write can be retried as a whole.
    pub async fn write_daily_report(
        &self,
        spreadsheet: &str,
        report: &DailyReport,
    ) -> ReportResult<WriteSummary> {
        let spreadsheet_id = target::extract_spreadsheet_id(spreadsheet)?;
        let sheet_name = report.report_date.as_str();
        target::validate_sheet_name(sheet_name)?;

        info!(
            "📊 Writing daily report '{}' for project '{}' to spreadsheet {}",
            sheet_name, report.project_name, spreadsheet_id
        );

        let resolution = self.resolve_sheet(&spreadsheet_id, sheet_name).await?;
        let ranges_written = self.write_report(&spreadsheet_id, sheet_name, report).await?;
        let formatting = self
            .apply_formatting(&spreadsheet_id, resolution.sheet_numeric_id, sheet_name)
            .await;

        info!(
            "✅ Daily report '{}' written ({} ranges, formatting {})",
            sheet_name,
            ranges_written,
            if formatting.is_applied() {
                "applied"
            } else {
                "skipped"
            }
        );

        Ok(WriteSummary {
            target: SheetTarget {
                spreadsheet_id,
                sheet_name: sheet_name.to_string(),
                sheet_numeric_id: resolution.sheet_numeric_id,
            },
            created_tab: resolution.created,
            ranges_written,
            formatting,
        })
    }

    /// Returns the id of the tab titled `sheet_name`, creating it on a miss.
    pub async fn resolve_sheet(
        &self,
        spreadsheet_id: &str,
        sheet_name: &str,
    ) -> ReportResult<SheetResolution> {
        target::validate_sheet_name(sheet_name)?;
        debug!("📋 Looking for sheet: {}", sheet_name);

        let resolution_error = |source: anyhow::Error| ReportSheetsError::Resolution {
            sheet_name: sheet_name.to_string(),
            source,
        };

        let metadata = self
            .client
            .spreadsheet_metadata(spreadsheet_id)
            .await
            .map_err(resolution_error)?;

        if let Some(tab) = metadata.find_tab(sheet_name) {
            info!(
                "📋 Using existing sheet '{}' (ID: {})",
                sheet_name, tab.numeric_id
            );
            return Ok(SheetResolution {
                sheet_numeric_id: tab.numeric_id,
                created: false,
            });
        }

        info!("➕ Creating sheet '{}'", sheet_name);
        let sheet_numeric_id = self
            .client
            .add_tab(spreadsheet_id, sheet_name)
            .await
            .map_err(resolution_error)?;

        info!(
            "✅ Created sheet '{}' with ID: {}",
            sheet_name, sheet_numeric_id
        );
        Ok(SheetResolution {
            sheet_numeric_id,
            created: true,
        })
    }

    /// Writes the report layout into an existing tab. Returns the range count.
    // TODO: blank out rows below the new tables when a shorter report
    // overwrites a longer one; needs a values-clear call on SpreadsheetClient.
    pub async fn write_report(
        &self,
        spreadsheet_id: &str,
        sheet_name: &str,
        report: &DailyReport,
    ) -> ReportResult<usize> {
        let ranges = self.layout(sheet_name, report);
        info!(
            "💾 Writing {} ranges ({} personnel, {} task rows) to '{}'",
            ranges.len(),
            report.personnel.len(),
            report.task_constraint_rows(),
            sheet_name
        );

        self.client
            .batch_write_values(spreadsheet_id, &ranges)
            .await
            .map_err(|source| {
                error!("❌ Failed to write report values to '{}'", sheet_name);
                ReportSheetsError::Write {
                    sheet_name: sheet_name.to_string(),
                    source,
                }
            })?;

        Ok(ranges.len())
    }

    /// Applies template formatting. Failures are logged and reported in the
    /// returned outcome, never raised.
    pub async fn apply_formatting(
        &self,
        spreadsheet_id: &str,
        sheet_numeric_id: i32,
        sheet_name: &str,
    ) -> FormattingOutcome {
        debug!("🎨 Applying template formatting to '{}'", sheet_name);
        let directives = format::template_directives(sheet_numeric_id);

        match self
            .client
            .batch_update_structure(spreadsheet_id, &directives)
            .await
        {
            Ok(()) => {
                debug!("✅ Successfully applied formatting to '{}'", sheet_name);
                FormattingOutcome::Applied
            }
            Err(err) => {
                warn!(
                    "⚠️  Warning: Failed to apply formatting to '{}': {:#}",
                    sheet_name, err
                );
                FormattingOutcome::Failed(format!("{:#}", err))
            }
        }
    }

    /// Computes the ranges a write would send, without touching the backend.
    pub fn layout(&self, sheet_name: &str, report: &DailyReport) -> Vec<CellRange> {
        layout::build_report_ranges(sheet_name, &self.organization, report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::model::{ConstraintEntry, PersonnelEntry, WorkLogEntry};
    use crate::sheets::testing::{FakeSpreadsheet, Operation};
    use serde_json::json;

    const URL: &str = "https://docs.google.com/spreadsheets/d/sheet-123/edit";

    fn person(name: &str) -> PersonnelEntry {
        PersonnelEntry {
            full_name: name.to_string(),
            go_by_name: name.to_string(),
            position: "Laborer".to_string(),
            team_assignment: "T1".to_string(),
            health_status: None,
            hours_worked: Some(8.0),
            overtime_hours: Some(0.5),
        }
    }

    fn sample_report() -> DailyReport {
        DailyReport {
            report_date: "2024-01-15".to_string(),
            project_name: "North Tower".to_string(),
            total_headcount: 17,
            total_regular_hours: 16.0,
            total_overtime_hours: 1.0,
            personnel: vec![person("A"), person("B")],
            work_logs: vec![WorkLogEntry {
                team_id: "T1".to_string(),
                task_description: "Frame level 2".to_string(),
            }],
            constraints: vec![],
        }
    }

    fn writer(fake: FakeSpreadsheet) -> ReportWriter<FakeSpreadsheet> {
        ReportWriter::new(fake, "Acme Builders")
    }

    #[tokio::test]
    async fn resolving_existing_tab_does_not_create_duplicate() {
        let writer = writer(FakeSpreadsheet::new("Site").with_tab("2024-01-15", 55));

        let first = writer.resolve_sheet("sheet-123", "2024-01-15").await.unwrap();
        let second = writer.resolve_sheet("sheet-123", "2024-01-15").await.unwrap();

        assert_eq!(first.sheet_numeric_id, 55);
        assert!(!first.created);
        assert_eq!(second, first);
        assert_eq!(writer.client().count(Operation::AddTab), 0);
        assert_eq!(writer.client().tabs().len(), 1);
    }

    #[tokio::test]
    async fn resolving_missing_tab_creates_exactly_one() {
        let writer = writer(FakeSpreadsheet::new("Site").with_tab("2024-01-14", 1));

        let resolution = writer.resolve_sheet("sheet-123", "2024-01-15").await.unwrap();

        assert!(resolution.created);
        assert_eq!(resolution.sheet_numeric_id, 1001);
        assert_eq!(writer.client().count(Operation::AddTab), 1);
        assert_eq!(writer.client().tabs().len(), 2);

        let again = writer.resolve_sheet("sheet-123", "2024-01-15").await.unwrap();
        assert_eq!(again.sheet_numeric_id, 1001);
        assert!(!again.created);
        assert_eq!(writer.client().count(Operation::AddTab), 1);
    }

    #[tokio::test]
    async fn tab_lookup_is_case_sensitive() {
        let writer = writer(FakeSpreadsheet::new("Site").with_tab("Monday", 3));

        let resolution = writer.resolve_sheet("sheet-123", "monday").await.unwrap();
        assert!(resolution.created);
        assert_ne!(resolution.sheet_numeric_id, 3);
    }

    #[tokio::test]
    async fn resolution_failure_aborts_before_any_write() {
        let writer = writer(FakeSpreadsheet::new("Site").failing_on(Operation::AddTab));

        let err = writer
            .write_daily_report(URL, &sample_report())
            .await
            .unwrap_err();

        assert!(matches!(err, ReportSheetsError::Resolution { .. }));
        assert_eq!(writer.client().count(Operation::WriteValues), 0);
        assert_eq!(writer.client().count(Operation::UpdateStructure), 0);
    }

    #[tokio::test]
    async fn metadata_failure_is_a_resolution_error() {
        let writer = writer(FakeSpreadsheet::new("Site").failing_on(Operation::Metadata));

        let err = writer
            .write_daily_report(URL, &sample_report())
            .await
            .unwrap_err();

        assert!(matches!(err, ReportSheetsError::Resolution { .. }));
        assert_eq!(writer.client().calls(), vec![Operation::Metadata]);
    }

    #[tokio::test]
    async fn write_failure_leaves_created_tab_and_skips_formatting() {
        let writer = writer(FakeSpreadsheet::new("Site").failing_on(Operation::WriteValues));

        let err = writer
            .write_daily_report(URL, &sample_report())
            .await
            .unwrap_err();

        assert!(matches!(err, ReportSheetsError::Write { .. }));
        assert_eq!(writer.client().tabs().len(), 1);
        assert_eq!(writer.client().count(Operation::UpdateStructure), 0);
    }

    #[tokio::test]
    async fn formatting_failure_does_not_fail_the_write() {
        let writer = writer(FakeSpreadsheet::new("Site").failing_on(Operation::UpdateStructure));

        let summary = writer
            .write_daily_report(URL, &sample_report())
            .await
            .unwrap();

        assert!(matches!(summary.formatting, FormattingOutcome::Failed(_)));
        assert_eq!(writer.client().count(Operation::WriteValues), 1);
        assert_eq!(writer.client().count(Operation::UpdateStructure), 1);
    }

    #[tokio::test]
    async fn invalid_url_fails_without_network_calls() {
        let writer = writer(FakeSpreadsheet::new("Site"));

        let err = writer
            .write_daily_report("https://example.com/not-a-sheet", &sample_report())
            .await
            .unwrap_err();

        assert!(matches!(err, ReportSheetsError::InvalidIdentifier(_)));
        assert!(writer.client().calls().is_empty());
    }

    #[tokio::test]
    async fn slash_dated_report_is_written_to_its_own_tab() {
        let writer = writer(FakeSpreadsheet::new("Site"));
        let mut report = sample_report();
        report.report_date = "1/15/2024".to_string();

        let summary = writer.write_daily_report(URL, &report).await.unwrap();

        assert_eq!(summary.target.sheet_name, "1/15/2024");
        assert!(summary.created_tab);
        assert_eq!(summary.formatting, FormattingOutcome::Applied);
        assert!(
            writer
                .client()
                .tabs()
                .iter()
                .any(|tab| tab.title == "1/15/2024")
        );

        let writes = writer.client().writes();
        assert_eq!(writes.len(), 1);
        assert!(writes[0].iter().all(|r| r.range.starts_with("'1/15/2024'!")));
        assert!(writes[0].iter().any(|r| r.range == "'1/15/2024'!A1:G3"));
    }

    #[tokio::test]
    async fn empty_report_date_fails_without_network_calls() {
        let writer = writer(FakeSpreadsheet::new("Site"));
        let mut report = sample_report();
        report.report_date = "  ".to_string();

        let err = writer.write_daily_report(URL, &report).await.unwrap_err();

        assert!(matches!(err, ReportSheetsError::InvalidSheetName { .. }));
        assert!(writer.client().calls().is_empty());
    }

    #[tokio::test]
    async fn end_to_end_write_produces_expected_layout() {
        let writer = writer(FakeSpreadsheet::new("Site"));

        let summary = writer
            .write_daily_report(URL, &sample_report())
            .await
            .unwrap();

        assert_eq!(summary.target.spreadsheet_id, "sheet-123");
        assert_eq!(summary.target.sheet_name, "2024-01-15");
        assert!(summary.created_tab);
        assert_eq!(summary.formatting, FormattingOutcome::Applied);
        assert_eq!(
            writer.client().calls(),
            vec![
                Operation::Metadata,
                Operation::AddTab,
                Operation::WriteValues,
                Operation::UpdateStructure
            ]
        );

        let writes = writer.client().writes();
        assert_eq!(writes.len(), 1);
        let ranges = &writes[0];
        assert_eq!(summary.ranges_written, ranges.len());

        let by_range = |name: &str| {
            ranges
                .iter()
                .find(|r| r.range == name)
                .unwrap_or_else(|| panic!("missing range {}", name))
        };

        assert_eq!(by_range("'2024-01-15'!A8:G9").values.len(), 2);
        let totals = by_range("'2024-01-15'!A10:G11");
        // Headcount is taken from the report, not from the roster length.
        assert_eq!(totals.values[0][1], json!(17));
        let tasks = by_range("'2024-01-15'!A17:D17");
        assert_eq!(tasks.values.len(), 1);
        assert_eq!(
            tasks.values[0],
            vec![json!("T1"), json!("Frame level 2"), json!(""), json!("")]
        );

        let directives = &writer.client().structure_updates()[0];
        assert!(directives.contains(&crate::sheets::client::FormatDirective::FreezeRows {
            sheet_numeric_id: summary.target.sheet_numeric_id,
            rows: 7
        }));
    }

    #[tokio::test]
    async fn rewriting_same_report_reuses_tab_and_ranges() {
        let writer = writer(FakeSpreadsheet::new("Site"));
        let report = sample_report();

        let first = writer.write_daily_report(URL, &report).await.unwrap();
        let second = writer.write_daily_report(URL, &report).await.unwrap();

        assert!(first.created_tab);
        assert!(!second.created_tab);
        assert_eq!(first.target, second.target);
        assert_eq!(writer.client().tabs().len(), 1);

        let writes = writer.client().writes();
        assert_eq!(writes[0], writes[1]);
    }

    #[tokio::test]
    async fn constraints_only_report_fills_task_columns_blank() {
        let writer = writer(FakeSpreadsheet::new("Site"));
        let mut report = sample_report();
        report.personnel.clear();
        report.work_logs.clear();
        report.constraints = vec![ConstraintEntry {
            level: "Medium".to_string(),
            description: "Crane inspection pending".to_string(),
        }];

        writer.write_daily_report(URL, &report).await.unwrap();

        let ranges = &writer.client().writes()[0];
        let tasks = ranges
            .iter()
            .find(|r| r.range == "'2024-01-15'!A15:D15")
            .unwrap();
        assert_eq!(
            tasks.values[0],
            vec![
                json!(""),
                json!(""),
                json!("Medium"),
                json!("Crane inspection pending")
            ]
        );
    }

    #[tokio::test]
    async fn connection_test_reports_success_and_failure() {
        let ok = writer(FakeSpreadsheet::new("Site"));
        assert!(ok.test_connection(URL).await);
        assert_eq!(ok.client().calls(), vec![Operation::Metadata]);

        let failing = writer(FakeSpreadsheet::new("Site").failing_on(Operation::Metadata));
        assert!(!failing.test_connection(URL).await);

        let bad_url = writer(FakeSpreadsheet::new("Site"));
        assert!(!bad_url.test_connection("https://example.com").await);
        assert!(bad_url.client().calls().is_empty());
    }
}
