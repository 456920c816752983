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

//! Configuration for report writes.
//!
//! This module holds the runtime settings assembled from CLI flags and
//! environment variables, plus their validation.

use crate::auth::SecretSource;
use std::path::PathBuf;

/// Organization label written in the title block when none is given.
pub const DEFAULT_ORGANIZATION: &str = "Daily Site Report";

/// Settings for one `write-report` run.
///
/// Authentication is handled separately through the credential source.
#[derive(Debug, Clone)]
pub struct Config {
    /// Spreadsheet URL or bare spreadsheet ID
    pub spreadsheet: String,
    /// Path to the daily report JSON file
    pub report_path: PathBuf,
    /// Organization name shown in the first title row
    pub organization: String,
    /// Where the OAuth credential JSON is read from
    pub credentials: SecretSource,
    /// Compute and log the layout without calling the API
    pub dry_run: bool,
}

impl Config {
    /// Creates a new configuration instance.
    ///
    /// # Arguments
    ///
    /// * `spreadsheet` - Spreadsheet URL or ID
    /// * `report_path` - Path to the report JSON
    /// * `organization` - Title block organization label
    /// * `credentials` - Secret source for OAuth credentials
    /// * `dry_run` - Whether to run in preview mode
    pub fn new(
        spreadsheet: String,
        report_path: PathBuf,
        organization: String,
        credentials: SecretSource,
        dry_run: bool,
    ) -> Self {
        Self {
            spreadsheet,
            report_path,
            organization,
            credentials,
            dry_run,
        }
    }

    /// Validates the configuration settings.
    ///
    /// # Errors
    ///
    /// * If the spreadsheet is empty
    /// * If the report path does not exist or is not a file
    /// * If the organization label is empty
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.spreadsheet.trim().is_empty() {
            anyhow::bail!("Spreadsheet URL cannot be empty");
        }

        if !self.report_path.exists() {
            anyhow::bail!("Report file does not exist: {:?}", self.report_path);
        }

        if !self.report_path.is_file() {
            anyhow::bail!("Report path is not a file: {:?}", self.report_path);
        }

        if self.organization.trim().is_empty() {
            anyhow::bail!("Organization name cannot be empty");
        }

        Ok(())
    }
}
