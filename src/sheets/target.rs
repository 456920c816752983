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

use crate::utils::{ReportResult, ReportSheetsError};
use regex::Regex;
use std::sync::LazyLock;

static SPREADSHEET_URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"/spreadsheets/d/([a-zA-Z0-9_-]+)").expect("spreadsheet URL pattern is valid")
});

static BARE_ID_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9_-]+$").expect("spreadsheet id pattern is valid"));

const MAX_SHEET_NAME_LEN: usize = 100;

/// Resolved destination of one report write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetTarget {
    pub spreadsheet_id: String,
    pub sheet_name: String,
    pub sheet_numeric_id: i32,
}

/// Extracts the spreadsheet id from a Google Sheets URL.
///
/// Anything that looks like a URL must contain `/spreadsheets/d/<id>`. A bare
/// identifier without slashes is accepted as-is.
pub fn extract_spreadsheet_id(input: &str) -> ReportResult<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ReportSheetsError::InvalidIdentifier(
            "spreadsheet URL is empty".to_string(),
        ));
    }

    if let Some(captures) = SPREADSHEET_URL_PATTERN.captures(trimmed) {
        return Ok(captures[1].to_string());
    }

    if !trimmed.contains('/') && BARE_ID_PATTERN.is_match(trimmed) {
        return Ok(trimmed.to_string());
    }

    Err(ReportSheetsError::InvalidIdentifier(format!(
        "'{}' does not contain a /spreadsheets/d/<id> segment",
        trimmed
    )))
}

/// Checks that a report date can be used as a tab title.
///
/// Only emptiness and length are checked. Punctuation such as `/` or `:` is
/// legal in a tab title and is handled by quoting in A1 ranges.
pub fn validate_sheet_name(name: &str) -> ReportResult<()> {
    let invalid = |reason: &str| ReportSheetsError::InvalidSheetName {
        name: name.to_string(),
        reason: reason.to_string(),
    };

    if name.trim().is_empty() {
        return Err(invalid("sheet name cannot be empty"));
    }

    if name.chars().count() > MAX_SHEET_NAME_LEN {
        return Err(invalid("sheet name is longer than 100 characters"));
    }

    Ok(())
}
