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

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportSheetsError {
    #[error("Invalid spreadsheet identifier: {0}")]
    InvalidIdentifier(String),

    #[error("Invalid sheet name '{name}': {reason}")]
    InvalidSheetName { name: String, reason: String },

    #[error("Failed to resolve sheet '{sheet_name}': {source}")]
    Resolution {
        sheet_name: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("Failed to write report to sheet '{sheet_name}': {source}")]
    Write {
        sheet_name: String,
        #[source]
        source: anyhow::Error,
    },
}

pub type ReportResult<T> = std::result::Result<T, ReportSheetsError>;
