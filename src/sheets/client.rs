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

//! Spreadsheet service operations used by the report writer.
//!
//! The writer only talks to a spreadsheet backend through `SpreadsheetClient`,
//! so the Google adapter and the in-memory test backend are interchangeable.

use anyhow::Result;
use serde_json::Value;

/// Tab title and backend id as reported by the spreadsheet metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabInfo {
    pub title: String,
    pub numeric_id: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpreadsheetMetadata {
    pub title: String,
    pub tabs: Vec<TabInfo>,
}

impl SpreadsheetMetadata {
    /// Case-sensitive exact lookup by tab title.
    pub fn find_tab(&self, title: &str) -> Option<&TabInfo> {
        self.tabs.iter().find(|tab| tab.title == title)
    }
}

/// One rectangular block of values in A1 notation (1-based rows).
#[derive(Debug, Clone, PartialEq)]
pub struct CellRange {
    pub range: String,
    pub values: Vec<Vec<Value>>,
}

/// RGB color with components in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RgbColor {
    pub red: f32,
    pub green: f32,
    pub blue: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HorizontalAlignment {
    Center,
}

impl HorizontalAlignment {
    pub fn as_api_str(&self) -> &'static str {
        match self {
            HorizontalAlignment::Center => "CENTER",
        }
    }
}

/// Zero-based, end-exclusive grid rectangle on one tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridArea {
    pub sheet_numeric_id: i32,
    pub start_row: i32,
    pub end_row: i32,
    pub start_column: i32,
    pub end_column: i32,
}

/// Cell styling applied uniformly across a `GridArea`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CellStyle {
    pub background: Option<RgbColor>,
    pub bold: Option<bool>,
    pub font_size: Option<i32>,
    pub horizontal_alignment: Option<HorizontalAlignment>,
}

/// Structural update understood by `batch_update_structure`.
#[derive(Debug, Clone, PartialEq)]
pub enum FormatDirective {
    StyleCells { area: GridArea, style: CellStyle },
    FreezeRows { sheet_numeric_id: i32, rows: i32 },
    ColumnWidth {
        sheet_numeric_id: i32,
        start_column: i32,
        end_column: i32,
        pixels: i32,
    },
}

pub trait SpreadsheetClient {
    /// Reads the spreadsheet title and its tab list.
    async fn spreadsheet_metadata(&self, spreadsheet_id: &str) -> Result<SpreadsheetMetadata>;

    /// Adds a tab and returns the numeric id assigned by the backend.
    async fn add_tab(&self, spreadsheet_id: &str, title: &str) -> Result<i32>;

    /// Writes every range in a single batched call.
    async fn batch_write_values(&self, spreadsheet_id: &str, ranges: &[CellRange]) -> Result<()>;

    /// Applies every directive in a single batched call.
    async fn batch_update_structure(
        &self,
        spreadsheet_id: &str,
        directives: &[FormatDirective],
    ) -> Result<()>;
}
