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

//! Cell layout of a daily report tab.
//!
//! All row numbers here are 1-based, matching A1 notation. Every block below
//! the personnel table moves down by the personnel count `N`; downstream
//! readers of the sheet depend on these exact offsets.

use crate::report::{DailyReport, PersonnelEntry};
use crate::sheets::client::CellRange;
use serde_json::Value;

pub const TITLE_FIRST_ROW: usize = 1;
pub const TITLE_LAST_ROW: usize = 3;
pub const PERSONNEL_HEADER_ROW: usize = 7;
pub const FIRST_PERSONNEL_ROW: usize = 8;

/// Width of the title, personnel and totals blocks (A..G).
pub const PERSONNEL_COLUMNS: usize = 7;
/// Width of the tasks/constraints blocks (A..D).
pub const TASK_COLUMNS: usize = 4;

pub const PERSONNEL_HEADERS: [&str; PERSONNEL_COLUMNS] = [
    "Full Name",
    "Go By",
    "Position",
    "Team #",
    "Limitations",
    "Hours",
    "O/T",
];

pub const TASK_HEADERS: [&str; TASK_COLUMNS] = ["Team", "Task:", "Level", "Constraint"];

const DATE_LABEL: &str = "Date:";
const PROJECT_LABEL: &str = "Project:";
const HEADCOUNT_LABEL: &str = "Total Headcount:";
const HOURS_LABEL: &str = "Total Hours:";
const REGULAR_HOURS_LABEL: &str = "Regular";
const OVERTIME_HOURS_LABEL: &str = "O/T";
const TASK_SECTION_BANNER: &str = "Tasks & Constraints";

/// Row positions derived from the personnel count and the task table size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowOffsets {
    pub personnel_count: usize,
    pub task_rows: usize,
}

impl RowOffsets {
    pub fn new(personnel_count: usize, task_rows: usize) -> Self {
        Self {
            personnel_count,
            task_rows,
        }
    }

    pub fn for_report(report: &DailyReport) -> Self {
        Self::new(report.personnel.len(), report.task_constraint_rows())
    }

    /// Last personnel row, or `None` when the roster is empty.
    pub fn last_personnel_row(&self) -> Option<usize> {
        (self.personnel_count > 0).then(|| PERSONNEL_HEADER_ROW + self.personnel_count)
    }

    pub fn headcount_row(&self) -> usize {
        FIRST_PERSONNEL_ROW + self.personnel_count
    }

    pub fn task_section_row(&self) -> usize {
        12 + self.personnel_count
    }

    pub fn task_header_row(&self) -> usize {
        14 + self.personnel_count
    }

    pub fn first_task_row(&self) -> usize {
        15 + self.personnel_count
    }

    /// Last tasks/constraints row, or `None` when both lists are empty.
    pub fn last_task_row(&self) -> Option<usize> {
        (self.task_rows > 0).then(|| 14 + self.personnel_count + self.task_rows)
    }
}

/// Computes every range written for one report, in sheet order.
///
/// Ranges never overlap. Empty personnel or task tables produce no range
/// rather than a zero-height one.
pub fn build_report_ranges(
    sheet_name: &str,
    organization: &str,
    report: &DailyReport,
) -> Vec<CellRange> {
    let offsets = RowOffsets::for_report(report);
    let mut ranges = Vec::with_capacity(7);

    ranges.push(block(
        sheet_name,
        TITLE_FIRST_ROW,
        PERSONNEL_COLUMNS,
        title_rows(organization, report),
    ));

    ranges.push(block(
        sheet_name,
        PERSONNEL_HEADER_ROW,
        PERSONNEL_COLUMNS,
        vec![text_row(&PERSONNEL_HEADERS)],
    ));

    if offsets.last_personnel_row().is_some() {
        ranges.push(block(
            sheet_name,
            FIRST_PERSONNEL_ROW,
            PERSONNEL_COLUMNS,
            report.personnel.iter().map(personnel_row).collect(),
        ));
    }

    ranges.push(block(
        sheet_name,
        offsets.headcount_row(),
        PERSONNEL_COLUMNS,
        totals_rows(report),
    ));

    ranges.push(block(
        sheet_name,
        offsets.task_section_row(),
        TASK_COLUMNS,
        vec![padded(vec![text(TASK_SECTION_BANNER)], TASK_COLUMNS)],
    ));

    ranges.push(block(
        sheet_name,
        offsets.task_header_row(),
        TASK_COLUMNS,
        vec![text_row(&TASK_HEADERS)],
    ));

    if offsets.last_task_row().is_some() {
        ranges.push(block(
            sheet_name,
            offsets.first_task_row(),
            TASK_COLUMNS,
            task_constraint_rows(report),
        ));
    }

    ranges
}

fn title_rows(organization: &str, report: &DailyReport) -> Vec<Vec<Value>> {
    vec![
        padded(vec![text(organization)], PERSONNEL_COLUMNS),
        padded(
            vec![text(DATE_LABEL), text(&report.report_date)],
            PERSONNEL_COLUMNS,
        ),
        padded(
            vec![text(PROJECT_LABEL), text(&report.project_name)],
            PERSONNEL_COLUMNS,
        ),
    ]
}

fn personnel_row(entry: &PersonnelEntry) -> Vec<Value> {
    vec![
        text(&entry.full_name),
        text(&entry.go_by_name),
        text(&entry.position),
        text(&entry.team_assignment),
        text(entry.health_status_or_default()),
        number(entry.hours_worked_or_default()),
        number(entry.overtime_hours_or_default()),
    ]
}

/// Headcount row carries the sub-column labels; the hours row sits under them.
fn totals_rows(report: &DailyReport) -> Vec<Vec<Value>> {
    vec![
        vec![
            text(HEADCOUNT_LABEL),
            Value::from(report.total_headcount),
            empty(),
            empty(),
            empty(),
            text(REGULAR_HOURS_LABEL),
            text(OVERTIME_HOURS_LABEL),
        ],
        vec![
            text(HOURS_LABEL),
            empty(),
            empty(),
            empty(),
            empty(),
            number(report.total_regular_hours),
            number(report.total_overtime_hours),
        ],
    ]
}

/// Pairs work logs and constraints by index; the shorter side is blank-filled.
fn task_constraint_rows(report: &DailyReport) -> Vec<Vec<Value>> {
    (0..report.task_constraint_rows())
        .map(|index| {
            let (team, task) = report
                .work_logs
                .get(index)
                .map(|log| (text(&log.team_id), text(&log.task_description)))
                .unwrap_or_else(|| (empty(), empty()));
            let (level, constraint) = report
                .constraints
                .get(index)
                .map(|c| (text(&c.level), text(&c.description)))
                .unwrap_or_else(|| (empty(), empty()));
            vec![team, task, level, constraint]
        })
        .collect()
}

fn block(sheet_name: &str, first_row: usize, columns: usize, rows: Vec<Vec<Value>>) -> CellRange {
    let last_row = first_row + rows.len().saturating_sub(1);
    CellRange {
        range: a1_range(sheet_name, 0, first_row, columns - 1, last_row),
        values: rows,
    }
}

fn text_row(labels: &[&str]) -> Vec<Value> {
    labels.iter().map(|label| text(label)).collect()
}

fn padded(mut row: Vec<Value>, width: usize) -> Vec<Value> {
    row.resize(width, empty());
    row
}

fn text(value: &str) -> Value {
    Value::String(value.to_string())
}

fn empty() -> Value {
    Value::String(String::new())
}

/// Whole numbers are written as integers so the sheet shows `8`, not `8.0`.
fn number(value: f64) -> Value {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        Value::from(value as i64)
    } else {
        Value::from(value)
    }
}

/// Builds `<tab>!<col><row>:<col><row>` from zero-based columns and 1-based rows.
pub fn a1_range(
    sheet_name: &str,
    start_column: usize,
    start_row: usize,
    end_column: usize,
    end_row: usize,
) -> String {
    format!(
        "{}!{}{}:{}{}",
        quote_sheet_name(sheet_name),
        column_index_to_letter(start_column),
        start_row,
        column_index_to_letter(end_column),
        end_row
    )
}

/// Single-quotes a tab name for A1 notation, doubling embedded quotes.
/// Every name is quoted, including plain dates like `1/15/2024`.
pub fn quote_sheet_name(sheet_name: &str) -> String {
    format!("'{}'", sheet_name.replace('\'', "''"))
}

/// Converts a zero-based column index to a column letter (0=A, 25=Z, 26=AA, ...).
pub fn column_index_to_letter(index: usize) -> String {
    let mut result = String::new();
    let mut n = index;

    loop {
        result.insert(0, (b'A' + (n % 26) as u8) as char);
        if n < 26 {
            break;
        }
        n = n / 26 - 1;
    }

    result
}
