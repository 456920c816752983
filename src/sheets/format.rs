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

use crate::sheets::client::{
    CellStyle, FormatDirective, GridArea, HorizontalAlignment, RgbColor,
};
use crate::sheets::layout::{PERSONNEL_COLUMNS, PERSONNEL_HEADER_ROW, TITLE_LAST_ROW};

const TITLE_BACKGROUND: RgbColor = RgbColor {
    red: 0.2,
    green: 0.4,
    blue: 0.6,
};
const HEADER_BACKGROUND: RgbColor = RgbColor {
    red: 0.85,
    green: 0.85,
    blue: 0.85,
};
const TITLE_FONT_SIZE: i32 = 14;
const FIRST_COLUMN_WIDTH_PX: i32 = 200;

/// Template formatting for a report tab. Grid indices are zero-based.
pub fn template_directives(sheet_numeric_id: i32) -> Vec<FormatDirective> {
    let header_row = (PERSONNEL_HEADER_ROW - 1) as i32;
    let columns = PERSONNEL_COLUMNS as i32;

    vec![
        FormatDirective::StyleCells {
            area: GridArea {
                sheet_numeric_id,
                start_row: 0,
                end_row: TITLE_LAST_ROW as i32,
                start_column: 0,
                end_column: columns,
            },
            style: CellStyle {
                background: Some(TITLE_BACKGROUND),
                bold: Some(true),
                font_size: Some(TITLE_FONT_SIZE),
                horizontal_alignment: None,
            },
        },
        FormatDirective::StyleCells {
            area: GridArea {
                sheet_numeric_id,
                start_row: header_row,
                end_row: header_row + 1,
                start_column: 0,
                end_column: columns,
            },
            style: CellStyle {
                background: Some(HEADER_BACKGROUND),
                bold: Some(true),
                font_size: None,
                horizontal_alignment: Some(HorizontalAlignment::Center),
            },
        },
        FormatDirective::FreezeRows {
            sheet_numeric_id,
            rows: PERSONNEL_HEADER_ROW as i32,
        },
        FormatDirective::ColumnWidth {
            sheet_numeric_id,
            start_column: 0,
            end_column: 1,
            pixels: FIRST_COLUMN_WIDTH_PX,
        },
    ]
}

/// Result of the best-effort formatting step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormattingOutcome {
    Applied,
    /// Formatting failed and was skipped; the message is kept for reporting.
    Failed(String),
}

impl FormattingOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, FormattingOutcome::Applied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_targets_title_and_header_rows() {
        let directives = template_directives(77);
        assert_eq!(directives.len(), 4);

        match &directives[0] {
            FormatDirective::StyleCells { area, style } => {
                assert_eq!((area.start_row, area.end_row), (0, 3));
                assert_eq!((area.start_column, area.end_column), (0, 7));
                assert_eq!(style.font_size, Some(14));
                assert_eq!(style.bold, Some(true));
            }
            other => panic!("unexpected directive: {:?}", other),
        }

        match &directives[1] {
            FormatDirective::StyleCells { area, style } => {
                assert_eq!((area.start_row, area.end_row), (6, 7));
                assert_eq!(style.horizontal_alignment, Some(HorizontalAlignment::Center));
            }
            other => panic!("unexpected directive: {:?}", other),
        }
    }

    #[test]
    fn template_freezes_header_and_sizes_first_column() {
        let directives = template_directives(9);
        assert!(directives.contains(&FormatDirective::FreezeRows {
            sheet_numeric_id: 9,
            rows: 7
        }));
        assert!(directives.contains(&FormatDirective::ColumnWidth {
            sheet_numeric_id: 9,
            start_column: 0,
            end_column: 1,
            pixels: 200
        }));
    }
}
