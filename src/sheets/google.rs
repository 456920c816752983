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

use crate::auth::oauth::{self, SheetsAuthenticator};
use crate::sheets::client::{
    CellRange, CellStyle, FormatDirective, GridArea, RgbColor, SpreadsheetClient,
    SpreadsheetMetadata, TabInfo,
};
use anyhow::{Context, Result};
use google_sheets4::{
    FieldMask, Sheets,
    api::{
        AddSheetRequest, BatchUpdateSpreadsheetRequest, BatchUpdateValuesRequest, CellData,
        CellFormat, Color, DimensionProperties, DimensionRange, GridProperties,
        GridRange, RepeatCellRequest, Request, SheetProperties, TextFormat,
        UpdateDimensionPropertiesRequest, UpdateSheetPropertiesRequest, ValueRange,
    },
    hyper_rustls,
};
use hyper_util::{client::legacy::connect::HttpConnector, rt::TokioExecutor};
use std::future::Future;
use tokio::time::{Duration, sleep};
use tracing::{debug, info, warn};

type Hub = Sheets<hyper_rustls::HttpsConnector<HttpConnector>>;

const RATE_LIMIT_MAX_RETRIES: usize = 3;

/// Cells are stored verbatim; Sheets does not parse text into numbers or formulas.
const VALUE_INPUT_OPTION: &str = "RAW";

/// `SpreadsheetClient` backed by the Google Sheets v4 API.
pub struct GoogleSheetsClient {
    hub: Hub,
}

impl GoogleSheetsClient {
    fn is_rate_limit_error(error: &google_sheets4::Error) -> bool {
        let message = error.to_string().to_lowercase();
        message.contains("rate")
            || message.contains("quota")
            || message.contains("too many requests")
            || message.contains("429")
    }

    fn rate_limit_delay(attempt: usize) -> Duration {
        let base_ms: u64 = 500;
        let exponent = attempt.saturating_sub(1) as u32;
        let multiplier = 2_u64.saturating_pow(exponent).min(16);
        Duration::from_millis(base_ms * multiplier)
    }

    async fn call_with_rate_limit_retry<T, F, Fut>(description: &str, mut operation: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, google_sheets4::Error>>,
    {
        let mut attempt = 0usize;
        loop {
            match operation().await {
                Ok(value) => return Ok(value),
                Err(err)
                    if attempt < RATE_LIMIT_MAX_RETRIES
                        && GoogleSheetsClient::is_rate_limit_error(&err) =>
                {
                    attempt += 1;
                    let delay = GoogleSheetsClient::rate_limit_delay(attempt);
                    warn!(
                        "🔁 {} hit Google rate limit (attempt {}/{}), retrying in {:?}",
                        description, attempt, RATE_LIMIT_MAX_RETRIES, delay
                    );
                    sleep(delay).await;
                }
                Err(err) => {
                    return Err(anyhow::anyhow!("{} failed: {}", description, err));
                }
            }
        }
    }

    /// Builds the Sheets API hub over an already verified authenticator.
    pub fn connect(auth: SheetsAuthenticator) -> Result<Self> {
        info!("🔑 Initializing Google Sheets API connection...");

        let client = hyper_util::client::legacy::Client::builder(TokioExecutor::new()).build(
            hyper_rustls::HttpsConnectorBuilder::new()
                .with_native_roots()
                .context("Failed to load native TLS root certificates")?
                .https_or_http()
                .enable_http1()
                .build(),
        );

        let hub = Sheets::new(client, auth);
        info!("✅ Google Sheets API connection established");
        Ok(Self { hub })
    }

    fn grid_range(area: &GridArea) -> GridRange {
        GridRange {
            sheet_id: Some(area.sheet_numeric_id),
            start_row_index: Some(area.start_row),
            end_row_index: Some(area.end_row),
            start_column_index: Some(area.start_column),
            end_column_index: Some(area.end_column),
            ..Default::default()
        }
    }

    fn color(rgb: &RgbColor) -> Color {
        Color {
            red: Some(rgb.red),
            green: Some(rgb.green),
            blue: Some(rgb.blue),
            ..Default::default()
        }
    }

    /// Translates a style into a cell format plus the field mask it touches.
    fn cell_format(style: &CellStyle) -> (CellFormat, Vec<&'static str>) {
        let mut fields = Vec::new();
        let mut format = CellFormat::default();

        if let Some(background) = &style.background {
            format.background_color = Some(Self::color(background));
            fields.push("userEnteredFormat.backgroundColor");
        }

        if style.bold.is_some() || style.font_size.is_some() {
            format.text_format = Some(TextFormat {
                bold: style.bold,
                font_size: style.font_size,
                ..Default::default()
            });
        }
        if style.bold.is_some() {
            fields.push("userEnteredFormat.textFormat.bold");
        }
        if style.font_size.is_some() {
            fields.push("userEnteredFormat.textFormat.fontSize");
        }

        if let Some(alignment) = &style.horizontal_alignment {
            format.horizontal_alignment = Some(alignment.as_api_str().to_string());
            fields.push("userEnteredFormat.horizontalAlignment");
        }

        (format, fields)
    }

    fn to_request(directive: &FormatDirective) -> Request {
        match directive {
            FormatDirective::StyleCells { area, style } => {
                let (format, fields) = Self::cell_format(style);
                Request {
                    repeat_cell: Some(RepeatCellRequest {
                        range: Some(Self::grid_range(area)),
                        cell: Some(CellData {
                            user_entered_format: Some(format),
                            ..Default::default()
                        }),
                        fields: Some(FieldMask::new(fields.as_slice())),
                        ..Default::default()
                    }),
                    ..Default::default()
                }
            }
            FormatDirective::FreezeRows {
                sheet_numeric_id,
                rows,
            } => Request {
                update_sheet_properties: Some(UpdateSheetPropertiesRequest {
                    properties: Some(SheetProperties {
                        sheet_id: Some(*sheet_numeric_id),
                        grid_properties: Some(GridProperties {
                            frozen_row_count: Some(*rows),
                            ..Default::default()
                        }),
                        ..Default::default()
                    }),
                    fields: Some(FieldMask::new(&["gridProperties.frozenRowCount"])),
                    ..Default::default()
                }),
                ..Default::default()
            },
            FormatDirective::ColumnWidth {
                sheet_numeric_id,
                start_column,
                end_column,
                pixels,
            } => Request {
                update_dimension_properties: Some(UpdateDimensionPropertiesRequest {
                    range: Some(DimensionRange {
                        sheet_id: Some(*sheet_numeric_id),
                        dimension: Some("COLUMNS".to_string()),
                        start_index: Some(*start_column),
                        end_index: Some(*end_column),
                        ..Default::default()
                    }),
                    properties: Some(DimensionProperties {
                        pixel_size: Some(*pixels),
                        ..Default::default()
                    }),
                    fields: Some(FieldMask::new(&["pixelSize"])),
                    ..Default::default()
                }),
                ..Default::default()
            },
        }
    }

    fn values_request(ranges: &[CellRange]) -> BatchUpdateValuesRequest {
        BatchUpdateValuesRequest {
            value_input_option: Some(VALUE_INPUT_OPTION.to_string()),
            data: Some(ranges.iter().map(Self::value_range).collect()),
            ..Default::default()
        }
    }

    fn value_range(range: &CellRange) -> ValueRange {
        ValueRange {
            range: Some(range.range.clone()),
            values: Some(range.values.clone()),
            major_dimension: Some("ROWS".to_string()),
            ..Default::default()
        }
    }
}

impl SpreadsheetClient for GoogleSheetsClient {
    async fn spreadsheet_metadata(&self, spreadsheet_id: &str) -> Result<SpreadsheetMetadata> {
        debug!("📊 Fetching metadata for spreadsheet: {}", spreadsheet_id);
        let hub = &self.hub;

        let (_, spreadsheet) =
            Self::call_with_rate_limit_retry("fetch spreadsheet metadata", || {
                let spreadsheet_id = spreadsheet_id.to_string();
                async move { hub.spreadsheets().get(&spreadsheet_id).doit().await }
            })
            .await
            .with_context(|| {
                format!(
                    "Failed to access Google Sheet with ID '{}'. Please verify:\n\
                    • The spreadsheet ID is correct\n\
                    • The spreadsheet exists and is not deleted\n\
                    • The OAuth user has permission to access it",
                    spreadsheet_id
                )
            })?;

        let title = spreadsheet
            .properties
            .as_ref()
            .and_then(|p| p.title.clone())
            .unwrap_or_else(|| spreadsheet_id.to_string());

        let tabs = spreadsheet
            .sheets
            .unwrap_or_default()
            .into_iter()
            .filter_map(|sheet| {
                let properties = sheet.properties?;
                Some(TabInfo {
                    title: properties.title?,
                    numeric_id: properties.sheet_id?,
                })
            })
            .collect();

        Ok(SpreadsheetMetadata { title, tabs })
    }

    async fn add_tab(&self, spreadsheet_id: &str, title: &str) -> Result<i32> {
        let hub = &self.hub;
        let batch_request = BatchUpdateSpreadsheetRequest {
            requests: Some(vec![Request {
                add_sheet: Some(AddSheetRequest {
                    properties: Some(SheetProperties {
                        title: Some(title.to_string()),
                        ..Default::default()
                    }),
                    ..Default::default()
                }),
                ..Default::default()
            }]),
            ..Default::default()
        };

        let (_, response) = Self::call_with_rate_limit_retry("create worksheet", || {
            let spreadsheet_id = spreadsheet_id.to_string();
            let request = batch_request.clone();
            async move {
                hub.spreadsheets()
                    .batch_update(request, &spreadsheet_id)
                    .doit()
                    .await
            }
        })
        .await
        .with_context(|| format!("Failed to create worksheet '{}'", title))?;

        if let Some(replies) = response.replies
            && let Some(reply) = replies.first()
            && let Some(add_sheet) = &reply.add_sheet
            && let Some(properties) = &add_sheet.properties
            && let Some(new_sheet_id) = properties.sheet_id
        {
            return Ok(new_sheet_id);
        }

        anyhow::bail!("Failed to get sheet ID from create response")
    }

    async fn batch_write_values(&self, spreadsheet_id: &str, ranges: &[CellRange]) -> Result<()> {
        let hub = &self.hub;
        let batch_request = Self::values_request(ranges);

        let (_, response) = Self::call_with_rate_limit_retry("batch update values", || {
            let spreadsheet_id = spreadsheet_id.to_string();
            let request = batch_request.clone();
            async move {
                hub.spreadsheets()
                    .values_batch_update(request, &spreadsheet_id)
                    .doit()
                    .await
            }
        })
        .await?;

        debug!(
            "✅ Updated {} cells across {} rows",
            response.total_updated_cells.unwrap_or(0),
            response.total_updated_rows.unwrap_or(0)
        );
        Ok(())
    }

    async fn batch_update_structure(
        &self,
        spreadsheet_id: &str,
        directives: &[FormatDirective],
    ) -> Result<()> {
        let hub = &self.hub;
        let batch_request = BatchUpdateSpreadsheetRequest {
            requests: Some(directives.iter().map(Self::to_request).collect()),
            ..Default::default()
        };

        Self::call_with_rate_limit_retry("apply formatting", || {
            let spreadsheet_id = spreadsheet_id.to_string();
            let request = batch_request.clone();
            async move {
                hub.spreadsheets()
                    .batch_update(request, &spreadsheet_id)
                    .doit()
                    .await
            }
        })
        .await?;

        Ok(())
    }
}

/// Authenticates with the given credentials and returns a ready client.
pub async fn connect_with(auth_manager: &oauth::AuthManager) -> Result<GoogleSheetsClient> {
    let auth = auth_manager
        .authenticator()
        .await
        .context("Failed to create Google Sheets authenticator")?;
    GoogleSheetsClient::connect(auth)
}
