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

mod auth;
mod config;
mod report;
mod sheets;
mod utils;

use auth::{AuthManager, SecretSource, secrets::DEFAULT_CREDENTIALS_ENV};
use clap::{Args, Parser, Subcommand, ValueEnum};
use config::{Config, DEFAULT_ORGANIZATION};
use report::DailyReport;
use sheets::{ReportWriter, layout, target};
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Debug, Clone, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn as_env_filter(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

#[derive(Debug, Args)]
struct CredentialArgs {
    /// Read OAuth authorized-user credentials from this file
    #[arg(long)]
    credentials_file: Option<PathBuf>,

    /// Environment variable holding the OAuth authorized-user credential JSON
    #[arg(long, default_value = DEFAULT_CREDENTIALS_ENV)]
    credentials_env: String,
}

impl CredentialArgs {
    fn into_source(self) -> SecretSource {
        match self.credentials_file {
            Some(path) => SecretSource::File(path),
            None => SecretSource::Env(self.credentials_env),
        }
    }
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Check that the credentials can read the spreadsheet metadata
    TestConnection {
        /// Spreadsheet URL or ID
        #[arg(long, env = "SITE_REPORT_SPREADSHEET")]
        spreadsheet: String,

        #[command(flatten)]
        credentials: CredentialArgs,
    },
    /// Write a daily report into the tab named after its report date
    WriteReport {
        /// Spreadsheet URL or ID
        #[arg(long, env = "SITE_REPORT_SPREADSHEET")]
        spreadsheet: String,

        /// Path to the daily report JSON file
        #[arg(long)]
        report: PathBuf,

        /// Organization name for the title block
        #[arg(long, env = "SITE_REPORT_ORGANIZATION", default_value = DEFAULT_ORGANIZATION)]
        organization: String,

        /// Preview the cell layout without calling the API
        #[arg(long)]
        dry_run: bool,

        #[command(flatten)]
        credentials: CredentialArgs,
    },
}

#[derive(Parser)]
#[command(name = "site-report-sheets")]
#[command(about = "Write daily construction-site personnel reports into Google Sheets")]
#[command(version)]
struct Cli {
    /// Controls verbosity of log output (overrides RUST_LOG when provided)
    #[arg(long, value_enum, default_value = "info", global = true)]
    log_level: LogLevel,
    #[command(subcommand)]
    command: Commands,
}

fn init_logging(level: &LogLevel) -> anyhow::Result<()> {
    use tracing_subscriber::{EnvFilter, fmt};

    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(level.as_env_filter()))?;

    fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_level(true)
        .init();

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize default crypto provider for rustls
    rustls::crypto::ring::default_provider()
        .install_default()
        .map_err(|_| anyhow::anyhow!("Failed to install rustls crypto provider"))?;

    let cli = Cli::parse();
    init_logging(&cli.log_level)?;

    match cli.command {
        Commands::TestConnection {
            spreadsheet,
            credentials,
        } => {
            handle_test_connection(spreadsheet, credentials.into_source()).await?;
        }
        Commands::WriteReport {
            spreadsheet,
            report,
            organization,
            dry_run,
            credentials,
        } => {
            let config = Config::new(
                spreadsheet,
                report,
                organization,
                credentials.into_source(),
                dry_run,
            );
            handle_write_report(config).await?;
        }
    }

    Ok(())
}

async fn handle_test_connection(spreadsheet: String, credentials: SecretSource) -> anyhow::Result<()> {
    info!("🔌 Testing connection to spreadsheet: {}", spreadsheet);
    info!("🔐 Credentials: {}", credentials);

    let auth_manager = AuthManager::new(credentials);
    let client = sheets::google::connect_with(&auth_manager).await?;
    let writer = ReportWriter::new(client, DEFAULT_ORGANIZATION);

    if !writer.test_connection(&spreadsheet).await {
        anyhow::bail!(
            "❌ Connection test failed.\n\n\
            Troubleshooting tips:\n\
            • Check that the spreadsheet URL contains /spreadsheets/d/<id>\n\
            • Ensure the OAuth user has access to the spreadsheet\n\
            • Check that Google Sheets API is enabled in your Google Cloud project"
        );
    }

    Ok(())
}

async fn handle_write_report(config: Config) -> anyhow::Result<()> {
    if config.dry_run {
        info!("🔍 Running in dry-run mode - no changes will be made");
    }

    info!("📄 Report file: {:?}", config.report_path);
    info!("📊 Spreadsheet: {}", config.spreadsheet);
    info!("🏢 Organization: {}", config.organization);

    config.validate()?;
    let report = DailyReport::from_json_file(&config.report_path)?;

    if config.dry_run {
        return preview_report(&config, &report);
    }

    let auth_manager = AuthManager::new(config.credentials.clone());
    let client = sheets::google::connect_with(&auth_manager).await?;
    let writer = ReportWriter::new(client, config.organization.clone());

    let summary = writer
        .write_daily_report(&config.spreadsheet, &report)
        .await?;

    info!(
        "✅ Report '{}' written to sheet ID {} ({} ranges{})",
        summary.target.sheet_name,
        summary.target.sheet_numeric_id,
        summary.ranges_written,
        if summary.created_tab { ", new tab" } else { "" }
    );

    if let sheets::format::FormattingOutcome::Failed(reason) = &summary.formatting {
        warn!("⚠️  Data written but formatting was skipped: {}", reason);
    }

    Ok(())
}

fn preview_report(config: &Config, report: &DailyReport) -> anyhow::Result<()> {
    let spreadsheet_id = target::extract_spreadsheet_id(&config.spreadsheet)?;
    target::validate_sheet_name(&report.report_date)?;

    let ranges = layout::build_report_ranges(&report.report_date, &config.organization, report);
    info!(
        "🔍 [DRY RUN] Would write {} ranges to tab '{}' of spreadsheet {}",
        ranges.len(),
        report.report_date,
        spreadsheet_id
    );
    for range in &ranges {
        info!("  📝 {} ({} rows)", range.range, range.values.len());
    }

    Ok(())
}
