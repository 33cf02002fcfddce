use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use clap::Parser;
use shared::SalesReportRequest;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use lottery_pos_backend::{DashboardConfig, DashboardError, DashboardService, ExportService, JsonFileReportSource};

/// Exit code when the report source says the session is gone
const EXIT_UNAUTHENTICATED: u8 = 2;

/// Build the sales dashboard views from a saved sales report
#[derive(Parser, Debug)]
#[command(name = "sales-dashboard", version, about)]
struct Cli {
    /// JSON response of the sales reporting endpoint
    #[arg(long, value_name = "FILE")]
    report: PathBuf,

    /// Dashboard config (YAML); defaults to the user config directory
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Reference time (RFC 3339) instead of the current clock
    #[arg(long, value_name = "RFC3339", value_parser = parse_now)]
    now: Option<DateTime<Utc>>,

    /// First sale date to include
    #[arg(long, value_name = "YYYY-MM-DD")]
    from: Option<NaiveDate>,

    /// Last sale date to include
    #[arg(long, value_name = "YYYY-MM-DD")]
    to: Option<NaiveDate>,

    /// Maximum number of sale records to read
    #[arg(long)]
    limit: Option<u32>,

    /// Also write the recent transactions and trend as CSV files here
    #[arg(long, value_name = "DIR")]
    export_dir: Option<PathBuf>,

    /// Pretty-print the dashboard JSON
    #[arg(long)]
    pretty: bool,
}

fn parse_now(value: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(value)
        .map(|now| now.with_timezone(&Utc))
        .map_err(|e| format!("invalid RFC 3339 timestamp: {}", e))
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if let Some(DashboardError::Unauthenticated) = e.downcast_ref::<DashboardError>() {
                error!("Session expired; sign in again and re-export the report");
                return ExitCode::from(EXIT_UNAUTHENTICATED);
            }
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = DashboardConfig::load_or_default(cli.config.as_deref()).context("Failed to load dashboard config")?;
    info!("Using dashboard config: {:?}", config);

    let source = JsonFileReportSource::new(&cli.report).with_timezone(config.timezone);
    let timezone = config.timezone;
    let service = DashboardService::new(Arc::new(source), config);

    let request = SalesReportRequest {
        start_date: cli.from,
        end_date: cli.to,
        limit: cli.limit,
    };
    let now = cli.now.unwrap_or_else(Utc::now);

    let view = service.refresh_from(&request, now).await?;

    let output = if cli.pretty {
        serde_json::to_string_pretty(&view)?
    } else {
        serde_json::to_string(&view)?
    };
    println!("{}", output);

    if let Some(export_dir) = cli.export_dir {
        let export_service = ExportService::new();
        let reference_date = timezone.date_at(now);

        let transactions = export_service.export_transactions_csv(&view.recent_transactions, reference_date)?;
        export_service.write_to_dir(&transactions, &export_dir)?;

        let trend = export_service.export_trend_csv(&view.trend, reference_date)?;
        export_service.write_to_dir(&trend, &export_dir)?;
    }

    Ok(())
}
