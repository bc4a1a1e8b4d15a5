//! CLI for computing dashboard analytics from per-symbol parquet files
//! Usage: analyze --data-dir data --symbol GSPC [--table report] > report.json

use std::path::PathBuf;
use std::process::ExitCode;

use chrono::NaiveDate;
use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use compass_analytics::{
    build_report, forward_return_table, frequency_table, history, normalize, rolling_win_rates,
    scan_drawdowns, worst_episodes, ReportParams, WIN_RATE_HORIZONS,
};

#[derive(Parser)]
#[command(version, about = "Drawdown and recovery analytics for one symbol")]
struct Args {
    /// Directory holding <SYMBOL>.parquet price files
    #[arg(long, default_value = "data")]
    data_dir: PathBuf,

    /// Symbol to analyze (file stem of the parquet file)
    #[arg(long)]
    symbol: String,

    /// Which table to print as JSON
    #[arg(long, value_enum, default_value_t = Table::Report)]
    table: Table,

    /// Reference date for calendar figures; defaults to the series' last date
    #[arg(long)]
    as_of: Option<NaiveDate>,

    /// Row count for the worst-drawdown and forward-return tables
    #[arg(long, default_value_t = 15)]
    top: usize,

    /// Starting value for the best-days simulation
    #[arg(long, default_value_t = 10_000.0)]
    initial: f64,
}

#[derive(Clone, Copy, ValueEnum)]
enum Table {
    Report,
    Drawdowns,
    Forward,
    Frequency,
    WinRates,
    BestDays,
    Summary,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let args = Args::parse();

    let raw = match history::load_symbol(&args.data_dir, &args.symbol) {
        Ok(raw) => raw,
        Err(e) => {
            tracing::error!(symbol = %args.symbol, "failed to load price history: {e}");
            return ExitCode::FAILURE;
        }
    };
    let series = match normalize(&raw) {
        Ok(series) => series,
        Err(e) => {
            tracing::error!(symbol = %args.symbol, "unusable price history: {e}");
            return ExitCode::FAILURE;
        }
    };

    let today = args.as_of.unwrap_or_else(|| series.last_date());
    let params = ReportParams {
        worst_count: args.top,
        initial_investment: args.initial,
        ..ReportParams::default()
    };
    let report = build_report(&args.symbol, &series, &params, today);

    let json = match args.table {
        Table::Report => serde_json::to_string_pretty(&report),
        Table::Drawdowns => {
            serde_json::to_string_pretty(&worst_episodes(&scan_drawdowns(&series), args.top))
        }
        Table::Forward => match forward_return_table(&series, args.top) {
            Ok(table) => serde_json::to_string_pretty(&table),
            Err(e) => {
                tracing::error!(symbol = %args.symbol, "forward table: {e}");
                return ExitCode::FAILURE;
            }
        },
        Table::Frequency => serde_json::to_string_pretty(&frequency_table(
            &scan_drawdowns(&series),
            series.span_years(),
        )),
        Table::WinRates => {
            serde_json::to_string_pretty(&rolling_win_rates(&series, &WIN_RATE_HORIZONS))
        }
        Table::BestDays => serde_json::to_string_pretty(&report.best_days),
        Table::Summary => serde_json::to_string_pretty(&report.summary),
    };

    println!("{}", json.expect("Failed to serialize"));
    ExitCode::SUCCESS
}
