//! Assembled per-symbol dashboard payload
//!
//! Pulls every analytics table together for one symbol and owns the
//! data-sufficiency policy: a section that cannot be built from the available
//! history degrades to `None`/empty while the rest of the report still
//! renders. The reference date is injected, never read from a clock.

use chrono::NaiveDate;
use serde::Serialize;

use crate::drawdown::{scan_drawdowns, worst_episodes, DrawdownEpisode};
use crate::forward::{forward_return_table, ForwardReturnTable, WORST_QUARTER_COUNT};
use crate::frequency::{frequency_table, FrequencyBucket, FREQUENCY_THRESHOLD_PCT};
use crate::periods::{
    day_change_pct, month_to_date_pct, prior_month_pct, trailing_returns, PeriodReturn,
    TRAILING_PERIODS,
};
use crate::rolling::{
    best_days_scenarios, rolling_win_rates, BestDaysScenario, RollingWindowResult,
    BEST_DAY_SCENARIOS, WIN_RATE_HORIZONS,
};
use crate::series::PriceSeries;
use crate::temperature::{ma_disparity_pct, TEMPERATURE_MA_PERIOD};

/// Series shorter than this produce no drawdown tables.
pub const MIN_DRAWDOWN_TABLE_POINTS: usize = 10;

/// Daily returns needed before the best-days simulation is meaningful.
pub const MIN_BEST_DAYS_RETURNS: usize = 50;

/// Minimum calendar span for the frequency table.
pub const MIN_FREQUENCY_SPAN_YEARS: f64 = 1.0;

/// Tunable report inputs with the dashboard defaults.
#[derive(Debug, Clone)]
pub struct ReportParams {
    pub worst_count: usize,
    pub initial_investment: f64,
    pub best_day_ks: Vec<usize>,
    pub disparity_period: usize,
}

impl Default for ReportParams {
    fn default() -> Self {
        Self {
            worst_count: WORST_QUARTER_COUNT,
            initial_investment: 10_000.0,
            best_day_ks: BEST_DAY_SCENARIOS.to_vec(),
            disparity_period: TEMPERATURE_MA_PERIOD,
        }
    }
}

/// Headline figures for the summary row.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SymbolSummary {
    pub symbol: String,
    pub last_date: NaiveDate,
    pub last_close: f64,
    pub day_change_pct: Option<f64>,
    pub month_to_date_pct: Option<f64>,
    pub prior_month_pct: Option<f64>,
    pub trailing_returns: Vec<PeriodReturn>,
    pub ma_disparity_pct: Option<f64>,
}

/// Everything the dashboard renders for one symbol.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketReport {
    pub summary: SymbolSummary,
    pub worst_drawdowns: Vec<DrawdownEpisode>,
    pub forward_returns: Option<ForwardReturnTable>,
    pub drop_frequency: Option<Vec<FrequencyBucket>>,
    pub win_rates: Vec<RollingWindowResult>,
    pub best_days: Vec<BestDaysScenario>,
}

/// Build the full report for one normalized series.
pub fn build_report(
    symbol: &str,
    series: &PriceSeries,
    params: &ReportParams,
    today: NaiveDate,
) -> MarketReport {
    let episodes = if series.len() >= MIN_DRAWDOWN_TABLE_POINTS {
        scan_drawdowns(series)
    } else {
        Vec::new()
    };

    let drop_frequency = if series.span_years() >= MIN_FREQUENCY_SPAN_YEARS
        && episodes
            .iter()
            .any(|e| e.depth_pct <= FREQUENCY_THRESHOLD_PCT)
    {
        Some(frequency_table(&episodes, series.span_years()))
    } else {
        None
    };

    let daily_returns = series.daily_returns();
    let best_days = if daily_returns.len() >= MIN_BEST_DAYS_RETURNS {
        best_days_scenarios(&daily_returns, params.initial_investment, &params.best_day_ks)
    } else {
        Vec::new()
    };

    MarketReport {
        summary: SymbolSummary {
            symbol: symbol.to_string(),
            last_date: series.last_date(),
            last_close: series.last_close(),
            day_change_pct: day_change_pct(series),
            month_to_date_pct: month_to_date_pct(series, today),
            prior_month_pct: prior_month_pct(series, today),
            trailing_returns: trailing_returns(series, &TRAILING_PERIODS),
            ma_disparity_pct: ma_disparity_pct(series, params.disparity_period),
        },
        worst_drawdowns: worst_episodes(&episodes, params.worst_count),
        forward_returns: forward_return_table(series, params.worst_count).ok(),
        drop_frequency,
        win_rates: rolling_win_rates(series, &WIN_RATE_HORIZONS),
        best_days,
    }
}
