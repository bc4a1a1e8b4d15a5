//! # Compass Analytics
//!
//! Drawdown, recovery and long-horizon return analytics for market
//! dashboards.
//!
//! ## Features
//! - Non-overlapping peak -> trough -> recovery drawdown episodes
//! - Worst-quarter forward-return tables
//! - Depth-bucketed drop frequency and recovery statistics
//! - Rolling win rates and "missed the best days" simulations
//! - Deterministic: identical input series, identical output
//! - Compiles to native and WASM
//!
//! ## Example
//! ```
//! use chrono::NaiveDate;
//! use compass_analytics::{scan_drawdowns, PricePoint, PriceSeries};
//!
//! let start = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
//! let points = [100.0, 90.0, 80.0, 85.0, 95.0, 100.0, 110.0]
//!     .iter()
//!     .enumerate()
//!     .map(|(i, &close)| PricePoint {
//!         date: start + chrono::Duration::days(i as i64),
//!         close,
//!     })
//!     .collect();
//!
//! let series = PriceSeries::from_daily(points).unwrap();
//! let episodes = scan_drawdowns(&series);
//! assert_eq!(episodes.len(), 1);
//! assert_eq!(episodes[0].depth_pct, -20.0);
//! ```

pub mod common;
pub mod error;
pub mod series;
pub mod drawdown;
pub mod forward;
pub mod frequency;
pub mod rolling;
pub mod periods;
pub mod temperature;
pub mod history;
pub mod report;

// Re-export the analytics surface at crate root
pub use error::AnalyticsError;
pub use series::{normalize, PricePoint, PriceSeries, RawPoint};
pub use drawdown::{running_drawdown_pct, scan_drawdowns, worst_episodes, DrawdownEpisode};
pub use forward::{
    first_close_on_or_after, forward_return_table, forward_returns, worst_quarters,
    ForwardReturnRow, ForwardReturnTable, QuarterEnd, FORWARD_HORIZONS,
};
pub use frequency::{frequency_table, FrequencyBucket};
pub use rolling::{
    best_days_scenarios, compound, rolling_win_rates, win_rate_pct, BestDaysScenario,
    RollingWindowResult, BEST_DAY_SCENARIOS, WIN_RATE_HORIZONS,
};
pub use periods::{
    day_change_pct, month_to_date_pct, prior_month_pct, trailing_returns, PeriodReturn,
    TRAILING_PERIODS,
};
pub use temperature::{breadth_above_ma, ma_disparity_pct};
pub use report::{build_report, MarketReport, ReportParams, SymbolSummary};

#[cfg(feature = "wasm")]
use wasm_bindgen::prelude::*;

/// WASM bindings for browser/Node.js use
#[cfg(feature = "wasm")]
#[wasm_bindgen]
pub struct Analytics;

#[cfg(feature = "wasm")]
#[wasm_bindgen]
impl Analytics {
    /// Per-day percentage decline from the running peak
    #[wasm_bindgen]
    pub fn running_drawdown_pct(closes: &[f64]) -> Vec<f64> {
        drawdown::running_drawdown_pct(closes)
    }

    /// Rolling win rate in percent; NaN when the series is too short
    #[wasm_bindgen]
    pub fn win_rate_pct(closes: &[f64], horizon_days: usize) -> f64 {
        rolling::win_rate_pct(closes, horizon_days).unwrap_or(f64::NAN)
    }

    /// Final value after zeroing the top-k daily returns
    #[wasm_bindgen]
    pub fn missed_best_days_value(daily_returns: &[f64], initial_value: f64, k: usize) -> f64 {
        let scenarios = rolling::best_days_scenarios(daily_returns, initial_value, &[k]);
        scenarios
            .first()
            .map(|s| s.final_value)
            .unwrap_or(f64::NAN)
    }
}
