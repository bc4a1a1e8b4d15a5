//! Rolling-window win rates and best-days-removed simulations
//!
//! Win rate: fraction of rolling holding-period windows with a strictly
//! positive simple return. Best-days: total compounded outcome when the K
//! largest single-day returns are replaced with zero, the dashboard's "cost
//! of trying to time the market" counterfactual.

use serde::Serialize;

use crate::common::round1;
use crate::series::PriceSeries;

/// Standard holding horizons in trading days (252 per year).
pub const WIN_RATE_HORIZONS: [(usize, &str); 5] = [
    (252, "1Y"),
    (756, "3Y"),
    (1260, "5Y"),
    (2520, "10Y"),
    (5040, "20Y"),
];

/// Standard best-days scenarios; 0 is the fully invested baseline.
pub const BEST_DAY_SCENARIOS: [usize; 4] = [0, 10, 20, 30];

/// Win rate for one holding horizon, in percent.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RollingWindowResult {
    pub horizon_label: String,
    pub win_rate_pct: f64,
}

/// Final portfolio value after compounding with the top-K days zeroed out.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BestDaysScenario {
    pub scenario_label: String,
    pub final_value: f64,
}

/// Win rate over all rolling windows `close[t] / close[t-h] - 1`, in percent,
/// unrounded. `None` when the series has fewer than `days + 1` points.
pub fn win_rate_pct(closes: &[f64], days: usize) -> Option<f64> {
    if days == 0 || closes.len() < days + 1 {
        return None;
    }
    let mut wins = 0usize;
    let mut total = 0usize;
    for t in days..closes.len() {
        total += 1;
        if closes[t] / closes[t - days] - 1.0 > 0.0 {
            wins += 1;
        }
    }
    Some(wins as f64 / total as f64 * 100.0)
}

/// Win rate per horizon, rounded to 1 decimal. Horizons longer than the
/// series are skipped, not reported as zero.
pub fn rolling_win_rates(
    series: &PriceSeries,
    horizons: &[(usize, &str)],
) -> Vec<RollingWindowResult> {
    let closes = series.closes();
    horizons
        .iter()
        .filter_map(|&(days, label)| {
            win_rate_pct(closes, days).map(|rate| RollingWindowResult {
                horizon_label: label.to_string(),
                win_rate_pct: round1(rate),
            })
        })
        .collect()
}

/// Compound `initial_value` through a simple-return series.
pub fn compound(returns: &[f64], initial_value: f64) -> f64 {
    returns.iter().fold(initial_value, |acc, r| acc * (1.0 + r))
}

/// Copy of `returns` with the `k` largest values replaced by zero in place.
/// Sequence length and every other return are preserved; ties resolve to the
/// earliest day.
fn zero_top_k(returns: &[f64], k: usize) -> Vec<f64> {
    let mut order: Vec<usize> = (0..returns.len()).collect();
    order.sort_by(|&a, &b| {
        returns[b]
            .partial_cmp(&returns[a])
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.cmp(&b))
    });
    let mut adjusted = returns.to_vec();
    for &idx in order.iter().take(k) {
        adjusted[idx] = 0.0;
    }
    adjusted
}

/// Final values for each "missed the best K days" scenario.
///
/// K = 0 is labeled "Fully Invested"; the returns stay simple (arithmetic)
/// daily changes and compounding stays multiplicative.
pub fn best_days_scenarios(
    daily_returns: &[f64],
    initial_value: f64,
    k_list: &[usize],
) -> Vec<BestDaysScenario> {
    k_list
        .iter()
        .map(|&k| {
            let final_value = if k == 0 {
                compound(daily_returns, initial_value)
            } else {
                compound(&zero_top_k(daily_returns, k), initial_value)
            };
            BestDaysScenario {
                scenario_label: if k == 0 {
                    "Fully Invested".to_string()
                } else {
                    format!("Missed Top {k} Days")
                },
                final_value,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::{PricePoint, PriceSeries};
    use chrono::NaiveDate;

    fn series_from(closes: &[f64]) -> PriceSeries {
        let start = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        PriceSeries::from_daily(
            closes
                .iter()
                .enumerate()
                .map(|(i, &close)| PricePoint {
                    date: start + chrono::Duration::days(i as i64),
                    close,
                })
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_win_rate_counts_positive_windows() {
        // 2-day windows over [100, 90, 105, 95, 110]:
        // 105/100, 95/90, 110/105 -> 3 of 3 positive.
        // 1-day windows: -, +, -, + -> 2 of 4.
        let s = series_from(&[100.0, 90.0, 105.0, 95.0, 110.0]);
        let rates = rolling_win_rates(&s, &[(1, "1D"), (2, "2D")]);
        assert_eq!(rates.len(), 2);
        assert_eq!(rates[0].win_rate_pct, 50.0);
        assert_eq!(rates[1].win_rate_pct, 100.0);
    }

    #[test]
    fn test_win_rate_skips_horizons_longer_than_series() {
        let s = series_from(&[100.0, 101.0, 102.0]);
        let rates = rolling_win_rates(&s, &[(2, "2D"), (5, "5D")]);
        assert_eq!(rates.len(), 1);
        assert_eq!(rates[0].horizon_label, "2D");
    }

    #[test]
    fn test_flat_window_is_not_a_win() {
        let s = series_from(&[100.0, 100.0, 100.0]);
        let rates = rolling_win_rates(&s, &[(1, "1D")]);
        assert_eq!(rates[0].win_rate_pct, 0.0);
    }

    #[test]
    fn test_best_days_zeroes_exactly_top_k() {
        let returns = [0.01, -0.02, 0.05, 0.01];
        let scenarios = best_days_scenarios(&returns, 10_000.0, &[0, 1]);
        assert_eq!(scenarios[0].scenario_label, "Fully Invested");
        assert_eq!(scenarios[1].scenario_label, "Missed Top 1 Days");
        let expected_full = 10_000.0 * 1.01 * 0.98 * 1.05 * 1.01;
        let expected_missed = 10_000.0 * 1.01 * 0.98 * 1.00 * 1.01;
        assert!((scenarios[0].final_value - expected_full).abs() < 1e-9);
        assert!((scenarios[1].final_value - expected_missed).abs() < 1e-9);
    }

    #[test]
    fn test_best_days_tie_prefers_earliest_day() {
        let returns = [0.03, 0.01, 0.03];
        let adjusted = zero_top_k(&returns, 1);
        assert_eq!(adjusted, vec![0.0, 0.01, 0.03]);
    }

    #[test]
    fn test_best_days_monotonic_in_k() {
        let returns = [0.02, -0.01, 0.04, 0.01, -0.03, 0.05, 0.02];
        let scenarios = best_days_scenarios(&returns, 10_000.0, &[0, 1, 2, 3]);
        for pair in scenarios.windows(2) {
            assert!(pair[1].final_value <= pair[0].final_value);
        }
    }

    #[test]
    fn test_k_beyond_length_zeroes_every_return() {
        let returns = [0.02, -0.01];
        let scenarios = best_days_scenarios(&returns, 100.0, &[5]);
        assert!((scenarios[0].final_value - 100.0).abs() < 1e-9);
    }
}
