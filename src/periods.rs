//! Point-to-point and calendar-period returns
//!
//! The summary-table figures: day-over-day change, month-to-date, the full
//! prior month, and trailing performance over fixed trading-day windows.
//! Daily-table figures round to 2 decimals, multi-period figures to 1.
//!
//! `today` is always an argument, never read from a clock, so a given series
//! yields the same figures on every call.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::common::{round1, round2};
use crate::series::PriceSeries;

/// Trailing performance windows in trading days.
pub const TRAILING_PERIODS: [(&str, usize); 7] = [
    ("1M", 21),
    ("3M", 63),
    ("6M", 126),
    ("1Y", 252),
    ("3Y", 756),
    ("5Y", 1260),
    ("10Y", 2520),
];

/// One trailing-performance cell; `None` when the series is shorter than the
/// window.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodReturn {
    pub label: String,
    pub return_pct: Option<f64>,
}

/// Day-over-day change of the latest close, in percent.
pub fn day_change_pct(series: &PriceSeries) -> Option<f64> {
    let closes = series.closes();
    let n = closes.len();
    if n < 2 {
        return None;
    }
    Some(round2((closes[n - 1] - closes[n - 2]) / closes[n - 2] * 100.0))
}

/// Month-to-date return: latest close versus the first trading close of the
/// month containing `today`. `None` when the month has no observations yet.
pub fn month_to_date_pct(series: &PriceSeries, today: NaiveDate) -> Option<f64> {
    let start = month_start(today);
    let first = series.first_at_or_after(start)?;
    Some(round2(
        (series.last_close() - first.close) / first.close * 100.0,
    ))
}

/// Full prior-month return: last versus first trading close of the month
/// before the one containing `today`. Needs at least two in-month points.
pub fn prior_month_pct(series: &PriceSeries, today: NaiveDate) -> Option<f64> {
    let (start, end) = prior_month_bounds(today)?;
    let in_month: Vec<f64> = series
        .iter()
        .filter(|p| p.date >= start && p.date <= end)
        .map(|p| p.close)
        .collect();
    if in_month.len() < 2 {
        return None;
    }
    let first = in_month[0];
    let last = in_month[in_month.len() - 1];
    Some(round2((last - first) / first * 100.0))
}

/// Trailing returns over fixed trading-day windows, most recent close as the
/// endpoint.
pub fn trailing_returns(series: &PriceSeries, periods: &[(&str, usize)]) -> Vec<PeriodReturn> {
    let closes = series.closes();
    let n = closes.len();
    periods
        .iter()
        .map(|&(label, days)| {
            let return_pct = if n > days {
                let old = closes[n - 1 - days];
                Some(round1((closes[n - 1] / old - 1.0) * 100.0))
            } else {
                None
            };
            PeriodReturn {
                label: label.to_string(),
                return_pct,
            }
        })
        .collect()
}

fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

fn prior_month_bounds(today: NaiveDate) -> Option<(NaiveDate, NaiveDate)> {
    let this_start = month_start(today);
    let prior_end = this_start.pred_opt()?;
    Some((month_start(prior_end), prior_end))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::{PricePoint, PriceSeries};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn series(points: &[(i32, u32, u32, f64)]) -> PriceSeries {
        PriceSeries::from_daily(
            points
                .iter()
                .map(|&(y, m, d, close)| PricePoint { date: date(y, m, d), close })
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_day_change() {
        let s = series(&[(2024, 3, 1, 100.0), (2024, 3, 4, 101.5)]);
        assert_eq!(day_change_pct(&s), Some(1.5));
    }

    #[test]
    fn test_month_to_date() {
        let s = series(&[
            (2024, 2, 28, 95.0),
            (2024, 3, 1, 100.0),
            (2024, 3, 8, 104.0),
        ]);
        assert_eq!(month_to_date_pct(&s, date(2024, 3, 8)), Some(4.0));
    }

    #[test]
    fn test_month_to_date_none_before_first_trading_day() {
        let s = series(&[(2024, 2, 27, 95.0), (2024, 2, 28, 96.0)]);
        assert_eq!(month_to_date_pct(&s, date(2024, 3, 1)), None);
    }

    #[test]
    fn test_prior_month_full_return() {
        let s = series(&[
            (2024, 2, 1, 100.0),
            (2024, 2, 15, 104.0),
            (2024, 2, 29, 106.0),
            (2024, 3, 1, 107.0),
        ]);
        assert_eq!(prior_month_pct(&s, date(2024, 3, 5)), Some(6.0));
    }

    #[test]
    fn test_prior_month_needs_two_points() {
        let s = series(&[(2024, 2, 29, 106.0), (2024, 3, 1, 107.0)]);
        assert_eq!(prior_month_pct(&s, date(2024, 3, 5)), None);
    }

    #[test]
    fn test_prior_month_across_year_boundary() {
        let s = series(&[
            (2023, 12, 1, 100.0),
            (2023, 12, 29, 110.0),
            (2024, 1, 2, 111.0),
        ]);
        assert_eq!(prior_month_pct(&s, date(2024, 1, 15)), Some(10.0));
    }

    #[test]
    fn test_trailing_returns_window_and_none() {
        let points: Vec<(i32, u32, u32, f64)> = (0..30)
            .map(|i| (2024, 1, 1 + i as u32, 100.0 + i as f64))
            .collect();
        let s = series(&points);
        let rows = trailing_returns(&s, &[("1M", 21), ("3M", 63)]);
        // 21 steps back from 129 is 108.
        assert_eq!(rows[0].label, "1M");
        assert_eq!(rows[0].return_pct, Some(round1((129.0 / 108.0 - 1.0) * 100.0)));
        assert_eq!(rows[1].return_pct, None);
    }
}
