//! Market temperature gauges
//!
//! Moving-average disparity for a single index fund, and breadth (share of
//! symbols trading above their long moving average) across a basket.

use crate::common::{mean, round1};
use crate::series::PriceSeries;

/// Default moving-average length for both gauges.
pub const TEMPERATURE_MA_PERIOD: usize = 200;

/// Minimum usable series before a breadth reading is trustworthy.
pub const MIN_BREADTH_SYMBOLS: usize = 20;

/// Mean of the last `period` values, `None` when there are fewer.
pub fn sma_last(closes: &[f64], period: usize) -> Option<f64> {
    if period == 0 || closes.len() < period {
        return None;
    }
    Some(mean(&closes[closes.len() - period..]))
}

/// Disparity of the latest close versus its trailing `period`-day SMA, in
/// percent (positive above the average), 1 decimal.
pub fn ma_disparity_pct(series: &PriceSeries, period: usize) -> Option<f64> {
    let ma = sma_last(series.closes(), period)?;
    if ma <= 0.0 {
        return None;
    }
    Some(round1((series.last_close() - ma) / ma * 100.0))
}

/// Share of series whose latest close sits above their trailing `period`-day
/// SMA, in percent, 1 decimal.
///
/// Series shorter than `period` are skipped; fewer than `min_count` usable
/// series yields `None` rather than a reading built on too thin a basket.
pub fn breadth_above_ma(
    series_list: &[PriceSeries],
    period: usize,
    min_count: usize,
) -> Option<f64> {
    let mut above = 0usize;
    let mut total = 0usize;
    for series in series_list {
        let Some(ma) = sma_last(series.closes(), period) else {
            continue;
        };
        if ma <= 0.0 {
            continue;
        }
        total += 1;
        if series.last_close() > ma {
            above += 1;
        }
    }
    if total < min_count.max(1) {
        return None;
    }
    Some(round1(above as f64 / total as f64 * 100.0))
}
