//! Drawdown episode scanning
//!
//! Partitions a close series into non-overlapping peak -> trough -> recovery
//! episodes. A new episode can only start at a running all-time high, and the
//! scan resumes at the recovery close, so episodes never overlap. The scan is
//! O(n^2) in the worst case (inner forward scan per peak); series at daily
//! granularity stay far from that bound because each inner scan consumes the
//! indices it visits.

use chrono::NaiveDate;
use serde::Serialize;

use crate::series::PriceSeries;

/// One non-overlapping drawdown episode.
///
/// `recovery_date` is `None` while the decline is still open as of the last
/// observation; `recovery_days` and `length_days` follow it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawdownEpisode {
    pub peak_date: NaiveDate,
    pub peak_price: f64,
    pub trough_date: NaiveDate,
    pub trough_price: f64,
    pub recovery_date: Option<NaiveDate>,
    /// Peak-to-trough decline in percent, negative by construction.
    pub depth_pct: f64,
    pub to_trough_days: i64,
    pub recovery_days: Option<i64>,
    pub length_days: Option<i64>,
}

impl DrawdownEpisode {
    pub fn is_recovered(&self) -> bool {
        self.recovery_date.is_some()
    }
}

/// Scan a normalized series for every non-overlapping drawdown episode, in
/// chronological order of peak date.
///
/// A peak candidate is an index at the running all-time high (new or equaled).
/// The episode runs to the first close at or above the peak; the trough is the
/// earliest minimum strictly in between. A high immediately followed by an
/// equal-or-higher close is degenerate (zero depth) and is skipped, not
/// emitted. At most one episode is unrecovered, and it is the last.
pub fn scan_drawdowns(series: &PriceSeries) -> Vec<DrawdownEpisode> {
    let closes = series.closes();
    let dates = series.dates();
    let n = closes.len();

    let mut episodes = Vec::new();
    let mut running_max = f64::NEG_INFINITY;
    let mut i = 0usize;
    while i < n {
        if closes[i] > running_max {
            running_max = closes[i];
        }
        // Only an all-time high can open an episode
        if closes[i] < running_max {
            i += 1;
            continue;
        }
        let peak_price = closes[i];

        // First close back at or above the peak ends the episode
        let mut j = i + 1;
        while j < n && closes[j] < peak_price {
            j += 1;
        }
        if j == i + 1 {
            // Next close (if any) is already at or above the peak: no decline
            i += 1;
            continue;
        }

        // Earliest minimum strictly between peak and recovery
        let mut trough = i + 1;
        for k in (i + 2)..j {
            if closes[k] < closes[trough] {
                trough = k;
            }
        }
        let depth_pct = (closes[trough] - peak_price) / peak_price * 100.0;
        let to_trough_days = (dates[trough] - dates[i]).num_days();

        if j < n {
            episodes.push(DrawdownEpisode {
                peak_date: dates[i],
                peak_price,
                trough_date: dates[trough],
                trough_price: closes[trough],
                recovery_date: Some(dates[j]),
                depth_pct,
                to_trough_days,
                recovery_days: Some((dates[j] - dates[trough]).num_days()),
                length_days: Some((dates[j] - dates[i]).num_days()),
            });
            // The recovery close is at least the old peak; resume there
            i = j;
        } else {
            episodes.push(DrawdownEpisode {
                peak_date: dates[i],
                peak_price,
                trough_date: dates[trough],
                trough_price: closes[trough],
                recovery_date: None,
                depth_pct,
                to_trough_days,
                recovery_days: None,
                length_days: None,
            });
            // An open episode ends the scan
            break;
        }
    }
    episodes
}

/// The `n` deepest episodes, most negative depth first, ties broken by
/// earlier peak date.
pub fn worst_episodes(episodes: &[DrawdownEpisode], n: usize) -> Vec<DrawdownEpisode> {
    let mut sorted = episodes.to_vec();
    sorted.sort_by(|a, b| {
        a.depth_pct
            .partial_cmp(&b.depth_pct)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.peak_date.cmp(&b.peak_date))
    });
    sorted.truncate(n);
    sorted
}

/// Per-day percentage decline from the running peak (0 at every new high).
///
/// This is the chart companion of the episode table; values are <= 0.
pub fn running_drawdown_pct(closes: &[f64]) -> Vec<f64> {
    let mut result = Vec::with_capacity(closes.len());
    let mut peak = f64::NEG_INFINITY;
    for &close in closes {
        if close > peak {
            peak = close;
        }
        result.push((close - peak) / peak * 100.0);
    }
    result
}
