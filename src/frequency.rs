//! Depth-bucketed drawdown frequency statistics
//!
//! Classifies episodes at or below -5% into the dashboard's four buckets and
//! derives how often each bucket occurs and how long recovery takes. The
//! first two buckets are exclusive ranges; Bear Market and Crash are
//! cumulative, so the Bear count is always >= the Crash count.

use serde::Serialize;

use crate::common::mean;
use crate::drawdown::DrawdownEpisode;

/// Episodes shallower than this never enter the table.
pub const FREQUENCY_THRESHOLD_PCT: f64 = -5.0;

/// One row of the frequency-of-drops table.
///
/// `lower_depth_pct` is the shallow (inclusive) edge of the bucket;
/// `upper_depth_pct` is the deep (exclusive) edge, `None` for the cumulative
/// buckets. Zero-event buckets report `None` frequency and recovery, never
/// zero or infinity.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FrequencyBucket {
    pub label: String,
    pub lower_depth_pct: f64,
    pub upper_depth_pct: Option<f64>,
    pub event_count: usize,
    pub implied_years_per_event: Option<f64>,
    pub avg_recovery_days: Option<i64>,
}

impl FrequencyBucket {
    /// Human-readable cadence: "Once every 1.3 years" when events are rarer
    /// than yearly, otherwise "2.5 times per year".
    pub fn frequency_label(&self) -> Option<String> {
        let years = self.implied_years_per_event?;
        if years >= 1.0 {
            Some(format!("Once every {years:.1} years"))
        } else {
            Some(format!("{:.1} times per year", 1.0 / years))
        }
    }

    fn contains(&self, depth_pct: f64) -> bool {
        depth_pct <= self.lower_depth_pct
            && self.upper_depth_pct.map_or(true, |deep| depth_pct > deep)
    }
}

const BUCKET_DEFS: [(&str, f64, Option<f64>); 4] = [
    ("-5% to -10% (Pullback)", -5.0, Some(-10.0)),
    ("-10% to -20% (Correction)", -10.0, Some(-20.0)),
    ("-20% or more (Bear Market)", -20.0, None),
    ("-30% or more (Crash)", -30.0, None),
];

/// Classify episodes into the fixed bucket order Pullback, Correction,
/// Bear Market, Crash and derive per-bucket frequency over `span_years`.
///
/// Open episodes count toward `event_count` but are excluded from the
/// recovery average.
pub fn frequency_table(episodes: &[DrawdownEpisode], span_years: f64) -> Vec<FrequencyBucket> {
    BUCKET_DEFS
        .iter()
        .map(|&(label, lower, upper)| {
            let mut bucket = FrequencyBucket {
                label: label.to_string(),
                lower_depth_pct: lower,
                upper_depth_pct: upper,
                event_count: 0,
                implied_years_per_event: None,
                avg_recovery_days: None,
            };
            let members: Vec<&DrawdownEpisode> = episodes
                .iter()
                .filter(|e| e.depth_pct <= FREQUENCY_THRESHOLD_PCT && bucket.contains(e.depth_pct))
                .collect();
            bucket.event_count = members.len();
            if bucket.event_count > 0 && span_years > 0.0 {
                bucket.implied_years_per_event = Some(span_years / bucket.event_count as f64);
            }
            let recovered: Vec<f64> = members
                .iter()
                .filter_map(|e| e.recovery_days)
                .map(|d| d as f64)
                .collect();
            if !recovered.is_empty() {
                bucket.avg_recovery_days = Some(mean(&recovered).round() as i64);
            }
            bucket
        })
        .collect()
}
