//! Price series normalization
//!
//! Cleans a raw provider series into a strictly date-ascending daily close
//! series usable by every downstream analytics module. Construction goes
//! through [`normalize`] (or [`PriceSeries::from_daily`]), so an invalid
//! series is unrepresentable: dates strictly increase and every close is
//! finite and positive.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AnalyticsError;

/// Minimum valid points for a usable series
pub const MIN_SERIES_POINTS: usize = 2;

/// One raw observation as handed over by the price history provider.
///
/// Timestamps may carry any time of day; normalization collapses them to
/// calendar dates.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct RawPoint {
    pub timestamp: DateTime<Utc>,
    pub close: f64,
}

/// One normalized daily observation.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub close: f64,
}

/// A normalized daily close series, stored columnar.
///
/// Dates are strictly increasing, closes are finite and positive, and the
/// series holds at least [`MIN_SERIES_POINTS`] points.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceSeries {
    dates: Vec<NaiveDate>,
    closes: Vec<f64>,
}

/// Normalize a raw provider series.
///
/// Timestamps collapse to calendar dates, non-finite and non-positive closes
/// are dropped, points are sorted ascending by date, and duplicate dates keep
/// the last-seen close. Fewer than two survivors is `InsufficientData`.
pub fn normalize(raw: &[RawPoint]) -> Result<PriceSeries, AnalyticsError> {
    let daily: Vec<PricePoint> = raw
        .iter()
        .map(|p| PricePoint {
            date: p.timestamp.date_naive(),
            close: p.close,
        })
        .collect();
    PriceSeries::from_daily(daily)
}

impl PriceSeries {
    /// Build a series from already-dated points, applying the same cleaning
    /// rules as [`normalize`].
    pub fn from_daily(points: Vec<PricePoint>) -> Result<Self, AnalyticsError> {
        let mut valid: Vec<PricePoint> = points
            .into_iter()
            .filter(|p| p.close.is_finite() && p.close > 0.0)
            .collect();
        let available = valid.len();
        if available < MIN_SERIES_POINTS {
            return Err(AnalyticsError::InsufficientData {
                required: MIN_SERIES_POINTS,
                available,
            });
        }

        // Stable sort keeps input order within a date, so keeping the last
        // entry per date is "last-seen wins".
        valid.sort_by_key(|p| p.date);
        let mut dates: Vec<NaiveDate> = Vec::with_capacity(valid.len());
        let mut closes: Vec<f64> = Vec::with_capacity(valid.len());
        for p in valid {
            if dates.last() == Some(&p.date) {
                let last = closes.len() - 1;
                closes[last] = p.close;
            } else {
                dates.push(p.date);
                closes.push(p.close);
            }
        }

        if dates.len() < MIN_SERIES_POINTS {
            return Err(AnalyticsError::InsufficientData {
                required: MIN_SERIES_POINTS,
                available: dates.len(),
            });
        }
        Ok(PriceSeries { dates, closes })
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// Always false: construction rejects series below two points.
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn closes(&self) -> &[f64] {
        &self.closes
    }

    pub fn point(&self, index: usize) -> Option<PricePoint> {
        Some(PricePoint {
            date: *self.dates.get(index)?,
            close: *self.closes.get(index)?,
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = PricePoint> + '_ {
        self.dates
            .iter()
            .zip(self.closes.iter())
            .map(|(&date, &close)| PricePoint { date, close })
    }

    pub fn first_date(&self) -> NaiveDate {
        self.dates[0]
    }

    pub fn last_date(&self) -> NaiveDate {
        self.dates[self.dates.len() - 1]
    }

    pub fn last_close(&self) -> f64 {
        self.closes[self.closes.len() - 1]
    }

    /// Calendar span of the series in years.
    pub fn span_years(&self) -> f64 {
        (self.last_date() - self.first_date()).num_days() as f64 / 365.25
    }

    /// First observation on or after `target`, if any.
    pub fn first_at_or_after(&self, target: NaiveDate) -> Option<PricePoint> {
        let idx = self.dates.partition_point(|&d| d < target);
        self.point(idx)
    }

    /// Simple daily percentage changes, one per consecutive pair.
    pub fn daily_returns(&self) -> Vec<f64> {
        self.closes
            .windows(2)
            .map(|w| w[1] / w[0] - 1.0)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn raw(y: i32, m: u32, d: u32, hour: u32, close: f64) -> RawPoint {
        RawPoint {
            timestamp: Utc.with_ymd_and_hms(y, m, d, hour, 0, 0).unwrap(),
            close,
        }
    }

    #[test]
    fn test_normalize_sorts_and_strips_time() {
        let raw_points = vec![
            raw(2024, 1, 3, 21, 102.0),
            raw(2024, 1, 1, 14, 100.0),
            raw(2024, 1, 2, 21, 101.0),
        ];
        let series = normalize(&raw_points).unwrap();
        assert_eq!(
            series.dates(),
            &[date(2024, 1, 1), date(2024, 1, 2), date(2024, 1, 3)]
        );
        assert_eq!(series.closes(), &[100.0, 101.0, 102.0]);
    }

    #[test]
    fn test_normalize_drops_invalid_closes() {
        let raw_points = vec![
            raw(2024, 1, 1, 0, 100.0),
            raw(2024, 1, 2, 0, f64::NAN),
            raw(2024, 1, 3, 0, -5.0),
            raw(2024, 1, 4, 0, 0.0),
            raw(2024, 1, 5, 0, 101.0),
        ];
        let series = normalize(&raw_points).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.closes(), &[100.0, 101.0]);
    }

    #[test]
    fn test_normalize_duplicate_dates_keep_last() {
        let raw_points = vec![
            raw(2024, 1, 1, 0, 100.0),
            raw(2024, 1, 2, 9, 50.0),
            raw(2024, 1, 2, 21, 51.0),
        ];
        let series = normalize(&raw_points).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.closes(), &[100.0, 51.0]);
    }

    #[test]
    fn test_normalize_insufficient_data() {
        let raw_points = vec![raw(2024, 1, 1, 0, 100.0), raw(2024, 1, 2, 0, f64::NAN)];
        assert_eq!(
            normalize(&raw_points),
            Err(AnalyticsError::InsufficientData {
                required: MIN_SERIES_POINTS,
                available: 1
            })
        );
    }

    #[test]
    fn test_first_at_or_after() {
        let series = PriceSeries::from_daily(vec![
            PricePoint { date: date(2024, 1, 5), close: 100.0 },
            PricePoint { date: date(2024, 1, 8), close: 101.0 },
            PricePoint { date: date(2024, 1, 9), close: 102.0 },
        ])
        .unwrap();
        // Jan 6 is a Saturday; the next trading day answers the lookup.
        let hit = series.first_at_or_after(date(2024, 1, 6)).unwrap();
        assert_eq!(hit.date, date(2024, 1, 8));
        assert_eq!(hit.close, 101.0);
        assert!(series.first_at_or_after(date(2024, 1, 10)).is_none());
        assert_eq!(
            series.first_at_or_after(date(2024, 1, 5)).unwrap().close,
            100.0
        );
    }

    #[test]
    fn test_daily_returns_and_span() {
        let series = PriceSeries::from_daily(vec![
            PricePoint { date: date(2020, 1, 1), close: 100.0 },
            PricePoint { date: date(2020, 1, 2), close: 110.0 },
            PricePoint { date: date(2021, 1, 1), close: 99.0 },
        ])
        .unwrap();
        let returns = series.daily_returns();
        assert_eq!(returns.len(), 2);
        assert!((returns[0] - 0.1).abs() < 1e-12);
        assert!((returns[1] + 0.1).abs() < 1e-12);
        assert!((series.span_years() - 366.0 / 365.25).abs() < 1e-9);
    }
}
