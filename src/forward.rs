//! Forward return sampling from anchor dates
//!
//! Answers "what happened 1 month / 1 quarter / 1 year / 3 years / 5 years
//! after this date". Offsets use calendar-month arithmetic, and the price at
//! a target date is the first trading close on or after it; a target past the
//! end of the series yields `None`, never zero.

use chrono::{Datelike, Months, NaiveDate};
use serde::Serialize;

use crate::common::{mean, round1};
use crate::error::AnalyticsError;
use crate::series::PriceSeries;

/// Standard horizons: label and calendar-month offset.
pub const FORWARD_HORIZONS: [(&str, u32); 5] =
    [("1M", 1), ("1Q", 3), ("1Y", 12), ("3Y", 36), ("5Y", 60)];

/// Worst quarters shown in the forward-return table.
pub const WORST_QUARTER_COUNT: usize = 15;

/// Minimum normalized points before the table is worth building.
pub const MIN_FORWARD_TABLE_POINTS: usize = 20;

/// A quarter-end anchor: the calendar quarter-end date, the last trading
/// close within that quarter, and the change versus the prior quarter close.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuarterEnd {
    pub date: NaiveDate,
    pub close: f64,
    pub change_pct: f64,
}

/// Forward returns for one anchor. `forward_pct` holds one entry per horizon,
/// `None` where the horizon runs past the available data.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ForwardReturnRow {
    pub anchor_date: NaiveDate,
    pub anchor_price: f64,
    pub baseline_change_pct: f64,
    pub forward_pct: Vec<Option<f64>>,
}

/// The worst-quarter forward-return table plus its trailing average row.
/// Averages are column-wise over the anchors with data for that column.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ForwardReturnTable {
    pub horizon_labels: Vec<String>,
    pub rows: Vec<ForwardReturnRow>,
    pub average_price: f64,
    pub average_baseline_pct: f64,
    pub average_forward_pct: Vec<Option<f64>>,
}

/// Price at the first trading date on or after `target`.
pub fn first_close_on_or_after(series: &PriceSeries, target: NaiveDate) -> Option<f64> {
    series.first_at_or_after(target).map(|p| p.close)
}

/// Forward return from `anchor_price` to each horizon target, rounded to one
/// decimal place.
pub fn sample_forward(
    series: &PriceSeries,
    anchor_date: NaiveDate,
    anchor_price: f64,
    horizons: &[(&str, u32)],
) -> Vec<Option<f64>> {
    horizons
        .iter()
        .map(|&(_, months)| {
            let target = anchor_date.checked_add_months(Months::new(months))?;
            let forward = first_close_on_or_after(series, target)?;
            Some(round1((forward / anchor_price - 1.0) * 100.0))
        })
        .collect()
}

/// One [`ForwardReturnRow`] per anchor, in the given anchor order.
pub fn forward_returns(
    series: &PriceSeries,
    anchors: &[QuarterEnd],
    horizons: &[(&str, u32)],
) -> Vec<ForwardReturnRow> {
    anchors
        .iter()
        .map(|anchor| ForwardReturnRow {
            anchor_date: anchor.date,
            anchor_price: round1(anchor.close),
            baseline_change_pct: round1(anchor.change_pct),
            forward_pct: sample_forward(series, anchor.date, anchor.close, horizons),
        })
        .collect()
}

/// Last trading close of each calendar quarter, anchored to the calendar
/// quarter-end date. The trailing partial quarter is included.
pub fn quarterly_closes(series: &PriceSeries) -> Vec<(NaiveDate, f64)> {
    let mut out: Vec<(NaiveDate, f64)> = Vec::new();
    for point in series.iter() {
        let q_end = quarter_end(point.date);
        match out.last_mut() {
            // Later points within a quarter overwrite: last close wins
            Some(last) if last.0 == q_end => last.1 = point.close,
            _ => out.push((q_end, point.close)),
        }
    }
    out
}

/// The `n` quarters with the most negative quarter-over-quarter change,
/// sorted most negative first, ties broken by earlier date.
pub fn worst_quarters(series: &PriceSeries, n: usize) -> Vec<QuarterEnd> {
    let quarters = quarterly_closes(series);
    let mut changes: Vec<QuarterEnd> = quarters
        .windows(2)
        .map(|w| QuarterEnd {
            date: w[1].0,
            close: w[1].1,
            change_pct: (w[1].1 / w[0].1 - 1.0) * 100.0,
        })
        .collect();
    changes.sort_by(|a, b| {
        a.change_pct
            .partial_cmp(&b.change_pct)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.date.cmp(&b.date))
    });
    changes.truncate(n);
    changes
}

/// Build the worst-quarter forward-return table with its average row.
pub fn forward_return_table(
    series: &PriceSeries,
    n_worst: usize,
) -> Result<ForwardReturnTable, AnalyticsError> {
    if series.len() < MIN_FORWARD_TABLE_POINTS {
        return Err(AnalyticsError::InsufficientData {
            required: MIN_FORWARD_TABLE_POINTS,
            available: series.len(),
        });
    }
    let anchors = worst_quarters(series, n_worst);
    if anchors.is_empty() {
        return Err(AnalyticsError::InsufficientData {
            required: MIN_FORWARD_TABLE_POINTS,
            available: series.len(),
        });
    }
    let rows = forward_returns(series, &anchors, &FORWARD_HORIZONS);

    let average_price = round1(mean(
        &rows.iter().map(|r| r.anchor_price).collect::<Vec<_>>(),
    ));
    let average_baseline_pct = round1(mean(
        &rows.iter().map(|r| r.baseline_change_pct).collect::<Vec<_>>(),
    ));
    let average_forward_pct = (0..FORWARD_HORIZONS.len())
        .map(|col| {
            let values: Vec<f64> = rows
                .iter()
                .filter_map(|r| r.forward_pct[col])
                .collect();
            if values.is_empty() {
                None
            } else {
                Some(round1(mean(&values)))
            }
        })
        .collect();

    Ok(ForwardReturnTable {
        horizon_labels: FORWARD_HORIZONS
            .iter()
            .map(|&(label, _)| label.to_string())
            .collect(),
        rows,
        average_price,
        average_baseline_pct,
        average_forward_pct,
    })
}

/// Calendar end of the quarter containing `date`.
fn quarter_end(date: NaiveDate) -> NaiveDate {
    let (month, day) = match date.month() {
        1..=3 => (3, 31),
        4..=6 => (6, 30),
        7..=9 => (9, 30),
        _ => (12, 31),
    };
    NaiveDate::from_ymd_opt(date.year(), month, day).unwrap_or(date)
}
