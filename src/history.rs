//! File-based price history provider
//!
//! Reads per-symbol parquet files (a `Date` timestamp column plus a `Close`
//! or `Adj Close` float column, located by name) into raw points for
//! [`crate::series::normalize`]. Only the binaries use this; the analytics
//! modules never touch a file.

use std::fs::File;
use std::path::Path;

use arrow::array::{Array, Float64Array, TimestampNanosecondArray};
use chrono::DateTime;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

use crate::error::AnalyticsError;
use crate::series::RawPoint;

/// Load a raw price series from a parquet file.
///
/// Null closes come through as NaN and are left for normalization to drop.
/// A missing, unreadable or empty file is `DataUnavailable`.
pub fn load_parquet_series(path: &Path) -> Result<Vec<RawPoint>, AnalyticsError> {
    let file = File::open(path).map_err(|_| AnalyticsError::DataUnavailable)?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).map_err(|_| AnalyticsError::DataUnavailable)?;
    let schema = builder.schema().clone();
    let date_idx = schema
        .index_of("Date")
        .map_err(|_| AnalyticsError::DataUnavailable)?;
    let close_idx = schema
        .index_of("Close")
        .or_else(|_| schema.index_of("Adj Close"))
        .map_err(|_| AnalyticsError::DataUnavailable)?;
    let reader = builder.build().map_err(|_| AnalyticsError::DataUnavailable)?;

    let mut points = Vec::new();
    for batch_result in reader {
        let batch = batch_result.map_err(|_| AnalyticsError::DataUnavailable)?;
        let dates = batch
            .column(date_idx)
            .as_any()
            .downcast_ref::<TimestampNanosecondArray>()
            .ok_or(AnalyticsError::DataUnavailable)?;
        let closes = batch
            .column(close_idx)
            .as_any()
            .downcast_ref::<Float64Array>()
            .ok_or(AnalyticsError::DataUnavailable)?;

        for i in 0..batch.num_rows() {
            if dates.is_null(i) {
                continue;
            }
            let ts_secs = dates.value(i) / 1_000_000_000;
            let Some(timestamp) = DateTime::from_timestamp(ts_secs, 0) else {
                continue;
            };
            let close = if closes.is_null(i) {
                f64::NAN
            } else {
                closes.value(i)
            };
            points.push(RawPoint { timestamp, close });
        }
    }

    if points.is_empty() {
        return Err(AnalyticsError::DataUnavailable);
    }
    Ok(points)
}

/// Load `<dir>/<SYMBOL>.parquet`.
pub fn load_symbol(dir: &Path, symbol: &str) -> Result<Vec<RawPoint>, AnalyticsError> {
    load_parquet_series(&dir.join(format!("{symbol}.parquet")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::ArrayRef;
    use arrow::datatypes::{DataType, Field, Schema, TimeUnit};
    use arrow::record_batch::RecordBatch;
    use parquet::arrow::ArrowWriter;
    use std::sync::Arc;

    fn write_fixture(name: &str, dates_ns: Vec<i64>, closes: Vec<Option<f64>>) -> std::path::PathBuf {
        let schema = Arc::new(Schema::new(vec![
            Field::new("Date", DataType::Timestamp(TimeUnit::Nanosecond, None), false),
            Field::new("Close", DataType::Float64, true),
        ]));
        let date_array: ArrayRef = Arc::new(TimestampNanosecondArray::from(dates_ns));
        let close_array: ArrayRef = Arc::new(Float64Array::from(closes));
        let batch = RecordBatch::try_new(schema.clone(), vec![date_array, close_array]).unwrap();

        let path = std::env::temp_dir().join(name);
        let file = File::create(&path).unwrap();
        let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();
        path
    }

    #[test]
    fn test_missing_file_is_unavailable() {
        let path = std::env::temp_dir().join("no-such-history.parquet");
        assert_eq!(
            load_parquet_series(&path),
            Err(AnalyticsError::DataUnavailable)
        );
    }

    #[test]
    fn test_loads_dates_and_closes() {
        let day_ns = 86_400_000_000_000i64;
        let path = write_fixture(
            "history-loader-basic.parquet",
            vec![0, day_ns, 2 * day_ns],
            vec![Some(100.0), None, Some(101.0)],
        );
        let points = load_parquet_series(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(points.len(), 3);
        assert_eq!(points[0].timestamp.date_naive().to_string(), "1970-01-01");
        assert_eq!(points[2].timestamp.date_naive().to_string(), "1970-01-03");
        assert_eq!(points[0].close, 100.0);
        // Null close survives as NaN for the normalizer to drop.
        assert!(points[1].close.is_nan());
    }
}
