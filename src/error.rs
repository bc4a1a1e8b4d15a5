//! Error taxonomy for the analytics modules
//!
//! Sparse data is a result variant, never a panic: callers render a
//! "data unavailable" placeholder instead of crashing. A forward-return
//! horizon past the end of the series is `None` inside the row, not an error.

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AnalyticsError {
    /// Fewer valid points than the requested operation needs.
    #[error("insufficient data: need at least {required} points, have {available}")]
    InsufficientData { required: usize, available: usize },

    /// The price history provider returned nothing usable.
    #[error("price history unavailable")]
    DataUnavailable,
}
