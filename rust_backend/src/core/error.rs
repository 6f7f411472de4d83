//! Error types for occupancy computations.

use chrono::{NaiveDate, NaiveDateTime};

/// Result type for occupancy operations
pub type OccupancyResult<T> = Result<T, OccupancyError>;

/// Error type for occupancy operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OccupancyError {
    #[error("Unresolvable ticket duration for ticket starting at {start}")]
    UnresolvableDuration { start: NaiveDateTime },

    #[error("No data for {date}")]
    NoData { date: NaiveDate },

    #[error("Malformed record at row {row}: {reason}")]
    MalformedRecord { row: usize, reason: String },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("No sample at {at}")]
    SampleOutOfRange { at: NaiveDateTime },

    #[error("Configuration error: {0}")]
    Configuration(String),
}
