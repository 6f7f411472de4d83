use chrono::{Datelike, NaiveDate, NaiveTime};

use crate::core::error::{OccupancyError, OccupancyResult};

/// First day of the month containing `date`.
pub fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// First day of the month after the one containing `date`.
///
/// Returns `None` only past the end of chrono's supported range.
pub fn next_month(date: NaiveDate) -> Option<NaiveDate> {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1)
}

/// Every day of the month containing `date`, in order.
pub fn month_days(date: NaiveDate) -> Vec<NaiveDate> {
    let first = month_start(date);
    first
        .iter_days()
        .take_while(|d| d.month() == first.month())
        .collect()
}

/// First days of every month from `first` to `last`, both inclusive.
pub fn months_between(first: NaiveDate, last: NaiveDate) -> Vec<NaiveDate> {
    let last = month_start(last);
    let mut months = Vec::new();
    let mut current = Some(month_start(first));
    while let Some(month) = current {
        if month > last {
            break;
        }
        months.push(month);
        current = next_month(month);
    }
    months
}

/// Every day from `first` to `last`, both inclusive. Empty if `last < first`.
pub fn date_range(first: NaiveDate, last: NaiveDate) -> Vec<NaiveDate> {
    first.iter_days().take_while(|d| *d <= last).collect()
}

/// Parse a `YYYY-MM` month into its first day.
///
/// # Examples
///
/// ```
/// use carpark_occupancy::time::parse_month;
/// use chrono::NaiveDate;
///
/// assert_eq!(parse_month("2017-09").unwrap(), NaiveDate::from_ymd_opt(2017, 9, 1).unwrap());
/// assert!(parse_month("2017-13").is_err());
/// ```
pub fn parse_month(value: &str) -> OccupancyResult<NaiveDate> {
    NaiveDate::parse_from_str(&format!("{}-01", value.trim()), "%Y-%m-%d").map_err(|e| {
        OccupancyError::InvalidParameter(format!("invalid month '{}': {}", value, e))
    })
}

/// Parse a `YYYY-MM-DD` date.
pub fn parse_date(value: &str) -> OccupancyResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|e| OccupancyError::InvalidParameter(format!("invalid date '{}': {}", value, e)))
}

/// Parse a wall-clock time written as `HH:MM` or `HH:MM:SS`.
pub fn parse_clock(value: &str) -> OccupancyResult<NaiveTime> {
    let value = value.trim();
    NaiveTime::parse_from_str(value, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
        .map_err(|e| OccupancyError::InvalidParameter(format!("invalid time '{}': {}", value, e)))
}
