//! Domain models for ticket sales and occupancy traces.
//!
//! This module provides the value types that flow through a single day's
//! computation: ticket records, the intervals they imply, the signed events
//! derived from those intervals, and the step functions and sampled series
//! built from them.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use super::error::{OccupancyError, OccupancyResult};

/// Closing time of the car park. No ticket holds a space past it.
pub fn default_closing_time() -> NaiveTime {
    NaiveTime::from_hms_opt(18, 0, 0).expect("18:00 is a valid time")
}

/// Midnight at the start of `day`.
pub fn day_start(day: NaiveDate) -> NaiveDateTime {
    day.and_time(NaiveTime::MIN)
}

/// Categorical ticket duration as printed on the transaction report.
///
/// # Examples
///
/// ```
/// use carpark_occupancy::core::domain::DurationLabel;
///
/// let label: DurationLabel = "4 Hour".parse().unwrap();
/// assert_eq!(label, DurationLabel::FourHour);
///
/// let other: DurationLabel = "Season ticket".parse().unwrap();
/// assert_eq!(other, DurationLabel::Unknown);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DurationLabel {
    OneHour,
    TwoHour,
    FourHour,
    AllDay,
    Unknown,
}

impl DurationLabel {
    /// The label text as it appears in transaction descriptions.
    pub fn as_str(&self) -> &'static str {
        match self {
            DurationLabel::OneHour => "1 Hour",
            DurationLabel::TwoHour => "2 Hour",
            DurationLabel::FourHour => "4 Hour",
            DurationLabel::AllDay => "All Day",
            DurationLabel::Unknown => "Unknown",
        }
    }

    pub fn is_resolvable(&self) -> bool {
        !matches!(self, DurationLabel::Unknown)
    }
}

impl FromStr for DurationLabel {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim() {
            "1 Hour" => DurationLabel::OneHour,
            "2 Hour" => DurationLabel::TwoHour,
            "4 Hour" => DurationLabel::FourHour,
            "All Day" => DurationLabel::AllDay,
            _ => DurationLabel::Unknown,
        })
    }
}

impl fmt::Display for DurationLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// One parking-ticket purchase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketRecord {
    pub start: NaiveDateTime,
    pub duration: DurationLabel,
}

impl TicketRecord {
    pub fn new(start: NaiveDateTime, duration: DurationLabel) -> Self {
        Self { start, duration }
    }
}

/// The parking interval implied by a ticket. `end >= start` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    start: NaiveDateTime,
    end: NaiveDateTime,
}

impl Interval {
    /// Returns `None` when `end` precedes `start`.
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Option<Self> {
        (end >= start).then_some(Self { start, end })
    }

    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    pub fn end(&self) -> NaiveDateTime {
        self.end
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Direction of an occupancy change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Arrival,
    Departure,
}

/// A signed change of occupancy at an instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OccupancyEvent {
    pub timestamp: NaiveDateTime,
    pub kind: EventKind,
}

impl OccupancyEvent {
    pub fn arrival(timestamp: NaiveDateTime) -> Self {
        Self {
            timestamp,
            kind: EventKind::Arrival,
        }
    }

    pub fn departure(timestamp: NaiveDateTime) -> Self {
        Self {
            timestamp,
            kind: EventKind::Departure,
        }
    }

    /// `+1` for an arrival, `-1` for a departure.
    pub fn delta(&self) -> i64 {
        match self.kind {
            EventKind::Arrival => 1,
            EventKind::Departure => -1,
        }
    }
}

/// A point where the occupancy trace takes a new value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepPoint {
    pub timestamp: NaiveDateTime,
    pub value: i64,
}

impl StepPoint {
    pub fn new(timestamp: NaiveDateTime, value: i64) -> Self {
        Self { timestamp, value }
    }
}

/// Piecewise-constant occupancy trace.
///
/// Points have strictly increasing timestamps. The value before the first
/// point is 0. An empty step function means "no data" for the day, which is
/// not the same thing as a day with zero occupancy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StepFunction {
    points: Vec<StepPoint>,
}

impl StepFunction {
    /// Builds a step function, rejecting points that are not strictly
    /// increasing in time.
    pub fn new(points: Vec<StepPoint>) -> OccupancyResult<Self> {
        if let Some(pair) = points
            .windows(2)
            .find(|pair| pair[1].timestamp <= pair[0].timestamp)
        {
            return Err(OccupancyError::InvalidParameter(format!(
                "step points must be strictly increasing, found {} after {}",
                pair[1].timestamp, pair[0].timestamp
            )));
        }
        Ok(Self { points })
    }

    pub(crate) fn from_sorted(points: Vec<StepPoint>) -> Self {
        debug_assert!(points.windows(2).all(|p| p[0].timestamp < p[1].timestamp));
        Self { points }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn points(&self) -> &[StepPoint] {
        &self.points
    }

    pub fn into_points(self) -> Vec<StepPoint> {
        self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Step-hold lookup: the value of the last point at or before `t`, or 0
    /// when `t` precedes every point.
    pub fn value_at(&self, t: NaiveDateTime) -> i64 {
        let idx = self.points.partition_point(|p| p.timestamp <= t);
        if idx == 0 {
            0
        } else {
            self.points[idx - 1].value
        }
    }

    /// Highest materialized value, `None` for an empty trace.
    pub fn max_value(&self) -> Option<i64> {
        self.points.iter().map(|p| p.value).max()
    }

    pub fn min_value(&self) -> Option<i64> {
        self.points.iter().map(|p| p.value).min()
    }
}

/// Half-open time window `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl TimeWindow {
    /// # Errors
    /// * `InvalidParameter` unless `end` is after `start`
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> OccupancyResult<Self> {
        if end <= start {
            return Err(OccupancyError::InvalidParameter(format!(
                "window end {} must be after start {}",
                end, start
            )));
        }
        Ok(Self { start, end })
    }

    /// `[day 00:00, day+1 00:00)`
    pub fn for_day(day: NaiveDate) -> Self {
        let start = day_start(day);
        Self {
            start,
            end: start + Duration::days(1),
        }
    }

    pub fn contains(&self, t: NaiveDateTime) -> bool {
        self.start <= t && t < self.end
    }

    pub fn length(&self) -> Duration {
        self.end - self.start
    }
}

/// One sample of an evenly spaced occupancy series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SamplePoint {
    pub timestamp: NaiveDateTime,
    pub value: i64,
}

/// Occupancy sampled at a fixed period with step-hold interpolation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OccupancySeries {
    pub period: Duration,
    pub points: Vec<SamplePoint>,
}

impl OccupancySeries {
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn max_value(&self) -> Option<i64> {
        self.points.iter().map(|p| p.value).max()
    }
}

/// Number of tickets sold in the trailing window ending at `timestamp`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatePoint {
    pub timestamp: NaiveDateTime,
    pub count: u32,
}

/// Rolling ticket-sales counts at every bin boundary of a day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RollingRateSeries {
    pub day: NaiveDate,
    pub period: Duration,
    pub window: Duration,
    pub points: Vec<RatePoint>,
}

impl RollingRateSeries {
    /// Count at exactly `t`, `None` when `t` is not a sample point.
    pub fn at(&self, t: NaiveDateTime) -> Option<u32> {
        self.points
            .binary_search_by_key(&t, |p| p.timestamp)
            .ok()
            .map(|idx| self.points[idx].count)
    }

    pub fn max_count(&self) -> u32 {
        self.points.iter().map(|p| p.count).max().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
