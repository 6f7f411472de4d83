//! Occupancy reconstruction from ticket sales.
//!
//! This module turns discrete ticket purchases into a continuous occupancy
//! trace and a rolling sales-rate signal. Every function here is pure: no I/O,
//! no shared state, one day at a time.
//!
//! # Components
//!
//! - [`interval`]: ticket start + duration label -> parking interval, clipped at closing
//! - [`events`]: one day's tickets -> signed arrival/departure events
//! - [`merge`]: events -> compacted step function (sort, sweep, compact)
//! - [`resample`]: step function -> evenly spaced occupancy series
//! - [`rolling`]: ticket starts -> trailing-window sales counts
//!
//! # Example
//!
//! ```
//! use carpark_occupancy::algorithms::{build_events, merge};
//! use carpark_occupancy::core::domain::{DurationLabel, TicketRecord};
//! use chrono::NaiveDate;
//!
//! let day = NaiveDate::from_ymd_opt(2017, 9, 4).unwrap();
//! let tickets = vec![
//!     TicketRecord::new(day.and_hms_opt(9, 0, 0).unwrap(), DurationLabel::OneHour),
//!     TicketRecord::new(day.and_hms_opt(9, 30, 0).unwrap(), DurationLabel::TwoHour),
//! ];
//! let step_fn = merge(build_events(day, &tickets));
//! assert_eq!(step_fn.max_value(), Some(2));
//! ```

pub mod events;
pub mod interval;
pub mod merge;
pub mod resample;
pub mod rolling;

pub use events::{build_events, EventStreamBuilder, UnresolvablePolicy};
pub use interval::{resolve_end, IntervalResolver};
pub use merge::{compact, merge};
pub use resample::sample;
pub use rolling::{count_in_window, rolling_rate};
