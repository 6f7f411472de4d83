//! Data transformation and cleaning utilities.
//!
//! This module provides the operations that sit between the raw transaction
//! rows and the occupancy core: tariff exclusion, description cleaning,
//! chronological sorting and per-day slicing.
//!
//! # Modules
//!
//! - [`cleaning`]: Build tickets from rows, drop unusable ones, sort, count durations
//! - [`filtering`]: Exclude tariffs, select or group tickets by day

pub mod cleaning;
pub mod filtering;

pub use cleaning::{
    drop_unrecognized, duration_counts, rows_to_tickets, sort_by_start, CleanedTickets,
};
pub use filtering::{exclude_tariffs, group_by_day, tickets_for_day};
