//! Core domain models for car park occupancy.
//!
//! This module defines the fundamental data structures used throughout the crate,
//! representing ticket purchases, parking intervals, occupancy traces and the
//! error kinds a day's computation can produce.

pub mod domain;
pub mod error;

pub use error::{OccupancyError, OccupancyResult};
