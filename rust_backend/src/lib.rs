//! Car park occupancy reconstruction from ticket-sales transaction reports.
//!
//! Each ticket purchase implies a parking interval whose length is only known
//! from its duration label. This crate turns a day's tickets into a
//! piecewise-constant occupancy trace, samples it at a fixed period, counts
//! ticket sales in a trailing window, and renders month calendars of daily
//! charts.
//!
//! # Layout
//!
//! - [`core`]: domain types and the error enum
//! - [`algorithms`]: pure per-day reconstruction (resolve, build events, merge, sample, rate)
//! - [`parsing`], [`transformations`], [`io`]: transaction report loading and cleaning
//! - [`services`]: day-level queries and cross-day insights
//! - [`report`]: SVG charts and calendar pages
//! - [`preprocessing`]: the load -> compute -> render pipeline
//! - [`config`]: TOML configuration
//! - [`time`]: calendar helpers

pub mod algorithms;
pub mod config;
pub mod core;
pub mod io;
pub mod parsing;
pub mod preprocessing;
pub mod report;
pub mod services;
pub mod time;
pub mod transformations;

pub use crate::config::AppConfig;
pub use crate::core::error::{OccupancyError, OccupancyResult};
pub use crate::preprocessing::{PipelineSummary, ReportPipeline};
pub use crate::services::{AnalysisParams, DayOccupancy};
