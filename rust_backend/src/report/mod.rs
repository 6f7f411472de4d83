//! Report rendering: per-day SVG charts and month calendar pages.
//!
//! Rendering functions are pure and return strings; [`writer::ReportWriter`]
//! owns the output directory layout.

pub mod calendar;
pub mod svg;
pub mod writer;

use chrono::{NaiveDate, NaiveTime};
use std::path::PathBuf;

use crate::core::domain::TimeWindow;
use crate::core::error::OccupancyResult;

pub use calendar::render_month;
pub use svg::{render_day_chart, ChartSize};
pub use writer::ReportWriter;

/// Presentation settings for charts and calendar pages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportOptions {
    pub out_dir: PathBuf,
    pub title: String,
    /// Visible part of each day on the chart's time axis.
    pub view_start: NaiveTime,
    pub view_end: NaiveTime,
    pub occupancy_axis_max: u32,
    pub rate_axis_max: u32,
    /// Hour whose preceding rolling window the `midday` query reports.
    pub midday_hour: u32,
    pub large: bool,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            out_dir: PathBuf::from("out"),
            title: "Crick Car Park Usage".to_string(),
            view_start: NaiveTime::from_hms_opt(7, 0, 0).expect("07:00 is a valid time"),
            view_end: NaiveTime::from_hms_opt(18, 0, 0).expect("18:00 is a valid time"),
            occupancy_axis_max: 170,
            rate_axis_max: 40,
            midday_hour: 12,
            large: false,
        }
    }
}

impl ReportOptions {
    /// The charted part of `day`.
    pub fn view_window(&self, day: NaiveDate) -> OccupancyResult<TimeWindow> {
        TimeWindow::new(day.and_time(self.view_start), day.and_time(self.view_end))
    }

    pub fn chart_size(&self) -> ChartSize {
        if self.large {
            ChartSize::LARGE
        } else {
            ChartSize::SMALL
        }
    }
}
