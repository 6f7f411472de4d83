//! Service layer for day-level queries and cross-day insights.
//!
//! Services sit between the pure algorithms and the report pipeline. They
//! slice the ticket set by day, run the occupancy reconstruction, and derive
//! the summaries the report and the CLI print.

pub mod distributions;
pub mod insights;
pub mod occupancy;

pub use distributions::{
    compute_stats, occupancy_distribution, occupancy_stats, DistributionStats, OccupancyStats,
};
pub use insights::{busiest_day, daily_peaks, peak_stats, sales_in_window, DayPeak, WindowSales};
pub use occupancy::{
    count_in_window, max_concurrent, occupancy_series, rolling_series, AnalysisParams,
    DayOccupancy,
};
