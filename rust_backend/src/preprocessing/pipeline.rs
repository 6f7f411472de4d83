use anyhow::{Context, Result};
use chrono::NaiveDate;
use log::{info, warn};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::config::AppConfig;
use crate::core::domain::TicketRecord;
use crate::core::error::OccupancyResult;
use crate::io::loaders::{LoadResult, LoaderOptions, TransactionLoader};
use crate::preprocessing::validator::TicketValidator;
use crate::report::{render_day_chart, render_month, ReportOptions, ReportWriter};
use crate::services::{AnalysisParams, DayOccupancy, DayPeak};
use crate::time::{month_days, months_between};
use crate::transformations::group_by_day;

/// Result of a report run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineSummary {
    /// Calendar pages written, as `YYYY-MM`.
    pub months_written: Vec<String>,
    pub days_with_data: usize,
    pub days_without_data: usize,
    pub busiest_day: Option<DayPeak>,
}

/// Rendered output of one day.
struct DayReport {
    day: NaiveDate,
    svg: Option<String>,
    peak: Option<i64>,
}

/// Load -> per-day occupancy -> charts and calendar pages.
pub struct ReportPipeline {
    params: AnalysisParams,
    loader: LoaderOptions,
    report: ReportOptions,
}

impl ReportPipeline {
    /// Create a new pipeline with default configuration
    pub fn new() -> Self {
        Self {
            params: AnalysisParams::default(),
            loader: LoaderOptions::default(),
            report: ReportOptions::default(),
        }
    }

    /// Create a pipeline from a loaded configuration file
    pub fn with_config(config: &AppConfig) -> OccupancyResult<Self> {
        Ok(Self {
            params: config.analysis_params()?,
            loader: config.loader_options()?,
            report: config.report_options()?,
        })
    }

    pub fn from_parts(
        params: AnalysisParams,
        loader: LoaderOptions,
        report: ReportOptions,
    ) -> Self {
        Self {
            params,
            loader,
            report,
        }
    }

    pub fn params(&self) -> &AnalysisParams {
        &self.params
    }

    pub fn report_options(&self) -> &ReportOptions {
        &self.report
    }

    /// Load and validate tickets from a report file or a directory of reports.
    pub fn load(&self, source: &Path) -> Result<LoadResult> {
        let load = TransactionLoader::load_from_path(source, &self.loader)
            .with_context(|| format!("Failed to load tickets from {}", source.display()))?;

        for (label, count) in load.duration_counts() {
            info!("{:>8} {}", label, count);
        }

        let validation = TicketValidator::validate(&load, &self.params);
        for warning in &validation.warnings {
            warn!("{}", warning);
        }
        if !validation.is_valid {
            anyhow::bail!(
                "Ticket data from {} is not usable: {}",
                source.display(),
                validation.errors.join("; ")
            );
        }

        Ok(load)
    }

    /// Write calendar pages for every month from `first_month` to
    /// `last_month` inclusive, using tickets loaded from `source`.
    pub fn run(
        &self,
        source: &Path,
        first_month: NaiveDate,
        last_month: NaiveDate,
    ) -> Result<PipelineSummary> {
        let load = self.load(source)?;
        self.run_with_tickets(&load.tickets, first_month, last_month)
    }

    /// Write calendar pages for an already loaded ticket set.
    pub fn run_with_tickets(
        &self,
        tickets: &[TicketRecord],
        first_month: NaiveDate,
        last_month: NaiveDate,
    ) -> Result<PipelineSummary> {
        let writer = ReportWriter::new(&self.report.out_dir, self.report.large);
        let by_day = group_by_day(tickets);
        let mut summary = PipelineSummary::default();

        for month in months_between(first_month, last_month) {
            info!("{}", month.format("%Y-%m"));

            // Step 1: Compute and render every day of the month in parallel
            let days = month_days(month);
            let reports = days
                .par_iter()
                .map(|&day| {
                    let day_tickets = by_day.get(&day).map(Vec::as_slice).unwrap_or(&[]);
                    self.render_day(day, day_tickets)
                })
                .collect::<Result<Vec<DayReport>>>()?;

            // Step 2: Write charts and collect calendar cells
            let mut charts = BTreeMap::new();
            for report in reports {
                match (report.svg, report.peak) {
                    (Some(svg), Some(peak)) => {
                        let src = writer.write_chart(report.day, &svg)?;
                        charts.insert(report.day, src);
                        summary.days_with_data += 1;
                        let busier = summary
                            .busiest_day
                            .map_or(true, |best| peak > best.max_concurrent);
                        if busier {
                            summary.busiest_day = Some(DayPeak {
                                date: report.day,
                                max_concurrent: peak,
                            });
                        }
                    }
                    _ => summary.days_without_data += 1,
                }
            }

            // Step 3: Calendar page
            let html = render_month(month, &charts, &self.report.title);
            let page = writer.write_month(month, &html)?;
            info!("Wrote {} ({} charts)", page.display(), charts.len());
            summary.months_written.push(month.format("%Y-%m").to_string());
        }

        writer.write_summary(&summary)?;
        Ok(summary)
    }

    fn render_day(&self, day: NaiveDate, tickets: &[TicketRecord]) -> Result<DayReport> {
        let occupancy = DayOccupancy::compute(day, tickets, &self.params)
            .with_context(|| format!("Failed to compute occupancy for {}", day))?;
        if !occupancy.has_data() {
            info!("No data for {}", day);
            return Ok(DayReport {
                day,
                svg: None,
                peak: None,
            });
        }

        let series = occupancy.occupancy_series(Some(self.report.view_window(day)?))?;
        let rates = occupancy.rolling_series()?;
        Ok(DayReport {
            day,
            svg: render_day_chart(&series, &rates, &self.report),
            peak: occupancy.max_concurrent().ok(),
        })
    }
}

impl Default for ReportPipeline {
    fn default() -> Self {
        Self::new()
    }
}
