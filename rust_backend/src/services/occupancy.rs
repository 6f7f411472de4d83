//! Day-level occupancy queries.
//!
//! [`DayOccupancy`] runs the event builder and merger once for a day and
//! serves the sampled occupancy series, the rolling sales-rate series and the
//! peak occupancy from that single computation.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};

use crate::algorithms::{
    merge, rolling_rate, sample, EventStreamBuilder, IntervalResolver, UnresolvablePolicy,
};
use crate::core::domain::{
    default_closing_time, OccupancySeries, RollingRateSeries, StepFunction, TicketRecord,
    TimeWindow,
};
use crate::core::error::{OccupancyError, OccupancyResult};
use crate::transformations::tickets_for_day;

pub use crate::algorithms::count_in_window;

/// Parameters shared by every per-day computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisParams {
    pub closing_time: NaiveTime,
    /// Spacing of occupancy samples and of rolling-rate bins.
    pub sampling_period: Duration,
    pub rolling_window: Duration,
    pub unresolvable: UnresolvablePolicy,
}

impl Default for AnalysisParams {
    fn default() -> Self {
        Self {
            closing_time: default_closing_time(),
            sampling_period: Duration::minutes(1),
            rolling_window: Duration::minutes(30),
            unresolvable: UnresolvablePolicy::Drop,
        }
    }
}

impl AnalysisParams {
    /// Check that the period and window can be used by the resampler and the
    /// rolling-rate estimator.
    pub fn validate(&self) -> OccupancyResult<()> {
        for (name, value) in [
            ("sampling period", self.sampling_period),
            ("rolling window", self.rolling_window),
        ] {
            if Duration::seconds(value.num_seconds()) != value {
                return Err(OccupancyError::InvalidParameter(format!(
                    "{} must be a whole number of seconds, got {}",
                    name, value
                )));
            }
        }

        let period = self.sampling_period.num_seconds();
        let window = self.rolling_window.num_seconds();
        if period < 1 {
            return Err(OccupancyError::InvalidParameter(format!(
                "sampling period must be at least one second, got {}",
                self.sampling_period
            )));
        }
        if window < 1 || window % period != 0 {
            return Err(OccupancyError::InvalidParameter(format!(
                "rolling window {} must be a positive multiple of the sampling period {}",
                self.rolling_window, self.sampling_period
            )));
        }
        Ok(())
    }

    pub fn resolver(&self) -> IntervalResolver {
        IntervalResolver::new(self.closing_time)
    }

    pub fn event_builder(&self) -> EventStreamBuilder {
        EventStreamBuilder::new(self.resolver(), self.unresolvable)
    }
}

/// Occupancy trace of one day together with the day's ticket starts.
#[derive(Debug, Clone)]
pub struct DayOccupancy {
    day: NaiveDate,
    params: AnalysisParams,
    step_function: StepFunction,
    ticket_starts: Vec<NaiveDateTime>,
}

impl DayOccupancy {
    /// Build the day's step function from `tickets`, which may span many days.
    ///
    /// # Errors
    /// * `UnresolvableDuration` under [`UnresolvablePolicy::FailFast`]
    pub fn compute(
        day: NaiveDate,
        tickets: &[TicketRecord],
        params: &AnalysisParams,
    ) -> OccupancyResult<Self> {
        let events = params.event_builder().build(day, tickets)?;
        let step_function = merge(events);
        let ticket_starts = tickets_for_day(tickets, day).map(|t| t.start).collect();

        Ok(Self {
            day,
            params: *params,
            step_function,
            ticket_starts,
        })
    }

    pub fn day(&self) -> NaiveDate {
        self.day
    }

    pub fn step_function(&self) -> &StepFunction {
        &self.step_function
    }

    /// Tickets sold on the day, including those left out of occupancy.
    pub fn ticket_count(&self) -> usize {
        self.ticket_starts.len()
    }

    /// Whether any ticket contributed to occupancy.
    pub fn has_data(&self) -> bool {
        !self.step_function.is_empty()
    }

    /// Occupancy sampled at the configured period. Defaults to the whole day.
    /// Empty when the day has no data.
    pub fn occupancy_series(&self, window: Option<TimeWindow>) -> OccupancyResult<OccupancySeries> {
        let window = window.unwrap_or_else(|| TimeWindow::for_day(self.day));
        sample(&self.step_function, self.params.sampling_period, window)
    }

    pub fn rolling_series(&self) -> OccupancyResult<RollingRateSeries> {
        rolling_rate(
            self.day,
            &self.ticket_starts,
            self.params.sampling_period,
            self.params.rolling_window,
        )
    }

    /// Peak concurrent occupancy.
    ///
    /// # Errors
    /// * `NoData` when no ticket contributed to the day's occupancy
    pub fn max_concurrent(&self) -> OccupancyResult<i64> {
        self.step_function
            .max_value()
            .ok_or(OccupancyError::NoData { date: self.day })
    }
}

/// Peak concurrent occupancy on `date`, `NoData` when nothing was parked.
pub fn max_concurrent(
    tickets: &[TicketRecord],
    date: NaiveDate,
    params: &AnalysisParams,
) -> OccupancyResult<i64> {
    DayOccupancy::compute(date, tickets, params)?.max_concurrent()
}

/// Occupancy series for `date`, over `window` or the whole day.
pub fn occupancy_series(
    tickets: &[TicketRecord],
    date: NaiveDate,
    window: Option<TimeWindow>,
    params: &AnalysisParams,
) -> OccupancyResult<OccupancySeries> {
    DayOccupancy::compute(date, tickets, params)?.occupancy_series(window)
}

/// Rolling sales-rate series for `date`. Never fails on unresolvable
/// durations since only start times are used.
pub fn rolling_series(
    tickets: &[TicketRecord],
    date: NaiveDate,
    params: &AnalysisParams,
) -> OccupancyResult<RollingRateSeries> {
    let starts: Vec<NaiveDateTime> = tickets_for_day(tickets, date).map(|t| t.start).collect();
    rolling_rate(date, &starts, params.sampling_period, params.rolling_window)
}
