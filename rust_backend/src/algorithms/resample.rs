use chrono::Duration;

use crate::core::domain::{OccupancySeries, SamplePoint, StepFunction, TimeWindow};
use crate::core::error::{OccupancyError, OccupancyResult};

/// Sample a step function every `period` inside `window` with step-hold
/// (previous value) interpolation.
///
/// Sample timestamps are `window.start + k * period` for every such instant
/// before `window.end`. Before the first point the value is 0. An empty step
/// function yields an empty series so callers can tell a day without data
/// from an idle one.
///
/// # Errors
/// * `InvalidParameter` when `period` is not positive or `window` is empty
pub fn sample(
    step_fn: &StepFunction,
    period: Duration,
    window: TimeWindow,
) -> OccupancyResult<OccupancySeries> {
    if period <= Duration::zero() {
        return Err(OccupancyError::InvalidParameter(format!(
            "sampling period must be positive, got {}",
            period
        )));
    }
    if window.end <= window.start {
        return Err(OccupancyError::InvalidParameter(format!(
            "sampling window [{}, {}) is empty",
            window.start, window.end
        )));
    }

    let mut series = OccupancySeries {
        period,
        points: Vec::new(),
    };
    if step_fn.is_empty() {
        return Ok(series);
    }

    let points = step_fn.points();
    let mut idx = 0;
    let mut current = 0;
    let mut t = window.start;
    while t < window.end {
        while idx < points.len() && points[idx].timestamp <= t {
            current = points[idx].value;
            idx += 1;
        }
        series.points.push(SamplePoint {
            timestamp: t,
            value: current,
        });
        t += period;
    }

    Ok(series)
}
