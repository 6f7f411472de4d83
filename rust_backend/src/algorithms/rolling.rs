use chrono::{Duration, NaiveDate, NaiveDateTime};

use crate::core::domain::{day_start, RatePoint, RollingRateSeries, TimeWindow};
use crate::core::error::{OccupancyError, OccupancyResult};

/// Count ticket sales in a trailing window at every bin boundary of `day`.
///
/// Starts are bucketed into `period`-wide bins labelled by their left edge;
/// empty bins count as zero. The count at boundary `T` is the number of
/// starts `s` with `T - window <= s < T`. Boundaries run from midnight through
/// the following midnight inclusive. Starts outside the day are ignored.
///
/// # Errors
/// * `InvalidParameter` when `period` or `window` is not a positive whole
///   number of seconds, or `window` is not a whole number of periods
pub fn rolling_rate(
    day: NaiveDate,
    ticket_starts: &[NaiveDateTime],
    period: Duration,
    window: Duration,
) -> OccupancyResult<RollingRateSeries> {
    for (name, value) in [("period", period), ("window", window)] {
        if Duration::seconds(value.num_seconds()) != value {
            return Err(OccupancyError::InvalidParameter(format!(
                "rate {} must be a whole number of seconds, got {}",
                name, value
            )));
        }
    }

    let period_secs = period.num_seconds();
    let window_secs = window.num_seconds();
    if period_secs < 1 {
        return Err(OccupancyError::InvalidParameter(format!(
            "rate period must be at least one second, got {}",
            period
        )));
    }
    if window_secs < 1 || window_secs % period_secs != 0 {
        return Err(OccupancyError::InvalidParameter(format!(
            "rate window {} must be a positive multiple of the period {}",
            window, period
        )));
    }

    let bounds = TimeWindow::for_day(day);
    let day_secs = bounds.length().num_seconds();
    let n_bins = ((day_secs + period_secs - 1) / period_secs) as usize;
    let window_bins = (window_secs / period_secs) as usize;

    let mut bins = vec![0u32; n_bins];
    for start in ticket_starts.iter().filter(|s| bounds.contains(**s)) {
        let idx = ((*start - bounds.start).num_seconds() / period_secs) as usize;
        bins[idx] += 1;
    }

    let mut prefix = Vec::with_capacity(n_bins + 1);
    prefix.push(0u32);
    for count in &bins {
        let last = prefix[prefix.len() - 1];
        prefix.push(last + count);
    }

    let points = (0..=n_bins)
        .map(|k| RatePoint {
            timestamp: bounds.start + Duration::seconds(k as i64 * period_secs),
            count: prefix[k] - prefix[k.saturating_sub(window_bins)],
        })
        .collect();

    Ok(RollingRateSeries {
        day,
        period,
        window,
        points,
    })
}

/// Tickets sold in the window ending at `hour:00` on `date`.
///
/// # Errors
/// * `SampleOutOfRange` when that instant is not a sample of `rolling`
pub fn count_in_window(
    rolling: &RollingRateSeries,
    date: NaiveDate,
    hour: u32,
) -> OccupancyResult<u32> {
    let at = day_start(date) + Duration::hours(i64::from(hour));
    rolling
        .at(at)
        .ok_or(OccupancyError::SampleOutOfRange { at })
}
