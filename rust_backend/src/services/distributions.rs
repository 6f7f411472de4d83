use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::core::domain::{StepFunction, TimeWindow};

/// Summary statistics over a set of values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributionStats {
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    pub sum: f64,
}

/// Time-weighted view of one day's occupancy inside a window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OccupancyStats {
    pub peak: i64,
    /// Mean occupancy weighted by the time spent at each level.
    pub mean: f64,
    /// Minutes with at least one car parked.
    pub busy_minutes: i64,
}

/// Compute mean, median, standard deviation, min, max and sum of `values`.
pub fn compute_stats(values: &[f64]) -> DistributionStats {
    if values.is_empty() {
        return DistributionStats {
            count: 0,
            mean: 0.0,
            median: 0.0,
            std_dev: 0.0,
            min: 0.0,
            max: 0.0,
            sum: 0.0,
        };
    }

    let count = values.len();
    let sum: f64 = values.iter().sum();
    let mean = sum / count as f64;

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let median = if count % 2 == 0 {
        (sorted[count / 2 - 1] + sorted[count / 2]) / 2.0
    } else {
        sorted[count / 2]
    };

    let variance = values
        .iter()
        .map(|v| {
            let diff = v - mean;
            diff * diff
        })
        .sum::<f64>()
        / count as f64;

    DistributionStats {
        count,
        mean,
        median,
        std_dev: variance.sqrt(),
        min: sorted[0],
        max: sorted[count - 1],
        sum,
    }
}

/// Time spent at each occupancy level inside `window`.
///
/// Levels held for no time are absent. An empty step function gives an
/// empty map, as does a window built by hand with no length.
pub fn occupancy_distribution(
    step_fn: &StepFunction,
    window: TimeWindow,
) -> BTreeMap<i64, Duration> {
    let mut levels: BTreeMap<i64, Duration> = BTreeMap::new();
    if step_fn.is_empty() || window.length() <= Duration::zero() {
        return levels;
    }

    let mut add = |level: i64, span: Duration| {
        if span > Duration::zero() {
            *levels.entry(level).or_insert_with(Duration::zero) += span;
        }
    };

    let mut cursor = window.start;
    let mut current = step_fn.value_at(window.start);
    for point in step_fn
        .points()
        .iter()
        .filter(|p| p.timestamp > window.start && p.timestamp < window.end)
    {
        add(current, point.timestamp - cursor);
        cursor = point.timestamp;
        current = point.value;
    }
    add(current, window.end - cursor);

    levels
}

/// Peak, time-weighted mean and busy time of `step_fn` inside `window`.
///
/// `None` when the step function holds no data for the window.
pub fn occupancy_stats(step_fn: &StepFunction, window: TimeWindow) -> Option<OccupancyStats> {
    let levels = occupancy_distribution(step_fn, window);
    let (&peak, _) = levels.iter().next_back()?;

    let total_secs = window.length().num_seconds() as f64;
    let weighted: f64 = levels
        .iter()
        .map(|(level, span)| *level as f64 * span.num_seconds() as f64)
        .sum();
    let busy = levels
        .iter()
        .filter(|(level, _)| **level > 0)
        .fold(Duration::zero(), |acc, (_, span)| acc + *span);

    Some(OccupancyStats {
        peak,
        mean: weighted / total_secs,
        busy_minutes: busy.num_minutes(),
    })
}
