use crate::core::domain::{OccupancyEvent, StepFunction, StepPoint};

/// Superpose signed occupancy events into one compacted step function.
///
/// Events are stably sorted by timestamp and accumulated in a single sweep.
/// Events sharing a timestamp collapse into one point that holds the total
/// after all of them, so a `+1` and a `-1` at the same instant never
/// materialize a transient value. An empty input yields an empty step
/// function ("no data").
///
/// # Examples
///
/// ```
/// use carpark_occupancy::algorithms::merge;
/// use carpark_occupancy::core::domain::OccupancyEvent;
/// use chrono::NaiveDate;
///
/// let t = |h, m| NaiveDate::from_ymd_opt(2017, 9, 4).unwrap().and_hms_opt(h, m, 0).unwrap();
/// let step_fn = merge(vec![
///     OccupancyEvent::arrival(t(10, 0)),
///     OccupancyEvent::arrival(t(10, 0)),
///     OccupancyEvent::departure(t(11, 0)),
///     OccupancyEvent::departure(t(11, 0)),
/// ]);
/// assert_eq!(step_fn.len(), 2);
/// assert_eq!(step_fn.max_value(), Some(2));
/// ```
pub fn merge(mut events: Vec<OccupancyEvent>) -> StepFunction {
    if events.is_empty() {
        return StepFunction::empty();
    }

    events.sort_by_key(|event| event.timestamp);

    let mut points: Vec<StepPoint> = Vec::with_capacity(events.len());
    let mut total = 0i64;
    for event in &events {
        total += event.delta();
        match points.last_mut() {
            Some(last) if last.timestamp == event.timestamp => last.value = total,
            _ => points.push(StepPoint::new(event.timestamp, total)),
        }
    }

    compact_points(&mut points);
    StepFunction::from_sorted(points)
}

/// Remove points that repeat the value of the point before them.
///
/// The first point is always kept. Compacting twice changes nothing.
pub fn compact(step_fn: StepFunction) -> StepFunction {
    let mut points = step_fn.into_points();
    compact_points(&mut points);
    StepFunction::from_sorted(points)
}

fn compact_points(points: &mut Vec<StepPoint>) {
    points.dedup_by(|current, previous| current.value == previous.value);
}
