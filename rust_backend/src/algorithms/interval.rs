use chrono::{Duration, NaiveDateTime, NaiveTime};

use crate::core::domain::{default_closing_time, DurationLabel, Interval, TicketRecord};
use crate::core::error::{OccupancyError, OccupancyResult};

/// Maps a ticket's start and duration label to the end of its parking interval.
///
/// Every end is clipped to the closing time of the start's calendar day, and
/// never precedes the start: a ticket sold after closing resolves to a
/// zero-length interval.
///
/// # Examples
///
/// ```
/// use carpark_occupancy::algorithms::IntervalResolver;
/// use carpark_occupancy::core::domain::DurationLabel;
/// use chrono::NaiveDate;
///
/// let start = NaiveDate::from_ymd_opt(2017, 9, 4).unwrap().and_hms_opt(17, 30, 0).unwrap();
/// let end = IntervalResolver::default()
///     .resolve_end(start, DurationLabel::AllDay)
///     .unwrap();
/// assert_eq!(end, start.date().and_hms_opt(18, 0, 0).unwrap());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntervalResolver {
    closing_time: NaiveTime,
}

impl IntervalResolver {
    pub fn new(closing_time: NaiveTime) -> Self {
        Self { closing_time }
    }

    pub fn closing_time(&self) -> NaiveTime {
        self.closing_time
    }

    /// Closing instant on the calendar day of `start`.
    pub fn closing_for(&self, start: NaiveDateTime) -> NaiveDateTime {
        start.date().and_time(self.closing_time)
    }

    /// Resolve the end timestamp of a ticket.
    ///
    /// # Errors
    /// * `UnresolvableDuration` when the label is `Unknown`
    pub fn resolve_end(
        &self,
        start: NaiveDateTime,
        label: DurationLabel,
    ) -> OccupancyResult<NaiveDateTime> {
        let closing = self.closing_for(start);
        let nominal = match label {
            DurationLabel::OneHour => start + Duration::hours(1),
            DurationLabel::TwoHour => start + Duration::hours(2),
            DurationLabel::FourHour => start + Duration::hours(4),
            DurationLabel::AllDay => closing,
            DurationLabel::Unknown => return Err(OccupancyError::UnresolvableDuration { start }),
        };

        Ok(nominal.min(closing).max(start))
    }

    pub fn resolve(&self, ticket: &TicketRecord) -> OccupancyResult<Interval> {
        let end = self.resolve_end(ticket.start, ticket.duration)?;
        Interval::new(ticket.start, end).ok_or(OccupancyError::UnresolvableDuration {
            start: ticket.start,
        })
    }
}

impl Default for IntervalResolver {
    fn default() -> Self {
        Self::new(default_closing_time())
    }
}

/// Resolve a ticket end against the default 18:00 closing time.
pub fn resolve_end(start: NaiveDateTime, label: DurationLabel) -> OccupancyResult<NaiveDateTime> {
    IntervalResolver::default().resolve_end(start, label)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2017, 9, 4)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[test]
    fn test_fixed_durations() {
        assert_eq!(resolve_end(at(9, 0), DurationLabel::OneHour).unwrap(), at(10, 0));
        assert_eq!(resolve_end(at(9, 0), DurationLabel::TwoHour).unwrap(), at(11, 0));
        assert_eq!(resolve_end(at(9, 0), DurationLabel::FourHour).unwrap(), at(13, 0));
    }

    #[test]
    fn test_all_day_ends_at_closing() {
        assert_eq!(resolve_end(at(8, 15), DurationLabel::AllDay).unwrap(), at(18, 0));
    }

    #[test]
    fn test_all_day_late_start_clipped() {
        let end = resolve_end(at(17, 30), DurationLabel::AllDay).unwrap();
        assert_eq!(end, at(18, 0));
    }

    #[test]
    fn test_overflowing_ticket_clipped_to_closing() {
        assert_eq!(resolve_end(at(15, 0), DurationLabel::FourHour).unwrap(), at(18, 0));
        assert_eq!(resolve_end(at(17, 59), DurationLabel::OneHour).unwrap(), at(18, 0));
    }

    #[test]
    fn test_ticket_after_closing_is_zero_length() {
        let end = resolve_end(at(19, 10), DurationLabel::TwoHour).unwrap();
        assert_eq!(end, at(19, 10));

        let all_day = resolve_end(at(18, 30), DurationLabel::AllDay).unwrap();
        assert_eq!(all_day, at(18, 30));
    }

    #[test]
    fn test_unknown_is_unresolvable() {
        let err = resolve_end(at(9, 0), DurationLabel::Unknown).unwrap_err();
        assert_eq!(err, OccupancyError::UnresolvableDuration { start: at(9, 0) });
    }

    #[test]
    fn test_custom_closing_time() {
        let resolver = IntervalResolver::new(NaiveTime::from_hms_opt(20, 0, 0).unwrap());
        assert_eq!(
            resolver.resolve_end(at(17, 30), DurationLabel::FourHour).unwrap(),
            at(20, 0)
        );
        let interval = resolver
            .resolve(&TicketRecord::new(at(19, 0), DurationLabel::OneHour))
            .unwrap();
        assert_eq!(interval.duration(), Duration::hours(1));
    }
}
