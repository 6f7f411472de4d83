use chrono::NaiveDate;
use log::debug;
use serde::{Deserialize, Serialize};

use super::interval::IntervalResolver;
use crate::core::domain::{OccupancyEvent, TicketRecord};
use crate::core::error::{OccupancyError, OccupancyResult};
use crate::transformations::tickets_for_day;

/// What to do with a ticket whose duration label cannot be resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnresolvablePolicy {
    /// Leave the ticket out of occupancy. It still counts toward the sales rate.
    #[default]
    Drop,
    /// Fail the whole day's occupancy computation.
    FailFast,
}

/// Converts one day's tickets into signed occupancy events.
#[derive(Debug, Clone, Copy, Default)]
pub struct EventStreamBuilder {
    resolver: IntervalResolver,
    policy: UnresolvablePolicy,
}

impl EventStreamBuilder {
    pub fn new(resolver: IntervalResolver, policy: UnresolvablePolicy) -> Self {
        Self { resolver, policy }
    }

    /// Emit `(start, +1)` and `(end, -1)` for every resolvable ticket starting on `day`.
    ///
    /// Events come out in ticket order; the merger sorts them.
    pub fn build(
        &self,
        day: NaiveDate,
        tickets: &[TicketRecord],
    ) -> OccupancyResult<Vec<OccupancyEvent>> {
        let mut events = Vec::with_capacity(tickets.len() * 2);
        let mut dropped = 0usize;

        for ticket in tickets_for_day(tickets, day) {
            match self.resolver.resolve(ticket) {
                Ok(interval) => {
                    events.push(OccupancyEvent::arrival(interval.start()));
                    events.push(OccupancyEvent::departure(interval.end()));
                }
                Err(err @ OccupancyError::UnresolvableDuration { .. }) => match self.policy {
                    UnresolvablePolicy::Drop => dropped += 1,
                    UnresolvablePolicy::FailFast => return Err(err),
                },
                Err(err) => return Err(err),
            }
        }

        debug!(
            "{}: {} occupancy events, {} ticket(s) without a resolvable duration",
            day,
            events.len(),
            dropped
        );
        Ok(events)
    }
}

/// Build events for `day` with the default closing time, dropping unresolvable tickets.
pub fn build_events(day: NaiveDate, tickets: &[TicketRecord]) -> Vec<OccupancyEvent> {
    // The drop policy never fails.
    EventStreamBuilder::default()
        .build(day, tickets)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::domain::{DurationLabel, EventKind};
    use chrono::NaiveDateTime;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2017, 9, 4).unwrap()
    }

    fn at(h: u32, m: u32) -> NaiveDateTime {
        day().and_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_two_events_per_ticket() {
        let tickets = vec![
            TicketRecord::new(at(9, 0), DurationLabel::OneHour),
            TicketRecord::new(at(9, 30), DurationLabel::TwoHour),
        ];
        let events = build_events(day(), &tickets);

        assert_eq!(
            events,
            vec![
                OccupancyEvent::arrival(at(9, 0)),
                OccupancyEvent::departure(at(10, 0)),
                OccupancyEvent::arrival(at(9, 30)),
                OccupancyEvent::departure(at(11, 30)),
            ]
        );
    }

    #[test]
    fn test_other_days_are_filtered_out() {
        let previous = day().pred_opt().unwrap().and_hms_opt(23, 59, 0).unwrap();
        let next = day().succ_opt().unwrap().and_hms_opt(0, 0, 0).unwrap();
        let tickets = vec![
            TicketRecord::new(previous, DurationLabel::OneHour),
            TicketRecord::new(at(0, 0), DurationLabel::OneHour),
            TicketRecord::new(next, DurationLabel::OneHour),
        ];

        let events = build_events(day(), &tickets);
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].timestamp, at(0, 0));
    }

    #[test]
    fn test_identical_tickets_are_not_deduplicated() {
        let ticket = TicketRecord::new(at(10, 0), DurationLabel::OneHour);
        let events = build_events(day(), &[ticket, ticket]);
        assert_eq!(events.len(), 4);
        assert_eq!(
            events
                .iter()
                .filter(|e| e.kind == EventKind::Arrival)
                .count(),
            2
        );
    }

    #[test]
    fn test_drop_policy_skips_unknown() {
        let tickets = vec![
            TicketRecord::new(at(9, 0), DurationLabel::Unknown),
            TicketRecord::new(at(9, 5), DurationLabel::OneHour),
        ];
        let events = EventStreamBuilder::default().build(day(), &tickets).unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].timestamp, at(9, 5));
    }

    #[test]
    fn test_fail_fast_policy_rejects_unknown() {
        let tickets = vec![
            TicketRecord::new(at(9, 5), DurationLabel::OneHour),
            TicketRecord::new(at(9, 0), DurationLabel::Unknown),
        ];
        let builder =
            EventStreamBuilder::new(IntervalResolver::default(), UnresolvablePolicy::FailFast);
        let err = builder.build(day(), &tickets).unwrap_err();
        assert_eq!(err, OccupancyError::UnresolvableDuration { start: at(9, 0) });
    }

    #[test]
    fn test_fail_fast_ignores_unknown_on_other_days() {
        let other_day = day().succ_opt().unwrap().and_hms_opt(9, 0, 0).unwrap();
        let tickets = vec![TicketRecord::new(other_day, DurationLabel::Unknown)];
        let builder =
            EventStreamBuilder::new(IntervalResolver::default(), UnresolvablePolicy::FailFast);
        assert!(builder.build(day(), &tickets).unwrap().is_empty());
    }
}
