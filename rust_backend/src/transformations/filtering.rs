use chrono::NaiveDate;
use std::collections::BTreeMap;

use crate::core::domain::{TicketRecord, TimeWindow};
use crate::parsing::csv_parser::TransactionRow;

/// Tickets whose start falls in `[day 00:00, day+1 00:00)`.
pub fn tickets_for_day(
    tickets: &[TicketRecord],
    day: NaiveDate,
) -> impl Iterator<Item = &TicketRecord> {
    let bounds = TimeWindow::for_day(day);
    tickets.iter().filter(move |t| bounds.contains(t.start))
}

/// Drop rows sold under one of the `excluded` tariff codes.
///
/// Returns the kept rows and the number removed.
pub fn exclude_tariffs(
    rows: Vec<TransactionRow>,
    excluded: &[String],
) -> (Vec<TransactionRow>, usize) {
    if excluded.is_empty() {
        return (rows, 0);
    }

    let before = rows.len();
    let kept: Vec<TransactionRow> = rows
        .into_iter()
        .filter(|row| {
            row.tariff
                .as_deref()
                .map(|tariff| !excluded.iter().any(|code| code == tariff))
                .unwrap_or(true)
        })
        .collect();
    let removed = before - kept.len();
    (kept, removed)
}

/// Split tickets into per-day slices, each keeping the input order.
pub fn group_by_day(tickets: &[TicketRecord]) -> BTreeMap<NaiveDate, Vec<TicketRecord>> {
    let mut days: BTreeMap<NaiveDate, Vec<TicketRecord>> = BTreeMap::new();
    for ticket in tickets {
        days.entry(ticket.start.date()).or_default().push(*ticket);
    }
    days
}
