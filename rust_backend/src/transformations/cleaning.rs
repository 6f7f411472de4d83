use std::collections::BTreeMap;

use crate::core::domain::{DurationLabel, TicketRecord};
use crate::parsing::csv_parser::TransactionRow;
use crate::parsing::duration::extract_duration_label;

/// Tickets built from transaction rows, with drop counts.
#[derive(Debug, Clone, Default)]
pub struct CleanedTickets {
    pub tickets: Vec<TicketRecord>,
    pub dropped_description: usize,
    pub dropped_unrecognized: usize,
}

/// Turn transaction rows into tickets.
///
/// Rows without a description are dropped. Rows whose description names no
/// known duration are dropped unless `keep_unrecognized` is set, in which
/// case they become `Unknown` tickets.
pub fn rows_to_tickets(rows: Vec<TransactionRow>, keep_unrecognized: bool) -> CleanedTickets {
    let mut cleaned = CleanedTickets {
        tickets: Vec::with_capacity(rows.len()),
        ..Default::default()
    };

    for row in rows {
        let description = match row.description.as_deref().map(str::trim) {
            Some(text) if !text.is_empty() => text,
            _ => {
                cleaned.dropped_description += 1;
                continue;
            }
        };

        let duration = extract_duration_label(description);
        if !duration.is_resolvable() && !keep_unrecognized {
            cleaned.dropped_unrecognized += 1;
            continue;
        }
        cleaned.tickets.push(TicketRecord::new(row.start, duration));
    }

    cleaned
}

pub fn drop_unrecognized(mut tickets: Vec<TicketRecord>) -> Vec<TicketRecord> {
    tickets.retain(|t| t.duration.is_resolvable());
    tickets
}

/// Stable sort by start time. Two ticket machines feed the report, so rows
/// are not chronological.
pub fn sort_by_start(tickets: &mut [TicketRecord]) {
    tickets.sort_by_key(|t| t.start);
}

/// Number of tickets per duration label.
pub fn duration_counts(tickets: &[TicketRecord]) -> BTreeMap<DurationLabel, usize> {
    let mut counts = BTreeMap::new();
    for ticket in tickets {
        *counts.entry(ticket.duration).or_insert(0) += 1;
    }
    counts
}
