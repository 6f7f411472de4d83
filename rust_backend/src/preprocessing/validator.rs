//! Sanity checks on a loaded ticket set.
//!
//! The validator looks for data that would make the reports misleading
//! rather than wrong: an empty load, tickets sold after closing, tickets with
//! no usable duration, or a load where cleaning discarded most rows.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::core::domain::DurationLabel;
use crate::io::loaders::LoadResult;
use crate::services::AnalysisParams;

/// Validation result with categorized issues and statistics.
///
/// Errors make `is_valid` false; warnings are informational.
///
/// # Examples
///
/// ```
/// use carpark_occupancy::preprocessing::validator::ValidationResult;
///
/// let mut result = ValidationResult::new();
/// assert!(result.is_valid);
///
/// result.add_warning("3 tickets sold after closing".to_string());
/// assert!(result.is_valid);
///
/// result.add_error("No tickets loaded".to_string());
/// assert!(!result.is_valid);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub stats: ValidationStats,
}

/// Summary statistics computed during validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationStats {
    pub total_tickets: usize,
    pub days_covered: usize,
    pub first_day: Option<NaiveDate>,
    pub last_day: Option<NaiveDate>,
    pub unknown_durations: usize,
    /// Tickets sold at or after closing time; they resolve to zero-length stays.
    pub after_closing: usize,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self {
            is_valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
            stats: ValidationStats::default(),
        }
    }

    /// Adds a critical error and marks the result as invalid.
    pub fn add_error(&mut self, error: String) {
        self.is_valid = false;
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: String) {
        self.warnings.push(warning);
    }
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::new()
    }
}

/// Validator for loaded ticket sets.
pub struct TicketValidator;

impl TicketValidator {
    pub fn validate(load: &LoadResult, params: &AnalysisParams) -> ValidationResult {
        let mut result = ValidationResult::new();
        let tickets = &load.tickets;

        let days: BTreeSet<NaiveDate> = tickets.iter().map(|t| t.start.date()).collect();
        result.stats = ValidationStats {
            total_tickets: tickets.len(),
            days_covered: days.len(),
            first_day: days.iter().next().copied(),
            last_day: days.iter().next_back().copied(),
            unknown_durations: tickets
                .iter()
                .filter(|t| t.duration == DurationLabel::Unknown)
                .count(),
            after_closing: tickets
                .iter()
                .filter(|t| t.start.time() >= params.closing_time)
                .count(),
        };

        if tickets.is_empty() {
            result.add_error(format!("No tickets loaded from {} rows", load.rows_read));
            return result;
        }

        if result.stats.after_closing > 0 {
            result.add_warning(format!(
                "{} ticket(s) sold at or after closing time {}",
                result.stats.after_closing, params.closing_time
            ));
        }

        if result.stats.unknown_durations > 0 {
            result.add_warning(format!(
                "{} ticket(s) have no recognised duration and only count toward the sales rate",
                result.stats.unknown_durations
            ));
        }

        let discarded = load.rows_read.saturating_sub(tickets.len());
        if discarded * 2 > load.rows_read {
            result.add_warning(format!(
                "Cleaning discarded {} of {} rows",
                discarded, load.rows_read
            ));
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::domain::TicketRecord;
    use chrono::NaiveDateTime;

    fn at(d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2017, 9, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    fn load(tickets: Vec<TicketRecord>, rows_read: usize) -> LoadResult {
        LoadResult {
            tickets,
            rows_read,
            ..Default::default()
        }
    }

    #[test]
    fn test_empty_load_is_invalid() {
        let result = TicketValidator::validate(&load(Vec::new(), 12), &AnalysisParams::default());
        assert!(!result.is_valid);
        assert_eq!(result.errors.len(), 1);
        assert!(result.errors[0].contains("12 rows"));
    }

    #[test]
    fn test_clean_load() {
        let tickets = vec![
            TicketRecord::new(at(4, 9), DurationLabel::OneHour),
            TicketRecord::new(at(5, 10), DurationLabel::AllDay),
        ];
        let result = TicketValidator::validate(&load(tickets, 3), &AnalysisParams::default());

        assert!(result.is_valid);
        assert!(result.warnings.is_empty());
        assert_eq!(result.stats.total_tickets, 2);
        assert_eq!(result.stats.days_covered, 2);
        assert_eq!(result.stats.first_day, NaiveDate::from_ymd_opt(2017, 9, 4));
        assert_eq!(result.stats.last_day, NaiveDate::from_ymd_opt(2017, 9, 5));
    }

    #[test]
    fn test_warnings() {
        let tickets = vec![
            TicketRecord::new(at(4, 18), DurationLabel::OneHour),
            TicketRecord::new(at(4, 11), DurationLabel::Unknown),
        ];
        let result = TicketValidator::validate(&load(tickets, 10), &AnalysisParams::default());

        assert!(result.is_valid);
        assert_eq!(result.stats.after_closing, 1);
        assert_eq!(result.stats.unknown_durations, 1);
        assert_eq!(result.warnings.len(), 3);
    }
}
