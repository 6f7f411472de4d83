//! Calendar helpers: month iteration and date/clock parsing for the report layer.

pub mod calendar;

pub use calendar::{
    date_range, month_days, month_start, months_between, next_month, parse_clock, parse_date,
    parse_month,
};
