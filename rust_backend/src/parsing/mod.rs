//! Parsers for car park transaction reports.
//!
//! # Parsers
//!
//! - [`csv_parser`]: Parse transaction report CSV files into raw rows
//! - [`duration`]: Extract the ticket duration label from a row description
//!
//! # Example
//!
//! ```no_run
//! use carpark_occupancy::parsing::csv_parser::{parse_transactions_file, ColumnNames};
//! use std::path::Path;
//!
//! let rows = parse_transactions_file(
//!     Path::new("data/Transaction Report 010617 to 311217.csv"),
//!     &ColumnNames::default(),
//! )
//! .expect("Failed to parse report");
//! println!("{} rows", rows.len());
//! ```

pub mod csv_parser;
pub mod duration;


pub use csv_parser::{ColumnNames, TransactionRow};
pub use duration::extract_duration_label;
