//! High-level data loading utilities.
//!
//! This module combines CSV parsing with the cleaning steps that turn raw
//! transaction rows into sorted parking tickets: overnight tariffs are
//! excluded, rows without a duration are dropped, and the result is ordered
//! by start time.
//!
//! # Example
//!
//! ```no_run
//! use carpark_occupancy::io::loaders::{LoaderOptions, TransactionLoader};
//! use std::path::Path;
//!
//! let result = TransactionLoader::load_from_path(Path::new("data"), &LoaderOptions::default())
//!     .expect("Failed to load");
//! println!("Loaded {} tickets", result.tickets.len());
//! ```

pub mod loaders;


pub use loaders::{LoadResult, LoaderOptions, TransactionLoader};
