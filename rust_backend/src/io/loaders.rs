use anyhow::{Context, Result};
use log::info;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::core::domain::{DurationLabel, TicketRecord};
use crate::parsing::csv_parser::{self, ColumnNames, TransactionRow};
use crate::transformations::{duration_counts, exclude_tariffs, rows_to_tickets, sort_by_start};

/// Overnight tariffs that do not describe daytime parking.
pub const DEFAULT_EXCLUDED_TARIFFS: &[&str] = &["105DA", "105M", "105U"];

/// How raw transaction rows become tickets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoaderOptions {
    pub columns: ColumnNames,
    pub excluded_tariffs: Vec<String>,
    pub keep_unrecognized: bool,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self {
            columns: ColumnNames::default(),
            excluded_tariffs: DEFAULT_EXCLUDED_TARIFFS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            keep_unrecognized: false,
        }
    }
}

/// Result of loading transaction data
#[derive(Debug, Clone, Default)]
pub struct LoadResult {
    /// Tickets sorted by start time.
    pub tickets: Vec<TicketRecord>,
    pub rows_read: usize,
    pub excluded_tariff: usize,
    pub dropped_description: usize,
    pub dropped_unrecognized: usize,
}

impl LoadResult {
    pub fn duration_counts(&self) -> BTreeMap<DurationLabel, usize> {
        duration_counts(&self.tickets)
    }
}

/// Unified interface for loading transaction reports
pub struct TransactionLoader;

impl TransactionLoader {
    /// Load a single report file, or every `*.csv` report in a directory.
    pub fn load_from_path(path: &Path, options: &LoaderOptions) -> Result<LoadResult> {
        if path.is_dir() {
            Self::load_from_dir(path, options)
        } else {
            Self::load_from_file(path, options)
        }
    }

    /// Load a single transaction report CSV file
    pub fn load_from_file(path: &Path, options: &LoaderOptions) -> Result<LoadResult> {
        let rows = csv_parser::parse_transactions_file(path, &options.columns)?;
        Ok(Self::finish(rows, options))
    }

    /// Load and concatenate every `*.csv` file in `dir`, in file-name order
    pub fn load_from_dir(dir: &Path, options: &LoaderOptions) -> Result<LoadResult> {
        let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)
            .with_context(|| format!("Failed to list directory: {}", dir.display()))?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| {
                path.is_file()
                    && path
                        .extension()
                        .and_then(|ext| ext.to_str())
                        .map(|ext| ext.eq_ignore_ascii_case("csv"))
                        .unwrap_or(false)
            })
            .collect();
        paths.sort();

        if paths.is_empty() {
            anyhow::bail!("No CSV files found in {}", dir.display());
        }

        let mut rows = Vec::new();
        for path in &paths {
            let mut file_rows = csv_parser::parse_transactions_file(path, &options.columns)?;
            info!("Read {} rows from {}", file_rows.len(), path.display());
            rows.append(&mut file_rows);
        }

        Ok(Self::finish(rows, options))
    }

    /// Load a transaction report held in memory
    pub fn load_from_str(csv_text: &str, options: &LoaderOptions) -> Result<LoadResult> {
        let rows = csv_parser::parse_transactions(csv_text.as_bytes(), &options.columns)
            .context("Failed to parse CSV string")?;
        Ok(Self::finish(rows, options))
    }

    fn finish(rows: Vec<TransactionRow>, options: &LoaderOptions) -> LoadResult {
        let rows_read = rows.len();
        let (rows, excluded_tariff) = exclude_tariffs(rows, &options.excluded_tariffs);
        let mut cleaned = rows_to_tickets(rows, options.keep_unrecognized);
        sort_by_start(&mut cleaned.tickets);

        info!(
            "Loaded {} tickets from {} rows ({} excluded tariff, {} without description, {} unrecognized duration)",
            cleaned.tickets.len(),
            rows_read,
            excluded_tariff,
            cleaned.dropped_description,
            cleaned.dropped_unrecognized
        );

        LoadResult {
            tickets: cleaned.tickets,
            rows_read,
            excluded_tariff,
            dropped_description: cleaned.dropped_description,
            dropped_unrecognized: cleaned.dropped_unrecognized,
        }
    }
}
