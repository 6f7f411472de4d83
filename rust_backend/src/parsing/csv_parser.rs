use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use std::io::Read;
use std::path::Path;

use crate::core::error::OccupancyError;

/// Day-first timestamp layouts seen in transaction reports. Two-digit years
/// are tried first since `%Y` would also accept them.
const DATETIME_FORMATS: &[&str] = &[
    "%d/%m/%y %H:%M:%S",
    "%d/%m/%y %H:%M",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
];

const DATE_FORMATS: &[&str] = &["%d/%m/%y", "%d/%m/%Y", "%Y-%m-%d"];

/// Names of the transaction report columns the parser reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnNames {
    pub date: String,
    pub tariff: String,
    pub description: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            date: "Date".to_string(),
            tariff: "Tariff".to_string(),
            description: "Description.1".to_string(),
        }
    }
}

/// One row of a transaction report, before any cleaning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionRow {
    /// 1-based data row number (header excluded).
    pub row: usize,
    pub start: NaiveDateTime,
    pub tariff: Option<String>,
    pub description: Option<String>,
}

/// Parse a day-first timestamp. A bare date means midnight.
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
                .map(|date| date.and_time(NaiveTime::MIN))
        })
}

/// Parse a transaction report from any reader.
///
/// The date and description columns are required; the tariff column is
/// optional. An unparseable date fails the whole parse with a
/// [`OccupancyError::MalformedRecord`].
pub fn parse_transactions<R: Read>(
    reader: R,
    columns: &ColumnNames,
) -> Result<Vec<TransactionRow>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr.headers().context("Failed to read CSV header")?.clone();
    let find = |name: &str| headers.iter().position(|h| h == name);

    let date_idx = find(&columns.date).ok_or_else(|| OccupancyError::MalformedRecord {
        row: 0,
        reason: format!("missing required column '{}'", columns.date),
    })?;
    let description_idx =
        find(&columns.description).ok_or_else(|| OccupancyError::MalformedRecord {
            row: 0,
            reason: format!("missing required column '{}'", columns.description),
        })?;
    let tariff_idx = find(&columns.tariff);

    let mut rows = Vec::new();
    for (i, record) in rdr.records().enumerate() {
        let row = i + 1;
        let record = record.with_context(|| format!("Failed to read CSV row {}", row))?;

        let raw_date = record.get(date_idx).unwrap_or("");
        let start = parse_timestamp(raw_date).ok_or_else(|| OccupancyError::MalformedRecord {
            row,
            reason: format!("unparseable date '{}'", raw_date),
        })?;

        let optional = |idx: Option<usize>| {
            idx.and_then(|i| record.get(i))
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };

        rows.push(TransactionRow {
            row,
            start,
            tariff: optional(tariff_idx),
            description: optional(Some(description_idx)),
        });
    }

    Ok(rows)
}

/// Parse a transaction report file.
pub fn parse_transactions_file(path: &Path, columns: &ColumnNames) -> Result<Vec<TransactionRow>> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open transaction report: {}", path.display()))?;
    parse_transactions(file, columns)
        .with_context(|| format!("Failed to parse transaction report: {}", path.display()))
}
