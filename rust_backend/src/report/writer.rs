use anyhow::{Context, Result};
use chrono::NaiveDate;
use log::debug;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Writes charts, calendar pages and the run summary under one output directory.
///
/// Layout:
/// * `<out_dir>/YYYY/MM/DD/plot.svg` (or `plot_large.svg`)
/// * `<out_dir>/YYYY_MM.html`
/// * `<out_dir>/summary.json`
#[derive(Debug, Clone)]
pub struct ReportWriter {
    out_dir: PathBuf,
    large: bool,
}

impl ReportWriter {
    pub fn new(out_dir: impl Into<PathBuf>, large: bool) -> Self {
        Self {
            out_dir: out_dir.into(),
            large,
        }
    }

    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    /// Chart location relative to the output directory, with `/` separators
    /// so it can be used as an `<img src>` from the calendar page.
    pub fn chart_src(&self, day: NaiveDate) -> String {
        let file = if self.large { "plot_large.svg" } else { "plot.svg" };
        format!("{}/{}", day.format("%Y/%m/%d"), file)
    }

    /// Write a day's chart and return its `src` for the calendar page.
    pub fn write_chart(&self, day: NaiveDate, svg: &str) -> Result<String> {
        let src = self.chart_src(day);
        let path = self.out_dir.join(&src);
        write_file(&path, svg)?;
        debug!("Wrote chart {}", path.display());
        Ok(src)
    }

    pub fn write_month(&self, month: NaiveDate, html: &str) -> Result<PathBuf> {
        let path = self
            .out_dir
            .join(format!("{}.html", month.format("%Y_%m")));
        write_file(&path, html)?;
        Ok(path)
    }

    pub fn write_summary<T: Serialize>(&self, summary: &T) -> Result<PathBuf> {
        let path = self.out_dir.join("summary.json");
        let json = serde_json::to_string_pretty(summary).context("Failed to serialize summary")?;
        write_file(&path, &json)?;
        Ok(path)
    }
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    fs::write(path, contents).with_context(|| format!("Failed to write file: {}", path.display()))
}
