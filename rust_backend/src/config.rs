//! Configuration file support.
//!
//! Settings are read from a TOML file with three optional sections,
//! `[analysis]`, `[loader]` and `[report]`, and converted into the typed
//! parameter structs used by the services, the loader and the renderer.

use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::algorithms::UnresolvablePolicy;
use crate::core::error::{OccupancyError, OccupancyResult};
use crate::io::loaders::{LoaderOptions, DEFAULT_EXCLUDED_TARIFFS};
use crate::parsing::csv_parser::ColumnNames;
use crate::report::ReportOptions;
use crate::services::AnalysisParams;
use crate::time::parse_clock;

/// Application configuration from file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub analysis: AnalysisSettings,
    #[serde(default)]
    pub loader: LoaderSettings,
    #[serde(default)]
    pub report: ReportSettings,
}

/// Occupancy and rate computation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisSettings {
    #[serde(default = "default_closing_time")]
    pub closing_time: String,
    #[serde(default = "default_sampling_period")]
    pub sampling_period_minutes: u32,
    #[serde(default = "default_rolling_window")]
    pub rolling_window_minutes: u32,
    /// `"drop"` or `"fail"`.
    #[serde(default = "default_unresolvable")]
    pub unresolvable: String,
}

/// Transaction report settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoaderSettings {
    #[serde(default = "default_date_column")]
    pub date_column: String,
    #[serde(default = "default_tariff_column")]
    pub tariff_column: String,
    #[serde(default = "default_description_column")]
    pub description_column: String,
    #[serde(default = "default_excluded_tariffs")]
    pub excluded_tariffs: Vec<String>,
    #[serde(default)]
    pub keep_unrecognized: bool,
}

/// Chart and calendar settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportSettings {
    #[serde(default = "default_out_dir")]
    pub out_dir: String,
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default = "default_view_start")]
    pub view_start: String,
    #[serde(default = "default_view_end")]
    pub view_end: String,
    #[serde(default = "default_occupancy_axis_max")]
    pub occupancy_axis_max: u32,
    #[serde(default = "default_rate_axis_max")]
    pub rate_axis_max: u32,
    #[serde(default = "default_midday_hour")]
    pub midday_hour: u32,
    #[serde(default)]
    pub large: bool,
}

fn default_closing_time() -> String {
    "18:00".to_string()
}

fn default_sampling_period() -> u32 {
    1
}

fn default_rolling_window() -> u32 {
    30
}

fn default_unresolvable() -> String {
    "drop".to_string()
}

fn default_date_column() -> String {
    "Date".to_string()
}

fn default_tariff_column() -> String {
    "Tariff".to_string()
}

fn default_description_column() -> String {
    "Description.1".to_string()
}

fn default_excluded_tariffs() -> Vec<String> {
    DEFAULT_EXCLUDED_TARIFFS
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_out_dir() -> String {
    "out".to_string()
}

fn default_title() -> String {
    "Crick Car Park Usage".to_string()
}

fn default_view_start() -> String {
    "07:00".to_string()
}

fn default_view_end() -> String {
    "18:00".to_string()
}

fn default_occupancy_axis_max() -> u32 {
    170
}

fn default_rate_axis_max() -> u32 {
    40
}

fn default_midday_hour() -> u32 {
    12
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            closing_time: default_closing_time(),
            sampling_period_minutes: default_sampling_period(),
            rolling_window_minutes: default_rolling_window(),
            unresolvable: default_unresolvable(),
        }
    }
}

impl Default for LoaderSettings {
    fn default() -> Self {
        Self {
            date_column: default_date_column(),
            tariff_column: default_tariff_column(),
            description_column: default_description_column(),
            excluded_tariffs: default_excluded_tariffs(),
            keep_unrecognized: false,
        }
    }
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            out_dir: default_out_dir(),
            title: default_title(),
            view_start: default_view_start(),
            view_end: default_view_end(),
            occupancy_axis_max: default_occupancy_axis_max(),
            rate_axis_max: default_rate_axis_max(),
            midday_hour: default_midday_hour(),
            large: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    /// * `Configuration` if the file cannot be read or parsed
    pub fn from_file<P: AsRef<Path>>(path: P) -> OccupancyResult<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            OccupancyError::Configuration(format!(
                "Failed to read config file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> OccupancyResult<Self> {
        toml::from_str(content).map_err(|e| {
            OccupancyError::Configuration(format!("Failed to parse config file: {}", e))
        })
    }

    /// Load configuration from the default location.
    ///
    /// Searches for `carpark.toml` in:
    /// 1. Current directory
    /// 2. `rust_backend/` directory
    /// 3. Parent directory
    pub fn from_default_location() -> OccupancyResult<Self> {
        match Self::default_path() {
            Some(path) => Self::from_file(path),
            None => Err(OccupancyError::Configuration(
                "No carpark.toml found in standard locations".to_string(),
            )),
        }
    }

    /// First existing `carpark.toml` among the standard locations.
    pub fn default_path() -> Option<PathBuf> {
        [
            PathBuf::from("carpark.toml"),
            PathBuf::from("rust_backend/carpark.toml"),
            PathBuf::from("../carpark.toml"),
        ]
        .into_iter()
        .find(|path| path.exists())
    }

    pub fn analysis_params(&self) -> OccupancyResult<AnalysisParams> {
        let settings = &self.analysis;
        let unresolvable = match settings.unresolvable.to_lowercase().as_str() {
            "drop" | "" => UnresolvablePolicy::Drop,
            "fail" | "fail_fast" => UnresolvablePolicy::FailFast,
            other => {
                return Err(OccupancyError::Configuration(format!(
                    "Unknown unresolvable policy: {}. Use 'drop' or 'fail'",
                    other
                )))
            }
        };

        let params = AnalysisParams {
            closing_time: clock_setting("analysis.closing_time", &settings.closing_time)?,
            sampling_period: Duration::minutes(i64::from(settings.sampling_period_minutes)),
            rolling_window: Duration::minutes(i64::from(settings.rolling_window_minutes)),
            unresolvable,
        };
        params
            .validate()
            .map_err(|e| OccupancyError::Configuration(e.to_string()))?;
        Ok(params)
    }

    pub fn loader_options(&self) -> OccupancyResult<LoaderOptions> {
        let settings = &self.loader;
        for (key, value) in [
            ("loader.date_column", &settings.date_column),
            ("loader.description_column", &settings.description_column),
        ] {
            if value.trim().is_empty() {
                return Err(OccupancyError::Configuration(format!(
                    "'{}' must not be empty",
                    key
                )));
            }
        }

        Ok(LoaderOptions {
            columns: ColumnNames {
                date: settings.date_column.clone(),
                tariff: settings.tariff_column.clone(),
                description: settings.description_column.clone(),
            },
            excluded_tariffs: settings.excluded_tariffs.clone(),
            keep_unrecognized: settings.keep_unrecognized,
        })
    }

    pub fn report_options(&self) -> OccupancyResult<ReportOptions> {
        let settings = &self.report;
        let view_start = clock_setting("report.view_start", &settings.view_start)?;
        let view_end = clock_setting("report.view_end", &settings.view_end)?;
        if view_end <= view_start {
            return Err(OccupancyError::Configuration(format!(
                "report.view_end ({}) must be after report.view_start ({})",
                view_end, view_start
            )));
        }
        if settings.midday_hour > 24 {
            return Err(OccupancyError::Configuration(format!(
                "report.midday_hour must be between 0 and 24, got {}",
                settings.midday_hour
            )));
        }

        Ok(ReportOptions {
            out_dir: PathBuf::from(&settings.out_dir),
            title: settings.title.clone(),
            view_start,
            view_end,
            occupancy_axis_max: settings.occupancy_axis_max,
            rate_axis_max: settings.rate_axis_max,
            midday_hour: settings.midday_hour,
            large: settings.large,
        })
    }
}

fn clock_setting(key: &str, value: &str) -> OccupancyResult<chrono::NaiveTime> {
    parse_clock(value).map_err(|e| OccupancyError::Configuration(format!("{}: {}", key, e)))
}
