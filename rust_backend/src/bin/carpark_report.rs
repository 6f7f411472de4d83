//! Car park report binary
//!
//! Reads ticket-sales transaction reports and writes occupancy calendars, or
//! answers one-off questions about the data.
//!
//! # Usage
//!
//! ```bash
//! # Calendar pages for June to December 2017
//! carpark-report report --input data/ --from 2017-06 --to 2017-12
//!
//! # Day with the highest peak occupancy
//! carpark-report busiest --input data/ --from 2017-06-01 --to 2017-12-31
//!
//! # Tickets sold in the 30 minutes before midday, per day
//! carpark-report midday --input data/ --from 2017-09-01 --to 2017-09-30
//!
//! # Ticket counts per duration label
//! carpark-report durations --input data/
//! ```
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Log level (default: info)

use std::env;
use std::path::{Path, PathBuf};

use anyhow::Context;
use structopt::StructOpt;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use carpark_occupancy::services::{busiest_day, daily_peaks, peak_stats, sales_in_window};
use carpark_occupancy::time::{date_range, parse_date, parse_month};
use carpark_occupancy::{AppConfig, ReportPipeline};

#[derive(StructOpt)]
#[structopt(name = "carpark-report")]
struct Flags {
    /// TOML configuration file. Defaults to carpark.toml when one is found.
    #[structopt(long = "config", parse(from_os_str))]
    config: Option<PathBuf>,

    #[structopt(subcommand)]
    command: Command,
}

#[derive(StructOpt)]
enum Command {
    /// Render daily charts and month calendar pages
    Report {
        /// Transaction report CSV, or a directory of them
        #[structopt(long = "input", parse(from_os_str))]
        input: PathBuf,
        /// First month, YYYY-MM
        #[structopt(long = "from")]
        from: String,
        /// Last month, YYYY-MM
        #[structopt(long = "to")]
        to: String,
        /// Output directory (overrides the configuration)
        #[structopt(long = "out", parse(from_os_str))]
        out: Option<PathBuf>,
        /// Render large charts
        #[structopt(long = "large")]
        large: bool,
    },
    /// Find the day with the highest peak occupancy
    Busiest {
        #[structopt(long = "input", parse(from_os_str))]
        input: PathBuf,
        /// First day, YYYY-MM-DD
        #[structopt(long = "from")]
        from: String,
        /// Last day, YYYY-MM-DD
        #[structopt(long = "to")]
        to: String,
        #[structopt(long = "json")]
        json: bool,
    },
    /// Tickets sold in the rolling window ending at a fixed hour
    Midday {
        #[structopt(long = "input", parse(from_os_str))]
        input: PathBuf,
        #[structopt(long = "from")]
        from: String,
        #[structopt(long = "to")]
        to: String,
        /// Hour ending the window (defaults to report.midday_hour)
        #[structopt(long = "hour")]
        hour: Option<u32>,
        #[structopt(long = "json")]
        json: bool,
    },
    /// Count loaded tickets per duration label
    Durations {
        #[structopt(long = "input", parse(from_os_str))]
        input: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    // Initialize logging
    FmtSubscriber::builder()
        .with_max_level(
            env::var("RUST_LOG")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(Level::INFO),
        )
        .with_target(false)
        .init();

    let flags = Flags::from_args();
    let mut config = load_config(flags.config.as_deref())?;

    match flags.command {
        Command::Report {
            input,
            from,
            to,
            out,
            large,
        } => {
            if let Some(out) = out {
                config.report.out_dir = out.to_string_lossy().into_owned();
            }
            config.report.large |= large;

            let pipeline = ReportPipeline::with_config(&config)?;
            let summary = pipeline.run(&input, parse_month(&from)?, parse_month(&to)?)?;

            println!(
                "Wrote {} month(s) to {}: {} day(s) with data, {} without",
                summary.months_written.len(),
                config.report.out_dir,
                summary.days_with_data,
                summary.days_without_data
            );
            if let Some(busiest) = summary.busiest_day {
                println!("Busiest day: {} ({} cars)", busiest.date, busiest.max_concurrent);
            }
        }
        Command::Busiest {
            input,
            from,
            to,
            json,
        } => {
            let pipeline = ReportPipeline::with_config(&config)?;
            let load = pipeline.load(&input)?;
            let dates = date_range(parse_date(&from)?, parse_date(&to)?);

            let busiest = busiest_day(&load.tickets, &dates, pipeline.params())?;
            if json {
                let peaks = daily_peaks(&load.tickets, &dates, pipeline.params())?;
                let output = serde_json::json!({
                    "busiest_day": busiest,
                    "peak_stats": peak_stats(&peaks),
                });
                println!("{}", serde_json::to_string_pretty(&output)?);
            } else {
                match busiest {
                    Some(day) => println!("{} {}", day.date, day.max_concurrent),
                    None => println!("No data between {} and {}", from, to),
                }
            }
        }
        Command::Midday {
            input,
            from,
            to,
            hour,
            json,
        } => {
            let pipeline = ReportPipeline::with_config(&config)?;
            let hour = hour.unwrap_or(pipeline.report_options().midday_hour);
            let load = pipeline.load(&input)?;
            let dates = date_range(parse_date(&from)?, parse_date(&to)?);

            let sales = sales_in_window(&load.tickets, &dates, pipeline.params(), hour)
                .with_context(|| format!("Failed to count sales before {:02}:00", hour))?;
            if json {
                println!("{}", serde_json::to_string_pretty(&sales)?);
            } else {
                for entry in sales {
                    println!("{} {}", entry.date, entry.count);
                }
            }
        }
        Command::Durations { input } => {
            let pipeline = ReportPipeline::with_config(&config)?;
            let load = pipeline.load(&input)?;
            for (label, count) in load.duration_counts() {
                println!("{:<8} {}", label, count);
            }
            println!("{:<8} {}", "Total", load.tickets.len());
        }
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> anyhow::Result<AppConfig> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => match AppConfig::default_path() {
            Some(found) => found,
            None => {
                info!("No carpark.toml found, using built-in defaults");
                return Ok(AppConfig::default());
            }
        },
    };
    info!("Reading configuration from {}", path.display());
    Ok(AppConfig::from_file(&path)?)
}
