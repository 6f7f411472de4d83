//! End-to-end tests from transaction report files to written calendar pages.

use std::fs;

use carpark_occupancy::config::AppConfig;
use carpark_occupancy::core::domain::{DurationLabel, TicketRecord};
use carpark_occupancy::services::{
    busiest_day, count_in_window, max_concurrent, rolling_series, DayOccupancy,
};
use carpark_occupancy::time::{date_range, parse_month};
use carpark_occupancy::{OccupancyError, ReportPipeline};
use chrono::{NaiveDate, NaiveDateTime};
use tempfile::tempdir;

// ==================== Helper Functions ====================

const MACHINE_ONE: &str = "Date,Machine,Tariff,Description,Description.1\n\
    04/09/2017 09:00,M1,101,Car Park,1 Hour\n\
    04/09/2017 09:30,M1,102,Car Park,2 Hour\n\
    04/09/2017 12:10,M1,101,Car Park,1 Hour\n\
    04/09/2017 18:30,M1,105DA,Overnight,Overnight\n\
    05/09/2017 17:30,M1,104,Car Park,All Day\n";

const MACHINE_TWO: &str = "Date,Machine,Tariff,Description,Description.1\n\
    04/09/2017 09:15,M2,103,Car Park,4 Hour\n\
    04/09/2017 12:00,M2,101,Car Park,1 Hour\n\
    04/09/2017 12:29,M2,199,Car Park,Permit\n\
    04/09/2017 13:00,M2,101,Car Park,\n";

fn date(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2017, 9, d).unwrap()
}

fn config_for(out_dir: &std::path::Path, extra: &str) -> AppConfig {
    AppConfig::from_toml_str(&format!(
        "[report]\nout_dir = \"{}\"\n{}",
        out_dir.display().to_string().replace('\\', "/"),
        extra
    ))
    .unwrap()
}

// ==================== Pipeline ====================

#[test]
fn test_report_from_directory_of_machines() {
    let input = tempdir().unwrap();
    fs::write(input.path().join("machine_1.csv"), MACHINE_ONE).unwrap();
    fs::write(input.path().join("machine_2.csv"), MACHINE_TWO).unwrap();
    let out = tempdir().unwrap();

    let pipeline = ReportPipeline::with_config(&config_for(out.path(), "")).unwrap();
    let summary = pipeline
        .run(
            input.path(),
            parse_month("2017-09").unwrap(),
            parse_month("2017-09").unwrap(),
        )
        .unwrap();

    assert_eq!(summary.months_written, vec!["2017-09"]);
    assert_eq!(summary.days_with_data, 2);
    assert_eq!(summary.days_without_data, 28);
    assert_eq!(summary.busiest_day.map(|d| d.date), Some(date(4)));
    assert_eq!(summary.busiest_day.map(|d| d.max_concurrent), Some(3));

    let page = fs::read_to_string(out.path().join("2017_09.html")).unwrap();
    let html = htmlescape::decode_html(&page).unwrap_or_default();
    assert!(html.contains("<img src=\"2017/09/04/plot.svg\"/>"));
    assert!(html.contains("<img src=\"2017/09/05/plot.svg\"/>"));
    assert_eq!(html.matches("<img").count(), 2);

    let svg = fs::read_to_string(out.path().join("2017/09/04/plot.svg")).unwrap();
    assert!(svg.starts_with("<svg"));

    let summary_json = fs::read_to_string(out.path().join("summary.json")).unwrap();
    assert!(summary_json.contains("\"days_with_data\": 2"));
}

#[test]
fn test_large_charts_from_config() {
    let input = tempdir().unwrap();
    let source = input.path().join("report.csv");
    fs::write(&source, MACHINE_ONE).unwrap();
    let out = tempdir().unwrap();

    let config = config_for(out.path(), "large = true\n");
    let pipeline = ReportPipeline::with_config(&config).unwrap();
    pipeline
        .run(
            &source,
            parse_month("2017-09").unwrap(),
            parse_month("2017-09").unwrap(),
        )
        .unwrap();

    assert!(out.path().join("2017/09/04/plot_large.svg").exists());
    assert!(!out.path().join("2017/09/04/plot.svg").exists());
}

#[test]
fn test_fail_fast_configuration_rejects_unknown_durations() {
    let input = tempdir().unwrap();
    let source = input.path().join("report.csv");
    fs::write(&source, MACHINE_TWO).unwrap();
    let out = tempdir().unwrap();

    let config = AppConfig::from_toml_str(&format!(
        "[analysis]\nunresolvable = \"fail\"\n[loader]\nkeep_unrecognized = true\n[report]\nout_dir = \"{}\"\n",
        out.path().display().to_string().replace('\\', "/")
    ))
    .unwrap();
    let pipeline = ReportPipeline::with_config(&config).unwrap();
    let result = pipeline.run(
        &source,
        parse_month("2017-09").unwrap(),
        parse_month("2017-09").unwrap(),
    );

    let err = result.unwrap_err();
    let cause = err
        .chain()
        .find_map(|cause| cause.downcast_ref::<OccupancyError>())
        .cloned();
    assert!(matches!(
        cause,
        Some(OccupancyError::UnresolvableDuration { .. })
    ));
}

// ==================== Queries ====================

#[test]
fn test_queries_on_loaded_tickets() {
    let input = tempdir().unwrap();
    fs::write(input.path().join("machine_1.csv"), MACHINE_ONE).unwrap();
    fs::write(input.path().join("machine_2.csv"), MACHINE_TWO).unwrap();

    let config = AppConfig::from_toml_str("[loader]\nkeep_unrecognized = true\n").unwrap();
    let pipeline = ReportPipeline::with_config(&config).unwrap();
    let load = pipeline.load(input.path()).unwrap();

    assert_eq!(load.rows_read, 9);
    assert_eq!(load.excluded_tariff, 1);
    assert_eq!(load.dropped_description, 1);
    assert_eq!(load.tickets.len(), 7);
    assert_eq!(load.duration_counts()[&DurationLabel::Unknown], 1);

    let params = pipeline.params();
    // 09:30 two-hour, 09:15 four-hour and 09:00 one-hour overlap at 09:30
    assert_eq!(max_concurrent(&load.tickets, date(4), params).unwrap(), 3);
    assert_eq!(
        max_concurrent(&load.tickets, date(6), params),
        Err(OccupancyError::NoData { date: date(6) })
    );

    // The permit sale at 12:29 has no duration but still counts as a sale.
    let day = DayOccupancy::compute(date(4), &load.tickets, params).unwrap();
    let rates = day.rolling_series().unwrap();
    assert_eq!(count_in_window(&rates, date(4), 12).unwrap(), 0);
    assert_eq!(rates.at(date(4).and_hms_opt(12, 30, 0).unwrap()), Some(3));

    let busiest = busiest_day(&load.tickets, &date_range(date(1), date(30)), params).unwrap();
    assert_eq!(busiest.map(|d| d.date), Some(date(4)));
}

// ==================== Scenarios ====================

fn steps(tickets: &[TicketRecord]) -> Vec<(NaiveDateTime, i64)> {
    let day = DayOccupancy::compute(date(4), tickets, &Default::default()).unwrap();
    day.step_function()
        .points()
        .iter()
        .map(|p| (p.timestamp, p.value))
        .collect()
}

fn ticket(h: u32, m: u32, duration: DurationLabel) -> TicketRecord {
    TicketRecord::new(at(h, m), duration)
}

fn at(h: u32, m: u32) -> NaiveDateTime {
    date(4).and_hms_opt(h, m, 0).unwrap()
}

#[test]
fn test_scenario_a_overlapping_stays() {
    let tickets = vec![
        ticket(9, 0, DurationLabel::OneHour),
        ticket(9, 30, DurationLabel::TwoHour),
    ];
    assert_eq!(
        steps(&tickets),
        vec![(at(9, 0), 1), (at(9, 30), 2), (at(10, 0), 1), (at(11, 30), 0)]
    );
}

#[test]
fn test_scenario_b_all_day_clipped_at_closing() {
    let tickets = vec![ticket(17, 30, DurationLabel::AllDay)];
    assert_eq!(steps(&tickets), vec![(at(17, 30), 1), (at(18, 0), 0)]);
}

#[test]
fn test_scenario_c_empty_day_is_no_data() {
    let params = Default::default();
    assert_eq!(
        max_concurrent(&[], date(4), &params),
        Err(OccupancyError::NoData { date: date(4) })
    );
}

#[test]
fn test_scenario_d_identical_starts_share_a_point() {
    let tickets = vec![
        ticket(10, 0, DurationLabel::OneHour),
        ticket(10, 0, DurationLabel::OneHour),
    ];
    assert_eq!(steps(&tickets), vec![(at(10, 0), 2), (at(11, 0), 0)]);
}

#[test]
fn test_scenario_e_sales_in_the_half_hour() {
    let tickets = vec![
        ticket(12, 0, DurationLabel::OneHour),
        ticket(12, 10, DurationLabel::Unknown),
        ticket(12, 29, DurationLabel::TwoHour),
    ];
    let params = Default::default();
    let rates = rolling_series(&tickets, date(4), &params).unwrap();
    assert_eq!(rates.at(at(12, 30)), Some(3));
}
