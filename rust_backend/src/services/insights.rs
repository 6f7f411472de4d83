use chrono::NaiveDate;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::distributions::{compute_stats, DistributionStats};
use super::occupancy::{count_in_window, rolling_series, AnalysisParams, DayOccupancy};
use crate::core::domain::TicketRecord;
use crate::core::error::{OccupancyError, OccupancyResult};
use crate::transformations::group_by_day;

/// Peak occupancy of one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayPeak {
    pub date: NaiveDate,
    pub max_concurrent: i64,
}

/// Tickets sold in the rolling window ending at a fixed hour of one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowSales {
    pub date: NaiveDate,
    pub count: u32,
}

/// Peak occupancy of every date that has data, in date order.
///
/// Tickets are grouped by day once, then days are computed in parallel; a
/// day without data is skipped.
pub fn daily_peaks(
    tickets: &[TicketRecord],
    dates: &[NaiveDate],
    params: &AnalysisParams,
) -> OccupancyResult<Vec<DayPeak>> {
    let by_day = group_by_day(tickets);
    let peaks: Vec<Option<DayPeak>> = dates
        .par_iter()
        .map(|&date| {
            let day_tickets = tickets_on(&by_day, date);
            let peak = DayOccupancy::compute(date, day_tickets, params)
                .and_then(|day| day.max_concurrent());
            match peak {
                Ok(max_concurrent) => Ok(Some(DayPeak {
                    date,
                    max_concurrent,
                })),
                Err(OccupancyError::NoData { .. }) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .collect::<OccupancyResult<_>>()?;

    Ok(peaks.into_iter().flatten().collect())
}

/// The date with the highest peak occupancy. Ties go to the earliest date.
/// `None` when no date has data.
pub fn busiest_day(
    tickets: &[TicketRecord],
    dates: &[NaiveDate],
    params: &AnalysisParams,
) -> OccupancyResult<Option<DayPeak>> {
    let peaks = daily_peaks(tickets, dates, params)?;
    Ok(peaks.into_iter().max_by(|a, b| {
        a.max_concurrent
            .cmp(&b.max_concurrent)
            .then_with(|| b.date.cmp(&a.date))
    }))
}

/// Per-date count of tickets sold in the rolling window ending at `hour:00`.
pub fn sales_in_window(
    tickets: &[TicketRecord],
    dates: &[NaiveDate],
    params: &AnalysisParams,
    hour: u32,
) -> OccupancyResult<Vec<WindowSales>> {
    let by_day = group_by_day(tickets);
    dates
        .par_iter()
        .map(|&date| -> OccupancyResult<WindowSales> {
            let rates = rolling_series(tickets_on(&by_day, date), date, params)?;
            Ok(WindowSales {
                date,
                count: count_in_window(&rates, date, hour)?,
            })
        })
        .collect()
}

fn tickets_on(
    by_day: &BTreeMap<NaiveDate, Vec<TicketRecord>>,
    date: NaiveDate,
) -> &[TicketRecord] {
    by_day.get(&date).map(Vec::as_slice).unwrap_or(&[])
}

/// Statistics over the daily peaks.
pub fn peak_stats(peaks: &[DayPeak]) -> DistributionStats {
    let values: Vec<f64> = peaks.iter().map(|p| p.max_concurrent as f64).collect();
    compute_stats(&values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::domain::DurationLabel;
    use crate::services::occupancy::max_concurrent;
    use crate::time::date_range;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2017, 9, d).unwrap()
    }

    fn ticket(d: u32, h: u32, m: u32, duration: DurationLabel) -> TicketRecord {
        TicketRecord::new(date(d).and_hms_opt(h, m, 0).unwrap(), duration)
    }

    fn tickets() -> Vec<TicketRecord> {
        vec![
            ticket(4, 9, 0, DurationLabel::AllDay),
            ticket(4, 11, 40, DurationLabel::OneHour),
            ticket(5, 8, 0, DurationLabel::AllDay),
            ticket(5, 8, 30, DurationLabel::FourHour),
            ticket(5, 11, 45, DurationLabel::OneHour),
            ticket(7, 10, 0, DurationLabel::TwoHour),
            ticket(7, 10, 30, DurationLabel::OneHour),
        ]
    }

    #[test]
    fn test_daily_peaks_skip_empty_days() {
        let dates = date_range(date(4), date(7));
        let peaks = daily_peaks(&tickets(), &dates, &AnalysisParams::default()).unwrap();

        assert_eq!(
            peaks,
            vec![
                DayPeak {
                    date: date(4),
                    max_concurrent: 2,
                },
                DayPeak {
                    date: date(5),
                    max_concurrent: 3,
                },
                DayPeak {
                    date: date(7),
                    max_concurrent: 2,
                },
            ]
        );
    }

    #[test]
    fn test_grouped_days_match_single_day_queries() {
        let params = AnalysisParams::default();
        let mut all = tickets();
        // late sales and unsorted input must stay on their own day
        all.push(ticket(4, 23, 50, DurationLabel::OneHour));
        all.push(ticket(5, 0, 40, DurationLabel::Unknown));
        all.reverse();
        let dates = date_range(date(3), date(8));

        let peaks = daily_peaks(&all, &dates, &params).unwrap();
        for peak in &peaks {
            assert_eq!(
                peak.max_concurrent,
                max_concurrent(&all, peak.date, &params).unwrap()
            );
        }
        assert_eq!(peaks.len(), 3);

        let sales = sales_in_window(&all, &dates, &params, 1).unwrap();
        assert_eq!(sales[2].date, date(5));
        assert_eq!(sales[2].count, 1);
        assert_eq!(sales[1].count, 0);
    }

    #[test]
    fn test_busiest_day() {
        let dates = date_range(date(1), date(30));
        let busiest = busiest_day(&tickets(), &dates, &AnalysisParams::default()).unwrap();
        assert_eq!(
            busiest,
            Some(DayPeak {
                date: date(5),
                max_concurrent: 3,
            })
        );

        let empty = busiest_day(&[], &dates, &AnalysisParams::default()).unwrap();
        assert_eq!(empty, None);
    }

    #[test]
    fn test_busiest_day_tie_goes_to_earliest() {
        let dates = vec![date(7), date(4)];
        let busiest = busiest_day(&tickets(), &dates, &AnalysisParams::default()).unwrap();
        assert_eq!(busiest.map(|p| p.date), Some(date(4)));
    }

    #[test]
    fn test_sales_in_window() {
        let sales = sales_in_window(
            &tickets(),
            &date_range(date(4), date(6)),
            &AnalysisParams::default(),
            12,
        )
        .unwrap();

        assert_eq!(
            sales,
            vec![
                WindowSales {
                    date: date(4),
                    count: 1,
                },
                WindowSales {
                    date: date(5),
                    count: 1,
                },
                WindowSales {
                    date: date(6),
                    count: 0,
                },
            ]
        );
    }

    #[test]
    fn test_peak_stats() {
        let peaks = vec![
            DayPeak {
                date: date(4),
                max_concurrent: 2,
            },
            DayPeak {
                date: date(5),
                max_concurrent: 4,
            },
        ];
        let stats = peak_stats(&peaks);
        assert_eq!(stats.count, 2);
        assert!((stats.mean - 3.0).abs() < 1e-9);
        assert_eq!(stats.max, 4.0);
    }
}
