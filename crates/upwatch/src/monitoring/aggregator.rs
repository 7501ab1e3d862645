use chrono::{Duration, NaiveDate};

use super::types::{DailyStatus, DaySummary, Summary};
use crate::db::models::{StatusCheckRecord, TargetStatus};

/// Derive rollup statistics from a target's history records over the
/// trailing `window_days` ending at `today`.
///
/// Pure and deterministic given the same records and `today`. Records
/// outside the window are ignored. With zero records in the window the
/// result is the optimistic default: 100% uptime, zero average latency, and
/// every day marked NoData.
pub fn summarize(records: &[StatusCheckRecord], window_days: u32, today: NaiveDate) -> Summary {
    let window_days = window_days.max(1);
    let first_day = today - Duration::days(i64::from(window_days) - 1);

    let in_window: Vec<&StatusCheckRecord> = records
        .iter()
        .filter(|record| {
            let day = record.created_at.date_naive();
            day >= first_day && day <= today
        })
        .collect();

    let total = in_window.len();
    let up = in_window.iter().filter(|record| record.status == TargetStatus::Up).count();
    let uptime_percent =
        if total == 0 { 100.0 } else { 100.0 * up as f64 / total as f64 };

    let latencies: Vec<u64> = in_window.iter().filter_map(|record| record.latency_ms).collect();
    let avg_latency_ms = if latencies.is_empty() {
        0.0
    } else {
        latencies.iter().sum::<u64>() as f64 / latencies.len() as f64
    };

    let mut daily_statuses = Vec::with_capacity(window_days as usize);
    for offset in 0..window_days {
        let date = first_day + Duration::days(i64::from(offset));

        // A single Down check marks the whole day Down.
        let mut status = DailyStatus::NoData;
        for record in &in_window {
            if record.created_at.date_naive() != date {
                continue;
            }
            if record.status == TargetStatus::Down {
                status = DailyStatus::Down;
                break;
            }
            status = DailyStatus::Up;
        }

        daily_statuses.push(DaySummary { date, status });
    }

    Summary { uptime_percent, avg_latency_ms, daily_statuses }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveTime, Utc};
    use uuid::Uuid;

    use super::*;

    fn day(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn record_on(date: NaiveDate, status: TargetStatus, latency_ms: Option<u64>) -> StatusCheckRecord {
        let noon = NaiveTime::from_hms_opt(12, 0, 0).unwrap();
        StatusCheckRecord {
            id: None,
            target_id: Uuid::nil(),
            created_at: date.and_time(noon).and_utc(),
            status,
            latency_ms,
            location: None,
        }
    }

    #[test]
    fn zero_records_yields_optimistic_defaults() {
        let today = day(2025, 6, 30);
        let summary = summarize(&[], 30, today);

        assert_eq!(summary.uptime_percent, 100.0);
        assert_eq!(summary.avg_latency_ms, 0.0);
        assert_eq!(summary.daily_statuses.len(), 30);
        assert!(summary.daily_statuses.iter().all(|d| d.status == DailyStatus::NoData));
        assert_eq!(summary.daily_statuses.first().unwrap().date, day(2025, 6, 1));
        assert_eq!(summary.daily_statuses.last().unwrap().date, today);
    }

    #[test]
    fn uptime_and_average_latency() {
        let today = day(2025, 6, 30);
        let records = vec![
            record_on(today, TargetStatus::Up, Some(100)),
            record_on(today, TargetStatus::Up, Some(200)),
            record_on(today - Duration::days(1), TargetStatus::Down, None),
            record_on(today - Duration::days(2), TargetStatus::Up, Some(300)),
        ];

        let summary = summarize(&records, 30, today);
        assert_eq!(summary.uptime_percent, 75.0);
        assert_eq!(summary.avg_latency_ms, 200.0);
    }

    #[test]
    fn down_dominates_within_a_day() {
        let today = day(2025, 6, 30);
        let records = vec![
            record_on(today, TargetStatus::Up, Some(100)),
            record_on(today, TargetStatus::Down, None),
            record_on(today, TargetStatus::Up, Some(110)),
        ];

        let summary = summarize(&records, 7, today);
        assert_eq!(summary.daily_statuses.last().unwrap().status, DailyStatus::Down);
    }

    #[test]
    fn days_with_only_up_checks_are_up() {
        let today = day(2025, 6, 30);
        let records = vec![
            record_on(today - Duration::days(1), TargetStatus::Up, Some(90)),
            record_on(today - Duration::days(1), TargetStatus::Up, Some(95)),
        ];

        let summary = summarize(&records, 7, today);
        let statuses: Vec<DailyStatus> =
            summary.daily_statuses.iter().map(|d| d.status).collect();
        assert_eq!(statuses[5], DailyStatus::Up);
        assert_eq!(statuses[6], DailyStatus::NoData);
    }

    #[test]
    fn records_outside_the_window_are_ignored() {
        let today = day(2025, 6, 30);
        let records = vec![
            record_on(today - Duration::days(10), TargetStatus::Down, None),
            record_on(today, TargetStatus::Up, Some(50)),
        ];

        let summary = summarize(&records, 7, today);
        assert_eq!(summary.uptime_percent, 100.0);
        assert_eq!(summary.avg_latency_ms, 50.0);
    }

    #[test]
    fn summarize_is_idempotent() {
        let today = Utc::now().date_naive();
        let records = vec![
            record_on(today, TargetStatus::Up, Some(10)),
            record_on(today - Duration::days(3), TargetStatus::Down, None),
        ];

        let first = summarize(&records, 30, today);
        let second = summarize(&records, 30, today);
        assert_eq!(first, second);
    }
}
