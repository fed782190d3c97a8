//! Pure aggregation for the summary overview. Nothing here touches the
//! database, so the bucket arithmetic is tested directly.

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveTime, Utc};
use serde::Serialize;

use crate::models::application::{ApplicationSource, ApplicationStatus};

/// Length of the trailing daily trend, today included.
pub const TREND_DAYS: i64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DailyCount {
    pub date: NaiveDate,
    pub count: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusCount {
    pub status: ApplicationStatus,
    pub count: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SourceCount {
    pub source: ApplicationSource,
    pub count: i64,
}

/// Half-open UTC range `[start, end)` covering the trend window: local
/// midnight `TREND_DAYS - 1` days ago up to local midnight tomorrow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrendWindow {
    pub first_day: NaiveDate,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TrendWindow {
    pub fn ending_today(now: DateTime<Utc>, offset: FixedOffset) -> Self {
        let today = now.with_timezone(&offset).date_naive();
        let first_day = today - Duration::days(TREND_DAYS - 1);
        let tomorrow = today + Duration::days(1);
        Self {
            first_day,
            start: local_midnight_utc(first_day, offset),
            end: local_midnight_utc(tomorrow, offset),
        }
    }

    pub fn contains(&self, ts: DateTime<Utc>) -> bool {
        ts >= self.start && ts < self.end
    }
}

fn local_midnight_utc(day: NaiveDate, offset: FixedOffset) -> DateTime<Utc> {
    let local = day.and_time(NaiveTime::MIN);
    let utc = local - Duration::seconds(i64::from(offset.local_minus_utc()));
    DateTime::from_naive_utc_and_offset(utc, Utc)
}

/// Buckets timestamps by local calendar day. Always returns `TREND_DAYS`
/// contiguous entries, oldest first; timestamps outside the window are ignored.
pub fn daily_trend(
    timestamps: &[DateTime<Utc>],
    window: &TrendWindow,
    offset: FixedOffset,
) -> Vec<DailyCount> {
    let mut buckets: Vec<DailyCount> = (0..TREND_DAYS)
        .map(|i| DailyCount {
            date: window.first_day + Duration::days(i),
            count: 0,
        })
        .collect();

    for ts in timestamps.iter().filter(|ts| window.contains(**ts)) {
        let day = ts.with_timezone(&offset).date_naive();
        let idx = (day - window.first_day).num_days();
        if let Some(bucket) = usize::try_from(idx).ok().and_then(|i| buckets.get_mut(i)) {
            bucket.count += 1;
        }
    }
    buckets
}

/// One entry per status in declaration order; statuses with no rows report 0.
pub fn status_counts(grouped: &[(ApplicationStatus, i64)]) -> Vec<StatusCount> {
    ApplicationStatus::ALL
        .iter()
        .map(|&status| StatusCount {
            status,
            count: grouped
                .iter()
                .filter(|(s, _)| *s == status)
                .map(|(_, n)| *n)
                .sum(),
        })
        .collect()
}

pub fn source_counts(grouped: &[(ApplicationSource, i64)]) -> Vec<SourceCount> {
    ApplicationSource::ALL
        .iter()
        .map(|&source| SourceCount {
            source,
            count: grouped
                .iter()
                .filter(|(s, _)| *s == source)
                .map(|(_, n)| *n)
                .sum(),
        })
        .collect()
}
