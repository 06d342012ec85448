use chrono::Datelike;

use crate::error::AggregateError;
use crate::series;

/// Format of `Snapshot::time`, e.g. `2024/01/10 09:30:00.123`.
pub const SNAPSHOT_TIME_FORMAT: &str = "%Y/%m/%d %H:%M:%S%.3f";

/// Snapshots are stamped in Asia/Tokyo, which has no DST.
const JST_OFFSET_SECS: i32 = 9 * 3600;

fn jst() -> chrono::FixedOffset {
    chrono::FixedOffset::east_opt(JST_OFFSET_SECS).expect("JST offset in range")
}

/// Current time formatted for a new snapshot.
pub fn snapshot_time_now() -> String {
    chrono::Utc::now()
        .with_timezone(&jst())
        .format(SNAPSHOT_TIME_FORMAT)
        .to_string()
}

/// Today's calendar date in the snapshot timezone.
pub fn today() -> chrono::NaiveDate {
    chrono::Utc::now().with_timezone(&jst()).date_naive()
}

/// Parses the date portion (`YYYY/MM/DD`) of a snapshot time.
///
/// # Errors
/// * `AggregateError::InvalidTime` if the time does not start with a valid date.
pub fn parse_snapshot_date(time: &str) -> Result<chrono::NaiveDate, AggregateError> {
    let date = time.split_whitespace().next().unwrap_or_default();
    chrono::NaiveDate::parse_from_str(date, "%Y/%m/%d").map_err(|_| AggregateError::InvalidTime {
        time: time.to_string(),
    })
}

/// Label of a month bucket, with the year only when it differs from `current`.
pub fn month_label(date: chrono::NaiveDate, current: chrono::NaiveDate) -> String {
    if date.year() == current.year() {
        format!("{:02}月", date.month())
    } else {
        format!("{}年{:02}月", date.year(), date.month())
    }
}

/// Label of a day bucket: `15日` inside the current month, `02月15日` in the
/// current year, `2023年02月15日` before that.
pub fn day_label(date: chrono::NaiveDate, current: chrono::NaiveDate) -> String {
    if date.year() != current.year() {
        format!("{}年{:02}月{:02}日", date.year(), date.month(), date.day())
    } else if date.month() != current.month() {
        format!("{:02}月{:02}日", date.month(), date.day())
    } else {
        format!("{:02}日", date.day())
    }
}

/// Prints every series as a table row, one column per bucket.
///
/// # Example Output
/// ```text
///  - 住信SBIネット銀行              : 120000, 125000, 131000
///  - total                           : 120000, 125000, 131000
/// ```
pub fn print_series(chart: &series::ChartData) {
    println!(" - {:<32}: {}", "label", chart.labels.join(", "));
    for s in &chart.series {
        println!(" - {:<32}: {}", s.label, join_values(&s.values));
    }
    println!(" - {:<32}: {}", "total", join_values(&chart.total));
}

fn join_values(values: &[i64]) -> String {
    values.iter().map(|v| v.to_string()).collect::<Vec<_>>().join(", ")
}
