use chrono::Datelike;

use crate::error::AggregateError;
use crate::model::{Bucket, Snapshot};
use crate::utils;

/// How history is reduced to chart points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BucketPolicy {
    /// Last snapshot of every day.
    Daily,
    /// Last snapshot of every day in the current month, last snapshot of every earlier month.
    Monthly,
}

impl std::str::FromStr for BucketPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "daily" => Ok(BucketPolicy::Daily),
            "monthly" => Ok(BucketPolicy::Monthly),
            other => Err(format!("unknown bucket policy {other:?}")),
        }
    }
}

/// Groups `items` by key and keeps the last item of each group.
///
/// Groups come out in the order their key first appears.
fn last_per_key<K, T>(items: impl IntoIterator<Item = (K, T)>) -> Vec<(K, T)>
where
    K: Eq + std::hash::Hash + Copy,
{
    let mut positions = std::collections::HashMap::new();
    let mut out: Vec<(K, T)> = Vec::new();
    for (key, item) in items {
        match positions.get(&key) {
            Some(&i) => out[i] = (key, item),
            None => {
                positions.insert(key, out.len());
                out.push((key, item));
            }
        }
    }
    out
}

/// Keeps the last snapshot of each calendar day.
fn last_per_day(history: &[Snapshot]) -> Result<Vec<(chrono::NaiveDate, &Snapshot)>, AggregateError> {
    let dated = history
        .iter()
        .map(|s| utils::parse_snapshot_date(&s.time).map(|d| (d, s)))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(last_per_key(dated))
}

/// Reduces history to one bucket per calendar day.
///
/// # Arguments
/// * `history` - Snapshots in append order.
/// * `current` - Today's date; only used for labels.
///
/// # Returns
/// * `Result<Vec<Bucket>, AggregateError>` - Buckets in order of each day's first appearance.
pub fn resample_daily(history: &[Snapshot], current: chrono::NaiveDate) -> Result<Vec<Bucket>, AggregateError> {
    let buckets = last_per_day(history)?
        .into_iter()
        .map(|(date, snapshot)| Bucket {
            label: utils::day_label(date, current),
            snapshot: snapshot.clone(),
        })
        .collect();
    Ok(buckets)
}

/// Reduces history to one bucket per day of the current month and one bucket
/// per earlier month.
///
/// Each bucket holds the latest snapshot of its period. Month buckets come
/// first, followed by the current month's day buckets.
///
/// # Arguments
/// * `history` - Snapshots in append order.
/// * `current` - Today's date; its month is the one kept at day resolution.
pub fn resample_monthly(history: &[Snapshot], current: chrono::NaiveDate) -> Result<Vec<Bucket>, AggregateError> {
    let this_month = (current.year(), current.month());
    let (current_days, prior_days): (Vec<_>, Vec<_>) = last_per_day(history)?
        .into_iter()
        .partition(|(date, _)| (date.year(), date.month()) == this_month);

    let months = last_per_key(
        prior_days
            .into_iter()
            .map(|(date, snapshot)| ((date.year(), date.month()), (date, snapshot))),
    );

    let mut buckets = Vec::with_capacity(months.len() + current_days.len());
    for (_, (date, snapshot)) in months {
        buckets.push(Bucket {
            label: utils::month_label(date, current),
            snapshot: snapshot.clone(),
        });
    }
    for (date, snapshot) in current_days {
        buckets.push(Bucket {
            label: utils::day_label(date, current),
            snapshot: snapshot.clone(),
        });
    }
    Ok(buckets)
}

/// Buckets `history` under `policy`.
pub fn resample(
    history: &[Snapshot],
    policy: BucketPolicy,
    current: chrono::NaiveDate,
) -> Result<Vec<Bucket>, AggregateError> {
    let buckets = match policy {
        BucketPolicy::Daily => resample_daily(history, current)?,
        BucketPolicy::Monthly => resample_monthly(history, current)?,
    };
    log::debug!(
        "Bucketed {} snapshots into {} buckets ({:?})",
        history.len(),
        buckets.len(),
        policy
    );
    Ok(buckets)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> chrono::NaiveDate {
        chrono::NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn history(times: &[&str]) -> Vec<Snapshot> {
        times.iter().map(|t| Snapshot::new(*t)).collect()
    }

    fn times(buckets: &[Bucket]) -> Vec<&str> {
        buckets.iter().map(|b| b.snapshot.time.as_str()).collect()
    }

    fn labels(buckets: &[Bucket]) -> Vec<&str> {
        buckets.iter().map(|b| b.label.as_str()).collect()
    }

    #[test]
    fn empty_history_gives_no_buckets() {
        let today = date(2024, 1, 31);
        assert!(resample_daily(&[], today).unwrap().is_empty());
        assert!(resample_monthly(&[], today).unwrap().is_empty());
    }

    #[test]
    fn single_snapshot_is_one_bucket() {
        let h = history(&["2023/06/01 12:00:00.000"]);
        for policy in [BucketPolicy::Daily, BucketPolicy::Monthly] {
            let buckets = resample(&h, policy, date(2024, 1, 31)).unwrap();
            assert_eq!(times(&buckets), ["2023/06/01 12:00:00.000"]);
        }
    }

    #[test]
    fn daily_keeps_last_of_each_day() {
        let h = history(&[
            "2024/01/10 08:00:00.000",
            "2024/01/10 20:00:00.000",
            "2024/01/11 08:00:00.000",
            "2024/01/12 08:00:00.000",
            "2024/01/12 09:00:00.000",
        ]);
        let buckets = resample_daily(&h, date(2024, 1, 31)).unwrap();
        assert_eq!(
            times(&buckets),
            ["2024/01/10 20:00:00.000", "2024/01/11 08:00:00.000", "2024/01/12 09:00:00.000"]
        );
        assert_eq!(labels(&buckets), ["10日", "11日", "12日"]);
    }

    #[test]
    fn daily_is_idempotent() {
        let h = history(&["2024/01/10 20:00:00.000", "2024/01/11 08:00:00.000"]);
        let today = date(2024, 1, 31);
        let once: Vec<Snapshot> = resample_daily(&h, today).unwrap().into_iter().map(|b| b.snapshot).collect();
        assert_eq!(once, h);
        let twice: Vec<Snapshot> = resample_daily(&once, today).unwrap().into_iter().map(|b| b.snapshot).collect();
        assert_eq!(twice, once);
    }

    #[test]
    fn daily_groups_out_of_order_days_by_first_appearance() {
        let h = history(&[
            "2024/01/11 08:00:00.000",
            "2024/01/10 08:00:00.000",
            "2024/01/11 09:00:00.000",
        ]);
        let buckets = resample_daily(&h, date(2024, 1, 31)).unwrap();
        assert_eq!(times(&buckets), ["2024/01/11 09:00:00.000", "2024/01/10 08:00:00.000"]);
    }

    #[test]
    fn monthly_collapses_past_months() {
        let h = history(&[
            "2023/12/30 10:00:00.000",
            "2023/12/31 10:00:00.000",
            "2024/01/05 10:00:00.000",
            "2024/01/20 10:00:00.000",
            "2024/01/20 22:00:00.000",
            "2024/02/01 10:00:00.000",
            "2024/02/02 08:00:00.000",
            "2024/02/02 18:00:00.000",
        ]);
        let buckets = resample_monthly(&h, date(2024, 2, 15)).unwrap();
        assert_eq!(
            times(&buckets),
            [
                "2023/12/31 10:00:00.000",
                "2024/01/20 22:00:00.000",
                "2024/02/01 10:00:00.000",
                "2024/02/02 18:00:00.000",
            ]
        );
        assert_eq!(labels(&buckets), ["2023年12月", "01月", "01日", "02日"]);
    }

    #[test]
    fn monthly_in_same_month_counts_distinct_days() {
        let h = history(&[
            "2024/03/01 10:00:00.000",
            "2024/03/01 11:00:00.000",
            "2024/03/04 10:00:00.000",
            "2024/03/09 10:00:00.000",
        ]);
        let buckets = resample_monthly(&h, date(2024, 3, 9)).unwrap();
        assert_eq!(buckets.len(), 3);
        assert_eq!(labels(&buckets), ["01日", "04日", "09日"]);
    }

    #[test]
    fn bad_time_is_reported() {
        let h = history(&["2024/01/10 10:00:00.000", "yesterday"]);
        let err = resample_daily(&h, date(2024, 1, 31)).unwrap_err();
        assert!(matches!(err, AggregateError::InvalidTime { time } if time == "yesterday"));
    }

    #[test]
    fn policy_names_parse() {
        assert_eq!("daily".parse::<BucketPolicy>().unwrap(), BucketPolicy::Daily);
        assert_eq!("monthly".parse::<BucketPolicy>().unwrap(), BucketPolicy::Monthly);
        assert!("weekly".parse::<BucketPolicy>().is_err());
    }
}
