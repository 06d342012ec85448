use crate::config::{AccountSpec, Predicate};
use crate::error::AggregateError;
use crate::model::{Bucket, Category};

/// Balance series of one charted account.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct NamedSeries {
    pub label: String,
    pub color: String,
    pub values: Vec<i64>,
}

/// Everything the chart publisher needs for one run.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub series: Vec<NamedSeries>,
    pub total: Vec<i64>,
}

/// Balance of the record matching `predicate` in every bucket.
///
/// A bucket without a match contributes `0` at its own position, so the
/// result always has one value per bucket.
///
/// # Errors
/// * `AggregateError::AmbiguousMatch` if a bucket holds more than one matching record.
pub fn series_for(
    buckets: &[Bucket],
    category: Category,
    predicate: &Predicate,
) -> Result<Vec<i64>, AggregateError> {
    let mut values = Vec::with_capacity(buckets.len());
    for bucket in buckets {
        let matches: Vec<_> = bucket
            .snapshot
            .section(category)
            .iter()
            .filter(|r| predicate.matches(r))
            .collect();

        match matches.as_slice() {
            [] => values.push(0),
            [record] => values.push(record.balance.amount().unwrap_or_else(|| {
                log::warn!(
                    "Non-numeric balance {:?} for {} at {}; counting as 0",
                    record.balance,
                    predicate,
                    bucket.snapshot.time
                );
                0
            })),
            _ => {
                return Err(AggregateError::AmbiguousMatch {
                    predicate: predicate.to_string(),
                    label: bucket.label.clone(),
                    time: bucket.snapshot.time.clone(),
                    count: matches.len(),
                });
            }
        }
    }
    Ok(values)
}

/// Left-pads `series` with zeros to `len` values.
///
/// # Errors
/// * `AggregateError::SeriesTooLong` if `series` already has more than `len` values.
pub fn align(series: &[i64], len: usize) -> Result<Vec<i64>, AggregateError> {
    if series.len() > len {
        return Err(AggregateError::SeriesTooLong {
            len: series.len(),
            buckets: len,
        });
    }
    let mut aligned = vec![0; len - series.len()];
    aligned.extend_from_slice(series);
    Ok(aligned)
}

/// Aligns every series to `len` values, then adds them element-wise.
pub fn sum_aligned(series: &[Vec<i64>], len: usize) -> Result<Vec<i64>, AggregateError> {
    let mut total = vec![0; len];
    for s in series {
        for (acc, v) in total.iter_mut().zip(align(s, len)?) {
            *acc += v;
        }
    }
    Ok(total)
}

/// Combined series of every part of `account`.
pub fn account_series(buckets: &[Bucket], account: &AccountSpec) -> Result<NamedSeries, AggregateError> {
    let parts = account
        .parts
        .iter()
        .map(|p| series_for(buckets, account.category, p))
        .collect::<Result<Vec<_>, _>>()?;
    let values = sum_aligned(&parts, buckets.len())?;
    log::debug!("{}: {:?}", account.label, values);

    Ok(NamedSeries {
        label: account.label.clone(),
        color: account.color.clone(),
        values,
    })
}

/// Builds per-account series, their total and the bucket labels.
pub fn chart_data(buckets: &[Bucket], accounts: &[AccountSpec]) -> Result<ChartData, AggregateError> {
    let series = accounts
        .iter()
        .map(|a| account_series(buckets, a))
        .collect::<Result<Vec<_>, _>>()?;
    let per_account: Vec<Vec<i64>> = series.iter().map(|s| s.values.clone()).collect();
    let total = sum_aligned(&per_account, buckets.len())?;

    Ok(ChartData {
        labels: buckets.iter().map(|b| b.label.clone()).collect(),
        series,
        total,
    })
}
