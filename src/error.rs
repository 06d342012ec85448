/// Data-shape failures raised by the aggregation core.
///
/// These are never retried: each one means the history or the account table
/// does not look the way the aggregation expects.
#[derive(Debug, thiserror::Error)]
pub enum AggregateError {
    #[error("invalid snapshot time {time:?}: expected YYYY/MM/DD HH:mm:ss.SSS")]
    InvalidTime { time: String },

    #[error("predicate {predicate} matched {count} records in bucket {label:?} ({time})")]
    AmbiguousMatch {
        predicate: String,
        label: String,
        time: String,
        count: usize,
    },

    #[error("series of length {len} does not fit into {buckets} buckets")]
    SeriesTooLong { len: usize, buckets: usize },
}
