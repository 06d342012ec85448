use crate::resample::BucketPolicy;

/// Structure representing command-line arguments.
#[derive(Debug)]
pub struct Args {
    pub history: std::path::PathBuf,
    pub buckets: std::path::PathBuf,
    pub input: Option<std::path::PathBuf>,
    pub accounts: Option<std::path::PathBuf>,
    pub policy: BucketPolicy,
    pub output: Option<std::path::PathBuf>,
}

impl Args {
    /// Parses command-line arguments using `clap`.
    ///
    /// # Returns
    /// * `Args` - Struct containing parsed arguments.
    pub fn parse() -> Self {
        Self::from_matches(command().get_matches())
    }

    fn from_matches(matches: clap::ArgMatches) -> Self {
        let path = |id: &str| matches.get_one::<String>(id).map(std::path::PathBuf::from);
        Args {
            history: path("history").unwrap_or_else(|| DEFAULT_HISTORY.into()),
            buckets: path("buckets").unwrap_or_else(|| DEFAULT_BUCKETS.into()),
            input: path("input"),
            accounts: path("accounts"),
            policy: matches
                .get_one::<BucketPolicy>("policy")
                .copied()
                .unwrap_or(BucketPolicy::Monthly),
            output: path("output"),
        }
    }
}

const DEFAULT_HISTORY: &str = "portfolio.json";
const DEFAULT_BUCKETS: &str = "portfolio_buckets.json";

fn command() -> clap::Command {
    clap::Command::new("portfolio_snapshot")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Append a scraped portfolio snapshot to history and build balance series")
        .arg(
            clap::Arg::new("history")
                .short('H')
                .long("history")
                .help("Path to the snapshot history JSON")
                .default_value(DEFAULT_HISTORY)
                .num_args(1),
        )
        .arg(
            clap::Arg::new("buckets")
                .short('b')
                .long("buckets")
                .help("Path to write the bucketed history JSON")
                .default_value(DEFAULT_BUCKETS)
                .num_args(1),
        )
        .arg(
            clap::Arg::new("input")
                .short('i')
                .long("input")
                .help("Directory with scraped section tables; when given, a new snapshot is appended")
                .num_args(1),
        )
        .arg(
            clap::Arg::new("accounts")
                .short('a')
                .long("accounts")
                .help("Account table JSON (default: built-in table)")
                .num_args(1),
        )
        .arg(
            clap::Arg::new("policy")
                .short('p')
                .long("policy")
                .help("Bucketing policy. Available: daily, monthly")
                .value_parser(parse_policy)
                .default_value("monthly")
                .num_args(1),
        )
        .arg(
            clap::Arg::new("output")
                .short('o')
                .long("output")
                .help("Write chart series JSON here instead of printing them")
                .num_args(1),
        )
}

fn parse_policy(s: &str) -> Result<BucketPolicy, String> {
    s.parse()
}
