mod cli;
mod config;
mod csv_processor;
mod error;
mod model;
mod normalize;
mod resample;
mod series;
mod store;
mod utils;

/// Main entry point of the application.
///
/// One run:
/// 1. Parses command-line arguments and the account table.
/// 2. If an input directory is given, builds a snapshot from it and appends it to history.
/// 3. Buckets the history and writes the bucketed side file.
/// 4. Builds per-account and total series and writes or prints them.
///
/// Runs must not overlap: history is rewritten in full on every append.
fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    let total_start = std::time::Instant::now();
    let args = cli::Args::parse();
    println!("Start aggregation...");

    let accounts = config::load_accounts(args.accounts.as_deref())?;

    let history = match &args.input {
        Some(dir) => {
            let snapshot = csv_processor::build_snapshot(dir, utils::snapshot_time_now())?;
            println!("📥 Captured snapshot {}", snapshot.time);
            let existing = store::load_history(&args.history)?;
            let history = store::append_snapshot(existing, snapshot);
            store::save_history(&args.history, &history)?;
            history
        }
        None => store::load_history(&args.history)?.unwrap_or_else(|| {
            log::warn!("No history at {}", args.history.display());
            Vec::new()
        }),
    };
    println!("🗂️ History holds {} snapshot(s)", history.len());

    let buckets = resample::resample(&history, args.policy, utils::today())?;
    store::save_buckets(&args.buckets, &buckets)?;
    println!("📈 Bucketed into {} point(s) ({:?})", buckets.len(), args.policy);

    let chart = series::chart_data(&buckets, &accounts)?;
    match &args.output {
        Some(path) => {
            store::write_json(path, &chart)?;
            println!("📤 Wrote {} series to {}", chart.series.len(), path.display());
        }
        None => utils::print_series(&chart),
    }

    println!(
        "✅ Aggregation completed in {:?} seconds",
        total_start.elapsed().as_secs_f64()
    );
    Ok(())
}
