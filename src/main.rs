use btc_trend::analysis;
use btc_trend::cli;
use btc_trend::coingecko;
use btc_trend::error::QueryError;
use btc_trend::file_processing;
use btc_trend::progress;
use btc_trend::query;
use btc_trend::report;
use btc_trend::utils;

/// Sends `tracing` output to stderr so stdout only carries the report.
fn init_logging(verbose: bool) {
    let default = if verbose { "info,btc_trend=debug" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Produces the analysis from either a saved payload or a range query.
fn run(args: &cli::Args) -> anyhow::Result<analysis::Analysis> {
    if let Some(input) = &args.input {
        let raw = file_processing::load_raw_series(input)?;
        return analysis::analyze(&raw);
    }

    let (Some(start), Some(end)) = (&args.start, &args.end) else {
        return Err(anyhow::anyhow!("Either --input or both --start and --end are required"));
    };
    let range = query::validate_range(start, end, chrono::Utc::now())?;
    let client = coingecko::CoinGeckoClient::new(&args.api_url, &args.currency)?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    let analysis = runtime.block_on(progress::with_spinner(
        "Fetching bitcoin price history...",
        query::run_query(&client, &range),
    ))?;
    anyhow::Ok(analysis)
}

/// Main entry point of the application.
///
/// This function orchestrates the entire workflow:
/// 1. Parses command-line arguments and sets up logging.
/// 2. Determines the number of threads to use for the trade scan.
/// 3. Loads or fetches the raw series and analyses it.
/// 4. Prints the report as text or JSON.
///
/// # Returns
///
/// * `anyhow::Result<()>` - Success or an error if any step fails.
fn main() -> anyhow::Result<()> {
    let total_start = std::time::Instant::now();
    let args = cli::Args::parse();
    init_logging(args.verbose);

    let effective_threads = match args.threads {
        Some(n) => {
            let max_threads = num_cpus::get();
            if n > max_threads {
                tracing::warn!("Limiting thread count to {} (max available)", max_threads);
                max_threads
            } else { n }
        }
        None => rayon::current_num_threads(),
    };
    tracing::debug!("Using {} thread(s)", effective_threads);

    let result = if args.threads.is_some() {
        let local_pool = utils::configure_thread_pool(effective_threads)?;
        local_pool.install(|| run(&args))
    } else {
        run(&args)
    };

    let analysis = match result {
        Ok(analysis) => analysis,
        Err(err) => match err.downcast_ref::<QueryError>() {
            Some(query_err) => {
                eprintln!("Error: {}", query_err);
                std::process::exit(if query_err.is_validation() { 2 } else { 1 });
            }
            None => return Err(err),
        },
    };

    let report = report::Report::from_analysis(&analysis, &args.currency)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Recommendation:");
        for line in report.lines() {
            println!("{}", line);
        }
    }

    tracing::debug!(
        "Completed in {:?} seconds",
        total_start.elapsed().as_secs_f64()
    );
    Ok(())
}
