use crate::coingecko;

/// Structure representing command-line arguments.
#[derive(Debug)]
pub struct Args {
    pub start: Option<String>,
    pub end: Option<String>,
    pub input: Option<std::path::PathBuf>,
    pub currency: String,
    pub api_url: String,
    pub threads: Option<usize>,
    pub json: bool,
    pub verbose: bool,
}

/// Builds the clap command definition.
///
/// Either a date range (`--start` and `--end`) or a saved payload (`--input`)
/// must be supplied.
pub fn command() -> clap::Command {
    clap::Command::new("btc-trend")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Bearish streak, peak volume and volume-capped best trade for bitcoin")
        .arg(
            clap::Arg::new("start")
                .short('s')
                .long("start")
                .help("Start date of the search range (YYYY-MM-DD or DD-MM-YYYY)")
                .required_unless_present("input")
                .requires("end")
                .num_args(1),
        )
        .arg(
            clap::Arg::new("end")
                .short('e')
                .long("end")
                .help("End date of the search range (YYYY-MM-DD or DD-MM-YYYY)")
                .required_unless_present("input")
                .requires("start")
                .num_args(1),
        )
        .arg(
            clap::Arg::new("input")
                .short('i')
                .long("input")
                .help("Analyse a saved .json or .csv payload instead of querying the API")
                .conflicts_with_all(["start", "end"])
                .value_parser(clap::value_parser!(std::path::PathBuf))
                .num_args(1),
        )
        .arg(
            clap::Arg::new("currency")
                .long("currency")
                .help("Quote currency of prices and volumes")
                .default_value("eur")
                .num_args(1),
        )
        .arg(
            clap::Arg::new("api-url")
                .long("api-url")
                .help("Base URL of the price history API")
                .env("BTC_TREND_API_URL")
                .default_value(coingecko::COINGECKO_BASE)
                .num_args(1),
        )
        .arg(
            clap::Arg::new("threads")
                .short('t')
                .long("threads")
                .help("Number of threads for the trade scan (default: all available)")
                .num_args(1)
                .value_parser(clap::builder::ValueParser::new(parse_usize_positive)),
        )
        .arg(
            clap::Arg::new("json")
                .long("json")
                .help("Print the report as JSON")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            clap::Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable debug logging on stderr")
                .action(clap::ArgAction::SetTrue),
        )
}

impl Args {
    /// Parses command-line arguments using `clap`.
    ///
    /// # Returns
    /// * `Args` - Struct containing parsed arguments.
    ///
    /// # Errors
    /// * Exits with a usage message if required arguments are missing or invalid.
    pub fn parse() -> Self {
        Self::from_matches(&command().get_matches())
    }

    /// Like `parse`, but over an explicit argument list.
    pub fn try_parse_from<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let matches = command().try_get_matches_from(args)?;
        Ok(Self::from_matches(&matches))
    }

    fn from_matches(matches: &clap::ArgMatches) -> Self {
        Args {
            start: matches.get_one::<String>("start").cloned(),
            end: matches.get_one::<String>("end").cloned(),
            input: matches.get_one::<std::path::PathBuf>("input").cloned(),
            currency: matches
                .get_one::<String>("currency")
                .cloned()
                .unwrap_or_else(|| "eur".to_string()),
            api_url: matches
                .get_one::<String>("api-url")
                .cloned()
                .unwrap_or_else(|| coingecko::COINGECKO_BASE.to_string()),
            threads: matches.get_one::<usize>("threads").cloned(),
            json: matches.get_flag("json"),
            verbose: matches.get_flag("verbose"),
        }
    }
}

/// Validates that the number of threads is a positive integer.
///
/// # Arguments
/// * `s` - String representation of the number of threads.
///
/// # Returns
/// * `Result<usize>` - Validated number of threads.
fn parse_usize_positive(s: &str) -> Result<usize, String> {
    match s.parse::<usize>() {
        Ok(0) => Err("Must be a positive integer".to_string()),
        Ok(n) => Ok(n),
        Err(e) => Err(format!("Not a valid number: {}", e)),
    }
}
