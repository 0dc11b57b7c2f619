// Engine command line entry point
use clap::{Parser, Subcommand};
use engine::analysis::{AnalysisRequest, Analyzer};
use engine::config::settings::AnalysisSettings;
use engine::data::csv_parser::CandleCsvParser;
use engine::error::EngineError;
use engine::indicators::{describe, standard_calculators};
use shared::models::Timeframe;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Technical analysis engine", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyse a candle CSV file and print the result as JSON
    Analyze {
        /// CSV file with a time,open,high,low,close[,volume] header
        #[arg(long)]
        csv: PathBuf,

        /// Symbol the candles belong to (drives decimals and pip size)
        #[arg(short, long)]
        symbol: String,

        /// Timeframe to analyse (5M, 15M, 1H, 4H, 1D, 1W)
        #[arg(short, long, default_value = "1H")]
        timeframe: String,

        /// Resolution of the CSV candles when finer than --timeframe
        #[arg(long)]
        source_timeframe: Option<String>,

        /// JSON file overriding analysis settings
        #[arg(long)]
        settings: Option<PathBuf>,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,

        /// Print the full indicator series instead of the analysis
        #[arg(long)]
        dump_indicators: bool,
    },
}

fn main() -> Result<(), EngineError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Analyze { csv, symbol, timeframe, source_timeframe, settings, pretty, dump_indicators } => {
            let settings = match settings {
                Some(path) => AnalysisSettings::load_from_file(path)?,
                None => AnalysisSettings::default(),
            };
            let source_timeframe = source_timeframe
                .map(|label| {
                    Timeframe::from_str(&label).map_err(|e| EngineError::InvalidRequest(e.to_string()))
                })
                .transpose()?;

            let candles = CandleCsvParser::load_candles_from_csv(&csv)?;
            info!(file = %csv.display(), bars = candles.len(), "Loaded candles");

            let mut request = AnalysisRequest::new(symbol, timeframe, candles);
            request.source_timeframe = source_timeframe;
            let analyzer = Analyzer::new(settings);

            let output = if dump_indicators {
                let timeframe = Timeframe::from_str(&request.timeframe).ok();
                let candles = analyzer.prepare_candles(&request, timeframe);
                let series = describe(&standard_calculators(analyzer.settings()), &candles);
                to_json(&series, pretty)?
            } else {
                to_json(&analyzer.analyze(&request), pretty)?
            };
            println!("{}", output);
        }
    }
    Ok(())
}

fn to_json<T: serde::Serialize>(value: &T, pretty: bool) -> Result<String, EngineError> {
    let json = if pretty { serde_json::to_string_pretty(value)? } else { serde_json::to_string(value)? };
    Ok(json)
}
