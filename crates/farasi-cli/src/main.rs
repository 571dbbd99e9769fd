use std::path::PathBuf;
use std::process;

use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use farasi::scraper::RacecardScraper;
use farasi::types::RaceCardRequest;
use log::LevelFilter;

#[derive(Parser)]
#[command(name = "farasi")]
#[command(about = "An indiarace.com racecard scraper", long_about = None)]
struct Cli {
    #[arg(
        short = 'l',
        long = "log-level",
        value_enum,
        default_value = "info",
        global = true,
        help = "Set the logging level"
    )]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

#[derive(Debug, Clone, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch racecards for each venue over the coming days and save them as CSV files
    Fetch {
        #[arg(
            long,
            value_delimiter = ',',
            default_value = "1,2,3,4,5,6,7,8,9,10,11,12",
            help = "Venue IDs to pull, comma separated"
        )]
        venues: Vec<u32>,

        #[arg(
            long,
            default_value_t = 5,
            help = "How many days ahead to fetch, starting today"
        )]
        days_ahead: u32,

        #[arg(
            long,
            default_value = "racecards",
            help = "Directory the CSV files are written to"
        )]
        out_dir: PathBuf,
    },
    /// Fetch a single racecard and print it without saving
    Preview {
        #[arg(long, help = "Venue ID")]
        venue: u32,

        #[arg(
            long,
            value_name = "YYYY-MM-DD",
            value_parser = |s: &str| NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| e.to_string()),
            help = "Race date"
        )]
        date: NaiveDate,

        #[arg(
            short = 'o',
            long = "output",
            value_enum,
            default_value = "text",
            help = "Output format"
        )]
        format: OutputFormat,
    },
}

fn serialize_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            log::error!("Error serializing to JSON: {}", e);
            process::exit(1);
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(cli.log_level.clone().into())
        .init();

    let scraper = RacecardScraper::new().unwrap_or_else(|e| {
        log::error!("Error creating scraper: {}", e);
        process::exit(1);
    });

    match cli.command {
        Commands::Fetch {
            venues,
            days_ahead,
            out_dir,
        } => {
            log::info!(
                "Fetching racecards for {} venue(s), {} day(s) ahead...",
                venues.len(),
                days_ahead
            );

            let saved = scraper.fetch_racecards(&venues, days_ahead, &out_dir).await;

            if saved.is_empty() {
                println!("No race cards found.");
            } else {
                for path in &saved {
                    println!("Saved: {}", path.display());
                }
                println!("\n{} file(s) written.", saved.len());
            }
        }

        Commands::Preview {
            venue,
            date,
            format,
        } => {
            let request = RaceCardRequest { venue, date };

            match scraper.fetch_racecard(&request).await {
                Ok(Some(document)) => match format {
                    OutputFormat::Json => serialize_json(&document),
                    OutputFormat::Text => println!("{}", document),
                },
                Ok(None) => println!("No races for venue {} on {}.", venue, date),
                Err(e) => {
                    log::error!("Error fetching racecard: {}", e);
                    process::exit(1);
                }
            }
        }
    }
}
