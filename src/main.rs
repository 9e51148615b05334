//! CLI entry point for the bike route viewer.
//!
//! Loads the monthly trip snapshot once, then answers one command: list the
//! selectable stations, summarise the dataset, show a route between two
//! stations, or dump the synthetic coordinate table.

use anyhow::{Result, bail};
use bike_route_viewer::{
    catalog::SelectionOptions,
    config::ViewerConfig,
    output::{
        ResultRecord, ResultReport, append_record, print_json, print_pretty, render_hourly,
        render_route, render_stats,
    },
    query::{AxisPolicy, Query, compute_result},
    stations::StationCoordinates,
    trips::TripTable,
    weekday::{parse_weekday, weekday_name},
};
use chrono::{NaiveDate, Weekday};
use clap::{Parser, Subcommand};
use std::collections::BTreeMap;
use std::ffi::OsStr;
use std::path::Path;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

/// The monthly snapshot the viewer reads.
const DATASET_PATH: &str = "2021-04.csv";

#[derive(Parser)]
#[command(name = "bike_route_viewer")]
#[command(about = "Explore bike-share trips between two stations", long_about = None)]
struct Cli {
    /// Optional JSON config file
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List departure and return station names
    Stations {
        /// Print all selection options as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Summarise the loaded dataset
    Summary,
    /// Show trip stats, the route and the hourly chart for a station pair
    Route {
        /// Departure station (defaults to the first one)
        #[arg(long)]
        from: Option<String>,

        /// Return station (defaults to the first one)
        #[arg(long)]
        to: Option<String>,

        /// First day included, YYYY-MM-DD (defaults to the first day in the data)
        #[arg(long)]
        start: Option<NaiveDate>,

        /// Last day included, YYYY-MM-DD (defaults to the last day in the data)
        #[arg(long)]
        end: Option<NaiveDate>,

        /// Weekday to include; repeat for several (defaults to all)
        #[arg(short, long = "weekday", value_parser = parse_weekday_arg)]
        weekdays: Vec<Weekday>,

        /// Hour of day for the hourly chart
        #[arg(long, default_value_t = 0, value_parser = clap::value_parser!(u32).range(0..=23))]
        hour: u32,

        /// Only chart weekdays that have trips
        #[arg(long, default_value_t = false)]
        non_zero: bool,

        /// Print the result as JSON
        #[arg(long, default_value_t = false)]
        json: bool,

        /// CSV file to append the result to
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Print synthetic station coordinates as JSON
    Coords {
        /// Only print this station
        #[arg(long)]
        station: Option<String>,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    let _log_guard = init_logging()?;

    let cli = Cli::parse();
    let config = ViewerConfig::load_or_default(cli.config.as_deref())?;

    let table = TripTable::load(DATASET_PATH)?;
    let coordinates = StationCoordinates::from_table(&table, &config.coordinates);
    info!(stations = coordinates.len(), "Viewer ready");

    match cli.command {
        Commands::Stations { json } => {
            let options = SelectionOptions::from_table(&table);
            if json {
                print_json(&options)?;
            } else {
                println!("Departure stations ({}):", options.departure_stations.len());
                for name in &options.departure_stations {
                    println!("  {}", name);
                }
                println!("Return stations ({}):", options.return_stations.len());
                for name in &options.return_stations {
                    println!("  {}", name);
                }
            }
        }
        Commands::Summary => {
            let options = SelectionOptions::from_table(&table);
            println!("Trips: {}", table.len());
            println!("Unparsable departures: {}", table.unparsable_departures());
            match (options.first_date, options.last_date) {
                (Some(first), Some(last)) => println!("Dates: {} to {}", first, last),
                _ => println!("Dates: none"),
            }
            let days: Vec<_> = options.weekdays.iter().map(|d| weekday_name(*d)).collect();
            println!("Weekdays: {}", days.join(", "));
            println!(
                "Stations: {} departure, {} return, {} total",
                options.departure_stations.len(),
                options.return_stations.len(),
                coordinates.len()
            );
        }
        Commands::Route {
            from,
            to,
            start,
            end,
            weekdays,
            hour,
            non_zero,
            json,
            output,
        } => {
            let Some(defaults) = SelectionOptions::from_table(&table).default_query() else {
                bail!("dataset has no stations with a parsable departure");
            };

            let query = Query {
                departure_station: from.unwrap_or(defaults.departure_station),
                return_station: to.unwrap_or(defaults.return_station),
                start: start.unwrap_or(defaults.start),
                end: end.unwrap_or(defaults.end),
                weekdays: if weekdays.is_empty() {
                    defaults.weekdays
                } else {
                    weekdays.into_iter().collect()
                },
                hour,
            };
            print_pretty(&query);

            let policy = if non_zero {
                AxisPolicy::NonZero
            } else {
                config.axis_policy()
            };

            let result = compute_result(&table, &coordinates, &query);
            info!(trip_count = result.summary.trip_count, "Route computed");

            if json {
                print_json(&ResultReport::new(&result, policy))?;
            } else {
                println!("{}\n", render_stats(&result.summary));
                println!("{}\n", render_route(&result.route));
                println!(
                    "{}",
                    render_hourly(&result.hourly, result.summary.trip_count, policy)
                );
            }

            if let Some(path) = output {
                append_record(&path, &ResultRecord::new(&query, &result))?;
                info!(path = %path, "Result appended");
            }
        }
        Commands::Coords { station } => match station {
            Some(name) => {
                let Some(coordinate) = coordinates.get(&name) else {
                    bail!("unknown station {:?}", name);
                };
                print_json(&BTreeMap::from([(name, coordinate)]))?;
            }
            None => print_json(&coordinates)?,
        },
    }

    Ok(())
}

fn parse_weekday_arg(value: &str) -> Result<Weekday, String> {
    parse_weekday(value).ok_or_else(|| format!("not a weekday: {}", value))
}

/// Colored stderr logging plus a daily rolling JSON log file.
///
/// The returned guard flushes the file writer when dropped.
fn init_logging() -> Result<WorkerGuard> {
    let log_file_path = std::env::var("LOG_FILE_PATH")
        .unwrap_or_else(|_| "logs/bike_route_viewer.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("bike_route_viewer.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    Ok(guard)
}
