//! # DBF Board
//!
//! A command-line departure board for German railway stations, fed by the
//! DBF (`dbf.finalrewind.org`) JSON API.
//!
//! The board polls the API on a fixed cadence, retries faster while it has
//! never loaded, filters the departures (excluded destinations, via stations,
//! result count) and redraws the table after every poll.

use std::path::PathBuf;

use clap::Parser;
use dotenvy::dotenv;
use tokio::signal;
use tracing::{error, info};

mod config;
mod constants;
mod departure;
mod departure_board;
mod error;
mod logging;
mod render;
mod scheduler;
mod service;

use config::Config;
use error::AppError;
use render::TerminalRenderer;
use scheduler::Scheduler;
use service::HttpSource;

/// Command-line arguments. Anything given here overrides the config file.
#[derive(Parser, Debug)]
#[command(
    name = "dbf_board",
    version,
    about = "A CLI departure board for DBF stations.",
    long_about = None
)]
struct Cli {
    /// Station name, e.g. "Essen Hbf".
    station: Option<String>,

    /// JSON config file using the board option names (`numberOfResults`, ...).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Only show these platforms (comma-separated).
    #[arg(short, long)]
    platform: Option<String>,

    /// Only show trains running via one of these stations (comma-separated).
    #[arg(long)]
    via: Option<String>,

    /// Maximum number of departures to show.
    #[arg(short, long)]
    num_results: Option<usize>,

    /// Hide trains to this destination. Can be repeated.
    #[arg(long = "without-destination", value_name = "DESTINATION")]
    without_destination: Vec<String>,

    /// Print the board page URL instead of a table.
    #[arg(long)]
    show_app: bool,

    /// Request arrival details from the API.
    #[arg(long)]
    show_arrival_time: bool,

    /// Request realtime data from the API.
    #[arg(long)]
    show_real_time: bool,

    /// Show scheduled arrival instead of scheduled departure.
    #[arg(long)]
    only_arrival_time: bool,

    /// Log level used when RUST_LOG is not set.
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl Cli {
    /// Resolves the session configuration: defaults, then file, then flags.
    fn into_config(self) -> Result<Config, AppError> {
        let mut config = match &self.config {
            Some(path) => Config::from_file(path)?,
            None => Config::default(),
        };

        if let Some(station) = self.station {
            config.station = station;
        }
        if let Some(platform) = self.platform {
            config.platform = platform;
        }
        if let Some(via) = self.via {
            config.via = via;
        }
        if let Some(num_results) = self.num_results {
            config.number_of_results = num_results;
        }
        if !self.without_destination.is_empty() {
            config.without_destination = self.without_destination;
        }
        config.show_app |= self.show_app;
        config.show_arrival_time |= self.show_arrival_time;
        config.show_real_time |= self.show_real_time;
        config.only_arrival_time |= self.only_arrival_time;

        Ok(config)
    }
}

/// The main entry point for the application.
///
/// Loads `.env`, parses the command line, resolves the configuration and
/// runs the poll scheduler until Ctrl+C or until the API rejects the
/// request as unauthorized.
#[tokio::main]
async fn main() -> Result<(), AppError> {
    // Load environment variables from a .env file, if it exists.
    let _ = dotenv();

    let cli = Cli::parse();
    logging::init_logging(&cli.log_level);

    let config = cli.into_config()?;
    let base_url = constants::base_url()?;
    let board_url = service::url::board_url(base_url, &config);
    let source = HttpSource::new(service::url::api_url(base_url, &config));

    info!(station = %config.station, url = source.url(), "starting departure board");

    let renderer = TerminalRenderer::new(config.clone(), board_url);
    let mut scheduler = Scheduler::new(source, renderer, &config);

    let halted = tokio::select! {
        // Listen for the Ctrl+C signal.
        _ = signal::ctrl_c() => None,
        err = scheduler.run() => Some(err),
    };

    if let Some(err) = halted {
        error!(
            error = %err,
            state = ?scheduler.state(),
            loaded = scheduler.is_loaded(),
            "departure board halted"
        );
        return Err(err.into());
    }

    info!(state = ?scheduler.state(), loaded = scheduler.is_loaded(), "exiting");
    println!("\nExiting...");

    Ok(())
}
