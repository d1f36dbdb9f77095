mod ephemeris;
mod feed;
mod geocode;
mod store;
mod web;

use chrono::Utc;
use clap::{Parser, Subcommand};
use std::process::ExitCode;

use crate::ephemeris::{convert, format_epoch};
use crate::feed::{refresh_once, FeedClient};
use crate::web::Config;

#[derive(Parser)]
#[command(name = "orbit-tracker")]
#[command(about = "Spacecraft state vector and ground position API")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API
    Serve {
        #[arg(short, long, default_value = "config.yaml")]
        config: String,
    },
    /// Fetch the ephemeris feed once into the configured store
    Fetch {
        #[arg(short, long, default_value = "config.yaml")]
        config: String,
    },
    /// Convert a J2000 position (km) to latitude, longitude and altitude
    Convert {
        #[arg(long, allow_hyphen_values = true)]
        x: f64,
        #[arg(long, allow_hyphen_values = true)]
        y: f64,
        #[arg(long, allow_hyphen_values = true)]
        z: f64,
        /// Epoch such as 2024-001T12:00:00.000Z; defaults to now
        #[arg(long)]
        epoch: Option<String>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { config } => serve(&config).await,
        Commands::Fetch { config } => fetch(&config).await,
        Commands::Convert { x, y, z, epoch } => convert_position([x, y, z], epoch),
    }
}

fn load_config(path: &str) -> Option<Config> {
    match Config::load_or_default(path) {
        Ok(config) => Some(config),
        Err(e) => {
            eprintln!("Error loading config {}: {}", path, e);
            None
        }
    }
}

async fn serve(path: &str) -> ExitCode {
    let Some(config) = load_config(path) else {
        return ExitCode::FAILURE;
    };

    match web::run_server(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Server error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn fetch(path: &str) -> ExitCode {
    let Some(config) = load_config(path) else {
        return ExitCode::FAILURE;
    };

    if !config.store.backend.is_persistent() {
        eprintln!(
            "Refusing to fetch into the {:?} store backend: nothing would outlive this process",
            config.store.backend
        );
        return ExitCode::FAILURE;
    }

    let store = match web::server::open_store(&config.store).await {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error opening store: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let feed = match FeedClient::new(config.feed.url.clone(), config.feed.timeout) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Error creating feed client: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match refresh_once(&feed, store.as_ref()).await {
        Ok(count) => {
            println!("Stored {} state vectors from {}", count, feed.url());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Fetch failed: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn convert_position(position: [f64; 3], epoch: Option<String>) -> ExitCode {
    let epoch = epoch.unwrap_or_else(|| format_epoch(Utc::now()));

    match convert(position, &epoch) {
        Ok(geo) => {
            println!("epoch:     {}", epoch);
            println!("latitude:  {:.6} deg", geo.latitude_deg);
            println!("longitude: {:.6} deg", geo.longitude_deg);
            println!("altitude:  {:.3} km", geo.altitude_km);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Conversion error: {}", e);
            ExitCode::FAILURE
        }
    }
}
