mod carparks;
mod malls;

use clap::{Parser, Subcommand};
use jiak_store::MallStore;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "jiak")]
#[command(about = "Find food in Singapore malls")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Nearest mall to a location, with its distance in metres
    Nearest {
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
        #[arg(long, allow_negative_numbers = true)]
        lng: f64,
    },
    /// One mall with its eateries, optionally filtered
    Mall {
        id: String,
        /// Only halal-certified eateries
        #[arg(long)]
        halal_only: bool,
        /// Cuisine to keep ("All" keeps every cuisine)
        #[arg(long)]
        cuisine: Option<String>,
        /// Minimum rating; unrated eateries count as 0
        #[arg(long, default_value_t = 0.0)]
        min_rating: f64,
    },
    /// Look an eatery up by id
    Eatery { id: String },
    /// Mall and eatery names matching a search term
    Search { term: String },
    /// Live carpark availability (needs `DATAMALL_ACCOUNT_KEY`)
    Carparks {
        /// Case-insensitive development name filter
        #[arg(long)]
        development: Option<String>,
    },
    /// Hidden gem and spot of the day
    Featured {
        /// Restrict the spot of the day to one region
        #[arg(long)]
        region: Option<String>,
        /// Seed for reproducible picks
        #[arg(long)]
        seed: Option<u64>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    dotenvy::dotenv().ok();
    let config = jiak_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    // stdout carries the JSON output
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let store = || MallStore::from_app_config(&config);
    match cli.command {
        Commands::Nearest { lat, lng } => malls::run_nearest(&store()?, lat, lng).await,
        Commands::Mall {
            id,
            halal_only,
            cuisine,
            min_rating,
        } => malls::run_mall(&store()?, &id, halal_only, cuisine, min_rating).await,
        Commands::Eatery { id } => malls::run_eatery(&store()?, &id).await,
        Commands::Search { term } => malls::run_search(&store()?, &term).await,
        Commands::Featured { region, seed } => {
            malls::run_featured(&store()?, region.as_deref(), seed).await
        }
        Commands::Carparks { development } => {
            carparks::run_carparks(&config, development.as_deref()).await
        }
    }
}

pub(crate) fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests;
