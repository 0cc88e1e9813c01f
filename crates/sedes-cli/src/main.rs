mod facilities;
mod routes;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "sedes-cli")]
#[command(about = "Find the nearest facility and how to get there")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List the facility collection
    Facilities {
        /// Print the raw snapshot as JSON
        #[arg(long)]
        json: bool,
    },
    /// Rank the facilities closest to a point
    Nearest {
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
        #[arg(long, allow_negative_numbers = true)]
        lng: f64,
        /// Number of candidates (defaults to SEDES_NEAREST_COUNT)
        #[arg(long)]
        count: Option<usize>,
    },
    /// Estimate travel between two points for every mode
    Routes {
        #[arg(long, allow_negative_numbers = true)]
        from_lat: f64,
        #[arg(long, allow_negative_numbers = true)]
        from_lng: f64,
        #[arg(long, allow_negative_numbers = true)]
        to_lat: f64,
        #[arg(long, allow_negative_numbers = true)]
        to_lng: f64,
        /// Comma-separated modes (driving, walking, cycling); all when omitted
        #[arg(long)]
        modes: Option<String>,
    },
    /// Geocode an address, pick the nearest facility and resolve its routes
    Locate {
        /// Free-text address within the service area
        address: String,
        /// Number of candidates to rank
        #[arg(long)]
        count: Option<usize>,
        /// Facility ID to select instead of the nearest one
        #[arg(long)]
        pick: Option<i64>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = sedes_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Some(Commands::Facilities { json }) => facilities::run_facilities(&config, json).await?,
        Some(Commands::Nearest { lat, lng, count }) => {
            facilities::run_nearest(&config, lat, lng, count).await?;
        }
        Some(Commands::Routes {
            from_lat,
            from_lng,
            to_lat,
            to_lng,
            modes,
        }) => {
            routes::run_routes(
                &config,
                (from_lat, from_lng),
                (to_lat, to_lng),
                modes.as_deref(),
            )
            .await?;
        }
        Some(Commands::Locate {
            address,
            count,
            pick,
        }) => routes::run_locate(&config, &address, count, pick).await?,
        None => println!("sedes-cli: run with --help to list commands"),
    }

    Ok(())
}

#[cfg(test)]
mod tests;
