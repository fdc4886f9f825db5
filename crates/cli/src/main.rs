//! Souq CLI - database migrations, seeding and offline price checks.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! souq-cli migrate
//!
//! # Load shipping zones from YAML (upsert by wilaya)
//! souq-cli seed shipping zones.yaml
//!
//! # Price a product exported from the admin API
//! souq-cli quote --product burnous.json --quantity 2 --wilaya Oran --home
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `seed shipping` - Seed shipping zones
//! - `quote` - Offline price check

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

use commands::quote::QuoteArgs;

#[derive(Parser)]
#[command(name = "souq-cli")]
#[command(author, version, about = "Souq CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Seed reference data
    Seed {
        #[command(subcommand)]
        target: SeedTarget,
    },
    /// Price a product offline with the checkout rules
    Quote {
        /// Product JSON as returned by the admin API
        #[arg(short, long)]
        product: String,

        /// Number of units
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,

        /// Selected size
        #[arg(long)]
        size: Option<String>,

        /// Selected colour
        #[arg(long)]
        color: Option<String>,

        /// Custom option selection as `group=value` (repeatable)
        #[arg(short, long = "option")]
        options: Vec<String>,

        /// Shipping zones YAML (same format as `seed shipping`)
        #[arg(short, long)]
        shipping: Option<String>,

        /// Destination wilaya
        #[arg(short, long)]
        wilaya: Option<String>,

        /// Deliver to the customer's door instead of the carrier office
        #[arg(long)]
        home: bool,
    },
}

#[derive(Subcommand)]
enum SeedTarget {
    /// Upsert shipping zones from a YAML file
    Shipping {
        /// Path to the YAML file
        file: String,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CommandError> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await,
        Commands::Seed { target } => match target {
            SeedTarget::Shipping { file } => commands::seed::shipping(&file).await,
        },
        Commands::Quote {
            product,
            quantity,
            size,
            color,
            options,
            shipping,
            wilaya,
            home,
        } => {
            commands::quote::run(QuoteArgs {
                product,
                quantity,
                size,
                color,
                options,
                shipping,
                wilaya,
                home,
            })
            .await
        }
    }
}
