//! RocketShoes CLI - Drive the cart from a terminal.
//!
//! # Usage
//!
//! ```bash
//! # Show the cart
//! rs-cart show
//!
//! # Add one unit of product 3
//! rs-cart add 3
//!
//! # Set product 3 to 2 units
//! rs-cart set 3 2
//!
//! # Remove product 3
//! rs-cart remove 3
//! ```
//!
//! Configuration comes from the environment (see `rocketshoes_cart::config`).

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use rocketshoes_cart::{AddStockGuard, CartConfig};
use rocketshoes_core::ProductId;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "rs-cart")]
#[command(author, version, about = "RocketShoes cart tools")]
struct Cli {
    /// Override `CART_ADD_STOCK_GUARD` (`legacy` or `available`)
    #[arg(long, global = true)]
    stock_guard: Option<AddStockGuard>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the cart
    Show {
        /// Print the persisted JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Add one unit of a product
    Add {
        /// Catalog product ID
        product_id: ProductId,
    },
    /// Remove a product from the cart
    Remove {
        /// Catalog product ID
        product_id: ProductId,
    },
    /// Set the quantity of a product already in the cart
    Set {
        /// Catalog product ID
        product_id: ProductId,
        /// New quantity
        #[arg(allow_negative_numbers = true)]
        amount: i64,
    },
}

#[tokio::main]
async fn main() {
    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "rocketshoes_cart=info,rs_cart=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CliError> {
    let mut config = CartConfig::from_env()?;
    if let Some(guard) = cli.stock_guard {
        config.add_stock_guard = guard;
    }

    let mut store = commands::open_store(&config)?;

    match cli.command {
        Commands::Show { json } => commands::show(&store, json)?,
        Commands::Add { product_id } => commands::add(&mut store, product_id).await?,
        Commands::Remove { product_id } => commands::remove(&mut store, product_id)?,
        Commands::Set { product_id, amount } => {
            commands::set(&mut store, product_id, amount).await?;
        }
    }
    Ok(())
}
