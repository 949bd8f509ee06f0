//! Stockroom CLI - storefront and inventory manager.
//!
//! # Usage
//!
//! ```bash
//! # Browse and buy
//! stockroom products list --category Kitchen
//! stockroom cart add 3 2
//! stockroom cart show
//! stockroom checkout
//!
//! # Manage inventory and orders
//! stockroom view-mode manager
//! stockroom dashboard
//! stockroom products set-quantity 3 40
//! stockroom orders status 1 processing
//!
//! # Apply database migrations (postgres backend)
//! stockroom migrate
//! ```
//!
//! # Commands
//!
//! - `products` - Browse and edit the catalog
//! - `cart` - Inspect and change the cart
//! - `checkout` - Place an order for the cart
//! - `orders` - Browse orders and move them through their lifecycle
//! - `dashboard` - Inventory and order summary
//! - `view-mode` - Switch between customer and manager view
//! - `migrate` - Run database migrations

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use stockroom_core::ViewMode;
use stockroom_storefront::StockroomConfig;

mod commands;
mod error;
mod output;
mod workspace;

use commands::cart::CartAction;
use commands::orders::OrderAction;
use commands::products::ProductAction;
use error::CommandError;
use output::Output;
use workspace::Workspace;

#[derive(Parser)]
#[command(name = "stockroom")]
#[command(author, version, about = "Stockroom storefront and inventory manager")]
struct Cli {
    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse and edit the catalog
    Products {
        #[command(subcommand)]
        action: ProductAction,
    },
    /// Inspect and change the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Place an order for everything in the cart
    Checkout,
    /// Browse and manage orders
    Orders {
        #[command(subcommand)]
        action: OrderAction,
    },
    /// Inventory and order summary (manager)
    Dashboard,
    /// Show or switch the view mode (`customer` or `manager`)
    ViewMode { mode: Option<ViewMode> },
    /// Run database migrations
    Migrate,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "stockroom=info,stockroom_storefront=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::debug!(error = ?e, "Command error detail");
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), CommandError> {
    let config = StockroomConfig::from_env()?;
    let out = Output::new(cli.json);

    if matches!(cli.command, Commands::Migrate) {
        return commands::migrate::run(&config).await;
    }

    let ws = Workspace::open(&config).await?;
    match cli.command {
        Commands::Products { action } => commands::products::run(&ws, out, action).await?,
        Commands::Cart { action } => commands::cart::run(&ws, out, action).await?,
        Commands::Checkout => commands::cart::checkout(&ws, out).await?,
        Commands::Orders { action } => commands::orders::run(&ws, out, action).await?,
        Commands::Dashboard => commands::dashboard::run(&ws, out).await?,
        Commands::ViewMode { mode } => commands::view_mode::run(&ws, out, mode)?,
        Commands::Migrate => {}
    }
    ws.save().await
}
