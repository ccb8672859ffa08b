//! Cart Keeper CLI - Manage a persisted shopping cart from the terminal.
//!
//! # Usage
//!
//! ```bash
//! # Add a product (price in cents)
//! cart-cli add --id p1 --name Widget --price 500
//!
//! # Change a quantity, or remove a line
//! cart-cli set p1 3
//! cart-cli remove p1
//!
//! # Inspect the cart
//! cart-cli show
//! cart-cli total
//!
//! # Start over when the stored cart is unreadable
//! cart-cli --reset-corrupt show
//! ```
//!
//! # Commands
//!
//! - `add` - Add one unit of a product
//! - `remove` - Remove a product's line
//! - `set` - Set a product's quantity
//! - `show` - List lines, item count and total
//! - `total` - Print the cart total
//! - `clear` - Empty the cart

#![cfg_attr(not(test), forbid(unsafe_code))]

use cartkeeper_core::CorruptStatePolicy;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod config;

use config::{CliConfig, LogFormat};

#[derive(Parser)]
#[command(name = "cart-cli")]
#[command(author, version, about = "Cart Keeper CLI tools")]
struct Cli {
    /// Discard a corrupt stored cart instead of failing
    #[arg(long, global = true)]
    reset_corrupt: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add one unit of a product
    Add {
        /// Product id
        #[arg(short, long)]
        id: String,

        /// Product display name
        #[arg(short, long)]
        name: String,

        /// Unit price in cents
        #[arg(short, long)]
        price: u64,
    },
    /// Remove a product's line
    Remove {
        /// Product id
        id: String,
    },
    /// Set a product's quantity (0 removes the line)
    Set {
        /// Product id
        id: String,

        /// New quantity
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Show every line, the item count and the total
    Show,
    /// Show the cart total
    Total,
    /// Empty the cart
    Clear,
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

fn main() {
    let cli = Cli::parse();

    let config = match CliConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            // Tracing is not configured yet; fall back to the default subscriber.
            tracing_subscriber::fmt::init();
            tracing::error!("Configuration error: {e}");
            std::process::exit(1);
        }
    };
    init_tracing(config.log_format);

    if let Err(e) = run(cli, &config) {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli, config: &CliConfig) -> Result<(), Box<dyn std::error::Error>> {
    let policy = if cli.reset_corrupt {
        CorruptStatePolicy::Reset
    } else {
        CorruptStatePolicy::Surface
    };

    tracing::debug!(
        path = %config.storage_path.display(),
        key = %config.storage_key,
        "Opening cart"
    );
    let mut session = commands::cart::open_session(config, policy)?;

    match cli.command {
        Commands::Add { id, name, price } => {
            commands::cart::add(&mut session, &id, &name, price)?;
        }
        Commands::Remove { id } => commands::cart::remove(&mut session, &id)?,
        Commands::Set { id, quantity } => commands::cart::set(&mut session, &id, quantity)?,
        Commands::Show => commands::cart::show(&session),
        Commands::Total => commands::cart::total(&session),
        Commands::Clear => commands::cart::clear(&mut session)?,
    }
    Ok(())
}
