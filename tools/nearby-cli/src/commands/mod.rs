//! CLI command implementations.

pub mod config;
pub mod flow;
pub mod product;
pub mod search;
pub mod stores;

use clap::{Args, Subcommand};
use nearby_commerce::search::ALL_CATEGORIES;

/// Arguments for the search command.
#[derive(Args)]
pub struct SearchArgs {
    /// Text to match against name, brand, and category. Popular products are shown when omitted.
    pub text: Option<String>,

    /// Only keep products in this category.
    #[arg(short, long)]
    pub category: Option<String>,
}

/// Arguments for the product command.
#[derive(Args)]
pub struct ProductArgs {
    /// Product ID.
    pub id: String,
}

/// Arguments for the stores command.
#[derive(Args)]
pub struct StoresArgs {
    /// Store category, or "All".
    #[arg(default_value = ALL_CATEGORIES)]
    pub category: String,

    /// Maximum number of stores (default: simulation.nearby_limit).
    #[arg(short, long)]
    pub limit: Option<usize>,
}

/// Arguments for the flow command.
#[derive(Args)]
pub struct FlowArgs {
    /// Product ID.
    #[arg(short, long)]
    pub product: String,

    /// Color ID (default: first available color).
    #[arg(short, long)]
    pub color: Option<String>,

    /// Store to message. Repeat for a second store; later picks evict earlier ones.
    #[arg(short, long = "store")]
    pub stores: Vec<String>,

    /// Have the order delivered.
    #[arg(long, conflicts_with = "pickup")]
    pub delivery: bool,

    /// Delivery street address.
    #[arg(long, requires = "delivery")]
    pub address: Option<String>,

    /// Delivery city.
    #[arg(long, requires = "delivery")]
    pub city: Option<String>,

    /// Delivery postal code.
    #[arg(long, requires = "delivery")]
    pub postal_code: Option<String>,

    /// Fill the delivery address from the current location.
    #[arg(long, requires = "delivery", conflicts_with_all = ["address", "city", "postal_code"])]
    pub locate: bool,

    /// Pick up from this store.
    #[arg(long, value_name = "STORE")]
    pub pickup: Option<String>,

    /// Seed for reproducible store replies.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Place the order without asking for confirmation.
    #[arg(short, long)]
    pub yes: bool,
}

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration.
    Show,
    /// Initialize a new config file.
    Init {
        /// Overwrite existing config.
        #[arg(short, long)]
        force: bool,
    },
    /// Validate configuration.
    Validate,
}
