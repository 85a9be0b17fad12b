//! CLI mode implementation
//!
//! Argument structs double as HTTP request types so both surfaces share one
//! definition of each operation's inputs.

use clap::{Args, Parser, Subcommand};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Storefront CLI
#[derive(Parser, Debug)]
#[command(name = "storefront")]
#[command(about = "Appliance catalog server with typo-tolerant search", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Configuration file (defaults to the platform config directory)
    #[arg(long, global = true, env = "STOREFRONT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Catalog data file, overrides the configuration
    #[arg(long, global = true, env = "STOREFRONT_DATA_FILE")]
    pub data_file: Option<PathBuf>,

    /// Admin code that catalog writes must present, overrides the configuration
    #[arg(long, global = true, env = "STOREFRONT_ADMIN_CODE", hide_env_values = true)]
    pub admin_code: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the HTTP server (default when no command is given)
    Serve(ServeArgs),
    /// Print the catalog, or one category
    List(ListArgs),
    /// Search the searchable categories
    Search(SearchArgs),
    /// Add a product (requires the admin code)
    Add(AddArgs),
    /// Remove a product (requires the admin code)
    Remove(RemoveArgs),
    /// Print the messaging link for ordering a product
    Order(ProductRef),
}

/// Server arguments
#[derive(Args, Debug, Default, Clone)]
pub struct ServeArgs {
    /// Listen address, overrides the configuration
    #[arg(long, env = "STOREFRONT_BIND")]
    pub bind: Option<String>,
}

/// List arguments
#[derive(Args, Debug, Clone)]
pub struct ListArgs {
    /// Category to list; all categories when omitted
    #[arg(short = 'c', long)]
    pub category: Option<String>,
}

/// Search arguments
#[derive(Args, JsonSchema, Deserialize, Serialize, Clone, Debug)]
pub struct SearchArgs {
    /// Search text (case-insensitive, typos tolerated)
    #[arg(short = 'q', long)]
    #[serde(default, alias = "q")]
    #[schemars(description = "Search text (case-insensitive, typos tolerated)")]
    pub query: String,

    /// Maximum number of results (defaults to the configured display limit)
    #[arg(short = 'l', long)]
    #[schemars(description = "Maximum number of results (defaults to the configured display limit)")]
    pub limit: Option<usize>,
}

/// Product creation arguments
#[derive(Args, JsonSchema, Deserialize, Serialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct AddArgs {
    /// Display name
    #[arg(short = 'n', long)]
    #[serde(default)]
    pub name: String,

    /// Category to add the product to
    #[arg(short = 'c', long)]
    #[serde(default)]
    pub category: String,

    /// Optional description
    #[arg(short = 'd', long)]
    pub description: Option<String>,

    /// Already-uploaded image URL or server path
    #[arg(short = 'i', long)]
    #[serde(alias = "image_url")]
    pub image_url: Option<String>,

    /// Explicit id; generated when omitted
    #[arg(long)]
    pub id: Option<String>,

    /// Admin code presented for this write
    #[arg(long)]
    #[serde(skip)]
    pub code: Option<String>,
}

/// Product removal arguments
#[derive(Args, Clone, Debug)]
pub struct RemoveArgs {
    #[command(flatten)]
    pub product: ProductRef,

    /// Admin code presented for this write
    #[arg(long)]
    pub code: Option<String>,
}

/// Identifies one product
#[derive(Args, JsonSchema, Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub struct ProductRef {
    /// Product category
    #[arg(short = 'c', long)]
    pub category: String,

    /// Product id within the category
    #[arg(long)]
    pub id: String,
}
