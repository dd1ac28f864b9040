//! CLI command implementations.

pub mod categories;
pub mod config;
pub mod products;

use clap::{Args, Subcommand};

/// Arguments for the categories command.
#[derive(Args)]
pub struct CategoriesArgs {
    #[command(subcommand)]
    pub command: Option<CategoriesCommand>,
}

#[derive(Subcommand)]
pub enum CategoriesCommand {
    /// Show the category tree.
    Tree,
    /// Show the path from the root to a category.
    Breadcrumb {
        /// Category slug.
        slug: String,
    },
    /// List a category and every category below it.
    Descendants {
        /// Category slug.
        slug: String,
    },
}

/// Arguments for the products command.
#[derive(Args)]
pub struct ProductsArgs {
    /// Page to show (1-indexed).
    #[arg(short, long, default_value = "1")]
    pub page: u32,

    /// Restrict to a category slug, including its subcategories.
    #[arg(short, long)]
    pub category: Option<String>,

    /// Restrict to products whose name or description contains the keyword.
    #[arg(short, long)]
    pub keyword: Option<String>,
}

/// Arguments for the featured command.
#[derive(Args)]
pub struct FeaturedArgs {
    /// Number of products (default: from config).
    #[arg(short, long)]
    pub limit: Option<u32>,
}

/// Arguments for the product command.
#[derive(Args)]
pub struct ProductArgs {
    /// Product slug.
    pub slug: String,
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
        /// File to write; a `.json` extension writes JSON, anything else TOML.
        #[arg(short, long, default_value = "storefront.toml")]
        path: String,

        /// Force overwrite existing config.
        #[arg(short, long)]
        force: bool,
    },
}
