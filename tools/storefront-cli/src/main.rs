//! Storefront CLI - browse a storefront catalog backend.
//!
//! Commands:
//! - `storefront categories` - Show the category tree, breadcrumbs and subtrees
//! - `storefront products` - List a page of products, optionally filtered
//! - `storefront featured` - List featured products
//! - `storefront product` - Show one product by slug
//! - `storefront config` - Manage configuration

mod commands;
mod config;
mod context;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt::SubscriberBuilder, EnvFilter};

use commands::{CategoriesArgs, ConfigArgs, FeaturedArgs, ProductArgs, ProductsArgs};

/// Storefront CLI - Browse categories and products of a storefront backend
#[derive(Parser)]
#[command(name = "storefront")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use JSON output format
    #[arg(long, global = true)]
    json: bool,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse the category tree
    Categories(CategoriesArgs),

    /// List products page by page
    Products(ProductsArgs),

    /// List featured products
    Featured(FeaturedArgs),

    /// Show a single product
    Product(ProductArgs),

    /// Manage configuration
    Config(ConfigArgs),
}

fn init_tracing(verbose: bool) -> Result<()> {
    let default_filter = if verbose {
        "storefront_commerce=debug,storefront_data=debug"
    } else {
        "storefront_commerce=info,storefront_data=info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    SubscriberBuilder::default()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {}", e))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;

    // Setup output formatting
    let output = output::Output::new(cli.verbose, cli.json);

    // Load config
    let config_path = cli.config.as_deref();
    let ctx = match context::Context::load(config_path, output.clone()) {
        Ok(ctx) => ctx,
        Err(e) => {
            output.error(&format!("{:#}", e));
            std::process::exit(1);
        }
    };

    // Execute command
    let result = match cli.command {
        Commands::Categories(args) => commands::categories::run(args, &ctx).await,
        Commands::Products(args) => commands::products::list(args, &ctx).await,
        Commands::Featured(args) => commands::products::featured(args, &ctx).await,
        Commands::Product(args) => commands::products::show(args, &ctx).await,
        Commands::Config(args) => commands::config::run(args, &ctx).await,
    };

    if let Err(e) = result {
        ctx.output.error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}
