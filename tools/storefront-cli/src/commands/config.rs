//! Configuration commands.

use std::path::Path;

use anyhow::{bail, Result};

use super::{ConfigArgs, ConfigCommand};
use crate::config::StorefrontConfig;
use crate::context::Context;

/// Run the config command.
pub async fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => show_config(ctx),
        ConfigCommand::Init { path, force } => init_config(&path, force, ctx),
    }
}

fn show_config(ctx: &Context) -> Result<()> {
    if ctx.output.is_json() {
        ctx.output.json(&ctx.config);
        return Ok(());
    }

    let backend = &ctx.config.backend;
    let catalog = &ctx.config.catalog;

    ctx.output.header("Backend");
    ctx.output.kv("url", &backend.url);
    ctx.output.kv("asset_url", backend.asset_base());
    ctx.output.kv("timeout_ms", &backend.timeout_ms.to_string());
    ctx.output.kv(
        "connect_timeout_ms",
        &backend.timeouts().connect.as_millis().to_string(),
    );

    ctx.output.header("Catalog");
    ctx.output.kv("per_page", &catalog.per_page.to_string());
    ctx.output.kv("featured_tag", &catalog.featured_tag);
    ctx.output.kv("featured_limit", &catalog.featured_limit.to_string());
    ctx.output.kv("sort", &catalog.sort);
    Ok(())
}

fn init_config(path: &str, force: bool, ctx: &Context) -> Result<()> {
    if Path::new(path).exists() && !force {
        bail!("{} already exists (use --force to overwrite)", path);
    }

    StorefrontConfig::default().save(path)?;
    ctx.output.info(&format!("Created {}", path));
    Ok(())
}
