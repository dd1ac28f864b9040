//! Product commands.

use anyhow::{bail, Result};
use storefront_commerce::search::{LoadStatus, ProductFilters};

use super::{FeaturedArgs, ProductArgs, ProductsArgs};
use crate::context::Context;
use crate::output::{format_price, stock_badge};

/// Run the products command: one page of the product list.
pub async fn list(args: ProductsArgs, ctx: &Context) -> Result<()> {
    let controller = ctx.controller()?;
    let filters = ProductFilters {
        category_slug: args.category.unwrap_or_default(),
        keyword: args.keyword.unwrap_or_default(),
    };

    controller.fetch(args.page, filters).await;
    let state = controller.snapshot();

    if state.status == LoadStatus::Errored {
        bail!(state.error.unwrap_or_else(|| "Failed to load products".to_string()));
    }

    if ctx.output.is_json() {
        ctx.output.json(&state);
        return Ok(());
    }

    ctx.output.header("Products");
    if state.items.is_empty() {
        ctx.output.info("No products found.");
        return Ok(());
    }
    ctx.output.products(&state.items);

    let pagination = state.pagination();
    let pages: Vec<String> = pagination
        .page_numbers(7)
        .into_iter()
        .map(|page| {
            if page == pagination.page {
                format!("[{}]", page)
            } else {
                page.to_string()
            }
        })
        .collect();

    ctx.output.info("");
    ctx.output.info(&format!(
        "Showing {}-{} of {} · page {}",
        pagination.start_item(),
        pagination.end_item(),
        pagination.total,
        pages.join(" ")
    ));
    if pagination.page > pagination.total_pages {
        ctx.output.warn(&format!("Only {} page(s) available", pagination.total_pages));
    }
    Ok(())
}

/// Run the featured command.
pub async fn featured(args: FeaturedArgs, ctx: &Context) -> Result<()> {
    let products = ctx.products()?;
    let limit = args.limit.unwrap_or(products.settings().featured_limit);
    let featured = products.get_featured(limit).await?;

    if ctx.output.is_json() {
        ctx.output.json(&featured);
        return Ok(());
    }

    ctx.output.header(&format!("Featured ({})", products.settings().featured_tag));
    if featured.is_empty() {
        ctx.output.info("No featured products.");
        return Ok(());
    }
    ctx.output.products(&featured);
    Ok(())
}

/// Run the product command: details for one product.
pub async fn show(args: ProductArgs, ctx: &Context) -> Result<()> {
    let Some(product) = ctx.products()?.get_by_slug(&args.slug).await? else {
        bail!("Product '{}' not found", args.slug);
    };

    if ctx.output.is_json() {
        ctx.output.json(&product);
        return Ok(());
    }

    ctx.output.header(&product.name);
    ctx.output.kv("ID", product.id.as_str());
    ctx.output.kv("Slug", &product.slug);
    ctx.output.kv("Price", &format_price(product.price));
    ctx.output.kv("Stock", &stock_badge(product.in_stock()));
    if let Some(category) = product.category.as_ref().and_then(|c| c.name.as_deref()) {
        ctx.output.kv("Category", category);
    }
    if let Some(badge) = &product.badge {
        ctx.output.kv("Badge", badge);
    }
    if let Some(summary) = &product.short_description {
        ctx.output.kv("Summary", summary);
    }
    if let Some(image) = &product.image {
        ctx.output.kv("Image", image);
    }
    if !product.gallery.is_empty() {
        ctx.output.kv("Gallery", &format!("{} image(s)", product.gallery.len()));
    }

    if !product.variants.is_empty() {
        ctx.output.header("Variants");
        for variant in &product.variants {
            let sku = variant.sku.as_deref().unwrap_or("-");
            let price = variant.price.map(format_price).unwrap_or_else(|| "-".to_string());
            let stock = variant
                .stock
                .map(|stock| stock.to_string())
                .unwrap_or_else(|| "-".to_string());
            ctx.output.table_row(&[sku, &price, &stock], &[20, 10, 8]);
        }
    }
    Ok(())
}
