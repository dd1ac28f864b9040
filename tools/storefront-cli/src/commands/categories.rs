//! Category commands.

use anyhow::{bail, Result};
use storefront_commerce::catalog::CategoryNode;

use super::{CategoriesArgs, CategoriesCommand};
use crate::context::Context;

/// Run the categories command.
pub async fn run(args: CategoriesArgs, ctx: &Context) -> Result<()> {
    match args.command {
        Some(CategoriesCommand::Tree) | None => show_tree(ctx).await,
        Some(CategoriesCommand::Breadcrumb { slug }) => show_breadcrumb(&slug, ctx).await,
        Some(CategoriesCommand::Descendants { slug }) => show_descendants(&slug, ctx).await,
    }
}

async fn show_tree(ctx: &Context) -> Result<()> {
    let index = ctx.categories()?.load().await?;
    let tree = index.tree();

    if ctx.output.is_json() {
        ctx.output.json(&tree);
        return Ok(());
    }

    ctx.output.header("Categories");
    if tree.is_empty() {
        ctx.output.info("No categories found.");
        return Ok(());
    }
    print_nodes(ctx, &tree, 0);

    ctx.output.info("");
    ctx.output.info(&format!("Total: {} categories", index.len()));
    Ok(())
}

fn print_nodes(ctx: &Context, nodes: &[CategoryNode], depth: usize) {
    for node in nodes {
        let label = if node.is_leaf() {
            format!("{} ({})", node.category.name, node.category.slug)
        } else {
            format!(
                "{} ({}) [{}]",
                node.category.name,
                node.category.slug,
                node.subtree_size() - 1
            )
        };
        ctx.output.tree_item(depth, &label);
        print_nodes(ctx, &node.children, depth + 1);
    }
}

async fn show_breadcrumb(slug: &str, ctx: &Context) -> Result<()> {
    let categories = ctx.categories()?;
    categories.load().await?;

    let trail = categories.breadcrumb(slug);
    if trail.is_empty() {
        bail!("Category '{}' not found", slug);
    }

    if ctx.output.is_json() {
        ctx.output.json(&trail);
        return Ok(());
    }

    let names: Vec<&str> = trail.iter().map(|c| c.name.as_str()).collect();
    ctx.output.header(&categories.name_by_slug(slug));
    ctx.output.info(&names.join(" › "));
    Ok(())
}

async fn show_descendants(slug: &str, ctx: &Context) -> Result<()> {
    let index = ctx.categories()?.load().await?;

    let Some(id) = index.id_by_slug(slug) else {
        bail!("Category '{}' not found", slug);
    };
    let ids = index.descendant_ids(&id);

    if ctx.output.is_json() {
        ctx.output.json(&ids);
        return Ok(());
    }

    ctx.output.header(&format!("Categories under {}", index.name_by_slug(slug)));
    for id in &ids {
        match index.by_id(id) {
            Some(category) => ctx.output.kv(id.as_str(), &category.name),
            None => ctx.output.kv(id.as_str(), "-"),
        }
    }
    Ok(())
}
