//! Product details.

use anyhow::Result;
use nearby_commerce::catalog::CatalogRepository;
use nearby_commerce::search::find_nearby_stores;
use nearby_commerce::{CommerceError, ProductId};

use super::ProductArgs;
use crate::context::Context;

/// Run the product command.
pub async fn run(args: ProductArgs, ctx: &Context) -> Result<()> {
    let catalog = ctx.catalog.as_ref();
    let product = catalog
        .product(&ProductId::new(args.id.as_str()))
        .ok_or_else(|| CommerceError::ProductNotFound(args.id.clone()))?;
    let nearby = find_nearby_stores(
        catalog,
        &product.category,
        ctx.config.simulation.nearby_limit,
    );

    if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({
            "product": product,
            "default_color": product.default_color().map(|c| &c.id),
            "nearby_stores": nearby.len(),
        }));
        return Ok(());
    }

    ctx.output.header(&product.name);
    ctx.output.kv("brand", &product.brand);
    ctx.output.kv("category", &product.category);
    ctx.output.kv("price", &product.price_range.display());
    ctx.output.kv("description", &product.description);
    if let Some(image) = product.primary_image() {
        ctx.output.kv("image", image);
    }

    ctx.output.info("");
    ctx.output.info("Colors:");
    for color in &product.colors {
        let label = if color.available {
            format!("{} {} ({})", color.id, color.name, color.hex)
        } else {
            format!("{} {} ({}) - out of stock", color.id, color.name, color.hex)
        };
        ctx.output.list_item(&label);
    }

    ctx.output.info("");
    match nearby.len() {
        0 => ctx.output.warn("No nearby stores carry this category"),
        n => ctx.output.success(&format!("{} nearby stores can be messaged", n)),
    }

    Ok(())
}
