//! Product search.

use anyhow::Result;
use nearby_commerce::catalog::Product;
use nearby_commerce::search::{featured_products, search_products, ProductQuery, SEARCH_CATEGORIES};

use super::SearchArgs;
use crate::context::Context;

/// Products shown before a search is made.
const POPULAR_COUNT: usize = 3;

/// Run the search command.
pub async fn run(args: SearchArgs, ctx: &Context) -> Result<()> {
    let catalog = ctx.catalog.as_ref();

    let query = ProductQuery {
        text: args.text.unwrap_or_default(),
        category: args.category,
    };
    if let Some(ref category) = query.category {
        if !SEARCH_CATEGORIES.contains(&category.as_str()) {
            ctx.output.warn(&format!(
                "'{}' is not a browse category ({})",
                category,
                SEARCH_CATEGORIES.join(", ")
            ));
        }
    }

    let (title, results) = if query.is_blank() {
        ("Popular Products".to_string(), featured_products(catalog, POPULAR_COUNT))
    } else {
        (
            format!("Results for \"{}\"", query.text.trim()),
            search_products(catalog, &query),
        )
    };

    if ctx.output.is_json() {
        ctx.output.json(&results);
        return Ok(());
    }

    ctx.output.header(&title);
    if results.is_empty() {
        ctx.output.info("No products found");
        return Ok(());
    }
    print_products(ctx, &results);

    Ok(())
}

fn print_products(ctx: &Context, products: &[&Product]) {
    let widths = [4, 30, 14, 16, 20];
    ctx.output
        .table_row(&["ID", "NAME", "BRAND", "CATEGORY", "PRICE"], &widths);
    for product in products {
        let price = product.price_range.display();
        ctx.output.table_row(
            &[
                product.id.as_str(),
                &product.name,
                &product.brand,
                &product.category,
                &price,
            ],
            &widths,
        );
    }
}
