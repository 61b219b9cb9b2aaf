//! Nearby store listing.

use anyhow::Result;
use nearby_commerce::search::find_nearby_stores;

use super::StoresArgs;
use crate::context::Context;
use crate::output::format_distance;

/// Run the stores command.
pub async fn run(args: StoresArgs, ctx: &Context) -> Result<()> {
    let limit = args.limit.unwrap_or(ctx.config.simulation.nearby_limit);
    let stores = find_nearby_stores(ctx.catalog.as_ref(), &args.category, limit);

    if ctx.output.is_json() {
        ctx.output.json(&stores);
        return Ok(());
    }

    ctx.output.header(&format!("Stores near you: {}", args.category));
    if stores.is_empty() {
        ctx.output.info("No stores found for this category");
        return Ok(());
    }

    let widths = [4, 24, 10, 20, 14];
    ctx.output
        .table_row(&["ID", "NAME", "DISTANCE", "CAPABILITY", "HOURS"], &widths);
    for store in stores {
        let distance = format_distance(store.distance_km);
        let hours = store.hours.display();
        ctx.output.table_row(
            &[
                store.id.as_str(),
                &store.name,
                &distance,
                store.capability_label(),
                &hours,
            ],
            &widths,
        );
    }

    Ok(())
}
