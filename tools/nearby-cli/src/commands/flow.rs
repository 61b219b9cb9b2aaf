//! End-to-end purchase flow.

use anyhow::{bail, Context as _, Result};
use chrono::Utc;
use dialoguer::{Confirm, Input, MultiSelect, Select};
use nearby_commerce::availability::{
    AvailabilitySimulator, LocationProvider, SeededRandom, SimulatedLocator,
};
use nearby_commerce::catalog::{CatalogRepository, Product};
use nearby_commerce::checkout::{
    DeliveryAddress, FlowStep, FulfillmentForm, FulfillmentKind, OrderFulfillment, OrderSummary,
    PurchaseFlow,
};
use nearby_commerce::search::find_nearby_stores;
use nearby_commerce::{ColorId, CommerceError, ProductId, StoreId};

use super::FlowArgs;
use crate::context::Context;
use crate::output::{format_distance, reply_badge, status_badge};

/// Run the flow command.
pub async fn run(args: FlowArgs, ctx: &Context) -> Result<()> {
    let catalog = ctx.catalog.as_ref();
    let product = catalog
        .product(&ProductId::new(args.product.as_str()))
        .cloned()
        .ok_or_else(|| CommerceError::ProductNotFound(args.product.clone()))?;

    let mut flow =
        PurchaseFlow::new(product.clone()).with_nearby_limit(ctx.config.simulation.nearby_limit);
    ctx.output.header(&format!("{} by {}", product.name, product.brand));

    // Color
    let color_id = match args.color {
        Some(ref id) => ColorId::new(id.as_str()),
        None => product
            .default_color()
            .map(|c| c.id.clone())
            .ok_or_else(|| anyhow::anyhow!("{} has no colors in stock", product.name))?,
    };
    let color = flow.choose_color(&color_id)?.name.clone();
    announce(ctx, &flow, &format!("Color: {}", color));

    // Stores
    let picks = if args.stores.is_empty() {
        prompt_stores(ctx, &product)?
    } else {
        args.stores.iter().map(|s| StoreId::new(s.as_str())).collect()
    };
    for id in &picks {
        if let Some(evicted) = flow.toggle_store(catalog, id)? {
            ctx.output.warn(&format!(
                "At most two stores can be messaged; dropped {}",
                evicted
            ));
        }
    }
    let stores = flow
        .selected_stores()
        .cloned()
        .ok_or(CommerceError::EmptyStoreSelection)?;
    let names: Vec<String> = stores
        .ids()
        .iter()
        .filter_map(|id| catalog.store(id).map(|s| s.name.clone()))
        .collect();
    announce(ctx, &flow, &format!("Stores: {}", names.join(", ")));

    // Replies
    let simulation = ctx.config.simulation.clone();
    let seed = args.seed.or(simulation.seed);
    let simulator = AvailabilitySimulator::new(simulation, SeededRandom::from_optional_seed(seed));

    let ticket = flow.begin_request()?;
    let spinner = ctx
        .output
        .spinner(&format!("Messaging {} store(s)...", stores.len()));
    let replies = tokio::select! {
        replies = simulator.request_availability(&stores, &product) => replies,
        _ = tokio::signal::ctrl_c() => {
            spinner.finish_and_clear();
            flow.cancel_request()?;
            ctx.output.warn("Stopped waiting for store replies");
            flow.abandon();
            return Ok(());
        }
    };
    spinner.finish_and_clear();
    flow.receive_replies(&ticket, replies?)?;
    announce(ctx, &flow, "Stores replied");

    if let Some(replies) = flow.replies() {
        for (id, reply) in replies {
            let name = catalog.store(id).map_or(id.as_str(), |s| s.name.as_str());
            ctx.output.kv(name, &reply_badge(reply));
        }
    }

    if flow.available_stores(catalog).is_empty() {
        if ctx.output.is_json() {
            ctx.output.json(flow.state());
        }
        return Err(CommerceError::NoAvailability.into());
    }

    // Fulfillment
    let form = if let Some(ref store) = args.pickup {
        FulfillmentForm::pickup(StoreId::new(store.as_str()))
    } else if args.delivery {
        let address = if args.locate {
            locate(ctx).await?
        } else {
            DeliveryAddress::new(
                args.address.clone().unwrap_or_default(),
                args.city.clone().unwrap_or_default(),
                args.postal_code.clone().unwrap_or_default(),
            )
        };
        FulfillmentForm::delivery(address)
    } else {
        prompt_fulfillment(ctx, &flow).await?
    };
    let fulfillment = flow
        .choose_fulfillment(&form)
        .context("Cannot continue to review")?;
    announce(
        ctx,
        &flow,
        &format!("{} ({})", fulfillment.kind().display_name(), fulfillment.fee().display()),
    );

    // Review
    if !args.yes && !ctx.output.is_json() {
        let confirmed = Confirm::new()
            .with_prompt("Place order?")
            .default(true)
            .interact()?;
        if !confirmed {
            ctx.output.warn("Order not placed");
            flow.abandon();
            return Ok(());
        }
    }

    let order = flow.confirm(catalog, Utc::now())?;
    if ctx.output.is_json() {
        ctx.output.json(&order);
        return Ok(());
    }
    print_order(ctx, &order);

    Ok(())
}

fn announce(ctx: &Context, flow: &PurchaseFlow, msg: &str) {
    let step = flow.step();
    ctx.output
        .step(step.number(), FlowStep::OrderConfirmed.number(), msg);
    ctx.output.debug(&format!(
        "flow {} at {} ({}%)",
        flow.id,
        step.as_str(),
        step.progress_percent()
    ));
}

fn prompt_stores(ctx: &Context, product: &Product) -> Result<Vec<StoreId>> {
    let nearby = find_nearby_stores(
        ctx.catalog.as_ref(),
        &product.category,
        ctx.config.simulation.nearby_limit,
    );
    if nearby.is_empty() {
        bail!("No nearby stores carry {}", product.category);
    }
    if ctx.output.is_json() {
        bail!("Pass --store to choose stores in JSON mode");
    }

    let items: Vec<String> = nearby
        .iter()
        .map(|s| {
            format!(
                "{} ({}, {})",
                s.name,
                format_distance(s.distance_km),
                s.capability_label()
            )
        })
        .collect();
    let chosen = MultiSelect::new()
        .with_prompt("Select up to 2 stores to message")
        .items(&items)
        .interact()?;

    Ok(chosen.into_iter().map(|i| nearby[i].id.clone()).collect())
}

async fn prompt_fulfillment(ctx: &Context, flow: &PurchaseFlow) -> Result<FulfillmentForm> {
    if ctx.output.is_json() {
        bail!("Pass --delivery or --pickup to choose fulfillment in JSON mode");
    }

    let catalog = ctx.catalog.as_ref();
    let options: Vec<_> = flow
        .fulfillment_options(catalog)?
        .into_iter()
        .filter(|o| o.available)
        .collect();
    let items: Vec<String> = options
        .iter()
        .map(|o| format!("{} - {} ({})", o.label, o.fee.display(), o.eta))
        .collect();
    let choice = Select::new()
        .with_prompt("How do you want to get it?")
        .items(&items)
        .default(0)
        .interact()?;

    match options[choice].kind {
        FulfillmentKind::Pickup => {
            let stores = flow.available_stores(catalog);
            let items: Vec<String> = stores
                .iter()
                .map(|s| format!("{} - {}", s.name, s.one_line_address()))
                .collect();
            let store = Select::new()
                .with_prompt("Pick up from")
                .items(&items)
                .default(0)
                .interact()?;
            Ok(FulfillmentForm::pickup(stores[store].id.clone()))
        }
        FulfillmentKind::Delivery => {
            let use_location = Confirm::new()
                .with_prompt("Use my current location?")
                .default(false)
                .interact()?;
            let address = if use_location {
                locate(ctx).await?
            } else {
                DeliveryAddress::new(
                    Input::<String>::new().with_prompt("Address").allow_empty(true).interact_text()?,
                    Input::<String>::new().with_prompt("City").allow_empty(true).interact_text()?,
                    Input::<String>::new()
                        .with_prompt("Postal code")
                        .allow_empty(true)
                        .interact_text()?,
                )
            };
            Ok(FulfillmentForm::delivery(address))
        }
    }
}

async fn locate(ctx: &Context) -> Result<DeliveryAddress> {
    let spinner = ctx.output.spinner("Finding your location...");
    let address = SimulatedLocator::from_config(&ctx.config.simulation)
        .current_address()
        .await;
    spinner.finish_and_clear();
    let address = address?;
    ctx.output.info(&format!("Delivering to {}", address.one_line()));
    Ok(address)
}

fn print_order(ctx: &Context, order: &OrderSummary) {
    ctx.output.success("Order Confirmed!");
    ctx.output.kv("order", order.id.as_str());
    ctx.output.kv("status", &status_badge(order.status));
    ctx.output.kv("product", &format!("{} ({})", order.product.name, order.color.name));
    ctx.output.kv("price", &order.product.price_range.display());

    match &order.fulfillment {
        OrderFulfillment::Delivery { address, fee, eta } => {
            ctx.output.kv("delivery to", &address.one_line());
            ctx.output.kv("delivery fee", &fee.display());
            ctx.output.kv("estimated", eta);
        }
        OrderFulfillment::Pickup { store, eta } => {
            ctx.output.kv("pickup at", &store.name);
            ctx.output
                .kv("address", &format!("{}, {}", store.address, store.city));
            ctx.output.kv("distance", &format_distance(store.distance_km));
            ctx.output.kv("ready in", eta);
        }
    }
    ctx.output.kv(
        "placed",
        &order.created_at.format("%Y-%m-%d %H:%M UTC").to_string(),
    );
}
