//! Configuration management commands.

use std::fs;

use anyhow::{bail, Result};
use nearby_commerce::catalog::CatalogRepository;

use super::{ConfigArgs, ConfigCommand};
use crate::config::{generate_default_config, CONFIG_FILE_NAMES};
use crate::context::Context;

/// Run the config command.
pub async fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => show_config(ctx).await,
        ConfigCommand::Init { force } => init_config(force, ctx).await,
        ConfigCommand::Validate => validate_config(ctx).await,
    }
}

async fn show_config(ctx: &Context) -> Result<()> {
    if ctx.output.is_json() {
        ctx.output.json(&ctx.config);
        return Ok(());
    }

    ctx.output.header("Current Configuration");
    match ctx.config_source {
        Some(ref path) => ctx.output.kv("source", &path.display().to_string()),
        None => ctx.output.kv("source", "built-in defaults"),
    }

    let sim = &ctx.config.simulation;
    ctx.output.info("");
    ctx.output.info("[simulation]");
    ctx.output.kv("reply_delay_ms", &sim.reply_delay_ms.to_string());
    ctx.output.kv("locate_delay_ms", &sim.locate_delay_ms.to_string());
    ctx.output
        .kv("availability_cutoff", &sim.availability_cutoff.to_string());
    ctx.output.kv("nearby_limit", &sim.nearby_limit.to_string());
    if let Some(seed) = sim.seed {
        ctx.output.kv("seed", &seed.to_string());
    }

    ctx.output.info("");
    ctx.output.info("[catalog]");
    ctx.output.kv(
        "path",
        ctx.config.catalog.path.as_deref().unwrap_or("(reference catalog)"),
    );
    ctx.output.kv(
        "contents",
        &format!(
            "{} products, {} stores",
            ctx.catalog.products().len(),
            ctx.catalog.stores().len()
        ),
    );

    Ok(())
}

async fn init_config(force: bool, ctx: &Context) -> Result<()> {
    let config_path = ctx.cwd.join(CONFIG_FILE_NAMES[0]);

    if config_path.exists() && !force {
        bail!(
            "Config file already exists: {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    fs::write(&config_path, generate_default_config())?;

    ctx.output.success(&format!("Created: {}", config_path.display()));

    Ok(())
}

async fn validate_config(ctx: &Context) -> Result<()> {
    ctx.output.header("Validating configuration");

    let mut errors: Vec<String> = Vec::new();
    let mut warnings: Vec<String> = Vec::new();

    // Context::load already rejected a bad cutoff or an unreadable catalog
    let sim = &ctx.config.simulation;
    if sim.nearby_limit == 0 {
        errors.push("simulation.nearby_limit must be at least 1".to_string());
    }
    if sim.availability_cutoff >= 1.0 {
        warnings.push("simulation.availability_cutoff of 1.0 means no store ever has stock".to_string());
    }
    if sim.reply_delay_ms > 60_000 {
        warnings.push(format!(
            "simulation.reply_delay_ms is {}s; replies will be slow",
            sim.reply_delay_ms / 1000
        ));
    }

    if ctx.catalog.stores().is_empty() {
        warnings.push("catalog has no stores; nothing can be messaged".to_string());
    }

    // Print results
    if errors.is_empty() && warnings.is_empty() {
        ctx.output.success("Configuration is valid");
        return Ok(());
    }

    for error in &errors {
        ctx.output.error(&format!("Error: {}", error));
    }

    for warning in &warnings {
        ctx.output.warn(&format!("Warning: {}", warning));
    }

    if !errors.is_empty() {
        bail!("Configuration has {} error(s)", errors.len());
    }

    ctx.output.success("Configuration is valid (with warnings)");

    Ok(())
}
