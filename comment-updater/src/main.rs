mod config;
mod comment;
mod report;
mod resolve;
mod service;
mod updater;

use anyhow::{Context, Result};
use crate::config::{Config, LIVE_ENV};
use crate::resolve::SystemResolver;
use crate::updater::Updater;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("comment_updater=info"))
        )
        .init();

    // Load config
    let config_arg = std::env::args().nth(1);
    let (config, config_path) = Config::resolve(config_arg.as_deref())
        .context("Failed to load configuration")?;

    match &config_path {
        Some(path) => tracing::info!("Loaded config from {}", path.display()),
        None => tracing::info!("No config file, using defaults"),
    }

    let mode = config.apply_mode(std::env::var(LIVE_ENV).ok().as_deref());
    if mode.is_live() {
        tracing::warn!("Live mode: printer comments will be changed");
    } else {
        tracing::info!("Dry run: no printer comments will be changed");
    }

    let service = service::from_config(&config.service);
    service
        .preflight()
        .await
        .with_context(|| format!("Cannot use {}", service.describe()))?;

    let resolver = SystemResolver;
    let summary = Updater::new(service.as_ref(), &resolver, mode)
        .run(&config.updater.list_path, &config.updater.log_path)
        .await?;

    if !summary.skipped.is_empty() {
        tracing::warn!(
            "{} printer(s) not found: {}",
            summary.skipped.len(),
            summary.skipped.join(", ")
        );
    }
    if summary.unresolved > 0 {
        tracing::warn!("{} printer(s) got \"Unknown IP\"", summary.unresolved);
    }
    if summary.apply_failures > 0 {
        tracing::error!("{} update(s) failed", summary.apply_failures);
    }

    tracing::info!(
        "Processed {}/{} printers in {} ms ({:?})",
        summary.processed,
        summary.requested,
        (summary.finished - summary.started).num_milliseconds(),
        summary.mode
    );
    tracing::info!(
        "Done. Log saved to {}",
        config.updater.log_path.display()
    );
    Ok(())
}
