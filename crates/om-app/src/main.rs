//! Headless dashboard entry point

use std::sync::Arc;

use anyhow::{Context, Result};
use om_app::{Dashboard, DashboardConfig};
use om_core::events::events::DatasetLoaded;
use om_core::events::handler_from_fn;
use om_data::CsvMedalSource;
use om_views::DataStatus;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Starting medal dashboard");

    let config = DashboardConfig::from_env().context("Failed to load dashboard config")?;
    let source = Arc::new(CsvMedalSource::new(config.source.clone()));
    let mut dashboard = Dashboard::new(&config, source);

    dashboard
        .event_bus()
        .subscribe::<DatasetLoaded>(handler_from_fn(|event| {
            if let Some(loaded) = event.as_any().downcast_ref::<DatasetLoaded>() {
                info!(
                    source = %loaded.source_name,
                    medals = loaded.medal_rows,
                    countries = loaded.country_rows,
                    "Dataset ready"
                );
            }
        }));

    if let DataStatus::Failed(reason) = dashboard.load().await {
        // Views already fall back to their empty state
        warn!(%reason, "Continuing without data");
    }

    dashboard.log_summary();
    Ok(())
}
