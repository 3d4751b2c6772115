//! portfolio-pulse - runs the KPI scheduler over in-memory stores.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use portfolio_pulse::adapters::{
    InMemoryKpiMetricStore, InMemoryKpiValueStore, InMemoryWorkItemStore, KpiScheduler,
    SchedulerConfig, TracingNotificationSink,
};
use portfolio_pulse::application::{
    CheckThresholdsHandler, KpiBatchConfig, KpiEngine, UpdateKpisHandler,
};
use portfolio_pulse::config::AppConfig;

#[tokio::main]
async fn main() {
    let config = match AppConfig::load_validated() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    let filter = match config.logging.env_filter() {
        Ok(filter) => filter,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };
    let registry = tracing_subscriber::registry().with(filter);
    if config.logging.json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    let work_items = Arc::new(InMemoryWorkItemStore::new());
    let metrics = Arc::new(InMemoryKpiMetricStore::new());
    let values = Arc::new(InMemoryKpiValueStore::new());
    let sink = Arc::new(TracingNotificationSink::new());

    let engine = Arc::new(KpiEngine::new(
        metrics.clone(),
        values.clone(),
        work_items.clone(),
    ));
    let batch_config = KpiBatchConfig::default()
        .with_item_timeout(config.kpi.item_timeout())
        .with_max_concurrency(config.kpi.max_concurrency);
    let update_handler = Arc::new(UpdateKpisHandler::with_config(engine, batch_config));
    let threshold_handler = Arc::new(CheckThresholdsHandler::new(
        values, metrics, work_items, sink,
    ));

    let scheduler_config = SchedulerConfig::default()
        .with_update_interval(config.scheduler.update_interval())
        .with_threshold_interval(config.scheduler.threshold_interval())
        .with_update_enabled(config.scheduler.update_enabled)
        .with_threshold_enabled(config.scheduler.threshold_enabled);
    let scheduler = KpiScheduler::with_config(update_handler, threshold_handler, scheduler_config);

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let handle = tokio::spawn(async move { scheduler.run(shutdown_rx).await });

    info!(
        update_interval_secs = config.scheduler.update_interval_secs,
        threshold_interval_secs = config.scheduler.threshold_interval_secs,
        "portfolio-pulse running, press Ctrl-C to stop"
    );

    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "could not listen for Ctrl-C");
    }
    let _ = shutdown_tx.send(true);

    match handle.await {
        Ok(Ok(())) => info!("portfolio-pulse stopped"),
        Ok(Err(e)) => {
            error!(error = %e, "final threshold check failed");
            std::process::exit(1);
        }
        Err(e) => {
            error!(error = %e, "scheduler task panicked");
            std::process::exit(1);
        }
    }
}
