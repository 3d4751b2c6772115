//! KpiScheduler - background service for the two periodic KPI jobs.
//!
//! | Job | Default | Handler |
//! |-----|---------|---------|
//! | metric update | 1 hour | [`UpdateKpisHandler`] |
//! | threshold check | 15 minutes | [`CheckThresholdsHandler`] |
//!
//! Each job runs in its own task, so a long metric update never delays a
//! threshold check.
//!
//! ## Graceful Shutdown
//!
//! Both tasks listen for the shutdown signal and finish the job in flight.
//! Once both have stopped, one final threshold check runs so breaches
//! recorded just before shutdown are still notified.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{self, MissedTickBehavior};

use crate::application::handlers::{
    BatchReport, CheckThresholdsHandler, NotificationReport, UpdateKpisHandler,
};
use crate::domain::foundation::DomainError;

/// Configuration for the KpiScheduler service.
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    pub update_interval: Duration,
    pub threshold_interval: Duration,
    pub update_enabled: bool,
    pub threshold_enabled: bool,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            update_interval: Duration::from_secs(60 * 60),
            threshold_interval: Duration::from_secs(15 * 60),
            update_enabled: true,
            threshold_enabled: true,
        }
    }
}

impl SchedulerConfig {
    pub fn with_update_interval(mut self, interval: Duration) -> Self {
        self.update_interval = interval;
        self
    }

    pub fn with_threshold_interval(mut self, interval: Duration) -> Self {
        self.threshold_interval = interval;
        self
    }

    pub fn with_update_enabled(mut self, enabled: bool) -> Self {
        self.update_enabled = enabled;
        self
    }

    pub fn with_threshold_enabled(mut self, enabled: bool) -> Self {
        self.threshold_enabled = enabled;
        self
    }
}

/// Background service running metric updates and threshold checks.
pub struct KpiScheduler {
    update_handler: Arc<UpdateKpisHandler>,
    threshold_handler: Arc<CheckThresholdsHandler>,
    config: SchedulerConfig,
}

impl KpiScheduler {
    pub fn new(
        update_handler: Arc<UpdateKpisHandler>,
        threshold_handler: Arc<CheckThresholdsHandler>,
    ) -> Self {
        Self::with_config(update_handler, threshold_handler, SchedulerConfig::default())
    }

    pub fn with_config(
        update_handler: Arc<UpdateKpisHandler>,
        threshold_handler: Arc<CheckThresholdsHandler>,
        config: SchedulerConfig,
    ) -> Self {
        Self {
            update_handler,
            threshold_handler,
            config,
        }
    }

    /// Run both jobs until the shutdown signal is received or its sender
    /// is dropped.
    ///
    /// Both intervals fire once immediately. A failing threshold check is
    /// logged and retried on the next tick; only the final check on
    /// shutdown returns its error.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) -> Result<(), DomainError> {
        tracing::info!(
            update_interval_secs = self.config.update_interval.as_secs(),
            threshold_interval_secs = self.config.threshold_interval.as_secs(),
            update_enabled = self.config.update_enabled,
            threshold_enabled = self.config.threshold_enabled,
            "KPI scheduler started"
        );

        let update_job = self.config.update_enabled.then(|| {
            tokio::spawn(update_loop(
                self.update_handler.clone(),
                self.config.update_interval,
                shutdown.clone(),
            ))
        });
        let threshold_job = self.config.threshold_enabled.then(|| {
            tokio::spawn(threshold_loop(
                self.threshold_handler.clone(),
                self.config.threshold_interval,
                shutdown.clone(),
            ))
        });

        shutdown_requested(&mut shutdown).await;
        tracing::info!("KPI scheduler shutting down");

        for job in [update_job, threshold_job].into_iter().flatten() {
            if let Err(e) = job.await {
                tracing::error!(error = %e, "KPI scheduler job aborted");
            }
        }

        if self.config.threshold_enabled {
            self.check_once().await?;
        }
        Ok(())
    }

    /// Run exactly one metric update.
    pub async fn update_once(&self) -> BatchReport {
        self.update_handler.handle().await
    }

    /// Run exactly one threshold check.
    pub async fn check_once(&self) -> Result<NotificationReport, DomainError> {
        self.threshold_handler.handle().await
    }
}

fn job_interval(period: Duration) -> time::Interval {
    let mut interval = time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    interval
}

async fn update_loop(
    handler: Arc<UpdateKpisHandler>,
    period: Duration,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut interval = job_interval(period);
    loop {
        tokio::select! {
            _ = shutdown_requested(&mut shutdown) => return,
            _ = interval.tick() => {
                handler.handle().await;
            }
        }
    }
}

async fn threshold_loop(
    handler: Arc<CheckThresholdsHandler>,
    period: Duration,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut interval = job_interval(period);
    loop {
        tokio::select! {
            _ = shutdown_requested(&mut shutdown) => return,
            _ = interval.tick() => {
                if let Err(e) = handler.handle().await {
                    tracing::error!(error = %e, "threshold check failed");
                }
            }
        }
    }
}

/// Resolves once `true` is sent or the sender is dropped.
async fn shutdown_requested(shutdown: &mut watch::Receiver<bool>) {
    while !*shutdown.borrow_and_update() {
        if shutdown.changed().await.is_err() {
            return;
        }
    }
}
