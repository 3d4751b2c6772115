//! Batch KPI measurement.
//!
//! `UpdateKpisHandler` measures every automatic metric for every project.
//! `BatchUpdateKpiValuesHandler` measures a chosen subset for one project.
//! Both run metric/project pairs with bounded concurrency, cap each pair
//! with a timeout and report per-pair outcomes instead of failing the batch.

use std::sync::Arc;
use std::time::Duration;

use futures::stream::{self, StreamExt};
use tracing::Instrument;

use crate::domain::foundation::{KpiMetricId, ProjectId, Timestamp};
use crate::domain::kpi::{KpiError, KpiMetric};
use crate::domain::progress::ProjectHierarchy;

use super::KpiEngine;

/// Concurrency and timeout limits for batch runs.
#[derive(Debug, Clone)]
pub struct KpiBatchConfig {
    /// Upper bound for measuring and recording one pair.
    pub item_timeout: Duration,

    /// Pairs in flight at once.
    pub max_concurrency: usize,
}

impl Default for KpiBatchConfig {
    fn default() -> Self {
        Self {
            item_timeout: Duration::from_secs(30),
            max_concurrency: 8,
        }
    }
}

impl KpiBatchConfig {
    pub fn with_item_timeout(mut self, timeout: Duration) -> Self {
        self.item_timeout = timeout;
        self
    }

    pub fn with_max_concurrency(mut self, max: usize) -> Self {
        self.max_concurrency = max.max(1);
        self
    }
}

/// One pair that could not be measured.
#[derive(Debug, Clone, PartialEq)]
pub struct PairFailure {
    pub metric_code: String,
    pub project_id: ProjectId,
    pub error: KpiError,
}

/// Outcome counts of a batch run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchReport {
    pub attempted: usize,
    pub recorded: usize,
    /// Metrics without a formula.
    pub skipped: usize,
    pub failed: usize,
    pub failures: Vec<PairFailure>,
}

impl BatchReport {
    fn absorb(&mut self, outcome: PairOutcome) {
        self.attempted += 1;
        match outcome {
            PairOutcome::Recorded => self.recorded += 1,
            PairOutcome::Skipped => self.skipped += 1,
            PairOutcome::Failed(failure) => {
                self.failed += 1;
                self.failures.push(failure);
            }
        }
    }
}

enum PairOutcome {
    Recorded,
    Skipped,
    Failed(PairFailure),
}

/// Where a pair's project comes from.
#[derive(Clone)]
enum ProjectSource {
    Id(ProjectId),
    Loaded(Arc<ProjectHierarchy>),
}

impl ProjectSource {
    fn id(&self) -> ProjectId {
        match self {
            ProjectSource::Id(id) => *id,
            ProjectSource::Loaded(hierarchy) => *hierarchy.project.id(),
        }
    }
}

async fn measure_pair(
    engine: &KpiEngine,
    metric: &KpiMetric,
    project: ProjectSource,
    measured_at: Timestamp,
) -> Result<bool, KpiError> {
    let hierarchy = match project {
        ProjectSource::Loaded(hierarchy) => hierarchy,
        ProjectSource::Id(id) => Arc::new(engine.load_project(&id).await?),
    };

    let Some(value) = engine.calculate(metric, &hierarchy)? else {
        return Ok(false);
    };

    engine
        .record(
            metric,
            *hierarchy.project.id(),
            value,
            measured_at,
            Some("Automatically calculated".to_string()),
        )
        .await?;
    Ok(true)
}

async fn run_pairs(
    engine: &KpiEngine,
    config: &KpiBatchConfig,
    pairs: Vec<(Arc<KpiMetric>, ProjectSource)>,
    measured_at: Timestamp,
) -> BatchReport {
    let timeout = config.item_timeout;

    let outcomes: Vec<PairOutcome> = stream::iter(pairs)
        .map(|(metric, project)| async move {
            let project_id = project.id();
            let result = tokio::time::timeout(
                timeout,
                measure_pair(engine, &metric, project, measured_at),
            )
            .await
            .unwrap_or_else(|_| {
                Err(KpiError::Timeout {
                    metric_code: metric.code().to_string(),
                    project_id,
                })
            });

            match result {
                Ok(true) => PairOutcome::Recorded,
                Ok(false) => PairOutcome::Skipped,
                Err(error) => {
                    tracing::warn!(
                        metric_code = %metric.code(),
                        project_id = %project_id,
                        error = %error,
                        "KPI calculation failed"
                    );
                    PairOutcome::Failed(PairFailure {
                        metric_code: metric.code().to_string(),
                        project_id,
                        error,
                    })
                }
            }
        })
        .buffer_unordered(config.max_concurrency.max(1))
        .collect()
        .await;

    let mut report = BatchReport::default();
    for outcome in outcomes {
        report.absorb(outcome);
    }
    report
}

/// Measures every active metric with a positive update frequency for every
/// active project.
pub struct UpdateKpisHandler {
    engine: Arc<KpiEngine>,
    config: KpiBatchConfig,
}

impl UpdateKpisHandler {
    pub fn new(engine: Arc<KpiEngine>) -> Self {
        Self::with_config(engine, KpiBatchConfig::default())
    }

    pub fn with_config(engine: Arc<KpiEngine>, config: KpiBatchConfig) -> Self {
        Self { engine, config }
    }

    /// Never fails as a whole; store errors while listing metrics or
    /// projects yield an empty report and a log line.
    pub async fn handle(&self) -> BatchReport {
        async {
            let metrics = match self.engine.metrics().find_requiring_update().await {
                Ok(metrics) => metrics,
                Err(e) => {
                    tracing::error!(error = %e, "could not list KPI metrics");
                    return BatchReport::default();
                }
            };
            let projects = match self.engine.work_items().list_projects().await {
                Ok(projects) => projects,
                Err(e) => {
                    tracing::error!(error = %e, "could not list projects");
                    return BatchReport::default();
                }
            };

            let metrics: Vec<Arc<KpiMetric>> = metrics.into_iter().map(Arc::new).collect();
            let pairs = metrics
                .iter()
                .flat_map(|metric| {
                    projects
                        .iter()
                        .map(move |project| (metric.clone(), ProjectSource::Id(*project.id())))
                })
                .collect();

            let report = run_pairs(&self.engine, &self.config, pairs, Timestamp::now()).await;
            tracing::info!(
                attempted = report.attempted,
                recorded = report.recorded,
                skipped = report.skipped,
                failed = report.failed,
                "automatic KPI update finished"
            );
            report
        }
        .instrument(tracing::info_span!("update_kpis_automatically"))
        .await
    }
}

/// Command to measure selected metrics for one project.
#[derive(Debug, Clone)]
pub struct BatchUpdateKpiValuesCommand {
    pub project_id: ProjectId,
    pub metric_ids: Vec<KpiMetricId>,
    /// Defaults to now.
    pub as_of: Option<Timestamp>,
}

pub struct BatchUpdateKpiValuesHandler {
    engine: Arc<KpiEngine>,
    config: KpiBatchConfig,
}

impl BatchUpdateKpiValuesHandler {
    pub fn new(engine: Arc<KpiEngine>) -> Self {
        Self::with_config(engine, KpiBatchConfig::default())
    }

    pub fn with_config(engine: Arc<KpiEngine>, config: KpiBatchConfig) -> Self {
        Self { engine, config }
    }

    /// # Errors
    ///
    /// - `ProjectNotFound` if the project is absent
    ///
    /// Unknown metric ids and calculation failures are reported per metric.
    pub async fn handle(&self, cmd: BatchUpdateKpiValuesCommand) -> Result<BatchReport, KpiError> {
        let hierarchy = Arc::new(self.engine.load_project(&cmd.project_id).await?);
        let measured_at = cmd.as_of.unwrap_or_else(Timestamp::now);

        let mut report = BatchReport::default();
        let mut pairs = Vec::new();
        for metric_id in &cmd.metric_ids {
            match self.engine.find_metric(metric_id).await {
                Ok(metric) => pairs.push((
                    Arc::new(metric),
                    ProjectSource::Loaded(hierarchy.clone()),
                )),
                Err(error) => report.absorb(PairOutcome::Failed(PairFailure {
                    metric_code: metric_id.to_string(),
                    project_id: cmd.project_id,
                    error,
                })),
            }
        }

        let measured = run_pairs(&self.engine, &self.config, pairs, measured_at)
            .instrument(tracing::info_span!(
                "batch_update_kpi_values",
                project_id = %cmd.project_id
            ))
            .await;

        report.attempted += measured.attempted;
        report.recorded += measured.recorded;
        report.skipped += measured.skipped;
        report.failed += measured.failed;
        report.failures.extend(measured.failures);
        Ok(report)
    }
}
