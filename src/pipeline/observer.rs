//! Observation points of a pipeline run.

use crate::event::WebhookEvent;
use crate::store::RecordMatch;

use super::{PipelineResult, Stage};

/// Everything known about a successful run.
#[derive(Debug, Clone, Copy)]
pub struct Completion<'a> {
    /// The event that triggered the run
    pub event: &'a WebhookEvent,
    /// The short link written to the page
    pub short_url: &'a str,
    /// The page that was updated
    pub record: &'a RecordMatch,
}

/// Capability invoked by the pipeline at its transition points.
///
/// Observers cannot influence the result: hooks return nothing, and
/// implementations must handle their own failures.
pub trait PipelineObserver: Send + Sync {
    /// Called when the pipeline moves into `stage`.
    fn stage_entered(&self, stage: Stage) {
        let _ = stage;
    }

    /// Called once when `stage` ends the run with a failure `result`.
    fn stage_failed(&self, stage: Stage, result: &PipelineResult) {
        let _ = (stage, result);
    }

    /// Called once after the page was updated.
    fn pipeline_succeeded(
        &self,
        completion: &Completion<'_>,
    ) -> impl std::future::Future<Output = ()> + Send {
        let _ = completion;
        async {}
    }
}

/// Observer that ignores every hook.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl PipelineObserver for NoopObserver {}

/// Observer that writes each transition to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl PipelineObserver for TracingObserver {
    fn stage_entered(&self, stage: Stage) {
        tracing::debug!("Pipeline stage: {stage}");
    }

    fn stage_failed(&self, stage: Stage, result: &PipelineResult) {
        tracing::warn!("Pipeline failed while {stage}: {result}");
    }

    async fn pipeline_succeeded(&self, completion: &Completion<'_>) {
        tracing::info!(
            "Order {} -> {} written to page {} ({})",
            completion.event.order_id,
            completion.short_url,
            completion.record.record_id,
            completion.record.mode,
        );
    }
}

/// Runs both observers, first `A` then `B`.
impl<A: PipelineObserver, B: PipelineObserver> PipelineObserver for (A, B) {
    fn stage_entered(&self, stage: Stage) {
        self.0.stage_entered(stage);
        self.1.stage_entered(stage);
    }

    fn stage_failed(&self, stage: Stage, result: &PipelineResult) {
        self.0.stage_failed(stage, result);
        self.1.stage_failed(stage, result);
    }

    async fn pipeline_succeeded(&self, completion: &Completion<'_>) {
        self.0.pipeline_succeeded(completion).await;
        self.1.pipeline_succeeded(completion).await;
    }
}

/// Runs the observer when present.
impl<O: PipelineObserver> PipelineObserver for Option<O> {
    fn stage_entered(&self, stage: Stage) {
        if let Some(observer) = self {
            observer.stage_entered(stage);
        }
    }

    fn stage_failed(&self, stage: Stage, result: &PipelineResult) {
        if let Some(observer) = self {
            observer.stage_failed(stage, result);
        }
    }

    async fn pipeline_succeeded(&self, completion: &Completion<'_>) {
        if let Some(observer) = self {
            observer.pipeline_succeeded(completion).await;
        }
    }
}
