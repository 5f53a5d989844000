//! The shorten → locate → patch sequence.

use crate::event::{EventError, PropertyNames, WebhookEvent, field};
use crate::shortener::{ShortenResult, YourlsGateway, YourlsSettings};
use crate::store::{NotionSettings, RecordLocator, RecordPatcher};
use crate::transport::HttpClient;

use super::{Completion, PipelineObserver, PipelineResult, Stage, TracingObserver};

/// Settings for every collaborator of the pipeline.
#[derive(Debug, Clone)]
pub struct PipelineSettings {
    /// Shortener endpoint
    pub yourls: YourlsSettings,
    /// Document store endpoint
    pub notion: NotionSettings,
    /// Page property names
    pub properties: PropertyNames,
}

/// One webhook → one linear run: validate, shorten, locate, patch.
///
/// Holds no per-run state, so a single instance can serve concurrent calls.
/// Every downstream failure ends the run; nothing is retried.
#[derive(Debug)]
pub struct Pipeline<C, O = TracingObserver> {
    properties: PropertyNames,
    shortener: YourlsGateway<C>,
    locator: RecordLocator<C>,
    patcher: RecordPatcher<C>,
    observer: O,
}

impl<C: HttpClient + Clone> Pipeline<C, TracingObserver> {
    /// Creates a pipeline sharing `client` across all collaborators.
    #[must_use]
    pub fn new(client: C, settings: PipelineSettings) -> Self {
        let PipelineSettings {
            yourls,
            notion,
            properties,
        } = settings;

        Self {
            shortener: YourlsGateway::new(client.clone(), yourls),
            locator: RecordLocator::new(client.clone(), notion.clone(), properties.order_id.clone()),
            patcher: RecordPatcher::new(client, notion, properties.short_url.clone()),
            properties,
            observer: TracingObserver,
        }
    }
}

impl<C, O> Pipeline<C, O> {
    /// Replaces the observer.
    #[must_use]
    pub fn with_observer<O2>(self, observer: O2) -> Pipeline<C, O2> {
        Pipeline {
            properties: self.properties,
            shortener: self.shortener,
            locator: self.locator,
            patcher: self.patcher,
            observer,
        }
    }

    /// Returns the observer.
    #[must_use]
    pub const fn observer(&self) -> &O {
        &self.observer
    }
}

impl<C: HttpClient, O: PipelineObserver> Pipeline<C, O> {
    /// Parses a raw webhook body and runs the pipeline on it.
    ///
    /// A body that does not parse ends the run as
    /// [`PipelineResult::ValidationFailed`] before any network call.
    pub async fn process_payload(&self, payload: &[u8]) -> PipelineResult {
        self.observer.stage_entered(Stage::Validating);

        match WebhookEvent::parse(payload, &self.properties) {
            Ok(event) => self.execute(&event).await,
            Err(e) => self.fail(Stage::Validating, validation_failed(&e)),
        }
    }

    /// Runs the pipeline for an already built event.
    ///
    /// Values are trimmed before use, as [`WebhookEvent::parse`] does.
    pub async fn run(&self, event: &WebhookEvent) -> PipelineResult {
        self.observer.stage_entered(Stage::Validating);
        self.execute(&event.trimmed()).await
    }

    async fn execute(&self, event: &WebhookEvent) -> PipelineResult {
        if let Err(e) = self.validate(event) {
            return self.fail(Stage::Validating, validation_failed(&e));
        }

        if let Some(existing) = &event.existing_short_url {
            tracing::info!(
                "Order {} already has short link {existing}; regenerating",
                event.order_id
            );
        }

        self.observer.stage_entered(Stage::Shortening);
        let short_url = match self
            .shortener
            .shorten(&event.payment_url, &event.order_id)
            .await
        {
            ShortenResult::Shortened { short_url } => short_url,
            ShortenResult::Failed { status, body } => {
                return self.fail(
                    Stage::Shortening,
                    PipelineResult::ShortenFailed {
                        http_status: status,
                        raw_body: body,
                    },
                );
            }
        };

        self.observer.stage_entered(Stage::Locating);
        let Some(record) = self.locator.locate(event).await else {
            return self.fail(
                Stage::Locating,
                PipelineResult::RecordNotFound {
                    order_id: event.order_id.clone(),
                },
            );
        };

        self.observer.stage_entered(Stage::Patching);
        let outcome = self.patcher.patch(&record.record_id, &short_url).await;
        if !outcome.success {
            return self.fail(
                Stage::Patching,
                PipelineResult::PatchFailed {
                    http_status: outcome.status,
                    raw_body: outcome.body,
                },
            );
        }

        self.observer
            .pipeline_succeeded(&Completion {
                event,
                short_url: &short_url,
                record: &record,
            })
            .await;

        PipelineResult::Success {
            short_url,
            record_id: record.record_id,
            mode: record.mode,
        }
    }

    /// Rejects events without a payment URL or an order id; expects trimmed values.
    fn validate(&self, event: &WebhookEvent) -> Result<(), EventError> {
        if event.payment_url.is_empty() {
            return Err(EventError::MissingField {
                field: field::PAYMENT_URL,
                property: self.properties.payment_url.clone(),
            });
        }
        if event.order_id.is_empty() {
            return Err(EventError::MissingField {
                field: field::ORDER_ID,
                property: self.properties.order_id.clone(),
            });
        }
        Ok(())
    }

    fn fail(&self, stage: Stage, result: PipelineResult) -> PipelineResult {
        self.observer.stage_failed(stage, &result);
        result
    }
}

fn validation_failed(error: &EventError) -> PipelineResult {
    PipelineResult::ValidationFailed {
        reason: error.to_string(),
    }
}
