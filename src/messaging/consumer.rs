use std::future::Future;
use std::sync::Arc;
use std::time::Instant;
use anyhow::{Context, Result};
use futures_util::StreamExt;
use rdkafka::config::ClientConfig;
use rdkafka::consumer::{CommitMode, Consumer, StreamConsumer};
use rdkafka::Message;

use crate::domain::card_system::UitpasEvent;
use crate::domain::event::EventProcessManager;
use crate::event_sourcing::{deserialize_event, EventEnvelope};
use crate::metrics::Metrics;
use crate::utils::{retry_with_backoff, RetryConfig};

// ============================================================================
// UiTPAS Event Consumer
// ============================================================================
//
// Reads `EventEnvelope<UitpasEvent>` JSON messages from the events topic and
// hands them to the process manager one at a time. Reading the vocabulary
// and the read model is retried with backoff; once commands are being
// dispatched a failure is final. A failed message is logged and skipped so
// it cannot block the partition. Offsets are committed after every message.
//
// ============================================================================

pub struct EventConsumer {
    consumer: StreamConsumer,
    process_manager: Arc<EventProcessManager>,
    metrics: Arc<Metrics>,
    retry_config: RetryConfig,
}

/// What happened to a single message
#[derive(Debug, PartialEq)]
pub enum MessageOutcome {
    Handled,
    Failed,
    Undecodable,
}

impl EventConsumer {
    pub fn new(
        brokers: &str,
        group_id: &str,
        topic: &str,
        process_manager: Arc<EventProcessManager>,
        metrics: Arc<Metrics>,
    ) -> Result<Self> {
        let consumer: StreamConsumer = ClientConfig::new()
            .set("bootstrap.servers", brokers)
            .set("group.id", group_id)
            .set("enable.auto.commit", "false")
            .set("auto.offset.reset", "earliest")
            .create()
            .context("failed to create Redpanda consumer")?;

        consumer
            .subscribe(&[topic])
            .with_context(|| format!("failed to subscribe to {}", topic))?;

        tracing::info!(topic = %topic, group_id = %group_id, "Subscribed to UiTPAS events");

        Ok(Self {
            consumer,
            process_manager,
            metrics,
            retry_config: RetryConfig::default(),
        })
    }

    /// Consume until `shutdown` resolves
    pub async fn run_until(self, shutdown: impl Future<Output = ()>) -> Result<()> {
        tokio::pin!(shutdown);
        let mut stream = self.consumer.stream();

        loop {
            let message = tokio::select! {
                _ = &mut shutdown => {
                    tracing::info!("Shutting down UiTPAS event consumer");
                    return Ok(());
                }
                message = stream.next() => message,
            };

            let Some(message) = message else {
                return Ok(());
            };

            let message = match message {
                Ok(message) => message,
                Err(e) => {
                    tracing::warn!(error = %e, "Error while receiving from Redpanda");
                    continue;
                }
            };

            let outcome = handle_message(
                &self.process_manager,
                &self.metrics,
                &self.retry_config,
                message.payload().unwrap_or_default(),
            )
            .await;

            tracing::debug!(
                partition = message.partition(),
                offset = message.offset(),
                outcome = ?outcome,
                "Processed message"
            );

            if let Err(e) = self.consumer.commit_message(&message, CommitMode::Async) {
                tracing::warn!(error = %e, offset = message.offset(), "Failed to commit offset");
            }
        }
    }
}

/// Decode one message payload and run it through the process manager
pub async fn handle_message(
    process_manager: &EventProcessManager,
    metrics: &Metrics,
    retry_config: &RetryConfig,
    payload: &[u8],
) -> MessageOutcome {
    let envelope = match std::str::from_utf8(payload)
        .context("payload is not UTF-8")
        .and_then(deserialize_event::<EventEnvelope<UitpasEvent>>)
    {
        Ok(envelope) => envelope,
        Err(e) => {
            metrics.record_undecodable_message();
            tracing::warn!(error = %e, "Skipping message that is not a UiTPAS event");
            return MessageOutcome::Undecodable;
        }
    };

    let started = Instant::now();
    let event = &envelope;
    let result = match retry_with_backoff("plan_label_sync", retry_config, move |_attempt| {
        process_manager.plan(event)
    })
    .await
    {
        // Dispatching is not repeated here, publish retries live in the command bus
        Ok(Some(sync)) => process_manager.apply(sync).await,
        Ok(None) => Ok(()),
        Err(e) => Err(e),
    };
    let duration = started.elapsed().as_secs_f64();

    match result {
        Ok(()) => {
            metrics.record_event(&envelope.event_type, duration, true);
            MessageOutcome::Handled
        }
        Err(e) => {
            metrics.record_event(&envelope.event_type, duration, false);
            tracing::error!(
                event_id = %envelope.event_id,
                aggregate_id = %envelope.aggregate_id,
                error = ?e,
                "Giving up on UiTPAS event"
            );
            MessageOutcome::Failed
        }
    }
}
