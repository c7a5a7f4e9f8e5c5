use std::sync::Arc;
use std::time::Duration;
use anyhow::{Context, Result};
use async_trait::async_trait;
use rdkafka::{
    producer::{FutureProducer, FutureRecord},
    config::ClientConfig,
};

use crate::domain::Command;
use crate::event_sourcing::CommandBus;
use crate::metrics::Metrics;
use crate::utils::{retry_with_backoff, CircuitBreaker, CircuitBreakerConfig, CircuitBreakerError, RetryConfig};

// ============================================================================
// Redpanda Client - producer guarded by a circuit breaker
// ============================================================================

pub struct RedpandaClient {
    producer: FutureProducer,
    circuit_breaker: CircuitBreaker,
}

impl RedpandaClient {
    pub fn new(brokers: &str) -> Result<Self> {
        let producer: FutureProducer = ClientConfig::new()
            .set("bootstrap.servers", brokers)
            .set("message.timeout.ms", "5000")
            .create()
            .context("failed to create Redpanda producer")?;

        Ok(Self {
            producer,
            circuit_breaker: CircuitBreaker::new("redpanda", CircuitBreakerConfig::default()),
        })
    }

    pub async fn publish(&self, topic: &str, key: &str, payload: &str) -> Result<()> {
        let result = self
            .circuit_breaker
            .call(async {
                let record = FutureRecord::to(topic).key(key).payload(payload);

                self.producer
                    .send(record, rdkafka::util::Timeout::After(Duration::from_secs(5)))
                    .await
                    .map_err(|(e, _)| anyhow::anyhow!("Kafka send error: {}", e))?;

                Ok::<(), anyhow::Error>(())
            })
            .await;

        match result {
            Ok(()) => {
                tracing::debug!(topic = %topic, key = %key, "Published to Redpanda");
                Ok(())
            }
            Err(CircuitBreakerError::CircuitOpen) => {
                Err(anyhow::anyhow!("Circuit breaker open for Redpanda topic {}", topic))
            }
            Err(CircuitBreakerError::OperationFailed(e)) => Err(e),
        }
    }

    pub async fn circuit_state(&self) -> crate::utils::CircuitState {
        self.circuit_breaker.get_state().await
    }
}

// ============================================================================
// Redpanda Command Bus - commands as JSON on the commands topic
// ============================================================================
//
// Each command is keyed by the id of the aggregate it targets, so all
// commands for one event land on the same partition in dispatch order.
//
// ============================================================================

pub struct RedpandaCommandBus {
    client: Arc<RedpandaClient>,
    topic: String,
    retry_config: RetryConfig,
    metrics: Arc<Metrics>,
}

impl RedpandaCommandBus {
    pub fn new(client: Arc<RedpandaClient>, topic: impl Into<String>, metrics: Arc<Metrics>) -> Self {
        Self {
            client,
            topic: topic.into(),
            retry_config: RetryConfig::default(),
            metrics,
        }
    }
}

#[async_trait]
impl CommandBus<Command> for RedpandaCommandBus {
    async fn dispatch(&self, command: Command) -> Result<()> {
        let payload = serde_json::to_string(&command).context("failed to serialize command")?;
        let key = command.target_id();
        let (client, topic, body) = (&self.client, self.topic.as_str(), payload.as_str());

        let result = retry_with_backoff("publish_command", &self.retry_config, move |_attempt| {
            client.publish(topic, key, body)
        })
        .await;

        self.metrics
            .update_circuit_breaker_state(self.client.circuit_state().await.as_gauge());

        match result {
            Ok(()) => {
                self.metrics.record_command_dispatched(command.name());
                tracing::info!(
                    command = command.name(),
                    target_id = %key,
                    topic = %self.topic,
                    "Command published"
                );
                Ok(())
            }
            Err(e) => {
                self.metrics.record_command_rejected(command.name(), "publish_failed");
                Err(e.context(format!("failed to publish {} for {}", command.name(), key)))
            }
        }
    }
}
