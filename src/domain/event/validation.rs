use std::sync::Arc;
use anyhow::{bail, Context, Result};
use async_trait::async_trait;

use crate::domain::commands::Command;
use crate::event_sourcing::CommandValidator;
use crate::metrics::Metrics;
use super::commands::EventCommand;
use super::errors::CommandValidationError;

// ============================================================================
// Ticket Sales Oracle - does UiTPAS sell tickets for an event?
// ============================================================================

#[async_trait]
pub trait TicketSalesOracle: Send + Sync {
    async fn has_ticket_sales(&self, event_id: &str) -> Result<bool>;
}

pub struct HttpTicketSalesOracle {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTicketSalesOracle {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn ticket_sales_url(&self, event_id: &str) -> String {
        format!("{}/uitpas/cultureevent/{}/hasticketsales", self.base_url, event_id)
    }
}

#[async_trait]
impl TicketSalesOracle for HttpTicketSalesOracle {
    async fn has_ticket_sales(&self, event_id: &str) -> Result<bool> {
        let url = self.ticket_sales_url(event_id);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("ticket sales request for event {} failed", event_id))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            bail!("UiTPAS API error ({}) for {}: {}", status, url, body);
        }

        response
            .json::<bool>()
            .await
            .context("parse ticket sales response")
    }
}

// ============================================================================
// Event Has Ticket Sales Validator
// ============================================================================
//
// Once UiTPAS sells tickets for an event, its organizer and prices are
// locked. Only event commands are inspected; place commands with the same
// shape pass untouched and never reach the oracle.
//
// ============================================================================

pub struct EventHasTicketSalesValidator {
    oracle: Arc<dyn TicketSalesOracle>,
    metrics: Option<Arc<Metrics>>,
}

impl EventHasTicketSalesValidator {
    pub fn new(oracle: Arc<dyn TicketSalesOracle>) -> Self {
        Self { oracle, metrics: None }
    }

    /// Count rejections in `commands_rejected_total`
    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub async fn validate(&self, command: &Command) -> Result<(), CommandValidationError> {
        let result = self.check(command).await;

        if let (Err(rejection), Some(metrics)) = (&result, &self.metrics) {
            metrics.record_command_rejected(command.name(), rejection.reason());
        }

        result
    }

    async fn check(&self, command: &Command) -> Result<(), CommandValidationError> {
        let event_id = match command {
            Command::Event(EventCommand::UpdateOrganizer { event_id, .. })
            | Command::Event(EventCommand::UpdatePriceInfo { event_id, .. }) => event_id,
            _ => return Ok(()),
        };

        let has_ticket_sales = self
            .oracle
            .has_ticket_sales(event_id)
            .await
            .map_err(|source| CommandValidationError::OracleUnavailable {
                event_id: event_id.clone(),
                source,
            })?;

        if has_ticket_sales {
            tracing::info!(
                event_id = %event_id,
                command = command.name(),
                "Blocked command on event with ticket sales"
            );
            return Err(CommandValidationError::TicketSalesBlocked(event_id.clone()));
        }

        Ok(())
    }
}

#[async_trait]
impl CommandValidator<Command> for EventHasTicketSalesValidator {
    async fn validate(&self, command: &Command) -> Result<()> {
        EventHasTicketSalesValidator::validate(self, command).await?;
        Ok(())
    }
}
