// ============================================================================
// Event Errors
// ============================================================================

/// Rejections raised before an event command reaches the bus
#[derive(Debug, thiserror::Error)]
pub enum CommandValidationError {
    #[error("Event {0} has ticket sales, its organizer and prices can not be changed")]
    TicketSalesBlocked(String),

    #[error("Could not verify ticket sales for event {event_id}")]
    OracleUnavailable {
        event_id: String,
        source: anyhow::Error,
    },
}

impl CommandValidationError {
    /// Label value for the rejected commands metric
    pub fn reason(&self) -> &'static str {
        match self {
            CommandValidationError::TicketSalesBlocked(_) => "ticket_sales",
            CommandValidationError::OracleUnavailable { .. } => "oracle_unavailable",
        }
    }
}

/// Read model situations in which the label sync has nothing to work with
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum SyncError {
    #[error("Event with id {0} not found in injected DocumentRepository!")]
    EventNotFound(String),

    #[error("Found no organizer, or no organizer labels, on event {0}")]
    NoOrganizerLabels(String),
}
