use serde::{Deserialize, Serialize};

use crate::event_sourcing::DomainEvent;
use super::value_objects::CardSystems;

// ============================================================================
// UiTPAS Events - consumed from the UiTPAS event stream
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum UitpasEvent {
    EventCardSystemsUpdated(EventCardSystemsUpdated),
}

impl DomainEvent for UitpasEvent {
    fn event_name(&self) -> &'static str {
        match self {
            UitpasEvent::EventCardSystemsUpdated(_) => "EventCardSystemsUpdated",
        }
    }
}

/// The complete set of card systems of an event was replaced
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct EventCardSystemsUpdated {
    pub event_id: String,
    pub card_systems: CardSystems,
}

impl EventCardSystemsUpdated {
    pub fn new(event_id: impl Into<String>, card_systems: CardSystems) -> Self {
        Self {
            event_id: event_id.into(),
            card_systems,
        }
    }
}
