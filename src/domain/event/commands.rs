use serde::{Deserialize, Serialize};

use crate::domain::label::Label;
use crate::domain::offer::PriceInfo;

// ============================================================================
// Event Commands - Represent intent on an event aggregate
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command")]
pub enum EventCommand {
    AddLabel {
        event_id: String,
        label: Label,
    },
    RemoveLabel {
        event_id: String,
        label: Label,
    },
    UpdateOrganizer {
        event_id: String,
        organizer_id: String,
    },
    UpdatePriceInfo {
        event_id: String,
        price_info: PriceInfo,
    },
}

impl EventCommand {
    pub fn add_label(event_id: impl Into<String>, label: Label) -> Self {
        EventCommand::AddLabel {
            event_id: event_id.into(),
            label,
        }
    }

    pub fn remove_label(event_id: impl Into<String>, label: Label) -> Self {
        EventCommand::RemoveLabel {
            event_id: event_id.into(),
            label,
        }
    }

    pub fn event_id(&self) -> &str {
        match self {
            EventCommand::AddLabel { event_id, .. }
            | EventCommand::RemoveLabel { event_id, .. }
            | EventCommand::UpdateOrganizer { event_id, .. }
            | EventCommand::UpdatePriceInfo { event_id, .. } => event_id,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            EventCommand::AddLabel { .. } => "AddLabel",
            EventCommand::RemoveLabel { .. } => "RemoveLabel",
            EventCommand::UpdateOrganizer { .. } => "UpdateOrganizer",
            EventCommand::UpdatePriceInfo { .. } => "UpdatePriceInfo",
        }
    }
}
