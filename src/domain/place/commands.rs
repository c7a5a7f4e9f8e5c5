use serde::{Deserialize, Serialize};

use crate::domain::offer::PriceInfo;

// ============================================================================
// Place Commands
// ============================================================================
//
// Same shape as their event counterparts, but places never have ticket sales.
//
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command")]
pub enum PlaceCommand {
    UpdateOrganizer {
        place_id: String,
        organizer_id: String,
    },
    UpdatePriceInfo {
        place_id: String,
        price_info: PriceInfo,
    },
}

impl PlaceCommand {
    pub fn place_id(&self) -> &str {
        match self {
            PlaceCommand::UpdateOrganizer { place_id, .. }
            | PlaceCommand::UpdatePriceInfo { place_id, .. } => place_id,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            PlaceCommand::UpdateOrganizer { .. } => "UpdateOrganizer",
            PlaceCommand::UpdatePriceInfo { .. } => "UpdatePriceInfo",
        }
    }
}
