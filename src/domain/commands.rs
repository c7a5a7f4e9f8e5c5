use serde::{Deserialize, Serialize};

use super::event::EventCommand;
use super::place::PlaceCommand;

// ============================================================================
// Command - every command that travels over the command bus
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "aggregate", content = "payload")]
pub enum Command {
    Event(EventCommand),
    Place(PlaceCommand),
}

impl Command {
    /// Id of the aggregate the command targets, used as partition key
    pub fn target_id(&self) -> &str {
        match self {
            Command::Event(command) => command.event_id(),
            Command::Place(command) => command.place_id(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Command::Event(command) => command.name(),
            Command::Place(command) => command.name(),
        }
    }
}

impl From<EventCommand> for Command {
    fn from(command: EventCommand) -> Self {
        Command::Event(command)
    }
}

impl From<PlaceCommand> for Command {
    fn from(command: PlaceCommand) -> Self {
        Command::Place(command)
    }
}
