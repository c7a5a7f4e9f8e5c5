// ============================================================================
// Messaging Module
// ============================================================================
//
// Redpanda plumbing of the label sync:
// - consumer  - UiTPAS events in, handed to the process manager
// - redpanda  - producer and the command bus publishing event commands
//
// ============================================================================

mod consumer;
mod redpanda;

pub use consumer::{handle_message, EventConsumer, MessageOutcome};
pub use redpanda::{RedpandaClient, RedpandaCommandBus};
