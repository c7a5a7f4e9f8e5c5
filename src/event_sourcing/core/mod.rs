// ============================================================================
// Event Sourcing Core - Generic Infrastructure Abstractions
// ============================================================================
//
// Generic message plumbing shared by every domain module:
// - Event envelopes as delivered by the bus
// - The command bus and command validator seams
//
// No domain-specific code (no events, places, labels) lives here.
//
// ============================================================================

pub mod command;
pub mod event;

pub use command::{CommandBus, CommandValidator, ValidatingCommandBus};
pub use event::{DomainEvent, EventEnvelope, serialize_event, deserialize_event};
