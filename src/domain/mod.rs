// ============================================================================
// Domain Layer - UiTPAS integration logic
// ============================================================================
//
// Each subdirectory groups the value objects, events, commands and
// handlers of one concept. This layer only talks to infrastructure through
// the traits in src/event_sourcing/ and the vocabulary/oracle traits.
//
// ============================================================================

pub mod commands;
pub mod card_system;
pub mod event;
pub mod label;
pub mod offer;
pub mod place;

pub use commands::Command;
