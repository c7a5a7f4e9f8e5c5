// ============================================================================
// Event Domain - UiTPAS concerns of the event aggregate
// ============================================================================
//
// - Commands (AddLabel, RemoveLabel, UpdateOrganizer, UpdatePriceInfo)
// - Errors (CommandValidationError, SyncError)
// - Projection (the event JSON-LD as seen by the label sync)
// - Validation (ticket sales guard on organizer and price changes)
// - Process manager (label sync on card system updates)
//
// ============================================================================

pub mod commands;
pub mod errors;
pub mod projection;
pub mod validation;
pub mod process_manager;

pub use commands::*;
pub use errors::*;
pub use projection::*;
pub use validation::*;
pub use process_manager::*;
