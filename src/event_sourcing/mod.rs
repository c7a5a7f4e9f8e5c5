// ============================================================================
// Event Sourcing Infrastructure
// ============================================================================
//
// Generic, reusable message and read model plumbing.
// Domain-specific code is in src/domain/
//
// ============================================================================

mod core;
mod read_model;

pub use self::core::*;
pub use self::read_model::*;
