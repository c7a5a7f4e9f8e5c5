// ============================================================================
// Offer Domain - value objects shared by events and places
// ============================================================================

pub mod value_objects;

pub use value_objects::*;
