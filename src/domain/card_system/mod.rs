// ============================================================================
// Card System Domain - UiTPAS card systems linked to events
// ============================================================================

pub mod value_objects;
pub mod events;

pub use value_objects::*;
pub use events::*;
