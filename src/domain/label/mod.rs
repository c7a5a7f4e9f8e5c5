// ============================================================================
// Label Domain - UiTPAS labels and the vocabulary they come from
// ============================================================================

pub mod value_objects;
pub mod vocabulary;
pub mod delta;

pub use value_objects::*;
pub use vocabulary::*;
pub use delta::*;
