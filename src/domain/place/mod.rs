// ============================================================================
// Place Domain
// ============================================================================
//
// Only the commands that the ticket sales validator has to tell apart from
// event commands.
//
// ============================================================================

pub mod commands;

pub use commands::*;
