//! CueDeck Core Engine
//!
//! Core editing engine module.
//! Handles parsing, cue editing, history and session management.

pub mod captions;
pub mod commands;
pub mod fs;
pub mod history;
pub mod project;
pub mod settings;
pub mod timeline;

// Re-export common types
mod types;
pub use types::*;

mod error;
pub use error::*;

#[cfg(test)]
mod tests_scenarios;
