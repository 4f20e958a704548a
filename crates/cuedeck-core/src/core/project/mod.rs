//! Session Management Module
//!
//! Handles the multi-track editing session and its snapshot persistence.

mod session;
pub mod snapshot;

pub use session::*;
pub use snapshot::{SessionSnapshot, SNAPSHOT_VERSION};
