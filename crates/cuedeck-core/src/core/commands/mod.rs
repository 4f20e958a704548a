//! Edit Command System
//!
//! Every cue edit the session performs is described by an [`EditCommand`]
//! and reported back as a [`CommandResult`].

mod edit;
mod result;

pub use edit::*;
pub use result::*;
