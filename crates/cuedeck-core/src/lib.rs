//! CueDeck Core Library
//!
//! Subtitle timeline engine behind the CueDeck editor.
//! This library contains the caption data model, SRT/VTT codecs,
//! the cue editing algebra, per-track undo/redo history and the
//! session model that ties them together.
//!
//! The rendering layer (waveform, video playback, drag-and-drop) consumes
//! this crate through plain functions and the [`core::project::Session`]
//! object; nothing here performs UI or network work.

pub mod core;

pub use crate::core::{CoreError, CoreResult};
