//! Storyreel Core — shared domain abstractions.
//!
//! This crate defines the fundamental traits and types that the content,
//! captions and playback crates depend on. It contains no runtime or
//! presentation code.

pub mod analytics;
pub mod clock;
pub mod command;
pub mod error;
pub mod event;
pub mod media;
