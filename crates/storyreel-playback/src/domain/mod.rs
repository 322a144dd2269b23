//! Domain model for playback.

pub mod choice_timer;
pub mod commands;
pub mod completion;
pub mod controller;
pub mod events;
