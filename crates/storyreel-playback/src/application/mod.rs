//! Application services for playback.

pub mod command_handlers;
pub mod query_handlers;
pub mod runtime;
pub mod timer;
