//! Storyreel — playback orchestration.
//!
//! Responsible for the playback state machine, choice countdowns, the
//! per-scene completion fallback, and the event loop that drives them from
//! media and timer signals.

pub mod application;
pub mod domain;
