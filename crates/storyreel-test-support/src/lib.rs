//! Shared test mocks and fixtures for the Storyreel player.

mod analytics;
mod clock;
pub mod fixtures;
mod media;

pub use analytics::{FailingAnalyticsSink, RecordingAnalyticsSink};
pub use clock::FixedClock;
pub use media::ScriptedMediaPort;
