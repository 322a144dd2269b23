//! Test sinks — mock `AnalyticsSink` implementations for tests.

use std::sync::Mutex;

use async_trait::async_trait;
use storyreel_core::analytics::{AnalyticsSink, RecordedEvent};
use storyreel_core::error::DomainError;

/// A sink that records every batch it receives.
#[derive(Debug, Default)]
pub struct RecordingAnalyticsSink {
    batches: Mutex<Vec<Vec<RecordedEvent>>>,
}

impl RecordingAnalyticsSink {
    /// Create an empty recording sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of every batch recorded, in order.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn batches(&self) -> Vec<Vec<RecordedEvent>> {
        self.batches.lock().unwrap().clone()
    }

    /// Returns every recorded event, flattened across batches.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn events(&self) -> Vec<RecordedEvent> {
        self.batches.lock().unwrap().iter().flatten().cloned().collect()
    }

    /// Returns the event type of every recorded event, in order.
    pub fn event_types(&self) -> Vec<String> {
        self.events().into_iter().map(|event| event.event_type).collect()
    }
}

#[async_trait]
impl AnalyticsSink for RecordingAnalyticsSink {
    async fn record(&self, events: &[RecordedEvent]) -> Result<(), DomainError> {
        self.batches.lock().unwrap().push(events.to_vec());
        Ok(())
    }
}

/// A sink that always returns an infrastructure error. Useful for testing
/// error-handling paths.
#[derive(Debug)]
pub struct FailingAnalyticsSink;

#[async_trait]
impl AnalyticsSink for FailingAnalyticsSink {
    async fn record(&self, _events: &[RecordedEvent]) -> Result<(), DomainError> {
        Err(DomainError::Infrastructure("analytics endpoint unreachable".into()))
    }
}
