//! Write-only analytics sink abstraction.
//!
//! Events flow out of the playback core and are never read back into
//! decision-making, so the port exposes a single append operation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::error::DomainError;
use crate::event::DomainEvent;

/// Transport representation of an analytics event.
#[derive(Debug, Clone, Serialize)]
pub struct RecordedEvent {
    /// Unique event identifier.
    pub event_id: Uuid,
    /// Viewing session this event belongs to.
    pub session_id: Uuid,
    /// Event type name.
    pub event_type: String,
    /// Serialized event payload.
    pub payload: serde_json::Value,
    /// Sequence number within the session.
    pub sequence_number: i64,
    /// Correlation ID of the producing command.
    pub correlation_id: Uuid,
    /// Timestamp of event creation.
    pub occurred_at: DateTime<Utc>,
}

impl RecordedEvent {
    /// Flattens a domain event into its transport form.
    pub fn from_domain(event: &dyn DomainEvent) -> Self {
        let meta = event.metadata();
        Self {
            event_id: meta.event_id,
            session_id: meta.session_id,
            event_type: event.event_type().to_owned(),
            payload: event.to_payload(),
            sequence_number: meta.sequence_number,
            correlation_id: meta.correlation_id,
            occurred_at: meta.occurred_at,
        }
    }
}

/// Sink receiving analytics events in production order.
#[async_trait]
pub trait AnalyticsSink: Send + Sync {
    /// Append a batch of events.
    async fn record(&self, events: &[RecordedEvent]) -> Result<(), DomainError>;
}

/// A sink that drops everything. Used when no analytics transport is wired.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiscardingSink;

#[async_trait]
impl AnalyticsSink for DiscardingSink {
    async fn record(&self, _events: &[RecordedEvent]) -> Result<(), DomainError> {
        Ok(())
    }
}
