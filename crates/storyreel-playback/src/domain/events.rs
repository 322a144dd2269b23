//! Analytics events for the playback context.

use serde::{Deserialize, Serialize};
use storyreel_core::event::{DomainEvent, EventMetadata};

/// Event type emitted when playback of a scene begins.
pub const SCENE_VIEWED_EVENT_TYPE: &str = "playback.scene_viewed";
/// Event type emitted when the viewer (or the countdown) picks an option.
pub const CHOICE_MADE_EVENT_TYPE: &str = "playback.choice_made";
/// Event type emitted when a path reaches its end.
pub const VIDEO_COMPLETED_EVENT_TYPE: &str = "playback.video_completed";
/// Event type emitted when the viewer follows the final call to action.
pub const CTA_CLICKED_EVENT_TYPE: &str = "playback.cta_clicked";

/// Emitted when playback of a scene begins.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneViewed {
    /// The scene being played.
    pub scene_id: String,
    /// Option ids chosen so far.
    pub viewer_path: Vec<String>,
}

/// Emitted when an option of a choice prompt is taken.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChoiceMade {
    /// The choice scene.
    pub scene_id: String,
    /// The option taken.
    pub choice_id: String,
    /// Option ids chosen before this one.
    pub viewer_path: Vec<String>,
}

/// Emitted when the current path has no successor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoCompleted {
    /// The final scene.
    pub scene_id: String,
    /// Option ids chosen along the path.
    pub viewer_path: Vec<String>,
}

/// Emitted when the viewer clicks the call to action after completion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallToActionClicked {
    /// The final scene.
    pub scene_id: String,
    /// Option ids chosen along the path.
    pub viewer_path: Vec<String>,
}

/// Event payload variants for the playback context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PlaybackEventKind {
    /// Playback of a scene began.
    SceneViewed(SceneViewed),
    /// A choice was made.
    ChoiceMade(ChoiceMade),
    /// The path ended.
    VideoCompleted(VideoCompleted),
    /// The call to action was clicked.
    CallToActionClicked(CallToActionClicked),
}

impl PlaybackEventKind {
    /// Event type name for this payload.
    #[must_use]
    pub fn event_type(&self) -> &'static str {
        match self {
            PlaybackEventKind::SceneViewed(_) => SCENE_VIEWED_EVENT_TYPE,
            PlaybackEventKind::ChoiceMade(_) => CHOICE_MADE_EVENT_TYPE,
            PlaybackEventKind::VideoCompleted(_) => VIDEO_COMPLETED_EVENT_TYPE,
            PlaybackEventKind::CallToActionClicked(_) => CTA_CLICKED_EVENT_TYPE,
        }
    }

    /// The scene the event refers to.
    #[must_use]
    pub fn scene_id(&self) -> &str {
        match self {
            PlaybackEventKind::SceneViewed(payload) => &payload.scene_id,
            PlaybackEventKind::ChoiceMade(payload) => &payload.scene_id,
            PlaybackEventKind::VideoCompleted(payload) => &payload.scene_id,
            PlaybackEventKind::CallToActionClicked(payload) => &payload.scene_id,
        }
    }
}

/// Analytics event envelope for the playback context.
#[derive(Debug, Clone)]
pub struct PlaybackEvent {
    /// Event metadata.
    pub metadata: EventMetadata,
    /// Event-specific payload.
    pub kind: PlaybackEventKind,
}

impl DomainEvent for PlaybackEvent {
    fn event_type(&self) -> &'static str {
        self.kind.event_type()
    }

    fn to_payload(&self) -> serde_json::Value {
        // Serialization of derived Serialize types to Value is infallible.
        serde_json::to_value(&self.kind).expect("PlaybackEventKind serialization is infallible")
    }

    fn metadata(&self) -> &EventMetadata {
        &self.metadata
    }
}
