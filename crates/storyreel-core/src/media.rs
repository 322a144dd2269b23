//! Media port abstraction.
//!
//! The playback core never talks to an audio or video backend directly. A
//! presentation layer implements [`MediaPort`] and reports the natural end of
//! a scene's media through the [`EndedSignal`] it was handed.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

/// Outcome of attempting to start a scene's media.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaStart {
    /// Playback began; an end-of-media notification is expected.
    Started,
    /// Playback could not start (autoplay blocked, decode error).
    Failed,
}

/// One-shot notification that the media started for a scene has ended.
///
/// Cloning is cheap. Calling [`EndedSignal::notify`] more than once, or after
/// the scene has changed, is harmless: the receiver discards stale or
/// duplicate notifications.
#[derive(Clone)]
pub struct EndedSignal {
    notify: Arc<dyn Fn() + Send + Sync>,
}

impl EndedSignal {
    /// Wraps a notification callback.
    pub fn new(notify: impl Fn() + Send + Sync + 'static) -> Self {
        Self {
            notify: Arc::new(notify),
        }
    }

    /// Reports that the media has ended.
    pub fn notify(&self) {
        (self.notify)();
    }
}

impl fmt::Debug for EndedSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EndedSignal").finish_non_exhaustive()
    }
}

/// Describes the media to start for one scene.
#[derive(Debug, Clone)]
pub struct MediaRequest {
    /// Scene identifier; asset paths are derived from it by the port.
    pub scene_id: String,
    /// Whether the scene prefers a video presentation.
    pub prefers_video: bool,
    /// Nominal scene duration in seconds.
    pub duration_secs: f64,
}

/// Narrow interface to the audio/video backend.
#[async_trait]
pub trait MediaPort: Send + Sync {
    /// Attempts to start playback for a scene. `ended` must be notified when
    /// the media completes naturally.
    async fn attempt_start(&self, request: &MediaRequest, ended: EndedSignal) -> MediaStart;

    /// Stops whatever is playing. Called on pause, restart and scene change.
    fn stop(&self);
}
