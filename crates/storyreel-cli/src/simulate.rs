//! Headless session walk.
//!
//! Drives the real session runtime with media that ends as soon as it
//! starts, answering each prompt from a scripted list of option ids.

use std::collections::HashSet;
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use storyreel_content::domain::scene::Scene;
use storyreel_content::domain::storyboard::Storyboard;
use storyreel_core::analytics::{AnalyticsSink, RecordedEvent};
use storyreel_core::clock::SystemClock;
use storyreel_core::error::DomainError;
use storyreel_core::media::{EndedSignal, MediaPort, MediaRequest, MediaStart};
use storyreel_playback::application::query_handlers::PlaybackView;
use storyreel_playback::application::runtime::{PlaybackSession, SessionOptions};
use storyreel_playback::domain::controller::{PlaybackController, PlaybackMode};
use uuid::Uuid;

/// Writes each analytics event to stdout as one JSON line.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonLinesSink;

#[async_trait]
impl AnalyticsSink for JsonLinesSink {
    async fn record(&self, events: &[RecordedEvent]) -> Result<(), DomainError> {
        let mut out = std::io::stdout().lock();
        for event in events {
            let line = serde_json::to_string(event)
                .map_err(|e| DomainError::Infrastructure(format!("event serialization failed: {e}")))?;
            writeln!(out, "{line}")
                .map_err(|e| DomainError::Infrastructure(format!("stdout write failed: {e}")))?;
        }
        Ok(())
    }
}

/// Media that reports its end immediately.
#[derive(Debug, Clone, Copy, Default)]
pub struct InstantMediaPort;

#[async_trait]
impl MediaPort for InstantMediaPort {
    async fn attempt_start(&self, request: &MediaRequest, ended: EndedSignal) -> MediaStart {
        tracing::debug!(scene_id = %request.scene_id, "media started");
        ended.notify();
        MediaStart::Started
    }

    fn stop(&self) {}
}

/// Plays the storyboard from its entry scene to the end of a path.
///
/// `choices` are taken at successive prompts; once exhausted, each prompt
/// takes its default option.
///
/// # Errors
///
/// Returns `DomainError::SceneNotFound` if the entry scene does not resolve,
/// `DomainError::Validation` if a scripted option is not offered at its
/// prompt, and `DomainError::Infrastructure` if the session task fails.
pub async fn run_simulation(
    storyboard: Arc<Storyboard>,
    sink: Arc<dyn AnalyticsSink>,
    choices: &[String],
    click_cta: bool,
) -> Result<PlaybackView, DomainError> {
    let controller = PlaybackController::new(Uuid::new_v4(), Arc::clone(&storyboard))?;
    let options = SessionOptions {
        reveal_delay: Duration::ZERO,
        autoplay: true,
        ..SessionOptions::default()
    };
    let (session, handle) =
        PlaybackSession::new(controller, Arc::new(SystemClock), sink, Arc::new(InstantMediaPort), options);
    let mut views = handle.subscribe();
    let driver = tokio::spawn(session.run());

    let mut scripted = choices.iter();
    let mut answered: HashSet<(String, usize)> = HashSet::new();
    let mut failure = None;
    let mut wrapped_up = false;

    while views.changed().await.is_ok() {
        let view = views.borrow_and_update().clone();
        match view.mode {
            PlaybackMode::ChoicePending => {
                let Some(prompt) = &view.prompt else {
                    continue;
                };
                if !answered.insert((view.scene_id.clone(), view.history.len())) {
                    continue;
                }
                let index = match scripted.next() {
                    Some(option_id) => prompt.options.iter().position(|o| &o.id == option_id),
                    None => storyboard
                        .resolve(&view.scene_id)
                        .and_then(Scene::choice_point)
                        .map(|point| point.default_option_index),
                };
                match index {
                    Some(index) => {
                        handle.select(index);
                    }
                    None => {
                        failure = Some(DomainError::Validation(format!(
                            "scripted choice is not offered at prompt {}",
                            view.scene_id
                        )));
                        handle.shutdown();
                    }
                }
            }
            PlaybackMode::Finished if !wrapped_up => {
                wrapped_up = true;
                if click_cta {
                    handle.click_call_to_action();
                }
                handle.shutdown();
            }
            PlaybackMode::Finished
            | PlaybackMode::Idle
            | PlaybackMode::Playing
            | PlaybackMode::Paused => {}
        }
    }

    let view = driver
        .await
        .map_err(|e| DomainError::Infrastructure(format!("session task failed: {e}")))?;
    match failure {
        Some(error) => Err(error),
        None => Ok(view),
    }
}
