//! Query handlers for the playback context.
//!
//! Builds the read-only snapshot a presentation layer renders from.

use serde::Serialize;
use storyreel_captions::{CaptionSegment, active_segment};
use uuid::Uuid;

use crate::domain::choice_timer::ChoiceTimer;
use crate::domain::controller::{PlaybackController, PlaybackMode};

/// Read-only view of one option of a showing prompt.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChoiceOptionView {
    /// Option identifier.
    pub id: String,
    /// Short label.
    pub label: String,
    /// Longer description.
    pub description: String,
}

/// Read-only view of a showing prompt.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChoicePromptView {
    /// The question.
    pub question: String,
    /// Options in display order.
    pub options: Vec<ChoiceOptionView>,
    /// Whole seconds left on the countdown.
    pub remaining_seconds: u32,
    /// The option the viewer picked, while its reveal delay runs.
    pub selected_index: Option<usize>,
}

/// Read-only snapshot of a playback session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaybackView {
    /// Session identifier.
    pub session_id: Uuid,
    /// Current scene.
    pub scene_id: String,
    /// Heading label for the current scene's kind.
    pub scene_label: &'static str,
    /// Current scene title.
    pub scene_title: String,
    /// Lifecycle mode.
    pub mode: PlaybackMode,
    /// The prompt, while one is showing.
    pub prompt: Option<ChoicePromptView>,
    /// Caption for the elapsed time, or the title when there is no narration.
    pub caption: String,
    /// Seconds of the current scene played.
    pub elapsed: f64,
    /// Fraction of the current scene played.
    pub progress: f64,
    /// Scenes entered after the entry scene.
    pub history: Vec<String>,
    /// Option ids taken.
    pub choices: Vec<String>,
    /// Summed duration of the viewed path.
    pub total_duration: f64,
}

/// Builds the snapshot for a session.
///
/// `timer` supplies the countdown while a prompt is showing; `captions` are
/// the segments of the current scene's narration.
#[must_use]
pub fn get_playback_view(
    controller: &PlaybackController,
    timer: Option<&ChoiceTimer>,
    captions: &[CaptionSegment],
) -> PlaybackView {
    let scene = controller.current_scene();

    let prompt = match (controller.is_choice_visible(), scene.choice_point()) {
        (true, Some(point)) => Some(ChoicePromptView {
            question: point.question.clone(),
            options: point
                .options
                .iter()
                .map(|option| ChoiceOptionView {
                    id: option.id.clone(),
                    label: option.label.clone(),
                    description: option.description.clone(),
                })
                .collect(),
            remaining_seconds: timer.map_or(point.timeout_seconds, ChoiceTimer::remaining_seconds),
            selected_index: timer.and_then(ChoiceTimer::selected_index),
        }),
        _ => None,
    };

    let caption = active_segment(captions, controller.elapsed())
        .and_then(|index| captions.get(index))
        .map_or_else(|| scene.title.clone(), |segment| segment.display_text().to_owned());

    PlaybackView {
        session_id: controller.id,
        scene_id: scene.id.clone(),
        scene_label: scene.kind.label(),
        scene_title: scene.title.clone(),
        mode: controller.mode(),
        prompt,
        caption,
        elapsed: controller.elapsed(),
        progress: controller.progress(),
        history: controller.history().to_vec(),
        choices: controller.choices().to_vec(),
        total_duration: controller.total_duration(),
    }
}
