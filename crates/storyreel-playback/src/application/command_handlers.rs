//! Command handlers for the playback context.
//!
//! Each handler applies a command to the session aggregate and forwards the
//! resulting analytics events to the sink.

use storyreel_core::analytics::{AnalyticsSink, RecordedEvent};
use storyreel_core::clock::Clock;
use storyreel_core::command::Command;
use storyreel_core::error::DomainError;

use crate::domain::commands::{AdvanceScene, ClickCallToAction, MakeChoice, Pause, Play, Restart};
use crate::domain::controller::{PlaybackController, Transition};

/// Result of handling one command.
#[derive(Debug)]
pub struct CommandOutcome {
    /// Whether the command took effect.
    pub transition: Transition,
    /// Events forwarded to the sink.
    pub recorded_events: Vec<RecordedEvent>,
}

async fn commit(
    command: &dyn Command,
    transition: Transition,
    controller: &mut PlaybackController,
    sink: &dyn AnalyticsSink,
) -> Result<CommandOutcome, DomainError> {
    let recorded_events: Vec<RecordedEvent> = controller
        .take_uncommitted_events()
        .iter()
        .map(|event| RecordedEvent::from_domain(event))
        .collect();

    tracing::debug!(
        command = command.command_type(),
        correlation_id = %command.correlation_id(),
        session_id = %controller.id,
        applied = transition.is_applied(),
        events = recorded_events.len(),
        "command handled"
    );

    if !recorded_events.is_empty() {
        sink.record(&recorded_events).await?;
    }

    Ok(CommandOutcome {
        transition,
        recorded_events,
    })
}

/// Handles the `Play` command.
///
/// # Errors
///
/// Returns `DomainError` if the analytics sink rejects the events.
pub async fn handle_play(
    command: &Play,
    controller: &mut PlaybackController,
    clock: &dyn Clock,
    sink: &dyn AnalyticsSink,
) -> Result<CommandOutcome, DomainError> {
    let transition = controller.play(command.correlation_id, clock);
    commit(command, transition, controller, sink).await
}

/// Handles the `Pause` command.
///
/// # Errors
///
/// Returns `DomainError` if the analytics sink rejects the events.
pub async fn handle_pause(
    command: &Pause,
    controller: &mut PlaybackController,
    sink: &dyn AnalyticsSink,
) -> Result<CommandOutcome, DomainError> {
    let transition = controller.pause();
    commit(command, transition, controller, sink).await
}

/// Handles the `AdvanceScene` command.
///
/// # Errors
///
/// Returns `DomainError` if the analytics sink rejects the events.
pub async fn handle_advance_scene(
    command: &AdvanceScene,
    controller: &mut PlaybackController,
    clock: &dyn Clock,
    sink: &dyn AnalyticsSink,
) -> Result<CommandOutcome, DomainError> {
    let transition = controller.advance(command.correlation_id, clock);
    commit(command, transition, controller, sink).await
}

/// Handles the `MakeChoice` command.
///
/// # Errors
///
/// Returns `DomainError` if the analytics sink rejects the events.
pub async fn handle_make_choice(
    command: &MakeChoice,
    controller: &mut PlaybackController,
    clock: &dyn Clock,
    sink: &dyn AnalyticsSink,
) -> Result<CommandOutcome, DomainError> {
    let transition = controller.make_choice(
        &command.choice_id,
        &command.next_scene_id,
        command.correlation_id,
        clock,
    );
    commit(command, transition, controller, sink).await
}

/// Handles the `Restart` command.
///
/// # Errors
///
/// Returns `DomainError` if the analytics sink rejects the events.
pub async fn handle_restart(
    command: &Restart,
    controller: &mut PlaybackController,
    sink: &dyn AnalyticsSink,
) -> Result<CommandOutcome, DomainError> {
    let transition = controller.restart();
    commit(command, transition, controller, sink).await
}

/// Handles the `ClickCallToAction` command.
///
/// # Errors
///
/// Returns `DomainError` if the analytics sink rejects the events.
pub async fn handle_click_call_to_action(
    command: &ClickCallToAction,
    controller: &mut PlaybackController,
    clock: &dyn Clock,
    sink: &dyn AnalyticsSink,
) -> Result<CommandOutcome, DomainError> {
    let transition = controller.click_call_to_action(command.correlation_id, clock);
    commit(command, transition, controller, sink).await
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{TimeZone, Utc};
    use storyreel_content::application::loader::{ContentFormat, load_storyboard};
    use storyreel_core::error::DomainError;
    use storyreel_test_support::fixtures::{BRANCHING_STORYBOARD_YAML, LINEAR_STORYBOARD_YAML};
    use storyreel_test_support::{FailingAnalyticsSink, FixedClock, RecordingAnalyticsSink};
    use uuid::Uuid;

    use crate::application::command_handlers::{
        handle_advance_scene, handle_click_call_to_action, handle_make_choice, handle_pause,
        handle_play, handle_restart,
    };
    use crate::domain::commands::{
        AdvanceScene, ClickCallToAction, MakeChoice, Pause, Play, Restart,
    };
    use crate::domain::controller::{PlaybackController, PlaybackMode, Transition};

    fn controller(source: &str) -> PlaybackController {
        let loaded = load_storyboard(source, ContentFormat::Yaml).unwrap();
        PlaybackController::new(Uuid::new_v4(), Arc::clone(&loaded.storyboard)).unwrap()
    }

    #[tokio::test]
    async fn test_handle_play_records_scene_viewed_event() {
        // Arrange
        let correlation_id = Uuid::new_v4();
        let fixed_now = Utc.with_ymd_and_hms(2026, 3, 1, 9, 30, 0).unwrap();
        let clock = FixedClock(fixed_now);
        let sink = RecordingAnalyticsSink::new();
        let mut controller = controller(LINEAR_STORYBOARD_YAML);
        let session_id = controller.id;

        // Act
        let outcome = handle_play(&Play { correlation_id }, &mut controller, &clock, &sink)
            .await
            .unwrap();

        // Assert
        assert_eq!(outcome.transition, Transition::Applied);
        let batches = sink.batches();
        assert_eq!(batches.len(), 1);
        let recorded = &batches[0][0];
        assert_eq!(recorded.event_type, "playback.scene_viewed");
        assert_eq!(recorded.session_id, session_id);
        assert_eq!(recorded.sequence_number, 1);
        assert_eq!(recorded.correlation_id, correlation_id);
        assert_eq!(recorded.occurred_at, fixed_now);
        assert_eq!(recorded.payload["SceneViewed"]["scene_id"], "s1");
    }

    #[tokio::test]
    async fn test_ignored_command_sends_nothing_to_sink() {
        // Arrange
        let clock = FixedClock(Utc::now());
        let sink = RecordingAnalyticsSink::new();
        let mut controller = controller(LINEAR_STORYBOARD_YAML);

        // Act
        let outcome = handle_advance_scene(
            &AdvanceScene {
                correlation_id: Uuid::new_v4(),
            },
            &mut controller,
            &clock,
            &sink,
        )
        .await
        .unwrap();

        // Assert
        assert_eq!(outcome.transition, Transition::Ignored);
        assert!(outcome.recorded_events.is_empty());
        assert!(sink.batches().is_empty());
    }

    #[tokio::test]
    async fn test_choice_path_emits_events_in_order() {
        // Arrange
        let clock = FixedClock(Utc::now());
        let sink = RecordingAnalyticsSink::new();
        let mut controller = controller(BRANCHING_STORYBOARD_YAML);
        let advance = AdvanceScene {
            correlation_id: Uuid::new_v4(),
        };
        handle_play(&Play { correlation_id: Uuid::new_v4() }, &mut controller, &clock, &sink)
            .await
            .unwrap();
        handle_advance_scene(&advance, &mut controller, &clock, &sink).await.unwrap();
        handle_advance_scene(&advance, &mut controller, &clock, &sink).await.unwrap();

        // Act
        let choice = MakeChoice {
            correlation_id: Uuid::new_v4(),
            choice_id: "cp1_c".to_owned(),
            next_scene_id: "s04c-system".to_owned(),
        };
        handle_make_choice(&choice, &mut controller, &clock, &sink).await.unwrap();
        handle_advance_scene(&advance, &mut controller, &clock, &sink).await.unwrap();
        handle_advance_scene(&advance, &mut controller, &clock, &sink).await.unwrap();
        handle_click_call_to_action(
            &ClickCallToAction {
                correlation_id: Uuid::new_v4(),
            },
            &mut controller,
            &clock,
            &sink,
        )
        .await
        .unwrap();

        // Assert
        assert_eq!(controller.mode(), PlaybackMode::Finished);
        assert_eq!(
            sink.event_types(),
            vec![
                "playback.scene_viewed",
                "playback.choice_made",
                "playback.video_completed",
                "playback.cta_clicked",
            ]
        );
        let sequence: Vec<i64> = sink.events().iter().map(|e| e.sequence_number).collect();
        assert_eq!(sequence, vec![1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn test_pause_and_restart_emit_no_events() {
        let clock = FixedClock(Utc::now());
        let sink = RecordingAnalyticsSink::new();
        let mut controller = controller(LINEAR_STORYBOARD_YAML);
        handle_play(&Play { correlation_id: Uuid::new_v4() }, &mut controller, &clock, &sink)
            .await
            .unwrap();

        let paused = handle_pause(&Pause { correlation_id: Uuid::new_v4() }, &mut controller, &sink)
            .await
            .unwrap();
        let restarted =
            handle_restart(&Restart { correlation_id: Uuid::new_v4() }, &mut controller, &sink)
                .await
                .unwrap();

        assert_eq!(paused.transition, Transition::Applied);
        assert_eq!(restarted.transition, Transition::Applied);
        assert_eq!(sink.event_types(), vec!["playback.scene_viewed"]);
        assert_eq!(controller.mode(), PlaybackMode::Idle);
    }

    #[tokio::test]
    async fn test_sink_failure_is_returned_after_transition() {
        // Arrange
        let clock = FixedClock(Utc::now());
        let mut controller = controller(LINEAR_STORYBOARD_YAML);

        // Act
        let result = handle_play(
            &Play {
                correlation_id: Uuid::new_v4(),
            },
            &mut controller,
            &clock,
            &FailingAnalyticsSink,
        )
        .await;

        // Assert
        assert!(matches!(result, Err(DomainError::Infrastructure(_))));
        assert_eq!(controller.mode(), PlaybackMode::Playing);
    }
}
