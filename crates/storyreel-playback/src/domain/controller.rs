//! The playback state machine for one viewing session.

use std::sync::Arc;

use serde::Serialize;
use storyreel_content::domain::scene::Scene;
use storyreel_content::domain::storyboard::Storyboard;
use storyreel_content::domain::traversal::NextScene;
use storyreel_core::clock::Clock;
use storyreel_core::error::DomainError;
use storyreel_core::event::EventMetadata;
use uuid::Uuid;

use super::events::{
    CallToActionClicked, ChoiceMade, PlaybackEvent, PlaybackEventKind, SceneViewed,
    VideoCompleted,
};

/// Where the session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaybackMode {
    /// Loaded, not yet started.
    Idle,
    /// Media for the current scene is playing.
    Playing,
    /// Stopped by the viewer mid-scene.
    Paused,
    /// A choice prompt is showing.
    ChoicePending,
    /// The path has ended.
    Finished,
}

/// Whether an action changed the session.
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The action was valid in the current mode and took effect.
    Applied,
    /// The action was not valid in the current mode.
    Ignored,
}

impl Transition {
    /// Returns `true` if the action took effect.
    #[must_use]
    pub fn is_applied(self) -> bool {
        self == Transition::Applied
    }
}

/// The aggregate root for a viewing session.
///
/// `history` lists the scenes entered after the entry scene, in order;
/// `choices` lists the option ids taken. Both are cleared on restart.
#[derive(Debug)]
pub struct PlaybackController {
    /// Session identifier.
    pub id: Uuid,
    storyboard: Arc<Storyboard>,
    entry: Scene,
    pub(crate) current: Scene,
    pub(crate) mode: PlaybackMode,
    pub(crate) history: Vec<String>,
    pub(crate) choices: Vec<String>,
    pub(crate) elapsed: f64,
    pub(crate) scene_generation: u64,
    version: i64,
    uncommitted_events: Vec<PlaybackEvent>,
}

impl PlaybackController {
    /// Creates an idle session positioned at the entry scene.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::SceneNotFound` if the entry scene does not
    /// resolve.
    pub fn new(id: Uuid, storyboard: Arc<Storyboard>) -> Result<Self, DomainError> {
        let entry = storyboard
            .entry_scene()
            .cloned()
            .ok_or_else(|| DomainError::SceneNotFound(storyboard.entry_scene_id().to_owned()))?;
        Ok(Self {
            id,
            storyboard,
            current: entry.clone(),
            entry,
            mode: PlaybackMode::Idle,
            history: Vec::new(),
            choices: Vec::new(),
            elapsed: 0.0,
            scene_generation: 0,
            version: 0,
            uncommitted_events: Vec::new(),
        })
    }

    /// The content this session plays.
    #[must_use]
    pub fn storyboard(&self) -> &Arc<Storyboard> {
        &self.storyboard
    }

    /// The scene being presented.
    #[must_use]
    pub fn current_scene(&self) -> &Scene {
        &self.current
    }

    /// Lifecycle mode.
    #[must_use]
    pub fn mode(&self) -> PlaybackMode {
        self.mode
    }

    /// Scenes entered after the entry scene.
    #[must_use]
    pub fn history(&self) -> &[String] {
        &self.history
    }

    /// Option ids taken so far.
    #[must_use]
    pub fn choices(&self) -> &[String] {
        &self.choices
    }

    /// Seconds of the current scene played so far.
    #[must_use]
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Changes every time a scene is entered, including re-entry on restart.
    #[must_use]
    pub fn scene_generation(&self) -> u64 {
        self.scene_generation
    }

    /// Whether the choice prompt is showing.
    #[must_use]
    pub fn is_choice_visible(&self) -> bool {
        self.mode == PlaybackMode::ChoicePending
    }

    /// Fraction of the current scene played, in `0.0..=1.0`.
    #[must_use]
    pub fn progress(&self) -> f64 {
        if self.current.duration > 0.0 {
            (self.elapsed / self.current.duration).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    /// The entry scene followed by the history.
    #[must_use]
    pub fn viewed_path(&self) -> Vec<String> {
        std::iter::once(self.entry.id.clone())
            .chain(self.history.iter().cloned())
            .collect()
    }

    /// Summed nominal duration of the viewed path.
    #[must_use]
    pub fn total_duration(&self) -> f64 {
        self.storyboard.path_duration(&self.viewed_path())
    }

    /// Events produced since the last drain.
    #[must_use]
    pub fn uncommitted_events(&self) -> &[PlaybackEvent] {
        &self.uncommitted_events
    }

    /// Removes and returns the pending events.
    #[allow(clippy::cast_possible_wrap)]
    pub fn take_uncommitted_events(&mut self) -> Vec<PlaybackEvent> {
        let events = std::mem::take(&mut self.uncommitted_events);
        self.version += events.len() as i64;
        events
    }

    /// Starts or resumes playback. Valid from `Idle` or `Paused`.
    pub fn play(&mut self, correlation_id: Uuid, clock: &dyn Clock) -> Transition {
        if !matches!(self.mode, PlaybackMode::Idle | PlaybackMode::Paused) {
            return self.ignore("play");
        }
        self.mode = PlaybackMode::Playing;
        let kind = PlaybackEventKind::SceneViewed(SceneViewed {
            scene_id: self.current.id.clone(),
            viewer_path: self.choices.clone(),
        });
        self.record(kind, correlation_id, clock);
        Transition::Applied
    }

    /// Pauses playback. Valid from `Playing`.
    pub fn pause(&mut self) -> Transition {
        if self.mode != PlaybackMode::Playing {
            return self.ignore("pause");
        }
        self.mode = PlaybackMode::Paused;
        Transition::Applied
    }

    /// Handles completion of the current scene's media. Valid from
    /// `Playing`.
    ///
    /// A choice scene opens its prompt. Otherwise the session moves to the
    /// linear successor, straight into its prompt if that is a choice
    /// scene, or finishes when there is none.
    pub fn advance(&mut self, correlation_id: Uuid, clock: &dyn Clock) -> Transition {
        if self.mode != PlaybackMode::Playing {
            return self.ignore("advance");
        }
        if self.current.is_choice() {
            self.mode = PlaybackMode::ChoicePending;
            return Transition::Applied;
        }

        let storyboard = Arc::clone(&self.storyboard);
        match storyboard.next(&self.current.id, None) {
            NextScene::Scene(next) => {
                let mode = if next.is_choice() {
                    PlaybackMode::ChoicePending
                } else {
                    PlaybackMode::Playing
                };
                self.enter_scene(next.clone());
                self.mode = mode;
                tracing::debug!(scene_id = %self.current.id, mode = ?self.mode, "scene entered");
            }
            NextScene::Terminus => self.finish(correlation_id, clock),
            NextScene::NotFound => {
                tracing::warn!(scene_id = %self.current.id, "successor does not resolve, ending path");
                self.finish(correlation_id, clock);
            }
        }
        Transition::Applied
    }

    /// Takes an option of the showing prompt and plays its target. Valid
    /// from `ChoicePending`, for an option of the current prompt whose
    /// target resolves.
    pub fn make_choice(
        &mut self,
        choice_id: &str,
        next_scene_id: &str,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Transition {
        if self.mode != PlaybackMode::ChoicePending {
            return self.ignore("make_choice");
        }
        let offered = self
            .current
            .choice_point()
            .is_some_and(|point| point.option(choice_id).is_some());
        if !offered {
            tracing::warn!(scene_id = %self.current.id, choice_id, "option not offered by prompt");
            return Transition::Ignored;
        }
        let Some(target) = self.storyboard.resolve(next_scene_id).cloned() else {
            tracing::warn!(scene_id = %self.current.id, next_scene_id, "choice target does not resolve");
            return Transition::Ignored;
        };

        let kind = PlaybackEventKind::ChoiceMade(ChoiceMade {
            scene_id: self.current.id.clone(),
            choice_id: choice_id.to_owned(),
            viewer_path: self.choices.clone(),
        });
        self.record(kind, correlation_id, clock);
        self.choices.push(choice_id.to_owned());
        self.enter_scene(target);
        self.mode = PlaybackMode::Playing;
        tracing::debug!(scene_id = %self.current.id, choice_id, "choice taken");
        Transition::Applied
    }

    /// Returns to the entry scene with empty history and choices. Pending
    /// events are discarded. Valid from any mode.
    pub fn restart(&mut self) -> Transition {
        self.enter_scene(self.entry.clone());
        self.history.clear();
        self.choices.clear();
        self.uncommitted_events.clear();
        self.mode = PlaybackMode::Idle;
        Transition::Applied
    }

    /// Records a click on the final call to action. Valid from `Finished`.
    pub fn click_call_to_action(&mut self, correlation_id: Uuid, clock: &dyn Clock) -> Transition {
        if self.mode != PlaybackMode::Finished {
            return self.ignore("click_call_to_action");
        }
        let kind = PlaybackEventKind::CallToActionClicked(CallToActionClicked {
            scene_id: self.current.id.clone(),
            viewer_path: self.choices.clone(),
        });
        self.record(kind, correlation_id, clock);
        Transition::Applied
    }

    /// Accumulates played time, capped at the scene duration. Valid from
    /// `Playing`.
    pub fn record_elapsed(&mut self, seconds: f64) -> Transition {
        if self.mode != PlaybackMode::Playing || !seconds.is_finite() || seconds <= 0.0 {
            return Transition::Ignored;
        }
        self.elapsed = (self.elapsed + seconds).min(self.current.duration.max(0.0));
        Transition::Applied
    }

    fn enter_scene(&mut self, scene: Scene) {
        self.history.push(scene.id.clone());
        self.current = scene;
        self.elapsed = 0.0;
        self.scene_generation += 1;
    }

    fn finish(&mut self, correlation_id: Uuid, clock: &dyn Clock) {
        self.mode = PlaybackMode::Finished;
        let kind = PlaybackEventKind::VideoCompleted(VideoCompleted {
            scene_id: self.current.id.clone(),
            viewer_path: self.choices.clone(),
        });
        self.record(kind, correlation_id, clock);
        tracing::info!(scene_id = %self.current.id, choices = self.choices.len(), "path finished");
    }

    fn ignore(&self, action: &'static str) -> Transition {
        tracing::debug!(action, mode = ?self.mode, scene_id = %self.current.id, "action ignored");
        Transition::Ignored
    }

    #[allow(clippy::cast_possible_wrap)]
    fn next_sequence_number(&self) -> i64 {
        self.version + self.uncommitted_events.len() as i64 + 1
    }

    fn record(&mut self, kind: PlaybackEventKind, correlation_id: Uuid, clock: &dyn Clock) {
        let event = PlaybackEvent {
            metadata: EventMetadata {
                event_id: Uuid::new_v4(),
                event_type: kind.event_type().to_owned(),
                session_id: self.id,
                sequence_number: self.next_sequence_number(),
                correlation_id,
                occurred_at: clock.now(),
            },
            kind,
        };
        self.uncommitted_events.push(event);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{TimeZone, Utc};
    use storyreel_content::application::loader::{ContentFormat, load_storyboard, parse_storyboard};
    use storyreel_content::domain::storyboard::Storyboard;
    use storyreel_core::event::DomainEvent;
    use storyreel_test_support::FixedClock;
    use storyreel_test_support::fixtures::{BRANCHING_STORYBOARD_YAML, LINEAR_STORYBOARD_YAML};
    use uuid::Uuid;

    use super::*;
    use crate::domain::events::{
        CHOICE_MADE_EVENT_TYPE, CTA_CLICKED_EVENT_TYPE, SCENE_VIEWED_EVENT_TYPE,
        VIDEO_COMPLETED_EVENT_TYPE,
    };

    fn clock() -> FixedClock {
        FixedClock(Utc.with_ymd_and_hms(2026, 3, 1, 9, 30, 0).unwrap())
    }

    fn branching() -> Arc<Storyboard> {
        load_storyboard(BRANCHING_STORYBOARD_YAML, ContentFormat::Yaml)
            .unwrap()
            .storyboard
    }

    fn linear() -> Arc<Storyboard> {
        load_storyboard(LINEAR_STORYBOARD_YAML, ContentFormat::Yaml)
            .unwrap()
            .storyboard
    }

    fn playing(storyboard: Arc<Storyboard>) -> PlaybackController {
        let mut controller = PlaybackController::new(Uuid::new_v4(), storyboard).unwrap();
        assert!(controller.play(Uuid::new_v4(), &clock()).is_applied());
        controller.take_uncommitted_events();
        controller
    }

    fn event_types(controller: &PlaybackController) -> Vec<&'static str> {
        controller
            .uncommitted_events()
            .iter()
            .map(DomainEvent::event_type)
            .collect()
    }

    #[test]
    fn test_new_session_is_idle_at_entry() {
        let controller = PlaybackController::new(Uuid::new_v4(), branching()).unwrap();

        assert_eq!(controller.mode(), PlaybackMode::Idle);
        assert_eq!(controller.current_scene().id, "s01-hook");
        assert!(controller.history().is_empty());
        assert!(controller.choices().is_empty());
        assert!(!controller.is_choice_visible());
    }

    #[test]
    fn test_new_session_with_unresolvable_entry_fails() {
        let source = LINEAR_STORYBOARD_YAML.replace("entrySceneId: s1", "entrySceneId: gone");
        let storyboard = parse_storyboard(&source, ContentFormat::Yaml).unwrap();

        let result = PlaybackController::new(Uuid::new_v4(), Arc::new(storyboard));

        assert!(matches!(result, Err(DomainError::SceneNotFound(id)) if id == "gone"));
    }

    #[test]
    fn test_play_produces_scene_viewed_event() {
        // Arrange
        let session_id = Uuid::new_v4();
        let correlation_id = Uuid::new_v4();
        let clock = clock();
        let mut controller = PlaybackController::new(session_id, linear()).unwrap();

        // Act
        let transition = controller.play(correlation_id, &clock);

        // Assert
        assert_eq!(transition, Transition::Applied);
        assert_eq!(controller.mode(), PlaybackMode::Playing);
        let events = controller.uncommitted_events();
        assert_eq!(events.len(), 1);
        let event = &events[0];
        assert_eq!(event.event_type(), SCENE_VIEWED_EVENT_TYPE);
        assert_eq!(event.metadata.session_id, session_id);
        assert_eq!(event.metadata.correlation_id, correlation_id);
        assert_eq!(event.metadata.sequence_number, 1);
        assert_eq!(event.metadata.occurred_at, clock.0);
        assert_eq!(event.kind.scene_id(), "s1");
    }

    #[test]
    fn test_pause_and_resume() {
        // Arrange
        let mut controller = playing(linear());

        // Act
        let paused = controller.pause();
        let paused_again = controller.pause();
        let resumed = controller.play(Uuid::new_v4(), &clock());

        // Assert
        assert_eq!(paused, Transition::Applied);
        assert_eq!(paused_again, Transition::Ignored);
        assert_eq!(resumed, Transition::Applied);
        assert_eq!(controller.mode(), PlaybackMode::Playing);
    }

    #[test]
    fn test_play_is_ignored_while_playing() {
        let mut controller = playing(linear());

        let transition = controller.play(Uuid::new_v4(), &clock());

        assert_eq!(transition, Transition::Ignored);
        assert!(controller.uncommitted_events().is_empty());
    }

    #[test]
    fn test_advance_follows_linear_successors_then_finishes() {
        // Arrange
        let mut controller = playing(linear());
        let clock = clock();

        // Act
        let first = controller.advance(Uuid::new_v4(), &clock);
        let second = controller.advance(Uuid::new_v4(), &clock);
        let third = controller.advance(Uuid::new_v4(), &clock);

        // Assert
        assert!(first.is_applied() && second.is_applied() && third.is_applied());
        assert_eq!(controller.mode(), PlaybackMode::Finished);
        assert_eq!(controller.current_scene().id, "s3");
        assert_eq!(controller.history(), ["s2", "s3"]);
        assert_eq!(event_types(&controller), vec![VIDEO_COMPLETED_EVENT_TYPE]);
        assert_eq!(controller.viewed_path(), vec!["s1", "s2", "s3"]);
        assert!((controller.total_duration() - 85.0).abs() < 1e-9);
    }

    #[test]
    fn test_advance_is_ignored_unless_playing() {
        let mut controller = PlaybackController::new(Uuid::new_v4(), linear()).unwrap();

        assert_eq!(controller.advance(Uuid::new_v4(), &clock()), Transition::Ignored);
        assert_eq!(controller.current_scene().id, "s1");
    }

    #[test]
    fn test_advance_into_choice_scene_opens_prompt() {
        // Arrange
        let mut controller = playing(branching());
        let clock = clock();

        // Act
        let _ = controller.advance(Uuid::new_v4(), &clock);
        let _ = controller.advance(Uuid::new_v4(), &clock);

        // Assert
        assert_eq!(controller.current_scene().id, "cp1");
        assert_eq!(controller.mode(), PlaybackMode::ChoicePending);
        assert!(controller.is_choice_visible());
        assert_eq!(controller.advance(Uuid::new_v4(), &clock), Transition::Ignored);
    }

    #[test]
    fn test_make_choice_records_event_and_plays_target() {
        // Arrange
        let mut controller = playing(branching());
        let clock = clock();
        let _ = controller.advance(Uuid::new_v4(), &clock);
        let _ = controller.advance(Uuid::new_v4(), &clock);

        // Act
        let transition = controller.make_choice("cp1_b", "s04b-risk", Uuid::new_v4(), &clock);

        // Assert
        assert_eq!(transition, Transition::Applied);
        assert_eq!(controller.mode(), PlaybackMode::Playing);
        assert_eq!(controller.current_scene().id, "s04b-risk");
        assert_eq!(controller.choices(), ["cp1_b"]);
        assert_eq!(controller.history(), ["s02-setup", "cp1", "s04b-risk"]);
        let events = controller.uncommitted_events();
        assert_eq!(events.len(), 1);
        match &events[0].kind {
            PlaybackEventKind::ChoiceMade(payload) => {
                assert_eq!(payload.scene_id, "cp1");
                assert_eq!(payload.choice_id, "cp1_b");
                assert!(payload.viewer_path.is_empty());
            }
            other => panic!("expected ChoiceMade, got {other:?}"),
        }
        assert_eq!(events[0].event_type(), CHOICE_MADE_EVENT_TYPE);
    }

    #[test]
    fn test_make_choice_is_ignored_outside_prompt() {
        let mut controller = playing(branching());

        let transition = controller.make_choice("cp1_a", "s04a-proof", Uuid::new_v4(), &clock());

        assert_eq!(transition, Transition::Ignored);
        assert_eq!(controller.current_scene().id, "s01-hook");
        assert!(controller.choices().is_empty());
    }

    #[test]
    fn test_make_choice_rejects_unknown_option_and_target() {
        // Arrange
        let mut controller = playing(branching());
        let clock = clock();
        let _ = controller.advance(Uuid::new_v4(), &clock);
        let _ = controller.advance(Uuid::new_v4(), &clock);

        // Act
        let unknown_option = controller.make_choice("cp9", "s04a-proof", Uuid::new_v4(), &clock);
        let unknown_target = controller.make_choice("cp1_a", "nowhere", Uuid::new_v4(), &clock);

        // Assert
        assert_eq!(unknown_option, Transition::Ignored);
        assert_eq!(unknown_target, Transition::Ignored);
        assert_eq!(controller.mode(), PlaybackMode::ChoicePending);
        assert!(controller.uncommitted_events().is_empty());
    }

    #[test]
    fn test_full_branch_finishes_with_choice_path() {
        // Arrange
        let mut controller = playing(branching());
        let clock = clock();
        let _ = controller.advance(Uuid::new_v4(), &clock);
        let _ = controller.advance(Uuid::new_v4(), &clock);
        let _ = controller.make_choice("cp1_a", "s04a-proof", Uuid::new_v4(), &clock);

        // Act
        let _ = controller.advance(Uuid::new_v4(), &clock);
        let _ = controller.advance(Uuid::new_v4(), &clock);
        let _ = controller.advance(Uuid::new_v4(), &clock);

        // Assert
        assert_eq!(controller.mode(), PlaybackMode::Finished);
        assert_eq!(controller.current_scene().id, "s10-final");
        assert_eq!(
            controller.viewed_path(),
            vec!["s01-hook", "s02-setup", "cp1", "s04a-proof", "s05a-proof", "s10-final"]
        );
        assert!((controller.total_duration() - 111.0).abs() < 1e-9);
        let completed = controller.uncommitted_events().last().unwrap();
        match &completed.kind {
            PlaybackEventKind::VideoCompleted(payload) => {
                assert_eq!(payload.viewer_path, vec!["cp1_a"]);
            }
            other => panic!("expected VideoCompleted, got {other:?}"),
        }
    }

    #[test]
    fn test_unresolvable_successor_finishes_session() {
        // Arrange
        let source = LINEAR_STORYBOARD_YAML.replace("{ sceneId: s1, next: s2 }", "{ sceneId: s1, next: s9 }");
        let storyboard = parse_storyboard(&source, ContentFormat::Yaml).unwrap();
        let mut controller = playing(Arc::new(storyboard));

        // Act
        let transition = controller.advance(Uuid::new_v4(), &clock());

        // Assert
        assert_eq!(transition, Transition::Applied);
        assert_eq!(controller.mode(), PlaybackMode::Finished);
        assert_eq!(controller.current_scene().id, "s1");
        assert_eq!(event_types(&controller), vec![VIDEO_COMPLETED_EVENT_TYPE]);
    }

    #[test]
    fn test_restart_returns_to_entry_with_clean_state() {
        // Arrange
        let mut controller = playing(branching());
        let clock = clock();
        let _ = controller.advance(Uuid::new_v4(), &clock);
        let _ = controller.advance(Uuid::new_v4(), &clock);
        let _ = controller.make_choice("cp1_c", "s04c-system", Uuid::new_v4(), &clock);
        let generation = controller.scene_generation();

        // Act
        let transition = controller.restart();

        // Assert
        assert_eq!(transition, Transition::Applied);
        assert_eq!(controller.mode(), PlaybackMode::Idle);
        assert_eq!(controller.current_scene().id, "s01-hook");
        assert!(controller.history().is_empty());
        assert!(controller.choices().is_empty());
        assert!(controller.uncommitted_events().is_empty());
        assert!(controller.scene_generation() > generation);
        assert_eq!(controller.viewed_path(), vec!["s01-hook"]);
    }

    fn assert_back_at_entry(controller: &PlaybackController, entry: &str) {
        assert_eq!(controller.mode(), PlaybackMode::Idle);
        assert_eq!(controller.current_scene().id, entry);
        assert!(controller.history().is_empty());
        assert!(controller.choices().is_empty());
        assert!(controller.uncommitted_events().is_empty());
        assert!(controller.elapsed().abs() < f64::EPSILON);
    }

    #[test]
    fn test_restart_from_paused_returns_to_entry() {
        // Arrange
        let mut controller = playing(linear());
        let clock = clock();
        let _ = controller.advance(Uuid::new_v4(), &clock);
        let _ = controller.record_elapsed(3.0);
        let _ = controller.pause();
        assert_eq!(controller.mode(), PlaybackMode::Paused);

        // Act
        let transition = controller.restart();

        // Assert
        assert_eq!(transition, Transition::Applied);
        assert_back_at_entry(&controller, "s1");
    }

    #[test]
    fn test_restart_from_choice_prompt_returns_to_entry() {
        // Arrange
        let mut controller = playing(branching());
        let clock = clock();
        let _ = controller.advance(Uuid::new_v4(), &clock);
        let _ = controller.advance(Uuid::new_v4(), &clock);
        assert_eq!(controller.mode(), PlaybackMode::ChoicePending);

        // Act
        let transition = controller.restart();

        // Assert
        assert_eq!(transition, Transition::Applied);
        assert_back_at_entry(&controller, "s01-hook");
        assert!(!controller.is_choice_visible());
    }

    #[test]
    fn test_restart_from_finished_returns_to_entry_and_plays_again() {
        // Arrange
        let mut controller = playing(linear());
        let clock = clock();
        for _ in 0..3 {
            let _ = controller.advance(Uuid::new_v4(), &clock);
        }
        assert_eq!(controller.mode(), PlaybackMode::Finished);

        // Act
        let transition = controller.restart();

        // Assert
        assert_eq!(transition, Transition::Applied);
        assert_back_at_entry(&controller, "s1");
        assert!(controller.play(Uuid::new_v4(), &clock).is_applied());
        assert_eq!(event_types(&controller), vec![SCENE_VIEWED_EVENT_TYPE]);
    }

    #[test]
    fn test_restart_from_idle_is_applied() {
        let mut controller = PlaybackController::new(Uuid::new_v4(), linear()).unwrap();

        assert_eq!(controller.restart(), Transition::Applied);
        assert_back_at_entry(&controller, "s1");
    }

    #[test]
    fn test_call_to_action_only_counts_after_finish() {
        // Arrange
        let mut controller = playing(linear());
        let clock = clock();
        let early = controller.click_call_to_action(Uuid::new_v4(), &clock);
        for _ in 0..3 {
            let _ = controller.advance(Uuid::new_v4(), &clock);
        }
        controller.take_uncommitted_events();

        // Act
        let clicked = controller.click_call_to_action(Uuid::new_v4(), &clock);

        // Assert
        assert_eq!(early, Transition::Ignored);
        assert_eq!(clicked, Transition::Applied);
        assert_eq!(event_types(&controller), vec![CTA_CLICKED_EVENT_TYPE]);
    }

    #[test]
    fn test_sequence_numbers_continue_after_drain() {
        let mut controller = playing(linear());
        let _ = controller.pause();

        let _ = controller.play(Uuid::new_v4(), &clock());

        assert_eq!(controller.uncommitted_events()[0].metadata.sequence_number, 2);
    }

    #[test]
    fn test_elapsed_accumulates_only_while_playing_and_caps() {
        // Arrange
        let mut controller = playing(linear());

        // Act
        let _ = controller.record_elapsed(7.0);
        let _ = controller.pause();
        let ignored = controller.record_elapsed(5.0);

        // Assert
        assert_eq!(ignored, Transition::Ignored);
        assert!((controller.elapsed() - 7.0).abs() < 1e-9);
        assert!((controller.progress() - 0.25).abs() < 1e-9);
        let _ = controller.play(Uuid::new_v4(), &clock());
        let _ = controller.record_elapsed(100.0);
        assert!((controller.elapsed() - 28.0).abs() < 1e-9);
        assert!((controller.progress() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_elapsed_resets_on_scene_change() {
        let mut controller = playing(linear());
        let _ = controller.record_elapsed(10.0);

        let _ = controller.advance(Uuid::new_v4(), &clock());

        assert!(controller.elapsed().abs() < f64::EPSILON);
        assert_eq!(controller.current_scene().id, "s2");
    }
}
