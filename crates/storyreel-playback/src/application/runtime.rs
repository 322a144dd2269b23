//! The playback session event loop.
//!
//! One task owns the controller and processes every input in arrival order:
//! viewer actions, end-of-media notifications, fallback deadlines, countdown
//! and playback ticks, and the selection reveal. Timers run as separate
//! tasks that only send signals back; they never touch session state.
//!
//! Scene-scoped signals carry the epoch or media generation they were issued
//! for, and the loop drops any that no longer match. All timers are
//! cancelled on pause, restart, scene change and shutdown.

use std::sync::Arc;
use std::time::Duration;

use storyreel_captions::{CaptionSegment, NarrationSegmenter};
use storyreel_core::analytics::AnalyticsSink;
use storyreel_core::clock::Clock;
use storyreel_core::error::DomainError;
use storyreel_core::media::{EndedSignal, MediaPort, MediaRequest, MediaStart};
use tokio::sync::{mpsc, watch};
use uuid::Uuid;

use crate::application::command_handlers::{
    CommandOutcome, handle_advance_scene, handle_click_call_to_action, handle_make_choice,
    handle_pause, handle_play, handle_restart,
};
use crate::application::query_handlers::{PlaybackView, get_playback_view};
use crate::application::timer::TimerHandle;
use crate::domain::choice_timer::{ChoiceResolution, ChoiceTimer};
use crate::domain::commands::{AdvanceScene, ClickCallToAction, MakeChoice, Pause, Play, Restart};
use crate::domain::completion::{CompletionFallback, FAILED_GRACE, STARTED_GRACE};
use crate::domain::controller::{PlaybackController, PlaybackMode};

/// Runtime tuning for a session.
#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// Added to the scene duration when media started.
    pub started_grace: Duration,
    /// Added to the scene duration when media failed to start.
    pub failed_grace: Duration,
    /// Delay between a viewer selection and the scene change. Zero hands off
    /// immediately.
    pub reveal_delay: Duration,
    /// Period of the elapsed-time tick while playing.
    pub tick_interval: Duration,
    /// Start playing as soon as the loop runs.
    pub autoplay: bool,
    /// Stop the loop once the path has finished.
    pub exit_on_finish: bool,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            started_grace: STARTED_GRACE,
            failed_grace: FAILED_GRACE,
            reveal_delay: ChoiceTimer::SELECTION_REVEAL_DELAY,
            tick_interval: Duration::from_millis(250),
            autoplay: false,
            exit_on_finish: false,
        }
    }
}

/// An action taken by the viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewerAction {
    /// Start or resume playback.
    Play,
    /// Hold the current scene.
    Pause,
    /// Pick the option at this position of the showing prompt.
    Select(usize),
    /// Return to the entry scene with an empty path.
    Restart,
    /// Follow the call to action once the path has finished.
    ClickCallToAction,
}

/// Inputs to the session loop.
#[derive(Debug)]
pub enum SessionSignal {
    /// Something the viewer did.
    Viewer(ViewerAction),
    /// The media started under this generation ended on its own.
    MediaEnded { generation: u64 },
    /// The completion fallback for this generation expired.
    FallbackDeadline { generation: u64 },
    /// One second of the choice countdown passed.
    CountdownTick { epoch: u64 },
    /// One tick of played time for this media generation.
    PlaybackTick { generation: u64 },
    /// The reveal delay after a viewer selection passed.
    SelectionRevealed {
        epoch: u64,
        resolution: ChoiceResolution,
    },
    /// Stop the loop.
    Shutdown,
}

/// Client side of a running session.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    signals: mpsc::UnboundedSender<SessionSignal>,
    view: watch::Receiver<PlaybackView>,
}

impl SessionHandle {
    /// Sends a viewer action. Returns `false` if the session has stopped.
    pub fn send(&self, action: ViewerAction) -> bool {
        self.signals.send(SessionSignal::Viewer(action)).is_ok()
    }

    /// Starts or resumes playback.
    pub fn play(&self) -> bool {
        self.send(ViewerAction::Play)
    }

    /// Pauses playback.
    pub fn pause(&self) -> bool {
        self.send(ViewerAction::Pause)
    }

    /// Picks an option of the showing prompt by position.
    pub fn select(&self, option_index: usize) -> bool {
        self.send(ViewerAction::Select(option_index))
    }

    /// Returns the session to the entry scene.
    pub fn restart(&self) -> bool {
        self.send(ViewerAction::Restart)
    }

    /// Reports a click on the closing call to action.
    pub fn click_call_to_action(&self) -> bool {
        self.send(ViewerAction::ClickCallToAction)
    }

    /// Asks the loop to stop.
    pub fn shutdown(&self) -> bool {
        self.signals.send(SessionSignal::Shutdown).is_ok()
    }

    /// The latest published snapshot.
    #[must_use]
    pub fn view(&self) -> PlaybackView {
        self.view.borrow().clone()
    }

    /// A receiver notified on every published snapshot.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<PlaybackView> {
        self.view.clone()
    }
}

#[derive(Debug, Default)]
struct SceneTimers {
    fallback: Option<TimerHandle>,
    playback: Option<TimerHandle>,
    countdown: Option<TimerHandle>,
    reveal: Option<TimerHandle>,
}

/// A playback session bound to its ports. Consumed by [`PlaybackSession::run`].
pub struct PlaybackSession {
    controller: PlaybackController,
    clock: Arc<dyn Clock>,
    sink: Arc<dyn AnalyticsSink>,
    media: Arc<dyn MediaPort>,
    options: SessionOptions,
    signals_tx: mpsc::UnboundedSender<SessionSignal>,
    signals_rx: mpsc::UnboundedReceiver<SessionSignal>,
    view_tx: watch::Sender<PlaybackView>,
    fallback: CompletionFallback,
    choice_timer: Option<ChoiceTimer>,
    captions: Vec<CaptionSegment>,
    timers: SceneTimers,
    seen_scene_generation: Option<u64>,
    media_generation: Option<u64>,
    epoch: u64,
}

impl PlaybackSession {
    /// Binds a controller to its ports and returns the session with a handle
    /// for driving it.
    #[must_use]
    pub fn new(
        controller: PlaybackController,
        clock: Arc<dyn Clock>,
        sink: Arc<dyn AnalyticsSink>,
        media: Arc<dyn MediaPort>,
        options: SessionOptions,
    ) -> (Self, SessionHandle) {
        let (signals_tx, signals_rx) = mpsc::unbounded_channel();
        let (view_tx, view_rx) = watch::channel(get_playback_view(&controller, None, &[]));
        let handle = SessionHandle {
            signals: signals_tx.clone(),
            view: view_rx,
        };

        let mut session = Self {
            controller,
            clock,
            sink,
            media,
            fallback: CompletionFallback::new(options.started_grace, options.failed_grace),
            options,
            signals_tx,
            signals_rx,
            view_tx,
            choice_timer: None,
            captions: Vec::new(),
            timers: SceneTimers::default(),
            seen_scene_generation: None,
            media_generation: None,
            epoch: 0,
        };
        session.enter_current_scene();
        session.publish();
        (session, handle)
    }

    /// Runs the loop until shutdown, or until the path finishes when
    /// `exit_on_finish` is set. Returns the final snapshot.
    pub async fn run(mut self) -> PlaybackView {
        tracing::info!(session_id = %self.controller.id, "playback session started");
        if self.options.autoplay {
            self.on_viewer(ViewerAction::Play).await;
            self.reconcile().await;
        }

        loop {
            if self.options.exit_on_finish && self.controller.mode() == PlaybackMode::Finished {
                break;
            }
            match self.signals_rx.recv().await {
                Some(SessionSignal::Shutdown) | None => break,
                Some(signal) => {
                    self.handle(signal).await;
                    self.reconcile().await;
                }
            }
        }

        self.halt_media();
        self.reset_timers();
        self.publish();
        tracing::info!(
            session_id = %self.controller.id,
            scene_id = %self.controller.current_scene().id,
            mode = ?self.controller.mode(),
            "playback session stopped"
        );
        self.view_tx.borrow().clone()
    }

    async fn handle(&mut self, signal: SessionSignal) {
        match signal {
            SessionSignal::Viewer(action) => self.on_viewer(action).await,
            SessionSignal::MediaEnded { generation } => {
                if self.fallback.on_media_ended(generation) {
                    self.timers.fallback = None;
                    self.advance().await;
                } else {
                    tracing::debug!(generation, "stale media end ignored");
                }
            }
            SessionSignal::FallbackDeadline { generation } => {
                if self.fallback.on_deadline(generation) {
                    tracing::warn!(
                        scene_id = %self.controller.current_scene().id,
                        "media end not reported, fallback advancing"
                    );
                    self.advance().await;
                } else {
                    tracing::debug!(generation, "stale fallback deadline ignored");
                }
            }
            SessionSignal::PlaybackTick { generation } => {
                if self.media_generation == Some(generation) {
                    let _ = self
                        .controller
                        .record_elapsed(self.options.tick_interval.as_secs_f64());
                }
            }
            SessionSignal::CountdownTick { epoch } => {
                if epoch != self.epoch {
                    tracing::debug!(epoch, "stale countdown tick ignored");
                    return;
                }
                if let Some(resolution) = self.choice_timer.as_mut().and_then(ChoiceTimer::tick) {
                    self.timers.countdown = None;
                    self.choose(resolution).await;
                }
            }
            SessionSignal::SelectionRevealed { epoch, resolution } => {
                if epoch == self.epoch {
                    self.choose(resolution).await;
                } else {
                    tracing::debug!(epoch, "stale selection reveal ignored");
                }
            }
            SessionSignal::Shutdown => {}
        }
    }

    async fn on_viewer(&mut self, action: ViewerAction) {
        let correlation_id = Uuid::new_v4();
        let result = match action {
            ViewerAction::Select(index) => {
                self.select(index).await;
                return;
            }
            ViewerAction::Play => {
                let command = Play { correlation_id };
                handle_play(&command, &mut self.controller, self.clock.as_ref(), self.sink.as_ref())
                    .await
            }
            ViewerAction::Pause => {
                let command = Pause { correlation_id };
                handle_pause(&command, &mut self.controller, self.sink.as_ref()).await
            }
            ViewerAction::Restart => {
                let command = Restart { correlation_id };
                handle_restart(&command, &mut self.controller, self.sink.as_ref()).await
            }
            ViewerAction::ClickCallToAction => {
                let command = ClickCallToAction { correlation_id };
                handle_click_call_to_action(
                    &command,
                    &mut self.controller,
                    self.clock.as_ref(),
                    self.sink.as_ref(),
                )
                .await
            }
        };
        note_sink_failure(result);
    }

    async fn select(&mut self, index: usize) {
        if self.controller.mode() != PlaybackMode::ChoicePending {
            tracing::debug!(index, "selection outside a prompt ignored");
            return;
        }
        let Some(resolution) = self.choice_timer.as_mut().and_then(|timer| timer.select(index))
        else {
            tracing::debug!(index, "selection ignored");
            return;
        };
        self.timers.countdown = None;

        if self.options.reveal_delay.is_zero() {
            self.choose(resolution).await;
        } else {
            let signal = SessionSignal::SelectionRevealed {
                epoch: self.epoch,
                resolution,
            };
            self.timers.reveal = Some(TimerHandle::once(
                self.options.reveal_delay,
                self.signals_tx.clone(),
                signal,
            ));
        }
    }

    async fn choose(&mut self, resolution: ChoiceResolution) {
        tracing::info!(
            scene_id = %self.controller.current_scene().id,
            choice_id = %resolution.option.id,
            trigger = ?resolution.trigger,
            "choice resolved"
        );
        let command = MakeChoice {
            correlation_id: Uuid::new_v4(),
            choice_id: resolution.option.id,
            next_scene_id: resolution.option.next_scene_id,
        };
        let result = handle_make_choice(
            &command,
            &mut self.controller,
            self.clock.as_ref(),
            self.sink.as_ref(),
        )
        .await;
        note_sink_failure(result);
    }

    async fn advance(&mut self) {
        let command = AdvanceScene {
            correlation_id: Uuid::new_v4(),
        };
        let result = handle_advance_scene(
            &command,
            &mut self.controller,
            self.clock.as_ref(),
            self.sink.as_ref(),
        )
        .await;
        note_sink_failure(result);
    }

    /// Brings media, timers and the prompt in line with the controller, then
    /// publishes a snapshot.
    async fn reconcile(&mut self) {
        if self.seen_scene_generation != Some(self.controller.scene_generation()) {
            self.enter_current_scene();
        }

        match self.controller.mode() {
            PlaybackMode::Playing => {
                if self.media_generation.is_none() {
                    self.start_media().await;
                }
            }
            PlaybackMode::Idle | PlaybackMode::Paused => self.halt_media(),
            PlaybackMode::ChoicePending => {
                self.halt_media();
                if self.choice_timer.is_none() {
                    self.open_prompt();
                }
            }
            PlaybackMode::Finished => {
                self.halt_media();
                self.reset_timers();
            }
        }

        self.publish();
    }

    fn enter_current_scene(&mut self) {
        self.halt_media();
        self.reset_timers();
        self.choice_timer = None;

        let scene = self.controller.current_scene();
        self.fallback.begin_scene(scene.duration);
        let language = self.controller.storyboard().config.language.as_deref();
        self.captions = NarrationSegmenter::for_content(language, &scene.narration)
            .segment(&scene.narration, scene.duration);
        self.seen_scene_generation = Some(self.controller.scene_generation());
        tracing::info!(
            scene_id = %scene.id,
            kind = scene.kind.label(),
            captions = self.captions.len(),
            "scene entered"
        );
    }

    async fn start_media(&mut self) {
        let Some(generation) = self.fallback.begin_attempt() else {
            return;
        };
        let scene = self.controller.current_scene();
        let request = MediaRequest {
            scene_id: scene.id.clone(),
            prefers_video: scene.prefers_video(),
            duration_secs: scene.duration,
        };
        let signals = self.signals_tx.clone();
        let ended = EndedSignal::new(move || {
            let _ = signals.send(SessionSignal::MediaEnded { generation });
        });

        let outcome = self.media.attempt_start(&request, ended).await;
        self.media_generation = Some(generation);
        if outcome == MediaStart::Failed {
            tracing::warn!(scene_id = %request.scene_id, "media failed to start, using short grace");
        }

        if let Some(deadline) = self.fallback.arm(outcome) {
            self.timers.fallback = Some(TimerHandle::once(
                deadline.after,
                self.signals_tx.clone(),
                SessionSignal::FallbackDeadline {
                    generation: deadline.generation,
                },
            ));
        }
        self.timers.playback = Some(TimerHandle::repeating(
            self.options.tick_interval,
            self.signals_tx.clone(),
            move || SessionSignal::PlaybackTick { generation },
        ));
    }

    fn halt_media(&mut self) {
        if self.media_generation.take().is_some() {
            self.media.stop();
        }
        self.fallback.disarm();
        self.timers.fallback = None;
        self.timers.playback = None;
    }

    fn open_prompt(&mut self) {
        let Some(point) = self.controller.current_scene().choice_point() else {
            tracing::warn!(
                scene_id = %self.controller.current_scene().id,
                "choice scene has no prompt"
            );
            return;
        };
        let timer = ChoiceTimer::new(point);
        tracing::info!(
            prompt_id = %point.id,
            timeout_seconds = point.timeout_seconds,
            "choice prompt opened"
        );
        self.choice_timer = Some(timer);

        let epoch = self.epoch;
        self.timers.countdown = Some(TimerHandle::repeating(
            ChoiceTimer::TICK,
            self.signals_tx.clone(),
            move || SessionSignal::CountdownTick { epoch },
        ));
    }

    fn reset_timers(&mut self) {
        self.timers = SceneTimers::default();
        self.epoch += 1;
    }

    fn publish(&self) {
        let view = get_playback_view(&self.controller, self.choice_timer.as_ref(), &self.captions);
        self.view_tx.send_replace(view);
    }
}

fn note_sink_failure(result: Result<CommandOutcome, DomainError>) {
    if let Err(error) = result {
        tracing::warn!(%error, "analytics sink rejected events");
    }
}
