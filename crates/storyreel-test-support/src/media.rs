//! Test media port — a scripted `MediaPort` for runtime tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use storyreel_core::media::{EndedSignal, MediaPort, MediaRequest, MediaStart};

#[derive(Debug, Default)]
struct Script {
    outcomes: HashMap<String, MediaStart>,
    started: Vec<String>,
    current: Option<(String, EndedSignal)>,
    stops: usize,
}

/// A media port whose start outcomes are configured per scene and whose
/// end-of-media notifications are fired by the test.
///
/// Scenes without a configured outcome start successfully.
#[derive(Debug, Default)]
pub struct ScriptedMediaPort {
    script: Mutex<Script>,
}

impl ScriptedMediaPort {
    /// Create a port where every scene starts successfully.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the start outcome for one scene.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn with_outcome(self, scene_id: &str, outcome: MediaStart) -> Self {
        self.script
            .lock()
            .unwrap()
            .outcomes
            .insert(scene_id.to_owned(), outcome);
        self
    }

    /// Fires the end-of-media notification for the most recently started
    /// scene. Returns the scene id, or `None` if nothing was started.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn finish_current(&self) -> Option<String> {
        let current = self.script.lock().unwrap().current.clone();
        current.map(|(scene_id, ended)| {
            ended.notify();
            scene_id
        })
    }

    /// Scene ids passed to `attempt_start`, in order.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn started_scenes(&self) -> Vec<String> {
        self.script.lock().unwrap().started.clone()
    }

    /// Number of `stop` calls.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn stop_count(&self) -> usize {
        self.script.lock().unwrap().stops
    }
}

#[async_trait]
impl MediaPort for ScriptedMediaPort {
    async fn attempt_start(&self, request: &MediaRequest, ended: EndedSignal) -> MediaStart {
        let mut script = self.script.lock().unwrap();
        script.started.push(request.scene_id.clone());
        let outcome = script
            .outcomes
            .get(&request.scene_id)
            .copied()
            .unwrap_or(MediaStart::Started);
        script.current = match outcome {
            MediaStart::Started => Some((request.scene_id.clone(), ended)),
            MediaStart::Failed => None,
        };
        outcome
    }

    fn stop(&self) {
        self.script.lock().unwrap().stops += 1;
    }
}
