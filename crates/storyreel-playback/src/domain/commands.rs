//! Commands for the playback context.

use storyreel_core::command::Command;
use uuid::Uuid;

/// Command to start or resume playback.
#[derive(Debug, Clone)]
pub struct Play {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
}

impl Command for Play {
    fn command_type(&self) -> &'static str {
        "playback.play"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to pause playback.
#[derive(Debug, Clone)]
pub struct Pause {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
}

impl Command for Pause {
    fn command_type(&self) -> &'static str {
        "playback.pause"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command fired when the active scene's media has completed.
#[derive(Debug, Clone)]
pub struct AdvanceScene {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
}

impl Command for AdvanceScene {
    fn command_type(&self) -> &'static str {
        "playback.advance_scene"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to resolve the pending choice prompt.
#[derive(Debug, Clone)]
pub struct MakeChoice {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The option taken.
    pub choice_id: String,
    /// The scene the option leads to.
    pub next_scene_id: String,
}

impl Command for MakeChoice {
    fn command_type(&self) -> &'static str {
        "playback.make_choice"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to return to the entry scene with a clean history.
#[derive(Debug, Clone)]
pub struct Restart {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
}

impl Command for Restart {
    fn command_type(&self) -> &'static str {
        "playback.restart"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command fired when the viewer follows the final call to action.
#[derive(Debug, Clone)]
pub struct ClickCallToAction {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
}

impl Command for ClickCallToAction {
    fn command_type(&self) -> &'static str {
        "playback.click_call_to_action"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}
