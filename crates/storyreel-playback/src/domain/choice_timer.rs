//! Countdown for a pending choice prompt.
//!
//! The timer is driven by one-second ticks from the session runtime, so it
//! holds no clock of its own and its behavior is fully deterministic.

use std::time::Duration;

use storyreel_content::domain::scene::{ChoiceOption, ChoicePoint};

/// How the prompt was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionTrigger {
    /// The countdown reached zero and the default option was taken.
    Deadline,
    /// The viewer picked an option.
    Selection,
}

/// The option a prompt resolved to.
#[derive(Debug, Clone)]
pub struct ChoiceResolution {
    /// The option taken.
    pub option: ChoiceOption,
    /// Its position in the prompt.
    pub option_index: usize,
    /// What resolved the prompt.
    pub trigger: ResolutionTrigger,
}

/// Countdown state for one choice prompt. Resolves exactly once.
#[derive(Debug, Clone)]
pub struct ChoiceTimer {
    options: Vec<ChoiceOption>,
    default_index: usize,
    remaining_seconds: u32,
    selected: Option<usize>,
    resolved: bool,
}

impl ChoiceTimer {
    /// Pause between a viewer selection and the hand-off, so the
    /// highlighted option is visible before the next scene starts.
    pub const SELECTION_REVEAL_DELAY: Duration = Duration::from_millis(600);

    /// Period between countdown ticks.
    pub const TICK: Duration = Duration::from_secs(1);

    /// Starts a countdown at the prompt's timeout.
    #[must_use]
    pub fn new(point: &ChoicePoint) -> Self {
        Self {
            options: point.options.clone(),
            default_index: point
                .default_option_index
                .min(point.options.len().saturating_sub(1)),
            remaining_seconds: point.timeout_seconds,
            selected: None,
            resolved: false,
        }
    }

    /// Whole seconds left before the default is taken.
    #[must_use]
    pub fn remaining_seconds(&self) -> u32 {
        self.remaining_seconds
    }

    /// The option the viewer picked, if any.
    #[must_use]
    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    /// Whether the prompt has been resolved.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.resolved
    }

    /// Counts down one second. Returns the default option when the
    /// countdown reaches zero; a zero timeout resolves on the first tick.
    pub fn tick(&mut self) -> Option<ChoiceResolution> {
        if self.resolved {
            return None;
        }
        self.remaining_seconds = self.remaining_seconds.saturating_sub(1);
        if self.remaining_seconds > 0 {
            return None;
        }
        self.resolve(self.default_index, ResolutionTrigger::Deadline)
    }

    /// Takes the option at `index`. Ignored once resolved or if `index` is
    /// out of range.
    pub fn select(&mut self, index: usize) -> Option<ChoiceResolution> {
        if self.resolved || index >= self.options.len() {
            return None;
        }
        self.selected = Some(index);
        self.resolve(index, ResolutionTrigger::Selection)
    }

    fn resolve(&mut self, index: usize, trigger: ResolutionTrigger) -> Option<ChoiceResolution> {
        self.resolved = true;
        let option = self.options.get(index)?.clone();
        Some(ChoiceResolution {
            option,
            option_index: index,
            trigger,
        })
    }
}

#[cfg(test)]
mod tests {
    use storyreel_content::domain::scene::ChoicePoint;

    use super::*;

    fn point(timeout_seconds: u32, default_option_index: usize) -> ChoicePoint {
        let options = serde_json::json!([
            { "id": "a", "label": "A", "description": "first", "nextSceneId": "sa" },
            { "id": "b", "label": "B", "description": "second", "nextSceneId": "sb" },
            { "id": "c", "label": "C", "description": "third", "nextSceneId": "sc" },
        ]);
        serde_json::from_value(serde_json::json!({
            "id": "cp",
            "question": "Which?",
            "options": options,
            "timeoutSeconds": timeout_seconds,
            "defaultOptionIndex": default_option_index,
        }))
        .unwrap()
    }

    #[test]
    fn test_countdown_takes_default_after_timeout_ticks() {
        // Arrange
        let mut timer = ChoiceTimer::new(&point(3, 1));

        // Act
        let first = timer.tick();
        let second = timer.tick();
        let third = timer.tick();

        // Assert
        assert!(first.is_none());
        assert!(second.is_none());
        let resolution = third.unwrap();
        assert_eq!(resolution.option.id, "b");
        assert_eq!(resolution.option_index, 1);
        assert_eq!(resolution.trigger, ResolutionTrigger::Deadline);
        assert_eq!(timer.remaining_seconds(), 0);
    }

    #[test]
    fn test_zero_timeout_resolves_on_first_tick() {
        let mut timer = ChoiceTimer::new(&point(0, 0));

        let resolution = timer.tick().unwrap();

        assert_eq!(resolution.option.id, "a");
        assert_eq!(resolution.trigger, ResolutionTrigger::Deadline);
    }

    #[test]
    fn test_selection_resolves_once_and_stops_countdown() {
        // Arrange
        let mut timer = ChoiceTimer::new(&point(15, 0));
        timer.tick();

        // Act
        let resolution = timer.select(2).unwrap();

        // Assert
        assert_eq!(resolution.option.id, "c");
        assert_eq!(resolution.option.next_scene_id, "sc");
        assert_eq!(resolution.trigger, ResolutionTrigger::Selection);
        assert_eq!(timer.selected_index(), Some(2));
        assert!(timer.select(0).is_none());
        for _ in 0..20 {
            assert!(timer.tick().is_none());
        }
        assert_eq!(timer.remaining_seconds(), 14);
    }

    #[test]
    fn test_deadline_then_late_selection_is_ignored() {
        let mut timer = ChoiceTimer::new(&point(1, 0));
        assert!(timer.tick().is_some());

        assert!(timer.select(1).is_none());
        assert!(timer.is_resolved());
        assert_eq!(timer.selected_index(), None);
    }

    #[test]
    fn test_out_of_range_selection_is_ignored() {
        let mut timer = ChoiceTimer::new(&point(5, 0));

        assert!(timer.select(3).is_none());
        assert!(!timer.is_resolved());
    }

    #[test]
    fn test_default_index_is_clamped_to_options() {
        let mut timer = ChoiceTimer::new(&point(1, 9));

        let resolution = timer.tick().unwrap();

        assert_eq!(resolution.option.id, "c");
    }
}
