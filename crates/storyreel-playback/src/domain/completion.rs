//! Completion fallback.
//!
//! Guarantees that every scene advances exactly once, whether the media
//! reports its natural end, never reports it, or fails to start at all.
//!
//! Each arming is tagged with a generation. Deadlines and end-of-media
//! notifications carry the generation they were issued for, and anything
//! carrying a superseded generation is ignored. Generations are unique for
//! the lifetime of the fallback, across scenes.

use std::time::Duration;

use storyreel_core::media::MediaStart;

/// Grace added to the scene duration when media started.
pub const STARTED_GRACE: Duration = Duration::from_secs(5);
/// Grace added to the scene duration when media failed to start.
pub const FAILED_GRACE: Duration = Duration::from_secs(1);

/// A fallback deadline the caller must schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadline {
    /// Generation to hand back to [`CompletionFallback::on_deadline`].
    pub generation: u64,
    /// Delay from now.
    pub after: Duration,
}

/// Per-scene completion guard.
#[derive(Debug, Clone)]
pub struct CompletionFallback {
    started_grace: Duration,
    failed_grace: Duration,
    scene_duration: Duration,
    generation: u64,
    armed: Option<u64>,
    ended: bool,
}

impl Default for CompletionFallback {
    fn default() -> Self {
        Self::new(STARTED_GRACE, FAILED_GRACE)
    }
}

impl CompletionFallback {
    /// Creates a fallback with explicit grace periods.
    #[must_use]
    pub fn new(started_grace: Duration, failed_grace: Duration) -> Self {
        Self {
            started_grace,
            failed_grace,
            scene_duration: Duration::ZERO,
            generation: 0,
            armed: None,
            ended: false,
        }
    }

    /// Resets for a new scene instance, invalidating anything outstanding.
    pub fn begin_scene(&mut self, duration_secs: f64) {
        self.generation += 1;
        self.armed = None;
        self.ended = false;
        self.scene_duration = if duration_secs > 0.0 {
            Duration::try_from_secs_f64(duration_secs).unwrap_or(Duration::MAX)
        } else {
            Duration::ZERO
        };
    }

    /// Opens a new generation before media is started, so the end-of-media
    /// notification can be tagged with it. Returns `None` once the scene has
    /// already ended.
    pub fn begin_attempt(&mut self) -> Option<u64> {
        if self.ended {
            return None;
        }
        self.generation += 1;
        self.armed = Some(self.generation);
        Some(self.generation)
    }

    /// Computes the deadline for the open attempt. The full scene duration
    /// is always used, so a resumed scene gets a fresh window.
    pub fn arm(&mut self, start: MediaStart) -> Option<Deadline> {
        let generation = self.armed?;
        let grace = match start {
            MediaStart::Started => self.started_grace,
            MediaStart::Failed => self.failed_grace,
        };
        Some(Deadline {
            generation,
            after: self.scene_duration.saturating_add(grace),
        })
    }

    /// Invalidates the open attempt without ending the scene.
    pub fn disarm(&mut self) {
        if self.armed.take().is_some() {
            self.generation += 1;
        }
    }

    /// Handles the media's natural end. Returns `true` when the caller
    /// should advance.
    pub fn on_media_ended(&mut self, generation: u64) -> bool {
        self.settle(generation)
    }

    /// Handles the fallback deadline. Returns `true` when the caller should
    /// advance.
    pub fn on_deadline(&mut self, generation: u64) -> bool {
        self.settle(generation)
    }

    /// Whether the current scene has already advanced.
    #[must_use]
    pub fn has_ended(&self) -> bool {
        self.ended
    }

    /// Whether an attempt is open.
    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.armed.is_some()
    }

    fn settle(&mut self, generation: u64) -> bool {
        if self.ended || self.armed != Some(generation) {
            return false;
        }
        self.ended = true;
        self.armed = None;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn armed(start: MediaStart) -> (CompletionFallback, Deadline) {
        let mut fallback = CompletionFallback::default();
        fallback.begin_scene(28.0);
        fallback.begin_attempt().unwrap();
        let deadline = fallback.arm(start).unwrap();
        (fallback, deadline)
    }

    #[test]
    fn test_started_media_gets_five_second_grace() {
        let (_, deadline) = armed(MediaStart::Started);

        assert_eq!(deadline.after, Duration::from_secs(33));
    }

    #[test]
    fn test_failed_media_gets_one_second_grace() {
        let (_, deadline) = armed(MediaStart::Failed);

        assert_eq!(deadline.after, Duration::from_secs(29));
    }

    #[test]
    fn test_media_end_first_suppresses_deadline() {
        // Arrange
        let (mut fallback, deadline) = armed(MediaStart::Started);

        // Act
        let advanced_by_media = fallback.on_media_ended(deadline.generation);
        let advanced_by_deadline = fallback.on_deadline(deadline.generation);

        // Assert
        assert!(advanced_by_media);
        assert!(!advanced_by_deadline);
        assert!(fallback.has_ended());
    }

    #[test]
    fn test_deadline_first_suppresses_late_media_end() {
        let (mut fallback, deadline) = armed(MediaStart::Started);

        assert!(fallback.on_deadline(deadline.generation));
        assert!(!fallback.on_media_ended(deadline.generation));
        assert!(!fallback.on_media_ended(deadline.generation));
    }

    #[test]
    fn test_disarm_invalidates_outstanding_signals() {
        // Arrange
        let (mut fallback, deadline) = armed(MediaStart::Started);

        // Act
        fallback.disarm();

        // Assert
        assert!(!fallback.on_deadline(deadline.generation));
        assert!(!fallback.on_media_ended(deadline.generation));
        assert!(!fallback.has_ended());
    }

    #[test]
    fn test_rearm_after_pause_uses_full_duration_and_new_generation() {
        // Arrange
        let (mut fallback, first) = armed(MediaStart::Started);
        fallback.disarm();

        // Act
        fallback.begin_attempt().unwrap();
        let second = fallback.arm(MediaStart::Started).unwrap();

        // Assert
        assert_ne!(first.generation, second.generation);
        assert_eq!(second.after, first.after);
        assert!(!fallback.on_deadline(first.generation));
        assert!(fallback.on_deadline(second.generation));
    }

    #[test]
    fn test_signals_from_previous_scene_are_ignored() {
        let (mut fallback, previous) = armed(MediaStart::Started);

        fallback.begin_scene(10.0);
        let generation = fallback.begin_attempt().unwrap();

        assert!(!fallback.on_media_ended(previous.generation));
        assert!(fallback.on_media_ended(generation));
    }

    #[test]
    fn test_ended_scene_cannot_be_rearmed() {
        let (mut fallback, deadline) = armed(MediaStart::Failed);
        assert!(fallback.on_deadline(deadline.generation));

        assert!(fallback.begin_attempt().is_none());
        assert!(fallback.arm(MediaStart::Started).is_none());
    }

    #[test]
    fn test_oversized_duration_saturates_instead_of_panicking() {
        // Arrange
        let mut fallback = CompletionFallback::default();

        // Act
        fallback.begin_scene(1.0e20);
        fallback.begin_attempt().unwrap();
        let deadline = fallback.arm(MediaStart::Started).unwrap();

        // Assert
        assert_eq!(deadline.after, Duration::MAX);
    }

    #[test]
    fn test_unusable_duration_falls_back_to_grace_only() {
        let mut fallback = CompletionFallback::default();

        fallback.begin_scene(f64::NAN);
        fallback.begin_attempt().unwrap();
        let deadline = fallback.arm(MediaStart::Failed).unwrap();

        assert_eq!(deadline.after, FAILED_GRACE);
    }

    #[test]
    fn test_arm_without_attempt_yields_nothing() {
        let mut fallback = CompletionFallback::default();
        fallback.begin_scene(5.0);

        assert!(fallback.arm(MediaStart::Started).is_none());
        assert!(!fallback.is_armed());
    }
}
