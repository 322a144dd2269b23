//! Scene and choice records.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Closed set of scene kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SceneKind {
    Intro,
    Problem,
    Fear,
    Solution,
    Product,
    Benefit,
    Proof,
    Testimonial,
    Faq,
    Cta,
    /// Pauses progression to present a timed choice prompt.
    Choice,
    Branch,
}

impl SceneKind {
    /// Heading label shown above the scene.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            SceneKind::Intro => "INTRODUCTION",
            SceneKind::Problem => "PROBLEM",
            SceneKind::Fear => "WARNING",
            SceneKind::Solution => "SOLUTION",
            SceneKind::Product => "SYSTEM",
            SceneKind::Benefit => "BENEFITS",
            SceneKind::Proof => "EVIDENCE",
            SceneKind::Testimonial => "TESTIMONIALS",
            SceneKind::Faq => "Q&A",
            SceneKind::Cta => "NEXT STEP",
            SceneKind::Choice => "YOUR CHOICE",
            SceneKind::Branch => "YOUR PATH",
        }
    }

    /// Returns `true` for scenes that end in a choice prompt.
    #[must_use]
    pub fn is_choice(self) -> bool {
        matches!(self, SceneKind::Choice)
    }
}

/// Preferred background media for a scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    #[default]
    Image,
    Video,
}

/// One selectable answer of a choice prompt.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChoiceOption {
    /// Option identifier, recorded in the viewer's choice log.
    pub id: String,
    /// Short label.
    #[serde(default)]
    pub label: String,
    /// Longer description under the label.
    #[serde(default)]
    pub description: String,
    /// Scene the viewer moves to when this option is chosen.
    pub next_scene_id: String,
    /// Remaining display fields (icon, colours), passed through untouched.
    #[serde(flatten)]
    pub display: Map<String, Value>,
}

/// A timed multiple-choice prompt attached to a choice scene.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChoicePoint {
    /// Prompt identifier.
    pub id: String,
    /// The question shown to the viewer.
    pub question: String,
    /// Ordered options.
    pub options: Vec<ChoiceOption>,
    /// Seconds before the default option is taken.
    pub timeout_seconds: u32,
    /// Index into `options` used when the countdown expires.
    pub default_option_index: usize,
}

impl ChoicePoint {
    /// Number of options every prompt must offer.
    pub const OPTION_COUNT: usize = 3;

    /// The option taken when the countdown expires.
    #[must_use]
    pub fn default_option(&self) -> Option<&ChoiceOption> {
        self.options.get(self.default_option_index)
    }

    /// Position of the option with the given identifier.
    #[must_use]
    pub fn option_position(&self, option_id: &str) -> Option<usize> {
        self.options.iter().position(|option| option.id == option_id)
    }

    /// Looks up an option by identifier.
    #[must_use]
    pub fn option(&self, option_id: &str) -> Option<&ChoiceOption> {
        self.options.iter().find(|option| option.id == option_id)
    }
}

/// One narrated unit of the experience.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scene {
    /// Scene identifier.
    pub id: String,
    /// Scene kind.
    #[serde(rename = "type")]
    pub kind: SceneKind,
    /// Title, shown when the narration is empty.
    #[serde(default)]
    pub title: String,
    /// Spoken narration text.
    #[serde(default)]
    pub narration: String,
    /// Nominal duration in seconds.
    pub duration: f64,
    /// Linear successor, `None` at a path terminus or on a choice scene.
    #[serde(default)]
    pub next_scene_id: Option<String>,
    /// Preferred background media.
    #[serde(default)]
    pub media_type: MediaKind,
    /// Number of still images cycled for image scenes.
    #[serde(default)]
    pub image_count: Option<u32>,
    /// Choice prompt, present on choice scenes only.
    #[serde(default)]
    pub choice_point: Option<ChoicePoint>,
    /// Presentation hints (style, image prompts), opaque to playback.
    #[serde(flatten)]
    pub presentation: Map<String, Value>,
}

impl Scene {
    /// Longest accepted scene duration, in seconds (one day).
    pub const MAX_DURATION_SECS: f64 = 86_400.0;

    /// Returns `true` if this scene presents a choice prompt.
    #[must_use]
    pub fn is_choice(&self) -> bool {
        self.kind.is_choice()
    }

    /// The choice prompt of a choice scene.
    #[must_use]
    pub fn choice_point(&self) -> Option<&ChoicePoint> {
        if self.is_choice() {
            self.choice_point.as_ref()
        } else {
            None
        }
    }

    /// Returns `true` if the scene prefers a video background.
    #[must_use]
    pub fn prefers_video(&self) -> bool {
        self.media_type == MediaKind::Video
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scene_deserializes_camel_case_record_with_pass_through_hints() {
        // Arrange
        let json = serde_json::json!({
            "id": "s01",
            "type": "intro",
            "title": "Opening",
            "narration": "Hello there.",
            "duration": 12,
            "nextSceneId": "s02",
            "mediaType": "video",
            "style": { "accentColor": "#00d4ff" }
        });

        // Act
        let scene: Scene = serde_json::from_value(json).unwrap();

        // Assert
        assert_eq!(scene.id, "s01");
        assert_eq!(scene.kind, SceneKind::Intro);
        assert!((scene.duration - 12.0).abs() < f64::EPSILON);
        assert_eq!(scene.next_scene_id.as_deref(), Some("s02"));
        assert!(scene.prefers_video());
        assert!(scene.presentation.contains_key("style"));
        assert!(scene.choice_point().is_none());
    }

    #[test]
    fn test_choice_point_looks_up_options_by_id() {
        // Arrange
        let json = serde_json::json!({
            "id": "cp1",
            "question": "Which way?",
            "options": [
                { "id": "a", "label": "A", "nextSceneId": "sa", "icon": "rocket" },
                { "id": "b", "label": "B", "nextSceneId": "sb" },
                { "id": "c", "label": "C", "nextSceneId": "sc" }
            ],
            "timeoutSeconds": 15,
            "defaultOptionIndex": 1
        });

        // Act
        let point: ChoicePoint = serde_json::from_value(json).unwrap();

        // Assert
        assert_eq!(point.option_position("c"), Some(2));
        assert_eq!(point.option_position("z"), None);
        assert_eq!(point.default_option().map(|o| o.id.as_str()), Some("b"));
        assert_eq!(point.options[0].display["icon"], "rocket");
    }

    #[test]
    fn test_scene_kind_labels_are_exhaustive() {
        assert_eq!(SceneKind::Choice.label(), "YOUR CHOICE");
        assert_eq!(SceneKind::Faq.label(), "Q&A");
        assert!(SceneKind::Choice.is_choice());
        assert!(!SceneKind::Branch.is_choice());
    }
}
