//! The complete, immutable content of one branching video.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::graph::SceneGraph;
use super::scene::Scene;

/// Video-level settings carried by the content file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryboardConfig {
    /// Human-readable title.
    #[serde(default)]
    pub title: String,
    /// Narration language tag (e.g. `ja`, `en`). Picks the caption budget.
    #[serde(default)]
    pub language: Option<String>,
    /// Upper bound on the number of distinct viewer paths.
    #[serde(default)]
    pub max_paths: Option<usize>,
    /// Format, resolution, voice settings and other production metadata.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Scene records plus the graph connecting them.
///
/// Loaded once and shared read-only (usually behind an `Arc`) by every
/// component of a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Storyboard {
    /// Video-level settings.
    #[serde(default)]
    pub config: StoryboardConfig,
    /// Ordinary scenes.
    pub scenes: Vec<Scene>,
    /// Choice scenes.
    #[serde(default)]
    pub branch_scenes: Vec<Scene>,
    /// Successor structure.
    pub scene_graph: SceneGraph,
}

impl Storyboard {
    /// All scene records, ordinary scenes first.
    pub fn all_scenes(&self) -> impl Iterator<Item = &Scene> {
        self.scenes.iter().chain(self.branch_scenes.iter())
    }

    /// The scene every session starts at.
    #[must_use]
    pub fn entry_scene(&self) -> Option<&Scene> {
        self.resolve(&self.scene_graph.entry_scene_id)
    }

    /// Identifier of the entry scene.
    #[must_use]
    pub fn entry_scene_id(&self) -> &str {
        &self.scene_graph.entry_scene_id
    }
}
