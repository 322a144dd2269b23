//! Scene graph structure.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Outgoing edges of one scene.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneNode {
    /// The scene this node describes.
    pub scene_id: String,
    /// Linear successor.
    #[serde(default)]
    pub next: Option<String>,
    /// Ordered choice targets, aligned with the owning prompt's options.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub choices: Option<Vec<String>>,
}

impl SceneNode {
    /// Choice targets, if this node branches.
    #[must_use]
    pub fn choice_targets(&self) -> Option<&[String]> {
        self.choices
            .as_deref()
            .filter(|targets| !targets.is_empty())
    }

    /// A node with neither a successor nor choice targets ends a path.
    #[must_use]
    pub fn is_terminus(&self) -> bool {
        self.next.is_none() && self.choice_targets().is_none()
    }

    /// Every scene this node can lead to, in declaration order.
    pub fn targets(&self) -> impl Iterator<Item = &str> {
        self.choice_targets()
            .unwrap_or_default()
            .iter()
            .map(String::as_str)
            .chain(self.next.as_deref())
    }
}

/// Directed graph of scene identifiers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneGraph {
    /// Scene every session starts at.
    pub entry_scene_id: String,
    /// Scene identifier to outgoing edges.
    pub nodes: BTreeMap<String, SceneNode>,
}

impl SceneGraph {
    /// Looks up the node for a scene.
    #[must_use]
    pub fn node(&self, scene_id: &str) -> Option<&SceneNode> {
        self.nodes.get(scene_id)
    }
}
