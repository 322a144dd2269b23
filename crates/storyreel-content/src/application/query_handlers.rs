//! Query handlers for storyboard content.
//!
//! Read-only view DTOs over a loaded storyboard.

use serde::Serialize;
use storyreel_core::error::DomainError;

use crate::application::loader::LoadedStoryboard;
use crate::domain::scene::SceneKind;
use crate::domain::storyboard::Storyboard;
use crate::domain::traversal::ViewerPath;

/// Read-only overview of a storyboard.
#[derive(Debug, Serialize)]
pub struct StoryboardSummary {
    /// Video title.
    pub title: String,
    /// Hash of the source the storyboard was loaded from.
    pub version_hash: String,
    /// Scene every session starts at.
    pub entry_scene_id: String,
    /// Number of scene records.
    pub scene_count: usize,
    /// Every complete viewer path.
    pub paths: Vec<ViewerPath>,
    /// Scenes no path reaches.
    pub unreachable_scenes: Vec<String>,
}

/// Read-only view of one scene.
#[derive(Debug, Serialize)]
pub struct SceneView {
    /// Scene identifier.
    pub scene_id: String,
    /// Scene kind.
    pub kind: SceneKind,
    /// Heading label for the kind.
    pub label: &'static str,
    /// Title.
    pub title: String,
    /// Nominal duration in seconds.
    pub duration: f64,
    /// Linear successor.
    pub next_scene_id: Option<String>,
    /// Option identifiers, for choice scenes.
    pub option_ids: Vec<String>,
}

/// Summarizes a loaded storyboard.
#[must_use]
pub fn summarize(loaded: &LoadedStoryboard) -> StoryboardSummary {
    let storyboard = &loaded.storyboard;
    StoryboardSummary {
        title: storyboard.config.title.clone(),
        version_hash: loaded.version_hash.clone(),
        entry_scene_id: storyboard.entry_scene_id().to_owned(),
        scene_count: storyboard.all_scenes().count(),
        paths: storyboard.enumerate_viewer_paths(),
        unreachable_scenes: storyboard.unreachable_scenes(),
    }
}

/// Retrieves one scene by identifier.
///
/// # Errors
///
/// Returns `DomainError::SceneNotFound` if no scene has the identifier.
pub fn get_scene_by_id(storyboard: &Storyboard, scene_id: &str) -> Result<SceneView, DomainError> {
    let scene = storyboard
        .resolve(scene_id)
        .ok_or_else(|| DomainError::SceneNotFound(scene_id.to_owned()))?;
    Ok(SceneView {
        scene_id: scene.id.clone(),
        kind: scene.kind,
        label: scene.kind.label(),
        title: scene.title.clone(),
        duration: scene.duration,
        next_scene_id: scene.next_scene_id.clone(),
        option_ids: scene
            .choice_point()
            .map(|point| point.options.iter().map(|option| option.id.clone()).collect())
            .unwrap_or_default(),
    })
}
