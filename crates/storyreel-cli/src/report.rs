//! Plain reports over a loaded storyboard.

use storyreel_captions::NarrationSegmenter;
use storyreel_content::application::loader::LoadedStoryboard;
use storyreel_content::application::query_handlers::summarize;
use storyreel_content::domain::storyboard::Storyboard;
use storyreel_core::error::DomainError;

/// Prints the storyboard summary as pretty JSON.
pub fn print_summary(loaded: &LoadedStoryboard) -> Result<(), DomainError> {
    let summary = summarize(loaded);
    let json = serde_json::to_string_pretty(&summary)
        .map_err(|e| DomainError::Infrastructure(format!("summary serialization failed: {e}")))?;
    println!("{json}");
    Ok(())
}

/// Prints one line per viewer path.
pub fn print_paths(storyboard: &Storyboard) {
    for (index, path) in storyboard.enumerate_viewer_paths().iter().enumerate() {
        let choices = if path.choices.is_empty() {
            "-".to_owned()
        } else {
            path.choices.join(", ")
        };
        println!(
            "{:>2}. [{choices}] {} ({:.0}s)",
            index + 1,
            path.scene_ids.join(" -> "),
            path.total_duration
        );
    }
}

/// Prints the timed captions of every scene, or of `only` when given.
pub fn print_captions(storyboard: &Storyboard, only: Option<&str>) -> Result<(), DomainError> {
    if let Some(scene_id) = only {
        if storyboard.resolve(scene_id).is_none() {
            return Err(DomainError::SceneNotFound(scene_id.to_owned()));
        }
    }

    let language = storyboard.config.language.as_deref();
    let scenes = storyboard
        .all_scenes()
        .filter(|scene| only.is_none_or(|scene_id| scene.id == scene_id));
    for scene in scenes {
        println!("{} ({}, {:.0}s)", scene.id, scene.kind.label(), scene.duration);
        let segments = NarrationSegmenter::for_content(language, &scene.narration)
            .segment(&scene.narration, scene.duration);
        if segments.is_empty() {
            println!("  [title] {}", scene.title);
        }
        for segment in &segments {
            println!("  {:>6.2}s  {}", segment.start_time, segment.display_text());
        }
    }
    Ok(())
}
