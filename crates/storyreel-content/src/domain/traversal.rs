//! Scene graph lookup and traversal.
//!
//! Traversal never fails loudly: a missing identifier or a misaligned choice
//! yields [`NextScene::NotFound`], which callers can tell apart from an
//! authored [`NextScene::Terminus`].

use serde::Serialize;

use super::scene::Scene;
use super::storyboard::Storyboard;

/// Result of asking the graph for a scene's successor.
#[derive(Debug, Clone, Copy)]
pub enum NextScene<'a> {
    /// The successor scene.
    Scene(&'a Scene),
    /// The current node has no outgoing edge: the path ends here.
    Terminus,
    /// The graph is inconsistent for this lookup.
    NotFound,
}

impl<'a> NextScene<'a> {
    /// The successor scene, if any.
    #[must_use]
    pub fn scene(self) -> Option<&'a Scene> {
        match self {
            NextScene::Scene(scene) => Some(scene),
            NextScene::Terminus | NextScene::NotFound => None,
        }
    }
}

/// One complete way through the storyboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewerPath {
    /// Option identifiers chosen along the path.
    pub choices: Vec<String>,
    /// Visited scenes, entry first.
    pub scene_ids: Vec<String>,
    /// Sum of scene durations in seconds.
    pub total_duration: f64,
}

impl Storyboard {
    /// Looks up a scene across ordinary and choice scenes.
    #[must_use]
    pub fn resolve(&self, scene_id: &str) -> Option<&Scene> {
        self.all_scenes().find(|scene| scene.id == scene_id)
    }

    /// Resolves the successor of `current_id`.
    ///
    /// On a choice node with `chosen_option_id`, the option's position in the
    /// owning prompt selects the target from the node's `choices`; the option
    /// must point at that same target. A node with a plain `next` returns it
    /// regardless of any chosen option.
    #[must_use]
    pub fn next(&self, current_id: &str, chosen_option_id: Option<&str>) -> NextScene<'_> {
        let Some(node) = self.scene_graph.node(current_id) else {
            return NextScene::NotFound;
        };

        if let (Some(targets), Some(option_id)) = (node.choice_targets(), chosen_option_id) {
            return self.resolve_choice(current_id, targets, option_id);
        }

        match node.next.as_deref() {
            Some(next_id) => self.resolve(next_id).map_or(NextScene::NotFound, NextScene::Scene),
            None if node.is_terminus() => NextScene::Terminus,
            // A choice node asked for its successor without a selection.
            None => NextScene::NotFound,
        }
    }

    fn resolve_choice(&self, current_id: &str, targets: &[String], option_id: &str) -> NextScene<'_> {
        let Some(choice_point) = self.resolve(current_id).and_then(Scene::choice_point) else {
            return NextScene::NotFound;
        };
        let Some(position) = choice_point.option_position(option_id) else {
            return NextScene::NotFound;
        };
        let Some(target) = targets.get(position) else {
            return NextScene::NotFound;
        };
        if choice_point.options[position].next_scene_id != *target {
            tracing::warn!(
                scene_id = current_id,
                option_id,
                target = target.as_str(),
                "choice option and graph node disagree on target"
            );
            return NextScene::NotFound;
        }
        self.resolve(target).map_or(NextScene::NotFound, NextScene::Scene)
    }

    /// Depth-first enumeration of every complete path from the entry scene.
    ///
    /// A choice node branches once per target; a terminus emits the path.
    /// Branches that hit an unknown node or revisit a scene already on the
    /// path are dropped.
    #[must_use]
    pub fn enumerate_all_paths(&self) -> Vec<Vec<String>> {
        self.enumerate_viewer_paths()
            .into_iter()
            .map(|path| path.scene_ids)
            .collect()
    }

    /// Like [`Storyboard::enumerate_all_paths`], but also reports the options
    /// taken and the total duration of each path.
    #[must_use]
    pub fn enumerate_viewer_paths(&self) -> Vec<ViewerPath> {
        let mut paths = Vec::new();
        let mut walk = Walk::default();
        self.traverse(&self.scene_graph.entry_scene_id, &mut walk, &mut paths);
        paths
    }

    fn traverse(&self, scene_id: &str, walk: &mut Walk, paths: &mut Vec<ViewerPath>) {
        let Some(node) = self.scene_graph.node(scene_id) else {
            tracing::warn!(scene_id, "path references unknown node; branch dropped");
            return;
        };
        if walk.scene_ids.iter().any(|visited| visited == scene_id) {
            tracing::warn!(scene_id, "cycle in scene graph; branch dropped");
            return;
        }

        walk.scene_ids.push(scene_id.to_owned());

        if node.is_terminus() {
            paths.push(ViewerPath {
                choices: walk.choices.clone(),
                total_duration: self.path_duration(&walk.scene_ids),
                scene_ids: walk.scene_ids.clone(),
            });
        } else if let Some(targets) = node.choice_targets() {
            let options = self
                .resolve(scene_id)
                .and_then(Scene::choice_point)
                .map(|point| point.options.as_slice())
                .unwrap_or_default();
            for (position, target) in targets.iter().enumerate() {
                let option_id = options.get(position).map(|option| option.id.clone());
                let pushed = option_id.is_some();
                if let Some(option_id) = option_id {
                    walk.choices.push(option_id);
                }
                self.traverse(target, walk, paths);
                if pushed {
                    walk.choices.pop();
                }
            }
        } else if let Some(next_id) = node.next.as_deref() {
            self.traverse(next_id, walk, paths);
        }

        walk.scene_ids.pop();
    }

    /// Sums scene durations along `path`. Unknown identifiers contribute 0.
    #[must_use]
    pub fn path_duration<S: AsRef<str>>(&self, path: &[S]) -> f64 {
        path.iter()
            .map(|scene_id| {
                let scene_id = scene_id.as_ref();
                self.resolve(scene_id).map_or_else(
                    || {
                        tracing::debug!(scene_id, "unknown scene counted as zero duration");
                        0.0
                    },
                    |scene| scene.duration,
                )
            })
            .sum()
    }
}

#[derive(Debug, Default)]
struct Walk {
    scene_ids: Vec<String>,
    choices: Vec<String>,
}
