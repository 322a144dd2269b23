//! Eager validation of authored storyboards.
//!
//! Traversal tolerates inconsistent graphs by returning `NotFound`; loading
//! rejects them up front so a session never starts on malformed content.

use std::collections::{BTreeSet, HashMap, HashSet};

use storyreel_core::error::DomainError;
use thiserror::Error;

use super::scene::{ChoicePoint, Scene};
use super::storyboard::Storyboard;

/// A single problem found in a storyboard.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ContentIssue {
    #[error("entry scene `{0}` has no graph node")]
    MissingEntry(String),

    #[error("scene `{0}` is declared more than once")]
    DuplicateScene(String),

    #[error("scene `{scene_id}` has invalid duration {duration}")]
    InvalidDuration { scene_id: String, duration: f64 },

    #[error("node `{key}` describes scene `{scene_id}`")]
    NodeKeyMismatch { key: String, scene_id: String },

    #[error("node `{0}` has no scene record")]
    UnknownScene(String),

    #[error("edge `{from}` -> `{to}` points at a missing node")]
    DanglingEdge { from: String, to: String },

    #[error("scene `{scene_id}` declares next {scene_next:?} but its node declares {node_next:?}")]
    NextMismatch {
        scene_id: String,
        scene_next: Option<String>,
        node_next: Option<String>,
    },

    #[error("choice scene `{0}` has no choice prompt")]
    MissingPrompt(String),

    #[error("node `{0}` branches but its scene is not a choice scene with a prompt")]
    ChoiceNodeWithoutPrompt(String),

    #[error("choice scene `{0}` has no choice targets in the graph")]
    PromptWithoutChoices(String),

    #[error("choice scene `{scene_id}` offers {count} options, expected {expected}")]
    OptionCount {
        scene_id: String,
        count: usize,
        expected: usize,
    },

    #[error("choice scene `{scene_id}` default option {index} is out of range")]
    DefaultOutOfRange { scene_id: String, index: usize },

    #[error("choice scene `{scene_id}` has {options} options but its node lists {targets} targets")]
    TargetCount {
        scene_id: String,
        options: usize,
        targets: usize,
    },

    #[error(
        "choice scene `{scene_id}` option {position} targets `{option_target}` but its node lists `{node_target}`"
    )]
    ChoiceMisaligned {
        scene_id: String,
        position: usize,
        option_target: String,
        node_target: String,
    },

    #[error("cycle in scene graph through `{0}`")]
    Cycle(String),

    #[error("{found} viewer paths exceed the configured maximum of {max}")]
    TooManyPaths { found: usize, max: usize },
}

impl Storyboard {
    /// Collects every problem in the storyboard.
    #[must_use]
    pub fn issues(&self) -> Vec<ContentIssue> {
        let mut issues = Vec::new();
        self.check_scenes(&mut issues);
        self.check_nodes(&mut issues);

        let cycles = self.find_cycles();
        let acyclic = cycles.is_empty();
        issues.extend(cycles.into_iter().map(ContentIssue::Cycle));

        if let (true, Some(max)) = (acyclic, self.config.max_paths) {
            let found = self.enumerate_all_paths().len();
            if found > max {
                issues.push(ContentIssue::TooManyPaths { found, max });
            }
        }
        issues
    }

    /// Validates the storyboard, logging scenes no path can reach.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` listing every issue found.
    pub fn validate(&self) -> Result<(), DomainError> {
        for scene_id in self.unreachable_scenes() {
            tracing::warn!(scene_id = scene_id.as_str(), "scene is unreachable from the entry");
        }

        let issues = self.issues();
        if issues.is_empty() {
            return Ok(());
        }
        let message = issues
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        Err(DomainError::Validation(message))
    }

    /// Scenes that no walk from the entry reaches, in declaration order.
    #[must_use]
    pub fn unreachable_scenes(&self) -> Vec<String> {
        let mut reached: HashSet<&str> = HashSet::new();
        let mut pending = vec![self.scene_graph.entry_scene_id.as_str()];
        while let Some(scene_id) = pending.pop() {
            if !reached.insert(scene_id) {
                continue;
            }
            if let Some(node) = self.scene_graph.node(scene_id) {
                pending.extend(node.targets());
            }
        }

        self.all_scenes()
            .filter(|scene| !reached.contains(scene.id.as_str()))
            .map(|scene| scene.id.clone())
            .collect()
    }

    fn check_scenes(&self, issues: &mut Vec<ContentIssue>) {
        let mut seen = HashSet::new();
        for scene in self.all_scenes() {
            if !seen.insert(scene.id.as_str()) {
                issues.push(ContentIssue::DuplicateScene(scene.id.clone()));
            }
            if !(scene.duration > 0.0 && scene.duration <= Scene::MAX_DURATION_SECS) {
                issues.push(ContentIssue::InvalidDuration {
                    scene_id: scene.id.clone(),
                    duration: scene.duration,
                });
            }
            if scene.is_choice() {
                match scene.choice_point.as_ref() {
                    Some(point) => check_prompt(&scene.id, point, issues),
                    None => issues.push(ContentIssue::MissingPrompt(scene.id.clone())),
                }
            }
        }
    }

    fn check_nodes(&self, issues: &mut Vec<ContentIssue>) {
        let graph = &self.scene_graph;
        if graph.node(&graph.entry_scene_id).is_none() {
            issues.push(ContentIssue::MissingEntry(graph.entry_scene_id.clone()));
        }

        for (key, node) in &graph.nodes {
            if *key != node.scene_id {
                issues.push(ContentIssue::NodeKeyMismatch {
                    key: key.clone(),
                    scene_id: node.scene_id.clone(),
                });
            }
            for target in node.targets() {
                if graph.node(target).is_none() {
                    issues.push(ContentIssue::DanglingEdge {
                        from: key.clone(),
                        to: target.to_owned(),
                    });
                }
            }

            let Some(scene) = self.resolve(key) else {
                issues.push(ContentIssue::UnknownScene(key.clone()));
                continue;
            };
            if scene.next_scene_id != node.next {
                issues.push(ContentIssue::NextMismatch {
                    scene_id: key.clone(),
                    scene_next: scene.next_scene_id.clone(),
                    node_next: node.next.clone(),
                });
            }

            match (node.choice_targets(), scene.choice_point()) {
                (Some(targets), Some(point)) => check_alignment(key, point, targets, issues),
                (Some(_), None) => issues.push(ContentIssue::ChoiceNodeWithoutPrompt(key.clone())),
                (None, Some(_)) => issues.push(ContentIssue::PromptWithoutChoices(key.clone())),
                (None, None) => {}
            }
        }
    }

    /// Scenes closing a cycle reachable from the entry.
    fn find_cycles(&self) -> BTreeSet<String> {
        #[derive(Clone, Copy, PartialEq)]
        enum Mark {
            Active,
            Done,
        }

        fn visit<'a>(
            storyboard: &'a Storyboard,
            scene_id: &'a str,
            marks: &mut HashMap<&'a str, Mark>,
            cycles: &mut BTreeSet<String>,
        ) {
            match marks.get(scene_id) {
                Some(Mark::Active) => {
                    cycles.insert(scene_id.to_owned());
                    return;
                }
                Some(Mark::Done) => return,
                None => {}
            }
            let Some(node) = storyboard.scene_graph.node(scene_id) else {
                return;
            };
            marks.insert(scene_id, Mark::Active);
            for target in node.targets() {
                visit(storyboard, target, marks, cycles);
            }
            marks.insert(scene_id, Mark::Done);
        }

        let mut marks = HashMap::new();
        let mut cycles = BTreeSet::new();
        visit(self, &self.scene_graph.entry_scene_id, &mut marks, &mut cycles);
        cycles
    }
}

fn check_prompt(scene_id: &str, point: &ChoicePoint, issues: &mut Vec<ContentIssue>) {
    if point.options.len() != ChoicePoint::OPTION_COUNT {
        issues.push(ContentIssue::OptionCount {
            scene_id: scene_id.to_owned(),
            count: point.options.len(),
            expected: ChoicePoint::OPTION_COUNT,
        });
    }
    if point.default_option_index >= point.options.len() {
        issues.push(ContentIssue::DefaultOutOfRange {
            scene_id: scene_id.to_owned(),
            index: point.default_option_index,
        });
    }
}

fn check_alignment(
    scene_id: &str,
    point: &ChoicePoint,
    targets: &[String],
    issues: &mut Vec<ContentIssue>,
) {
    if point.options.len() != targets.len() {
        issues.push(ContentIssue::TargetCount {
            scene_id: scene_id.to_owned(),
            options: point.options.len(),
            targets: targets.len(),
        });
    }
    for (position, (option, target)) in point.options.iter().zip(targets).enumerate() {
        if option.next_scene_id != *target {
            issues.push(ContentIssue::ChoiceMisaligned {
                scene_id: scene_id.to_owned(),
                position,
                option_target: option.next_scene_id.clone(),
                node_target: target.clone(),
            });
        }
    }
}
