//! Synthetic storyboards shared by tests.
//!
//! Kept as source text so every crate parses them with its own loader.

/// One choice scene with three options that reconverge on `s10-final`.
///
/// Paths: `s01-hook, s02-setup, cp1` then `s04a-proof, s05a-proof`, or
/// `s04b-risk`, or `s04c-system`, and finally `s10-final`.
pub const BRANCHING_STORYBOARD_YAML: &str = r##"
config:
  title: Branching fixture
  language: en
  maxPaths: 3
scenes:
  - id: s01-hook
    type: intro
    title: The hook
    narration: "Imagine a tool ten thousand times smarter. What would you build first?"
    duration: 28
    nextSceneId: s02-setup
    mediaType: video
    style:
      accentColor: "#ff3333"
  - id: s02-setup
    type: problem
    title: The setup
    narration: "Most people wait. A few people act."
    duration: 32
    nextSceneId: cp1
  - id: s04a-proof
    type: proof
    title: The proof
    narration: "Here is what happened when we tried it."
    duration: 25
    nextSceneId: s05a-proof
  - id: s05a-proof
    type: testimonial
    title: More proof
    narration: ""
    duration: 10
    nextSceneId: s10-final
  - id: s04b-risk
    type: fear
    title: The risk
    narration: "Waiting has a cost."
    duration: 20
    nextSceneId: s10-final
  - id: s04c-system
    type: product
    title: The system
    narration: "This is how it works."
    duration: 15
    nextSceneId: s10-final
  - id: s10-final
    type: cta
    title: Next step
    narration: "Thanks for watching."
    duration: 12
    nextSceneId: null
branchScenes:
  - id: cp1
    type: choice
    title: What do you want to know?
    narration: "Time to choose."
    duration: 4
    nextSceneId: null
    choicePoint:
      id: cp1
      question: What do you want to know?
      options:
        - id: cp1_a
          label: Show me proof
          nextSceneId: s04a-proof
          icon: sparkles
        - id: cp1_b
          label: Show me the risk
          nextSceneId: s04b-risk
          icon: warning
        - id: cp1_c
          label: Show me the system
          nextSceneId: s04c-system
          icon: heart
      timeoutSeconds: 15
      defaultOptionIndex: 0
sceneGraph:
  entrySceneId: s01-hook
  nodes:
    s01-hook: { sceneId: s01-hook, next: s02-setup }
    s02-setup: { sceneId: s02-setup, next: cp1 }
    cp1:
      sceneId: cp1
      next: null
      choices: [s04a-proof, s04b-risk, s04c-system]
    s04a-proof: { sceneId: s04a-proof, next: s05a-proof }
    s05a-proof: { sceneId: s05a-proof, next: s10-final }
    s04b-risk: { sceneId: s04b-risk, next: s10-final }
    s04c-system: { sceneId: s04c-system, next: s10-final }
    s10-final: { sceneId: s10-final, next: null }
"##;

/// Three linear scenes lasting 28, 32 and 25 seconds.
pub const LINEAR_STORYBOARD_YAML: &str = r"
config:
  title: Linear fixture
scenes:
  - id: s1
    type: intro
    narration: First scene.
    duration: 28
    nextSceneId: s2
  - id: s2
    type: solution
    narration: Second scene.
    duration: 32
    nextSceneId: s3
  - id: s3
    type: cta
    narration: Third scene.
    duration: 25
sceneGraph:
  entrySceneId: s1
  nodes:
    s1: { sceneId: s1, next: s2 }
    s2: { sceneId: s2, next: s3 }
    s3: { sceneId: s3 }
";
