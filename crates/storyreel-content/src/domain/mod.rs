//! Domain model for storyboard content.

pub mod graph;
pub mod scene;
pub mod storyboard;
pub mod traversal;
pub mod validation;
