//! Storyreel — storyboard content.
//!
//! Responsible for the immutable scene records, the scene graph connecting
//! them, eager validation of authored content, and the traversal functions
//! the playback controller uses to find the next scene.

pub mod application;
pub mod domain;
