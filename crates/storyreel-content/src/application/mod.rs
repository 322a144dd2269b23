//! Application services for storyboard content.

pub mod loader;
pub mod query_handlers;
