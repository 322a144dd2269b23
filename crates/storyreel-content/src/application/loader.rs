//! Storyboard loading.
//!
//! Content is parsed once at startup, validated eagerly, and handed out as
//! an `Arc<Storyboard>` to whichever component composes a session.

use std::path::Path;
use std::sync::Arc;

use sha2::{Digest, Sha256};
use storyreel_core::error::DomainError;

use crate::domain::storyboard::Storyboard;

/// Serialization format of a storyboard source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentFormat {
    Yaml,
    Json,
}

impl ContentFormat {
    /// Picks the format from a file extension; anything but `.json` is YAML.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => ContentFormat::Json,
            _ => ContentFormat::Yaml,
        }
    }
}

/// A validated storyboard and the hash of the source it came from.
#[derive(Debug, Clone)]
pub struct LoadedStoryboard {
    /// The shared, immutable content.
    pub storyboard: Arc<Storyboard>,
    /// Hex SHA-256 of the raw source.
    pub version_hash: String,
}

/// Parses a storyboard without validating it.
///
/// # Errors
///
/// Returns `DomainError::ContentFormat` if the source does not parse.
pub fn parse_storyboard(source: &str, format: ContentFormat) -> Result<Storyboard, DomainError> {
    match format {
        ContentFormat::Yaml => serde_yaml::from_str(source)
            .map_err(|e| DomainError::ContentFormat(format!("invalid YAML storyboard: {e}"))),
        ContentFormat::Json => serde_json::from_str(source)
            .map_err(|e| DomainError::ContentFormat(format!("invalid JSON storyboard: {e}"))),
    }
}

/// Parses and validates a storyboard.
///
/// # Errors
///
/// Returns `DomainError::ContentFormat` if the source does not parse and
/// `DomainError::Validation` if the content is malformed.
pub fn load_storyboard(source: &str, format: ContentFormat) -> Result<LoadedStoryboard, DomainError> {
    let storyboard = parse_storyboard(source, format)?;
    storyboard.validate()?;

    let version_hash = format!("{:x}", Sha256::digest(source.as_bytes()));
    tracing::info!(
        title = storyboard.config.title.as_str(),
        scenes = storyboard.all_scenes().count(),
        version_hash = version_hash.as_str(),
        "storyboard loaded"
    );

    Ok(LoadedStoryboard {
        storyboard: Arc::new(storyboard),
        version_hash,
    })
}

/// Reads, parses and validates a storyboard file.
///
/// # Errors
///
/// Returns `DomainError::Infrastructure` if the file cannot be read, plus
/// the errors of [`load_storyboard`].
pub fn load_storyboard_file(path: &Path) -> Result<LoadedStoryboard, DomainError> {
    let source = std::fs::read_to_string(path).map_err(|e| {
        DomainError::Infrastructure(format!("cannot read {}: {e}", path.display()))
    })?;
    load_storyboard(&source, ContentFormat::from_path(path))
}
