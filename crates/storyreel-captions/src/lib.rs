//! Storyreel — narration captions.
//!
//! Turns a scene's narration text and nominal duration into timed caption
//! segments. Segments are aligned to playback by character share alone, so
//! no per-word timing metadata is needed.

mod phrase;
mod segmenter;

pub use phrase::{ScriptDensity, phrases, sentences};
pub use segmenter::{CaptionSegment, NarrationSegmenter, active_segment};
