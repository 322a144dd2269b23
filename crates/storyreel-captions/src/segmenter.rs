//! Caption packing and timing.

use serde::Serialize;

use crate::phrase::{ScriptDensity, phrases, sentences};

/// A timed span of narration text shown during playback.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptionSegment {
    /// Narration slice, including any trailing whitespace.
    pub text: String,
    /// Seconds into the scene at which the segment appears.
    pub start_time: f64,
}

impl CaptionSegment {
    /// The text to render, without surrounding whitespace.
    #[must_use]
    pub fn display_text(&self) -> &str {
        self.text.trim()
    }
}

/// Packs narration phrases into caption segments of bounded length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NarrationSegmenter {
    max_segment_chars: usize,
}

impl NarrationSegmenter {
    /// Creates a segmenter with an explicit per-segment character budget.
    #[must_use]
    pub fn new(max_segment_chars: usize) -> Self {
        Self {
            max_segment_chars: max_segment_chars.max(1),
        }
    }

    /// Creates a segmenter with the budget for a script density.
    #[must_use]
    pub fn for_density(density: ScriptDensity) -> Self {
        Self::new(density.caption_budget())
    }

    /// Creates a segmenter whose budget suits the given narration.
    #[must_use]
    pub fn for_narration(narration: &str) -> Self {
        Self::for_density(ScriptDensity::detect(narration))
    }

    /// Creates a segmenter from the content's language tag, falling back to
    /// the narration itself when no language is configured.
    #[must_use]
    pub fn for_content(language: Option<&str>, narration: &str) -> Self {
        match language {
            Some(tag) => Self::for_density(ScriptDensity::from_language(tag)),
            None => Self::for_narration(narration),
        }
    }

    /// The per-segment character budget.
    #[must_use]
    pub fn max_segment_chars(&self) -> usize {
        self.max_segment_chars
    }

    /// Splits narration into timed caption segments.
    ///
    /// Phrases are packed greedily; a phrase is never split, so a single
    /// phrase longer than the budget becomes its own oversized segment.
    /// Sentences always start a new segment. Each segment starts at its
    /// share of the narration's characters, scaled by `duration`.
    ///
    /// Empty narration or a non-positive duration yields no segments.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn segment(&self, narration: &str, duration: f64) -> Vec<CaptionSegment> {
        if narration.trim().is_empty() || duration <= 0.0 || !duration.is_finite() {
            return Vec::new();
        }

        let mut texts: Vec<(String, usize)> = Vec::new();
        for sentence in sentences(narration) {
            let mut current = String::new();
            let mut current_chars = 0;
            for phrase in phrases(sentence) {
                let phrase_chars = phrase.chars().count();
                if current_chars > 0 && current_chars + phrase_chars > self.max_segment_chars {
                    texts.push((std::mem::take(&mut current), current_chars));
                    current_chars = 0;
                }
                current.push_str(phrase);
                current_chars += phrase_chars;
            }
            if current_chars > 0 {
                texts.push((current, current_chars));
            }
        }

        let total_chars: usize = texts.iter().map(|(_, chars)| chars).sum();
        let mut chars_before = 0;
        texts
            .into_iter()
            .map(|(text, chars)| {
                let start_time = chars_before as f64 / total_chars as f64 * duration;
                chars_before += chars;
                CaptionSegment { text, start_time }
            })
            .collect()
    }
}

/// Index of the segment showing at `elapsed` seconds: the last one whose
/// start time has passed.
#[must_use]
pub fn active_segment(segments: &[CaptionSegment], elapsed: f64) -> Option<usize> {
    segments
        .iter()
        .rposition(|segment| segment.start_time <= elapsed)
}
