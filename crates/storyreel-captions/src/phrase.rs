//! Sentence and phrase boundaries.
//!
//! Phrases are the smallest units a caption may not split. For space
//! delimited scripts a phrase is a word with its trailing punctuation and
//! whitespace. For Japanese-style dense scripts, a phrase is a run of
//! content characters followed by the hiragana that attach to it
//! (`孫正義が`, `予見する`), which approximates bunsetsu boundaries.
//!
//! Every function returns sub-slices of its input, so concatenating the
//! output reproduces the input exactly.

use unicode_segmentation::UnicodeSegmentation;

const SENTENCE_TERMINATORS: &[char] = &['。', '！', '？', '．', '!', '?', '.'];
const OPENERS: &[char] = &['「', '『', '（', '(', '[', '【', '〈', '《', '“', '‘'];
const CLOSERS: &[char] = &['」', '』', '）', ')', ']', '】', '〉', '》', '”', '’'];
const AMBIGUOUS_QUOTES: &[char] = &['"', '\''];

/// How densely a script packs meaning per character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptDensity {
    /// Japanese, Chinese, Korean.
    Dense,
    /// Space-delimited alphabetic scripts.
    Spaced,
}

impl ScriptDensity {
    /// Maps a BCP 47 language tag to a density, if the language is known.
    #[must_use]
    pub fn from_language(tag: &str) -> Self {
        let primary = tag.split(['-', '_']).next().unwrap_or_default();
        match primary.to_ascii_lowercase().as_str() {
            "ja" | "zh" | "ko" | "yue" => ScriptDensity::Dense,
            _ => ScriptDensity::Spaced,
        }
    }

    /// Guesses the density from the text itself.
    #[must_use]
    pub fn detect(text: &str) -> Self {
        let (dense, letters) = text
            .chars()
            .filter(|c| c.is_alphabetic())
            .fold((0usize, 0usize), |(dense, letters), c| {
                (dense + usize::from(is_dense_char(c)), letters + 1)
            });
        if letters > 0 && dense * 2 >= letters {
            ScriptDensity::Dense
        } else {
            ScriptDensity::Spaced
        }
    }

    /// Characters per caption segment for this density.
    #[must_use]
    pub fn caption_budget(self) -> usize {
        match self {
            ScriptDensity::Dense => 26,
            ScriptDensity::Spaced => 42,
        }
    }
}

fn is_dense_char(c: char) -> bool {
    matches!(c,
        '\u{3040}'..='\u{30FF}'
        | '\u{3400}'..='\u{4DBF}'
        | '\u{4E00}'..='\u{9FFF}'
        | '\u{AC00}'..='\u{D7AF}'
        | '\u{F900}'..='\u{FAFF}'
        | '\u{FF66}'..='\u{FF9F}')
}

fn is_hiragana(c: char) -> bool {
    matches!(c, '\u{3041}'..='\u{309F}')
}

/// Splits text after sentence-ending punctuation.
///
/// Trailing closing brackets and whitespace stay with the sentence they
/// follow. An ASCII period only ends a sentence when followed by whitespace,
/// a closing mark or the end of the text, so `3.5` stays whole.
#[must_use]
pub fn sentences(text: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((index, c)) = chars.next() {
        if !SENTENCE_TERMINATORS.contains(&c) {
            continue;
        }
        if c == '.' {
            let ends = chars.peek().is_none_or(|&(_, next)| {
                next.is_whitespace()
                    || CLOSERS.contains(&next)
                    || AMBIGUOUS_QUOTES.contains(&next)
                    || SENTENCE_TERMINATORS.contains(&next)
            });
            if !ends {
                continue;
            }
        }

        let mut end = index + c.len_utf8();
        while let Some(&(next_index, next)) = chars.peek() {
            if SENTENCE_TERMINATORS.contains(&next)
                || CLOSERS.contains(&next)
                || AMBIGUOUS_QUOTES.contains(&next)
            {
                end = next_index + next.len_utf8();
                chars.next();
            } else {
                break;
            }
        }
        while let Some(&(next_index, next)) = chars.peek() {
            if next.is_whitespace() {
                end = next_index + next.len_utf8();
                chars.next();
            } else {
                break;
            }
        }

        out.push(&text[start..end]);
        start = end;
    }

    if start < text.len() {
        out.push(&text[start..]);
    }
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TokenClass {
    Space,
    Opening,
    Closing,
    Particle,
    Content,
}

fn classify(token: &str, previous: Option<TokenClass>) -> TokenClass {
    let mut chars = token.chars();
    let first = chars.next().unwrap_or(' ');
    let single = chars.next().is_none();

    if token.chars().all(char::is_whitespace) {
        TokenClass::Space
    } else if single && OPENERS.contains(&first) {
        TokenClass::Opening
    } else if single && AMBIGUOUS_QUOTES.contains(&first) {
        match previous {
            None | Some(TokenClass::Space | TokenClass::Opening) => TokenClass::Opening,
            Some(_) => TokenClass::Closing,
        }
    } else if token.chars().all(is_hiragana) {
        TokenClass::Particle
    } else if token.chars().all(|c| !c.is_alphanumeric()) {
        TokenClass::Closing
    } else {
        TokenClass::Content
    }
}

/// Splits one sentence into phrases.
#[must_use]
pub fn phrases(sentence: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut start = 0;
    let mut previous: Option<TokenClass> = None;

    for (offset, token) in sentence.split_word_bound_indices() {
        let class = classify(token, previous);
        let boundary = match (previous, class) {
            (None, _) | (Some(TokenClass::Opening), TokenClass::Opening) => false,
            (Some(_), TokenClass::Opening) => true,
            (
                Some(TokenClass::Space | TokenClass::Closing | TokenClass::Particle),
                TokenClass::Content,
            ) => true,
            _ => false,
        };
        if boundary && !sentence[start..offset].trim().is_empty() {
            out.push(&sentence[start..offset]);
            start = offset;
        }
        previous = Some(class);
    }

    if start < sentence.len() {
        out.push(&sentence[start..]);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentences_keep_terminal_punctuation_and_spacing() {
        let parts = sentences("One. Two! Three?");

        assert_eq!(parts, vec!["One. ", "Two! ", "Three?"]);
    }

    #[test]
    fn test_sentences_do_not_split_decimals() {
        let parts = sentences("It costs 3.5 dollars. Done.");

        assert_eq!(parts, vec!["It costs 3.5 dollars. ", "Done."]);
    }

    #[test]
    fn test_sentences_split_japanese_full_stops() {
        let parts = sentences("AIの時代が来た。あなたはどうする？「今だ！」と彼は言った");

        assert_eq!(
            parts,
            vec!["AIの時代が来た。", "あなたはどうする？", "「今だ！」", "と彼は言った"]
        );
    }

    #[test]
    fn test_japanese_phrases_attach_trailing_hiragana() {
        let parts = phrases("孫正義が予見する世界。");

        assert_eq!(parts, vec!["孫正義が", "予見する", "世界。"]);
    }

    #[test]
    fn test_english_phrases_keep_trailing_space_and_punctuation() {
        let parts = phrases("Most people wait, (really) wait.");

        assert_eq!(parts, vec!["Most ", "people ", "wait, ", "(really) ", "wait."]);
    }

    #[test]
    fn test_leading_whitespace_stays_with_first_phrase() {
        let parts = phrases("  Hello world");

        assert_eq!(parts, vec!["  Hello ", "world"]);
    }

    #[test]
    fn test_density_detection_and_language_tags() {
        assert_eq!(ScriptDensity::detect("これはテストです"), ScriptDensity::Dense);
        assert_eq!(ScriptDensity::detect("This is a test"), ScriptDensity::Spaced);
        assert_eq!(ScriptDensity::detect("123"), ScriptDensity::Spaced);
        assert_eq!(ScriptDensity::from_language("ja-JP"), ScriptDensity::Dense);
        assert_eq!(ScriptDensity::from_language("en"), ScriptDensity::Spaced);
        assert_eq!(ScriptDensity::Dense.caption_budget(), 26);
    }
}
