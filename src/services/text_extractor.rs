// Text Extraction Service
// Turns visible document elements into the analysis string and tokenizes it

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Elements whose trimmed text is not longer than this are skipped.
pub const MIN_ELEMENT_CHARS: usize = 20;

/// Computed style of a text-bearing element as reported by the document model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementStyle {
    #[serde(default)]
    pub display_none: bool,
    #[serde(default)]
    pub visibility_hidden: bool,
    #[serde(default)]
    pub opacity_zero: bool,
    pub width: f64,
    pub height: f64,
}

impl Default for ElementStyle {
    fn default() -> Self {
        Self {
            display_none: false,
            visibility_hidden: false,
            opacity_zero: false,
            width: 1.0,
            height: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextElement {
    pub text: String,
    #[serde(default)]
    pub style: ElementStyle,
}

impl TextElement {
    /// Visible element with a non-zero rendered box.
    pub fn visible(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: ElementStyle::default(),
        }
    }

    pub fn hidden(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: ElementStyle {
                display_none: true,
                ..ElementStyle::default()
            },
        }
    }

    pub fn is_visible(&self) -> bool {
        let style = &self.style;
        !style.display_none
            && !style.visibility_hidden
            && !style.opacity_zero
            && style.width > 0.0
            && style.height > 0.0
    }
}

/// Concatenate the trimmed text of visible, long-enough elements.
pub fn extract_text_content(elements: &[TextElement]) -> String {
    let parts: Vec<&str> = elements
        .iter()
        .filter(|el| el.is_visible())
        .map(|el| el.text.trim())
        .filter(|t| t.chars().count() > MIN_ELEMENT_CHARS)
        .collect();

    parts.join(" ").trim().to_string()
}

/// Whitespace tokenization with empty tokens dropped, order preserved.
pub fn split_words(text: &str) -> Vec<String> {
    text.split_whitespace().map(|w| w.to_string()).collect()
}

fn sentence_break_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[.!?]+").expect("sentence break regex"))
}

fn paragraph_break_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\n\n+").expect("paragraph break regex"))
}

/// Split on runs of sentence punctuation; fragments are returned untrimmed.
pub fn split_sentences(text: &str) -> Vec<&str> {
    if text.is_empty() {
        return vec![];
    }
    sentence_break_re().split(text).collect()
}

/// Split on blank-line runs; fragments are returned untrimmed.
pub fn split_paragraphs(text: &str) -> Vec<&str> {
    if text.is_empty() {
        return vec![];
    }
    paragraph_break_re().split(text).collect()
}

/// Normalize line endings and odd spaces in loaded document text
pub fn normalize_document_text(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    // Ideographic and non-breaking spaces become plain spaces
    let mut s = text.replace(['\u{3000}', '\u{00A0}'], " ");

    s = s.replace("\r\n", "\n").replace('\r', "\n");

    // Whitespace-only lines would hide paragraph breaks
    s = s
        .lines()
        .map(|ln| ln.trim_end())
        .collect::<Vec<_>>()
        .join("\n");

    s.trim().to_string()
}

/// Build elements from plain text, one per blank-line separated block
pub fn elements_from_text(text: &str) -> Vec<TextElement> {
    let normalized = normalize_document_text(text);
    split_paragraphs(&normalized)
        .into_iter()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(TextElement::visible)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_skips_short_and_hidden() {
        let elements = vec![
            TextElement::visible("   This paragraph is long enough to count.   "),
            TextElement::visible("too short"),
            TextElement::hidden("This hidden paragraph is long enough to count."),
            TextElement::visible("Exactly twenty chars"),
            TextElement::visible("Another visible paragraph of decent size."),
        ];
        let text = extract_text_content(&elements);
        assert_eq!(
            text,
            "This paragraph is long enough to count. Another visible paragraph of decent size."
        );
    }

    #[test]
    fn test_extract_zero_size_is_invisible() {
        let mut el = TextElement::visible("A perfectly long paragraph that is collapsed.");
        el.style.height = 0.0;
        assert!(!el.is_visible());
        assert_eq!(extract_text_content(&[el]), "");
    }

    #[test]
    fn test_extract_empty_input() {
        assert_eq!(extract_text_content(&[]), "");
    }

    #[test]
    fn test_split_words_drops_empty_tokens() {
        assert_eq!(split_words("  a  b\n\nc "), vec!["a", "b", "c"]);
        assert!(split_words("   ").is_empty());
    }

    #[test]
    fn test_split_sentences_on_punctuation_runs() {
        let parts = split_sentences("One. Two!? Three");
        assert_eq!(parts, vec!["One", " Two", " Three"]);
    }

    #[test]
    fn test_split_paragraphs_on_blank_lines() {
        let parts = split_paragraphs("First\n\nSecond\n\n\nThird\nstill third");
        assert_eq!(parts, vec!["First", "Second", "Third\nstill third"]);
    }

    #[test]
    fn test_elements_from_text_normalizes_line_endings() {
        let elements = elements_from_text("First block\r\n  \r\nSecond\u{00A0}block");
        assert_eq!(elements.len(), 2);
        assert_eq!(elements[1].text, "Second block");
    }
}
