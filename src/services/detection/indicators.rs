// Indicator Set
// Five independent heuristics, each bounded by its fixed maximum contribution

use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;

use crate::models::{IndicatorKind, IndicatorResult, ScoreVector, TextSample};
use crate::services::text_extractor::{split_paragraphs, split_sentences};

const MIN_SENTENCE_CHARS: usize = 10;
const MIN_SENTENCES: usize = 4;
const SENTENCE_VARIANCE_MAX: f64 = 20.0;

const MIN_PHRASE_MATCHES: usize = 3;
const PHRASE_WEIGHT: f64 = 0.05;

const CONTRACTION_RATIO_MAX: f64 = 0.01;
const FORMALITY_MIN_WORDS: usize = 100;

const DIVERSITY_LOW: f64 = 0.6;
const DIVERSITY_HIGH: f64 = 0.8;

const MIN_PARAGRAPH_CHARS: usize = 50;
const MIN_PARAGRAPHS: usize = 3;
const PARAGRAPH_RELATIVE_VARIANCE_MAX: f64 = 0.3;

/// Stock transitions over-represented in generated prose
pub const AI_PHRASES: [&str; 11] = [
    "it is important to note",
    "it is worth mentioning",
    "in conclusion",
    "to summarize",
    "overall",
    "furthermore",
    "moreover",
    "additionally",
    "in addition to",
    "as a result",
    "consequently",
];

fn contraction_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // ASCII word characters only; accented letters do not form contractions
    RE.get_or_init(|| Regex::new(r"(?-u:\b\w+'\w+\b)").expect("contraction regex"))
}

fn whitespace_run_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("whitespace regex"))
}

/// Word count of an untrimmed sentence fragment.
///
/// Splits on whitespace runs and keeps empty edge tokens, so a fragment that
/// starts after ". " counts one more than its visible words.
pub fn sentence_word_count(sentence: &str) -> usize {
    whitespace_run_re().split(sentence).count()
}

/// Population variance (denominator = count); 0 for an empty slice.
pub fn population_variance(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n
}

/// Evaluate all indicators in their fixed order.
pub fn compute_indicators(sample: &TextSample) -> ScoreVector {
    IndicatorKind::ALL
        .iter()
        .map(|&kind| compute_indicator(kind, sample))
        .collect()
}

pub fn compute_indicator(kind: IndicatorKind, sample: &TextSample) -> IndicatorResult {
    match kind {
        IndicatorKind::SentenceUniformity => sentence_uniformity(sample.text()),
        IndicatorKind::AiPhrases => ai_phrases(sample.text()),
        IndicatorKind::Formality => formality(sample.text(), sample.words()),
        IndicatorKind::VocabularyDiversity => vocabulary_diversity(sample.words()),
        IndicatorKind::ParagraphUniformity => paragraph_uniformity(sample.text()),
    }
}

/// Uniform sentence lengths
pub fn sentence_uniformity(text: &str) -> IndicatorResult {
    let kind = IndicatorKind::SentenceUniformity;
    let lengths: Vec<f64> = split_sentences(text)
        .into_iter()
        .filter(|s| s.trim().chars().count() > MIN_SENTENCE_CHARS)
        .map(|s| sentence_word_count(s) as f64)
        .collect();

    if lengths.len() < MIN_SENTENCES {
        return IndicatorResult::idle(kind);
    }

    if population_variance(&lengths) < SENTENCE_VARIANCE_MAX {
        IndicatorResult::fired(kind)
    } else {
        IndicatorResult::idle(kind)
    }
}

/// Number of distinct stock phrases present (case-insensitive)
pub fn count_ai_phrases(text: &str) -> usize {
    let lower = text.to_lowercase();
    AI_PHRASES.iter().filter(|p| lower.contains(*p)).count()
}

pub fn ai_phrases(text: &str) -> IndicatorResult {
    let kind = IndicatorKind::AiPhrases;
    let matched = count_ai_phrases(text);
    if matched < MIN_PHRASE_MATCHES {
        return IndicatorResult::idle(kind);
    }
    IndicatorResult::partial(kind, matched as f64 * PHRASE_WEIGHT)
}

/// Long text with almost no contractions
pub fn formality(text: &str, words: &[String]) -> IndicatorResult {
    let kind = IndicatorKind::Formality;
    if words.is_empty() {
        return IndicatorResult::idle(kind);
    }
    let contractions = contraction_re().find_iter(text).count();
    let ratio = contractions as f64 / words.len() as f64;

    if ratio < CONTRACTION_RATIO_MAX && words.len() > FORMALITY_MIN_WORDS {
        IndicatorResult::fired(kind)
    } else {
        IndicatorResult::idle(kind)
    }
}

/// Type-token ratio over case-folded words
pub fn type_token_ratio(words: &[String]) -> f64 {
    if words.is_empty() {
        return 0.0;
    }
    let unique: HashSet<String> = words.iter().map(|w| w.to_lowercase()).collect();
    unique.len() as f64 / words.len() as f64
}

pub fn vocabulary_diversity(words: &[String]) -> IndicatorResult {
    let kind = IndicatorKind::VocabularyDiversity;
    let ttr = type_token_ratio(words);
    if ttr > DIVERSITY_LOW && ttr < DIVERSITY_HIGH {
        IndicatorResult::fired(kind)
    } else {
        IndicatorResult::idle(kind)
    }
}

/// Uniform paragraph lengths relative to their mean
pub fn paragraph_uniformity(text: &str) -> IndicatorResult {
    let kind = IndicatorKind::ParagraphUniformity;
    let lengths: Vec<f64> = split_paragraphs(text)
        .into_iter()
        .filter(|p| p.trim().chars().count() > MIN_PARAGRAPH_CHARS)
        .map(|p| p.chars().count() as f64)
        .collect();

    if lengths.len() < MIN_PARAGRAPHS {
        return IndicatorResult::idle(kind);
    }

    let mean = lengths.iter().sum::<f64>() / lengths.len() as f64;
    let relative_variance = population_variance(&lengths) / mean;

    if relative_variance < PARAGRAPH_RELATIVE_VARIANCE_MAX {
        IndicatorResult::fired(kind)
    } else {
        IndicatorResult::idle(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::text_extractor::split_words;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_population_variance() {
        assert_eq!(population_variance(&[]), 0.0);
        assert_eq!(population_variance(&[5.0, 5.0, 5.0]), 0.0);
        // mean 5, squared deviations 9+1+1+9 = 20, / 4
        assert!(approx(population_variance(&[2.0, 4.0, 6.0, 8.0]), 5.0));
    }

    #[test]
    fn test_sentence_uniformity_needs_four_sentences() {
        let three = "The first sentence is here. The second sentence is here. The third sentence is here.";
        assert_eq!(sentence_uniformity(three).contribution, 0.0);

        let four = format!("{} The fourth sentence is here.", three);
        assert!(approx(sentence_uniformity(&four).contribution, 0.15));
    }

    #[test]
    fn test_sentence_uniformity_ignores_short_fragments() {
        let text = "Hi. Ok. Yes! No? Fine. The only real sentence is this one.";
        assert_eq!(sentence_uniformity(text).contribution, 0.0);
    }

    #[test]
    fn test_sentence_uniformity_high_variance() {
        let long = "word ".repeat(40);
        let text = format!(
            "Short sentence number one. {}. Short sentence number two. {}. Short sentence three.",
            long, long
        );
        assert_eq!(sentence_uniformity(&text).contribution, 0.0);
    }

    fn sentences_of(word_counts: &[usize]) -> String {
        word_counts
            .iter()
            .enumerate()
            .map(|(i, &n)| {
                let words: Vec<String> = (0..n).map(|w| format!("s{}w{}", i, w)).collect();
                format!("{}.", words.join(" "))
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    #[test]
    fn test_sentence_word_count_keeps_edge_tokens() {
        assert_eq!(sentence_word_count("one two three"), 3);
        assert_eq!(sentence_word_count(" one two three"), 4);
        assert_eq!(sentence_word_count(""), 1);
    }

    #[test]
    fn test_sentence_uniformity_counts_leading_space_token() {
        // counted as [21, 11, 11, 11], variance 18.75
        let text = sentences_of(&[21, 10, 10, 10]);
        assert!(approx(sentence_uniformity(&text).contribution, 0.15));
    }

    #[test]
    fn test_sentence_uniformity_variance_cutoff_is_exclusive() {
        // counted as [16, 4, 12, 8]: mean 10, variance exactly 20
        let at_cutoff = sentences_of(&[16, 3, 11, 7]);
        assert_eq!(sentence_uniformity(&at_cutoff).contribution, 0.0);

        // counted as [15, 5, 12, 8]: variance 14.5
        let below = sentences_of(&[15, 4, 11, 7]);
        assert!(approx(sentence_uniformity(&below).contribution, 0.15));
    }

    #[test]
    fn test_ai_phrases_presence_not_frequency() {
        let text = "Moreover, moreover, MOREOVER. Furthermore it works.";
        assert_eq!(count_ai_phrases(text), 2);
        assert_eq!(ai_phrases(text).contribution, 0.0);
    }

    #[test]
    fn test_ai_phrases_scaling_and_cap() {
        let three = "Furthermore, this. Moreover, that. In conclusion, done.";
        assert!(approx(ai_phrases(three).contribution, 0.15));

        let five = "Furthermore moreover additionally consequently. Overall fine.";
        assert_eq!(count_ai_phrases(five), 5);
        assert!(approx(ai_phrases(five).contribution, 0.2));
    }

    #[test]
    fn test_formality_requires_long_text() {
        let short = "plain ".repeat(100);
        let words = split_words(&short);
        assert_eq!(formality(&short, &words).contribution, 0.0);

        let long = "plain ".repeat(101);
        let words = split_words(&long);
        assert!(approx(formality(&long, &words).contribution, 0.1));
    }

    #[test]
    fn test_formality_contractions_disable() {
        let text = format!("{} don't won't", "plain ".repeat(150));
        let words = split_words(&text);
        // 2 / 152 > 0.01
        assert_eq!(formality(&text, &words).contribution, 0.0);
    }

    #[test]
    fn test_contractions_are_ascii_only() {
        assert_eq!(contraction_re().find_iter("don't café's").count(), 1);
    }

    #[test]
    fn test_vocabulary_diversity_bounds_are_exclusive() {
        // 7 distinct of 10
        let words = split_words("a b c d e f g a b c");
        assert!(approx(vocabulary_diversity(&words).contribution, 0.15));

        // exactly 0.6
        let words = split_words("a b c d e f a b c d");
        assert_eq!(vocabulary_diversity(&words).contribution, 0.0);

        // exactly 0.8
        let words = split_words("a b c d e f g h a b");
        assert_eq!(vocabulary_diversity(&words).contribution, 0.0);
    }

    #[test]
    fn test_vocabulary_diversity_case_folds() {
        let words = split_words("The the THE tHe cat");
        assert!(approx(type_token_ratio(&words), 0.4));
    }

    #[test]
    fn test_paragraph_uniformity() {
        let para = "x".repeat(60);
        let uniform = format!("{p}\n\n{p}\n\n{p}", p = para);
        assert!(approx(paragraph_uniformity(&uniform).contribution, 0.1));

        let two = format!("{p}\n\n{p}", p = para);
        assert_eq!(paragraph_uniformity(&two).contribution, 0.0);

        let varied = format!("{}\n\n{}\n\n{}", "x".repeat(60), "x".repeat(200), "x".repeat(400));
        assert_eq!(paragraph_uniformity(&varied).contribution, 0.0);
    }

    #[test]
    fn test_paragraph_relative_variance_cutoff_is_exclusive() {
        // lengths 74, 80, 86: variance 24, relative variance exactly 0.3
        let at_cutoff = format!("{}\n\n{}\n\n{}", "x".repeat(74), "x".repeat(80), "x".repeat(86));
        assert_eq!(paragraph_uniformity(&at_cutoff).contribution, 0.0);

        // lengths 75, 80, 85: relative variance 0.208
        let below = format!("{}\n\n{}\n\n{}", "x".repeat(75), "x".repeat(80), "x".repeat(85));
        assert!(approx(paragraph_uniformity(&below).contribution, 0.1));
    }

    #[test]
    fn test_compute_indicators_order_and_bounds() {
        let sample = TextSample::new("Some text. Nothing to see here at all.");
        let vector = compute_indicators(&sample);
        let kinds: Vec<IndicatorKind> = vector.iter().map(|r| r.name).collect();
        assert_eq!(kinds, IndicatorKind::ALL.to_vec());
        for r in &vector {
            assert!(r.contribution >= 0.0 && r.contribution <= r.name.max_contribution());
        }
    }
}
