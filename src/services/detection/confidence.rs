// Confidence Estimation
// Sample size and score extremity decide how much weight the score deserves

use crate::models::Confidence;

const LOW_SAMPLE_WORDS: usize = 50;
const MEDIUM_SAMPLE_WORDS: usize = 200;
const CLEAR_AI_SCORE: f64 = 0.7;
const CLEAR_HUMAN_SCORE: f64 = 0.3;

/// `score` is the unrounded composite score.
pub fn estimate_confidence(word_count: usize, score: f64) -> Confidence {
    if word_count == 0 {
        return Confidence::NotApplicable;
    }
    if word_count < LOW_SAMPLE_WORDS {
        return Confidence::Low;
    }
    if word_count < MEDIUM_SAMPLE_WORDS {
        return Confidence::Medium;
    }
    if score > CLEAR_AI_SCORE || score < CLEAR_HUMAN_SCORE {
        return Confidence::High;
    }
    Confidence::Medium
}
