//! Quality heuristic.
//!
//! `overall = length + character_diversity + structure + complexity`, each sub-score in `[0, 25]`:
//!
//! - length: `min(words / 10, 1) * 25`
//! - character diversity: `|distinct(lowercase(text)) ∩ ALPHABET| / |ALPHABET| * 25`
//! - structure: `25` if the text contains `.`, `!` or `?`, else `0`
//! - complexity: `min(mean_word_length / 6, 1) * 25`, `0` when there are no words
//!
//! Sub-scores and the total are rounded to one decimal; the total is summed before rounding.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::round1;

/// Symbols counted towards character diversity.
///
/// The uppercase accented vowels are part of the set but can never match once the text is
/// lowercased, which caps the diversity sub-score at `31 / 36 * 25 = 21.5`.
pub const ALPHABET: [char; 36] = [
    'a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'i', 'j', 'k', 'l', 'm', 'n', 'o', 'p', 'q', 'r', 's', 't', 'u', 'v', 'w', 'x', 'y',
    'z', 'á', 'é', 'í', 'ó', 'ú', 'Á', 'É', 'Í', 'Ó', 'Ú',
];

const SENTENCE_PUNCTUATION: [char; 3] = ['.', '!', '?'];

/// Maximum value of a single sub-score.
const SUB_SCORE_MAX: f64 = 25.0;

/// Word count at which the length sub-score saturates.
const SATURATING_WORD_COUNT: f64 = 10.0;

/// Mean word length at which the complexity sub-score saturates.
const SATURATING_WORD_LENGTH: f64 = 6.0;

/// Quality breakdown for a text sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct QualityMetrics {
    pub overall_score: f64,
    pub length_score: f64,
    pub character_diversity: f64,
    pub structure_score: f64,
    pub complexity_score: f64,
    /// Whitespace-delimited tokens
    pub word_count: usize,
    /// Characters (code points) in the untouched input
    pub character_count: usize,
}

/// Compute the quality heuristic for `text`.
pub fn quality(text: &str) -> QualityMetrics {
    let words: Vec<&str> = text.split_whitespace().collect();
    let word_count = words.len();

    let length_score = (word_count as f64 / SATURATING_WORD_COUNT).min(1.0) * SUB_SCORE_MAX;

    let distinct: HashSet<char> = text.to_lowercase().chars().collect();
    let matched = ALPHABET.iter().filter(|c| distinct.contains(*c)).count();
    let character_diversity = matched as f64 / ALPHABET.len() as f64 * SUB_SCORE_MAX;

    let structure_score = if text.contains(SENTENCE_PUNCTUATION) { SUB_SCORE_MAX } else { 0.0 };

    let average_word_length = if words.is_empty() {
        0.0
    } else {
        words.iter().map(|w| w.chars().count()).sum::<usize>() as f64 / word_count as f64
    };
    let complexity_score = (average_word_length / SATURATING_WORD_LENGTH).min(1.0) * SUB_SCORE_MAX;

    let total = length_score + character_diversity + structure_score + complexity_score;

    QualityMetrics {
        overall_score: round1(total),
        length_score: round1(length_score),
        character_diversity: round1(character_diversity),
        structure_score: round1(structure_score),
        complexity_score: round1(complexity_score),
        word_count,
        character_count: text.chars().count(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_sub_scores_bounded(metrics: &QualityMetrics) {
        for score in [
            metrics.length_score,
            metrics.character_diversity,
            metrics.structure_score,
            metrics.complexity_score,
        ] {
            assert!((0.0..=25.0).contains(&score), "sub-score {score} out of range");
        }
        assert!((0.0..=100.0).contains(&metrics.overall_score));
    }

    #[test]
    fn empty_text_scores_zero() {
        let metrics = quality("");
        assert_eq!(metrics.overall_score, 0.0);
        assert_eq!(metrics.length_score, 0.0);
        assert_eq!(metrics.character_diversity, 0.0);
        assert_eq!(metrics.structure_score, 0.0);
        assert_eq!(metrics.complexity_score, 0.0);
        assert_eq!(metrics.word_count, 0);
        assert_eq!(metrics.character_count, 0);
    }

    #[test]
    fn whitespace_only_text_has_no_words() {
        let metrics = quality("   \t\n ");
        assert_eq!(metrics.word_count, 0);
        assert_eq!(metrics.complexity_score, 0.0);
        assert_eq!(metrics.overall_score, 0.0);
        assert_eq!(metrics.character_count, 6);
    }

    #[test]
    fn reference_sentence() {
        let metrics = quality("Waa wanaagsan tahay.");
        assert_eq!(metrics.word_count, 3);
        assert_eq!(metrics.length_score, 7.5);
        assert_eq!(metrics.structure_score, 25.0);
        // w a n g s t h y
        assert_eq!(metrics.character_diversity, 5.6);
        // (3 + 9 + 6) / 3 = 6 letters per word saturates
        assert_eq!(metrics.complexity_score, 25.0);
        assert_eq!(metrics.overall_score, 63.1);
        assert_eq!(metrics.character_count, 20);
    }

    #[test]
    fn structure_requires_sentence_punctuation() {
        assert_eq!(quality("maya").structure_score, 0.0);
        assert_eq!(quality("maya,").structure_score, 0.0);
        assert_eq!(quality("maya!").structure_score, 25.0);
        assert_eq!(quality("maya?").structure_score, 25.0);
    }

    #[test]
    fn length_saturates_at_ten_words() {
        let ten = "a ".repeat(10);
        let twenty = "a ".repeat(20);
        assert_eq!(quality(&ten).length_score, 25.0);
        assert_eq!(quality(&twenty).length_score, 25.0);
        assert_eq!(quality("a a a a").length_score, 10.0);
    }

    #[test]
    fn complexity_rounds_ties_to_even() {
        // two words, three characters: 1.5 / 6 * 25 = 6.25
        let metrics = quality("ab c");
        assert_eq!(metrics.complexity_score, 6.2);
        assert_eq!(metrics.length_score, 5.0);
        // 5.0 + 2.083.. + 0 + 6.25, rounded once at the end
        assert_eq!(metrics.overall_score, 13.3);
    }

    #[test]
    fn diversity_folds_case_before_matching() {
        assert_eq!(quality("ABC").character_diversity, quality("abc").character_diversity);
        // Á É Í Ó Ú fold onto á é í ó ú: 5 / 36 * 25
        assert_eq!(quality("ÁÉÍÓÚ").character_diversity, 3.5);
    }

    #[test]
    fn diversity_ceiling_is_below_twenty_five() {
        let metrics = quality("abcdefghijklmnopqrstuvwxyz áéíóú ÁÉÍÓÚ");
        assert_eq!(metrics.character_diversity, 21.5);
        assert_sub_scores_bounded(&metrics);
    }

    #[test]
    fn digits_and_symbols_do_not_count_towards_diversity() {
        assert_eq!(quality("123 456 !!!").character_diversity, 0.0);
    }

    #[test]
    fn saturated_text_stays_within_bounds() {
        let text = "Dhammaantood waxay ku dhasheen xor ahaan, sharaf iyo xuquuqna waa isku siman yihiin. \
                    Waxaa Alle siiyey aqoon iyo wacyi, waana in qof la arkaa qofka kale ula dhaqmaa si walaaltinimo ah!";
        let metrics = quality(text);
        assert_eq!(metrics.length_score, 25.0);
        assert_eq!(metrics.structure_score, 25.0);
        assert_sub_scores_bounded(&metrics);
    }

    #[test]
    fn counts_code_points_not_bytes() {
        let metrics = quality("áá");
        assert_eq!(metrics.character_count, 2);
        // one word of two characters: 2 / 6 * 25 = 8.33..
        assert_eq!(metrics.complexity_score, 8.3);
    }
}
