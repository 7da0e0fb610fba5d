use ndarray::Array1;

use crate::vocabulary::Vocabulary;

/// A fixed-length numeric feature vector, one slot per vocabulary term.
pub type FeatureVector = Array1<f64>;

/// Converts a message into a TF-IDF feature vector over `vocabulary`.
///
/// This reproduces the featurization the bundled message model was trained
/// against, so its quirks are part of the model contract and are kept as-is:
///
/// - The input is tokenized by whitespace; no stemming, no casefolding.
/// - A term only scores if it appears in the raw input as a *substring*, not
///   at a token boundary. A vocabulary term buried inside an unrelated word
///   passes that gate (its exact-token count is then usually zero).
/// - Term frequency is the exact-token count divided by the token count.
/// - The IDF factor is the single-document degenerate `ln(character_length)`:
///   with a corpus of exactly one message the matched-document count is
///   always one, so `ln(len / 1)` collapses to `ln(len)`.
///
/// Every slot is explicitly assigned: terms that fail the substring gate get
/// `0.0`, and an empty or all-whitespace input produces an all-zero vector
/// rather than dividing by a zero token count.
///
/// Pure function of `(text, vocabulary)`; the result length always equals
/// `vocabulary.len()`.
pub fn vectorize(text: &str, vocabulary: &Vocabulary) -> FeatureVector {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    let token_count = tokens.len();
    let char_count = text.chars().count();

    let mut features = Array1::zeros(vocabulary.len());
    if token_count == 0 {
        return features;
    }

    let idf = (char_count as f64).ln();
    for (slot, term) in vocabulary.iter().enumerate() {
        if !text.contains(term) {
            continue;
        }
        let occurrences = tokens.iter().filter(|&&token| token == term).count();
        let tf = occurrences as f64 / token_count as f64;
        features[slot] = tf * idf;
    }
    features
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spam_vocabulary() -> Vocabulary {
        Vocabulary::from_terms(["free", "win", "call"])
    }

    #[test]
    fn test_vector_length_matches_vocabulary() {
        let vocab = spam_vocabulary();
        assert_eq!(vectorize("any text at all", &vocab).len(), vocab.len());
        assert_eq!(vectorize("", &vocab).len(), vocab.len());

        let empty = Vocabulary::from_terms(Vec::<String>::new());
        assert_eq!(vectorize("some text", &empty).len(), 0);
    }

    #[test]
    fn test_absent_term_is_exactly_zero() {
        let vocab = spam_vocabulary();
        let features = vectorize("hello there general kenobi", &vocab);
        for slot in 0..vocab.len() {
            assert_eq!(features[slot], 0.0);
        }
    }

    #[test]
    fn test_empty_input_yields_zero_vector() {
        let vocab = spam_vocabulary();
        let features = vectorize("", &vocab);
        assert!(features.iter().all(|&v| v == 0.0));
        // Whitespace-only input has zero tokens too; must not divide by zero.
        let features = vectorize("   ", &vocab);
        assert!(features.iter().all(|&v| v == 0.0));
        assert!(features.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_idempotent() {
        let vocab = spam_vocabulary();
        let text = "call now to win a free free prize";
        assert_eq!(vectorize(text, &vocab), vectorize(text, &vocab));
    }

    #[test]
    fn test_worked_spam_scenario() {
        // 9 tokens, 36 characters; "call" occurs twice as an exact token.
        let vocab = spam_vocabulary();
        let text = "call me to win a free prize call now";
        assert_eq!(text.chars().count(), 36);

        let features = vectorize(text, &vocab);
        let idf = 36f64.ln();
        assert!((features[0] - (1.0 / 9.0) * idf).abs() < 1e-12); // free
        assert!((features[1] - (1.0 / 9.0) * idf).abs() < 1e-12); // win
        assert!((features[2] - (2.0 / 9.0) * idf).abs() < 1e-12); // call
    }

    #[test]
    fn test_substring_gate_without_token_match_scores_zero() {
        // "win" is a substring of "winter" but never an exact token, so the
        // gate passes while the term frequency stays zero.
        let vocab = spam_vocabulary();
        let features = vectorize("winter is coming", &vocab);
        assert_eq!(features[1], 0.0);
    }

    #[test]
    fn test_single_character_match_scores_zero_via_idf() {
        let vocab = Vocabulary::from_terms(["a"]);
        // One-character input: idf = ln(1) = 0.
        let features = vectorize("a", &vocab);
        assert_eq!(features[0], 0.0);
    }

    #[test]
    fn test_token_frequency_uses_exact_equality() {
        let vocab = Vocabulary::from_terms(["call"]);
        // "calling" contains the substring but only the bare token counts.
        let features = vectorize("call calling call", &vocab);
        let expected = (2.0 / 3.0) * ("call calling call".chars().count() as f64).ln();
        assert!((features[0] - expected).abs() < 1e-12);
    }
}
