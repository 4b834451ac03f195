//! Text helpers: tokenization, keyword extraction, sentence splitting

use rust_stemmers::{Algorithm, Stemmer};
use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;

/// Common English stop words to filter out during tokenization
static STOP_WORDS: OnceLock<HashSet<&'static str>> = OnceLock::new();

/// Porter stemmer for English text
static STEMMER: OnceLock<Stemmer> = OnceLock::new();

fn get_stop_words() -> &'static HashSet<&'static str> {
    STOP_WORDS.get_or_init(|| {
        [
            "a", "an", "and", "are", "as", "at", "be", "but", "by", "for", "if", "in", "into",
            "is", "it", "no", "not", "of", "on", "or", "such", "that", "the", "their", "then",
            "there", "these", "they", "this", "to", "was", "will", "with", "i", "you", "we",
            "he", "she", "me", "my", "our", "your", "so", "do", "did", "have", "has", "had",
            "can", "just", "from", "what", "when", "which", "about", "would", "should",
            "could", "been", "were", "am", "its", "also", "user", "assistant", "system",
        ]
        .iter()
        .copied()
        .collect()
    })
}

fn get_stemmer() -> &'static Stemmer {
    STEMMER.get_or_init(|| Stemmer::create(Algorithm::English))
}

/// Simple word-based tokenizer splitting on non-alphanumeric characters with stop word removal
pub fn tokenize(text: &str) -> Vec<String> {
    let stop_words = get_stop_words();
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|s| s.len() > 1)
        .filter(|s| !stop_words.contains(s))
        .filter(|s| !s.chars().all(|c| c.is_ascii_digit()))
        .map(|s| s.to_string())
        .collect()
}

/// Most frequent keywords, counted by stem and shown in their first surface form.
///
/// Ties break by first appearance so the result is deterministic.
pub fn keywords(text: &str, limit: usize) -> Vec<String> {
    let stemmer = get_stemmer();
    // stem -> (count, first position, surface form)
    let mut counts: HashMap<String, (usize, usize, String)> = HashMap::new();

    for (pos, token) in tokenize(text).into_iter().enumerate() {
        let stem = stemmer.stem(&token).to_string();
        counts
            .entry(stem)
            .and_modify(|e| e.0 += 1)
            .or_insert((1, pos, token));
    }

    let mut ranked: Vec<(usize, usize, String)> = counts.into_values().collect();
    ranked.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));
    ranked.into_iter().take(limit).map(|(_, _, w)| w).collect()
}

/// Split into sentences on `.`, `!`, `?` and line breaks; empty pieces dropped
pub fn sentences(text: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut start = 0;
    for (i, c) in text.char_indices() {
        if matches!(c, '.' | '!' | '?' | '\n') {
            let end = i + c.len_utf8();
            let piece = text[start..end].trim();
            if !piece.is_empty() && piece != "." {
                out.push(piece);
            }
            start = end;
        }
    }
    let tail = text[start..].trim();
    if !tail.is_empty() {
        out.push(tail);
    }
    out
}

/// Collapse all whitespace runs (including newlines) to single spaces
pub fn single_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Truncate to at most `max_chars` characters, ending with `…` when cut
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let keep = max_chars.saturating_sub(1);
    let mut out: String = text.chars().take(keep).collect();
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_basic() {
        let tokens = tokenize("The deploy failed on the staging cluster, 42 times!");
        assert_eq!(tokens, vec!["deploy", "failed", "staging", "cluster", "times"]);
    }

    #[test]
    fn test_keywords_count_by_stem() {
        let text = "Graphs and graph theory. The graph engine prunes graphs. Memory matters.";
        let kw = keywords(text, 2);
        assert_eq!(kw[0], "graphs");
        assert_eq!(kw.len(), 2);
    }

    #[test]
    fn test_keywords_ties_keep_first_appearance() {
        assert_eq!(keywords("alpha beta gamma", 2), vec!["alpha", "beta"]);
    }

    #[test]
    fn test_sentences() {
        assert_eq!(
            sentences("First one. Second one!\nThird"),
            vec!["First one.", "Second one!", "Third"]
        );
        assert!(sentences("   ").is_empty());
    }

    #[test]
    fn test_single_line() {
        assert_eq!(single_line("a\n  b\tc  "), "a b c");
    }

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("short", 10), "short");
        assert_eq!(truncate_chars("abcdefghij", 5), "abcd…");
        assert_eq!(truncate_chars("héllo wörld", 6).chars().count(), 6);
    }
}
