use std::collections::HashMap;

use crate::language::Language;

/// Picks the most frequent contiguous n-gram of a text as its topic phrase.
///
/// The text is lowercased, stripped of punctuation and tokenized on
/// whitespace; tokens of length <= 2 and stop words for `language` are
/// discarded before n-grams are counted. Ties go to the n-gram encountered
/// first. Returns an empty string when fewer than `n` tokens survive
/// filtering.
pub fn extract_topic(text: &str, language: Language, n: usize) -> String {
    if n == 0 {
        return String::new();
    }

    let cleaned: String = text
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace() || *c == '_')
        .collect();

    let stop_words = language.stop_words();
    let tokens: Vec<&str> = cleaned
        .split_whitespace()
        .filter(|token| token.chars().count() > 2 && !stop_words.contains(token))
        .collect();

    if tokens.len() < n {
        return String::new();
    }

    let mut counts: HashMap<String, usize> = HashMap::new();
    let mut first_seen: Vec<String> = Vec::new();
    for window in tokens.windows(n) {
        let gram = window.join(" ");
        match counts.get_mut(&gram) {
            Some(count) => *count += 1,
            None => {
                counts.insert(gram.clone(), 1);
                first_seen.push(gram);
            }
        }
    }

    let mut best_gram = String::new();
    let mut best_count = 0;
    for gram in first_seen {
        let count = counts[&gram];
        if count > best_count {
            best_count = count;
            best_gram = gram;
        }
    }
    best_gram
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn returns_most_frequent_bigram() {
        let text = "Rust async runtime. The Rust async runtime schedules tasks. Tasks wake.";
        assert_eq!(extract_topic(text, Language::En, 2), "rust async");
    }

    #[test]
    fn filters_stop_words_and_short_tokens() {
        let text = "a inteligência artificial e a inteligência artificial no dia a dia";
        assert_eq!(
            extract_topic(text, Language::Pt, 2),
            "inteligência artificial"
        );
    }

    #[test]
    fn empty_when_too_few_tokens_survive() {
        assert_eq!(extract_topic("a o", Language::Pt, 2), "");
        assert_eq!(extract_topic("", Language::En, 2), "");
        assert_eq!(extract_topic("palavra", Language::Pt, 2), "");
    }

    #[test]
    fn ties_break_by_first_encounter() {
        let text = "alpha beta gamma delta";
        // every bigram occurs once, the first one wins
        assert_eq!(extract_topic(text, Language::En, 2), "alpha beta");
    }

    #[test]
    fn deterministic_for_same_input() {
        let text = "machine learning models need machine learning data";
        let first = extract_topic(text, Language::En, 2);
        for _ in 0..10 {
            assert_eq!(extract_topic(text, Language::En, 2), first);
        }
    }
}
