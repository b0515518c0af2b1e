//! Frequency dictionary and candidate generation.

use std::collections::HashMap;
use std::path::Path;

use tracing::debug;

use super::levenshtein;
use crate::dialect::{language_of, DialectCatalog};
use crate::error::{ProcessorError, ProcessorResult};

const BUILTIN_ENGLISH: &str = include_str!("../../data/en_words.txt");

/// Maximum suggestions per word.
pub const MAX_SUGGESTIONS: usize = 5;

/// Largest edit distance searched for suggestions.
const MAX_DISTANCE: usize = 2;

/// Regular suffixes and the endings that restore the base form.
const INFLECTIONS: &[(&str, &[&str])] = &[
    ("ies", &["y"]),
    ("ied", &["y"]),
    ("es", &[""]),
    ("s", &[""]),
    ("ed", &["", "e"]),
    ("ing", &["", "e"]),
    ("er", &["", "e"]),
    ("est", &["", "e"]),
    ("ly", &[""]),
];

/// Shortest stem an inflection rule may leave behind.
const MIN_STEM: usize = 2;

/// Dictionary-backed spell checker.
#[derive(Debug, Clone, Default)]
pub struct SpellChecker {
    /// word → frequency weight
    words: HashMap<String, u64>,
}

impl SpellChecker {
    /// Parse a word list with one `word [count]` per line.
    ///
    /// Lines without a count are weighted by position, earliest highest.
    #[must_use]
    pub fn from_word_list(content: &str) -> Self {
        let lines: Vec<&str> = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .collect();

        let total = lines.len() as u64;
        let mut words = HashMap::with_capacity(lines.len());
        for (rank, line) in lines.iter().enumerate() {
            let mut parts = line.split_whitespace();
            let Some(word) = parts.next() else { continue };
            let count = parts
                .next()
                .and_then(|c| c.parse().ok())
                .unwrap_or(total - rank as u64);
            words.entry(word.to_lowercase()).or_insert(count);
        }

        Self { words }
    }

    /// Checker for a dialect.
    ///
    /// Uses `dictionary` when given, otherwise the built-in list for the
    /// language, then adds the dialect's own words from the catalog.
    pub fn for_dialect(
        dialect: &str,
        dictionary: Option<&Path>,
        mappings: Option<&Path>,
    ) -> ProcessorResult<Self> {
        let language = language_of(dialect);
        let mut checker = match dictionary {
            Some(path) => {
                let content =
                    std::fs::read_to_string(path).map_err(|source| ProcessorError::Data {
                        path: path.to_path_buf(),
                        source,
                    })?;
                Self::from_word_list(&content)
            }
            None if language == "en" => Self::from_word_list(BUILTIN_ENGLISH),
            None => return Err(ProcessorError::UnsupportedLanguage(language.to_string())),
        };

        let catalog = DialectCatalog::new(mappings);
        if let Some(mapping) = catalog.find(dialect)? {
            let weight = checker.words.values().copied().max().unwrap_or(1);
            checker.extend(mapping.words.iter().map(String::as_str), weight);

            // One level only; the shared dialect's own `spelling` is ignored.
            if let Some(parent) = mapping.spelling.as_deref().filter(|p| *p != dialect) {
                match catalog.find(parent)? {
                    Some(shared) => checker.extend(shared.words.iter().map(String::as_str), weight),
                    None => debug!(dialect, parent, "Shared spelling dialect not found"),
                }
            }
        }

        debug!(dialect, words = checker.len(), "Loaded spelling dictionary");
        Ok(checker)
    }

    /// Add single-word entries with the given weight.
    pub fn extend<'w>(&mut self, words: impl IntoIterator<Item = &'w str>, weight: u64) {
        for word in words {
            if !word.is_empty() && !word.contains(char::is_whitespace) {
                self.words.entry(word.to_lowercase()).or_insert(weight);
            }
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.words.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Whether a lower-case word is in the dictionary, directly, as a
    /// possessive, or as a regular inflection (`voted`, `queues`,
    /// `stopping`) of a listed word.
    #[must_use]
    pub fn known(&self, word: &str) -> bool {
        self.known_form(word)
            || word
                .strip_suffix("'s")
                .is_some_and(|stem| self.known_form(stem))
    }

    fn known_form(&self, word: &str) -> bool {
        self.words.contains_key(word)
            || base_forms(word)
                .iter()
                .any(|base| self.words.contains_key(base))
    }

    /// Unknown words in first-occurrence order, without duplicates.
    #[must_use]
    pub fn unknown<'t>(&self, words: impl IntoIterator<Item = &'t str>) -> Vec<&'t str> {
        let mut unknown: Vec<&str> = Vec::new();
        for word in words {
            if !self.known(word) && !unknown.contains(&word) {
                unknown.push(word);
            }
        }
        unknown
    }

    /// Likely corrections: dictionary words at the smallest edit distance
    /// (one, else two), most frequent first.
    #[must_use]
    pub fn candidates(&self, word: &str) -> Vec<String> {
        if self.known(word) {
            return vec![word.to_string()];
        }

        let mut by_distance: Vec<(usize, u64, &str)> = self
            .words
            .iter()
            .filter_map(|(w, &count)| {
                levenshtein::within(word, w, MAX_DISTANCE).map(|d| (d, count, w.as_str()))
            })
            .collect();

        let Some(best) = by_distance.iter().map(|(d, _, _)| *d).min() else {
            return Vec::new();
        };
        by_distance.retain(|(d, _, _)| *d == best);
        by_distance.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.2.cmp(b.2)));

        by_distance
            .into_iter()
            .take(MAX_SUGGESTIONS)
            .map(|(_, _, w)| w.to_string())
            .collect()
    }
}

/// Candidate base forms for a regularly inflected word.
fn base_forms(word: &str) -> Vec<String> {
    let mut forms = Vec::new();
    for (suffix, endings) in INFLECTIONS {
        let Some(stem) = word.strip_suffix(suffix) else {
            continue;
        };
        if stem.chars().count() < MIN_STEM {
            continue;
        }
        forms.extend(endings.iter().map(|ending| format!("{stem}{ending}")));

        // stopped → stop, bigger → big
        if suffix.starts_with('e') || suffix.starts_with('i') {
            let mut tail = stem.chars().rev();
            if let (Some(last), Some(prev)) = (tail.next(), tail.next()) {
                if last == prev && !"aeiouy".contains(last) {
                    forms.push(stem[..stem.len() - last.len_utf8()].to_string());
                }
            }
        }
    }
    forms
}

/// Lower-cased words worth checking.
///
/// URLs, mentions, hashtags and tokens with digits are skipped; hyphenated
/// words are checked part by part.
#[must_use]
pub fn tokenize(text: &str) -> Vec<String> {
    let mut words = Vec::new();
    for token in text.split_whitespace() {
        let token = token.to_lowercase().replace('\u{2019}', "'");
        if token.starts_with("http") || token.starts_with("www.") {
            continue;
        }
        if token.starts_with('@') || token.starts_with('#') {
            continue;
        }
        if token.chars().any(|c| c.is_ascii_digit()) {
            continue;
        }

        for part in token.split(['-', '/']) {
            let part = part.trim_matches(|c: char| !c.is_alphanumeric());
            if part.is_empty() || !part.chars().all(|c| c.is_alphabetic() || c == '\'') {
                continue;
            }
            words.push(part.to_string());
        }
    }
    words
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checker(list: &str) -> SpellChecker {
        SpellChecker::from_word_list(list)
    }

    #[test]
    fn test_word_list_weights() {
        let c = checker("# comment\nthe\nof 5\nand\n");
        assert_eq!(c.len(), 3);
        assert_eq!(c.words["the"], 3);
        assert_eq!(c.words["of"], 5);
        assert_eq!(c.words["and"], 1);
    }

    #[test]
    fn test_unknown_dedupes_in_order() {
        let c = checker("the\ncat\n");
        let words = ["the", "dgo", "cat", "cta", "dgo"];
        assert_eq!(c.unknown(words), vec!["dgo", "cta"]);
    }

    #[test]
    fn test_possessive_is_known() {
        let c = checker("year\n");
        assert!(c.known("year's"));
        assert!(!c.known("yeer's"));
    }

    #[test]
    fn test_candidates_prefer_nearest_then_frequent() {
        let c = checker("the 100\nthen 50\nten 10\nhelp 5\n");
        assert_eq!(c.candidates("thn"), vec!["the", "then", "ten"]);
        assert_eq!(c.candidates("hlep"), vec!["help"]);
        assert!(c.candidates("zzzzzzzz").is_empty());
    }

    #[test]
    fn test_candidates_are_capped() {
        let c = checker("bat\ncat\nfat\nhat\nmat\npat\nrat\n");
        assert_eq!(c.candidates("xat").len(), MAX_SUGGESTIONS);
    }

    #[test]
    fn test_dialect_words_are_added() {
        let us = SpellChecker::for_dialect("en-US", None, None).unwrap();
        assert!(us.known("color"));
        assert!(!us.known("colour"));
        assert_eq!(us.candidates("colour")[0], "color");

        let gb = SpellChecker::for_dialect("en-GB", None, None).unwrap();
        assert!(gb.known("colour"));
        assert!(!gb.known("color"));
    }

    #[test]
    fn test_regular_inflections_are_known() {
        let c = checker("vote\nwait\nqueue\nstop\ntry\nbig\nmake\n");
        for word in ["voted", "voting", "waited", "queues", "stopped", "tries", "tried", "bigger", "making"] {
            assert!(c.known(word), "{word} should be known");
        }
        assert!(!c.known("voteded"));
        assert!(!c.known("qeueus"));
    }

    #[test]
    fn test_inflections_do_not_cross_dialects() {
        let us = SpellChecker::for_dialect("en-US", None, None).unwrap();
        assert!(us.known("colored"));
        assert!(!us.known("coloured"));
        assert!(!us.known("colours"));
    }

    #[test]
    fn test_australian_english_uses_british_spelling() {
        let au = SpellChecker::for_dialect("en-AU", None, None).unwrap();
        let words = tokenize("The colour of the harbour at the centre this arvo");
        assert!(au.unknown(words.iter().map(String::as_str)).is_empty());
        assert!(!au.known("color"));
    }

    #[test]
    fn test_shared_vocabulary_is_known_everywhere() {
        let text = "I waited in the queue and then voted. My apartment downtown has a faucet. Cheers, rubbish.";
        let words = tokenize(text);
        for dialect in ["en-US", "en-GB", "en-AU"] {
            let c = SpellChecker::for_dialect(dialect, None, None).unwrap();
            let unknown = c.unknown(words.iter().map(String::as_str));
            assert!(unknown.is_empty(), "{dialect}: {unknown:?}");
        }
    }

    #[test]
    fn test_unsupported_language() {
        let err = SpellChecker::for_dialect("fr-FR", None, None).unwrap_err();
        assert!(matches!(err, ProcessorError::UnsupportedLanguage(ref l) if l == "fr"));
    }

    #[test]
    fn test_custom_dictionary_replaces_builtin() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("words.txt");
        std::fs::write(&path, "bonjour 10\nle 50\n").unwrap();

        let c = SpellChecker::for_dialect("fr-FR", Some(&path), None).unwrap();
        assert!(c.known("bonjour"));
        assert!(!c.known("the"));
        // fr-FR mapping words are added on top.
        assert!(c.len() > 2);
    }

    #[test]
    fn test_missing_custom_dictionary() {
        let err =
            SpellChecker::for_dialect("en-US", Some(Path::new("/nonexistent/words.txt")), None)
                .unwrap_err();
        assert!(matches!(err, ProcessorError::Data { .. }));
    }

    #[test]
    fn test_tokenize() {
        let words = tokenize(
            "Check https://t.co/xyz @someone #crypto 100x gains! Well-known \u{201c}Brand\u{201d} isn\u{2019}t",
        );
        assert_eq!(words, vec!["check", "gains", "well", "known", "brand", "isn't"]);
    }
}
