//! Tokenization and frequency counting
//!
//! Single tokens only (no collocations). Counting follows the usual
//! word-cloud conventions: possessive `'s` is stripped, numbers are
//! dropped, case variants are fused under their most common spelling
//! and plurals are folded into their singular when both occur.

use std::sync::LazyLock;

use regex::Regex;
use rustc_hash::FxHashMap;

use crate::layout::WordInput;
use crate::stopwords::StopwordSet;

static SHORT_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\w[\w']*").expect("token pattern is valid"));
static LONG_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\w[\w']+").expect("token pattern is valid"));
/// Decimal digits only (Unicode `Nd`), so numerals such as `〇` still count as words.
static DIGITS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+$").expect("digit pattern is valid"));

#[derive(Debug, Clone)]
pub struct TextOptions {
    /// Tokens with fewer characters are dropped.
    pub min_word_length: usize,
    pub include_numbers: bool,
    pub normalize_plurals: bool,
}

impl Default for TextOptions {
    fn default() -> Self {
        Self {
            min_word_length: 0,
            include_numbers: false,
            normalize_plurals: true,
        }
    }
}

/// Split `text` into the tokens that survive filtering, in source order.
pub fn tokenize<'a>(
    text: &'a str,
    stopwords: &StopwordSet,
    options: &TextOptions,
) -> Vec<&'a str> {
    let pattern = if options.min_word_length <= 1 {
        &*SHORT_TOKEN
    } else {
        &*LONG_TOKEN
    };

    pattern
        .find_iter(text)
        .map(|m| strip_possessive(m.as_str()))
        .filter(|w| options.include_numbers || !DIGITS.is_match(w))
        .filter(|w| w.chars().count() >= options.min_word_length)
        .filter(|w| !stopwords.contains(w))
        .collect()
}

fn strip_possessive(word: &str) -> &str {
    let len = word.len();
    if len >= 2 && word.is_char_boundary(len - 2) && word[len - 2..].eq_ignore_ascii_case("'s") {
        &word[..len - 2]
    } else {
        word
    }
}

/// Spellings of one lower-cased word with their counts, in first-seen order.
#[derive(Debug, Default)]
struct CaseCounts {
    forms: Vec<(String, usize)>,
}

impl CaseCounts {
    fn add(&mut self, form: &str, count: usize) {
        match self.forms.iter_mut().find(|(f, _)| f == form) {
            Some((_, c)) => *c += count,
            None => self.forms.push((form.to_string(), count)),
        }
    }

    fn total(&self) -> usize {
        self.forms.iter().map(|(_, c)| c).sum()
    }

    /// Most frequent spelling; the earliest one wins ties.
    fn preferred(&self) -> &str {
        let mut best = &self.forms[0];
        for entry in &self.forms[1..] {
            if entry.1 > best.1 {
                best = entry;
            }
        }
        &best.0
    }
}

/// Count tokens, fusing case variants and optionally plurals.
///
/// Returns `(display form, count)` pairs in first-occurrence order.
pub fn count_tokens(tokens: &[&str], normalize_plurals: bool) -> Vec<(String, usize)> {
    let mut index: FxHashMap<String, usize> = FxHashMap::default();
    let mut entries: Vec<Option<CaseCounts>> = Vec::new();

    for token in tokens {
        let lower = token.to_lowercase();
        let slot = *index.entry(lower).or_insert_with(|| {
            entries.push(Some(CaseCounts::default()));
            entries.len() - 1
        });
        if let Some(counts) = entries[slot].as_mut() {
            counts.add(token, 1);
        }
    }

    if normalize_plurals {
        let mut keys: Vec<(String, usize)> = index.iter().map(|(k, v)| (k.clone(), *v)).collect();
        keys.sort_by_key(|(_, slot)| *slot);

        for (key, slot) in keys {
            if !key.ends_with('s') || key.ends_with("ss") {
                continue;
            }
            let Some(&singular_slot) = index.get(&key[..key.len() - 1]) else {
                continue;
            };
            if entries[singular_slot].is_none() {
                continue;
            }
            if let Some(plural) = entries[slot].take() {
                if let Some(singular) = entries[singular_slot].as_mut() {
                    for (form, count) in plural.forms {
                        let cut = form.char_indices().last().map_or(0, |(i, _)| i);
                        singular.add(&form[..cut], count);
                    }
                }
            }
        }
    }

    entries
        .into_iter()
        .flatten()
        .map(|counts| (counts.preferred().to_string(), counts.total()))
        .collect()
}

/// Word frequencies of `text` ready for layout.
///
/// Sorted by descending count (stable), weights normalised so that the
/// most frequent word has weight 1.0. Empty when nothing survives.
pub fn process_text(text: &str, stopwords: &StopwordSet, options: &TextOptions) -> Vec<WordInput> {
    let tokens = tokenize(text, stopwords, options);
    let mut counts = count_tokens(&tokens, options.normalize_plurals);
    counts.sort_by(|a, b| b.1.cmp(&a.1));

    let max = counts.first().map(|(_, c)| *c).unwrap_or(1) as f32;
    tracing::debug!(
        "{} tokens, {} distinct words after filtering",
        tokens.len(),
        counts.len()
    );

    counts
        .into_iter()
        .map(|(word, count)| WordInput::new(word, count as f32 / max))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn words(inputs: &[WordInput]) -> Vec<&str> {
        inputs.iter().map(|w| w.text.as_str()).collect()
    }

    #[test]
    fn stopwords_never_survive() {
        let stop = StopwordSet::from_list(&["the"]);
        let freqs = process_text(
            "the quick brown fox the lazy dog the",
            &stop,
            &TextOptions::default(),
        );

        assert_eq!(words(&freqs), vec!["quick", "brown", "fox", "lazy", "dog"]);
        assert!(freqs.iter().all(|w| (w.weight - 1.0).abs() < f32::EPSILON));
    }

    #[test]
    fn stopword_match_ignores_case() {
        let stop = StopwordSet::from_list(&["the"]);
        let tokens = tokenize("The THE tHe cat", &stop, &TextOptions::default());
        assert_eq!(tokens, vec!["cat"]);
    }

    #[test]
    fn strips_possessive_and_numbers() {
        let stop = StopwordSet::new();
        let tokens = tokenize("dog's 2024 year's 3rd", &stop, &TextOptions::default());
        assert_eq!(tokens, vec!["dog", "year", "3rd"]);
    }

    #[test]
    fn only_decimal_digit_tokens_are_numbers() {
        let tokens = tokenize("〇 ٣٤ 12 第3 Ⅻ", &StopwordSet::new(), &TextOptions::default());
        assert_eq!(tokens, vec!["〇", "第3", "Ⅻ"]);
    }

    #[test]
    fn numbers_kept_on_request() {
        let options = TextOptions {
            include_numbers: true,
            ..TextOptions::default()
        };
        let tokens = tokenize("route 66", &StopwordSet::new(), &options);
        assert_eq!(tokens, vec!["route", "66"]);
    }

    #[test]
    fn min_word_length_drops_short_tokens() {
        let options = TextOptions {
            min_word_length: 3,
            ..TextOptions::default()
        };
        let tokens = tokenize("a an ant ante", &StopwordSet::new(), &options);
        assert_eq!(tokens, vec!["ant", "ante"]);
    }

    #[test]
    fn fuses_case_variants_under_most_common_spelling() {
        let counts = count_tokens(&["Rust", "rust", "Rust", "RUST"], false);
        assert_eq!(counts, vec![("Rust".to_string(), 4)]);
    }

    #[test]
    fn folds_plurals_into_singular() {
        let counts = count_tokens(&["cats", "cat", "class", "dogs"], true);
        assert_eq!(
            counts,
            vec![
                ("cat".to_string(), 2),
                ("class".to_string(), 1),
                ("dogs".to_string(), 1),
            ]
        );
    }

    #[test]
    fn plurals_left_alone_when_disabled() {
        let counts = count_tokens(&["cats", "cat"], false);
        assert_eq!(counts.len(), 2);
    }

    #[test]
    fn weights_are_normalised_by_the_top_count() {
        let freqs = process_text(
            "rust rust rust rust cargo cargo crate",
            &StopwordSet::new(),
            &TextOptions::default(),
        );
        assert_eq!(words(&freqs), vec!["rust", "cargo", "crate"]);
        assert_eq!(freqs[0].weight, 1.0);
        assert_eq!(freqs[1].weight, 0.5);
        assert_eq!(freqs[2].weight, 0.25);
    }

    #[test]
    fn japanese_runs_are_single_tokens() {
        let stop = StopwordSet::from_list(&["これ"]);
        let tokens = tokenize("これ は 自然言語処理 です", &stop, &TextOptions::default());
        assert_eq!(tokens, vec!["は", "自然言語処理", "です"]);
    }

    #[test]
    fn nothing_left_yields_empty_frequencies() {
        let stop = StopwordSet::from_list(&["the", "a"]);
        let freqs = process_text("the a THE 42", &stop, &TextOptions::default());
        assert!(freqs.is_empty());
    }
}
