//! Finding dictionary terms in text.
//!
//! Text is split into word tokens (Unicode word characters), so a term never
//! matches part of a longer word. Comparison is case-insensitive. Strict
//! entries compare lower-cased tokens; other entries compare stems of
//! lower-cased tokens. A term made of several words matches the same word
//! sequence, whatever non-word characters sit between the words.
//!
//! When several entries could match, the leftmost position wins, and at one
//! position the first entry in dictionary order wins.

use crate::stemmer::Stemmer;
use regex::Regex;
use std::sync::OnceLock;
use tracing::debug;
use wordmark_types::DictionaryEntry;

/// A dictionary term found in a text fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Match<'d> {
    /// Byte offset of the first matched character.
    pub start: usize,
    /// Byte offset just past the last matched character.
    pub end: usize,
    pub entry: &'d DictionaryEntry,
}

impl Match<'_> {
    /// Moves the span right by `offset` bytes.
    #[must_use]
    pub fn shifted(self, offset: usize) -> Self {
        Self {
            start: self.start + offset,
            end: self.end + offset,
            entry: self.entry,
        }
    }
}

/// Locates dictionary terms in text.
pub trait MatchFinder {
    /// Returns the first match in `text`, if any.
    fn find_match(&self, text: &str) -> Option<Match<'_>>;

    /// Returns every non-overlapping match in `text`, left to right. Each
    /// scan starts right after the previous match; implementations that can
    /// do it in one pass should override this.
    fn find_all(&self, text: &str) -> Vec<Match<'_>> {
        let mut matches = Vec::new();
        let mut offset = 0;
        while offset < text.len() {
            let Some(found) = self.find_match(&text[offset..]) else {
                break;
            };
            let found = found.shifted(offset);
            offset = found.end;
            matches.push(found);
        }
        matches
    }
}

#[derive(Debug, Clone)]
struct Token<'t> {
    start: usize,
    end: usize,
    lower: String,
    text: &'t str,
}

struct CompiledTerm {
    entry: DictionaryEntry,
    /// Lower-cased words for strict entries, stems otherwise.
    keys: Vec<String>,
}

/// [`MatchFinder`] over an in-memory dictionary.
pub struct DictionaryMatchFinder<S> {
    terms: Vec<CompiledTerm>,
    stemmer: S,
    needs_stems: bool,
}

fn word_pattern() -> &'static Regex {
    static WORD: OnceLock<Regex> = OnceLock::new();
    WORD.get_or_init(|| Regex::new(r"\w+").expect("valid word pattern"))
}

fn tokenize(text: &str) -> Vec<Token<'_>> {
    word_pattern()
        .find_iter(text)
        .map(|m| Token {
            start: m.start(),
            end: m.end(),
            lower: m.as_str().to_lowercase(),
            text: m.as_str(),
        })
        .collect()
}

impl<S: Stemmer> DictionaryMatchFinder<S> {
    /// Prepares `dictionary` for scanning. Entries whose value has no word
    /// characters can never match and are dropped.
    pub fn new(dictionary: Vec<DictionaryEntry>, stemmer: S) -> Self {
        let total = dictionary.len();
        let terms: Vec<CompiledTerm> = dictionary
            .into_iter()
            .filter_map(|entry| {
                let keys: Vec<String> = tokenize(&entry.value)
                    .into_iter()
                    .map(|t| {
                        if entry.strict_match {
                            t.lower
                        } else {
                            stemmer.stem(&t.lower)
                        }
                    })
                    .collect();
                (!keys.is_empty()).then_some(CompiledTerm { entry, keys })
            })
            .collect();
        if terms.len() < total {
            debug!("ignoring {} dictionary entries without words", total - terms.len());
        }
        let needs_stems = terms.iter().any(|t| !t.entry.strict_match);
        Self {
            terms,
            stemmer,
            needs_stems,
        }
    }

    /// Scans `text` once, left to right. After a match the scan resumes at
    /// the token following it; `limit` caps the number of matches.
    fn scan<'f>(&'f self, text: &str, limit: usize) -> Vec<Match<'f>> {
        let mut matches = Vec::new();
        if self.terms.is_empty() || limit == 0 {
            return matches;
        }
        let tokens = tokenize(text);
        let stems: Vec<String> = if self.needs_stems {
            tokens.iter().map(|t| self.stemmer.stem(&t.lower)).collect()
        } else {
            Vec::new()
        };

        let mut i = 0;
        while i < tokens.len() {
            let Some(term) = self.terms.iter().find(|term| self.matches_at(term, &tokens, &stems, i)) else {
                i += 1;
                continue;
            };
            let n = term.keys.len();
            debug!("matched {:?} as {:?}", tokens[i].text, term.entry.value);
            matches.push(Match {
                start: tokens[i].start,
                end: tokens[i + n - 1].end,
                entry: &term.entry,
            });
            if matches.len() == limit {
                break;
            }
            i += n;
        }
        matches
    }

    fn matches_at(&self, term: &CompiledTerm, tokens: &[Token<'_>], stems: &[String], i: usize) -> bool {
        if i + term.keys.len() > tokens.len() {
            return false;
        }
        term.keys.iter().enumerate().all(|(k, key)| {
            if term.entry.strict_match {
                tokens[i + k].lower == *key
            } else {
                stems[i + k] == *key
            }
        })
    }
}

impl<S: Stemmer> MatchFinder for DictionaryMatchFinder<S> {
    fn find_match(&self, text: &str) -> Option<Match<'_>> {
        self.scan(text, 1).into_iter().next()
    }

    fn find_all(&self, text: &str) -> Vec<Match<'_>> {
        self.scan(text, usize::MAX)
    }
}
