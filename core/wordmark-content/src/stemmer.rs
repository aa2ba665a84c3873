//! Word stemming.
//!
//! The host supplies the stemmer; [`SuffixStemmer`] is a light English
//! default for hosts that have none.

/// Reduces a lower-cased word to its stem.
pub trait Stemmer: Send + Sync {
    fn stem(&self, word: &str) -> String;
}

impl<F> Stemmer for F
where
    F: Fn(&str) -> String + Send + Sync,
{
    fn stem(&self, word: &str) -> String {
        self(word)
    }
}

/// Returns the word unchanged. Non-strict entries then behave like strict
/// ones.
#[derive(Debug, Default, Clone, Copy)]
pub struct IdentityStemmer;

impl Stemmer for IdentityStemmer {
    fn stem(&self, word: &str) -> String {
        word.to_string()
    }
}

/// Strips common English inflection suffixes.
///
/// One suffix is replaced per word and the resulting stem keeps at least
/// three characters. A doubled final consonant left by `-ing`/`-ed`
/// ("running", "stopped") is collapsed.
#[derive(Debug, Default, Clone, Copy)]
pub struct SuffixStemmer;

const MIN_STEM: usize = 3;

impl Stemmer for SuffixStemmer {
    fn stem(&self, word: &str) -> String {
        if let Some(stem) = replace_suffix(word, "ies", "y") {
            return stem;
        }
        for suffix in ["ing", "edly", "ed"] {
            if let Some(stem) = replace_suffix(word, suffix, "") {
                return undouble(&stem);
            }
        }
        let sibilants = [
            ("ches", "ch"),
            ("shes", "sh"),
            ("sses", "ss"),
            ("xes", "x"),
            ("zes", "z"),
        ];
        for (suffix, with) in sibilants {
            if let Some(stem) = replace_suffix(word, suffix, with) {
                return stem;
            }
        }
        if let Some(stem) = replace_suffix(word, "ly", "") {
            return stem;
        }
        if !word.ends_with("ss") && !word.ends_with("us") && !word.ends_with("is") {
            if let Some(stem) = replace_suffix(word, "s", "") {
                return stem;
            }
        }
        word.to_string()
    }
}

/// Swaps `suffix` for `with`, as long as the resulting stem keeps at least
/// [`MIN_STEM`] characters.
fn replace_suffix(word: &str, suffix: &str, with: &str) -> Option<String> {
    let base = word.strip_suffix(suffix)?;
    let stem = format!("{base}{with}");
    (stem.chars().count() >= MIN_STEM).then_some(stem)
}

fn undouble(base: &str) -> String {
    let mut chars: Vec<char> = base.chars().collect();
    let n = chars.len();
    if n > MIN_STEM
        && chars[n - 1] == chars[n - 2]
        && chars[n - 1].is_alphabetic()
        && !matches!(chars[n - 1], 'l' | 's' | 'z' | 'a' | 'e' | 'i' | 'o' | 'u')
    {
        chars.pop();
    }
    chars.into_iter().collect()
}
