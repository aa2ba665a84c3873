//! Document scanning and highlight injection for Wordmark.
//!
//! - [`dom`]: the mutable document tree the walker edits
//! - [`Stemmer`]: word stems for non-strict entries
//! - [`MatchFinder`]: locates dictionary terms in a text fragment
//! - [`HighlightInjector`]: builds the replacement nodes for a text
//! - [`Content`]: walks a document and splices replacements in place

pub mod dom;
mod content;
mod error;
mod highlight;
mod match_finder;
mod stats;
mod stemmer;

pub use content::{Content, DEFAULT_SKIP_TAGS};
pub use dom::{Descendants, Document, ElementData, NodeId};
pub use error::{ContentError, ContentResult};
pub use highlight::{
    is_marker, HighlightGenerator, HighlightInjector, MarkupInjector, DESCRIPTION_ATTR,
    ENTRY_ID_ATTR, MARKER_CLASS, MARKER_TAG, STRICT_ATTR,
};
pub use match_finder::{DictionaryMatchFinder, Match, MatchFinder};
pub use stats::PageStats;
pub use stemmer::{IdentityStemmer, Stemmer, SuffixStemmer};
