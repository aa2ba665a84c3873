//! Marker elements and replacement sequences.

use crate::dom::{Document, NodeId};
use crate::error::ContentResult;
use crate::match_finder::Match;
use wordmark_types::DictionaryEntry;

pub const MARKER_TAG: &str = "span";
pub const MARKER_CLASS: &str = "wordmark-highlight";
/// Attribute that identifies a marker element and carries the entry id.
pub const ENTRY_ID_ATTR: &str = "data-wordmark-id";
pub const DESCRIPTION_ATTR: &str = "data-wordmark-description";
pub const STRICT_ATTR: &str = "data-wordmark-strict";

/// Returns true if `node` is a marker element built by [`HighlightGenerator`].
#[must_use]
pub fn is_marker(document: &Document, node: NodeId) -> bool {
    document
        .element(node)
        .is_some_and(|e| e.attributes.contains_key(ENTRY_ID_ATTR))
}

/// Builds the marker element for one matched span.
#[derive(Debug, Default, Clone, Copy)]
pub struct HighlightGenerator;

impl HighlightGenerator {
    /// Creates a detached marker element wrapping `text`.
    pub fn generate(
        &self,
        document: &mut Document,
        text: &str,
        entry: &DictionaryEntry,
    ) -> ContentResult<NodeId> {
        let marker = document.create_element(MARKER_TAG);
        document.set_attribute(marker, "class", MARKER_CLASS)?;
        document.set_attribute(
            marker,
            ENTRY_ID_ATTR,
            entry.id.map(|id| id.to_string()).unwrap_or_default(),
        )?;
        document.set_attribute(marker, DESCRIPTION_ATTR, entry.description.as_str())?;
        if entry.strict_match {
            document.set_attribute(marker, STRICT_ATTR, "true")?;
        }
        let inner = document.create_text(text);
        document.append_child(marker, inner)?;
        Ok(marker)
    }
}

/// Turns a text and its matches into replacement nodes.
pub trait HighlightInjector {
    /// Builds detached nodes whose concatenated text equals `text`, with one
    /// marker per match. `matches` are sorted and non-overlapping.
    fn inject(
        &self,
        document: &mut Document,
        text: &str,
        matches: &[Match<'_>],
    ) -> ContentResult<Vec<NodeId>>;
}

/// Default injector: plain text nodes around [`HighlightGenerator`] markers.
#[derive(Debug, Default, Clone, Copy)]
pub struct MarkupInjector {
    generator: HighlightGenerator,
}

impl MarkupInjector {
    #[must_use]
    pub fn new(generator: HighlightGenerator) -> Self {
        Self { generator }
    }
}

impl HighlightInjector for MarkupInjector {
    fn inject(
        &self,
        document: &mut Document,
        text: &str,
        matches: &[Match<'_>],
    ) -> ContentResult<Vec<NodeId>> {
        let mut nodes = Vec::with_capacity(matches.len() * 2 + 1);
        let mut cursor = 0;
        for m in matches {
            if m.start > cursor {
                nodes.push(document.create_text(&text[cursor..m.start]));
            }
            nodes.push(self.generator.generate(document, &text[m.start..m.end], m.entry)?);
            cursor = m.end;
        }
        if cursor < text.len() {
            nodes.push(document.create_text(&text[cursor..]));
        }
        Ok(nodes)
    }
}
