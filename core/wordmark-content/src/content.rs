//! The document walker.
//!
//! Visits nodes in document order. Each text node is scanned; a matched one
//! is replaced in its parent by the injector's sequence. The walk continues
//! at the sibling that followed the text node before the edit, so freshly
//! inserted nodes are never scanned again.

use crate::dom::{Document, NodeId};
use crate::error::ContentResult;
use crate::highlight::{is_marker, HighlightInjector};
use crate::match_finder::MatchFinder;
use crate::stats::PageStats;
use std::collections::HashSet;
use tracing::debug;
use wordmark_types::Settings;

/// Elements whose text is never scanned by default.
pub const DEFAULT_SKIP_TAGS: [&str; 5] = ["script", "style", "noscript", "textarea", "template"];

/// Walks a document and injects highlight markup.
pub struct Content<F, I> {
    settings: Settings,
    finder: F,
    injector: I,
    skip_tags: HashSet<String>,
}

impl<F: MatchFinder, I: HighlightInjector> Content<F, I> {
    pub fn new(settings: Settings, finder: F, injector: I) -> Self {
        Self {
            settings,
            finder,
            injector,
            skip_tags: DEFAULT_SKIP_TAGS.iter().map(|t| (*t).to_string()).collect(),
        }
    }

    /// Replaces the set of element tags that are not descended into.
    #[must_use]
    pub fn with_skip_tags<T: Into<String>>(mut self, tags: impl IntoIterator<Item = T>) -> Self {
        self.skip_tags = tags.into_iter().map(|t| t.into().to_ascii_lowercase()).collect();
        self
    }

    /// Runs a full pass over `document`, honoring the highlighting and page
    /// stats switches. Stats stay empty when page stats are off.
    pub fn process_document(&self, document: &mut Document) -> ContentResult<PageStats> {
        let mut stats = PageStats::default();
        if !self.settings.enable_highlighting {
            debug!("highlighting disabled, leaving the document untouched");
            return Ok(stats);
        }
        self.inject_markup(document, document.root(), &mut stats)?;
        if !self.settings.enable_page_stats {
            stats = PageStats::default();
        }
        Ok(stats)
    }

    /// Walks the subtree under `node` in pre-order and highlights every text
    /// node that matches. Nothing happens when `node` is, or sits inside, a
    /// marker or a skipped element.
    pub fn inject_markup(
        &self,
        document: &mut Document,
        node: NodeId,
        stats: &mut PageStats,
    ) -> ContentResult<()> {
        if self.within_skipped(document, node) {
            debug!("{node} is inside a skipped element, not walking it");
            return Ok(());
        }

        // One slot per open level: the next child to visit there.
        let mut pending = vec![(node, document.first_child(node))];

        while let Some((parent, slot)) = pending.last_mut() {
            let parent = *parent;
            let Some(child) = *slot else {
                pending.pop();
                continue;
            };
            // Captured before the child can be removed.
            *slot = document.next_sibling(child);

            if document.is_text(child) {
                self.replace_text(document, parent, child, stats)?;
            } else if !self.should_skip(document, child) {
                let first = document.first_child(child);
                pending.push((child, first));
            }
        }
        Ok(())
    }

    fn within_skipped(&self, document: &Document, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(n) = current {
            if self.should_skip(document, n) {
                return true;
            }
            current = document.parent(n);
        }
        false
    }

    fn should_skip(&self, document: &Document, node: NodeId) -> bool {
        if is_marker(document, node) {
            return true;
        }
        document
            .element(node)
            .is_some_and(|e| self.skip_tags.contains(&e.tag.to_ascii_lowercase()))
    }

    fn replace_text(
        &self,
        document: &mut Document,
        parent: NodeId,
        text_node: NodeId,
        stats: &mut PageStats,
    ) -> ContentResult<()> {
        stats.text_nodes_scanned += 1;
        let Some(text) = document.text(text_node).map(str::to_owned) else {
            return Ok(());
        };
        let matches = self.finder.find_all(&text);
        if matches.is_empty() {
            return Ok(());
        }

        let replacement = self.injector.inject(document, &text, &matches)?;
        for node in replacement {
            document.insert_before(parent, node, Some(text_node))?;
        }
        document.remove_child(parent, text_node)?;

        stats.text_nodes_replaced += 1;
        for m in &matches {
            stats.record_match(m.entry.id);
        }
        Ok(())
    }
}
