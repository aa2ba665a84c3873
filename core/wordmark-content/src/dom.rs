//! Arena-backed document tree.
//!
//! Nodes live in a `Vec` and refer to each other by [`NodeId`]. Every node
//! keeps parent and sibling links so the walker can insert before a node and
//! remove it without touching any other node's identity. Removed nodes stay
//! in the arena, detached, so ids held by a caller never dangle.

use crate::error::{ContentError, ContentResult};
use std::collections::BTreeMap;
use std::fmt;

/// Handle to a node in a [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// An element's tag and attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementData {
    pub tag: String,
    pub attributes: BTreeMap<String, String>,
}

/// What a node holds.
#[derive(Debug, Clone, PartialEq, Eq)]
enum NodeData {
    Element(ElementData),
    Text(String),
}

#[derive(Debug, Clone)]
struct Node {
    data: NodeData,
    parent: Option<NodeId>,
    first_child: Option<NodeId>,
    last_child: Option<NodeId>,
    prev_sibling: Option<NodeId>,
    next_sibling: Option<NodeId>,
}

impl Node {
    fn new(data: NodeData) -> Self {
        Self {
            data,
            parent: None,
            first_child: None,
            last_child: None,
            prev_sibling: None,
            next_sibling: None,
        }
    }
}

/// Tag of the document root element.
pub const ROOT_TAG: &str = "#document";

/// A mutable document tree.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
    root: NodeId,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Creates a document holding only its root element.
    #[must_use]
    pub fn new() -> Self {
        let root = Node::new(NodeData::Element(ElementData {
            tag: ROOT_TAG.to_string(),
            attributes: BTreeMap::new(),
        }));
        Self {
            nodes: vec![root],
            root: NodeId(0),
        }
    }

    #[must_use]
    pub fn root(&self) -> NodeId {
        self.root
    }

    // ── Node creation ────────────────────────────────────────────

    /// Creates a detached element.
    pub fn create_element(&mut self, tag: impl Into<String>) -> NodeId {
        self.push(NodeData::Element(ElementData {
            tag: tag.into(),
            attributes: BTreeMap::new(),
        }))
    }

    /// Creates a detached text node.
    pub fn create_text(&mut self, text: impl Into<String>) -> NodeId {
        self.push(NodeData::Text(text.into()))
    }

    fn push(&mut self, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::new(data));
        id
    }

    /// Creates an element and appends it to `parent`.
    pub fn append_element(&mut self, parent: NodeId, tag: impl Into<String>) -> ContentResult<NodeId> {
        let id = self.create_element(tag);
        self.append_child(parent, id)?;
        Ok(id)
    }

    /// Creates a text node and appends it to `parent`.
    pub fn append_text(&mut self, parent: NodeId, text: impl Into<String>) -> ContentResult<NodeId> {
        let id = self.create_text(text);
        self.append_child(parent, id)?;
        Ok(id)
    }

    // ── Accessors ────────────────────────────────────────────────

    fn node(&self, id: NodeId) -> ContentResult<&Node> {
        self.nodes.get(id.0).ok_or(ContentError::UnknownNode(id))
    }

    fn node_mut(&mut self, id: NodeId) -> ContentResult<&mut Node> {
        self.nodes.get_mut(id.0).ok_or(ContentError::UnknownNode(id))
    }

    /// The text of a text node; `None` for elements and unknown ids.
    #[must_use]
    pub fn text(&self, id: NodeId) -> Option<&str> {
        match self.nodes.get(id.0).map(|n| &n.data) {
            Some(NodeData::Text(text)) => Some(text),
            _ => None,
        }
    }

    /// The element data; `None` for text nodes and unknown ids.
    #[must_use]
    pub fn element(&self, id: NodeId) -> Option<&ElementData> {
        match self.nodes.get(id.0).map(|n| &n.data) {
            Some(NodeData::Element(element)) => Some(element),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_text(&self, id: NodeId) -> bool {
        self.text(id).is_some()
    }

    #[must_use]
    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id)
            .and_then(|e| e.attributes.get(name))
            .map(String::as_str)
    }

    pub fn set_attribute(
        &mut self,
        id: NodeId,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> ContentResult<()> {
        match &mut self.node_mut(id)?.data {
            NodeData::Element(element) => {
                element.attributes.insert(name.into(), value.into());
                Ok(())
            }
            NodeData::Text(_) => Err(ContentError::Hierarchy(format!(
                "text node {id} cannot carry attributes"
            ))),
        }
    }

    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id.0).and_then(|n| n.parent)
    }

    #[must_use]
    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id.0).and_then(|n| n.first_child)
    }

    #[must_use]
    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id.0).and_then(|n| n.last_child)
    }

    #[must_use]
    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id.0).and_then(|n| n.next_sibling)
    }

    #[must_use]
    pub fn previous_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id.0).and_then(|n| n.prev_sibling)
    }

    /// Children of `id` in document order.
    pub fn children(&self, id: NodeId) -> Children<'_> {
        Children {
            document: self,
            next: self.first_child(id),
        }
    }

    /// Concatenated text of `id` and all its descendants.
    #[must_use]
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        for node in self.descendants(id) {
            if let Some(text) = self.text(node) {
                out.push_str(text);
            }
        }
        out
    }

    /// `id` and every node below it, in document order.
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        Descendants {
            document: self,
            root: id,
            next: self.nodes.get(id.0).map(|_| id),
        }
    }

    // ── Structural edits ─────────────────────────────────────────

    /// Appends `child` as the last child of `parent`, detaching it from any
    /// previous parent first.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> ContentResult<()> {
        self.insert_before(parent, child, None)
    }

    /// Inserts `child` into `parent` right before `reference`, or at the end
    /// when `reference` is `None`. `child` is detached from any previous
    /// parent first.
    pub fn insert_before(
        &mut self,
        parent: NodeId,
        child: NodeId,
        reference: Option<NodeId>,
    ) -> ContentResult<()> {
        self.check_insertable(parent, child)?;
        if let Some(reference) = reference {
            if self.node(reference)?.parent != Some(parent) {
                return Err(ContentError::NotAChild {
                    parent,
                    child: reference,
                });
            }
            if reference == child {
                return Ok(());
            }
        }

        self.detach(child)?;

        let prev = match reference {
            Some(reference) => self.node(reference)?.prev_sibling,
            None => self.node(parent)?.last_child,
        };
        {
            let node = self.node_mut(child)?;
            node.parent = Some(parent);
            node.prev_sibling = prev;
            node.next_sibling = reference;
        }
        match prev {
            Some(prev) => self.node_mut(prev)?.next_sibling = Some(child),
            None => self.node_mut(parent)?.first_child = Some(child),
        }
        match reference {
            Some(reference) => self.node_mut(reference)?.prev_sibling = Some(child),
            None => self.node_mut(parent)?.last_child = Some(child),
        }
        Ok(())
    }

    /// Removes `child` from `parent`. The node and its subtree stay valid
    /// but detached.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> ContentResult<()> {
        if self.node(child)?.parent != Some(parent) {
            return Err(ContentError::NotAChild { parent, child });
        }
        self.detach(child)
    }

    fn detach(&mut self, id: NodeId) -> ContentResult<()> {
        let (parent, prev, next) = {
            let node = self.node(id)?;
            (node.parent, node.prev_sibling, node.next_sibling)
        };
        let Some(parent) = parent else {
            return Ok(());
        };
        match prev {
            Some(prev) => self.node_mut(prev)?.next_sibling = next,
            None => self.node_mut(parent)?.first_child = next,
        }
        match next {
            Some(next) => self.node_mut(next)?.prev_sibling = prev,
            None => self.node_mut(parent)?.last_child = prev,
        }
        let node = self.node_mut(id)?;
        node.parent = None;
        node.prev_sibling = None;
        node.next_sibling = None;
        Ok(())
    }

    fn check_insertable(&self, parent: NodeId, child: NodeId) -> ContentResult<()> {
        self.node(child)?;
        if let NodeData::Text(_) = self.node(parent)?.data {
            return Err(ContentError::Hierarchy(format!(
                "text node {parent} cannot have children"
            )));
        }
        if child == self.root {
            return Err(ContentError::Hierarchy("the root cannot be moved".into()));
        }
        let mut ancestor = Some(parent);
        while let Some(a) = ancestor {
            if a == child {
                return Err(ContentError::Hierarchy(format!(
                    "{child} is an ancestor of {parent}"
                )));
            }
            ancestor = self.parent(a);
        }
        Ok(())
    }

    // ── Markup ───────────────────────────────────────────────────

    /// Renders `id` and its subtree as HTML-like markup. The root renders
    /// only its children.
    #[must_use]
    pub fn to_markup(&self, id: NodeId) -> String {
        enum Step {
            Open(NodeId),
            Close(NodeId),
        }

        let mut out = String::new();
        let mut steps = vec![Step::Open(id)];
        while let Some(step) = steps.pop() {
            match step {
                Step::Close(node) => {
                    if let Some(element) = self.element(node) {
                        out.push_str(&format!("</{}>", element.tag));
                    }
                }
                Step::Open(node) => match self.nodes.get(node.0).map(|n| &n.data) {
                    Some(NodeData::Text(text)) => out.push_str(&escape(text, false)),
                    Some(NodeData::Element(element)) => {
                        if node != self.root {
                            out.push('<');
                            out.push_str(&element.tag);
                            for (name, value) in &element.attributes {
                                out.push_str(&format!(" {name}=\"{}\"", escape(value, true)));
                            }
                            out.push('>');
                            steps.push(Step::Close(node));
                        }
                        let children: Vec<NodeId> = self.children(node).collect();
                        steps.extend(children.into_iter().rev().map(Step::Open));
                    }
                    None => {}
                },
            }
        }
        out
    }
}

fn escape(s: &str, attribute: bool) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if attribute => out.push_str("&quot;"),
            c => out.push(c),
        }
    }
    out
}

/// Iterator over a node's children.
pub struct Children<'a> {
    document: &'a Document,
    next: Option<NodeId>,
}

impl Iterator for Children<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.document.next_sibling(current);
        Some(current)
    }
}

/// Pre-order iterator over a subtree. Follows sibling and parent links, so
/// depth costs no stack.
pub struct Descendants<'a> {
    document: &'a Document,
    root: NodeId,
    next: Option<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        let (doc, root) = (self.document, self.root);
        self.next = doc.first_child(current).or_else(|| {
            let mut node = current;
            loop {
                if node == root {
                    return None;
                }
                if let Some(sibling) = doc.next_sibling(node) {
                    return Some(sibling);
                }
                node = doc.parent(node)?;
            }
        });
        Some(current)
    }
}
