//! Arena-based HTML document model.
//!
//! Pages and fragments are tokenized with html5ever into a flat arena of nodes
//! addressed by [`NodeId`]. The model supports what page assembly needs:
//! selector lookup, inserting markup relative to an element, replacing an
//! element's outer markup, and creating elements for head injection.
//!
//! # Modules
//!
//! - `parse`: html5ever tokens → arena
//! - `select`: CSS selector parsing and matching
//! - `render`: arena → markup serialization

mod parse;
mod render;
mod select;

pub use select::{Selector, SelectorError};

use parking_lot::{Mutex, MutexGuard};
use thiserror::Error;

use crate::utils::html;

/// Handle to a node in a [`Document`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(u32);

impl NodeId {
    /// The document root.
    pub const ROOT: NodeId = NodeId(0);

    #[inline]
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// Errors raised while mutating a document.
#[derive(Debug, Error)]
pub enum DomError {
    #[error("node is not attached to a parent")]
    Detached,

    #[error("node is not an element")]
    NotElement,
}

/// Where markup is inserted relative to an element.
///
/// Mirrors the four positions of `insertAdjacentHTML`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    /// Before the element itself.
    BeforeBegin,
    /// Inside the element, before its first child.
    AfterBegin,
    /// Inside the element, after its last child.
    BeforeEnd,
    /// After the element itself.
    AfterEnd,
}

/// An element's tag name and attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// Lowercase tag name.
    pub tag: String,
    /// Attributes in source order, values entity-decoded.
    pub attrs: Vec<(String, String)>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into().to_ascii_lowercase(),
            attrs: Vec::new(),
        }
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attrs.iter().any(|(key, _)| key == name)
    }

    pub fn set_attr(&mut self, name: &str, value: &str) {
        match self.attrs.iter_mut().find(|(key, _)| key == name) {
            Some((_, existing)) => *existing = value.to_string(),
            None => self.attrs.push((name.to_string(), value.to_string())),
        }
    }

    /// Whitespace-separated entries of the `class` attribute.
    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.attr("class").unwrap_or_default().split_ascii_whitespace()
    }
}

/// Node payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Document,
    /// Markup declaration body, e.g. `DOCTYPE html`.
    Doctype(String),
    Element(Element),
    /// Text stored as markup (already escaped where needed).
    Text(String),
    Comment(String),
}

#[derive(Debug, Clone)]
struct Node {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    kind: NodeKind,
}

/// An HTML document held in a node arena.
///
/// Detached nodes stay in the arena but are no longer reachable from
/// [`NodeId::ROOT`].
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create an empty document containing only the root node.
    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                parent: None,
                children: Vec::new(),
                kind: NodeKind::Document,
            }],
        }
    }

    /// Parse a page (or any markup) into a new document.
    ///
    /// Parsing recovers from malformed markup the way browsers do, so it
    /// never fails.
    pub fn parse(markup: &str) -> Self {
        let mut doc = Self::new();
        for id in doc.parse_fragment(markup) {
            doc.append_child(NodeId::ROOT, id);
        }
        doc
    }

    /// Parse markup into detached nodes owned by this document.
    pub fn parse_fragment(&mut self, markup: &str) -> Vec<NodeId> {
        parse::parse_into(self, markup)
    }

    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    // ========================================================================
    // Node access
    // ========================================================================

    fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.node(id).kind
    }

    pub fn element(&self, id: NodeId) -> Option<&Element> {
        match &self.node(id).kind {
            NodeKind::Element(elem) => Some(elem),
            _ => None,
        }
    }

    fn element_mut(&mut self, id: NodeId) -> Option<&mut Element> {
        match &mut self.node_mut(id).kind {
            NodeKind::Element(elem) => Some(elem),
            _ => None,
        }
    }

    pub fn tag(&self, id: NodeId) -> Option<&str> {
        self.element(id).map(|elem| elem.tag.as_str())
    }

    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id).and_then(|elem| elem.attr(name))
    }

    pub fn has_attr(&self, id: NodeId, name: &str) -> bool {
        self.element(id).is_some_and(|elem| elem.has_attr(name))
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.node(id).children
    }

    /// Element children only.
    pub fn child_elements(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.children(id)
            .iter()
            .copied()
            .filter(|child| self.element(*child).is_some())
    }

    /// Whether `id` is reachable from the root.
    pub fn is_attached(&self, id: NodeId) -> bool {
        if id.index() >= self.nodes.len() {
            return false;
        }
        let mut current = id;
        while let Some(parent) = self.node(current).parent {
            current = parent;
        }
        current == NodeId::ROOT
    }

    /// All elements below `id` in document order (pre-order), excluding `id`.
    pub fn descendant_elements(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).iter().rev().copied().collect();
        while let Some(current) = stack.pop() {
            if self.element(current).is_some() {
                out.push(current);
            }
            stack.extend(self.children(current).iter().rev().copied());
        }
        out
    }

    /// First element with the given tag name in document order.
    pub fn find_tag(&self, tag: &str) -> Option<NodeId> {
        self.descendant_elements(NodeId::ROOT)
            .into_iter()
            .find(|id| self.tag(*id) == Some(tag))
    }

    /// The `<head>` element, if present.
    pub fn head(&self) -> Option<NodeId> {
        self.find_tag("head")
    }

    /// Concatenated, entity-decoded text of all descendants.
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            match &self.node(current).kind {
                NodeKind::Text(text) => out.push_str(&html::unescape(text)),
                _ => stack.extend(self.children(current).iter().rev().copied()),
            }
        }
        out
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// First element matching `selector` in document order.
    pub fn query_selector(&self, selector: &str) -> Result<Option<NodeId>, SelectorError> {
        let selector = Selector::parse(selector)?;
        Ok(self.select_first(&selector))
    }

    /// All elements matching `selector` in document order.
    pub fn query_selector_all(&self, selector: &str) -> Result<Vec<NodeId>, SelectorError> {
        let selector = Selector::parse(selector)?;
        Ok(self.select_all(&selector))
    }

    pub fn select_first(&self, selector: &Selector) -> Option<NodeId> {
        self.descendant_elements(NodeId::ROOT)
            .into_iter()
            .find(|id| selector.matches(self, *id))
    }

    pub fn select_all(&self, selector: &Selector) -> Vec<NodeId> {
        self.descendant_elements(NodeId::ROOT)
            .into_iter()
            .filter(|id| selector.matches(self, *id))
            .collect()
    }

    // ========================================================================
    // Mutation
    // ========================================================================

    #[allow(clippy::cast_possible_truncation)] // arena never nears u32::MAX nodes
    fn alloc(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node {
            parent: None,
            children: Vec::new(),
            kind,
        });
        id
    }

    /// Create a detached element.
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.alloc(NodeKind::Element(Element::new(tag)))
    }

    /// Create a detached text node; `text` is escaped.
    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.alloc(NodeKind::Text(html::escape(text).into_owned()))
    }

    pub(crate) fn create_raw_text(&mut self, markup: &str) -> NodeId {
        self.alloc(NodeKind::Text(markup.to_string()))
    }

    pub(crate) fn create_comment(&mut self, body: &str) -> NodeId {
        self.alloc(NodeKind::Comment(body.to_string()))
    }

    pub(crate) fn create_doctype(&mut self, body: &str) -> NodeId {
        self.alloc(NodeKind::Doctype(body.to_string()))
    }

    pub(crate) fn create_element_with(&mut self, element: Element) -> NodeId {
        self.alloc(NodeKind::Element(element))
    }

    /// Remove `id` from its parent. No-op for detached nodes.
    pub fn detach(&mut self, id: NodeId) {
        if let Some(parent) = self.node_mut(id).parent.take() {
            self.node_mut(parent).children.retain(|child| *child != id);
        }
    }

    /// Append `child` as the last child of `parent`, moving it if attached.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.detach(child);
        self.node_mut(child).parent = Some(parent);
        self.node_mut(parent).children.push(child);
    }

    /// Insert `nodes` as children of `parent` starting at `index`.
    fn insert_children(&mut self, parent: NodeId, index: usize, nodes: &[NodeId]) {
        for node in nodes {
            self.detach(*node);
            self.node_mut(*node).parent = Some(parent);
        }
        let children = &mut self.node_mut(parent).children;
        let index = index.min(children.len());
        children.splice(index..index, nodes.iter().copied());
    }

    pub fn set_attr(&mut self, id: NodeId, name: &str, value: &str) -> Result<(), DomError> {
        let elem = self.element_mut(id).ok_or(DomError::NotElement)?;
        elem.set_attr(name, value);
        Ok(())
    }

    /// Replace all children of `id` with a single text node.
    ///
    /// Content of `script`/`style` elements is stored raw.
    pub fn set_text(&mut self, id: NodeId, text: &str) -> Result<(), DomError> {
        let raw = match self.tag(id) {
            Some(tag) => html::is_raw_text_element(tag),
            None => return Err(DomError::NotElement),
        };

        for child in std::mem::take(&mut self.node_mut(id).children) {
            self.node_mut(child).parent = None;
        }

        let text = if raw {
            self.create_raw_text(text)
        } else {
            self.create_text(text)
        };
        self.append_child(id, text);
        Ok(())
    }

    /// Parse `markup` and insert it relative to `target`.
    ///
    /// Returns the inserted top-level nodes.
    pub fn insert_html(
        &mut self,
        target: NodeId,
        position: Position,
        markup: &str,
    ) -> Result<Vec<NodeId>, DomError> {
        let nodes = self.parse_fragment(markup);
        match position {
            Position::AfterBegin => self.insert_children(target, 0, &nodes),
            Position::BeforeEnd => {
                let len = self.children(target).len();
                self.insert_children(target, len, &nodes);
            }
            Position::BeforeBegin | Position::AfterEnd => {
                let parent = self.parent(target).ok_or(DomError::Detached)?;
                let index = self.child_index(parent, target);
                let index = if position == Position::AfterEnd { index + 1 } else { index };
                self.insert_children(parent, index, &nodes);
            }
        }
        Ok(nodes)
    }

    /// Replace `target` with the nodes parsed from `markup`.
    ///
    /// `target` is detached afterwards.
    pub fn replace_with_html(
        &mut self,
        target: NodeId,
        markup: &str,
    ) -> Result<Vec<NodeId>, DomError> {
        let parent = self.parent(target).ok_or(DomError::Detached)?;
        let nodes = self.parse_fragment(markup);
        let index = self.child_index(parent, target);
        self.detach(target);
        self.insert_children(parent, index, &nodes);
        Ok(nodes)
    }

    fn child_index(&self, parent: NodeId, child: NodeId) -> usize {
        self.children(parent)
            .iter()
            .position(|id| *id == child)
            .unwrap_or(0)
    }

    // ========================================================================
    // Serialization
    // ========================================================================

    /// Serialize the whole document.
    pub fn to_html(&self) -> String {
        self.inner_html(NodeId::ROOT)
    }

    /// Serialize `id` including its own tag.
    pub fn outer_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        render::write_node(self, id, &mut out);
        out
    }

    /// Serialize the children of `id`.
    pub fn inner_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        for child in self.children(id) {
            render::write_node(self, *child, &mut out);
        }
        out
    }
}

// ============================================================================
// Shared page
// ============================================================================

/// A document shared between concurrent fragment loads.
///
/// Loads lock it only for the synchronous insertion step, never across a
/// fetch.
#[derive(Debug, Default)]
pub struct Page {
    doc: Mutex<Document>,
}

impl Page {
    pub fn new(doc: Document) -> Self {
        Self {
            doc: Mutex::new(doc),
        }
    }

    pub fn parse(markup: &str) -> Self {
        Self::new(Document::parse(markup))
    }

    pub fn lock(&self) -> MutexGuard<'_, Document> {
        self.doc.lock()
    }

    pub fn to_html(&self) -> String {
        self.doc.lock().to_html()
    }

    pub fn into_document(self) -> Document {
        self.doc.into_inner()
    }
}
