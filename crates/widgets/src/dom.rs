//! Headless document model.
//!
//! An arena of elements addressed by [`NodeId`]. Only the parts of the DOM
//! the widgets read or write are modelled: tag, attributes (including
//! `data-*`), class list, text, form value and the inline `display` style.
//! Text lives on the element itself; [`Document::text_content`] concatenates
//! an element's text with its descendants' in document order.
//!
//! Slots of elements dropped by [`Document::clear`] are reused by later
//! appends, so a page that re-renders a list keeps a bounded arena. A
//! [`NodeId`] of a cleared element must not be used afterwards.
//!
//! A new document has the usual skeleton:
//!
//! ```text
//! <html>
//!   <head></head>
//!   <body></body>
//! </html>
//! ```

use std::collections::{BTreeMap, HashMap};

/// Handle to an element of one [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

/// Inline `display` style of an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Display {
    /// No inline style; the stylesheet decides.
    #[default]
    Unset,
    None,
    Block,
    Flex,
}

impl Display {
    /// Read the `display` property of an inline style such as
    /// `"color: red; display: none"`.
    #[must_use]
    pub fn from_style(style: &str) -> Self {
        let value = style
            .split(';')
            .filter_map(|decl| decl.split_once(':'))
            .filter(|(property, _)| property.trim().eq_ignore_ascii_case("display"))
            .map(|(_, value)| value.trim().to_ascii_lowercase())
            .last();
        match value.as_deref() {
            Some("none") => Self::None,
            Some("block") => Self::Block,
            Some("flex") => Self::Flex,
            _ => Self::Unset,
        }
    }

    /// CSS keyword, or `None` when no inline value is set.
    #[must_use]
    pub const fn as_css(self) -> Option<&'static str> {
        match self {
            Self::Unset => None,
            Self::None => Some("none"),
            Self::Block => Some("block"),
            Self::Flex => Some("flex"),
        }
    }
}

/// An element before it is attached to a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    tag: String,
    attrs: BTreeMap<String, String>,
    classes: Vec<String>,
    text: String,
    value: String,
    display: Display,
}

impl Element {
    #[must_use]
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            attrs: BTreeMap::new(),
            classes: Vec::new(),
            text: String::new(),
            value: String::new(),
            display: Display::Unset,
        }
    }

    #[must_use]
    pub fn with_id(self, id: &str) -> Self {
        self.with_attr("id", id)
    }

    #[must_use]
    pub fn with_class(mut self, class: &str) -> Self {
        for name in class.split_whitespace() {
            if !self.classes.iter().any(|c| c == name) {
                self.classes.push(name.to_owned());
            }
        }
        self
    }

    #[must_use]
    pub fn with_attr(mut self, name: &str, value: &str) -> Self {
        self.attrs.insert(name.to_ascii_lowercase(), value.to_owned());
        self
    }

    /// Set `data-<key>`.
    #[must_use]
    pub fn with_data(self, key: &str, value: &str) -> Self {
        self.with_attr(&format!("data-{key}"), value)
    }

    #[must_use]
    pub fn with_text(mut self, text: &str) -> Self {
        text.clone_into(&mut self.text);
        self
    }

    #[must_use]
    pub fn with_value(mut self, value: &str) -> Self {
        value.clone_into(&mut self.value);
        self
    }

    #[must_use]
    pub const fn with_display(mut self, display: Display) -> Self {
        self.display = display;
        self
    }

    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Attributes other than `class`, sorted by name.
    pub fn attrs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attrs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    #[must_use]
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Own text, not including descendants.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    pub(crate) fn set_value(&mut self, value: &str) {
        value.clone_into(&mut self.value);
    }

    #[must_use]
    pub const fn display(&self) -> Display {
        self.display
    }
}

#[derive(Debug, Clone)]
struct Node {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    element: Element,
}

/// A page: an element tree plus an id index.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
    free: Vec<NodeId>,
    id_index: HashMap<String, NodeId>,
    root: NodeId,
    head: NodeId,
    body: NodeId,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    #[must_use]
    pub fn new() -> Self {
        let root = Node {
            parent: None,
            children: Vec::new(),
            element: Element::new("html"),
        };
        let mut doc = Self {
            nodes: vec![root],
            free: Vec::new(),
            id_index: HashMap::new(),
            root: NodeId(0),
            head: NodeId(0),
            body: NodeId(0),
        };
        doc.head = doc.append(doc.root, Element::new("head"));
        doc.body = doc.append(doc.root, Element::new("body"));
        doc
    }

    #[must_use]
    pub const fn root(&self) -> NodeId {
        self.root
    }

    #[must_use]
    pub const fn head(&self) -> NodeId {
        self.head
    }

    #[must_use]
    pub const fn body(&self) -> NodeId {
        self.body
    }

    // NodeIds are only minted by `append`, so they always index into `nodes`.
    #[allow(clippy::indexing_slicing)]
    fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    #[allow(clippy::indexing_slicing)]
    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    /// Attach `element` as the last child of `parent`.
    pub fn append(&mut self, parent: NodeId, element: Element) -> NodeId {
        let dom_id = element.attrs.get("id").cloned();
        let node = Node {
            parent: Some(parent),
            children: Vec::new(),
            element,
        };
        let id = if let Some(slot) = self.free.pop() {
            *self.node_mut(slot) = node;
            slot
        } else {
            self.nodes.push(node);
            NodeId(self.nodes.len() - 1)
        };
        self.node_mut(parent).children.push(id);
        if let Some(dom_id) = dom_id {
            self.index_id(dom_id, id);
        }
        id
    }

    fn index_id(&mut self, dom_id: String, node: NodeId) {
        if !dom_id.is_empty() {
            // First element with a given id wins, like getElementById.
            self.id_index.entry(dom_id).or_insert(node);
        }
    }

    fn unindex_subtree(&mut self, node: NodeId) {
        let mut stack = vec![node];
        while let Some(current) = stack.pop() {
            let dom_id = self.node(current).element.attrs.get("id").cloned();
            if let Some(dom_id) = dom_id
                && self.id_index.get(&dom_id) == Some(&current)
            {
                self.id_index.remove(&dom_id);
            }
            stack.extend(self.node(current).children.iter().copied());
        }
    }

    /// Drop every child of `node` and its own text. The slots of the
    /// dropped subtrees become free for reuse.
    pub fn clear(&mut self, node: NodeId) {
        let children = std::mem::take(&mut self.node_mut(node).children);
        for child in children {
            self.unindex_subtree(child);
            let mut stack = vec![child];
            while let Some(current) = stack.pop() {
                let dropped = self.node_mut(current);
                dropped.parent = None;
                stack.append(&mut dropped.children);
                self.free.push(current);
            }
        }
        self.node_mut(node).element.text.clear();
    }

    // =========================================================================
    // Queries
    // =========================================================================

    #[must_use]
    pub fn by_id(&self, id: &str) -> Option<NodeId> {
        self.id_index.get(id).copied()
    }

    /// Every attached element carrying `class`, in document order.
    #[must_use]
    pub fn by_class(&self, class: &str) -> Vec<NodeId> {
        let mut found = Vec::new();
        if self.has_class(self.root, class) {
            found.push(self.root);
        }
        found.extend(self.descendants_by_class(self.root, class));
        found
    }

    /// Descendants of `node` (not `node` itself) in document order.
    #[must_use]
    pub fn descendants(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.node(node).children.iter().rev().copied().collect();
        while let Some(current) = stack.pop() {
            out.push(current);
            stack.extend(self.node(current).children.iter().rev().copied());
        }
        out
    }

    #[must_use]
    pub fn descendants_by_class(&self, node: NodeId, class: &str) -> Vec<NodeId> {
        self.descendants(node)
            .into_iter()
            .filter(|&n| self.has_class(n, class))
            .collect()
    }

    #[must_use]
    pub fn descendants_by_tag(&self, node: NodeId, tag: &str) -> Vec<NodeId> {
        self.descendants(node)
            .into_iter()
            .filter(|&n| self.tag(n).eq_ignore_ascii_case(tag))
            .collect()
    }

    #[must_use]
    pub fn first_descendant_by_tag(&self, node: NodeId, tag: &str) -> Option<NodeId> {
        self.descendants(node)
            .into_iter()
            .find(|&n| self.tag(n).eq_ignore_ascii_case(tag))
    }

    /// `node` itself or its nearest ancestor carrying `class`.
    #[must_use]
    pub fn closest_with_class(&self, node: NodeId, class: &str) -> Option<NodeId> {
        let mut cursor = Some(node);
        while let Some(current) = cursor {
            if self.has_class(current, class) {
                return Some(current);
            }
            cursor = self.parent(current);
        }
        None
    }

    /// Whether `node` is `ancestor` or lies inside it.
    #[must_use]
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut cursor = Some(node);
        while let Some(current) = cursor {
            if current == ancestor {
                return true;
            }
            cursor = self.parent(current);
        }
        false
    }

    #[must_use]
    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.node(node).parent
    }

    #[must_use]
    pub fn children(&self, node: NodeId) -> &[NodeId] {
        &self.node(node).children
    }

    #[must_use]
    pub fn next_element_sibling(&self, node: NodeId) -> Option<NodeId> {
        let parent = self.parent(node)?;
        let siblings = &self.node(parent).children;
        let position = siblings.iter().position(|&n| n == node)?;
        siblings.get(position + 1).copied()
    }

    #[must_use]
    pub fn tag(&self, node: NodeId) -> &str {
        &self.node(node).element.tag
    }

    /// Current state of `node` itself.
    #[must_use]
    pub fn element(&self, node: NodeId) -> &Element {
        &self.node(node).element
    }

    // =========================================================================
    // Attributes
    // =========================================================================

    #[must_use]
    pub fn attr(&self, node: NodeId, name: &str) -> Option<&str> {
        self.node(node).element.attrs.get(name).map(String::as_str)
    }

    #[must_use]
    pub fn has_attr(&self, node: NodeId, name: &str) -> bool {
        self.node(node).element.attrs.contains_key(name)
    }

    /// `data-<key>` of `node`.
    #[must_use]
    pub fn data(&self, node: NodeId, key: &str) -> Option<&str> {
        self.attr(node, &format!("data-{key}"))
    }

    pub fn set_attr(&mut self, node: NodeId, name: &str, value: &str) {
        let name = name.to_ascii_lowercase();
        if name == "id" {
            self.unindex_subtree_root(node);
            self.index_id(value.to_owned(), node);
        }
        self.node_mut(node)
            .element
            .attrs
            .insert(name, value.to_owned());
    }

    pub fn remove_attr(&mut self, node: NodeId, name: &str) {
        if name == "id" {
            self.unindex_subtree_root(node);
        }
        self.node_mut(node).element.attrs.remove(name);
    }

    fn unindex_subtree_root(&mut self, node: NodeId) {
        if let Some(old) = self.node(node).element.attrs.get("id").cloned()
            && self.id_index.get(&old) == Some(&node)
        {
            self.id_index.remove(&old);
        }
    }

    // =========================================================================
    // Classes
    // =========================================================================

    #[must_use]
    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.node(node).element.classes.iter().any(|c| c == class)
    }

    pub fn add_class(&mut self, node: NodeId, class: &str) {
        if !self.has_class(node, class) {
            self.node_mut(node).element.classes.push(class.to_owned());
        }
    }

    pub fn remove_class(&mut self, node: NodeId, class: &str) {
        self.node_mut(node).element.classes.retain(|c| c != class);
    }

    /// Toggle `class`; returns whether it is present afterwards.
    pub fn toggle_class(&mut self, node: NodeId, class: &str) -> bool {
        if self.has_class(node, class) {
            self.remove_class(node, class);
            false
        } else {
            self.add_class(node, class);
            true
        }
    }

    // =========================================================================
    // Style, text and value
    // =========================================================================

    #[must_use]
    pub fn display(&self, node: NodeId) -> Display {
        self.node(node).element.display
    }

    pub fn set_display(&mut self, node: NodeId, display: Display) {
        self.node_mut(node).element.display = display;
    }

    /// Whether the inline style hides `node`.
    #[must_use]
    pub fn is_hidden(&self, node: NodeId) -> bool {
        self.display(node) == Display::None
    }

    #[must_use]
    pub fn text_content(&self, node: NodeId) -> String {
        let mut out = self.node(node).element.text.clone();
        for child in self.descendants(node) {
            out.push_str(&self.node(child).element.text);
        }
        out
    }

    /// Replace the whole content of `node` with `text`.
    pub fn set_text(&mut self, node: NodeId, text: &str) {
        self.clear(node);
        text.clone_into(&mut self.node_mut(node).element.text);
    }

    pub fn push_text(&mut self, node: NodeId, ch: char) {
        self.node_mut(node).element.text.push(ch);
    }

    #[must_use]
    pub fn value(&self, node: NodeId) -> &str {
        &self.node(node).element.value
    }

    pub fn set_value(&mut self, node: NodeId, value: &str) {
        value.clone_into(&mut self.node_mut(node).element.value);
    }
}
