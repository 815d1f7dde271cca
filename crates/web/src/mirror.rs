//! Two-way link between the live page and the widgets' [`Document`].
//!
//! [`Mirror::import`] copies the elements under `<head>` and `<body>` into a
//! fresh document. Afterwards the document is the source of truth:
//! [`Mirror::flush`] writes its changes to the page, and only form values
//! typed by the user flow back through [`Mirror::pull_values`].
//!
//! Text and comment nodes are not modelled. An element's own text is the
//! concatenation of its direct text nodes, and rewriting it places the text
//! before the element's children.

use std::collections::HashMap;

use fraterno_widgets::{Display, Document, Element, NodeId, Patch, Snapshot};
use wasm_bindgen::JsCast;

use crate::error::WebError;

/// Live elements by document node, plus the state last written to them.
#[derive(Debug)]
pub struct Mirror {
    page: web_sys::Document,
    elements: HashMap<NodeId, web_sys::Element>,
    snapshot: Snapshot,
}

impl Mirror {
    /// Copy the live page into a new [`Document`].
    ///
    /// # Errors
    ///
    /// Returns error if the page lacks `<html>`, `<head>` or `<body>`.
    pub fn import(page: &web_sys::Document) -> Result<(Self, Document), WebError> {
        let root = page
            .document_element()
            .ok_or(WebError::MissingElement("html"))?;
        let head: web_sys::Element = page.head().ok_or(WebError::MissingElement("head"))?.into();
        let body: web_sys::Element = page.body().ok_or(WebError::MissingElement("body"))?.into();

        let mut doc = Document::new();
        let mut elements = HashMap::new();
        let mut pending = Vec::new();
        for (node, live) in [(doc.root(), root), (doc.head(), head), (doc.body(), body)] {
            copy_skeleton(&mut doc, node, &live);
            if node != doc.root() {
                pending.push((node, live.clone()));
            }
            elements.insert(node, live);
        }

        while let Some((parent, live_parent)) = pending.pop() {
            let children = live_parent.children();
            for index in 0..children.length() {
                let Some(live) = children.item(index) else {
                    continue;
                };
                let node = doc.append(parent, element_from(&live));
                pending.push((node, live.clone()));
                elements.insert(node, live);
            }
        }

        tracing::debug!(elements = elements.len(), "page imported");
        let mirror = Self {
            page: page.clone(),
            elements,
            snapshot: Snapshot::capture(&doc),
        };
        Ok((mirror, doc))
    }

    /// Document node rendered as `target` or its nearest modelled ancestor.
    #[must_use]
    pub fn node_of(&self, target: &web_sys::Node) -> Option<NodeId> {
        let mut cursor = Some(target.clone());
        while let Some(current) = cursor {
            let found = self
                .elements
                .iter()
                .find(|(_, live)| same_node(live, &current))
                .map(|(node, _)| *node);
            if found.is_some() {
                return found;
            }
            cursor = current.parent_node();
        }
        None
    }

    /// Live element rendering `node`.
    #[must_use]
    pub fn element(&self, node: NodeId) -> Option<&web_sys::Element> {
        self.elements.get(&node)
    }

    /// Copy form values the user typed into `doc`.
    pub fn pull_values(&mut self, doc: &mut Document) {
        for (node, live) in &self.elements {
            let Some(value) = form_value(live) else {
                continue;
            };
            if value != doc.value(*node) {
                doc.set_value(*node, &value);
                self.snapshot.record_value(*node, &value);
            }
        }
    }

    /// Write every change made to `doc` since the last flush to the page.
    ///
    /// # Errors
    ///
    /// Returns error if the browser rejects a change. Changes before the
    /// failing one stay applied.
    pub fn flush(&mut self, doc: &Document) -> Result<(), WebError> {
        let patches = self.snapshot.update(doc);
        if !patches.is_empty() {
            tracing::trace!(patches = patches.len(), "flushing document changes");
        }
        for patch in patches {
            self.apply(patch)?;
        }
        let snapshot = &self.snapshot;
        self.elements.retain(|node, _| snapshot.contains(*node));
        Ok(())
    }

    fn live(&self, node: NodeId) -> Result<&web_sys::Element, WebError> {
        self.elements
            .get(&node)
            .ok_or(WebError::UnknownNode(node))
    }

    fn apply(&mut self, patch: Patch) -> Result<(), WebError> {
        match patch {
            Patch::Create { node, tag } => {
                let live = self.page.create_element(&tag).map_err(WebError::js)?;
                self.elements.insert(node, live);
            }
            Patch::SetAttr { node, name, value } => self
                .live(node)?
                .set_attribute(&name, &value)
                .map_err(WebError::js)?,
            Patch::RemoveAttr { node, name } => self
                .live(node)?
                .remove_attribute(&name)
                .map_err(WebError::js)?,
            Patch::SetClass { node, class } => self.live(node)?.set_class_name(&class),
            Patch::SetDisplay { node, display } => set_display(self.live(node)?, display)?,
            Patch::SetValue { node, value } => set_form_value(self.live(node)?, &value),
            Patch::ReplaceContent {
                node,
                text,
                children,
            } => {
                let live = self.live(node)?;
                live.set_text_content((!text.is_empty()).then_some(text.as_str()));
                for child in children {
                    live.append_child(self.live(child)?).map_err(WebError::js)?;
                }
            }
            Patch::Rearrange { node, children } => self.rearrange(node, &children)?,
        }
        Ok(())
    }

    /// Make the element children of `node` exactly `children`, leaving its
    /// text nodes alone.
    fn rearrange(&self, node: NodeId, children: &[NodeId]) -> Result<(), WebError> {
        let live = self.live(node)?;
        let desired = children
            .iter()
            .map(|child| self.live(*child))
            .collect::<Result<Vec<_>, _>>()?;

        let current = live.children();
        let mut kept = Vec::new();
        let mut stale = Vec::new();
        for index in 0..current.length() {
            if let Some(child) = current.item(index) {
                if desired.iter().any(|wanted| same_node(wanted, &child)) {
                    kept.push(child);
                } else {
                    stale.push(child);
                }
            }
        }
        for child in stale {
            child.remove();
        }

        let in_order = kept.len() <= desired.len()
            && kept
                .iter()
                .zip(&desired)
                .all(|(have, wanted)| same_node(have, wanted));
        let first_missing = if in_order { kept.len() } else { 0 };
        for child in desired.iter().skip(first_missing) {
            live.append_child(child).map_err(WebError::js)?;
        }
        Ok(())
    }
}

fn same_node(a: &web_sys::Node, b: &web_sys::Node) -> bool {
    a.is_same_node(Some(b))
}

fn element_from(live: &web_sys::Element) -> Element {
    let mut element = Element::new(&live.tag_name());
    let attrs = live.attributes();
    for index in 0..attrs.length() {
        let Some(attr) = attrs.item(index) else {
            continue;
        };
        element = match attr.name().as_str() {
            "class" => element.with_class(&attr.value()),
            name => element.with_attr(name, &attr.value()),
        };
    }
    element = element
        .with_display(inline_display(live))
        .with_text(&own_text(live));
    if let Some(value) = form_value(live) {
        element = element.with_value(&value);
    }
    element
}

/// `<html>`, `<head>` and `<body>` already exist in a new document; copy
/// their attributes onto them.
fn copy_skeleton(doc: &mut Document, node: NodeId, live: &web_sys::Element) {
    let attrs = live.attributes();
    for index in 0..attrs.length() {
        let Some(attr) = attrs.item(index) else {
            continue;
        };
        if attr.name() == "class" {
            for class in attr.value().split_whitespace() {
                doc.add_class(node, class);
            }
        } else {
            doc.set_attr(node, &attr.name(), &attr.value());
        }
    }
    doc.set_display(node, inline_display(live));
}

fn inline_display(live: &web_sys::Element) -> Display {
    live.get_attribute("style")
        .map(|style| Display::from_style(&style))
        .unwrap_or_default()
}

fn own_text(live: &web_sys::Element) -> String {
    let nodes = live.child_nodes();
    let mut text = String::new();
    for index in 0..nodes.length() {
        if let Some(node) = nodes.item(index)
            && node.node_type() == web_sys::Node::TEXT_NODE
            && let Some(content) = node.text_content()
        {
            text.push_str(&content);
        }
    }
    text
}

fn form_value(live: &web_sys::Element) -> Option<String> {
    if let Some(input) = live.dyn_ref::<web_sys::HtmlInputElement>() {
        return Some(input.value());
    }
    if let Some(area) = live.dyn_ref::<web_sys::HtmlTextAreaElement>() {
        return Some(area.value());
    }
    live.dyn_ref::<web_sys::HtmlSelectElement>()
        .map(web_sys::HtmlSelectElement::value)
}

fn set_form_value(live: &web_sys::Element, value: &str) {
    if let Some(input) = live.dyn_ref::<web_sys::HtmlInputElement>() {
        input.set_value(value);
    } else if let Some(area) = live.dyn_ref::<web_sys::HtmlTextAreaElement>() {
        area.set_value(value);
    } else if let Some(select) = live.dyn_ref::<web_sys::HtmlSelectElement>() {
        select.set_value(value);
    }
}

fn set_display(live: &web_sys::Element, display: Display) -> Result<(), WebError> {
    let Some(html) = live.dyn_ref::<web_sys::HtmlElement>() else {
        return Ok(());
    };
    let style = html.style();
    match display.as_css() {
        Some(value) => style.set_property("display", value).map_err(WebError::js),
        None => style
            .remove_property("display")
            .map(|_| ())
            .map_err(WebError::js),
    }
}
