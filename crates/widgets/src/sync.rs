//! Change tracking between a [`Document`] and a rendered copy of it.
//!
//! A renderer (the browser DOM, in practice) starts from the state captured
//! by [`Snapshot::capture`]. After the widgets have handled an event,
//! [`Snapshot::update`] lists the [`Patch`]es that bring the rendered copy up
//! to date and remembers the new state.
//!
//! Patches for a node's children come before the patch that lists them as
//! its content, so every child referenced by [`Patch::ReplaceContent`] or
//! [`Patch::Rearrange`] already exists when the parent is patched.

use std::collections::{BTreeMap, HashMap, HashSet};

use crate::dom::{Display, Document, Element, NodeId};

/// One change to apply to the rendered page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Patch {
    /// Make a fresh element for `node`, replacing any earlier one.
    Create { node: NodeId, tag: String },
    SetAttr {
        node: NodeId,
        name: String,
        value: String,
    },
    RemoveAttr { node: NodeId, name: String },
    /// Replace the whole class attribute.
    SetClass { node: NodeId, class: String },
    SetDisplay { node: NodeId, display: Display },
    SetValue { node: NodeId, value: String },
    /// Drop every child, write `text` and append `children` in order.
    ReplaceContent {
        node: NodeId,
        text: String,
        children: Vec<NodeId>,
    },
    /// Own text is unchanged; the element children become `children`.
    /// Also sent when a child kept its id but was created afresh.
    Rearrange { node: NodeId, children: Vec<NodeId> },
}

#[derive(Debug, Clone)]
struct Rendered {
    element: Element,
    children: Vec<NodeId>,
}

/// Last state known to be rendered.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    nodes: HashMap<NodeId, Rendered>,
}

impl Snapshot {
    /// Record `doc` as already rendered.
    #[must_use]
    pub fn capture(doc: &Document) -> Self {
        let mut nodes = HashMap::new();
        for node in attached(doc) {
            nodes.insert(node, rendered(doc, node));
        }
        Self { nodes }
    }

    /// Number of elements in the recorded state.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Whether `node` was attached in the recorded state.
    #[must_use]
    pub fn contains(&self, node: NodeId) -> bool {
        self.nodes.contains_key(&node)
    }

    /// Note a form value the renderer changed on its own (user input).
    pub fn record_value(&mut self, node: NodeId, value: &str) {
        if let Some(rendered) = self.nodes.get_mut(&node) {
            rendered.element.set_value(value);
        }
    }

    /// Patches turning the recorded state into `doc`. The snapshot then
    /// records `doc`.
    pub fn update(&mut self, doc: &Document) -> Vec<Patch> {
        let mut patches = Vec::new();
        let mut next = HashMap::new();
        let mut created = HashSet::new();

        for node in attached(doc) {
            let now = rendered(doc, node);
            match self.nodes.get(&node) {
                Some(before) if before.element.tag() == now.element.tag() => {
                    let fresh_child = now.children.iter().any(|child| created.contains(child));
                    diff_node(node, before, &now, fresh_child, &mut patches);
                }
                _ => {
                    create_node(node, &now, &mut patches);
                    created.insert(node);
                }
            }
            next.insert(node, now);
        }

        self.nodes = next;
        patches
    }
}

/// Attached nodes in post-order: children before their parent.
fn attached(doc: &Document) -> Vec<NodeId> {
    let mut order = Vec::new();
    let mut stack = vec![(doc.root(), false)];
    while let Some((node, expanded)) = stack.pop() {
        if expanded {
            order.push(node);
        } else {
            stack.push((node, true));
            stack.extend(doc.children(node).iter().rev().map(|child| (*child, false)));
        }
    }
    order
}

fn rendered(doc: &Document, node: NodeId) -> Rendered {
    Rendered {
        element: doc.element(node).clone(),
        children: doc.children(node).to_vec(),
    }
}

fn create_node(node: NodeId, now: &Rendered, patches: &mut Vec<Patch>) {
    let element = &now.element;
    patches.push(Patch::Create {
        node,
        tag: element.tag().to_owned(),
    });
    for (name, value) in element.attrs() {
        patches.push(Patch::SetAttr {
            node,
            name: name.to_owned(),
            value: value.to_owned(),
        });
    }
    if !element.classes().is_empty() {
        patches.push(Patch::SetClass {
            node,
            class: element.classes().join(" "),
        });
    }
    if element.display() != Display::Unset {
        patches.push(Patch::SetDisplay {
            node,
            display: element.display(),
        });
    }
    if !element.value().is_empty() {
        patches.push(Patch::SetValue {
            node,
            value: element.value().to_owned(),
        });
    }
    if !element.text().is_empty() || !now.children.is_empty() {
        patches.push(Patch::ReplaceContent {
            node,
            text: element.text().to_owned(),
            children: now.children.clone(),
        });
    }
}

fn diff_node(
    node: NodeId,
    before: &Rendered,
    now: &Rendered,
    fresh_child: bool,
    patches: &mut Vec<Patch>,
) {
    let (old, new) = (&before.element, &now.element);

    let old_attrs: BTreeMap<&str, &str> = old.attrs().collect();
    for (name, value) in new.attrs() {
        if old_attrs.get(name) != Some(&value) {
            patches.push(Patch::SetAttr {
                node,
                name: name.to_owned(),
                value: value.to_owned(),
            });
        }
    }
    let new_attrs: BTreeMap<&str, &str> = new.attrs().collect();
    for name in old_attrs.keys().filter(|name| !new_attrs.contains_key(*name)) {
        patches.push(Patch::RemoveAttr {
            node,
            name: (*name).to_owned(),
        });
    }

    if old.classes() != new.classes() {
        patches.push(Patch::SetClass {
            node,
            class: new.classes().join(" "),
        });
    }
    if old.display() != new.display() {
        patches.push(Patch::SetDisplay {
            node,
            display: new.display(),
        });
    }
    if old.value() != new.value() {
        patches.push(Patch::SetValue {
            node,
            value: new.value().to_owned(),
        });
    }

    if old.text() != new.text() {
        patches.push(Patch::ReplaceContent {
            node,
            text: new.text().to_owned(),
            children: now.children.clone(),
        });
    } else if fresh_child || before.children != now.children {
        patches.push(Patch::Rearrange {
            node,
            children: now.children.clone(),
        });
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn position(patches: &[Patch], wanted: impl Fn(&Patch) -> bool) -> usize {
        patches.iter().position(wanted).unwrap()
    }

    #[test]
    fn test_unchanged_document_needs_no_patches() {
        let mut doc = Document::new();
        let body = doc.body();
        doc.append(body, Element::new("p").with_class("lead").with_text("Bem-vindo"));

        let mut snapshot = Snapshot::capture(&doc);
        assert_eq!(snapshot.len(), 4);
        assert!(snapshot.update(&doc).is_empty());
    }

    #[test]
    fn test_attribute_class_display_and_value_changes() {
        let mut doc = Document::new();
        let body = doc.body();
        let button = doc.append(
            body,
            Element::new("button")
                .with_class("filter-btn active")
                .with_attr("aria-expanded", "false")
                .with_attr("title", "Filtro"),
        );
        let input = doc.append(body, Element::new("input"));
        let mut snapshot = Snapshot::capture(&doc);

        doc.remove_class(button, "active");
        doc.set_attr(button, "aria-expanded", "true");
        doc.remove_attr(button, "title");
        doc.set_display(button, Display::None);
        doc.set_value(input, "João");

        assert_eq!(
            snapshot.update(&doc),
            [
                Patch::SetAttr {
                    node: button,
                    name: "aria-expanded".into(),
                    value: "true".into(),
                },
                Patch::RemoveAttr {
                    node: button,
                    name: "title".into(),
                },
                Patch::SetClass {
                    node: button,
                    class: "filter-btn".into(),
                },
                Patch::SetDisplay {
                    node: button,
                    display: Display::None,
                },
                Patch::SetValue {
                    node: input,
                    value: "João".into(),
                },
            ]
        );
        assert!(snapshot.update(&doc).is_empty());
    }

    #[test]
    fn test_rerendered_list_creates_children_before_parent_content() {
        let mut doc = Document::new();
        let body = doc.body();
        let list = doc.append(body, Element::new("ul"));
        doc.append(list, Element::new("li").with_text("Seu carrinho está vazio"));
        let mut snapshot = Snapshot::capture(&doc);

        doc.clear(list);
        let row = doc.append(list, Element::new("li").with_class("cart-item"));
        let name = doc.append(row, Element::new("span").with_text("Pastel"));
        let patches = snapshot.update(&doc);

        let created_name = position(&patches, |p| {
            matches!(p, Patch::Create { node, .. } if *node == name)
        });
        let filled_row = position(&patches, |p| {
            matches!(p, Patch::ReplaceContent { node, children, .. }
                if *node == row && children == &[name])
        });
        let filled_list = position(&patches, |p| {
            matches!(p, Patch::Rearrange { node, children }
                if *node == list && children == &[row])
        });
        assert!(created_name < filled_row);
        assert!(filled_row < filled_list);
        assert!(patches.contains(&Patch::ReplaceContent {
            node: name,
            text: "Pastel".into(),
            children: Vec::new(),
        }));
    }

    #[test]
    fn test_reused_slot_is_diffed_against_previous_occupant() {
        let mut doc = Document::new();
        let body = doc.body();
        let list = doc.append(body, Element::new("ul"));
        let first = doc.append(list, Element::new("li").with_text("Burger"));
        let mut snapshot = Snapshot::capture(&doc);

        doc.clear(list);
        let second = doc.append(list, Element::new("li").with_text("Soda"));
        assert_eq!(first, second);
        assert!(snapshot.contains(first));

        assert_eq!(
            snapshot.update(&doc),
            [Patch::ReplaceContent {
                node: second,
                text: "Soda".into(),
                children: Vec::new(),
            }]
        );
    }

    #[test]
    fn test_retagged_slot_is_created_afresh() {
        let mut doc = Document::new();
        let body = doc.body();
        let list = doc.append(body, Element::new("ul"));
        let old = doc.append(list, Element::new("li").with_text("vazio"));
        let mut snapshot = Snapshot::capture(&doc);

        doc.clear(list);
        let new = doc.append(list, Element::new("div").with_text("Pastel"));
        assert_eq!(old, new);

        let patches = snapshot.update(&doc);
        assert_eq!(
            patches.first(),
            Some(&Patch::Create {
                node: new,
                tag: "div".into(),
            })
        );
        assert!(patches.contains(&Patch::Rearrange {
            node: list,
            children: vec![new],
        }));
    }

    #[test]
    fn test_cleared_nodes_leave_the_snapshot() {
        let mut doc = Document::new();
        let body = doc.body();
        let list = doc.append(body, Element::new("ul"));
        let row = doc.append(list, Element::new("li"));
        let mut snapshot = Snapshot::capture(&doc);
        assert!(snapshot.contains(row));

        doc.clear(list);
        assert_eq!(
            snapshot.update(&doc),
            [Patch::Rearrange {
                node: list,
                children: Vec::new(),
            }]
        );
        assert!(!snapshot.contains(row));
        assert!(snapshot.contains(list));
    }

    #[test]
    fn test_recorded_value_is_not_patched_back() {
        let mut doc = Document::new();
        let body = doc.body();
        let input = doc.append(body, Element::new("input"));
        let mut snapshot = Snapshot::capture(&doc);

        doc.set_value(input, "curso");
        snapshot.record_value(input, "curso");
        assert!(snapshot.update(&doc).is_empty());
    }
}
