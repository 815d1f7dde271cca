//! Course search on the member dashboard.
//!
//! Every key-up re-filters the course cards by title. A track section stays
//! visible while at least one of its cards matches, and a main heading stays
//! visible while at least one track section under it does.

use crate::dom::{Display, Document, NodeId};

pub const INPUT_ID: &str = "caixa-busca";
pub const SECTION_CLASS: &str = "trilha-section";
pub const CARD_CLASS: &str = "curso-card";
pub const HEADING_CLASS: &str = "main-section-title";

#[derive(Debug, Clone, Copy)]
pub struct DashboardSearch {
    input: NodeId,
}

impl DashboardSearch {
    pub const NAME: &'static str = "dashboard-search";

    #[must_use]
    pub fn mount(doc: &Document) -> Option<Self> {
        doc.by_id(INPUT_ID).map(|input| Self { input })
    }

    /// Re-filter after a key-up on `input`. Returns `false` for other inputs.
    pub fn on_key_up(&self, doc: &mut Document, input: NodeId) -> bool {
        if input != self.input {
            return false;
        }
        let term = doc.value(self.input).to_lowercase();
        apply(doc, &term);
        true
    }
}

/// Show the cards whose `h4` title contains `term` (already lowercased).
///
/// An empty term shows everything, including sections without cards.
pub fn apply(doc: &mut Document, term: &str) {
    if term.is_empty() {
        show_all(doc);
        return;
    }

    for section in doc.by_class(SECTION_CLASS) {
        let mut any_match = false;
        for card in doc.descendants_by_class(section, CARD_CLASS) {
            let matches = card_title(doc, card).contains(term);
            any_match |= matches;
            doc.set_display(card, if matches { Display::Flex } else { Display::None });
        }
        doc.set_display(
            section,
            if any_match { Display::Block } else { Display::None },
        );
    }

    for heading in doc.by_class(HEADING_CLASS) {
        let shown = has_visible_section(doc, heading);
        doc.set_display(heading, if shown { Display::Block } else { Display::None });
    }

    tracing::debug!(term, "dashboard filtered");
}

fn show_all(doc: &mut Document) {
    for card in doc.by_class(CARD_CLASS) {
        doc.set_display(card, Display::Flex);
    }
    for node in doc
        .by_class(SECTION_CLASS)
        .into_iter()
        .chain(doc.by_class(HEADING_CLASS))
    {
        doc.set_display(node, Display::Block);
    }
}

fn card_title(doc: &Document, card: NodeId) -> String {
    doc.first_descendant_by_tag(card, "h4")
        .map(|title| doc.text_content(title).to_lowercase())
        .unwrap_or_default()
}

/// Scan the siblings after `heading` up to the next heading.
fn has_visible_section(doc: &Document, heading: NodeId) -> bool {
    let mut cursor = doc.next_element_sibling(heading);
    while let Some(node) = cursor {
        if doc.has_class(node, HEADING_CLASS) {
            return false;
        }
        if doc.has_class(node, SECTION_CLASS) && !doc.is_hidden(node) {
            return true;
        }
        cursor = doc.next_element_sibling(node);
    }
    false
}
