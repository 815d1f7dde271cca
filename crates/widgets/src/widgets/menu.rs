//! Mobile navigation toggle.

use crate::dom::{Document, NodeId};

pub const TOGGLE_ID: &str = "mobile-menu";
pub const OPEN_CLASS: &str = "active";

/// Hamburger button that opens and closes the header navigation.
#[derive(Debug, Clone, Copy)]
pub struct MenuToggle {
    toggle: NodeId,
    nav: NodeId,
}

impl MenuToggle {
    pub const NAME: &'static str = "menu-toggle";

    /// Returns `None` without both `#mobile-menu` and a `nav` inside `header`.
    #[must_use]
    pub fn mount(doc: &Document) -> Option<Self> {
        let toggle = doc.by_id(TOGGLE_ID)?;
        let header = doc.first_descendant_by_tag(doc.root(), "header")?;
        let nav = doc.first_descendant_by_tag(header, "nav")?;
        Some(Self { toggle, nav })
    }

    /// Toggle the navigation if `target` is the button or inside it.
    pub fn on_click(&self, doc: &mut Document, target: NodeId) -> bool {
        if !doc.contains(self.toggle, target) {
            return false;
        }
        let open = doc.toggle_class(self.nav, OPEN_CLASS);
        tracing::debug!(open, "menu toggled");
        true
    }

    #[must_use]
    pub fn is_open(&self, doc: &Document) -> bool {
        doc.has_class(self.nav, OPEN_CLASS)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::dom::Element;

    fn page() -> (Document, NodeId, NodeId) {
        let mut doc = Document::new();
        let body = doc.body();
        let header = doc.append(body, Element::new("header"));
        let button = doc.append(header, Element::new("div").with_id(TOGGLE_ID));
        let bar = doc.append(button, Element::new("span").with_class("bar"));
        doc.append(header, Element::new("nav"));
        (doc, button, bar)
    }

    #[test]
    fn test_click_toggles_nav() {
        let (mut doc, button, bar) = page();
        let menu = MenuToggle::mount(&doc).unwrap();

        assert!(menu.on_click(&mut doc, button));
        assert!(menu.is_open(&doc));
        assert!(menu.on_click(&mut doc, bar));
        assert!(!menu.is_open(&doc));
    }

    #[test]
    fn test_other_clicks_are_ignored() {
        let (mut doc, _, _) = page();
        let menu = MenuToggle::mount(&doc).unwrap();
        let body = doc.body();

        assert!(!menu.on_click(&mut doc, body));
        assert!(!menu.is_open(&doc));
    }

    #[test]
    fn test_nav_outside_header_does_not_mount() {
        let mut doc = Document::new();
        let body = doc.body();
        doc.append(body, Element::new("div").with_id(TOGGLE_ID));
        doc.append(body, Element::new("nav"));

        assert!(MenuToggle::mount(&doc).is_none());
    }
}
