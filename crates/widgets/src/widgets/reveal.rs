//! One-shot scroll reveal.

use crate::dom::{Document, NodeId};

/// Class marking elements that should fade in when scrolled into view.
pub const SECTION_CLASS: &str = "fade-in-section";
/// Class added once an element has been seen.
pub const VISIBLE_CLASS: &str = "visible";

/// Visibility report for one observed element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intersection {
    pub target: NodeId,
    /// Fraction of the element inside the viewport, 0..=1.
    pub ratio: f64,
}

/// Watches every `.fade-in-section` until it first becomes visible.
#[derive(Debug, Clone)]
pub struct ScrollReveal {
    observed: Vec<NodeId>,
    threshold: f64,
}

impl ScrollReveal {
    pub const NAME: &'static str = "scroll-reveal";

    /// Returns `None` if the page has no `.fade-in-section` element.
    #[must_use]
    pub fn mount(doc: &Document, threshold: f64) -> Option<Self> {
        let observed = doc.by_class(SECTION_CLASS);
        if observed.is_empty() {
            return None;
        }
        Some(Self {
            observed,
            threshold,
        })
    }

    /// Apply a batch of intersection reports. Returns the elements revealed
    /// by this batch.
    pub fn on_intersect(&mut self, doc: &mut Document, entries: &[Intersection]) -> Vec<NodeId> {
        let mut revealed = Vec::new();
        for entry in entries {
            if !self.is_intersecting(entry.ratio) || !self.observed.contains(&entry.target) {
                continue;
            }
            doc.add_class(entry.target, VISIBLE_CLASS);
            self.observed.retain(|&n| n != entry.target);
            revealed.push(entry.target);
        }
        revealed
    }

    fn is_intersecting(&self, ratio: f64) -> bool {
        ratio > 0.0 && ratio >= self.threshold
    }

    /// Elements still waiting to be revealed.
    #[must_use]
    pub fn observed(&self) -> &[NodeId] {
        &self.observed
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
        let a = doc.append(body, Element::new("section").with_class(SECTION_CLASS));
        let b = doc.append(body, Element::new("section").with_class(SECTION_CLASS));
        (doc, a, b)
    }

    #[test]
    fn test_reveal_once_and_stop_observing() {
        let (mut doc, a, b) = page();
        let mut reveal = ScrollReveal::mount(&doc, 0.1).unwrap();

        let revealed = reveal.on_intersect(&mut doc, &[Intersection { target: b, ratio: 0.5 }]);
        assert_eq!(revealed, [b]);
        assert!(doc.has_class(b, VISIBLE_CLASS));
        assert!(!doc.has_class(a, VISIBLE_CLASS));
        assert_eq!(reveal.observed(), [a]);

        // Scrolling away and back does not re-trigger.
        doc.remove_class(b, VISIBLE_CLASS);
        let revealed = reveal.on_intersect(&mut doc, &[Intersection { target: b, ratio: 1.0 }]);
        assert!(revealed.is_empty());
        assert!(!doc.has_class(b, VISIBLE_CLASS));
    }

    #[test]
    fn test_below_threshold_is_ignored() {
        let (mut doc, a, _) = page();
        let mut reveal = ScrollReveal::mount(&doc, 0.1).unwrap();

        reveal.on_intersect(&mut doc, &[Intersection { target: a, ratio: 0.05 }]);
        assert!(!doc.has_class(a, VISIBLE_CLASS));

        reveal.on_intersect(&mut doc, &[Intersection { target: a, ratio: 0.1 }]);
        assert!(doc.has_class(a, VISIBLE_CLASS));
    }

    #[test]
    fn test_zero_ratio_never_reveals_even_with_zero_threshold() {
        let (mut doc, a, _) = page();
        let mut reveal = ScrollReveal::mount(&doc, 0.0).unwrap();

        reveal.on_intersect(&mut doc, &[Intersection { target: a, ratio: 0.0 }]);
        assert!(!doc.has_class(a, VISIBLE_CLASS));
    }

    #[test]
    fn test_no_sections_skips() {
        assert!(ScrollReveal::mount(&Document::new(), 0.1).is_none());
    }
}
