//! Typing effect on the hero heading.

use crate::dom::{Document, Element, NodeId};

/// Class added to the heading once the text is complete.
pub const DONE_CLASS: &str = "typing-done";

/// Reveals a fixed string one character per tick into `#hero-title`.
#[derive(Debug, Clone)]
pub struct TypingEffect {
    heading: NodeId,
    chars: Vec<char>,
    typed: usize,
    done: bool,
}

/// What a single tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypingProgress {
    /// One more character is visible.
    Typed(char),
    /// The text was already complete; the heading is now marked done.
    Finished,
    /// Nothing left to do.
    Idle,
}

impl TypingEffect {
    pub const NAME: &'static str = "typing-effect";
    pub const ANCHOR: &'static str = "hero-title";

    /// Clear the heading and install the rule hiding the cursor once done.
    ///
    /// Returns `None` if the page has no `#hero-title`.
    pub fn mount(doc: &mut Document, text: &str) -> Option<Self> {
        let heading = doc.by_id(Self::ANCHOR)?;
        doc.clear(heading);

        let head = doc.head();
        doc.append(
            head,
            Element::new("style").with_text(&format!(
                "#{}.{DONE_CLASS}::after {{ display: none; }}",
                Self::ANCHOR
            )),
        );

        Some(Self {
            heading,
            chars: text.chars().collect(),
            typed: 0,
            done: false,
        })
    }

    /// Advance the animation by one step.
    pub fn tick(&mut self, doc: &mut Document) -> TypingProgress {
        if self.done {
            return TypingProgress::Idle;
        }

        if let Some(&ch) = self.chars.get(self.typed) {
            doc.push_text(self.heading, ch);
            self.typed += 1;
            return TypingProgress::Typed(ch);
        }

        doc.add_class(self.heading, DONE_CLASS);
        self.done = true;
        TypingProgress::Finished
    }

    #[must_use]
    pub const fn is_done(&self) -> bool {
        self.done
    }

    #[must_use]
    pub const fn heading(&self) -> NodeId {
        self.heading
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn page() -> Document {
        let mut doc = Document::new();
        let body = doc.body();
        doc.append(body, Element::new("h1").with_id("hero-title").with_text("placeholder"));
        doc
    }

    #[test]
    fn test_mount_clears_heading_and_injects_style() {
        let mut doc = page();
        let effect = TypingEffect::mount(&mut doc, "Oi").unwrap();

        assert_eq!(doc.text_content(effect.heading()), "");
        let styles = doc.descendants_by_tag(doc.head(), "style");
        assert_eq!(styles.len(), 1);
        assert!(doc.text_content(styles[0]).contains("#hero-title.typing-done::after"));
    }

    #[test]
    fn test_reveals_one_char_per_tick_then_marks_done() {
        let mut doc = page();
        let mut effect = TypingEffect::mount(&mut doc, "Olá").unwrap();
        let heading = effect.heading();

        assert_eq!(effect.tick(&mut doc), TypingProgress::Typed('O'));
        assert_eq!(doc.text_content(heading), "O");
        effect.tick(&mut doc);
        effect.tick(&mut doc);
        assert_eq!(doc.text_content(heading), "Olá");
        assert!(!doc.has_class(heading, DONE_CLASS));

        assert_eq!(effect.tick(&mut doc), TypingProgress::Finished);
        assert!(doc.has_class(heading, DONE_CLASS));
        assert!(effect.is_done());

        assert_eq!(effect.tick(&mut doc), TypingProgress::Idle);
        assert_eq!(doc.text_content(heading), "Olá");
    }

    #[test]
    fn test_missing_anchor_skips() {
        let mut doc = Document::new();
        assert!(TypingEffect::mount(&mut doc, "x").is_none());
        assert!(doc.children(doc.head()).is_empty());
    }
}
