//! Gallery image lightbox.

use crate::dom::{Display, Document, NodeId};

pub const MODAL_ID: &str = "gallery-modal";
pub const IMAGE_ID: &str = "modal-image";
pub const CLOSE_CLASS: &str = "close-button";
pub const TRIGGER_CLASS: &str = "modal-trigger";

/// Full-size image viewer opened from gallery thumbnails.
#[derive(Debug, Clone)]
pub struct Lightbox {
    modal: NodeId,
    image: NodeId,
    close: Option<NodeId>,
    triggers: Vec<NodeId>,
}

impl Lightbox {
    pub const NAME: &'static str = "lightbox";

    /// Returns `None` without `#gallery-modal` and `#modal-image`.
    #[must_use]
    pub fn mount(doc: &Document) -> Option<Self> {
        let modal = doc.by_id(MODAL_ID)?;
        let image = doc.by_id(IMAGE_ID)?;
        Some(Self {
            modal,
            image,
            close: doc.descendants_by_class(modal, CLOSE_CLASS).first().copied(),
            triggers: doc.by_class(TRIGGER_CLASS),
        })
    }

    pub fn on_click(&self, doc: &mut Document, target: NodeId) -> bool {
        // Only a click on the backdrop itself closes, not one on the image.
        if target == self.modal || self.close.is_some_and(|c| doc.contains(c, target)) {
            self.close(doc);
            return true;
        }
        if let Some(trigger) = self
            .triggers
            .iter()
            .copied()
            .find(|&t| doc.contains(t, target))
        {
            self.open(doc, trigger);
            return true;
        }
        false
    }

    /// Show the viewer with the trigger's image.
    pub fn open(&self, doc: &mut Document, trigger: NodeId) {
        let src = doc.attr(trigger, "src").unwrap_or_default().to_owned();
        doc.set_attr(self.image, "src", &src);
        doc.set_display(self.modal, Display::Block);
    }

    pub fn close(&self, doc: &mut Document) {
        doc.set_display(self.modal, Display::None);
    }

    #[must_use]
    pub fn is_open(&self, doc: &Document) -> bool {
        doc.display(self.modal) == Display::Block
    }
}
