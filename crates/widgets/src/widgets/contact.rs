//! Contact form placeholder. Submissions are acknowledged locally and never
//! leave the page.

use crate::dom::{Document, NodeId};
use crate::shell::Shell;

pub const FORM_ID: &str = "main-contact-form";
pub const SENT_ALERT: &str = "Mensagem enviada com sucesso! (Simulação)";

const FIELD_TAGS: [&str; 3] = ["input", "textarea", "select"];

#[derive(Debug, Clone, Copy)]
pub struct ContactForm {
    form: NodeId,
}

impl ContactForm {
    pub const NAME: &'static str = "contact-form";

    #[must_use]
    pub fn mount(doc: &Document) -> Option<Self> {
        doc.by_id(FORM_ID).map(|form| Self { form })
    }

    /// Acknowledge and reset the form. Returns `false` for other forms.
    pub fn on_submit(&self, doc: &mut Document, shell: &mut impl Shell, form: NodeId) -> bool {
        if form != self.form {
            return false;
        }
        shell.alert(SENT_ALERT);
        self.reset(doc);
        true
    }

    fn reset(&self, doc: &mut Document) {
        let fields: Vec<NodeId> = doc
            .descendants(self.form)
            .into_iter()
            .filter(|&node| FIELD_TAGS.contains(&doc.tag(node)))
            .collect();
        for field in fields {
            doc.set_value(field, "");
        }
    }
}
