//! Page runtime: registers the widgets against a document and routes events
//! to them.

use std::time::Duration;

use tracing::{debug, instrument};

use crate::config::SiteConfig;
use crate::dom::{Document, NodeId};
use crate::error::GatewayError;
use crate::gateway::OrderGateway;
use crate::shell::Shell;
use crate::widgets::cart::{PendingOrder, SubmitOutcome};
use crate::widgets::{
    CartWidget, CategoryFilter, ContactForm, DashboardSearch, Intersection, Lightbox, MenuToggle,
    ScrollReveal, TypingEffect, TypingProgress,
};

/// A user or browser event delivered to the page.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// Click whose innermost target is the given node.
    Click(NodeId),
    /// Submission of the given form.
    Submit(NodeId),
    /// Key released in the given input.
    KeyUp(NodeId),
    /// Visibility changes reported by the viewport observer.
    Intersect(Vec<Intersection>),
}

/// Result of the synchronous part of a form submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    /// No widget listens to this form.
    Ignored,
    /// Fully handled, including rejected input.
    Handled,
    /// A checkout to send through the gateway, then hand to
    /// [`Site::finish_submit`].
    Pending(PendingOrder),
}

/// A loaded page with its registered widgets.
#[derive(Debug)]
pub struct Site<G, S> {
    document: Document,
    shell: S,
    typing_interval: Duration,
    registered: Vec<&'static str>,
    typing: Option<TypingEffect>,
    reveal: Option<ScrollReveal>,
    filter: Option<CategoryFilter>,
    cart: Option<CartWidget<G>>,
    menu: Option<MenuToggle>,
    lightbox: Option<Lightbox>,
    contact: Option<ContactForm>,
    search: Option<DashboardSearch>,
}

impl<G: OrderGateway, S: Shell> Site<G, S> {
    /// Register every widget whose anchors exist in `document`.
    ///
    /// The cart renders its empty state immediately.
    #[instrument(skip_all)]
    pub fn mount(mut document: Document, config: &SiteConfig, gateway: G, shell: S) -> Self {
        let mut registered = Vec::new();

        let typing = register(
            &mut registered,
            TypingEffect::NAME,
            TypingEffect::mount(&mut document, &config.typing_text),
        );
        let reveal = register(
            &mut registered,
            ScrollReveal::NAME,
            ScrollReveal::mount(&document, config.reveal_threshold),
        );
        let filter = register(
            &mut registered,
            CategoryFilter::NAME,
            CategoryFilter::mount(&document),
        );
        let cart = register(
            &mut registered,
            CartWidget::<G>::NAME,
            CartWidget::mount(&document, gateway, &config.whatsapp_number),
        );
        let menu = register(&mut registered, MenuToggle::NAME, MenuToggle::mount(&document));
        let lightbox = register(&mut registered, Lightbox::NAME, Lightbox::mount(&document));
        let contact = register(
            &mut registered,
            ContactForm::NAME,
            ContactForm::mount(&document),
        );
        let search = register(
            &mut registered,
            DashboardSearch::NAME,
            DashboardSearch::mount(&document),
        );

        if let Some(cart) = &cart {
            cart.render(&mut document);
        }

        Self {
            document,
            shell,
            typing_interval: config.typing_interval,
            registered,
            typing,
            reveal,
            filter,
            cart,
            menu,
            lightbox,
            contact,
            search,
        }
    }

    /// Names of the widgets that found their anchors.
    #[must_use]
    pub fn registered(&self) -> &[&'static str] {
        &self.registered
    }

    #[must_use]
    pub fn is_registered(&self, name: &str) -> bool {
        self.registered.contains(&name)
    }

    /// Deliver an event to every widget listening for it. Returns `true` if
    /// any widget handled it.
    pub async fn dispatch(&mut self, event: Event) -> bool {
        match event {
            Event::Click(target) => self.click(target),
            Event::Submit(form) => self.submit(form).await,
            Event::KeyUp(input) => self.key_up(input),
            Event::Intersect(entries) => !self.intersect(&entries).is_empty(),
        }
    }

    /// Key released in `input`.
    pub fn key_up(&mut self, input: NodeId) -> bool {
        self.search
            .is_some_and(|search| search.on_key_up(&mut self.document, input))
    }

    /// Apply viewport reports. Returns the elements revealed by them, which
    /// need no further observation.
    pub fn intersect(&mut self, entries: &[Intersection]) -> Vec<NodeId> {
        self.reveal
            .as_mut()
            .map(|reveal| reveal.on_intersect(&mut self.document, entries))
            .unwrap_or_default()
    }

    /// Click on `target`. Clicks bubble, so a click inside a control counts
    /// as a click on it.
    pub fn click(&mut self, target: NodeId) -> bool {
        let doc = &mut self.document;
        let mut handled = false;

        if let Some(filter) = self.filter.as_mut() {
            handled |= filter.on_click(doc, target);
        }
        if let Some(cart) = self.cart.as_mut() {
            handled |= cart.on_click(doc, &mut self.shell, target);
        }
        if let Some(menu) = &self.menu {
            handled |= menu.on_click(doc, target);
        }
        if let Some(lightbox) = &self.lightbox {
            handled |= lightbox.on_click(doc, target);
        }
        handled
    }

    /// Submit `form`, waiting for the gateway if it is the checkout.
    pub async fn submit(&mut self, form: NodeId) -> bool {
        let pending = match self.begin_submit(form) {
            Submission::Ignored => return false,
            Submission::Handled => return true,
            Submission::Pending(pending) => pending,
        };
        let Some(cart) = &self.cart else {
            return false;
        };
        let result = cart.gateway().submit(pending.request()).await;
        self.finish_submit(&pending, result);
        true
    }

    /// First half of a submission: everything up to the network call.
    pub fn begin_submit(&mut self, form: NodeId) -> Submission {
        if let Some(contact) = &self.contact
            && contact.on_submit(&mut self.document, &mut self.shell, form)
        {
            return Submission::Handled;
        }
        let Some(cart) = &self.cart else {
            return Submission::Ignored;
        };
        let Some(name) = cart.submitted_name(&self.document, form) else {
            return Submission::Ignored;
        };
        cart.prepare_order(&mut self.shell, &name)
            .map_or(Submission::Handled, Submission::Pending)
    }

    /// Second half of a checkout: apply the gateway's answer.
    pub fn finish_submit(
        &mut self,
        pending: &PendingOrder,
        result: Result<serde_json::Value, GatewayError>,
    ) -> SubmitOutcome {
        match self.cart.as_mut() {
            Some(cart) => cart.complete_order(&mut self.document, &mut self.shell, pending, result),
            None => SubmitOutcome::Failed,
        }
    }

    /// Replace the value of `input` as if typed, then fire key-up.
    pub async fn type_text(&mut self, input: NodeId, text: &str) -> bool {
        self.document.set_value(input, text);
        self.dispatch(Event::KeyUp(input)).await
    }

    /// Advance the typing effect by one step.
    pub fn tick_typing(&mut self) -> TypingProgress {
        self.typing
            .as_mut()
            .map_or(TypingProgress::Idle, |typing| typing.tick(&mut self.document))
    }

    /// Delay between two typing steps.
    #[must_use]
    pub const fn typing_interval(&self) -> Duration {
        self.typing_interval
    }

    /// Run the typing effect to completion at the configured pace.
    #[cfg(not(target_arch = "wasm32"))]
    pub async fn play_typing(&mut self) {
        loop {
            match self.tick_typing() {
                TypingProgress::Typed(_) => tokio::time::sleep(self.typing_interval).await,
                TypingProgress::Finished | TypingProgress::Idle => break,
            }
        }
    }

    #[must_use]
    pub const fn document(&self) -> &Document {
        &self.document
    }

    pub const fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    #[must_use]
    pub const fn shell(&self) -> &S {
        &self.shell
    }

    pub const fn shell_mut(&mut self) -> &mut S {
        &mut self.shell
    }

    #[must_use]
    pub const fn cart(&self) -> Option<&CartWidget<G>> {
        self.cart.as_ref()
    }

    #[must_use]
    pub const fn category_filter(&self) -> Option<&CategoryFilter> {
        self.filter.as_ref()
    }

    #[must_use]
    pub const fn scroll_reveal(&self) -> Option<&ScrollReveal> {
        self.reveal.as_ref()
    }
}

fn register<T>(
    registered: &mut Vec<&'static str>,
    name: &'static str,
    widget: Option<T>,
) -> Option<T> {
    if widget.is_some() {
        debug!(widget = name, "widget registered");
        registered.push(name);
    } else {
        debug!(widget = name, "anchors missing, widget skipped");
    }
    widget
}
