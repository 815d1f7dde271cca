//! Snack-bar cart widget.
//!
//! Owns the in-memory cart for one page session. "Order this" buttons add
//! items, the sidebar lists them with a running total, and checkout collects
//! the customer's name, posts the order to the storefront and then opens a
//! pre-filled WhatsApp conversation with the snack bar.
//!
//! # Anchors
//!
//! Required: `#carrinho-sidebar`, `#carrinho-itens`, `#carrinho-total-preco`.
//! Optional: `.btn-pedir` triggers, `#btn-finalizar-pedido`,
//! `#nome-cliente-modal`, `#form-nome-cliente`, `#input-nome-cliente`,
//! `.close-button-nome`.

use fraterno_core::{
    Cart, CartState, CustomerName, CustomerNameError, OrderRequest, OrderSummary, Price,
    ProductId,
};

use crate::dom::{Display, Document, Element, NodeId};
use crate::error::GatewayError;
use crate::gateway::OrderGateway;
use crate::shell::Shell;

pub const SIDEBAR_ID: &str = "carrinho-sidebar";
pub const LIST_ID: &str = "carrinho-itens";
pub const TOTAL_ID: &str = "carrinho-total-preco";
pub const CHECKOUT_BUTTON_ID: &str = "btn-finalizar-pedido";
pub const MODAL_ID: &str = "nome-cliente-modal";
pub const FORM_ID: &str = "form-nome-cliente";
pub const NAME_INPUT_ID: &str = "input-nome-cliente";
pub const CLOSE_BUTTON_CLASS: &str = "close-button-nome";
pub const TRIGGER_CLASS: &str = "btn-pedir";
pub const EMPTY_ROW_CLASS: &str = "carrinho-vazio";

pub const EMPTY_ROW_TEXT: &str = "Seu carrinho está vazio.";
pub const EMPTY_CART_ALERT: &str = "Seu carrinho está vazio!";
pub const BLANK_NAME_ALERT: &str = "Por favor, digite seu nome.";
pub const LONG_NAME_ALERT: &str = "Seu nome deve ter no máximo 100 caracteres.";
pub const SUBMIT_FAILED_ALERT: &str = "Ocorreu um erro ao enviar o pedido. Tente novamente.";

/// Result of a checkout submission attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Input was invalid; nothing was sent.
    Rejected,
    /// The server accepted the order and the cart was reset.
    Submitted,
    /// The request failed; cart and prompt are unchanged.
    Failed,
}

/// A validated order waiting for the gateway's answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingOrder {
    name: CustomerName,
    request: OrderRequest,
    summary: OrderSummary,
}

impl PendingOrder {
    /// The body to send.
    #[must_use]
    pub const fn request(&self) -> &OrderRequest {
        &self.request
    }

    #[must_use]
    pub const fn summary(&self) -> &OrderSummary {
        &self.summary
    }
}

/// The cart sidebar and its checkout prompt.
#[derive(Debug)]
pub struct CartWidget<G> {
    gateway: G,
    whatsapp_number: String,
    cart: Cart,
    state: CartState,
    list: NodeId,
    total: NodeId,
    checkout_button: Option<NodeId>,
    modal: Option<NodeId>,
    form: Option<NodeId>,
    name_input: Option<NodeId>,
}

impl<G: OrderGateway> CartWidget<G> {
    pub const NAME: &'static str = "cart";

    /// Returns `None` if the sidebar, its item list or its total is missing.
    pub fn mount(doc: &Document, gateway: G, whatsapp_number: &str) -> Option<Self> {
        doc.by_id(SIDEBAR_ID)?;
        let list = doc.by_id(LIST_ID)?;
        let total = doc.by_id(TOTAL_ID)?;

        Some(Self {
            gateway,
            whatsapp_number: whatsapp_number.to_owned(),
            cart: Cart::new(),
            state: CartState::Empty,
            list,
            total,
            checkout_button: doc.by_id(CHECKOUT_BUTTON_ID),
            modal: doc.by_id(MODAL_ID),
            form: doc.by_id(FORM_ID),
            name_input: doc.by_id(NAME_INPUT_ID),
        })
    }

    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    #[must_use]
    pub const fn state(&self) -> CartState {
        self.state
    }

    #[must_use]
    pub const fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Whether the name prompt is currently displayed.
    #[must_use]
    pub fn is_prompt_open(&self, doc: &Document) -> bool {
        self.modal
            .is_some_and(|modal| doc.display(modal) == Display::Block)
    }

    /// Handle a click. Returns `true` if it landed on one of the cart's
    /// controls.
    pub fn on_click(
        &mut self,
        doc: &mut Document,
        shell: &mut impl Shell,
        target: NodeId,
    ) -> bool {
        if let Some(trigger) = doc.closest_with_class(target, TRIGGER_CLASS) {
            self.add_from_trigger(doc, trigger);
            return true;
        }
        if self.checkout_button.is_some_and(|b| doc.contains(b, target)) {
            self.begin_checkout(doc, shell);
            return true;
        }
        if doc.closest_with_class(target, CLOSE_BUTTON_CLASS).is_some() {
            self.close_prompt(doc);
            return true;
        }
        false
    }

    /// Handle a form submission. Returns `None` if `form` is not the name
    /// prompt.
    pub async fn on_submit(
        &mut self,
        doc: &mut Document,
        shell: &mut impl Shell,
        form: NodeId,
    ) -> Option<SubmitOutcome> {
        let name = self.submitted_name(doc, form)?;
        Some(self.submit_order(doc, shell, &name).await)
    }

    /// Name typed into the prompt, if `form` is the prompt.
    #[must_use]
    pub fn submitted_name(&self, doc: &Document, form: NodeId) -> Option<String> {
        if self.form != Some(form) {
            return None;
        }
        Some(
            self.name_input
                .map(|input| doc.value(input).to_owned())
                .unwrap_or_default(),
        )
    }

    /// Add the product described by a trigger's data attributes.
    ///
    /// Disabled triggers are ignored, as are triggers whose price does not
    /// parse.
    pub fn add_from_trigger(&mut self, doc: &mut Document, trigger: NodeId) {
        if doc.has_attr(trigger, "disabled") {
            return;
        }

        let id = doc.data(trigger, "produto-id").unwrap_or_default();
        let name = doc.data(trigger, "produto-nome").unwrap_or_default();
        let raw_price = doc.data(trigger, "produto-preco").unwrap_or_default();
        let price = match Price::parse(raw_price) {
            Ok(price) => price,
            Err(e) => {
                tracing::warn!(product_id = id, error = %e, "ignoring order button with bad price");
                return;
            }
        };
        let (id, name) = (ProductId::new(id), name.to_owned());

        self.add_item(doc, id, &name, price);
    }

    /// Add one unit of a product and re-render.
    pub fn add_item(&mut self, doc: &mut Document, id: ProductId, name: &str, price: Price) {
        let quantity = self.cart.add(id.clone(), name, price);
        self.state = self.state.on_item_added();
        tracing::debug!(product_id = %id, quantity, "added to cart");
        self.render(doc);
    }

    /// Rebuild the item list and total from the cart.
    pub fn render(&self, doc: &mut Document) {
        doc.clear(self.list);

        if self.cart.is_empty() {
            doc.append(
                self.list,
                Element::new("li")
                    .with_class(EMPTY_ROW_CLASS)
                    .with_text(EMPTY_ROW_TEXT),
            );
            doc.set_text(self.total, &Price::ZERO.display());
            return;
        }

        for item in self.cart.items() {
            let row = doc.append(self.list, Element::new("li"));
            doc.append(
                row,
                Element::new("span").with_text(&format!("{} (x{})", item.name, item.quantity)),
            );
            doc.append(
                row,
                Element::new("span").with_text(&item.line_total().display()),
            );
        }
        doc.set_text(self.total, &self.cart.total().display());
    }

    /// Open the name prompt, or warn if there is nothing to check out.
    pub fn begin_checkout(&mut self, doc: &mut Document, shell: &mut impl Shell) {
        let Some(next) = self.state.on_checkout_opened() else {
            shell.alert(EMPTY_CART_ALERT);
            return;
        };
        self.state = next;
        if let Some(modal) = self.modal {
            doc.set_display(modal, Display::Block);
        }
    }

    /// Submit the order under `customer_name`.
    ///
    /// On success the WhatsApp summary is opened in a new window, the cart is
    /// emptied and the prompt closed and cleared. On failure an alert is shown
    /// and nothing else changes.
    pub async fn submit_order(
        &mut self,
        doc: &mut Document,
        shell: &mut impl Shell,
        customer_name: &str,
    ) -> SubmitOutcome {
        let Some(pending) = self.prepare_order(shell, customer_name) else {
            return SubmitOutcome::Rejected;
        };
        let result = self.gateway.submit(pending.request()).await;
        self.complete_order(doc, shell, &pending, result)
    }

    /// Validate the cart and the name and freeze them into an order ready to
    /// send. Alerts and returns `None` when the input is invalid.
    pub fn prepare_order(
        &self,
        shell: &mut impl Shell,
        customer_name: &str,
    ) -> Option<PendingOrder> {
        if self.cart.is_empty() {
            shell.alert(EMPTY_CART_ALERT);
            return None;
        }

        let name = match CustomerName::parse(customer_name) {
            Ok(name) => name,
            Err(CustomerNameError::Blank) => {
                shell.alert(BLANK_NAME_ALERT);
                return None;
            }
            Err(CustomerNameError::TooLong { .. }) => {
                shell.alert(LONG_NAME_ALERT);
                return None;
            }
        };

        Some(PendingOrder {
            request: OrderRequest::new(&name, &self.cart),
            summary: OrderSummary::new(&name, &self.cart),
            name,
        })
    }

    /// Apply the gateway's answer to a prepared order.
    pub fn complete_order(
        &mut self,
        doc: &mut Document,
        shell: &mut impl Shell,
        pending: &PendingOrder,
        result: Result<serde_json::Value, GatewayError>,
    ) -> SubmitOutcome {
        match result {
            Ok(response) => {
                tracing::info!(
                    customer = %pending.name,
                    items = pending.request.cart.len(),
                    total = %pending.summary.total(),
                    response = %response,
                    "order submitted"
                );
                shell.open(&pending.summary.whatsapp_url(&self.whatsapp_number), "_blank");

                self.cart.clear();
                self.state = self.state.on_order_submitted();
                self.render(doc);
                if let Some(modal) = self.modal {
                    doc.set_display(modal, Display::None);
                }
                if let Some(input) = self.name_input {
                    doc.set_value(input, "");
                }
                SubmitOutcome::Submitted
            }
            Err(e) => {
                tracing::error!(error = %e, "order submission failed");
                shell.alert(SUBMIT_FAILED_ALERT);
                SubmitOutcome::Failed
            }
        }
    }

    /// Hide the name prompt.
    pub fn close_prompt(&mut self, doc: &mut Document) {
        if let Some(modal) = self.modal {
            doc.set_display(modal, Display::None);
        }
        self.state = self.state.on_prompt_closed();
    }
}
