use fraterno_widgets::{GatewayError, NodeId};
use thiserror::Error;
use wasm_bindgen::JsValue;

/// Errors while attaching the widgets to a live page.
#[derive(Debug, Error)]
pub enum WebError {
    #[error("page has no {0} element")]
    MissingElement(&'static str),

    #[error("browser call failed: {0}")]
    Js(String),

    #[error("no live element for {0:?}")]
    UnknownNode(NodeId),

    #[error("order gateway: {0}")]
    Gateway(#[from] GatewayError),
}

impl WebError {
    /// Wrap an exception thrown by a browser API.
    #[allow(clippy::needless_pass_by_value)]
    pub(crate) fn js(value: JsValue) -> Self {
        Self::Js(value.as_string().unwrap_or_else(|| format!("{value:?}")))
    }
}
