//! Wiring between browser events and the mounted [`Site`].

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use fraterno_widgets::widgets::{Intersection, TypingEffect, TypingProgress};
use fraterno_widgets::{HttpOrderGateway, OrderGateway, Site, SiteConfig, Submission};
use tracing::{info, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use crate::error::WebError;
use crate::mirror::Mirror;
use crate::shell::BrowserShell;

/// Body attribute overriding the number that receives WhatsApp orders.
pub const WHATSAPP_NUMBER_ATTR: &str = "data-whatsapp-number";

/// The mounted widgets and the live page they render to.
#[derive(Debug)]
pub struct Page {
    site: Site<HttpOrderGateway, BrowserShell>,
    mirror: Mirror,
    gateway: HttpOrderGateway,
}

type Shared = Rc<RefCell<Page>>;

impl Page {
    fn flush(&mut self) {
        if let Err(e) = self.mirror.flush(self.site.document()) {
            warn!(error = %e, "page update failed");
        }
    }

    fn pull_values(&mut self) {
        self.mirror.pull_values(self.site.document_mut());
    }

    fn node_of(&self, event: &web_sys::Event) -> Option<fraterno_widgets::NodeId> {
        let target = event.target()?.dyn_into::<web_sys::Node>().ok()?;
        self.mirror.node_of(&target)
    }
}

/// Mount the widgets on the page shown in `window` and start listening.
///
/// # Errors
///
/// Returns error if the page skeleton is missing, the checkout endpoint
/// cannot be derived from the page origin, or a listener cannot be added.
pub fn attach(window: &web_sys::Window) -> Result<(), WebError> {
    let document = window
        .document()
        .ok_or(WebError::MissingElement("document"))?;
    let config = site_config(window, &document)?;
    let gateway = HttpOrderGateway::new(&config)?;

    let (mirror, model) = Mirror::import(&document)?;
    let shell = BrowserShell::new(window.clone());
    let site = Site::mount(model, &config, gateway.clone(), shell);
    info!(widgets = ?site.registered(), "widgets mounted");

    let page = Rc::new(RefCell::new(Page {
        site,
        mirror,
        gateway,
    }));
    page.borrow_mut().flush();

    listen(&document, "click", &page, on_click)?;
    listen(&document, "submit", &page, on_submit)?;
    listen(&document, "keyup", &page, on_key_up)?;
    observe_reveals(&page, config.reveal_threshold)?;
    start_typing(window, &page)?;
    Ok(())
}

fn site_config(
    window: &web_sys::Window,
    document: &web_sys::Document,
) -> Result<SiteConfig, WebError> {
    let mut config = SiteConfig {
        base_url: window.location().origin().map_err(WebError::js)?,
        ..SiteConfig::default()
    };
    if let Some(number) = document
        .body()
        .and_then(|body| body.get_attribute(WHATSAPP_NUMBER_ATTR))
        .filter(|number| !number.trim().is_empty())
    {
        config.whatsapp_number = number;
    }
    Ok(config)
}

fn listen(
    document: &web_sys::Document,
    kind: &str,
    page: &Shared,
    handler: fn(&Shared, &web_sys::Event),
) -> Result<(), WebError> {
    let page = Rc::clone(page);
    let callback =
        Closure::<dyn Fn(web_sys::Event)>::new(move |event: web_sys::Event| handler(&page, &event));
    document
        .add_event_listener_with_callback(kind, callback.as_ref().unchecked_ref())
        .map_err(WebError::js)?;
    callback.forget();
    Ok(())
}

fn on_click(shared: &Shared, event: &web_sys::Event) {
    let Ok(mut page) = shared.try_borrow_mut() else {
        return;
    };
    let Some(target) = page.node_of(event) else {
        return;
    };
    page.pull_values();
    if page.site.click(target) {
        page.flush();
    }
}

fn on_key_up(shared: &Shared, event: &web_sys::Event) {
    let Ok(mut page) = shared.try_borrow_mut() else {
        return;
    };
    let Some(input) = page.node_of(event) else {
        return;
    };
    page.pull_values();
    if page.site.key_up(input) {
        page.flush();
    }
}

fn on_submit(shared: &Shared, event: &web_sys::Event) {
    let (pending, gateway) = {
        let Ok(mut page) = shared.try_borrow_mut() else {
            return;
        };
        let Some(form) = page.node_of(event) else {
            return;
        };
        page.pull_values();
        let submission = page.site.begin_submit(form);
        page.flush();
        match submission {
            Submission::Ignored => return,
            Submission::Handled => {
                event.prevent_default();
                return;
            }
            Submission::Pending(pending) => {
                event.prevent_default();
                (pending, page.gateway.clone())
            }
        }
    };

    let shared = Rc::clone(shared);
    wasm_bindgen_futures::spawn_local(async move {
        let result = gateway.submit(pending.request()).await;
        let Ok(mut page) = shared.try_borrow_mut() else {
            warn!("page busy, order answer dropped");
            return;
        };
        let outcome = page.site.finish_submit(&pending, result);
        info!(?outcome, "checkout finished");
        page.flush();
    });
}

fn observe_reveals(shared: &Shared, threshold: f64) -> Result<(), WebError> {
    let targets: Vec<web_sys::Element> = {
        let page = shared.borrow();
        let Some(reveal) = page.site.scroll_reveal() else {
            return Ok(());
        };
        reveal
            .observed()
            .iter()
            .filter_map(|node| page.mirror.element(*node).cloned())
            .collect()
    };

    let page = Rc::clone(shared);
    let callback = Closure::<dyn Fn(js_sys::Array, web_sys::IntersectionObserver)>::new(
        move |entries: js_sys::Array, observer: web_sys::IntersectionObserver| {
            let Ok(mut page) = page.try_borrow_mut() else {
                return;
            };
            let reports: Vec<Intersection> = entries
                .iter()
                .filter_map(|entry| entry.dyn_into::<web_sys::IntersectionObserverEntry>().ok())
                .filter_map(|entry| {
                    let target = page.mirror.node_of(&entry.target())?;
                    Some(Intersection {
                        target,
                        ratio: entry.intersection_ratio(),
                    })
                })
                .collect();
            let revealed = page.site.intersect(&reports);
            for node in &revealed {
                if let Some(live) = page.mirror.element(*node) {
                    observer.unobserve(live);
                }
            }
            if !revealed.is_empty() {
                page.flush();
            }
        },
    );

    let options = web_sys::IntersectionObserverInit::new();
    options.set_threshold(&JsValue::from_f64(threshold));
    let observer = web_sys::IntersectionObserver::new_with_options(
        callback.as_ref().unchecked_ref(),
        &options,
    )
    .map_err(WebError::js)?;
    for target in &targets {
        observer.observe(target);
    }
    callback.forget();
    Ok(())
}

fn start_typing(window: &web_sys::Window, shared: &Shared) -> Result<(), WebError> {
    let interval = {
        let page = shared.borrow();
        if !page.site.is_registered(TypingEffect::NAME) {
            return Ok(());
        }
        page.site.typing_interval()
    };

    let timer = Rc::new(Cell::new(None::<i32>));
    let page = Rc::clone(shared);
    let handle = Rc::clone(&timer);
    let win = window.clone();
    let callback = Closure::<dyn Fn()>::new(move || {
        let Ok(mut page) = page.try_borrow_mut() else {
            return;
        };
        let progress = page.site.tick_typing();
        page.flush();
        if !matches!(progress, TypingProgress::Typed(_))
            && let Some(id) = handle.take()
        {
            win.clear_interval_with_handle(id);
        }
    });

    let millis = i32::try_from(interval.as_millis()).unwrap_or(i32::MAX);
    let id = window
        .set_interval_with_callback_and_timeout_and_arguments_0(
            callback.as_ref().unchecked_ref(),
            millis,
        )
        .map_err(WebError::js)?;
    timer.set(Some(id));
    callback.forget();
    Ok(())
}
