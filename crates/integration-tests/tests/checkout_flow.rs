//! Cart checkout against a live storefront.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use fraterno_core::{CartState, OrderStatus, ProductId};
use fraterno_integration_tests::{SnackBarPage, TestStorefront, snack_bar_page};
use fraterno_storefront::catalog::Catalog;
use fraterno_storefront::config::StorefrontConfig;
use fraterno_storefront::middleware::ADMIN_TOKEN_HEADER;
use fraterno_widgets::widgets::cart::{BLANK_NAME_ALERT, SUBMIT_FAILED_ALERT};
use fraterno_widgets::{Event, HttpOrderGateway, NodeId, RecordingShell, Site, SiteConfig};
use secrecy::SecretString;
use serde_json::Value;

const TOKEN: &str = "aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6%";

fn catalog() -> Catalog {
    Catalog::from_json(
        r#"[
            { "id": "1", "nome": "Burger", "categoria": "Lanches", "preco": 12.5, "estoque": 10 },
            { "id": "2", "nome": "Soda", "categoria": "Bebidas", "preco": 5, "estoque": 10 }
        ]"#,
    )
    .unwrap()
}

fn storefront_config() -> StorefrontConfig {
    StorefrontConfig {
        admin_token: Some(SecretString::from(TOKEN)),
        ..StorefrontConfig::default()
    }
}

fn mount_site(page: SnackBarPage, config: &SiteConfig) -> Site<HttpOrderGateway, RecordingShell> {
    let gateway = HttpOrderGateway::new(config).unwrap();
    Site::mount(page.document, config, gateway, RecordingShell::new())
}

/// Burger twice, Soda once, open the prompt and type the name.
async fn fill_cart(site: &mut Site<HttpOrderGateway, RecordingShell>, page: &Anchors, name: &str) {
    site.dispatch(Event::Click(page.burger)).await;
    site.dispatch(Event::Click(page.burger)).await;
    site.dispatch(Event::Click(page.soda)).await;
    site.dispatch(Event::Click(page.checkout)).await;
    site.document_mut().set_value(page.name_input, name);
}

struct Anchors {
    burger: NodeId,
    soda: NodeId,
    checkout: NodeId,
    form: NodeId,
    name_input: NodeId,
    total: NodeId,
}

fn anchors(page: &SnackBarPage) -> Anchors {
    Anchors {
        burger: page.triggers[0],
        soda: page.triggers[1],
        checkout: page.checkout,
        form: page.form,
        name_input: page.name_input,
        total: page.total,
    }
}

#[tokio::test]
async fn test_checkout_reaches_storefront_and_opens_whatsapp() {
    let server = TestStorefront::spawn(storefront_config(), catalog())
        .await
        .unwrap();
    let page = snack_bar_page(&catalog());
    let a = anchors(&page);
    let config = SiteConfig {
        base_url: server.base_url(),
        ..SiteConfig::default()
    };
    let mut site = mount_site(page, &config);

    fill_cart(&mut site, &a, "Maria").await;
    assert_eq!(site.document().text_content(a.total), "R$ 30.00");
    assert!(site.dispatch(Event::Submit(a.form)).await);

    // Widget side
    let cart = site.cart().unwrap();
    assert!(cart.cart().is_empty());
    assert_eq!(cart.state(), CartState::Empty);
    assert!(site.shell().alerts().is_empty());
    let opened = &site.shell().opened()[0];
    assert_eq!(opened.target, "_blank");
    assert!(opened.url.starts_with("https://wa.me/5583998000756?text="));
    assert!(opened.url.contains("2x%20-%20Burger"));
    assert!(opened.url.contains("Total%3A%20R%24%2030.00"));
    assert_eq!(site.document().text_content(a.total), "R$ 0.00");
    assert_eq!(site.document().value(a.name_input), "");

    // Server side
    let orders = server.state.orders().read().await;
    assert_eq!(orders.orders().len(), 1);
    let order = &orders.orders()[0];
    assert_eq!(order.customer_name, "Maria");
    assert_eq!(order.total.display(), "R$ 30.00");
    drop(orders);

    let catalog = server.state.catalog().read().await;
    assert_eq!(catalog.get(&ProductId::from("1")).unwrap().stock, 8);
    assert_eq!(catalog.get(&ProductId::from("2")).unwrap().stock, 9);
}

#[tokio::test]
async fn test_unreachable_storefront_keeps_cart() {
    // Nothing listens once the listener is dropped.
    let closed = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .unwrap()
        .local_addr()
        .unwrap();
    let page = snack_bar_page(&catalog());
    let a = anchors(&page);
    let config = SiteConfig {
        base_url: format!("http://{closed}"),
        ..SiteConfig::default()
    };
    let mut site = mount_site(page, &config);

    fill_cart(&mut site, &a, "Maria").await;
    assert!(site.dispatch(Event::Submit(a.form)).await);

    let cart = site.cart().unwrap();
    assert_eq!(cart.cart().quantity_of(&ProductId::from("1")), 2);
    assert_eq!(cart.state(), CartState::Finalizing);
    assert!(cart.is_prompt_open(site.document()));
    assert_eq!(site.shell().alerts(), [SUBMIT_FAILED_ALERT]);
    assert!(site.shell().opened().is_empty());
    assert_eq!(site.document().value(a.name_input), "Maria");
}

#[tokio::test]
async fn test_non_success_answer_is_a_failure() {
    let server = TestStorefront::spawn(storefront_config(), catalog())
        .await
        .unwrap();
    let page = snack_bar_page(&catalog());
    let a = anchors(&page);
    // GET-only route: POST answers 405.
    let config = SiteConfig {
        base_url: server.base_url(),
        order_path: "/health".to_owned(),
        ..SiteConfig::default()
    };
    let mut site = mount_site(page, &config);

    fill_cart(&mut site, &a, "Maria").await;
    site.dispatch(Event::Submit(a.form)).await;

    assert_eq!(site.shell().alerts(), [SUBMIT_FAILED_ALERT]);
    assert_eq!(site.cart().unwrap().cart().len(), 2);
    assert!(server.state.orders().read().await.orders().is_empty());
}

#[tokio::test]
async fn test_blank_name_never_reaches_storefront() {
    let server = TestStorefront::spawn(storefront_config(), catalog())
        .await
        .unwrap();
    let page = snack_bar_page(&catalog());
    let a = anchors(&page);
    let config = SiteConfig {
        base_url: server.base_url(),
        ..SiteConfig::default()
    };
    let mut site = mount_site(page, &config);

    fill_cart(&mut site, &a, "   ").await;
    site.dispatch(Event::Submit(a.form)).await;

    assert_eq!(site.shell().alerts(), [BLANK_NAME_ALERT]);
    assert!(server.state.orders().read().await.orders().is_empty());
    assert_eq!(site.cart().unwrap().cart().len(), 2);
    assert!(site.cart().unwrap().is_prompt_open(site.document()));
}

#[tokio::test]
async fn test_order_board_sees_submitted_orders() {
    let server = TestStorefront::spawn(storefront_config(), catalog())
        .await
        .unwrap();
    let page = snack_bar_page(&catalog());
    let a = anchors(&page);
    let config = SiteConfig {
        base_url: server.base_url(),
        ..SiteConfig::default()
    };
    let mut site = mount_site(page, &config);
    fill_cart(&mut site, &a, "João").await;
    site.dispatch(Event::Submit(a.form)).await;

    let client = reqwest::Client::new();
    let base = server.base_url();

    let unauthorized = client
        .get(format!("{base}/api/pedidos"))
        .send()
        .await
        .unwrap();
    assert_eq!(unauthorized.status(), reqwest::StatusCode::UNAUTHORIZED);

    let response = client
        .post(format!("{base}/api/pedidos/1/status"))
        .header(ADMIN_TOKEN_HEADER, TOKEN)
        .json(&serde_json::json!({ "status": "Disponível para Retirada" }))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());

    let orders: Value = client
        .get(format!("{base}/api/pedidos"))
        .header(ADMIN_TOKEN_HEADER, TOKEN)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(orders[0]["nome_cliente"], "João");
    assert_eq!(
        orders[0]["status"],
        OrderStatus::ReadyForPickup.label()
    );
    assert_eq!(orders[0]["itens"].as_array().unwrap().len(), 2);
}
