//! # Pages
//!
//! Server-rendered HTML for the demo storefront. Plain inline HTML; the
//! Drop-in itself is mounted client-side by `/checkout.js`.

use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    response::{Html, IntoResponse},
};
use pay_core::ResultBucket;
use serde::Deserialize;

/// Drop-in / Components web SDK version loaded by the checkout page
const ADYEN_WEB_VERSION: &str = "5.53.2";

/// Payment method types offered on the index page
const COMPONENTS: &[(&str, &str)] = &[
    ("dropin", "Drop-in"),
    ("card", "Card"),
    ("ideal", "iDEAL"),
    ("paypal", "PayPal"),
];

#[derive(Debug, Default, Deserialize)]
pub struct TypeQuery {
    #[serde(rename = "type", default)]
    pub component: Option<String>,
}

impl TypeQuery {
    fn component(&self) -> String {
        escape_html(self.component.as_deref().unwrap_or("dropin"))
    }
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

fn layout(title: &str, head: &str, body: &str) -> Html<String> {
    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>{title}</title>
    <link rel="stylesheet" href="/styles.css">
    {head}
</head>
<body>
    <header class="site-header"><a href="/">dropin-cart</a></header>
    <main>
{body}
    </main>
</body>
</html>
"#
    ))
}

/// Index (select a demo)
pub async fn index() -> impl IntoResponse {
    let links: String = COMPONENTS
        .iter()
        .map(|(component, label)| {
            format!(
                r#"            <li><a class="button" href="/preview?type={component}">{label}</a></li>
"#
            )
        })
        .collect();

    layout(
        "dropin-cart",
        "",
        &format!(
            r#"        <h1>Select a demo</h1>
        <ul class="demo-list">
{links}        </ul>
        <p><a href="/product">Product page</a> · <a href="/product-2">Second product page</a></p>"#
        ),
    )
}

/// Cart (continue to checkout)
pub async fn preview(State(state): State<AppState>, Query(query): Query<TypeQuery>) -> impl IntoResponse {
    let component = query.component();
    let total = state.profile.amount.display();
    let items: String = state
        .profile
        .line_items
        .iter()
        .map(|item| {
            format!(
                r#"            <li>{} × {}</li>
"#,
                escape_html(&item.description),
                item.quantity
            )
        })
        .collect();

    layout(
        "Cart",
        "",
        &format!(
            r#"        <h1>Cart</h1>
        <ul class="cart">
{items}        </ul>
        <p class="total">Total: {total}</p>
        <a class="button" href="/checkout?type={component}">Continue to checkout</a>"#
        ),
    )
}

/// Checkout page (mounts the Drop-in)
pub async fn checkout(State(state): State<AppState>, Query(query): Query<TypeQuery>) -> impl IntoResponse {
    let component = query.component();
    let client_key = escape_html(&state.dropin.client_key);
    let environment = state.dropin.environment;
    let locale = escape_html(&state.profile.locale);
    let amount = state.profile.amount;
    let sdk = format!(
        "https://checkoutshopper-{environment}.adyen.com/checkoutshopper/sdk/{ADYEN_WEB_VERSION}"
    );

    let head = format!(
        r#"<link rel="stylesheet" href="{sdk}/adyen.css">
    <script src="{sdk}/adyen.js"></script>"#
    );

    layout(
        "Checkout",
        &head,
        &format!(
            r#"        <h1>Checkout</h1>
        <div id="{component}" class="payment"></div>
        <pre id="clientKey" hidden>{client_key}</pre>
        <pre id="type" hidden>{component}</pre>
        <pre id="environment" hidden>{environment}</pre>
        <pre id="locale" hidden>{locale}</pre>
        <pre id="amountValue" hidden>{value}</pre>
        <pre id="amountCurrency" hidden>{currency}</pre>
        <script type="module" src="/checkout.js"></script>"#,
            value = amount.value,
            currency = amount.currency,
        ),
    )
}

/// Result page
pub async fn result(Path(page_type): Path<String>) -> impl IntoResponse {
    let bucket = ResultBucket::from_page_type(&page_type).unwrap_or(ResultBucket::Error);
    let (icon, heading, message) = match bucket {
        ResultBucket::Success => ("✅", "Payment successful", "Your order has been placed."),
        ResultBucket::Pending => (
            "⏳",
            "Payment pending",
            "We'll let you know once the payment is confirmed.",
        ),
        ResultBucket::Failed => (
            "❌",
            "Payment refused",
            "The payment was refused. Please try a different payment method.",
        ),
        ResultBucket::Error => (
            "⚠️",
            "Something went wrong",
            "The payment could not be completed. No charges were made.",
        ),
    };

    layout(
        heading,
        "",
        &format!(
            r#"        <div class="result result-{bucket}">
            <div class="icon">{icon}</div>
            <h1>{heading}</h1>
            <p>{message}</p>
            <a class="button" href="/">Return to shop</a>
        </div>"#
        ),
    )
}

/// Product page
pub async fn product(State(state): State<AppState>) -> impl IntoResponse {
    product_page(&state, "Sunglasses", "Polarised lenses with a recycled acetate frame.")
}

/// Second product page
pub async fn product_2(State(state): State<AppState>) -> impl IntoResponse {
    product_page(&state, "Headphones", "Over-ear, noise cancelling, 30 hour battery.")
}

fn product_page(state: &AppState, name: &str, blurb: &str) -> Html<String> {
    let price = state.profile.amount.display();
    layout(
        name,
        "",
        &format!(
            r#"        <article class="product">
            <h1>{name}</h1>
            <p>{blurb}</p>
            <p class="total">{price}</p>
            <a class="button" href="/preview?type=dropin">Add to cart</a>
        </article>"#
        ),
    )
}
