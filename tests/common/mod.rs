#![allow(dead_code)]

use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::io::{Error, Write};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tempfile::NamedTempFile;

pub const VALID_IBAN: &str = "LT307300010172619164";

/// Serves `router` on an ephemeral local port and returns the validate URL.
pub async fn spawn_endpoint(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("serve");
    });
    format!("http://{addr}/validate/")
}

/// A validate endpoint that confirms 20-character `LT` IBANs and counts calls.
pub fn iban_router(calls: Arc<AtomicUsize>) -> Router {
    Router::new()
        .route("/validate/", get(validate))
        .with_state(calls)
}

async fn validate(
    State(calls): State<Arc<AtomicUsize>>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    calls.fetch_add(1, Ordering::SeqCst);
    let iban = params.get("iban").cloned().unwrap_or_default();
    Json(json!({ "valid": iban.starts_with("LT") && iban.len() == 20 }))
}

/// A URL nothing listens on.
pub fn closed_endpoint() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().expect("local addr").port();
    drop(listener);
    format!("http://127.0.0.1:{port}/validate/")
}

pub fn write_script(lines: &[&str]) -> Result<NamedTempFile, Error> {
    let mut file = NamedTempFile::new()?;
    for line in lines {
        writeln!(file, "{line}")?;
    }
    Ok(file)
}

/// The reference payment used across the tests.
pub fn valid_payment_script() -> Vec<&'static str> {
    vec![
        "payer_account 1",
        "amount 100.50",
        "payee_account LT307300010172619164",
        "purpose Test payment",
        "payee John Doe",
        "submit",
    ]
}
