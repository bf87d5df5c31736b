//! Route tables

use crate::core::service::InvoiceService;
use crate::entities::invoice::{
    create_invoice, delete_invoice, get_invoice, list_invoices, update_invoice,
};
use axum::{Json, Router, routing::get};
use serde_json::{Value, json};

/// Build the invoice routes
///
/// - GET    /invoices              - List one page of invoices
/// - POST   /invoices              - Create an invoice
/// - GET    /invoices/{invoiceId}  - Get one invoice
/// - PATCH  /invoices/{invoiceId}  - Shallow-merge a patch
/// - DELETE /invoices/{invoiceId}  - Delete an invoice
///
/// Every route takes the owner as the `userId` query parameter.
pub fn build_invoice_routes(service: InvoiceService) -> Router {
    Router::new()
        .route("/invoices", get(list_invoices).post(create_invoice))
        .route(
            "/invoices/{invoiceId}",
            get(get_invoice).patch(update_invoice).delete(delete_invoice),
        )
        .with_state(service)
}

/// Build health check routes
pub fn health_routes() -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/healthz", get(health_check))
}

/// Health check endpoint handler
async fn health_check() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
