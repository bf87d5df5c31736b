//! HTTP-level integration helpers
//!
//! Builds the production router around any `InvoiceStore` so the generated
//! suites exercise validation, the auth gate and the handlers end to end.

pub mod rest_tests;

use axum::Router;
use invoices::core::store::InvoiceStore;
use invoices::server::ServerBuilder;

/// Open (no-auth) router over `store`
pub fn build_test_router(store: impl InvoiceStore + 'static) -> Router {
    ServerBuilder::new()
        .with_store(store)
        .build()
        .expect("router should build")
}
