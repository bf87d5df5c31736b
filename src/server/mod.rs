//! HTTP server assembly
//!
//! `ServerBuilder` wires a store and an auth gate into the invoice routes and
//! adds health checks and request tracing.

pub mod builder;
pub mod router;

pub use builder::ServerBuilder;
pub use router::{build_invoice_routes, health_routes};
