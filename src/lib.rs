//! # Invoices
//!
//! An owner-scoped invoice REST resource backed by a document store.
//!
//! ## Features
//!
//! - **Owner scoping**: every read, update and delete matches `(id, userId)`
//!   in a single store operation; another user's invoice looks missing
//! - **Declarative validation**: each endpoint declares its query, path and
//!   body shapes; all violations are reported at once
//! - **Bounded list queries**: owner filter, `sortBy`, `limit` and `page`
//!   only, returning a reduced projection per invoice
//! - **Pluggable storage**: in-memory, or MongoDB behind the
//!   `mongodb_backend` feature
//! - **Pluggable auth gate**: open for development, or HS256 JWT
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use invoices::prelude::*;
//!
//! let app = ServerBuilder::new()
//!     .with_store(InMemoryInvoiceStore::new())
//!     .build()?;
//!
//! // POST /invoices?userId=5ebac534954b54139806c112
//! // GET  /invoices?userId=5ebac534954b54139806c112&sortBy=due:desc&limit=10&page=1
//! ```

pub mod config;
pub mod core;
pub mod entities;
pub mod server;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        auth::{AuthContext, AuthPolicy, AuthProvider, JwtAuthProvider, NoAuthProvider},
        error::{ApiError, ApiResult},
        id::RecordId,
        query::{InvoiceFilter, ListOptions, Page, SortDirection, SortKey, SortSpec},
        service::InvoiceService,
        store::InvoiceStore,
    };

    // === Entities ===
    pub use crate::entities::invoice::{
        Address, Invoice, InvoiceFields, InvoiceSummary, Issuer, LineItem, NewInvoice,
        PaymentRecord, Recipient,
    };

    // === Storage ===
    pub use crate::storage::InMemoryInvoiceStore;
    #[cfg(feature = "mongodb_backend")]
    pub use crate::storage::MongoInvoiceStore;

    // === Config ===
    pub use crate::config::AppConfig;

    // === Server ===
    pub use crate::server::ServerBuilder;

    // === External dependencies ===
    pub use async_trait::async_trait;
    pub use chrono::{DateTime, Utc};
}
