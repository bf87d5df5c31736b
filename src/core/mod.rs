//! Core module containing the service's fundamental types and traits

pub mod auth;
pub mod error;
pub mod extractors;
pub mod id;
pub mod query;
pub mod service;
pub mod store;
pub mod validation;

pub use auth::{AuthContext, AuthPolicy, AuthProvider, JwtAuthProvider, NoAuthProvider};
pub use error::{ApiError, ApiResult};
pub use id::RecordId;
pub use query::{InvoiceFilter, ListOptions, Page, SortDirection, SortKey, SortSpec};
pub use service::InvoiceService;
pub use store::InvoiceStore;
