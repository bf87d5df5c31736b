//! Validation and filtering system
//!
//! Requests are checked against a declarative [`RouteSchema`] before they reach
//! the handlers: values are coerced by filters, checked by validators, and
//! every violation is collected into a single [`ValidationError`].
//!
//! [`ValidationError`]: crate::core::error::ValidationError

pub mod extractor;
pub mod filters;
pub mod schema;
pub mod validators;

pub use extractor::{RequestSchema, Validated};
pub use schema::{FieldSpec, ObjectSchema, RouteSchema, Shape, ValidatedParts};
