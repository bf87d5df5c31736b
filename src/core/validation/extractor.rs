//! Axum extractor for validated requests
//!
//! This module provides the `Validated<R>` extractor that checks the query
//! string, path parameters and body of a request against `R::route_schema()`
//! before the handler runs. Handlers therefore only ever see typed,
//! normalized input.

use super::schema::{RouteSchema, ValidatedParts};
use crate::core::error::{ApiError, ValidationError};
use axum::{
    body::Bytes,
    extract::{FromRequest, FromRequestParts, Path, Query, Request},
};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Trait for typed requests built from a validated route schema
///
/// ```rust,ignore
/// impl RequestSchema for GetInvoiceRequest {
///     fn route_schema() -> &'static RouteSchema { &GET_INVOICE }
///     fn from_parts(parts: ValidatedParts) -> Result<Self, ValidationError> { ... }
/// }
/// ```
pub trait RequestSchema: Sized {
    /// Expected shapes of query, params and body
    fn route_schema() -> &'static RouteSchema;

    /// Build the typed request from normalized values
    fn from_parts(parts: ValidatedParts) -> Result<Self, ValidationError>;
}

/// Axum extractor that validates and converts a whole request
///
/// # Usage
///
/// ```rust,ignore
/// pub async fn get_invoice(
///     Validated(req): Validated<GetInvoiceRequest>,
/// ) -> Result<Json<Invoice>, ApiError> {
///     // req.user_id and req.invoice_id are well-formed ids
/// }
/// ```
pub struct Validated<R>(pub R);

impl<R> Validated<R> {
    /// Get the inner request
    pub fn into_inner(self) -> R {
        self.0
    }
}

impl<R> std::ops::Deref for Validated<R> {
    type Target = R;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

fn to_json_map(raw: HashMap<String, String>) -> Map<String, Value> {
    raw.into_iter().map(|(k, v)| (k, Value::String(v))).collect()
}

impl<S, R> FromRequest<S> for Validated<R>
where
    S: Send + Sync,
    R: RequestSchema + Send,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let schema = R::route_schema();
        let (mut parts, body) = req.into_parts();

        let Query(query) = Query::<HashMap<String, String>>::from_request_parts(&mut parts, state)
            .await
            .map_err(|e| ValidationError::single("query", e.body_text()))?;

        // Routes without path parameters reject the `Path` extractor
        let params = if schema.params.is_some() {
            let Path(params) =
                Path::<HashMap<String, String>>::from_request_parts(&mut parts, state)
                    .await
                    .map_err(|e| ValidationError::single("params", e.body_text()))?;
            params
        } else {
            HashMap::new()
        };

        let body = if schema.body.is_some() {
            let bytes = Bytes::from_request(Request::from_parts(parts, body), state)
                .await
                .map_err(|e| ValidationError::MalformedBody(e.body_text()))?;
            if bytes.iter().all(u8::is_ascii_whitespace) {
                Value::Null
            } else {
                serde_json::from_slice(&bytes)
                    .map_err(|e| ValidationError::MalformedBody(e.to_string()))?
            }
        } else {
            Value::Null
        };

        let validated = schema.validate(to_json_map(query), to_json_map(params), body)?;
        Ok(Validated(R::from_parts(validated)?))
    }
}
