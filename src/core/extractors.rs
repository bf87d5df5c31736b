//! Axum glue for the authorization gate
//!
//! This module provides:
//! - [`AuthGate`], router middleware that resolves the caller's
//!   [`AuthContext`] and applies the route policy before any handler or
//!   validation runs
//! - an [`AuthContext`] extractor for handlers

use axum::extract::{FromRequestParts, Request, State};
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::Response;
use std::convert::Infallible;
use std::sync::Arc;

use crate::core::auth::{AuthContext, AuthPolicy, AuthProvider};
use crate::core::error::ApiError;

/// Provider and policy guarding a set of routes
#[derive(Clone)]
pub struct AuthGate {
    provider: Arc<dyn AuthProvider>,
    policy: AuthPolicy,
}

impl AuthGate {
    pub fn new(provider: Arc<dyn AuthProvider>, policy: AuthPolicy) -> Self {
        Self { provider, policy }
    }

    pub fn policy(&self) -> &AuthPolicy {
        &self.policy
    }

    /// Resolve and authorize the caller behind `headers`
    pub async fn admit(&self, headers: &axum::http::HeaderMap) -> Result<AuthContext, ApiError> {
        let context = self
            .provider
            .extract_context(headers)
            .await
            .inspect_err(|e| tracing::warn!(error = %e, "rejected credentials"))?;

        self.policy
            .authorize(&context)
            .inspect_err(|e| tracing::warn!(error = %e, ?context, "auth policy denied request"))?;

        Ok(context)
    }
}

/// Middleware for `axum::middleware::from_fn_with_state`
///
/// ```rust,ignore
/// let routes = build_invoice_routes(service)
///     .layer(middleware::from_fn_with_state(gate, auth_gate));
/// ```
pub async fn auth_gate(
    State(gate): State<AuthGate>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let context = gate.admit(request.headers()).await?;
    request.extensions_mut().insert(context);
    Ok(next.run(request).await)
}

/// Routes mounted without the gate see an anonymous caller
impl<S> FromRequestParts<S> for AuthContext
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts
            .extensions
            .get::<AuthContext>()
            .cloned()
            .unwrap_or(AuthContext::Anonymous))
    }
}
