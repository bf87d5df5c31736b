//! Authorization gate for the invoice routes
//!
//! The service itself does not authenticate anybody: an [`AuthProvider`] turns
//! request headers into an [`AuthContext`], and an [`AuthPolicy`] decides
//! whether that context may reach the routes at all. Ownership (a user may only
//! act for its own `userId`) is checked once the request has been validated,
//! see [`AuthContext::ensure_can_act_for`].

use async_trait::async_trait;
use axum::http::HeaderMap;
use axum::http::header::AUTHORIZATION;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};

use crate::core::error::RequestError;
use crate::core::id::RecordId;

/// Role name that grants admin access in JWT claims
pub const ADMIN_ROLE: &str = "admin";

/// Authorization context extracted from a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthContext {
    /// Authenticated end user
    User { user_id: RecordId, roles: Vec<String> },

    /// System administrator
    Admin { admin_id: RecordId },

    /// No authentication (public access)
    Anonymous,
}

impl AuthContext {
    /// Check if context represents an admin
    pub fn is_admin(&self) -> bool {
        matches!(self, AuthContext::Admin { .. })
    }

    pub fn is_anonymous(&self) -> bool {
        matches!(self, AuthContext::Anonymous)
    }

    /// Get user_id if available
    pub fn user_id(&self) -> Option<RecordId> {
        match self {
            AuthContext::User { user_id, .. } => Some(*user_id),
            _ => None,
        }
    }

    /// A user may only act for itself; every other context passed the policy
    /// gate already and may act for any owner.
    pub fn ensure_can_act_for(&self, owner: &RecordId) -> Result<(), RequestError> {
        match self {
            AuthContext::User { user_id, .. } if user_id != owner => Err(RequestError::forbidden(
                "cannot access invoices of another user",
            )),
            _ => Ok(()),
        }
    }
}

/// Authorization policy for the invoice routes
#[derive(Debug, Clone)]
pub enum AuthPolicy {
    /// Public access (no auth required)
    Public,

    /// Any authenticated caller
    Authenticated,

    /// User must have one of these roles
    HasRole(Vec<String>),

    /// Admin only
    AdminOnly,
}

impl AuthPolicy {
    /// Check if auth context satisfies this policy
    pub fn check(&self, context: &AuthContext) -> bool {
        match self {
            AuthPolicy::Public => true,

            AuthPolicy::Authenticated => !context.is_anonymous(),

            AuthPolicy::HasRole(required_roles) => match context {
                AuthContext::User { roles, .. } => required_roles.iter().any(|r| roles.contains(r)),
                AuthContext::Admin { .. } => true,
                _ => false,
            },

            AuthPolicy::AdminOnly => context.is_admin(),
        }
    }

    /// Run the gate: anonymous callers get 401, authenticated ones 403
    pub fn authorize(&self, context: &AuthContext) -> Result<(), RequestError> {
        if self.check(context) {
            Ok(())
        } else if context.is_anonymous() {
            Err(RequestError::unauthorized("Please authenticate"))
        } else {
            Err(RequestError::forbidden("Insufficient permissions"))
        }
    }

    /// Parse policy from string (for YAML config)
    pub fn parse_policy(s: &str) -> Self {
        match s {
            "public" => AuthPolicy::Public,
            "authenticated" => AuthPolicy::Authenticated,
            "admin_only" => AuthPolicy::AdminOnly,
            s if s.starts_with("role:") => {
                let role = s.trim_start_matches("role:").to_string();
                AuthPolicy::HasRole(vec![role])
            }
            _ => AuthPolicy::Authenticated,
        }
    }
}

/// Trait for auth providers
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Extract auth context from request headers
    ///
    /// Returning `Ok(AuthContext::Anonymous)` lets the policy decide; an `Err`
    /// rejects the request outright (e.g. a forged token).
    async fn extract_context(&self, headers: &HeaderMap) -> Result<AuthContext, RequestError>;
}

/// Default no-auth provider (for development)
pub struct NoAuthProvider;

#[async_trait]
impl AuthProvider for NoAuthProvider {
    async fn extract_context(&self, _headers: &HeaderMap) -> Result<AuthContext, RequestError> {
        Ok(AuthContext::Anonymous)
    }
}

/// Claims expected in bearer tokens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtClaims {
    /// Subject: the user's record id
    pub sub: String,
    #[serde(default)]
    pub roles: Vec<String>,
    pub exp: i64,
}

/// HS256 bearer-token provider
pub struct JwtAuthProvider {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtAuthProvider {
    pub fn new(secret: &str) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::new(Algorithm::HS256),
        }
    }

    fn context_from_claims(claims: JwtClaims) -> Result<AuthContext, RequestError> {
        let id = RecordId::parse_str(&claims.sub).map_err(|_| {
            tracing::warn!(sub = %claims.sub, "token subject is not a record id");
            RequestError::unauthorized("Invalid token subject")
        })?;

        if claims.roles.iter().any(|r| r == ADMIN_ROLE) {
            Ok(AuthContext::Admin { admin_id: id })
        } else {
            Ok(AuthContext::User {
                user_id: id,
                roles: claims.roles,
            })
        }
    }
}

#[async_trait]
impl AuthProvider for JwtAuthProvider {
    async fn extract_context(&self, headers: &HeaderMap) -> Result<AuthContext, RequestError> {
        let Some(header) = headers.get(AUTHORIZATION) else {
            return Ok(AuthContext::Anonymous);
        };

        let token = header
            .to_str()
            .ok()
            .and_then(|h| h.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                tracing::warn!("malformed Authorization header");
                RequestError::unauthorized("Authorization header must be 'Bearer <token>'")
            })?;

        let data = decode::<JwtClaims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            tracing::warn!(error = %e, "JWT validation failed");
            match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                    RequestError::unauthorized("Token expired")
                }
                _ => RequestError::unauthorized("Invalid token"),
            }
        })?;

        Self::context_from_claims(data.claims)
    }
}
