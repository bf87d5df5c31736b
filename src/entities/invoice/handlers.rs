//! HTTP handlers for the invoice resource
//!
//! Handlers are thin: the request was validated by the [`Validated`]
//! extractor, the caller admitted by the auth gate. What remains is the
//! ownership check and a call into [`InvoiceService`].

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use super::model::{Invoice, InvoiceSummary};
use super::requests::{
    CreateInvoiceRequest, InvoiceKeyRequest, ListInvoicesRequest, UpdateInvoiceRequest,
};
use crate::core::auth::AuthContext;
use crate::core::error::ApiError;
use crate::core::query::{InvoiceFilter, Page};
use crate::core::service::InvoiceService;
use crate::core::validation::Validated;

/// `POST /invoices`
pub async fn create_invoice(
    State(service): State<InvoiceService>,
    context: AuthContext,
    Validated(req): Validated<CreateInvoiceRequest>,
) -> Result<Response, ApiError> {
    context.ensure_can_act_for(&req.user_id)?;

    let invoice = service.create(req.user_id, req.fields).await?;
    Ok((StatusCode::CREATED, Json(invoice)).into_response())
}

/// `GET /invoices`
pub async fn list_invoices(
    State(service): State<InvoiceService>,
    context: AuthContext,
    Validated(req): Validated<ListInvoicesRequest>,
) -> Result<Json<Page<InvoiceSummary>>, ApiError> {
    let filter = match req.user_id {
        Some(owner) => {
            context.ensure_can_act_for(&owner)?;
            InvoiceFilter::owned_by(owner)
        }
        // Users only ever see their own invoices
        None => context
            .user_id()
            .map(InvoiceFilter::owned_by)
            .unwrap_or_default(),
    };

    let page = service.list_by_owner(filter, req.options).await?;
    Ok(Json(page))
}

/// `GET /invoices/{invoiceId}`
pub async fn get_invoice(
    State(service): State<InvoiceService>,
    context: AuthContext,
    Validated(req): Validated<InvoiceKeyRequest>,
) -> Result<Json<Invoice>, ApiError> {
    context.ensure_can_act_for(&req.user_id)?;

    service
        .get_by_owner(req.user_id, req.invoice_id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::invoice_not_found(req.invoice_id))
}

/// `PATCH /invoices/{invoiceId}`
pub async fn update_invoice(
    State(service): State<InvoiceService>,
    context: AuthContext,
    Validated(req): Validated<UpdateInvoiceRequest>,
) -> Result<Json<Invoice>, ApiError> {
    context.ensure_can_act_for(&req.user_id)?;

    let invoice = service
        .update_by_owner(req.user_id, req.invoice_id, req.patch)
        .await?;
    Ok(Json(invoice))
}

/// `DELETE /invoices/{invoiceId}`
pub async fn delete_invoice(
    State(service): State<InvoiceService>,
    context: AuthContext,
    Validated(req): Validated<InvoiceKeyRequest>,
) -> Result<StatusCode, ApiError> {
    context.ensure_can_act_for(&req.user_id)?;

    service.delete_by_owner(req.user_id, req.invoice_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
