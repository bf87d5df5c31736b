//! Invoice business operations
//!
//! `InvoiceService` is the only place that knows the owner-scoped rules:
//! creation stamps the owner, reads/updates/deletes are scoped by
//! `(id, userId)`, and only get/update/delete can end in "not found".

use std::sync::Arc;

use crate::core::error::{ApiError, ApiResult};
use crate::core::id::RecordId;
use crate::core::query::{InvoiceFilter, ListOptions, Page};
use crate::core::store::InvoiceStore;
use crate::entities::invoice::{Invoice, InvoiceFields, InvoiceSummary, NewInvoice};

/// Owner-scoped CRUD over an injected [`InvoiceStore`]
#[derive(Clone)]
pub struct InvoiceService {
    store: Arc<dyn InvoiceStore>,
}

impl InvoiceService {
    pub fn new(store: Arc<dyn InvoiceStore>) -> Self {
        Self { store }
    }

    /// Create an invoice owned by `owner`
    pub async fn create(&self, owner: RecordId, fields: InvoiceFields) -> ApiResult<Invoice> {
        tracing::debug!(%owner, "creating invoice");
        let invoice = self.store.insert(NewInvoice::owned_by(owner, fields)).await?;
        tracing::debug!(%owner, invoice_id = %invoice.id, "invoice created");
        Ok(invoice)
    }

    /// One page of list projections matching `filter`
    pub async fn list_by_owner(
        &self,
        filter: InvoiceFilter,
        options: ListOptions,
    ) -> ApiResult<Page<InvoiceSummary>> {
        tracing::debug!(owner = ?filter.user_id, page = options.page(), limit = options.limit(), "listing invoices");
        let page = self.store.paginate(&filter, &options).await?;
        Ok(page.map(|invoice| invoice.summary()))
    }

    /// The full invoice, or `None` when it is missing or owned by someone else
    pub async fn get_by_owner(
        &self,
        owner: RecordId,
        invoice_id: RecordId,
    ) -> ApiResult<Option<Invoice>> {
        Ok(self.store.find_owned(&owner, &invoice_id).await?)
    }

    /// Shallow-merge `patch` onto the stored invoice
    pub async fn update_by_owner(
        &self,
        owner: RecordId,
        invoice_id: RecordId,
        patch: InvoiceFields,
    ) -> ApiResult<Invoice> {
        let mut invoice = self
            .get_by_owner(owner, invoice_id)
            .await?
            .ok_or_else(|| ApiError::invoice_not_found(invoice_id))?;

        invoice.apply_patch(patch);

        let updated = self
            .store
            .replace_owned(invoice)
            .await?
            .ok_or_else(|| ApiError::invoice_not_found(invoice_id))?;
        tracing::debug!(%owner, %invoice_id, "invoice updated");
        Ok(updated)
    }

    /// Permanently remove an invoice, returning what was removed
    pub async fn delete_by_owner(
        &self,
        owner: RecordId,
        invoice_id: RecordId,
    ) -> ApiResult<Invoice> {
        self.get_by_owner(owner, invoice_id)
            .await?
            .ok_or_else(|| ApiError::invoice_not_found(invoice_id))?;

        let removed = self
            .store
            .delete_owned(&owner, &invoice_id)
            .await?
            .ok_or_else(|| ApiError::invoice_not_found(invoice_id))?;
        tracing::debug!(%owner, %invoice_id, "invoice deleted");
        Ok(removed)
    }
}
