//! Persistence trait for invoices
//!
//! Every lookup that targets one invoice takes both its id and its owner, so
//! the compound `(id, userId)` predicate is evaluated by the store in a single
//! operation. An invoice owned by somebody else is indistinguishable from a
//! missing one.

use async_trait::async_trait;

use crate::core::error::StorageError;
use crate::core::id::RecordId;
use crate::core::query::{InvoiceFilter, ListOptions, Page};
use crate::entities::invoice::{Invoice, NewInvoice};

/// Storage backend for invoices
///
/// Implementations maintain `createdAt`/`updatedAt` themselves and never
/// interpret failures: anything that goes wrong is a [`StorageError`].
#[async_trait]
pub trait InvoiceStore: Send + Sync {
    /// Persist a new invoice, assigning its id and timestamps
    async fn insert(&self, invoice: NewInvoice) -> Result<Invoice, StorageError>;

    /// Fetch the invoice matching both `id` and `owner`
    async fn find_owned(
        &self,
        owner: &RecordId,
        id: &RecordId,
    ) -> Result<Option<Invoice>, StorageError>;

    /// One page of invoices matching `filter`, ordered by `options`
    async fn paginate(
        &self,
        filter: &InvoiceFilter,
        options: &ListOptions,
    ) -> Result<Page<Invoice>, StorageError>;

    /// Replace the stored document matching `(invoice.id, invoice.userId)`
    ///
    /// Refreshes `updatedAt`. Returns `None` when nothing matched, e.g. the
    /// invoice was deleted concurrently.
    async fn replace_owned(&self, invoice: Invoice) -> Result<Option<Invoice>, StorageError>;

    /// Remove the invoice matching both `id` and `owner`, returning it
    async fn delete_owned(
        &self,
        owner: &RecordId,
        id: &RecordId,
    ) -> Result<Option<Invoice>, StorageError>;
}
