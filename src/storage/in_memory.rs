//! In-memory implementation of InvoiceStore for testing and development

use crate::core::error::StorageError;
use crate::core::id::RecordId;
use crate::core::query::{InvoiceFilter, ListOptions, Page};
use crate::core::store::InvoiceStore;
use crate::entities::invoice::{Invoice, NewInvoice};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

const BACKEND: &str = "in-memory";

fn lock_error(e: impl std::fmt::Display) -> StorageError {
    StorageError::operation(BACKEND, "acquire lock", e)
}

/// In-memory invoice store
///
/// Useful for testing and development. Uses RwLock for thread-safe access;
/// clones share the same data.
#[derive(Clone, Default)]
pub struct InMemoryInvoiceStore {
    invoices: Arc<RwLock<HashMap<RecordId, Invoice>>>,
}

impl InMemoryInvoiceStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored invoices, across all owners
    pub fn len(&self) -> usize {
        self.invoices.read().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl InvoiceStore for InMemoryInvoiceStore {
    async fn insert(&self, invoice: NewInvoice) -> Result<Invoice, StorageError> {
        let mut invoices = self.invoices.write().map_err(lock_error)?;

        let invoice = invoice.into_invoice(RecordId::new(), Utc::now());
        invoices.insert(invoice.id, invoice.clone());

        Ok(invoice)
    }

    async fn find_owned(
        &self,
        owner: &RecordId,
        id: &RecordId,
    ) -> Result<Option<Invoice>, StorageError> {
        let invoices = self.invoices.read().map_err(lock_error)?;

        Ok(invoices
            .get(id)
            .filter(|invoice| invoice.is_owned_by(owner))
            .cloned())
    }

    async fn paginate(
        &self,
        filter: &InvoiceFilter,
        options: &ListOptions,
    ) -> Result<Page<Invoice>, StorageError> {
        let invoices = self.invoices.read().map_err(lock_error)?;

        let mut matching: Vec<&Invoice> =
            invoices.values().filter(|i| filter.matches(i)).collect();
        matching.sort_by(|a, b| options.compare(a, b));

        let total = matching.len() as u64;
        let results = matching
            .into_iter()
            .skip(options.skip() as usize)
            .take(options.limit() as usize)
            .cloned()
            .collect();

        Ok(Page::new(results, options, total))
    }

    async fn replace_owned(&self, mut invoice: Invoice) -> Result<Option<Invoice>, StorageError> {
        let mut invoices = self.invoices.write().map_err(lock_error)?;

        let Some(owner) = invoice.user_id else {
            return Ok(None);
        };
        match invoices.get_mut(&invoice.id) {
            Some(stored) if stored.is_owned_by(&owner) => {
                invoice.created_at = stored.created_at;
                invoice.updated_at = Utc::now();
                *stored = invoice.clone();
                Ok(Some(invoice))
            }
            _ => Ok(None),
        }
    }

    async fn delete_owned(
        &self,
        owner: &RecordId,
        id: &RecordId,
    ) -> Result<Option<Invoice>, StorageError> {
        let mut invoices = self.invoices.write().map_err(lock_error)?;

        if invoices.get(id).is_some_and(|i| i.is_owned_by(owner)) {
            Ok(invoices.remove(id))
        } else {
            Ok(None)
        }
    }
}
