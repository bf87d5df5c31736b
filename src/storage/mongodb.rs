//! MongoDB storage backend using the official MongoDB async driver.
//!
//! Provides `MongoInvoiceStore`, an [`InvoiceStore`] backed by a single
//! `invoices` collection of a `mongodb::Database`.
//!
//! # Feature flag
//!
//! This module is gated behind the `mongodb_backend` feature flag:
//! ```toml
//! [dependencies]
//! invoice-rs = { version = "0.1", features = ["mongodb_backend"] }
//! ```
//!
//! # Storage model
//!
//! Invoices are serialized via `serde_json::Value` as an intermediate format,
//! then converted to BSON documents. On the way in:
//! - `id` becomes the native `_id` ObjectId (the value [`RecordId`] wraps)
//! - `userId` stays a hex string, which is what ownership filters match on
//! - `date`, `createdAt`, `updatedAt` and `paymentRecords.date` become BSON
//!   datetimes so they sort chronologically
//!
//! The reverse conversion restores the public JSON shape.

use crate::core::error::StorageError;
use crate::core::id::RecordId;
use crate::core::query::{InvoiceFilter, ListOptions, Page, SortDirection};
use crate::core::store::InvoiceStore;
use crate::entities::invoice::{Invoice, NewInvoice};
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use futures::TryStreamExt;
use mongodb::Database;
use mongodb::bson::{Bson, Document, doc};

const BACKEND: &str = "MongoDB";

/// Name of the invoices collection
pub const COLLECTION: &str = "invoices";

const DATE_FIELDS: [&str; 3] = ["date", "createdAt", "updatedAt"];

// ---------------------------------------------------------------------------
// Conversion helpers
// ---------------------------------------------------------------------------

fn oid(id: &RecordId) -> Bson {
    Bson::ObjectId(id.object_id())
}

/// Current time at the millisecond precision the store keeps
fn now_millis() -> DateTime<Utc> {
    let now = Utc::now();
    DateTime::from_timestamp_millis(now.timestamp_millis()).unwrap_or(now)
}

fn string_to_datetime(value: &mut Bson) {
    if let Bson::String(s) = value
        && let Ok(dt) = DateTime::parse_from_rfc3339(s)
    {
        *value = Bson::DateTime(mongodb::bson::DateTime::from_millis(dt.timestamp_millis()));
    }
}

fn datetime_to_string(value: &mut Bson) {
    if let Bson::DateTime(dt) = value
        && let Some(chrono_dt) = DateTime::<Utc>::from_timestamp_millis(dt.timestamp_millis())
    {
        *value = Bson::String(chrono_dt.to_rfc3339_opts(SecondsFormat::Millis, true));
    }
}

/// Apply `f` to every date-typed field of an invoice document
fn for_each_date(doc: &mut Document, f: fn(&mut Bson)) {
    for field in DATE_FIELDS {
        if let Some(value) = doc.get_mut(field) {
            f(value);
        }
    }
    if let Some(Bson::Array(records)) = doc.get_mut("paymentRecords") {
        for record in records.iter_mut() {
            if let Bson::Document(record) = record
                && let Some(value) = record.get_mut("date")
            {
                f(value);
            }
        }
    }
}

/// Convert an invoice into a MongoDB document
fn invoice_to_document(invoice: &Invoice) -> Result<Document, StorageError> {
    let json = serde_json::to_value(invoice)
        .map_err(|e| StorageError::serialization(BACKEND, format!("serialize invoice: {}", e)))?;
    let bson = mongodb::bson::to_bson(&json)
        .map_err(|e| StorageError::serialization(BACKEND, format!("JSON to BSON: {}", e)))?;

    let mut doc = match bson {
        Bson::Document(d) => d,
        _ => {
            return Err(StorageError::serialization(
                BACKEND,
                "expected BSON document, got non-object",
            ));
        }
    };

    // MongoDB convention: id → _id
    doc.remove("id");
    doc.insert("_id", oid(&invoice.id));
    for_each_date(&mut doc, string_to_datetime);

    Ok(doc)
}

/// Convert a MongoDB document back into an invoice
fn document_to_invoice(mut doc: Document) -> Result<Invoice, StorageError> {
    match doc.remove("_id") {
        Some(Bson::ObjectId(id)) => {
            doc.insert("id", RecordId::from(id).to_string());
        }
        Some(other) => {
            return Err(StorageError::serialization(
                BACKEND,
                format!("unexpected _id type: {}", other),
            ));
        }
        None => {}
    }
    for_each_date(&mut doc, datetime_to_string);

    let json = Bson::Document(doc).into_relaxed_extjson();
    serde_json::from_value(json)
        .map_err(|e| StorageError::serialization(BACKEND, format!("deserialize invoice: {}", e)))
}

fn filter_document(filter: &InvoiceFilter) -> Document {
    match &filter.user_id {
        Some(owner) => doc! { "userId": owner.to_string() },
        None => doc! {},
    }
}

fn owned(owner: &RecordId, id: &RecordId) -> Document {
    doc! { "_id": oid(id), "userId": owner.to_string() }
}

fn sort_document(options: &ListOptions) -> Document {
    let mut sort = Document::new();
    for spec in options.effective_sort() {
        let direction = match spec.direction {
            SortDirection::Asc => 1,
            SortDirection::Desc => -1,
        };
        sort.insert(spec.key.field_path(), direction);
    }
    // Stable pages need a total order
    sort.insert("_id", 1);
    sort
}

// ---------------------------------------------------------------------------
// MongoInvoiceStore
// ---------------------------------------------------------------------------

/// Invoice store backed by MongoDB.
///
/// # Example
///
/// ```rust,ignore
/// use mongodb::Client;
/// use invoices::storage::MongoInvoiceStore;
///
/// let client = Client::with_uri_str("mongodb://localhost:27017").await?;
/// let store = MongoInvoiceStore::new(client.database("billing"));
/// store.ensure_indexes().await?;
/// ```
#[derive(Clone, Debug)]
pub struct MongoInvoiceStore {
    database: Database,
}

impl MongoInvoiceStore {
    /// Create a new `MongoInvoiceStore` with the given database handle.
    pub fn new(database: Database) -> Self {
        Self { database }
    }

    /// Connect to `uri` and use `database`
    pub async fn connect(uri: &str, database: &str) -> Result<Self, StorageError> {
        let client = mongodb::Client::with_uri_str(uri).await.map_err(|e| {
            StorageError::ConnectionError {
                backend: BACKEND.to_string(),
                message: e.to_string(),
            }
        })?;
        Ok(Self::new(client.database(database)))
    }

    /// Get a reference to the underlying database.
    pub fn database(&self) -> &Database {
        &self.database
    }

    fn collection(&self) -> mongodb::Collection<Document> {
        self.database.collection(COLLECTION)
    }

    /// Create the indexes list queries rely on.
    ///
    /// - `userId: 1`: owner-scoped lookups
    /// - `userId: 1, createdAt: 1`: default list order per owner
    ///
    /// Idempotent; safe to call on every startup.
    pub async fn ensure_indexes(&self) -> Result<(), StorageError> {
        use mongodb::IndexModel;

        let indexes = vec![
            IndexModel::builder().keys(doc! { "userId": 1 }).build(),
            IndexModel::builder()
                .keys(doc! { "userId": 1, "createdAt": 1 })
                .build(),
        ];

        self.collection()
            .create_indexes(indexes)
            .await
            .map_err(|e| StorageError::operation(BACKEND, "create indexes", e))?;

        Ok(())
    }
}

#[async_trait]
impl InvoiceStore for MongoInvoiceStore {
    /// Insert a new invoice under a freshly generated ObjectId.
    async fn insert(&self, invoice: NewInvoice) -> Result<Invoice, StorageError> {
        let invoice = invoice.into_invoice(RecordId::new(), now_millis());
        let doc = invoice_to_document(&invoice)?;

        self.collection()
            .insert_one(doc)
            .await
            .map_err(|e| StorageError::operation(BACKEND, "insert invoice", e))?;

        Ok(invoice)
    }

    async fn find_owned(
        &self,
        owner: &RecordId,
        id: &RecordId,
    ) -> Result<Option<Invoice>, StorageError> {
        let doc = self
            .collection()
            .find_one(owned(owner, id))
            .await
            .map_err(|e| StorageError::operation(BACKEND, "find invoice", e))?;

        doc.map(document_to_invoice).transpose()
    }

    /// Count, then fetch one sorted page server-side.
    async fn paginate(
        &self,
        filter: &InvoiceFilter,
        options: &ListOptions,
    ) -> Result<Page<Invoice>, StorageError> {
        let filter = filter_document(filter);

        let total = self
            .collection()
            .count_documents(filter.clone())
            .await
            .map_err(|e| StorageError::operation(BACKEND, "count invoices", e))?;

        // Past the last page; the server rejects skips beyond i64::MAX
        if options.skip() >= total {
            return Ok(Page::new(Vec::new(), options, total));
        }

        let cursor = self
            .collection()
            .find(filter)
            .sort(sort_document(options))
            .skip(options.skip())
            .limit(i64::try_from(options.limit()).unwrap_or(i64::MAX))
            .await
            .map_err(|e| StorageError::operation(BACKEND, "list invoices", e))?;

        let docs: Vec<Document> = cursor
            .try_collect()
            .await
            .map_err(|e| StorageError::operation(BACKEND, "collect invoices", e))?;

        let results = docs
            .into_iter()
            .map(document_to_invoice)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Page::new(results, options, total))
    }

    async fn replace_owned(&self, mut invoice: Invoice) -> Result<Option<Invoice>, StorageError> {
        let Some(owner) = invoice.user_id else {
            return Ok(None);
        };
        invoice.updated_at = now_millis();
        let doc = invoice_to_document(&invoice)?;

        let result = self
            .collection()
            .replace_one(owned(&owner, &invoice.id), doc)
            .await
            .map_err(|e| StorageError::operation(BACKEND, "replace invoice", e))?;

        if result.matched_count == 0 {
            return Ok(None);
        }
        Ok(Some(invoice))
    }

    async fn delete_owned(
        &self,
        owner: &RecordId,
        id: &RecordId,
    ) -> Result<Option<Invoice>, StorageError> {
        let removed = self
            .collection()
            .find_one_and_delete(owned(owner, id))
            .await
            .map_err(|e| StorageError::operation(BACKEND, "delete invoice", e))?;

        removed.map(document_to_invoice).transpose()
    }
}
