//! Invoice entity model
//!
//! Every attribute except the store-assigned `id` and the timestamps is
//! optional: required-ness is only enforced at the request boundary.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::id::RecordId;

/// Postal address shared by issuer and recipient
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zip_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

/// Company issuing the invoice
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Issuer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_registration_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_number: Option<String>,
    /// Typically a base64 encoded image
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
}

/// Company being billed
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipient {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_number: Option<String>,
}

/// One billed line; no total is stored
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<f64>,
}

/// A payment received against the invoice
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    /// Requests spell this `note`
    #[serde(default, alias = "note", skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Client-supplied invoice attributes
///
/// Used both as the create body and as an update patch. As a patch, every
/// `Some` top-level field replaces the stored one wholesale.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invoice_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issuer: Option<Issuer>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient: Option<Recipient>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<LineItem>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_records: Option<Vec<PaymentRecord>>,
}

/// An invoice waiting for the store to assign its id and timestamps
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewInvoice {
    pub user_id: Option<RecordId>,
    pub fields: InvoiceFields,
}

impl NewInvoice {
    /// Stamp `owner` over the supplied fields
    pub fn owned_by(owner: RecordId, fields: InvoiceFields) -> Self {
        Self {
            user_id: Some(owner),
            fields,
        }
    }

    /// Materialize with store-assigned metadata
    pub fn into_invoice(self, id: RecordId, now: DateTime<Utc>) -> Invoice {
        let f = self.fields;
        Invoice {
            id,
            invoice_number: f.invoice_number,
            user_id: self.user_id,
            date: f.date,
            due: f.due,
            issuer: f.issuer,
            recipient: f.recipient,
            items: f.items.unwrap_or_default(),
            payment_records: f.payment_records.unwrap_or_default(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// The stored invoice
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub id: RecordId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invoice_number: Option<String>,
    /// Owner; set once at creation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<RecordId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issuer: Option<Issuer>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient: Option<Recipient>,
    #[serde(default)]
    pub items: Vec<LineItem>,
    #[serde(default)]
    pub payment_records: Vec<PaymentRecord>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Invoice {
    pub fn is_owned_by(&self, owner: &RecordId) -> bool {
        self.user_id.as_ref() == Some(owner)
    }

    /// Shallow merge: each provided top-level field replaces the stored one.
    ///
    /// Nested records are NOT merged, so patching `issuer` with only a
    /// `companyName` drops the stored `issuer.address`.
    pub fn apply_patch(&mut self, patch: InvoiceFields) {
        let InvoiceFields {
            invoice_number,
            date,
            due,
            issuer,
            recipient,
            items,
            payment_records,
        } = patch;

        if invoice_number.is_some() {
            self.invoice_number = invoice_number;
        }
        if date.is_some() {
            self.date = date;
        }
        if due.is_some() {
            self.due = due;
        }
        if issuer.is_some() {
            self.issuer = issuer;
        }
        if recipient.is_some() {
            self.recipient = recipient;
        }
        if let Some(items) = items {
            self.items = items;
        }
        if let Some(payment_records) = payment_records {
            self.payment_records = payment_records;
        }
    }

    /// Reduced view returned by list queries
    pub fn summary(&self) -> InvoiceSummary {
        InvoiceSummary {
            id: self.id,
            invoice_number: self.invoice_number.clone(),
            date: self.date,
            recipient: self.recipient.as_ref().map(|r| RecipientSummary {
                company_name: r.company_name.clone(),
            }),
            items: self
                .items
                .iter()
                .map(|i| ItemSummary {
                    rate: i.rate,
                    quantity: i.quantity,
                })
                .collect(),
            payment_records: self
                .payment_records
                .iter()
                .map(|p| PaymentSummary { amount: p.amount })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipientSummary {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemSummary {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentSummary {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
}

/// List projection: invoiceNumber, date, recipient.companyName,
/// items.rate, items.quantity and paymentRecords.amount
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceSummary {
    pub id: RecordId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invoice_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient: Option<RecipientSummary>,
    pub items: Vec<ItemSummary>,
    pub payment_records: Vec<PaymentSummary>,
}
