//! Shared test harness for invoice store testing
//!
//! Provides invoice builders and the macro-generated suites:
//! - `invoice_store_tests!`: the `InvoiceStore` contract
//! - `rest_integration_tests!`: HTTP round-trips through `ServerBuilder`
//!
//! # Usage
//!
//! From any integration test file in `tests/`:
//! ```rust,ignore
//! #[macro_use]
//! mod storage_harness;
//! use storage_harness::*;
//! ```

#![allow(dead_code)]

use chrono::{DateTime, Utc};
use serde_json::{Value, json};

use invoices::core::id::RecordId;
use invoices::entities::invoice::{
    Address, InvoiceFields, Issuer, LineItem, NewInvoice, PaymentRecord, Recipient,
};

pub mod integration;
pub mod invoice_store_tests;

/// Parse an RFC 3339 timestamp, panicking on malformed test input
pub fn ts(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .expect("valid test timestamp")
        .with_timezone(&Utc)
}

/// Fully populated invoice fields
pub fn sample_fields(number: &str) -> InvoiceFields {
    InvoiceFields {
        invoice_number: Some(number.to_string()),
        date: Some(ts("2024-01-15T00:00:00Z")),
        due: Some(3200.0),
        issuer: Some(Issuer {
            business_registration_number: Some("BRN-1".into()),
            company_name: Some("Acme".into()),
            email: Some("billing@acme.io".into()),
            address: Some(Address {
                street: Some("1 Main St".into()),
                zip_code: Some("12345".into()),
                city: Some("Springfield".into()),
                state: Some("IL".into()),
            }),
            contact_number: None,
            logo: None,
        }),
        recipient: Some(Recipient {
            company_name: Some("Globex".into()),
            email: Some("ap@globex.io".into()),
            ..Default::default()
        }),
        items: Some(vec![LineItem {
            description: Some("Design".into()),
            rate: Some(3200.0),
            quantity: Some(1.0),
        }]),
        payment_records: Some(vec![PaymentRecord {
            amount: Some(100.0),
            date: Some(ts("2024-02-01T00:00:00Z")),
            method: Some("card".into()),
            notes: Some(String::new()),
        }]),
    }
}

/// A new invoice owned by `owner`
pub fn new_invoice(owner: RecordId, number: &str) -> NewInvoice {
    NewInvoice::owned_by(owner, sample_fields(number))
}

/// Minimal create body, as a client would send it
pub fn create_body(number: &str) -> Value {
    json!({
        "invoiceNumber": number,
        "items": [{"description": "Design", "rate": 3200, "quantity": 1}]
    })
}
