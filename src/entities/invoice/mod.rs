//! The invoice resource: model, request shapes and HTTP handlers

pub mod handlers;
pub mod model;
pub mod requests;

pub use handlers::{create_invoice, delete_invoice, get_invoice, list_invoices, update_invoice};
pub use model::{
    Address, Invoice, InvoiceFields, InvoiceSummary, ItemSummary, Issuer, LineItem, NewInvoice,
    PaymentRecord, PaymentSummary, Recipient, RecipientSummary,
};
pub use requests::{
    CreateInvoiceRequest, InvoiceKeyRequest, ListInvoicesRequest, UpdateInvoiceRequest,
};
