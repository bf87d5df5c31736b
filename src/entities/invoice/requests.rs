//! Request shapes of the invoice endpoints
//!
//! Each endpoint has a static [`RouteSchema`] and a typed request built from
//! the values that passed it.

use serde_json::{Map, Value};
use std::sync::LazyLock;

use super::model::InvoiceFields;
use crate::core::error::ValidationError;
use crate::core::id::RecordId;
use crate::core::query::{ListOptions, SortSpec};
use crate::core::validation::{FieldSpec, ObjectSchema, RequestSchema, RouteSchema, ValidatedParts};

fn address() -> ObjectSchema {
    ObjectSchema::new()
        .field("street", FieldSpec::string())
        .field("zipCode", FieldSpec::string())
        .field("city", FieldSpec::string())
        .field("state", FieldSpec::string())
}

fn invoice_body() -> ObjectSchema {
    let issuer = ObjectSchema::new()
        .field("businessRegistrationNumber", FieldSpec::string())
        .field("companyName", FieldSpec::string())
        .field("email", FieldSpec::email())
        .field("logo", FieldSpec::string())
        .field("address", FieldSpec::object(address()))
        .field("contactNumber", FieldSpec::string());

    let recipient = ObjectSchema::new()
        .field("companyName", FieldSpec::string())
        .field("email", FieldSpec::email())
        .field("address", FieldSpec::object(address()))
        .field("contactNumber", FieldSpec::string());

    let item = ObjectSchema::new()
        .field("description", FieldSpec::string())
        .field("rate", FieldSpec::number())
        .field("quantity", FieldSpec::number());

    let payment = ObjectSchema::new()
        .field("amount", FieldSpec::number())
        .field("date", FieldSpec::date())
        .field("method", FieldSpec::string())
        .field("note", FieldSpec::text())
        .field("notes", FieldSpec::text());

    ObjectSchema::new()
        .field("invoiceNumber", FieldSpec::string())
        .field("date", FieldSpec::date())
        .field("due", FieldSpec::number())
        .field("issuer", FieldSpec::object(issuer))
        .field("recipient", FieldSpec::object(recipient))
        .field("items", FieldSpec::array_of(FieldSpec::object(item)))
        .field("paymentRecords", FieldSpec::array_of(FieldSpec::object(payment)))
}

fn owner_query() -> ObjectSchema {
    ObjectSchema::new().field("userId", FieldSpec::record_id().required())
}

fn invoice_params() -> ObjectSchema {
    ObjectSchema::new().field("invoiceId", FieldSpec::record_id().required())
}

pub static CREATE_INVOICE: LazyLock<RouteSchema> =
    LazyLock::new(|| RouteSchema::new().query(owner_query()).body(invoice_body()));

pub static LIST_INVOICES: LazyLock<RouteSchema> = LazyLock::new(|| {
    RouteSchema::new().query(
        ObjectSchema::new()
            .field("userId", FieldSpec::record_id())
            .field("sortBy", FieldSpec::string())
            .field("limit", FieldSpec::positive_integer())
            .field("page", FieldSpec::positive_integer()),
    )
});

/// Shared by get-one and delete
pub static INVOICE_KEY: LazyLock<RouteSchema> =
    LazyLock::new(|| RouteSchema::new().query(owner_query()).params(invoice_params()));

pub static UPDATE_INVOICE: LazyLock<RouteSchema> = LazyLock::new(|| {
    RouteSchema::new()
        .query(owner_query())
        .params(invoice_params())
        .body(invoice_body())
});

fn optional_id(map: &Map<String, Value>, key: &str) -> Result<Option<RecordId>, ValidationError> {
    match map.get(key).and_then(Value::as_str) {
        Some(raw) => RecordId::parse_str(raw)
            .map(Some)
            .map_err(|_| ValidationError::single(key, format!("\"{}\" must be a valid id", key))),
        None => Ok(None),
    }
}

fn required_id(map: &Map<String, Value>, key: &str) -> Result<RecordId, ValidationError> {
    optional_id(map, key)?
        .ok_or_else(|| ValidationError::single(key, format!("\"{}\" is required", key)))
}

fn fields(body: Map<String, Value>) -> Result<InvoiceFields, ValidationError> {
    serde_json::from_value(Value::Object(body))
        .map_err(|e| ValidationError::single("body", format!("\"body\" {}", e)))
}

/// `POST /invoices?userId=`
#[derive(Debug, Clone)]
pub struct CreateInvoiceRequest {
    pub user_id: RecordId,
    pub fields: InvoiceFields,
}

impl RequestSchema for CreateInvoiceRequest {
    fn route_schema() -> &'static RouteSchema {
        &CREATE_INVOICE
    }

    fn from_parts(parts: ValidatedParts) -> Result<Self, ValidationError> {
        Ok(Self {
            user_id: required_id(&parts.query, "userId")?,
            fields: fields(parts.body)?,
        })
    }
}

/// `GET /invoices?userId=&sortBy=&limit=&page=`
#[derive(Debug, Clone)]
pub struct ListInvoicesRequest {
    pub user_id: Option<RecordId>,
    pub options: ListOptions,
}

impl RequestSchema for ListInvoicesRequest {
    fn route_schema() -> &'static RouteSchema {
        &LIST_INVOICES
    }

    fn from_parts(parts: ValidatedParts) -> Result<Self, ValidationError> {
        let query = parts.query;
        let sort = match query.get("sortBy").and_then(Value::as_str) {
            Some(expr) => SortSpec::parse_list(expr)
                .map_err(|e| ValidationError::single("sortBy", format!("\"sortBy\" {}", e)))?,
            None => Vec::new(),
        };
        let limit = query.get("limit").and_then(Value::as_u64);
        let page = query.get("page").and_then(Value::as_u64);

        Ok(Self {
            user_id: optional_id(&query, "userId")?,
            options: ListOptions::new(sort, limit, page),
        })
    }
}

/// `GET|DELETE /invoices/{invoiceId}?userId=`
#[derive(Debug, Clone)]
pub struct InvoiceKeyRequest {
    pub user_id: RecordId,
    pub invoice_id: RecordId,
}

impl RequestSchema for InvoiceKeyRequest {
    fn route_schema() -> &'static RouteSchema {
        &INVOICE_KEY
    }

    fn from_parts(parts: ValidatedParts) -> Result<Self, ValidationError> {
        Ok(Self {
            user_id: required_id(&parts.query, "userId")?,
            invoice_id: required_id(&parts.params, "invoiceId")?,
        })
    }
}

/// `PATCH /invoices/{invoiceId}?userId=`
#[derive(Debug, Clone)]
pub struct UpdateInvoiceRequest {
    pub user_id: RecordId,
    pub invoice_id: RecordId,
    pub patch: InvoiceFields,
}

impl RequestSchema for UpdateInvoiceRequest {
    fn route_schema() -> &'static RouteSchema {
        &UPDATE_INVOICE
    }

    fn from_parts(parts: ValidatedParts) -> Result<Self, ValidationError> {
        Ok(Self {
            user_id: required_id(&parts.query, "userId")?,
            invoice_id: required_id(&parts.params, "invoiceId")?,
            patch: fields(parts.body)?,
        })
    }
}
