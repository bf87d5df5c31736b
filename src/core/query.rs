//! List filters, sorting and pagination
//!
//! List queries accept a closed set of options: an owner-equality filter, a
//! sort specification over known fields, a page size and a 1-based page. There
//! is no free-form filter map, so callers cannot smuggle store query operators
//! through the API.

use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::core::id::RecordId;
use crate::entities::invoice::Invoice;

/// Default number of results per page
pub const DEFAULT_LIMIT: u64 = 10;

/// Default page number
pub const DEFAULT_PAGE: u64 = 1;

/// Exact-match predicates for list queries
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvoiceFilter {
    /// Restrict to invoices owned by this user; `None` matches every owner
    pub user_id: Option<RecordId>,
}

impl InvoiceFilter {
    pub fn owned_by(user_id: RecordId) -> Self {
        Self {
            user_id: Some(user_id),
        }
    }

    pub fn matches(&self, invoice: &Invoice) -> bool {
        self.user_id
            .as_ref()
            .is_none_or(|owner| invoice.is_owned_by(owner))
    }
}

/// Fields a list can be ordered by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    InvoiceNumber,
    Date,
    Due,
    CreatedAt,
    UpdatedAt,
    IssuerCompanyName,
    RecipientCompanyName,
}

impl SortKey {
    pub const ALL: [SortKey; 7] = [
        SortKey::InvoiceNumber,
        SortKey::Date,
        SortKey::Due,
        SortKey::CreatedAt,
        SortKey::UpdatedAt,
        SortKey::IssuerCompanyName,
        SortKey::RecipientCompanyName,
    ];

    /// Name of the field in the stored JSON document
    pub fn field_path(&self) -> &'static str {
        match self {
            SortKey::InvoiceNumber => "invoiceNumber",
            SortKey::Date => "date",
            SortKey::Due => "due",
            SortKey::CreatedAt => "createdAt",
            SortKey::UpdatedAt => "updatedAt",
            SortKey::IssuerCompanyName => "issuer.companyName",
            SortKey::RecipientCompanyName => "recipient.companyName",
        }
    }

    /// Ascending comparison; absent values sort first, like a document store
    pub fn compare(&self, a: &Invoice, b: &Invoice) -> Ordering {
        fn company(name: Option<&String>) -> Option<&str> {
            name.map(String::as_str)
        }

        match self {
            SortKey::InvoiceNumber => a.invoice_number.cmp(&b.invoice_number),
            SortKey::Date => a.date.cmp(&b.date),
            SortKey::Due => match (a.due, b.due) {
                (Some(x), Some(y)) => x.total_cmp(&y),
                (x, y) => x.is_some().cmp(&y.is_some()),
            },
            SortKey::CreatedAt => a.created_at.cmp(&b.created_at),
            SortKey::UpdatedAt => a.updated_at.cmp(&b.updated_at),
            SortKey::IssuerCompanyName => company(
                a.issuer.as_ref().and_then(|i| i.company_name.as_ref()),
            )
            .cmp(&company(
                b.issuer.as_ref().and_then(|i| i.company_name.as_ref()),
            )),
            SortKey::RecipientCompanyName => company(
                a.recipient.as_ref().and_then(|r| r.company_name.as_ref()),
            )
            .cmp(&company(
                b.recipient.as_ref().and_then(|r| r.company_name.as_ref()),
            )),
        }
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortKey::ALL
            .into_iter()
            .find(|key| key.field_path() == s)
            .ok_or_else(|| format!("unknown sort field '{}'", s))
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.field_path())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

/// One `field:direction` term of a `sortBy` expression
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn asc(key: SortKey) -> Self {
        Self {
            key,
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(key: SortKey) -> Self {
        Self {
            key,
            direction: SortDirection::Desc,
        }
    }

    /// Parse a full `sortBy` expression
    ///
    /// # Format
    /// - `field` or `field:asc` (ascending)
    /// - `field:desc` (descending)
    /// - several terms separated by commas, each with its own direction
    ///
    /// # Example
    /// ```
    /// # use invoices::core::query::{SortKey, SortSpec};
    /// let specs = SortSpec::parse_list("due:desc,invoiceNumber").unwrap();
    /// assert_eq!(specs, vec![SortSpec::desc(SortKey::Due), SortSpec::asc(SortKey::InvoiceNumber)]);
    /// ```
    pub fn parse_list(expr: &str) -> Result<Vec<SortSpec>, String> {
        expr.split(',')
            .map(str::trim)
            .filter(|term| !term.is_empty())
            .map(|term| {
                let (field, direction) = match term.split_once(':') {
                    Some((field, "asc")) => (field, SortDirection::Asc),
                    Some((field, "desc")) => (field, SortDirection::Desc),
                    Some((_, other)) => {
                        return Err(format!(
                            "invalid sort direction '{}' (expected asc or desc)",
                            other
                        ));
                    }
                    None => (term, SortDirection::Asc),
                };
                Ok(SortSpec {
                    key: field.parse()?,
                    direction,
                })
            })
            .collect()
    }

    fn compare(&self, a: &Invoice, b: &Invoice) -> Ordering {
        let ord = self.key.compare(a, b);
        match self.direction {
            SortDirection::Asc => ord,
            SortDirection::Desc => ord.reverse(),
        }
    }
}

/// Recognized list options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListOptions {
    pub sort: Vec<SortSpec>,
    pub limit: u64,
    pub page: u64,
}

impl Default for ListOptions {
    fn default() -> Self {
        Self {
            sort: Vec::new(),
            limit: DEFAULT_LIMIT,
            page: DEFAULT_PAGE,
        }
    }
}

impl ListOptions {
    pub fn new(sort: Vec<SortSpec>, limit: Option<u64>, page: Option<u64>) -> Self {
        Self {
            sort,
            limit: limit.unwrap_or(DEFAULT_LIMIT),
            page: page.unwrap_or(DEFAULT_PAGE),
        }
    }

    /// Get limit, ensuring minimum of 1
    pub fn limit(&self) -> u64 {
        self.limit.max(1)
    }

    /// Get page number, ensuring minimum of 1
    pub fn page(&self) -> u64 {
        self.page.max(1)
    }

    /// Number of matching records to skip
    pub fn skip(&self) -> u64 {
        (self.page() - 1).saturating_mul(self.limit())
    }

    /// Effective sort: the requested terms, or `createdAt` ascending
    pub fn effective_sort(&self) -> Vec<SortSpec> {
        if self.sort.is_empty() {
            vec![SortSpec::asc(SortKey::CreatedAt)]
        } else {
            self.sort.clone()
        }
    }

    /// Total order used by in-process stores; `id` breaks ties
    pub fn compare(&self, a: &Invoice, b: &Invoice) -> Ordering {
        self.effective_sort()
            .iter()
            .map(|spec| spec.compare(a, b))
            .find(|ord| ord.is_ne())
            .unwrap_or_else(|| a.id.cmp(&b.id))
    }
}

/// Paginated response structure
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub results: Vec<T>,
    pub page: u64,
    pub limit: u64,
    pub total_pages: u64,
    pub total_results: u64,
}

impl<T> Page<T> {
    /// Build a page from one slice of results and the total match count
    pub fn new(results: Vec<T>, options: &ListOptions, total_results: u64) -> Self {
        let limit = options.limit();
        Self {
            results,
            page: options.page(),
            limit,
            total_pages: total_results.div_ceil(limit),
            total_results,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            results: self.results.into_iter().map(f).collect(),
            page: self.page,
            limit: self.limit,
            total_pages: self.total_pages,
            total_results: self.total_results,
        }
    }
}
