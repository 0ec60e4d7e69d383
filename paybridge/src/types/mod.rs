//! Normalized data model shared by every provider.
//!
//! Entities are immutable value snapshots returned by provider calls. Each
//! carries a provider-independent `id` alongside the mirrored `provider_id`
//! assigned by the concrete backend, so a record can always be traced back
//! to the provider that produced it. This layer never caches or mutates an
//! entity; every call produces a fresh snapshot.
//!
//! All wire-facing types serialize as camelCase JSON. Amounts are integer
//! minor units (cents, paise, ...). Metadata maps are string-to-string with
//! no ordering guarantee; the only unconstrained bag is
//! [`Dispute::evidence`](refund::Dispute).

use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use std::collections::HashMap;

pub mod billing;
pub mod customer;
pub mod payment;
pub mod refund;
pub mod usage;
pub mod webhook;

pub use billing::{
    CreateInvoiceRequest, CreatePriceRequest, CreateProductRequest, CreateSubscriptionRequest,
    Invoice, InvoiceListQuery, InvoiceStatus, Price, PriceInterval, PriceListQuery, Product,
    ProductListQuery, Subscription, SubscriptionListQuery, SubscriptionStatus,
    UpdateInvoiceRequest, UpdatePriceRequest, UpdateProductRequest, UpdateSubscriptionRequest,
};
pub use customer::{CreateCustomerRequest, Customer, CustomerListQuery, UpdateCustomerRequest};
pub use payment::{
    CaptureMethod, CreatePaymentIntentRequest, CreatePaymentMethodRequest, PaymentIntent,
    PaymentIntentListQuery, PaymentIntentStatus, PaymentMethod, PaymentMethodType,
    UpdatePaymentIntentRequest, UpdatePaymentMethodRequest,
};
pub use refund::{
    CreateRefundRequest, Dispute, DisputeListQuery, DisputeReason, DisputeStatus, Refund,
    RefundListQuery, RefundReason, RefundStatus,
};
pub use usage::{AiUsageMetrics, UsageMetrics, UsagePeriod};
pub use webhook::WebhookEvent;

/// UTC timestamp attached to every entity.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Free-form string-to-string annotations carried by most entities.
pub type Metadata = HashMap<String, String>;

/// Uniform success/failure envelope returned by every facade operation.
///
/// On failure `data` is the operation's natural empty value (`None` for
/// single entities, an empty collection for lists) and `error` carries the
/// classified error's message. Only the message crosses the boundary, so
/// the envelope stays serializable.
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    /// The operation result, absent on failure.
    pub data: Option<T>,
    /// Whether the provider call succeeded.
    pub success: bool,
    /// Classified error message, present on failure.
    pub error: Option<String>,
    /// Optional annotations attached by the caller or provider.
    pub metadata: Option<Metadata>,
}

impl<T> ApiResponse<T> {
    /// Wraps a successful result.
    #[must_use]
    pub fn ok(data: T) -> Self {
        Self {
            data: Some(data),
            success: true,
            error: None,
            metadata: None,
        }
    }

    /// Wraps a failure with no data.
    #[must_use]
    pub fn err(message: impl Into<String>) -> Self {
        Self {
            data: None,
            success: false,
            error: Some(message.into()),
            metadata: None,
        }
    }
}

impl<T> ApiResponse<Vec<T>> {
    /// Wraps a failure whose natural empty value is an empty collection.
    #[must_use]
    pub fn err_empty(message: impl Into<String>) -> Self {
        Self {
            data: Some(Vec::new()),
            success: false,
            error: Some(message.into()),
            metadata: None,
        }
    }
}

/// Cursor-paginated page of entities.
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListPage<T> {
    /// The entities in this page.
    pub data: Vec<T>,
    /// Whether more entities exist beyond this page.
    pub has_more: bool,
    /// Total matching entities, if the provider reports it.
    pub total_count: Option<u64>,
    /// Cursor for the next page.
    pub next_cursor: Option<String>,
    /// Cursor for the previous page.
    pub prev_cursor: Option<String>,
}

impl<T> Default for ListPage<T> {
    fn default() -> Self {
        Self {
            data: Vec::new(),
            has_more: false,
            total_count: None,
            next_cursor: None,
            prev_cursor: None,
        }
    }
}

impl<T> ListPage<T> {
    /// Creates a page from items with no further pages.
    #[must_use]
    pub fn from_items(data: Vec<T>) -> Self {
        Self {
            data,
            ..Self::default()
        }
    }
}

/// What a provider may return from a paginated list operation.
///
/// Providers follow one of two conventions: a bare array of entities or a
/// full [`ListPage`]. The facade normalizes both to the page form, so
/// callers always see the envelope shape.
#[derive(Debug, Clone)]
pub enum ListOutput<T> {
    /// Bare-array convention; normalized to a page with `has_more: false`.
    Items(Vec<T>),
    /// Full page, passed through unchanged.
    Page(ListPage<T>),
}

impl<T> ListOutput<T> {
    /// Normalizes into the page form.
    #[must_use]
    pub fn into_page(self) -> ListPage<T> {
        match self {
            Self::Items(data) => ListPage::from_items(data),
            Self::Page(page) => page,
        }
    }
}

impl<T> From<Vec<T>> for ListOutput<T> {
    fn from(items: Vec<T>) -> Self {
        Self::Items(items)
    }
}

impl<T> From<ListPage<T>> for ListOutput<T> {
    fn from(page: ListPage<T>) -> Self {
        Self::Page(page)
    }
}

/// Creation-time range filter for list queries.
#[skip_serializing_none]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedFilter {
    /// Only entities created at or after this instant.
    pub gte: Option<Timestamp>,
    /// Only entities created at or before this instant.
    pub lte: Option<Timestamp>,
}

/// Common pagination parameters shared by every list operation.
///
/// `limit` is expected in 1–100; enforcement is delegated to the provider,
/// like all other request validation.
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    /// Page size, 1–100.
    #[serde(default = "default_limit")]
    pub limit: u8,
    /// Cursor: return entities after this id.
    pub starting_after: Option<String>,
    /// Cursor: return entities before this id.
    pub ending_before: Option<String>,
    /// Creation-time range filter.
    pub created: Option<CreatedFilter>,
}

const fn default_limit() -> u8 {
    10
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            limit: default_limit(),
            starting_after: None,
            ending_before: None,
            created: None,
        }
    }
}
