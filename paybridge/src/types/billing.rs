//! Subscriptions, invoices, and the product/price catalog.

use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use std::fmt;

use super::{ListQuery, Metadata, Timestamp};

/// Lifecycle states of a subscription, as reported by the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    /// First payment not yet completed.
    Incomplete,
    /// First payment window expired.
    IncompleteExpired,
    /// In a trial period.
    Trialing,
    /// Paid and current.
    Active,
    /// A renewal payment failed.
    PastDue,
    /// Canceled.
    Canceled,
    /// Renewal attempts exhausted.
    Unpaid,
    /// Temporarily paused.
    Paused,
}

impl SubscriptionStatus {
    /// Returns the wire name of this status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Incomplete => "incomplete",
            Self::IncompleteExpired => "incomplete_expired",
            Self::Trialing => "trialing",
            Self::Active => "active",
            Self::PastDue => "past_due",
            Self::Canceled => "canceled",
            Self::Unpaid => "unpaid",
            Self::Paused => "paused",
        }
    }
}

impl fmt::Display for SubscriptionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A recurring billing agreement for one customer.
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    /// Provider-independent identifier.
    pub id: String,
    /// The subscribed customer.
    pub customer_id: String,
    /// Lifecycle state reported by the provider.
    pub status: SubscriptionStatus,
    /// Start of the current billing period.
    pub current_period_start: Timestamp,
    /// End of the current billing period.
    pub current_period_end: Timestamp,
    /// Defer cancellation to the period boundary.
    #[serde(default)]
    pub cancel_at_period_end: bool,
    /// When the subscription was canceled, if it was.
    pub canceled_at: Option<Timestamp>,
    /// Trial window start.
    pub trial_start: Option<Timestamp>,
    /// Trial window end.
    pub trial_end: Option<Timestamp>,
    /// String-to-string annotations.
    pub metadata: Option<Metadata>,
    /// When the provider created the record.
    pub created: Timestamp,
    /// When the provider last updated the record.
    pub updated: Timestamp,
    /// Name of the provider that owns the record.
    pub provider: String,
    /// The provider's own identifier for the record.
    pub provider_id: String,
}

/// Parameters for creating a subscription.
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSubscriptionRequest {
    /// The subscribing customer.
    pub customer_id: String,
    /// The price to subscribe to.
    pub price_id: String,
    /// Length of the trial window in days.
    pub trial_period_days: Option<u32>,
    /// String-to-string annotations.
    pub metadata: Option<Metadata>,
    /// Payment method to charge.
    pub payment_method_id: Option<String>,
}

/// Partial update of a subscription; absent fields are left untouched.
#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSubscriptionRequest {
    /// Switch to this price.
    pub price_id: Option<String>,
    /// Defer cancellation to the period boundary.
    pub cancel_at_period_end: Option<bool>,
    /// String-to-string annotations.
    pub metadata: Option<Metadata>,
    /// Payment method to charge.
    pub payment_method_id: Option<String>,
}

/// Filters for listing subscriptions.
#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionListQuery {
    /// Common pagination parameters.
    #[serde(flatten)]
    pub base: ListQuery,
    /// Only subscriptions for this customer.
    pub customer_id: Option<String>,
    /// Only subscriptions in this state.
    pub status: Option<SubscriptionStatus>,
}

/// Lifecycle states of an invoice, as reported by the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    /// Editable, not yet issued.
    Draft,
    /// Issued and awaiting payment.
    Open,
    /// Fully paid.
    Paid,
    /// Voided.
    Void,
    /// Written off as uncollectible.
    Uncollectible,
}

impl InvoiceStatus {
    /// Returns the wire name of this status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Open => "open",
            Self::Paid => "paid",
            Self::Void => "void",
            Self::Uncollectible => "uncollectible",
        }
    }
}

impl fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A bill for one customer, optionally tied to a subscription.
///
/// The provider keeps the monetary breakdown consistent:
/// `total = subtotal + tax` and `amount_due = total - amount_paid`.
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    /// Provider-independent identifier.
    pub id: String,
    /// The billed customer.
    pub customer_id: String,
    /// The subscription this invoice bills, if any.
    pub subscription_id: Option<String>,
    /// Lifecycle state reported by the provider.
    pub status: InvoiceStatus,
    /// Invoice amount in minor units.
    pub amount: i64,
    /// ISO 4217 currency code.
    pub currency: String,
    /// Amount already paid, in minor units.
    #[serde(default)]
    pub amount_paid: i64,
    /// Amount still owed, in minor units.
    pub amount_due: i64,
    /// Pre-tax amount in minor units.
    pub subtotal: i64,
    /// Tax in minor units.
    #[serde(default)]
    pub tax: i64,
    /// Post-tax total in minor units.
    pub total: i64,
    /// Free-form description.
    pub description: Option<String>,
    /// Provider-hosted payment page.
    pub hosted_invoice_url: Option<String>,
    /// Provider-generated PDF.
    pub invoice_pdf: Option<String>,
    /// String-to-string annotations.
    pub metadata: Option<Metadata>,
    /// When the provider created the record.
    pub created: Timestamp,
    /// When the provider last updated the record.
    pub updated: Timestamp,
    /// Payment due date.
    pub due_date: Option<Timestamp>,
    /// When the invoice was paid, if it was.
    pub paid_at: Option<Timestamp>,
    /// Name of the provider that owns the record.
    pub provider: String,
    /// The provider's own identifier for the record.
    pub provider_id: String,
}

/// Parameters for creating an invoice.
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateInvoiceRequest {
    /// The billed customer.
    pub customer_id: String,
    /// The subscription this invoice bills, if any.
    pub subscription_id: Option<String>,
    /// Invoice amount in minor units; must be positive.
    pub amount: i64,
    /// ISO 4217 currency code.
    pub currency: String,
    /// Free-form description.
    pub description: Option<String>,
    /// String-to-string annotations.
    pub metadata: Option<Metadata>,
    /// Payment due date.
    pub due_date: Option<Timestamp>,
}

/// Partial update of an invoice; absent fields are left untouched.
#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateInvoiceRequest {
    /// Free-form description.
    pub description: Option<String>,
    /// String-to-string annotations.
    pub metadata: Option<Metadata>,
    /// Payment due date.
    pub due_date: Option<Timestamp>,
}

/// Filters for listing invoices.
#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceListQuery {
    /// Common pagination parameters.
    #[serde(flatten)]
    pub base: ListQuery,
    /// Only invoices for this customer.
    pub customer_id: Option<String>,
    /// Only invoices for this subscription.
    pub subscription_id: Option<String>,
    /// Only invoices in this state.
    pub status: Option<InvoiceStatus>,
}

/// A sellable item in the provider's catalog.
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Provider-independent identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Free-form description.
    pub description: Option<String>,
    /// String-to-string annotations.
    pub metadata: Option<Metadata>,
    /// When the provider created the record.
    pub created: Timestamp,
    /// When the provider last updated the record.
    pub updated: Timestamp,
    /// Name of the provider that owns the record.
    pub provider: String,
    /// The provider's own identifier for the record.
    pub provider_id: String,
}

/// Parameters for creating a product.
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
    /// Display name.
    pub name: String,
    /// Free-form description.
    pub description: Option<String>,
    /// String-to-string annotations.
    pub metadata: Option<Metadata>,
}

/// Partial update of a product; absent fields are left untouched.
#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductRequest {
    /// Display name.
    pub name: Option<String>,
    /// Free-form description.
    pub description: Option<String>,
    /// String-to-string annotations.
    pub metadata: Option<Metadata>,
}

/// Filters for listing products.
#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductListQuery {
    /// Common pagination parameters.
    #[serde(flatten)]
    pub base: ListQuery,
}

/// Recurring billing interval for a price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceInterval {
    /// Bill daily.
    Day,
    /// Bill weekly.
    Week,
    /// Bill monthly.
    Month,
    /// Bill yearly.
    Year,
}

/// A price attached to a product, one-time or recurring.
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Price {
    /// Provider-independent identifier.
    pub id: String,
    /// The priced product.
    pub product_id: String,
    /// Amount in minor units.
    pub amount: i64,
    /// ISO 4217 currency code.
    pub currency: String,
    /// Billing interval; absent for one-time prices.
    pub interval: Option<PriceInterval>,
    /// Number of intervals per billing period.
    pub interval_count: Option<u32>,
    /// String-to-string annotations.
    pub metadata: Option<Metadata>,
    /// When the provider created the record.
    pub created: Timestamp,
    /// When the provider last updated the record.
    pub updated: Timestamp,
    /// Name of the provider that owns the record.
    pub provider: String,
    /// The provider's own identifier for the record.
    pub provider_id: String,
}

/// Parameters for creating a price.
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePriceRequest {
    /// The priced product.
    pub product_id: String,
    /// Amount in minor units.
    pub amount: i64,
    /// ISO 4217 currency code.
    pub currency: String,
    /// Billing interval; absent for one-time prices.
    pub interval: Option<PriceInterval>,
    /// Number of intervals per billing period.
    pub interval_count: Option<u32>,
    /// String-to-string annotations.
    pub metadata: Option<Metadata>,
}

/// Partial update of a price; absent fields are left untouched.
#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePriceRequest {
    /// String-to-string annotations.
    pub metadata: Option<Metadata>,
}

/// Filters for listing prices.
#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceListQuery {
    /// Common pagination parameters.
    #[serde(flatten)]
    pub base: ListQuery,
    /// Only prices for this product.
    pub product_id: Option<String>,
}
