//! Refunds and disputes.

use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use std::collections::HashMap;
use std::fmt;

use super::{ListQuery, Metadata, Timestamp};

/// Lifecycle states of a refund.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefundStatus {
    /// Submitted, not yet settled.
    Pending,
    /// Funds returned.
    Succeeded,
    /// The refund failed.
    Failed,
    /// Canceled before settlement.
    Canceled,
}

impl RefundStatus {
    /// Returns the wire name of this status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
            Self::Canceled => "canceled",
        }
    }
}

impl fmt::Display for RefundStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Closed set of refund justifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefundReason {
    /// Duplicate charge.
    Duplicate,
    /// Suspected fraud.
    Fraudulent,
    /// Customer asked for the refund.
    RequestedByCustomer,
}

/// A full or partial return of funds for one payment.
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Refund {
    /// Provider-independent identifier.
    pub id: String,
    /// The refunded payment.
    pub payment_id: String,
    /// Amount in minor units.
    pub amount: i64,
    /// ISO 4217 currency code.
    pub currency: String,
    /// Lifecycle state reported by the provider.
    pub status: RefundStatus,
    /// Why the refund was issued.
    pub reason: Option<RefundReason>,
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

/// Parameters for creating a refund.
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRefundRequest {
    /// The payment to refund.
    pub payment_id: String,
    /// Amount in minor units; absent means the full amount.
    pub amount: Option<i64>,
    /// Why the refund is issued.
    pub reason: Option<RefundReason>,
    /// Free-form description.
    pub description: Option<String>,
    /// String-to-string annotations.
    pub metadata: Option<Metadata>,
}

/// Filters for listing refunds.
#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefundListQuery {
    /// Common pagination parameters.
    #[serde(flatten)]
    pub base: ListQuery,
    /// Only refunds for this payment.
    pub payment_id: Option<String>,
}

/// Chargeback lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisputeStatus {
    /// Early-warning inquiry awaiting a response.
    WarningNeedsResponse,
    /// Early-warning inquiry under review.
    WarningUnderReview,
    /// Early-warning inquiry closed.
    WarningClosed,
    /// Formal dispute awaiting a response.
    NeedsResponse,
    /// Evidence submitted, under review.
    UnderReview,
    /// Resolved by refunding the charge.
    ChargeRefunded,
    /// Resolved in the merchant's favor.
    Won,
    /// Resolved in the cardholder's favor.
    Lost,
}

/// Closed set of dispute justifications reported by card networks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisputeReason {
    /// A promised credit never arrived.
    CreditNotProcessed,
    /// Duplicate charge.
    Duplicate,
    /// Suspected fraud.
    Fraudulent,
    /// Unspecified.
    General,
    /// Wrong account was charged.
    IncorrectAccountDetails,
    /// The account lacked funds.
    InsufficientFunds,
    /// Goods or services never arrived.
    ProductNotReceived,
    /// Goods or services were unacceptable.
    ProductUnacceptable,
    /// Charge after the subscription was canceled.
    SubscriptionCanceled,
    /// The cardholder does not recognize the charge.
    Unrecognized,
}

/// A chargeback raised against one payment.
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dispute {
    /// Provider-independent identifier.
    pub id: String,
    /// The disputed payment.
    pub payment_id: String,
    /// Amount in minor units.
    pub amount: i64,
    /// ISO 4217 currency code.
    pub currency: String,
    /// Chargeback lifecycle state.
    pub status: DisputeStatus,
    /// Network-reported reason.
    pub reason: DisputeReason,
    /// Unvalidated evidence bag submitted to the network.
    pub evidence: Option<HashMap<String, serde_json::Value>>,
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

/// Filters for listing disputes.
#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisputeListQuery {
    /// Common pagination parameters.
    #[serde(flatten)]
    pub base: ListQuery,
    /// Only disputes for this payment.
    pub payment_id: Option<String>,
}
