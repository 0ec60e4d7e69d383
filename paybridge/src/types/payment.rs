//! Payment methods and payment intents.

use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use std::fmt;

use super::{ListQuery, Metadata, Timestamp};

/// Closed set of payment instrument families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethodType {
    /// Credit or debit card.
    Card,
    /// Direct bank account (ACH, SEPA, ...).
    BankAccount,
    /// Unified Payments Interface.
    Upi,
    /// Stored-value wallet.
    Wallet,
    /// Net banking redirect flow.
    Netbanking,
    /// Equated monthly installments.
    Emi,
}

impl PaymentMethodType {
    /// Returns the wire name of this type.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Card => "card",
            Self::BankAccount => "bank_account",
            Self::Upi => "upi",
            Self::Wallet => "wallet",
            Self::Netbanking => "netbanking",
            Self::Emi => "emi",
        }
    }
}

impl fmt::Display for PaymentMethodType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored payment instrument belonging to exactly one customer.
///
/// At most one method per customer carries `is_default`; that invariant is
/// enforced by the provider, not this layer.
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentMethod {
    /// Provider-independent identifier.
    pub id: String,
    /// The owning customer.
    pub customer_id: String,
    /// Instrument family.
    #[serde(rename = "type")]
    pub method_type: PaymentMethodType,
    /// Card brand (visa, mastercard, ...), for card-like methods.
    pub brand: Option<String>,
    /// Last four digits, for card-like methods.
    pub last4: Option<String>,
    /// Card expiry month, for card-like methods.
    pub expiry_month: Option<u8>,
    /// Card expiry year, for card-like methods.
    pub expiry_year: Option<u16>,
    /// Whether this is the customer's default method.
    #[serde(default)]
    pub is_default: bool,
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

/// Parameters for creating a payment method.
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentMethodRequest {
    /// The owning customer.
    pub customer_id: String,
    /// Instrument family.
    #[serde(rename = "type")]
    pub method_type: PaymentMethodType,
    /// Provider-issued token for the raw instrument details.
    pub token: Option<String>,
    /// String-to-string annotations.
    pub metadata: Option<Metadata>,
}

/// Parameters for updating a payment method.
#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePaymentMethodRequest {
    /// String-to-string annotations.
    pub metadata: Option<Metadata>,
}

/// Lifecycle states of a payment intent, as reported by the provider.
///
/// This layer carries the value without enforcing transition legality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentIntentStatus {
    /// No payment method attached yet.
    RequiresPaymentMethod,
    /// Awaiting explicit confirmation.
    RequiresConfirmation,
    /// Awaiting customer action (3DS, redirect).
    RequiresAction,
    /// The provider is processing the payment.
    Processing,
    /// Authorized; awaiting capture.
    RequiresCapture,
    /// Canceled before completion.
    Canceled,
    /// Funds captured.
    Succeeded,
    /// The payment failed.
    Failed,
}

impl PaymentIntentStatus {
    /// Returns the wire name of this status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::RequiresPaymentMethod => "requires_payment_method",
            Self::RequiresConfirmation => "requires_confirmation",
            Self::RequiresAction => "requires_action",
            Self::Processing => "processing",
            Self::RequiresCapture => "requires_capture",
            Self::Canceled => "canceled",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for PaymentIntentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// When captured funds are taken: immediately on confirmation or by an
/// explicit capture call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaptureMethod {
    /// Capture as soon as the payment is confirmed.
    #[default]
    Automatic,
    /// Hold the authorization until an explicit capture.
    Manual,
}

/// An in-flight payment for a single customer.
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentIntent {
    /// Provider-independent identifier.
    pub id: String,
    /// The paying customer.
    pub customer_id: String,
    /// Amount in minor units.
    pub amount: i64,
    /// ISO 4217 currency code.
    pub currency: String,
    /// Lifecycle state reported by the provider.
    pub status: PaymentIntentStatus,
    /// Client-side secret for completing the payment, if the provider
    /// issues one.
    pub client_secret: Option<String>,
    /// Free-form description.
    pub description: Option<String>,
    /// String-to-string annotations.
    pub metadata: Option<Metadata>,
    /// The payment method in use, once attached.
    pub payment_method_id: Option<String>,
    /// Email for the receipt.
    pub receipt_email: Option<String>,
    /// When the provider created the record.
    pub created: Timestamp,
    /// When the provider last updated the record.
    pub updated: Timestamp,
    /// Name of the provider that owns the record.
    pub provider: String,
    /// The provider's own identifier for the record.
    pub provider_id: String,
}

/// Parameters for creating a payment intent.
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentIntentRequest {
    /// The paying customer.
    pub customer_id: String,
    /// Amount in minor units; must be positive.
    pub amount: i64,
    /// ISO 4217 currency code.
    pub currency: String,
    /// Free-form description.
    pub description: Option<String>,
    /// String-to-string annotations.
    pub metadata: Option<Metadata>,
    /// Payment method to attach immediately.
    pub payment_method_id: Option<String>,
    /// Email for the receipt.
    pub receipt_email: Option<String>,
    /// Capture behavior; defaults to automatic.
    #[serde(default)]
    pub capture_method: CaptureMethod,
}

/// Partial update of a payment intent; absent fields are left untouched.
#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePaymentIntentRequest {
    /// Amount in minor units.
    pub amount: Option<i64>,
    /// Free-form description.
    pub description: Option<String>,
    /// String-to-string annotations.
    pub metadata: Option<Metadata>,
    /// Payment method to attach.
    pub payment_method_id: Option<String>,
    /// Email for the receipt.
    pub receipt_email: Option<String>,
}

/// Filters for listing payment intents.
#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentIntentListQuery {
    /// Common pagination parameters.
    #[serde(flatten)]
    pub base: ListQuery,
    /// Only intents for this customer.
    pub customer_id: Option<String>,
    /// Only intents in this state.
    pub status: Option<PaymentIntentStatus>,
}
