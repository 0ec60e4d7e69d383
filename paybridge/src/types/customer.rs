//! Customer records and requests.

use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

use super::{ListQuery, Metadata, Timestamp};

/// A customer known to the active provider.
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    /// Provider-independent identifier.
    pub id: String,
    /// Contact email.
    pub email: Option<String>,
    /// Display name.
    pub name: Option<String>,
    /// Contact phone number.
    pub phone: Option<String>,
    /// Free-form description.
    pub description: Option<String>,
    /// String-to-string annotations.
    pub metadata: Option<Metadata>,
    /// When the provider created the record.
    pub created: Timestamp,
    /// When the provider last updated the record.
    pub updated: Timestamp,
    /// Soft-delete marker.
    pub deleted: Option<bool>,
    /// Name of the provider that owns the record.
    pub provider: String,
    /// The provider's own identifier for the record.
    pub provider_id: String,
}

/// Parameters for creating a customer.
#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCustomerRequest {
    /// Contact email.
    pub email: Option<String>,
    /// Display name.
    pub name: Option<String>,
    /// Contact phone number.
    pub phone: Option<String>,
    /// Free-form description.
    pub description: Option<String>,
    /// String-to-string annotations.
    pub metadata: Option<Metadata>,
}

/// Parameters for updating a customer; absent fields are left untouched.
#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCustomerRequest {
    /// Contact email.
    pub email: Option<String>,
    /// Display name.
    pub name: Option<String>,
    /// Contact phone number.
    pub phone: Option<String>,
    /// Free-form description.
    pub description: Option<String>,
    /// String-to-string annotations.
    pub metadata: Option<Metadata>,
}

/// Filters for listing customers.
#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerListQuery {
    /// Common pagination parameters.
    #[serde(flatten)]
    pub base: ListQuery,
    /// Only customers with this email.
    pub email: Option<String>,
}
