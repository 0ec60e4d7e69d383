//! Provider-emitted webhook events.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::Timestamp;

/// A notification emitted by the provider, verified and parsed by it.
///
/// The `event_type` string is provider-defined and not constrained by this
/// layer; route on it the way you would on the provider's native event
/// names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookEvent {
    /// Provider-assigned event identifier.
    pub id: String,
    /// Provider-defined event name (e.g. `"payment_intent.succeeded"`).
    #[serde(rename = "type")]
    pub event_type: String,
    /// Event payload, untouched.
    pub data: HashMap<String, serde_json::Value>,
    /// When the provider emitted the event.
    pub created: Timestamp,
    /// Name of the emitting provider.
    pub provider: String,
    /// Whether the event came from a production environment.
    pub livemode: bool,
}
