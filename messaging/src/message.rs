//! Transport message and logical envelope.
//!
//! [`QueueMessage`] is what crosses the wire: body bytes plus the subject
//! (type tag), correlation id and application properties. The logical
//! [`MessageEnvelope`] view is reconstructed on the consuming side.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Application-property key carrying the transaction id.
pub const TRANSACTION_ID_PROPERTY: &str = "TransactionId";

/// A single queue message as the transport sees it.
#[derive(Debug, Clone)]
pub struct QueueMessage {
    pub body: Vec<u8>,
    pub message_id: String,
    pub correlation_id: String,
    pub subject: String,
    pub application_properties: HashMap<String, String>,
}

impl QueueMessage {
    /// Stamps a fresh message id and threads the transaction id through the
    /// correlation id and application properties.
    pub fn new(subject: impl Into<String>, body: Vec<u8>, transaction_id: &str) -> Self {
        let mut application_properties = HashMap::new();
        application_properties.insert(
            TRANSACTION_ID_PROPERTY.to_string(),
            transaction_id.to_string(),
        );
        Self {
            body,
            message_id: Uuid::new_v4().to_string(),
            correlation_id: transaction_id.to_string(),
            subject: subject.into(),
            application_properties,
        }
    }
}

/// The logical message: type tag, correlation id and typed payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageEnvelope<T> {
    pub message_type: String,
    pub transaction_id: String,
    pub payload: T,
}

impl MessageEnvelope<Value> {
    /// Rebuilds the envelope from a transport message, decoding the body as
    /// JSON. Fails only on a malformed body.
    pub fn from_message(message: &QueueMessage) -> Result<Self, serde_json::Error> {
        let payload = serde_json::from_slice(&message.body)?;
        Ok(Self {
            message_type: message.subject.clone(),
            transaction_id: message.correlation_id.clone(),
            payload,
        })
    }
}
