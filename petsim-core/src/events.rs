//! Domain event payloads and their message-type tags.
//!
//! The tag travels as the queue message subject; the payload is the JSON
//! body. Producers and the worker agree on both through this module.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A user account was created.
pub const USER_REGISTER: &str = "USER_REGISTER";
/// A user account was removed.
pub const USER_UNREGISTER: &str = "USER_UNREGISTER";
/// A pet was fed, exercised or otherwise acted upon.
pub const PET_STATUS_UPDATE: &str = "PET_STATUS_UPDATE";

/// Payload for [`USER_REGISTER`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRegisteredEvent {
    pub user_id: String,
    pub username: String,
    pub email: String,
}

/// Payload for [`USER_UNREGISTER`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserUnregisteredEvent {
    pub user_id: String,
}

/// Payload for [`PET_STATUS_UPDATE`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PetStatusUpdate {
    pub pet_id: String,
    pub action: String,
    pub action_timestamp: DateTime<Utc>,
}
