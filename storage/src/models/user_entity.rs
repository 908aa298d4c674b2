//! User account record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entity::DocumentEntity;

/// A user account document. Field names follow the wire format of the HTTP
/// layer (camelCase).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserEntity {
    pub id: String,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserEntity {
    /// Creates an account record with current timestamps. The id is a
    /// placeholder; the repository assigns the real one on add.
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        password_hash: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: String::new(),
            username: username.into(),
            email: email.into(),
            password_hash: password_hash.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            created_at: now,
            updated_at: now,
        }
    }
}

impl DocumentEntity for UserEntity {
    fn document_id(&self) -> &str {
        &self.id
    }

    fn set_document_id(&mut self, id: String) {
        self.id = id;
    }
}
