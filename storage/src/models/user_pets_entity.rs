//! Pet records owned by a user.
//!
//! The feeding/health simulation lives in the API layer; storage only moves
//! these records around.

use serde::{Deserialize, Serialize};

use crate::entity::DocumentEntity;

/// One pet belonging to a user.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PetRecord {
    pub pet_id: String,
    pub name: String,
    pub animal_type: String,
    pub color: String,
    pub days_old: u32,
    pub health: i32,
    pub is_alive: bool,
}

impl PetRecord {
    /// A newborn pet with default health.
    pub fn new(
        name: impl Into<String>,
        animal_type: impl Into<String>,
        color: impl Into<String>,
    ) -> Self {
        Self {
            pet_id: petsim_core::id::generate_short_id(),
            name: name.into(),
            animal_type: animal_type.into(),
            color: color.into(),
            days_old: 0,
            health: 3,
            is_alive: true,
        }
    }
}

/// The pets document for one user.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPetsEntity {
    pub id: String,
    pub user_id: String,
    pub pets: Vec<PetRecord>,
}

impl UserPetsEntity {
    pub fn for_user(user_id: impl Into<String>, pets: Vec<PetRecord>) -> Self {
        Self {
            id: String::new(),
            user_id: user_id.into(),
            pets,
        }
    }
}

impl DocumentEntity for UserPetsEntity {
    fn document_id(&self) -> &str {
        &self.id
    }

    fn set_document_id(&mut self, id: String) {
        self.id = id;
    }
}
