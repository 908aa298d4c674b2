//! Entity models stored in the document collections.

mod user_entity;
mod user_pets_entity;

pub use user_entity::UserEntity;
pub use user_pets_entity::{PetRecord, UserPetsEntity};
