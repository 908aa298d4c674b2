//! Storage crate: resilient document persistence for the pet-simulation
//! backend.
//!
//! ## Modules
//!
//! - [`error`] – store fault taxonomy
//! - [`response`] – uniform `StoreResponse<T>` envelope with HTTP-aligned codes
//! - [`store`] – the narrow document-store boundary (read/create/replace/
//!   delete plus paginated parameterized query)
//! - [`entity`] – trait every stored record implements
//! - [`repository`] – generic CRUD/query engine returning `StoreResponse`
//! - [`models`] – UserEntity, UserPetsEntity, PetRecord
//! - [`user_repo`] / [`pet_repo`] – per-entity lookups atop the query primitive
//! - [`memory_store`] – in-memory `DocumentStore` implementation

pub mod entity;
pub mod error;
pub mod memory_store;
pub mod models;
pub mod pet_repo;
pub mod repository;
pub mod response;
pub mod store;
pub mod user_repo;


pub use entity::DocumentEntity;
pub use error::StoreError;
pub use memory_store::InMemoryDocumentStore;
pub use models::{PetRecord, UserEntity, UserPetsEntity};
pub use pet_repo::PetRepository;
pub use repository::{DocumentRepository, StoreOptions};
pub use response::StoreResponse;
pub use store::{DocumentStore, Page, QuerySpec};
pub use user_repo::UserRepository;
