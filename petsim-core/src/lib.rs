//! Shared core for the pet-simulation backend services.
//!
//! ## Modules
//!
//! - [`events`] – domain event payloads and message-type tags
//! - [`id`] – document id generation
//! - [`logger`] – tracing initialization
//! - [`trace`] – transaction-id minting for log correlation

pub mod events;
pub mod id;
pub mod logger;
pub mod trace;

pub use events::{PetStatusUpdate, UserRegisteredEvent, UserUnregisteredEvent};
pub use id::generate_short_id;
pub use trace::new_transaction_id;
