pub mod user_registered;
pub mod user_unregistered;

pub use user_registered::UserRegisteredHandler;
pub use user_unregistered::UserUnregisteredHandler;
