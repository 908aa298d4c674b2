//! Transaction-id minting for log correlation.
//!
//! A transaction id is an opaque string threaded through a logical operation
//! across the repository, publisher and worker so one request can be traced
//! across process boundaries.

use uuid::Uuid;

/// Mints a fresh transaction id (UUID v4).
pub fn new_transaction_id() -> String {
    Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transaction_ids_are_unique() {
        assert_ne!(new_transaction_id(), new_transaction_id());
    }
}
