//! Store fault taxonomy.
//!
//! A provider fault can carry more than one signal at once (a throttled
//! lookup that also missed); the predicate methods expose each signal so the
//! repository can classify them in a fixed priority order.

use std::time::Duration;

use thiserror::Error;

/// Faults reported by a document store.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    #[error("document not found")]
    NotFound,

    #[error("document id already exists")]
    Conflict,

    #[error("request was throttled by the store")]
    RateLimited { retry_after: Option<Duration> },

    #[error("store request timed out")]
    Timeout,

    /// Anything else the provider reported, with whatever status and
    /// throttle signal came with it.
    #[error("provider fault (status {status:?}): {message}")]
    Provider {
        status: Option<u16>,
        rate_limited: bool,
        message: String,
    },
}

impl StoreError {
    /// Builds an unclassified provider fault with only a message.
    pub fn provider(message: impl Into<String>) -> Self {
        StoreError::Provider {
            status: None,
            rate_limited: false,
            message: message.into(),
        }
    }

    pub fn is_rate_limited(&self) -> bool {
        matches!(self, StoreError::RateLimited { .. })
            || matches!(
                self,
                StoreError::Provider {
                    rate_limited: true,
                    ..
                } | StoreError::Provider {
                    status: Some(429),
                    ..
                }
            )
    }

    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            StoreError::NotFound
                | StoreError::Provider {
                    status: Some(404),
                    ..
                }
        )
    }

    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            StoreError::Conflict
                | StoreError::Provider {
                    status: Some(409),
                    ..
                }
        )
    }
}
