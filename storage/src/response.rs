//! Uniform result envelope for store operations.
//!
//! Expected failure modes (not-found, conflict, throttling) are values, not
//! panics or raised errors; callers branch on the HTTP-aligned status code.

use crate::error::StoreError;

/// Outcome of a single store operation.
///
/// Invariant: `success` is true exactly when `status_code` is 200, 201 or
/// 204, and `entity` is present only on a data-returning success.
#[derive(Debug)]
pub struct StoreResponse<T> {
    pub success: bool,
    pub status_code: u16,
    pub entity: Option<T>,
    pub error: Option<StoreError>,
}

impl<T> StoreResponse<T> {
    /// 200 – read or replace succeeded.
    pub fn ok(entity: T) -> Self {
        Self {
            success: true,
            status_code: 200,
            entity: Some(entity),
            error: None,
        }
    }

    /// 201 – document created.
    pub fn created(entity: T) -> Self {
        Self {
            success: true,
            status_code: 201,
            entity: Some(entity),
            error: None,
        }
    }

    /// 204 – document deleted; no body.
    pub fn deleted() -> Self {
        Self {
            success: true,
            status_code: 204,
            entity: None,
            error: None,
        }
    }

    /// 404 – the document does not exist. An expected outcome, so no fault
    /// is attached.
    pub fn not_found() -> Self {
        Self {
            success: false,
            status_code: 404,
            entity: None,
            error: None,
        }
    }

    /// 409 – id/key collision on create.
    pub fn conflict(error: StoreError) -> Self {
        Self::failed(409, Some(error))
    }

    /// 429 – the store throttled the request.
    pub fn rate_limited(error: StoreError) -> Self {
        Self::failed(429, Some(error))
    }

    /// 500 – anything unclassified.
    pub fn unexpected(error: StoreError) -> Self {
        Self::failed(500, Some(error))
    }

    /// Builds a failure envelope with an arbitrary status code, e.g. when
    /// re-wrapping a failed response at a different entity type.
    pub fn failed(status_code: u16, error: Option<StoreError>) -> Self {
        Self {
            success: false,
            status_code,
            entity: None,
            error,
        }
    }
}
