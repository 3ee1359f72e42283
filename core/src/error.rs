//! Error types for the todo store.
//!
//! # Design
//! Only infrastructure failures are errors here. "No row matched" is not:
//! `TodoConnection::update` returns `None` and `TodoConnection::delete`
//! returns an affected-row count of zero, and the handler decides what that
//! means for the response.

use thiserror::Error;

/// Failures raised by a `TodoPool` or one of its connections.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No connection could be taken from the pool.
    #[error("failed to acquire connection: {0}")]
    Acquire(String),

    /// A statement was rejected or could not be executed.
    #[error("statement failed: {0}")]
    Statement(String),
}
