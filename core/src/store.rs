//! Connection pool and connection seam between the handler and the database.
//!
//! # Design
//! A request acquires one `TodoConnection` from a `TodoPool`, runs exactly one
//! statement on it, and drops it. Dropping the boxed connection is the
//! release: implementations hand the underlying connection back to their pool
//! in `Drop`, so release happens once on every exit path, including a `?`
//! return after a failed statement.
//!
//! Ids arrive as the raw path segment. Coercing them to the column type is
//! the store's job; text that is not an integer is a `StoreError`.

use async_trait::async_trait;

use crate::error::StoreError;
use crate::types::Todo;

/// Source of connections to the relational store.
#[async_trait]
pub trait TodoPool: Send + Sync {
    /// Take a connection, waiting if the pool is exhausted.
    async fn acquire(&self) -> Result<Box<dyn TodoConnection>, StoreError>;
}

/// One pooled connection. Returned to its pool when dropped.
#[async_trait]
pub trait TodoConnection: Send {
    /// Every row, ordered by ascending id.
    async fn list(&mut self) -> Result<Vec<Todo>, StoreError>;

    /// Insert a new incomplete row and return it with its assigned id.
    async fn insert(&mut self, title: &str) -> Result<Todo, StoreError>;

    /// Replace `title` and `completed` of the row with `id`.
    /// `None` when no row matched.
    async fn update(
        &mut self,
        id: &str,
        title: &str,
        completed: bool,
    ) -> Result<Option<Todo>, StoreError>;

    /// Delete the row with `id`, returning the number of rows removed.
    async fn delete(&mut self, id: &str) -> Result<u64, StoreError>;
}
