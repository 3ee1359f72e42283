//! In-memory `TodoPool`.
//!
//! Rows live in a `BTreeMap` keyed by id behind a `tokio::sync::RwLock`, so
//! listing is naturally in ascending id order. The pool counts acquisitions
//! and releases and can be told to fail, which lets tests observe the
//! release-on-every-path contract without a database.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{OwnedSemaphorePermit, RwLock, Semaphore};

use crate::error::StoreError;
use crate::store::{TodoConnection, TodoPool};
use crate::types::Todo;

/// Snapshot of a pool's connection counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PoolStats {
    pub acquired: usize,
    pub released: usize,
}

impl PoolStats {
    pub fn in_use(&self) -> usize {
        self.acquired.saturating_sub(self.released)
    }
}

struct Table {
    next_id: i32,
    rows: BTreeMap<i32, Todo>,
}

impl Default for Table {
    fn default() -> Self {
        Self {
            next_id: 1,
            rows: BTreeMap::new(),
        }
    }
}

#[derive(Default)]
struct Shared {
    table: RwLock<Table>,
    acquired: AtomicUsize,
    released: AtomicUsize,
    fail_acquire: AtomicBool,
    fail_statements: AtomicBool,
    permits: Option<Arc<Semaphore>>,
}

/// Cloneable handle to an in-memory todo table. Clones share state.
#[derive(Clone, Default)]
pub struct MemoryPool {
    shared: Arc<Shared>,
}

impl MemoryPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pool that hands out at most `max` connections at once; further
    /// acquisitions wait until one is dropped.
    pub fn with_max_connections(max: usize) -> Self {
        Self {
            shared: Arc::new(Shared {
                permits: Some(Arc::new(Semaphore::new(max))),
                ..Shared::default()
            }),
        }
    }

    pub fn stats(&self) -> PoolStats {
        PoolStats {
            acquired: self.shared.acquired.load(Ordering::SeqCst),
            released: self.shared.released.load(Ordering::SeqCst),
        }
    }

    /// Make every subsequent `acquire` fail.
    pub fn fail_acquire(&self, fail: bool) {
        self.shared.fail_acquire.store(fail, Ordering::SeqCst);
    }

    /// Make every statement on every connection fail.
    pub fn fail_statements(&self, fail: bool) {
        self.shared.fail_statements.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl TodoPool for MemoryPool {
    async fn acquire(&self) -> Result<Box<dyn TodoConnection>, StoreError> {
        if self.shared.fail_acquire.load(Ordering::SeqCst) {
            return Err(StoreError::Acquire("connection pool unavailable".to_string()));
        }
        let permit = match &self.shared.permits {
            Some(sem) => Some(
                sem.clone()
                    .acquire_owned()
                    .await
                    .map_err(|e| StoreError::Acquire(e.to_string()))?,
            ),
            None => None,
        };
        self.shared.acquired.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(MemoryConnection {
            shared: self.shared.clone(),
            _permit: permit,
        }))
    }
}

struct MemoryConnection {
    shared: Arc<Shared>,
    _permit: Option<OwnedSemaphorePermit>,
}

impl MemoryConnection {
    fn check(&self) -> Result<(), StoreError> {
        if self.shared.fail_statements.load(Ordering::SeqCst) {
            return Err(StoreError::Statement("connection reset by peer".to_string()));
        }
        Ok(())
    }
}

impl Drop for MemoryConnection {
    fn drop(&mut self) {
        self.shared.released.fetch_add(1, Ordering::SeqCst);
    }
}

/// Coerce a path segment to the integer id column, as the database would.
/// PostgreSQL's integer input accepts surrounding whitespace.
fn parse_id(id: &str) -> Result<i32, StoreError> {
    id.trim()
        .parse()
        .map_err(|_| StoreError::Statement(format!("invalid input syntax for type integer: \"{id}\"")))
}

#[async_trait]
impl TodoConnection for MemoryConnection {
    async fn list(&mut self) -> Result<Vec<Todo>, StoreError> {
        self.check()?;
        let table = self.shared.table.read().await;
        Ok(table.rows.values().cloned().collect())
    }

    async fn insert(&mut self, title: &str) -> Result<Todo, StoreError> {
        self.check()?;
        let mut table = self.shared.table.write().await;
        let todo = Todo {
            id: table.next_id,
            title: title.to_string(),
            completed: false,
        };
        table.next_id += 1;
        table.rows.insert(todo.id, todo.clone());
        Ok(todo)
    }

    async fn update(
        &mut self,
        id: &str,
        title: &str,
        completed: bool,
    ) -> Result<Option<Todo>, StoreError> {
        self.check()?;
        let id = parse_id(id)?;
        let mut table = self.shared.table.write().await;
        Ok(table.rows.get_mut(&id).map(|todo| {
            todo.title = title.to_string();
            todo.completed = completed;
            todo.clone()
        }))
    }

    async fn delete(&mut self, id: &str) -> Result<u64, StoreError> {
        self.check()?;
        let id = parse_id(id)?;
        let mut table = self.shared.table.write().await;
        Ok(table.rows.remove(&id).map_or(0, |_| 1))
    }
}
