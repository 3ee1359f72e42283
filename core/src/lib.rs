//! Domain types and store seam for the todo service.
//!
//! # Overview
//! The HTTP handler talks to the database only through `TodoPool` and
//! `TodoConnection`. The server crate provides a PostgreSQL pool; this crate
//! provides `MemoryPool`, an in-process table used by tests and by the server
//! when no database is configured.
//!
//! # Design
//! - A connection is released by dropping it, so release cannot be skipped.
//! - Zero matching rows is an ordinary return value, not a `StoreError`.
//! - DTOs carry no database or framework attributes.

pub mod error;
pub mod memory;
pub mod store;
pub mod types;

pub use error::StoreError;
pub use memory::{MemoryPool, PoolStats};
pub use store::{TodoConnection, TodoPool};
pub use types::{CreateTodo, ErrorBody, Todo, UpdateTodo};
