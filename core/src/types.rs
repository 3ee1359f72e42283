//! Domain DTOs for the todo API.
//!
//! # Design
//! `Todo` is the row shape of the `todos` table and the JSON shape of every
//! success body. Request payloads are separate types so the handler only ever
//! sees the fields each operation accepts: `CreateTodo` has no `completed`
//! field (unknown JSON fields are ignored), and `UpdateTodo` requires both
//! fields because an update replaces the whole record.

use serde::{Deserialize, Serialize};

/// Message carried by every not-found response.
pub const NOT_FOUND_MESSAGE: &str = "TODO not found";

/// Message carried by every store-failure response.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// A single todo row. `id` is assigned by the store and never changes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Todo {
    pub id: i32,
    pub title: String,
    pub completed: bool,
}

/// Request payload for `POST /todos`. New todos always start incomplete.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTodo {
    pub title: String,
}

/// Request payload for `PUT /todos/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateTodo {
    pub title: String,
    pub completed: bool,
}

/// Structured JSON error body: `{"error": "..."}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }

    pub fn not_found() -> Self {
        Self::new(NOT_FOUND_MESSAGE)
    }

    pub fn internal() -> Self {
        Self::new(INTERNAL_ERROR_MESSAGE)
    }
}
