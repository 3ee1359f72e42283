//! PostgreSQL-backed `TodoPool`.
//!
//! Expects an existing table:
//!
//! ```sql
//! CREATE TABLE todos (
//!     id        SERIAL PRIMARY KEY,
//!     title     TEXT NOT NULL,
//!     completed BOOLEAN NOT NULL DEFAULT false
//! );
//! ```

use std::time::Duration;

use async_trait::async_trait;
use sqlx::pool::PoolConnection;
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::{FromRow, Postgres};
use todo_core::{StoreError, Todo, TodoConnection, TodoPool};

const LIST_SQL: &str = "SELECT id, title, completed FROM todos ORDER BY id ASC";
const INSERT_SQL: &str =
    "INSERT INTO todos (title, completed) VALUES ($1, false) RETURNING id, title, completed";
const UPDATE_SQL: &str = "UPDATE todos SET title = $1, completed = $2 WHERE id = $3::integer \
                          RETURNING id, title, completed";
const DELETE_SQL: &str = "DELETE FROM todos WHERE id = $1::integer";

#[derive(FromRow)]
struct TodoRow {
    id: i32,
    title: String,
    completed: bool,
}

impl From<TodoRow> for Todo {
    fn from(row: TodoRow) -> Self {
        Todo {
            id: row.id,
            title: row.title,
            completed: row.completed,
        }
    }
}

fn statement_error(e: sqlx::Error) -> StoreError {
    StoreError::Statement(e.to_string())
}

/// PostgreSQL connection pool.
#[derive(Clone, Debug)]
pub struct PgTodoPool {
    pool: PgPool,
}

impl PgTodoPool {
    pub async fn connect(
        database_url: &str,
        max_connections: u32,
        acquire_timeout: Duration,
    ) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(acquire_timeout)
            .connect(database_url)
            .await?;

        tracing::info!(max_connections, "PostgreSQL connection pool established");
        Ok(Self { pool })
    }

    pub async fn health_check(&self) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl TodoPool for PgTodoPool {
    async fn acquire(&self) -> Result<Box<dyn TodoConnection>, StoreError> {
        let conn = self
            .pool
            .acquire()
            .await
            .map_err(|e| StoreError::Acquire(e.to_string()))?;
        Ok(Box::new(PgTodoConnection { conn }))
    }
}

/// `PoolConnection` returns itself to the pool on drop.
struct PgTodoConnection {
    conn: PoolConnection<Postgres>,
}

#[async_trait]
impl TodoConnection for PgTodoConnection {
    async fn list(&mut self) -> Result<Vec<Todo>, StoreError> {
        let rows = sqlx::query_as::<_, TodoRow>(LIST_SQL)
            .fetch_all(&mut *self.conn)
            .await
            .map_err(statement_error)?;
        Ok(rows.into_iter().map(Todo::from).collect())
    }

    async fn insert(&mut self, title: &str) -> Result<Todo, StoreError> {
        sqlx::query_as::<_, TodoRow>(INSERT_SQL)
            .bind(title)
            .fetch_one(&mut *self.conn)
            .await
            .map(Todo::from)
            .map_err(statement_error)
    }

    async fn update(
        &mut self,
        id: &str,
        title: &str,
        completed: bool,
    ) -> Result<Option<Todo>, StoreError> {
        let row = sqlx::query_as::<_, TodoRow>(UPDATE_SQL)
            .bind(title)
            .bind(completed)
            .bind(id)
            .fetch_optional(&mut *self.conn)
            .await
            .map_err(statement_error)?;
        Ok(row.map(Todo::from))
    }

    async fn delete(&mut self, id: &str) -> Result<u64, StoreError> {
        let res = sqlx::query(DELETE_SQL)
            .bind(id)
            .execute(&mut *self.conn)
            .await
            .map_err(statement_error)?;
        Ok(res.rows_affected())
    }
}
