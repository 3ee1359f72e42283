//! HTTP front end for the todo store.
//!
//! Each handler acquires one connection, runs one statement, and lets the
//! connection drop before the response is built. Store failures propagate
//! with `?` into `ApiError`, which renders them as a generic 500.

pub mod config;
pub mod error;
pub mod logging;
pub mod postgres;

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use tokio::net::TcpListener;
use todo_core::{CreateTodo, Todo, TodoPool, UpdateTodo};

pub use error::ApiError;

/// Shared connection pool, injected as router state.
pub type Pool = Arc<dyn TodoPool>;

pub fn app(pool: Pool) -> Router {
    Router::new()
        .route("/todos", get(list_todos).post(create_todo))
        .route("/todos/{id}", put(update_todo).delete(delete_todo))
        .with_state(pool)
}

/// Serve until Ctrl-C or SIGTERM.
pub async fn run(listener: TcpListener, pool: Pool) -> Result<(), std::io::Error> {
    axum::serve(listener, app(pool))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("shutdown signal received");
}

#[tracing::instrument(skip_all)]
async fn list_todos(State(pool): State<Pool>) -> Result<Json<Vec<Todo>>, ApiError> {
    let mut conn = pool.acquire().await?;
    let todos = conn.list().await?;
    tracing::debug!(count = todos.len(), "listed todos");
    Ok(Json(todos))
}

#[tracing::instrument(skip_all)]
async fn create_todo(
    State(pool): State<Pool>,
    Json(input): Json<CreateTodo>,
) -> Result<(StatusCode, Json<Todo>), ApiError> {
    let mut conn = pool.acquire().await?;
    let todo = conn.insert(&input.title).await?;
    tracing::info!(id = todo.id, "created todo");
    Ok((StatusCode::CREATED, Json(todo)))
}

#[tracing::instrument(skip_all, fields(id = %id))]
async fn update_todo(
    State(pool): State<Pool>,
    Path(id): Path<String>,
    Json(input): Json<UpdateTodo>,
) -> Result<Json<Todo>, ApiError> {
    let mut conn = pool.acquire().await?;
    conn.update(&id, &input.title, input.completed)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound)
}

#[tracing::instrument(skip_all, fields(id = %id))]
async fn delete_todo(
    State(pool): State<Pool>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let mut conn = pool.acquire().await?;
    match conn.delete(&id).await? {
        0 => Err(ApiError::NotFound),
        _ => Ok(StatusCode::NO_CONTENT),
    }
}
