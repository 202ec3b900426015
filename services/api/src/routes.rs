//! API service routes

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde_json::json;

use crate::{
    error::ApiError,
    lifecycle::SessionPatch,
    models::{
        pomodoro::{CreateSessionRequest, SessionState, UpdateSessionRequest},
        settings::UpdateSettingsRequest,
        task::{CreateTaskRequest, ListTasksQuery, UpdateTaskRequest},
    },
    repositories::pomodoro::SessionUpdateError,
    state::AppState,
    validation,
};

/// Create the router for the API service
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/pomodoro/sessions", post(create_session))
        .route(
            "/pomodoro/sessions/:id",
            get(get_session).put(update_session),
        )
        .route("/pomodoro/active", get(get_active_session))
        .route("/pomodoro/stats/today", get(get_stats_today))
        .route("/tasks", post(create_task).get(list_tasks))
        .route(
            "/tasks/:id",
            get(get_task).put(update_task).delete(delete_task),
        )
        .route("/settings", get(get_settings).put(update_settings))
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "focusflow-api"
    }))
}

/// Create a new pomodoro session
pub async fn create_session(
    State(state): State<AppState>,
    Json(payload): Json<CreateSessionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let session_type =
        validation::validate_session_type(&payload.session_type).map_err(ApiError::Validation)?;
    validation::validate_session_duration(payload.duration).map_err(ApiError::Validation)?;

    let session = state
        .session_repository
        .create(session_type, payload.duration, payload.task_id)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create session: {}", e);
            ApiError::InternalServerError
        })?;

    Ok((StatusCode::CREATED, Json(session)))
}

/// Get a pomodoro session by ID
pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let session = state
        .session_repository
        .find_by_id(id)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get session {}: {}", id, e);
            ApiError::InternalServerError
        })?
        .ok_or(ApiError::NotFound("Session not found".to_string()))?;

    Ok(Json(session))
}

/// Get the currently active session, or `null` when none is active
pub async fn get_active_session(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let session = state.session_repository.find_active().await.map_err(|e| {
        tracing::error!("Failed to get active session: {}", e);
        ApiError::InternalServerError
    })?;

    Ok(Json(session))
}

/// Apply a lifecycle patch to a pomodoro session
pub async fn update_session(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateSessionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let patch = session_patch_from_request(&payload)?;

    match state.session_repository.update(id, &patch).await {
        Ok(session) => Ok(Json(session)),
        Err(SessionUpdateError::NotFound) => {
            Err(ApiError::NotFound("Session not found".to_string()))
        }
        Err(SessionUpdateError::Lifecycle(e)) => Err(ApiError::Validation(e.to_string())),
        Err(SessionUpdateError::Database(e)) => {
            tracing::error!("Failed to update session {}: {}", id, e);
            Err(ApiError::InternalServerError)
        }
    }
}

fn session_patch_from_request(payload: &UpdateSessionRequest) -> Result<SessionPatch, ApiError> {
    let state = match payload.state.as_deref() {
        Some(value) => Some(SessionState::parse(value).ok_or_else(|| {
            ApiError::Validation(format!("invalid session state: '{value}'"))
        })?),
        None => None,
    };

    Ok(SessionPatch {
        state,
        started_at: payload.started_at,
        completed_at: payload.completed_at,
        paused_duration_ms: payload.paused_duration_ms,
    })
}

/// Get today's pomodoro statistics
pub async fn get_stats_today(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let stats = state.session_repository.stats_today().await.map_err(|e| {
        tracing::error!("Failed to compute today's stats: {}", e);
        ApiError::InternalServerError
    })?;

    Ok(Json(stats))
}

/// Create a new task
pub async fn create_task(
    State(state): State<AppState>,
    Json(payload): Json<CreateTaskRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validation::validate_task_title(&payload.title).map_err(ApiError::Validation)?;

    let task = state
        .task_repository
        .create(&payload.title, payload.description.as_deref())
        .await
        .map_err(|e| {
            tracing::error!("Failed to create task: {}", e);
            ApiError::InternalServerError
        })?;

    Ok((StatusCode::CREATED, Json(task)))
}

/// List tasks in display order
pub async fn list_tasks(
    State(state): State<AppState>,
    Query(query): Query<ListTasksQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let tasks = state
        .task_repository
        .list(query.include_completed.unwrap_or(true))
        .await
        .map_err(|e| {
            tracing::error!("Failed to list tasks: {}", e);
            ApiError::InternalServerError
        })?;

    Ok(Json(tasks))
}

/// Get a task by ID
pub async fn get_task(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let task = state
        .task_repository
        .find_by_id(id)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get task {}: {}", id, e);
            ApiError::InternalServerError
        })?
        .ok_or(ApiError::NotFound("Task not found".to_string()))?;

    Ok(Json(task))
}

/// Update a task
pub async fn update_task(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateTaskRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if let Some(title) = &payload.title {
        validation::validate_task_title(title).map_err(ApiError::Validation)?;
    }

    let task = state
        .task_repository
        .update(id, &payload)
        .await
        .map_err(|e| {
            tracing::error!("Failed to update task {}: {}", id, e);
            ApiError::InternalServerError
        })?
        .ok_or(ApiError::NotFound("Task not found".to_string()))?;

    Ok(Json(task))
}

/// Delete a task
pub async fn delete_task(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let deleted = state.task_repository.delete(id).await.map_err(|e| {
        tracing::error!("Failed to delete task {}: {}", id, e);
        ApiError::InternalServerError
    })?;

    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound("Task not found".to_string()))
    }
}

/// Get user settings, creating the defaults on first read
pub async fn get_settings(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let settings = state.settings_repository.get().await.map_err(|e| {
        tracing::error!("Failed to get settings: {}", e);
        ApiError::InternalServerError
    })?;

    Ok(Json(settings))
}

/// Overwrite user settings
pub async fn update_settings(
    State(state): State<AppState>,
    Json(payload): Json<UpdateSettingsRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validation::validate_settings(&payload).map_err(ApiError::Validation)?;

    let settings = state
        .settings_repository
        .update(&payload)
        .await
        .map_err(|e| {
            tracing::error!("Failed to update settings: {}", e);
            ApiError::InternalServerError
        })?;

    Ok(Json(settings))
}
