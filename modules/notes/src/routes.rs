//! Axum route handlers for the `/notes` resource.

use crate::error::ApiError;
use crate::repository::{NoteRepository, RepositoryError};
use crate::validation::{self, field_error};
use axum::Router;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Json, Response};
use axum::routing::get;
use notes_types::{Note, NotePayload, ServiceStatus};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

pub struct AppState {
    pub repo: Arc<dyn NoteRepository>,
    pub start_time: Instant,
    pub notes_created: AtomicU64,
    pub notes_updated: AtomicU64,
    pub notes_deleted: AtomicU64,
}

impl AppState {
    pub fn new(repo: Arc<dyn NoteRepository>) -> Self {
        Self {
            repo,
            start_time: Instant::now(),
            notes_created: AtomicU64::new(0),
            notes_updated: AtomicU64::new(0),
            notes_deleted: AtomicU64::new(0),
        }
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    let cors = tower_http::cors::CorsLayer::permissive();

    Router::new()
        .route("/notes", get(list_notes).post(create_note))
        .route("/notes/:id", get(get_note).put(upsert_note).delete(delete_note))
        .route("/status", get(status))
        .with_state(state)
        .layer(cors)
}

fn path_id(path: Result<Path<i64>, PathRejection>) -> Result<i64, ApiError> {
    path.map(|Path(id)| id)
        .map_err(|e| ApiError::Validation(field_error("id", e.body_text())))
}

fn payload(body: Result<Json<NotePayload>, JsonRejection>) -> Result<NotePayload, ApiError> {
    body.map(|Json(p)| p)
        .map_err(|e| ApiError::Validation(field_error("body", e.body_text())))
}

fn created(note: Note) -> Response {
    let location = format!("/notes/{}", note.id);
    (StatusCode::CREATED, [(header::LOCATION, location)], Json(note)).into_response()
}

// GET /notes
pub async fn list_notes(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Note>>, ApiError> {
    let notes = state.repo.list_all().await?;
    Ok(Json(notes))
}

// GET /notes/:id
pub async fn get_note(
    State(state): State<Arc<AppState>>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<Note>, ApiError> {
    let id = path_id(path)?;

    if !state.repo.exists(id).await? {
        return Err(ApiError::NotFound(id));
    }

    // Deleted between the two calls
    let note = state.repo.get_by_id(id).await?.ok_or(ApiError::NotFound(id))?;
    Ok(Json(note))
}

// POST /notes
pub async fn create_note(
    State(state): State<Arc<AppState>>,
    body: Result<Json<NotePayload>, JsonRejection>,
) -> Result<Response, ApiError> {
    let note = validation::validate_new(payload(body)?).map_err(ApiError::Validation)?;

    if state.repo.exists(note.id).await? {
        return Err(ApiError::Conflict(note.id));
    }

    let note = state.repo.add(note).await?;
    state.notes_created.fetch_add(1, Ordering::Relaxed);
    log::info!("[NOTES] Created note {}", note.id);

    Ok(created(note))
}

// PUT /notes/:id
pub async fn upsert_note(
    State(state): State<Arc<AppState>>,
    path: Result<Path<i64>, PathRejection>,
    body: Result<Json<NotePayload>, JsonRejection>,
) -> Result<Response, ApiError> {
    let id = path_id(path)?;
    let note = validation::validate_replacement(id, payload(body)?).map_err(ApiError::Validation)?;

    if !state.repo.exists(id).await? {
        match state.repo.add(note.clone()).await {
            Ok(note) => {
                state.notes_created.fetch_add(1, Ordering::Relaxed);
                log::info!("[NOTES] Created note {} via PUT", id);
                return Ok(created(note));
            }
            // Someone else created it first; treat the request as an update
            Err(RepositoryError::Duplicate(_)) => {}
            Err(e) => return Err(e.into()),
        }
    }

    state.repo.update(note).await?;
    state.notes_updated.fetch_add(1, Ordering::Relaxed);
    log::info!("[NOTES] Updated note {}", id);

    Ok(StatusCode::NO_CONTENT.into_response())
}

// DELETE /notes/:id
pub async fn delete_note(
    State(state): State<Arc<AppState>>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let id = path_id(path)?;

    if !state.repo.remove(id).await? {
        return Err(ApiError::NotFound(id));
    }

    state.notes_deleted.fetch_add(1, Ordering::Relaxed);
    log::info!("[NOTES] Deleted note {}", id);
    Ok(StatusCode::OK)
}

// GET /status
pub async fn status(State(state): State<Arc<AppState>>) -> Json<ServiceStatus> {
    Json(ServiceStatus {
        running: true,
        uptime_secs: state.start_time.elapsed().as_secs(),
        backend: state.repo.backend().to_string(),
        notes_created: state.notes_created.load(Ordering::Relaxed),
        notes_updated: state.notes_updated.load(Ordering::Relaxed),
        notes_deleted: state.notes_deleted.load(Ordering::Relaxed),
    })
}
