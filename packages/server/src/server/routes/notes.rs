//! Note endpoints - all behind the access gate

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::ApiError;
use crate::domains::notes::Note;
use crate::server::app::AppState;
use crate::server::middleware::AuthUser;

#[derive(Debug, Deserialize)]
pub struct CreateNoteRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct DeleteNoteResponse {
    pub message: String,
}

/// List the caller's notes, newest first.
pub async fn list_notes_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<Note>>, ApiError> {
    let notes = state.deps.notes.list_for_user(user.user_id).await?;
    Ok(Json(notes))
}

pub async fn create_note_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(request): Json<CreateNoteRequest>,
) -> Result<(StatusCode, Json<Note>), ApiError> {
    if request.title.is_empty() || request.content.is_empty() {
        return Err(ApiError::Validation(
            "Title and content are required".into(),
        ));
    }

    let note = state
        .deps
        .notes
        .create(user.user_id, &request.title, &request.content)
        .await?;
    Ok((StatusCode::CREATED, Json(note)))
}

/// Delete a note; only the caller's own notes are visible to the delete.
pub async fn delete_note_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<DeleteNoteResponse>, ApiError> {
    let deleted = state.deps.notes.delete_owned(id, user.user_id).await?;
    if !deleted {
        return Err(ApiError::NotFound("Note not found".into()));
    }

    Ok(Json(DeleteNoteResponse {
        message: "Note deleted successfully".to_string(),
    }))
}
