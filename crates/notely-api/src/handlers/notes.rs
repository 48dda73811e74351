//! Note CRUD and search handlers.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use notely_core::{CreateNoteRequest, Note, NoteRepository, UpdateNoteRequest};

use crate::{ApiError, AppState};

/// Request body for creating a note.
#[derive(Debug, Deserialize)]
pub struct CreateNoteBody {
    pub title: Option<String>,
    pub content: Option<String>,
    pub tags: Option<Vec<String>>,
}

/// Request body for a partial update. Absent fields keep their value.
#[derive(Debug, Deserialize)]
pub struct UpdateNoteBody {
    pub title: Option<String>,
    pub content: Option<String>,
    pub tags: Option<Vec<String>>,
}

/// List all notes, most recently updated first.
///
/// # Returns
/// - 200 OK with array of notes
/// - 500 Internal Server Error if database query fails
pub async fn list_notes(State(state): State<AppState>) -> Result<Json<Vec<Note>>, ApiError> {
    let notes = state.db.notes.list_all().await?;
    Ok(Json(notes))
}

/// Get a note by id.
///
/// # Returns
/// - 200 OK with the note
/// - 400 Bad Request if the id is not an integer
/// - 404 Not Found if the note doesn't exist
pub async fn get_note(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Note>, ApiError> {
    let Path(id) = id?;
    let note = state.db.notes.fetch(id).await?;
    Ok(Json(note))
}

/// Create a note.
///
/// # Request Body
/// `{ "title": string, "content": string, "tags"?: [string] }`
///
/// # Returns
/// - 201 Created with the stored note
/// - 400 Bad Request if title or content is missing or blank
/// - 500 Internal Server Error if database insert fails
pub async fn create_note(
    State(state): State<AppState>,
    body: Result<Json<CreateNoteBody>, JsonRejection>,
) -> Result<(StatusCode, Json<Note>), ApiError> {
    let Json(body) = body?;
    let title = body
        .title
        .ok_or_else(|| ApiError::BadRequest("Missing required field: title".to_string()))?;
    let content = body
        .content
        .ok_or_else(|| ApiError::BadRequest("Missing required field: content".to_string()))?;

    let req = CreateNoteRequest::new(title, content).with_tags(body.tags.unwrap_or_default());
    req.validate()?;

    let note = state.db.notes.insert(req).await?;
    Ok((StatusCode::CREATED, Json(note)))
}

/// Update a note in place.
///
/// # Request Body
/// Any subset of `{ "title", "content", "tags" }`; at least one is required.
///
/// # Returns
/// - 200 OK with the updated note
/// - 400 Bad Request if the body is empty or a field is blank
/// - 404 Not Found if the note doesn't exist
pub async fn update_note(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    body: Result<Json<UpdateNoteBody>, JsonRejection>,
) -> Result<Json<Note>, ApiError> {
    let Path(id) = id?;
    let Json(body) = body?;

    let req = UpdateNoteRequest {
        title: body.title,
        content: body.content,
        tags: body.tags,
    };
    req.validate()?;

    let note = state.db.notes.update(id, req).await?;
    Ok(Json(note))
}

/// Permanently delete a note.
///
/// # Returns
/// - 204 No Content on success
/// - 404 Not Found if the note doesn't exist
pub async fn delete_note(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let Path(id) = id?;
    state.db.notes.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Case-insensitive substring search over title and content.
///
/// # Query Parameters
/// - `q`: search text; empty or absent returns an empty array. When `q`
///   repeats, the first value is used.
///
/// # Returns
/// - 200 OK with matching notes, most recently updated first
/// - 400 Bad Request if the query string cannot be decoded
pub async fn search_notes(
    State(state): State<AppState>,
    params: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<Json<Vec<Note>>, ApiError> {
    let Query(params) = params?;
    let q = params
        .iter()
        .find(|(key, _)| key == "q")
        .map(|(_, value)| value.as_str())
        .unwrap_or_default();

    let notes = state.db.notes.search(q).await?;
    Ok(Json(notes))
}
