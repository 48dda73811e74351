//! LLM-backed note handlers: generation from free text and translation.
//!
//! Gateway calls run outside any store transaction, so a slow model never
//! holds a database connection.

use axum::{
    extract::{rejection::JsonRejection, rejection::PathRejection, Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use notely_core::{Note, NoteRepository, UpdateNoteRequest};
use notely_inference::DEFAULT_LANGUAGE;

use crate::{ApiError, AppState};

/// Request body for note generation.
#[derive(Debug, Deserialize)]
pub struct GenerateNoteBody {
    /// Free text to structure
    pub text: Option<String>,
    /// Output language (default "English")
    pub language: Option<String>,
}

/// Request body for translation.
#[derive(Debug, Deserialize)]
pub struct TranslateNoteBody {
    pub target_language: Option<String>,
}

/// A generated note together with the text it came from.
#[derive(Debug, Serialize)]
pub struct GeneratedNote {
    #[serde(flatten)]
    pub note: Note,
    pub original_text: String,
}

fn required(value: Option<String>, field: &str) -> Result<String, ApiError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ApiError::BadRequest(format!(
            "Missing required field: {}",
            field
        ))),
    }
}

/// Generate and store a note from free text.
///
/// # Request Body
/// `{ "text": string, "language"?: string }`
///
/// # Returns
/// - 201 Created with the stored note plus `original_text`
/// - 400 Bad Request if `text` is missing or blank
/// - 503 Service Unavailable if the model gateway is unavailable
/// - 500 Internal Server Error if the model failed or returned nothing usable
pub async fn generate_note(
    State(state): State<AppState>,
    body: Result<Json<GenerateNoteBody>, JsonRejection>,
) -> Result<(StatusCode, Json<GeneratedNote>), ApiError> {
    let Json(body) = body?;
    let text = required(body.text, "text")?;
    let language = body
        .language
        .filter(|l| !l.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string());

    let draft = state.assistant.draft_note(&text, &language).await?;
    let note = state.db.notes.insert(draft.into_create_request()).await?;

    Ok((
        StatusCode::CREATED,
        Json(GeneratedNote {
            note,
            original_text: text,
        }),
    ))
}

/// Translate a note's title and content in place.
///
/// The stored note is overwritten with the translation; no copy of the
/// original text is kept.
///
/// # Request Body
/// `{ "target_language": string }`
///
/// # Returns
/// - 200 OK with the updated note
/// - 400 Bad Request if `target_language` is missing or blank
/// - 404 Not Found if the note doesn't exist (checked before calling the model)
/// - 503 Service Unavailable if the model gateway is unavailable
pub async fn translate_note(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    body: Result<Json<TranslateNoteBody>, JsonRejection>,
) -> Result<Json<Note>, ApiError> {
    let Path(id) = id?;
    let Json(body) = body?;
    let target_language = required(body.target_language, "target_language")?;

    let note = state.db.notes.fetch(id).await?;

    let title = state
        .assistant
        .translate(&note.title, &target_language)
        .await?;
    let content = state
        .assistant
        .translate(&note.content, &target_language)
        .await?;

    let updated = state
        .db
        .notes
        .update(
            id,
            UpdateNoteRequest {
                title: Some(title),
                content: Some(content),
                tags: None,
            },
        )
        .await?;

    info!(
        subsystem = "api",
        component = "assist",
        op = "translate",
        note_id = id,
        target_language = %target_language,
        "Note translated in place"
    );
    Ok(Json(updated))
}
