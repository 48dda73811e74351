//! Core data models for notely.
//!
//! These types are shared across all notely crates and represent
//! the core domain entities.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

// =============================================================================
// NOTE TYPES
// =============================================================================

/// A persisted note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: i64,
    pub title: String,
    pub content: String,
    /// Ordered tag list. Empty when the note has no tags.
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request for creating a new note.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateNoteRequest {
    pub title: String,
    pub content: String,
    pub tags: Vec<String>,
}

impl CreateNoteRequest {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            tags: Vec::new(),
        }
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Reject blank title or content.
    pub fn validate(&self) -> Result<()> {
        require_text("Title", &self.title)?;
        require_text("Content", &self.content)?;
        Ok(())
    }
}

/// Partial update for a note. `None` fields keep their stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateNoteRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub tags: Option<Vec<String>>,
}

impl UpdateNoteRequest {
    /// True when the request carries no field to change.
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none() && self.tags.is_none()
    }

    /// Reject empty requests and blank replacement text.
    pub fn validate(&self) -> Result<()> {
        if self.is_empty() {
            return Err(Error::InvalidInput("No data provided".to_string()));
        }
        if let Some(title) = &self.title {
            require_text("Title", title)?;
        }
        if let Some(content) = &self.content {
            require_text("Content", content)?;
        }
        Ok(())
    }
}

fn require_text(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::InvalidInput(format!("{} must not be empty", field)));
    }
    Ok(())
}

/// Trim tags and drop blank ones, keeping the caller's order.
pub fn normalize_tags(tags: Vec<String>) -> Vec<String> {
    tags.into_iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect()
}

// =============================================================================
// CHAT TYPES
// =============================================================================

/// A single chat message sent to a generation backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Sampling parameters for a chat completion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplingParams {
    pub temperature: f32,
    pub top_p: f32,
}

impl Default for SamplingParams {
    fn default() -> Self {
        Self {
            temperature: 1.0,
            top_p: 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_request_validate_ok() {
        let req = CreateNoteRequest::new("Badminton", "Play at 5pm");
        assert!(req.validate().is_ok());
        assert!(req.tags.is_empty());
    }

    #[test]
    fn test_create_request_rejects_blank_title() {
        let err = CreateNoteRequest::new("   ", "content").validate().unwrap_err();
        assert!(matches!(err, Error::InvalidInput(ref m) if m.contains("Title")));
    }

    #[test]
    fn test_create_request_rejects_empty_content() {
        let err = CreateNoteRequest::new("title", "").validate().unwrap_err();
        assert!(matches!(err, Error::InvalidInput(ref m) if m.contains("Content")));
    }

    #[test]
    fn test_update_request_empty() {
        let req = UpdateNoteRequest::default();
        assert!(req.is_empty());
        assert!(matches!(req.validate(), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_update_request_tags_only_is_valid() {
        let req = UpdateNoteRequest {
            tags: Some(vec![]),
            ..Default::default()
        };
        assert!(!req.is_empty());
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_update_request_rejects_blank_content() {
        let req = UpdateNoteRequest {
            content: Some(" \n".to_string()),
            ..Default::default()
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_normalize_tags_keeps_order_and_commas() {
        let tags = normalize_tags(vec![
            " sports ".to_string(),
            "".to_string(),
            "a, b".to_string(),
            "badminton".to_string(),
        ]);
        assert_eq!(tags, vec!["sports", "a, b", "badminton"]);
    }

    #[test]
    fn test_note_serializes_expected_shape() {
        let now = Utc::now();
        let note = Note {
            id: 7,
            title: "t".into(),
            content: "c".into(),
            tags: vec!["x".into()],
            created_at: now,
            updated_at: now,
        };
        let json = serde_json::to_value(&note).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["tags"], serde_json::json!(["x"]));
        assert!(json["created_at"].is_string());
        assert!(json["updated_at"].is_string());
    }

    #[test]
    fn test_chat_message_constructors() {
        assert_eq!(ChatMessage::system("s").role, "system");
        assert_eq!(ChatMessage::user("u").role, "user");
    }

    #[test]
    fn test_sampling_defaults() {
        let p = SamplingParams::default();
        assert_eq!(p.temperature, 1.0);
        assert_eq!(p.top_p, 1.0);
    }
}
