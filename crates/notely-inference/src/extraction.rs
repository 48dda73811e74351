//! Strict parsing of structured-note model output.
//!
//! The model is asked for exactly one JSON object:
//!
//! ```json
//! {"Title": "Badminton at PolyU", "Notes": "Remember to ...", "Tags": ["badminton"]}
//! ```
//!
//! Anything else (prose, code fences, extra keys, more than
//! [`MAX_TAGS`] tags, blank title or notes) is a [`Error::Parse`].
//! [`DraftNote::from_model_output`] turns parse failures into an
//! unstructured fallback note.

use serde::{Deserialize, Serialize};
use tracing::warn;

use notely_core::{normalize_tags, CreateNoteRequest, Error, Result};

/// Maximum number of tags the model may return.
pub const MAX_TAGS: usize = 3;

/// Title used when the model output could not be parsed.
pub const FALLBACK_TITLE: &str = "Generated Note";

/// The model's structured answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StructuredNote {
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Notes")]
    pub notes: String,
    #[serde(rename = "Tags")]
    pub tags: Vec<String>,
}

/// Parse raw model output into a [`StructuredNote`].
///
/// Title and notes are trimmed; tags are normalized after the count check.
pub fn parse_structured_note(raw: &str) -> Result<StructuredNote> {
    let parsed: StructuredNote = serde_json::from_str(raw.trim())
        .map_err(|e| Error::Parse(format!("Model output is not a structured note: {}", e)))?;

    let title = parsed.title.trim();
    if title.is_empty() {
        return Err(Error::Parse("Model output has an empty Title".to_string()));
    }
    let notes = parsed.notes.trim();
    if notes.is_empty() {
        return Err(Error::Parse("Model output has empty Notes".to_string()));
    }
    if parsed.tags.len() > MAX_TAGS {
        return Err(Error::Parse(format!(
            "Model output has {} tags (at most {} allowed)",
            parsed.tags.len(),
            MAX_TAGS
        )));
    }

    Ok(StructuredNote {
        title: title.to_string(),
        notes: notes.to_string(),
        tags: normalize_tags(parsed.tags),
    })
}

/// A note ready to be stored, derived from model output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftNote {
    pub title: String,
    pub content: String,
    pub tags: Vec<String>,
    /// False when the fallback was used.
    pub structured: bool,
}

impl DraftNote {
    /// Build a draft from raw model output, falling back to an unstructured
    /// note when parsing fails.
    ///
    /// Empty output has nothing to fall back to, so the parse error is
    /// returned.
    pub fn from_model_output(raw: &str) -> Result<Self> {
        match parse_structured_note(raw) {
            Ok(note) => Ok(Self {
                title: note.title,
                content: note.notes,
                tags: note.tags,
                structured: true,
            }),
            Err(err) => {
                let content = raw.trim();
                if content.is_empty() {
                    return Err(err);
                }
                warn!(
                    subsystem = "inference",
                    component = "extraction",
                    op = "parse",
                    error = %err,
                    response_len = content.len(),
                    "Unstructured model output, using fallback note"
                );
                Ok(Self {
                    title: FALLBACK_TITLE.to_string(),
                    content: content.to_string(),
                    tags: Vec::new(),
                    structured: false,
                })
            }
        }
    }

    /// Convert into a store create request.
    pub fn into_create_request(self) -> CreateNoteRequest {
        CreateNoteRequest::new(self.title, self.content).with_tags(self.tags)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BADMINTON: &str = r#"{"Title":"Badminton at PolyU","Notes":"Remember to play badminton at 5pm tomorrow at PolyU.","Tags":["badminton","sports"]}"#;

    #[test]
    fn test_parse_valid_output() {
        let note = parse_structured_note(BADMINTON).unwrap();
        assert_eq!(note.title, "Badminton at PolyU");
        assert_eq!(
            note.notes,
            "Remember to play badminton at 5pm tomorrow at PolyU."
        );
        assert_eq!(note.tags, vec!["badminton", "sports"]);
    }

    #[test]
    fn test_parse_tolerates_surrounding_whitespace() {
        let raw = format!("\n  {}  \n", BADMINTON);
        assert!(parse_structured_note(&raw).is_ok());
    }

    #[test]
    fn test_parse_rejects_prose() {
        let err = parse_structured_note("Sure! Here are your notes.").unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
    }

    #[test]
    fn test_parse_rejects_code_fence() {
        let raw = format!("```json\n{}\n```", BADMINTON);
        assert!(matches!(
            parse_structured_note(&raw),
            Err(Error::Parse(_))
        ));
    }

    #[test]
    fn test_parse_rejects_trailing_text() {
        let raw = format!("{} Hope this helps!", BADMINTON);
        assert!(parse_structured_note(&raw).is_err());
    }

    #[test]
    fn test_parse_rejects_unknown_or_alternate_keys() {
        let extra = r#"{"Title":"T","Notes":"N","Tags":[],"Mood":"happy"}"#;
        assert!(parse_structured_note(extra).is_err());

        let lowercase = r#"{"title":"T","notes":"N","tags":[]}"#;
        assert!(parse_structured_note(lowercase).is_err());
    }

    #[test]
    fn test_parse_rejects_missing_tags() {
        assert!(parse_structured_note(r#"{"Title":"T","Notes":"N"}"#).is_err());
    }

    #[test]
    fn test_parse_rejects_too_many_tags() {
        let raw = r#"{"Title":"T","Notes":"N","Tags":["a","b","c","d"]}"#;
        let err = parse_structured_note(raw).unwrap_err();
        assert!(err.to_string().contains("4 tags"));
    }

    #[test]
    fn test_parse_rejects_blank_title() {
        let raw = r#"{"Title":"  ","Notes":"N","Tags":[]}"#;
        assert!(parse_structured_note(raw).is_err());
    }

    #[test]
    fn test_parse_rejects_non_string_tags() {
        let raw = r#"{"Title":"T","Notes":"N","Tags":[1,2]}"#;
        assert!(parse_structured_note(raw).is_err());
    }

    #[test]
    fn test_draft_from_structured_output() {
        let draft = DraftNote::from_model_output(BADMINTON).unwrap();
        assert!(draft.structured);
        assert_eq!(draft.title, "Badminton at PolyU");
        assert_eq!(draft.tags, vec!["badminton", "sports"]);
    }

    #[test]
    fn test_draft_falls_back_on_prose() {
        let draft = DraftNote::from_model_output("  Play badminton tomorrow.  ").unwrap();
        assert!(!draft.structured);
        assert_eq!(draft.title, FALLBACK_TITLE);
        assert_eq!(draft.content, "Play badminton tomorrow.");
        assert!(draft.tags.is_empty());
    }

    #[test]
    fn test_draft_empty_output_is_parse_error() {
        assert!(matches!(
            DraftNote::from_model_output("   "),
            Err(Error::Parse(_))
        ));
    }

    #[test]
    fn test_draft_into_create_request() {
        let req = DraftNote::from_model_output(BADMINTON)
            .unwrap()
            .into_create_request();
        assert_eq!(req.title, "Badminton at PolyU");
        assert_eq!(req.tags, vec!["badminton", "sports"]);
        assert!(req.validate().is_ok());
    }
}
