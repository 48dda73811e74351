//! Prompt templates for note extraction and translation.

use notely_core::ChatMessage;

/// Language used when the caller does not name one.
pub const DEFAULT_LANGUAGE: &str = "English";

/// System instruction for structured note extraction. `{lang}` is replaced
/// with the output language.
const EXTRACTION_SYSTEM_TEMPLATE: &str = r#"Extract the user's notes into the following structured fields:
1. Title: A concise title of the notes less than 5 words
2. Notes: The notes based on user input written in full sentences.
3. Tags (A list): At most 3 Keywords or tags that categorize the content of the notes.
Output in JSON format without ```json. Output title and notes in the language: {lang}.
Example:
Input: "Badminton tmr 5pm @polyu".
Output:
{
    "Title": "Badminton at PolyU",
    "Notes": "Remember to play badminton at 5pm tomorrow at PolyU.",
    "Tags": ["badminton", "sports"]
}"#;

/// System instruction for translation.
pub const TRANSLATION_SYSTEM_PROMPT: &str = "You are a helpful assistant that translates text.";

/// Render the extraction system instruction for `language`.
pub fn extraction_system_prompt(language: &str) -> String {
    EXTRACTION_SYSTEM_TEMPLATE.replace("{lang}", language)
}

/// Render the translation request sent as the user turn.
pub fn translation_user_prompt(text: &str, target_language: &str) -> String {
    format!(
        "Translate the following text to {}: {}",
        target_language, text
    )
}

/// Messages for a structured extraction call.
pub fn extraction_messages(text: &str, language: &str) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(extraction_system_prompt(language)),
        ChatMessage::user(text),
    ]
}

/// Messages for a translation call.
pub fn translation_messages(text: &str, target_language: &str) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(TRANSLATION_SYSTEM_PROMPT),
        ChatMessage::user(translation_user_prompt(text, target_language)),
    ]
}
