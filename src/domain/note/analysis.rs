//! Transcript analysis record

use serde::{Deserialize, Serialize};

/// Routing directive extracted from a transcript.
///
/// The tag values match the wire schema the analysis model is asked to
/// produce; an unrecognized tag fails deserialization outright.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Instruction {
    /// File the content as a brand-new note
    NewNote,
    /// Append to today's daily note
    AppendDaily,
    /// Append to a specific page
    AppendToPage {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        target_page: Option<String>,
    },
}

/// Validated output of the transcript analysis call.
///
/// `content` is the cleaned transcript, persisted verbatim. `title` is
/// meaningful only for `NewNote` and may be empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Analysis {
    pub instruction: Instruction,
    #[serde(default)]
    pub title: String,
    pub content: String,
}

impl Analysis {
    /// Whether the record satisfies the schema invariants beyond what
    /// deserialization already enforces: content must be non-empty.
    pub fn has_content(&self) -> bool {
        !self.content.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_new_note() {
        let json = r#"{
            "instruction": { "type": "new_note" },
            "title": "Meeting Notes",
            "content": "Discussed roadmap."
        }"#;

        let analysis: Analysis = serde_json::from_str(json).unwrap();
        assert_eq!(analysis.instruction, Instruction::NewNote);
        assert_eq!(analysis.title, "Meeting Notes");
        assert!(analysis.has_content());
    }

    #[test]
    fn deserializes_append_to_page_with_target() {
        let json = r#"{
            "instruction": { "type": "append_to_page", "target_page": "folder/Ideas.md" },
            "title": "",
            "content": "New idea."
        }"#;

        let analysis: Analysis = serde_json::from_str(json).unwrap();
        assert_eq!(
            analysis.instruction,
            Instruction::AppendToPage {
                target_page: Some("folder/Ideas.md".to_string())
            }
        );
    }

    #[test]
    fn append_to_page_target_is_optional() {
        let json = r#"{
            "instruction": { "type": "append_to_page" },
            "title": "Ideas.md",
            "content": "New idea."
        }"#;

        let analysis: Analysis = serde_json::from_str(json).unwrap();
        assert_eq!(
            analysis.instruction,
            Instruction::AppendToPage { target_page: None }
        );
    }

    #[test]
    fn unknown_instruction_tag_is_rejected() {
        let json = r#"{
            "instruction": { "type": "delete_note" },
            "title": "",
            "content": "x"
        }"#;

        assert!(serde_json::from_str::<Analysis>(json).is_err());
    }

    #[test]
    fn missing_content_is_rejected() {
        let json = r#"{
            "instruction": { "type": "new_note" },
            "title": "No body"
        }"#;

        assert!(serde_json::from_str::<Analysis>(json).is_err());
    }

    #[test]
    fn missing_title_defaults_to_empty() {
        let json = r#"{
            "instruction": { "type": "append_daily" },
            "content": "daily entry"
        }"#;

        let analysis: Analysis = serde_json::from_str(json).unwrap();
        assert_eq!(analysis.title, "");
    }

    #[test]
    fn blank_content_fails_invariant_check() {
        let analysis = Analysis {
            instruction: Instruction::NewNote,
            title: "t".to_string(),
            content: "   ".to_string(),
        };
        assert!(!analysis.has_content());
    }
}
