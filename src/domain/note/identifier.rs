//! Note identifiers, version tokens, and stored notes

use std::fmt;

use chrono::NaiveDate;

/// File extension carried by every note identifier
pub const NOTE_EXTENSION: &str = ".md";

/// Final path segment of an identifier.
///
/// Collision checks compare basenames case-sensitively, so a candidate
/// `Foo.md` collides with an existing `folder/Foo.md`.
pub fn basename(identifier: &str) -> &str {
    match identifier.rfind('/') {
        Some(idx) => &identifier[idx + 1..],
        None => identifier,
    }
}

/// Append the note extension unless the name already carries it
pub fn ensure_md_extension(name: &str) -> String {
    if name.ends_with(NOTE_EXTENSION) {
        name.to_string()
    } else {
        format!("{}{}", name, NOTE_EXTENSION)
    }
}

/// Identifier of the daily note for the given UTC calendar date
pub fn daily_note_identifier(date: NaiveDate) -> String {
    format!("{}{}", date.format("%Y-%m-%d"), NOTE_EXTENSION)
}

/// Opaque optimistic-concurrency token supplied by a backend on read and
/// required on update. Only equality is meaningful.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionToken(String);

impl VersionToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VersionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A note as read from or written to a backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredNote {
    pub identifier: String,
    pub content: String,
    pub version_token: VersionToken,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basename_of_nested_path() {
        assert_eq!(basename("folder/sub/Note.md"), "Note.md");
    }

    #[test]
    fn basename_of_root_identifier() {
        assert_eq!(basename("Note.md"), "Note.md");
    }

    #[test]
    fn ensure_md_extension_appends() {
        assert_eq!(ensure_md_extension("Note"), "Note.md");
    }

    #[test]
    fn ensure_md_extension_keeps_existing() {
        assert_eq!(ensure_md_extension("Note.md"), "Note.md");
    }

    #[test]
    fn ensure_md_extension_is_case_sensitive() {
        // "Note.MD" does not carry the canonical extension
        assert_eq!(ensure_md_extension("Note.MD"), "Note.MD.md");
    }

    #[test]
    fn daily_identifier_format() {
        let date = NaiveDate::from_ymd_opt(2026, 8, 30).unwrap();
        assert_eq!(daily_note_identifier(date), "2026-08-30.md");
    }

    #[test]
    fn version_tokens_compare_by_value() {
        assert_eq!(VersionToken::new("abc"), VersionToken::new("abc"));
        assert_ne!(VersionToken::new("abc"), VersionToken::new("def"));
    }
}
