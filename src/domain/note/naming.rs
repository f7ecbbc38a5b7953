//! Naming resolver
//!
//! Computes a collision-free file name for a new note. Pure and
//! deterministic: the result depends only on the existing identifiers
//! and the requested title.

use super::identifier::{basename, ensure_md_extension, NOTE_EXTENSION};

/// Resolve a unique note name against the existing identifiers.
///
/// The candidate starts as the title with the `.md` extension ensured.
/// On a basename collision, a trailing `" <digits>.md"` suffix is
/// stripped from the title to recover the canonical base, and
/// `"<base> 1.md"`, `"<base> 2.md"`, ... are probed in order. Terminates
/// within `existing.len() + 1` probes.
pub fn unique_note_name(existing: &[String], base_title: &str) -> String {
    let mut candidate = ensure_md_extension(base_title);
    let base = strip_numeric_suffix(base_title);

    let mut counter = 1usize;
    while existing.iter().any(|path| basename(path) == candidate) {
        candidate = format!("{} {}{}", base, counter, NOTE_EXTENSION);
        counter += 1;
    }

    candidate
}

/// Strip a trailing `" <digits>.md"` (or bare `".md"`) from a title to
/// recover the base used for suffix probing.
fn strip_numeric_suffix(title: &str) -> &str {
    let Some(stem) = title.strip_suffix(NOTE_EXTENSION) else {
        return title;
    };
    if let Some((head, tail)) = stem.rsplit_once(' ') {
        if !tail.is_empty() && tail.bytes().all(|b| b.is_ascii_digit()) {
            return head;
        }
    }
    stem
}
