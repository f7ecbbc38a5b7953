//! Note domain types
//!
//! Value objects for routed notes: the analysis record extracted from a
//! transcript, note identifiers and version tokens, and the naming
//! resolver that picks collision-free file names.

mod analysis;
mod identifier;
mod naming;

pub use analysis::{Analysis, Instruction};
pub use identifier::{
    basename, daily_note_identifier, ensure_md_extension, StoredNote, VersionToken, NOTE_EXTENSION,
};
pub use naming::unique_note_name;
