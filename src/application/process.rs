//! Process voice note use case
//!
//! The routing engine: transcribes a recording, extracts the routing
//! instruction, resolves the target identifier, and performs exactly one
//! durable store mutation. Holds no state across invocations.

use chrono::Utc;
use thiserror::Error;
use tracing::debug;

use crate::domain::audio::{AudioData, AudioMimeType, ScratchAudio};
use crate::domain::error::AudioError;
use crate::domain::note::{
    daily_note_identifier, ensure_md_extension, unique_note_name, Analysis, Instruction,
    NOTE_EXTENSION,
};

use super::ports::{
    AnalysisError, FileStore, StoreError, Transcriber, TranscriptAnalyzer, TranscriptionError,
};

/// Separator inserted between daily note entries
const DAILY_SEPARATOR: &str = "\n\n---\n\n";

/// Horizontal rule prefix for a freshly created daily note
const DAILY_PREFIX: &str = "---\n\n";

/// Separator inserted when appending to an ordinary page
const PAGE_SEPARATOR: &str = "\n\n";

/// Fallback title when the analyzer produces none
const UNTITLED: &str = "Untitled Note";

/// Errors from the process voice note use case
#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("Audio decoding failed: {0}")]
    Audio(#[from] AudioError),

    #[error("Transcription failed: {0}")]
    Transcription(#[from] TranscriptionError),

    #[error("Transcript analysis failed: {0}")]
    Analysis(#[from] AnalysisError),

    #[error("append_to_page instruction carried no resolvable target page")]
    MissingTarget,

    #[error("Store operation failed: {0}")]
    Store(#[from] StoreError),
}

/// Input for the process voice note use case
#[derive(Debug)]
pub struct ProcessInput {
    /// Decoded recording, released when the run finishes
    pub audio: ScratchAudio,
    /// Language hint for the transcription call
    pub language: String,
}

impl ProcessInput {
    /// Build input from a base64-encoded recording
    pub fn from_base64(
        encoded: &str,
        mime_type: AudioMimeType,
        language: impl Into<String>,
    ) -> Result<Self, AudioError> {
        Ok(Self {
            audio: ScratchAudio::new(AudioData::from_base64(encoded, mime_type)?),
            language: language.into(),
        })
    }
}

/// How the note was persisted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistedAction {
    Created,
    Appended,
}

/// Output from the process voice note use case
#[derive(Debug, Clone)]
pub struct ProcessOutput {
    /// Identifier of the persisted note
    pub identifier: String,
    /// The raw transcript (before cleaning)
    pub transcript: String,
    /// Whether the note was created or appended to
    pub action: PersistedAction,
}

/// Voice note routing use case
pub struct ProcessVoiceNoteUseCase<T, A, S>
where
    T: Transcriber,
    A: TranscriptAnalyzer,
    S: FileStore,
{
    transcriber: T,
    analyzer: A,
    store: S,
}

impl<T, A, S> ProcessVoiceNoteUseCase<T, A, S>
where
    T: Transcriber,
    A: TranscriptAnalyzer,
    S: FileStore,
{
    /// Create a new use case instance
    pub fn new(transcriber: T, analyzer: A, store: S) -> Self {
        Self {
            transcriber,
            analyzer,
            store,
        }
    }

    /// Execute the full pipeline for one voice note.
    ///
    /// Takes ownership of the scratch audio so its release hook runs on
    /// every exit path. At most one durable mutation happens per run;
    /// any error aborts the run and is surfaced unchanged.
    pub async fn execute(&self, input: ProcessInput) -> Result<ProcessOutput, ProcessError> {
        let ProcessInput { audio, language } = input;

        let transcript = self.transcriber.transcribe(audio.data(), &language).await?;
        debug!(chars = transcript.len(), "transcription complete");

        // One listing snapshot feeds both the analyzer (linking context)
        // and the naming resolver.
        let existing = self.store.list_identifiers().await?;

        let analysis = self.analyzer.analyze(&transcript, &existing).await?;
        debug!(instruction = ?analysis.instruction, "transcript analyzed");

        let (identifier, action) = self.route(&analysis, &existing).await?;

        Ok(ProcessOutput {
            identifier,
            transcript,
            action,
        })
    }

    /// Dispatch on the instruction and perform the terminal store call
    async fn route(
        &self,
        analysis: &Analysis,
        existing: &[String],
    ) -> Result<(String, PersistedAction), ProcessError> {
        match &analysis.instruction {
            Instruction::AppendDaily => {
                let identifier = daily_note_identifier(Utc::now().date_naive());
                self.append(
                    &identifier,
                    &analysis.content,
                    DAILY_SEPARATOR,
                    DAILY_PREFIX,
                    "Append voice note to daily note".to_string(),
                    "Create daily note with voice note".to_string(),
                )
                .await
            }
            Instruction::AppendToPage { target_page } => {
                let identifier = resolve_target_page(target_page.as_deref(), &analysis.title)?;
                self.append(
                    &identifier,
                    &analysis.content,
                    PAGE_SEPARATOR,
                    "",
                    format!("Append voice note to {}", identifier),
                    format!("Create {} from voice note append instruction", identifier),
                )
                .await
            }
            Instruction::NewNote => {
                let title = analysis.title.trim();
                let title = if title.is_empty() { UNTITLED } else { title };
                let identifier = unique_note_name(existing, title);
                debug!(%identifier, "creating new note");

                let stored = self
                    .store
                    .create(
                        &identifier,
                        &analysis.content,
                        &format!("Create {} from voice recording", identifier),
                    )
                    .await?;
                Ok((stored.identifier, PersistedAction::Created))
            }
        }
    }

    /// Read-then-write append. A missing target branches to creation;
    /// any other read error, and any version mismatch on update, aborts
    /// the run.
    async fn append(
        &self,
        identifier: &str,
        content: &str,
        separator: &str,
        absent_prefix: &str,
        append_label: String,
        create_label: String,
    ) -> Result<(String, PersistedAction), ProcessError> {
        match self.store.read(identifier).await {
            Ok(note) => {
                debug!(%identifier, "appending to existing note");
                let merged = format!("{}{}{}", note.content, separator, content);
                let stored = self
                    .store
                    .update(identifier, &merged, &note.version_token, &append_label)
                    .await?;
                Ok((stored.identifier, PersistedAction::Appended))
            }
            Err(StoreError::NotFound(_)) => {
                debug!(%identifier, "target absent, creating");
                let initial = format!("{}{}", absent_prefix, content);
                let stored = self.store.create(identifier, &initial, &create_label).await?;
                Ok((stored.identifier, PersistedAction::Created))
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// Resolve the identifier for an `append_to_page` instruction.
///
/// An empty target falls back to the title only when the title already
/// carries the note extension; otherwise the instruction is unusable.
fn resolve_target_page(
    target_page: Option<&str>,
    title: &str,
) -> Result<String, ProcessError> {
    match target_page.map(str::trim).filter(|s| !s.is_empty()) {
        Some(page) => Ok(ensure_md_extension(page)),
        None => {
            let title = title.trim();
            if !title.is_empty() && title.ends_with(NOTE_EXTENSION) {
                Ok(title.to_string())
            } else {
                Err(ProcessError::MissingTarget)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;

    use super::*;
    use crate::domain::note::{StoredNote, VersionToken};

    struct MockTranscriber;

    #[async_trait]
    impl Transcriber for MockTranscriber {
        async fn transcribe(
            &self,
            _audio: &AudioData,
            _language: &str,
        ) -> Result<String, TranscriptionError> {
            Ok("raw transcript".to_string())
        }
    }

    struct MockAnalyzer {
        result: Result<Analysis, AnalysisError>,
    }

    #[async_trait]
    impl TranscriptAnalyzer for MockAnalyzer {
        async fn analyze(
            &self,
            _transcript: &str,
            _existing: &[String],
        ) -> Result<Analysis, AnalysisError> {
            self.result.clone()
        }
    }

    /// Store call record for assertions
    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Call {
        List,
        Read(String),
        Create { identifier: String, content: String },
        Update { identifier: String, content: String, token: String },
    }

    #[derive(Default)]
    struct MockStore {
        calls: Arc<Mutex<Vec<Call>>>,
        listing: Vec<String>,
        notes: Vec<StoredNote>,
        update_error: Option<StoreError>,
    }

    impl MockStore {
        fn with_note(mut self, identifier: &str, content: &str, token: &str) -> Self {
            self.listing.push(identifier.to_string());
            self.notes.push(StoredNote {
                identifier: identifier.to_string(),
                content: content.to_string(),
                version_token: VersionToken::new(token),
            });
            self
        }

        fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl FileStore for MockStore {
        async fn list_identifiers(&self) -> Result<Vec<String>, StoreError> {
            self.calls.lock().unwrap().push(Call::List);
            Ok(self.listing.clone())
        }

        async fn read(&self, identifier: &str) -> Result<StoredNote, StoreError> {
            self.calls
                .lock()
                .unwrap()
                .push(Call::Read(identifier.to_string()));
            self.notes
                .iter()
                .find(|n| n.identifier == identifier)
                .cloned()
                .ok_or_else(|| StoreError::NotFound(identifier.to_string()))
        }

        async fn create(
            &self,
            identifier: &str,
            content: &str,
            _commit_label: &str,
        ) -> Result<StoredNote, StoreError> {
            self.calls.lock().unwrap().push(Call::Create {
                identifier: identifier.to_string(),
                content: content.to_string(),
            });
            Ok(StoredNote {
                identifier: identifier.to_string(),
                content: content.to_string(),
                version_token: VersionToken::new("new"),
            })
        }

        async fn update(
            &self,
            identifier: &str,
            content: &str,
            version_token: &VersionToken,
            _commit_label: &str,
        ) -> Result<StoredNote, StoreError> {
            self.calls.lock().unwrap().push(Call::Update {
                identifier: identifier.to_string(),
                content: content.to_string(),
                token: version_token.as_str().to_string(),
            });
            if let Some(err) = &self.update_error {
                return Err(err.clone());
            }
            Ok(StoredNote {
                identifier: identifier.to_string(),
                content: content.to_string(),
                version_token: VersionToken::new("updated"),
            })
        }
    }

    fn analysis(instruction: Instruction, title: &str) -> Analysis {
        Analysis {
            instruction,
            title: title.to_string(),
            content: "cleaned content".to_string(),
        }
    }

    fn input() -> ProcessInput {
        ProcessInput {
            audio: ScratchAudio::new(AudioData::new(vec![0u8; 8], AudioMimeType::Webm)),
            language: "en".to_string(),
        }
    }

    fn use_case(
        analyzer_result: Result<Analysis, AnalysisError>,
        store: MockStore,
    ) -> ProcessVoiceNoteUseCase<MockTranscriber, MockAnalyzer, MockStore> {
        ProcessVoiceNoteUseCase::new(
            MockTranscriber,
            MockAnalyzer {
                result: analyzer_result,
            },
            store,
        )
    }

    #[tokio::test]
    async fn append_daily_creates_when_absent() {
        let uc = use_case(Ok(analysis(Instruction::AppendDaily, "")), MockStore::default());
        let today = daily_note_identifier(Utc::now().date_naive());

        let output = uc.execute(input()).await.unwrap();

        assert_eq!(output.identifier, today);
        assert_eq!(output.action, PersistedAction::Created);
        let calls = uc.store.calls();
        assert_eq!(
            calls,
            vec![
                Call::List,
                Call::Read(today.clone()),
                Call::Create {
                    identifier: today,
                    content: "---\n\ncleaned content".to_string(),
                },
            ]
        );
    }

    #[tokio::test]
    async fn append_daily_updates_with_separator_and_token() {
        let today = daily_note_identifier(Utc::now().date_naive());
        let store = MockStore::default().with_note(&today, "X", "sha-1");
        let uc = use_case(Ok(analysis(Instruction::AppendDaily, "")), store);

        let output = uc.execute(input()).await.unwrap();

        assert_eq!(output.action, PersistedAction::Appended);
        let calls = uc.store.calls();
        assert_eq!(
            calls[2],
            Call::Update {
                identifier: today,
                content: "X\n\n---\n\ncleaned content".to_string(),
                token: "sha-1".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn append_to_page_merges_without_rule() {
        let store = MockStore::default().with_note("Ideas.md", "old", "sha-2");
        let uc = use_case(
            Ok(analysis(
                Instruction::AppendToPage {
                    target_page: Some("Ideas".to_string()),
                },
                "",
            )),
            store,
        );

        uc.execute(input()).await.unwrap();

        let calls = uc.store.calls();
        assert_eq!(
            calls[2],
            Call::Update {
                identifier: "Ideas.md".to_string(),
                content: "old\n\ncleaned content".to_string(),
                token: "sha-2".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn append_to_page_creates_verbatim_when_absent() {
        let uc = use_case(
            Ok(analysis(
                Instruction::AppendToPage {
                    target_page: Some("folder/Ideas.md".to_string()),
                },
                "",
            )),
            MockStore::default(),
        );

        uc.execute(input()).await.unwrap();

        let calls = uc.store.calls();
        assert_eq!(
            calls[2],
            Call::Create {
                identifier: "folder/Ideas.md".to_string(),
                content: "cleaned content".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn missing_target_with_plain_title_fails_before_store_write() {
        let uc = use_case(
            Ok(analysis(
                Instruction::AppendToPage { target_page: None },
                "Plain Title",
            )),
            MockStore::default(),
        );

        let err = uc.execute(input()).await.unwrap_err();

        assert!(matches!(err, ProcessError::MissingTarget));
        // Only the listing snapshot was fetched; no read/create/update
        assert_eq!(uc.store.calls(), vec![Call::List]);
    }

    #[tokio::test]
    async fn missing_target_falls_back_to_md_title() {
        let store = MockStore::default().with_note("Ideas.md", "old", "sha-3");
        let uc = use_case(
            Ok(analysis(
                Instruction::AppendToPage { target_page: None },
                "Ideas.md",
            )),
            store,
        );

        let output = uc.execute(input()).await.unwrap();
        assert_eq!(output.identifier, "Ideas.md");
    }

    #[tokio::test]
    async fn new_note_resolves_collision_against_listing() {
        let store = MockStore::default().with_note("Meeting Notes.md", "x", "sha-4");
        let uc = use_case(
            Ok(analysis(Instruction::NewNote, "Meeting Notes")),
            store,
        );

        let output = uc.execute(input()).await.unwrap();

        assert_eq!(output.identifier, "Meeting Notes 1.md");
        let calls = uc.store.calls();
        // New note path never reads
        assert!(!calls.iter().any(|c| matches!(c, Call::Read(_))));
    }

    #[tokio::test]
    async fn new_note_empty_title_uses_untitled() {
        let uc = use_case(Ok(analysis(Instruction::NewNote, "   ")), MockStore::default());

        let output = uc.execute(input()).await.unwrap();
        assert_eq!(output.identifier, "Untitled Note.md");
    }

    #[tokio::test]
    async fn version_mismatch_is_fatal_and_not_retried() {
        let today = daily_note_identifier(Utc::now().date_naive());
        let mut store = MockStore::default().with_note(&today, "X", "stale");
        store.update_error = Some(StoreError::VersionMismatch(today.clone()));
        let uc = use_case(Ok(analysis(Instruction::AppendDaily, "")), store);

        let err = uc.execute(input()).await.unwrap_err();

        assert!(matches!(
            err,
            ProcessError::Store(StoreError::VersionMismatch(_))
        ));
        // Exactly one read and one update attempt
        let calls = uc.store.calls();
        let reads = calls.iter().filter(|c| matches!(c, Call::Read(_))).count();
        let updates = calls
            .iter()
            .filter(|c| matches!(c, Call::Update { .. }))
            .count();
        assert_eq!((reads, updates), (1, 1));
    }

    #[tokio::test]
    async fn analysis_failure_makes_no_store_mutation() {
        let uc = use_case(
            Err(AnalysisError::Schema("missing content".to_string())),
            MockStore::default(),
        );

        let err = uc.execute(input()).await.unwrap_err();

        assert!(matches!(err, ProcessError::Analysis(_)));
        assert_eq!(uc.store.calls(), vec![Call::List]);
    }

    #[tokio::test]
    async fn scratch_audio_released_on_success() {
        let released = Arc::new(AtomicUsize::new(0));
        let hook = Arc::clone(&released);
        let uc = use_case(Ok(analysis(Instruction::NewNote, "T")), MockStore::default());

        let input = ProcessInput {
            audio: ScratchAudio::with_release(
                AudioData::new(vec![0u8; 8], AudioMimeType::Webm),
                move || {
                    hook.fetch_add(1, Ordering::SeqCst);
                },
            ),
            language: "en".to_string(),
        };

        uc.execute(input).await.unwrap();
        assert_eq!(released.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn scratch_audio_released_on_analysis_failure() {
        let released = Arc::new(AtomicUsize::new(0));
        let hook = Arc::clone(&released);
        let uc = use_case(
            Err(AnalysisError::MissingOutput),
            MockStore::default(),
        );

        let input = ProcessInput {
            audio: ScratchAudio::with_release(
                AudioData::new(vec![0u8; 8], AudioMimeType::Webm),
                move || {
                    hook.fetch_add(1, Ordering::SeqCst);
                },
            ),
            language: "en".to_string(),
        };

        assert!(uc.execute(input).await.is_err());
        assert_eq!(released.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn resolve_target_prefers_page_over_title() {
        let id = resolve_target_page(Some("folder/Page"), "Other.md").unwrap();
        assert_eq!(id, "folder/Page.md");
    }

    #[test]
    fn resolve_target_blank_page_is_treated_as_absent() {
        let err = resolve_target_page(Some("   "), "Plain").unwrap_err();
        assert!(matches!(err, ProcessError::MissingTarget));
    }
}
