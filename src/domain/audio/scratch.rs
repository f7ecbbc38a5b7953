//! Scratch audio guard
//!
//! A voice note run holds its decoded recording only for the duration of
//! the pipeline. `ScratchAudio` owns that transient buffer and runs an
//! optional release hook exactly once when it is dropped, so cleanup
//! happens on every exit path, including errors.

use std::fmt;

use super::AudioData;

type ReleaseHook = Box<dyn FnOnce() + Send>;

/// RAII guard around a decoded recording
pub struct ScratchAudio {
    data: AudioData,
    release: Option<ReleaseHook>,
}

impl ScratchAudio {
    /// Wrap decoded audio with no release hook
    pub fn new(data: AudioData) -> Self {
        Self {
            data,
            release: None,
        }
    }

    /// Wrap decoded audio with a hook invoked exactly once on drop.
    ///
    /// Callers that spill the recording to disk attach the deletion here.
    pub fn with_release(data: AudioData, release: impl FnOnce() + Send + 'static) -> Self {
        Self {
            data,
            release: Some(Box::new(release)),
        }
    }

    /// Access the decoded audio
    pub fn data(&self) -> &AudioData {
        &self.data
    }
}

impl Drop for ScratchAudio {
    fn drop(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl fmt::Debug for ScratchAudio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScratchAudio")
            .field("data", &self.data)
            .field("has_release", &self.release.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use super::*;
    use crate::domain::audio::AudioMimeType;

    fn sample() -> AudioData {
        AudioData::new(vec![1, 2, 3], AudioMimeType::Webm)
    }

    #[test]
    fn release_runs_exactly_once_on_drop() {
        let count = Arc::new(AtomicUsize::new(0));
        let hook_count = Arc::clone(&count);

        let scratch = ScratchAudio::with_release(sample(), move || {
            hook_count.fetch_add(1, Ordering::SeqCst);
        });
        assert_eq!(count.load(Ordering::SeqCst), 0);

        drop(scratch);
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn data_accessible_before_drop() {
        let scratch = ScratchAudio::new(sample());
        assert_eq!(scratch.data().data(), &[1, 2, 3]);
    }
}
