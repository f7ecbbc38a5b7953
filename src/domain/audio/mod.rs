//! Voice note audio value objects

mod audio_data;
mod scratch;

pub use audio_data::{AudioData, AudioMimeType};
pub use scratch::ScratchAudio;
