//! Transcript analysis adapters

mod openai;

pub use openai::OpenAiAnalyzer;
