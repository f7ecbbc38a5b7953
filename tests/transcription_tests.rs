//! Transcription adapter tests against a mocked OpenAI API

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use voxvault::application::ports::{Transcriber, TranscriptionError};
use voxvault::domain::audio::{AudioData, AudioMimeType};
use voxvault::infrastructure::OpenAiTranscriber;

fn audio() -> AudioData {
    AudioData::new(vec![0u8; 64], AudioMimeType::Webm)
}

async fn transcriber(server: &MockServer) -> OpenAiTranscriber {
    OpenAiTranscriber::new("test-key").with_base_url(server.uri())
}

#[tokio::test]
async fn returns_trimmed_transcript() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/audio/transcriptions"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "text": "  hello world \n" })),
        )
        .mount(&server)
        .await;

    let text = transcriber(&server)
        .await
        .transcribe(&audio(), "en")
        .await
        .unwrap();
    assert_eq!(text, "hello world");
}

#[tokio::test]
async fn empty_transcript_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/audio/transcriptions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "text": "   " })))
        .mount(&server)
        .await;

    let err = transcriber(&server)
        .await
        .transcribe(&audio(), "en")
        .await
        .unwrap_err();
    assert!(matches!(err, TranscriptionError::EmptyTranscript));
}

#[tokio::test]
async fn unauthorized_maps_to_invalid_api_key() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/audio/transcriptions"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid key"))
        .mount(&server)
        .await;

    let err = transcriber(&server)
        .await
        .transcribe(&audio(), "en")
        .await
        .unwrap_err();
    assert!(matches!(err, TranscriptionError::InvalidApiKey));
}

#[tokio::test]
async fn server_error_carries_status_and_detail() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/audio/transcriptions"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .mount(&server)
        .await;

    let err = transcriber(&server)
        .await
        .transcribe(&audio(), "en")
        .await
        .unwrap_err();

    match err {
        TranscriptionError::Api { status, detail } => {
            assert_eq!(status, 500);
            assert!(detail.contains("upstream exploded"));
        }
        other => panic!("expected Api error, got {:?}", other),
    }
}

#[tokio::test]
async fn rate_limit_maps_to_rate_limited() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/audio/transcriptions"))
        .respond_with(ResponseTemplate::new(429).set_body_string("slow down"))
        .mount(&server)
        .await;

    let err = transcriber(&server)
        .await
        .transcribe(&audio(), "en")
        .await
        .unwrap_err();
    assert!(matches!(err, TranscriptionError::RateLimited));
}
