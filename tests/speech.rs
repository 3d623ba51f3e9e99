//! Integration tests for speech synthesis against a local stand-in for the
//! hosted provider.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;

use textcast::{FailureKind, GoogleTts, SpeechConfig, SpeechSynthesizer};

const MP3_FRAME: &[u8] = &[0xFF, 0xFB, 0x90, 0x64, 0x00, 0x00];

#[derive(Clone)]
struct Provider {
    status: StatusCode,
    body: Vec<u8>,
    queries: Arc<Mutex<Vec<HashMap<String, String>>>>,
}

async fn translate_tts(
    State(provider): State<Provider>,
    Query(query): Query<HashMap<String, String>>,
) -> (StatusCode, Vec<u8>) {
    provider.queries.lock().unwrap().push(query);
    (provider.status, provider.body.clone())
}

/// Serve the stand-in on an ephemeral port and return a synthesizer for it.
async fn serve(provider: Provider) -> SpeechSynthesizer {
    let app = Router::new()
        .route("/translate_tts", get(translate_tts))
        .with_state(provider);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let config = SpeechConfig {
        endpoint: format!("http://{addr}/translate_tts"),
        timeout_secs: 5,
        ..SpeechConfig::default()
    };
    SpeechSynthesizer::new(Box::new(GoogleTts::new(&config).unwrap()))
}

fn provider(status: StatusCode, body: &[u8]) -> Provider {
    Provider {
        status,
        body: body.to_vec(),
        queries: Arc::new(Mutex::new(Vec::new())),
    }
}

// ─── Success ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn short_text_is_one_request() {
    let stub = provider(StatusCode::OK, MP3_FRAME);
    let queries = stub.queries.clone();
    let synth = serve(stub).await;
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("hello.mp3");

    assert!(synth.synthesize("Hello World", &out).await);
    assert_eq!(std::fs::read(&out).unwrap(), MP3_FRAME);

    let queries = queries.lock().unwrap();
    assert_eq!(queries.len(), 1);
    assert_eq!(queries[0]["q"], "Hello World");
    assert_eq!(queries[0]["tl"], "en");
    assert_eq!(queries[0]["client"], "tw-ob");
}

#[tokio::test]
async fn long_text_is_chunked_and_concatenated() {
    let stub = provider(StatusCode::OK, MP3_FRAME);
    let queries = stub.queries.clone();
    let synth = serve(stub).await;
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("long.mp3");

    let text = "This sentence is part of a long passage. ".repeat(100);
    assert!(text.chars().count() >= 4000);

    let size = synth.try_synthesize(&text, &out).await.unwrap();

    let queries = queries.lock().unwrap();
    assert!(queries.len() > 1);
    for query in queries.iter() {
        assert!(query["q"].chars().count() <= 100);
    }
    assert_eq!(size, (queries.len() * MP3_FRAME.len()) as u64);
}

// ─── Failures ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn provider_error_returns_false() {
    let synth = serve(provider(StatusCode::INTERNAL_SERVER_ERROR, b"boom")).await;
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("err.mp3");

    assert!(!synth.synthesize("Hello", &out).await);
    assert!(!out.exists());

    let err = synth.try_synthesize("Hello", &out).await.unwrap_err();
    assert_eq!(err.kind(), FailureKind::Upstream);
    assert!(err.to_string().contains("500"));
}

#[tokio::test]
async fn empty_audio_returns_false() {
    let synth = serve(provider(StatusCode::OK, b"")).await;
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("empty.mp3");

    assert!(!synth.synthesize("Hello", &out).await);
    assert!(!out.exists());
}

#[tokio::test]
async fn unreachable_provider_returns_false() {
    let config = SpeechConfig {
        endpoint: "http://127.0.0.1:9/translate_tts".to_string(),
        timeout_secs: 2,
        ..SpeechConfig::default()
    };
    let synth = SpeechSynthesizer::from_config(&config).unwrap();
    let dir = tempfile::tempdir().unwrap();

    assert!(!synth.synthesize("Hello", &dir.path().join("x.mp3")).await);
}
