#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

use gemini_farm::{GeminiClient, GeminiConfig, HttpClientConfig};
use serde_json::{Value, json};
use wiremock::{MockServer, Request as WiremockRequest, ResponseTemplate};

pub const TEST_KEY: &str = "test-key";
pub const GENERATE_PATH: &str = "/v1beta/models/gemini-1.5-flash:generateContent";
pub const UPLOAD_PATH: &str = "/upload/v1beta/files";

pub fn client_for(server: &MockServer) -> GeminiClient {
    client_with(server, |config| config)
}

pub fn client_with(
    server: &MockServer,
    configure: impl FnOnce(GeminiConfig) -> GeminiConfig,
) -> GeminiClient {
    let config = GeminiConfig::new(TEST_KEY.to_string())
        .with_base_url(server.uri())
        .with_http_config(HttpClientConfig::default());
    GeminiClient::new(configure(config)).expect("client should build")
}

pub fn text_response(text: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "candidates": [{
            "content": { "role": "model", "parts": [{ "text": text }] },
            "finishReason": "STOP",
            "index": 0
        }],
        "usageMetadata": {
            "promptTokenCount": 12,
            "candidatesTokenCount": 5,
            "totalTokenCount": 17
        },
        "modelVersion": "gemini-1.5-flash"
    }))
}

pub fn error_response(status: u16, message: &str) -> ResponseTemplate {
    ResponseTemplate::new(status).set_body_json(json!({
        "error": { "code": status, "message": message, "status": "ERROR" }
    }))
}

pub fn body_json(request: &WiremockRequest) -> Value {
    serde_json::from_slice(&request.body).expect("request body should be valid json")
}

/// Writes `contents` to a fresh file in the temp dir and returns its path.
pub fn temp_file(label: &str, contents: &[u8]) -> PathBuf {
    static COUNTER: AtomicUsize = AtomicUsize::new(0);
    let n = COUNTER.fetch_add(1, Ordering::SeqCst);
    let path = std::env::temp_dir().join(format!(
        "gemini-farm-{}-{n}-{label}",
        std::process::id()
    ));
    std::fs::write(&path, contents).expect("temp file should be writable");
    path
}
