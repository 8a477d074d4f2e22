mod common;

use std::path::PathBuf;
use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use common::*;
use gemini_farm::{Attachment, HttpClientConfig, LlmError};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{header, method, path},
};

#[tokio::test]
async fn sends_one_text_part_and_one_inline_part_per_file() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .and(header("x-goog-api-key", TEST_KEY))
        .respond_with(text_response("{\"response\":\"ok\",\"data\":[]}"))
        .expect(1)
        .mount(&server)
        .await;

    let first = temp_file("plots-a.pdf", b"%PDF-1.4 plot A");
    let second = temp_file("plots-b.pdf", b"%PDF-1.4 plot B");

    let client = client_for(&server);
    let text = client
        .generate_content("Analyze this farm data", [&first, &second])
        .await
        .expect("generation should succeed");
    assert_eq!(text, "{\"response\":\"ok\",\"data\":[]}");

    let requests = server.received_requests().await.unwrap();
    let body = body_json(&requests[0]);

    let contents = body["contents"].as_array().unwrap();
    assert_eq!(contents.len(), 1);
    assert_eq!(contents[0]["role"], "user");

    let parts = contents[0]["parts"].as_array().unwrap();
    assert_eq!(parts.len(), 3);
    assert_eq!(parts[0]["text"], "Analyze this farm data");

    let text_parts = parts.iter().filter(|p| p.get("text").is_some()).count();
    assert_eq!(text_parts, 1);

    assert_eq!(parts[1]["inlineData"]["mimeType"], "application/pdf");
    assert_eq!(parts[1]["inlineData"]["data"], STANDARD.encode(b"%PDF-1.4 plot A"));
    assert_eq!(parts[2]["inlineData"]["data"], STANDARD.encode(b"%PDF-1.4 plot B"));

    assert!(
        body["systemInstruction"]["parts"][0]["text"]
            .as_str()
            .unwrap()
            .starts_with("Convert unstructured user input into structured JSON")
    );
    assert!(body.get("generationConfig").is_none());
}

#[tokio::test]
async fn prompt_without_files_sends_only_text() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(text_response("hello"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let text = client
        .generate_content("Say hello", Vec::<PathBuf>::new())
        .await
        .unwrap();
    assert_eq!(text, "hello");

    let requests = server.received_requests().await.unwrap();
    let parts = body_json(&requests[0])["contents"][0]["parts"].clone();
    assert_eq!(parts, serde_json::json!([{ "text": "Say hello" }]));
}

#[tokio::test]
async fn attachments_keep_their_mime_type() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(text_response("ok"))
        .mount(&server)
        .await;

    let csv = temp_file("plots.csv", b"plot,crop\nP1,maize\n");

    let client = client_for(&server);
    client
        .generate_with_attachments("Read the plots", &[Attachment::guess(&csv)])
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    let body = body_json(&requests[0]);
    assert_eq!(body["contents"][0]["parts"][1]["inlineData"]["mimeType"], "text/csv");
}

#[tokio::test]
async fn api_errors_propagate_with_status() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(error_response(400, "API key not valid. Please pass a valid API key."))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client
        .generate_content("Analyze", Vec::<PathBuf>::new())
        .await
        .unwrap_err();

    match err {
        LlmError::Api {
            message,
            status_code,
            ..
        } => {
            assert_eq!(status_code, Some(400));
            assert!(message.contains("API key not valid"));
        }
        other => panic!("expected API error, got {other:?}"),
    }
}

#[tokio::test]
async fn server_errors_are_not_retried_by_default() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(error_response(503, "overloaded"))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client
        .generate_content("Analyze", Vec::<PathBuf>::new())
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), Some(503));
}

#[tokio::test]
async fn opt_in_retries_recover_from_transient_errors() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(error_response(503, "overloaded"))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(text_response("recovered"))
        .mount(&server)
        .await;

    let client = client_with(&server, |config| {
        config.with_http_config(HttpClientConfig {
            max_retries: 2,
            initial_retry_delay: Duration::from_millis(1),
            max_retry_delay: Duration::from_millis(5),
            ..HttpClientConfig::default()
        })
    });

    let text = client
        .generate_content("Analyze", Vec::<PathBuf>::new())
        .await
        .unwrap();
    assert_eq!(text, "recovered");
    assert_eq!(server.received_requests().await.unwrap().len(), 2);
}

#[tokio::test]
async fn missing_file_fails_before_any_request() {
    let server = MockServer::start().await;

    let client = client_for(&server);
    let err = client
        .generate_content("Analyze", ["/no/such/farm-data.pdf"])
        .await
        .unwrap_err();

    assert!(matches!(err, LlmError::Io { .. }));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn blocked_prompt_is_reported() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "promptFeedback": { "blockReason": "SAFETY" }
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client
        .generate_content("Analyze", Vec::<PathBuf>::new())
        .await
        .unwrap_err();
    assert!(matches!(err, LlmError::Blocked(_)));
}

#[tokio::test]
async fn structured_output_sends_schema_and_parses_reply() {
    let server = MockServer::start().await;

    let reply = r#"{"response":"One plot found.","data":[{"crop":"Maize","area":1.5,"plot":"P1","areaUnit":"ha"}]}"#;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(text_response(reply))
        .mount(&server)
        .await;

    let client = client_with(&server, |config| config.with_structured_output());
    let text = client
        .generate_content("Analyze", Vec::<PathBuf>::new())
        .await
        .unwrap();

    let report = gemini_farm::FarmReport::parse(&text).unwrap();
    assert_eq!(report.data[0].crop.as_deref(), Some("Maize"));

    let requests = server.received_requests().await.unwrap();
    let body = body_json(&requests[0]);
    assert_eq!(body["generationConfig"]["responseMimeType"], "application/json");
    assert!(body["generationConfig"]["responseJsonSchema"].is_object());
}
