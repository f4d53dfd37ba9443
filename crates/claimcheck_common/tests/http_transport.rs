//! HttpTransport against an in-process axum server

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use claimcheck_common::{
    AnalysisResult, FailureKind, FileDraft, HttpTransport, InputDrafts, Session, SubmissionMode,
    Transport, TransportError, Verdict,
};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Clone, Default)]
struct Captured {
    requests: Arc<Mutex<Vec<(String, String, Vec<u8>)>>>,
}

impl Captured {
    fn record(&self, path: &str, headers: &HeaderMap, body: &Bytes) {
        let content_type = headers
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        self.requests
            .lock()
            .unwrap()
            .push((path.to_string(), content_type, body.to_vec()));
    }

    fn all(&self) -> Vec<(String, String, Vec<u8>)> {
        self.requests.lock().unwrap().clone()
    }
}

async fn fact_check_text(
    State(captured): State<Captured>,
    headers: HeaderMap,
    body: Bytes,
) -> Json<Value> {
    captured.record("/fact-check-text", &headers, &body);
    Json(json!({
        "claim_analysis": { "verdict": "False", "score": 97, "explanation": "Bleach is toxic." },
        "evidence_log": { "external_sources": [{ "source_name": "WHO", "url": "https://who.int" }] }
    }))
}

async fn fact_check_url(
    State(captured): State<Captured>,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, Json<Value>) {
    captured.record("/fact-check-url", &headers, &body);
    (
        StatusCode::NOT_IMPLEMENTED,
        Json(json!({ "error": "Not implemented yet." })),
    )
}

async fn fact_check_file(
    State(captured): State<Captured>,
    headers: HeaderMap,
    body: Bytes,
) -> Json<Value> {
    captured.record("/fact-check-file", &headers, &body);
    Json(json!({ "claim_analysis": { "verdict": "Misleading" } }))
}

async fn generate_reply(
    State(captured): State<Captured>,
    headers: HeaderMap,
    body: Bytes,
) -> Json<Value> {
    captured.record("/generate-reply", &headers, &body);
    Json(json!({ "replies": ["Bleach is poison, please don't drink it."] }))
}

async fn slow() -> Json<Value> {
    tokio::time::sleep(Duration::from_secs(3)).await;
    Json(json!({}))
}

async fn spawn_server(captured: Captured) -> String {
    let app = Router::new()
        .route("/fact-check-text", post(fact_check_text))
        .route("/fact-check-url", post(fact_check_url))
        .route("/fact-check-file", post(fact_check_file))
        .route("/generate-reply", post(generate_reply))
        .with_state(captured);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

fn transport(base_url: &str) -> HttpTransport {
    HttpTransport::new(base_url, Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn test_text_submission_and_replies_over_http() {
    let captured = Captured::default();
    let base_url = spawn_server(captured.clone()).await;
    let mut session = Session::new(transport(&base_url));

    session.drafts_mut().set_claim("Drinking bleach cures illness");
    let result = session.submit().await.unwrap();
    let report = result.report().unwrap();
    assert_eq!(report.verdict, Verdict::False);
    assert_eq!(report.score, Some(97));
    assert_eq!(report.external_sources[0].name, "WHO");

    let replies = session.generate_replies(None).await.unwrap().to_vec();
    assert_eq!(replies, vec!["Bleach is poison, please don't drink it."]);

    let requests = captured.all();
    assert_eq!(requests.len(), 2);
    let (path, content_type, body) = &requests[0];
    assert_eq!(path, "/fact-check-text");
    assert!(content_type.starts_with("application/json"));
    let body: Value = serde_json::from_slice(body).unwrap();
    assert_eq!(body, json!({ "claim": "Drinking bleach cures illness" }));

    let reply_body: Value = serde_json::from_slice(&requests[1].2).unwrap();
    assert_eq!(reply_body["language"], "English");
    assert_eq!(reply_body["analysis"]["claim_analysis"]["score"], 97);
}

#[tokio::test]
async fn test_server_error_message_surfaces_verbatim() {
    let captured = Captured::default();
    let base_url = spawn_server(captured.clone()).await;
    let mut session = Session::new(transport(&base_url));

    session.drafts_mut().select_mode(SubmissionMode::Url);
    session.drafts_mut().set_url("https://example.com/story");
    let result = session.submit().await.unwrap();
    assert_eq!(
        result,
        &AnalysisResult::error(FailureKind::Server, "Not implemented yet.")
    );
}

#[tokio::test]
async fn test_multipart_upload() {
    let captured = Captured::default();
    let base_url = spawn_server(captured.clone()).await;
    let transport = transport(&base_url);

    let mut drafts = InputDrafts::new();
    drafts.select_mode(SubmissionMode::File);
    drafts.set_claim("forwarded image");
    drafts.attach(FileDraft::new("first.png", b"PNGDATA".to_vec()));
    drafts.attach(FileDraft::new("second.pdf", b"PDFDATA".to_vec()));

    let request = claimcheck_common::request::build_submission(&drafts).unwrap();
    let response = transport.send(&request).await.unwrap();
    assert!(response.is_success());

    let requests = captured.all();
    let (path, content_type, body) = &requests[0];
    assert_eq!(path, "/fact-check-file");
    assert!(content_type.starts_with("multipart/form-data"));

    let body = String::from_utf8_lossy(body).to_string();
    let lower = body.to_lowercase();
    assert!(body.contains("name=\"claim\""));
    assert!(body.contains("forwarded image"));
    assert_eq!(body.matches("name=\"files\"").count(), 2);
    assert!(body.contains("filename=\"first.png\""));
    assert!(lower.contains("content-type: image/png"));
    assert!(body.contains("filename=\"second.pdf\""));
    assert!(lower.contains("content-type: application/pdf"));
}

#[tokio::test]
async fn test_unreachable_service() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let mut session = Session::new(transport(&format!("http://{}", addr)));
    session.drafts_mut().set_claim("claim");
    let result = session.submit().await.unwrap();
    assert!(matches!(
        result,
        AnalysisResult::Error {
            failure: FailureKind::Transport,
            ..
        }
    ));
    // failed submissions keep what the user typed
    assert_eq!(session.drafts().claim(), "claim");
}

#[tokio::test]
async fn test_timeout_maps_to_timeout_error() {
    let app = Router::new().route("/fact-check-text", post(slow));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let transport = HttpTransport::new(&format!("http://{}", addr), Duration::from_millis(200)).unwrap();
    let mut drafts = InputDrafts::new();
    drafts.set_claim("claim");
    let request = claimcheck_common::request::build_submission(&drafts).unwrap();

    assert_eq!(transport.send(&request).await, Err(TransportError::Timeout));
}
