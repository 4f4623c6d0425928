use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use axum::response::Response;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use gimpact_api::app;
use gimpact_api::state::AppState;
use gimpact_core::sample::{SAMPLE_COMPANY, sample_json};
use gimpact_export::FontLibrary;
use serde_json::{Value, json};
use tower::ServiceExt;

fn router() -> Router {
    app(AppState::new(FontLibrary::standard()))
}

fn sample_request(options: Value) -> Value {
    let handoffs: Value = serde_json::from_str(sample_json()).unwrap();
    json!({
        "meta": {"business_name": SAMPLE_COMPANY, "bm": "B2G"},
        "handoffs": handoffs,
        "options": options,
    })
}

async fn post(path: &str, body: &str) -> Response {
    let request = Request::builder()
        .method("POST")
        .uri(path)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    router().oneshot(request).await.unwrap()
}

async fn get(path: &str) -> Response {
    let request = Request::builder().uri(path).body(Body::empty()).unwrap();
    router().oneshot(request).await.unwrap()
}

async fn json_body(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn root_describes_the_service() {
    let response = get("/").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["service"], "G-IMPACT PDF Generator");
    assert_eq!(body["version"], "1.0.0");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn health_reports_missing_fonts() {
    let response = get("/health").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));
    let body = json_body(response).await;
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["checks"]["pdf_generator"], "ok");
    assert_eq!(body["checks"]["fonts"], "missing - will use fallback");
}

#[tokio::test]
async fn generate_returns_both_reports() {
    let request = sample_request(json!({"businessName": SAMPLE_COMPANY}));
    let response = post("/generate", &request.to_string()).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["success"], true);
    assert!(body["error"].is_null());
    assert!(body["generatedAt"].is_string());

    for (pdf, pages) in [("summaryPdf", "summaryPages"), ("detailPdf", "detailPages")] {
        let bytes = BASE64.decode(body[pdf].as_str().unwrap()).unwrap();
        assert!(bytes.starts_with(b"%PDF"), "{pdf} is not a PDF");
        assert!(body[pages].as_u64().unwrap() > 1);
    }
}

#[tokio::test]
async fn generate_honours_option_flags() {
    let request = sample_request(json!({"businessName": SAMPLE_COMPANY, "generateDetail": false}));
    let body = json_body(post("/generate", &request.to_string()).await).await;
    assert_eq!(body["success"], true);
    assert!(body["summaryPdf"].is_string());
    assert!(body["detailPdf"].is_null());
    assert!(body["detailPages"].is_null());
}

#[tokio::test]
async fn generate_with_empty_handoffs_succeeds() {
    let request = json!({
        "meta": {"business_name": "빈 회사"},
        "handoffs": {},
        "options": {"businessName": "빈 회사"},
    });
    let body = json_body(post("/generate", &request.to_string()).await).await;
    assert_eq!(body["success"], true);
    let bytes = BASE64.decode(body["summaryPdf"].as_str().unwrap()).unwrap();
    assert!(bytes.starts_with(b"%PDF"));
}

#[tokio::test]
async fn malformed_generate_keeps_the_envelope() {
    let response = post("/generate", "{\"handoffs\": {}}").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["errorKind"], "bad_request");
    assert!(body["error"].as_str().unwrap().contains("meta"));
}

#[tokio::test]
async fn summary_download_is_a_pdf_attachment() {
    let request = sample_request(json!({"businessName": SAMPLE_COMPANY}));
    let response = post("/generate/summary", &request.to_string()).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "application/pdf");

    let disposition = response.headers()[header::CONTENT_DISPOSITION].to_str().unwrap().to_string();
    assert!(disposition.starts_with("attachment; filename=\""));
    assert!(disposition.ends_with("_summary.pdf"));
    assert!(disposition.contains("filename*=UTF-8''G%EC%9E%84%ED%8C%A9%ED%8A%B8_summary.pdf"));

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert!(bytes.starts_with(b"%PDF"));
}

#[tokio::test]
async fn detail_download_uses_detail_name() {
    let request = json!({
        "meta": {"business_name": "Acme"},
        "handoffs": {},
        "transformed": {"executiveSummary": "## Overview\n- first point"},
        "options": {"businessName": "Acme"},
    });
    let response = post("/generate/detail", &request.to_string()).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"Acme_detail.pdf\""
    );
}

#[tokio::test]
async fn malformed_download_is_a_json_error() {
    let response = post("/generate/detail", "not json").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert!(body["error"].as_str().unwrap().starts_with("invalid request body"));
}
