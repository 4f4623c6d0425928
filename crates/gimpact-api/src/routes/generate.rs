use std::sync::Arc;

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use gimpact_core::data::AnalysisData;
use gimpact_core::models::report::ReportKind;
use gimpact_core::models::request::GenerateRequest;
use gimpact_core::models::response::GenerateResponse;
use gimpact_export::{ExportError, FontLibrary, RenderedPdf, generate_detail_report, generate_summary_report};
use jiff::Timestamp;

use crate::error::ApiError;
use crate::state::AppState;

fn parse_request(body: &[u8]) -> Result<GenerateRequest, ApiError> {
    Ok(serde_json::from_slice(body)?)
}

/// Run a report job on the blocking pool.
async fn run_blocking<T, F>(job: F) -> Result<T, ApiError>
where
    F: FnOnce() -> Result<T, ExportError> + Send + 'static,
    T: Send + 'static,
{
    Ok(tokio::task::spawn_blocking(job).await??)
}

fn render(
    kind: ReportKind,
    request: &GenerateRequest,
    fonts: &FontLibrary,
    generated_at: Timestamp,
) -> Result<RenderedPdf, ExportError> {
    let (data, company) = report_subject(request, generated_at);
    match kind {
        ReportKind::Summary => generate_summary_report(&data, &company, fonts, generated_at),
        ReportKind::Detail => generate_detail_report(&data, &request.transformed, &company, fonts, generated_at),
    }
}

/// The data a report is built from and the company printed on it. A blank
/// business name falls back to the name carried by the handoffs.
fn report_subject(request: &GenerateRequest, generated_at: Timestamp) -> (AnalysisData, String) {
    let data = request.prepare_report_data(&generated_at);
    let company = data.company_name();
    (data, company)
}

/// `POST /generate`: both reports as base64 in a JSON envelope.
///
/// Failures keep the envelope shape, with `errorKind` telling a malformed
/// request (400) from a generation failure (500).
pub async fn generate(State(state): State<AppState>, body: Bytes) -> (StatusCode, Json<GenerateResponse>) {
    let generated_at = Timestamp::now();
    match generate_both(state.fonts, &body, generated_at).await {
        Ok(response) => (StatusCode::OK, Json(response)),
        Err(e) => {
            tracing::error!(error = e.message(), kind = ?e.kind(), "report generation failed");
            (e.status(), Json(GenerateResponse::failed(e.kind(), e.message(), &generated_at)))
        }
    }
}

async fn generate_both(
    fonts: Arc<FontLibrary>,
    body: &[u8],
    generated_at: Timestamp,
) -> Result<GenerateResponse, ApiError> {
    let request = parse_request(body)?;
    let options = request.options.clone();

    let (summary, detail) = run_blocking(move || {
        let summary = options
            .generate_summary
            .then(|| render(ReportKind::Summary, &request, &fonts, generated_at))
            .transpose()?;
        let detail = options
            .generate_detail
            .then(|| render(ReportKind::Detail, &request, &fonts, generated_at))
            .transpose()?;
        Ok((summary, detail))
    })
    .await?;

    let mut response = GenerateResponse::started(&generated_at);
    if let Some(pdf) = summary {
        response.summary_pdf = Some(BASE64.encode(&pdf.bytes));
        response.summary_pages = Some(pdf.page_count);
    }
    if let Some(pdf) = detail {
        response.detail_pdf = Some(BASE64.encode(&pdf.bytes));
        response.detail_pages = Some(pdf.page_count);
    }
    Ok(response)
}

/// `POST /generate/summary`: the summary report as a PDF download.
pub async fn generate_summary(State(state): State<AppState>, body: Bytes) -> Result<Response, ApiError> {
    download(ReportKind::Summary, state.fonts, &body).await
}

/// `POST /generate/detail`: the detail report as a PDF download.
pub async fn generate_detail(State(state): State<AppState>, body: Bytes) -> Result<Response, ApiError> {
    download(ReportKind::Detail, state.fonts, &body).await
}

async fn download(kind: ReportKind, fonts: Arc<FontLibrary>, body: &[u8]) -> Result<Response, ApiError> {
    let request = parse_request(body)?;
    let file_name = kind.file_name(&request.meta.business_name);
    let generated_at = Timestamp::now();

    let pdf = run_blocking(move || render(kind, &request, &fonts, generated_at)).await?;

    let disposition = HeaderValue::from_str(&content_disposition(&file_name))
        .map_err(|e| ApiError::Internal(format!("invalid Content-Disposition: {e}")))?;
    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, HeaderValue::from_static("application/pdf")),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        pdf.bytes,
    )
        .into_response())
}

/// `attachment` disposition with an ASCII `filename` and the exact UTF-8
/// name in an RFC 5987 `filename*` parameter.
pub fn content_disposition(file_name: &str) -> String {
    let fallback: String = file_name
        .chars()
        .map(|c| {
            if (c.is_ascii_graphic() && c != '"' && c != '\\') || c == ' ' {
                c
            } else {
                '_'
            }
        })
        .collect();

    if fallback == file_name {
        return format!("attachment; filename=\"{file_name}\"");
    }
    format!(
        "attachment; filename=\"{fallback}\"; filename*=UTF-8''{}",
        percent_encode(file_name)
    )
}

fn percent_encode(value: &str) -> String {
    let mut out = String::with_capacity(value.len() * 3);
    for byte in value.bytes() {
        if byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'.' | b'_' | b'~') {
            out.push(byte as char);
        } else {
            out.push_str(&format!("%{byte:02X}"));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_names_are_plain() {
        assert_eq!(
            content_disposition("Acme_summary.pdf"),
            "attachment; filename=\"Acme_summary.pdf\""
        );
    }

    #[test]
    fn korean_names_use_extended_parameter() {
        let value = content_disposition("가_detail.pdf");
        assert_eq!(
            value,
            "attachment; filename=\"__detail.pdf\"; filename*=UTF-8''%EA%B0%80_detail.pdf"
        );
    }

    #[test]
    fn quotes_are_replaced_in_fallback() {
        let value = content_disposition("a\"b.pdf");
        assert!(value.starts_with("attachment; filename=\"a_b.pdf\""));
        assert!(value.ends_with("filename*=UTF-8''a%22b.pdf"));
    }

    #[test]
    fn blank_business_name_uses_handoff_company() {
        let request = parse_request(
            br#"{
                "meta": {"business_name": "  "},
                "handoffs": {"step_2_1_pestel": {"analysis_meta": {"company": "Meta Corp"}}},
                "options": {"businessName": ""}
            }"#,
        )
        .unwrap();
        let (_, company) = report_subject(&request, Timestamp::UNIX_EPOCH);
        assert_eq!(company, "Meta Corp");

        let named = parse_request(br#"{"meta": {"business_name": "Acme"}, "handoffs": {}, "options": {"businessName": "Acme"}}"#).unwrap();
        assert_eq!(report_subject(&named, Timestamp::UNIX_EPOCH).1, "Acme");
    }

    #[test]
    fn malformed_body_is_a_bad_request() {
        let err = parse_request(b"{\"meta\": 1}").unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }
}
