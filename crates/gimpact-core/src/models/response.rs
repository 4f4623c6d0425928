use serde::{Deserialize, Serialize};

/// Envelope returned by `POST /generate`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    pub success: bool,
    /// Base64-encoded PDF.
    pub summary_pdf: Option<String>,
    /// Base64-encoded PDF.
    pub detail_pdf: Option<String>,
    pub summary_pages: Option<usize>,
    pub detail_pages: Option<usize>,
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<ErrorKind>,
    pub generated_at: Option<String>,
}

/// Which side a failed generation is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    BadRequest,
    Internal,
}

impl GenerateResponse {
    pub fn started(generated_at: &jiff::Timestamp) -> Self {
        Self {
            success: true,
            generated_at: Some(generated_at.to_string()),
            ..Self::default()
        }
    }

    pub fn failed(kind: ErrorKind, message: impl Into<String>, generated_at: &jiff::Timestamp) -> Self {
        Self {
            success: false,
            error: Some(message.into()),
            error_kind: Some(kind),
            generated_at: Some(generated_at.to_string()),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_camel_case_with_nulls() {
        let ts: jiff::Timestamp = "2026-01-02T03:04:05Z".parse().unwrap();
        let mut resp = GenerateResponse::started(&ts);
        resp.summary_pages = Some(14);

        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["summaryPages"], 14);
        assert!(json["detailPdf"].is_null());
        assert!(json.get("errorKind").is_none());
        assert_eq!(json["generatedAt"], "2026-01-02T03:04:05Z");
    }

    #[test]
    fn failure_carries_kind() {
        let ts = jiff::Timestamp::UNIX_EPOCH;
        let resp = GenerateResponse::failed(ErrorKind::Internal, "boom", &ts);
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "boom");
        assert_eq!(json["errorKind"], "internal");
    }
}
