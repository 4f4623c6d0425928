use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::data::AnalysisData;

fn default_bm() -> Option<String> {
    Some("ALL".to_string())
}

fn default_version() -> Option<String> {
    Some("4.0".to_string())
}

fn default_true() -> bool {
    true
}

/// Body of every `/generate*` call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateRequest {
    pub meta: ReportMeta,
    pub handoffs: Map<String, Value>,
    #[serde(default)]
    pub transformed: TransformedData,
    pub options: ReportOptions,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMeta {
    pub business_name: String,
    #[serde(default = "default_bm")]
    pub bm: Option<String>,
    #[serde(default)]
    pub collected_at: Option<String>,
    #[serde(default = "default_version")]
    pub version: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportOptions {
    #[serde(default = "default_true")]
    pub generate_summary: bool,
    #[serde(default = "default_true")]
    pub generate_detail: bool,
    pub business_name: String,
    #[serde(default = "default_bm")]
    pub bm: Option<String>,
}

/// AI-written narrative used by the detail report.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformedData {
    #[serde(default)]
    pub sections: Map<String, Value>,
    #[serde(default)]
    pub executive_summary: Option<String>,
}

impl TransformedData {
    /// Section bodies in document order. A section is either a bare string
    /// or an object carrying a `content` string; anything else is rendered
    /// through its JSON form.
    pub fn section_contents(&self) -> Vec<(&str, String)> {
        self.sections
            .iter()
            .map(|(id, section)| {
                let content = match section {
                    Value::String(s) => s.clone(),
                    Value::Object(m) => m
                        .get("content")
                        .and_then(Value::as_str)
                        .unwrap_or_default()
                        .to_string(),
                    Value::Null => String::new(),
                    other => other.to_string(),
                };
                (id.as_str(), content)
            })
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
            && self
                .executive_summary
                .as_deref()
                .is_none_or(|s| s.trim().is_empty())
    }
}

impl GenerateRequest {
    /// Reshape the request into the document the report builder reads:
    /// `company_name`, `bm` and `generated_at` at the top level, followed by
    /// every handoff entry verbatim. A handoff may override the top-level keys.
    pub fn prepare_report_data(&self, generated_at: &jiff::Timestamp) -> AnalysisData {
        let mut data = AnalysisData::default();
        data.insert("company_name", Value::String(self.meta.business_name.clone()));
        data.insert(
            "bm",
            self.meta.bm.clone().map(Value::String).unwrap_or(Value::Null),
        );
        data.insert("generated_at", Value::String(generated_at.to_string()));

        for (key, value) in &self.handoffs {
            data.insert(key.clone(), value.clone());
        }
        data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal() -> &'static str {
        r#"{
            "meta": {"business_name": "G임팩트"},
            "handoffs": {},
            "options": {"businessName": "G임팩트"}
        }"#
    }

    #[test]
    fn defaults_fill_optional_fields() {
        let req: GenerateRequest = serde_json::from_str(minimal()).unwrap();
        assert_eq!(req.meta.bm.as_deref(), Some("ALL"));
        assert_eq!(req.meta.version.as_deref(), Some("4.0"));
        assert!(req.options.generate_summary);
        assert!(req.options.generate_detail);
        assert!(req.transformed.sections.is_empty());
        assert!(req.transformed.is_empty());
    }

    #[test]
    fn missing_meta_is_rejected() {
        let raw = r#"{"handoffs": {}, "options": {"businessName": "x"}}"#;
        assert!(serde_json::from_str::<GenerateRequest>(raw).is_err());
    }

    #[test]
    fn prepared_data_carries_meta_and_handoffs() {
        let raw = r#"{
            "meta": {"business_name": "G임팩트", "bm": "B2G"},
            "handoffs": {"step_3_3_swot": {"key_insights": ["a"]}},
            "options": {"businessName": "G임팩트", "generateDetail": false}
        }"#;
        let req: GenerateRequest = serde_json::from_str(raw).unwrap();
        let ts: jiff::Timestamp = "2026-01-02T03:04:05Z".parse().unwrap();
        let data = req.prepare_report_data(&ts);

        assert_eq!(data.company_name(), "G임팩트");
        assert_eq!(data.section("bm").as_text(), "B2G");
        assert_eq!(data.section("generated_at").as_text(), "2026-01-02T03:04:05Z");
        assert_eq!(
            data.section("step_3_3_swot").get("key_insights").texts(),
            ["a"]
        );
        assert!(!req.options.generate_detail);
    }

    #[test]
    fn section_contents_accept_strings_and_objects() {
        let raw = serde_json::json!({
            "sections": {"pestel": {"content": "## PESTEL"}, "swot": "plain", "empty": null},
            "executiveSummary": "요약"
        });
        let transformed: TransformedData = serde_json::from_value(raw).unwrap();
        let contents = transformed.section_contents();

        assert_eq!(contents[0], ("pestel", "## PESTEL".to_string()));
        assert_eq!(contents[1], ("swot", "plain".to_string()));
        assert_eq!(contents[2], ("empty", String::new()));
        assert!(!transformed.is_empty());
    }
}
