//! The analysis data document.
//!
//! Report input is an untyped nested JSON mapping keyed by analysis step.
//! Every read goes through [`Node`], which never fails: a missing key, a
//! wrong type or a null all collapse into an empty node that renders as
//! nothing.

use serde_json::{Map, Value};

use crate::error::CoreError;

/// Step identifiers, in report order.
pub mod step {
    pub const PESTEL: &str = "step_2_1_pestel";
    pub const SCENARIO: &str = "step_2_2_scenario";
    pub const COMPETITION: &str = "step_2_3_competition";
    pub const CUSTOMER: &str = "step_2_4_customer";
    pub const MARKET: &str = "step_2_5_market";
    pub const DIAGNOSIS: &str = "step_3_1_diagnosis";
    pub const VRIO: &str = "step_3_2_vrio";
    pub const SWOT: &str = "step_3_3_swot";
    pub const TOWS: &str = "step_3_4_tows";

    pub const ALL: [&str; 9] = [
        PESTEL,
        SCENARIO,
        COMPETITION,
        CUSTOMER,
        MARKET,
        DIAGNOSIS,
        VRIO,
        SWOT,
        TOWS,
    ];
}

/// Company name used when neither the request nor the data names one.
pub const DEFAULT_COMPANY: &str = "기업명";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnalysisData {
    root: Map<String, Value>,
}

impl AnalysisData {
    pub fn new(root: Map<String, Value>) -> Self {
        Self { root }
    }

    /// Parse a JSON document whose top level must be an object.
    pub fn from_json(raw: &str) -> Result<Self, CoreError> {
        match serde_json::from_str::<Value>(raw)? {
            Value::Object(root) => Ok(Self { root }),
            _ => Err(CoreError::NotAnObject("analysis data".to_string())),
        }
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.root.insert(key.into(), value);
    }

    /// View of one top-level entry, usually a step section.
    pub fn section(&self, key: &str) -> Node<'_> {
        Node(self.root.get(key))
    }

    pub fn has_section(&self, key: &str) -> bool {
        self.section(key).is_truthy()
    }

    /// `company_name`, else the PESTEL analysis meta, else a placeholder.
    pub fn company_name(&self) -> String {
        let explicit = self.section("company_name").as_text();
        if !explicit.trim().is_empty() {
            return explicit;
        }
        let from_meta = self
            .section(step::PESTEL)
            .get("analysis_meta")
            .get("company")
            .as_text();
        if !from_meta.trim().is_empty() {
            return from_meta;
        }
        DEFAULT_COMPANY.to_string()
    }
}

/// Read-only, never-failing view into a JSON value.
#[derive(Debug, Clone, Copy, Default)]
pub struct Node<'a>(Option<&'a Value>);

impl<'a> Node<'a> {
    pub const MISSING: Node<'static> = Node(None);

    pub fn new(value: &'a Value) -> Self {
        Node(Some(value))
    }

    pub fn value(self) -> Option<&'a Value> {
        self.0
    }

    pub fn get(self, key: &str) -> Node<'a> {
        Node(self.0.and_then(|v| v.as_object()).and_then(|m| m.get(key)))
    }

    pub fn at(self, index: usize) -> Node<'a> {
        Node(self.0.and_then(|v| v.as_array()).and_then(|a| a.get(index)))
    }

    pub fn is_missing(self) -> bool {
        matches!(self.0, None | Some(Value::Null))
    }

    /// Falsy: missing, null, `false`, `0`, `""`, `[]` and `{}`.
    pub fn is_truthy(self) -> bool {
        match self.0 {
            None | Some(Value::Null) => false,
            Some(Value::Bool(b)) => *b,
            Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
            Some(Value::String(s)) => !s.is_empty(),
            Some(Value::Array(a)) => !a.is_empty(),
            Some(Value::Object(m)) => !m.is_empty(),
        }
    }

    /// Strings verbatim, numbers in their JSON form, everything else empty.
    pub fn as_text(self) -> String {
        match self.0 {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            _ => String::new(),
        }
    }

    pub fn text(self, key: &str) -> String {
        self.get(key).as_text()
    }

    /// Like [`Node::text`] but substitutes `fallback` for an empty value.
    pub fn text_or(self, key: &str, fallback: &str) -> String {
        let text = self.text(key);
        if text.is_empty() { fallback.to_string() } else { text }
    }

    /// Numbers, or numeric strings (a trailing `%` is ignored). Otherwise zero.
    pub fn as_f64(self) -> f64 {
        match self.0 {
            Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
            Some(Value::String(s)) => crate::text::parse_percent(s),
            _ => 0.0,
        }
    }

    pub fn f64(self, key: &str) -> f64 {
        self.get(key).as_f64()
    }

    pub fn items(self) -> Vec<Node<'a>> {
        match self.0 {
            Some(Value::Array(a)) => a.iter().map(Node::new).collect(),
            _ => Vec::new(),
        }
    }

    /// The first `limit` array elements.
    pub fn take(self, limit: usize) -> Vec<Node<'a>> {
        let mut items = self.items();
        items.truncate(limit);
        items
    }

    /// Array elements rendered as text, skipping containers and nulls.
    pub fn texts(self) -> Vec<String> {
        self.items()
            .into_iter()
            .filter(|n| matches!(n.0, Some(Value::String(_)) | Some(Value::Number(_))))
            .map(Node::as_text)
            .collect()
    }

    /// Object entries in document order.
    pub fn entries(self) -> Vec<(&'a str, Node<'a>)> {
        match self.0 {
            Some(Value::Object(m)) => m.iter().map(|(k, v)| (k.as_str(), Node::new(v))).collect(),
            _ => Vec::new(),
        }
    }

    /// Element count for arrays and objects, zero for everything else.
    pub fn len(self) -> usize {
        match self.0 {
            Some(Value::Array(a)) => a.len(),
            Some(Value::Object(m)) => m.len(),
            _ => 0,
        }
    }

    pub fn is_empty(self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn missing_paths_collapse_to_empty() {
        let value = json!({"a": {"b": [1, 2]}});
        let node = Node::new(&value);

        assert!(node.get("x").get("y").is_missing());
        assert_eq!(node.get("a").get("b").get("c").as_text(), "");
        assert_eq!(node.get("a").at(3).as_f64(), 0.0);
        assert!(node.get("nope").items().is_empty());
        assert!(node.get("a").get("b").at(0).get("k").entries().is_empty());
    }

    #[test]
    fn numbers_render_as_text() {
        let value = json!({"rank": 1, "avg": 3.6, "name": "x", "flag": true});
        let node = Node::new(&value);

        assert_eq!(node.text("rank"), "1");
        assert_eq!(node.text("avg"), "3.6");
        assert_eq!(node.text("name"), "x");
        assert_eq!(node.text("flag"), "");
    }

    #[test]
    fn numeric_strings_parse() {
        let value = json!({"score": "3.1", "prob": "35%", "junk": "high", "n": 4});
        let node = Node::new(&value);

        assert_eq!(node.f64("score"), 3.1);
        assert_eq!(node.f64("prob"), 35.0);
        assert_eq!(node.f64("junk"), 0.0);
        assert_eq!(node.f64("n"), 4.0);
    }

    #[test]
    fn truthiness_matches_emptiness() {
        let value = json!({"e": {}, "a": [], "s": "", "z": 0, "f": false, "full": {"k": 1}});
        let node = Node::new(&value);

        for key in ["e", "a", "s", "z", "f", "missing"] {
            assert!(!node.get(key).is_truthy(), "{key} should be falsy");
        }
        assert!(node.get("full").is_truthy());
    }

    #[test]
    fn entries_keep_document_order() {
        let data = AnalysisData::from_json(r#"{"scores": {"z": 1, "a": 2, "m": 3}}"#).unwrap();
        let keys: Vec<&str> = data
            .section("scores")
            .entries()
            .into_iter()
            .map(|(k, _)| k)
            .collect();
        assert_eq!(keys, ["z", "a", "m"]);
    }

    #[test]
    fn company_name_falls_back_to_pestel_meta() {
        let data = AnalysisData::from_json(
            r#"{"step_2_1_pestel": {"analysis_meta": {"company": "G임팩트"}}}"#,
        )
        .unwrap();
        assert_eq!(data.company_name(), "G임팩트");
        assert_eq!(AnalysisData::default().company_name(), DEFAULT_COMPANY);
    }

    #[test]
    fn non_object_root_is_rejected() {
        assert!(matches!(
            AnalysisData::from_json("[1, 2]"),
            Err(CoreError::NotAnObject(_))
        ));
    }
}
