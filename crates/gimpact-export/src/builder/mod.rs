//! Turns an [`AnalysisData`] document into the ordered flowables of a
//! report.
//!
//! Every section reads a fixed path, treats missing branches as empty and
//! appends what it can. Nothing here fails: a payload without any handoff
//! still yields headings and page breaks.

mod environment;
mod internal;
mod summary;

use std::collections::BTreeMap;

use gimpact_core::data::{AnalysisData, Node};

use crate::charts::{AreaScore, ChartImage};
use crate::element::{Element, Figure, Paragraph, Rule, Span};
use crate::markup::parse_inline;
use crate::styles::{DocumentStyles, palette};
use crate::tables::{Table, highlight_box};

/// Anchor names of the sections listed in the table of contents.
pub mod anchor {
    pub const ONE_PAGE_SUMMARY: &str = "one_page_summary";
    pub const EXECUTIVE_SUMMARY: &str = "executive_summary";
    pub const PESTEL: &str = "pestel";
    pub const SCENARIO: &str = "scenario";
    pub const COMPETITION: &str = "competition";
    pub const CUSTOMER: &str = "customer";
    pub const MARKET: &str = "market";
    pub const DIAGNOSIS: &str = "diagnosis";
    pub const VRIO: &str = "vrio";
    pub const SWOT: &str = "swot";
    pub const TOWS: &str = "tows";
}

pub struct ReportBuilder<'a> {
    data: &'a AnalysisData,
    company_name: String,
    styles: DocumentStyles,
    toc_pages: BTreeMap<String, usize>,
    elements: Vec<Element>,
}

impl<'a> ReportBuilder<'a> {
    pub fn new(data: &'a AnalysisData, company_name: impl Into<String>) -> Self {
        Self {
            data,
            company_name: company_name.into(),
            styles: DocumentStyles::default(),
            toc_pages: BTreeMap::new(),
            elements: Vec::new(),
        }
    }

    /// Page numbers printed in the table of contents, keyed by anchor.
    /// Sections without an entry keep their default number.
    pub fn with_toc_pages(mut self, pages: BTreeMap<String, usize>) -> Self {
        self.toc_pages = pages;
        self
    }

    pub fn into_elements(self) -> Vec<Element> {
        self.elements
    }

    /// The full summary flow: contents, one-page summary, executive summary
    /// and the step sections.
    pub fn build(mut self) -> Vec<Element> {
        self.build_table_of_contents();
        self.build_one_page_summary();
        self.build_executive_summary();
        self.build_detailed_sections();
        self.elements
    }

    pub fn build_detailed_sections(&mut self) {
        self.add_h1("단계별 상세 분석");
        self.add_line();

        self.build_pestel_detail();
        self.build_scenario_detail();
        self.build_competition_detail();
        self.build_customer_detail();
        self.build_market_detail();
        self.build_diagnosis_detail();
        self.build_vrio_detail();
        self.build_swot_detail();
        self.build_tows_detail();
    }

    fn section(&self, key: &str) -> Node<'a> {
        self.data.section(key)
    }

    pub fn push(&mut self, element: Element) {
        self.elements.push(element);
    }

    pub fn add_anchor(&mut self, name: &str) {
        self.push(Element::Anchor(name.to_string()));
    }

    pub fn add_h1(&mut self, text: &str) {
        self.push(Element::Paragraph(Paragraph::new(text, self.styles.h1)));
    }

    pub fn add_h2(&mut self, text: &str) {
        self.push(Element::Paragraph(Paragraph::new(text, self.styles.h2)));
    }

    pub fn add_h3(&mut self, text: &str) {
        self.push(Element::Paragraph(Paragraph::new(text, self.styles.h3)));
    }

    /// Body paragraph; `**…**` marks bold runs.
    pub fn add_body(&mut self, text: &str) {
        self.push(Element::Paragraph(Paragraph::rich(parse_inline(text), self.styles.body)));
    }

    pub fn add_small(&mut self, text: &str) {
        self.push(Element::Paragraph(Paragraph::rich(parse_inline(text), self.styles.small)));
    }

    pub fn add_rich_body(&mut self, spans: Vec<Span>) {
        self.push(Element::Paragraph(Paragraph::rich(spans, self.styles.body)));
    }

    pub fn add_rich_small(&mut self, spans: Vec<Span>) {
        self.push(Element::Paragraph(Paragraph::rich(spans, self.styles.small)));
    }

    pub fn add_bullet(&mut self, text: &str) {
        let mut spans = vec![Span::plain("• ")];
        spans.extend(parse_inline(text));
        self.push(Element::Paragraph(Paragraph::rich(spans, self.styles.bullet)));
    }

    pub fn add_spacer(&mut self, height: f32) {
        self.push(Element::Spacer(height));
    }

    pub fn add_line(&mut self) {
        self.push(Element::Rule(Rule::default()));
    }

    pub fn add_page_break(&mut self) {
        self.push(Element::PageBreak);
    }

    pub fn add_table(&mut self, table: Table) {
        self.push(Element::Table(table));
    }

    pub fn add_chart(&mut self, image: ChartImage, width: f32, height: f32, caption: Option<&str>) {
        self.push(Element::Chart(Figure::new(image, width, height)));
        if let Some(caption) = caption {
            self.push(Element::Paragraph(Paragraph::new(caption, self.styles.caption)));
        }
        self.add_spacer(8.0);
    }

    pub fn add_highlight_box(&mut self, text: &str) {
        self.add_table(highlight_box(parse_inline(text), palette::SKY));
        self.add_spacer(10.0);
    }
}

/// Diagnosis areas in document order with their parsed scores.
fn area_scores(scores: Node<'_>) -> Vec<AreaScore> {
    scores
        .entries()
        .into_iter()
        .map(|(area, info)| AreaScore::new(area, info.f64("score")))
        .collect()
}

#[cfg(test)]
mod tests {
    use gimpact_core::sample::sample_data;
    use serde_json::json;

    use super::*;

    fn tables(elements: &[Element]) -> Vec<&Table> {
        elements.iter().filter_map(Element::as_table).collect()
    }

    fn texts(elements: &[Element]) -> Vec<String> {
        elements
            .iter()
            .filter_map(Element::as_paragraph)
            .map(Paragraph::plain_text)
            .collect()
    }

    #[test]
    fn every_table_is_rectangular() {
        let data = sample_data().expect("sample");
        let elements = ReportBuilder::new(&data, "G임팩트").build();
        let tables = tables(&elements);
        assert!(tables.len() > 15);
        for table in tables {
            assert!(table.is_rectangular(), "ragged table: {:?}", table.text_rows());
        }
    }

    #[test]
    fn empty_document_renders_headings_only() {
        let data = AnalysisData::default();
        let elements = ReportBuilder::new(&data, "기업명").build();
        let headings = texts(&elements);

        for heading in ["목 차", "2.1 PESTEL 분석", "3.3 SWOT 분석", "3.4 TOWS 전략"] {
            assert!(headings.iter().any(|h| h == heading), "missing {heading}");
        }
        assert!(!elements.iter().any(|e| matches!(e, Element::Chart(_))));
        // contents, PESTEL summary and SWOT matrix/stats are unconditional
        assert_eq!(tables(&elements).len(), 4);
    }

    #[test]
    fn wrong_shapes_are_tolerated() {
        let mut data = AnalysisData::default();
        data.insert("step_3_3_swot", json!("not an object"));
        data.insert("step_2_2_scenario", json!({"scenarios": [1, 2, 3]}));
        data.insert("step_3_4_tows", json!({"strategy_options": {"SO": "x"}}));
        let elements = ReportBuilder::new(&data, "x").build();
        assert!(!elements.is_empty());
    }

    #[test]
    fn anchors_cover_every_contents_line() {
        let data = sample_data().expect("sample");
        let elements = ReportBuilder::new(&data, "G임팩트").build();
        let anchors: Vec<_> = elements
            .iter()
            .filter_map(|e| match e {
                Element::Anchor(name) => Some(name.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(anchors.len(), 11);
        assert_eq!(anchors[0], anchor::ONE_PAGE_SUMMARY);
        assert_eq!(anchors[10], anchor::TOWS);
    }

    #[test]
    fn toc_pages_override_defaults() {
        let data = AnalysisData::default();
        let pages = BTreeMap::from([(anchor::PESTEL.to_string(), 7)]);
        let elements = ReportBuilder::new(&data, "x").with_toc_pages(pages).build();
        let toc = tables(&elements)[0].text_rows();
        assert_eq!(toc[0], ["1PAGE 요약", "핵심 결론과 전략 방향", "3"]);
        assert_eq!(toc[2][2], "7");
    }

    #[test]
    fn area_scores_keep_document_order() {
        let data = sample_data().expect("sample");
        let scores = area_scores(data.section("step_3_1_diagnosis").get("scores_summary"));
        assert_eq!(scores.len(), 5);
        assert!((scores[0].score - 3.1).abs() < 1e-9);
    }
}
