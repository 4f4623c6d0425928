//! Internal-capability and strategy sections, 3.1 to 3.4.

use gimpact_core::data::{Node, step};
use gimpact_core::text::{clip, prefix, score_label};

use super::summary::hypothesis_teaser;
use super::{ReportBuilder, anchor, area_scores};
use crate::charts::{RoadmapStrategy, diagnosis_radar, strategy_roadmap};
use crate::element::Span;
use crate::styles::{Color, ScoreBand, palette};
use crate::tables::{
    QuadrantStats, SwotQuadrant, VrioCoverage, styled_table, swot_matrix_table, swot_stats_table, vrio_coverage_table,
};

const TOWS_TYPES: [&str; 4] = ["SO", "WO", "ST", "WT"];

const PORTFOLIO: [(&str, &str, Color); 3] = [
    ("sustained_advantage", "지속적 경쟁우위", Color::hex(0x10B981)),
    ("temporary_advantage", "일시적 경쟁우위", Color::hex(0x3B82F6)),
    ("competitive_parity", "경쟁 균형", Color::hex(0xF59E0B)),
];

/// SWOT quadrants in S, W, O, T order: data key, title and title color.
const SWOT_QUADRANTS: [(&str, &str, Color); 4] = [
    ("strengths", "강점 (S)", Color::hex(0x10B981)),
    ("weaknesses", "약점 (W)", Color::hex(0xEF4444)),
    ("opportunities", "기회 (O)", Color::hex(0x3B82F6)),
    ("threats", "위협 (T)", Color::hex(0xF59E0B)),
];

fn reliability_label(raw: &str) -> String {
    match raw {
        "✅" | "verified" => "높음".to_string(),
        "📊" | "partially_verified" => "중간".to_string(),
        "⚠️" | "⚠" | "unverified" => "낮음".to_string(),
        "" => "-".to_string(),
        other => prefix(other, 4).to_string(),
    }
}

fn verification_label(raw: &str) -> String {
    match raw {
        "verified" => "검증됨".to_string(),
        "partially_verified" => "부분검증".to_string(),
        "unverified" => "미검증".to_string(),
        other => other.to_string(),
    }
}

/// Priority stars from a TOWS total score.
pub fn priority_stars(total_score: f64) -> &'static str {
    if total_score >= 22.0 {
        "★★★"
    } else if total_score >= 20.0 {
        "★★"
    } else {
        "★"
    }
}

/// Criteria met by one resource, as (valuable, rare, inimitable, organized).
///
/// Prefers the assessment embedded in the resource; otherwise falls back to
/// the step-level `vrio_evaluation` keyed by resource id, where a score of 4
/// or more counts as met.
fn vrio_criteria(resource: Node<'_>, evaluations: Node<'_>) -> Option<[bool; 4]> {
    let inline = resource.get("vrio_evaluation");
    if inline.is_truthy() {
        let met = |key: &str| inline.get(key).get("assessment").is_truthy();
        return Some([met("valuable"), met("rare"), met("imitable"), met("organized")]);
    }

    let scored = evaluations.get(&resource.text("id"));
    if scored.is_truthy() {
        let met = |key: &str| scored.get(key).f64("score") >= 4.0;
        return Some([met("value"), met("rarity"), met("imitability"), met("organization")]);
    }
    None
}

fn vrio_coverage(resources: &[Node<'_>], evaluations: Node<'_>) -> VrioCoverage {
    let mut coverage = VrioCoverage::default();
    for criteria in resources.iter().filter_map(|r| vrio_criteria(*r, evaluations)) {
        coverage.evaluated += 1;
        let [valuable, rare, inimitable, organized] = criteria;
        coverage.valuable += usize::from(valuable);
        coverage.rare += usize::from(rare);
        coverage.inimitable += usize::from(inimitable);
        coverage.organized += usize::from(organized);
    }
    coverage
}

fn swot_lines(items: Node<'_>) -> Vec<String> {
    items
        .take(3)
        .iter()
        .map(|item| format!("• {} ({})", clip(&item.text("description"), 35), item.text("impact_score")))
        .collect()
}

impl ReportBuilder<'_> {
    pub fn build_diagnosis_detail(&mut self) {
        let diagnosis = self.section(step::DIAGNOSIS);

        self.add_anchor(anchor::DIAGNOSIS);
        self.add_h2("3.1 경영진단");

        let summary = diagnosis.text("executive_summary");
        if !summary.is_empty() {
            self.add_highlight_box(&clip(&summary, 300));
        }

        let scores = diagnosis.get("scores_summary");
        if scores.is_truthy() {
            self.add_chart(diagnosis_radar(&area_scores(scores)), 240.0, 240.0, None);

            let mut rows = vec![vec!["영역".to_string(), "점수".to_string(), "상태".to_string(), "핵심 평가".to_string()]];
            for (area, info) in scores.entries() {
                let score = info.f64("score");
                rows.push(vec![
                    area.to_string(),
                    score_label(score),
                    ScoreBand::of(score).label().to_string(),
                    clip(&info.text("evaluation"), 30),
                ]);
            }
            self.add_table(styled_table(rows, &[70.0, 45.0, 40.0, 295.0], palette::PRIMARY));
        }

        self.add_page_break();
    }

    pub fn build_vrio_detail(&mut self) {
        let vrio = self.section(step::VRIO);
        let resources = vrio.get("resource_identification").get("resources").take(5);

        self.add_anchor(anchor::VRIO);
        self.add_h2("3.2 VRIO 분석");

        if !resources.is_empty() {
            self.add_h3("핵심 자원");
            let mut rows = vec![vec![
                "ID".to_string(),
                "자원명".to_string(),
                "유형".to_string(),
                "신뢰도".to_string(),
                "검증상태".to_string(),
            ]];
            rows.extend(resources.iter().map(|r| {
                vec![
                    r.text("id"),
                    clip(&r.text("name"), 18),
                    r.text("type"),
                    reliability_label(&r.text("final_reliability")),
                    verification_label(&r.text("verification_status")),
                ]
            }));
            self.add_table(styled_table(rows, &[40.0, 140.0, 80.0, 50.0, 140.0], palette::VRIO));
        }

        let coverage = vrio_coverage(&resources, vrio.get("vrio_evaluation"));
        if coverage.evaluated > 0 {
            self.add_spacer(8.0);
            self.add_h3("VRIO 요소 충족 현황");
            self.add_table(vrio_coverage_table(&coverage));
        }

        let portfolio = vrio.get("portfolio_summary");
        if portfolio.is_truthy() {
            self.add_spacer(10.0);
            self.add_h3("경쟁 우위 포트폴리오");
            for (key, label, color) in PORTFOLIO {
                let items = portfolio.get(key).texts();
                if !items.is_empty() {
                    self.add_rich_body(vec![
                        Span::bold(format!("{label}:")).colored(color),
                        Span::plain(format!(" {}", items.join(", "))),
                    ]);
                }
            }
        }

        self.add_page_break();
    }

    pub fn build_swot_detail(&mut self) {
        let swot = self.section(step::SWOT);

        self.add_anchor(anchor::SWOT);
        self.add_h2("3.3 SWOT 분석");

        let quadrants = SWOT_QUADRANTS.map(|(key, title, color)| SwotQuadrant {
            title,
            color,
            lines: swot_lines(swot.get(key)),
        });
        self.add_table(swot_matrix_table(&quadrants));
        self.add_spacer(15.0);

        let insights = swot.get("key_insights").texts();
        if !insights.is_empty() {
            self.add_h3("핵심 인사이트");
            for (i, insight) in insights.iter().take(3).enumerate() {
                self.add_body(&format!("**{}.** {}", i + 1, clip(insight, 80)));
            }
        }

        let stats = SWOT_QUADRANTS.map(|(key, _, _)| {
            let impacts: Vec<f64> = swot.get(key).items().iter().map(|item| item.f64("impact_score")).collect();
            QuadrantStats::of(&impacts)
        });
        self.add_spacer(10.0);
        self.add_h3("SWOT 요약 통계");
        self.add_table(swot_stats_table(&stats));

        self.add_page_break();
    }

    /// Last section of the flow, so no trailing page break.
    pub fn build_tows_detail(&mut self) {
        let tows = self.section(step::TOWS);
        let options = tows.get("strategy_options");

        self.add_anchor(anchor::TOWS);
        self.add_h2("3.4 TOWS 전략");

        let mut rows = vec![vec![
            "유형".to_string(),
            "전략명".to_string(),
            "핵심 가설".to_string(),
            "점수".to_string(),
            "우선순위".to_string(),
        ]];
        for kind in TOWS_TYPES {
            for strategy in options.get(kind).take(2) {
                let evaluation = strategy.get("evaluation");
                let score = evaluation.get("total_score");
                let score_text = if score.is_missing() { "0".to_string() } else { score.as_text() };
                rows.push(vec![
                    kind.to_string(),
                    clip(&strategy.text("name"), 18),
                    hypothesis_teaser(&strategy.text("hypothesis")),
                    score_text,
                    priority_stars(score.as_f64()).to_string(),
                ]);
            }
        }
        if rows.len() > 1 {
            self.add_table(styled_table(rows, &[40.0, 120.0, 180.0, 40.0, 70.0], palette::PRIMARY));
        }
        self.add_spacer(15.0);

        let decision = tows.get("decision_summary");
        let top = decision.get("top_3_strategies").take(3);
        if !top.is_empty() {
            self.add_h3("최종 전략 우선순위");
            let mut rows = vec![vec!["순위".to_string(), "전략".to_string(), "유형".to_string(), "선정 근거".to_string()]];
            rows.extend(top.iter().map(|s| {
                vec![
                    s.text("rank"),
                    clip(&s.text("name"), 20),
                    s.text("type"),
                    clip(&s.text("rationale"), 35),
                ]
            }));
            self.add_table(styled_table(rows, &[40.0, 140.0, 50.0, 220.0], palette::SECONDARY));
        }

        let actions = decision.get("immediate_actions").take(3);
        if !actions.is_empty() {
            self.add_spacer(15.0);
            self.add_h3("즉시 실행 과제");
            for action in &actions {
                self.add_body(&format!("• {}", action.text("action")));
                self.add_small(&format!("담당: {} / 기한: {}", action.text("owner"), action.text("deadline")));
            }
        }

        if !top.is_empty() {
            self.add_spacer(15.0);
            self.add_h3("전략 실행 로드맵");
            let strategies: Vec<_> = top
                .iter()
                .map(|s| RoadmapStrategy::new(s.text("rank"), s.text("name"), s.text("type")))
                .collect();
            self.add_chart(strategy_roadmap(&strategies), 440.0, 160.0, None);
        }
    }
}

#[cfg(test)]
mod tests {
    use gimpact_core::data::AnalysisData;
    use gimpact_core::sample::sample_data;
    use serde_json::json;

    use super::*;
    use crate::element::{Element, Paragraph};

    fn built<'a>(data: &'a AnalysisData, build: fn(&mut ReportBuilder<'a>)) -> Vec<Element> {
        let mut builder = ReportBuilder::new(data, "Acme");
        build(&mut builder);
        builder.into_elements()
    }

    #[test]
    fn stars_follow_total_score() {
        assert_eq!(priority_stars(24.0), "★★★");
        assert_eq!(priority_stars(22.0), "★★★");
        assert_eq!(priority_stars(21.9), "★★");
        assert_eq!(priority_stars(20.0), "★★");
        assert_eq!(priority_stars(19.0), "★");
        assert_eq!(priority_stars(0.0), "★");
    }

    #[test]
    fn reliability_symbols_and_words() {
        assert_eq!(reliability_label("✅"), "높음");
        assert_eq!(reliability_label("partially_verified"), "중간");
        assert_eq!(reliability_label("⚠️"), "낮음");
        assert_eq!(reliability_label(""), "-");
        assert_eq!(reliability_label("somewhat"), "some");
        assert_eq!(verification_label("verified"), "검증됨");
        assert_eq!(verification_label("pending"), "pending");
    }

    #[test]
    fn inline_assessments_drive_coverage() {
        let resources = json!([
            {"id": "R1", "vrio_evaluation": {"valuable": {"assessment": true}, "rare": {"assessment": "yes"}}},
            {"id": "R2", "vrio_evaluation": {"valuable": {"assessment": false}, "organized": {"assessment": true}}},
            {"id": "R3"}
        ]);
        let nodes = Node::new(&resources).items();
        let coverage = vrio_coverage(&nodes, Node::MISSING);
        assert_eq!(coverage.evaluated, 2);
        assert_eq!((coverage.valuable, coverage.rare, coverage.inimitable, coverage.organized), (1, 1, 0, 1));
    }

    #[test]
    fn step_level_scores_are_the_fallback() {
        let data = sample_data().expect("sample");
        let vrio = data.section(step::VRIO);
        let resources = vrio.get("resource_identification").get("resources").take(5);
        let coverage = vrio_coverage(&resources, vrio.get("vrio_evaluation"));
        // only R1 is scored: value 5, rarity 5, imitability 5, organization 2
        assert_eq!(coverage.evaluated, 1);
        assert_eq!((coverage.valuable, coverage.rare, coverage.inimitable, coverage.organized), (1, 1, 1, 0));
    }

    #[test]
    fn diagnosis_rows_show_band_labels() {
        let mut data = AnalysisData::default();
        data.insert(
            step::DIAGNOSIS,
            json!({"scores_summary": {"재무": {"score": "4.0", "evaluation": "안정"}, "조직": {"score": 2.6}}}),
        );
        let elements = built(&data, ReportBuilder::build_diagnosis_detail);
        let table = elements.iter().find_map(Element::as_table).expect("table");
        assert_eq!(table.text_rows()[1], ["재무", "4.0", "양호", "안정"]);
        assert_eq!(table.text_rows()[2], ["조직", "2.6", "취약", ""]);
    }

    #[test]
    fn tows_table_pairs_per_type() {
        let data = sample_data().expect("sample");
        let elements = built(&data, ReportBuilder::build_tows_detail);
        let table = elements.iter().find_map(Element::as_table).expect("strategy table");
        let rows = table.text_rows();
        assert_eq!(rows.len(), 6);
        assert_eq!(rows[1][0], "SO");
        assert_eq!(rows[1][3], "24");
        assert_eq!(rows[1][4], "★★★");
        assert!(rows[1][2].ends_with("..."));
        assert!(matches!(elements.last(), Some(Element::Spacer(_))));
    }

    #[test]
    fn swot_sections_render_without_data() {
        let data = AnalysisData::default();
        let elements = built(&data, ReportBuilder::build_swot_detail);
        let tables: Vec<_> = elements.iter().filter_map(Element::as_table).collect();
        assert_eq!(tables.len(), 2);
        assert_eq!(tables[1].text_rows()[1], ["강점 (S)", "0", "0.0/5", "보통"]);
        let headings: Vec<_> = elements
            .iter()
            .filter_map(Element::as_paragraph)
            .map(Paragraph::plain_text)
            .collect();
        assert!(!headings.contains(&"핵심 인사이트".to_string()));
    }
}
