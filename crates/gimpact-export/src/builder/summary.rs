use gimpact_core::data::step;
use gimpact_core::text::{clip, prefix};

use super::{ReportBuilder, anchor, area_scores};
use crate::charts::score_bar_chart;
use crate::element::{Element, Paragraph, Span};
use crate::styles::{Align, Color, ParagraphStyle, palette};
use crate::tables::{CellRange, Table, TableCommand, TocEntry, styled_table, toc_table};

const CONTENTS: [(&str, &str, &str, usize); 11] = [
    (anchor::ONE_PAGE_SUMMARY, "1PAGE 요약", "핵심 결론과 전략 방향", 3),
    (anchor::EXECUTIVE_SUMMARY, "경영진 요약", "현황 진단 및 90일 로드맵", 4),
    (anchor::PESTEL, "2.1 PESTEL 분석", "거시환경 6대 영역 분석", 6),
    (anchor::SCENARIO, "2.2 시나리오 분석", "미래 4대 시나리오", 8),
    (anchor::COMPETITION, "2.3 경쟁환경 분석", "Five Forces 및 경쟁사", 9),
    (anchor::CUSTOMER, "2.4 고객 분석", "User/Payer/Beneficiary", 10),
    (anchor::MARKET, "2.5 시장 분석", "TAM/SAM/SOM 시장규모", 11),
    (anchor::DIAGNOSIS, "3.1 경영진단", "5대 영역 역량 평가", 12),
    (anchor::VRIO, "3.2 VRIO 분석", "핵심 자원 경쟁우위", 13),
    (anchor::SWOT, "3.3 SWOT 분석", "강점/약점/기회/위협", 14),
    (anchor::TOWS, "3.4 TOWS 전략", "전략 옵션 및 우선순위", 15),
];

const STRATEGY_TYPES: [(&str, &str); 4] = [
    ("SO", "SO 전략 (공격)"),
    ("WO", "WO 전략 (전환)"),
    ("ST", "ST 전략 (방어)"),
    ("WT", "WT 전략 (생존)"),
];

/// `hypothesis` cut to 50 characters and always followed by an ellipsis.
pub(super) fn hypothesis_teaser(hypothesis: &str) -> String {
    format!("{}...", prefix(hypothesis, 50))
}

impl ReportBuilder<'_> {
    pub fn build_table_of_contents(&mut self) {
        let title = ParagraphStyle::new(20.0, 24.0)
            .bold()
            .color(palette::PRIMARY)
            .align(Align::Center)
            .spacing(0.0, 25.0);
        self.push(Element::Paragraph(Paragraph::new("목 차", title)));
        self.add_line();
        self.add_spacer(15.0);

        let entries: Vec<TocEntry> = CONTENTS
            .iter()
            .map(|&(anchor, title, description, default_page)| TocEntry {
                anchor,
                title,
                description,
                page: self.toc_pages.get(anchor).copied().unwrap_or(default_page),
            })
            .collect();
        self.add_table(toc_table(&entries));

        self.add_page_break();
    }

    pub fn build_one_page_summary(&mut self) {
        let swot = self.section(step::SWOT);
        let decision = self.section(step::TOWS).get("decision_summary");
        let scores = self.section(step::DIAGNOSIS).get("scores_summary");

        self.add_anchor(anchor::ONE_PAGE_SUMMARY);
        let title = ParagraphStyle::new(16.0, 20.0)
            .bold()
            .color(palette::PRIMARY)
            .align(Align::Center)
            .spacing(0.0, 10.0);
        let heading = format!("{} 분석 요약", self.company_name);
        self.push(Element::Paragraph(Paragraph::new(heading, title)));
        self.add_line();

        self.add_h3("핵심 결론");
        for (i, insight) in swot.get("key_insights").texts().iter().take(3).enumerate() {
            self.add_small(&format!("**{}.** {}", i + 1, clip(insight, 55)));
        }
        self.add_spacer(5.0);

        self.add_h3("종합 진단");
        if scores.is_truthy() {
            self.add_chart(score_bar_chart(&area_scores(scores)), 400.0, 120.0, None);
        }
        self.add_spacer(5.0);

        self.add_h3("핵심 전략 TOP 3");
        let top = decision.get("top_3_strategies").take(3);
        if !top.is_empty() {
            let mut rows = vec![vec!["순위".to_string(), "전략명".to_string(), "유형".to_string(), "핵심 근거".to_string()]];
            rows.extend(top.iter().map(|s| {
                vec![
                    s.text("rank"),
                    clip(&s.text("name"), 18),
                    s.text("type"),
                    clip(&s.text("rationale"), 28),
                ]
            }));
            self.add_table(styled_table(rows, &[35.0, 120.0, 40.0, 200.0], palette::PRIMARY));
        }
        self.add_spacer(5.0);

        self.add_h3("즉시 실행 과제");
        let actions = decision.get("immediate_actions").take(2);
        if !actions.is_empty() {
            let mut rows = vec![vec!["과제".to_string(), "담당".to_string(), "기한".to_string()]];
            rows.extend(
                actions
                    .iter()
                    .map(|a| vec![clip(&a.text("action"), 35), a.text("owner"), a.text("deadline")]),
            );
            let table = Table::from_text(rows, vec![280.0, 60.0, 60.0]).with_style([
                TableCommand::FontSize(CellRange::ALL, 8.0),
                TableCommand::Bold(CellRange::HEADER, true),
                TableCommand::Background(CellRange::HEADER, palette::WARNING),
                TableCommand::TextColor(CellRange::HEADER, palette::WHITE),
                TableCommand::Grid(CellRange::ALL, 0.5, palette::RULE),
                TableCommand::RowHeight(CellRange::ALL, 18.0),
            ]);
            self.add_table(table);
        }

        self.add_page_break();
    }

    pub fn build_executive_summary(&mut self) {
        let pestel = self.section(step::PESTEL);
        let swot = self.section(step::SWOT);
        let tows = self.section(step::TOWS);

        self.add_anchor(anchor::EXECUTIVE_SUMMARY);
        self.add_h1("경영진용 요약 (Executive Summary)");
        self.add_line();

        self.add_h2("1. 현황 진단");
        let summary = pestel.text("executive_summary");
        if !summary.is_empty() {
            self.add_highlight_box(&summary);
        }

        self.add_h3("▶ 외부환경 (기회 vs 위협)");
        let synthesis = pestel.get("synthesis");
        let factors = |key: &str| {
            synthesis
                .get(key)
                .take(2)
                .iter()
                .map(|item| clip(&item.text("factor"), 20))
                .collect::<Vec<_>>()
        };
        let opportunities = factors("top_5_opportunities");
        if !opportunities.is_empty() {
            self.add_labelled_small("주요 기회:", palette::OPPORTUNITY, &opportunities.join(" / "));
        }
        let threats = factors("top_5_threats");
        if !threats.is_empty() {
            self.add_labelled_small("주요 위협:", palette::THREAT, &threats.join(" / "));
        }
        self.add_spacer(8.0);

        self.add_h3("▶ 내부역량 (강점 vs 약점)");
        let descriptions = |key: &str| {
            swot.get(key)
                .take(2)
                .iter()
                .map(|item| clip(&item.text("description"), 25))
                .collect::<Vec<_>>()
        };
        let strengths = descriptions("strengths");
        if !strengths.is_empty() {
            self.add_labelled_small("핵심 강점:", palette::STRENGTH, &strengths.join(" / "));
        }
        let weaknesses = descriptions("weaknesses");
        if !weaknesses.is_empty() {
            self.add_labelled_small("핵심 약점:", palette::WEAKNESS, &weaknesses.join(" / "));
        }
        self.add_spacer(15.0);

        self.add_h2("2. 전략 방향");
        let options = tows.get("strategy_options");
        for (kind, label) in STRATEGY_TYPES {
            let top = options.get(kind).at(0);
            if top.is_truthy() {
                let name = top.text("name");
                let teaser = hypothesis_teaser(&top.text("hypothesis"));
                self.add_rich_body(vec![
                    Span::bold(format!("{label}:")),
                    Span::plain(format!(" {name} - {teaser}")),
                ]);
            }
        }
        self.add_spacer(15.0);

        self.add_h2("3. 90일 실행 로드맵");
        let sequence = tows.get("strategy_sequencing").get("optimal_sequence");
        let mut roadmap = vec![vec!["단계".to_string(), "기간".to_string(), "핵심 전략".to_string(), "목표".to_string()]];
        for (i, key) in ["phase_1", "phase_2", "phase_3"].iter().enumerate() {
            let phase = sequence.get(key);
            if phase.is_truthy() {
                roadmap.push(vec![
                    format!("Phase {}", i + 1),
                    phase.text("period"),
                    phase.get("strategies").texts().join(", "),
                    clip(&phase.text("goals"), 35),
                ]);
            }
        }
        if roadmap.len() > 1 {
            self.add_table(styled_table(roadmap, &[55.0, 70.0, 100.0, 225.0], palette::PRIMARY));
        }
        self.add_spacer(15.0);

        self.add_h2("4. 핵심 리스크");
        let risks = tows.get("risk_management").get("pre_mortem").take(3);
        if !risks.is_empty() {
            let mut rows = vec![vec!["리스크".to_string(), "발생확률".to_string(), "예방조치".to_string()]];
            rows.extend(risks.iter().map(|r| {
                vec![
                    clip(&r.text("failure_cause"), 30),
                    r.text("probability"),
                    clip(&r.text("preventive_action"), 35),
                ]
            }));
            self.add_table(styled_table(rows, &[160.0, 60.0, 230.0], palette::DANGER));
        }

        self.add_page_break();
    }

    /// Small paragraph opening with a colored bold label.
    fn add_labelled_small(&mut self, label: &str, color: Color, text: &str) {
        self.add_rich_small(vec![Span::bold(label).colored(color), Span::plain(format!(" {text}"))]);
    }
}
