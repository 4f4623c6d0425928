//! External-environment sections, 2.1 to 2.5.

use gimpact_core::data::{Node, step};
use gimpact_core::text::clip;

use super::{ReportBuilder, anchor};
use crate::charts::{
    FiveForces, ScenarioAxes, ScenarioPoint, concentric_market_chart, five_forces_chart, scenario_matrix,
    scenario_probability_chart,
};
use crate::element::Figure;
use crate::styles::palette;
use crate::tables::{PestelAreaSummary, chart_row, pestel_summary_table, styled_table};

/// PESTEL areas: key, heading, summary-table abbreviation and short name.
const PESTEL_AREAS: [(&str, &str, &str, &str); 6] = [
    ("political", "Political (정치)", "P", "정치"),
    ("economic", "Economic (경제)", "E", "경제"),
    ("social", "Social (사회)", "S", "사회"),
    ("technological", "Technological (기술)", "T", "기술"),
    ("environmental", "Environmental (환경)", "En", "환경"),
    ("legal", "Legal (법률)", "L", "법률"),
];

const SCENARIO_KEYS: [&str; 4] = ["scenario_1", "scenario_2", "scenario_3", "scenario_4"];

const CUSTOMER_ROLES: [(&str, &str); 3] = [
    ("user", "User (사용자)"),
    ("payer", "Payer (지불자)"),
    ("beneficiary", "Beneficiary (수혜자)"),
];

fn is_classified(issue: Node<'_>, korean: &str, english: &str) -> bool {
    let classification = issue.text("classification");
    let classification = classification.trim();
    classification == korean || classification.eq_ignore_ascii_case(english)
}

/// Opportunity and threat counts plus the mean whole-number impact.
fn pestel_area_summary(area: Node<'_>, abbreviation: &'static str, name: &'static str) -> PestelAreaSummary {
    let issues = area.get("issues").items();
    let opportunities = issues.iter().filter(|i| is_classified(**i, "기회", "opportunity")).count();
    let threats = issues.iter().filter(|i| is_classified(**i, "위협", "threat")).count();
    let average_impact = if issues.is_empty() {
        0.0
    } else {
        issues.iter().map(|i| i.f64("impact_score").trunc()).sum::<f64>() / issues.len() as f64
    };
    PestelAreaSummary {
        abbreviation,
        name,
        opportunities,
        threats,
        average_impact,
    }
}

impl ReportBuilder<'_> {
    pub fn build_pestel_detail(&mut self) {
        let pestel = self.section(step::PESTEL);
        let areas = pestel.get("pestel");

        self.add_anchor(anchor::PESTEL);
        self.add_h2("2.1 PESTEL 분석");

        let summaries: Vec<_> = PESTEL_AREAS
            .iter()
            .map(|&(key, _, abbreviation, name)| pestel_area_summary(areas.get(key), abbreviation, name))
            .collect();
        self.add_table(pestel_summary_table(&summaries));
        self.add_spacer(12.0);

        for (key, heading, _, _) in PESTEL_AREAS {
            let area = areas.get(key);
            if !area.is_truthy() {
                continue;
            }
            self.add_h3(&format!("▶ {heading}"));
            let summary = area.text("summary");
            if !summary.is_empty() {
                self.add_small(&summary);
            }

            let issues = area.get("issues").take(4);
            if !issues.is_empty() {
                let mut rows = vec![vec![
                    "ID".to_string(),
                    "이슈".to_string(),
                    "영향".to_string(),
                    "긴급".to_string(),
                    "분류".to_string(),
                ]];
                rows.extend(issues.iter().map(|issue| {
                    vec![
                        issue.text("id"),
                        clip(&issue.text("name"), 20),
                        issue.text("impact_score"),
                        issue.text("urgency_score"),
                        issue.text("classification"),
                    ]
                }));
                self.add_table(styled_table(rows, &[35.0, 180.0, 45.0, 45.0, 50.0], palette::PESTEL));
                self.add_spacer(8.0);
            }
        }

        let synthesis = pestel.get("synthesis");

        self.add_h3("TOP 5 기회");
        let opportunities = synthesis.get("top_5_opportunities").take(5);
        if !opportunities.is_empty() {
            let mut rows = vec![vec!["순위".to_string(), "영역".to_string(), "요인".to_string(), "실행방향".to_string()]];
            rows.extend(opportunities.iter().map(|o| {
                vec![o.text("rank"), o.text("area"), clip(&o.text("factor"), 18), clip(&o.text("action"), 30)]
            }));
            self.add_table(styled_table(rows, &[40.0, 60.0, 130.0, 220.0], palette::ACCENT));
        }
        self.add_spacer(8.0);

        self.add_h3("TOP 5 위협");
        let threats = synthesis.get("top_5_threats").take(5);
        if !threats.is_empty() {
            let mut rows = vec![vec!["순위".to_string(), "영역".to_string(), "요인".to_string(), "대응방향".to_string()]];
            rows.extend(threats.iter().map(|t| {
                vec![t.text("rank"), t.text("area"), clip(&t.text("factor"), 18), clip(&t.text("mitigation"), 30)]
            }));
            self.add_table(styled_table(rows, &[40.0, 60.0, 130.0, 220.0], palette::DANGER));
        }

        self.add_page_break();
    }

    pub fn build_scenario_detail(&mut self) {
        let scenario = self.section(step::SCENARIO);
        let scenarios = scenario.get("scenarios");

        self.add_anchor(anchor::SCENARIO);
        self.add_h2("2.2 시나리오 분석");

        let present: Vec<Node<'_>> = SCENARIO_KEYS
            .iter()
            .map(|key| scenarios.get(key))
            .filter(|s| s.is_truthy())
            .collect();

        if !present.is_empty() {
            let points: Vec<_> = present
                .iter()
                .map(|s| ScenarioPoint::new(s.text_or("quadrant", "++"), s.text("name"), s.text("probability")))
                .collect();

            let uncertainty = scenario.get("uncertainty_analysis");
            let mut axes = ScenarioAxes::default();
            let (x, y) = (
                uncertainty.get("axis_1").text("name"),
                uncertainty.get("axis_2").text("name"),
            );
            if !x.is_empty() {
                axes.x = x;
            }
            if !y.is_empty() {
                axes.y = y;
            }

            let matrix = Figure::new(scenario_matrix(&points, &axes), 260.0, 200.0);
            let donut = Figure::new(scenario_probability_chart(&points), 180.0, 150.0);
            self.add_table(chart_row(vec![matrix, donut], vec![280.0, 200.0]));
            self.add_spacer(15.0);
        }

        for s in &present {
            self.add_h3(&format!("● {} ({})", s.text("name"), s.text("probability")));
            self.add_small(&clip(&s.text("narrative"), 150));

            let responses = s.get("strategic_response").texts();
            if !responses.is_empty() {
                let shown: Vec<_> = responses.iter().take(2).map(String::as_str).collect();
                self.add_small(&format!("**대응전략:** {}", shown.join(" / ")));
            }
            self.add_spacer(5.0);
        }

        let common = scenario.get("robust_strategy").get("common_strategies").texts();
        if !common.is_empty() {
            self.add_h3("강건한 전략 (모든 시나리오 공통)");
            for strategy in common.iter().take(3) {
                self.add_bullet(strategy);
            }
        }

        self.add_page_break();
    }

    pub fn build_competition_detail(&mut self) {
        let competition = self.section(step::COMPETITION);
        let forces = competition.get("five_forces");

        self.add_anchor(anchor::COMPETITION);
        self.add_h2("2.3 경쟁환경 분석");

        if forces.is_truthy() {
            let score = |key: &str| forces.get(key).f64("score");
            let chart = five_forces_chart(&FiveForces {
                new_entrants: score("new_entrants"),
                rivalry: score("rivalry"),
                substitutes: score("substitutes"),
                supplier_power: score("supplier_power"),
                buyer_power: score("buyer_power"),
            });
            self.add_chart(chart, 280.0, 280.0, None);
        }

        let overall = forces.get("overall");
        if overall.is_truthy() {
            self.add_small(&format!(
                "**산업 매력도:** {} (평균: {}/5)",
                overall.text("industry_attractiveness"),
                overall.text("average_score")
            ));
        }

        let competitors = competition
            .get("competitor_analysis")
            .get("business_competitors")
            .take(4);
        if !competitors.is_empty() {
            self.add_h3("주요 경쟁사");
            let mut rows = vec![vec![
                "경쟁사".to_string(),
                "유형".to_string(),
                "강점".to_string(),
                "약점".to_string(),
                "위협도".to_string(),
            ]];
            rows.extend(competitors.iter().map(|c| {
                vec![
                    clip(&c.text("name"), 12),
                    c.text("type"),
                    clip(&c.get("strengths").at(0).as_text(), 15),
                    clip(&c.get("weaknesses").at(0).as_text(), 15),
                    c.text("threat_level"),
                ]
            }));
            self.add_table(styled_table(rows, &[80.0, 60.0, 110.0, 110.0, 60.0], palette::PRIMARY));
        }

        self.add_page_break();
    }

    pub fn build_customer_detail(&mut self) {
        let customer = self.section(step::CUSTOMER);
        let ecosystem = customer.get("customer_ecosystem");

        self.add_anchor(anchor::CUSTOMER);
        self.add_h2("2.4 고객 분석");

        for (role, heading) in CUSTOMER_ROLES {
            let profile = ecosystem.get(role);
            if !profile.is_truthy() {
                continue;
            }
            self.add_h3(&format!("▶ {heading}"));
            self.add_body(&format!("**프로필:** {}", profile.text("profile")));

            let functional = profile.get("jtbd").get("functional").texts();
            if !functional.is_empty() {
                let shown: Vec<_> = functional.iter().take(3).map(String::as_str).collect();
                self.add_small(&format!("**JTBD:** {}", shown.join(", ")));
            }
            self.add_spacer(5.0);
        }

        let priority = customer.get("segment_priority_matrix");
        if priority.is_truthy() {
            self.add_h3("세그먼트 우선순위");
            let mut rows = vec![vec![
                "우선순위".to_string(),
                "세그먼트".to_string(),
                "선정이유".to_string(),
                "접근전략".to_string(),
            ]];
            for (rank, key) in [("1", "priority_1"), ("2", "priority_2")] {
                let p = priority.get(key);
                if p.is_truthy() {
                    rows.push(vec![
                        rank.to_string(),
                        p.text("segment"),
                        clip(&p.text("reason"), 25),
                        clip(&p.text("approach_strategy"), 25),
                    ]);
                }
            }
            if rows.len() > 1 {
                self.add_table(styled_table(rows, &[55.0, 100.0, 150.0, 145.0], palette::PRIMARY));
            }
        }

        self.add_page_break();
    }

    pub fn build_market_detail(&mut self) {
        let market = self.section(step::MARKET);
        let sizing = market.get("market_sizing");

        self.add_anchor(anchor::MARKET);
        self.add_h2("2.5 시장 분석");

        let tam_node = sizing.get("tam");
        if tam_node.is_truthy() {
            let tam = tam_node.get("triangulation").f64("confirmed_tam");
            let sam = sizing.get("sam").f64("total");
            let som = sizing.get("som").get("year_1").f64("value");
            if tam > 0.0 {
                self.add_h3("시장 규모");
                self.add_chart(concentric_market_chart(tam, sam, som), 320.0, 320.0, None);
            }
        }

        let growth = market.get("market_trends").get("growth_rates");
        if growth.is_truthy() {
            self.add_h3("시장 성장률");
            let mut rows = vec![vec!["구분".to_string(), "성장률".to_string(), "기간".to_string()]];
            for (key, label) in [("historical_cagr", "과거"), ("forecast_short", "단기"), ("forecast_mid", "중기")] {
                let rate = growth.get(key);
                if rate.is_truthy() {
                    rows.push(vec![label.to_string(), format!("{}%", rate.text("value")), rate.text("period")]);
                }
            }
            if rows.len() > 1 {
                self.add_table(styled_table(rows, &[100.0, 100.0, 250.0], palette::PRIMARY));
            }
        }

        self.add_page_break();
    }
}
