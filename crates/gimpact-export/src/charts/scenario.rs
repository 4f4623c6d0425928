use gimpact_core::text::{parse_percent, prefix};

use super::{ChartImage, Stroke, TextAnchor};
use crate::styles::{Color, palette};

#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioPoint {
    /// `++`, `-+`, `--` or `+-`: signs of the (x, y) axes.
    pub quadrant: String,
    pub name: String,
    pub probability: String,
}

impl ScenarioPoint {
    pub fn new(quadrant: impl Into<String>, name: impl Into<String>, probability: impl Into<String>) -> Self {
        Self {
            quadrant: quadrant.into(),
            name: name.into(),
            probability: probability.into(),
        }
    }
}

/// Axis captions for the 2×2 matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioAxes {
    pub x: String,
    pub y: String,
}

impl Default for ScenarioAxes {
    fn default() -> Self {
        Self {
            x: "정부 정책 기조".to_string(),
            y: "지역 경제 역동성".to_string(),
        }
    }
}

fn quadrant_color(quadrant: &str) -> Color {
    match quadrant {
        "++" => palette::ACCENT,
        "-+" => palette::WARNING,
        "--" => palette::DANGER,
        "+-" => palette::BLUE,
        _ => palette::GRAY,
    }
}

fn quadrant_position(quadrant: &str) -> (f32, f32) {
    match quadrant {
        "++" => (0.5, 0.5),
        "-+" => (-0.5, 0.5),
        "--" => (-0.5, -0.5),
        "+-" => (0.5, -0.5),
        _ => (0.0, 0.0),
    }
}

pub fn scenario_matrix(scenarios: &[ScenarioPoint], axes: &ScenarioAxes) -> ChartImage {
    let width = 260.0;
    let height = 210.0;
    let mut chart = ChartImage::new(width, height);

    let (left, right, bottom, top) = (22.0, 6.0, 20.0, 18.0);
    let plot_w = width - left - right;
    let plot_h = height - bottom - top;
    let px = |v: f32| left + (v + 1.1) / 2.2 * plot_w;
    let py = |v: f32| bottom + (v + 1.1) / 2.2 * plot_h;

    for quadrant in ["++", "-+", "--", "+-"] {
        let (qx, qy) = quadrant_position(quadrant);
        let x0 = if qx > 0.0 { 0.0 } else { -1.0 };
        let y0 = if qy > 0.0 { 0.0 } else { -1.0 };
        chart.rect(px(x0), py(y0), px(x0 + 1.0) - px(x0), py(y0 + 1.0) - py(y0), Some(quadrant_color(quadrant).tint(0.15)), None);
    }
    chart.line((px(-1.1), py(0.0)), (px(1.1), py(0.0)), Stroke::solid(palette::GRAY, 1.0));
    chart.line((px(0.0), py(-1.1)), (px(0.0), py(1.1)), Stroke::solid(palette::GRAY, 1.0));

    for scenario in scenarios {
        let (x, y) = quadrant_position(&scenario.quadrant);
        let (x, y) = (px(x), py(y));
        chart.circle((x, y), 7.0, Some(palette::SECONDARY), Some(Stroke::solid(palette::WHITE, 1.5)));
        chart.text(x, y - 18.0, scenario.name.as_str(), 8.5, true, palette::DARK, TextAnchor::Middle);
        chart.text(x, y - 28.0, format!("({})", scenario.probability), 7.5, false, palette::MEDIUM, TextAnchor::Middle);
    }

    chart.text(left + plot_w / 2.0, 5.0, format!("{} →", axes.x), 8.0, false, palette::MEDIUM, TextAnchor::Middle);
    chart.vertical_text(9.0, bottom + plot_h / 2.0, format!("{} →", axes.y), 8.0, palette::MEDIUM);
    chart.text(width / 2.0, height - 12.0, "시나리오 매트릭스", 10.0, true, palette::DARK, TextAnchor::Middle);
    chart
}

/// Donut of scenario probabilities, one wedge per scenario in input order.
pub fn scenario_probability_chart(scenarios: &[ScenarioPoint]) -> ChartImage {
    let width = 200.0;
    let height = 190.0;
    let mut chart = ChartImage::new(width, height);
    let centre = (width / 2.0, height / 2.0 - 8.0);
    let outer = 58.0;
    let inner = outer * 0.5;

    let shares: Vec<f64> = scenarios.iter().map(|s| parse_percent(&s.probability).max(0.0)).collect();
    let total: f64 = shares.iter().sum();

    if total <= 0.0 {
        chart.wedge(centre, inner, outer, 90.0, 360.0, Some(palette::LIGHT), None);
    } else {
        let mut angle = 90.0_f32;
        for (scenario, share) in scenarios.iter().zip(&shares) {
            let sweep = (share / total * 360.0) as f32;
            if sweep <= 0.0 {
                continue;
            }
            chart.wedge(
                centre,
                inner,
                outer,
                angle,
                sweep,
                Some(quadrant_color(&scenario.quadrant)),
                Some(Stroke::solid(palette::WHITE, 2.0)),
            );

            let mid = (angle + sweep / 2.0).to_radians();
            let ring = (inner + outer) / 2.0;
            chart.text_centered_at(
                centre.0 + ring * mid.cos(),
                centre.1 + ring * mid.sin(),
                &format!("{:.0}%", share / total * 100.0),
                8.0,
                true,
                palette::WHITE,
                TextAnchor::Middle,
            );
            let label = outer * 1.18;
            let anchor = if mid.cos() >= 0.0 { TextAnchor::Start } else { TextAnchor::End };
            chart.text_centered_at(
                centre.0 + label * mid.cos(),
                centre.1 + label * mid.sin(),
                prefix(&scenario.name, 8),
                8.0,
                false,
                palette::DARK,
                anchor,
            );
            angle += sweep;
        }
    }
    chart.text(width / 2.0, height - 12.0, "시나리오 발생 확률", 10.0, true, palette::DARK, TextAnchor::Middle);
    chart
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::Shape;

    fn scenarios() -> Vec<ScenarioPoint> {
        vec![
            ScenarioPoint::new("++", "황금기", "20%"),
            ScenarioPoint::new("-+", "지역의 봄", "30%"),
            ScenarioPoint::new("--", "빙하기", "15%"),
            ScenarioPoint::new("+-", "수도권 독주와 인재 유출 가속", "35%"),
        ]
    }

    #[test]
    fn matrix_labels_each_scenario() {
        let chart = scenario_matrix(&scenarios(), &ScenarioAxes::default());
        let texts = chart.texts();
        assert!(texts.contains(&"황금기"));
        assert!(texts.contains(&"(35%)"));
        assert!(texts.contains(&"정부 정책 기조 →"));
    }

    #[test]
    fn donut_wedges_sum_to_full_circle() {
        let chart = scenario_probability_chart(&scenarios());
        let sweeps: Vec<f32> = chart
            .shapes
            .iter()
            .filter_map(|shape| match shape {
                Shape::Wedge { sweep, .. } => Some(*sweep),
                _ => None,
            })
            .collect();
        assert_eq!(sweeps.len(), 4);
        assert!((sweeps.iter().sum::<f32>() - 360.0).abs() < 0.01);
        assert_eq!(chart.fill_colors()[0], palette::ACCENT);
    }

    #[test]
    fn donut_names_are_shortened() {
        let chart = scenario_probability_chart(&scenarios());
        assert!(chart.texts().contains(&"수도권 독주와 "));
    }

    #[test]
    fn donut_without_probabilities_is_a_placeholder_ring() {
        let chart = scenario_probability_chart(&[ScenarioPoint::new("++", "a", "n/a")]);
        assert_eq!(chart.fill_colors(), [palette::LIGHT]);
    }
}
