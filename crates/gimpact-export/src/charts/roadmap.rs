use gimpact_core::text::clip;

use super::{ChartImage, Stroke, TextAnchor};
use crate::styles::{Color, palette};

#[derive(Debug, Clone, PartialEq)]
pub struct RoadmapStrategy {
    pub rank: String,
    pub name: String,
    /// TOWS quadrant: `SO`, `WO`, `ST` or `WT`.
    pub kind: String,
}

impl RoadmapStrategy {
    pub fn new(rank: impl Into<String>, name: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            rank: rank.into(),
            name: name.into(),
            kind: kind.into(),
        }
    }
}

/// Start and end month for the n-th ranked strategy.
const SCHEDULE: [(f32, f32); 3] = [(0.0, 6.0), (3.0, 12.0), (6.0, 24.0)];
const PHASES: [(f32, &str, &str); 3] = [
    (3.0, "Phase 1", "조직 안정화"),
    (9.0, "Phase 2", "사업 확장"),
    (18.0, "Phase 3", "스케일업"),
];

pub fn type_color(kind: &str) -> Color {
    match kind {
        "SO" => palette::ACCENT,
        "WO" => palette::BLUE,
        "ST" => palette::WARNING,
        "WT" => palette::DANGER,
        _ => palette::GRAY,
    }
}

/// Gantt-style bars for the top three strategies on a 0–24 month axis.
pub fn strategy_roadmap(strategies: &[RoadmapStrategy]) -> ChartImage {
    let width = 460.0;
    let height = 180.0;
    let mut chart = ChartImage::new(width, height);

    let (left, right, bottom, top) = (8.0, 8.0, 34.0, 4.0);
    let plot_w = width - left - right;
    let plot_h = height - bottom - top;
    let px = |month: f32| left + (month + 0.5) / 26.5 * plot_w;
    let py = |v: f32| bottom + (v + 0.2) / 3.8 * plot_h;

    for boundary in [6.0, 12.0] {
        chart.line((px(boundary), py(-0.2)), (px(boundary), py(3.6)), Stroke::dashed(palette::GRAY, 0.8));
    }
    for (month, title, subtitle) in PHASES {
        chart.text(px(month), py(3.3), title, 9.0, true, palette::SECONDARY, TextAnchor::Middle);
        chart.text(px(month), py(3.3) - 11.0, subtitle, 7.5, false, palette::MEDIUM, TextAnchor::Middle);
    }

    chart.line((px(0.0), py(-0.2)), (px(24.0), py(-0.2)), Stroke::solid(palette::BORDER, 0.8));
    for month in [0, 3, 6, 12, 18, 24] {
        chart.text(px(month as f32), py(-0.2) - 10.0, format!("{month}M"), 7.0, false, palette::MEDIUM, TextAnchor::Middle);
    }

    for (i, strategy) in strategies.iter().take(SCHEDULE.len()).enumerate() {
        let (start, end) = SCHEDULE[i];
        let centre = py(2.5 - i as f32);
        let bar_h = py(0.6) - py(0.0);
        let color = type_color(&strategy.kind);
        let (x0, x1) = (px(start), px(end));

        chart.round_rect(x0 + 2.0, centre - bar_h / 2.0 - 2.0, x1 - x0, bar_h, 4.0, Some(palette::RULE), None);
        chart.round_rect(x0, centre - bar_h / 2.0, x1 - x0, bar_h, 4.0, Some(color), None);
        chart.circle((x0 + 12.0, centre), 8.0, Some(palette::WHITE), Some(Stroke::solid(color, 1.5)));
        chart.text_centered_at(x0 + 12.0, centre, &strategy.rank, 8.0, true, color, TextAnchor::Middle);
        chart.text_centered_at((x0 + x1) / 2.0 + 8.0, centre, &clip(&strategy.name, 12), 8.0, true, palette::WHITE, TextAnchor::Middle);
        chart.text_centered_at(
            x1 + 4.0,
            centre,
            &format!("{} · {}~{}개월", strategy.kind, start as u32, end as u32),
            7.0,
            false,
            palette::MEDIUM,
            TextAnchor::Start,
        );
    }

    let mut x = left + 4.0;
    for kind in ["SO", "WO", "ST", "WT"] {
        chart.rect(x, 6.0, 8.0, 8.0, Some(type_color(kind)), None);
        chart.text(x + 11.0, 7.0, kind, 7.5, true, palette::DARK, TextAnchor::Start);
        x += 42.0;
    }
    chart
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn at_most_three_bars() {
        let strategies: Vec<_> = (1..=5)
            .map(|rank| RoadmapStrategy::new(rank.to_string(), format!("전략 {rank}"), "SO"))
            .collect();
        let chart = strategy_roadmap(&strategies);
        let texts = chart.texts();
        assert!(texts.contains(&"전략 3"));
        assert!(!texts.contains(&"전략 4"));
    }

    #[test]
    fn bars_use_type_colors() {
        let chart = strategy_roadmap(&[
            RoadmapStrategy::new("1", "조직 시스템화", "WO"),
            RoadmapStrategy::new("2", "메가 프로젝트", "SO"),
        ]);
        let fills = chart.fill_colors();
        assert!(fills.contains(&palette::BLUE));
        assert!(fills.contains(&palette::ACCENT));
    }

    #[test]
    fn long_names_are_clipped() {
        let chart = strategy_roadmap(&[RoadmapStrategy::new("1", "공공 자금 기반 조직 시스템화 전략", "WO")]);
        assert!(chart.texts().contains(&"공공 자금 기반 조직 ..."));
    }
}
