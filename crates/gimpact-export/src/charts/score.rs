use std::f32::consts::PI;

use gimpact_core::text::score_label;

use super::{ChartImage, Stroke, TextAnchor, short_area_label};
use crate::styles::{Color, ScoreBand, palette};

/// One diagnosis area and its 0–5 score.
#[derive(Debug, Clone, PartialEq)]
pub struct AreaScore {
    pub label: String,
    pub score: f64,
}

impl AreaScore {
    pub fn new(label: impl Into<String>, score: f64) -> Self {
        Self {
            label: label.into(),
            score,
        }
    }
}

/// Five Forces scores, each on a 0–5 scale.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FiveForces {
    pub new_entrants: f64,
    pub rivalry: f64,
    pub substitutes: f64,
    pub supplier_power: f64,
    pub buyer_power: f64,
}

const SCALE_MAX: f32 = 5.8;

/// Horizontal bars per area on a 0–5 axis, colored by score band.
pub fn score_bar_chart(scores: &[AreaScore]) -> ChartImage {
    let width = 420.0;
    let height = 130.0;
    let mut chart = ChartImage::new(width, height);

    let left = 72.0;
    let bottom = 16.0;
    let top = 16.0;
    let plot_w = width - left - 8.0;
    let plot_h = height - bottom - top;
    let px = |v: f32| left + v / SCALE_MAX * plot_w;

    for tick in 1..=5 {
        let x = px(tick as f32);
        chart.line((x, bottom), (x, bottom + plot_h), Stroke::dashed(palette::RULE, 0.6));
    }
    for tick in 0..=5 {
        chart.text(px(tick as f32), bottom - 10.0, tick.to_string(), 7.0, false, palette::MEDIUM, TextAnchor::Middle);
    }
    chart.line((left, bottom), (left, bottom + plot_h), Stroke::solid(palette::BORDER, 0.8));

    let rows = scores.len().max(1) as f32;
    let row_h = plot_h / rows;
    let bar_h = row_h * 0.6;
    for (i, area) in scores.iter().enumerate() {
        // first area on top
        let centre = bottom + plot_h - row_h * (i as f32 + 0.5);
        let value = area.score.clamp(0.0, 5.0) as f32;
        let band = ScoreBand::of(area.score);

        chart.rect(left, centre - bar_h / 2.0, px(value) - left, bar_h, Some(band.color()), None);
        chart.text_centered_at(
            left - 4.0,
            centre,
            &short_area_label(&area.label, false),
            8.0,
            false,
            palette::DARK,
            TextAnchor::End,
        );
        chart.text_centered_at(px(value + 0.12), centre, &score_label(area.score), 8.0, true, palette::DARK, TextAnchor::Start);
        chart.text_centered_at(px(5.3), centre, band.label(), 7.5, true, band.text_color(), TextAnchor::Middle);
    }

    let mut x = width - 170.0;
    let y = height - 10.0;
    for band in [ScoreBand::Good, ScoreBand::Fair, ScoreBand::Weak] {
        chart.rect(x, y - 1.0, 6.0, 6.0, Some(band.color()), None);
        let label = match band {
            ScoreBand::Good => "양호(4+)",
            ScoreBand::Fair => "보통(3+)",
            ScoreBand::Weak => "취약(<3)",
        };
        chart.text(x + 9.0, y, label, 7.0, false, palette::MEDIUM, TextAnchor::Start);
        x += 55.0;
    }
    chart
}

fn axis_angle(i: usize, n: usize) -> f32 {
    PI / 2.0 - 2.0 * PI * i as f32 / n as f32
}

struct RadarOptions<'a> {
    title: Option<&'a str>,
    max: f32,
    color: Color,
    band_markers: bool,
}

fn radar_scene(labels: &[String], values: &[f64], options: RadarOptions<'_>) -> ChartImage {
    let size = 240.0;
    let mut chart = ChartImage::new(size, size);
    let title_space = if options.title.is_some() { 18.0 } else { 0.0 };
    let centre = (size / 2.0, (size - title_space) / 2.0);
    let radius = size * 0.32;
    let max = if options.max > 0.0 { options.max } else { 5.0 };
    let point = |angle: f32, value: f32| {
        let r = radius * (value / max).clamp(0.0, 1.0);
        (centre.0 + r * angle.cos(), centre.1 + r * angle.sin())
    };

    for ring in 1..=max.round().max(1.0) as usize {
        chart.circle(centre, radius * ring as f32 / max, None, Some(Stroke::dashed(palette::RULE, 0.6)));
        chart.text(centre.0 + 2.0, centre.1 + radius * ring as f32 / max + 1.0, ring.to_string(), 6.0, false, palette::GRAY, TextAnchor::Start);
    }

    let n = labels.len();
    if n == 0 {
        return chart;
    }
    for i in 0..n {
        chart.line(centre, point(axis_angle(i, n), max), Stroke::solid(palette::RULE, 0.6));
    }

    let points: Vec<(f32, f32)> = (0..n)
        .map(|i| point(axis_angle(i, n), values.get(i).copied().unwrap_or(0.0) as f32))
        .collect();
    chart.polygon(points.clone(), Some(options.color.tint(0.25)), Some(Stroke::solid(options.color, 2.0)));

    for (i, (x, y)) in points.iter().enumerate() {
        let value = values.get(i).copied().unwrap_or(0.0);
        let marker = if options.band_markers {
            ScoreBand::of(value).color()
        } else {
            options.color
        };
        chart.circle((*x, *y), 3.5, Some(marker), Some(Stroke::solid(palette::WHITE, 1.0)));

        let angle = axis_angle(i, n);
        let label_at = (centre.0 + (radius + 22.0) * angle.cos(), centre.1 + (radius + 18.0) * angle.sin());
        let anchor = if angle.cos() > 0.3 {
            TextAnchor::Start
        } else if angle.cos() < -0.3 {
            TextAnchor::End
        } else {
            TextAnchor::Middle
        };
        chart.text_centered_at(label_at.0, label_at.1, &labels[i], 8.0, true, palette::DARK, anchor);
        chart.text_centered_at(x + 7.0 * angle.cos(), y + 7.0 * angle.sin() + 4.0, &score_label(value), 7.0, true, palette::DARK, TextAnchor::Middle);
    }

    if let Some(title) = options.title {
        chart.text(size / 2.0, size - 12.0, title, 10.0, true, palette::DARK, TextAnchor::Middle);
    }
    chart
}

/// Radar of the diagnosis areas, markers colored by score band.
pub fn diagnosis_radar(scores: &[AreaScore]) -> ChartImage {
    let labels: Vec<String> = scores.iter().map(|area| short_area_label(&area.label, true)).collect();
    let values: Vec<f64> = scores.iter().map(|area| area.score).collect();
    radar_scene(
        &labels,
        &values,
        RadarOptions {
            title: None,
            max: 5.0,
            color: palette::PRIMARY,
            band_markers: true,
        },
    )
}

pub fn five_forces_chart(forces: &FiveForces) -> ChartImage {
    let categories = ["신규진입", "경쟁강도", "대체재", "공급자", "구매자"].map(String::from);
    let values = [
        forces.new_entrants,
        forces.rivalry,
        forces.substitutes,
        forces.supplier_power,
        forces.buyer_power,
    ];
    radar_scene(
        &categories,
        &values,
        RadarOptions {
            title: Some("Five Forces"),
            max: 5.0,
            color: palette::COMPETITION,
            band_markers: false,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_scores() -> Vec<AreaScore> {
        vec![
            AreaScore::new("재무", 4.0),
            AreaScore::new("영업마케팅", 3.99),
            AreaScore::new("경영일반", 2.6),
        ]
    }

    #[test]
    fn bars_follow_score_bands() {
        let chart = score_bar_chart(&sample_scores());
        let fills = chart.fill_colors();
        assert_eq!(&fills[..3], [palette::ACCENT, palette::WARNING, palette::DANGER]);
        let texts = chart.texts();
        assert!(texts.contains(&"양호"));
        assert!(texts.contains(&"보통"));
        assert!(texts.contains(&"취약"));
    }

    #[test]
    fn empty_scores_still_draw_axes() {
        let chart = score_bar_chart(&[]);
        assert!(!chart.shapes.is_empty());
        assert!(!chart.texts().contains(&"양호"));
    }

    #[test]
    fn radar_markers_use_bands() {
        let chart = diagnosis_radar(&sample_scores());
        let fills = chart.fill_colors();
        // polygon fill, then one marker per area
        assert_eq!(&fills[1..], [palette::ACCENT, palette::WARNING, palette::DANGER]);
        assert!(chart.texts().contains(&"영업"));
        assert!(chart.texts().contains(&"마케팅"));
    }

    #[test]
    fn five_forces_labels_every_force() {
        let chart = five_forces_chart(&FiveForces {
            rivalry: 4.5,
            ..FiveForces::default()
        });
        for label in ["신규진입", "경쟁강도", "대체재", "공급자", "구매자", "Five Forces"] {
            assert!(chart.texts().contains(&label), "missing {label}");
        }
    }

    #[test]
    fn radar_is_deterministic() {
        assert_eq!(diagnosis_radar(&sample_scores()), diagnosis_radar(&sample_scores()));
    }
}
