use gimpact_core::text::group_thousands;

use super::{ChartImage, Stroke, TextAnchor};
use crate::styles::palette;

fn eok(value: f64) -> String {
    format!("{}억", group_thousands(value))
}

/// TAM ⊃ SAM ⊃ SOM as nested circles with a value legend. Values are in
/// 억 (100M KRW). A non-positive SOM is replaced by 1% of SAM.
pub fn concentric_market_chart(tam: f64, sam: f64, som: f64) -> ChartImage {
    let width = 340.0;
    let height = 220.0;
    let mut chart = ChartImage::new(width, height);
    let som = if som <= 0.0 { sam * 0.01 } else { som };

    let radius = 90.0;
    let centre = (radius + 14.0, height / 2.0 - 6.0);
    let bottom = centre.1 - radius;
    let rings = [
        ("TAM", tam, radius, palette::PRIMARY.tint(0.18)),
        ("SAM", sam, radius * 0.62, palette::PRIMARY.tint(0.45)),
        ("SOM", som, radius * 0.28, palette::PRIMARY),
    ];

    // bottom-aligned so the labels stack in the gap above each inner circle
    for (_, _, r, fill) in rings {
        chart.circle((centre.0, bottom + r), r, Some(fill), Some(Stroke::solid(palette::WHITE, 1.5)));
    }
    let [(_, _, outer, _), (_, _, middle, _), (_, _, inner, _)] = rings;
    chart.text(centre.0, bottom + outer * 2.0 - 18.0, "TAM", 10.0, true, palette::SECONDARY, TextAnchor::Middle);
    chart.text(centre.0, bottom + middle * 2.0 - 16.0, "SAM", 10.0, true, palette::SECONDARY, TextAnchor::Middle);
    chart.text(centre.0, bottom + inner - 3.0, "SOM", 9.0, true, palette::WHITE, TextAnchor::Middle);

    let legend_x = centre.0 + radius + 26.0;
    let mut y = height - 50.0;
    for (name, value, _, fill) in rings {
        chart.rect(legend_x, y - 2.0, 10.0, 10.0, Some(fill), Some(Stroke::solid(palette::BORDER, 0.5)));
        chart.text(legend_x + 16.0, y, name, 9.0, true, palette::DARK, TextAnchor::Start);
        chart.text(legend_x + 48.0, y, eok(value), 9.0, false, palette::DARK, TextAnchor::Start);
        y -= 22.0;
    }
    chart.text(width / 2.0, height - 12.0, "시장 규모 (TAM / SAM / SOM)", 10.0, true, palette::DARK, TextAnchor::Middle);
    chart
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legend_shows_values_in_eok() {
        let chart = concentric_market_chart(120_000.0, 9289.0, 20.0);
        let texts = chart.texts();
        assert!(texts.contains(&"120,000억"));
        assert!(texts.contains(&"9,289억"));
        assert!(texts.contains(&"20억"));
    }

    #[test]
    fn zero_som_falls_back_to_one_percent_of_sam() {
        let chart = concentric_market_chart(1000.0, 500.0, 0.0);
        assert!(chart.texts().contains(&"5억"));
    }

    #[test]
    fn all_zero_is_degenerate_not_an_error() {
        let chart = concentric_market_chart(0.0, 0.0, 0.0);
        assert!(chart.texts().contains(&"0억"));
    }
}
