use serde::{Deserialize, Serialize};

/// An sRGB color with 8-bit channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// `0xRRGGBB`.
    pub const fn hex(value: u32) -> Self {
        Self {
            r: ((value >> 16) & 0xFF) as u8,
            g: ((value >> 8) & 0xFF) as u8,
            b: (value & 0xFF) as u8,
        }
    }

    /// Components in the 0..=1 range used by PDF color operators.
    pub fn components(self) -> [f32; 3] {
        [
            f32::from(self.r) / 255.0,
            f32::from(self.g) / 255.0,
            f32::from(self.b) / 255.0,
        ]
    }

    /// Blend toward white. `alpha = 1.0` keeps the color, `0.0` is white.
    /// Stands in for translucency, which plain PDF content streams lack.
    pub fn tint(self, alpha: f32) -> Self {
        let alpha = alpha.clamp(0.0, 1.0);
        let mix = |c: u8| (f32::from(c) * alpha + 255.0 * (1.0 - alpha)).round() as u8;
        Self::rgb(mix(self.r), mix(self.g), mix(self.b))
    }
}

/// Semantic palette shared by charts, tables and page decorations.
pub mod palette {
    use super::Color;

    pub const PRIMARY: Color = Color::hex(0x2563EB);
    pub const SECONDARY: Color = Color::hex(0x1E40AF);
    pub const ACCENT: Color = Color::hex(0x10B981);
    pub const WARNING: Color = Color::hex(0xF59E0B);
    pub const DANGER: Color = Color::hex(0xEF4444);
    pub const DARK: Color = Color::hex(0x1F2937);
    pub const MEDIUM: Color = Color::hex(0x6B7280);
    pub const GRAY: Color = Color::hex(0x9CA3AF);
    pub const LIGHT: Color = Color::hex(0xF3F4F6);
    pub const WHITE: Color = Color::hex(0xFFFFFF);
    pub const BLUE: Color = Color::hex(0x3B82F6);
    pub const RULE: Color = Color::hex(0xE5E7EB);
    pub const BORDER: Color = Color::hex(0xD1D5DB);

    pub const OPPORTUNITY: Color = ACCENT;
    pub const THREAT: Color = DANGER;
    pub const STRENGTH: Color = ACCENT;
    pub const WEAKNESS: Color = DANGER;

    pub const PESTEL: Color = Color::hex(0x7C3AED);
    pub const SCENARIO: Color = Color::hex(0x0891B2);
    pub const COMPETITION: Color = Color::hex(0xEA580C);
    pub const CUSTOMER: Color = Color::hex(0x0D9488);
    pub const MARKET: Color = Color::hex(0x2563EB);
    pub const DIAGNOSIS: Color = Color::hex(0x4F46E5);
    pub const VRIO: Color = Color::hex(0x7C3AED);
    pub const SWOT: Color = Color::hex(0x059669);
    pub const TOWS: Color = Color::hex(0x1E40AF);

    /// Soft cell fills.
    pub const MINT: Color = Color::hex(0xECFDF5);
    pub const ROSE: Color = Color::hex(0xFEF2F2);
    pub const SKY: Color = Color::hex(0xEFF6FF);
    pub const CREAM: Color = Color::hex(0xFFFBEB);
}

/// Three-way score bucket used wherever a 0–5 score is colored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ScoreBand {
    Weak,
    Fair,
    Good,
}

impl ScoreBand {
    pub const GOOD_THRESHOLD: f64 = 4.0;
    pub const FAIR_THRESHOLD: f64 = 3.0;

    pub fn of(score: f64) -> Self {
        if score >= Self::GOOD_THRESHOLD {
            ScoreBand::Good
        } else if score >= Self::FAIR_THRESHOLD {
            ScoreBand::Fair
        } else {
            ScoreBand::Weak
        }
    }

    pub fn color(self) -> Color {
        match self {
            ScoreBand::Good => palette::ACCENT,
            ScoreBand::Fair => palette::WARNING,
            ScoreBand::Weak => palette::DANGER,
        }
    }

    /// Darker shade for text drawn on white.
    pub fn text_color(self) -> Color {
        match self {
            ScoreBand::Good => Color::hex(0x059669),
            ScoreBand::Fair => Color::hex(0xD97706),
            ScoreBand::Weak => Color::hex(0xDC2626),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ScoreBand::Good => "양호",
            ScoreBand::Fair => "보통",
            ScoreBand::Weak => "취약",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
    Justify,
}

/// Typography for one kind of paragraph.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParagraphStyle {
    pub size: f32,
    pub leading: f32,
    pub bold: bool,
    pub color: Color,
    pub align: Align,
    pub space_before: f32,
    pub space_after: f32,
    pub left_indent: f32,
}

impl ParagraphStyle {
    pub const fn new(size: f32, leading: f32) -> Self {
        Self {
            size,
            leading,
            bold: false,
            color: palette::DARK,
            align: Align::Left,
            space_before: 0.0,
            space_after: 0.0,
            left_indent: 0.0,
        }
    }

    pub const fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub const fn color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub const fn align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }

    pub const fn spacing(mut self, before: f32, after: f32) -> Self {
        self.space_before = before;
        self.space_after = after;
        self
    }

    pub const fn indent(mut self, left: f32) -> Self {
        self.left_indent = left;
        self
    }
}

/// Document styling configuration for reports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentStyles {
    pub title: ParagraphStyle,
    pub h1: ParagraphStyle,
    pub h2: ParagraphStyle,
    pub h3: ParagraphStyle,
    pub body: ParagraphStyle,
    pub small: ParagraphStyle,
    pub caption: ParagraphStyle,
    pub bullet: ParagraphStyle,
    /// Inside a highlight box.
    pub boxed: ParagraphStyle,
    /// Inside SWOT matrix cells.
    pub cell: ParagraphStyle,
}

impl Default for DocumentStyles {
    fn default() -> Self {
        Self {
            title: ParagraphStyle::new(24.0, 30.0)
                .bold()
                .align(Align::Center)
                .spacing(0.0, 20.0),
            h1: ParagraphStyle::new(16.0, 22.0)
                .bold()
                .color(palette::PRIMARY)
                .spacing(15.0, 10.0),
            h2: ParagraphStyle::new(13.0, 18.0)
                .bold()
                .color(palette::SECONDARY)
                .spacing(12.0, 8.0),
            h3: ParagraphStyle::new(11.0, 15.0).bold().spacing(8.0, 5.0),
            body: ParagraphStyle::new(10.0, 14.0)
                .align(Align::Justify)
                .spacing(0.0, 6.0),
            small: ParagraphStyle::new(9.0, 12.0)
                .color(palette::MEDIUM)
                .spacing(0.0, 4.0),
            caption: ParagraphStyle::new(8.0, 10.0)
                .color(palette::MEDIUM)
                .align(Align::Center)
                .spacing(0.0, 8.0),
            bullet: ParagraphStyle::new(10.0, 14.0).indent(15.0).spacing(0.0, 3.0),
            boxed: ParagraphStyle::new(10.0, 14.0),
            cell: ParagraphStyle::new(9.0, 12.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_round_trip() {
        assert_eq!(Color::hex(0x2563EB), Color::rgb(0x25, 0x63, 0xEB));
        assert_eq!(palette::PRIMARY.components()[0], 37.0 / 255.0);
    }

    #[test]
    fn tint_moves_toward_white() {
        assert_eq!(palette::DANGER.tint(1.0), palette::DANGER);
        assert_eq!(palette::DANGER.tint(0.0), palette::WHITE);
        let half = Color::rgb(0, 0, 0).tint(0.5);
        assert_eq!(half, Color::rgb(128, 128, 128));
    }

    #[test]
    fn score_band_boundaries() {
        assert_eq!(ScoreBand::of(5.0), ScoreBand::Good);
        assert_eq!(ScoreBand::of(4.0), ScoreBand::Good);
        assert_eq!(ScoreBand::of(3.99), ScoreBand::Fair);
        assert_eq!(ScoreBand::of(3.0), ScoreBand::Fair);
        assert_eq!(ScoreBand::of(2.99), ScoreBand::Weak);
        assert_eq!(ScoreBand::of(0.0), ScoreBand::Weak);
        assert_eq!(ScoreBand::of(-1.0), ScoreBand::Weak);
    }

    #[test]
    fn score_band_is_monotonic() {
        let mut previous = ScoreBand::of(0.0);
        for step in 0..=500 {
            let band = ScoreBand::of(f64::from(step) / 100.0);
            assert!(band >= previous, "band dropped at {step}");
            previous = band;
        }
    }

    #[test]
    fn band_colors_follow_palette() {
        assert_eq!(ScoreBand::Good.color(), palette::ACCENT);
        assert_eq!(ScoreBand::Fair.color(), palette::WARNING);
        assert_eq!(ScoreBand::Weak.color(), palette::DANGER);
    }
}
