//! Flowables: the ordered, append-only content the builder produces and the
//! assembler lays out.

use crate::charts::ChartImage;
use crate::styles::{Color, ParagraphStyle, palette};
use crate::tables::Table;

/// A run of text sharing weight and color. `\n` inside the text forces a
/// line break.
#[derive(Debug, Clone, PartialEq)]
pub struct Span {
    pub text: String,
    pub bold: bool,
    pub color: Option<Color>,
}

impl Span {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: false,
            color: None,
        }
    }

    pub fn bold(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: true,
            color: None,
        }
    }

    pub fn colored(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Paragraph {
    pub spans: Vec<Span>,
    pub style: ParagraphStyle,
}

impl Paragraph {
    pub fn new(text: impl Into<String>, style: ParagraphStyle) -> Self {
        Self {
            spans: vec![Span::plain(text)],
            style,
        }
    }

    pub fn rich(spans: Vec<Span>, style: ParagraphStyle) -> Self {
        Self { spans, style }
    }

    pub fn plain_text(&self) -> String {
        self.spans.iter().map(|span| span.text.as_str()).collect()
    }
}

/// Horizontal rule across the frame width.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rule {
    pub thickness: f32,
    pub color: Color,
    pub space_before: f32,
    pub space_after: f32,
}

impl Default for Rule {
    fn default() -> Self {
        Self {
            thickness: 1.0,
            color: palette::LIGHT,
            space_before: 8.0,
            space_after: 8.0,
        }
    }
}

/// A chart placed at a fixed display size.
#[derive(Debug, Clone, PartialEq)]
pub struct Figure {
    pub image: ChartImage,
    pub width: f32,
    pub height: f32,
}

impl Figure {
    pub fn new(image: ChartImage, width: f32, height: f32) -> Self {
        Self {
            image,
            width,
            height,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    Paragraph(Paragraph),
    Spacer(f32),
    Rule(Rule),
    PageBreak,
    Table(Table),
    Chart(Figure),
    /// Zero-size marker; the assembler records the page it lands on.
    Anchor(String),
}

impl Element {
    pub fn as_table(&self) -> Option<&Table> {
        match self {
            Element::Table(table) => Some(table),
            _ => None,
        }
    }

    pub fn as_paragraph(&self) -> Option<&Paragraph> {
        match self {
            Element::Paragraph(paragraph) => Some(paragraph),
            _ => None,
        }
    }
}
