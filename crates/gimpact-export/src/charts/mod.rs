//! Chart renderers.
//!
//! Every renderer is a pure function from a small data record to a
//! [`ChartImage`]: a vector scene in its own coordinate box (points, origin
//! bottom-left). The document assembler scales the scene into whatever
//! display box the report asks for, so a chart is placed exactly like an
//! encoded image would be, without a raster step.

mod market;
mod roadmap;
mod scenario;
mod score;

pub use market::concentric_market_chart;
pub use roadmap::{RoadmapStrategy, strategy_roadmap};
pub use scenario::{ScenarioAxes, ScenarioPoint, scenario_matrix, scenario_probability_chart};
pub use score::{AreaScore, FiveForces, diagnosis_radar, five_forces_chart, score_bar_chart};

use crate::canvas::{Canvas, Paint};
use crate::styles::Color;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub color: Color,
    pub width: f32,
    pub dashed: bool,
}

impl Stroke {
    pub fn solid(color: Color, width: f32) -> Self {
        Self {
            color,
            width,
            dashed: false,
        }
    }

    pub fn dashed(color: Color, width: f32) -> Self {
        Self {
            color,
            width,
            dashed: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAnchor {
    Start,
    Middle,
    End,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Rect {
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        radius: f32,
        fill: Option<Color>,
        stroke: Option<Stroke>,
    },
    Line {
        from: (f32, f32),
        to: (f32, f32),
        stroke: Stroke,
    },
    Polyline {
        points: Vec<(f32, f32)>,
        stroke: Stroke,
    },
    Polygon {
        points: Vec<(f32, f32)>,
        fill: Option<Color>,
        stroke: Option<Stroke>,
    },
    Circle {
        center: (f32, f32),
        radius: f32,
        fill: Option<Color>,
        stroke: Option<Stroke>,
    },
    Wedge {
        center: (f32, f32),
        inner: f32,
        outer: f32,
        start: f32,
        sweep: f32,
        fill: Option<Color>,
        stroke: Option<Stroke>,
    },
    Text {
        x: f32,
        y: f32,
        text: String,
        size: f32,
        bold: bool,
        color: Color,
        anchor: TextAnchor,
        vertical: bool,
    },
}

/// A rendered chart: a deterministic list of shapes in a `width` × `height` box.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartImage {
    pub width: f32,
    pub height: f32,
    pub shapes: Vec<Shape>,
}

impl ChartImage {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            shapes: Vec::new(),
        }
    }

    pub fn rect(&mut self, x: f32, y: f32, w: f32, h: f32, fill: Option<Color>, stroke: Option<Stroke>) {
        self.shapes.push(Shape::Rect {
            x,
            y,
            w,
            h,
            radius: 0.0,
            fill,
            stroke,
        });
    }

    pub fn round_rect(&mut self, x: f32, y: f32, w: f32, h: f32, radius: f32, fill: Option<Color>, stroke: Option<Stroke>) {
        self.shapes.push(Shape::Rect {
            x,
            y,
            w,
            h,
            radius,
            fill,
            stroke,
        });
    }

    pub fn line(&mut self, from: (f32, f32), to: (f32, f32), stroke: Stroke) {
        self.shapes.push(Shape::Line { from, to, stroke });
    }

    pub fn polyline(&mut self, points: Vec<(f32, f32)>, stroke: Stroke) {
        self.shapes.push(Shape::Polyline { points, stroke });
    }

    pub fn polygon(&mut self, points: Vec<(f32, f32)>, fill: Option<Color>, stroke: Option<Stroke>) {
        self.shapes.push(Shape::Polygon {
            points,
            fill,
            stroke,
        });
    }

    pub fn circle(&mut self, center: (f32, f32), radius: f32, fill: Option<Color>, stroke: Option<Stroke>) {
        self.shapes.push(Shape::Circle {
            center,
            radius,
            fill,
            stroke,
        });
    }

    #[allow(clippy::too_many_arguments)]
    pub fn wedge(
        &mut self,
        center: (f32, f32),
        inner: f32,
        outer: f32,
        start: f32,
        sweep: f32,
        fill: Option<Color>,
        stroke: Option<Stroke>,
    ) {
        self.shapes.push(Shape::Wedge {
            center,
            inner,
            outer,
            start,
            sweep,
            fill,
            stroke,
        });
    }

    /// Single-line text with its baseline at `y`.
    pub fn text(&mut self, x: f32, y: f32, text: impl Into<String>, size: f32, bold: bool, color: Color, anchor: TextAnchor) {
        self.shapes.push(Shape::Text {
            x,
            y,
            text: text.into(),
            size,
            bold,
            color,
            anchor,
            vertical: false,
        });
    }

    /// Text whose visual middle sits at `y`. Embedded newlines stack lines
    /// around that middle.
    pub fn text_centered_at(&mut self, x: f32, y: f32, text: &str, size: f32, bold: bool, color: Color, anchor: TextAnchor) {
        let lines: Vec<&str> = text.lines().collect();
        let leading = size * 1.15;
        let block = leading * (lines.len().max(1) - 1) as f32;
        for (i, line) in lines.iter().enumerate() {
            let baseline = y + block / 2.0 - leading * i as f32 - size * 0.35;
            self.text(x, baseline, *line, size, bold, color, anchor);
        }
    }

    /// Text rotated 90° counter-clockwise, centred on `(x, y)`.
    pub fn vertical_text(&mut self, x: f32, y: f32, text: impl Into<String>, size: f32, color: Color) {
        self.shapes.push(Shape::Text {
            x,
            y,
            text: text.into(),
            size,
            bold: false,
            color,
            anchor: TextAnchor::Middle,
            vertical: true,
        });
    }

    /// Fill colors used by the scene, in drawing order.
    pub fn fill_colors(&self) -> Vec<Color> {
        self.shapes
            .iter()
            .filter_map(|shape| match shape {
                Shape::Rect { fill, .. }
                | Shape::Polygon { fill, .. }
                | Shape::Circle { fill, .. }
                | Shape::Wedge { fill, .. } => *fill,
                _ => None,
            })
            .collect()
    }

    /// Every text string in the scene, in drawing order.
    pub fn texts(&self) -> Vec<&str> {
        self.shapes
            .iter()
            .filter_map(|shape| match shape {
                Shape::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Paint the scene scaled into the box at `(x, y)` with size `w` × `h`.
    pub fn paint(&self, canvas: &mut Canvas<'_, '_>, x: f32, y: f32, w: f32, h: f32) {
        if self.width <= 0.0 || self.height <= 0.0 {
            return;
        }
        canvas.save_state();
        canvas.transform(w / self.width, 0.0, 0.0, h / self.height, x, y);
        for shape in &self.shapes {
            paint_shape(canvas, shape);
        }
        canvas.restore_state();
    }
}

fn apply_paint(canvas: &mut Canvas<'_, '_>, fill: Option<Color>, stroke: Option<Stroke>) -> Option<Paint> {
    if let Some(color) = fill {
        canvas.set_fill_color(color);
    }
    if let Some(stroke) = stroke {
        apply_stroke(canvas, stroke);
    }
    Paint::from_flags(fill.is_some(), stroke.is_some())
}

fn apply_stroke(canvas: &mut Canvas<'_, '_>, stroke: Stroke) {
    canvas.set_stroke_color(stroke.color);
    canvas.set_line_width(stroke.width);
    if stroke.dashed {
        canvas.set_dash(&[3.0, 2.0]);
    } else {
        canvas.set_dash(&[]);
    }
}

fn paint_shape(canvas: &mut Canvas<'_, '_>, shape: &Shape) {
    match shape {
        Shape::Rect {
            x,
            y,
            w,
            h,
            radius,
            fill,
            stroke,
        } => {
            if let Some(paint) = apply_paint(canvas, *fill, *stroke) {
                if *radius > 0.0 {
                    canvas.round_rect(*x, *y, *w, *h, *radius, paint);
                } else {
                    canvas.rect(*x, *y, *w, *h, paint);
                }
            }
        }
        Shape::Line { from, to, stroke } => {
            apply_stroke(canvas, *stroke);
            canvas.line(from.0, from.1, to.0, to.1);
        }
        Shape::Polyline { points, stroke } => {
            apply_stroke(canvas, *stroke);
            canvas.polyline(points);
        }
        Shape::Polygon {
            points,
            fill,
            stroke,
        } => {
            if let Some(paint) = apply_paint(canvas, *fill, *stroke) {
                canvas.polygon(points, paint);
            }
        }
        Shape::Circle {
            center,
            radius,
            fill,
            stroke,
        } => {
            if let Some(paint) = apply_paint(canvas, *fill, *stroke) {
                canvas.circle(center.0, center.1, *radius, paint);
            }
        }
        Shape::Wedge {
            center,
            inner,
            outer,
            start,
            sweep,
            fill,
            stroke,
        } => {
            if let Some(paint) = apply_paint(canvas, *fill, *stroke) {
                canvas.wedge(center.0, center.1, *inner, *outer, *start, *sweep, paint);
            }
        }
        Shape::Text {
            x,
            y,
            text,
            size,
            bold,
            color,
            anchor,
            vertical,
        } => {
            canvas.set_fill_color(*color);
            let width = canvas.text_width(text, *bold, *size);
            let offset = match anchor {
                TextAnchor::Start => 0.0,
                TextAnchor::Middle => width / 2.0,
                TextAnchor::End => width,
            };
            if *vertical {
                canvas.save_state();
                canvas.transform(0.0, 1.0, -1.0, 0.0, *x, *y);
                canvas.draw_string(-offset, -size * 0.35, text, *bold, *size);
                canvas.restore_state();
            } else {
                canvas.draw_string(x - offset, *y, text, *bold, *size);
            }
        }
    }
}

/// Two-row label for radar axes (`사회적가치` → `사회적\n가치`), or a compact
/// one-row label for bar charts.
pub fn short_area_label(label: &str, multiline: bool) -> String {
    const SHORT: [(&str, &str, &str); 4] = [
        ("사회적", "사회적가치", "사회적\n가치"),
        ("영업", "영업마케팅", "영업\n마케팅"),
        ("경영", "경영일반", "경영\n일반"),
        ("인사", "인사조직", "인사\n조직"),
    ];
    SHORT
        .iter()
        .find(|(needle, _, _)| label.contains(needle))
        .map(|(_, one, two)| if multiline { *two } else { *one }.to_string())
        .unwrap_or_else(|| label.to_string())
}
