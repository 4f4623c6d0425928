//! Drawing primitives over a PDF content stream.
//!
//! Coordinates are PDF user space: points, origin at the bottom-left of the
//! page, y growing upward.

use lopdf::Object;
use lopdf::content::Operation;

use crate::fonts::FontSet;
use crate::styles::Color;

/// Points per millimetre.
pub const MM: f32 = 72.0 / 25.4;

/// Control-point factor for approximating a quarter circle with a cubic.
const KAPPA: f32 = 0.552_284_8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Paint {
    Fill,
    Stroke,
    FillStroke,
}

impl Paint {
    pub fn from_flags(fill: bool, stroke: bool) -> Option<Self> {
        match (fill, stroke) {
            (true, true) => Some(Paint::FillStroke),
            (true, false) => Some(Paint::Fill),
            (false, true) => Some(Paint::Stroke),
            (false, false) => None,
        }
    }

    fn operator(self) -> &'static str {
        match self {
            Paint::Fill => "f",
            Paint::Stroke => "S",
            Paint::FillStroke => "B",
        }
    }
}

pub struct Canvas<'c, 'a> {
    ops: &'c mut Vec<Operation>,
    fonts: &'c mut FontSet<'a>,
    width: f32,
    height: f32,
    fill: Color,
}

fn real(v: f32) -> Object {
    Object::Real(v)
}

impl<'c, 'a> Canvas<'c, 'a> {
    pub fn new(ops: &'c mut Vec<Operation>, fonts: &'c mut FontSet<'a>, width: f32, height: f32) -> Self {
        Self {
            ops,
            fonts,
            width,
            height,
            fill: Color::rgb(0, 0, 0),
        }
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    fn push(&mut self, operator: &str, operands: Vec<Object>) {
        self.ops.push(Operation::new(operator, operands));
    }

    pub fn save_state(&mut self) {
        self.push("q", vec![]);
    }

    pub fn restore_state(&mut self) {
        self.push("Q", vec![]);
    }

    /// Concatenate `[a b c d e f]` onto the current transformation matrix.
    pub fn transform(&mut self, a: f32, b: f32, c: f32, d: f32, e: f32, f: f32) {
        self.push("cm", [a, b, c, d, e, f].into_iter().map(real).collect());
    }

    pub fn set_fill_color(&mut self, color: Color) {
        self.fill = color;
        let [r, g, b] = color.components();
        self.push("rg", vec![real(r), real(g), real(b)]);
    }

    pub fn set_stroke_color(&mut self, color: Color) {
        let [r, g, b] = color.components();
        self.push("RG", vec![real(r), real(g), real(b)]);
    }

    pub fn set_line_width(&mut self, width: f32) {
        self.push("w", vec![real(width)]);
    }

    /// Dash pattern in points; an empty slice restores solid lines.
    pub fn set_dash(&mut self, pattern: &[f32]) {
        let array = pattern.iter().copied().map(real).collect::<Vec<_>>();
        self.push("d", vec![Object::Array(array), Object::Integer(0)]);
    }

    pub fn rect(&mut self, x: f32, y: f32, w: f32, h: f32, paint: Paint) {
        self.push("re", vec![real(x), real(y), real(w), real(h)]);
        self.push(paint.operator(), vec![]);
    }

    pub fn round_rect(&mut self, x: f32, y: f32, w: f32, h: f32, radius: f32, paint: Paint) {
        let r = radius.min(w / 2.0).min(h / 2.0).max(0.0);
        let k = r * KAPPA;
        let (x1, y1) = (x + w, y + h);

        self.move_to(x + r, y);
        self.line_to(x1 - r, y);
        self.curve_to(x1 - r + k, y, x1, y + r - k, x1, y + r);
        self.line_to(x1, y1 - r);
        self.curve_to(x1, y1 - r + k, x1 - r + k, y1, x1 - r, y1);
        self.line_to(x + r, y1);
        self.curve_to(x + r - k, y1, x, y1 - r + k, x, y1 - r);
        self.line_to(x, y + r);
        self.curve_to(x, y + r - k, x + r - k, y, x + r, y);
        self.close_path();
        self.push(paint.operator(), vec![]);
    }

    pub fn line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32) {
        self.move_to(x1, y1);
        self.line_to(x2, y2);
        self.push("S", vec![]);
    }

    pub fn polyline(&mut self, points: &[(f32, f32)]) {
        let Some(((x0, y0), rest)) = points.split_first() else {
            return;
        };
        self.move_to(*x0, *y0);
        for (x, y) in rest {
            self.line_to(*x, *y);
        }
        self.push("S", vec![]);
    }

    pub fn polygon(&mut self, points: &[(f32, f32)], paint: Paint) {
        let Some(((x0, y0), rest)) = points.split_first() else {
            return;
        };
        self.move_to(*x0, *y0);
        for (x, y) in rest {
            self.line_to(*x, *y);
        }
        self.close_path();
        self.push(paint.operator(), vec![]);
    }

    pub fn circle(&mut self, cx: f32, cy: f32, r: f32, paint: Paint) {
        let k = r * KAPPA;
        self.move_to(cx + r, cy);
        self.curve_to(cx + r, cy + k, cx + k, cy + r, cx, cy + r);
        self.curve_to(cx - k, cy + r, cx - r, cy + k, cx - r, cy);
        self.curve_to(cx - r, cy - k, cx - k, cy - r, cx, cy - r);
        self.curve_to(cx + k, cy - r, cx + r, cy - k, cx + r, cy);
        self.close_path();
        self.push(paint.operator(), vec![]);
    }

    /// Annular sector between `inner` and `outer` radii, angles in degrees
    /// counter-clockwise from the positive x axis. `inner = 0` draws a pie
    /// slice.
    pub fn wedge(&mut self, cx: f32, cy: f32, inner: f32, outer: f32, start: f32, sweep: f32, paint: Paint) {
        if sweep.abs() < f32::EPSILON {
            return;
        }
        let segments = (sweep.abs() / 90.0).ceil().max(1.0) as usize;
        let step = sweep / segments as f32;

        let (sx, sy) = polar(cx, cy, outer, start);
        self.move_to(sx, sy);
        for i in 0..segments {
            self.arc_segment(cx, cy, outer, start + step * i as f32, step);
        }

        if inner > 0.0 {
            let (ex, ey) = polar(cx, cy, inner, start + sweep);
            self.line_to(ex, ey);
            for i in (0..segments).rev() {
                self.arc_segment(cx, cy, inner, start + step * (i + 1) as f32, -step);
            }
        } else {
            self.line_to(cx, cy);
        }
        self.close_path();
        self.push(paint.operator(), vec![]);
    }

    fn arc_segment(&mut self, cx: f32, cy: f32, r: f32, from: f32, sweep: f32) {
        let a0 = from.to_radians();
        let a1 = (from + sweep).to_radians();
        let k = 4.0 / 3.0 * ((a1 - a0) / 4.0).tan();

        let (x0, y0) = (cx + r * a0.cos(), cy + r * a0.sin());
        let (x3, y3) = (cx + r * a1.cos(), cy + r * a1.sin());
        let (x1, y1) = (x0 - k * r * a0.sin(), y0 + k * r * a0.cos());
        let (x2, y2) = (x3 + k * r * a1.sin(), y3 - k * r * a1.cos());
        self.curve_to(x1, y1, x2, y2, x3, y3);
    }

    fn move_to(&mut self, x: f32, y: f32) {
        self.push("m", vec![real(x), real(y)]);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.push("l", vec![real(x), real(y)]);
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x3: f32, y3: f32) {
        self.push("c", [x1, y1, x2, y2, x3, y3].into_iter().map(real).collect());
    }

    fn close_path(&mut self) {
        self.push("h", vec![]);
    }

    pub fn text_width(&self, text: &str, bold: bool, size: f32) -> f32 {
        self.fonts.measure(text, bold, size)
    }

    /// Draw `text` with its baseline starting at `(x, y)` in the current
    /// fill color.
    pub fn draw_string(&mut self, x: f32, y: f32, text: &str, bold: bool, size: f32) {
        if text.is_empty() {
            return;
        }
        let font = self.fonts.resource_name(bold);
        let encoded = self.fonts.encode(text, bold);
        let synthetic = self.fonts.needs_synthetic_bold(bold);

        self.push("BT", vec![]);
        self.push("Tf", vec![Object::Name(font.as_bytes().to_vec()), real(size)]);
        if synthetic {
            let fill = self.fill;
            self.set_stroke_color(fill);
            self.push("w", vec![real(size * 0.03)]);
            self.push("Tr", vec![Object::Integer(2)]);
        }
        self.push("Td", vec![real(x), real(y)]);
        self.push("Tj", vec![encoded]);
        if synthetic {
            self.push("Tr", vec![Object::Integer(0)]);
        }
        self.push("ET", vec![]);
    }

    pub fn draw_centred_string(&mut self, x: f32, y: f32, text: &str, bold: bool, size: f32) {
        let w = self.text_width(text, bold, size);
        self.draw_string(x - w / 2.0, y, text, bold, size);
    }

    pub fn draw_right_string(&mut self, x: f32, y: f32, text: &str, bold: bool, size: f32) {
        let w = self.text_width(text, bold, size);
        self.draw_string(x - w, y, text, bold, size);
    }
}

fn polar(cx: f32, cy: f32, r: f32, degrees: f32) -> (f32, f32) {
    let a = degrees.to_radians();
    (cx + r * a.cos(), cy + r * a.sin())
}

#[cfg(test)]
mod tests {
    use crate::fonts::FontLibrary;

    use super::*;

    fn operators(ops: &[Operation]) -> Vec<&str> {
        ops.iter().map(|op| op.operator.as_str()).collect()
    }

    #[test]
    fn text_is_wrapped_in_text_object() {
        let library = FontLibrary::standard();
        let mut fonts = FontSet::new(&library);
        let mut ops = Vec::new();
        let mut canvas = Canvas::new(&mut ops, &mut fonts, 595.0, 842.0);
        canvas.draw_string(10.0, 20.0, "Hello", true, 12.0);

        assert_eq!(operators(&ops), ["BT", "Tf", "Td", "Tj", "ET"]);
        assert!(matches!(&ops[1].operands[0], Object::Name(name) if name == b"F2"));
    }

    #[test]
    fn empty_text_draws_nothing() {
        let library = FontLibrary::standard();
        let mut fonts = FontSet::new(&library);
        let mut ops = Vec::new();
        Canvas::new(&mut ops, &mut fonts, 595.0, 842.0).draw_string(0.0, 0.0, "", false, 10.0);
        assert!(ops.is_empty());
    }

    #[test]
    fn shapes_end_with_paint_operator() {
        let library = FontLibrary::standard();
        let mut fonts = FontSet::new(&library);
        let mut ops = Vec::new();
        let mut canvas = Canvas::new(&mut ops, &mut fonts, 100.0, 100.0);
        canvas.rect(0.0, 0.0, 10.0, 10.0, Paint::Fill);
        canvas.circle(50.0, 50.0, 5.0, Paint::FillStroke);
        canvas.wedge(50.0, 50.0, 10.0, 20.0, 90.0, -120.0, Paint::Fill);

        let ops = operators(&ops);
        assert_eq!(&ops[..2], ["re", "f"]);
        assert_eq!(ops.iter().filter(|op| **op == "B").count(), 1);
        assert_eq!(ops.last(), Some(&"f"));
    }

    #[test]
    fn paint_flags() {
        assert_eq!(Paint::from_flags(true, true), Some(Paint::FillStroke));
        assert_eq!(Paint::from_flags(false, false), None);
    }
}
