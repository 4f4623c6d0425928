//! Pagination and PDF serialization.
//!
//! [`DocumentAssembler`] walks the element list top to bottom, breaking
//! paragraphs by line and tables by row when the frame runs out, and calls
//! the page decorator whenever a page starts. The finished pages are written
//! as a PDF 1.7 object graph with `lopdf`.

use std::collections::BTreeMap;
use std::mem;

use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, Stream, StringFormat, dictionary};

use crate::canvas::{Canvas, MM, Paint};
use crate::element::{Element, Figure, Paragraph, Rule};
use crate::error::ExportError;
use crate::decorators::PageDecorator;
use crate::fonts::{FontLibrary, FontSet};
use crate::styles::{Align, Color};
use crate::tables::{BorderLine, Cell, CellStyle, Table, VAlign};

pub const A4_WIDTH: f32 = 595.28;
pub const A4_HEIGHT: f32 = 841.89;

/// Extra room a heading needs below it before it is pushed to the next page.
const HEADING_KEEP: f32 = 36.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSpec {
    pub width: f32,
    pub height: f32,
    pub margin_left: f32,
    pub margin_right: f32,
    pub margin_top: f32,
    pub margin_bottom: f32,
}

impl PageSpec {
    /// A4 with 15 mm sides, 25 mm top and 20 mm bottom.
    pub fn a4() -> Self {
        Self {
            width: A4_WIDTH,
            height: A4_HEIGHT,
            margin_left: 15.0 * MM,
            margin_right: 15.0 * MM,
            margin_top: 25.0 * MM,
            margin_bottom: 20.0 * MM,
        }
    }

    pub fn frame_width(&self) -> f32 {
        self.width - self.margin_left - self.margin_right
    }

    pub fn frame_top(&self) -> f32 {
        self.height - self.margin_top
    }

    pub fn frame_bottom(&self) -> f32 {
        self.margin_bottom
    }
}

impl Default for PageSpec {
    fn default() -> Self {
        Self::a4()
    }
}

/// Values for the document information dictionary.
#[derive(Debug, Clone)]
pub struct DocumentInfo {
    pub title: String,
    pub author: String,
    pub created: jiff::Timestamp,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPdf {
    pub bytes: Vec<u8>,
    pub page_count: usize,
    /// Anchor name → 1-based physical page.
    pub anchors: BTreeMap<String, usize>,
}

#[derive(Debug, Clone, PartialEq)]
struct Run {
    text: String,
    bold: bool,
    color: Color,
}

#[derive(Debug, Clone, Default, PartialEq)]
struct Line {
    runs: Vec<Run>,
    width: f32,
}

/// Split into words that carry their trailing whitespace.
fn split_tokens(text: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut start = 0;
    let mut in_space = false;
    for (i, ch) in text.char_indices() {
        if ch.is_whitespace() {
            in_space = true;
        } else if in_space {
            tokens.push(&text[start..i]);
            start = i;
            in_space = false;
        }
    }
    if start < text.len() {
        tokens.push(&text[start..]);
    }
    tokens
}

struct Wrapper<'f, 'a> {
    fonts: &'f FontSet<'a>,
    size: f32,
    max_width: f32,
    lines: Vec<Line>,
    line: Line,
}

impl<'f, 'a> Wrapper<'f, 'a> {
    fn new(fonts: &'f FontSet<'a>, size: f32, max_width: f32) -> Self {
        Self {
            fonts,
            size,
            max_width: max_width.max(1.0),
            lines: Vec::new(),
            line: Line::default(),
        }
    }

    fn measure(&self, text: &str, bold: bool) -> f32 {
        self.fonts.measure(text, bold, self.size)
    }

    fn append(&mut self, text: &str, bold: bool, color: Color) {
        if text.is_empty() {
            return;
        }
        self.line.width += self.measure(text, bold);
        match self.line.runs.last_mut() {
            Some(last) if last.bold == bold && last.color == color => last.text.push_str(text),
            _ => self.line.runs.push(Run {
                text: text.to_string(),
                bold,
                color,
            }),
        }
    }

    fn finish_line(&mut self) {
        let mut line = mem::take(&mut self.line);
        while let Some(last) = line.runs.last_mut() {
            let trimmed = last.text.trim_end().len();
            last.text.truncate(trimmed);
            if last.text.is_empty() {
                line.runs.pop();
            } else {
                break;
            }
        }
        line.width = line.runs.iter().map(|run| self.measure(&run.text, run.bold)).sum();
        self.lines.push(line);
    }

    fn push_token(&mut self, token: &str, bold: bool, color: Color) {
        let empty = self.line.runs.is_empty();
        let token = if empty { token.trim_start() } else { token };
        if token.is_empty() {
            return;
        }
        let visible = self.measure(token.trim_end(), bold);
        if self.line.width + visible <= self.max_width {
            self.append(token, bold, color);
            return;
        }
        if !empty && visible <= self.max_width {
            self.finish_line();
            self.append(token.trim_start(), bold, color);
            return;
        }
        // wider than a whole line: break between characters
        for ch in token.chars() {
            let mut buf = [0u8; 4];
            let piece: &str = ch.encode_utf8(&mut buf);
            let width = self.measure(piece, bold);
            if self.line.width + width > self.max_width && !self.line.runs.is_empty() {
                self.finish_line();
            }
            if self.line.runs.is_empty() && ch.is_whitespace() {
                continue;
            }
            self.append(piece, bold, color);
        }
    }

    fn push_run(&mut self, text: &str, bold: bool, color: Color) {
        for (index, segment) in text.split('\n').enumerate() {
            if index > 0 {
                self.finish_line();
            }
            for token in split_tokens(segment) {
                self.push_token(token, bold, color);
            }
        }
    }

    fn into_lines(mut self) -> Vec<Line> {
        if !self.line.runs.is_empty() || self.lines.is_empty() {
            self.finish_line();
        }
        self.lines
    }
}

fn wrap(fonts: &FontSet<'_>, runs: &[Run], size: f32, max_width: f32) -> Vec<Line> {
    let mut wrapper = Wrapper::new(fonts, size, max_width);
    for run in runs {
        wrapper.push_run(&run.text, run.bold, run.color);
    }
    wrapper.into_lines()
}

fn paragraph_runs(paragraph: &Paragraph) -> Vec<Run> {
    paragraph
        .spans
        .iter()
        .map(|span| Run {
            text: span.text.clone(),
            bold: span.bold || paragraph.style.bold,
            color: span.color.unwrap_or(paragraph.style.color),
        })
        .collect()
}

fn cell_runs(cell: &Cell, style: &CellStyle) -> Vec<Run> {
    match cell {
        Cell::Text(text) => vec![Run {
            text: text.clone(),
            bold: style.bold,
            color: style.color,
        }],
        Cell::Rich(spans) => spans
            .iter()
            .map(|span| Run {
                text: span.text.clone(),
                bold: span.bold || style.bold,
                color: span.color.unwrap_or(style.color),
            })
            .collect(),
        Cell::Chart(_) | Cell::Empty => Vec::new(),
    }
}

/// Baseline of a line whose box starts at `top`.
fn baseline(top: f32, leading: f32, size: f32) -> f32 {
    top - leading / 2.0 - size * 0.35
}

fn aligned_x(left: f32, available: f32, width: f32, align: Align) -> f32 {
    match align {
        Align::Left | Align::Justify => left,
        Align::Center => left + (available - width) / 2.0,
        Align::Right => left + available - width,
    }
}

fn draw_line(canvas: &mut Canvas<'_, '_>, line: &Line, x: f32, y: f32, size: f32) {
    let mut x = x;
    for run in &line.runs {
        canvas.set_fill_color(run.color);
        canvas.draw_string(x, y, &run.text, run.bold, size);
        x += canvas.text_width(&run.text, run.bold, size);
    }
}

struct LaidOutCell<'t> {
    lines: Vec<Line>,
    style: CellStyle,
    figure: Option<&'t Figure>,
}

impl LaidOutCell<'_> {
    fn content_height(&self) -> f32 {
        match self.figure {
            Some(figure) => figure.height,
            None => self.lines.len() as f32 * self.style.leading(),
        }
    }
}

/// Cut a row taller than `capacity` into slices that each fit on one page,
/// keeping every cell's lines in order. Figures stay whole in the first slice.
fn split_row(cells: Vec<LaidOutCell<'_>>, height: f32, capacity: f32) -> Vec<(Vec<LaidOutCell<'_>>, f32)> {
    if height <= capacity || capacity <= 0.0 {
        return vec![(cells, height)];
    }
    let per_slice: Vec<usize> = cells
        .iter()
        .map(|cell| {
            let room = capacity - cell.style.padding_top - cell.style.padding_bottom;
            ((room / cell.style.leading()).floor() as usize).max(1)
        })
        .collect();
    let slices = cells
        .iter()
        .zip(&per_slice)
        .map(|(cell, &per)| cell.lines.len().div_ceil(per))
        .max()
        .unwrap_or(1)
        .max(1);

    (0..slices)
        .map(|k| {
            let part: Vec<_> = cells
                .iter()
                .zip(&per_slice)
                .map(|(cell, &per)| LaidOutCell {
                    lines: cell.lines.iter().skip(k * per).take(per).cloned().collect(),
                    style: cell.style,
                    figure: if k == 0 { cell.figure } else { None },
                })
                .collect();
            let height = part
                .iter()
                .map(|cell| cell.content_height() + cell.style.padding_top + cell.style.padding_bottom)
                .fold(0.0, f32::max);
            (part, height)
        })
        .collect()
}

/// Lays out elements on pages and serializes the result.
pub struct DocumentAssembler<'a, 'd> {
    spec: PageSpec,
    fonts: FontSet<'a>,
    decorator: &'d mut dyn PageDecorator,
    finished: Vec<Vec<Operation>>,
    current: Vec<Operation>,
    started: bool,
    y: f32,
    page_has_content: bool,
    fresh_from_overflow: bool,
    pending_anchors: Vec<String>,
    anchors: BTreeMap<String, usize>,
}

impl<'a, 'd> DocumentAssembler<'a, 'd> {
    pub fn new(spec: PageSpec, library: &'a FontLibrary, decorator: &'d mut dyn PageDecorator) -> Self {
        Self {
            spec,
            fonts: FontSet::new(library),
            decorator,
            finished: Vec::new(),
            current: Vec::new(),
            started: false,
            y: spec.frame_top(),
            page_has_content: false,
            fresh_from_overflow: false,
            pending_anchors: Vec::new(),
            anchors: BTreeMap::new(),
        }
    }

    /// Pages started so far, the current one included.
    pub fn page_count(&self) -> usize {
        self.finished.len() + usize::from(self.started)
    }

    fn remaining(&self) -> f32 {
        self.y - self.spec.frame_bottom()
    }

    fn start_page(&mut self, overflow: bool) {
        if self.started {
            let page = mem::take(&mut self.current);
            self.finished.push(page);
        }
        let first = !self.started;
        self.started = true;
        self.y = self.spec.frame_top();
        self.page_has_content = false;
        self.fresh_from_overflow = overflow;

        let mut canvas = Canvas::new(&mut self.current, &mut self.fonts, self.spec.width, self.spec.height);
        if first {
            self.decorator.on_first_page(&mut canvas);
        } else {
            self.decorator.on_later_pages(&mut canvas);
        }
    }

    fn ensure_started(&mut self) {
        if !self.started {
            self.start_page(false);
        }
    }

    /// Visible content is about to land on the current page.
    fn mark_content(&mut self) {
        let page = self.page_count();
        for anchor in self.pending_anchors.drain(..) {
            self.anchors.entry(anchor).or_insert(page);
        }
        self.page_has_content = true;
        self.fresh_from_overflow = false;
    }

    /// Move to a new page unless `height` still fits or the page is empty.
    fn reserve(&mut self, height: f32) {
        if height > self.remaining() && self.page_has_content {
            self.start_page(true);
        }
    }

    pub fn layout(&mut self, elements: &[Element]) {
        self.ensure_started();
        for element in elements {
            match element {
                Element::Paragraph(paragraph) => self.place_paragraph(paragraph),
                Element::Spacer(height) => self.place_spacer(*height),
                Element::Rule(rule) => self.place_rule(rule),
                Element::PageBreak => {
                    if self.fresh_from_overflow {
                        tracing::debug!(page = self.page_count(), "skipping page break on overflow page");
                    } else {
                        self.start_page(false);
                    }
                }
                Element::Table(table) => self.place_table(table),
                Element::Chart(figure) => self.place_figure(figure),
                Element::Anchor(name) => self.pending_anchors.push(name.clone()),
            }
        }
    }

    fn place_spacer(&mut self, height: f32) {
        if height > self.remaining() {
            self.start_page(true);
        } else {
            self.y -= height;
            self.page_has_content = true;
        }
    }

    fn place_rule(&mut self, rule: &Rule) {
        let before = if self.page_has_content { rule.space_before } else { 0.0 };
        self.reserve(before + rule.thickness);
        if self.page_has_content {
            self.y -= rule.space_before;
        }
        self.mark_content();

        let (x0, x1) = (self.spec.margin_left, self.spec.margin_left + self.spec.frame_width());
        let y = self.y - rule.thickness / 2.0;
        let mut canvas = Canvas::new(&mut self.current, &mut self.fonts, self.spec.width, self.spec.height);
        canvas.save_state();
        canvas.set_stroke_color(rule.color);
        canvas.set_line_width(rule.thickness);
        canvas.line(x0, y, x1, y);
        canvas.restore_state();

        self.y -= rule.thickness + rule.space_after;
    }

    fn place_paragraph(&mut self, paragraph: &Paragraph) {
        let style = paragraph.style;
        let available = self.spec.frame_width() - style.left_indent;
        let lines = wrap(&self.fonts, &paragraph_runs(paragraph), style.size, available);

        let heading = style.bold && style.space_before > 0.0;
        let keep = if heading {
            lines.len() as f32 * style.leading + HEADING_KEEP
        } else {
            style.leading
        };
        let before = if self.page_has_content { style.space_before } else { 0.0 };
        self.reserve(before + keep);
        if self.page_has_content {
            self.y -= style.space_before;
        }

        let left = self.spec.margin_left + style.left_indent;
        for line in &lines {
            if style.leading > self.remaining() && self.page_has_content {
                self.start_page(true);
            }
            self.mark_content();
            let x = aligned_x(left, available, line.width, style.align);
            let y = baseline(self.y, style.leading, style.size);
            let mut canvas = Canvas::new(&mut self.current, &mut self.fonts, self.spec.width, self.spec.height);
            draw_line(&mut canvas, line, x, y, style.size);
            self.y -= style.leading;
        }
        self.y -= style.space_after;
    }

    fn place_figure(&mut self, figure: &Figure) {
        self.reserve(figure.height);
        self.mark_content();
        let x = self.spec.margin_left + (self.spec.frame_width() - figure.width) / 2.0;
        let y = self.y - figure.height;
        let mut canvas = Canvas::new(&mut self.current, &mut self.fonts, self.spec.width, self.spec.height);
        figure.image.paint(&mut canvas, x, y, figure.width, figure.height);
        self.y = y;
    }

    fn lay_out_row<'t>(&self, table: &'t Table, row: usize) -> (Vec<LaidOutCell<'t>>, f32) {
        let mut cells = Vec::new();
        let mut height = table.min_row_height(row);
        for (column, cell) in table.rows()[row].iter().enumerate() {
            let style = table.cell_style(column, row);
            let width = table.col_widths().get(column).copied().unwrap_or(0.0);
            let figure = match cell {
                Cell::Chart(figure) => Some(figure),
                _ => None,
            };
            let lines = if figure.is_some() {
                Vec::new()
            } else {
                let runs = cell_runs(cell, &style);
                if runs.is_empty() {
                    Vec::new()
                } else {
                    wrap(&self.fonts, &runs, style.size, width - style.padding_left - style.padding_right)
                }
            };
            let laid = LaidOutCell { lines, style, figure };
            height = height.max(laid.content_height() + style.padding_top + style.padding_bottom);
            cells.push(laid);
        }
        (cells, height)
    }

    fn place_table(&mut self, table: &Table) {
        if table.rows().is_empty() {
            return;
        }
        let x0 = self.spec.margin_left + (self.spec.frame_width() - table.width()) / 2.0;
        let mut xs = vec![x0];
        for width in table.col_widths() {
            let last = xs.last().copied().unwrap_or(x0);
            xs.push(last + width);
        }

        let header_rows = table.header_rows().min(table.rows().len());
        let mut segments: Vec<(usize, Vec<LaidOutCell<'_>>, f32)> = Vec::new();
        for row in 0..header_rows {
            let (cells, height) = self.lay_out_row(table, row);
            segments.push((row, cells, height));
        }
        let header_height: f32 = segments.iter().map(|(_, _, height)| *height).sum();
        let capacity = self.spec.frame_top() - self.spec.frame_bottom() - header_height;
        for row in header_rows..table.rows().len() {
            let (cells, height) = self.lay_out_row(table, row);
            for (cells, height) in split_row(cells, height, capacity) {
                segments.push((row, cells, height));
            }
        }

        let mut placed: Vec<(usize, f32, f32)> = Vec::new();
        for (index, (row, cells, height)) in segments.iter().enumerate() {
            let needed = if index == 0 && header_rows > 0 {
                header_height + segments.get(header_rows).map_or(0.0, |(_, _, h)| *h)
            } else {
                *height
            };
            if needed > self.remaining() && self.page_has_content {
                self.draw_borders(table, &xs, &placed);
                placed.clear();
                self.start_page(true);
                if *row >= header_rows {
                    for (header, header_cells, repeat_height) in &segments[..header_rows] {
                        self.draw_row(header_cells, &xs, *repeat_height);
                        placed.push((*header, self.y + repeat_height, self.y));
                    }
                }
            }
            self.mark_content();
            self.draw_row(cells, &xs, *height);
            placed.push((*row, self.y + height, self.y));
        }
        self.draw_borders(table, &xs, &placed);
    }

    /// Draw one row with its top at the cursor and advance the cursor.
    fn draw_row(&mut self, cells: &[LaidOutCell<'_>], xs: &[f32], height: f32) {
        let top = self.y;
        let mut canvas = Canvas::new(&mut self.current, &mut self.fonts, self.spec.width, self.spec.height);
        for (column, cell) in cells.iter().enumerate() {
            let (Some(&left), Some(&right)) = (xs.get(column), xs.get(column + 1)) else {
                continue;
            };
            let style = &cell.style;
            if let Some(background) = style.background {
                canvas.set_fill_color(background);
                canvas.rect(left, top - height, right - left, height, Paint::Fill);
            }

            let inner_left = left + style.padding_left;
            let inner_width = right - left - style.padding_left - style.padding_right;
            let inner_top = top - style.padding_top;
            let inner_height = height - style.padding_top - style.padding_bottom;
            let content_height = cell.content_height();
            let start = match style.valign {
                VAlign::Top => inner_top,
                VAlign::Middle => inner_top - (inner_height - content_height).max(0.0) / 2.0,
                VAlign::Bottom => inner_top - (inner_height - content_height).max(0.0),
            };

            if let Some(figure) = cell.figure {
                let x = aligned_x(inner_left, inner_width, figure.width, style.align);
                figure.image.paint(&mut canvas, x, start - figure.height, figure.width, figure.height);
                continue;
            }
            for (i, line) in cell.lines.iter().enumerate() {
                let line_top = start - i as f32 * style.leading();
                let x = aligned_x(inner_left, inner_width, line.width, style.align);
                draw_line(&mut canvas, line, x, baseline(line_top, style.leading(), style.size), style.size);
            }
        }
        self.y -= height;
    }

    fn draw_borders(&mut self, table: &Table, xs: &[f32], placed: &[(usize, f32, f32)]) {
        if placed.is_empty() {
            return;
        }
        let borders = table.borders();
        if borders.is_empty() {
            return;
        }
        let mut canvas = Canvas::new(&mut self.current, &mut self.fonts, self.spec.width, self.spec.height);
        canvas.save_state();
        for border in borders {
            match border {
                BorderLine::Horizontal {
                    row,
                    from,
                    to,
                    width,
                    color,
                } => {
                    let (Some(&x0), Some(&x1)) = (xs.get(from), xs.get(to)) else {
                        continue;
                    };
                    canvas.set_stroke_color(color);
                    canvas.set_line_width(width);
                    for (k, &(placed_row, top, bottom)) in placed.iter().enumerate() {
                        if placed_row == row {
                            canvas.line(x0, top, x1, top);
                        } else if placed_row + 1 == row && placed.get(k + 1).is_none_or(|next| next.0 != row) {
                            canvas.line(x0, bottom, x1, bottom);
                        }
                    }
                }
                BorderLine::Vertical {
                    column,
                    from,
                    to,
                    width,
                    color,
                } => {
                    let Some(&x) = xs.get(column) else {
                        continue;
                    };
                    canvas.set_stroke_color(color);
                    canvas.set_line_width(width);
                    for &(placed_row, top, bottom) in placed {
                        if (from..to).contains(&placed_row) {
                            canvas.line(x, top, x, bottom);
                        }
                    }
                }
            }
        }
        canvas.restore_state();
    }

    /// Serialize every page laid out so far.
    pub fn finish(mut self, info: &DocumentInfo) -> Result<RenderedPdf, ExportError> {
        self.ensure_started();
        let page_count = self.page_count();
        for anchor in self.pending_anchors.drain(..) {
            self.anchors.entry(anchor).or_insert(page_count);
        }
        self.finished.push(mem::take(&mut self.current));

        let mut document = Document::with_version("1.7");
        let pages_id = document.new_object_id();
        let fonts = self.fonts.write_resources(&mut document);
        let resources_id = document.add_object(dictionary! { "Font" => fonts });

        let mut kids = Vec::with_capacity(self.finished.len());
        for operations in self.finished {
            let content = Content { operations };
            let content_id = document.add_object(Stream::new(dictionary! {}, content.encode()?));
            let page_id = document.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "MediaBox" => vec![0.into(), 0.into(), Object::Real(self.spec.width), Object::Real(self.spec.height)],
                "Contents" => content_id,
                "Resources" => resources_id,
            });
            kids.push(Object::from(page_id));
        }

        document.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => page_count as i64,
            }),
        );
        let catalog_id = document.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        document.trailer.set("Root", catalog_id);

        let created = format!("D:{}Z", info.created.strftime("%Y%m%d%H%M%S"));
        let info_id = document.add_object(dictionary! {
            "Title" => text_string(&info.title),
            "Author" => text_string(&info.author),
            "Producer" => text_string("G-IMPACT Analysis Engine"),
            "CreationDate" => Object::string_literal(created),
        });
        document.trailer.set("Info", info_id);

        document.compress();
        let mut bytes = Vec::new();
        document.save_to(&mut bytes)?;

        Ok(RenderedPdf {
            bytes,
            page_count,
            anchors: self.anchors,
        })
    }
}

/// PDF text string: literal for ASCII, UTF-16BE with a byte order mark
/// otherwise.
fn text_string(text: &str) -> Object {
    if text.is_ascii() {
        return Object::string_literal(text);
    }
    let mut bytes = vec![0xFE, 0xFF];
    for unit in text.encode_utf16() {
        bytes.extend_from_slice(&unit.to_be_bytes());
    }
    Object::String(bytes, StringFormat::Hexadecimal)
}

/// Lay out `elements` with `decorator` and serialize them.
pub fn render_pdf(
    elements: &[Element],
    library: &FontLibrary,
    decorator: &mut dyn PageDecorator,
    info: &DocumentInfo,
) -> Result<RenderedPdf, ExportError> {
    let mut assembler = DocumentAssembler::new(PageSpec::a4(), library, decorator);
    assembler.layout(elements);
    assembler.finish(info)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decorators::ReportTemplate;
    use crate::styles::{DocumentStyles, palette};
    use crate::markup::parse_inline;
    use crate::tables::{highlight_box, styled_table};

    fn info() -> DocumentInfo {
        DocumentInfo {
            title: "테스트".to_string(),
            author: "tester".to_string(),
            created: jiff::Timestamp::UNIX_EPOCH,
        }
    }

    fn render(elements: &[Element]) -> RenderedPdf {
        let library = FontLibrary::standard();
        let mut template = ReportTemplate::new("Acme", "today", "G-IMPACT Analysis Report");
        render_pdf(elements, &library, &mut template, &info()).expect("render")
    }

    fn body(text: &str) -> Element {
        Element::Paragraph(Paragraph::new(text, DocumentStyles::default().body))
    }

    #[test]
    fn tokens_keep_trailing_space() {
        assert_eq!(split_tokens("ab  cd e"), ["ab  ", "cd ", "e"]);
        assert_eq!(split_tokens("  x"), ["  ", "x"]);
        assert!(split_tokens("").is_empty());
    }

    #[test]
    fn wrap_respects_width_and_hard_breaks() {
        let library = FontLibrary::standard();
        let fonts = FontSet::new(&library);
        let run = |text: &str| Run {
            text: text.to_string(),
            bold: false,
            color: palette::DARK,
        };
        let lines = wrap(&fonts, &[run("aaaa bbbb cccc dddd")], 10.0, 60.0);
        assert!(lines.len() > 1);
        assert!(lines.iter().all(|line| line.width <= 60.0));

        let lines = wrap(&fonts, &[run("title\n\nbody")], 10.0, 500.0);
        assert_eq!(lines.len(), 3);
        assert!(lines[1].runs.is_empty());
    }

    #[test]
    fn long_words_break_between_characters() {
        let library = FontLibrary::standard();
        let fonts = FontSet::new(&library);
        let lines = wrap(
            &fonts,
            &[Run {
                text: "x".repeat(200),
                bold: false,
                color: palette::DARK,
            }],
            10.0,
            100.0,
        );
        assert!(lines.len() >= 10);
    }

    #[test]
    fn cover_then_explicit_break() {
        let pdf = render(&[Element::Spacer(1.0), Element::PageBreak, body("hello")]);
        assert_eq!(pdf.page_count, 2);
        assert!(pdf.bytes.starts_with(b"%PDF-1.7"));
    }

    #[test]
    fn long_flow_spills_onto_more_pages() {
        let elements: Vec<_> = (0..200).map(|i| body(&format!("paragraph {i}"))).collect();
        let pdf = render(&elements);
        assert!(pdf.page_count > 3);
        let parsed = Document::load_mem(&pdf.bytes).expect("parse");
        assert_eq!(parsed.get_pages().len(), pdf.page_count);
    }

    #[test]
    fn break_after_overflowing_spacer_is_skipped() {
        let mut elements = vec![Element::Spacer(1.0), Element::PageBreak];
        elements.push(body("first"));
        elements.push(Element::Spacer(5000.0));
        elements.push(Element::PageBreak);
        elements.push(body("second"));
        let pdf = render(&elements);
        assert_eq!(pdf.page_count, 3);
    }

    #[test]
    fn anchors_resolve_to_the_page_of_following_content() {
        let pdf = render(&[
            Element::Spacer(1.0),
            Element::PageBreak,
            Element::Anchor("intro".to_string()),
            body("intro"),
            Element::PageBreak,
            Element::Anchor("next".to_string()),
            body("next"),
        ]);
        assert_eq!(pdf.anchors.get("intro"), Some(&2));
        assert_eq!(pdf.anchors.get("next"), Some(&3));
    }

    #[test]
    fn tall_tables_split_by_row() {
        let rows: Vec<Vec<String>> = (0..120).map(|i| vec![i.to_string(), format!("row {i}")]).collect();
        let table = styled_table(rows, &[60.0, 200.0], palette::PRIMARY);
        let pdf = render(&[Element::Table(table)]);
        assert!(pdf.page_count >= 3);
    }

    #[test]
    fn oversized_box_continues_on_following_pages() {
        let library = FontLibrary::standard();
        let mut template = ReportTemplate::new("Acme", "today", "G-IMPACT Analysis Report");
        let mut assembler = DocumentAssembler::new(PageSpec::a4(), &library, &mut template);
        assembler.layout(&[
            body("lead"),
            Element::Table(highlight_box(parse_inline(&"word ".repeat(3000)), palette::SKY)),
        ]);
        assert!(assembler.page_count() > 2);
        assert!(assembler.y >= assembler.spec.frame_bottom());

        let mut pages = assembler.finished.clone();
        pages.push(assembler.current.clone());
        let mut words = 0;
        for op in pages.iter().flatten() {
            match op.operator.as_str() {
                "Td" => {
                    let y = op.operands[1].as_float().expect("y");
                    assert!(y > 0.0, "text drawn below the page at y={y}");
                }
                "Tj" => {
                    if let Object::String(bytes, _) = &op.operands[0] {
                        words += String::from_utf8_lossy(bytes).matches("word").count();
                    }
                }
                _ => {}
            }
        }
        assert_eq!(words, 3000);
    }

    #[test]
    fn short_rows_are_not_split() {
        let library = FontLibrary::standard();
        let fonts = FontSet::new(&library);
        let cell = LaidOutCell {
            lines: wrap(
                &fonts,
                &[Run {
                    text: "one line".to_string(),
                    bold: false,
                    color: palette::DARK,
                }],
                10.0,
                400.0,
            ),
            style: CellStyle::default(),
            figure: None,
        };
        assert_eq!(split_row(vec![cell], 30.0, 700.0).len(), 1);
    }

    #[test]
    fn text_strings_use_utf16_for_non_ascii() {
        assert!(matches!(text_string("abc"), Object::String(bytes, StringFormat::Literal) if bytes == b"abc"));
        assert!(matches!(text_string("가"), Object::String(bytes, _) if bytes == [0xFE, 0xFF, 0xAC, 0x00]));
    }
}
