//! Table model and the report's table formatters.
//!
//! A [`Table`] is a grid of cells plus an ordered list of style commands.
//! Commands address rectangular cell ranges, negative indices count from the
//! end, and later commands override earlier ones for the same cell.

use crate::element::{Figure, Span};
use crate::styles::{Align, Color, palette};

#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Rich(Vec<Span>),
    Chart(Figure),
    Empty,
}

impl Cell {
    pub fn text(&self) -> String {
        match self {
            Cell::Text(text) => text.clone(),
            Cell::Rich(spans) => spans.iter().map(|span| span.text.as_str()).collect(),
            Cell::Chart(_) | Cell::Empty => String::new(),
        }
    }
}

impl From<String> for Cell {
    fn from(text: String) -> Self {
        Cell::Text(text)
    }
}

impl From<&str> for Cell {
    fn from(text: &str) -> Self {
        Cell::Text(text.to_string())
    }
}

/// Inclusive rectangle of `(column, row)` addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRange {
    pub from: (i32, i32),
    pub to: (i32, i32),
}

impl CellRange {
    pub const ALL: CellRange = CellRange::new((0, 0), (-1, -1));
    pub const HEADER: CellRange = CellRange::row(0);
    pub const BODY: CellRange = CellRange::new((0, 1), (-1, -1));

    pub const fn new(from: (i32, i32), to: (i32, i32)) -> Self {
        Self { from, to }
    }

    pub const fn row(row: i32) -> Self {
        Self::new((0, row), (-1, row))
    }

    pub const fn column(column: i32) -> Self {
        Self::new((column, 0), (column, -1))
    }

    pub const fn cell(column: i32, row: i32) -> Self {
        Self::new((column, row), (column, row))
    }

    fn resolve(index: i32, len: usize) -> i64 {
        if index < 0 {
            len as i64 + i64::from(index)
        } else {
            i64::from(index)
        }
    }

    pub fn contains(&self, column: usize, row: usize, columns: usize, rows: usize) -> bool {
        let (c, r) = (column as i64, row as i64);
        let (c0, c1) = (Self::resolve(self.from.0, columns), Self::resolve(self.to.0, columns));
        let (r0, r1) = (Self::resolve(self.from.1, rows), Self::resolve(self.to.1, rows));
        (c0..=c1).contains(&c) && (r0..=r1).contains(&r)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VAlign {
    Top,
    #[default]
    Middle,
    Bottom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Top,
    Right,
    Bottom,
    Left,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TableCommand {
    Background(CellRange, Color),
    TextColor(CellRange, Color),
    Bold(CellRange, bool),
    FontSize(CellRange, f32),
    Align(CellRange, Align),
    VAlign(CellRange, VAlign),
    Padding(CellRange, Side, f32),
    /// Minimum row height for every row touched by the range.
    RowHeight(CellRange, f32),
    Grid(CellRange, f32, Color),
    Box(CellRange, f32, Color),
    LineBelow(CellRange, f32, Color),
}

/// Fully resolved presentation of one cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellStyle {
    pub background: Option<Color>,
    pub color: Color,
    pub bold: bool,
    pub size: f32,
    pub align: Align,
    pub valign: VAlign,
    pub padding_top: f32,
    pub padding_right: f32,
    pub padding_bottom: f32,
    pub padding_left: f32,
}

impl CellStyle {
    pub fn leading(&self) -> f32 {
        self.size * 1.4
    }
}

impl Default for CellStyle {
    fn default() -> Self {
        Self {
            background: None,
            color: palette::DARK,
            bold: false,
            size: 10.0,
            align: Align::Left,
            valign: VAlign::Middle,
            padding_top: 3.0,
            padding_right: 6.0,
            padding_bottom: 3.0,
            padding_left: 6.0,
        }
    }
}

/// A border segment in table coordinates: row/column boundary indices.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BorderLine {
    /// Horizontal line on boundary `row` (0 = top edge) spanning columns `from..to`.
    Horizontal { row: usize, from: usize, to: usize, width: f32, color: Color },
    /// Vertical line on boundary `column` spanning rows `from..to`.
    Vertical { column: usize, from: usize, to: usize, width: f32, color: Color },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    rows: Vec<Vec<Cell>>,
    col_widths: Vec<f32>,
    row_heights: Vec<Option<f32>>,
    commands: Vec<TableCommand>,
    header_rows: usize,
}

impl Table {
    pub fn new(rows: Vec<Vec<Cell>>, col_widths: Vec<f32>) -> Self {
        let row_heights = vec![None; rows.len()];
        Self {
            rows,
            col_widths,
            row_heights,
            commands: Vec::new(),
            header_rows: 0,
        }
    }

    pub fn from_text(rows: Vec<Vec<String>>, col_widths: Vec<f32>) -> Self {
        let rows = rows.into_iter().map(|row| row.into_iter().map(Cell::Text).collect()).collect();
        Self::new(rows, col_widths)
    }

    pub fn with_style(mut self, commands: impl IntoIterator<Item = TableCommand>) -> Self {
        self.commands.extend(commands);
        self
    }

    pub fn push_style(&mut self, command: TableCommand) {
        self.commands.push(command);
    }

    /// Fixed heights per row; the row still grows to fit its content.
    pub fn with_row_heights(mut self, heights: &[f32]) -> Self {
        for (slot, height) in self.row_heights.iter_mut().zip(heights) {
            *slot = Some(*height);
        }
        self
    }

    /// Rows repeated at the top of every page the table continues onto.
    pub fn repeat_rows(mut self, count: usize) -> Self {
        self.header_rows = count.min(self.rows.len());
        self
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn col_widths(&self) -> &[f32] {
        &self.col_widths
    }

    pub fn header_rows(&self) -> usize {
        self.header_rows
    }

    pub fn column_count(&self) -> usize {
        self.col_widths.len()
    }

    pub fn width(&self) -> f32 {
        self.col_widths.iter().sum()
    }

    pub fn text_rows(&self) -> Vec<Vec<String>> {
        self.rows.iter().map(|row| row.iter().map(Cell::text).collect()).collect()
    }

    /// Every row has as many cells as the table has columns.
    pub fn is_rectangular(&self) -> bool {
        self.rows.iter().all(|row| row.len() == self.column_count())
    }

    pub fn cell_style(&self, column: usize, row: usize) -> CellStyle {
        let (columns, rows) = (self.column_count(), self.rows.len());
        let mut style = CellStyle::default();
        for command in &self.commands {
            let hit = |range: &CellRange| range.contains(column, row, columns, rows);
            match command {
                TableCommand::Background(range, color) if hit(range) => style.background = Some(*color),
                TableCommand::TextColor(range, color) if hit(range) => style.color = *color,
                TableCommand::Bold(range, bold) if hit(range) => style.bold = *bold,
                TableCommand::FontSize(range, size) if hit(range) => style.size = *size,
                TableCommand::Align(range, align) if hit(range) => style.align = *align,
                TableCommand::VAlign(range, valign) if hit(range) => style.valign = *valign,
                TableCommand::Padding(range, side, value) if hit(range) => match side {
                    Side::Top => style.padding_top = *value,
                    Side::Right => style.padding_right = *value,
                    Side::Bottom => style.padding_bottom = *value,
                    Side::Left => style.padding_left = *value,
                },
                _ => {}
            }
        }
        style
    }

    pub fn min_row_height(&self, row: usize) -> f32 {
        let (columns, rows) = (self.column_count(), self.rows.len());
        let from_commands = self
            .commands
            .iter()
            .filter_map(|command| match command {
                TableCommand::RowHeight(range, height) if (0..columns.max(1)).any(|c| range.contains(c, row, columns, rows)) => {
                    Some(*height)
                }
                _ => None,
            })
            .fold(0.0_f32, f32::max);
        self.row_heights
            .get(row)
            .copied()
            .flatten()
            .unwrap_or(0.0)
            .max(from_commands)
    }

    /// Border segments in drawing order.
    pub fn borders(&self) -> Vec<BorderLine> {
        let (columns, rows) = (self.column_count(), self.rows.len());
        let bounds = |range: &CellRange| {
            let c0 = CellRange::resolve(range.from.0, columns).clamp(0, columns as i64) as usize;
            let c1 = CellRange::resolve(range.to.0, columns).clamp(-1, columns as i64 - 1);
            let r0 = CellRange::resolve(range.from.1, rows).clamp(0, rows as i64) as usize;
            let r1 = CellRange::resolve(range.to.1, rows).clamp(-1, rows as i64 - 1);
            let c1 = (c1 + 1) as usize;
            let r1 = (r1 + 1) as usize;
            (c0, c1, r0, r1)
        };

        let mut lines = Vec::new();
        for command in &self.commands {
            match command {
                TableCommand::Grid(range, width, color) => {
                    let (c0, c1, r0, r1) = bounds(range);
                    if c0 >= c1 || r0 >= r1 {
                        continue;
                    }
                    for row in r0..=r1 {
                        lines.push(BorderLine::Horizontal { row, from: c0, to: c1, width: *width, color: *color });
                    }
                    for column in c0..=c1 {
                        lines.push(BorderLine::Vertical { column, from: r0, to: r1, width: *width, color: *color });
                    }
                }
                TableCommand::Box(range, width, color) => {
                    let (c0, c1, r0, r1) = bounds(range);
                    if c0 >= c1 || r0 >= r1 {
                        continue;
                    }
                    for row in [r0, r1] {
                        lines.push(BorderLine::Horizontal { row, from: c0, to: c1, width: *width, color: *color });
                    }
                    for column in [c0, c1] {
                        lines.push(BorderLine::Vertical { column, from: r0, to: r1, width: *width, color: *color });
                    }
                }
                TableCommand::LineBelow(range, width, color) => {
                    let (c0, c1, r0, r1) = bounds(range);
                    if c0 >= c1 {
                        continue;
                    }
                    for row in r0..r1 {
                        lines.push(BorderLine::Horizontal { row: row + 1, from: c0, to: c1, width: *width, color: *color });
                    }
                }
                _ => {}
            }
        }
        lines
    }
}

/// Header-colored table with zebra body rows and a light grid.
pub fn styled_table(rows: Vec<Vec<String>>, col_widths: &[f32], header_color: Color) -> Table {
    let body_rows = rows.len();
    let mut table = Table::from_text(rows, col_widths.to_vec())
        .repeat_rows(1)
        .with_style([
            TableCommand::Background(CellRange::HEADER, header_color),
            TableCommand::TextColor(CellRange::HEADER, palette::WHITE),
            TableCommand::Bold(CellRange::HEADER, true),
            TableCommand::FontSize(CellRange::HEADER, 9.0),
            TableCommand::FontSize(CellRange::BODY, 8.0),
            TableCommand::Align(CellRange::ALL, Align::Center),
            TableCommand::VAlign(CellRange::ALL, VAlign::Middle),
            TableCommand::Grid(CellRange::ALL, 0.5, palette::LIGHT),
            TableCommand::Padding(CellRange::ALL, Side::Top, 6.0),
            TableCommand::Padding(CellRange::ALL, Side::Bottom, 6.0),
        ]);
    for row in (2..body_rows).step_by(2) {
        table.push_style(TableCommand::Background(CellRange::row(row as i32), palette::LIGHT));
    }
    table
}

/// A table-of-contents line: section, one-line description, page number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TocEntry {
    pub anchor: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub page: usize,
}

pub fn toc_table(entries: &[TocEntry]) -> Table {
    let rows = entries
        .iter()
        .map(|entry| vec![entry.title.to_string(), entry.description.to_string(), entry.page.to_string()])
        .collect();
    Table::from_text(rows, vec![150.0, 250.0, 50.0]).with_style([
        TableCommand::FontSize(CellRange::ALL, 11.0),
        TableCommand::Bold(CellRange::column(0), true),
        TableCommand::TextColor(CellRange::column(0), palette::PRIMARY),
        TableCommand::TextColor(CellRange::column(1), palette::GRAY),
        TableCommand::TextColor(CellRange::column(2), palette::DARK),
        TableCommand::Align(CellRange::column(2), Align::Right),
        TableCommand::Padding(CellRange::ALL, Side::Bottom, 12.0),
        TableCommand::Padding(CellRange::ALL, Side::Top, 8.0),
        TableCommand::LineBelow(CellRange::new((0, 0), (-1, -2)), 0.5, palette::RULE),
    ])
}

/// One boxed paragraph across the frame.
pub fn highlight_box(spans: Vec<Span>, background: Color) -> Table {
    Table::new(vec![vec![Cell::Rich(spans)]], vec![450.0]).with_style([
        TableCommand::Background(CellRange::ALL, background),
        TableCommand::Box(CellRange::ALL, 1.0, palette::PRIMARY),
        TableCommand::Padding(CellRange::ALL, Side::Left, 12.0),
        TableCommand::Padding(CellRange::ALL, Side::Right, 12.0),
        TableCommand::Padding(CellRange::ALL, Side::Top, 10.0),
        TableCommand::Padding(CellRange::ALL, Side::Bottom, 10.0),
    ])
}

/// Charts side by side, top aligned.
pub fn chart_row(figures: Vec<Figure>, col_widths: Vec<f32>) -> Table {
    let cells = figures.into_iter().map(Cell::Chart).collect();
    Table::new(vec![cells], col_widths).with_style([
        TableCommand::VAlign(CellRange::ALL, VAlign::Top),
        TableCommand::Align(CellRange::cell(0, 0), Align::Left),
        TableCommand::Align(CellRange::cell(1, 0), Align::Center),
    ])
}

/// Per-area opportunity / threat counts for the PESTEL overview.
#[derive(Debug, Clone, PartialEq)]
pub struct PestelAreaSummary {
    pub abbreviation: &'static str,
    pub name: &'static str,
    pub opportunities: usize,
    pub threats: usize,
    pub average_impact: f64,
}

fn count_or_dash(count: usize) -> String {
    if count > 0 { count.to_string() } else { "-".to_string() }
}

/// `●` per whole impact point, padded with `○` to five.
pub fn impact_dots(average: f64) -> String {
    let filled = average.floor().clamp(0.0, 5.0) as usize;
    format!("{}{}", "●".repeat(filled), "○".repeat(5 - filled))
}

pub fn pestel_summary_table(areas: &[PestelAreaSummary]) -> Table {
    let mut rows = vec![vec!["영역".to_string(), "기회".to_string(), "위협".to_string(), "영향도".to_string()]];
    rows.extend(areas.iter().map(|area| {
        vec![
            format!("{} ({})", area.abbreviation, area.name),
            count_or_dash(area.opportunities),
            count_or_dash(area.threats),
            impact_dots(area.average_impact),
        ]
    }));
    Table::from_text(rows, vec![100.0, 50.0, 50.0, 80.0]).with_style([
        TableCommand::FontSize(CellRange::ALL, 9.0),
        TableCommand::Bold(CellRange::HEADER, true),
        TableCommand::Background(CellRange::HEADER, palette::PESTEL),
        TableCommand::TextColor(CellRange::HEADER, palette::WHITE),
        TableCommand::Background(CellRange::new((1, 1), (1, -1)), palette::MINT),
        TableCommand::Background(CellRange::new((2, 1), (2, -1)), palette::ROSE),
        TableCommand::Align(CellRange::new((1, 0), (-1, -1)), Align::Center),
        TableCommand::Grid(CellRange::ALL, 0.5, palette::RULE),
        TableCommand::RowHeight(CellRange::ALL, 20.0),
    ])
}

/// How many evaluated resources satisfy each VRIO criterion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VrioCoverage {
    pub evaluated: usize,
    pub valuable: usize,
    pub rare: usize,
    pub inimitable: usize,
    pub organized: usize,
}

impl VrioCoverage {
    pub fn ratio(&self, met: usize) -> f64 {
        if self.evaluated == 0 {
            0.0
        } else {
            met as f64 / self.evaluated as f64
        }
    }
}

pub fn vrio_coverage_table(coverage: &VrioCoverage) -> Table {
    let criteria = [
        ("V", "가치(Valuable)", coverage.valuable),
        ("R", "희소성(Rare)", coverage.rare),
        ("I", "모방난이도(Inimitable)", coverage.inimitable),
        ("O", "조직화(Organized)", coverage.organized),
    ];
    let mut rows = vec![vec!["요소".to_string(), "설명".to_string(), "충족 자원".to_string(), "비율".to_string()]];
    let mut shading = Vec::new();
    for (i, (letter, label, met)) in criteria.iter().enumerate() {
        let ratio = coverage.ratio(*met);
        rows.push(vec![
            letter.to_string(),
            label.to_string(),
            format!("{met}/{}", coverage.evaluated),
            format!("{:.0}%", ratio * 100.0),
        ]);
        let fill = if ratio >= 0.6 { palette::MINT } else { palette::ROSE };
        shading.push(TableCommand::Background(CellRange::cell(3, i as i32 + 1), fill));
    }
    Table::from_text(rows, vec![40.0, 140.0, 80.0, 60.0])
        .with_style([
            TableCommand::FontSize(CellRange::ALL, 9.0),
            TableCommand::Bold(CellRange::HEADER, true),
            TableCommand::Background(CellRange::HEADER, palette::VRIO),
            TableCommand::TextColor(CellRange::HEADER, palette::WHITE),
            TableCommand::Align(CellRange::ALL, Align::Center),
            TableCommand::Grid(CellRange::ALL, 0.5, palette::RULE),
            TableCommand::RowHeight(CellRange::ALL, 22.0),
        ])
        .with_style(shading)
}

/// One SWOT quadrant as shown in the 2×2 matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct SwotQuadrant {
    pub title: &'static str,
    pub color: Color,
    /// Pre-formatted bullet lines.
    pub lines: Vec<String>,
}

fn quadrant_cell(quadrant: &SwotQuadrant) -> Cell {
    let body = if quadrant.lines.is_empty() {
        "-".to_string()
    } else {
        quadrant.lines.join("\n")
    };
    Cell::Rich(vec![
        Span::bold(quadrant.title).colored(quadrant.color),
        Span::plain(format!("\n\n{body}")),
    ])
}

/// Quadrants in S, W, O, T order.
pub fn swot_matrix_table(quadrants: &[SwotQuadrant; 4]) -> Table {
    let [s, w, o, t] = quadrants;
    let rows = vec![
        vec![Cell::Empty, Cell::from("긍정적 요인"), Cell::from("부정적 요인")],
        vec![Cell::from("내부\n환경"), quadrant_cell(s), quadrant_cell(w)],
        vec![Cell::from("외부\n환경"), quadrant_cell(o), quadrant_cell(t)],
    ];
    Table::new(rows, vec![50.0, 200.0, 200.0])
        .with_row_heights(&[25.0, 120.0, 120.0])
        .with_style([
            TableCommand::Bold(CellRange::HEADER, true),
            TableCommand::Bold(CellRange::column(0), true),
            TableCommand::FontSize(CellRange::new((1, 1), (-1, -1)), 9.0),
            TableCommand::FontSize(CellRange::HEADER, 10.0),
            TableCommand::FontSize(CellRange::column(0), 9.0),
            TableCommand::Background(CellRange::HEADER, palette::LIGHT),
            TableCommand::Background(CellRange::column(0), palette::LIGHT),
            TableCommand::Align(CellRange::HEADER, Align::Center),
            TableCommand::Align(CellRange::column(0), Align::Center),
            TableCommand::VAlign(CellRange::ALL, VAlign::Top),
            TableCommand::Background(CellRange::cell(1, 1), palette::MINT),
            TableCommand::Background(CellRange::cell(2, 1), palette::ROSE),
            TableCommand::Background(CellRange::cell(1, 2), palette::SKY),
            TableCommand::Background(CellRange::cell(2, 2), palette::CREAM),
            TableCommand::Grid(CellRange::ALL, 1.0, palette::BORDER),
            TableCommand::Box(CellRange::ALL, 2.0, palette::PRIMARY),
            TableCommand::Padding(CellRange::new((1, 1), (-1, -1)), Side::Left, 10.0),
            TableCommand::Padding(CellRange::new((1, 1), (-1, -1)), Side::Right, 10.0),
            TableCommand::Padding(CellRange::new((1, 1), (-1, -1)), Side::Top, 10.0),
            TableCommand::Padding(CellRange::new((1, 1), (-1, -1)), Side::Bottom, 10.0),
        ])
}

/// Count and mean impact of one SWOT quadrant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadrantStats {
    pub count: usize,
    pub average_impact: f64,
}

impl QuadrantStats {
    pub fn of(impacts: &[f64]) -> Self {
        let average_impact = if impacts.is_empty() {
            0.0
        } else {
            impacts.iter().sum::<f64>() / impacts.len() as f64
        };
        Self {
            count: impacts.len(),
            average_impact,
        }
    }
}

/// Stats in S, W, O, T order.
pub fn swot_stats_table(stats: &[QuadrantStats; 4]) -> Table {
    const LABELS: [(&str, &str, &str, Color); 4] = [
        ("강점 (S)", "핵심 경쟁력", "보통", palette::MINT),
        ("약점 (W)", "심각", "관리 필요", palette::ROSE),
        ("기회 (O)", "적극 활용", "선별 활용", palette::SKY),
        ("위협 (T)", "즉시 대응", "모니터링", palette::CREAM),
    ];
    let mut rows = vec![vec!["구분".to_string(), "항목 수".to_string(), "평균 영향도".to_string(), "분석 결과".to_string()]];
    let mut shading = Vec::new();
    for (i, ((label, high, low, fill), stat)) in LABELS.iter().zip(stats).enumerate() {
        let verdict = if stat.average_impact >= 4.0 { high } else { low };
        rows.push(vec![
            label.to_string(),
            stat.count.to_string(),
            format!("{:.1}/5", stat.average_impact),
            verdict.to_string(),
        ]);
        shading.push(TableCommand::Background(CellRange::cell(0, i as i32 + 1), *fill));
    }
    Table::from_text(rows, vec![80.0, 70.0, 80.0, 100.0])
        .with_style([
            TableCommand::FontSize(CellRange::ALL, 9.0),
            TableCommand::Bold(CellRange::HEADER, true),
            TableCommand::Background(CellRange::HEADER, palette::SWOT),
            TableCommand::TextColor(CellRange::HEADER, palette::WHITE),
            TableCommand::Align(CellRange::new((1, 0), (-1, -1)), Align::Center),
            TableCommand::Grid(CellRange::ALL, 0.5, palette::RULE),
            TableCommand::RowHeight(CellRange::ALL, 22.0),
        ])
        .with_style(shading)
}
