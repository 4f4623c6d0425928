//! Page decorations drawn beneath each page's content.

use crate::canvas::{Canvas, MM, Paint};
use crate::styles::{Color, palette};

/// Callbacks the assembler invokes when it starts a page.
pub trait PageDecorator {
    /// The cover page.
    fn on_first_page(&mut self, canvas: &mut Canvas<'_, '_>);
    /// Every page after the cover.
    fn on_later_pages(&mut self, canvas: &mut Canvas<'_, '_>);
}

const COVER_BAND: Color = Color::hex(0x1E40AF);
const COVER_STRIPE: Color = Color::hex(0x3B82F6);
const COVER_SUBTITLE: Color = Color::hex(0x93C5FD);
const COVER_DIVIDER: Color = Color::hex(0x60A5FA);
const PANEL_FILL: Color = Color::hex(0xF8FAFC);
const PANEL_BORDER: Color = Color::hex(0xE2E8F0);

/// Cover, header and footer for the analysis reports.
#[derive(Debug, Clone)]
pub struct ReportTemplate {
    company_name: String,
    report_date: String,
    subtitle: String,
    page_num: usize,
}

impl ReportTemplate {
    pub fn new(company_name: impl Into<String>, report_date: impl Into<String>, subtitle: impl Into<String>) -> Self {
        Self {
            company_name: company_name.into(),
            report_date: report_date.into(),
            subtitle: subtitle.into(),
            page_num: 0,
        }
    }

    /// Number printed in the most recent footer.
    pub fn page_num(&self) -> usize {
        self.page_num
    }
}

impl PageDecorator for ReportTemplate {
    fn on_first_page(&mut self, canvas: &mut Canvas<'_, '_>) {
        let (w, h) = (canvas.width(), canvas.height());
        canvas.save_state();

        canvas.set_fill_color(COVER_BAND);
        canvas.rect(0.0, h - 145.0 * MM, w, 145.0 * MM, Paint::Fill);

        canvas.set_stroke_color(COVER_STRIPE);
        canvas.set_line_width(0.5);
        for i in 0..10 {
            let y = h - 30.0 * MM - i as f32 * 12.0 * MM;
            canvas.line(0.0, y, w, y + 30.0 * MM);
        }

        canvas.set_fill_color(palette::ACCENT);
        canvas.rect(0.0, h - 8.0 * MM, w, 8.0 * MM, Paint::Fill);

        canvas.set_fill_color(palette::WHITE);
        canvas.draw_centred_string(w / 2.0, h - 55.0 * MM, "분석 리포트", true, 38.0);
        canvas.set_fill_color(COVER_SUBTITLE);
        canvas.draw_centred_string(w / 2.0, h - 72.0 * MM, &self.subtitle, false, 14.0);

        canvas.set_stroke_color(COVER_DIVIDER);
        canvas.set_line_width(2.0);
        canvas.line(w / 2.0 - 60.0 * MM, h - 85.0 * MM, w / 2.0 + 60.0 * MM, h - 85.0 * MM);

        canvas.set_fill_color(palette::WHITE);
        canvas.round_rect(w / 2.0 - 70.0 * MM, h - 135.0 * MM, 140.0 * MM, 35.0 * MM, 8.0, Paint::Fill);
        canvas.set_fill_color(palette::PRIMARY);
        canvas.draw_centred_string(w / 2.0, h - 122.0 * MM, &self.company_name, true, 30.0);

        canvas.set_fill_color(PANEL_FILL);
        canvas.set_stroke_color(PANEL_BORDER);
        canvas.set_line_width(1.0);
        canvas.round_rect(35.0 * MM, 28.0 * MM, w - 70.0 * MM, 55.0 * MM, 8.0, Paint::FillStroke);

        canvas.set_fill_color(palette::DARK);
        canvas.draw_centred_string(w / 2.0, 72.0 * MM, "리포트 정보", true, 10.0);
        canvas.set_fill_color(palette::MEDIUM);
        canvas.draw_centred_string(w / 2.0, 58.0 * MM, &format!("생성일: {}", self.report_date), false, 10.0);
        canvas.draw_centred_string(w / 2.0, 46.0 * MM, "분석 범위: 2.1 PESTEL ~ 3.4 TOWS", false, 10.0);
        canvas.draw_centred_string(w / 2.0, 34.0 * MM, "버전: 3.0", false, 10.0);

        canvas.set_fill_color(COVER_BAND);
        canvas.rect(0.0, 0.0, w, 12.0 * MM, Paint::Fill);
        canvas.set_fill_color(palette::WHITE);
        canvas.draw_centred_string(w / 2.0, 4.0 * MM, "Powered by G-IMPACT Analysis Engine", false, 8.0);

        canvas.restore_state();
    }

    fn on_later_pages(&mut self, canvas: &mut Canvas<'_, '_>) {
        let (w, h) = (canvas.width(), canvas.height());
        canvas.save_state();

        canvas.set_fill_color(palette::PRIMARY);
        canvas.rect(0.0, h - 18.0 * MM, w, 18.0 * MM, Paint::Fill);
        canvas.set_fill_color(palette::WHITE);
        canvas.draw_string(15.0 * MM, h - 12.0 * MM, &format!("{} 분석 리포트", self.company_name), true, 10.0);
        canvas.draw_right_string(w - 15.0 * MM, h - 12.0 * MM, "G-IMPACT Analysis Report", false, 9.0);

        self.page_num += 1;
        canvas.set_fill_color(palette::MEDIUM);
        canvas.draw_centred_string(w / 2.0, 10.0 * MM, &format!("- {} -", self.page_num), false, 8.0);
        canvas.draw_string(15.0 * MM, 10.0 * MM, &self.report_date, false, 8.0);

        canvas.restore_state();
    }
}
