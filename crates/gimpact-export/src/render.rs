use std::collections::BTreeMap;

use gimpact_core::data::AnalysisData;
use gimpact_core::models::report::ReportKind;
use gimpact_core::models::request::TransformedData;
use jiff::Timestamp;
use jiff::tz::TimeZone;

use crate::builder::ReportBuilder;
use crate::decorators::ReportTemplate;
use crate::element::{Element, Paragraph};
use crate::error::ExportError;
use crate::fonts::FontLibrary;
use crate::markup::markup_elements;
use crate::pdf::{DocumentInfo, RenderedPdf, render_pdf};
use crate::styles::DocumentStyles;

/// Date printed on the cover and in every footer, in the server's zone.
pub fn report_date(at: Timestamp) -> String {
    at.to_zoned(TimeZone::system())
        .strftime("%Y년 %m월 %d일")
        .to_string()
}

/// The cover page is drawn entirely by the page decorator.
fn cover() -> Vec<Element> {
    vec![Element::Spacer(1.0), Element::PageBreak]
}

fn document_info(company_name: &str, kind: ReportKind, created: Timestamp) -> DocumentInfo {
    let title = match kind {
        ReportKind::Summary => format!("{company_name} 분석 리포트"),
        ReportKind::Detail => format!("{company_name} 상세 분석 리포트"),
    };
    DocumentInfo {
        title,
        author: "G-IMPACT".to_string(),
        created,
    }
}

fn render(
    elements: &[Element],
    company_name: &str,
    kind: ReportKind,
    fonts: &FontLibrary,
    generated_at: Timestamp,
) -> Result<RenderedPdf, ExportError> {
    let mut template = ReportTemplate::new(company_name, report_date(generated_at), kind.cover_subtitle());
    render_pdf(elements, fonts, &mut template, &document_info(company_name, kind, generated_at))
}

/// Footer numbering skips the cover, so the printed number of a section is
/// its physical page minus one.
fn printed_pages(anchors: &BTreeMap<String, usize>) -> BTreeMap<String, usize> {
    anchors
        .iter()
        .map(|(name, page)| (name.clone(), page.saturating_sub(1)))
        .collect()
}

/// Render the summary report.
///
/// The document is laid out twice: the first pass finds the page of every
/// section anchor, the second prints those pages in the table of contents.
pub fn generate_summary_report(
    data: &AnalysisData,
    company_name: &str,
    fonts: &FontLibrary,
    generated_at: Timestamp,
) -> Result<RenderedPdf, ExportError> {
    let summary_elements = |pages: BTreeMap<String, usize>| {
        let mut elements = cover();
        elements.extend(ReportBuilder::new(data, company_name).with_toc_pages(pages).build());
        elements
    };

    let draft = render(
        &summary_elements(BTreeMap::new()),
        company_name,
        ReportKind::Summary,
        fonts,
        generated_at,
    )?;
    let pdf = render(
        &summary_elements(printed_pages(&draft.anchors)),
        company_name,
        ReportKind::Summary,
        fonts,
        generated_at,
    )?;

    tracing::info!(
        company = company_name,
        pages = pdf.page_count,
        bytes = pdf.bytes.len(),
        "summary report generated"
    );
    Ok(pdf)
}

/// The executive summary and every non-blank transformed section, each
/// closed by a page break.
fn narrative_elements(transformed: &TransformedData, styles: &DocumentStyles) -> Vec<Element> {
    let mut elements = Vec::new();
    if let Some(summary) = transformed
        .executive_summary
        .as_deref()
        .filter(|s| !s.trim().is_empty())
    {
        elements.push(Element::Paragraph(Paragraph::new("Executive Summary", styles.h1)));
        elements.extend(markup_elements(summary, styles));
        elements.push(Element::PageBreak);
    }

    for (section_id, content) in transformed.section_contents() {
        if content.trim().is_empty() {
            tracing::debug!(section = section_id, "skipping empty transformed section");
            continue;
        }
        elements.extend(markup_elements(&content, styles));
        elements.push(Element::PageBreak);
    }
    elements
}

/// Render the detail report: the AI-written narrative first, then the
/// step-by-step sections built from the handoff data.
pub fn generate_detail_report(
    data: &AnalysisData,
    transformed: &TransformedData,
    company_name: &str,
    fonts: &FontLibrary,
    generated_at: Timestamp,
) -> Result<RenderedPdf, ExportError> {
    let styles = DocumentStyles::default();
    let mut elements = cover();

    if transformed.is_empty() {
        tracing::debug!(company = company_name, "no narrative supplied, rendering data sections only");
    } else {
        elements.extend(narrative_elements(transformed, &styles));
    }

    let mut builder = ReportBuilder::new(data, company_name);
    builder.build_detailed_sections();
    elements.extend(builder.into_elements());

    let pdf = render(&elements, company_name, ReportKind::Detail, fonts, generated_at)?;
    tracing::info!(
        company = company_name,
        pages = pdf.page_count,
        bytes = pdf.bytes.len(),
        "detail report generated"
    );
    Ok(pdf)
}
