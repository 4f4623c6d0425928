use gimpact_core::data::AnalysisData;
use gimpact_core::models::request::TransformedData;
use gimpact_core::sample::{SAMPLE_COMPANY, sample_data};
use gimpact_export::builder::{ReportBuilder, anchor};
use gimpact_export::element::Element;
use gimpact_export::{FontLibrary, RenderedPdf, generate_detail_report, generate_summary_report};
use jiff::Timestamp;
use serde_json::json;
use std::path::PathBuf;

const CONTENTS_ORDER: [&str; 11] = [
    anchor::ONE_PAGE_SUMMARY,
    anchor::EXECUTIVE_SUMMARY,
    anchor::PESTEL,
    anchor::SCENARIO,
    anchor::COMPETITION,
    anchor::CUSTOMER,
    anchor::MARKET,
    anchor::DIAGNOSIS,
    anchor::VRIO,
    anchor::SWOT,
    anchor::TOWS,
];

fn generated_at() -> Timestamp {
    "2026-03-02T09:00:00Z".parse().unwrap()
}

fn parsed_page_count(pdf: &RenderedPdf) -> usize {
    let document = lopdf::Document::load_mem(&pdf.bytes).expect("generated PDF parses");
    document.get_pages().len()
}

#[test]
fn summary_report_is_a_valid_pdf() {
    let data = sample_data().unwrap();
    let fonts = FontLibrary::standard();
    let pdf = generate_summary_report(&data, SAMPLE_COMPANY, &fonts, generated_at()).unwrap();

    assert!(pdf.bytes.starts_with(b"%PDF"));
    assert!(pdf.page_count > 10, "only {} pages", pdf.page_count);
    assert_eq!(parsed_page_count(&pdf), pdf.page_count);
}

#[test]
fn contents_page_numbers_match_footers() {
    let data = sample_data().unwrap();
    let fonts = FontLibrary::standard();
    let pdf = generate_summary_report(&data, SAMPLE_COMPANY, &fonts, generated_at()).unwrap();

    for name in CONTENTS_ORDER {
        assert!(pdf.anchors.contains_key(name), "anchor {name} not placed");
    }
    // cover, then the contents page
    assert_eq!(pdf.anchors[anchor::ONE_PAGE_SUMMARY], 3);

    let printed = pdf
        .anchors
        .iter()
        .map(|(name, page)| (name.clone(), page - 1))
        .collect();
    let elements = ReportBuilder::new(&data, SAMPLE_COMPANY)
        .with_toc_pages(printed)
        .build();
    let contents = elements.iter().find_map(Element::as_table).unwrap().text_rows();

    for (row, name) in contents.iter().zip(CONTENTS_ORDER) {
        assert_eq!(row[2], (pdf.anchors[name] - 1).to_string(), "contents line for {name}");
    }
}

#[test]
fn sections_appear_in_page_order() {
    let data = sample_data().unwrap();
    let fonts = FontLibrary::standard();
    let pdf = generate_summary_report(&data, SAMPLE_COMPANY, &fonts, generated_at()).unwrap();

    let pages: Vec<usize> = CONTENTS_ORDER.iter().map(|name| pdf.anchors[*name]).collect();
    assert!(pages.windows(2).all(|w| w[0] <= w[1]), "{pages:?}");
}

#[test]
fn empty_data_still_renders() {
    let data = AnalysisData::default();
    let fonts = FontLibrary::standard();

    let summary = generate_summary_report(&data, "기업명", &fonts, generated_at()).unwrap();
    assert!(summary.page_count >= 3);
    assert_eq!(parsed_page_count(&summary), summary.page_count);

    let detail =
        generate_detail_report(&data, &TransformedData::default(), "기업명", &fonts, generated_at()).unwrap();
    assert!(detail.page_count >= 2);
    assert_eq!(parsed_page_count(&detail), detail.page_count);
}

#[test]
fn transformed_narrative_adds_pages() {
    let data = sample_data().unwrap();
    let fonts = FontLibrary::standard();
    let transformed: TransformedData = serde_json::from_value(json!({
        "executiveSummary": "## 핵심 요약\n- **공공 조달** 시장 진입\n- 파트너십 확대",
        "sections": {
            "pestel": {"content": "### 정책 환경\n규제 완화가 기회 요인입니다."},
            "swot": "## SWOT\n강점은 기술력입니다.",
            "blank": "   "
        }
    }))
    .unwrap();

    let plain = generate_detail_report(&data, &TransformedData::default(), SAMPLE_COMPANY, &fonts, generated_at())
        .unwrap();
    let narrated = generate_detail_report(&data, &transformed, SAMPLE_COMPANY, &fonts, generated_at()).unwrap();

    // executive summary and two non-blank sections each end with a page break
    assert_eq!(narrated.page_count, plain.page_count + 3);
    assert_eq!(parsed_page_count(&narrated), narrated.page_count);
}

/// A TrueType regular/bold pair installed on this machine, if any.
fn system_font_pair() -> Option<(PathBuf, Option<PathBuf>)> {
    let candidates = [
        ("/usr/share/fonts/truetype/nanum/NanumGothic.ttf", "/usr/share/fonts/truetype/nanum/NanumGothicBold.ttf"),
        ("/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf", "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf"),
        ("/usr/share/fonts/TTF/DejaVuSans.ttf", "/usr/share/fonts/TTF/DejaVuSans-Bold.ttf"),
        ("/Library/Fonts/Arial Unicode.ttf", ""),
    ];
    candidates.iter().find_map(|(regular, bold)| {
        let regular = PathBuf::from(regular);
        let bold = PathBuf::from(bold);
        regular.is_file().then(|| (regular, bold.is_file().then_some(bold)))
    })
}

#[test]
fn embedded_font_writes_type0_with_to_unicode() {
    let Some((regular, bold)) = system_font_pair() else {
        eprintln!("no TrueType font installed, skipping embedded font check");
        return;
    };
    let fonts = FontLibrary::load(&regular, bold.as_deref()).unwrap();
    assert!(fonts.is_embedded());

    let data = sample_data().unwrap();
    let pdf = generate_summary_report(&data, SAMPLE_COMPANY, &fonts, generated_at()).unwrap();
    let document = lopdf::Document::load_mem(&pdf.bytes).unwrap();
    assert_eq!(document.get_pages().len(), pdf.page_count);

    let type0: Vec<_> = document
        .objects
        .values()
        .filter_map(|object| object.as_dict().ok())
        .filter(|dict| matches!(dict.get(b"Subtype").and_then(|s| s.as_name()), Ok(b"Type0")))
        .collect();
    assert_eq!(type0.len(), 2);
    for font in type0 {
        assert!(font.get(b"ToUnicode").is_ok());
        assert!(matches!(font.get(b"Encoding").and_then(|e| e.as_name()), Ok(b"Identity-H")));
    }
}
