use crate::element::{Element, Paragraph, Rule, Span};
use crate::styles::DocumentStyles;

/// Convert narrative text written in a small Markdown subset into flowables.
///
/// - `# Heading` → h1, `## Heading` → h2, `### Heading` → h3
/// - `- item` or `* item` → bullet
/// - `**bold**` → bold span
/// - `---` or `***` → horizontal rule
/// - blank lines are dropped, everything else is a body paragraph
pub fn markup_elements(text: &str, styles: &DocumentStyles) -> Vec<Element> {
    let mut elements = Vec::new();

    for line in text.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        if let Some(heading) = trimmed.strip_prefix("### ") {
            elements.push(Element::Paragraph(Paragraph::new(strip_bold(heading), styles.h3)));
        } else if let Some(heading) = trimmed.strip_prefix("## ") {
            elements.push(Element::Paragraph(Paragraph::new(strip_bold(heading), styles.h2)));
        } else if let Some(heading) = trimmed.strip_prefix("# ") {
            elements.push(Element::Paragraph(Paragraph::new(strip_bold(heading), styles.h1)));
        } else if trimmed == "---" || trimmed == "***" {
            elements.push(Element::Rule(Rule::default()));
        } else if let Some(item) = trimmed.strip_prefix("- ").or_else(|| trimmed.strip_prefix("* ")) {
            let mut spans = vec![Span::plain("\u{2022} ")];
            spans.extend(parse_inline(item));
            elements.push(Element::Paragraph(Paragraph::rich(spans, styles.bullet)));
        } else {
            elements.push(Element::Paragraph(Paragraph::rich(parse_inline(trimmed), styles.body)));
        }
    }

    elements
}

fn strip_bold(text: &str) -> String {
    text.replace("**", "")
}

/// Split `**bold**` segments out of a line. An unmatched `**` leaves the
/// rest of the line as plain text.
pub fn parse_inline(text: &str) -> Vec<Span> {
    let mut spans = Vec::new();
    let mut remaining = text;

    while let Some(start) = remaining.find("**") {
        let before = &remaining[..start];
        let after_start = &remaining[start + 2..];
        let Some(end) = after_start.find("**") else {
            break;
        };
        if !before.is_empty() {
            spans.push(Span::plain(before));
        }
        let bold = &after_start[..end];
        if !bold.is_empty() {
            spans.push(Span::bold(bold));
        }
        remaining = &after_start[end + 2..];
    }

    if !remaining.is_empty() {
        spans.push(Span::plain(remaining));
    }
    spans
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inline_bold_segments() {
        let spans = parse_inline("a **b** c **d**");
        assert_eq!(spans, [Span::plain("a "), Span::bold("b"), Span::plain(" c "), Span::bold("d")]);
    }

    #[test]
    fn unmatched_marker_stays_plain() {
        assert_eq!(parse_inline("x **y"), [Span::plain("x **y")]);
    }

    #[test]
    fn line_kinds() {
        let styles = DocumentStyles::default();
        let elements = markup_elements("## 제목\n\n- 항목 **굵게**\n---\n본문", &styles);
        assert_eq!(elements.len(), 4);

        let heading = elements[0].as_paragraph().map(|p| (p.plain_text(), p.style));
        assert_eq!(heading, Some(("제목".to_string(), styles.h2)));

        let bullet = elements[1].as_paragraph().map(Paragraph::plain_text);
        assert_eq!(bullet.as_deref(), Some("\u{2022} 항목 굵게"));
        assert!(matches!(elements[2], Element::Rule(_)));
        assert_eq!(elements[3].as_paragraph().map(|p| p.style), Some(styles.body));
    }

    #[test]
    fn empty_text_yields_nothing() {
        assert!(markup_elements("\n  \n", &DocumentStyles::default()).is_empty());
    }
}
