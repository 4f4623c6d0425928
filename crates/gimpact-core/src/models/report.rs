use serde::{Deserialize, Serialize};

/// The two documents the service produces from one payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportKind {
    Summary,
    Detail,
}

impl ReportKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ReportKind::Summary => "summary",
            ReportKind::Detail => "detail",
        }
    }

    /// Subtitle printed on the cover page.
    pub fn cover_subtitle(self) -> &'static str {
        match self {
            ReportKind::Summary => "G-IMPACT Analysis Report",
            ReportKind::Detail => "G-IMPACT Detailed Analysis Report",
        }
    }

    /// Download name, e.g. `G임팩트_summary.pdf`.
    pub fn file_name(self, business_name: &str) -> String {
        let stem = business_name.trim();
        let stem = if stem.is_empty() { "report" } else { stem };
        format!("{stem}_{}.pdf", self.as_str())
    }
}

impl std::fmt::Display for ReportKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_names() {
        assert_eq!(ReportKind::Summary.file_name("G임팩트"), "G임팩트_summary.pdf");
        assert_eq!(ReportKind::Detail.file_name("  "), "report_detail.pdf");
    }
}
