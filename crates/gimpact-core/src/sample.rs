//! Bundled sample analysis, a full run of steps 2.1 through 3.4 for one
//! company. Used by tests across the workspace.

use crate::data::AnalysisData;
use crate::error::CoreError;

pub const SAMPLE_COMPANY: &str = "G임팩트";

const SAMPLE_JSON: &str = include_str!("../data/sample.json");

pub fn sample_json() -> &'static str {
    SAMPLE_JSON
}

pub fn sample_data() -> Result<AnalysisData, CoreError> {
    AnalysisData::from_json(SAMPLE_JSON)
}

#[cfg(test)]
mod tests {
    use crate::data::step;

    use super::*;

    #[test]
    fn sample_has_every_step() {
        let data = sample_data().unwrap();
        for key in step::ALL {
            assert!(data.has_section(key), "sample is missing {key}");
        }
    }

    #[test]
    fn sample_scores_are_numeric() {
        let data = sample_data().unwrap();
        let scores = data.section(step::DIAGNOSIS).get("scores_summary").entries();
        assert!(!scores.is_empty());
        for (area, info) in scores {
            let score = info.f64("score");
            assert!((0.0..=5.0).contains(&score), "{area} has score {score}");
        }
    }
}
