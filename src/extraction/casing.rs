use crate::extraction::{NameStage, NameStrategy};
use crate::models::RawText;
use crate::utils::ExtractionError;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref TITLE_CASE_RUN: Regex = Regex::new(r"[A-Z][a-z]+(?:\s+[A-Z][a-z]+)+").unwrap();
}

/// Last resort: the longest run of two or more title-cased words.
pub struct HeuristicCasingStrategy;

impl HeuristicCasingStrategy {
    pub fn longest_title_case_run(text: &str) -> Option<String> {
        let mut best: Option<&str> = None;
        for run in TITLE_CASE_RUN.find_iter(text).map(|m| m.as_str()) {
            // Strictly longer, so ties keep the earlier run
            if best.map_or(true, |current| run.len() > current.len()) {
                best = Some(run);
            }
        }
        best.map(str::to_string)
    }
}

impl NameStrategy for HeuristicCasingStrategy {
    fn stage(&self) -> NameStage {
        NameStage::HeuristicCasing
    }

    fn extract(&self, text: &RawText) -> Result<Option<String>, ExtractionError> {
        Ok(Self::longest_title_case_run(text.as_str()))
    }
}
