use crate::extraction::{NameStage, NameStrategy};
use crate::ml::NerModel;
use crate::models::RawText;
use crate::utils::ExtractionError;
use lazy_static::lazy_static;
use log::debug;
use regex::Regex;
use std::sync::Arc;

lazy_static! {
    // Initial that survived OCR followed by a surname: "S Kumar"
    static ref INITIAL_NAME: Regex = Regex::new(r"^[A-Za-z]{1,2}\s[A-Za-z]+$").unwrap();
    static ref FULL_NAME: Regex = Regex::new(r"^[A-Za-z]+(?:\s+[A-Za-z]+)+$").unwrap();
}

/// Runs the loaded sequence model; first person span with a name shape wins.
pub struct LearnedNerStrategy {
    model: Option<Arc<NerModel>>,
}

impl LearnedNerStrategy {
    pub fn new(model: Option<Arc<NerModel>>) -> Self {
        Self { model }
    }

    pub fn is_name_shaped(candidate: &str) -> bool {
        INITIAL_NAME.is_match(candidate) || FULL_NAME.is_match(candidate)
    }

    pub fn extract_person(model: &NerModel, text: &str) -> Option<String> {
        model
            .recognize(text)
            .into_iter()
            .filter(|span| span.label == "PERSON")
            .map(|span| span.text.trim().to_string())
            .find(|name| Self::is_name_shaped(name))
    }
}

impl NameStrategy for LearnedNerStrategy {
    fn stage(&self) -> NameStage {
        NameStage::LearnedNer
    }

    fn extract(&self, text: &RawText) -> Result<Option<String>, ExtractionError> {
        match &self.model {
            Some(model) => Ok(Self::extract_person(model, text.as_str())),
            None => {
                debug!("No NER model loaded, skipping learned stage");
                Ok(None)
            }
        }
    }
}
