// Fixed-structure patterns for the fields an Aadhaar card prints in a
// predictable shape, plus the keyword-anchored name attempt

use crate::extraction::{NameStage, NameStrategy};
use crate::models::RawText;
use crate::utils::ExtractionError;
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;

lazy_static! {
    // DD/MM/YYYY, no calendar validation
    pub static ref DOB_PATTERN: Regex = Regex::new(
        r"\b([0-9]{2}/[0-9]{2}/[0-9]{4})\b"
    ).unwrap();

    pub static ref GENDER_PATTERN: Regex = Regex::new(
        r"(?i)\b(Male|Female|M|F)\b"
    ).unwrap();

    // Three groups of four digits
    pub static ref AADHAAR_PATTERN: Regex = Regex::new(
        r"\b([0-9]{4} [0-9]{4} [0-9]{4})\b"
    ).unwrap();

    // Longer anchors first so "Name of Holder" never stops at "Name"
    pub static ref NAME_ANCHOR_PATTERN: Regex = Regex::new(
        r"(?i)\b(?:Name of Holder|Holder's Name|Name|To)[:|\s]+([A-Za-z]+(?:\s+[A-Za-z]+)*)"
    ).unwrap();

    // Printed labels that follow the name on the card; the anchored run ends before them
    static ref CARD_LABELS: HashSet<&'static str> = [
        "dob", "yob", "birth", "year", "date", "gender", "sex", "male", "female",
        "address", "father", "mother", "husband", "aadhaar", "vid",
    ]
    .into_iter()
    .collect();

    pub static ref FIELD_PATTERNS: Vec<FieldPattern> = vec![
        FieldPattern {
            field: StructuredField::DateOfBirth,
            pattern: &*DOB_PATTERN,
            normalize: keep_verbatim,
        },
        FieldPattern {
            field: StructuredField::Gender,
            pattern: &*GENDER_PATTERN,
            normalize: title_case,
        },
        FieldPattern {
            field: StructuredField::AadhaarNumber,
            pattern: &*AADHAAR_PATTERN,
            normalize: keep_verbatim,
        },
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StructuredField {
    DateOfBirth,
    Gender,
    AadhaarNumber,
}

/// One row of the structured-field table.
pub struct FieldPattern {
    pub field: StructuredField,
    pub pattern: &'static Regex,
    pub normalize: fn(&str) -> String,
}

impl FieldPattern {
    pub fn apply(&self, text: &str) -> Option<String> {
        self.pattern
            .find(text)
            .map(|matched| (self.normalize)(matched.as_str()))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StructuredFields {
    pub date_of_birth: Option<String>,
    pub gender: Option<String>,
    pub aadhaar_number: Option<String>,
}

fn keep_verbatim(value: &str) -> String {
    value.to_string()
}

/// `male` -> `Male`, `f` -> `F`. Single letters are not expanded.
fn title_case(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

pub struct FieldMatcher;

impl FieldMatcher {
    pub fn extract_field(field: StructuredField, text: &str) -> Option<String> {
        FIELD_PATTERNS
            .iter()
            .find(|row| row.field == field)
            .and_then(|row| row.apply(text))
    }

    pub fn extract_dob_from_text(text: &str) -> Option<String> {
        Self::extract_field(StructuredField::DateOfBirth, text)
    }

    pub fn extract_gender_from_text(text: &str) -> Option<String> {
        Self::extract_field(StructuredField::Gender, text)
    }

    pub fn extract_aadhaar_number_from_text(text: &str) -> Option<String> {
        Self::extract_field(StructuredField::AadhaarNumber, text)
    }

    /// Runs every structured pattern once; each field is independent of the others.
    pub fn extract_structured(text: &RawText) -> StructuredFields {
        let text = text.as_str();
        StructuredFields {
            date_of_birth: Self::extract_dob_from_text(text),
            gender: Self::extract_gender_from_text(text),
            aadhaar_number: Self::extract_aadhaar_number_from_text(text),
        }
    }

    /// Name following a label such as `Name:` or `To`. Only the first anchor
    /// is considered, and the run must hold at least two words.
    pub fn extract_anchored_name(text: &str) -> Option<String> {
        let captures = NAME_ANCHOR_PATTERN.captures(text)?;
        let run = captures.get(1)?.as_str();
        let line = run.split('\n').next().unwrap_or("");
        let words: Vec<&str> = line
            .split_whitespace()
            .take_while(|word| !CARD_LABELS.contains(word.to_lowercase().as_str()))
            .collect();
        if words.len() >= 2 {
            Some(words.join(" "))
        } else {
            None
        }
    }
}

/// First stage of the name cascade.
pub struct KeywordAnchorStrategy;

impl NameStrategy for KeywordAnchorStrategy {
    fn stage(&self) -> NameStage {
        NameStage::KeywordAnchor
    }

    fn extract(&self, text: &RawText) -> Result<Option<String>, ExtractionError> {
        Ok(FieldMatcher::extract_anchored_name(text.as_str()))
    }
}
