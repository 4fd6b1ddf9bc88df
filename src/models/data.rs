use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use std::fmt;

pub const NOT_FOUND: &str = "Not Found";

/// Normalized OCR output: whitespace runs collapsed to single spaces, trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawText(String);

impl RawText {
    pub fn new(text: &str) -> Self {
        RawText(text.split_whitespace().collect::<Vec<_>>().join(" "))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<str> for RawText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RawText {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Found(String),
    NotFound,
}

impl FieldValue {
    pub fn as_str(&self) -> &str {
        match self {
            FieldValue::Found(value) => value,
            FieldValue::NotFound => NOT_FOUND,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, FieldValue::Found(_))
    }
}

impl From<Option<String>> for FieldValue {
    fn from(value: Option<String>) -> Self {
        match value {
            Some(value) => FieldValue::Found(value),
            None => FieldValue::NotFound,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractionRecord {
    #[serde(rename = "Name")]
    pub name: FieldValue,
    #[serde(rename = "DOB")]
    pub date_of_birth: FieldValue,
    #[serde(rename = "Gender")]
    pub gender: FieldValue,
    #[serde(rename = "Aadhaar Number")]
    pub aadhaar_number: FieldValue,
}

impl ExtractionRecord {
    /// Key/value pairs in output order.
    pub fn fields(&self) -> [(&'static str, &FieldValue); 4] {
        [
            ("Name", &self.name),
            ("DOB", &self.date_of_birth),
            ("Gender", &self.gender),
            ("Aadhaar Number", &self.aadhaar_number),
        ]
    }
}

/// Result of running the pipeline over one document.
///
/// Serializes either as the four-key record or as a single `Error` key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractionOutcome {
    Extracted(ExtractionRecord),
    Failed { reason: String },
}

impl ExtractionOutcome {
    pub fn record(&self) -> Option<&ExtractionRecord> {
        match self {
            ExtractionOutcome::Extracted(record) => Some(record),
            ExtractionOutcome::Failed { .. } => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, ExtractionOutcome::Failed { .. })
    }

    /// Flat key/value view, the shape callers print.
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        match self {
            ExtractionOutcome::Extracted(record) => record
                .fields()
                .iter()
                .map(|(key, value)| (*key, value.to_string()))
                .collect(),
            ExtractionOutcome::Failed { reason } => vec![("Error", reason.clone())],
        }
    }
}

impl Serialize for ExtractionOutcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ExtractionOutcome::Extracted(record) => record.serialize(serializer),
            ExtractionOutcome::Failed { reason } => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("Error", reason)?;
                map.end()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_text_collapses_whitespace() {
        let text = RawText::new("  Name:\n\tRavi   Kumar \r\n");
        assert_eq!(text.as_str(), "Name: Ravi Kumar");
    }

    #[test]
    fn test_missing_field_renders_sentinel() {
        let value: FieldValue = None.into();
        assert_eq!(value.to_string(), "Not Found");
        assert!(!value.is_found());
    }

    #[test]
    fn test_record_serializes_in_field_order() {
        let outcome = ExtractionOutcome::Extracted(ExtractionRecord {
            name: FieldValue::Found("Ravi Kumar".to_string()),
            date_of_birth: FieldValue::Found("12/05/1990".to_string()),
            gender: FieldValue::NotFound,
            aadhaar_number: FieldValue::Found("1234 5678 9123".to_string()),
        });
        let json = serde_json::to_string(&outcome).unwrap();
        assert_eq!(
            json,
            r#"{"Name":"Ravi Kumar","DOB":"12/05/1990","Gender":"Not Found","Aadhaar Number":"1234 5678 9123"}"#
        );
    }

    #[test]
    fn test_failed_outcome_has_only_error_key() {
        let outcome = ExtractionOutcome::Failed {
            reason: "Image processing error: missing".to_string(),
        };
        let value = serde_json::to_value(&outcome).unwrap();
        let map = value.as_object().unwrap();
        assert_eq!(map.len(), 1);
        assert!(map.contains_key("Error"));
        assert_eq!(outcome.entries().len(), 1);
        assert!(outcome.record().is_none());
    }
}
