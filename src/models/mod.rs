pub mod config;
pub mod data;

pub use config::{ExtractorConfig, NerConfig, OcrConfig, PreprocessingConfig};
pub use data::{ExtractionOutcome, ExtractionRecord, FieldValue, RawText, NOT_FOUND};
