pub mod aadhaar_extractor;
pub mod extraction;
pub mod ml;
pub mod models;
pub mod processing;
pub mod utils;

pub use aadhaar_extractor::{AadhaarExtractor, TextExtractor};
pub use models::{ExtractionOutcome, ExtractionRecord, ExtractorConfig, FieldValue, RawText};
pub use utils::ExtractionError;
