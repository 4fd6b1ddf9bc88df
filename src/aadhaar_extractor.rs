use crate::extraction::*;
use crate::ml::{builtin_model, NerModel};
use crate::models::*;
use crate::processing::*;
use crate::utils::ExtractionError;
use log::{debug, info, warn};
use std::path::Path;
use std::sync::Arc;

/// Field extraction over already-recognized text. Owns the name cascade and
/// the learned model, which is loaded once up front and only replaced
/// through `reload_model`.
pub struct TextExtractor {
    config: NerConfig,
    model: Option<Arc<NerModel>>,
    cascade: NameCascade,
}

impl TextExtractor {
    /// Loads the configured model, or trains the bundled one when no path is set.
    pub fn new(config: NerConfig) -> Result<Self, ExtractionError> {
        let model = match (&config.model_path, config.enable_learned) {
            (_, false) => None,
            (Some(path), true) => Some(NerModel::load(path)?),
            (None, true) => {
                info!("No NER model configured, using the built-in model");
                Some(builtin_model()?)
            }
        };
        Ok(Self::with_model(config, model))
    }

    pub fn with_model(config: NerConfig, model: Option<NerModel>) -> Self {
        let model = model.map(Arc::new);
        let cascade = NameCascade::from_config(&config, model.clone());
        TextExtractor { config, model, cascade }
    }

    /// Swaps in a new model and turns the learned stage on. The current
    /// model stays in place if loading fails.
    pub fn reload_model<P: AsRef<Path>>(&mut self, path: P) -> Result<(), ExtractionError> {
        let model = Arc::new(NerModel::load(path.as_ref())?);
        self.config.model_path = Some(path.as_ref().to_path_buf());
        self.config.enable_learned = true;
        self.cascade = NameCascade::from_config(&self.config, Some(model.clone()));
        self.model = Some(model);
        Ok(())
    }

    pub fn model(&self) -> Option<&NerModel> {
        self.model.as_deref()
    }

    pub fn name_stages(&self) -> Vec<NameStage> {
        self.cascade.stages()
    }

    pub fn resolve_name(&self, text: &RawText) -> Option<NameMatch> {
        self.cascade.resolve(text)
    }

    pub fn extract(&self, text: &RawText) -> ExtractionRecord {
        let fields = FieldMatcher::extract_structured(text);
        let name = self.resolve_name(text).map(|found| found.value);

        let record = ExtractionRecord {
            name: name.into(),
            date_of_birth: fields.date_of_birth.into(),
            gender: fields.gender.into(),
            aadhaar_number: fields.aadhaar_number.into(),
        };
        let found = record.fields().iter().filter(|(_, value)| value.is_found()).count();
        debug!("{} of {} fields found", found, record.fields().len());
        record
    }
}

/// Full pipeline: image cleanup, OCR, then field extraction.
pub struct AadhaarExtractor {
    preprocessor: Box<dyn Preprocessor>,
    ocr: Box<dyn OcrEngine>,
    text_extractor: TextExtractor,
}

impl AadhaarExtractor {
    pub fn new(
        preprocessor: Box<dyn Preprocessor>,
        ocr: Box<dyn OcrEngine>,
        text_extractor: TextExtractor,
    ) -> Self {
        AadhaarExtractor { preprocessor, ocr, text_extractor }
    }

    #[cfg(feature = "tesseract")]
    pub fn from_config(config: &ExtractorConfig) -> Result<Self, ExtractionError> {
        config.validate()?;
        Ok(Self::new(
            Box::new(ImageProcessor::new(config.preprocessing.clone())),
            Box::new(TesseractOcr::new(config.ocr.clone())),
            TextExtractor::new(config.ner.clone())?,
        ))
    }

    pub fn text_extractor(&self) -> &TextExtractor {
        &self.text_extractor
    }

    /// Runs the pipeline; any preprocessing or OCR failure becomes `Failed`.
    pub fn extract(&self, image_path: &Path) -> ExtractionOutcome {
        match self.extract_details(image_path) {
            Ok(record) => ExtractionOutcome::Extracted(record),
            Err(e) => {
                warn!("Extraction failed for {}: {}", image_path.display(), e);
                ExtractionOutcome::Failed { reason: e.to_string() }
            }
        }
    }

    pub fn extract_details(&self, image_path: &Path) -> Result<ExtractionRecord, ExtractionError> {
        // Step 1: Clean up the image
        let processed = self.preprocessor.preprocess(image_path)?;

        // Step 2: Recognize text
        let text = self.ocr.recognize(processed.path())?;

        // Step 3: Normalize and extract
        let raw = RawText::new(&text);
        debug!("Normalized text: {}", raw);
        if raw.is_empty() {
            info!("OCR produced no text for {}", image_path.display());
        }
        Ok(self.text_extractor.extract(&raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct PassThrough;

    impl Preprocessor for PassThrough {
        fn preprocess(&self, image_path: &Path) -> Result<PreprocessedImage, ExtractionError> {
            Ok(PreprocessedImage::from_path(image_path))
        }
    }

    struct CannedOcr(&'static str);

    impl OcrEngine for CannedOcr {
        fn recognize(&self, _image_path: &Path) -> Result<String, ExtractionError> {
            Ok(self.0.to_string())
        }
    }

    struct FailingOcr;

    impl OcrEngine for FailingOcr {
        fn recognize(&self, _image_path: &Path) -> Result<String, ExtractionError> {
            Err(ExtractionError::OcrError("engine crashed".to_string()))
        }
    }

    fn text_extractor() -> TextExtractor {
        TextExtractor::with_model(NerConfig::default(), None)
    }

    fn found(value: &str) -> FieldValue {
        FieldValue::Found(value.to_string())
    }

    #[test]
    fn test_full_card_text() {
        let extractor = AadhaarExtractor::new(
            Box::new(PassThrough),
            Box::new(CannedOcr("Name:   Ravi Kumar\n DOB 12/05/1990\n\nMale  1234 5678 9123\n")),
            text_extractor(),
        );
        let outcome = extractor.extract(Path::new("card.jpg"));
        assert_eq!(
            outcome,
            ExtractionOutcome::Extracted(ExtractionRecord {
                name: found("Ravi Kumar"),
                date_of_birth: found("12/05/1990"),
                gender: found("Male"),
                aadhaar_number: found("1234 5678 9123"),
            })
        );
    }

    #[test]
    fn test_long_anchored_name_kept_whole() {
        let record = text_extractor().extract(&RawText::new(
            "Name: Mohan Lal Verma DOB 01/01/1990 Male 1234 5678 9123",
        ));
        assert_eq!(record.name, found("Mohan Lal Verma"));
        assert_eq!(record.date_of_birth, found("01/01/1990"));
    }

    #[test]
    fn test_missing_fields_are_not_found() {
        let record = text_extractor().extract(&RawText::new("12 34 nothing useful"));
        for (_, value) in record.fields() {
            assert_eq!(value.as_str(), "Not Found");
        }
    }

    #[test]
    fn test_single_letter_initial_name() {
        let record = text_extractor().extract(&RawText::new("To J Smith"));
        assert_eq!(record.name, found("J Smith"));
    }

    #[test]
    fn test_unreadable_image_is_error_record() {
        let extractor = AadhaarExtractor::new(
            Box::new(ImageProcessor::new(PreprocessingConfig::default())),
            Box::new(CannedOcr("Name: Ravi Kumar")),
            text_extractor(),
        );
        let outcome = extractor.extract(Path::new("/nonexistent/card.jpg"));
        assert!(outcome.is_failed());

        let json = serde_json::to_value(&outcome).unwrap();
        let map = json.as_object().unwrap();
        assert_eq!(map.len(), 1);
        assert!(!map["Error"].as_str().unwrap().is_empty());
    }

    #[test]
    fn test_ocr_failure_is_error_record() {
        let extractor = AadhaarExtractor::new(Box::new(PassThrough), Box::new(FailingOcr), text_extractor());
        match extractor.extract(Path::new("card.jpg")) {
            ExtractionOutcome::Failed { reason } => assert!(reason.contains("engine crashed")),
            other => panic!("expected failure, got {:?}", other),
        }
    }

    #[test]
    fn test_learned_stage_uses_loaded_model() {
        let config = NerConfig {
            enable_statistical: false,
            enable_casing: false,
            ..NerConfig::default()
        };
        let extractor = TextExtractor::with_model(config, Some(crate::ml::ner_model::tests::tiny_model()));
        let found_name = extractor.resolve_name(&RawText::new("card holder ravi kumar")).unwrap();
        assert_eq!(found_name.value, "ravi kumar");
        assert_eq!(found_name.stage, NameStage::LearnedNer);
    }

    #[test]
    fn test_default_config_uses_builtin_model() {
        let extractor = TextExtractor::new(NerConfig::default()).unwrap();
        assert!(extractor.model().is_some());

        let found_name = extractor.resolve_name(&RawText::new("card holder ritu sharma")).unwrap();
        assert_eq!(found_name.value, "ritu sharma");
        assert_eq!(found_name.stage, NameStage::LearnedNer);
    }

    #[test]
    fn test_disabled_learned_stage_loads_nothing() {
        let config = NerConfig {
            enable_learned: false,
            ..NerConfig::default()
        };
        let extractor = TextExtractor::new(config).unwrap();
        assert!(extractor.model().is_none());
        assert!(!extractor.name_stages().contains(&NameStage::LearnedNer));
    }

    #[test]
    fn test_reload_enables_learned_stage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ner.json");
        crate::ml::ner_model::tests::tiny_model().save(&path).unwrap();

        let config = NerConfig {
            enable_learned: false,
            ..NerConfig::default()
        };
        let mut extractor = TextExtractor::with_model(config, None);
        extractor.reload_model(&path).unwrap();
        assert!(extractor.name_stages().contains(&NameStage::LearnedNer));

        let found_name = extractor.resolve_name(&RawText::new("card holder ravi kumar")).unwrap();
        assert_eq!(found_name.stage, NameStage::LearnedNer);
    }

    #[test]
    fn test_reload_model() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ner.json");
        crate::ml::ner_model::tests::tiny_model().save(&path).unwrap();

        let mut extractor = text_extractor();
        assert!(extractor.model().is_none());
        extractor.reload_model(&path).unwrap();
        assert!(extractor.model().is_some());

        assert!(extractor.reload_model(dir.path().join("missing.json")).is_err());
        assert!(extractor.model().is_some());
    }

    #[test]
    fn test_missing_model_path_fails_construction() {
        let config = NerConfig {
            model_path: Some("/nonexistent/ner.json".into()),
            ..NerConfig::default()
        };
        assert!(matches!(TextExtractor::new(config), Err(ExtractionError::ModelError(_))));
    }
}
