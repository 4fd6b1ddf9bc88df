// Configuration for the extraction pipeline, loadable from a JSON file

use crate::utils::ExtractionError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// OCR engine settings.
    pub ocr: OcrConfig,

    /// Image cleanup before OCR.
    pub preprocessing: PreprocessingConfig,

    /// Name-extraction strategies and model artifacts.
    pub ner: NerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Tesseract language code.
    pub language: String,

    /// Tesseract page segmentation mode (0-13).
    pub page_seg_mode: u8,

    /// Keep runs of spaces between words in the recognized text.
    pub preserve_interword_spaces: bool,

    /// Directory holding the traineddata files; tesseract's default when unset.
    pub tessdata_dir: Option<PathBuf>,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            language: "eng".to_string(),
            // Single column of text of variable sizes
            page_seg_mode: 4,
            preserve_interword_spaces: true,
            tessdata_dir: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PreprocessingConfig {
    /// Median filter radius used for denoising. Zero disables the filter.
    pub median_radius: u32,

    /// Side of the square window used by the adaptive threshold. Must be odd.
    pub block_size: u32,

    /// Constant subtracted from the window mean before thresholding.
    pub threshold_bias: i32,
}

impl Default for PreprocessingConfig {
    fn default() -> Self {
        Self {
            median_radius: 1,
            block_size: 31,
            threshold_bias: 6,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NerConfig {
    /// Learned NER model artifact. The built-in model is trained when unset.
    pub model_path: Option<PathBuf>,

    pub enable_statistical: bool,

    pub enable_learned: bool,

    pub enable_casing: bool,
}

impl Default for NerConfig {
    fn default() -> Self {
        Self {
            model_path: None,
            enable_statistical: true,
            enable_learned: true,
            enable_casing: true,
        }
    }
}

impl ExtractorConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ExtractionError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            ExtractionError::ConfigError(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let config: ExtractorConfig = serde_json::from_str(&contents).map_err(|e| {
            ExtractionError::ConfigError(format!("Failed to parse {}: {}", path.display(), e))
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ExtractionError> {
        if self.ocr.page_seg_mode > 13 {
            return Err(ExtractionError::ConfigError(format!(
                "page_seg_mode must be between 0 and 13, got {}",
                self.ocr.page_seg_mode
            )));
        }
        if self.ocr.language.trim().is_empty() {
            return Err(ExtractionError::ConfigError(
                "OCR language must not be empty".to_string(),
            ));
        }
        let block = self.preprocessing.block_size;
        if block < 3 || block % 2 == 0 {
            return Err(ExtractionError::ConfigError(format!(
                "block_size must be odd and at least 3, got {}",
                block
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_are_valid() {
        let config = ExtractorConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.ocr.language, "eng");
        assert_eq!(config.ocr.page_seg_mode, 4);
        assert_eq!(config.preprocessing.block_size, 31);
        assert!(config.ner.model_path.is_none());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"preprocessing": {{"block_size": 15}}, "ner": {{"enable_learned": false}}}}"#).unwrap();

        let config = ExtractorConfig::from_file(file.path()).unwrap();
        assert_eq!(config.preprocessing.block_size, 15);
        assert_eq!(config.preprocessing.threshold_bias, 6);
        assert!(!config.ner.enable_learned);
        assert!(config.ner.enable_statistical);
    }

    #[test]
    fn test_even_block_size_rejected() {
        let mut config = ExtractorConfig::default();
        config.preprocessing.block_size = 30;
        assert!(matches!(config.validate(), Err(ExtractionError::ConfigError(_))));
    }

    #[test]
    fn test_unparseable_file_is_config_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert!(matches!(
            ExtractorConfig::from_file(file.path()),
            Err(ExtractionError::ConfigError(_))
        ));
    }
}
