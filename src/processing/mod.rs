pub mod image;
#[cfg(feature = "tesseract")]
pub mod ocr;

pub use self::image::ImageProcessor;
#[cfg(feature = "tesseract")]
pub use ocr::TesseractOcr;

use crate::utils::ExtractionError;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Image cleaned up for OCR. Owns its temporary file, if any, so the file
/// lives exactly as long as the OCR step needs it.
pub struct PreprocessedImage {
    path: PathBuf,
    _temp_file: Option<NamedTempFile>,
}

impl PreprocessedImage {
    pub fn from_temp_file(temp_file: NamedTempFile) -> Self {
        PreprocessedImage {
            path: temp_file.path().to_path_buf(),
            _temp_file: Some(temp_file),
        }
    }

    pub fn from_path<P: Into<PathBuf>>(path: P) -> Self {
        PreprocessedImage {
            path: path.into(),
            _temp_file: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

pub trait Preprocessor {
    fn preprocess(&self, image_path: &Path) -> Result<PreprocessedImage, ExtractionError>;
}

pub trait OcrEngine {
    fn recognize(&self, image_path: &Path) -> Result<String, ExtractionError>;
}
