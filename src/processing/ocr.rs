use crate::models::OcrConfig;
use crate::processing::OcrEngine;
use crate::utils::ExtractionError;
use log::debug;
use std::path::Path;
use tesseract::{PageSegMode, Tesseract};

/// OCR backed by the system tesseract library.
pub struct TesseractOcr {
    config: OcrConfig,
}

impl TesseractOcr {
    pub fn new(config: OcrConfig) -> Self {
        TesseractOcr { config }
    }

    fn page_seg_mode(mode: u8) -> PageSegMode {
        match mode {
            0 => PageSegMode::PsmOsdOnly,
            1 => PageSegMode::PsmAutoOsd,
            2 => PageSegMode::PsmAutoOnly,
            3 => PageSegMode::PsmAuto,
            4 => PageSegMode::PsmSingleColumn,
            5 => PageSegMode::PsmSingleBlockVertText,
            6 => PageSegMode::PsmSingleBlock,
            7 => PageSegMode::PsmSingleLine,
            8 => PageSegMode::PsmSingleWord,
            9 => PageSegMode::PsmCircleWord,
            10 => PageSegMode::PsmSingleChar,
            11 => PageSegMode::PsmSparseText,
            12 => PageSegMode::PsmSparseTextOsd,
            _ => PageSegMode::PsmRawLine,
        }
    }
}

impl OcrEngine for TesseractOcr {
    fn recognize(&self, image_path: &Path) -> Result<String, ExtractionError> {
        let path_str = image_path
            .to_str()
            .ok_or_else(|| ExtractionError::OcrError("Could not convert path to string".to_string()))?;
        let datapath = self
            .config
            .tessdata_dir
            .as_ref()
            .map(|dir| dir.to_string_lossy().into_owned());

        let mut tess = Tesseract::new(datapath.as_deref(), Some(&self.config.language))
            .map_err(|e| ExtractionError::OcrError(format!("Failed to initialize Tesseract: {}", e)))?;

        // Set page seg mode separately as it modifies in-place
        tess.set_page_seg_mode(Self::page_seg_mode(self.config.page_seg_mode));

        if self.config.preserve_interword_spaces {
            tess = tess
                .set_variable("preserve_interword_spaces", "1")
                .map_err(|e| ExtractionError::OcrError(format!("Failed to set Tesseract variable: {}", e)))?;
        }

        tess = tess
            .set_image(path_str)
            .map_err(|e| ExtractionError::OcrError(format!("Failed to set image: {}", e)))?;

        let text = tess
            .get_text()
            .map_err(|e| ExtractionError::OcrError(format!("Failed to extract text: {}", e)))?;

        debug!("OCR result:\n{}", text);
        Ok(text)
    }
}
