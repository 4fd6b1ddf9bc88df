use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Image processing error: {0}")]
    ImageProcessingError(String),
    #[error("OCR error: {0}")]
    OcrError(String),
    #[error("Model error: {0}")]
    ModelError(String),
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Training error: {0}")]
    TrainingError(String),
}
