use crate::models::PreprocessingConfig;
use crate::processing::{PreprocessedImage, Preprocessor};
use crate::utils::ExtractionError;
use image::{DynamicImage, GrayImage, ImageFormat, Luma};
use imageproc::filter::median_filter;
use log::debug;
use std::path::Path;

/// Turns a photographed card into a binarized image suited for OCR.
pub struct ImageProcessor {
    config: PreprocessingConfig,
}

impl ImageProcessor {
    pub fn new(config: PreprocessingConfig) -> Self {
        ImageProcessor { config }
    }

    pub fn process_image(&self, image_path: &Path) -> Result<GrayImage, ExtractionError> {
        if !image_path.exists() {
            return Err(ExtractionError::ImageProcessingError(format!(
                "Image not found: {}",
                image_path.display()
            )));
        }
        let img = image::open(image_path)
            .map_err(|e| ExtractionError::ImageProcessingError(format!("Failed to open image: {}", e)))?;
        debug!("Loaded {} ({}x{})", image_path.display(), img.width(), img.height());
        Ok(self.preprocess_image(&img))
    }

    pub fn preprocess_image(&self, img: &DynamicImage) -> GrayImage {
        // Convert to grayscale
        let gray = img.to_luma8();

        // Remove speckle noise
        let radius = self.config.median_radius;
        let denoised = if radius > 0 {
            median_filter(&gray, radius, radius)
        } else {
            gray
        };

        Self::adaptive_threshold(&denoised, self.config.block_size, self.config.threshold_bias)
    }

    /// Mean adaptive thresholding over a `block_size` square window.
    /// A pixel turns white when it is brighter than the window mean minus `bias`.
    fn adaptive_threshold(gray: &GrayImage, block_size: u32, bias: i32) -> GrayImage {
        let (width, height) = gray.dimensions();
        let mut result = GrayImage::new(width, height);
        if width == 0 || height == 0 {
            return result;
        }

        // Integral image with a zero row and column in front
        let stride = width as usize + 1;
        let mut integral = vec![0u64; stride * (height as usize + 1)];
        for y in 0..height as usize {
            let mut row_sum = 0u64;
            for x in 0..width as usize {
                row_sum += gray.get_pixel(x as u32, y as u32).0[0] as u64;
                integral[(y + 1) * stride + x + 1] = integral[y * stride + x + 1] + row_sum;
            }
        }

        let half = block_size / 2;
        for y in 0..height {
            let top = y.saturating_sub(half) as usize;
            let bottom = (y + half).min(height - 1) as usize + 1;
            for x in 0..width {
                let left = x.saturating_sub(half) as usize;
                let right = (x + half).min(width - 1) as usize + 1;

                let sum = integral[bottom * stride + right] + integral[top * stride + left]
                    - integral[top * stride + right]
                    - integral[bottom * stride + left];
                let count = ((bottom - top) * (right - left)) as u64;
                let threshold = (sum / count) as i32 - bias;

                let value = gray.get_pixel(x, y).0[0] as i32;
                let output = if value > threshold { 255 } else { 0 };
                result.put_pixel(x, y, Luma([output]));
            }
        }

        result
    }

    pub fn save_to_temp_file(image: &GrayImage) -> Result<PreprocessedImage, ExtractionError> {
        let temp_file = tempfile::Builder::new()
            .prefix("aadhaar-")
            .suffix(".png")
            .tempfile()
            .map_err(|e| ExtractionError::ImageProcessingError(e.to_string()))?;

        image
            .save_with_format(temp_file.path(), ImageFormat::Png)
            .map_err(|e| ExtractionError::ImageProcessingError(format!("Failed to write processed image: {}", e)))?;

        Ok(PreprocessedImage::from_temp_file(temp_file))
    }
}

impl Preprocessor for ImageProcessor {
    fn preprocess(&self, image_path: &Path) -> Result<PreprocessedImage, ExtractionError> {
        let processed = self.process_image(image_path)?;
        Self::save_to_temp_file(&processed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn processor(block_size: u32) -> ImageProcessor {
        ImageProcessor::new(PreprocessingConfig {
            median_radius: 0,
            block_size,
            threshold_bias: 6,
        })
    }

    #[test]
    fn test_dark_stroke_survives_threshold() {
        let mut img = GrayImage::from_pixel(9, 9, Luma([200u8]));
        img.put_pixel(4, 4, Luma([0u8]));

        let out = processor(3).preprocess_image(&DynamicImage::ImageLuma8(img));
        assert_eq!(out.get_pixel(4, 4).0[0], 0);
        assert_eq!(out.get_pixel(3, 4).0[0], 255);
        assert_eq!(out.get_pixel(0, 0).0[0], 255);
    }

    #[test]
    fn test_output_is_binary() {
        let img = GrayImage::from_fn(16, 16, |x, y| Luma([((x * 16 + y) % 256) as u8]));
        let out = processor(5).preprocess_image(&DynamicImage::ImageLuma8(img));
        assert!(out.pixels().all(|p| p.0[0] == 0 || p.0[0] == 255));
    }

    #[test]
    fn test_missing_image_is_processing_error() {
        let result = processor(31).preprocess(Path::new("/nonexistent/card.jpg"));
        assert!(matches!(result, Err(ExtractionError::ImageProcessingError(_))));
    }

    #[test]
    fn test_preprocess_writes_png() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("card.png");
        GrayImage::from_pixel(20, 10, Luma([180u8])).save(&source).unwrap();

        let processed = processor(31).preprocess(&source).unwrap();
        let reloaded = image::open(processed.path()).unwrap();
        assert_eq!((reloaded.width(), reloaded.height()), (20, 10));
    }

    #[test]
    fn test_garbage_file_is_processing_error() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("card.jpg");
        std::fs::write(&source, b"definitely not a jpeg").unwrap();
        assert!(matches!(
            processor(31).preprocess(&source),
            Err(ExtractionError::ImageProcessingError(_))
        ));
    }
}
