use std::io::Cursor;

use async_trait::async_trait;
use image::ImageReader;
use thiserror::Error;

use crate::core::models::{
    ImageSize,
    OcrResult,
};

pub mod api;

pub use api::VisionClient;

#[derive(Debug, Error)]
pub enum OcrError {
    #[error("OCR request failed: {0}")]
    Transport(Box<reqwest::Error>),

    #[error("OCR service answered {status}: {body}")]
    Status { status: u16, body: String },

    #[error("unexpected OCR response: {0}")]
    Decode(String),

    #[error("could not read image dimensions: {0}")]
    ImageSize(String),

    #[error("OCR service unavailable: {0}")]
    Unavailable(String),
}

impl From<reqwest::Error> for OcrError {
    fn from(error: reqwest::Error) -> Self {
        OcrError::Transport(Box::new(error))
    }
}

/// Turns an image into positioned text. Injected into the import pipeline.
#[async_trait]
pub trait TextRecognizer: Send + Sync {
    async fn recognize(&self, image: &[u8]) -> Result<OcrResult, OcrError>;
}

/// Reads width and height from the image header without decoding pixels.
pub fn image_size(bytes: &[u8]) -> Result<ImageSize, OcrError> {
    let (width, height) = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| OcrError::ImageSize(e.to_string()))?
        .into_dimensions()
        .map_err(|e| OcrError::ImageSize(e.to_string()))?;
    Ok(ImageSize::new(width, height))
}

#[cfg(test)]
mod tests {
    use image::{
        ImageFormat,
        RgbImage,
    };

    use super::*;

    #[test]
    fn reads_png_dimensions() {
        let mut bytes = Vec::new();
        RgbImage::new(37, 21)
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        assert_eq!(image_size(&bytes).unwrap(), ImageSize::new(37, 21));
    }

    #[test]
    fn garbage_is_an_image_size_error() {
        assert!(matches!(image_size(b"definitely not an image"), Err(OcrError::ImageSize(_))));
        assert!(matches!(image_size(&[]), Err(OcrError::ImageSize(_))));
    }
}
