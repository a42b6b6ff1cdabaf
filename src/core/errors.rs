use thiserror::Error;

use crate::{
    calendar::CalendarError,
    datetime::ExtractError,
    grid::{
        GeometryError,
        GridError,
    },
    ocr::OcrError,
};

#[derive(Error, Debug)]
pub enum KoyomiError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HJson error: {0}")]
    HJson(#[from] serde_hjson::Error),

    #[error("Grid configuration error: {0}")]
    Grid(#[from] GridError),

    #[error("Geometry error: {0}")]
    Geometry(#[from] GeometryError),

    #[error("Date extraction error: {0}")]
    Extract(#[from] ExtractError),

    #[error("OCR error: {0}")]
    Ocr(#[from] OcrError),

    #[error("Calendar error: {0}")]
    Calendar(#[from] CalendarError),

    #[error("no text recognized in image")]
    NoText,

    #[error("Failed to load config file: {0}")]
    FailedToLoadConfig(String),

    #[error("KoyomiError: {0}")]
    Custom(String),
}
