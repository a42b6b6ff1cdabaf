use chrono::NaiveDateTime;
use serde::{
    Deserialize,
    Serialize,
};

use crate::grid::GridError;

pub const TIME_ZONE: &str = "Asia/Tokyo";

/// Normalized rectangle, origin at the top-left of the image.
///
/// Serialized as `[x_min, y_min, x_max, y_max]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "[f64; 4]", into = "[f64; 4]")]
pub struct Rectangle {
    pub x_min: f64,
    pub y_min: f64,
    pub x_max: f64,
    pub y_max: f64,
}

impl Rectangle {
    pub fn new(x_min: f64, y_min: f64, x_max: f64, y_max: f64) -> Result<Self, GridError> {
        let bounds = [x_min, y_min, x_max, y_max];
        if bounds.iter().any(|v| !v.is_finite() || *v < 0.0 || *v > 1.0) {
            return Err(GridError::OutOfBounds { bounds });
        }
        if x_min >= x_max || y_min >= y_max {
            return Err(GridError::Inverted { bounds });
        }
        Ok(Self { x_min, y_min, x_max, y_max })
    }

    /// Inclusive on all four edges, so corners and shared borders count.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        self.x_min <= x && x <= self.x_max && self.y_min <= y && y <= self.y_max
    }

    pub fn as_array(&self) -> [f64; 4] {
        [self.x_min, self.y_min, self.x_max, self.y_max]
    }
}

impl TryFrom<[f64; 4]> for Rectangle {
    type Error = GridError;

    fn try_from(bounds: [f64; 4]) -> Result<Self, Self::Error> {
        Rectangle::new(bounds[0], bounds[1], bounds[2], bounds[3])
    }
}

impl From<Rectangle> for [f64; 4] {
    fn from(rect: Rectangle) -> Self {
        rect.as_array()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellDescriptor {
    #[serde(rename = "day")]
    pub default_day: String,
    #[serde(rename = "box")]
    pub bounds: Rectangle,
}

impl CellDescriptor {
    pub fn new(default_day: impl Into<String>, bounds: Rectangle) -> Self {
        Self { default_day: default_day.into(), bounds }
    }
}

/// A polygon vertex in pixel space. OCR engines omit coordinates that are
/// zero or unknown, so each axis is optional.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vertex {
    #[serde(default)]
    pub x: Option<f64>,
    #[serde(default)]
    pub y: Option<f64>,
}

impl Vertex {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x: Some(x), y: Some(y) }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextFragment {
    pub text: String,
    #[serde(default)]
    pub polygon: Vec<Vertex>,
}

impl TextFragment {
    pub fn new(text: impl Into<String>, polygon: Vec<Vertex>) -> Self {
        Self { text: text.into(), polygon }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageSize {
    pub width: u32,
    pub height: u32,
}

impl ImageSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// What the OCR collaborator hands back for one image. The first fragment is
/// the full recognized text block, the rest are individual spans.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OcrResult {
    pub image_size: ImageSize,
    pub fragments: Vec<TextFragment>,
}

impl OcrResult {
    pub fn full_text(&self) -> &str {
        self.fragments.first().map(|f| f.text.as_str()).unwrap_or("")
    }

    pub fn spans(&self) -> &[TextFragment] {
        self.fragments.get(1..).unwrap_or(&[])
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PopulatedCell {
    pub day: String,
    #[serde(rename = "box")]
    pub bounds: Rectangle,
    pub month: Option<u32>,
    pub schedule: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventCandidate {
    pub summary: String,
    #[serde(with = "local_datetime")]
    pub start: NaiveDateTime,
    #[serde(with = "local_datetime")]
    pub end: NaiveDateTime,
    pub time_zone: String,
}

impl EventCandidate {
    pub fn new(summary: impl Into<String>, start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self { summary: summary.into(), start, end, time_zone: TIME_ZONE.to_string() }
    }
}

pub(crate) mod local_datetime {
    use chrono::NaiveDateTime;
    use serde::{
        Deserialize,
        Deserializer,
        Serializer,
    };

    pub const FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

    pub fn serialize<S: Serializer>(value: &NaiveDateTime, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&value.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(d)?;
        NaiveDateTime::parse_from_str(&raw, FORMAT).map_err(serde::de::Error::custom)
    }
}
