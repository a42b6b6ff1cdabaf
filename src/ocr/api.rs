use async_trait::async_trait;
use base64::{
    engine::general_purpose::STANDARD as BASE64_STANDARD,
    Engine,
};
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::{
    debug,
    info,
};

use super::{
    image_size,
    OcrError,
    TextRecognizer,
};
use crate::{
    config::OcrSettings,
    core::{
        http::{
            http_client,
            post_json,
            HttpFailure,
            RetryPolicy,
        },
        models::{
            OcrResult,
            TextFragment,
            Vertex,
        },
    },
};

const FEATURE: &str = "DOCUMENT_TEXT_DETECTION";

/// Client for a Vision-style `images:annotate` endpoint.
#[derive(Debug, Clone)]
pub struct VisionClient {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
    language_hints: Vec<String>,
}

impl VisionClient {
    pub fn new(client: Client, settings: &OcrSettings) -> Self {
        Self {
            client,
            endpoint: settings.endpoint.clone(),
            api_key: settings.api_key.clone(),
            language_hints: settings.language_hints.clone(),
        }
    }

    pub fn from_settings(settings: &OcrSettings) -> Result<Self, OcrError> {
        let client =
            http_client(settings.timeout()).map_err(|e| OcrError::Unavailable(e.to_string()))?;
        Ok(Self::new(client, settings))
    }

    fn request_body(&self, image: &[u8]) -> serde_json::Value {
        json!({
            "requests": [{
                "image": { "content": BASE64_STANDARD.encode(image) },
                "features": [{ "type": FEATURE }],
                "imageContext": { "languageHints": self.language_hints },
            }]
        })
    }
}

#[async_trait]
impl TextRecognizer for VisionClient {
    async fn recognize(&self, image: &[u8]) -> Result<OcrResult, OcrError> {
        let image_size = image_size(image)?;
        let body = self.request_body(image);

        let resp = post_json(
            || {
                let builder = self.client.post(&self.endpoint);
                match &self.api_key {
                    Some(key) => builder.query(&[("key", key)]),
                    None => builder,
                }
            },
            &body,
            RetryPolicy::Transport,
        )
        .await
        .map_err(|failure| match failure {
            HttpFailure::Transport(e) => OcrError::from(e),
            HttpFailure::Status { status, body } => OcrError::Status { status, body },
        })?;

        let text = resp.text().await?;
        let fragments = parse_annotations(&text)?;
        info!(
            width = image_size.width,
            height = image_size.height,
            fragments = fragments.len(),
            "text recognized"
        );
        Ok(OcrResult { image_size, fragments })
    }
}

#[derive(Debug, Deserialize)]
struct AnnotateResponse {
    #[serde(default)]
    responses: Vec<AnnotateResult>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnnotateResult {
    #[serde(default)]
    text_annotations: Vec<TextAnnotation>,
    error: Option<AnnotateStatus>,
}

#[derive(Debug, Deserialize)]
struct AnnotateStatus {
    #[serde(default)]
    code: i32,
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TextAnnotation {
    #[serde(default)]
    description: String,
    #[serde(default)]
    bounding_poly: BoundingPoly,
}

#[derive(Debug, Default, Deserialize)]
struct BoundingPoly {
    #[serde(default)]
    vertices: Vec<RawVertex>,
}

#[derive(Debug, Deserialize)]
struct RawVertex {
    x: Option<f64>,
    y: Option<f64>,
}

/// Fragments in service order. The service drops zero coordinates from its
/// vertices, so absent values stay `None`.
pub fn parse_annotations(body: &str) -> Result<Vec<TextFragment>, OcrError> {
    let parsed: AnnotateResponse =
        serde_json::from_str(body).map_err(|e| OcrError::Decode(e.to_string()))?;

    let Some(result) = parsed.responses.into_iter().next() else {
        return Err(OcrError::Decode("no responses in body".to_string()));
    };
    if let Some(status) = result.error {
        // gRPC codes are small, anything outside u16 is reported as 0.
        let code = u16::try_from(status.code).unwrap_or(0);
        return Err(OcrError::Status { status: code, body: status.message });
    }
    if result.text_annotations.is_empty() {
        debug!("no text found in image");
    }

    Ok(result
        .text_annotations
        .into_iter()
        .map(|a| {
            let polygon =
                a.bounding_poly.vertices.into_iter().map(|v| Vertex { x: v.x, y: v.y }).collect();
            TextFragment::new(a.description, polygon)
        })
        .collect())
}
