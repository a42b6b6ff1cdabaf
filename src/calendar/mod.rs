use async_trait::async_trait;
use serde::{
    Deserialize,
    Serialize,
};
use thiserror::Error;

pub mod api;
pub mod request;

pub use api::HttpCalendarClient;
pub use request::{
    CellBatch,
    CellRequest,
    ErrorReason,
    ErroredItem,
    EventRequest,
    EventRequestBuilder,
    EventTime,
    SkipReason,
    SkippedItem,
};

#[derive(Debug, Error)]
pub enum CalendarError {
    #[error("calendar request failed: {0}")]
    Transport(Box<reqwest::Error>),

    #[error("calendar service answered {status}: {body}")]
    Status { status: u16, body: String },

    #[error("invalid calendar endpoint `{0}`")]
    InvalidUrl(String),

    #[error("calendar service unavailable: {0}")]
    Unavailable(String),
}

impl From<reqwest::Error> for CalendarError {
    fn from(error: reqwest::Error) -> Self {
        CalendarError::Transport(Box::new(error))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertedEvent {
    pub id: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub html_link: Option<String>,
}

/// Whatever persists calendar events. Injected into the import pipeline.
#[async_trait]
pub trait CalendarService: Send + Sync {
    async fn insert_event(&self, request: &EventRequest) -> Result<InsertedEvent, CalendarError>;
}
