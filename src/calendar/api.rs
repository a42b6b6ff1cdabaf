use async_trait::async_trait;
use reqwest::{
    Client,
    Url,
};
use tracing::info;

use super::{
    CalendarError,
    CalendarService,
    EventRequest,
    InsertedEvent,
};
use crate::{
    config::CalendarSettings,
    core::http::{
        http_client,
        post_json,
        HttpFailure,
        RetryPolicy,
    },
};

/// Talks to a Google-Calendar-style REST API:
/// `POST {base_url}/calendars/{calendar_id}/events`.
#[derive(Debug, Clone)]
pub struct HttpCalendarClient {
    client: Client,
    events_url: Url,
    token: Option<String>,
}

impl HttpCalendarClient {
    pub fn new(client: Client, settings: &CalendarSettings) -> Result<Self, CalendarError> {
        let events_url = events_url(&settings.base_url, &settings.calendar_id)?;
        Ok(Self { client, events_url, token: settings.token.clone() })
    }

    pub fn from_settings(settings: &CalendarSettings) -> Result<Self, CalendarError> {
        let client = http_client(settings.timeout())
            .map_err(|e| CalendarError::Unavailable(e.to_string()))?;
        Self::new(client, settings)
    }

    pub fn events_url(&self) -> &Url {
        &self.events_url
    }
}

fn events_url(base_url: &str, calendar_id: &str) -> Result<Url, CalendarError> {
    let mut url = Url::parse(base_url.trim_end_matches('/'))
        .map_err(|e| CalendarError::InvalidUrl(format!("{base_url}: {e}")))?;
    url.path_segments_mut()
        .map_err(|_| CalendarError::InvalidUrl(base_url.to_string()))?
        .pop_if_empty()
        .extend(["calendars", calendar_id, "events"]);
    Ok(url)
}

#[async_trait]
impl CalendarService for HttpCalendarClient {
    async fn insert_event(&self, request: &EventRequest) -> Result<InsertedEvent, CalendarError> {
        let resp = post_json(
            || {
                let builder = self.client.post(self.events_url.clone());
                match &self.token {
                    Some(token) => builder.bearer_auth(token),
                    None => builder,
                }
            },
            request,
            // Inserts are not idempotent, a timed-out POST may already exist.
            RetryPolicy::ConnectOnly,
        )
        .await
        .map_err(|failure| match failure {
            HttpFailure::Transport(e) => CalendarError::from(e),
            HttpFailure::Status { status, body } => CalendarError::Status { status, body },
        })?;

        let event: InsertedEvent = resp.json().await?;
        info!(id = %event.id, summary = %request.summary, "calendar event created");
        Ok(event)
    }
}
