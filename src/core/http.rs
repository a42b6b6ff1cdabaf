use std::time::Duration;

use reqwest::{
    header::USER_AGENT,
    Client,
    RequestBuilder,
    Response,
};
use serde::Serialize;
use tracing::warn;

use crate::core::KoyomiError;

const MAX_ATTEMPTS: usize = 3;

#[derive(Debug)]
pub enum HttpFailure {
    Transport(reqwest::Error),
    Status { status: u16, body: String },
}

/// Which transport failures `post_json` may send again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryPolicy {
    /// Any transport failure. Only for idempotent calls.
    Transport,
    /// Only failures to connect, where the body never left this process.
    ConnectOnly,
}

impl RetryPolicy {
    fn allows(self, error: &reqwest::Error) -> bool {
        match self {
            RetryPolicy::Transport => true,
            RetryPolicy::ConnectOnly => error.is_connect(),
        }
    }
}

pub fn http_client(timeout: Duration) -> Result<Client, KoyomiError> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| KoyomiError::Custom(format!("HTTP client build failed: {e}")))
}

/// POSTs `body` as JSON. Transport errors allowed by `retry` are retried with
/// a linear backoff, an error status is returned straight away.
pub async fn post_json<T: Serialize + ?Sized>(
    request: impl Fn() -> RequestBuilder,
    body: &T,
    retry: RetryPolicy,
) -> Result<Response, HttpFailure> {
    let mut attempts: usize = 0;
    loop {
        attempts += 1;

        let resp = request()
            .header(USER_AGENT, concat!("koyomi/", env!("CARGO_PKG_VERSION"), " (+reqwest)"))
            .json(body)
            .send()
            .await;

        let resp = match resp {
            Ok(r) => r,
            Err(e) => {
                if attempts < MAX_ATTEMPTS && retry.allows(&e) {
                    warn!(attempt = attempts, error = %e, "HTTP request failed, retrying");
                    tokio::time::sleep(Duration::from_secs(2 * attempts as u64)).await;
                    continue;
                }
                return Err(HttpFailure::Transport(e));
            }
        };

        return ensure_success(resp).await;
    }
}

async fn ensure_success(resp: Response) -> Result<Response, HttpFailure> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(HttpFailure::Status { status: status.as_u16(), body });
    }
    Ok(resp)
}
