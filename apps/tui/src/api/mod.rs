//! Runs the core's [`FetchRequest`]s over HTTP with `reqwest`.

use std::time::Duration;

use rider_dash_core::api::Method;
use rider_dash_core::{ApiError, FetchOutcome, FetchRequest, Ticket};
use serde_json::Value;
use tokio::sync::mpsc::UnboundedSender;
use tracing::debug;

/// A finished request on its way back to the UI thread.
pub type Delivery = (Ticket, FetchOutcome);

#[derive(Debug, Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    base: String,
}

impl HttpClient {
    pub fn new(base: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base: base.into(),
        })
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub async fn execute(&self, request: &FetchRequest) -> FetchOutcome {
        let url = request.url(&self.base);
        debug!(%url, post = request.is_post(), "sending request");

        let builder = match &request.method {
            Method::Get => self.client.get(&url),
            Method::Post(Some(body)) => self.client.post(&url).json(body),
            Method::Post(None) => self.client.post(&url),
        };

        let response = match builder.send().await {
            Ok(response) => response,
            Err(e) => return FetchOutcome::Failed(ApiError::Transport(e.to_string())),
        };
        let status = response.status();

        if request.wants_raw_body() {
            let body = response.text().await.unwrap_or_default();
            return FetchOutcome::Status {
                code: status.as_u16(),
                body,
            };
        }

        if !status.is_success() {
            debug!(%url, code = status.as_u16(), "non-success status");
            return FetchOutcome::Failed(ApiError::Status(status.as_u16()));
        }

        match response.json::<Value>().await {
            Ok(value) => FetchOutcome::Json(value),
            Err(e) => FetchOutcome::Failed(ApiError::Decode(e.to_string())),
        }
    }

    /// Runs `request` on its own task and sends the outcome to `tx`.
    pub fn spawn(&self, request: FetchRequest, tx: UnboundedSender<Delivery>) {
        let client = self.clone();
        tokio::spawn(async move {
            let outcome = client.execute(&request).await;
            // The receiver is gone once the UI has quit.
            let _ = tx.send((request.ticket, outcome));
        });
    }
}
