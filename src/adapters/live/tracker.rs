//! Live adapter for the `TaskTracker` port using the Notion REST API.

use std::time::Duration;

use reqwest::{Client, RequestBuilder};
use serde::Deserialize;

use crate::config::Config;
use crate::error::TrackerError;
use crate::ports::tracker::{Task, TaskStatus, TaskTracker, TrackerFuture};
use crate::tracker::schema::{decode_tasks, pending_filter, update_payload};
use crate::tracker::TrackerSchema;

const NOTION_VERSION: &str = "2022-06-28";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Live tracker client that talks to a Notion database.
pub struct LiveTaskTracker {
    client: Client,
    api_url: String,
    token: String,
    database_id: String,
    schema: TrackerSchema,
}

/// Error body returned by the API on non-success responses.
#[derive(Deserialize)]
struct ApiError {
    message: String,
}

impl LiveTaskTracker {
    /// Creates a tracker client from the run configuration.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::Http`] if the HTTP client cannot be built.
    pub fn new(config: &Config) -> Result<Self, TrackerError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| TrackerError::Http(e.to_string()))?;
        Ok(Self {
            client,
            api_url: config.tracker_api_url.clone(),
            token: config.tracker_token.clone(),
            database_id: config.tracker_database_id.clone(),
            schema: config.schema.clone(),
        })
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request.bearer_auth(&self.token).header("Notion-Version", NOTION_VERSION)
    }

    /// Sends a request and returns the body of a successful response.
    async fn send(&self, request: RequestBuilder) -> Result<String, TrackerError> {
        let response = self
            .authorized(request)
            .send()
            .await
            .map_err(|e| TrackerError::Http(e.to_string()))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| TrackerError::Http(e.to_string()))?;
        if !status.is_success() {
            let message =
                serde_json::from_str::<ApiError>(&body).map(|e| e.message).unwrap_or(body);
            return Err(TrackerError::Api { status: status.as_u16(), message });
        }
        Ok(body)
    }
}

impl TaskTracker for LiveTaskTracker {
    fn query_pending(&self) -> TrackerFuture<'_, Vec<Task>> {
        Box::pin(async move {
            let url = format!("{}/databases/{}/query", self.api_url, self.database_id);
            tracing::debug!(%url, "querying pending tasks");
            let body = self.send(self.client.post(&url).json(&pending_filter(&self.schema))).await?;
            Ok(decode_tasks(&body, &self.schema)?)
        })
    }

    fn update_task<'a>(
        &'a self,
        task_id: &'a str,
        acceptance: &'a str,
        status: TaskStatus,
    ) -> TrackerFuture<'a, ()> {
        Box::pin(async move {
            let url = format!("{}/pages/{task_id}", self.api_url);
            tracing::debug!(%url, %status, "updating task");
            let payload = update_payload(&self.schema, acceptance, status);
            self.send(self.client.patch(&url).json(&payload)).await?;
            Ok(())
        })
    }
}
