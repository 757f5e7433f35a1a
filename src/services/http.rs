use async_trait::async_trait;
use futures::{Stream, StreamExt, TryStreamExt};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio_util::codec::FramedRead;
use tokio_util::io::StreamReader;

use super::backend::{StageBackend, StageError};
use super::events::EventStreamCodec;
use crate::kernel::request::{ActionRequest, LearnRequest, ReasonRequest};
use crate::payload::{Activity, ActionPlan, Decision, LearningRecord, Venue, VisualizationUpdate, Weather};

/// JSON-over-HTTP stage backend.
#[derive(Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            // No client-level timeout; the controller applies the configured one per call.
            client: Client::builder().build().unwrap_or_default(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> Result<T, StageError> {
        let response = self
            .client
            .get(format!("{}{}", self.base_url, path))
            .query(query)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(StageError::Status(response.status().as_u16()));
        }

        Ok(response.json().await?)
    }

    async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T, StageError> {
        let response = self
            .client
            .post(format!("{}{}", self.base_url, path))
            .json(body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(StageError::Status(response.status().as_u16()));
        }

        Ok(response.json().await?)
    }

    /// Opens the server-push stream of visualization updates.
    /// Ends when the server closes the connection.
    pub async fn subscribe(&self) -> Result<impl Stream<Item = Result<VisualizationUpdate, StageError>>, StageError> {
        let response = self
            .client
            .get(format!("{}/api/events", self.base_url))
            .header(reqwest::header::ACCEPT, "text/event-stream")
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(StageError::Status(response.status().as_u16()));
        }

        let bytes = response.bytes_stream().map_err(std::io::Error::other);
        let frames = FramedRead::new(StreamReader::new(bytes), EventStreamCodec::new());
        Ok(frames.boxed())
    }
}

#[async_trait]
impl StageBackend for HttpBackend {
    async fn weather(&self, location: &str) -> Result<Weather, StageError> {
        self.get_json("/api/tools/weather", &[("location", location)]).await
    }

    async fn venues(&self, location: &str, preferences: &str) -> Result<Vec<Venue>, StageError> {
        self.get_json(
            "/api/tools/venues",
            &[("location", location), ("preferences", preferences)],
        )
        .await
    }

    async fn itinerary(&self, traveler: &str) -> Result<Vec<Activity>, StageError> {
        self.get_json("/api/tools/itinerary", &[("traveler", traveler)]).await
    }

    async fn reason(&self, request: &ReasonRequest) -> Result<Decision, StageError> {
        self.post_json("/api/agent/reason", request).await
    }

    async fn act(&self, request: &ActionRequest) -> Result<ActionPlan, StageError> {
        self.post_json("/api/agent/action", request).await
    }

    async fn learn(&self, request: &LearnRequest) -> Result<LearningRecord, StageError> {
        self.post_json("/api/agent/learn", request).await
    }
}
