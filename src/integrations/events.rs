//! Events port: event, competition format, raceclasses and contestants.

use async_trait::async_trait;
use thiserror::Error;

use crate::models::event::{Contestant, Event, Raceclass};
use crate::models::format::CompetitionFormat;

/// Events port errors.
#[derive(Debug, Error)]
pub enum EventsError {
    #[error("Event {0} not found.")]
    EventNotFound(String),

    #[error("Competition format \"{0}\" not found.")]
    CompetitionFormatNotFound(String),

    #[error("No raceclasses found for event {0}.")]
    RaceclassesNotFound(String),

    #[error("No contestants found for event {0}.")]
    ContestantsNotFound(String),

    #[error("Events service request failed: {0}")]
    Remote(String),
}

/// Read access to the event service.
#[async_trait]
pub trait EventsPort: Send + Sync {
    async fn get_event(&self, token: &str, event_id: &str) -> Result<Event, EventsError>;

    /// Fetch the competition format, preferring a per-event override and
    /// falling back to the global format with the given name (or the
    /// event's format name when `name` is not given).
    async fn get_competition_format(
        &self,
        token: &str,
        event_id: &str,
        name: Option<&str>,
    ) -> Result<CompetitionFormat, EventsError>;

    async fn get_raceclasses(
        &self,
        token: &str,
        event_id: &str,
    ) -> Result<Vec<Raceclass>, EventsError>;

    async fn get_contestants(
        &self,
        token: &str,
        event_id: &str,
    ) -> Result<Vec<Contestant>, EventsError>;
}

/// Events port over the event service HTTP API.
pub struct HttpEventsAdapter {
    client: reqwest::Client,
    events_base_url: String,
    formats_base_url: String,
}

impl HttpEventsAdapter {
    /// `events_base_url` serves `/events/...`, `formats_base_url` serves
    /// the global `/competition-formats` collection.
    pub fn new(events_base_url: &str, formats_base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            events_base_url: events_base_url.trim_end_matches('/').to_string(),
            formats_base_url: formats_base_url.trim_end_matches('/').to_string(),
        }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        token: &str,
        url: &str,
    ) -> Result<Option<T>, EventsError> {
        let response = self
            .client
            .get(url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| EventsError::Remote(e.to_string()))?;

        match response.status() {
            reqwest::StatusCode::OK => {
                let body = response
                    .json::<T>()
                    .await
                    .map_err(|e| EventsError::Remote(e.to_string()))?;
                Ok(Some(body))
            }
            reqwest::StatusCode::NOT_FOUND => Ok(None),
            status => Err(EventsError::Remote(format!(
                "got status {status} from events service for {url}"
            ))),
        }
    }
}

#[async_trait]
impl EventsPort for HttpEventsAdapter {
    async fn get_event(&self, token: &str, event_id: &str) -> Result<Event, EventsError> {
        let url = format!("{}/events/{}", self.events_base_url, event_id);
        self.get_json::<Event>(token, &url)
            .await?
            .ok_or_else(|| EventsError::EventNotFound(event_id.to_string()))
    }

    async fn get_competition_format(
        &self,
        token: &str,
        event_id: &str,
        name: Option<&str>,
    ) -> Result<CompetitionFormat, EventsError> {
        // Per-event override first:
        let url = format!("{}/events/{}/format", self.events_base_url, event_id);
        if let Some(format) = self.get_json::<CompetitionFormat>(token, &url).await? {
            return Ok(format);
        }

        // No event-specific format, fall back to the global one:
        let name = match name {
            Some(name) => name.to_string(),
            None => {
                let event = self.get_event(token, event_id).await?;
                event
                    .competition_format
                    .ok_or_else(|| EventsError::CompetitionFormatNotFound(String::new()))?
            }
        };
        let url = format!(
            "{}/competition-formats?name={}",
            self.formats_base_url, name
        );
        let formats = self
            .get_json::<Vec<CompetitionFormat>>(token, &url)
            .await?
            .unwrap_or_default();
        formats
            .into_iter()
            .next()
            .ok_or(EventsError::CompetitionFormatNotFound(name))
    }

    async fn get_raceclasses(
        &self,
        token: &str,
        event_id: &str,
    ) -> Result<Vec<Raceclass>, EventsError> {
        let url = format!("{}/events/{}/raceclasses", self.events_base_url, event_id);
        let raceclasses = self
            .get_json::<Vec<Raceclass>>(token, &url)
            .await?
            .unwrap_or_default();
        if raceclasses.is_empty() {
            return Err(EventsError::RaceclassesNotFound(event_id.to_string()));
        }
        Ok(raceclasses)
    }

    async fn get_contestants(
        &self,
        token: &str,
        event_id: &str,
    ) -> Result<Vec<Contestant>, EventsError> {
        let url = format!("{}/events/{}/contestants", self.events_base_url, event_id);
        let contestants = self
            .get_json::<Vec<Contestant>>(token, &url)
            .await?
            .unwrap_or_default();
        if contestants.is_empty() {
            return Err(EventsError::ContestantsNotFound(event_id.to_string()));
        }
        Ok(contestants)
    }
}
