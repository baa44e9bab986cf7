//! Time event use cases: ingest with reconciliation, and delete.

use std::sync::Arc;

use chrono::{DateTime, FixedOffset, Utc};

use crate::commands::CommandError;
use crate::integrations::events::EventsPort;
use crate::integrations::users::UsersPort;
use crate::models::changelog::Changelog;
use crate::models::time_event::{TimeEvent, TimeEventStatus};
use crate::services::{RaceResultsService, ServiceError, TimeEventsService};
use crate::storage::{Store, StoreError};

const ROLES: &[&str] = &["admin", "event-admin", "race-result"];

/// User id stamped into changelog entries written by the service itself.
const SERVICE_USER_ID: &str = "raceday";

pub struct TimeEventCommands {
    time_events: TimeEventsService,
    race_results: RaceResultsService,
    events: Arc<dyn EventsPort>,
    users: Arc<dyn UsersPort>,
}

impl TimeEventCommands {
    pub fn new(
        store: Arc<dyn Store>,
        events: Arc<dyn EventsPort>,
        users: Arc<dyn UsersPort>,
    ) -> Self {
        Self {
            time_events: TimeEventsService::new(store.clone()),
            race_results: RaceResultsService::new(store),
            events,
            users,
        }
    }

    /// Ingest a time event: create it, then reconcile it into its
    /// race's result.
    ///
    /// A reconciliation failure does not reject the event; it is kept
    /// with status `Error` and the failure recorded in its changelog,
    /// stamped in the event's timezone. Returns the stored time event.
    pub async fn create_time_event(
        &self,
        token: &str,
        mut time_event: TimeEvent,
    ) -> Result<TimeEvent, CommandError> {
        self.users.authorize(Some(token), ROLES).await?;

        let time_event_id = self.time_events.create_time_event(&mut time_event).await?;

        match self
            .race_results
            .add_time_event_to_race_result(&time_event)
            .await
        {
            Ok(_) => {
                time_event.status = Some(TimeEventStatus::Ok);
            }
            Err(error) if is_reconciliation_failure(&error) => {
                let timestamp = self.event_timestamp(token, &time_event.event_id).await?;
                time_event.status = Some(TimeEventStatus::Error);
                time_event
                    .changelog
                    .get_or_insert_with(Vec::new)
                    .push(Changelog {
                        timestamp,
                        user_id: SERVICE_USER_ID.to_string(),
                        comment: error.to_string(),
                    });
            }
            Err(error) => return Err(error.into()),
        }

        self.time_events
            .update_time_event(&time_event_id, &time_event)
            .await?;
        Ok(time_event)
    }

    /// Delete a time event, removing it from every matching race
    /// result's ranking sequence first.
    pub async fn delete_time_event(
        &self,
        token: &str,
        time_event_id: &str,
    ) -> Result<(), CommandError> {
        self.users.authorize(Some(token), ROLES).await?;

        let time_event = self.time_events.get_time_event_by_id(time_event_id).await?;

        if let Some(race_id) = time_event.race_id.as_deref().filter(|id| !id.is_empty()) {
            let race_results = self
                .race_results
                .get_race_results_by_race_id_and_timing_point(race_id, &time_event.timing_point)
                .await?;
            for mut race_result in race_results {
                if let Some(position) = race_result
                    .ranking_sequence
                    .iter()
                    .position(|id| id == time_event_id)
                {
                    race_result.ranking_sequence.remove(position);
                    race_result.no_of_contestants =
                        race_result.no_of_contestants.saturating_sub(1);
                    let race_result_id = race_result.id.clone();
                    self.race_results
                        .update_race_result(&race_result_id, &race_result)
                        .await?;
                }
            }
        }

        self.time_events.delete_time_event(time_event_id).await?;
        Ok(())
    }

    async fn event_timestamp(
        &self,
        token: &str,
        event_id: &str,
    ) -> Result<DateTime<FixedOffset>, CommandError> {
        let event = self.events.get_event(token, event_id).await?;
        let timezone = event.timezone.ok_or_else(|| {
            CommandError::Inconsistent(format!("event {event_id} has no timezone"))
        })?;
        let tz: chrono_tz::Tz = timezone
            .parse()
            .map_err(|_| CommandError::Inconsistent(format!("unknown timezone {timezone}")))?;
        Ok(Utc::now().with_timezone(&tz).fixed_offset())
    }
}

/// Failures that mark the time event instead of failing the ingest.
fn is_reconciliation_failure(error: &ServiceError) -> bool {
    matches!(
        error,
        ServiceError::TimeEventNotIdentifiable
            | ServiceError::TimeEventDoesNotReferenceRace(_)
            | ServiceError::ContestantNotInStartEntries { .. }
            | ServiceError::Store(StoreError::NotFound("race", _))
    )
}
