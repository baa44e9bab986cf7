//! Raceplan use cases: generate, validate and delete.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::commands::validation::{
    validate_competition_format, validate_event, validate_raceclasses,
};
use crate::commands::CommandError;
use crate::integrations::events::{EventsError, EventsPort};
use crate::integrations::users::UsersPort;
use crate::models::format::CompetitionFormat;
use crate::models::race::Race;
use crate::models::raceplan::Raceplan;
use crate::planning::{
    calculate_raceplan_individual_sprint, calculate_raceplan_interval_start, validate_raceplan,
};
use crate::services::{RaceplansService, RacesService, ServiceError};
use crate::storage::Store;

pub struct RaceplanCommands {
    raceplans: RaceplansService,
    races: RacesService,
    events: Arc<dyn EventsPort>,
    users: Arc<dyn UsersPort>,
}

impl RaceplanCommands {
    pub fn new(
        store: Arc<dyn Store>,
        events: Arc<dyn EventsPort>,
        users: Arc<dyn UsersPort>,
    ) -> Self {
        Self {
            raceplans: RaceplansService::new(store.clone()),
            races: RacesService::new(store),
            events,
            users,
        }
    }

    /// Generate the raceplan for an event and return its id.
    ///
    /// Races are persisted before the plan references them, so a crash
    /// mid-way leaves orphan races but never a plan with dangling ids.
    pub async fn generate_raceplan_for_event(
        &self,
        token: &str,
        event_id: &str,
    ) -> Result<String, CommandError> {
        self.users
            .authorize(Some(token), &["admin", "event-admin"])
            .await?;

        // An event can have only one raceplan:
        if !self
            .raceplans
            .get_raceplans_by_event_id(event_id)
            .await?
            .is_empty()
        {
            return Err(ServiceError::RaceplanAlreadyExists(event_id.to_string()).into());
        }

        let event = self.events.get_event(token, event_id).await?;
        let first_start = validate_event(&event)?;
        let format_name = event.competition_format.as_deref().unwrap_or_default();
        if format_name != "Individual Sprint" && format_name != "Interval Start" {
            return Err(CommandError::CompetitionFormatNotSupported(format!(
                "Competition-format \"{format_name}\" is not supported."
            )));
        }

        let format = match self
            .events
            .get_competition_format(token, event_id, Some(format_name))
            .await
        {
            Ok(format) => format,
            Err(EventsError::CompetitionFormatNotFound(_)) => {
                return Err(CommandError::CompetitionFormatNotSupported(format!(
                    "Competition-format {format_name} is not supported."
                )))
            }
            Err(e) => return Err(e.into()),
        };
        validate_competition_format(&format)?;

        let raceclasses = match self.events.get_raceclasses(token, event_id).await {
            Ok(raceclasses) => raceclasses,
            Err(EventsError::RaceclassesNotFound(_)) => {
                return Err(CommandError::NoRaceclassesInEvent(event_id.to_string()))
            }
            Err(e) => return Err(e.into()),
        };
        validate_raceclasses(event_id, &raceclasses)?;

        let (mut raceplan, races) = match &format {
            CompetitionFormat::IndividualSprint(format) => {
                let (raceplan, races) =
                    calculate_raceplan_individual_sprint(event_id, first_start, format, &raceclasses)?;
                (
                    raceplan,
                    races.into_iter().map(Race::IndividualSprint).collect::<Vec<_>>(),
                )
            }
            CompetitionFormat::IntervalStart(format) => {
                let (raceplan, races) =
                    calculate_raceplan_interval_start(event_id, first_start, format, &raceclasses)?;
                (
                    raceplan,
                    races.into_iter().map(Race::IntervalStart).collect::<Vec<_>>(),
                )
            }
        };

        // Store the races and the raceplan, children first:
        let raceplan_id = self.raceplans.create_raceplan(&mut raceplan).await?;
        for mut race in races {
            race.set_raceplan_id(&raceplan_id);
            let race_id = self.races.create_race(&mut race).await?;
            raceplan.races.push(race_id);
        }
        self.raceplans.update_raceplan(&raceplan_id, &raceplan).await?;

        tracing::info!("generated raceplan {raceplan_id} for event {event_id}");
        Ok(raceplan_id)
    }

    /// Validate a raceplan against its event's raceclasses and races.
    ///
    /// Findings come back keyed by race order, 0 for plan-level issues.
    pub async fn validate_raceplan_for_event(
        &self,
        token: &str,
        raceplan: &Raceplan,
    ) -> Result<BTreeMap<u32, Vec<String>>, CommandError> {
        let event = self.events.get_event(token, &raceplan.event_id).await?;
        let format_name = event.competition_format.as_deref().unwrap_or_default();

        let format = match self
            .events
            .get_competition_format(token, &raceplan.event_id, Some(format_name))
            .await
        {
            Ok(format) => format,
            Err(EventsError::CompetitionFormatNotFound(_)) => {
                return Err(CommandError::CompetitionFormatNotSupported(format!(
                    "Competition-format {format_name} is not supported."
                )))
            }
            Err(e) => return Err(e.into()),
        };

        let raceclasses = match self.events.get_raceclasses(token, &raceplan.event_id).await {
            Ok(raceclasses) => raceclasses,
            Err(EventsError::RaceclassesNotFound(_)) => {
                return Err(CommandError::NoRaceclassesInEvent(raceplan.event_id.clone()))
            }
            Err(e) => return Err(e.into()),
        };

        let mut races = Vec::with_capacity(raceplan.races.len());
        for race_id in &raceplan.races {
            races.push(self.races.get_race_by_id(race_id).await?);
        }

        Ok(validate_raceplan(raceplan, &races, &format, &raceclasses))
    }

    /// Delete a raceplan and every race in it.
    pub async fn delete_raceplan(&self, token: &str, raceplan_id: &str) -> Result<(), CommandError> {
        self.users
            .authorize(Some(token), &["admin", "event-admin"])
            .await?;

        let raceplan = self.raceplans.get_raceplan_by_id(raceplan_id).await?;
        for race_id in &raceplan.races {
            self.races.delete_race(race_id).await?;
        }
        self.raceplans.delete_raceplan(raceplan_id).await?;

        tracing::info!("deleted raceplan {raceplan_id} and its races");
        Ok(())
    }
}
