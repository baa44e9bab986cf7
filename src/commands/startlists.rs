//! Startlist use cases: generate, seed the next round and delete.

use std::sync::Arc;

use crate::commands::validation::{
    validate_competition_format, validate_contestants, validate_event,
};
use crate::commands::CommandError;
use crate::integrations::events::{EventsError, EventsPort};
use crate::integrations::users::UsersPort;
use crate::models::format::CompetitionFormat;
use crate::models::race::Race;
use crate::models::raceplan::Raceplan;
use crate::models::startlist::{StartEntry, Startlist};
use crate::services::{
    RaceplansService, RacesService, ServiceError, StartEntriesService, StartlistsService,
};
use crate::startlist::{
    create_next_round_start_entries, generate_startlist_for_individual_sprint,
    generate_startlist_for_interval_start,
};
use crate::storage::Store;

pub struct StartlistCommands {
    startlists: StartlistsService,
    start_entries: StartEntriesService,
    raceplans: RaceplansService,
    races: RacesService,
    events: Arc<dyn EventsPort>,
    users: Arc<dyn UsersPort>,
}

impl StartlistCommands {
    pub fn new(
        store: Arc<dyn Store>,
        events: Arc<dyn EventsPort>,
        users: Arc<dyn UsersPort>,
    ) -> Self {
        Self {
            startlists: StartlistsService::new(store.clone()),
            start_entries: StartEntriesService::new(store.clone()),
            raceplans: RaceplansService::new(store.clone()),
            races: RacesService::new(store),
            events,
            users,
        }
    }

    /// Generate the startlist for an event and return its id.
    pub async fn generate_startlist_for_event(
        &self,
        token: &str,
        event_id: &str,
    ) -> Result<String, CommandError> {
        self.users
            .authorize(Some(token), &["admin", "event-admin"])
            .await?;

        // An event can have only one startlist:
        if !self
            .startlists
            .get_startlists_by_event_id(event_id)
            .await?
            .is_empty()
        {
            return Err(ServiceError::StartlistAlreadyExists(event_id.to_string()).into());
        }

        let event = self.events.get_event(token, event_id).await?;
        validate_event(&event)?;
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

        let raceclasses = self.events.get_raceclasses(token, event_id).await?;
        let raceplan = self.get_raceplan(event_id).await?;
        let races = self.get_races(&raceplan).await?;
        let contestants = self.events.get_contestants(token, event_id).await?;
        validate_contestants(event_id, &contestants)?;

        // Sanity checks before generating:
        let no_of_contestants_in_raceclasses: u32 =
            raceclasses.iter().map(|rc| rc.no_of_contestants).sum();
        if contestants.len() as u32 != no_of_contestants_in_raceclasses {
            return Err(CommandError::InconsistentInputData(format!(
                "number of contestants ({}) does not match the number of contestants \
                 in the raceclasses ({no_of_contestants_in_raceclasses})",
                contestants.len()
            )));
        }
        if contestants.len() as u32 != raceplan.no_of_contestants {
            return Err(CommandError::InconsistentInputData(format!(
                "number of contestants ({}) does not match the number of contestants \
                 in the raceplan ({})",
                contestants.len(),
                raceplan.no_of_contestants
            )));
        }

        let (mut startlist, start_entries) = match &format {
            CompetitionFormat::IndividualSprint(format) => generate_startlist_for_individual_sprint(
                event_id,
                format,
                &raceclasses,
                &races,
                &contestants,
            )?,
            CompetitionFormat::IntervalStart(format) => generate_startlist_for_interval_start(
                event_id,
                format,
                &raceclasses,
                &races,
                &contestants,
            )?,
        };

        // Store the startlist, then each start entry, linking every entry
        // into its race as we go:
        let startlist_id = self.startlists.create_startlist(&mut startlist).await?;
        self.persist_start_entries(&mut startlist, start_entries)
            .await?;
        self.startlists
            .update_startlist(&startlist_id, &startlist)
            .await?;

        tracing::info!("generated startlist {startlist_id} for event {event_id}");
        Ok(startlist_id)
    }

    /// Seed start entries for the second round of non-ranked classes.
    ///
    /// Requires the event to already have a startlist; returns the ids
    /// of the created entries.
    pub async fn seed_next_round_for_event(
        &self,
        token: &str,
        event_id: &str,
    ) -> Result<Vec<String>, CommandError> {
        self.users
            .authorize(Some(token), &["admin", "event-admin"])
            .await?;

        let mut startlists = self.startlists.get_startlists_by_event_id(event_id).await?;
        let mut startlist = match startlists.len() {
            0 => return Err(CommandError::NoStartlistInEvent(event_id.to_string())),
            1 => startlists.remove(0),
            _ => {
                return Err(CommandError::Inconsistent(format!(
                    "event \"{event_id}\" has more than one startlist"
                )))
            }
        };

        let event = self.events.get_event(token, event_id).await?;
        validate_event(&event)?;
        let format = self
            .events
            .get_competition_format(token, event_id, event.competition_format.as_deref())
            .await?;
        let CompetitionFormat::IndividualSprint(format) = format else {
            return Err(CommandError::CompetitionFormatNotSupported(
                "Next-round seeding applies to Individual Sprint events only.".to_string(),
            ));
        };

        let raceclasses = self.events.get_raceclasses(token, event_id).await?;
        let raceplan = self.get_raceplan(event_id).await?;
        let races = self.get_races(&raceplan).await?;
        let contestants = self.events.get_contestants(token, event_id).await?;
        validate_contestants(event_id, &contestants)?;

        let start_entries =
            create_next_round_start_entries(&format, &raceclasses, &races, &contestants)?;

        let startlist_id = startlist
            .id
            .clone()
            .ok_or_else(|| CommandError::Inconsistent("startlist has no id".to_string()))?;
        let entry_ids = self
            .persist_start_entries(&mut startlist, start_entries)
            .await?;
        self.startlists
            .update_startlist(&startlist_id, &startlist)
            .await?;

        Ok(entry_ids)
    }

    /// Delete a startlist and its start entries, unlinking the entries
    /// from the event's races.
    pub async fn delete_startlist(
        &self,
        token: &str,
        startlist_id: &str,
    ) -> Result<(), CommandError> {
        self.users
            .authorize(Some(token), &["admin", "event-admin"])
            .await?;

        let startlist = self.startlists.get_startlist_by_id(startlist_id).await?;

        for start_entry_id in &startlist.start_entries {
            self.start_entries.delete_start_entry(start_entry_id).await?;
        }

        let races = self.races.get_races_by_event_id(&startlist.event_id).await?;
        for mut race in races {
            race.start_entries_mut().clear();
            let race_id = race.id().to_string();
            self.races.update_race(&race_id, &race).await?;
        }

        self.startlists.delete_startlist(startlist_id).await?;

        tracing::info!("deleted startlist {startlist_id} and its start entries");
        Ok(())
    }

    async fn persist_start_entries(
        &self,
        startlist: &mut Startlist,
        start_entries: Vec<StartEntry>,
    ) -> Result<Vec<String>, CommandError> {
        let startlist_id = startlist
            .id
            .clone()
            .ok_or_else(|| CommandError::Inconsistent("startlist has no id".to_string()))?;

        let mut entry_ids = Vec::with_capacity(start_entries.len());
        for mut start_entry in start_entries {
            start_entry.startlist_id = startlist_id.clone();
            let start_entry_id = self.start_entries.create_start_entry(&mut start_entry).await?;
            startlist.start_entries.push(start_entry_id.clone());

            let mut race = self.races.get_race_by_id(&start_entry.race_id).await?;
            race.start_entries_mut().push(start_entry_id.clone());
            let race_id = race.id().to_string();
            self.races.update_race(&race_id, &race).await?;

            entry_ids.push(start_entry_id);
        }

        Ok(entry_ids)
    }

    async fn get_raceplan(&self, event_id: &str) -> Result<Raceplan, CommandError> {
        let mut raceplans = self.raceplans.get_raceplans_by_event_id(event_id).await?;
        match raceplans.len() {
            0 => Err(CommandError::NoRaceplanInEvent(event_id.to_string())),
            1 => Ok(raceplans.remove(0)),
            _ => Err(CommandError::DuplicateRaceplansInEvent(event_id.to_string())),
        }
    }

    async fn get_races(&self, raceplan: &Raceplan) -> Result<Vec<Race>, CommandError> {
        let raceplan_id = raceplan
            .id
            .as_deref()
            .ok_or_else(|| CommandError::Inconsistent("raceplan has no id".to_string()))?;
        let races = self.races.get_races_by_raceplan_id(raceplan_id).await?;
        if races.is_empty() {
            return Err(CommandError::NoRacesInRaceplan(raceplan_id.to_string()));
        }
        Ok(races)
    }
}
