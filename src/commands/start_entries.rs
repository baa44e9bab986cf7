//! Start entry use cases: add to and remove from a race.

use std::sync::Arc;

use crate::commands::CommandError;
use crate::integrations::events::EventsPort;
use crate::integrations::users::UsersPort;
use crate::models::format::CompetitionFormat;
use crate::models::race::Race;
use crate::models::startlist::StartEntry;
use crate::services::{
    RaceplansService, RacesService, ServiceError, StartEntriesService, StartlistsService,
};
use crate::storage::{Store, StoreError};

const ROLES: &[&str] = &["admin", "event-admin", "race-result", "race-office"];

pub struct StartEntryCommands {
    start_entries: StartEntriesService,
    races: RacesService,
    raceplans: RaceplansService,
    startlists: StartlistsService,
    events: Arc<dyn EventsPort>,
    users: Arc<dyn UsersPort>,
}

impl StartEntryCommands {
    pub fn new(
        store: Arc<dyn Store>,
        events: Arc<dyn EventsPort>,
        users: Arc<dyn UsersPort>,
    ) -> Self {
        Self {
            start_entries: StartEntriesService::new(store.clone()),
            races: RacesService::new(store.clone()),
            raceplans: RaceplansService::new(store.clone()),
            startlists: StartlistsService::new(store),
            events,
            users,
        }
    }

    /// Add a start entry to a race and return its id.
    ///
    /// The race must have room, and neither the bib nor the starting
    /// position may already be taken. The entry is linked into the race
    /// and the startlist; if the race is in a first round, the
    /// raceplan's contestant count grows with it.
    pub async fn create_start_entry(
        &self,
        token: &str,
        mut start_entry: StartEntry,
    ) -> Result<String, CommandError> {
        self.users.authorize(Some(token), ROLES).await?;

        let mut startlist = self
            .startlists
            .get_startlist_by_id(&start_entry.startlist_id)
            .await?;
        let mut race = self.races.get_race_by_id(&start_entry.race_id).await?;
        let entries_in_race = self
            .start_entries
            .get_start_entries_by_race_id(race.id())
            .await?;

        if race.start_entries().len() as u32 >= race.max_no_of_contestants() {
            return Err(CommandError::RaceFull);
        }
        if entries_in_race.iter().any(|e| e.bib == start_entry.bib) {
            return Err(CommandError::BibAlreadyInRace(start_entry.bib));
        }
        if entries_in_race
            .iter()
            .any(|e| e.starting_position == start_entry.starting_position)
        {
            return Err(CommandError::StartingPositionTaken(
                start_entry.starting_position,
            ));
        }

        let start_entry_id = self.start_entries.create_start_entry(&mut start_entry).await?;

        race.start_entries_mut().push(start_entry_id.clone());
        let no_of_contestants = race.start_entries().len() as u32;
        race.set_no_of_contestants(no_of_contestants);
        let race_id = race.id().to_string();
        self.races.update_race(&race_id, &race).await?;

        self.adjust_raceplan_contestants(token, &race, 1).await?;

        startlist.no_of_contestants += 1;
        startlist.start_entries.push(start_entry_id.clone());
        let startlist_id = startlist
            .id
            .clone()
            .ok_or_else(|| CommandError::Inconsistent("startlist has no id".to_string()))?;
        self.startlists
            .update_startlist(&startlist_id, &startlist)
            .await?;

        Ok(start_entry_id)
    }

    /// Remove a start entry, reversing all the bookkeeping of
    /// [`create_start_entry`](Self::create_start_entry).
    pub async fn delete_start_entry(
        &self,
        token: &str,
        start_entry_id: &str,
    ) -> Result<(), CommandError> {
        self.users.authorize(Some(token), ROLES).await?;

        let start_entry = self.start_entries.get_start_entry_by_id(start_entry_id).await?;

        let mut race = match self.races.get_race_by_id(&start_entry.race_id).await {
            Ok(race) => race,
            Err(ServiceError::Store(StoreError::NotFound(..))) => {
                return Err(CommandError::Inconsistent(format!(
                    "cannot find race with id {} of start-entry with id {start_entry_id}",
                    start_entry.race_id
                )))
            }
            Err(e) => return Err(e.into()),
        };
        race.start_entries_mut().retain(|id| id != start_entry_id);
        let no_of_contestants = race.start_entries().len() as u32;
        race.set_no_of_contestants(no_of_contestants);
        let race_id = race.id().to_string();
        self.races.update_race(&race_id, &race).await?;

        self.adjust_raceplan_contestants(token, &race, -1).await?;

        let mut startlist = match self
            .startlists
            .get_startlist_by_id(&start_entry.startlist_id)
            .await
        {
            Ok(startlist) => startlist,
            Err(ServiceError::Store(StoreError::NotFound(..))) => {
                return Err(CommandError::Inconsistent(format!(
                    "cannot find startlist with id {} of start-entry with id {start_entry_id}",
                    start_entry.startlist_id
                )))
            }
            Err(e) => return Err(e.into()),
        };
        startlist.start_entries.retain(|id| id != start_entry_id);
        startlist.no_of_contestants = startlist.no_of_contestants.saturating_sub(1);
        let startlist_id = startlist
            .id
            .clone()
            .ok_or_else(|| CommandError::Inconsistent("startlist has no id".to_string()))?;
        self.startlists
            .update_startlist(&startlist_id, &startlist)
            .await?;

        self.start_entries.delete_start_entry(start_entry_id).await?;
        Ok(())
    }

    /// First-round races carry the raceplan's contestant count, so
    /// adding to or removing from one adjusts the plan too.
    async fn adjust_raceplan_contestants(
        &self,
        token: &str,
        race: &Race,
        delta: i64,
    ) -> Result<(), CommandError> {
        let Race::IndividualSprint(sprint_race) = race else {
            return Ok(());
        };

        let format = self
            .events
            .get_competition_format(token, race.event_id(), None)
            .await?;
        let CompetitionFormat::IndividualSprint(format) = format else {
            return Ok(());
        };

        let is_first_round = format
            .rounds_ranked_classes
            .first()
            .into_iter()
            .chain(format.rounds_non_ranked_classes.first())
            .any(|round| *round == sprint_race.round);
        if !is_first_round {
            return Ok(());
        }

        let mut raceplan = self
            .raceplans
            .get_raceplan_by_id(&sprint_race.raceplan_id)
            .await?;
        raceplan.no_of_contestants =
            (i64::from(raceplan.no_of_contestants) + delta).max(0) as u32;
        let raceplan_id = raceplan
            .id
            .clone()
            .ok_or_else(|| CommandError::Inconsistent("raceplan has no id".to_string()))?;
        self.raceplans.update_raceplan(&raceplan_id, &raceplan).await?;

        Ok(())
    }
}
