//! Race result persistence service and the time-event reconciliation
//! engine.

use std::sync::Arc;

use crate::models::race_result::{RaceResult, RaceResultStatus};
use crate::models::time_event::TimeEvent;
use crate::services::{create_id, ServiceError};
use crate::storage::Store;

pub struct RaceResultsService {
    store: Arc<dyn Store>,
}

impl RaceResultsService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn get_race_result_by_id(&self, id: &str) -> Result<RaceResult, ServiceError> {
        Ok(self.store.get_race_result_by_id(id).await?)
    }

    pub async fn get_race_results_by_race_id(
        &self,
        race_id: &str,
    ) -> Result<Vec<RaceResult>, ServiceError> {
        Ok(self.store.get_race_results_by_race_id(race_id).await?)
    }

    pub async fn get_race_results_by_race_id_and_timing_point(
        &self,
        race_id: &str,
        timing_point: &str,
    ) -> Result<Vec<RaceResult>, ServiceError> {
        Ok(self
            .store
            .get_race_results_by_race_id_and_timing_point(race_id, timing_point)
            .await?)
    }

    pub async fn update_race_result(
        &self,
        id: &str,
        race_result: &RaceResult,
    ) -> Result<(), ServiceError> {
        let old_race_result = self.store.get_race_result_by_id(id).await?;
        if race_result.id != old_race_result.id {
            return Err(ServiceError::IllegalValue(
                "Cannot change id for race-result.".to_string(),
            ));
        }
        Ok(self.store.update_race_result(id, race_result).await?)
    }

    pub async fn delete_race_result(&self, id: &str) -> Result<(), ServiceError> {
        self.store.get_race_result_by_id(id).await?;
        Ok(self.store.delete_race_result(id).await?)
    }

    /// Reconcile a time event into its race's result.
    ///
    /// The event must be identifiable and reference an existing race,
    /// and its bib must be lined up in the race unless the timing point
    /// is "Template". The race result for (race, timing point) is
    /// created lazily; appending to the ranking sequence is idempotent
    /// per time-event id. Returns the race result id.
    pub async fn add_time_event_to_race_result(
        &self,
        time_event: &TimeEvent,
    ) -> Result<String, ServiceError> {
        let time_event_id = time_event
            .id
            .as_deref()
            .filter(|id| !id.is_empty())
            .ok_or(ServiceError::TimeEventNotIdentifiable)?;
        let race_id = time_event
            .race_id
            .as_deref()
            .filter(|id| !id.is_empty())
            .ok_or_else(|| ServiceError::TimeEventDoesNotReferenceRace(time_event_id.to_string()))?;

        let mut race = self.store.get_race_by_id(race_id).await?;

        let start_entries = self.store.get_start_entries_by_race_id(race_id).await?;
        if !time_event.is_template()
            && !start_entries.iter().any(|entry| entry.bib == time_event.bib)
        {
            return Err(ServiceError::ContestantNotInStartEntries {
                timing_point: time_event.timing_point.clone(),
                bib: time_event.bib,
            });
        }

        let existing = self
            .store
            .get_race_results_by_race_id_and_timing_point(race_id, &time_event.timing_point)
            .await?;
        let mut race_result = match existing.into_iter().next() {
            Some(race_result) => race_result,
            None => {
                let race_result = RaceResult {
                    id: create_id(),
                    race_id: race_id.to_string(),
                    timing_point: time_event.timing_point.clone(),
                    no_of_contestants: 0,
                    ranking_sequence: Vec::new(),
                    status: RaceResultStatus::Unofficial,
                };
                tracing::debug!(
                    "creating race result for race {race_id} at {}",
                    time_event.timing_point
                );
                self.store.create_race_result(&race_result).await?;
                race_result
            }
        };

        if !race_result
            .ranking_sequence
            .iter()
            .any(|id| id == time_event_id)
        {
            race_result.ranking_sequence.push(time_event_id.to_string());
            race_result.no_of_contestants += 1;
            self.store
                .update_race_result(&race_result.id, &race_result)
                .await?;
        }

        if !race.results().contains_key(&time_event.timing_point) {
            race.results_mut()
                .insert(time_event.timing_point.clone(), race_result.id.clone());
            self.store.update_race(race_id, &race).await?;
        }

        Ok(race_result.id)
    }
}
