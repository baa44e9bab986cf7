//! The store port: per-collection CRUD and list-by-field.
//!
//! The store enforces id-level idempotency and the uniqueness indexes of
//! the collections, and nothing else; cross-collection invariants live
//! in the services and commands that call it.

use async_trait::async_trait;
use thiserror::Error;

use crate::models::race::Race;
use crate::models::race_result::RaceResult;
use crate::models::raceplan::Raceplan;
use crate::models::startlist::{StartEntry, Startlist};
use crate::models::time_event::TimeEvent;

/// Store errors.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to connect to store: {0}")]
    ConnectionFailed(String),

    #[error("Query failed: {0}")]
    QueryFailed(String),

    #[error("Unique index violated: {0}")]
    Duplicate(String),

    #[error("{0} with id {1} not found")]
    NotFound(&'static str, String),
}

/// Document store over the race service collections.
///
/// Creates are idempotent against retries at the id level: re-inserting
/// an id fails with [`StoreError::Duplicate`] and has no further effect.
/// List operations return documents in their collection's natural order
/// (races by `order`, start entries by `starting_position`, the rest by
/// insertion).
#[async_trait]
pub trait Store: Send + Sync {
    // Raceplans
    async fn create_raceplan(&self, raceplan: &Raceplan) -> Result<(), StoreError>;
    async fn get_raceplan_by_id(&self, id: &str) -> Result<Raceplan, StoreError>;
    async fn get_raceplans_by_event_id(&self, event_id: &str) -> Result<Vec<Raceplan>, StoreError>;
    async fn get_all_raceplans(&self) -> Result<Vec<Raceplan>, StoreError>;
    async fn update_raceplan(&self, id: &str, raceplan: &Raceplan) -> Result<(), StoreError>;
    async fn delete_raceplan(&self, id: &str) -> Result<(), StoreError>;

    // Races
    async fn create_race(&self, race: &Race) -> Result<(), StoreError>;
    async fn get_race_by_id(&self, id: &str) -> Result<Race, StoreError>;
    async fn get_races_by_event_id(&self, event_id: &str) -> Result<Vec<Race>, StoreError>;
    async fn get_races_by_raceplan_id(&self, raceplan_id: &str) -> Result<Vec<Race>, StoreError>;
    async fn get_races_by_event_id_and_raceclass(
        &self,
        event_id: &str,
        raceclass: &str,
    ) -> Result<Vec<Race>, StoreError>;
    async fn update_race(&self, id: &str, race: &Race) -> Result<(), StoreError>;
    async fn delete_race(&self, id: &str) -> Result<(), StoreError>;

    // Startlists
    async fn create_startlist(&self, startlist: &Startlist) -> Result<(), StoreError>;
    async fn get_startlist_by_id(&self, id: &str) -> Result<Startlist, StoreError>;
    async fn get_startlists_by_event_id(
        &self,
        event_id: &str,
    ) -> Result<Vec<Startlist>, StoreError>;
    async fn get_all_startlists(&self) -> Result<Vec<Startlist>, StoreError>;
    async fn update_startlist(&self, id: &str, startlist: &Startlist) -> Result<(), StoreError>;
    async fn delete_startlist(&self, id: &str) -> Result<(), StoreError>;

    // Start entries
    async fn create_start_entry(&self, start_entry: &StartEntry) -> Result<(), StoreError>;
    async fn get_start_entry_by_id(&self, id: &str) -> Result<StartEntry, StoreError>;
    async fn get_start_entries_by_race_id(
        &self,
        race_id: &str,
    ) -> Result<Vec<StartEntry>, StoreError>;
    async fn get_start_entries_by_race_id_and_startlist_id(
        &self,
        race_id: &str,
        startlist_id: &str,
    ) -> Result<Vec<StartEntry>, StoreError>;
    async fn update_start_entry(&self, id: &str, start_entry: &StartEntry)
        -> Result<(), StoreError>;
    async fn delete_start_entry(&self, id: &str) -> Result<(), StoreError>;

    // Time events
    async fn create_time_event(&self, time_event: &TimeEvent) -> Result<(), StoreError>;
    async fn get_time_event_by_id(&self, id: &str) -> Result<TimeEvent, StoreError>;
    async fn get_all_time_events(&self) -> Result<Vec<TimeEvent>, StoreError>;
    async fn get_time_events_by_event_id(
        &self,
        event_id: &str,
    ) -> Result<Vec<TimeEvent>, StoreError>;
    async fn get_time_events_by_event_id_and_timing_point(
        &self,
        event_id: &str,
        timing_point: &str,
    ) -> Result<Vec<TimeEvent>, StoreError>;
    async fn get_time_events_by_race_id(&self, race_id: &str)
        -> Result<Vec<TimeEvent>, StoreError>;
    async fn update_time_event(&self, id: &str, time_event: &TimeEvent) -> Result<(), StoreError>;
    async fn delete_time_event(&self, id: &str) -> Result<(), StoreError>;

    // Race results
    async fn create_race_result(&self, race_result: &RaceResult) -> Result<(), StoreError>;
    async fn get_race_result_by_id(&self, id: &str) -> Result<RaceResult, StoreError>;
    async fn get_race_results_by_race_id(
        &self,
        race_id: &str,
    ) -> Result<Vec<RaceResult>, StoreError>;
    async fn get_race_results_by_race_id_and_timing_point(
        &self,
        race_id: &str,
        timing_point: &str,
    ) -> Result<Vec<RaceResult>, StoreError>;
    async fn update_race_result(&self, id: &str, race_result: &RaceResult)
        -> Result<(), StoreError>;
    async fn delete_race_result(&self, id: &str) -> Result<(), StoreError>;
}
