//! Per-entity persistence services.
//!
//! Services own id discipline (fresh UUIDs on create, ids never change)
//! and the cross-entity invariants the store cannot enforce on its own.

pub mod race_results;
pub mod raceplans;
pub mod races;
pub mod start_entries;
pub mod startlists;
pub mod time_events;

pub use race_results::RaceResultsService;
pub use raceplans::RaceplansService;
pub use races::RacesService;
pub use start_entries::StartEntriesService;
pub use startlists::StartlistsService;
pub use time_events::TimeEventsService;

use thiserror::Error;
use uuid::Uuid;

use crate::storage::StoreError;

/// Create a fresh document id.
pub(crate) fn create_id() -> String {
    Uuid::new_v4().to_string()
}

/// Service errors.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Event \"{0}\" already has a raceplan.")]
    RaceplanAlreadyExists(String),

    #[error("Event \"{0}\" already has a startlist.")]
    StartlistAlreadyExists(String),

    #[error("Time-event for bib {bib} and timing-point {timing_point} already exists in race {race_id}.")]
    TimeEventAlreadyExists {
        bib: i32,
        timing_point: String,
        race_id: String,
    },

    #[error("{0}")]
    IllegalValue(String),

    #[error("Time-event has no id. Cannot proceed.")]
    TimeEventNotIdentifiable,

    #[error("Time-event {0} does not have a race reference.")]
    TimeEventDoesNotReferenceRace(String),

    #[error("Error in time-event \"{timing_point}\": contestant with bib {bib} is not in race start-entries.")]
    ContestantNotInStartEntries { timing_point: String, bib: i32 },

    #[error(transparent)]
    Store(#[from] StoreError),
}
