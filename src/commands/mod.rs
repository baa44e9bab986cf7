//! End-to-end use cases.
//!
//! Commands orchestrate the ports, generators and services into the
//! operations the (external) HTTP layer exposes. Each state-changing
//! command authorizes through the users port before touching state.

pub mod raceplans;
pub mod start_entries;
pub mod startlists;
pub mod time_events;
pub mod validation;

pub use raceplans::RaceplanCommands;
pub use start_entries::StartEntryCommands;
pub use startlists::StartlistCommands;
pub use time_events::TimeEventCommands;

use thiserror::Error;

use crate::integrations::events::EventsError;
use crate::integrations::users::UsersError;
use crate::planning::PlanError;
use crate::services::ServiceError;
use crate::startlist::StartlistError;

/// Command errors, covering validation, conflicts, missing entities and
/// failures of the collaborating ports.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("{0}")]
    CompetitionFormatNotSupported(String),

    #[error("No raceclasses found for event {0}. Cannot proceed.")]
    NoRaceclassesInEvent(String),

    #[error("{0}")]
    InconsistentValuesInRaceclasses(String),

    #[error("{0}")]
    InconsistentValuesInContestants(String),

    #[error("{0}")]
    InconsistentInputData(String),

    #[error("{0}")]
    MissingProperty(String),

    #[error("Date \"{0}\" has invalid format.")]
    InvalidDateFormat(String),

    #[error("Time \"{0}\" has invalid format.")]
    InvalidTimeFormat(String),

    #[error("No raceplan for event {0}. Cannot proceed.")]
    NoRaceplanInEvent(String),

    #[error("Multiple raceplans for event {0}. Cannot proceed.")]
    DuplicateRaceplansInEvent(String),

    #[error("No races in raceplan {0}. Cannot proceed.")]
    NoRacesInRaceplan(String),

    #[error("Event \"{0}\" has no startlist.")]
    NoStartlistInEvent(String),

    #[error("Cannot add start-entry: race is full.")]
    RaceFull,

    #[error("Cannot add start-entry: bib {0} is already in the race.")]
    BibAlreadyInRace(i32),

    #[error("Cannot add start-entry: starting position {0} is taken.")]
    StartingPositionTaken(u32),

    #[error("Inconsistent data: {0}")]
    Inconsistent(String),

    #[error(transparent)]
    Plan(#[from] PlanError),

    #[error(transparent)]
    Startlist(#[from] StartlistError),

    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error(transparent)]
    Events(#[from] EventsError),

    #[error(transparent)]
    Users(#[from] UsersError),
}
