//! Raceplan generation and validation.

pub mod config;
pub mod individual_sprint;
pub mod interval_start;
pub mod validator;

pub use config::ConfigMatrix;
pub use individual_sprint::calculate_raceplan_individual_sprint;
pub use interval_start::calculate_raceplan_interval_start;
pub use validator::validate_raceplan;

use chrono::Duration;
use thiserror::Error;

use crate::models::event::Raceclass;
use crate::models::format::duration_from_hms;

/// Raceplan generation errors.
#[derive(Debug, Error)]
pub enum PlanError {
    #[error("Competition format is missing the \"{0}\" property.")]
    MissingProperty(&'static str),

    #[error("Time \"{0}\" has invalid format.")]
    InvalidTimeFormat(String),

    #[error("Unsupported value for number of contestants: {0}.")]
    UnsupportedNoOfContestants(u32),

    #[error("Too many contestants in race with order {order}: {count}.")]
    TooManyContestantsInRace { order: u32, count: u32 },

    #[error("Advancement rule targets unknown race {round}:{index}.")]
    UnknownAdvancementTarget { round: String, index: String },
}

/// Sort raceclasses by (group, order) and split them into their groups.
pub(crate) fn raceclasses_by_group(raceclasses: &[Raceclass]) -> Vec<Vec<&Raceclass>> {
    let mut sorted: Vec<&Raceclass> = raceclasses.iter().collect();
    sorted.sort_by_key(|rc| (rc.group.unwrap_or(0), rc.order.unwrap_or(0)));

    let mut groups: Vec<Vec<&Raceclass>> = Vec::new();
    for raceclass in sorted {
        match groups.last_mut() {
            Some(group) if group[0].group == raceclass.group => group.push(raceclass),
            _ => groups.push(vec![raceclass]),
        }
    }
    groups
}

/// Read a required "HH:MM:SS" format property as a duration.
pub(crate) fn required_duration(
    value: &Option<String>,
    property: &'static str,
) -> Result<Duration, PlanError> {
    let text = value.as_deref().ok_or(PlanError::MissingProperty(property))?;
    duration_from_hms(text).map_err(|_| PlanError::InvalidTimeFormat(text.to_string()))
}
