//! Startlist generation.

pub mod individual_sprint;
pub mod interval_start;
pub mod next_round;

pub use individual_sprint::generate_startlist_for_individual_sprint;
pub use interval_start::generate_startlist_for_interval_start;
pub use next_round::create_next_round_start_entries;

use thiserror::Error;

use crate::models::event::Contestant;
use crate::models::race::{IndividualSprintRace, Race};
use crate::models::startlist::StartEntry;

/// Startlist generation errors.
#[derive(Debug, Error)]
pub enum StartlistError {
    #[error("Inconsistent input data: {0}")]
    InconsistentInputData(String),

    #[error("Competition format is missing the \"{0}\" property.")]
    MissingProperty(&'static str),

    #[error("Time \"{0}\" has invalid format.")]
    InvalidTimeFormat(String),
}

/// View a plan's races as individual sprint races.
pub(crate) fn sprint_races(races: &[Race]) -> Result<Vec<&IndividualSprintRace>, StartlistError> {
    races
        .iter()
        .map(|race| {
            race.as_individual_sprint().ok_or_else(|| {
                StartlistError::InconsistentInputData(format!(
                    "race {} is not an individual sprint race",
                    race.id()
                ))
            })
        })
        .collect()
}

/// Fill target races with matching contestants, first come first
/// served: successive starting positions until a race reaches its
/// planned contestant count, then on to the next race.
pub(crate) fn fill_races(
    target_races: &[&IndividualSprintRace],
    ageclasses: &[&str],
    contestants: &[Contestant],
) -> Result<Vec<StartEntry>, StartlistError> {
    let mut entries = Vec::new();
    let mut race_index = 0usize;
    let mut starting_position: u32 = 1;
    let mut no_of_contestants_in_race: u32 = 0;

    for contestant in contestants
        .iter()
        .filter(|c| ageclasses.contains(&c.ageclass.as_str()))
    {
        let race = target_races.get(race_index).ok_or_else(|| {
            StartlistError::InconsistentInputData(
                "more contestants than seats in target races".to_string(),
            )
        })?;
        let bib = contestant.bib.ok_or_else(|| {
            StartlistError::InconsistentInputData(format!(
                "contestant {} has no bib",
                contestant.full_name()
            ))
        })?;

        entries.push(StartEntry {
            id: None,
            startlist_id: String::new(),
            race_id: race.id.clone(),
            bib,
            starting_position,
            scheduled_start_time: race.start_time,
            name: contestant.full_name(),
            club: contestant.club.clone(),
            status: None,
            changelog: None,
        });

        no_of_contestants_in_race += 1;
        if no_of_contestants_in_race < race.no_of_contestants {
            starting_position += 1;
        } else {
            race_index += 1;
            starting_position = 1;
            no_of_contestants_in_race = 0;
        }
    }

    Ok(entries)
}
