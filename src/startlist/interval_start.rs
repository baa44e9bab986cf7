//! Startlist generation for Interval Start events.

use crate::models::event::{Contestant, Raceclass};
use crate::models::format::{duration_from_hms, IntervalStartFormat};
use crate::models::race::{IntervalStartRace, Race};
use crate::models::startlist::{StartEntry, Startlist};
use crate::startlist::StartlistError;

/// Generate the startlist for an Interval Start event: per race,
/// matching contestants get successive positions, each starting one
/// interval after the previous.
pub fn generate_startlist_for_interval_start(
    event_id: &str,
    format: &IntervalStartFormat,
    raceclasses: &[Raceclass],
    races: &[Race],
    contestants: &[Contestant],
) -> Result<(Startlist, Vec<StartEntry>), StartlistError> {
    let races: Vec<&IntervalStartRace> = races
        .iter()
        .map(|race| {
            race.as_interval_start().ok_or_else(|| {
                StartlistError::InconsistentInputData(format!(
                    "race {} is not an interval start race",
                    race.id()
                ))
            })
        })
        .collect::<Result<_, _>>()?;

    let no_of_contestants = contestants.len() as u32;
    let no_of_contestants_in_races: u32 = races.iter().map(|race| race.no_of_contestants).sum();
    if no_of_contestants != no_of_contestants_in_races {
        return Err(StartlistError::InconsistentInputData(format!(
            "number of contestants ({no_of_contestants}) does not match the sum of \
             contestants in races ({no_of_contestants_in_races})"
        )));
    }

    let startlist = Startlist {
        id: None,
        event_id: event_id.to_string(),
        no_of_contestants,
        start_entries: Vec::new(),
    };

    let interval_text = format
        .intervals
        .as_deref()
        .ok_or(StartlistError::MissingProperty("intervals"))?;
    let interval = duration_from_hms(interval_text)
        .map_err(|_| StartlistError::InvalidTimeFormat(interval_text.to_string()))?;

    let mut start_entries: Vec<StartEntry> = Vec::new();
    for race in &races {
        let ageclasses: Vec<&str> = raceclasses
            .iter()
            .filter(|rc| rc.name == race.raceclass)
            .flat_map(|rc| rc.ageclasses.iter().map(String::as_str))
            .collect();

        let mut starting_position: u32 = 0;
        let mut scheduled_start_time = race.start_time;
        for contestant in contestants
            .iter()
            .filter(|c| ageclasses.contains(&c.ageclass.as_str()))
        {
            let bib = contestant.bib.ok_or_else(|| {
                StartlistError::InconsistentInputData(format!(
                    "contestant {} has no bib",
                    contestant.full_name()
                ))
            })?;
            starting_position += 1;

            start_entries.push(StartEntry {
                id: None,
                startlist_id: String::new(),
                race_id: race.id.clone(),
                bib,
                starting_position,
                scheduled_start_time,
                name: contestant.full_name(),
                club: contestant.club.clone(),
                status: None,
                changelog: None,
            });
            scheduled_start_time += interval;
        }
    }

    Ok((startlist, start_entries))
}
