//! Startlist generation for Individual Sprint events.

use indexmap::IndexMap;

use crate::models::event::{Contestant, Raceclass};
use crate::models::format::IndividualSprintFormat;
use crate::models::race::{IndividualSprintRace, Race};
use crate::models::startlist::{StartEntry, Startlist};
use crate::startlist::{fill_races, sprint_races, StartlistError};

/// Generate the startlist for an Individual Sprint event.
///
/// Contestants of each raceclass are assigned to the races of its first
/// round (the first ranked round for ranked classes, the first
/// non-ranked round otherwise) in bib order, filling each race to its
/// planned contestant count before moving to the next.
pub fn generate_startlist_for_individual_sprint(
    event_id: &str,
    format: &IndividualSprintFormat,
    raceclasses: &[Raceclass],
    races: &[Race],
    contestants: &[Contestant],
) -> Result<(Startlist, Vec<StartEntry>), StartlistError> {
    let races = sprint_races(races)?;
    let no_of_contestants = contestants.len() as u32;

    let startlist = Startlist {
        id: None,
        event_id: event_id.to_string(),
        no_of_contestants,
        start_entries: Vec::new(),
    };

    let first_rounds: Vec<&str> = format
        .rounds_ranked_classes
        .first()
        .into_iter()
        .chain(format.rounds_non_ranked_classes.first())
        .map(String::as_str)
        .collect();
    let no_of_contestants_in_races: u32 = races
        .iter()
        .filter(|race| first_rounds.contains(&race.round.as_str()))
        .map(|race| race.no_of_contestants)
        .sum();
    if no_of_contestants != no_of_contestants_in_races {
        return Err(StartlistError::InconsistentInputData(format!(
            "number of contestants ({no_of_contestants}) does not match the sum of \
             contestants in first-round races ({no_of_contestants_in_races})"
        )));
    }

    let mut races_by_raceclass: IndexMap<&str, Vec<&IndividualSprintRace>> = IndexMap::new();
    for race in &races {
        races_by_raceclass
            .entry(race.raceclass.as_str())
            .or_default()
            .push(*race);
    }

    let mut start_entries: Vec<StartEntry> = Vec::new();
    for (raceclass_name, races_in_raceclass) in &races_by_raceclass {
        let mut ranking = true;
        let mut ageclasses: Vec<&str> = Vec::new();
        for raceclass in raceclasses.iter().filter(|rc| rc.name == *raceclass_name) {
            ranking = raceclass.ranking;
            ageclasses.extend(raceclass.ageclasses.iter().map(String::as_str));
        }

        let target_round = if ranking {
            format
                .rounds_ranked_classes
                .first()
                .ok_or(StartlistError::MissingProperty("rounds_ranked_classes"))?
        } else {
            format
                .rounds_non_ranked_classes
                .first()
                .ok_or(StartlistError::MissingProperty("rounds_non_ranked_classes"))?
        };
        let target_races: Vec<&IndividualSprintRace> = races_in_raceclass
            .iter()
            .copied()
            .filter(|race| race.round == *target_round)
            .collect();

        start_entries.extend(fill_races(&target_races, &ageclasses, contestants)?);
    }

    Ok((startlist, start_entries))
}
