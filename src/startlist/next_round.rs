//! Start entries for the second round of non-ranked classes.
//!
//! Non-ranked classes race every round with the full field, so their
//! second round can be seeded from the contestant list as well. Ranked
//! classes advance on results and are never seeded here.

use indexmap::IndexMap;

use crate::models::event::{Contestant, Raceclass};
use crate::models::format::IndividualSprintFormat;
use crate::models::race::{IndividualSprintRace, Race};
use crate::models::startlist::StartEntry;
use crate::startlist::{fill_races, sprint_races, StartlistError};

/// Create start entries for the second non-ranked round.
///
/// Returns no entries when the format does not declare a second
/// non-ranked round, or when no non-ranked races exist in it.
pub fn create_next_round_start_entries(
    format: &IndividualSprintFormat,
    raceclasses: &[Raceclass],
    races: &[Race],
    contestants: &[Contestant],
) -> Result<Vec<StartEntry>, StartlistError> {
    let races = sprint_races(races)?;

    let Some(second_round) = format.rounds_non_ranked_classes.get(1) else {
        return Ok(Vec::new());
    };

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
        if ranking {
            continue;
        }

        let target_races: Vec<&IndividualSprintRace> = races_in_raceclass
            .iter()
            .copied()
            .filter(|race| race.round == *second_round)
            .collect();
        if target_races.is_empty() {
            continue;
        }

        start_entries.extend(fill_races(&target_races, &ageclasses, contestants)?);
    }

    Ok(start_entries)
}
