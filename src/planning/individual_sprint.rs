//! Raceplan generation for Individual Sprint events.

use chrono::NaiveDateTime;
use indexmap::IndexMap;

use crate::models::event::Raceclass;
use crate::models::format::{AdvanceRule, IndividualSprintFormat};
use crate::models::race::IndividualSprintRace;
use crate::models::raceplan::Raceplan;
use crate::planning::config::ConfigMatrix;
use crate::planning::{raceclasses_by_group, required_duration, PlanError};

/// Calculate the raceplan for an Individual Sprint event.
///
/// Emits heats per round, per raceclass in group order, per index in
/// reverse tier order (so the C final runs before the A final), then
/// propagates contestant counts from each raceclass's first round
/// through the advancement rules.
pub fn calculate_raceplan_individual_sprint(
    event_id: &str,
    first_start: NaiveDateTime,
    format: &IndividualSprintFormat,
    raceclasses: &[Raceclass],
) -> Result<(Raceplan, Vec<IndividualSprintRace>), PlanError> {
    let time_between_groups = required_duration(&format.time_between_groups, "time_between_groups")?;
    let time_between_rounds = required_duration(&format.time_between_rounds, "time_between_rounds")?;
    let time_between_heats = required_duration(&format.time_between_heats, "time_between_heats")?;
    let max_no_of_contestants_in_race = format
        .max_no_of_contestants_in_race
        .ok_or(PlanError::MissingProperty("max_no_of_contestants_in_race"))?;

    let mut raceplan = Raceplan::new(event_id);
    raceplan.no_of_contestants = raceclasses.iter().map(|rc| rc.no_of_contestants).sum();

    let groups = raceclasses_by_group(raceclasses);
    let mut races: Vec<IndividualSprintRace> = Vec::new();
    let mut order: u32 = 1;
    let mut start_time = first_start;

    for group in &groups {
        let matrix = ConfigMatrix::for_group(format, group)?;
        for round in matrix.rounds() {
            let mut heats_in_round = 0;
            for raceclass in group {
                for index in matrix.race_indexes(raceclass, round)?.iter().rev() {
                    for heat in 1..=matrix.no_of_heats(raceclass, round, index)? {
                        races.push(IndividualSprintRace {
                            id: String::new(),
                            raceclass: raceclass.name.clone(),
                            order,
                            start_time,
                            no_of_contestants: 0,
                            max_no_of_contestants: max_no_of_contestants_in_race,
                            event_id: event_id.to_string(),
                            raceplan_id: String::new(),
                            start_entries: Vec::new(),
                            results: Default::default(),
                            round: round.clone(),
                            index: (*index).to_string(),
                            heat,
                            rule: matrix.rule_from_to(raceclass, round, index)?,
                        });
                        order += 1;
                        start_time += time_between_heats;
                        heats_in_round += 1;
                    }
                }
            }
            // The pause to the next round replaces the last heat gap.
            if heats_in_round > 0 {
                start_time = start_time - time_between_heats + time_between_rounds;
            }
        }
        start_time += time_between_groups;
    }

    // With the program in place, fill in contestant counts per race:
    for group in &groups {
        let matrix = ConfigMatrix::for_group(format, group)?;
        for raceclass in group {
            assign_contestants_in_raceclass(&matrix, raceclass, &mut races)?;
        }
    }

    Ok((raceplan, races))
}

/// Seed the raceclass's first (round, index) with all its contestants
/// and push the counts through each race's advancement rule.
fn assign_contestants_in_raceclass(
    matrix: &ConfigMatrix<'_>,
    raceclass: &Raceclass,
    races: &mut [IndividualSprintRace],
) -> Result<(), PlanError> {
    let rounds = matrix.rounds_in_raceclass(raceclass)?;

    let mut counts: IndexMap<String, IndexMap<String, u32>> = IndexMap::new();
    for round in rounds {
        let indexes = matrix.race_indexes(raceclass, round)?;
        counts.insert(
            round.clone(),
            indexes.iter().map(|index| (index.to_string(), 0)).collect(),
        );
    }

    if let Some(first_round) = rounds.first() {
        if let Some(first_index) = matrix.race_indexes(raceclass, first_round)?.first() {
            counts[first_round.as_str()][*first_index] = raceclass.no_of_contestants;
        }
    }

    for round in rounds {
        for index in matrix.race_indexes(raceclass, round)? {
            let count = counts[round.as_str()][index];
            distribute_across_heats(raceclass, round, index, count, races)?;
        }

        for race in races
            .iter()
            .filter(|race| race.raceclass == raceclass.name && race.round == *round)
        {
            let mut left = race.no_of_contestants;
            for (target_round, targets) in &race.rule {
                for (target_index, rule) in targets {
                    let target = counts
                        .get_mut(target_round)
                        .and_then(|indexes| indexes.get_mut(target_index))
                        .ok_or_else(|| PlanError::UnknownAdvancementTarget {
                            round: target_round.clone(),
                            index: target_index.clone(),
                        })?;
                    match rule {
                        AdvanceRule::All | AdvanceRule::Rest => {
                            *target += left;
                            left = 0;
                        }
                        // An over-sized quota advances only what is left.
                        AdvanceRule::Top(quota) if *quota > left => {
                            *target += left;
                        }
                        AdvanceRule::Top(quota) => {
                            *target += quota;
                            left -= quota;
                        }
                    }
                }
            }
        }
    }

    Ok(())
}

/// Smooth a (round, index) contestant count across its heats: the first
/// `remainder` heats take one extra.
fn distribute_across_heats(
    raceclass: &Raceclass,
    round: &str,
    index: &str,
    no_of_contestants: u32,
    races: &mut [IndividualSprintRace],
) -> Result<(), PlanError> {
    let no_of_races = races
        .iter()
        .filter(|race| {
            race.raceclass == raceclass.name && race.round == round && race.index == index
        })
        .count() as u32;
    if no_of_races == 0 {
        return Ok(());
    }

    let quotient = no_of_contestants / no_of_races;
    let remainder = no_of_contestants % no_of_races;

    for race in races.iter_mut().filter(|race| {
        race.raceclass == raceclass.name && race.round == round && race.index == index
    }) {
        race.no_of_contestants = if race.heat <= remainder {
            quotient + 1
        } else {
            quotient
        };

        if race.no_of_contestants > race.max_no_of_contestants {
            return Err(PlanError::TooManyContestantsInRace {
                order: race.order,
                count: race.no_of_contestants,
            });
        }
    }

    Ok(())
}
