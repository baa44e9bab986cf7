//! Raceplan generation for Interval Start events.

use chrono::NaiveDateTime;

use crate::models::event::Raceclass;
use crate::models::format::IntervalStartFormat;
use crate::models::race::IntervalStartRace;
use crate::models::raceplan::Raceplan;
use crate::planning::{raceclasses_by_group, required_duration, PlanError};

/// Calculate the raceplan for an Interval Start event: one race per
/// raceclass, started back to back with one interval per contestant.
pub fn calculate_raceplan_interval_start(
    event_id: &str,
    first_start: NaiveDateTime,
    format: &IntervalStartFormat,
    raceclasses: &[Raceclass],
) -> Result<(Raceplan, Vec<IntervalStartRace>), PlanError> {
    let time_between_groups = required_duration(&format.time_between_groups, "time_between_groups")?;
    let intervals = required_duration(&format.intervals, "intervals")?;
    let max_no_of_contestants_in_race = format
        .max_no_of_contestants_in_race
        .ok_or(PlanError::MissingProperty("max_no_of_contestants_in_race"))?;

    let mut raceplan = Raceplan::new(event_id);
    let mut races: Vec<IntervalStartRace> = Vec::new();

    let mut order: u32 = 1;
    let mut no_of_contestants: u32 = 0;
    let mut start_time = first_start;

    for group in raceclasses_by_group(raceclasses) {
        for raceclass in group {
            races.push(IntervalStartRace {
                id: String::new(),
                raceclass: raceclass.name.clone(),
                order,
                start_time,
                no_of_contestants: raceclass.no_of_contestants,
                max_no_of_contestants: max_no_of_contestants_in_race,
                event_id: event_id.to_string(),
                raceplan_id: String::new(),
                start_entries: Vec::new(),
                results: Default::default(),
            });
            // Next raceclass starts one interval after this one's last starter:
            start_time += intervals * raceclass.no_of_contestants as i32;
            no_of_contestants += raceclass.no_of_contestants;
            order += 1;
        }
        // The group gap replaces the trailing interval.
        start_time = start_time - intervals + time_between_groups;
    }

    raceplan.no_of_contestants = no_of_contestants;

    Ok((raceplan, races))
}
