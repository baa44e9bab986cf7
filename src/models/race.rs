//! Races and their two competition-format variants.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::format::RaceRule;

/// A race in an Interval Start competition: one race per raceclass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntervalStartRace {
    pub id: String,
    pub raceclass: String,
    /// 1-based position in the program, unique per event.
    pub order: u32,
    pub start_time: NaiveDateTime,
    pub no_of_contestants: u32,
    pub max_no_of_contestants: u32,
    pub event_id: String,
    pub raceplan_id: String,
    /// References to the start entries lined up in this race.
    pub start_entries: Vec<String>,
    /// Race result reference per timing point.
    pub results: BTreeMap<String, String>,
}

/// A heat in an Individual Sprint competition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndividualSprintRace {
    pub id: String,
    pub raceclass: String,
    pub order: u32,
    pub start_time: NaiveDateTime,
    pub no_of_contestants: u32,
    pub max_no_of_contestants: u32,
    pub event_id: String,
    pub raceplan_id: String,
    pub start_entries: Vec<String>,
    pub results: BTreeMap<String, String>,
    /// Round the heat belongs to, e.g. "Q", "S", "F" or "R1".
    pub round: String,
    /// Tier within the round, "A" on top.
    pub index: String,
    /// 1-based heat number within (round, index).
    pub heat: u32,
    /// This race's slice of the advancement rules.
    pub rule: RaceRule,
}

/// A race, polymorphic over the competition format.
///
/// The `datatype` discriminator is carried in the persisted form and
/// picks the variant at the store boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "datatype")]
pub enum Race {
    #[serde(rename = "interval_start")]
    IntervalStart(IntervalStartRace),
    #[serde(rename = "individual_sprint")]
    IndividualSprint(IndividualSprintRace),
}

impl Race {
    pub fn id(&self) -> &str {
        match self {
            Race::IntervalStart(r) => &r.id,
            Race::IndividualSprint(r) => &r.id,
        }
    }

    pub fn set_id(&mut self, id: &str) {
        match self {
            Race::IntervalStart(r) => r.id = id.to_string(),
            Race::IndividualSprint(r) => r.id = id.to_string(),
        }
    }

    pub fn raceclass(&self) -> &str {
        match self {
            Race::IntervalStart(r) => &r.raceclass,
            Race::IndividualSprint(r) => &r.raceclass,
        }
    }

    pub fn order(&self) -> u32 {
        match self {
            Race::IntervalStart(r) => r.order,
            Race::IndividualSprint(r) => r.order,
        }
    }

    pub fn start_time(&self) -> NaiveDateTime {
        match self {
            Race::IntervalStart(r) => r.start_time,
            Race::IndividualSprint(r) => r.start_time,
        }
    }

    pub fn no_of_contestants(&self) -> u32 {
        match self {
            Race::IntervalStart(r) => r.no_of_contestants,
            Race::IndividualSprint(r) => r.no_of_contestants,
        }
    }

    pub fn set_no_of_contestants(&mut self, count: u32) {
        match self {
            Race::IntervalStart(r) => r.no_of_contestants = count,
            Race::IndividualSprint(r) => r.no_of_contestants = count,
        }
    }

    pub fn max_no_of_contestants(&self) -> u32 {
        match self {
            Race::IntervalStart(r) => r.max_no_of_contestants,
            Race::IndividualSprint(r) => r.max_no_of_contestants,
        }
    }

    pub fn event_id(&self) -> &str {
        match self {
            Race::IntervalStart(r) => &r.event_id,
            Race::IndividualSprint(r) => &r.event_id,
        }
    }

    pub fn raceplan_id(&self) -> &str {
        match self {
            Race::IntervalStart(r) => &r.raceplan_id,
            Race::IndividualSprint(r) => &r.raceplan_id,
        }
    }

    pub fn set_raceplan_id(&mut self, raceplan_id: &str) {
        match self {
            Race::IntervalStart(r) => r.raceplan_id = raceplan_id.to_string(),
            Race::IndividualSprint(r) => r.raceplan_id = raceplan_id.to_string(),
        }
    }

    pub fn start_entries(&self) -> &Vec<String> {
        match self {
            Race::IntervalStart(r) => &r.start_entries,
            Race::IndividualSprint(r) => &r.start_entries,
        }
    }

    pub fn start_entries_mut(&mut self) -> &mut Vec<String> {
        match self {
            Race::IntervalStart(r) => &mut r.start_entries,
            Race::IndividualSprint(r) => &mut r.start_entries,
        }
    }

    pub fn results(&self) -> &BTreeMap<String, String> {
        match self {
            Race::IntervalStart(r) => &r.results,
            Race::IndividualSprint(r) => &r.results,
        }
    }

    pub fn results_mut(&mut self) -> &mut BTreeMap<String, String> {
        match self {
            Race::IntervalStart(r) => &mut r.results,
            Race::IndividualSprint(r) => &mut r.results,
        }
    }

    pub fn as_individual_sprint(&self) -> Option<&IndividualSprintRace> {
        match self {
            Race::IndividualSprint(r) => Some(r),
            Race::IntervalStart(_) => None,
        }
    }

    pub fn as_interval_start(&self) -> Option<&IntervalStartRace> {
        match self {
            Race::IntervalStart(r) => Some(r),
            Race::IndividualSprint(_) => None,
        }
    }
}
