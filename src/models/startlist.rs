//! Startlists and start entries.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::changelog::Changelog;

/// A contestant's assignment to a starting position in a race.
///
/// (race_id, starting_position) and (race_id, bib) are unique.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StartEntry {
    #[serde(default)]
    pub id: Option<String>,
    pub startlist_id: String,
    pub race_id: String,
    pub bib: i32,
    pub starting_position: u32,
    pub scheduled_start_time: NaiveDateTime,
    pub name: String,
    pub club: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub changelog: Option<Vec<Changelog>>,
}

/// The startlist of an event; at most one exists per event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Startlist {
    #[serde(default)]
    pub id: Option<String>,
    pub event_id: String,
    pub no_of_contestants: u32,
    /// Ids of every start entry in this startlist.
    pub start_entries: Vec<String>,
}
