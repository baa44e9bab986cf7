//! Entities served by the external event service.
//!
//! These documents are owned by the event service; we keep the fields the
//! planners need and validate them on use rather than at the wire.

use serde::{Deserialize, Serialize};

/// A competition event.
///
/// Date, time and competition format are optional on the wire; the
/// commands reject events that lack them before planning starts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub competition_format: Option<String>,
    /// ISO date, e.g. "2021-08-31"
    #[serde(default)]
    pub date_of_event: Option<String>,
    /// ISO time, e.g. "09:00:00"
    #[serde(default)]
    pub time_of_event: Option<String>,
    /// IANA timezone name, e.g. "Europe/Oslo"
    #[serde(default)]
    pub timezone: Option<String>,
}

/// A group of contestants that race together, e.g. "J15".
///
/// `group` fixes the program block the raceclass belongs to and `order`
/// its position within that block. Both are validated for consecutive,
/// unique values before a plan is generated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Raceclass {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub ageclasses: Vec<String>,
    #[serde(default)]
    pub event_id: Option<String>,
    pub no_of_contestants: u32,
    #[serde(default)]
    pub group: Option<i32>,
    #[serde(default)]
    pub order: Option<i32>,
    pub ranking: bool,
}

/// A contestant registered in an event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contestant {
    #[serde(default)]
    pub bib: Option<i32>,
    pub ageclass: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub club: String,
}

impl Contestant {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}
