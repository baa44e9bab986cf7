//! Time events recorded at timing points along the course.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use super::changelog::Changelog;

/// Processing status of an ingested time event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeEventStatus {
    #[serde(rename = "OK")]
    Ok,
    #[serde(rename = "Error")]
    Error,
}

impl TimeEventStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeEventStatus::Ok => "OK",
            TimeEventStatus::Error => "Error",
        }
    }
}

/// A passing registered at a timing point, e.g. "Start", "Finish" or an
/// intermediate split.
///
/// The timing point "Template" is a sentinel used to seed ranking
/// sequences; it is exempt from start-entry checks and from the
/// per-(race, bib, timing point) uniqueness rule. Once ingested, only
/// `status` and `changelog` change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeEvent {
    #[serde(default)]
    pub id: Option<String>,
    pub bib: i32,
    pub event_id: String,
    pub timing_point: String,
    pub registration_time: NaiveTime,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub club: Option<String>,
    #[serde(default)]
    pub race: Option<String>,
    #[serde(default)]
    pub race_id: Option<String>,
    #[serde(default)]
    pub rank: Option<u32>,
    #[serde(default)]
    pub next_race: Option<String>,
    #[serde(default)]
    pub next_race_id: Option<String>,
    #[serde(default)]
    pub next_race_position: Option<u32>,
    #[serde(default)]
    pub status: Option<TimeEventStatus>,
    #[serde(default)]
    pub changelog: Option<Vec<Changelog>>,
}

impl TimeEvent {
    /// Whether this event carries the "Template" sentinel timing point.
    pub fn is_template(&self) -> bool {
        self.timing_point.eq_ignore_ascii_case("Template")
    }
}
