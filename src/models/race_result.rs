//! Race results accumulated per timing point.

use serde::{Deserialize, Serialize};

/// Publication status of a race result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RaceResultStatus {
    #[serde(rename = "UNOFFICIAL")]
    Unofficial,
    #[serde(rename = "OFFICIAL")]
    Official,
}

impl RaceResultStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RaceResultStatus::Unofficial => "UNOFFICIAL",
            RaceResultStatus::Official => "OFFICIAL",
        }
    }
}

/// The result of a race at one timing point.
///
/// Created lazily on the first time event for the (race, timing point)
/// pair; the ranking sequence holds time-event ids in recorded order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RaceResult {
    pub id: String,
    pub race_id: String,
    pub timing_point: String,
    pub no_of_contestants: u32,
    /// Ordered references to time events, establishing finish order.
    pub ranking_sequence: Vec<String>,
    pub status: RaceResultStatus,
}
