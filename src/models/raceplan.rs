//! The raceplan: an event's ordered program of races.

use serde::{Deserialize, Serialize};

/// A raceplan owns an event exclusively; at most one plan exists per
/// event. It holds references to its races in program order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Raceplan {
    #[serde(default)]
    pub id: Option<String>,
    pub event_id: String,
    /// Ids of every race in this plan, in program order.
    pub races: Vec<String>,
    pub no_of_contestants: u32,
}

impl Raceplan {
    pub fn new(event_id: &str) -> Self {
        Self {
            id: None,
            event_id: event_id.to_string(),
            races: Vec::new(),
            no_of_contestants: 0,
        }
    }
}
