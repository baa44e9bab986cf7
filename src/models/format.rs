//! Competition format configuration.
//!
//! A format is served per event (or globally by name) by the event
//! service and drives both raceplan generators. The Individual Sprint
//! variant carries the race configuration matrix: one row per contestant
//! capacity bracket, describing rounds, heats per (round, index) and the
//! advancement rules between them.

use chrono::{Duration, NaiveTime, Timelike};
use indexmap::IndexMap;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// How finishers of a race advance to a downstream (round, index).
///
/// An integer advances the first N finishers; `All` and `Rest` both send
/// whatever remains in the race at plan time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvanceRule {
    Top(u32),
    All,
    Rest,
}

impl Serialize for AdvanceRule {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            AdvanceRule::Top(n) => serializer.serialize_u32(*n),
            AdvanceRule::All => serializer.serialize_str("ALL"),
            AdvanceRule::Rest => serializer.serialize_str("REST"),
        }
    }
}

impl<'de> Deserialize<'de> for AdvanceRule {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Count(u32),
            Keyword(String),
        }
        match Raw::deserialize(deserializer)? {
            Raw::Count(n) => Ok(AdvanceRule::Top(n)),
            Raw::Keyword(k) if k == "ALL" => Ok(AdvanceRule::All),
            Raw::Keyword(k) if k == "REST" => Ok(AdvanceRule::Rest),
            Raw::Keyword(k) => Err(D::Error::custom(format!("unknown advancement rule: {k}"))),
        }
    }
}

/// Advancement targets of a single race: target round -> target index -> rule.
///
/// Insertion order is meaningful: rules are applied in declared order.
pub type RaceRule = IndexMap<String, IndexMap<String, AdvanceRule>>;

/// One row of the race configuration matrix.
///
/// The row applies to raceclasses with up to `max_no_of_contestants`
/// contestants. The key order of `no_of_heats[round]` is the tier order
/// (A on top); races are emitted per round in reverse of that order so
/// the lowest final runs first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RaceConfig {
    pub max_no_of_contestants: u32,
    pub rounds: Vec<String>,
    pub no_of_heats: IndexMap<String, IndexMap<String, u32>>,
    pub from_to: IndexMap<String, IndexMap<String, RaceRule>>,
}

/// Interval Start format configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntervalStartFormat {
    pub name: String,
    #[serde(default)]
    pub max_no_of_contestants_in_raceclass: Option<u32>,
    #[serde(default)]
    pub max_no_of_contestants_in_race: Option<u32>,
    /// Start interval between contestants, "HH:MM:SS".
    #[serde(default)]
    pub intervals: Option<String>,
    #[serde(default)]
    pub time_between_groups: Option<String>,
}

/// Individual Sprint format configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndividualSprintFormat {
    pub name: String,
    #[serde(default)]
    pub max_no_of_contestants_in_raceclass: Option<u32>,
    #[serde(default)]
    pub max_no_of_contestants_in_race: Option<u32>,
    #[serde(default)]
    pub time_between_groups: Option<String>,
    #[serde(default)]
    pub time_between_rounds: Option<String>,
    #[serde(default)]
    pub time_between_heats: Option<String>,
    /// Rounds for ranked raceclasses, e.g. ["Q", "S", "F"].
    #[serde(default)]
    pub rounds_ranked_classes: Vec<String>,
    /// Rounds for non-ranked raceclasses, e.g. ["R1", "R2"].
    #[serde(default)]
    pub rounds_non_ranked_classes: Vec<String>,
    #[serde(default)]
    pub race_config_ranked: Option<Vec<RaceConfig>>,
    #[serde(default)]
    pub race_config_non_ranked: Option<Vec<RaceConfig>>,
}

/// The two supported competition formats.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "datatype")]
pub enum CompetitionFormat {
    #[serde(rename = "interval_start")]
    IntervalStart(IntervalStartFormat),
    #[serde(rename = "individual_sprint")]
    IndividualSprint(IndividualSprintFormat),
}

impl CompetitionFormat {
    pub fn name(&self) -> &str {
        match self {
            CompetitionFormat::IntervalStart(f) => &f.name,
            CompetitionFormat::IndividualSprint(f) => &f.name,
        }
    }

    pub fn max_no_of_contestants_in_raceclass(&self) -> Option<u32> {
        match self {
            CompetitionFormat::IntervalStart(f) => f.max_no_of_contestants_in_raceclass,
            CompetitionFormat::IndividualSprint(f) => f.max_no_of_contestants_in_raceclass,
        }
    }

    pub fn max_no_of_contestants_in_race(&self) -> Option<u32> {
        match self {
            CompetitionFormat::IntervalStart(f) => f.max_no_of_contestants_in_race,
            CompetitionFormat::IndividualSprint(f) => f.max_no_of_contestants_in_race,
        }
    }
}

/// Parse a "HH:MM:SS" pause or interval into a duration.
pub fn duration_from_hms(text: &str) -> Result<Duration, chrono::ParseError> {
    let time = NaiveTime::parse_from_str(text, "%H:%M:%S")?;
    Ok(Duration::seconds(i64::from(time.num_seconds_from_midnight())))
}
