//! Domain model for raceplans, startlists and race results.

pub mod changelog;
pub mod event;
pub mod format;
pub mod race;
pub mod race_result;
pub mod raceplan;
pub mod startlist;
pub mod time_event;

pub use changelog::Changelog;
pub use event::{Contestant, Event, Raceclass};
pub use format::{
    AdvanceRule, CompetitionFormat, IndividualSprintFormat, IntervalStartFormat, RaceConfig,
    RaceRule,
};
pub use race::{IndividualSprintRace, IntervalStartRace, Race};
pub use race_result::{RaceResult, RaceResultStatus};
pub use raceplan::Raceplan;
pub use startlist::{StartEntry, Startlist};
pub use time_event::{TimeEvent, TimeEventStatus};
