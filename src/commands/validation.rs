//! Input validation shared by the commands.

use std::collections::BTreeSet;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::commands::CommandError;
use crate::models::event::{Contestant, Event, Raceclass};
use crate::models::format::CompetitionFormat;
use crate::planning::raceclasses_by_group;

pub(crate) fn check_date(text: &str) -> Result<NaiveDate, CommandError> {
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .map_err(|_| CommandError::InvalidDateFormat(text.to_string()))
}

pub(crate) fn check_time(text: &str) -> Result<NaiveTime, CommandError> {
    NaiveTime::parse_from_str(text, "%H:%M:%S")
        .map_err(|_| CommandError::InvalidTimeFormat(text.to_string()))
}

/// Check that the event can be planned and return its first start time.
pub(crate) fn validate_event(event: &Event) -> Result<NaiveDateTime, CommandError> {
    if event.competition_format.is_none() {
        return Err(CommandError::CompetitionFormatNotSupported(format!(
            "Event {} has no value for competition_format.",
            event.id
        )));
    }

    let date_text = event.date_of_event.as_deref().ok_or_else(|| {
        CommandError::MissingProperty(
            "Event does not have a value for \"date_of_event\".".to_string(),
        )
    })?;
    let date = check_date(date_text)?;

    let time_text = event.time_of_event.as_deref().ok_or_else(|| {
        CommandError::MissingProperty(
            "Event does not have a value for \"time_of_event\".".to_string(),
        )
    })?;
    let time = check_time(time_text)?;

    Ok(NaiveDateTime::new(date, time))
}

/// Check the properties every generator needs on a competition format.
pub(crate) fn validate_competition_format(format: &CompetitionFormat) -> Result<(), CommandError> {
    if format.max_no_of_contestants_in_raceclass().is_none() {
        return Err(CommandError::MissingProperty(format!(
            "Competition format \"{}\" is missing the \"max_no_of_contestants_in_raceclass\" property.",
            format.name()
        )));
    }
    if format.max_no_of_contestants_in_race().is_none() {
        return Err(CommandError::MissingProperty(format!(
            "Competition format \"{}\" is missing the \"max_no_of_contestants_in_race\" property.",
            format.name()
        )));
    }

    if let CompetitionFormat::IntervalStart(format) = format {
        let intervals = format.intervals.as_deref().ok_or_else(|| {
            CommandError::MissingProperty(format!(
                "Competition format \"{}\" is missing the \"intervals\" property.",
                format.name
            ))
        })?;
        check_time(intervals)?;
    }

    Ok(())
}

/// Check group/order/ranking consistency across an event's raceclasses.
pub(crate) fn validate_raceclasses(
    event_id: &str,
    raceclasses: &[Raceclass],
) -> Result<(), CommandError> {
    if raceclasses.is_empty() {
        return Err(CommandError::NoRaceclassesInEvent(event_id.to_string()));
    }

    if raceclasses.iter().any(|rc| rc.group.is_none()) {
        return Err(CommandError::InconsistentValuesInRaceclasses(format!(
            "Raceclasses group values for event {event_id} contain non numeric values."
        )));
    }

    let groups: BTreeSet<i32> = raceclasses.iter().filter_map(|rc| rc.group).collect();
    let consecutive: Vec<i32> = match (groups.first(), groups.last()) {
        (Some(&min), Some(&max)) => (min..=max).collect(),
        _ => Vec::new(),
    };
    if groups.iter().copied().collect::<Vec<i32>>() != consecutive {
        return Err(CommandError::InconsistentValuesInRaceclasses(format!(
            "Raceclasses group values for event {event_id} are not consecutive."
        )));
    }

    if raceclasses.iter().any(|rc| rc.order.is_none()) {
        return Err(CommandError::InconsistentValuesInRaceclasses(format!(
            "Raceclasses order values for event {event_id} contain non numeric values."
        )));
    }

    for group in raceclasses_by_group(raceclasses) {
        let mut orders: Vec<i32> = group.iter().filter_map(|rc| rc.order).collect();
        orders.sort_unstable();

        let unique: BTreeSet<i32> = orders.iter().copied().collect();
        if unique.len() != orders.len() {
            return Err(CommandError::InconsistentValuesInRaceclasses(format!(
                "Raceclasses order values for event {event_id} are not unique inside group."
            )));
        }

        let consecutive: Vec<i32> = match (orders.first(), orders.last()) {
            (Some(&min), Some(&max)) => (min..=max).collect(),
            _ => Vec::new(),
        };
        if orders != consecutive {
            return Err(CommandError::InconsistentValuesInRaceclasses(format!(
                "Raceclasses order values for event {event_id} are not consecutive."
            )));
        }

        if group.iter().any(|rc| rc.ranking != group[0].ranking) {
            return Err(CommandError::InconsistentValuesInRaceclasses(format!(
                "Ranking-value differs in group {}.",
                group[0].group.unwrap_or_default()
            )));
        }
    }

    Ok(())
}

/// Check that contestants carry unique integer bibs.
pub(crate) fn validate_contestants(
    event_id: &str,
    contestants: &[Contestant],
) -> Result<(), CommandError> {
    if contestants.iter().any(|c| c.bib.is_none()) {
        return Err(CommandError::InconsistentValuesInContestants(format!(
            "Contestants bib values for event {event_id} contain non numeric values."
        )));
    }

    let bibs: BTreeSet<i32> = contestants.iter().filter_map(|c| c.bib).collect();
    if bibs.len() != contestants.len() {
        return Err(CommandError::InconsistentValuesInContestants(format!(
            "Contestants bib values for event {event_id} are not unique."
        )));
    }

    Ok(())
}
