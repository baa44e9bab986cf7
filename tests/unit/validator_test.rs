//! Unit tests for the raceplan validator.

use std::collections::BTreeMap;

use serde_json::json;

use raceday::models::event::Raceclass;
use raceday::models::format::CompetitionFormat;
use raceday::models::race::{IntervalStartRace, Race};
use raceday::models::raceplan::Raceplan;
use raceday::planning::validate_raceplan;

fn format() -> CompetitionFormat {
    serde_json::from_value(json!({
        "datatype": "interval_start",
        "name": "Interval Start",
        "max_no_of_contestants_in_raceclass": 9999,
        "max_no_of_contestants_in_race": 9999,
        "intervals": "00:00:30",
        "time_between_groups": "00:10:00",
    }))
    .unwrap()
}

fn race(order: u32, start_time: &str, no_of_contestants: u32) -> Race {
    Race::IntervalStart(IntervalStartRace {
        id: format!("race-{order}"),
        raceclass: "J15".to_string(),
        order,
        start_time: start_time.parse().unwrap(),
        no_of_contestants,
        max_no_of_contestants: 9999,
        event_id: "event-1".to_string(),
        raceplan_id: "plan-1".to_string(),
        start_entries: vec![],
        results: Default::default(),
    })
}

fn raceplan(no_of_contestants: u32) -> Raceplan {
    Raceplan {
        id: Some("plan-1".to_string()),
        event_id: "event-1".to_string(),
        races: vec!["race-1".to_string(), "race-2".to_string()],
        no_of_contestants,
    }
}

fn raceclasses(no_of_contestants: u32) -> Vec<Raceclass> {
    vec![Raceclass {
        id: None,
        name: "J15".to_string(),
        ageclasses: vec!["J 15 år".to_string()],
        event_id: Some("event-1".to_string()),
        no_of_contestants,
        group: Some(1),
        order: Some(1),
        ranking: true,
    }]
}

#[test]
fn test_consistent_raceplan_has_no_findings() {
    let races = vec![
        race(1, "2021-08-31T09:00:00", 4),
        race(2, "2021-08-31T09:02:00", 4),
    ];
    let results = validate_raceplan(&raceplan(8), &races, &format(), &raceclasses(8));
    assert!(results.is_empty());
}

#[test]
fn test_non_chronological_start_times_are_flagged() {
    let races = vec![
        race(1, "2021-08-31T09:10:00", 4),
        race(2, "2021-08-31T09:05:00", 4),
    ];
    let results = validate_raceplan(&raceplan(8), &races, &format(), &raceclasses(8));

    assert_eq!(
        results.get(&2),
        Some(&vec!["Start time is not in chronological order.".to_string()])
    );
}

#[test]
fn test_race_without_contestants_is_flagged() {
    let races = vec![
        race(1, "2021-08-31T09:00:00", 8),
        race(2, "2021-08-31T09:04:00", 0),
    ];
    let results = validate_raceplan(&raceplan(8), &races, &format(), &raceclasses(8));

    assert_eq!(
        results.get(&2),
        Some(&vec!["Race has no contestants.".to_string()])
    );
}

#[test]
fn test_contestant_sums_are_cross_checked() {
    let races = vec![
        race(1, "2021-08-31T09:00:00", 4),
        race(2, "2021-08-31T09:02:00", 4),
    ];
    // The plan total disagrees with both the races and the raceclasses:
    let results = validate_raceplan(&raceplan(10), &races, &format(), &raceclasses(8));

    let plan_level = results.get(&0).expect("plan-level findings");
    assert_eq!(plan_level.len(), 2);
    assert!(plan_level[0].contains("sum of contestants in races (8)"));
    assert!(plan_level[1].contains("number of contestants in the raceclasses (8)"));
}

#[test]
fn test_findings_are_keyed_by_race_order() {
    let races = vec![
        race(1, "2021-08-31T09:10:00", 4),
        race(2, "2021-08-31T09:05:00", 0),
    ];
    let results: BTreeMap<u32, Vec<String>> =
        validate_raceplan(&raceplan(8), &races, &format(), &raceclasses(8));

    let findings = results.get(&2).expect("findings for race 2");
    assert_eq!(
        findings,
        &vec![
            "Start time is not in chronological order.".to_string(),
            "Race has no contestants.".to_string(),
        ]
    );
    assert!(results.contains_key(&0));
}
