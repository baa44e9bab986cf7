//! Mock ports and shared fixtures for the command tests.

use std::sync::{Arc, Once};

use async_trait::async_trait;
use serde_json::json;

use raceday::integrations::events::{EventsError, EventsPort};
use raceday::integrations::users::{UsersError, UsersPort};
use raceday::models::event::{Contestant, Event, Raceclass};
use raceday::models::format::CompetitionFormat;
use raceday::storage::SqliteStore;

pub const EVENT_ID: &str = "290e70d5-0933-4af0-bb53-1d705ba7eb95";
pub const TOKEN: &str = "test-token";

/// Events port serving fixture data.
pub struct MockEventsPort {
    pub event: Event,
    pub format: CompetitionFormat,
    pub raceclasses: Vec<Raceclass>,
    pub contestants: Vec<Contestant>,
}

#[async_trait]
impl EventsPort for MockEventsPort {
    async fn get_event(&self, _token: &str, event_id: &str) -> Result<Event, EventsError> {
        if event_id == self.event.id {
            Ok(self.event.clone())
        } else {
            Err(EventsError::EventNotFound(event_id.to_string()))
        }
    }

    async fn get_competition_format(
        &self,
        _token: &str,
        _event_id: &str,
        _name: Option<&str>,
    ) -> Result<CompetitionFormat, EventsError> {
        Ok(self.format.clone())
    }

    async fn get_raceclasses(
        &self,
        _token: &str,
        event_id: &str,
    ) -> Result<Vec<Raceclass>, EventsError> {
        if self.raceclasses.is_empty() {
            return Err(EventsError::RaceclassesNotFound(event_id.to_string()));
        }
        Ok(self.raceclasses.clone())
    }

    async fn get_contestants(
        &self,
        _token: &str,
        event_id: &str,
    ) -> Result<Vec<Contestant>, EventsError> {
        if self.contestants.is_empty() {
            return Err(EventsError::ContestantsNotFound(event_id.to_string()));
        }
        Ok(self.contestants.clone())
    }
}

/// Users port that lets everything through.
pub struct AllowAllUsers;

#[async_trait]
impl UsersPort for AllowAllUsers {
    async fn authorize(&self, _token: Option<&str>, _roles: &[&str]) -> Result<(), UsersError> {
        Ok(())
    }
}

/// Users port that refuses everything.
pub struct DenyAllUsers;

#[async_trait]
impl UsersPort for DenyAllUsers {
    async fn authorize(&self, _token: Option<&str>, _roles: &[&str]) -> Result<(), UsersError> {
        Err(UsersError::Forbidden)
    }
}

static TRACING: Once = Once::new();

/// Install a tracing subscriber once; control verbosity with RUST_LOG.
fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

pub fn store() -> Arc<SqliteStore> {
    init_tracing();
    Arc::new(SqliteStore::open_in_memory().expect("Failed to create store"))
}

pub fn interval_start_event() -> Event {
    serde_json::from_value(json!({
        "id": EVENT_ID,
        "name": "Oslo Skagen renn",
        "competition_format": "Interval Start",
        "date_of_event": "2021-08-31",
        "time_of_event": "09:00:00",
        "timezone": "Europe/Oslo",
    }))
    .unwrap()
}

pub fn interval_start_format(max_no_of_contestants_in_race: u32) -> CompetitionFormat {
    serde_json::from_value(json!({
        "datatype": "interval_start",
        "name": "Interval Start",
        "max_no_of_contestants_in_raceclass": 9999,
        "max_no_of_contestants_in_race": max_no_of_contestants_in_race,
        "intervals": "00:00:30",
        "time_between_groups": "00:10:00",
    }))
    .unwrap()
}

/// Four raceclasses with two contestants each, split over two groups.
pub fn interval_start_raceclasses() -> Vec<Raceclass> {
    serde_json::from_value(json!([
        {"name": "J15", "ageclasses": ["J 15 år"], "event_id": EVENT_ID,
         "no_of_contestants": 2, "group": 1, "order": 1, "ranking": true},
        {"name": "G15", "ageclasses": ["G 15 år"], "event_id": EVENT_ID,
         "no_of_contestants": 2, "group": 1, "order": 2, "ranking": true},
        {"name": "J16", "ageclasses": ["J 16 år"], "event_id": EVENT_ID,
         "no_of_contestants": 2, "group": 2, "order": 1, "ranking": true},
        {"name": "G16", "ageclasses": ["G 16 år"], "event_id": EVENT_ID,
         "no_of_contestants": 2, "group": 2, "order": 2, "ranking": true},
    ]))
    .unwrap()
}

pub fn interval_start_contestants() -> Vec<Contestant> {
    let ageclasses = ["J 15 år", "J 15 år", "G 15 år", "G 15 år", "J 16 år", "J 16 år", "G 16 år", "G 16 år"];
    ageclasses
        .iter()
        .enumerate()
        .map(|(i, ageclass)| Contestant {
            bib: Some(i as i32 + 1),
            ageclass: ageclass.to_string(),
            first_name: format!("First{}", i + 1),
            last_name: format!("Last{}", i + 1),
            club: "Lyn Ski".to_string(),
        })
        .collect()
}

pub fn sprint_event() -> Event {
    serde_json::from_value(json!({
        "id": EVENT_ID,
        "name": "Oslo Skagen sprint",
        "competition_format": "Individual Sprint",
        "date_of_event": "2021-09-29",
        "time_of_event": "09:00:00",
        "timezone": "Europe/Oslo",
    }))
    .unwrap()
}

/// Ranked sprint format with the standard Q/S/F configuration.
pub fn sprint_format() -> CompetitionFormat {
    serde_json::from_value(json!({
        "datatype": "individual_sprint",
        "name": "Individual Sprint",
        "max_no_of_contestants_in_raceclass": 80,
        "max_no_of_contestants_in_race": 10,
        "time_between_groups": "00:15:00",
        "time_between_rounds": "00:10:00",
        "time_between_heats": "00:02:30",
        "rounds_ranked_classes": ["Q", "S", "F"],
        "rounds_non_ranked_classes": ["R1", "R2"],
        "race_config_ranked": [
            {
                "max_no_of_contestants": 80,
                "rounds": ["Q", "S", "F"],
                "no_of_heats": {
                    "Q": {"A": 4},
                    "S": {"A": 2, "C": 2},
                    "F": {"A": 1, "B": 1, "C": 1}
                },
                "from_to": {
                    "Q": {"A": {"S": {"A": 4, "C": "REST"}}},
                    "S": {"A": {"F": {"A": 4, "B": "REST"}}, "C": {"F": {"C": 4}}}
                }
            }
        ],
        "race_config_non_ranked": []
    }))
    .unwrap()
}

pub fn sprint_raceclasses() -> Vec<Raceclass> {
    serde_json::from_value(json!([
        {"name": "J15", "ageclasses": ["J 15 år"], "event_id": EVENT_ID,
         "no_of_contestants": 27, "group": 1, "order": 1, "ranking": true},
    ]))
    .unwrap()
}

pub fn sprint_contestants() -> Vec<Contestant> {
    (1..=27)
        .map(|bib| Contestant {
            bib: Some(bib),
            ageclass: "J 15 år".to_string(),
            first_name: format!("First{bib}"),
            last_name: format!("Last{bib}"),
            club: "Lyn Ski".to_string(),
        })
        .collect()
}
