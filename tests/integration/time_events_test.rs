//! Integration tests for time event ingest and reconciliation.

use std::sync::Arc;

use raceday::commands::{
    CommandError, RaceplanCommands, StartlistCommands, TimeEventCommands,
};
use raceday::models::time_event::{TimeEvent, TimeEventStatus};
use raceday::services::{RaceResultsService, ServiceError};
use raceday::storage::Store;

use super::mocks::{
    interval_start_contestants, interval_start_event, interval_start_format,
    interval_start_raceclasses, store, AllowAllUsers, MockEventsPort, EVENT_ID, TOKEN,
};

struct Fixture {
    store: Arc<raceday::SqliteStore>,
    commands: TimeEventCommands,
    race_id: String,
}

/// Interval start event, planned and seeded; `race_id` is the first
/// race, holding bibs 1 and 2.
async fn fixture() -> Fixture {
    let store = store();
    let events = Arc::new(MockEventsPort {
        event: interval_start_event(),
        format: interval_start_format(9999),
        raceclasses: interval_start_raceclasses(),
        contestants: interval_start_contestants(),
    });

    RaceplanCommands::new(store.clone(), events.clone(), Arc::new(AllowAllUsers))
        .generate_raceplan_for_event(TOKEN, EVENT_ID)
        .await
        .unwrap();
    StartlistCommands::new(store.clone(), events.clone(), Arc::new(AllowAllUsers))
        .generate_startlist_for_event(TOKEN, EVENT_ID)
        .await
        .unwrap();

    let races = store.get_races_by_event_id(EVENT_ID).await.unwrap();
    let race_id = races[0].id().to_string();

    let commands = TimeEventCommands::new(store.clone(), events, Arc::new(AllowAllUsers));
    Fixture {
        store,
        commands,
        race_id,
    }
}

fn time_event(race_id: &str, bib: i32, timing_point: &str) -> TimeEvent {
    serde_json::from_value(serde_json::json!({
        "bib": bib,
        "event_id": EVENT_ID,
        "timing_point": timing_point,
        "registration_time": "09:03:12",
        "race_id": race_id,
    }))
    .unwrap()
}

#[tokio::test]
async fn test_ingest_creates_race_result_and_links_race() {
    let fixture = fixture().await;

    let stored = fixture
        .commands
        .create_time_event(TOKEN, time_event(&fixture.race_id, 1, "Finish"))
        .await
        .unwrap();

    assert_eq!(stored.status, Some(TimeEventStatus::Ok));
    let time_event_id = stored.id.as_deref().unwrap();

    let results = fixture
        .store
        .get_race_results_by_race_id_and_timing_point(&fixture.race_id, "Finish")
        .await
        .unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].no_of_contestants, 1);
    assert_eq!(results[0].ranking_sequence, [time_event_id]);

    let race = fixture.store.get_race_by_id(&fixture.race_id).await.unwrap();
    assert_eq!(race.results().get("Finish"), Some(&results[0].id));
}

#[tokio::test]
async fn test_ranking_sequence_follows_registration_order() {
    let fixture = fixture().await;

    let first = fixture
        .commands
        .create_time_event(TOKEN, time_event(&fixture.race_id, 2, "Finish"))
        .await
        .unwrap();
    let second = fixture
        .commands
        .create_time_event(TOKEN, time_event(&fixture.race_id, 1, "Finish"))
        .await
        .unwrap();

    let results = fixture
        .store
        .get_race_results_by_race_id_and_timing_point(&fixture.race_id, "Finish")
        .await
        .unwrap();
    assert_eq!(
        results[0].ranking_sequence,
        [first.id.as_deref().unwrap(), second.id.as_deref().unwrap()]
    );
    assert_eq!(results[0].no_of_contestants, 2);
}

#[tokio::test]
async fn test_duplicate_time_event_is_rejected_until_deleted() {
    let fixture = fixture().await;

    let first = fixture
        .commands
        .create_time_event(TOKEN, time_event(&fixture.race_id, 1, "Finish"))
        .await
        .unwrap();

    // A second registration for the same (race, bib, timing point) fails:
    let result = fixture
        .commands
        .create_time_event(TOKEN, time_event(&fixture.race_id, 1, "Finish"))
        .await;
    assert!(matches!(
        result,
        Err(CommandError::Service(ServiceError::TimeEventAlreadyExists { bib: 1, .. }))
    ));

    // Deleting the first also clears it from the ranking sequence:
    let first_id = first.id.as_deref().unwrap();
    fixture.commands.delete_time_event(TOKEN, first_id).await.unwrap();
    let results = fixture
        .store
        .get_race_results_by_race_id_and_timing_point(&fixture.race_id, "Finish")
        .await
        .unwrap();
    assert!(results[0].ranking_sequence.is_empty());
    assert_eq!(results[0].no_of_contestants, 0);

    // And the registration can be taken again:
    let retaken = fixture
        .commands
        .create_time_event(TOKEN, time_event(&fixture.race_id, 1, "Finish"))
        .await
        .unwrap();
    assert_eq!(retaken.status, Some(TimeEventStatus::Ok));
}

#[tokio::test]
async fn test_reconciliation_is_idempotent() {
    let fixture = fixture().await;

    let stored = fixture
        .commands
        .create_time_event(TOKEN, time_event(&fixture.race_id, 1, "Finish"))
        .await
        .unwrap();

    // Replaying the reconciliation must not duplicate the ranking entry:
    let race_results = RaceResultsService::new(fixture.store.clone());
    for _ in 0..3 {
        race_results
            .add_time_event_to_race_result(&stored)
            .await
            .unwrap();
    }

    let results = fixture
        .store
        .get_race_results_by_race_id_and_timing_point(&fixture.race_id, "Finish")
        .await
        .unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].ranking_sequence.len(), 1);
    assert_eq!(results[0].no_of_contestants, 1);
}

#[tokio::test]
async fn test_unknown_bib_is_kept_with_error_status() {
    let fixture = fixture().await;

    let stored = fixture
        .commands
        .create_time_event(TOKEN, time_event(&fixture.race_id, 99, "Finish"))
        .await
        .unwrap();

    assert_eq!(stored.status, Some(TimeEventStatus::Error));
    let changelog = stored.changelog.as_deref().unwrap();
    assert_eq!(changelog.len(), 1);
    assert!(changelog[0].comment.contains("bib 99"));
    assert_eq!(changelog[0].user_id, "raceday");

    // The event is stored, but no race result was written:
    let saved = fixture
        .store
        .get_time_event_by_id(stored.id.as_deref().unwrap())
        .await
        .unwrap();
    assert_eq!(saved.status, Some(TimeEventStatus::Error));
    let results = fixture
        .store
        .get_race_results_by_race_id(&fixture.race_id)
        .await
        .unwrap();
    assert!(results.is_empty());
}

#[tokio::test]
async fn test_missing_race_reference_is_kept_with_error_status() {
    let fixture = fixture().await;

    let mut event = time_event(&fixture.race_id, 1, "Finish");
    event.race_id = None;
    let stored = fixture.commands.create_time_event(TOKEN, event).await.unwrap();
    assert_eq!(stored.status, Some(TimeEventStatus::Error));

    let mut event = time_event("no-such-race", 1, "Finish");
    event.bib = 2;
    let stored = fixture.commands.create_time_event(TOKEN, event).await.unwrap();
    assert_eq!(stored.status, Some(TimeEventStatus::Error));
}

#[tokio::test]
async fn test_template_events_bypass_start_entry_and_uniqueness_checks() {
    let fixture = fixture().await;

    // Bib 99 is not in the race, and the same registration twice is fine:
    for _ in 0..2 {
        let stored = fixture
            .commands
            .create_time_event(TOKEN, time_event(&fixture.race_id, 99, "Template"))
            .await
            .unwrap();
        assert_eq!(stored.status, Some(TimeEventStatus::Ok));
    }

    let results = fixture
        .store
        .get_race_results_by_race_id_and_timing_point(&fixture.race_id, "Template")
        .await
        .unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].ranking_sequence.len(), 2);
}
