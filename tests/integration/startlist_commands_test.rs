//! Integration tests for the startlist use cases.

use std::sync::Arc;

use raceday::commands::{CommandError, RaceplanCommands, StartlistCommands};
use raceday::services::ServiceError;
use raceday::storage::Store;

use super::mocks::{
    interval_start_contestants, interval_start_event, interval_start_format,
    interval_start_raceclasses, store, AllowAllUsers, MockEventsPort, EVENT_ID, TOKEN,
};

fn events_port() -> Arc<MockEventsPort> {
    Arc::new(MockEventsPort {
        event: interval_start_event(),
        format: interval_start_format(9999),
        raceclasses: interval_start_raceclasses(),
        contestants: interval_start_contestants(),
    })
}

async fn generate_raceplan(store: Arc<raceday::SqliteStore>, events: Arc<MockEventsPort>) {
    RaceplanCommands::new(store, events, Arc::new(AllowAllUsers))
        .generate_raceplan_for_event(TOKEN, EVENT_ID)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_generate_startlist_for_interval_start_event() {
    let store = store();
    let events = events_port();
    generate_raceplan(store.clone(), events.clone()).await;

    let commands = StartlistCommands::new(store.clone(), events, Arc::new(AllowAllUsers));
    let startlist_id = commands
        .generate_startlist_for_event(TOKEN, EVENT_ID)
        .await
        .unwrap();

    let startlist = store.get_startlist_by_id(&startlist_id).await.unwrap();
    assert_eq!(startlist.no_of_contestants, 8);
    assert_eq!(startlist.start_entries.len(), 8);

    // Every race holds its two start entries, 30 seconds apart:
    let races = store.get_races_by_event_id(EVENT_ID).await.unwrap();
    for race in &races {
        assert_eq!(race.start_entries().len(), 2);
        let entries = store.get_start_entries_by_race_id(race.id()).await.unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].starting_position, 1);
        assert_eq!(entries[1].starting_position, 2);
        assert_eq!(
            entries[1].scheduled_start_time - entries[0].scheduled_start_time,
            chrono::Duration::seconds(30)
        );
        // Startlist generation never changes plan-time contestant counts:
        assert_eq!(race.no_of_contestants(), 2);
    }
}

#[tokio::test]
async fn test_generate_startlist_twice_is_rejected() {
    let store = store();
    let events = events_port();
    generate_raceplan(store.clone(), events.clone()).await;

    let commands = StartlistCommands::new(store.clone(), events, Arc::new(AllowAllUsers));
    commands
        .generate_startlist_for_event(TOKEN, EVENT_ID)
        .await
        .unwrap();
    let result = commands.generate_startlist_for_event(TOKEN, EVENT_ID).await;

    assert!(matches!(
        result,
        Err(CommandError::Service(ServiceError::StartlistAlreadyExists(_)))
    ));
}

#[tokio::test]
async fn test_generate_startlist_without_raceplan_is_rejected() {
    let store = store();
    let commands = StartlistCommands::new(store, events_port(), Arc::new(AllowAllUsers));

    let result = commands.generate_startlist_for_event(TOKEN, EVENT_ID).await;
    assert!(matches!(result, Err(CommandError::NoRaceplanInEvent(_))));
}

#[tokio::test]
async fn test_delete_startlist_cascades_and_unlinks_races() {
    let store = store();
    let events = events_port();
    generate_raceplan(store.clone(), events.clone()).await;

    let commands = StartlistCommands::new(store.clone(), events, Arc::new(AllowAllUsers));
    let startlist_id = commands
        .generate_startlist_for_event(TOKEN, EVENT_ID)
        .await
        .unwrap();
    let startlist = store.get_startlist_by_id(&startlist_id).await.unwrap();

    commands.delete_startlist(TOKEN, &startlist_id).await.unwrap();

    assert!(store.get_startlist_by_id(&startlist_id).await.is_err());
    for start_entry_id in &startlist.start_entries {
        assert!(store.get_start_entry_by_id(start_entry_id).await.is_err());
    }
    let races = store.get_races_by_event_id(EVENT_ID).await.unwrap();
    assert!(races.iter().all(|race| race.start_entries().is_empty()));

    // A fresh startlist can be generated again:
    commands
        .generate_startlist_for_event(TOKEN, EVENT_ID)
        .await
        .unwrap();
}
