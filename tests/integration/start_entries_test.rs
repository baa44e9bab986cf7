//! Integration tests for adding and removing start entries.

use std::sync::Arc;

use raceday::commands::{
    CommandError, RaceplanCommands, StartEntryCommands, StartlistCommands,
};
use raceday::models::startlist::StartEntry;
use raceday::storage::Store;

use super::mocks::{
    interval_start_contestants, interval_start_event, interval_start_format,
    interval_start_raceclasses, sprint_contestants, sprint_event, sprint_format,
    sprint_raceclasses, store, AllowAllUsers, MockEventsPort, EVENT_ID, TOKEN,
};

struct Fixture {
    store: Arc<raceday::SqliteStore>,
    commands: StartEntryCommands,
    startlist_id: String,
}

/// Interval start event with races capped at two contestants, planned
/// and seeded: every race is full from the start.
async fn fixture() -> Fixture {
    let store = store();
    let events = Arc::new(MockEventsPort {
        event: interval_start_event(),
        format: interval_start_format(2),
        raceclasses: interval_start_raceclasses(),
        contestants: interval_start_contestants(),
    });

    RaceplanCommands::new(store.clone(), events.clone(), Arc::new(AllowAllUsers))
        .generate_raceplan_for_event(TOKEN, EVENT_ID)
        .await
        .unwrap();
    let startlist_id =
        StartlistCommands::new(store.clone(), events.clone(), Arc::new(AllowAllUsers))
            .generate_startlist_for_event(TOKEN, EVENT_ID)
            .await
            .unwrap();

    let commands = StartEntryCommands::new(store.clone(), events, Arc::new(AllowAllUsers));
    Fixture {
        store,
        commands,
        startlist_id,
    }
}

fn new_entry(fixture: &Fixture, race_id: &str, bib: i32, starting_position: u32) -> StartEntry {
    StartEntry {
        id: None,
        startlist_id: fixture.startlist_id.clone(),
        race_id: race_id.to_string(),
        bib,
        starting_position,
        scheduled_start_time: "2021-08-31T09:00:00".parse().unwrap(),
        name: "Late Entry".to_string(),
        club: "Kjelsås IL".to_string(),
        status: None,
        changelog: None,
    }
}

#[tokio::test]
async fn test_add_to_full_race_is_rejected() {
    let fixture = fixture().await;
    let races = fixture.store.get_races_by_event_id(EVENT_ID).await.unwrap();
    let race = &races[0];
    assert_eq!(race.start_entries().len() as u32, race.max_no_of_contestants());

    let result = fixture
        .commands
        .create_start_entry(TOKEN, new_entry(&fixture, race.id(), 99, 3))
        .await;
    assert!(matches!(result, Err(CommandError::RaceFull)));
}

#[tokio::test]
async fn test_duplicate_bib_and_position_are_rejected() {
    let fixture = fixture().await;
    let races = fixture.store.get_races_by_event_id(EVENT_ID).await.unwrap();
    let race_id = races[0].id().to_string();

    // Make room by removing the entry at position 2 (bib 2):
    let entries = fixture
        .store
        .get_start_entries_by_race_id(&race_id)
        .await
        .unwrap();
    let removed = entries[1].clone();
    fixture
        .commands
        .delete_start_entry(TOKEN, removed.id.as_deref().unwrap())
        .await
        .unwrap();

    let result = fixture
        .commands
        .create_start_entry(TOKEN, new_entry(&fixture, &race_id, 1, 2))
        .await;
    assert!(matches!(result, Err(CommandError::BibAlreadyInRace(1))));

    let result = fixture
        .commands
        .create_start_entry(TOKEN, new_entry(&fixture, &race_id, 99, 1))
        .await;
    assert!(matches!(
        result,
        Err(CommandError::StartingPositionTaken(1))
    ));
}

#[tokio::test]
async fn test_delete_then_add_restores_counts() {
    let fixture = fixture().await;
    let races = fixture.store.get_races_by_event_id(EVENT_ID).await.unwrap();
    let race_id = races[0].id().to_string();
    let race_before = &races[0];
    let startlist_before = fixture
        .store
        .get_startlist_by_id(&fixture.startlist_id)
        .await
        .unwrap();

    let entries = fixture
        .store
        .get_start_entries_by_race_id(&race_id)
        .await
        .unwrap();
    let removed = entries[1].clone();
    fixture
        .commands
        .delete_start_entry(TOKEN, removed.id.as_deref().unwrap())
        .await
        .unwrap();

    // Counts drop by one everywhere:
    let race = fixture.store.get_race_by_id(&race_id).await.unwrap();
    assert_eq!(race.no_of_contestants(), race_before.no_of_contestants() - 1);
    assert_eq!(race.start_entries().len(), 1);
    let startlist = fixture
        .store
        .get_startlist_by_id(&fixture.startlist_id)
        .await
        .unwrap();
    assert_eq!(
        startlist.no_of_contestants,
        startlist_before.no_of_contestants - 1
    );

    // Re-adding the contestant restores them:
    fixture
        .commands
        .create_start_entry(
            TOKEN,
            new_entry(&fixture, &race_id, removed.bib, removed.starting_position),
        )
        .await
        .unwrap();

    let race = fixture.store.get_race_by_id(&race_id).await.unwrap();
    assert_eq!(race.no_of_contestants(), race_before.no_of_contestants());
    assert_eq!(race.start_entries().len(), 2);
    let startlist = fixture
        .store
        .get_startlist_by_id(&fixture.startlist_id)
        .await
        .unwrap();
    assert_eq!(startlist.no_of_contestants, startlist_before.no_of_contestants);
}

#[tokio::test]
async fn test_first_round_entries_adjust_the_raceplan_count() {
    let store = store();
    let events = Arc::new(MockEventsPort {
        event: sprint_event(),
        format: sprint_format(),
        raceclasses: sprint_raceclasses(),
        contestants: sprint_contestants(),
    });

    RaceplanCommands::new(store.clone(), events.clone(), Arc::new(AllowAllUsers))
        .generate_raceplan_for_event(TOKEN, EVENT_ID)
        .await
        .unwrap();
    StartlistCommands::new(store.clone(), events.clone(), Arc::new(AllowAllUsers))
        .generate_startlist_for_event(TOKEN, EVENT_ID)
        .await
        .unwrap();
    let commands = StartEntryCommands::new(store.clone(), events, Arc::new(AllowAllUsers));

    let raceplan = store.get_raceplans_by_event_id(EVENT_ID).await.unwrap().remove(0);
    assert_eq!(raceplan.no_of_contestants, 27);

    // The first race is a quarterfinal; removing one of its entries
    // shrinks the plan, re-adding restores it.
    let quarterfinal_id = raceplan.races[0].clone();
    let entries = store
        .get_start_entries_by_race_id(&quarterfinal_id)
        .await
        .unwrap();
    let removed = entries[0].clone();
    commands
        .delete_start_entry(TOKEN, removed.id.as_deref().unwrap())
        .await
        .unwrap();

    let raceplan_id = raceplan.id.as_deref().unwrap();
    let raceplan = store.get_raceplan_by_id(raceplan_id).await.unwrap();
    assert_eq!(raceplan.no_of_contestants, 26);

    let mut readded = removed.clone();
    readded.id = None;
    commands.create_start_entry(TOKEN, readded).await.unwrap();
    let raceplan = store.get_raceplan_by_id(raceplan_id).await.unwrap();
    assert_eq!(raceplan.no_of_contestants, 27);
}

#[tokio::test]
async fn test_delete_missing_entry_is_rejected() {
    let fixture = fixture().await;
    let result = fixture
        .commands
        .delete_start_entry(TOKEN, "no-such-entry")
        .await;
    assert!(matches!(result, Err(CommandError::Service(_))));
}
