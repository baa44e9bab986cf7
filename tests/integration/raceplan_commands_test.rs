//! Integration tests for the raceplan use cases.

use std::sync::Arc;

use raceday::commands::{CommandError, RaceplanCommands};
use raceday::integrations::users::UsersError;
use raceday::services::ServiceError;
use raceday::storage::Store;

use super::mocks::{
    interval_start_contestants, interval_start_event, interval_start_format,
    interval_start_raceclasses, sprint_contestants, sprint_event, sprint_format,
    sprint_raceclasses, store, AllowAllUsers, DenyAllUsers, MockEventsPort, EVENT_ID, TOKEN,
};

fn interval_start_events_port() -> Arc<MockEventsPort> {
    Arc::new(MockEventsPort {
        event: interval_start_event(),
        format: interval_start_format(9999),
        raceclasses: interval_start_raceclasses(),
        contestants: interval_start_contestants(),
    })
}

fn sprint_events_port() -> Arc<MockEventsPort> {
    Arc::new(MockEventsPort {
        event: sprint_event(),
        format: sprint_format(),
        raceclasses: sprint_raceclasses(),
        contestants: sprint_contestants(),
    })
}

#[tokio::test]
async fn test_generate_raceplan_for_interval_start_event() {
    let store = store();
    let commands = RaceplanCommands::new(
        store.clone(),
        interval_start_events_port(),
        Arc::new(AllowAllUsers),
    );

    let raceplan_id = commands
        .generate_raceplan_for_event(TOKEN, EVENT_ID)
        .await
        .unwrap();

    let raceplan = store.get_raceplan_by_id(&raceplan_id).await.unwrap();
    assert_eq!(raceplan.event_id, EVENT_ID);
    assert_eq!(raceplan.no_of_contestants, 8);
    assert_eq!(raceplan.races.len(), 4);

    let races = store.get_races_by_raceplan_id(&raceplan_id).await.unwrap();
    assert_eq!(races.len(), 4);
    let stored_ids: Vec<String> = races.iter().map(|race| race.id().to_string()).collect();
    assert_eq!(raceplan.races, stored_ids);
    assert!(races.iter().all(|race| race.raceplan_id() == raceplan_id));

    let start_times: Vec<String> = races
        .iter()
        .map(|race| race.start_time().format("%H:%M:%S").to_string())
        .collect();
    assert_eq!(start_times, ["09:00:00", "09:01:00", "09:11:30", "09:12:30"]);
}

#[tokio::test]
async fn test_generate_raceplan_twice_is_rejected() {
    let store = store();
    let commands = RaceplanCommands::new(
        store.clone(),
        interval_start_events_port(),
        Arc::new(AllowAllUsers),
    );

    commands
        .generate_raceplan_for_event(TOKEN, EVENT_ID)
        .await
        .unwrap();
    let result = commands.generate_raceplan_for_event(TOKEN, EVENT_ID).await;

    assert!(matches!(
        result,
        Err(CommandError::Service(ServiceError::RaceplanAlreadyExists(_)))
    ));
}

#[tokio::test]
async fn test_generated_sprint_raceplan_passes_validation() {
    let store = store();
    let events = sprint_events_port();
    let commands = RaceplanCommands::new(store.clone(), events, Arc::new(AllowAllUsers));

    let raceplan_id = commands
        .generate_raceplan_for_event(TOKEN, EVENT_ID)
        .await
        .unwrap();

    let raceplan = store.get_raceplan_by_id(&raceplan_id).await.unwrap();
    assert_eq!(raceplan.races.len(), 11);
    assert_eq!(raceplan.no_of_contestants, 27);

    let findings = commands
        .validate_raceplan_for_event(TOKEN, &raceplan)
        .await
        .unwrap();
    assert!(findings.is_empty(), "unexpected findings: {findings:?}");

    // Race orders form a 1..=n permutation:
    let races = store.get_races_by_raceplan_id(&raceplan_id).await.unwrap();
    let orders: Vec<u32> = races.iter().map(|race| race.order()).collect();
    assert_eq!(orders, (1..=11).collect::<Vec<u32>>());
}

#[tokio::test]
async fn test_delete_raceplan_cascades_to_races() {
    let store = store();
    let commands = RaceplanCommands::new(
        store.clone(),
        interval_start_events_port(),
        Arc::new(AllowAllUsers),
    );

    let raceplan_id = commands
        .generate_raceplan_for_event(TOKEN, EVENT_ID)
        .await
        .unwrap();
    commands.delete_raceplan(TOKEN, &raceplan_id).await.unwrap();

    assert!(store.get_raceplan_by_id(&raceplan_id).await.is_err());
    assert!(store
        .get_races_by_raceplan_id(&raceplan_id)
        .await
        .unwrap()
        .is_empty());

    // With the plan gone a new one can be generated:
    commands
        .generate_raceplan_for_event(TOKEN, EVENT_ID)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_generate_raceplan_requires_authorization() {
    let store = store();
    let commands = RaceplanCommands::new(
        store.clone(),
        interval_start_events_port(),
        Arc::new(DenyAllUsers),
    );

    let result = commands.generate_raceplan_for_event(TOKEN, EVENT_ID).await;
    assert!(matches!(
        result,
        Err(CommandError::Users(UsersError::Forbidden))
    ));
    assert!(store.get_raceplans_by_event_id(EVENT_ID).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_unknown_event_is_rejected() {
    let store = store();
    let commands = RaceplanCommands::new(
        store.clone(),
        interval_start_events_port(),
        Arc::new(AllowAllUsers),
    );

    let result = commands
        .generate_raceplan_for_event(TOKEN, "no-such-event")
        .await;
    assert!(matches!(result, Err(CommandError::Events(_))));
}
