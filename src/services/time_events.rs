//! Time event persistence service.

use std::sync::Arc;

use crate::models::time_event::TimeEvent;
use crate::services::{create_id, ServiceError};
use crate::storage::Store;

pub struct TimeEventsService {
    store: Arc<dyn Store>,
}

impl TimeEventsService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Create a time event.
    ///
    /// At most one time event may exist per (race, bib, timing point);
    /// "Template" events are exempt and may repeat.
    pub async fn create_time_event(&self, time_event: &mut TimeEvent) -> Result<String, ServiceError> {
        tracing::debug!(
            "trying to insert time-event for bib {} at {}",
            time_event.bib,
            time_event.timing_point
        );
        if time_event.id.is_some() {
            return Err(ServiceError::IllegalValue(
                "Cannot create time-event with input id.".to_string(),
            ));
        }

        if let Some(race_id) = time_event.race_id.as_deref().filter(|id| !id.is_empty()) {
            if !time_event.is_template() {
                let existing = self.store.get_time_events_by_race_id(race_id).await?;
                let duplicate = existing.iter().any(|e| {
                    !e.is_template()
                        && e.bib == time_event.bib
                        && e.timing_point == time_event.timing_point
                });
                if duplicate {
                    return Err(ServiceError::TimeEventAlreadyExists {
                        bib: time_event.bib,
                        timing_point: time_event.timing_point.clone(),
                        race_id: race_id.to_string(),
                    });
                }
            }
        }

        let id = create_id();
        time_event.id = Some(id.clone());
        self.store.create_time_event(time_event).await?;
        tracing::debug!("inserted time-event with id {id}");
        Ok(id)
    }

    pub async fn get_time_event_by_id(&self, id: &str) -> Result<TimeEvent, ServiceError> {
        Ok(self.store.get_time_event_by_id(id).await?)
    }

    pub async fn get_all_time_events(&self) -> Result<Vec<TimeEvent>, ServiceError> {
        Ok(self.store.get_all_time_events().await?)
    }

    pub async fn get_time_events_by_event_id(
        &self,
        event_id: &str,
    ) -> Result<Vec<TimeEvent>, ServiceError> {
        Ok(self.store.get_time_events_by_event_id(event_id).await?)
    }

    pub async fn get_time_events_by_event_id_and_timing_point(
        &self,
        event_id: &str,
        timing_point: &str,
    ) -> Result<Vec<TimeEvent>, ServiceError> {
        Ok(self
            .store
            .get_time_events_by_event_id_and_timing_point(event_id, timing_point)
            .await?)
    }

    pub async fn get_time_events_by_race_id(
        &self,
        race_id: &str,
    ) -> Result<Vec<TimeEvent>, ServiceError> {
        Ok(self.store.get_time_events_by_race_id(race_id).await?)
    }

    pub async fn update_time_event(
        &self,
        id: &str,
        time_event: &TimeEvent,
    ) -> Result<(), ServiceError> {
        let old_time_event = self.store.get_time_event_by_id(id).await?;
        if time_event.id != old_time_event.id {
            return Err(ServiceError::IllegalValue(
                "Cannot change id for time-event.".to_string(),
            ));
        }
        Ok(self.store.update_time_event(id, time_event).await?)
    }

    pub async fn delete_time_event(&self, id: &str) -> Result<(), ServiceError> {
        self.store.get_time_event_by_id(id).await?;
        Ok(self.store.delete_time_event(id).await?)
    }
}
