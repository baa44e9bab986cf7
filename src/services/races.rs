//! Race persistence service.

use std::sync::Arc;

use crate::models::race::Race;
use crate::services::{create_id, ServiceError};
use crate::storage::Store;

pub struct RacesService {
    store: Arc<dyn Store>,
}

impl RacesService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn create_race(&self, race: &mut Race) -> Result<String, ServiceError> {
        if !race.id().is_empty() {
            return Err(ServiceError::IllegalValue(
                "Cannot create race with input id.".to_string(),
            ));
        }

        let id = create_id();
        race.set_id(&id);
        self.store.create_race(race).await?;
        tracing::debug!("inserted race with id {id}");
        Ok(id)
    }

    pub async fn get_race_by_id(&self, id: &str) -> Result<Race, ServiceError> {
        Ok(self.store.get_race_by_id(id).await?)
    }

    pub async fn get_races_by_event_id(&self, event_id: &str) -> Result<Vec<Race>, ServiceError> {
        Ok(self.store.get_races_by_event_id(event_id).await?)
    }

    pub async fn get_races_by_raceplan_id(
        &self,
        raceplan_id: &str,
    ) -> Result<Vec<Race>, ServiceError> {
        Ok(self.store.get_races_by_raceplan_id(raceplan_id).await?)
    }

    pub async fn update_race(&self, id: &str, race: &Race) -> Result<(), ServiceError> {
        let old_race = self.store.get_race_by_id(id).await?;
        if race.id() != old_race.id() {
            return Err(ServiceError::IllegalValue(
                "Cannot change id for race.".to_string(),
            ));
        }
        Ok(self.store.update_race(id, race).await?)
    }

    pub async fn delete_race(&self, id: &str) -> Result<(), ServiceError> {
        self.store.get_race_by_id(id).await?;
        Ok(self.store.delete_race(id).await?)
    }
}
