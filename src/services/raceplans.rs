//! Raceplan persistence service.

use std::sync::Arc;

use crate::models::raceplan::Raceplan;
use crate::services::{create_id, ServiceError};
use crate::storage::Store;

pub struct RaceplansService {
    store: Arc<dyn Store>,
}

impl RaceplansService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Create a raceplan. An event can have one, and only one, raceplan.
    pub async fn create_raceplan(&self, raceplan: &mut Raceplan) -> Result<String, ServiceError> {
        tracing::debug!("trying to insert raceplan for event {}", raceplan.event_id);
        let existing = self
            .store
            .get_raceplans_by_event_id(&raceplan.event_id)
            .await?;
        if !existing.is_empty() {
            return Err(ServiceError::RaceplanAlreadyExists(raceplan.event_id.clone()));
        }
        if raceplan.id.is_some() {
            return Err(ServiceError::IllegalValue(
                "Cannot create raceplan with input id.".to_string(),
            ));
        }

        let id = create_id();
        raceplan.id = Some(id.clone());
        self.store.create_raceplan(raceplan).await?;
        tracing::debug!("inserted raceplan with id {id}");
        Ok(id)
    }

    pub async fn get_raceplan_by_id(&self, id: &str) -> Result<Raceplan, ServiceError> {
        Ok(self.store.get_raceplan_by_id(id).await?)
    }

    pub async fn get_raceplans_by_event_id(
        &self,
        event_id: &str,
    ) -> Result<Vec<Raceplan>, ServiceError> {
        Ok(self.store.get_raceplans_by_event_id(event_id).await?)
    }

    pub async fn get_all_raceplans(&self) -> Result<Vec<Raceplan>, ServiceError> {
        Ok(self.store.get_all_raceplans().await?)
    }

    pub async fn update_raceplan(&self, id: &str, raceplan: &Raceplan) -> Result<(), ServiceError> {
        let old_raceplan = self.store.get_raceplan_by_id(id).await?;
        if raceplan.id != old_raceplan.id {
            return Err(ServiceError::IllegalValue(
                "Cannot change id for raceplan.".to_string(),
            ));
        }
        Ok(self.store.update_raceplan(id, raceplan).await?)
    }

    pub async fn delete_raceplan(&self, id: &str) -> Result<(), ServiceError> {
        self.store.get_raceplan_by_id(id).await?;
        Ok(self.store.delete_raceplan(id).await?)
    }
}
