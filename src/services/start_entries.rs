//! Start entry persistence service.

use std::sync::Arc;

use crate::models::startlist::StartEntry;
use crate::services::{create_id, ServiceError};
use crate::storage::Store;

pub struct StartEntriesService {
    store: Arc<dyn Store>,
}

impl StartEntriesService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn create_start_entry(
        &self,
        start_entry: &mut StartEntry,
    ) -> Result<String, ServiceError> {
        if start_entry.id.is_some() {
            return Err(ServiceError::IllegalValue(
                "Cannot create start-entry with input id.".to_string(),
            ));
        }

        let id = create_id();
        start_entry.id = Some(id.clone());
        self.store.create_start_entry(start_entry).await?;
        tracing::debug!("inserted start-entry with id {id}");
        Ok(id)
    }

    pub async fn get_start_entry_by_id(&self, id: &str) -> Result<StartEntry, ServiceError> {
        Ok(self.store.get_start_entry_by_id(id).await?)
    }

    pub async fn get_start_entries_by_race_id(
        &self,
        race_id: &str,
    ) -> Result<Vec<StartEntry>, ServiceError> {
        Ok(self.store.get_start_entries_by_race_id(race_id).await?)
    }

    pub async fn get_start_entries_by_race_id_and_startlist_id(
        &self,
        race_id: &str,
        startlist_id: &str,
    ) -> Result<Vec<StartEntry>, ServiceError> {
        Ok(self
            .store
            .get_start_entries_by_race_id_and_startlist_id(race_id, startlist_id)
            .await?)
    }

    pub async fn update_start_entry(
        &self,
        id: &str,
        start_entry: &StartEntry,
    ) -> Result<(), ServiceError> {
        let old_start_entry = self.store.get_start_entry_by_id(id).await?;
        if start_entry.id != old_start_entry.id {
            return Err(ServiceError::IllegalValue(
                "Cannot change id for start-entry.".to_string(),
            ));
        }
        Ok(self.store.update_start_entry(id, start_entry).await?)
    }

    pub async fn delete_start_entry(&self, id: &str) -> Result<(), ServiceError> {
        self.store.get_start_entry_by_id(id).await?;
        Ok(self.store.delete_start_entry(id).await?)
    }
}
