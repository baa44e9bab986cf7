//! Startlist persistence service.

use std::sync::Arc;

use crate::models::startlist::Startlist;
use crate::services::{create_id, ServiceError};
use crate::storage::Store;

pub struct StartlistsService {
    store: Arc<dyn Store>,
}

impl StartlistsService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Create a startlist. An event can have one, and only one, startlist.
    pub async fn create_startlist(&self, startlist: &mut Startlist) -> Result<String, ServiceError> {
        tracing::debug!("trying to insert startlist for event {}", startlist.event_id);
        let existing = self
            .store
            .get_startlists_by_event_id(&startlist.event_id)
            .await?;
        if !existing.is_empty() {
            return Err(ServiceError::StartlistAlreadyExists(
                startlist.event_id.clone(),
            ));
        }
        if startlist.id.is_some() {
            return Err(ServiceError::IllegalValue(
                "Cannot create startlist with input id.".to_string(),
            ));
        }

        let id = create_id();
        startlist.id = Some(id.clone());
        self.store.create_startlist(startlist).await?;
        tracing::debug!("inserted startlist with id {id}");
        Ok(id)
    }

    pub async fn get_startlist_by_id(&self, id: &str) -> Result<Startlist, ServiceError> {
        Ok(self.store.get_startlist_by_id(id).await?)
    }

    pub async fn get_startlists_by_event_id(
        &self,
        event_id: &str,
    ) -> Result<Vec<Startlist>, ServiceError> {
        Ok(self.store.get_startlists_by_event_id(event_id).await?)
    }

    pub async fn update_startlist(
        &self,
        id: &str,
        startlist: &Startlist,
    ) -> Result<(), ServiceError> {
        let old_startlist = self.store.get_startlist_by_id(id).await?;
        if startlist.id != old_startlist.id {
            return Err(ServiceError::IllegalValue(
                "Cannot change id for startlist.".to_string(),
            ));
        }
        Ok(self.store.update_startlist(id, startlist).await?)
    }

    pub async fn delete_startlist(&self, id: &str) -> Result<(), ServiceError> {
        self.store.get_startlist_by_id(id).await?;
        Ok(self.store.delete_startlist(id).await?)
    }
}
