//! Entity lookup used to bind requests to their `vcv-source-id` target.

use std::collections::HashMap;
use std::sync::RwLock;

use thiserror::Error;

use ajaxgate_core::{SourceEntity, SourceId};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SourceLookupError {
    #[error("entity store unavailable: {0}")]
    Unavailable(String),
}

/// Finds stored entities by id.
pub trait EntityLookup: Send + Sync {
    fn find(&self, id: SourceId) -> Result<Option<SourceEntity>, SourceLookupError>;
}

/// In-memory entity store (dev/tests).
#[derive(Debug, Default)]
pub struct InMemoryEntityStore {
    entities: RwLock<HashMap<SourceId, SourceEntity>>,
}

impl InMemoryEntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, entity: SourceEntity) -> Result<(), SourceLookupError> {
        let mut entities = self
            .entities
            .write()
            .map_err(|_| SourceLookupError::Unavailable("lock poisoned".to_string()))?;
        entities.insert(entity.id, entity);
        Ok(())
    }
}

impl EntityLookup for InMemoryEntityStore {
    fn find(&self, id: SourceId) -> Result<Option<SourceEntity>, SourceLookupError> {
        let entities = self
            .entities
            .read()
            .map_err(|_| SourceLookupError::Unavailable("lock poisoned".to_string()))?;
        Ok(entities.get(&id).cloned())
    }
}
