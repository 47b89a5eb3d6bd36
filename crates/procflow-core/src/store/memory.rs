use std::collections::{BTreeMap, HashSet};
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Duration, Utc};
use log::debug;

use super::types::{DefinitionKey, ProcessDefStatus, ProcessDefinitionRecord, RecordPatch};
use super::DefinitionDocumentStore;
use crate::errors::DefinitionError;
use crate::hashing::ContentDigest;

#[derive(Default)]
struct Inner {
    records: BTreeMap<DefinitionKey, ProcessDefinitionRecord>,
    // índice único (flow_id, digest)
    content: HashSet<(String, ContentDigest)>,
}

/// Backend en memoria. Todas las operaciones toman el mismo `Mutex`, por lo
/// que los chequeos de unicidad de `insert` son atómicos con la inserción.
#[derive(Default)]
pub struct InMemoryDocumentStore {
    inner: Mutex<Inner>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>, DefinitionError> {
        self.inner
            .lock()
            .map_err(|_| DefinitionError::Store("in-memory store lock poisoned".into()))
    }

    /// Cantidad de registros almacenados.
    pub fn len(&self) -> Result<usize, DefinitionError> {
        Ok(self.lock()?.records.len())
    }

    pub fn is_empty(&self) -> Result<bool, DefinitionError> {
        Ok(self.len()? == 0)
    }
}

/// Siguiente marca de modificación: `now`, o `prev + 1µs` si el reloj no avanzó.
pub(crate) fn next_modified(prev: DateTime<Utc>) -> DateTime<Utc> {
    let now = Utc::now();
    if now > prev {
        now
    } else {
        prev + Duration::microseconds(1)
    }
}

impl DefinitionDocumentStore for InMemoryDocumentStore {
    fn find_all(&self) -> Result<Vec<ProcessDefinitionRecord>, DefinitionError> {
        Ok(self.lock()?.records.values().cloned().collect())
    }

    fn find_by_status(&self, status: ProcessDefStatus) -> Result<Vec<ProcessDefinitionRecord>, DefinitionError> {
        Ok(self.lock()?
               .records
               .values()
               .filter(|r| r.status == status)
               .cloned()
               .collect())
    }

    fn content_exists(&self, flow_id: &str, digest: &ContentDigest) -> Result<bool, DefinitionError> {
        Ok(self.lock()?.content.contains(&(flow_id.to_string(), digest.clone())))
    }

    fn insert(&self, record: ProcessDefinitionRecord) -> Result<(), DefinitionError> {
        let mut g = self.lock()?;
        let key = record.key();
        if g.records.contains_key(&key) {
            return Err(DefinitionError::DuplicateKey { id: key.id, version: key.version });
        }
        let content_key = (record.flow_id.clone(), record.digest.clone());
        if g.content.contains(&content_key) {
            return Err(DefinitionError::DuplicateContent { flow_id: record.flow_id,
                                                           digest: record.digest });
        }
        g.content.insert(content_key);
        g.records.insert(key, record);
        debug!("memory:insert key={key} count={}", g.records.len());
        Ok(())
    }

    fn find_one(&self, key: DefinitionKey) -> Result<Option<ProcessDefinitionRecord>, DefinitionError> {
        Ok(self.lock()?.records.get(&key).cloned())
    }

    fn update_one(&self, key: DefinitionKey, patch: &RecordPatch) -> Result<u64, DefinitionError> {
        let mut g = self.lock()?;
        let Some(record) = g.records.get_mut(&key) else {
            return Ok(0);
        };
        if let Some(name) = &patch.name {
            record.name = name.clone();
        }
        if let Some(description) = &patch.description {
            record.description = description.clone();
        }
        if let Some(status) = patch.status {
            record.status = status;
        }
        record.last_modified = next_modified(record.last_modified);
        Ok(1)
    }
}
