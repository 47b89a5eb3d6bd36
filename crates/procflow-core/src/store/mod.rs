//! Persistencia versionada de definiciones.
//!
//! - `types`: registro almacenado, resumen de listado, clave compuesta, estados.
//! - `DefinitionDocumentStore`: contrato del almacén de documentos (colaborador
//!   externo; el core sólo usa claves, filtros y actualizaciones condicionales).
//! - `InMemoryDocumentStore`: backend en memoria con las mismas garantías de
//!   unicidad que el backend Postgres.
//! - `DefinitionPersistenceService`: dedup por digest, creación, búsqueda y
//!   mutaciones acotadas por `(id, version)`.

mod memory;
mod service;
mod types;

pub use memory::InMemoryDocumentStore;
pub use service::DefinitionPersistenceService;
pub use types::{AccountData, DefinitionKey, DefinitionUpdate, FoundDefinition, ProcessDefStatus, ProcessDefinitionRecord,
                ProcessDefinitionSummary, RecordPatch};

use crate::errors::DefinitionError;
use crate::hashing::ContentDigest;

/// Almacén de documentos de definiciones.
///
/// Contrato para implementaciones:
/// - `insert` debe imponer la unicidad de `(id, version)` (`DuplicateKey`) y de
///   `(flow_id, digest)` (`DuplicateContent`) de forma independiente a
///   cualquier chequeo previo del servicio.
/// - `update_one` es una única actualización condicional atómica: aplica el
///   patch, asigna `last_modified` (estrictamente creciente por registro) y
///   devuelve la cantidad de registros modificados (0 o 1).
/// - Ninguna operación reintenta escrituras.
pub trait DefinitionDocumentStore: Send + Sync {
    fn find_all(&self) -> Result<Vec<ProcessDefinitionRecord>, DefinitionError>;
    fn find_by_status(&self, status: ProcessDefStatus) -> Result<Vec<ProcessDefinitionRecord>, DefinitionError>;
    fn content_exists(&self, flow_id: &str, digest: &ContentDigest) -> Result<bool, DefinitionError>;
    fn insert(&self, record: ProcessDefinitionRecord) -> Result<(), DefinitionError>;
    fn find_one(&self, key: DefinitionKey) -> Result<Option<ProcessDefinitionRecord>, DefinitionError>;
    fn update_one(&self, key: DefinitionKey, patch: &RecordPatch) -> Result<u64, DefinitionError>;
}

impl<T: DefinitionDocumentStore + ?Sized> DefinitionDocumentStore for std::sync::Arc<T> {
    fn find_all(&self) -> Result<Vec<ProcessDefinitionRecord>, DefinitionError> {
        (**self).find_all()
    }
    fn find_by_status(&self, status: ProcessDefStatus) -> Result<Vec<ProcessDefinitionRecord>, DefinitionError> {
        (**self).find_by_status(status)
    }
    fn content_exists(&self, flow_id: &str, digest: &ContentDigest) -> Result<bool, DefinitionError> {
        (**self).content_exists(flow_id, digest)
    }
    fn insert(&self, record: ProcessDefinitionRecord) -> Result<(), DefinitionError> {
        (**self).insert(record)
    }
    fn find_one(&self, key: DefinitionKey) -> Result<Option<ProcessDefinitionRecord>, DefinitionError> {
        (**self).find_one(key)
    }
    fn update_one(&self, key: DefinitionKey, patch: &RecordPatch) -> Result<u64, DefinitionError> {
        (**self).update_one(key, patch)
    }
}
