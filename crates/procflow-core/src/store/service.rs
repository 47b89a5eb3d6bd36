//! Servicio de persistencia de definiciones.
//!
//! Flujo de `create`: digest canónico -> chequeo `(flow_id, digest)` ->
//! codificación -> `insert`. El chequeo y la inserción no son atómicos como
//! unidad; la unicidad estricta la garantiza el almacén en `insert`, que
//! rechaza el perdedor de una carrera con `DuplicateContent`.
//!
//! No hay reintentos: las políticas de retry/backoff son del llamador.
use chrono::Utc;
use log::{debug, warn};
use uuid::Uuid;

use super::types::{AccountData, DefinitionKey, DefinitionUpdate, FoundDefinition, ProcessDefStatus,
                   ProcessDefinitionRecord, ProcessDefinitionSummary, RecordPatch};
use super::DefinitionDocumentStore;
use crate::codec::{decode_definition, encode_definition};
use crate::errors::DefinitionError;
use crate::hashing::{compute_digest, ContentDigest};
use crate::model::ProcessDefinition;

pub struct DefinitionPersistenceService<S: DefinitionDocumentStore> {
    store: S,
}

impl<S: DefinitionDocumentStore> DefinitionPersistenceService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Resumen de todas las versiones almacenadas. `accounts` es una pista de
    /// alcance que el core acepta pero no aplica.
    pub fn list_all(&self, accounts: &[AccountData]) -> Result<Vec<ProcessDefinitionSummary>, DefinitionError> {
        debug!("list_all accounts_hint={}", accounts.len());
        Ok(self.store.find_all()?.iter().map(ProcessDefinitionRecord::summary).collect())
    }

    /// Resumen de las versiones en estado `Active`.
    pub fn list_active(&self, accounts: &[AccountData]) -> Result<Vec<ProcessDefinitionSummary>, DefinitionError> {
        debug!("list_active accounts_hint={}", accounts.len());
        Ok(self.store
               .find_by_status(ProcessDefStatus::Active)?
               .iter()
               .map(ProcessDefinitionRecord::summary)
               .collect())
    }

    /// Persiste una nueva versión y devuelve su digest.
    ///
    /// `version` la asigna el llamador (>= 1); el core no la secuencia.
    /// Falla con `DuplicateContent` si el linaje ya contiene el mismo
    /// contenido, sin escribir nada.
    pub fn create(&self,
                  definition: &ProcessDefinition,
                  status: ProcessDefStatus,
                  version: u32,
                  accounts: &[AccountData])
                  -> Result<ContentDigest, DefinitionError> {
        if version == 0 {
            return Err(DefinitionError::InvalidInput("version must be positive".into()));
        }
        let digest = compute_digest(definition);
        debug!("create:start id={} flow_id={} version={version} digest={digest}",
               definition.id, definition.flow_id);
        if self.store.content_exists(&definition.flow_id, &digest)? {
            warn!("create:rejected duplicate flow_id={} digest={digest}", definition.flow_id);
            return Err(DefinitionError::DuplicateContent { flow_id: definition.flow_id.clone(),
                                                           digest });
        }
        let record = ProcessDefinitionRecord { id: definition.id,
                                               flow_id: definition.flow_id.clone(),
                                               version,
                                               name: definition.name.clone(),
                                               description: definition.description.clone(),
                                               last_modified: Utc::now(),
                                               status,
                                               digest: digest.clone(),
                                               encoded_definition: encode_definition(definition)?,
                                               accounts: accounts.to_vec() };
        self.store.insert(record)?;
        debug!("create:done id={} version={version}", definition.id);
        Ok(digest)
    }

    /// Búsqueda puntual por clave compuesta. Un blob que no decodifica es un
    /// error (`Decode`), no un "no encontrado".
    pub fn try_find(&self, id: Uuid, version: u32) -> Result<Option<FoundDefinition>, DefinitionError> {
        let key = DefinitionKey::new(id, version);
        let Some(record) = self.store.find_one(key)? else {
            debug!("try_find:miss key={key}");
            return Ok(None);
        };
        let definition = decode_definition(&record.encoded_definition)?;
        Ok(Some(FoundDefinition { definition,
                                  status: record.status,
                                  accounts: record.accounts }))
    }

    /// Cambia el estado. `true` si exactamente un registro fue modificado;
    /// `false` significa que `(id, version)` no coincidió en ese momento.
    pub fn set_status(&self, id: Uuid, version: u32, status: ProcessDefStatus) -> Result<bool, DefinitionError> {
        let key = DefinitionKey::new(id, version);
        let modified = self.store.update_one(key, &RecordPatch::status(status))?;
        debug!("set_status key={key} status={status} modified={modified}");
        Ok(modified == 1)
    }

    /// Aplica los campos presentes de `update`. Sin campos no hay escritura.
    /// Un `(id, version)` inexistente se ignora en silencio.
    pub fn update(&self, id: Uuid, version: u32, update: DefinitionUpdate) -> Result<(), DefinitionError> {
        if update.is_empty() {
            debug!("update:noop id={id} version={version}");
            return Ok(());
        }
        let key = DefinitionKey::new(id, version);
        let modified = self.store.update_one(key, &RecordPatch::from(update))?;
        debug!("update key={key} modified={modified}");
        Ok(())
    }

    /// Variante de `update` que recibe una función de mutación.
    pub fn update_with<F>(&self, id: Uuid, version: u32, f: F) -> Result<(), DefinitionError>
        where F: FnOnce(&mut DefinitionUpdate)
    {
        let mut update = DefinitionUpdate::default();
        f(&mut update);
        self.update(id, version, update)
    }

    /// Punto de extensión reservado: las cuentas viajan embebidas en `create`.
    pub fn create_accounts(&self, accounts: &[AccountData]) -> Result<(), DefinitionError> {
        debug!("create_accounts:noop count={}", accounts.len());
        Ok(())
    }
}
