//! Tipos de la capa de persistencia.
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::DefinitionError;
use crate::hashing::ContentDigest;
use crate::model::{AccountType, ProcessDefinition};

/// Estado de una versión almacenada. Los valores numéricos se persisten y no
/// deben renumerarse. El core no impone transiciones: cualquier valor puede
/// asignarse desde cualquier otro.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProcessDefStatus {
    NotActive = 0,
    Active = 1,
    Draft = 2,
}

impl ProcessDefStatus {
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ProcessDefStatus::NotActive => "not-active",
            ProcessDefStatus::Active => "active",
            ProcessDefStatus::Draft => "draft",
        }
    }
}

impl TryFrom<i32> for ProcessDefStatus {
    type Error = DefinitionError;

    fn try_from(v: i32) -> Result<Self, Self::Error> {
        match v {
            0 => Ok(ProcessDefStatus::NotActive),
            1 => Ok(ProcessDefStatus::Active),
            2 => Ok(ProcessDefStatus::Draft),
            other => Err(DefinitionError::Decode(format!("unknown status value {other}"))),
        }
    }
}

impl std::str::FromStr for ProcessDefStatus {
    type Err = DefinitionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "not-active" | "notactive" | "inactive" => Ok(ProcessDefStatus::NotActive),
            "active" => Ok(ProcessDefStatus::Active),
            "draft" => Ok(ProcessDefStatus::Draft),
            other => Err(DefinitionError::InvalidInput(format!("unknown status {other}"))),
        }
    }
}

impl fmt::Display for ProcessDefStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Referencia opaca a una cuenta (nombre, tipo) asociada a una versión.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccountData {
    pub name: String,
    pub account_type: AccountType,
}

impl AccountData {
    pub fn new(name: impl Into<String>, account_type: AccountType) -> Self {
        Self { name: name.into(), account_type }
    }
}

/// Clave compuesta `(id, version)` de un registro.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DefinitionKey {
    pub id: Uuid,
    pub version: u32,
}

impl DefinitionKey {
    pub fn new(id: Uuid, version: u32) -> Self {
        Self { id, version }
    }
}

impl fmt::Display for DefinitionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@v{}", self.id, self.version)
    }
}

/// Registro almacenado: una versión de un linaje.
///
/// Sólo `name`, `description`, `status` y `last_modified` cambian después de
/// la creación.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessDefinitionRecord {
    pub id: Uuid,
    pub flow_id: String,
    pub version: u32,
    pub name: String,
    pub description: String,
    pub last_modified: DateTime<Utc>,
    pub status: ProcessDefStatus,
    pub digest: ContentDigest,
    pub encoded_definition: String,
    pub accounts: Vec<AccountData>,
}

impl ProcessDefinitionRecord {
    pub fn key(&self) -> DefinitionKey {
        DefinitionKey::new(self.id, self.version)
    }

    pub fn summary(&self) -> ProcessDefinitionSummary {
        ProcessDefinitionSummary { id: self.id,
                                   name: self.name.clone(),
                                   description: self.description.clone(),
                                   last_updated: self.last_modified,
                                   digest: self.digest.clone(),
                                   status: self.status,
                                   version: self.version }
    }
}

/// Proyección ligera para listados.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessDefinitionSummary {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub last_updated: DateTime<Utc>,
    pub digest: ContentDigest,
    pub status: ProcessDefStatus,
    pub version: u32,
}

/// Cambios solicitados por el llamador. Sólo `name` y `description` son
/// mutables; un campo `None` no se toca (`Some("")` sí asigna vacío).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DefinitionUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
}

impl DefinitionUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none()
    }
}

/// Documento de actualización que recibe el almacén. Ver `DefinitionDocumentStore::update_one`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub status: Option<ProcessDefStatus>,
}

impl RecordPatch {
    pub fn status(status: ProcessDefStatus) -> Self {
        Self { status: Some(status), ..Self::default() }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none() && self.status.is_none()
    }
}

impl From<DefinitionUpdate> for RecordPatch {
    fn from(u: DefinitionUpdate) -> Self {
        Self { name: u.name,
               description: u.description,
               status: None }
    }
}

/// Resultado de `try_find`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoundDefinition {
    pub definition: ProcessDefinition,
    pub status: ProcessDefStatus,
    pub accounts: Vec<AccountData>,
}
