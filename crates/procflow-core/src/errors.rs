//! Errores del core de definiciones.
//!
//! Un único enum cubre las cuatro familias observables: contrato de entrada de
//! los builders, contenido duplicado, fallos del codec y errores del backend
//! de almacenamiento. "No encontrado" nunca es un error: las operaciones de
//! búsqueda y actualización lo señalan en su valor de retorno.

use thiserror::Error;
use uuid::Uuid;

use crate::hashing::ContentDigest;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum DefinitionError {
    /// Violación del contrato de entrada (campos requeridos, colecciones vacías, ...).
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// Ya existe una definición persistida con el mismo `(flow_id, digest)`.
    #[error("process definition flow_id={flow_id} digest={digest} already exists")]
    DuplicateContent { flow_id: String, digest: ContentDigest },
    /// Ya existe un registro con la misma clave compuesta `(id, version)`.
    #[error("process definition id={id} version={version} already exists")]
    DuplicateKey { id: Uuid, version: u32 },
    #[error("encode failure: {0}")]
    Encode(String),
    /// El blob almacenado no puede reconstruirse (datos corruptos).
    #[error("decode failure: {0}")]
    Decode(String),
    #[error("store error: {0}")]
    Store(String),
}

impl DefinitionError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}
