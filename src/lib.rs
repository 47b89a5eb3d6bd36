//! procflow: almacén versionado y direccionado por contenido de definiciones
//! de procesos.
//!
//! Fachada sobre los crates del workspace:
//! - `procflow_core`: modelo, builders, digest, servicio.
//! - `procflow_persistence`: backend Postgres.
pub use procflow_core;
pub use procflow_persistence;

pub use procflow_core::{compute_digest, ContentDigest, DefinitionError, DefinitionPersistenceService,
                        InMemoryDocumentStore, ProcessBuilder, ProcessDefStatus, ProcessDefinition};
