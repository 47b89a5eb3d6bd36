//! procflow-core: almacén versionado y direccionado por contenido de
//! definiciones de procesos.
//!
//! - `model`: árbol de definición y recorrido canónico.
//! - `builder`: DSL fluida de construcción.
//! - `hashing`: digest canónico (dedup / detección de cambios).
//! - `codec`: blob opaco del árbol para almacenamiento.
//! - `store`: servicio de persistencia y almacén en memoria.
pub mod builder;
pub mod codec;
pub mod constants;
pub mod errors;
pub mod hashing;
pub mod model;
pub mod store;

pub use builder::{ConstraintBuilder, HandlerBuilder, ProcessBuilder, ScriptBuilder, SecurityBuilder, StepBuilder,
                  StepSecurity, VariableBuilder};
pub use errors::DefinitionError;
pub use hashing::{compute_digest, ContentDigest, DigestVisitor};
pub use model::{AccountType, ActionDefinition, ConstraintDefinition, DefinitionNode, DefinitionVisitor, LinkDefinition,
                ProcessDefinition, ScriptDefinition, ScriptLanguage, ScriptSlot, SecurityDefinition, SecuritySlot,
                StepDefinition, StepHandlerDefinition, StepHandlerType, StepRef, TagDefinition, VariableDefinition,
                VariableMapDefinition, VariableType};
pub use store::{AccountData, DefinitionDocumentStore, DefinitionKey, DefinitionPersistenceService, DefinitionUpdate,
                FoundDefinition, InMemoryDocumentStore, ProcessDefStatus, ProcessDefinitionRecord,
                ProcessDefinitionSummary, RecordPatch};
