//! Modelo del árbol de definición (Process, Step, Action, Link, Variable, ...).

pub mod handler;
pub mod node;
pub mod process;
pub mod script;
pub mod security;
pub mod step;
pub mod variable;

pub use handler::{StepHandlerDefinition, StepHandlerType};
pub use node::{DefinitionNode, DefinitionVisitor, ScriptSlot, SecuritySlot};
pub use process::{LinkDefinition, ProcessDefinition, StepRef, TagDefinition};
pub use script::{ScriptDefinition, ScriptLanguage};
pub use security::{AccountType, SecurityDefinition};
pub use step::{ActionDefinition, StepDefinition, VariableMapDefinition};
pub use variable::{ConstraintDefinition, VariableDefinition, VariableType};
