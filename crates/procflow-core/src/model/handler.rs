use std::fmt;

use serde::{Deserialize, Serialize};

use super::script::ScriptDefinition;

/// Discriminador del handler registrado.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StepHandlerType {
    Script,
    Class,
    Ioc,
}

impl StepHandlerType {
    pub fn as_str(&self) -> &'static str {
        match self {
            StepHandlerType::Script => "script",
            StepHandlerType::Class => "class",
            StepHandlerType::Ioc => "ioc",
        }
    }
}

impl fmt::Display for StepHandlerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Handler de un step (o fuente de selección de una variable).
///
/// Polimórfico sobre dos formas: un script embebido, o una referencia a una
/// clase / registro del contenedor de dependencias.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepHandlerDefinition {
    Script(ScriptDefinition),
    Registered {
        handler_type: StepHandlerType,
        #[serde(default)]
        class_full_name: String,
        #[serde(default)]
        ioc_name: String,
    },
}

impl StepHandlerDefinition {
    pub fn handler_type(&self) -> StepHandlerType {
        match self {
            StepHandlerDefinition::Script(_) => StepHandlerType::Script,
            StepHandlerDefinition::Registered { handler_type, .. } => *handler_type,
        }
    }

    pub fn script(&self) -> Option<&ScriptDefinition> {
        match self {
            StepHandlerDefinition::Script(s) => Some(s),
            StepHandlerDefinition::Registered { .. } => None,
        }
    }
}
