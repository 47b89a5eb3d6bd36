use std::fmt;

use serde::{Deserialize, Serialize};

use super::handler::StepHandlerDefinition;

/// Tipo de una variable del proceso. `None` es el centinela "sin tipo".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VariableType {
    None,
    String,
    Int,
    Float,
    Bool,
    DateTime,
    Object,
}

impl VariableType {
    pub fn as_str(&self) -> &'static str {
        match self {
            VariableType::None => "none",
            VariableType::String => "string",
            VariableType::Int => "int",
            VariableType::Float => "float",
            VariableType::Bool => "bool",
            VariableType::DateTime => "datetime",
            VariableType::Object => "object",
        }
    }
}

impl fmt::Display for VariableType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Variable del proceso. `name` es requerido y no vacío; `constraints` sólo
/// existe cuando `variable_type != VariableType::None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableDefinition {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub variable_type: VariableType,
    #[serde(default)]
    pub constraints: Option<ConstraintDefinition>,
    #[serde(default)]
    pub handler: Option<StepHandlerDefinition>,
}

/// Restricciones de valor de una variable tipada.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ConstraintDefinition {
    #[serde(default)]
    pub default_value: Option<String>,
    #[serde(default)]
    pub min_value: Option<String>,
    #[serde(default)]
    pub max_value: Option<String>,
    #[serde(default)]
    pub possible_values: Vec<String>,
}

impl ConstraintDefinition {
    pub fn is_empty(&self) -> bool {
        self.default_value.is_none()
        && self.min_value.is_none()
        && self.max_value.is_none()
        && self.possible_values.is_empty()
    }
}
