use serde::{Deserialize, Serialize};

use super::handler::StepHandlerDefinition;
use super::process::TagDefinition;
use super::script::ScriptDefinition;
use super::security::SecurityDefinition;

/// Step de la definición. `step_id` es único dentro del proceso.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepDefinition {
    pub step_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub actions: Vec<ActionDefinition>,
    #[serde(default)]
    pub on_entry: Option<ScriptDefinition>,
    #[serde(default)]
    pub on_exit: Option<ScriptDefinition>,
    #[serde(default)]
    pub variables_map: Vec<VariableMapDefinition>,
    #[serde(default)]
    pub potential_owners: Vec<SecurityDefinition>,
    #[serde(default)]
    pub business_managers: Vec<SecurityDefinition>,
    #[serde(default)]
    pub step_handler: Option<StepHandlerDefinition>,
    #[serde(default)]
    pub tags: Vec<TagDefinition>,
}

/// Acción disponible en un step (p.ej. "approve").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionDefinition {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub skippable: bool,
}

impl ActionDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(),
               description: String::new(),
               skippable: false }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn skippable(mut self, skippable: bool) -> Self {
        self.skippable = skippable;
        self
    }
}

/// Binding de una variable del proceso dentro de un step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableMapDefinition {
    pub name: String,
    pub required: bool,
}
