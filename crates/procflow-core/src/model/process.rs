//! Raíz del árbol (`ProcessDefinition`) y sus aristas (`LinkDefinition`).
//!
//! Los links referencian steps por identificador (`StepRef`), nunca por
//! referencia viva: el árbol permanece acíclico y serializable aunque el
//! grafo de steps tenga ciclos. La resolución se hace por búsqueda.
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::step::StepDefinition;
use super::variable::VariableDefinition;

/// Definición completa de un proceso.
///
/// `id` identifica la definición concreta; `flow_id` es el linaje estable
/// compartido por todas sus versiones y variantes de contenido.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessDefinition {
    pub id: Uuid,
    pub flow_id: String,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub steps: Vec<StepDefinition>,
    #[serde(default)]
    pub links: Vec<LinkDefinition>,
    #[serde(default)]
    pub variables: Vec<VariableDefinition>,
    #[serde(default)]
    pub tags: Vec<TagDefinition>,
}

impl ProcessDefinition {
    /// Busca un step por su identificador.
    pub fn step(&self, step_id: &str) -> Option<&StepDefinition> {
        self.steps.iter().find(|s| s.step_id == step_id)
    }

    pub fn variable(&self, name: &str) -> Option<&VariableDefinition> {
        self.variables.iter().find(|v| v.name == name)
    }

    /// Links salientes de un step, en orden de declaración.
    pub fn outgoing_links<'a>(&'a self, step_id: &'a str) -> impl Iterator<Item = &'a LinkDefinition> + 'a {
        self.links.iter().filter(move |l| l.source.step_id == step_id)
    }
}

/// Referencia a un step por clave.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StepRef {
    pub step_id: String,
}

impl StepRef {
    pub fn new(step_id: impl Into<String>) -> Self {
        Self { step_id: step_id.into() }
    }
}

/// Arista dirigida `source -> target`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkDefinition {
    pub name: String,
    pub description: String,
    pub source: StepRef,
    pub target: StepRef,
}

impl LinkDefinition {
    pub fn new(name: impl Into<String>, source: impl Into<String>, target: impl Into<String>) -> Self {
        Self { name: name.into(),
               description: String::new(),
               source: StepRef::new(source),
               target: StepRef::new(target) }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// Etiqueta opaca adjunta a un elemento de la definición.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TagDefinition {
    pub id: String,
}

impl TagDefinition {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}
