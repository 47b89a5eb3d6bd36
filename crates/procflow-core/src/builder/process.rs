use std::collections::HashSet;

use indexmap::IndexMap;
use log::debug;
use uuid::Uuid;

use super::variable::VariableBuilder;
use crate::errors::DefinitionError;
use crate::model::{LinkDefinition, ProcessDefinition, StepDefinition, TagDefinition, VariableDefinition};

/// Builder raíz.
///
/// `build()` valida lo que el modelo no valida por sí mismo: `flow_id` no
/// vacío, `step_id` únicos y links cuyos extremos nombran steps declarados.
#[derive(Debug, Clone)]
pub struct ProcessBuilder {
    id: Uuid,
    flow_id: String,
    name: String,
    description: String,
    steps: Vec<StepDefinition>,
    links: Vec<LinkDefinition>,
    variables: IndexMap<String, VariableDefinition>,
    tags: Vec<TagDefinition>,
}

impl ProcessBuilder {
    /// Nuevo builder para el linaje `flow_id` con un `id` recién generado.
    pub fn new(flow_id: impl Into<String>) -> Self {
        Self { id: Uuid::new_v4(),
               flow_id: flow_id.into(),
               name: String::new(),
               description: String::new(),
               steps: Vec::new(),
               links: Vec::new(),
               variables: IndexMap::new(),
               tags: Vec::new() }
    }

    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = id;
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn step(mut self, step: StepDefinition) -> Self {
        self.steps.push(step);
        self
    }

    pub fn link(mut self, link: LinkDefinition) -> Self {
        self.links.push(link);
        self
    }

    /// Registra una variable; si ya existe una con el mismo nombre la
    /// reemplaza conservando su posición.
    pub fn variable(mut self, variable: VariableDefinition) -> Self {
        if self.variables.contains_key(&variable.name) {
            debug!("replacing variable name={}", variable.name);
        }
        self.variables.insert(variable.name.clone(), variable);
        self
    }

    /// Construye una variable con un `VariableBuilder` y la registra (add-or-replace).
    pub fn define_variable<F>(self, f: F) -> Result<Self, DefinitionError>
        where F: FnOnce(VariableBuilder) -> VariableBuilder
    {
        let variable = f(VariableBuilder::new()).build()?;
        Ok(self.variable(variable))
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        let tag = TagDefinition::new(tag);
        if !self.tags.contains(&tag) {
            self.tags.push(tag);
        }
        self
    }

    /// Vacía el contenido; conserva `id` y `flow_id`.
    pub fn reset(self) -> Self {
        Self::new(self.flow_id).with_id(self.id)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn flow_id(&self) -> &str {
        &self.flow_id
    }

    pub fn build(&self) -> Result<ProcessDefinition, DefinitionError> {
        if self.flow_id.trim().is_empty() {
            return Err(DefinitionError::invalid("flow_id is required"));
        }
        let mut seen = HashSet::new();
        for s in &self.steps {
            if !seen.insert(s.step_id.as_str()) {
                return Err(DefinitionError::invalid(format!("duplicate step_id {}", s.step_id)));
            }
        }
        for l in &self.links {
            for end in [&l.source.step_id, &l.target.step_id] {
                if !seen.contains(end.as_str()) {
                    return Err(DefinitionError::invalid(format!("link {} references unknown step {end}", l.name)));
                }
            }
        }
        Ok(ProcessDefinition { id: self.id,
                               flow_id: self.flow_id.clone(),
                               name: self.name.clone(),
                               description: self.description.clone(),
                               steps: self.steps.clone(),
                               links: self.links.clone(),
                               variables: self.variables.values().cloned().collect(),
                               tags: self.tags.clone() })
    }
}
