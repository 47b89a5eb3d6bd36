use indexmap::IndexMap;

use super::security::StepSecurity;
use crate::errors::DefinitionError;
use crate::model::{ActionDefinition, ScriptDefinition, SecurityDefinition, StepDefinition, StepHandlerDefinition,
                   TagDefinition, VariableMapDefinition};

#[derive(Debug, Clone)]
pub struct StepBuilder {
    step_id: String,
    name: String,
    description: String,
    actions: Vec<ActionDefinition>,
    on_entry: Option<ScriptDefinition>,
    on_exit: Option<ScriptDefinition>,
    // clave: nombre de la variable (add-or-replace)
    variables_map: IndexMap<String, bool>,
    potential_owners: Vec<SecurityDefinition>,
    business_managers: Vec<SecurityDefinition>,
    step_handler: Option<StepHandlerDefinition>,
    tags: Vec<TagDefinition>,
}

impl StepBuilder {
    pub fn new(step_id: impl Into<String>) -> Self {
        Self { step_id: step_id.into(),
               name: String::new(),
               description: String::new(),
               actions: Vec::new(),
               on_entry: None,
               on_exit: None,
               variables_map: IndexMap::new(),
               potential_owners: Vec::new(),
               business_managers: Vec::new(),
               step_handler: None,
               tags: Vec::new() }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn action(mut self, action: ActionDefinition) -> Self {
        self.actions.push(action);
        self
    }

    pub fn on_entry(mut self, script: ScriptDefinition) -> Self {
        self.on_entry = Some(script);
        self
    }

    pub fn on_exit(mut self, script: ScriptDefinition) -> Self {
        self.on_exit = Some(script);
        self
    }

    /// Vincula una variable del proceso; un nombre repetido reemplaza el flag.
    pub fn map_variable(mut self, name: impl Into<String>, required: bool) -> Self {
        self.variables_map.insert(name.into(), required);
        self
    }

    /// Reemplaza ambas listas de seguridad.
    pub fn security(mut self, security: StepSecurity) -> Self {
        self.potential_owners = security.potential_owners;
        self.business_managers = security.business_managers;
        self
    }

    pub fn handler(mut self, handler: StepHandlerDefinition) -> Self {
        self.step_handler = Some(handler);
        self
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        let tag = TagDefinition::new(tag);
        if !self.tags.contains(&tag) {
            self.tags.push(tag);
        }
        self
    }

    /// Limpia todo salvo el `step_id`.
    pub fn reset(self) -> Self {
        Self::new(self.step_id)
    }

    pub fn build(&self) -> Result<StepDefinition, DefinitionError> {
        if self.step_id.trim().is_empty() {
            return Err(DefinitionError::invalid("step_id is required"));
        }
        Ok(StepDefinition { step_id: self.step_id.clone(),
                            name: self.name.clone(),
                            description: self.description.clone(),
                            actions: self.actions.clone(),
                            on_entry: self.on_entry.clone(),
                            on_exit: self.on_exit.clone(),
                            variables_map: self.variables_map
                                               .iter()
                                               .map(|(name, required)| VariableMapDefinition { name: name.clone(),
                                                                                               required: *required })
                                               .collect(),
                            potential_owners: self.potential_owners.clone(),
                            business_managers: self.business_managers.clone(),
                            step_handler: self.step_handler.clone(),
                            tags: self.tags.clone() })
    }
}
