use indexmap::IndexSet;

use crate::errors::DefinitionError;
use crate::model::{ConstraintDefinition, StepHandlerDefinition, VariableDefinition, VariableType};

/// Builder de variables del proceso.
///
/// El tipo por defecto es `String`. El nombre se valida en `build()`, no al
/// asignarlo, para que el builder pueda reutilizarse tras un `reset()`.
#[derive(Debug, Clone)]
pub struct VariableBuilder {
    name: Option<String>,
    description: String,
    var_type: VariableType,
    constraints: Option<ConstraintDefinition>,
    handler: Option<StepHandlerDefinition>,
}

impl Default for VariableBuilder {
    fn default() -> Self {
        Self { name: None,
               description: String::new(),
               var_type: VariableType::String,
               constraints: None,
               handler: None }
    }
}

impl VariableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn var_type(mut self, t: VariableType) -> Self {
        self.var_type = t;
        self
    }

    pub fn handler(mut self, handler: StepHandlerDefinition) -> Self {
        self.handler = Some(handler);
        self
    }

    /// Define restricciones de valor. Requiere un tipo distinto de `None`.
    pub fn constraints<F>(mut self, f: F) -> Result<Self, DefinitionError>
        where F: FnOnce(ConstraintBuilder) -> ConstraintBuilder
    {
        if self.var_type == VariableType::None {
            return Err(DefinitionError::invalid("constraints cannot be set without a type"));
        }
        self.constraints = Some(f(ConstraintBuilder::new()).build());
        Ok(self)
    }

    pub fn reset(self) -> Self {
        Self::default()
    }

    pub fn variable_name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn variable_type(&self) -> VariableType {
        self.var_type
    }

    pub fn variable_description(&self) -> &str {
        &self.description
    }

    pub fn variable_constraints(&self) -> Option<&ConstraintDefinition> {
        self.constraints.as_ref()
    }

    pub fn build(&self) -> Result<VariableDefinition, DefinitionError> {
        let name = match self.name.as_deref() {
            Some(n) if !n.trim().is_empty() => n.to_string(),
            _ => return Err(DefinitionError::invalid("variable name is required")),
        };
        if self.constraints.is_some() && self.var_type == VariableType::None {
            return Err(DefinitionError::invalid(format!("variable {name}: constraints require a type")));
        }
        Ok(VariableDefinition { name,
                                description: self.description.clone(),
                                variable_type: self.var_type,
                                constraints: self.constraints.clone(),
                                handler: self.handler.clone() })
    }
}

#[derive(Debug, Clone, Default)]
pub struct ConstraintBuilder {
    default_value: Option<String>,
    min_value: Option<String>,
    max_value: Option<String>,
    possible_values: IndexSet<String>,
}

impl ConstraintBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn default_value(mut self, v: impl Into<String>) -> Self {
        self.default_value = Some(v.into());
        self
    }

    pub fn min_value(mut self, v: impl Into<String>) -> Self {
        self.min_value = Some(v.into());
        self
    }

    pub fn max_value(mut self, v: impl Into<String>) -> Self {
        self.max_value = Some(v.into());
        self
    }

    pub fn add_possible_values<I, S>(mut self, values: I) -> Self
        where I: IntoIterator<Item = S>,
              S: Into<String>
    {
        self.possible_values.extend(values.into_iter().map(Into::into));
        self
    }

    pub fn reset(self) -> Self {
        Self::default()
    }

    pub fn build(&self) -> ConstraintDefinition {
        ConstraintDefinition { default_value: self.default_value.clone(),
                               min_value: self.min_value.clone(),
                               max_value: self.max_value.clone(),
                               possible_values: self.possible_values.iter().cloned().collect() }
    }
}
