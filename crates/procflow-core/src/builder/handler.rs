use crate::errors::DefinitionError;
use crate::model::{ScriptDefinition, StepHandlerDefinition, StepHandlerType};

/// Construye un handler de step o la fuente de selección de una variable.
/// Admite un script embebido o una referencia por clase / nombre IoC, no ambos.
#[derive(Debug, Clone, Default)]
pub struct HandlerBuilder {
    script: Option<ScriptDefinition>,
    class_full_name: Option<String>,
    ioc_name: Option<String>,
}

impl HandlerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn script(mut self, script: ScriptDefinition) -> Self {
        self.script = Some(script);
        self
    }

    pub fn class(mut self, class_full_name: impl Into<String>) -> Self {
        self.class_full_name = Some(class_full_name.into());
        self
    }

    pub fn ioc(mut self, ioc_name: impl Into<String>) -> Self {
        self.ioc_name = Some(ioc_name.into());
        self
    }

    pub fn reset(mut self) -> Self {
        self.script = None;
        self.class_full_name = None;
        self.ioc_name = None;
        self
    }

    pub fn build(&self) -> Result<StepHandlerDefinition, DefinitionError> {
        let registered = self.class_full_name.is_some() || self.ioc_name.is_some();
        match (&self.script, registered) {
            (Some(_), true) => Err(DefinitionError::invalid("handler: script and class/ioc reference are exclusive")),
            (Some(s), false) => Ok(StepHandlerDefinition::Script(s.clone())),
            (None, true) => {
                let handler_type = if self.class_full_name.is_some() { StepHandlerType::Class } else { StepHandlerType::Ioc };
                Ok(StepHandlerDefinition::Registered { handler_type,
                                                       class_full_name: self.class_full_name.clone().unwrap_or_default(),
                                                       ioc_name: self.ioc_name.clone().unwrap_or_default() })
            }
            (None, false) => Err(DefinitionError::invalid("handler: nothing configured")),
        }
    }
}
