use indexmap::IndexSet;

use crate::errors::DefinitionError;
use crate::model::SecurityDefinition;

/// Resultado de `SecurityBuilder::build`: las dos listas de seguridad de un step.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StepSecurity {
    pub potential_owners: Vec<SecurityDefinition>,
    pub business_managers: Vec<SecurityDefinition>,
}

/// Construye los atributos de seguridad de un step.
#[derive(Debug, Clone, Default)]
pub struct SecurityBuilder {
    potential_owners: IndexSet<SecurityDefinition>,
    business_administrators: IndexSet<SecurityDefinition>,
}

impl SecurityBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Añade owners (conjunto: duplicados se ignoran). Lista vacía -> `InvalidInput`.
    pub fn add_potential_owners(mut self, owners: &[SecurityDefinition]) -> Result<Self, DefinitionError> {
        if owners.is_empty() {
            return Err(DefinitionError::invalid("owners: length cannot be 0"));
        }
        self.potential_owners.extend(owners.iter().cloned());
        Ok(self)
    }

    /// Añade administradores (conjunto). Lista vacía -> `InvalidInput`.
    pub fn add_business_administrators(mut self, admins: &[SecurityDefinition]) -> Result<Self, DefinitionError> {
        if admins.is_empty() {
            return Err(DefinitionError::invalid("admins: length cannot be 0"));
        }
        self.business_administrators.extend(admins.iter().cloned());
        Ok(self)
    }

    /// Elimina owners cuyo `account` esté en `accounts`, sin importar el tipo.
    pub fn remove_potential_owners(mut self, accounts: &[&str]) -> Self {
        self.potential_owners.retain(|p| !accounts.contains(&p.account.as_str()));
        self
    }

    pub fn remove_business_administrators(mut self, accounts: &[&str]) -> Self {
        self.business_administrators.retain(|p| !accounts.contains(&p.account.as_str()));
        self
    }

    pub fn clear(mut self) -> Self {
        self.potential_owners.clear();
        self.business_administrators.clear();
        self
    }

    pub fn reset(self) -> Self {
        self.clear()
    }

    pub fn potential_owners(&self) -> &IndexSet<SecurityDefinition> {
        &self.potential_owners
    }

    pub fn business_administrators(&self) -> &IndexSet<SecurityDefinition> {
        &self.business_administrators
    }

    pub fn build(&self) -> StepSecurity {
        StepSecurity { potential_owners: self.potential_owners.iter().cloned().collect(),
                       business_managers: self.business_administrators.iter().cloned().collect() }
    }
}
