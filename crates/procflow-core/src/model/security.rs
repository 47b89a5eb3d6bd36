use std::fmt;

use serde::{Deserialize, Serialize};

/// Tipo de cuenta de una entrada de seguridad.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccountType {
    Role = 1,
    Group = 2,
    User = 3,
}

impl AccountType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountType::Role => "role",
            AccountType::Group => "group",
            AccountType::User => "user",
        }
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Entrada de seguridad: cuenta + tipo. El core no la interpreta.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SecurityDefinition {
    pub account: String,
    pub account_type: AccountType,
}

impl SecurityDefinition {
    pub fn new(account: impl Into<String>, account_type: AccountType) -> Self {
        Self { account: account.into(), account_type }
    }

    pub fn role(account: impl Into<String>) -> Self {
        Self::new(account, AccountType::Role)
    }

    pub fn group(account: impl Into<String>) -> Self {
        Self::new(account, AccountType::Group)
    }

    pub fn user(account: impl Into<String>) -> Self {
        Self::new(account, AccountType::User)
    }
}
