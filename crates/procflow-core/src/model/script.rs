use std::fmt;

use serde::{Deserialize, Serialize};

/// Lenguajes de script soportados. `None` es el valor por defecto.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ScriptLanguage {
    #[default]
    None,
    Rhai,
    Lua,
    JavaScript,
    Python,
}

impl ScriptLanguage {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScriptLanguage::None => "none",
            ScriptLanguage::Rhai => "rhai",
            ScriptLanguage::Lua => "lua",
            ScriptLanguage::JavaScript => "javascript",
            ScriptLanguage::Python => "python",
        }
    }
}

impl fmt::Display for ScriptLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Script embebido (hooks `on_entry`/`on_exit`, handlers).
///
/// `references` e `imports` no contienen duplicados y conservan el orden de
/// inserción; el `ScriptBuilder` garantiza ambas cosas.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScriptDefinition {
    #[serde(default)]
    pub lang: ScriptLanguage,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub references: Vec<String>,
    #[serde(default)]
    pub imports: Vec<String>,
}
