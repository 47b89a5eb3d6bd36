use indexmap::IndexSet;

use crate::model::{ScriptDefinition, ScriptLanguage};

/// Acumula la información de un script. `references` e `imports` son
/// conjuntos ordenados: añadir una entrada existente no tiene efecto.
#[derive(Debug, Clone, Default)]
pub struct ScriptBuilder {
    language: ScriptLanguage,
    body: String,
    references: IndexSet<String>,
    imports: IndexSet<String>,
}

impl ScriptBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn language(mut self, lang: ScriptLanguage) -> Self {
        self.language = lang;
        self
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    pub fn add_references<I, S>(mut self, references: I) -> Self
        where I: IntoIterator<Item = S>,
              S: Into<String>
    {
        self.references.extend(references.into_iter().map(Into::into));
        self
    }

    pub fn add_imports<I, S>(mut self, imports: I) -> Self
        where I: IntoIterator<Item = S>,
              S: Into<String>
    {
        self.imports.extend(imports.into_iter().map(Into::into));
        self
    }

    /// Vuelve al estado inicial (lenguaje `none`, sin cuerpo ni listas).
    pub fn reset(mut self) -> Self {
        self.language = ScriptLanguage::None;
        self.body.clear();
        self.references.clear();
        self.imports.clear();
        self
    }

    pub fn script_language(&self) -> ScriptLanguage {
        self.language
    }

    pub fn script_body(&self) -> &str {
        &self.body
    }

    pub fn references(&self) -> &IndexSet<String> {
        &self.references
    }

    pub fn imports(&self) -> &IndexSet<String> {
        &self.imports
    }

    pub fn build(&self) -> ScriptDefinition {
        ScriptDefinition { lang: self.language,
                           body: self.body.clone(),
                           references: self.references.iter().cloned().collect(),
                           imports: self.imports.iter().cloned().collect() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn references_and_imports_are_deduplicated_in_order() {
        let s = ScriptBuilder::new().language(ScriptLanguage::Rhai)
                                    .body("x + 1")
                                    .add_references(["a", "a"])
                                    .add_references(["b", "a"])
                                    .add_imports(["std", "std"])
                                    .build();
        assert_eq!(s.references, vec!["a".to_string(), "b".to_string()]);
        assert_eq!(s.imports, vec!["std".to_string()]);
        assert_eq!(s.lang, ScriptLanguage::Rhai);
    }

    #[test]
    fn reset_returns_to_initial_state() {
        let b = ScriptBuilder::new().language(ScriptLanguage::Lua)
                                    .body("print(1)")
                                    .add_imports(["io"])
                                    .reset();
        assert_eq!(b.script_language(), ScriptLanguage::None);
        assert!(b.script_body().is_empty());
        assert!(b.imports().is_empty());
        assert_eq!(b.build(), ScriptDefinition::default());
    }
}
