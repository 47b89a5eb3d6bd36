//! Visitante de digest canónico.
//!
//! Cada nodo aporta una proyección textual de sus campos semánticos con orden
//! de campos fijo: `<kind>:<campo>|<campo>...;`. `kind` incluye el hueco del
//! nodo en su padre (`owner`/`manager`, `on_entry`/`on_exit`). Dentro de un
//! campo se escapan `\`, `|` y `;`. Las listas van precedidas de etiqueta y
//! cantidad (`|imports#2|a|b`) y los miembros opcionales de una restricción
//! llevan etiqueta propia (`|d=..`, `|max=..`, `|min=..`), así que dos
//! árboles distintos no producen la misma proyección. El acumulador se reduce
//! una sola vez con `hash_str` (128 bits, base64).
//!
//! El visitante tiene estado: recorrer dos árboles sin `reset()` concatena
//! ambas proyecciones. `compute_digest` crea siempre un visitante nuevo.
use std::fmt;
use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use super::hash::hash_str;
use crate::constants::CANONICAL_FORMAT;
use crate::model::{DefinitionNode, DefinitionVisitor, ProcessDefinition, StepHandlerDefinition};

/// Digest de contenido codificado en base64. La igualdad de digests es el
/// único criterio de deduplicación.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentDigest(String);

impl ContentDigest {
    /// Envuelve un digest ya calculado (p.ej. leído del almacenamiento).
    pub fn from_encoded(encoded: impl Into<String>) -> Self {
        Self(encoded.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContentDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Default)]
pub struct DigestVisitor {
    acc: String,
}

impl DigestVisitor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Proyección acumulada hasta ahora.
    pub fn canonical(&self) -> &str {
        &self.acc
    }

    /// Reduce el acumulador a un `ContentDigest`.
    pub fn finalize(&self) -> ContentDigest {
        let mut input = String::with_capacity(CANONICAL_FORMAT.len() + 1 + self.acc.len());
        input.push_str(CANONICAL_FORMAT);
        input.push('\n');
        input.push_str(&self.acc);
        ContentDigest(hash_str(&input))
    }

    pub fn reset(&mut self) {
        self.acc.clear();
    }

    fn push_field(&mut self, value: &str) {
        for c in value.chars() {
            if matches!(c, '\\' | '|' | ';') {
                self.acc.push('\\');
            }
            self.acc.push(c);
        }
    }

    fn push_fields(&mut self, fields: &[&str]) {
        for (i, f) in fields.iter().enumerate() {
            if i > 0 {
                self.acc.push('|');
            }
            self.push_field(f);
        }
    }

    fn push_list(&mut self, label: &str, items: &[String]) {
        let _ = write!(self.acc, "|{label}#{}", items.len());
        for item in items {
            self.acc.push('|');
            self.push_field(item);
        }
    }

    fn push_labeled(&mut self, label: &str, value: Option<&String>) {
        if let Some(v) = value.filter(|v| !v.is_empty()) {
            let _ = write!(self.acc, "|{label}=");
            self.push_field(v);
        }
    }
}

// `write!` sobre String no falla; se descarta el Result.
impl DefinitionVisitor for DigestVisitor {
    fn visit(&mut self, node: DefinitionNode<'_>) {
        let kind = node.kind();
        self.acc.push_str(kind);
        self.acc.push(':');
        match node {
            DefinitionNode::Process(p) => self.push_fields(&[&p.flow_id, &p.description, &p.name]),
            DefinitionNode::Step(s) => self.push_fields(&[&s.step_id, &s.name, &s.description]),
            DefinitionNode::Action(a) => {
                self.push_fields(&[&a.name, &a.description]);
                self.acc.push_str(if a.skippable { "|t" } else { "|f" });
            }
            DefinitionNode::Link(l) => {
                self.push_fields(&[&l.name, &l.description, &l.source.step_id, &l.target.step_id])
            }
            DefinitionNode::Variable(v) => {
                self.push_fields(&[&v.description, &v.name]);
                let _ = write!(self.acc, "|{}", v.variable_type);
            }
            DefinitionNode::VariableMap(m) => {
                self.push_field(&m.name);
                let _ = write!(self.acc, "|{}", m.required);
            }
            DefinitionNode::Constraint(c) => {
                self.push_labeled("d", c.default_value.as_ref());
                self.push_labeled("max", c.max_value.as_ref());
                self.push_labeled("min", c.min_value.as_ref());
                if !c.possible_values.is_empty() {
                    self.push_list("values", &c.possible_values);
                }
            }
            DefinitionNode::Script(s, _) => {
                let _ = write!(self.acc, "{}|", s.lang);
                self.push_field(&s.body);
                self.push_list("imports", &s.imports);
                self.push_list("refs", &s.references);
            }
            DefinitionNode::Security(s, _) => {
                self.push_field(&s.account);
                let _ = write!(self.acc, "|{}", s.account_type);
            }
            DefinitionNode::StepHandler(h) => match h {
                StepHandlerDefinition::Script(_) => {
                    let _ = write!(self.acc, "||{}", h.handler_type());
                }
                StepHandlerDefinition::Registered { handler_type,
                                                    class_full_name,
                                                    ioc_name, } => {
                    self.push_fields(&[class_full_name, ioc_name]);
                    let _ = write!(self.acc, "|{handler_type}");
                }
            },
            DefinitionNode::Tag(t) => self.push_field(&t.id),
        }
        self.acc.push(';');
    }
}

/// Calcula el digest de una definición con un visitante nuevo.
pub fn compute_digest(definition: &ProcessDefinition) -> ContentDigest {
    let mut visitor = DigestVisitor::new();
    definition.accept(&mut visitor);
    visitor.finalize()
}
