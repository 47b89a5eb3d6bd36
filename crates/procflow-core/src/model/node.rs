//! Unión etiquetada sobre el conjunto cerrado de nodos y recorrido canónico.
//!
//! El orden de recorrido es post-orden en orden de declaración: primero los
//! hijos (en el orden en que aparecen en el documento) y después el propio
//! nodo. Los links no se siguen como aristas del grafo; se visitan como
//! nodos hoja del proceso, por lo que el recorrido termina aunque los steps
//! formen ciclos.
//!
//! Orden de hijos:
//! - Process: steps, links, variables, tags.
//! - Step: actions, on_entry, on_exit, variables_map, potential_owners,
//!   business_managers, step_handler, tags.
//! - StepHandler: su script embebido (si lo hay).
//! - Variable: handler, constraints.
//!
//! Scripts y entradas de seguridad llevan el hueco que ocupan en su padre
//! (`ScriptSlot`, `SecuritySlot`): el mismo valor en huecos hermanos es un
//! árbol distinto.
use super::{ActionDefinition, ConstraintDefinition, LinkDefinition, ProcessDefinition, ScriptDefinition,
            SecurityDefinition, StepDefinition, StepHandlerDefinition, TagDefinition, VariableDefinition,
            VariableMapDefinition};

/// Hueco de un script dentro de su padre.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptSlot {
    OnEntry,
    OnExit,
    /// Script embebido en un `StepHandlerDefinition::Script`.
    Handler,
}

/// Colección de seguridad del step a la que pertenece la entrada.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecuritySlot {
    PotentialOwner,
    BusinessManager,
}

/// Referencia prestada a cualquier nodo del árbol.
#[derive(Debug, Clone, Copy)]
pub enum DefinitionNode<'a> {
    Process(&'a ProcessDefinition),
    Step(&'a StepDefinition),
    Action(&'a ActionDefinition),
    Link(&'a LinkDefinition),
    Variable(&'a VariableDefinition),
    VariableMap(&'a VariableMapDefinition),
    Constraint(&'a ConstraintDefinition),
    Script(&'a ScriptDefinition, ScriptSlot),
    Security(&'a SecurityDefinition, SecuritySlot),
    StepHandler(&'a StepHandlerDefinition),
    Tag(&'a TagDefinition),
}

/// Visitante del recorrido canónico. Recibe cada nodo exactamente una vez.
pub trait DefinitionVisitor {
    fn visit(&mut self, node: DefinitionNode<'_>);
}

impl<'a> DefinitionNode<'a> {
    /// Nombre estable del tipo de nodo.
    pub fn kind(&self) -> &'static str {
        match self {
            DefinitionNode::Process(_) => "process",
            DefinitionNode::Step(_) => "step",
            DefinitionNode::Action(_) => "action",
            DefinitionNode::Link(_) => "link",
            DefinitionNode::Variable(_) => "variable",
            DefinitionNode::VariableMap(_) => "varmap",
            DefinitionNode::Constraint(_) => "constraint",
            DefinitionNode::Script(_, ScriptSlot::OnEntry) => "on_entry",
            DefinitionNode::Script(_, ScriptSlot::OnExit) => "on_exit",
            DefinitionNode::Script(_, ScriptSlot::Handler) => "script",
            DefinitionNode::Security(_, SecuritySlot::PotentialOwner) => "owner",
            DefinitionNode::Security(_, SecuritySlot::BusinessManager) => "manager",
            DefinitionNode::StepHandler(_) => "handler",
            DefinitionNode::Tag(_) => "tag",
        }
    }

    /// Hijos directos en orden de declaración.
    pub fn children(&self) -> Vec<DefinitionNode<'a>> {
        let mut out = Vec::new();
        match *self {
            DefinitionNode::Process(p) => {
                out.extend(p.steps.iter().map(DefinitionNode::Step));
                out.extend(p.links.iter().map(DefinitionNode::Link));
                out.extend(p.variables.iter().map(DefinitionNode::Variable));
                out.extend(p.tags.iter().map(DefinitionNode::Tag));
            }
            DefinitionNode::Step(s) => {
                out.extend(s.actions.iter().map(DefinitionNode::Action));
                out.extend(s.on_entry.iter().map(|x| DefinitionNode::Script(x, ScriptSlot::OnEntry)));
                out.extend(s.on_exit.iter().map(|x| DefinitionNode::Script(x, ScriptSlot::OnExit)));
                out.extend(s.variables_map.iter().map(DefinitionNode::VariableMap));
                out.extend(s.potential_owners
                             .iter()
                             .map(|x| DefinitionNode::Security(x, SecuritySlot::PotentialOwner)));
                out.extend(s.business_managers
                             .iter()
                             .map(|x| DefinitionNode::Security(x, SecuritySlot::BusinessManager)));
                out.extend(s.step_handler.iter().map(DefinitionNode::StepHandler));
                out.extend(s.tags.iter().map(DefinitionNode::Tag));
            }
            DefinitionNode::StepHandler(h) => {
                out.extend(h.script().map(|x| DefinitionNode::Script(x, ScriptSlot::Handler)));
            }
            DefinitionNode::Variable(v) => {
                out.extend(v.handler.iter().map(DefinitionNode::StepHandler));
                out.extend(v.constraints.iter().map(DefinitionNode::Constraint));
            }
            DefinitionNode::Action(_)
            | DefinitionNode::Link(_)
            | DefinitionNode::VariableMap(_)
            | DefinitionNode::Constraint(_)
            | DefinitionNode::Script(..)
            | DefinitionNode::Security(..)
            | DefinitionNode::Tag(_) => {}
        }
        out
    }

    /// Recorre el subárbol en post-orden entregando cada nodo al visitante.
    pub fn walk<V: DefinitionVisitor + ?Sized>(self, visitor: &mut V) {
        for child in self.children() {
            child.walk(visitor);
        }
        visitor.visit(self);
    }
}

impl ProcessDefinition {
    /// Entrega el árbol completo al visitante en orden canónico.
    pub fn accept<V: DefinitionVisitor + ?Sized>(&self, visitor: &mut V) {
        DefinitionNode::Process(self).walk(visitor);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{LinkDefinition, ScriptDefinition, StepHandlerDefinition, VariableType};
    use uuid::Uuid;

    struct KindCollector(Vec<&'static str>);
    impl DefinitionVisitor for KindCollector {
        fn visit(&mut self, node: DefinitionNode<'_>) {
            self.0.push(node.kind());
        }
    }

    fn step(id: &str) -> StepDefinition {
        StepDefinition { step_id: id.into(),
                         name: String::new(),
                         description: String::new(),
                         actions: vec![ActionDefinition::new("go")],
                         on_entry: None,
                         on_exit: Some(ScriptDefinition::default()),
                         variables_map: vec![],
                         potential_owners: vec![],
                         business_managers: vec![],
                         step_handler: Some(StepHandlerDefinition::Script(ScriptDefinition::default())),
                         tags: vec![] }
    }

    #[test]
    fn walk_is_post_order_in_declared_order() {
        let p = ProcessDefinition { id: Uuid::nil(),
                                    flow_id: "f".into(),
                                    name: "n".into(),
                                    description: String::new(),
                                    steps: vec![step("a"), step("b")],
                                    // ciclo a -> b -> a: no afecta al recorrido
                                    links: vec![LinkDefinition::new("ab", "a", "b"), LinkDefinition::new("ba", "b", "a")],
                                    variables: vec![VariableDefinition { name: "v".into(),
                                                                         description: String::new(),
                                                                         variable_type: VariableType::Int,
                                                                         constraints: Some(Default::default()),
                                                                         handler: None }],
                                    tags: vec![TagDefinition::new("t")] };
        let mut c = KindCollector(vec![]);
        p.accept(&mut c);
        let step_seq = ["action", "on_exit", "script", "handler", "step"];
        let mut expected: Vec<&str> = Vec::new();
        expected.extend(step_seq);
        expected.extend(step_seq);
        expected.extend(["link", "link", "constraint", "variable", "tag", "process"]);
        assert_eq!(c.0, expected);
    }
}
