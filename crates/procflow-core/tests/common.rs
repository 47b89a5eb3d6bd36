#![allow(dead_code)]

use procflow_core::{ActionDefinition, LinkDefinition, ProcessBuilder, ProcessDefinition, ScriptBuilder, ScriptLanguage,
                    SecurityBuilder, SecurityDefinition, StepBuilder, VariableType, HandlerBuilder};
use uuid::Uuid;

/// Proceso de aprobación de referencia: dos steps, un link, dos variables.
pub fn approval_flow(flow_id: &str, id: Uuid) -> ProcessDefinition {
    let security = SecurityBuilder::new().add_potential_owners(&[SecurityDefinition::role("clerk")])
                                         .unwrap()
                                         .add_business_administrators(&[SecurityDefinition::group("finance")])
                                         .unwrap()
                                         .build();
    let on_entry = ScriptBuilder::new().language(ScriptLanguage::Rhai)
                                       .body("notify(owner)")
                                       .add_imports(["mail"])
                                       .build();
    let handler = HandlerBuilder::new().class("acme.handlers.Approve").build().unwrap();
    ProcessBuilder::new(flow_id).with_id(id)
                                .name("Invoice approval")
                                .description("two-step approval")
                                .step(StepBuilder::new("S1").name("review")
                                                            .action(ActionDefinition::new("approve"))
                                                            .action(ActionDefinition::new("reject").skippable(true))
                                                            .on_entry(on_entry)
                                                            .map_variable("amount", true)
                                                            .security(security)
                                                            .handler(handler)
                                                            .build()
                                                            .unwrap())
                                .step(StepBuilder::new("S2").name("archive").build().unwrap())
                                .link(LinkDefinition::new("approved", "S1", "S2"))
                                .define_variable(|v| v.name("amount").var_type(VariableType::Int))
                                .unwrap()
                                .define_variable(|v| v.name("comment"))
                                .unwrap()
                                .build()
                                .unwrap()
}

/// El proceso mínimo del escenario end-to-end: F1 / S1 / "approve".
pub fn single_step(flow_id: &str, id: Uuid) -> ProcessDefinition {
    ProcessBuilder::new(flow_id).with_id(id)
                                .name("simple")
                                .step(StepBuilder::new("S1").action(ActionDefinition::new("approve"))
                                                            .build()
                                                            .unwrap())
                                .build()
                                .unwrap()
}
