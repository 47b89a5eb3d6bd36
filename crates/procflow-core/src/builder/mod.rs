//! DSL fluida de construcción del árbol.
//!
//! Los builders se consumen y se devuelven (`fn x(self) -> Self`), igual que
//! el builder del engine. Un sub-builder no guarda referencia a su padre:
//! produce un valor inmutable con `build()` y el llamador lo entrega a la
//! operación `add`/`step`/`variable` del padre. Las operaciones que pueden
//! violar el contrato de entrada devuelven `Result<Self, DefinitionError>`.
//!
//! ```ignore
//! let def = ProcessBuilder::new("F1")
//!     .name("Approval")
//!     .step(StepBuilder::new("S1").action(ActionDefinition::new("approve")).build()?)
//!     .define_variable(|v| v.name("amount").var_type(VariableType::Int))?
//!     .build()?;
//! ```

pub mod handler;
pub mod process;
pub mod script;
pub mod security;
pub mod step;
pub mod variable;

pub use handler::HandlerBuilder;
pub use process::ProcessBuilder;
pub use script::ScriptBuilder;
pub use security::{SecurityBuilder, StepSecurity};
pub use step::StepBuilder;
pub use variable::{ConstraintBuilder, VariableBuilder};
