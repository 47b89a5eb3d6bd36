use procflow_rust::procflow_core::{ActionDefinition, DefinitionDocumentStore, DefinitionUpdate, LinkDefinition, StepBuilder};
use procflow_rust::{DefinitionError, DefinitionPersistenceService, InMemoryDocumentStore, ProcessBuilder,
                    ProcessDefStatus};

/// Recorrido mínimo: crear, deduplicar, nueva versión, activar, renombrar y
/// releer.
fn run_demo<S: DefinitionDocumentStore>(svc: &DefinitionPersistenceService<S>, flow_id: &str)
                                        -> Result<(), DefinitionError> {
    let base = ProcessBuilder::new(flow_id).name("Onboarding")
                                           .step(StepBuilder::new("collect").action(ActionDefinition::new("submit"))
                                                                            .build()?)
                                           .step(StepBuilder::new("verify").action(ActionDefinition::new("approve"))
                                                                           .build()?)
                                           .link(LinkDefinition::new("next", "collect", "verify"));
    let v1 = base.build()?;
    let d1 = svc.create(&v1, ProcessDefStatus::Draft, 1, &[])?;
    println!("v1 digest={d1}");

    match svc.create(&v1, ProcessDefStatus::Draft, 2, &[]) {
        Err(DefinitionError::DuplicateContent { .. }) => println!("v1 repetida: rechazada"),
        other => println!("inesperado: {other:?}"),
    }

    let v2 = base.step(StepBuilder::new("archive").build()?).build()?;
    let d2 = svc.create(&v2, ProcessDefStatus::Draft, 2, &[])?;
    println!("v2 digest={d2}");

    svc.set_status(v2.id, 2, ProcessDefStatus::Active)?;
    svc.update(v2.id, 2, DefinitionUpdate::new().name("Onboarding v2"))?;
    for s in svc.list_active(&[])? {
        println!("activo: {} v{} {} ({})", s.id, s.version, s.name, s.digest);
    }
    if let Some(found) = svc.try_find(v2.id, 2)? {
        println!("steps en v2: {}", found.definition.steps.len());
    }
    Ok(())
}

#[cfg(feature = "pg_demo")]
fn run_pg_demo() {
    use procflow_rust::procflow_persistence::{build_dev_pool_from_env, PgDefinitionStore, PoolProvider};
    match build_dev_pool_from_env() {
        Ok(pool) => {
            let svc = DefinitionPersistenceService::new(PgDefinitionStore::new(PoolProvider { pool }));
            let flow_id = format!("demo.onboarding.{}", uuid::Uuid::new_v4());
            if let Err(e) = run_demo(&svc, &flow_id) {
                eprintln!("[pg_demo] error: {e}");
            }
        }
        Err(e) => eprintln!("[pg_demo] pool error: {e}"),
    }
}

fn main() {
    let _ = dotenvy::dotenv();
    let svc = DefinitionPersistenceService::new(InMemoryDocumentStore::new());
    if let Err(e) = run_demo(&svc, "demo.onboarding") {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
    #[cfg(feature = "pg_demo")]
    run_pg_demo();
}
