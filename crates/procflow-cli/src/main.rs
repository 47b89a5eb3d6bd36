use std::process::exit;

use procflow_core::{ActionDefinition, DefinitionDocumentStore, DefinitionPersistenceService, DefinitionUpdate,
                    InMemoryDocumentStore, LinkDefinition, ProcessBuilder, ProcessDefStatus, ProcessDefinition,
                    ProcessDefinitionSummary, SecurityBuilder, SecurityDefinition, StepBuilder, VariableType};
use procflow_persistence::{build_dev_pool_from_env, PgDefinitionStore, PoolProvider};
use uuid::Uuid;

const USAGE: &str = "Uso:
  procflow list [--active]
  procflow show --id <UUID> --version <N>
  procflow set-status --id <UUID> --version <N> --status <active|not-active|draft>
  procflow update --id <UUID> --version <N> [--name <TXT>] [--description <TXT>]
  procflow demo";

/// Opciones `--clave valor` recogidas tras el subcomando.
#[derive(Default)]
struct Opts {
    id: Option<Uuid>,
    version: Option<u32>,
    status: Option<String>,
    name: Option<String>,
    description: Option<String>,
    active: bool,
}

fn parse_opts(args: &[String]) -> Result<Opts, String> {
    let mut o = Opts::default();
    let mut i = 0;
    while i < args.len() {
        let flag = args[i].as_str();
        if flag == "--active" {
            o.active = true;
            i += 1;
            continue;
        }
        let value = args.get(i + 1).ok_or_else(|| format!("falta valor para {flag}"))?;
        match flag {
            "--id" => o.id = Some(Uuid::parse_str(value).map_err(|e| format!("--id inválido: {e}"))?),
            "--version" => o.version = Some(value.parse().map_err(|_| format!("--version inválido: {value}"))?),
            "--status" => o.status = Some(value.clone()),
            "--name" => o.name = Some(value.clone()),
            "--description" => o.description = Some(value.clone()),
            other => return Err(format!("opción desconocida: {other}")),
        }
        i += 2;
    }
    Ok(o)
}

fn usage_exit(msg: &str) -> ! {
    eprintln!("[procflow] {msg}");
    eprintln!("{USAGE}");
    exit(2);
}

fn require_key(o: &Opts) -> (Uuid, u32) {
    match (o.id, o.version) {
        (Some(id), Some(version)) => (id, version),
        _ => usage_exit("se requieren --id y --version"),
    }
}

fn pg_service() -> DefinitionPersistenceService<PgDefinitionStore<PoolProvider>> {
    if std::env::var("DATABASE_URL").is_err() {
        eprintln!("[procflow] requiere DATABASE_URL para operar contra backend persistente");
        exit(4);
    }
    match build_dev_pool_from_env() {
        Ok(pool) => DefinitionPersistenceService::new(PgDefinitionStore::new(PoolProvider { pool })),
        Err(e) => {
            eprintln!("[procflow] pool error: {e}");
            exit(5);
        }
    }
}

fn print_summaries(rows: &[ProcessDefinitionSummary]) {
    for s in rows {
        println!("{}\tv{}\t{}\t{}\t{}\t{}",
                 s.id,
                 s.version,
                 s.status,
                 s.digest,
                 s.last_updated.to_rfc3339(),
                 s.name);
    }
}

/// Flujo de aprobación de muestra usado por `demo`.
fn sample_definition(flow_id: &str) -> Result<ProcessDefinition, procflow_core::DefinitionError> {
    let security = SecurityBuilder::new().add_potential_owners(&[SecurityDefinition::role("clerk")])?
                                         .add_business_administrators(&[SecurityDefinition::group("finance")])?
                                         .build();
    ProcessBuilder::new(flow_id).name("Invoice approval")
                                                .description("demo")
                                                .step(StepBuilder::new("review").name("Review")
                                                                                .action(ActionDefinition::new("approve"))
                                                                                .action(ActionDefinition::new("reject"))
                                                                                .map_variable("amount", true)
                                                                                .security(security)
                                                                                .build()?)
                                                .step(StepBuilder::new("archive").name("Archive").build()?)
                                                .link(LinkDefinition::new("approved", "review", "archive"))
                                                .define_variable(|v| v.name("amount").var_type(VariableType::Int))?
                                                .build()
}

fn run_demo<S: DefinitionDocumentStore>(svc: &DefinitionPersistenceService<S>, flow_id: &str) -> i32 {
    let def = match sample_definition(flow_id) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("[procflow demo] {e}");
            return 5;
        }
    };
    match svc.create(&def, ProcessDefStatus::Active, 1, &[]) {
        Ok(digest) => println!("creado: id={} version=1 digest={digest}", def.id),
        Err(e) => {
            eprintln!("[procflow demo] create: {e}");
            return 5;
        }
    }
    // Segundo create con el mismo contenido: debe rechazarse.
    match svc.create(&def, ProcessDefStatus::Active, 2, &[]) {
        Err(e) => println!("duplicado rechazado: {e}"),
        Ok(_) => {
            eprintln!("[procflow demo] duplicado aceptado");
            return 5;
        }
    }
    match svc.list_all(&[]) {
        Ok(rows) => {
            print_summaries(&rows);
            0
        }
        Err(e) => {
            eprintln!("[procflow demo] list: {e}");
            5
        }
    }
}

fn main() {
    // Cargar .env si existe para obtener DATABASE_URL
    let _ = dotenvy::dotenv();
    let args: Vec<String> = std::env::args().collect();
    let Some(cmd) = args.get(1) else { usage_exit("falta subcomando") };
    let opts = match parse_opts(&args[2..]) {
        Ok(o) => o,
        Err(e) => usage_exit(&e),
    };

    let code = match cmd.as_str() {
        "list" => {
            let svc = pg_service();
            let rows = if opts.active { svc.list_active(&[]) } else { svc.list_all(&[]) };
            match rows {
                Ok(rows) => {
                    print_summaries(&rows);
                    0
                }
                Err(e) => {
                    eprintln!("error: {e}");
                    5
                }
            }
        }
        "show" => {
            let (id, version) = require_key(&opts);
            match pg_service().try_find(id, version) {
                Ok(Some(found)) => {
                    println!("status: {}", found.status);
                    match serde_json::to_string_pretty(&found.definition) {
                        Ok(json) => {
                            println!("{json}");
                            0
                        }
                        Err(e) => {
                            eprintln!("error: {e}");
                            5
                        }
                    }
                }
                Ok(None) => {
                    eprintln!("no encontrado: {id}@v{version}");
                    4
                }
                Err(e) => {
                    eprintln!("error: {e}");
                    5
                }
            }
        }
        "set-status" => {
            let (id, version) = require_key(&opts);
            let Some(raw) = opts.status.as_deref() else { usage_exit("se requiere --status") };
            let status: ProcessDefStatus = match raw.parse() {
                Ok(s) => s,
                Err(e) => usage_exit(&e.to_string()),
            };
            match pg_service().set_status(id, version, status) {
                Ok(true) => {
                    println!("estado actualizado: {id}@v{version} -> {status}");
                    0
                }
                Ok(false) => {
                    eprintln!("rechazado: {id}@v{version} no existe");
                    4
                }
                Err(e) => {
                    eprintln!("error: {e}");
                    5
                }
            }
        }
        "update" => {
            let (id, version) = require_key(&opts);
            let update = DefinitionUpdate { name: opts.name.clone(),
                                            description: opts.description.clone() };
            if update.is_empty() {
                usage_exit("update requiere --name y/o --description");
            }
            let svc = pg_service();
            // `update` no informa coincidencias; se verifica existencia antes.
            match svc.try_find(id, version) {
                Ok(Some(_)) => {}
                Ok(None) => {
                    eprintln!("no encontrado: {id}@v{version}");
                    exit(4);
                }
                Err(e) => {
                    eprintln!("error: {e}");
                    exit(5);
                }
            }
            match svc.update(id, version, update) {
                Ok(()) => {
                    println!("actualizado: {id}@v{version}");
                    0
                }
                Err(e) => {
                    eprintln!("error: {e}");
                    5
                }
            }
        }
        "demo" => {
            if std::env::var("DATABASE_URL").is_ok() {
                // linaje nuevo por corrida: el contenido de la demo es siempre el mismo
                run_demo(&pg_service(), &format!("demo.invoice-approval.{}", Uuid::new_v4()))
            } else {
                eprintln!("[procflow demo] sin DATABASE_URL: usando almacén en memoria");
                run_demo(&DefinitionPersistenceService::new(InMemoryDocumentStore::new()), "demo.invoice-approval")
            }
        }
        other => usage_exit(&format!("subcomando desconocido: {other}")),
    };
    exit(code);
}
