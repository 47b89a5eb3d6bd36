//! Implementación Postgres (Diesel) del almacén de definiciones.
//!
//! - Una fila por `(id, version)` en `process_definitions` (PK compuesta).
//! - La unicidad `(flow_id, digest)` la impone el constraint
//!   `process_definitions_flow_digest_key`; un `insert` que lo viola se traduce
//!   a `DefinitionError::DuplicateContent` aunque el chequeo previo del
//!   servicio haya pasado (carrera entre dos `create`).
//! - `update_one` es un único `UPDATE ... WHERE id AND version`: la
//!   atomicidad por fila de Postgres decide el ganador de una carrera.
//! - Las lecturas reintentan errores transitorios; las escrituras nunca.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::r2d2::{self, ConnectionManager};
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel::sql_types::{Integer, Nullable, Text};
use log::{debug, warn};
use serde_json::Value;
use uuid::Uuid;

use procflow_core::{ContentDigest, DefinitionDocumentStore, DefinitionError, DefinitionKey, ProcessDefStatus,
                    ProcessDefinitionRecord, RecordPatch};

use crate::error::PersistenceError;
use crate::migrations::run_pending_migrations;
use crate::schema::process_definitions;

/// Nombre del constraint único `(flow_id, digest)` declarado en la migración.
pub const FLOW_DIGEST_CONSTRAINT: &str = "process_definitions_flow_digest_key";

/// Alias de tipo para el pool r2d2 de conexiones Postgres.
///
/// Notas operativas:
/// - El pool se construye con `min_idle` (mínimo de conexiones inactivas) y
///   `max_size` (límite superior total).
/// - Al construirlo, se corre automáticamente el set de migraciones pendientes
///   (una sola vez).
pub type PgPool = r2d2::Pool<ConnectionManager<PgConnection>>;

/// Proveedor abstracto de conexiones.
///
/// Permite inyectar un pool real (producción/tests de integración) o
/// simularlo sin acoplar a r2d2.
pub trait ConnectionProvider: Send + Sync + 'static {
    /// Obtiene una conexión lista para ejecutar consultas Diesel.
    fn connection(&self) -> Result<r2d2::PooledConnection<ConnectionManager<PgConnection>>, PersistenceError>;
}

/// Implementación concreta de `ConnectionProvider` respaldada por un `PgPool`.
pub struct PoolProvider {
    pub pool: PgPool,
}
impl ConnectionProvider for PoolProvider {
    fn connection(&self) -> Result<r2d2::PooledConnection<ConnectionManager<PgConnection>>, PersistenceError> {
        self.pool
            .get()
            .map_err(|e| PersistenceError::TransientIo(format!("pool error: {e}")))
    }
}

/// Fila mapeada de `process_definitions` (mismo orden de columnas que el schema).
#[derive(Queryable, Debug)]
pub struct DefinitionRow {
    pub id: Uuid,
    pub version: i32,
    pub flow_id: String,
    pub name: String,
    pub description: String,
    pub last_modified: DateTime<Utc>,
    pub status: i32,
    pub digest: String,
    pub encoded_definition: String,
    pub accounts: Value,
}

/// Fila para insertar en `process_definitions`.
#[derive(Insertable, Debug)]
#[diesel(table_name = process_definitions)]
pub struct NewDefinitionRow<'a> {
    pub id: Uuid,
    pub version: i32,
    pub flow_id: &'a str,
    pub name: &'a str,
    pub description: &'a str,
    pub last_modified: DateTime<Utc>,
    pub status: i32,
    pub digest: &'a str,
    pub encoded_definition: &'a str,
    pub accounts: Value,
}

impl TryFrom<DefinitionRow> for ProcessDefinitionRecord {
    type Error = DefinitionError;

    fn try_from(row: DefinitionRow) -> Result<Self, Self::Error> {
        let version = u32::try_from(row.version).map_err(|_| DefinitionError::Decode(format!("invalid version {}", row.version)))?;
        let accounts = serde_json::from_value(row.accounts).map_err(|e| DefinitionError::Decode(format!("accounts: {e}")))?;
        Ok(ProcessDefinitionRecord { id: row.id,
                                     flow_id: row.flow_id,
                                     version,
                                     name: row.name,
                                     description: row.description,
                                     last_modified: row.last_modified,
                                     status: ProcessDefStatus::try_from(row.status)?,
                                     digest: ContentDigest::from_encoded(row.digest),
                                     encoded_definition: row.encoded_definition,
                                     accounts })
    }
}

fn version_param(version: u32) -> Result<i32, DefinitionError> {
    i32::try_from(version).map_err(|_| DefinitionError::InvalidInput(format!("version {version} out of range")))
}

/// Determina si un error es transitorio (recomendado reintentar con backoff).
fn is_retryable(e: &PersistenceError) -> bool {
    match e {
        PersistenceError::SerializationConflict => true,
        PersistenceError::TransientIo(_) => true,
        // Algunos mensajes de error (dependen de driver/pg) pueden llegar como Unknown
        // con texto. Best-effort string match sin acoplar a SQLSTATE.
        PersistenceError::Unknown(msg) => {
            let m = msg.to_lowercase();
            m.contains("terminating connection due to administrator command")
            || m.contains("connection closed")
            || m.contains("connection refused")
            || m.contains("timeout")
        }
        _ => false,
    }
}

/// Retry simple con backoff lineal muy pequeño (hasta 3 reintentos). Sólo
/// se usa en lecturas idempotentes.
fn with_retry<F, T>(mut f: F) -> Result<T, PersistenceError>
    where F: FnMut() -> Result<T, PersistenceError>
{
    let mut attempts = 0;
    loop {
        match f() {
            Err(e) if is_retryable(&e) && attempts < 3 => {
                let delay_ms = 15 * ((attempts + 1) as u64);
                warn!("retryable error (attempt {}): {:?} -> sleeping {}ms",
                      attempts + 1,
                      e,
                      delay_ms);
                std::thread::sleep(std::time::Duration::from_millis(delay_ms));
                attempts += 1;
            }
            r => return r,
        }
    }
}

fn rows_to_records(rows: Vec<DefinitionRow>) -> Result<Vec<ProcessDefinitionRecord>, DefinitionError> {
    rows.into_iter().map(ProcessDefinitionRecord::try_from).collect()
}

/// Implementación Postgres de `DefinitionDocumentStore`.
pub struct PgDefinitionStore<P: ConnectionProvider> {
    pub provider: P,
}

impl<P: ConnectionProvider> PgDefinitionStore<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }
}

impl<P: ConnectionProvider> DefinitionDocumentStore for PgDefinitionStore<P> {
    fn find_all(&self) -> Result<Vec<ProcessDefinitionRecord>, DefinitionError> {
        debug!("find_all:start");
        let rows: Vec<DefinitionRow> = with_retry(|| {
            let mut conn = self.provider.connection()?;
            process_definitions::table.order((process_definitions::flow_id.asc(), process_definitions::version.asc()))
                                      .load(&mut conn)
                                      .map_err(PersistenceError::from)
        })?;
        debug!("find_all:done count={}", rows.len());
        rows_to_records(rows)
    }

    fn find_by_status(&self, status: ProcessDefStatus) -> Result<Vec<ProcessDefinitionRecord>, DefinitionError> {
        debug!("find_by_status:start status={status}");
        let rows: Vec<DefinitionRow> = with_retry(|| {
            let mut conn = self.provider.connection()?;
            process_definitions::table.filter(process_definitions::status.eq(status.as_i32()))
                                      .order((process_definitions::flow_id.asc(), process_definitions::version.asc()))
                                      .load(&mut conn)
                                      .map_err(PersistenceError::from)
        })?;
        rows_to_records(rows)
    }

    fn content_exists(&self, flow_id: &str, digest: &ContentDigest) -> Result<bool, DefinitionError> {
        let count: i64 = with_retry(|| {
            let mut conn = self.provider.connection()?;
            process_definitions::table.filter(process_definitions::flow_id.eq(flow_id))
                                      .filter(process_definitions::digest.eq(digest.as_str()))
                                      .count()
                                      .get_result(&mut conn)
                                      .map_err(PersistenceError::from)
        })?;
        Ok(count != 0)
    }

    fn insert(&self, record: ProcessDefinitionRecord) -> Result<(), DefinitionError> {
        let key = record.key();
        debug!("insert:start key={key} flow_id={}", record.flow_id);
        let accounts = serde_json::to_value(&record.accounts).map_err(|e| DefinitionError::Encode(format!("accounts: {e}")))?;
        let row = NewDefinitionRow { id: record.id,
                                     version: version_param(record.version)?,
                                     flow_id: &record.flow_id,
                                     name: &record.name,
                                     description: &record.description,
                                     last_modified: record.last_modified,
                                     status: record.status.as_i32(),
                                     digest: record.digest.as_str(),
                                     encoded_definition: &record.encoded_definition,
                                     accounts };
        let mut conn = self.provider.connection()?;
        match diesel::insert_into(process_definitions::table).values(&row).execute(&mut conn) {
            Ok(_) => {
                debug!("insert:done key={key}");
                Ok(())
            }
            Err(DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info)) => {
                warn!("insert:unique violation key={key} constraint={:?}", info.constraint_name());
                if info.constraint_name() == Some(FLOW_DIGEST_CONSTRAINT) {
                    Err(DefinitionError::DuplicateContent { flow_id: record.flow_id.clone(),
                                                            digest: record.digest.clone() })
                } else {
                    Err(DefinitionError::DuplicateKey { id: key.id, version: key.version })
                }
            }
            Err(e) => Err(PersistenceError::from(e).into()),
        }
    }

    fn find_one(&self, key: DefinitionKey) -> Result<Option<ProcessDefinitionRecord>, DefinitionError> {
        let version = version_param(key.version)?;
        let row: Option<DefinitionRow> = with_retry(|| {
            let mut conn = self.provider.connection()?;
            process_definitions::table.filter(process_definitions::id.eq(key.id))
                                      .filter(process_definitions::version.eq(version))
                                      .first(&mut conn)
                                      .optional()
                                      .map_err(PersistenceError::from)
        })?;
        debug!("find_one key={key} found={}", row.is_some());
        row.map(ProcessDefinitionRecord::try_from).transpose()
    }

    fn update_one(&self, key: DefinitionKey, patch: &RecordPatch) -> Result<u64, DefinitionError> {
        let version = version_param(key.version)?;
        let mut conn = self.provider.connection()?;
        // COALESCE deja intacta la columna cuando el parámetro es NULL; una
        // cadena vacía sí se asigna.
        let modified = diesel::sql_query("UPDATE process_definitions \
                                          SET name = COALESCE($3, name), \
                                              description = COALESCE($4, description), \
                                              status = COALESCE($5, status), \
                                              last_modified = GREATEST(now(), last_modified + interval '1 microsecond') \
                                          WHERE id = $1 AND version = $2")
            .bind::<diesel::sql_types::Uuid, _>(key.id)
            .bind::<Integer, _>(version)
            .bind::<Nullable<Text>, _>(patch.name.clone())
            .bind::<Nullable<Text>, _>(patch.description.clone())
            .bind::<Nullable<Integer>, _>(patch.status.map(ProcessDefStatus::as_i32))
            .execute(&mut conn)
            .map_err(PersistenceError::from)?;
        debug!("update_one key={key} modified={modified}");
        Ok(modified as u64)
    }
}

/// Construye un pool Postgres r2d2 a partir de URL.
///
/// Comportamiento:
/// - Valida y ajusta tamaños (si `min_size > max_size`, usa `min_size =
///   max_size`).
/// - Ejecuta migraciones inmediatamente tras el primer `get()`.
/// - Devuelve `PersistenceError::TransientIo` ante errores del pool/manager.
pub fn build_pool(database_url: &str, min_size: u32, max_size: u32) -> Result<PgPool, PersistenceError> {
    let validated_min = if min_size == 0 { 1 } else { min_size };
    let validated_max = if max_size == 0 { 1 } else { max_size };
    if validated_min > validated_max {
        warn!("min_size > max_size ({} > {}), ajustando min=max",
              validated_min, validated_max);
    }
    let final_min = validated_min.min(validated_max);
    let manager = ConnectionManager::<PgConnection>::new(database_url);
    let pool = r2d2::Pool::builder().min_idle(Some(final_min))
                                    .max_size(validated_max)
                                    .build(manager)
                                    .map_err(|e| PersistenceError::TransientIo(format!("pool build: {e}")))?;
    {
        let mut conn = pool.get()
                           .map_err(|e| PersistenceError::TransientIo(format!("pool get for migrations: {e}")))?;
        run_pending_migrations(&mut conn)?;
    }
    Ok(pool)
}

/// Helper de desarrollo: carga `.env`, lee configuración (DATABASE_URL,
/// tamaños) y construye un pool ya migrado.
pub fn build_dev_pool_from_env() -> Result<PgPool, PersistenceError> {
    crate::config::init_dotenv();
    let cfg = crate::config::DbConfig::from_env()?;
    build_pool(&cfg.url, cfg.min_connections, cfg.max_connections)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_transient_errors_are_retryable() {
        assert!(is_retryable(&PersistenceError::TransientIo("pool".into())));
        assert!(is_retryable(&PersistenceError::SerializationConflict));
        assert!(is_retryable(&PersistenceError::Unknown("Connection refused (os error 111)".into())));
        assert!(!is_retryable(&PersistenceError::UniqueViolation("dup".into())));
        assert!(!is_retryable(&PersistenceError::NotFound));
    }

    #[test]
    fn with_retry_gives_up_after_three_retries() {
        let mut calls = 0;
        let r: Result<(), _> = with_retry(|| {
            calls += 1;
            Err(PersistenceError::TransientIo("down".into()))
        });
        assert!(r.is_err());
        assert_eq!(calls, 4);
    }

    #[test]
    fn row_conversion_rejects_unknown_status() {
        let row = DefinitionRow { id: Uuid::new_v4(),
                                  version: 1,
                                  flow_id: "F1".into(),
                                  name: String::new(),
                                  description: String::new(),
                                  last_modified: Utc::now(),
                                  status: 9,
                                  digest: "x".into(),
                                  encoded_definition: String::new(),
                                  accounts: serde_json::json!([]) };
        assert!(matches!(ProcessDefinitionRecord::try_from(row), Err(DefinitionError::Decode(_))));
    }
}
