use crate::error::CatalogError;
use crate::models::ReflectedSchema;
use async_trait::async_trait;

/// Reflects a live schema's tables, columns, and foreign keys. Implemented
/// by each dialect's adapter in `clients`; a fake implementation backs the
/// unit tests here and in `orchestrator`.
#[async_trait]
pub trait SchemaReflector: Send + Sync {
    /// The schema names visible to this connection, in their native case
    /// (case-insensitive lookup is the caller's job, matching SQLAlchemy's
    /// `Inspector.get_schema_names`). `&mut self` because most drivers
    /// (everything but `tokio_postgres`) need exclusive access to issue a
    /// query.
    async fn schema_names(&mut self) -> Result<Vec<String>, CatalogError>;

    /// Reflects every table in `schema`. A non-empty `warning` on the
    /// returned `ReflectedSchema` means the migration must abort before
    /// touching the target.
    async fn reflect(&mut self, schema: &str) -> Result<ReflectedSchema, CatalogError>;
}

/// Executes one DDL statement against the target connection. Kept separate
/// from `SchemaReflector` because the target side only ever needs to
/// execute, never reflect, during schema construction.
#[async_trait]
pub trait DdlExecutor: Send + Sync {
    async fn execute(&mut self, statement: &str) -> Result<(), CatalogError>;
}
