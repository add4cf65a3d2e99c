//! RDBMS adapters and the S3 object-storage wrapper: the concrete
//! connections `catalog`, `transfer`, and `sync` drive through their
//! dialect-agnostic traits. Generalizes the teacher's single
//! Postgres-only `shared_clients` adapter to the four dialects spec.md §1
//! migrates between.

pub mod error;
pub mod mysql;
pub mod oracle;
pub mod postgres;
pub mod s3;
pub mod sqlserver;

pub use error::ClientError;
pub use s3::S3Client;

use async_trait::async_trait;
use catalog::{ForeignKeyRef, ReflectedColumn, ReflectedSchema, ReflectedTable};
use common::config::{RdbmsKind, RdbmsSpotConfig};
use std::collections::HashMap;

/// One row, column name to value, loosely typed the way every driver's
/// native row eventually gets serialized for transfer (component C/D don't
/// need anything richer than this to move or diff data).
pub type Row = HashMap<String, serde_json::Value>;

/// The operations every dialect adapter exposes: enough for `catalog` to
/// issue DDL and for `transfer`/`sync` to move rows in bounded channels.
#[async_trait]
pub trait RdbmsAdapter: Send + Sync {
    async fn execute(&mut self, sql: &str) -> Result<u64, ClientError>;
    async fn query(&mut self, sql: &str) -> Result<Vec<Row>, ClientError>;
}

/// Lets any `RdbmsAdapter` serve as `catalog`'s `DdlExecutor`: schema
/// construction is just a sequence of `execute` calls with no result set.
#[async_trait]
impl<T: RdbmsAdapter + ?Sized> catalog::DdlExecutor for T {
    async fn execute(&mut self, statement: &str) -> Result<(), catalog::CatalogError> {
        RdbmsAdapter::execute(self, statement).await?;
        Ok(())
    }
}

/// Connects to `spot` using the adapter for its dialect.
pub async fn connect(spot: &RdbmsSpotConfig) -> Result<Box<dyn RdbmsAdapter>, ClientError> {
    match spot.engine {
        RdbmsKind::Postgres => Ok(Box::new(postgres::PostgresAdapter::connect(spot).await?)),
        RdbmsKind::MySql => Ok(Box::new(mysql::MySqlAdapter::connect(spot).await?)),
        RdbmsKind::SqlServer => Ok(Box::new(sqlserver::SqlServerAdapter::connect(spot).await?)),
        RdbmsKind::Oracle => Ok(Box::new(oracle::OracleAdapter::connect(spot).await?)),
    }
}

/// Connects to `spot` for schema reflection only. A second, independent
/// connection from `connect` -- `catalog::migrate_metadata` needs the
/// target as both a reflector and an executor and Rust won't let one
/// `Box<dyn RdbmsAdapter>` serve both `&mut` roles at once.
pub async fn connect_reflector(spot: &RdbmsSpotConfig) -> Result<Box<dyn catalog::SchemaReflector>, ClientError> {
    match spot.engine {
        RdbmsKind::Postgres => Ok(Box::new(postgres::PostgresAdapter::connect(spot).await?)),
        RdbmsKind::MySql => Ok(Box::new(mysql::MySqlAdapter::connect(spot).await?)),
        RdbmsKind::SqlServer => Ok(Box::new(sqlserver::SqlServerAdapter::connect(spot).await?)),
        RdbmsKind::Oracle => Ok(Box::new(oracle::OracleAdapter::connect(spot).await?)),
    }
}

/// Connects to `spot` for DDL execution only, as a `catalog::DdlExecutor`
/// trait object built from the concrete adapter directly -- `dyn
/// RdbmsAdapter` cannot be re-coerced into `dyn DdlExecutor` after the
/// fact, since `DdlExecutor` isn't a supertrait of `RdbmsAdapter`.
pub async fn connect_executor(spot: &RdbmsSpotConfig) -> Result<Box<dyn catalog::DdlExecutor>, ClientError> {
    match spot.engine {
        RdbmsKind::Postgres => Ok(Box::new(postgres::PostgresAdapter::connect(spot).await?)),
        RdbmsKind::MySql => Ok(Box::new(mysql::MySqlAdapter::connect(spot).await?)),
        RdbmsKind::SqlServer => Ok(Box::new(sqlserver::SqlServerAdapter::connect(spot).await?)),
        RdbmsKind::Oracle => Ok(Box::new(oracle::OracleAdapter::connect(spot).await?)),
    }
}

/// A raw column record as returned by an information_schema-style catalog
/// query, before it's grouped into `ReflectedTable`s. Every dialect adapter
/// maps its native catalog rows into this common shape.
pub struct RawColumn {
    pub table: String,
    pub column: String,
    pub native_type: String,
    pub nullable: bool,
    pub length: Option<u32>,
    pub precision: Option<u32>,
    pub scale: Option<u32>,
    pub is_primary_key: bool,
    pub is_unique: bool,
    pub is_identity: bool,
    pub foreign_key: Option<ForeignKeyRef>,
}

/// Groups flat `RawColumn` rows (the natural shape of a catalog-view
/// query) into one `ReflectedTable` per distinct table name, preserving
/// row order within each table.
pub fn group_into_tables(
    dialect: RdbmsKind,
    rows: Vec<RawColumn>,
    classify: impl Fn(RdbmsKind, &str) -> types::TypeClass,
) -> ReflectedSchema {
    let mut order: Vec<String> = Vec::new();
    let mut tables: HashMap<String, Vec<ReflectedColumn>> = HashMap::new();

    for row in rows {
        let type_class = classify(dialect, &row.native_type);
        let column = ReflectedColumn {
            name: row.column,
            type_class,
            nullable: row.nullable,
            length: row.length,
            precision: row.precision,
            scale: row.scale,
            asdecimal: None,
            timezone: None,
            is_primary_key: row.is_primary_key,
            is_unique: row.is_unique,
            identity: row.is_identity.then_some(types::IdentitySpec::default()),
            foreign_key: row.foreign_key,
        };

        if !tables.contains_key(&row.table) {
            order.push(row.table.clone());
        }
        tables.entry(row.table).or_default().push(column);
    }

    ReflectedSchema {
        tables: order
            .into_iter()
            .map(|name| {
                let columns = tables.remove(&name).unwrap_or_default();
                ReflectedTable { name, columns }
            })
            .collect(),
        warning: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::TypeClass;

    #[test]
    fn groups_raw_columns_preserving_table_order() {
        let rows = vec![
            RawColumn {
                table: "orders".into(),
                column: "id".into(),
                native_type: "int4".into(),
                nullable: false,
                length: None,
                precision: None,
                scale: None,
                is_primary_key: true,
                is_unique: false,
                is_identity: false,
                foreign_key: None,
            },
            RawColumn {
                table: "customers".into(),
                column: "id".into(),
                native_type: "int4".into(),
                nullable: false,
                length: None,
                precision: None,
                scale: None,
                is_primary_key: true,
                is_unique: false,
                is_identity: false,
                foreign_key: None,
            },
        ];

        let schema = group_into_tables(RdbmsKind::Postgres, rows, |_, _| TypeClass::Integer);
        assert_eq!(schema.tables.len(), 2);
        assert_eq!(schema.tables[0].name, "orders");
        assert_eq!(schema.tables[1].name, "customers");
    }
}
