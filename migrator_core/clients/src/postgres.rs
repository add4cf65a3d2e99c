//! PostgreSQL adapter, grounded on the teacher's own (Postgres-only)
//! `tokio_postgres`-backed adapter.

use crate::error::ClientError;
use crate::{group_into_tables, RawColumn, RdbmsAdapter, Row};
use async_trait::async_trait;
use catalog::{CatalogError, ForeignKeyRef, ReflectedSchema, SchemaReflector};
use common::config::{RdbmsKind, RdbmsSpotConfig};
use serde_json::Value;
use std::collections::HashMap;
use tokio_postgres::{Client, NoTls};
use types::TypeClass;

pub struct PostgresAdapter {
    client: Client,
}

impl PostgresAdapter {
    pub async fn connect(spot: &RdbmsSpotConfig) -> Result<Self, ClientError> {
        let conn_str = format!(
            "host={} port={} user={} password={} dbname={}",
            spot.host, spot.port, spot.user, spot.pwd, spot.name,
        );
        let (client, connection) = tokio_postgres::connect(&conn_str, NoTls)
            .await
            .map_err(|e| ClientError::invalid_connection(e.to_string()))?;

        tokio::spawn(async move {
            if let Err(e) = connection.await {
                tracing::error!(error = %e, "postgres connection closed with error");
            }
        });

        Ok(Self { client })
    }
}

fn value_at(row: &tokio_postgres::Row, i: usize) -> Value {
    if let Ok(v) = row.try_get::<_, Option<i64>>(i) {
        return v.map(Value::from).unwrap_or(Value::Null);
    }
    if let Ok(v) = row.try_get::<_, Option<f64>>(i) {
        return v.map(Value::from).unwrap_or(Value::Null);
    }
    if let Ok(v) = row.try_get::<_, Option<bool>>(i) {
        return v.map(Value::Bool).unwrap_or(Value::Null);
    }
    row.try_get::<_, Option<String>>(i)
        .ok()
        .flatten()
        .map(Value::String)
        .unwrap_or(Value::Null)
}

fn row_to_map(row: &tokio_postgres::Row) -> Row {
    row.columns()
        .iter()
        .enumerate()
        .map(|(i, column)| (column.name().to_string(), value_at(row, i)))
        .collect()
}

#[async_trait]
impl RdbmsAdapter for PostgresAdapter {
    async fn execute(&mut self, sql: &str) -> Result<u64, ClientError> {
        self.client
            .execute(sql, &[])
            .await
            .map_err(|e| ClientError::syntax(e.to_string()))
    }

    async fn query(&mut self, sql: &str) -> Result<Vec<Row>, ClientError> {
        let rows = self
            .client
            .query(sql, &[])
            .await
            .map_err(|e| ClientError::syntax(e.to_string()))?;
        Ok(rows.iter().map(row_to_map).collect())
    }
}

/// Maps a Postgres `information_schema.columns.udt_name` to a `TypeClass`.
/// Unrecognized native types fall back to `Varchar` with a warning, mirroring
/// the resolver's own "no equivalence found, keep going" philosophy.
fn native_type_to_class(native_type: &str) -> TypeClass {
    match native_type.to_ascii_lowercase().as_str() {
        "int2" => TypeClass::SmallInt,
        "int4" => TypeClass::Integer,
        "int8" => TypeClass::BigInt,
        "numeric" => TypeClass::Numeric,
        "float4" | "float8" => TypeClass::Float,
        "bool" => TypeClass::Boolean,
        "varchar" => TypeClass::Varchar,
        "bpchar" => TypeClass::Char,
        "text" => TypeClass::Text,
        "bytea" => TypeClass::PgBytea,
        "date" => TypeClass::Date,
        "time" => TypeClass::Time,
        "timestamp" => TypeClass::DateTime,
        "timestamptz" => TypeClass::PgTimestampTz,
        "uuid" => TypeClass::Uuid,
        "json" => TypeClass::Json,
        "jsonb" => TypeClass::PgJsonb,
        "_text" | "_int4" | "_varchar" => TypeClass::PgArray,
        other => {
            tracing::warn!(native_type = other, "unrecognized postgres type, defaulting to varchar");
            TypeClass::Varchar
        }
    }
}

const COLUMNS_SQL: &str = "\
    SELECT table_name, column_name, udt_name, is_nullable, \
           character_maximum_length, numeric_precision, numeric_scale, is_identity \
    FROM information_schema.columns \
    WHERE table_schema = '{schema}' \
    ORDER BY table_name, ordinal_position";

const PRIMARY_KEYS_SQL: &str = "\
    SELECT kcu.table_name, kcu.column_name \
    FROM information_schema.table_constraints tc \
    JOIN information_schema.key_column_usage kcu \
      ON tc.constraint_name = kcu.constraint_name AND tc.table_schema = kcu.table_schema \
    WHERE tc.constraint_type = 'PRIMARY KEY' AND tc.table_schema = '{schema}'";

const FOREIGN_KEYS_SQL: &str = "\
    SELECT kcu.table_name, kcu.column_name, ccu.table_name AS foreign_table, ccu.column_name AS foreign_column \
    FROM information_schema.table_constraints tc \
    JOIN information_schema.key_column_usage kcu \
      ON tc.constraint_name = kcu.constraint_name AND tc.table_schema = kcu.table_schema \
    JOIN information_schema.constraint_column_usage ccu \
      ON tc.constraint_name = ccu.constraint_name AND tc.table_schema = ccu.table_schema \
    WHERE tc.constraint_type = 'FOREIGN KEY' AND tc.table_schema = '{schema}'";

fn str_field(row: &Row, key: &str) -> String {
    row.get(key).and_then(Value::as_str).unwrap_or_default().to_string()
}

#[async_trait]
impl SchemaReflector for PostgresAdapter {
    async fn schema_names(&mut self) -> Result<Vec<String>, CatalogError> {
        let rows = self
            .query("SELECT schema_name FROM information_schema.schemata")
            .await
            .map_err(|e| CatalogError::construction_failed(e.to_string()))?;
        Ok(rows.into_iter().map(|r| str_field(&r, "schema_name")).collect())
    }

    async fn reflect(&mut self, schema: &str) -> Result<ReflectedSchema, CatalogError> {
        self.reflect_impl(schema)
            .await
            .map_err(|e| CatalogError::construction_failed(e.to_string()))
    }
}

impl PostgresAdapter {
    async fn reflect_impl(&mut self, schema: &str) -> Result<ReflectedSchema, ClientError> {
        let columns_sql = COLUMNS_SQL.replace("{schema}", schema);
        let pk_sql = PRIMARY_KEYS_SQL.replace("{schema}", schema);
        let fk_sql = FOREIGN_KEYS_SQL.replace("{schema}", schema);

        let column_rows = self.query(&columns_sql).await?;
        let pk_rows = self.query(&pk_sql).await?;
        let fk_rows = self.query(&fk_sql).await?;

        let mut primary_keys: HashMap<(String, String), bool> = HashMap::new();
        for row in &pk_rows {
            primary_keys.insert((str_field(row, "table_name"), str_field(row, "column_name")), true);
        }

        let mut foreign_keys: HashMap<(String, String), ForeignKeyRef> = HashMap::new();
        for row in &fk_rows {
            foreign_keys.insert(
                (str_field(row, "table_name"), str_field(row, "column_name")),
                ForeignKeyRef {
                    table: str_field(row, "foreign_table"),
                    column: str_field(row, "foreign_column"),
                },
            );
        }

        let raw: Vec<RawColumn> = column_rows
            .into_iter()
            .map(|row| {
                let table = str_field(&row, "table_name");
                let column = str_field(&row, "column_name");
                let key = (table.clone(), column.clone());
                RawColumn {
                    is_primary_key: primary_keys.contains_key(&key),
                    foreign_key: foreign_keys.get(&key).cloned(),
                    table,
                    native_type: str_field(&row, "udt_name"),
                    nullable: str_field(&row, "is_nullable") == "YES",
                    length: row.get("character_maximum_length").and_then(Value::as_u64).map(|n| n as u32),
                    precision: row.get("numeric_precision").and_then(Value::as_u64).map(|n| n as u32),
                    scale: row.get("numeric_scale").and_then(Value::as_u64).map(|n| n as u32),
                    is_unique: false,
                    is_identity: str_field(&row, "is_identity") == "YES",
                    column,
                }
            })
            .collect();

        Ok(group_into_tables(RdbmsKind::Postgres, raw, |_, t| native_type_to_class(t)))
    }
}
