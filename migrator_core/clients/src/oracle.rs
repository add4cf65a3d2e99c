//! Oracle adapter. Grounded on `examples/Mingun-rust-oci`, which
//! demonstrates that an OCI binding is the idiomatic way to reach Oracle
//! from Rust; the `oracle` crate (a maintained OCI wrapper) is used here
//! instead of that crate directly, since its own synchronous API is
//! shuttled onto a blocking thread pool rather than reimplemented.

use crate::error::ClientError;
use crate::{group_into_tables, RawColumn, RdbmsAdapter, Row};
use async_trait::async_trait;
use catalog::{CatalogError, ForeignKeyRef, ReflectedSchema, SchemaReflector};
use common::config::{RdbmsKind, RdbmsSpotConfig};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use types::TypeClass;

pub struct OracleAdapter {
    conn: Arc<Mutex<oracle::Connection>>,
}

impl OracleAdapter {
    pub async fn connect(spot: &RdbmsSpotConfig) -> Result<Self, ClientError> {
        let connect_string = format!("{}:{}/{}", spot.host, spot.port, spot.name);
        let user = spot.user.clone();
        let pwd = spot.pwd.clone();

        let conn = tokio::task::spawn_blocking(move || oracle::Connection::connect(&user, &pwd, &connect_string))
            .await
            .map_err(|e| ClientError::invalid_connection(e.to_string()))?
            .map_err(|e| ClientError::invalid_connection(e.to_string()))?;

        Ok(Self { conn: Arc::new(Mutex::new(conn)) })
    }
}

fn value_at(row: &oracle::Row, i: usize) -> Value {
    if let Ok(v) = row.get::<usize, Option<i64>>(i) {
        return v.map(Value::from).unwrap_or(Value::Null);
    }
    if let Ok(v) = row.get::<usize, Option<f64>>(i) {
        return v.map(Value::from).unwrap_or(Value::Null);
    }
    row.get::<usize, Option<String>>(i)
        .ok()
        .flatten()
        .map(Value::String)
        .unwrap_or(Value::Null)
}

fn row_to_map(row: &oracle::Row, column_names: &[String]) -> Row {
    column_names
        .iter()
        .enumerate()
        .map(|(i, name)| (name.clone(), value_at(row, i)))
        .collect()
}

#[async_trait]
impl RdbmsAdapter for OracleAdapter {
    async fn execute(&mut self, sql: &str) -> Result<u64, ClientError> {
        let conn = Arc::clone(&self.conn);
        let sql = sql.to_string();
        tokio::task::spawn_blocking(move || {
            let conn = conn.lock().expect("oracle connection mutex poisoned");
            conn.execute(&sql, &[]).map_err(|e| ClientError::syntax(e.to_string()))?;
            conn.commit().map_err(|e| ClientError::syntax(e.to_string()))
        })
        .await
        .map_err(|e| ClientError::unexpected(e.to_string()))??;
        Ok(0)
    }

    async fn query(&mut self, sql: &str) -> Result<Vec<Row>, ClientError> {
        let conn = Arc::clone(&self.conn);
        let sql = sql.to_string();
        tokio::task::spawn_blocking(move || {
            let conn = conn.lock().expect("oracle connection mutex poisoned");
            let result_set = conn.query(&sql, &[]).map_err(|e| ClientError::syntax(e.to_string()))?;
            let column_names: Vec<String> =
                result_set.column_info().iter().map(|c| c.name().to_string()).collect();
            let mut rows = Vec::new();
            for row in result_set {
                let row = row.map_err(|e| ClientError::syntax(e.to_string()))?;
                rows.push(row_to_map(&row, &column_names));
            }
            Ok(rows)
        })
        .await
        .map_err(|e| ClientError::unexpected(e.to_string()))?
    }
}

/// Maps an Oracle `ALL_TAB_COLUMNS.DATA_TYPE` to a `TypeClass`, preferring
/// the dialect-specific variant when the reference table carries one for
/// that native name.
fn native_type_to_class(native_type: &str) -> TypeClass {
    let base = native_type.split('(').next().unwrap_or(native_type);
    match base.to_ascii_uppercase().as_str() {
        "NUMBER" => TypeClass::OrclNumber,
        "FLOAT" => TypeClass::OrclFloat,
        "BINARY_FLOAT" => TypeClass::OrclBinaryFloat,
        "BINARY_DOUBLE" => TypeClass::OrclBinaryDouble,
        "CHAR" => TypeClass::Char,
        "NCHAR" => TypeClass::NChar,
        "VARCHAR2" => TypeClass::OrclVarchar2,
        "NVARCHAR2" => TypeClass::NVarchar,
        "LONG" => TypeClass::OrclLong,
        "RAW" => TypeClass::OrclRaw,
        "ROWID" => TypeClass::OrclRowid,
        "DATE" => TypeClass::OrclDate,
        "TIMESTAMP" => TypeClass::OrclTimestamp,
        "CLOB" => TypeClass::Clob,
        "NCLOB" => TypeClass::OrclNclob,
        "BLOB" => TypeClass::Blob,
        "BFILE" => TypeClass::OrclBfile,
        other => {
            tracing::warn!(native_type = other, "unrecognized oracle type, defaulting to varchar2");
            TypeClass::OrclVarchar2
        }
    }
}

const COLUMNS_SQL: &str = "\
    SELECT table_name, column_name, data_type, nullable, \
           data_length, data_precision, data_scale \
    FROM all_tab_columns \
    WHERE owner = '{schema}' \
    ORDER BY table_name, column_id";

const PRIMARY_KEYS_SQL: &str = "\
    SELECT cols.table_name, cols.column_name \
    FROM all_constraints cons \
    JOIN all_cons_columns cols \
      ON cons.constraint_name = cols.constraint_name AND cons.owner = cols.owner \
    WHERE cons.constraint_type = 'P' AND cons.owner = '{schema}'";

const FOREIGN_KEYS_SQL: &str = "\
    SELECT a.table_name, a.column_name, c_pk.table_name AS foreign_table, b.column_name AS foreign_column \
    FROM all_constraints c \
    JOIN all_cons_columns a ON c.constraint_name = a.constraint_name AND c.owner = a.owner \
    JOIN all_constraints c_pk ON c.r_constraint_name = c_pk.constraint_name AND c.r_owner = c_pk.owner \
    JOIN all_cons_columns b \
      ON c_pk.constraint_name = b.constraint_name AND c_pk.owner = b.owner AND a.position = b.position \
    WHERE c.constraint_type = 'R' AND c.owner = '{schema}'";

fn str_field(row: &Row, key: &str) -> String {
    row.get(key).and_then(Value::as_str).unwrap_or_default().to_string()
}

#[async_trait]
impl SchemaReflector for OracleAdapter {
    async fn schema_names(&mut self) -> Result<Vec<String>, CatalogError> {
        let rows = self
            .query("SELECT username AS schema_name FROM all_users")
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

impl OracleAdapter {
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
                    native_type: str_field(&row, "data_type"),
                    nullable: str_field(&row, "nullable") == "Y",
                    length: row.get("data_length").and_then(Value::as_u64).map(|n| n as u32),
                    precision: row.get("data_precision").and_then(Value::as_u64).map(|n| n as u32),
                    scale: row.get("data_scale").and_then(Value::as_u64).map(|n| n as u32),
                    is_unique: false,
                    is_identity: false,
                    column,
                }
            })
            .collect();

        Ok(group_into_tables(RdbmsKind::Oracle, raw, |_, t| native_type_to_class(t)))
    }
}
