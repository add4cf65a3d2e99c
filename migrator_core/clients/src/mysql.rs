//! MySQL adapter, grounded on `mysql_async` as used by the example pack's
//! `prisma-prisma-engines` (its `quaint` connector depends on the same
//! crate for its MySQL backend).

use crate::error::ClientError;
use crate::{group_into_tables, RawColumn, RdbmsAdapter, Row};
use async_trait::async_trait;
use catalog::{CatalogError, ForeignKeyRef, ReflectedSchema, SchemaReflector};
use common::config::{RdbmsKind, RdbmsSpotConfig};
use mysql_async::prelude::Queryable;
use mysql_async::{Conn, Opts, OptsBuilder, Value as MyValue};
use serde_json::Value;
use std::collections::HashMap;
use types::TypeClass;

pub struct MySqlAdapter {
    conn: Conn,
}

impl MySqlAdapter {
    pub async fn connect(spot: &RdbmsSpotConfig) -> Result<Self, ClientError> {
        let opts: Opts = OptsBuilder::default()
            .ip_or_hostname(spot.host.clone())
            .tcp_port(spot.port)
            .user(Some(spot.user.clone()))
            .pass(Some(spot.pwd.clone()))
            .db_name(Some(spot.name.clone()))
            .into();

        let conn = Conn::new(opts)
            .await
            .map_err(|e| ClientError::invalid_connection(e.to_string()))?;

        Ok(Self { conn })
    }
}

fn value_to_json(value: MyValue) -> Value {
    match value {
        MyValue::NULL => Value::Null,
        MyValue::Bytes(bytes) => String::from_utf8(bytes)
            .map(Value::String)
            .unwrap_or(Value::Null),
        MyValue::Int(i) => Value::from(i),
        MyValue::UInt(u) => Value::from(u),
        MyValue::Float(f) => Value::from(f),
        MyValue::Double(d) => Value::from(d),
        other => Value::String(format!("{other:?}")),
    }
}

fn row_to_map(row: mysql_async::Row) -> Row {
    let columns = row.columns();
    let mut map = Row::new();
    for (i, column) in columns.iter().enumerate() {
        let value = row.as_ref(i).cloned().unwrap_or(MyValue::NULL);
        map.insert(column.name_str().to_string(), value_to_json(value));
    }
    map
}

#[async_trait]
impl RdbmsAdapter for MySqlAdapter {
    async fn execute(&mut self, sql: &str) -> Result<u64, ClientError> {
        self.conn
            .query_drop(sql)
            .await
            .map_err(|e| ClientError::syntax(e.to_string()))?;
        Ok(self.conn.affected_rows())
    }

    async fn query(&mut self, sql: &str) -> Result<Vec<Row>, ClientError> {
        let rows: Vec<mysql_async::Row> = self
            .conn
            .query(sql)
            .await
            .map_err(|e| ClientError::syntax(e.to_string()))?;
        Ok(rows.into_iter().map(row_to_map).collect())
    }
}

/// Maps a MySQL `information_schema.columns.column_type`/`data_type` to a
/// `TypeClass`, preferring the dialect-specific variant when the reference
/// table carries one for that native name.
fn native_type_to_class(native_type: &str) -> TypeClass {
    let base = native_type.split('(').next().unwrap_or(native_type);
    match base.to_ascii_lowercase().as_str() {
        "bigint" => TypeClass::MsqlBigInt,
        "int" => TypeClass::MsqlInteger,
        "mediumint" => TypeClass::MsqlMediumInt,
        "smallint" => TypeClass::MsqlSmallInt,
        "tinyint" => TypeClass::MsqlTinyInt,
        "decimal" => TypeClass::MsqlDecimal,
        "numeric" => TypeClass::MsqlNumeric,
        "float" => TypeClass::MsqlFloat,
        "double" => TypeClass::MsqlDouble,
        "bit" => TypeClass::MsqlBit,
        "year" => TypeClass::MsqlYear,
        "char" => TypeClass::MsqlChar,
        "varchar" => TypeClass::MsqlVarchar,
        "nchar" => TypeClass::MsqlNChar,
        "nvarchar" => TypeClass::MsqlNVarchar,
        "enum" => TypeClass::MsqlEnum,
        "set" => TypeClass::MsqlSet,
        "tinytext" => TypeClass::MsqlTinyText,
        "text" => TypeClass::MsqlText,
        "mediumtext" => TypeClass::MsqlMediumText,
        "longtext" => TypeClass::MsqlLongText,
        "tinyblob" => TypeClass::MsqlTinyBlob,
        "blob" => TypeClass::Blob,
        "mediumblob" => TypeClass::MsqlMediumBlob,
        "longblob" => TypeClass::MsqlLongBlob,
        "binary" | "varbinary" => TypeClass::Binary,
        "date" => TypeClass::Date,
        "time" => TypeClass::MsqlTime,
        "datetime" => TypeClass::MsqlDatetime,
        "timestamp" => TypeClass::MsqlTimestamp,
        "json" => TypeClass::MsqlJson,
        other => {
            tracing::warn!(native_type = other, "unrecognized mysql type, defaulting to varchar");
            TypeClass::MsqlVarchar
        }
    }
}

const COLUMNS_SQL: &str = "\
    SELECT table_name, column_name, column_type, is_nullable, \
           character_maximum_length, numeric_precision, numeric_scale, extra \
    FROM information_schema.columns \
    WHERE table_schema = '{schema}' \
    ORDER BY table_name, ordinal_position";

const PRIMARY_KEYS_SQL: &str = "\
    SELECT table_name, column_name \
    FROM information_schema.key_column_usage \
    WHERE constraint_name = 'PRIMARY' AND table_schema = '{schema}'";

/// MySQL's `key_column_usage` already carries the referenced table/column
/// directly, unlike Postgres/SQL Server, which need a join through
/// `constraint_column_usage` to get there.
const FOREIGN_KEYS_SQL: &str = "\
    SELECT table_name, column_name, referenced_table_name, referenced_column_name \
    FROM information_schema.key_column_usage \
    WHERE table_schema = '{schema}' AND referenced_table_name IS NOT NULL";

fn str_field(row: &Row, key: &str) -> String {
    row.get(key).and_then(Value::as_str).unwrap_or_default().to_string()
}

#[async_trait]
impl SchemaReflector for MySqlAdapter {
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

impl MySqlAdapter {
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
                    table: str_field(row, "referenced_table_name"),
                    column: str_field(row, "referenced_column_name"),
                },
            );
        }

        let raw: Vec<RawColumn> = column_rows
            .into_iter()
            .map(|row| {
                let table = str_field(&row, "table_name");
                let column = str_field(&row, "column_name");
                let key = (table.clone(), column.clone());
                let extra = str_field(&row, "extra");
                RawColumn {
                    is_primary_key: primary_keys.contains_key(&key),
                    foreign_key: foreign_keys.get(&key).cloned(),
                    table,
                    native_type: str_field(&row, "column_type"),
                    nullable: str_field(&row, "is_nullable") == "YES",
                    length: row.get("character_maximum_length").and_then(Value::as_u64).map(|n| n as u32),
                    precision: row.get("numeric_precision").and_then(Value::as_u64).map(|n| n as u32),
                    scale: row.get("numeric_scale").and_then(Value::as_u64).map(|n| n as u32),
                    is_unique: false,
                    is_identity: extra.contains("auto_increment"),
                    column,
                }
            })
            .collect();

        Ok(group_into_tables(RdbmsKind::MySql, raw, |_, t| native_type_to_class(t)))
    }
}
