//! SQL Server adapter, grounded on `tiberius` as used by the example
//! pack's `prisma-prisma-engines` (its `quaint` connector depends on the
//! same crate for its SQL Server backend).

use crate::error::ClientError;
use crate::{group_into_tables, RawColumn, RdbmsAdapter, Row};
use async_trait::async_trait;
use catalog::{CatalogError, ForeignKeyRef, ReflectedSchema, SchemaReflector};
use common::config::{RdbmsKind, RdbmsSpotConfig};
use serde_json::Value;
use std::collections::HashMap;
use tiberius::{AuthMethod, Client, Config};
use tokio::net::TcpStream;
use tokio_util::compat::TokioAsyncWriteCompatExt;
use types::TypeClass;

pub struct SqlServerAdapter {
    client: Client<tokio_util::compat::Compat<TcpStream>>,
}

impl SqlServerAdapter {
    pub async fn connect(spot: &RdbmsSpotConfig) -> Result<Self, ClientError> {
        let mut config = Config::new();
        config.host(&spot.host);
        config.port(spot.port);
        config.database(&spot.name);
        config.authentication(AuthMethod::sql_server(&spot.user, &spot.pwd));
        config.trust_cert();

        let tcp = TcpStream::connect(config.get_addr())
            .await
            .map_err(|e| ClientError::invalid_connection(e.to_string()))?;
        tcp.set_nodelay(true)
            .map_err(|e| ClientError::invalid_connection(e.to_string()))?;

        let client = Client::connect(config, tcp.compat_write())
            .await
            .map_err(|e| ClientError::invalid_connection(e.to_string()))?;

        Ok(Self { client })
    }
}

fn value_at(row: &tiberius::Row, i: usize) -> Value {
    if let Ok(Some(v)) = row.try_get::<i64, _>(i) {
        return Value::from(v);
    }
    if let Ok(Some(v)) = row.try_get::<i32, _>(i) {
        return Value::from(v);
    }
    if let Ok(Some(v)) = row.try_get::<f64, _>(i) {
        return Value::from(v);
    }
    if let Ok(Some(v)) = row.try_get::<bool, _>(i) {
        return Value::Bool(v);
    }
    row.try_get::<&str, _>(i)
        .ok()
        .flatten()
        .map(|s| Value::String(s.to_string()))
        .unwrap_or(Value::Null)
}

fn row_to_map(row: &tiberius::Row) -> Row {
    row.columns()
        .iter()
        .enumerate()
        .map(|(i, column)| (column.name().to_string(), value_at(row, i)))
        .collect()
}

#[async_trait]
impl RdbmsAdapter for SqlServerAdapter {
    async fn execute(&mut self, sql: &str) -> Result<u64, ClientError> {
        let result = self
            .client
            .execute(sql, &[])
            .await
            .map_err(|e| ClientError::syntax(e.to_string()))?;
        Ok(result.rows_affected().iter().sum())
    }

    async fn query(&mut self, sql: &str) -> Result<Vec<Row>, ClientError> {
        let stream = self
            .client
            .query(sql, &[])
            .await
            .map_err(|e| ClientError::syntax(e.to_string()))?;
        let rows = stream
            .into_first_result()
            .await
            .map_err(|e| ClientError::syntax(e.to_string()))?;
        Ok(rows.iter().map(row_to_map).collect())
    }
}

/// Maps a SQL Server `INFORMATION_SCHEMA.COLUMNS.DATA_TYPE` to a
/// `TypeClass`, preferring the dialect-specific variant when the
/// reference table carries one for that native name.
fn native_type_to_class(native_type: &str) -> TypeClass {
    match native_type.to_ascii_lowercase().as_str() {
        "bigint" => TypeClass::BigInt,
        "int" => TypeClass::Integer,
        "smallint" => TypeClass::SmallInt,
        "tinyint" => TypeClass::SqlsTinyInt,
        "bit" => TypeClass::SqlsBit,
        "decimal" => TypeClass::Decimal,
        "numeric" => TypeClass::Numeric,
        "float" => TypeClass::Float,
        "real" => TypeClass::SqlsReal,
        "money" => TypeClass::SqlsMoney,
        "smallmoney" => TypeClass::SqlsSmallMoney,
        "char" => TypeClass::Char,
        "varchar" => TypeClass::Varchar,
        "nchar" => TypeClass::NChar,
        "nvarchar" => TypeClass::NVarchar,
        "ntext" => TypeClass::SqlsNText,
        "text" => TypeClass::Text,
        "binary" => TypeClass::Binary,
        "varbinary" => TypeClass::SqlsVarBinary,
        "image" => TypeClass::SqlsImage,
        "date" => TypeClass::Date,
        "time" => TypeClass::SqlsTime,
        "datetime" => TypeClass::DateTime,
        "datetime2" => TypeClass::SqlsDatetime2,
        "smalldatetime" => TypeClass::SqlsSmallDatetime,
        "datetimeoffset" => TypeClass::DateTimeOffset,
        "uniqueidentifier" => TypeClass::SqlsUniqueIdentifier,
        "xml" => TypeClass::SqlsXml,
        "rowversion" | "timestamp" => TypeClass::SqlsRowversion,
        "sql_variant" => TypeClass::SqlsSqlVariant,
        other => {
            tracing::warn!(native_type = other, "unrecognized sql server type, defaulting to nvarchar");
            TypeClass::NVarchar
        }
    }
}

const COLUMNS_SQL: &str = "\
    SELECT c.TABLE_NAME AS table_name, c.COLUMN_NAME AS column_name, c.DATA_TYPE AS data_type, \
           c.IS_NULLABLE AS is_nullable, c.CHARACTER_MAXIMUM_LENGTH AS character_maximum_length, \
           c.NUMERIC_PRECISION AS numeric_precision, c.NUMERIC_SCALE AS numeric_scale, \
           COLUMNPROPERTY(object_id(c.TABLE_SCHEMA + '.' + c.TABLE_NAME), c.COLUMN_NAME, 'IsIdentity') AS is_identity \
    FROM INFORMATION_SCHEMA.COLUMNS c \
    WHERE c.TABLE_SCHEMA = '{schema}' \
    ORDER BY c.TABLE_NAME, c.ORDINAL_POSITION";

const PRIMARY_KEYS_SQL: &str = "\
    SELECT kcu.TABLE_NAME AS table_name, kcu.COLUMN_NAME AS column_name \
    FROM INFORMATION_SCHEMA.TABLE_CONSTRAINTS tc \
    JOIN INFORMATION_SCHEMA.KEY_COLUMN_USAGE kcu \
      ON tc.CONSTRAINT_NAME = kcu.CONSTRAINT_NAME AND tc.TABLE_SCHEMA = kcu.TABLE_SCHEMA \
    WHERE tc.CONSTRAINT_TYPE = 'PRIMARY KEY' AND tc.TABLE_SCHEMA = '{schema}'";

const FOREIGN_KEYS_SQL: &str = "\
    SELECT fk.parent_table AS table_name, fk.parent_column AS column_name, \
           fk.referenced_table AS foreign_table, fk.referenced_column AS foreign_column \
    FROM ( \
        SELECT OBJECT_NAME(fkc.parent_object_id) AS parent_table, \
               COL_NAME(fkc.parent_object_id, fkc.parent_column_id) AS parent_column, \
               OBJECT_NAME(fkc.referenced_object_id) AS referenced_table, \
               COL_NAME(fkc.referenced_object_id, fkc.referenced_column_id) AS referenced_column, \
               SCHEMA_NAME(fk.schema_id) AS schema_name \
        FROM sys.foreign_key_columns fkc \
        JOIN sys.foreign_keys fk ON fk.object_id = fkc.constraint_object_id \
    ) fk \
    WHERE fk.schema_name = '{schema}'";

fn str_field(row: &Row, key: &str) -> String {
    row.get(key).and_then(Value::as_str).unwrap_or_default().to_string()
}

#[async_trait]
impl SchemaReflector for SqlServerAdapter {
    async fn schema_names(&mut self) -> Result<Vec<String>, CatalogError> {
        let rows = self
            .query("SELECT SCHEMA_NAME AS schema_name FROM INFORMATION_SCHEMA.SCHEMATA")
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

impl SqlServerAdapter {
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
                let is_identity = row.get("is_identity").and_then(Value::as_i64).unwrap_or(0) == 1;
                RawColumn {
                    is_primary_key: primary_keys.contains_key(&key),
                    foreign_key: foreign_keys.get(&key).cloned(),
                    table,
                    native_type: str_field(&row, "data_type"),
                    nullable: str_field(&row, "is_nullable") == "YES",
                    length: row.get("character_maximum_length").and_then(Value::as_i64).map(|n| n.max(0) as u32),
                    precision: row.get("numeric_precision").and_then(Value::as_u64).map(|n| n as u32),
                    scale: row.get("numeric_scale").and_then(Value::as_u64).map(|n| n as u32),
                    is_unique: false,
                    is_identity,
                    column,
                }
            })
            .collect();

        Ok(group_into_tables(RdbmsKind::SqlServer, raw, |_, t| native_type_to_class(t)))
    }
}
