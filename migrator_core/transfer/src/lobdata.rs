//! Component D: the LOB transfer pipeline, to either an RDBMS BLOB column
//! or an S3 prefix. Grounded on `pydb_migration.migrate_tables`'s LOB path
//! and spec.md §4.D.

use crate::error::TransferError;
use crate::partition::partition;
use crate::sql::{literal, paginate, qualified_table, quote_ident};
use catalog::{MigratedColumn, MigratedTable, TransferStatus};
use clients::{connect, S3Client};
use common::cancel::CancelFlag;
use common::config::{Metrics, RdbmsKind, RdbmsSpotConfig};
use serde_json::Value;
use std::collections::HashMap;
use types::TypeClass;

/// One `named_lobdata` entry: `table.column -> ref[.ext]`, split into the
/// reference column name and an optional forced file extension.
#[derive(Debug, Clone)]
pub struct LobSpec {
    pub reference_column: String,
    pub forced_ext: Option<String>,
}

pub fn parse_named_lobdata(raw: &str) -> LobSpec {
    match raw.split_once('.') {
        Some((col, ext)) => LobSpec { reference_column: col.to_string(), forced_ext: Some(ext.to_string()) },
        None => LobSpec { reference_column: raw.to_string(), forced_ext: None },
    }
}

fn lob_columns(table: &MigratedTable) -> Vec<&MigratedColumn> {
    table.columns.iter().filter(|c| types::is_lob_column(c.type_class)).collect()
}

/// Resolves the reference-column spec for one LOB column: the
/// `named_lobdata` entry if there is one, else the table's first primary
/// key column, else `None` if neither exists (spec.md §4.D.1).
pub fn resolve_lob_spec(table: &MigratedTable, column: &MigratedColumn, named_lobdata: &HashMap<String, String>) -> Option<LobSpec> {
    let key = format!("{}.{}", table.name, column.name);
    if let Some(raw) = named_lobdata.get(&key) {
        return Some(parse_named_lobdata(raw));
    }
    table
        .primary_key_columns()
        .next()
        .map(|pk| LobSpec { reference_column: pk.name.clone(), forced_ext: None })
}

const BINARY_LOBS: &[TypeClass] = &[
    TypeClass::Blob,
    TypeClass::VarBinary,
    TypeClass::PgBytea,
    TypeClass::SqlsImage,
    TypeClass::SqlsVarBinary,
    TypeClass::MsqlLongBlob,
    TypeClass::MsqlMediumBlob,
    TypeClass::MsqlTinyBlob,
    TypeClass::OrclRaw,
    TypeClass::OrclBfile,
];

fn mime_for(type_class: TypeClass) -> &'static str {
    if BINARY_LOBS.contains(&type_class) {
        "application/octet-stream"
    } else {
        "text/plain"
    }
}

/// The S3 prefix rows under this LOB column are stored under, always built
/// in full regardless of `flatten_storage` (spec.md §9: "always build a
/// prefix for S3, honor flatten_storage only when computing the key path
/// itself").
pub fn s3_prefix(badge: &str, schema: &str, table: &str, column: &str) -> String {
    format!("{badge}/{schema}/{table}/{column}")
}

fn s3_key(prefix: &str, flatten_storage: bool, reference_value: &str, ext: Option<&str>) -> String {
    let name = match ext {
        Some(ext) => format!("{reference_value}.{ext}"),
        None => reference_value.to_string(),
    };
    if flatten_storage {
        name
    } else {
        format!("{prefix}/{name}")
    }
}

fn str_value(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Where a LOB column's bytes end up: the target RDBMS's own BLOB column,
/// or an S3 prefix.
pub enum LobDestination<'a> {
    Rdbms,
    S3 { client: &'a S3Client, migration_badge: &'a str, flatten_storage: bool },
}

#[allow(clippy::too_many_arguments)]
async fn migrate_lob_column(
    source_spot: &RdbmsSpotConfig,
    target_spot: &RdbmsSpotConfig,
    from_schema: &str,
    to_schema: &str,
    table_name: &str,
    column: &MigratedColumn,
    spec: &LobSpec,
    pk_columns: &[&MigratedColumn],
    explicit_reference_values: Option<&[String]>,
    destination: &LobDestination<'_>,
    skip_nonempty: bool,
    metrics: &Metrics,
    cancel: &CancelFlag,
) -> Result<u64, TransferError> {
    let prefix = match destination {
        LobDestination::S3 { migration_badge, .. } => {
            Some(s3_prefix(migration_badge, to_schema, table_name, &column.name))
        }
        LobDestination::Rdbms => None,
    };

    if let (LobDestination::S3 { client, .. }, Some(prefix)) = (destination, &prefix) {
        if skip_nonempty && client.exists(prefix).await.map_err(|e| TransferError::storage(e.to_string()))? {
            tracing::info!(table = %table_name, column = %column.name, "S3 prefix already populated, skipping");
            return Ok(0);
        }
    }

    if matches!(destination, LobDestination::S3 { .. }) && pk_columns.is_empty() {
        tracing::warn!(
            table = %table_name,
            column = %column.name,
            "no primary key and no usable reference, skipping S3 LOB column",
        );
        return Ok(0);
    }

    let mut source = connect(source_spot).await.map_err(|e| TransferError::source(e.to_string()))?;
    let mut target = connect(target_spot).await.map_err(|e| TransferError::target(e.to_string()))?;

    let filter_table = match explicit_reference_values {
        Some(values) if !values.is_empty() => {
            Some(materialize_filter_table(target.as_mut(), target_spot.engine, to_schema, table_name, &column.name, &spec.reference_column, values).await?)
        }
        _ => None,
    };

    let select_columns: Vec<String> = std::iter::once(spec.reference_column.clone())
        .chain(pk_columns.iter().map(|c| c.name.clone()))
        .chain(std::iter::once(column.name.clone()))
        .collect();
    let select_list = select_columns
        .iter()
        .map(|c| quote_ident(source_spot.engine, c))
        .collect::<Vec<_>>()
        .join(", ");

    let mut where_clause = format!("{} IS NOT NULL", quote_ident(source_spot.engine, &column.name));
    if let Some((_, filter_name)) = &filter_table {
        where_clause = format!(
            "{where_clause} AND {} IN (SELECT {} FROM {})",
            quote_ident(source_spot.engine, &spec.reference_column),
            quote_ident(source_spot.engine, &spec.reference_column),
            filter_name,
        );
    }

    let base_select = format!(
        "SELECT {select_list} FROM {} WHERE {where_clause}",
        qualified_table(source_spot.engine, from_schema, table_name)
    );

    let mut moved = 0u64;
    for part in partition(metrics.lobdata_channels, metrics.incremental_size) {
        if cancel.is_cancelled() {
            break;
        }
        let select = paginate(source_spot.engine, &base_select, &quote_ident(source_spot.engine, &spec.reference_column), part.offset, part.limit);
        let rows = source.query(&select).await.map_err(|e| TransferError::source(e.to_string()))?;
        if rows.is_empty() {
            continue;
        }

        for row in &rows {
            if cancel.is_cancelled() {
                break;
            }
            let Some(payload) = row.get(&column.name).and_then(str_value) else { continue };

            match destination {
                LobDestination::S3 { client, flatten_storage, .. } => {
                    let Some(reference_value) = row.get(&spec.reference_column).and_then(str_value) else {
                        continue;
                    };
                    let key = s3_key(
                        prefix.as_deref().unwrap_or_default(),
                        *flatten_storage,
                        &reference_value,
                        spec.forced_ext.as_deref(),
                    );
                    let content_type = mime_for(column.type_class);
                    client
                        .put(&key, payload.into_bytes(), content_type)
                        .await
                        .map_err(|e| TransferError::storage(e.to_string()))?;
                }
                LobDestination::Rdbms => {
                    let Some(update) = update_lob_stmt(target_spot.engine, to_schema, table_name, column, pk_columns, row, &payload) else {
                        continue;
                    };
                    target.execute(&update).await.map_err(|e| TransferError::write_failed(e.to_string()))?;
                }
            }
            moved += 1;
        }
    }

    if let Some((_, filter_name)) = &filter_table {
        let drop = format!("DROP TABLE {filter_name}");
        let _ = target.execute(&drop).await;
    }

    Ok(moved)
}

fn update_lob_stmt(
    dialect: RdbmsKind,
    schema: &str,
    table: &str,
    column: &MigratedColumn,
    pk_columns: &[&MigratedColumn],
    row: &clients::Row,
    payload: &str,
) -> Option<String> {
    if pk_columns.is_empty() {
        return None;
    }
    let assignments: Vec<String> = pk_columns
        .iter()
        .map(|pk| {
            let value = row.get(&pk.name).cloned().unwrap_or(Value::Null);
            format!("{} = {}", quote_ident(dialect, &pk.name), literal(dialect, &value))
        })
        .collect();
    Some(format!(
        "UPDATE {} SET {} = '{}' WHERE {}",
        qualified_table(dialect, schema, table),
        quote_ident(dialect, &column.name),
        payload.replace('\'', "''"),
        assignments.join(" AND "),
    ))
}

/// Materializes a temporary table holding `values`, used by sync's explicit
/// reference-value list so the worker's `WHERE` clause stays a small
/// subquery join rather than a giant `IN (...)` literal (spec.md §4.D.4.iii).
async fn materialize_filter_table(
    target: &mut dyn clients::RdbmsAdapter,
    dialect: RdbmsKind,
    schema: &str,
    table: &str,
    column: &str,
    reference_column: &str,
    values: &[String],
) -> Result<(String, String), TransferError> {
    let filter_name = qualified_table(dialect, schema, &format!("__migrator_lob_filter_{table}_{column}"));
    let ref_ident = quote_ident(dialect, reference_column);

    let _ = target.execute(&format!("DROP TABLE IF EXISTS {filter_name}")).await;
    target
        .execute(&format!("CREATE TABLE {filter_name} ({ref_ident} VARCHAR(4000))"))
        .await
        .map_err(|e| TransferError::target(e.to_string()))?;

    for chunk in values.chunks(500) {
        let value_rows: Vec<String> = chunk.iter().map(|v| format!("('{}')", v.replace('\'', "''"))).collect();
        target
            .execute(&format!("INSERT INTO {filter_name} ({ref_ident}) VALUES {}", value_rows.join(", ")))
            .await
            .map_err(|e| TransferError::target(e.to_string()))?;
    }

    Ok((filter_name.clone(), filter_name))
}

/// Migrates every LOB column of `table`. `named_lobdata` maps
/// `"table.column"` to the raw `ref[.ext]` spec value. Updates
/// `table.lob_count`/`lob_status` in place.
#[allow(clippy::too_many_arguments)]
pub async fn transfer_lobdata(
    source_spot: &RdbmsSpotConfig,
    target_spot: &RdbmsSpotConfig,
    from_schema: &str,
    to_schema: &str,
    table: &mut MigratedTable,
    named_lobdata: &HashMap<String, String>,
    destination: &LobDestination<'_>,
    skip_nonempty: bool,
    metrics: &Metrics,
    cancel: &CancelFlag,
) -> Result<(), TransferError> {
    if cancel.is_cancelled() {
        table.lob_status = TransferStatus::Partial;
        return Ok(());
    }

    let pk_columns: Vec<&MigratedColumn> = table.primary_key_columns().collect();
    let columns: Vec<MigratedColumn> = lob_columns(table).into_iter().cloned().collect();

    let mut total = 0u64;
    for column in &columns {
        let Some(spec) = resolve_lob_spec(table, column, named_lobdata) else {
            tracing::warn!(table = %table.name, column = %column.name, "no reference column and no primary key, skipping LOB column");
            continue;
        };

        total += migrate_lob_column(
            source_spot,
            target_spot,
            from_schema,
            to_schema,
            &table.name,
            column,
            &spec,
            &pk_columns,
            None,
            destination,
            skip_nonempty,
            metrics,
            cancel,
        )
        .await?;
    }

    table.lob_count = total;
    table.lob_status = if cancel.is_cancelled() { TransferStatus::Partial } else { TransferStatus::Full };
    Ok(())
}

/// The explicit-list path used by `sync`'s LOB reconciliation: migrates
/// only the rows whose reference-column value is in `reference_values`,
/// via a materialized filter table join.
#[allow(clippy::too_many_arguments)]
pub async fn transfer_lob_column_explicit(
    source_spot: &RdbmsSpotConfig,
    target_spot: &RdbmsSpotConfig,
    from_schema: &str,
    to_schema: &str,
    table_name: &str,
    column: &MigratedColumn,
    spec: &LobSpec,
    pk_columns: &[&MigratedColumn],
    reference_values: &[String],
    destination: &LobDestination<'_>,
    metrics: &Metrics,
    cancel: &CancelFlag,
) -> Result<u64, TransferError> {
    migrate_lob_column(
        source_spot,
        target_spot,
        from_schema,
        to_schema,
        table_name,
        column,
        spec,
        pk_columns,
        Some(reference_values),
        destination,
        false,
        metrics,
        cancel,
    )
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_lobdata_splits_reference_column_and_forced_extension() {
        let spec = parse_named_lobdata("filename.pdf");
        assert_eq!(spec.reference_column, "filename");
        assert_eq!(spec.forced_ext.as_deref(), Some("pdf"));
    }

    #[test]
    fn named_lobdata_without_a_dot_has_no_forced_extension() {
        let spec = parse_named_lobdata("filename");
        assert_eq!(spec.reference_column, "filename");
        assert!(spec.forced_ext.is_none());
    }

    #[test]
    fn s3_key_nests_under_the_full_prefix_by_default() {
        let prefix = s3_prefix("badge", "hr", "doc", "content");
        assert_eq!(prefix, "badge/hr/doc/content");
        let key = s3_key(&prefix, false, "invoice-7", Some("pdf"));
        assert_eq!(key, "badge/hr/doc/content/invoice-7.pdf");
    }

    #[test]
    fn s3_key_ignores_the_prefix_when_flattened() {
        let prefix = s3_prefix("badge", "hr", "doc", "content");
        let key = s3_key(&prefix, true, "invoice-7", Some("pdf"));
        assert_eq!(key, "invoice-7.pdf");
    }

    #[test]
    fn binary_lob_types_get_octet_stream_mime() {
        assert_eq!(mime_for(TypeClass::PgBytea), "application/octet-stream");
        assert_eq!(mime_for(TypeClass::Text), "text/plain");
    }
}
