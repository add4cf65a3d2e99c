//! Component C: the plaindata transfer pipeline. Grounded on
//! `pydb_migration.migrate_tables`'s plain-column path — building the
//! source/target column list once, then streaming rows in bounded batches
//! per channel.

use crate::error::TransferError;
use crate::partition::{partition_window, Partition};
use crate::sql::{literal, paginate, qualified_table, quote_ident};
use catalog::{MigratedColumn, MigratedTable, TransferStatus};
use clients::{connect, Row};
use common::cancel::CancelFlag;
use common::config::{Metrics, RdbmsKind, RdbmsSpotConfig};
use serde_json::Value;

/// One table's incremental resume point: how many rows to skip, and an
/// optional cap on how many to move (`0` means "no cap", spec.md §4.C.4).
#[derive(Debug, Clone, Copy, Default)]
pub struct IncrementalWindow {
    pub count: i64,
    pub offset: i64,
}

fn plain_columns(table: &MigratedTable) -> Vec<&MigratedColumn> {
    table.columns.iter().filter(|c| !types::is_lob_column(c.type_class)).collect()
}

fn first_count(rows: &[Row]) -> u64 {
    rows.first()
        .and_then(|row| row.values().next())
        .and_then(|v| v.as_u64().or_else(|| v.as_i64().map(|n| n.max(0) as u64)))
        .unwrap_or(0)
}

/// Counts the rows currently in `schema.table`, used both to verify the
/// target exists (spec.md §4.C.1) and to size the incremental window
/// (spec.md §4.C.4). A query failure is the existence check failing: there
/// is no separate "does this table exist" probe, so a missing table and an
/// unreadable one are reported the same way.
async fn row_count(spot: &RdbmsSpotConfig, schema: &str, table_name: &str) -> Result<u64, clients::ClientError> {
    let mut adapter = connect(spot).await?;
    let sql = format!("SELECT COUNT(*) FROM {}", qualified_table(spot.engine, schema, table_name));
    let rows = adapter.query(&sql).await?;
    Ok(first_count(&rows))
}

/// Strips embedded NUL bytes from a text value when `table` is listed in
/// `remove_nulls` (spec.md §4.C.5). Numbers/bools/null pass through
/// untouched; only the string literal path can carry an embedded NUL.
fn sanitize(value: &Value, strip_nulls: bool) -> Value {
    match value {
        Value::String(s) if strip_nulls && s.contains('\0') => Value::String(s.replace('\0', "")),
        other => other.clone(),
    }
}

/// The columns a worker orders by for reproducible `OFFSET`/`LIMIT`
/// batching: the primary key when there is one, otherwise the table's
/// first column (matching spec.md §4.C: "identify ... any primary-key
/// columns (order-by columns) -- required for reproducible batching").
fn order_by_clause(dialect: RdbmsKind, table: &MigratedTable) -> Option<String> {
    let pk: Vec<&MigratedColumn> = table.primary_key_columns().collect();
    let columns: Vec<&MigratedColumn> = if pk.is_empty() {
        table.columns.iter().take(1).collect()
    } else {
        pk
    };
    if columns.is_empty() {
        return None;
    }
    Some(
        columns
            .iter()
            .map(|c| quote_ident(dialect, &c.name))
            .collect::<Vec<_>>()
            .join(", "),
    )
}

fn select_stmt(
    dialect: RdbmsKind,
    schema: &str,
    table: &str,
    columns: &[&MigratedColumn],
    order_by: &str,
    offset: u64,
    limit: Option<u64>,
) -> String {
    let column_list = columns.iter().map(|c| quote_ident(dialect, &c.name)).collect::<Vec<_>>().join(", ");
    let base = format!("SELECT {column_list} FROM {}", qualified_table(dialect, schema, table));
    paginate(dialect, &base, order_by, offset, limit)
}

fn insert_stmt(
    dialect: RdbmsKind,
    schema: &str,
    table: &str,
    columns: &[&MigratedColumn],
    rows: &[Row],
    strip_nulls: bool,
) -> String {
    let column_list = columns.iter().map(|c| quote_ident(dialect, &c.name)).collect::<Vec<_>>().join(", ");
    let value_rows: Vec<String> = rows
        .iter()
        .map(|row| {
            let values: Vec<String> = columns
                .iter()
                .map(|c| literal(dialect, &sanitize(row.get(&c.name).unwrap_or(&Value::Null), strip_nulls)))
                .collect();
            format!("({})", values.join(", "))
        })
        .collect();
    format!(
        "INSERT INTO {} ({column_list}) VALUES {}",
        qualified_table(dialect, schema, table),
        value_rows.join(", ")
    )
}

/// Streams one channel's row range: repeated `batch_size_in`-sized
/// `SELECT`s, each written out as `batch_size_out`-sized `INSERT`s, until a
/// fetch returns fewer rows than requested (channel exhausted), the
/// partition's own limit is reached, or `cancel` fires.
#[allow(clippy::too_many_arguments)]
async fn run_channel(
    source_spot: RdbmsSpotConfig,
    target_spot: RdbmsSpotConfig,
    source_dialect: RdbmsKind,
    target_dialect: RdbmsKind,
    from_schema: String,
    to_schema: String,
    table_name: String,
    columns: Vec<MigratedColumn>,
    order_by: String,
    partition: Partition,
    metrics: Metrics,
    strip_nulls: bool,
    cancel: CancelFlag,
) -> Result<u64, TransferError> {
    let mut source = connect(&source_spot).await.map_err(|e| TransferError::source(e.to_string()))?;
    let mut target = connect(&target_spot).await.map_err(|e| TransferError::target(e.to_string()))?;

    let columns: Vec<&MigratedColumn> = columns.iter().collect();
    let batch_size_in = metrics.batch_size_in.max(1) as u64;
    let batch_size_out = metrics.batch_size_out.max(1) as usize;

    let mut cursor = partition.offset;
    let mut moved = 0u64;

    loop {
        if cancel.is_cancelled() {
            break;
        }

        let remaining = partition.limit.map(|limit| limit.saturating_sub(cursor - partition.offset));
        if remaining == Some(0) {
            break;
        }
        let fetch_limit = match remaining {
            Some(remaining) => batch_size_in.min(remaining),
            None => batch_size_in,
        };

        let select = select_stmt(
            source_dialect,
            &from_schema,
            &table_name,
            &columns,
            &order_by,
            cursor,
            Some(fetch_limit),
        );
        let rows = source.query(&select).await.map_err(|e| TransferError::source(e.to_string()))?;
        let fetched = rows.len() as u64;
        if fetched == 0 {
            break;
        }

        for chunk in rows.chunks(batch_size_out) {
            if cancel.is_cancelled() {
                break;
            }
            let insert = insert_stmt(target_dialect, &to_schema, &table_name, &columns, chunk, strip_nulls);
            target.execute(&insert).await.map_err(|e| TransferError::write_failed(e.to_string()))?;
            moved += chunk.len() as u64;
        }

        cursor += fetched;
        if fetched < fetch_limit {
            break;
        }
    }

    Ok(moved)
}

/// Migrates every non-LOB column of `table` from the source to the target,
/// across `metrics.plaindata_channels` concurrent workers, each sized by
/// `metrics.incremental_size`. Updates `table.plain_count`/`plain_status`
/// in place.
///
/// Follows spec.md §4.C.1/§4.C.2 before touching any row: the target table
/// must exist, and when `skip_nonempty` is set and the table carries no
/// incremental count override, a non-empty target short-circuits the whole
/// transfer rather than re-inserting into it.
#[allow(clippy::too_many_arguments)]
pub async fn transfer_plaindata(
    source_spot: &RdbmsSpotConfig,
    target_spot: &RdbmsSpotConfig,
    from_schema: &str,
    to_schema: &str,
    table: &mut MigratedTable,
    window: IncrementalWindow,
    remove_nulls: bool,
    skip_nonempty: bool,
    metrics: &Metrics,
    cancel: &CancelFlag,
) -> Result<(), TransferError> {
    if cancel.is_cancelled() {
        table.plain_status = TransferStatus::Partial;
        return Ok(());
    }

    let target_count = row_count(target_spot, to_schema, &table.name)
        .await
        .map_err(|e| TransferError::target(format!("target table '{}' not found or unreadable: {e}", table.name)))?;

    if skip_nonempty && window.count == 0 && target_count > 0 {
        tracing::info!(table = %table.name, "target already populated and no incremental count set, skipping plaindata transfer");
        table.plain_count = 0;
        table.plain_status = TransferStatus::Skipped;
        return Ok(());
    }

    let columns: Vec<MigratedColumn> = plain_columns(table).into_iter().cloned().collect();
    let Some(order_by) = order_by_clause(target_spot.engine, table) else {
        table.plain_count = 0;
        table.plain_status = TransferStatus::Full;
        return Ok(());
    };

    let source_count = row_count(source_spot, from_schema, &table.name)
        .await
        .map_err(|e| TransferError::source(format!("counting source rows for '{}': {e}", table.name)))?;
    let offset = window.offset.max(0) as u64;
    let table_count = source_count.saturating_sub(offset);
    if table_count == 0 {
        table.plain_count = 0;
        table.plain_status = TransferStatus::Full;
        return Ok(());
    }
    let effective_count = match window.count {
        n if n > 0 => table_count.min(n as u64),
        _ => table_count,
    };

    let partitions = partition_window(metrics.plaindata_channels, metrics.incremental_size, offset, effective_count);
    let handles: Vec<_> = partitions
        .into_iter()
        .map(|part| {
            tokio::spawn(run_channel(
                source_spot.clone(),
                target_spot.clone(),
                source_spot.engine,
                target_spot.engine,
                from_schema.to_string(),
                to_schema.to_string(),
                table.name.clone(),
                columns.clone(),
                order_by.clone(),
                part,
                *metrics,
                remove_nulls,
                cancel.clone(),
            ))
        })
        .collect();

    let mut total = 0u64;
    for result in futures::future::join_all(handles).await {
        total += result.map_err(|e| TransferError::target(e.to_string()))??;
    }

    table.plain_count = total;
    table.plain_status = if cancel.is_cancelled() { TransferStatus::Partial } else { TransferStatus::Full };
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog::ColumnFeatures;

    fn column(name: &str, type_class: types::TypeClass, features: ColumnFeatures) -> MigratedColumn {
        MigratedColumn {
            name: name.to_string(),
            source_type: "ignored".to_string(),
            target_type: "ignored".to_string(),
            type_class,
            features,
        }
    }

    fn sample_table() -> MigratedTable {
        MigratedTable {
            name: "orders".to_string(),
            columns: vec![
                column(
                    "id",
                    types::TypeClass::Integer,
                    ColumnFeatures { primary_key: true, ..Default::default() },
                ),
                column("notes", types::TypeClass::Text, ColumnFeatures::default()),
                column("total", types::TypeClass::Numeric, ColumnFeatures::default()),
            ],
            plain_count: 0,
            plain_status: TransferStatus::None,
            lob_count: 0,
            lob_status: TransferStatus::None,
            sync_deletes: 0,
            sync_inserts: 0,
            sync_updates: 0,
            no_primary_key_warning: false,
        }
    }

    #[test]
    fn plain_columns_excludes_lob_typed_columns() {
        let table = sample_table();
        let names: Vec<&str> = plain_columns(&table).iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["id", "total"]);
    }

    #[test]
    fn order_by_prefers_the_primary_key() {
        let table = sample_table();
        let order_by = order_by_clause(RdbmsKind::Postgres, &table).unwrap();
        assert_eq!(order_by, "\"id\"");
    }

    #[test]
    fn order_by_falls_back_to_first_column_without_a_primary_key() {
        let mut table = sample_table();
        table.columns[0].features.primary_key = false;
        let order_by = order_by_clause(RdbmsKind::Postgres, &table).unwrap();
        assert_eq!(order_by, "\"id\"");
    }

    #[test]
    fn insert_renders_one_row_per_value_tuple() {
        let table = sample_table();
        let columns: Vec<&MigratedColumn> = vec![&table.columns[0]];
        let mut row = Row::new();
        row.insert("id".to_string(), Value::from(7));
        let stmt = insert_stmt(RdbmsKind::Postgres, "app", "orders", &columns, &[row], false);
        assert_eq!(stmt, "INSERT INTO \"app\".\"orders\" (\"id\") VALUES (7)");
    }

    #[test]
    fn insert_strips_embedded_nuls_only_when_asked() {
        let table = sample_table();
        let columns: Vec<&MigratedColumn> = vec![&table.columns[1]];
        let mut row = Row::new();
        row.insert("notes".to_string(), Value::String("bad\0byte".to_string()));

        let untouched = insert_stmt(RdbmsKind::Postgres, "app", "orders", &columns, &[row.clone()], false);
        assert!(untouched.contains("bad\0byte"));

        let stripped = insert_stmt(RdbmsKind::Postgres, "app", "orders", &columns, &[row], true);
        assert!(stripped.contains("'badbyte'"));
    }

    #[test]
    fn sanitize_leaves_non_string_values_alone() {
        assert_eq!(sanitize(&Value::from(7), true), Value::from(7));
        assert_eq!(sanitize(&Value::Null, true), Value::Null);
    }
}
