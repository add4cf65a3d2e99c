//! Component E, plaindata half: reconciles an already-migrated target
//! table against its source, computing and applying the delete/insert/
//! update set. Grounded on `pydb_migration`'s sync pass and spec.md §4.E.

use crate::error::SyncError;
use catalog::{MigratedColumn, MigratedTable};
use clients::{connect, Row};
use common::config::{RdbmsKind, RdbmsSpotConfig};
use serde_json::Value;
use std::collections::HashMap;
use transfer::sql::{literal, qualified_table, quote_ident};

/// Per-table row counts, recorded as `sync-deletes`/`sync-inserts`/
/// `sync-updates` (spec.md §4.E).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncCounts {
    pub deletes: u64,
    pub inserts: u64,
    pub updates: u64,
}

fn pk_columns(table: &MigratedTable) -> Vec<&MigratedColumn> {
    table.primary_key_columns().collect()
}

/// Non-PK, non-LOB columns: the set sync compares for updates and writes
/// on insert.
fn sync_columns(table: &MigratedTable) -> Vec<&MigratedColumn> {
    table
        .columns
        .iter()
        .filter(|c| !c.features.primary_key && !types::is_lob_column(c.type_class))
        .collect()
}

fn row_key(pk: &[&MigratedColumn], row: &Row) -> String {
    let parts: Vec<String> = pk
        .iter()
        .map(|c| row.get(&c.name).cloned().unwrap_or(Value::Null).to_string())
        .collect();
    parts.join("\u{1}")
}

fn row_differs(sync_cols: &[&MigratedColumn], source: &Row, target: &Row) -> bool {
    sync_cols.iter().any(|c| source.get(&c.name) != target.get(&c.name))
}

async fn fetch_rows(spot: &RdbmsSpotConfig, schema: &str, table_name: &str, columns: &[&MigratedColumn]) -> Result<HashMap<String, Row>, SyncError> {
    let mut adapter = connect(spot).await.map_err(SyncError::from)?;
    let pk: Vec<&MigratedColumn> = columns.iter().filter(|c| c.features.primary_key).copied().collect();
    let column_list = columns.iter().map(|c| quote_ident(spot.engine, &c.name)).collect::<Vec<_>>().join(", ");
    let select = format!("SELECT {column_list} FROM {}", qualified_table(spot.engine, schema, table_name));
    let rows = adapter.query(&select).await.map_err(SyncError::from)?;

    Ok(rows.into_iter().map(|row| (row_key(&pk, &row), row)).collect())
}

fn delete_stmt(dialect: RdbmsKind, schema: &str, table: &str, pk: &[&MigratedColumn], row: &Row) -> String {
    let conditions: Vec<String> = pk
        .iter()
        .map(|c| {
            let value = row.get(&c.name).cloned().unwrap_or(Value::Null);
            format!("{} = {}", quote_ident(dialect, &c.name), literal(dialect, &value))
        })
        .collect();
    format!("DELETE FROM {} WHERE {}", qualified_table(dialect, schema, table), conditions.join(" AND "))
}

fn insert_stmt(dialect: RdbmsKind, schema: &str, table: &str, columns: &[&MigratedColumn], row: &Row) -> String {
    let column_list = columns.iter().map(|c| quote_ident(dialect, &c.name)).collect::<Vec<_>>().join(", ");
    let values: Vec<String> = columns
        .iter()
        .map(|c| literal(dialect, row.get(&c.name).unwrap_or(&Value::Null)))
        .collect();
    format!(
        "INSERT INTO {} ({column_list}) VALUES ({})",
        qualified_table(dialect, schema, table),
        values.join(", ")
    )
}

fn update_stmt(dialect: RdbmsKind, schema: &str, table: &str, pk: &[&MigratedColumn], sync_cols: &[&MigratedColumn], row: &Row) -> String {
    let assignments: Vec<String> = sync_cols
        .iter()
        .map(|c| format!("{} = {}", quote_ident(dialect, &c.name), literal(dialect, row.get(&c.name).unwrap_or(&Value::Null))))
        .collect();
    let conditions: Vec<String> = pk
        .iter()
        .map(|c| {
            let value = row.get(&c.name).cloned().unwrap_or(Value::Null);
            format!("{} = {}", quote_ident(dialect, &c.name), literal(dialect, &value))
        })
        .collect();
    format!(
        "UPDATE {} SET {} WHERE {}",
        qualified_table(dialect, schema, table),
        assignments.join(", "),
        conditions.join(" AND "),
    )
}

/// Reconciles `table` on the target against its source: deletes target
/// rows absent from the source, inserts source rows absent from the
/// target, and (unless `correlate_only`) updates rows present in both but
/// differing in a sync column.
pub async fn sync_plaindata(
    source_spot: &RdbmsSpotConfig,
    target_spot: &RdbmsSpotConfig,
    from_schema: &str,
    to_schema: &str,
    table: &mut MigratedTable,
    correlate_only: bool,
) -> Result<SyncCounts, SyncError> {
    let pk = pk_columns(table);
    if pk.is_empty() {
        tracing::warn!(table = %table.name, "no primary key, cannot sync");
        return Ok(SyncCounts::default());
    }
    let sync_cols = sync_columns(table);
    let all_columns: Vec<&MigratedColumn> = pk.iter().chain(sync_cols.iter()).copied().collect();

    let source_rows = fetch_rows(source_spot, from_schema, &table.name, &all_columns).await?;
    let target_rows = fetch_rows(target_spot, to_schema, &table.name, &all_columns).await?;

    let mut target = connect(target_spot).await.map_err(SyncError::from)?;
    let mut counts = SyncCounts::default();

    for (key, target_row) in &target_rows {
        if !source_rows.contains_key(key) {
            let stmt = delete_stmt(target_spot.engine, to_schema, &table.name, &pk, target_row);
            target.execute(&stmt).await.map_err(SyncError::from)?;
            counts.deletes += 1;
        }
    }

    for (key, source_row) in &source_rows {
        match target_rows.get(key) {
            None => {
                let stmt = insert_stmt(target_spot.engine, to_schema, &table.name, &all_columns, source_row);
                target.execute(&stmt).await.map_err(SyncError::from)?;
                counts.inserts += 1;
            }
            Some(target_row) if !correlate_only && row_differs(&sync_cols, source_row, target_row) => {
                let stmt = update_stmt(target_spot.engine, to_schema, &table.name, &pk, &sync_cols, source_row);
                target.execute(&stmt).await.map_err(SyncError::from)?;
                counts.updates += 1;
            }
            _ => {}
        }
    }

    table.sync_deletes = counts.deletes;
    table.sync_inserts = counts.inserts;
    table.sync_updates = counts.updates;
    Ok(counts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog::{ColumnFeatures, TransferStatus};

    fn column(name: &str, pk: bool) -> MigratedColumn {
        MigratedColumn {
            name: name.to_string(),
            source_type: "ignored".to_string(),
            target_type: "ignored".to_string(),
            type_class: types::TypeClass::Integer,
            features: ColumnFeatures { primary_key: pk, ..Default::default() },
        }
    }

    fn sample_table() -> MigratedTable {
        MigratedTable {
            name: "widgets".to_string(),
            columns: vec![column("id", true), column("stock", false)],
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
    fn sync_columns_excludes_the_primary_key() {
        let table = sample_table();
        let names: Vec<&str> = sync_columns(&table).iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["stock"]);
    }

    #[test]
    fn row_key_joins_primary_key_values() {
        let pk = vec![&sample_table().columns[0]];
        let mut row = Row::new();
        row.insert("id".to_string(), Value::from(42));
        assert_eq!(row_key(&pk, &row), "42");
    }

    #[test]
    fn row_differs_detects_a_changed_sync_column() {
        let table = sample_table();
        let sync_cols: Vec<&MigratedColumn> = sync_columns(&table);
        let mut source = Row::new();
        source.insert("stock".to_string(), Value::from(5));
        let mut target = Row::new();
        target.insert("stock".to_string(), Value::from(9));
        assert!(row_differs(&sync_cols, &source, &target));
    }

    #[test]
    fn row_differs_is_false_for_identical_rows() {
        let table = sample_table();
        let sync_cols: Vec<&MigratedColumn> = sync_columns(&table);
        let mut source = Row::new();
        source.insert("stock".to_string(), Value::from(5));
        let target = source.clone();
        assert!(!row_differs(&sync_cols, &source, &target));
    }

    #[test]
    fn delete_statement_matches_on_every_primary_key_column() {
        let table = sample_table();
        let pk = pk_columns(&table);
        let mut row = Row::new();
        row.insert("id".to_string(), Value::from(7));
        let stmt = delete_stmt(RdbmsKind::Postgres, "app", "widgets", &pk, &row);
        assert_eq!(stmt, "DELETE FROM \"app\".\"widgets\" WHERE \"id\" = 7");
    }
}
