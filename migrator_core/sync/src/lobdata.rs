//! Component E, LOB half: reconciles an S3-backed LOB column against its
//! source by diffing two sorted name lists, then re-migrating the
//! inserted side and batch-deleting the stale side (spec.md §4.E).

use crate::error::SyncError;
use catalog::{MigratedColumn, MigratedTable};
use clients::{connect, S3Client};
use common::cancel::CancelFlag;
use common::config::{Metrics, RdbmsSpotConfig};
use std::collections::HashMap;
use transfer::sql::{qualified_table, quote_ident};
use transfer::{transfer_lob_column_explicit, LobDestination, LobSpec};

/// `s3_prefix` stripped back off each S3 key, paired with the key's full
/// path so deletes can use it verbatim.
fn strip_prefix_and_ext<'a>(key: &'a str, prefix: &str, forced_ext: Option<&str>) -> Option<&'a str> {
    let rest = key.strip_prefix(prefix)?.strip_prefix('/')?;
    match forced_ext {
        Some(ext) => rest.strip_suffix(&format!(".{ext}")),
        None => Some(rest),
    }
}

async fn list_source_reference_values(
    source_spot: &RdbmsSpotConfig,
    from_schema: &str,
    table_name: &str,
    column: &MigratedColumn,
    reference_column: &str,
) -> Result<Vec<String>, SyncError> {
    let mut source = connect(source_spot).await.map_err(SyncError::from)?;
    let select = format!(
        "SELECT DISTINCT {} FROM {} WHERE {} IS NOT NULL",
        quote_ident(source_spot.engine, reference_column),
        qualified_table(source_spot.engine, from_schema, table_name),
        quote_ident(source_spot.engine, &column.name),
    );
    let rows = source.query(&select).await.map_err(SyncError::from)?;
    let mut values: Vec<String> = rows
        .into_iter()
        .filter_map(|row| row.get(reference_column).map(|v| match v {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        }))
        .collect();
    values.sort();
    Ok(values)
}

/// Symmetric difference of two sorted sequences via a one-pass merge:
/// names only in `db_names` are inserts, names only in `s3_names` are
/// deletes.
fn merge_diff(db_names: &[String], s3_names: &[String]) -> (Vec<String>, Vec<String>) {
    let mut inserts = Vec::new();
    let mut deletes = Vec::new();
    let (mut i, mut j) = (0, 0);

    while i < db_names.len() && j < s3_names.len() {
        match db_names[i].cmp(&s3_names[j]) {
            std::cmp::Ordering::Less => {
                inserts.push(db_names[i].clone());
                i += 1;
            }
            std::cmp::Ordering::Greater => {
                deletes.push(s3_names[j].clone());
                j += 1;
            }
            std::cmp::Ordering::Equal => {
                i += 1;
                j += 1;
            }
        }
    }
    inserts.extend(db_names[i..].iter().cloned());
    deletes.extend(s3_names[j..].iter().cloned());
    (inserts, deletes)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LobSyncCounts {
    pub inserted: u64,
    pub deleted: u64,
}

/// Reconciles one LOB column's S3 prefix against its source column.
#[allow(clippy::too_many_arguments)]
pub async fn sync_lob_column(
    source_spot: &RdbmsSpotConfig,
    target_spot: &RdbmsSpotConfig,
    from_schema: &str,
    to_schema: &str,
    table: &MigratedTable,
    column: &MigratedColumn,
    spec: &LobSpec,
    s3: &S3Client,
    migration_badge: &str,
    metrics: &Metrics,
) -> Result<LobSyncCounts, SyncError> {
    let prefix = transfer::lobdata::s3_prefix(migration_badge, to_schema, &table.name, &column.name);

    let db_names = list_source_reference_values(source_spot, from_schema, &table.name, column, &spec.reference_column).await?;
    let mut keys = s3.list(&prefix).await.map_err(SyncError::from)?;
    keys.sort();

    let mut s3_names_to_key: HashMap<String, String> = HashMap::new();
    let mut s3_names = Vec::with_capacity(keys.len());
    for key in &keys {
        if let Some(name) = strip_prefix_and_ext(key, &prefix, spec.forced_ext.as_deref()) {
            s3_names.push(name.to_string());
            s3_names_to_key.insert(name.to_string(), key.clone());
        }
    }
    s3_names.sort();

    let (inserts, deletes) = merge_diff(&db_names, &s3_names);

    let pk: Vec<&MigratedColumn> = table.primary_key_columns().collect();
    let mut inserted = 0;
    if !inserts.is_empty() {
        let destination = LobDestination::S3 { client: s3, migration_badge, flatten_storage: false };
        inserted = transfer_lob_column_explicit(
            source_spot,
            target_spot,
            from_schema,
            to_schema,
            &table.name,
            column,
            spec,
            &pk,
            &inserts,
            &destination,
            metrics,
            &CancelFlag::new(),
        )
        .await
        .map_err(SyncError::from)?;
    }

    let delete_keys: Vec<String> = deletes.iter().filter_map(|name| s3_names_to_key.get(name).cloned()).collect();
    if !delete_keys.is_empty() {
        s3.delete(&delete_keys).await.map_err(SyncError::from)?;
    }

    Ok(LobSyncCounts { inserted, deleted: delete_keys.len() as u64 })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_diff_finds_symmetric_difference() {
        let db = vec!["a".to_string(), "b".to_string(), "d".to_string()];
        let s3 = vec!["b".to_string(), "c".to_string()];
        let (inserts, deletes) = merge_diff(&db, &s3);
        assert_eq!(inserts, vec!["a", "d"]);
        assert_eq!(deletes, vec!["c"]);
    }

    #[test]
    fn merge_diff_of_identical_lists_is_empty() {
        let names = vec!["x".to_string(), "y".to_string()];
        let (inserts, deletes) = merge_diff(&names, &names);
        assert!(inserts.is_empty());
        assert!(deletes.is_empty());
    }

    #[test]
    fn strip_prefix_and_ext_recovers_the_reference_value() {
        let key = "badge/hr/doc/content/invoice-7.pdf";
        let name = strip_prefix_and_ext(key, "badge/hr/doc/content", Some("pdf"));
        assert_eq!(name, Some("invoice-7"));
    }

    #[test]
    fn strip_prefix_and_ext_without_a_forced_extension_keeps_the_whole_name() {
        let key = "badge/hr/doc/content/invoice-7";
        let name = strip_prefix_and_ext(key, "badge/hr/doc/content", None);
        assert_eq!(name, Some("invoice-7"));
    }
}
