//! Parses the `POST /migrate` request body (spec.md §6's kebab-case
//! parameter list) into the engine's own `sessions`/`common` types.

use std::collections::{HashMap, HashSet};

use serde::Deserialize;
use sessions::{IncrementalWindow, RelationFilter};

use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct MigrateRequest {
    #[serde(rename = "from-rdbms")]
    pub from_rdbms: String,
    #[serde(rename = "from-schema")]
    pub from_schema: String,
    #[serde(rename = "to-rdbms")]
    pub to_rdbms: String,
    #[serde(rename = "to-schema")]
    pub to_schema: String,
    #[serde(rename = "to-s3", default)]
    pub to_s3: Option<String>,
    #[serde(rename = "migrate-metadata", default)]
    pub migrate_metadata: bool,
    #[serde(rename = "migrate-plaindata", default)]
    pub migrate_plaindata: bool,
    #[serde(rename = "migrate-lobdata", default)]
    pub migrate_lobdata: bool,
    #[serde(rename = "synchronize-plaindata", default)]
    pub synchronize_plaindata: bool,
    #[serde(rename = "process-indexes", default)]
    pub process_indexes: bool,
    #[serde(rename = "process-views", default)]
    pub process_views: bool,
    #[serde(rename = "relax-reflection", default)]
    pub relax_reflection: bool,
    #[serde(rename = "skip-nonempty", default)]
    pub skip_nonempty: bool,
    #[serde(rename = "reflect-filetype", default)]
    pub reflect_filetype: bool,
    #[serde(rename = "flatten-storage", default)]
    pub flatten_storage: bool,
    #[serde(rename = "include-relations", default)]
    pub include_relations: Vec<String>,
    #[serde(rename = "exclude-relations", default)]
    pub exclude_relations: Vec<String>,
    #[serde(rename = "exclude-constraints", default)]
    pub exclude_constraints: Vec<String>,
    #[serde(rename = "incremental-migration", default)]
    pub incremental_migration: Vec<String>,
    #[serde(rename = "remove-nulls", default)]
    pub remove_nulls: Vec<String>,
    #[serde(rename = "exclude-columns", default)]
    pub exclude_columns: Vec<String>,
    #[serde(rename = "override-columns", default)]
    pub override_columns: Vec<String>,
    #[serde(rename = "named-lobdata", default)]
    pub named_lobdata: Vec<String>,
    #[serde(rename = "migration-badge", default)]
    pub migration_badge: Option<String>,
}

/// Builds the include/exclude relation filter, rejecting both lists being
/// set at once (spec.md §3: "mutually exclusive").
pub fn relation_filter(include: &[String], exclude: &[String]) -> Result<RelationFilter, ApiError> {
    match (include.is_empty(), exclude.is_empty()) {
        (false, false) => {
            Err(ApiError::bad_request("include-relations and exclude-relations are mutually exclusive"))
        }
        (false, true) => Ok(RelationFilter::Include(include.to_vec())),
        (true, false) => Ok(RelationFilter::Exclude(exclude.to_vec())),
        (true, true) => Ok(RelationFilter::None),
    }
}

/// Parses `table[=size]` entries (spec.md §6 `incremental-migration`).
pub fn incremental_migrations(entries: &[String]) -> Result<HashMap<String, IncrementalWindow>, ApiError> {
    let mut windows = HashMap::with_capacity(entries.len());
    for entry in entries {
        let (table, count) = match entry.split_once('=') {
            Some((table, size)) => {
                let count = size
                    .parse::<i64>()
                    .map_err(|_| ApiError::bad_request(format!("invalid incremental-migration size in '{entry}'")))?;
                (table, count)
            }
            None => (entry.as_str(), 0),
        };
        windows.insert(table.to_string(), IncrementalWindow { count, offset: 0 });
    }
    Ok(windows)
}

/// Parses `key=value` entries such as `override-columns`
/// (`table.column=typename`) and `named-lobdata`
/// (`table.column=refcolumn[.ext]`).
pub fn keyed_pairs(entries: &[String], field: &str) -> Result<HashMap<String, String>, ApiError> {
    let mut map = HashMap::with_capacity(entries.len());
    for entry in entries {
        let (key, value) = entry
            .split_once('=')
            .ok_or_else(|| ApiError::bad_request(format!("'{entry}' is not a valid {field} entry, expected key=value")))?;
        map.insert(key.to_string(), value.to_string());
    }
    Ok(map)
}

pub fn remove_nulls(entries: &[String]) -> HashSet<String> {
    entries.iter().cloned().collect()
}
