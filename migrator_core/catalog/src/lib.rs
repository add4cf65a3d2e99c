//! Component B: reflects the source schema, resolves every candidate
//! table's columns through component A, and (when `migrate_metadata` is
//! set) drops and re-materializes the target schema, grounded on
//! `pydb_metadata.migrate_metadata`/`pydb_migration.migrate_schema`.

pub mod ddl;
pub mod error;
pub mod models;
pub mod reflect;

pub use error::CatalogError;
pub use models::*;
pub use reflect::{DdlExecutor, SchemaReflector};

use common::config::RdbmsKind;
use dag::{DependencyEdge, DependencyGraph};
use std::collections::{HashMap, HashSet};
use types::{ColumnAttributes, TypeClass};

/// Normalizes `include`/`exclude` to lowercase and narrows `source_tables`
/// to the candidate set. `include`, when non-empty, takes priority
/// (everything else is dropped); otherwise every table not in `exclude`
/// is a candidate. Fails with every name from either list that isn't
/// actually present in the source schema.
pub fn normalize_relations(
    source_tables: &[String],
    include: &[String],
    exclude: &[String],
) -> Result<Vec<String>, CatalogError> {
    let include_lower: HashSet<String> = include.iter().map(|s| s.to_lowercase()).collect();
    let exclude_lower: HashSet<String> = exclude.iter().map(|s| s.to_lowercase()).collect();
    let source_lower: HashSet<String> = source_tables.iter().map(|s| s.to_lowercase()).collect();

    let missing: Vec<String> = include_lower
        .iter()
        .chain(exclude_lower.iter())
        .filter(|name| !source_lower.contains(*name))
        .cloned()
        .collect();
    if !missing.is_empty() {
        return Err(CatalogError::RelationsNotFound(missing));
    }

    Ok(source_tables
        .iter()
        .filter(|table| {
            let lower = table.to_lowercase();
            if !include_lower.is_empty() {
                include_lower.contains(&lower)
            } else {
                !exclude_lower.contains(&lower)
            }
        })
        .cloned()
        .collect())
}

/// Topologically sorts `candidates` by foreign-key dependency, so that a
/// table's parents (the tables its FKs point to) always precede it. Edges
/// to a table outside the candidate set are ignored: that table isn't
/// being migrated, so it cannot gate creation order here.
fn sort_candidates(
    tables: &[ReflectedTable],
    candidates: &[String],
) -> Result<Vec<String>, CatalogError> {
    let candidate_set: HashSet<&str> = candidates.iter().map(String::as_str).collect();

    let mut graph = DependencyGraph::new();
    for name in candidates {
        graph.add_table(name.clone())?;
    }
    for table in tables.iter().filter(|t| candidate_set.contains(t.name.as_str())) {
        for column in &table.columns {
            if let Some(fk) = &column.foreign_key {
                if fk.table != table.name && candidate_set.contains(fk.table.as_str()) {
                    graph.add_dependency(DependencyEdge {
                        from: table.name.clone(),
                        to: fk.table.clone(),
                    })?;
                }
            }
        }
    }
    Ok(graph.topological_order()?)
}

fn find_column<'a>(
    tables: &'a [ReflectedTable],
    table: &str,
    column: &str,
) -> Option<(&'a ReflectedTable, &'a ReflectedColumn)> {
    tables
        .iter()
        .find(|t| t.name == table)
        .and_then(|t| t.columns.iter().find(|c| c.name == column).map(|c| (t, c)))
}

/// Builds the `ColumnAttributes` chain component A needs, following foreign
/// keys across tables. Capped at a fixed depth so a self-referencing FK
/// (an org-chart `manager_id -> employees.id` style column) can't recurse
/// forever if the referenced column happens to point back at itself.
const MAX_FK_DEPTH: u8 = 8;

fn build_attributes(
    tables: &[ReflectedTable],
    table: &str,
    column: &ReflectedColumn,
    depth: u8,
) -> ColumnAttributes {
    let foreign_key = if depth < MAX_FK_DEPTH {
        column.foreign_key.as_ref().and_then(|fk| {
            find_column(tables, &fk.table, &fk.column)
                .map(|(ft, fc)| Box::new(build_attributes(tables, &ft.name, fc, depth + 1)))
        })
    } else {
        None
    };

    ColumnAttributes {
        table: table.to_string(),
        name: column.name.clone(),
        type_class: column.type_class,
        nullable: column.nullable,
        length: column.length,
        precision: column.precision,
        scale: column.scale,
        asdecimal: column.asdecimal,
        timezone: column.timezone,
        is_primary_key: column.is_primary_key,
        foreign_key,
        identity: column.identity,
    }
}

fn column_features(column: &ReflectedColumn, resolved_nullable: bool) -> ColumnFeatures {
    ColumnFeatures {
        identity: column.identity.is_some(),
        primary_key: column.is_primary_key,
        unique: column.is_unique,
        nullable: resolved_nullable,
    }
}

/// Resolves every candidate table's columns through component A and, when
/// `step_metadata` is set, drops the existing target tables in reverse
/// dependency order, ensures the target schema exists, and re-materializes
/// the sorted candidate list on the target.
#[allow(clippy::too_many_arguments)]
pub async fn migrate_metadata(
    source: &mut dyn SchemaReflector,
    target_reflector: &mut dyn SchemaReflector,
    target_executor: &mut dyn DdlExecutor,
    source_rdbms: RdbmsKind,
    target_rdbms: RdbmsKind,
    from_schema: &str,
    to_schema: &str,
    target_owner: &str,
    include: &[String],
    exclude: &[String],
    overrides: &HashMap<String, TypeClass>,
    step_metadata: bool,
) -> Result<Vec<MigratedTable>, CatalogError> {
    let source_schema_names = source.schema_names().await?;
    let resolved_from = source_schema_names
        .iter()
        .find(|name| name.eq_ignore_ascii_case(from_schema))
        .ok_or_else(|| CatalogError::schema_not_found(from_schema))?;

    let reflected = source.reflect(resolved_from).await?;
    if let Some(warning) = reflected.warning {
        return Err(CatalogError::reflection_incomplete(warning));
    }

    let source_table_names: Vec<String> = reflected.tables.iter().map(|t| t.name.clone()).collect();
    let candidates = normalize_relations(&source_table_names, include, exclude)?;
    let sorted = sort_candidates(&reflected.tables, &candidates)?;

    let mut migrated_tables = Vec::with_capacity(sorted.len());
    let mut ddl_tables = Vec::with_capacity(sorted.len());

    for table_name in &sorted {
        let table = reflected
            .tables
            .iter()
            .find(|t| &t.name == table_name)
            .expect("candidate name came from this same reflected schema");

        let mut columns = Vec::with_capacity(table.columns.len());
        let mut ddl_columns = Vec::with_capacity(table.columns.len());
        let mut has_primary_key = false;

        for column in &table.columns {
            let mut attrs = build_attributes(&reflected.tables, &table.name, column, 0);
            let resolved = types::resolve_column_type(source_rdbms, target_rdbms, &mut attrs, overrides);
            has_primary_key |= column.is_primary_key;

            let target_type_name = types::type_to_name(target_rdbms.type_prefix(), resolved.type_class)
                .unwrap_or_else(|| format!("{:?}", resolved.type_class));
            let source_type_name = types::type_to_name(source_rdbms.type_prefix(), column.type_class)
                .unwrap_or_else(|| format!("{:?}", column.type_class));

            columns.push(MigratedColumn {
                name: column.name.clone(),
                source_type: source_type_name,
                target_type: target_type_name.clone(),
                type_class: resolved.type_class,
                features: column_features(column, resolved.nullable),
            });

            ddl_columns.push(ddl::DdlColumn {
                name: column.name.clone(),
                type_name: target_type_name,
                nullable: resolved.nullable,
                length: resolved.length,
                precision: resolved.precision,
                scale: resolved.scale,
                is_primary_key: column.is_primary_key,
            });
        }

        ddl_tables.push((table.name.clone(), ddl_columns));
        migrated_tables.push(MigratedTable {
            name: table.name.clone(),
            columns,
            plain_count: 0,
            plain_status: TransferStatus::None,
            lob_count: 0,
            lob_status: TransferStatus::None,
            sync_deletes: 0,
            sync_inserts: 0,
            sync_updates: 0,
            no_primary_key_warning: !has_primary_key,
        });
    }

    for table in &migrated_tables {
        if table.no_primary_key_warning {
            tracing::warn!(
                rdbms = ?source_rdbms,
                schema = %from_schema,
                table = %table.name,
                "no primary key column found",
            );
        }
    }

    if step_metadata {
        let target_schema_names = target_reflector.schema_names().await?;
        let schema_exists = target_schema_names
            .iter()
            .any(|name| name.eq_ignore_ascii_case(to_schema));

        if schema_exists {
            for (table_name, _) in ddl_tables.iter().rev() {
                target_executor
                    .execute(&ddl::drop_table_stmt(target_rdbms, to_schema, table_name))
                    .await?;
            }
        } else {
            target_executor
                .execute(&ddl::ensure_schema_stmt(target_rdbms, to_schema, target_owner))
                .await?;
        }

        for (table_name, ddl_columns) in &ddl_tables {
            target_executor
                .execute(&ddl::create_table_stmt(to_schema, table_name, ddl_columns))
                .await?;
        }
    }

    Ok(migrated_tables)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(name: &str, columns: Vec<ReflectedColumn>) -> ReflectedTable {
        ReflectedTable { name: name.to_string(), columns }
    }

    fn plain_column(name: &str, type_class: TypeClass) -> ReflectedColumn {
        ReflectedColumn {
            name: name.to_string(),
            type_class,
            nullable: true,
            length: None,
            precision: None,
            scale: None,
            asdecimal: None,
            timezone: None,
            is_primary_key: false,
            is_unique: false,
            identity: None,
            foreign_key: None,
        }
    }

    #[test]
    fn include_list_takes_priority_over_everything_else() {
        let source = vec!["orders".into(), "customers".into(), "audit_log".into()];
        let result = normalize_relations(&source, &["Orders".into()], &[]).unwrap();
        assert_eq!(result, vec!["orders".to_string()]);
    }

    #[test]
    fn exclude_list_removes_named_tables() {
        let source = vec!["orders".into(), "customers".into(), "audit_log".into()];
        let result = normalize_relations(&source, &[], &["audit_log".into()]).unwrap();
        assert_eq!(result, vec!["orders".to_string(), "customers".to_string()]);
    }

    #[test]
    fn unknown_relation_names_are_reported() {
        let source = vec!["orders".into()];
        let err = normalize_relations(&source, &["ghost_table".into()], &[]).unwrap_err();
        assert!(matches!(err, CatalogError::RelationsNotFound(names) if names == vec!["ghost_table".to_string()]));
    }

    #[test]
    fn candidates_sort_parents_before_children() {
        let customers = table("customers", vec![plain_column("id", TypeClass::Integer)]);
        let orders = table(
            "orders",
            vec![ReflectedColumn {
                foreign_key: Some(ForeignKeyRef { table: "customers".into(), column: "id".into() }),
                ..plain_column("customer_id", TypeClass::Integer)
            }],
        );
        let tables = vec![orders, customers];
        let candidates = vec!["orders".to_string(), "customers".to_string()];
        let sorted = sort_candidates(&tables, &candidates).unwrap();
        let customers_pos = sorted.iter().position(|t| t == "customers").unwrap();
        let orders_pos = sorted.iter().position(|t| t == "orders").unwrap();
        assert!(customers_pos < orders_pos);
    }

    #[test]
    fn foreign_key_outside_candidate_set_is_not_a_blocking_edge() {
        let orders = table(
            "orders",
            vec![ReflectedColumn {
                foreign_key: Some(ForeignKeyRef { table: "customers".into(), column: "id".into() }),
                ..plain_column("customer_id", TypeClass::Integer)
            }],
        );
        let tables = vec![orders];
        let candidates = vec!["orders".to_string()];
        let sorted = sort_candidates(&tables, &candidates).unwrap();
        assert_eq!(sorted, vec!["orders".to_string()]);
    }
}
