//! Per-dialect DDL statements for dropping and (re)creating the target
//! schema and its tables, grounded on `migrate_schema`/`setup_target_table`
//! in the original resolver.

use common::config::RdbmsKind;

/// A column ready to be rendered into a `CREATE TABLE` statement: its
/// resolved type name and the attributes that shape its type modifier.
#[derive(Debug, Clone)]
pub struct DdlColumn {
    pub name: String,
    pub type_name: String,
    pub nullable: bool,
    pub length: Option<u32>,
    pub precision: Option<u32>,
    pub scale: Option<u32>,
    pub is_primary_key: bool,
}

/// Drops one target table ahead of a full metadata migration. Oracle has no
/// `IF EXISTS` clause, so the drop is wrapped in a PL/SQL block that
/// swallows the "table does not exist" exception; Postgres needs `CASCADE`
/// to also drop dependent views/sequences; the rest accept `IF EXISTS`
/// directly.
pub fn drop_table_stmt(dialect: RdbmsKind, schema: &str, table: &str) -> String {
    let qualified = format!("{schema}.{table}");
    match dialect {
        RdbmsKind::Oracle => format!(
            "BEGIN\n  EXECUTE IMMEDIATE 'DROP TABLE {qualified} CASCADE CONSTRAINTS';\nEXCEPTION WHEN OTHERS THEN NULL;\nEND;"
        ),
        RdbmsKind::Postgres => format!("DROP TABLE IF EXISTS {qualified} CASCADE"),
        RdbmsKind::MySql | RdbmsKind::SqlServer => format!("DROP TABLE IF EXISTS {qualified}"),
    }
}

/// Creates the target schema when it doesn't already exist. Oracle has no
/// separate schema object: a schema *is* a user, so this creates one,
/// password-protected with its own name. Every other dialect creates a
/// proper schema, owned by the connecting user.
pub fn ensure_schema_stmt(dialect: RdbmsKind, schema: &str, owner: &str) -> String {
    match dialect {
        RdbmsKind::Oracle => format!("CREATE USER {schema} IDENTIFIED BY {schema}"),
        _ => format!("CREATE SCHEMA {schema} AUTHORIZATION {owner}"),
    }
}

fn column_def(column: &DdlColumn) -> String {
    let mut type_sql = column.type_name.clone();
    match (column.precision, column.scale) {
        (Some(p), Some(s)) => type_sql = format!("{type_sql}({p},{s})"),
        (Some(p), None) => type_sql = format!("{type_sql}({p})"),
        (None, None) => {
            if let Some(length) = column.length {
                type_sql = format!("{type_sql}({length})");
            }
        }
        (None, Some(_)) => {}
    }
    let null_sql = if column.nullable { "NULL" } else { "NOT NULL" };
    format!("{} {} {}", column.name, type_sql, null_sql)
}

/// Builds the `CREATE TABLE` statement for one already-sorted, already
/// type-resolved table.
pub fn create_table_stmt(schema: &str, table: &str, columns: &[DdlColumn]) -> String {
    let mut defs: Vec<String> = columns.iter().map(column_def).collect();

    let pk_columns: Vec<&str> = columns
        .iter()
        .filter(|c| c.is_primary_key)
        .map(|c| c.name.as_str())
        .collect();
    if !pk_columns.is_empty() {
        defs.push(format!("PRIMARY KEY ({})", pk_columns.join(", ")));
    }

    format!("CREATE TABLE {schema}.{table} (\n  {}\n)", defs.join(",\n  "))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn col(name: &str, type_name: &str) -> DdlColumn {
        DdlColumn {
            name: name.to_string(),
            type_name: type_name.to_string(),
            nullable: true,
            length: None,
            precision: None,
            scale: None,
            is_primary_key: false,
        }
    }

    #[test]
    fn oracle_drop_swallows_missing_table_exception() {
        let stmt = drop_table_stmt(RdbmsKind::Oracle, "app", "orders");
        assert!(stmt.contains("CASCADE CONSTRAINTS"));
        assert!(stmt.contains("EXCEPTION WHEN OTHERS THEN NULL"));
    }

    #[test]
    fn postgres_drop_cascades() {
        let stmt = drop_table_stmt(RdbmsKind::Postgres, "app", "orders");
        assert_eq!(stmt, "DROP TABLE IF EXISTS app.orders CASCADE");
    }

    #[test]
    fn mysql_drop_uses_if_exists_without_cascade() {
        let stmt = drop_table_stmt(RdbmsKind::MySql, "app", "orders");
        assert_eq!(stmt, "DROP TABLE IF EXISTS app.orders");
    }

    #[test]
    fn oracle_schema_creation_is_a_user() {
        let stmt = ensure_schema_stmt(RdbmsKind::Oracle, "app", "ignored");
        assert_eq!(stmt, "CREATE USER app IDENTIFIED BY app");
    }

    #[test]
    fn postgres_schema_creation_names_the_owner() {
        let stmt = ensure_schema_stmt(RdbmsKind::Postgres, "app", "migrator");
        assert_eq!(stmt, "CREATE SCHEMA app AUTHORIZATION migrator");
    }

    #[test]
    fn create_table_emits_primary_key_constraint() {
        let columns = vec![
            DdlColumn { is_primary_key: true, nullable: false, ..col("id", "BIGINT") },
            col("name", "VARCHAR"),
        ];
        let stmt = create_table_stmt("app", "customers", &columns);
        assert!(stmt.starts_with("CREATE TABLE app.customers ("));
        assert!(stmt.contains("id BIGINT NOT NULL"));
        assert!(stmt.contains("PRIMARY KEY (id)"));
    }

    #[test]
    fn create_table_renders_precision_and_scale() {
        let columns = vec![DdlColumn {
            precision: Some(10),
            scale: Some(2),
            ..col("amount", "NUMERIC")
        }];
        let stmt = create_table_stmt("app", "invoices", &columns);
        assert!(stmt.contains("amount NUMERIC(10,2) NULL"));
    }
}
