//! Small SQL-rendering helpers shared by the plaindata and LOB pipelines.
//! Grounded on `setup_target_table`'s column-list building in the original
//! resolver, generalized from one SQLAlchemy `Table` object to plain string
//! assembly against a dialect-agnostic connection.

use common::config::RdbmsKind;
use serde_json::Value;

/// Quotes `name` with its dialect's identifier-quote character. Rather than
/// tracking each dialect's reserved-word list, every identifier this crate
/// emits is always quoted — a strict superset of "escape reserved words"
/// that can never collide with a keyword.
pub fn quote_ident(dialect: RdbmsKind, name: &str) -> String {
    match dialect {
        RdbmsKind::MySql => format!("`{name}`"),
        RdbmsKind::SqlServer => format!("[{name}]"),
        RdbmsKind::Oracle | RdbmsKind::Postgres => format!("\"{name}\""),
    }
}

pub fn qualified_table(dialect: RdbmsKind, schema: &str, table: &str) -> String {
    format!("{}.{}", quote_ident(dialect, schema), quote_ident(dialect, table))
}

/// Appends a dialect's offset/limit clause. SQL Server needs an `ORDER BY`
/// to use `OFFSET ... FETCH`; callers always pass a non-empty `order_by`
/// (the primary key, or the first column when a table has none).
pub fn paginate(dialect: RdbmsKind, sql: &str, order_by: &str, offset: u64, limit: Option<u64>) -> String {
    match dialect {
        RdbmsKind::SqlServer => match limit {
            Some(limit) => format!(
                "{sql} ORDER BY {order_by} OFFSET {offset} ROWS FETCH NEXT {limit} ROWS ONLY"
            ),
            None => format!("{sql} ORDER BY {order_by} OFFSET {offset} ROWS"),
        },
        RdbmsKind::Oracle => match limit {
            Some(limit) => format!(
                "{sql} ORDER BY {order_by} OFFSET {offset} ROWS FETCH NEXT {limit} ROWS ONLY"
            ),
            None => format!("{sql} ORDER BY {order_by} OFFSET {offset} ROWS"),
        },
        RdbmsKind::Postgres | RdbmsKind::MySql => match limit {
            Some(limit) => format!("{sql} ORDER BY {order_by} LIMIT {limit} OFFSET {offset}"),
            None => format!("{sql} ORDER BY {order_by} OFFSET {offset}"),
        },
    }
}

/// Renders a value as a SQL literal. `clients::RdbmsAdapter` has no bind
/// parameter support, so every value this crate writes goes through here
/// rather than through driver-level parameter marshaling.
pub fn literal(dialect: RdbmsKind, value: &Value) -> String {
    match value {
        Value::Null => "NULL".to_string(),
        Value::Bool(b) => match dialect {
            RdbmsKind::Postgres => if *b { "TRUE" } else { "FALSE" }.to_string(),
            _ => if *b { "1" } else { "0" }.to_string(),
        },
        Value::Number(n) => n.to_string(),
        Value::String(s) => format!("'{}'", s.replace('\'', "''")),
        other => format!("'{}'", other.to_string().replace('\'', "''")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mysql_uses_backtick_quoting() {
        assert_eq!(quote_ident(RdbmsKind::MySql, "order"), "`order`");
    }

    #[test]
    fn sqlserver_uses_bracket_quoting() {
        assert_eq!(quote_ident(RdbmsKind::SqlServer, "order"), "[order]");
    }

    #[test]
    fn postgres_paginate_emits_limit_offset() {
        let sql = paginate(RdbmsKind::Postgres, "SELECT * FROM t", "id", 100, Some(50));
        assert_eq!(sql, "SELECT * FROM t ORDER BY id LIMIT 50 OFFSET 100");
    }

    #[test]
    fn sqlserver_paginate_emits_fetch_next() {
        let sql = paginate(RdbmsKind::SqlServer, "SELECT * FROM t", "id", 0, Some(50));
        assert_eq!(sql, "SELECT * FROM t ORDER BY id OFFSET 0 ROWS FETCH NEXT 50 ROWS ONLY");
    }

    #[test]
    fn final_unbounded_partition_omits_limit_clause() {
        let sql = paginate(RdbmsKind::Postgres, "SELECT * FROM t", "id", 200, None);
        assert_eq!(sql, "SELECT * FROM t ORDER BY id OFFSET 200");
    }

    #[test]
    fn string_literals_escape_embedded_quotes() {
        assert_eq!(literal(RdbmsKind::Postgres, &Value::String("O'Brien".into())), "'O''Brien'");
    }
}
