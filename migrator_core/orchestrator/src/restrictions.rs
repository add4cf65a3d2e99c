//! Target-side "disable restrictions" toggle around the C/D transfer steps
//! (spec.md §4.G): Postgres replication-role trick and MySQL trigger
//! disabling apply; Oracle and SQL Server are a no-op at this level (their
//! own per-worker session setup is `transfer`'s concern, not the
//! orchestrator's).

use common::config::RdbmsKind;

pub fn disable_stmt(dialect: RdbmsKind) -> Option<&'static str> {
    match dialect {
        RdbmsKind::Postgres => Some("SET session_replication_role = replica"),
        RdbmsKind::MySql => Some("SET @DISABLE_TRIGGERS = 1"),
        RdbmsKind::Oracle | RdbmsKind::SqlServer => None,
    }
}

pub fn restore_stmt(dialect: RdbmsKind) -> Option<&'static str> {
    match dialect {
        RdbmsKind::Postgres => Some("SET session_replication_role = DEFAULT"),
        RdbmsKind::MySql => Some("SET @DISABLE_TRIGGERS = 0"),
        RdbmsKind::Oracle | RdbmsKind::SqlServer => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn oracle_and_sqlserver_have_no_restriction_toggle() {
        assert!(disable_stmt(RdbmsKind::Oracle).is_none());
        assert!(disable_stmt(RdbmsKind::SqlServer).is_none());
    }

    #[test]
    fn postgres_uses_the_replication_role_trick() {
        assert_eq!(disable_stmt(RdbmsKind::Postgres), Some("SET session_replication_role = replica"));
        assert_eq!(restore_stmt(RdbmsKind::Postgres), Some("SET session_replication_role = DEFAULT"));
    }
}
