//! Synthetic schema and spot-config builders, standing in for a reflected
//! source schema or a configured RDBMS/S3 spot without touching a real
//! database, per SPEC_FULL.md §0.4.

use catalog::{ReflectedColumn, ReflectedTable};
use common::config::{RdbmsKind, RdbmsSpotConfig, S3SpotConfig};
use types::TypeClass;

/// A plain, non-null, non-key varchar column -- the common case callers
/// then tweak with struct-update syntax.
pub fn column(name: &str, type_class: TypeClass) -> ReflectedColumn {
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

/// A table with an `id` integer primary key followed by `columns`.
pub fn table(name: &str, columns: Vec<ReflectedColumn>) -> ReflectedTable {
    let mut id = column("id", TypeClass::Integer);
    id.nullable = false;
    id.is_primary_key = true;

    let mut all = vec![id];
    all.extend(columns);

    ReflectedTable { name: name.to_string(), columns: all }
}

/// A `RdbmsSpotConfig` pointed at `host:port`, not actually reachable
/// unless paired with [`crate::setup_postgres`] or a real server.
pub fn rdbms_spot(engine: RdbmsKind, host: &str, port: u16) -> RdbmsSpotConfig {
    RdbmsSpotConfig {
        engine,
        name: "testdb".to_string(),
        host: host.to_string(),
        port,
        user: "postgres".to_string(),
        pwd: "postgres".to_string(),
        client: None,
        driver: None,
    }
}

/// An `S3SpotConfig` pointed at a `wiremock` endpoint (see
/// [`crate::fake_s3`]) or any other S3-compatible server.
pub fn s3_spot(endpoint_url: &str) -> S3SpotConfig {
    S3SpotConfig {
        engine: "s3".to_string(),
        endpoint_url: endpoint_url.to_string(),
        bucket_name: "test-bucket".to_string(),
        access_key: "test-access-key".to_string(),
        secret_key: "test-secret-key".to_string(),
        region_name: Some("us-east-1".to_string()),
        secure_access: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_fixture_carries_an_id_primary_key() {
        let t = table("widgets", vec![column("name", TypeClass::Varchar)]);
        assert_eq!(t.columns.len(), 2);
        assert!(t.columns[0].is_primary_key);
        assert_eq!(t.columns[1].name, "name");
    }
}
