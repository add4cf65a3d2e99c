//! A real, disposable Postgres container for adapter integration tests,
//! grounded directly on the teacher's `setup_postgres`/`PgTestContainer` in
//! `crates/test_utils` (SPEC_FULL.md §0.4, §8's `testcontainers`-backed
//! `#[ignore]`d suites).

use testcontainers::core::{IntoContainerPort, WaitFor};
use testcontainers::runners::AsyncRunner;
use testcontainers::{ContainerAsync, GenericImage, ImageExt};
use uuid::Uuid;

use crate::fixtures::rdbms_spot;
use common::config::{RdbmsKind, RdbmsSpotConfig};

const PG_DB: &str = "postgres";
const PG_USER: &str = "postgres";
const PG_PASSWORD: &str = "postgres";

pub struct PgTestContainer {
    pub container: ContainerAsync<GenericImage>,
    pub port: u16,
}

impl PgTestContainer {
    /// The spot config for this container, as consumed by
    /// `clients::PostgresAdapter::connect`.
    pub fn spot(&self) -> RdbmsSpotConfig {
        let mut spot = rdbms_spot(RdbmsKind::Postgres, "127.0.0.1", self.port);
        spot.name = PG_DB.to_string();
        spot.user = PG_USER.to_string();
        spot.pwd = PG_PASSWORD.to_string();
        spot
    }
}

/// Starts a disposable `postgres:16` container and returns its connection
/// spot. Requires Docker; callers gate on `#[ignore]` (SPEC_FULL.md §8).
pub async fn setup_postgres() -> Result<PgTestContainer, Box<dyn std::error::Error>> {
    let name = format!("migrator-test-postgres-{}", Uuid::new_v4());
    let container = GenericImage::new("postgres", "16")
        .with_wait_for(WaitFor::message_on_stdout("database system is ready to accept connections"))
        .with_container_name(&name)
        .with_env_var("POSTGRES_DB", PG_DB)
        .with_env_var("POSTGRES_USER", PG_USER)
        .with_env_var("POSTGRES_PASSWORD", PG_PASSWORD)
        .with_mapped_port(0, 5432u16.tcp())
        .start()
        .await?;

    let port = container.get_host_port_ipv4(5432).await?;
    Ok(PgTestContainer { container, port })
}
