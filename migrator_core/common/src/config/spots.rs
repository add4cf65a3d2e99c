use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The four source/target dialects spec.md §1 enumerates. Ordinal position
/// matters: the type-equivalence resolver (component A) indexes its
/// per-dialect matrix columns by this same order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RdbmsKind {
    MySql,
    Oracle,
    Postgres,
    SqlServer,
}

impl RdbmsKind {
    pub const ALL: [RdbmsKind; 4] = [
        RdbmsKind::MySql,
        RdbmsKind::Oracle,
        RdbmsKind::Postgres,
        RdbmsKind::SqlServer,
    ];

    /// The type-name prefix used in override-columns and column descriptors
    /// (spec.md §6: `msql_`, `orcl_`, `pg_`, `sqls_`).
    pub fn type_prefix(self) -> &'static str {
        match self {
            RdbmsKind::MySql => "msql",
            RdbmsKind::Oracle => "orcl",
            RdbmsKind::Postgres => "pg",
            RdbmsKind::SqlServer => "sqls",
        }
    }

    /// Index of this dialect within [`RdbmsKind::ALL`]. The reference
    /// equivalence matrix (component A) is indexed column-for-column by
    /// this ordinal.
    pub fn ordinal(self) -> usize {
        RdbmsKind::ALL.iter().position(|k| *k == self).unwrap()
    }

    /// The other three dialects, in their `ALL` order. Every per-dialect
    /// native equivalence matrix lists its target columns in this same
    /// order (e.g. the MySQL matrix's columns are Oracle, Postgres,
    /// SqlServer, in that order, because that's `ALL` with MySql removed).
    pub fn others_in_order(self) -> [RdbmsKind; 3] {
        let mut out = [RdbmsKind::MySql; 3];
        let mut i = 0;
        for candidate in RdbmsKind::ALL {
            if candidate != self {
                out[i] = candidate;
                i += 1;
            }
        }
        out
    }

    pub fn parse(value: &str) -> Result<Self, ConfigError> {
        match value.to_ascii_lowercase().as_str() {
            "mysql" | "msql" => Ok(RdbmsKind::MySql),
            "oracle" | "orcl" => Ok(RdbmsKind::Oracle),
            "postgres" | "postgresql" | "pg" => Ok(RdbmsKind::Postgres),
            "sqlserver" | "sqls" | "mssql" => Ok(RdbmsKind::SqlServer),
            other => Err(ConfigError::invalid_enum(format!(
                "unknown RDBMS engine '{other}'"
            ))),
        }
    }
}

/// Connection details for one RDBMS spot, mirroring
/// `AdapterConnectionDetails` in the teacher's connection config, extended
/// to the four dialects this engine actually migrates between.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RdbmsSpotConfig {
    pub engine: RdbmsKind,
    pub name: String,
    pub host: String,
    pub port: u16,
    pub user: String,
    #[serde(skip_serializing)]
    pub pwd: String,
    pub client: Option<String>,
    pub driver: Option<String>,
}

impl RdbmsSpotConfig {
    /// A copy with the password stripped, suitable for embedding in an API
    /// response or a migration report (spec.md §4.G: "passwords removed").
    pub fn redacted(&self) -> RdbmsSpotConfig {
        RdbmsSpotConfig {
            pwd: String::new(),
            ..self.clone()
        }
    }
}

/// Connection details for an S3-compatible spot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct S3SpotConfig {
    pub engine: String,
    pub endpoint_url: String,
    pub bucket_name: String,
    pub access_key: String,
    #[serde(skip_serializing)]
    pub secret_key: String,
    pub region_name: Option<String>,
    pub secure_access: bool,
}

impl S3SpotConfig {
    pub fn redacted(&self) -> S3SpotConfig {
        S3SpotConfig {
            secret_key: String::new(),
            ..self.clone()
        }
    }
}

/// Process-wide table of configured RDBMS and S3 spots, keyed by engine
/// name. A session (component F) only stores which spot names it uses;
/// this registry is how those names resolve to connection details.
#[derive(Debug, Default)]
pub struct SpotsConfig {
    pub rdbms: HashMap<String, RdbmsSpotConfig>,
    pub s3: HashMap<String, S3SpotConfig>,
}

impl SpotsConfig {
    pub fn get_rdbms(&self, engine: &str) -> Result<&RdbmsSpotConfig, ConfigError> {
        self.rdbms
            .get(engine)
            .ok_or_else(|| ConfigError::not_found(format!("RDBMS engine '{engine}' unconfigured")))
    }

    pub fn get_s3(&self, engine: &str) -> Result<&S3SpotConfig, ConfigError> {
        self.s3
            .get(engine)
            .ok_or_else(|| ConfigError::not_found(format!("S3 engine '{engine}' unconfigured")))
    }

    pub fn set_rdbms(&mut self, engine: impl Into<String>, config: RdbmsSpotConfig) {
        self.rdbms.insert(engine.into(), config);
    }

    pub fn set_s3(&mut self, engine: impl Into<String>, config: S3SpotConfig) {
        self.s3.insert(engine.into(), config);
    }
}
