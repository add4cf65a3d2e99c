//! The report assembled at the end of a `/migrate` run (spec.md §4.G:
//! "Assemble a report containing timestamps, versions, source/target
//! descriptors (with passwords removed), step flags, totals, and the
//! per-table descriptor map.").

use catalog::MigratedTable;
use common::config::{RdbmsSpotConfig, S3SpotConfig};
use sessions::{SessionState, Steps};
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct Totals {
    pub plain_count: u64,
    pub lob_count: u64,
    pub sync_deletes: u64,
    pub sync_inserts: u64,
    pub sync_updates: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct MigrationReport {
    pub session_id: String,
    pub started_at: chrono::DateTime<chrono::Utc>,
    pub finished_at: chrono::DateTime<chrono::Utc>,
    pub engine_version: String,
    pub final_state: SessionState,
    pub source: RdbmsSpotConfig,
    pub target: RdbmsSpotConfig,
    pub target_s3: Option<S3SpotConfig>,
    pub steps: Steps,
    pub totals: Totals,
    pub tables: HashMap<String, MigratedTable>,
    pub errors: Vec<String>,
}

impl MigrationReport {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        session_id: String,
        started_at: chrono::DateTime<chrono::Utc>,
        finished_at: chrono::DateTime<chrono::Utc>,
        final_state: SessionState,
        source: &RdbmsSpotConfig,
        target: &RdbmsSpotConfig,
        target_s3: Option<&S3SpotConfig>,
        steps: Steps,
        tables: Vec<MigratedTable>,
        errors: Vec<String>,
    ) -> Self {
        let mut totals = Totals::default();
        for table in &tables {
            totals.plain_count += table.plain_count;
            totals.lob_count += table.lob_count;
            totals.sync_deletes += table.sync_deletes;
            totals.sync_inserts += table.sync_inserts;
            totals.sync_updates += table.sync_updates;
        }

        Self {
            session_id,
            started_at,
            finished_at,
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            final_state,
            source: source.redacted(),
            target: target.redacted(),
            target_s3: target_s3.map(S3SpotConfig::redacted),
            steps,
            totals,
            tables: tables.into_iter().map(|t| (t.name.clone(), t)).collect(),
            errors,
        }
    }
}
