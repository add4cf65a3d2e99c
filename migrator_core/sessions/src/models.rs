//! Session data model (spec.md §3 "Session" / "Specs").

use common::cancel::CancelFlag;
use common::config::{Metrics, RdbmsKind, RdbmsSpotConfig, S3SpotConfig};
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum SessionState {
    Active,
    Inactive,
    Migrating,
    Aborting,
    Aborted,
    Finished,
}

impl SessionState {
    pub fn is_terminal(self) -> bool {
        matches!(self, SessionState::Aborted | SessionState::Finished)
    }
}

/// The four migration step flags a session carries (spec.md §3).
#[derive(Debug, Clone, Copy, Default, serde::Serialize)]
pub struct Steps {
    pub migrate_metadata: bool,
    pub migrate_plaindata: bool,
    pub migrate_lobdata: bool,
    pub synchronize_plaindata: bool,
}

/// Mutually-exclusive relation include/exclude filter (spec.md §3:
/// "include_relations / exclude_relations (mutually exclusive)").
#[derive(Debug, Clone)]
pub enum RelationFilter {
    None,
    Include(Vec<String>),
    Exclude(Vec<String>),
}

impl Default for RelationFilter {
    fn default() -> Self {
        RelationFilter::None
    }
}

/// One table's incremental migration window: a row count and an offset to
/// resume from (spec.md §3 `incremental_migrations`).
#[derive(Debug, Clone, Copy)]
pub struct IncrementalWindow {
    pub count: i64,
    pub offset: i64,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SpecFlags {
    pub flatten_storage: bool,
    pub reflect_filetype: bool,
    pub relax_reflection: bool,
    pub skip_nonempty: bool,
    pub process_indexes: bool,
    pub process_views: bool,
}

/// Immutable-after-start migration configuration (spec.md §3 "Specs").
#[derive(Debug, Clone, Default)]
pub struct Specs {
    pub from_schema: String,
    pub to_schema: String,
    pub relations: RelationFilter,
    pub exclude_columns: Vec<String>,
    pub exclude_constraints: Vec<String>,
    pub override_columns: HashMap<String, String>,
    pub incremental_migrations: HashMap<String, IncrementalWindow>,
    pub named_lobdata: HashMap<String, String>,
    pub remove_nulls: HashSet<String>,
    pub flags: SpecFlags,
    pub migration_badge: String,
}

/// A single migration session (spec.md §3 "Session").
#[derive(Debug, Clone)]
pub struct Session {
    pub session_id: String,
    pub client_id: String,
    pub state: SessionState,
    pub source: Option<RdbmsKind>,
    pub target: Option<RdbmsKind>,
    pub target_s3: bool,
    pub steps: Steps,
    pub metrics: Metrics,
    pub specs: Specs,
    pub connections: HashMap<RdbmsKind, RdbmsSpotConfig>,
    pub s3: Option<S3SpotConfig>,
    /// Outstanding worker task identifiers for the current run, bookkeeping
    /// only (spec.md §3 supplement, no scheduling semantics).
    pub migration_threads: Vec<String>,
    pub cancel: CancelFlag,
    pub errors: Vec<String>,
}

impl Session {
    pub fn new(client_id: impl Into<String>, session_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            client_id: client_id.into(),
            state: SessionState::Active,
            source: None,
            target: None,
            target_s3: false,
            steps: Steps::default(),
            metrics: Metrics::default(),
            specs: Specs::default(),
            connections: HashMap::new(),
            s3: None,
            migration_threads: Vec::new(),
            cancel: CancelFlag::new(),
            errors: Vec::new(),
        }
    }
}
