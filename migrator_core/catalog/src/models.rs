use types::{IdentitySpec, TypeClass};

/// A foreign key reference as reflected from the source schema.
#[derive(Debug, Clone)]
pub struct ForeignKeyRef {
    pub table: String,
    pub column: String,
}

/// One column as reflected from the source schema, carrying exactly the
/// attributes component A's resolver needs.
#[derive(Debug, Clone)]
pub struct ReflectedColumn {
    pub name: String,
    pub type_class: TypeClass,
    pub nullable: bool,
    pub length: Option<u32>,
    pub precision: Option<u32>,
    pub scale: Option<u32>,
    pub asdecimal: Option<bool>,
    pub timezone: Option<bool>,
    pub is_primary_key: bool,
    pub is_unique: bool,
    pub identity: Option<IdentitySpec>,
    pub foreign_key: Option<ForeignKeyRef>,
}

/// One table as reflected from the source schema.
#[derive(Debug, Clone)]
pub struct ReflectedTable {
    pub name: String,
    pub columns: Vec<ReflectedColumn>,
}

/// The outcome of reflecting a schema. `warning` mirrors SQLAlchemy's
/// `SAWarning` on incomplete reflection: when set, the migration must be
/// aborted, since downstream steps would otherwise operate on a partial
/// tree.
#[derive(Debug, Clone, Default)]
pub struct ReflectedSchema {
    pub tables: Vec<ReflectedTable>,
    pub warning: Option<String>,
}

/// The non-identity, non-primary-key flags copied onto a migrated column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct ColumnFeatures {
    pub identity: bool,
    pub primary_key: bool,
    pub unique: bool,
    pub nullable: bool,
}

/// The running transfer state of a table's plaindata or LOB data, carried
/// forward by component C/D/E/G as they process a migration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum TransferStatus {
    None,
    Full,
    Partial,
    Skipped,
    Error,
}

/// One column on the target side: its source and resolved type, plus the
/// features the migration preserved. `type_class` is the *target* side's
/// resolved class, which is what component C/D/E use to tell a LOB column
/// from a plain one (`types::is_lob_column`) when building the transfer
/// column lists.
#[derive(Debug, Clone, serde::Serialize)]
pub struct MigratedColumn {
    pub name: String,
    pub source_type: String,
    pub target_type: String,
    pub type_class: TypeClass,
    pub features: ColumnFeatures,
}

/// A fully migrated table descriptor: the return unit of component B,
/// updated in place by C/D/E as transfer and sync progress.
#[derive(Debug, Clone, serde::Serialize)]
pub struct MigratedTable {
    pub name: String,
    pub columns: Vec<MigratedColumn>,
    pub plain_count: u64,
    pub plain_status: TransferStatus,
    pub lob_count: u64,
    pub lob_status: TransferStatus,
    pub sync_deletes: u64,
    pub sync_inserts: u64,
    pub sync_updates: u64,
    pub no_primary_key_warning: bool,
}

impl MigratedTable {
    pub fn primary_key_columns(&self) -> impl Iterator<Item = &MigratedColumn> {
        self.columns.iter().filter(|c| c.features.primary_key)
    }
}
