//! Component E: reconciling an already-migrated target against its
//! source, for both plain columns and LOB columns.

pub mod error;
pub mod lobdata;
pub mod plaindata;

pub use error::SyncError;
pub use lobdata::{sync_lob_column, LobSyncCounts};
pub use plaindata::{sync_plaindata, SyncCounts};
