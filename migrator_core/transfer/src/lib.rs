//! Components C and D: moving row data from a source dialect to a target
//! dialect (plain columns), and LOB payloads to either a target dialect's
//! BLOB column or an S3 prefix.

pub mod error;
pub mod lobdata;
pub mod partition;
pub mod sql;
pub mod plaindata;

pub use error::TransferError;
pub use lobdata::{transfer_lob_column_explicit, transfer_lobdata, LobDestination, LobSpec};
pub use partition::{partition, Partition};
pub use plaindata::{transfer_plaindata, IncrementalWindow};
