//! Component A: type-equivalence resolution between the four supported
//! RDBMS dialects (spec.md §4.A).

pub mod attrs;
pub mod classes;
pub mod error;
pub mod matrices;
pub mod resolver;

pub use classes::{is_lob_column, name_to_type, type_to_name, TypeClass, COLUMN_TYPES, LOBS};
pub use error::TypeResolutionError;
pub use resolver::{resolve_column_type, ColumnAttributes, IdentitySpec, ResolvedType};
