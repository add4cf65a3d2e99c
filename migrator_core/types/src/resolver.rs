//! Component A: resolves each source column's target type, porting
//! `migrate_column`/`establish_equivalences` from the original resolver.

use crate::attrs::{supports_length, supports_precision, supports_timezone};
use crate::classes::{is_lob_column, TypeClass};
use crate::classes::TypeClass::*;
use crate::matrices::{native_equivalences, REF_EQUIVALENCES};
use common::config::RdbmsKind;
use std::collections::HashMap;

/// An identity (auto-increment) specification, mirroring the subset of
/// SQLAlchemy's `Identity` the resolver actually inspects.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentitySpec {
    pub cache: Option<i64>,
    pub maxvalue: Option<i64>,
}

/// The introspected attributes of one source column, standing in for a
/// reflected SQLAlchemy `Column`. `None` on an attribute means the source
/// type class doesn't carry it, matching the original's `hasattr` gates.
#[derive(Debug, Clone)]
pub struct ColumnAttributes {
    pub table: String,
    pub name: String,
    pub type_class: TypeClass,
    pub nullable: bool,
    pub length: Option<u32>,
    pub precision: Option<u32>,
    pub scale: Option<u32>,
    pub asdecimal: Option<bool>,
    pub timezone: Option<bool>,
    pub is_primary_key: bool,
    pub foreign_key: Option<Box<ColumnAttributes>>,
    pub identity: Option<IdentitySpec>,
}

impl ColumnAttributes {
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.table, self.name)
    }
}

/// The type chosen for the target column, with attributes propagated from
/// the source wherever the resolved class supports them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedType {
    pub type_class: TypeClass,
    pub nullable: bool,
    pub length: Option<u32>,
    pub precision: Option<u32>,
    pub scale: Option<u32>,
    pub asdecimal: Option<bool>,
    pub timezone: Option<bool>,
}

const MAX_INTEGER: i64 = 2_147_483_647;
const MAX_BIGINT: i64 = 9_223_372_036_854_775_807;

/// Resolves `column`'s target type when migrating from `source` to
/// `target`. `overrides` maps `"table.column"` to a forced type class,
/// taking precedence over matrix lookup and foreign-key propagation alike
/// (only attribute propagation still runs on top of an override).
///
/// As in the original, a Postgres identity column with `cache == 0` is
/// rewritten to `cache = 1` in place before anything else runs: Postgres
/// rejects `CACHE 0` at table-creation time, but SQLAlchemy's identity
/// model requires the attribute to be present regardless of target dialect.
pub fn resolve_column_type(
    source: RdbmsKind,
    target: RdbmsKind,
    column: &mut ColumnAttributes,
    overrides: &HashMap<String, TypeClass>,
) -> ResolvedType {
    if target == RdbmsKind::Postgres {
        if let Some(identity) = column.identity.as_mut() {
            if identity.cache == Some(0) {
                identity.cache = Some(1);
            }
        }
    }

    let qualified = column.qualified_name();
    let is_lob = is_lob_column(column.type_class);
    let is_number = matches!(column.type_class, Numeric | OrclNumber | MsqlDecimal | MsqlNumeric);
    let is_number_int = is_number && column.asdecimal == Some(false);

    let mut type_equiv = overrides.get(&qualified).copied();

    if type_equiv.is_none() {
        type_equiv = lookup_native(source, target, column.type_class)
            .or_else(|| lookup_reference(target, column.type_class));

        if let Some(fk) = column.foreign_key.as_deref_mut() {
            let fk_resolved = resolve_column_type(source, target, fk, overrides);
            type_equiv = Some(fk_resolved.type_class);
        }

        if type_equiv.is_none() {
            tracing::warn!(
                column = %qualified,
                source = ?source,
                target = ?target,
                type_class = ?column.type_class,
                "no type equivalence found, using the source type",
            );
            type_equiv = Some(column.type_class);
        }

        if is_number_int {
            fine_tune_integer(column, target, &mut type_equiv);
        }
    }

    let type_class = type_equiv.unwrap_or(column.type_class);

    ResolvedType {
        type_class,
        nullable: if is_lob { true } else { column.nullable },
        length: column.length.filter(|_| supports_length(type_class)),
        precision: column.precision.filter(|_| supports_precision(type_class)),
        scale: column.scale.filter(|_| supports_precision(type_class)),
        asdecimal: column.asdecimal.filter(|_| supports_precision(type_class)),
        timezone: column.timezone.filter(|_| supports_timezone(type_class)),
    }
}

fn lookup_native(source: RdbmsKind, target: RdbmsKind, type_class: TypeClass) -> Option<TypeClass> {
    let slot = source.others_in_order().iter().position(|k| *k == target)?;
    native_equivalences(source)
        .iter()
        .find(|row| row.0 == type_class)
        .and_then(|row| row.1[slot])
}

fn lookup_reference(target: RdbmsKind, type_class: TypeClass) -> Option<TypeClass> {
    let slot = target.ordinal();
    REF_EQUIVALENCES
        .iter()
        .find(|row| row.0 == type_class)
        .and_then(|row| row.1[slot])
}

fn fine_tune_integer(column: &ColumnAttributes, target: RdbmsKind, type_equiv: &mut Option<TypeClass>) {
    if let Some(identity) = column.identity {
        match identity.maxvalue {
            Some(maxvalue) if maxvalue <= MAX_INTEGER => *type_equiv = Some(Integer),
            Some(maxvalue) if maxvalue > MAX_BIGINT => {
                *type_equiv = Some(if target == RdbmsKind::Oracle { OrclNumber } else { BigInt });
            }
            Some(_) => {}
            None => {
                *type_equiv = Some(if column.precision.map_or(true, |p| p > 9) {
                    BigInt
                } else {
                    Integer
                });
            }
        }
    } else if column.is_primary_key && *type_equiv == Some(Numeric) {
        match column.precision {
            None => *type_equiv = Some(BigInt),
            Some(p) if p > 19 => *type_equiv = Some(BigInt),
            Some(p) if p < 10 => *type_equiv = Some(Integer),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column(type_class: TypeClass) -> ColumnAttributes {
        ColumnAttributes {
            table: "accounts".into(),
            name: "balance".into(),
            type_class,
            nullable: true,
            length: None,
            precision: None,
            scale: None,
            asdecimal: None,
            timezone: None,
            is_primary_key: false,
            foreign_key: None,
            identity: None,
        }
    }

    #[test]
    fn resolves_mysql_to_postgres_bigint() {
        let mut col = column(BigInt);
        let resolved = resolve_column_type(
            RdbmsKind::MySql,
            RdbmsKind::Postgres,
            &mut col,
            &HashMap::new(),
        );
        assert_eq!(resolved.type_class, BigInt);
    }

    #[test]
    fn falls_back_to_reference_matrix_when_native_is_sparse() {
        let mut col = column(PgArray);
        let resolved = resolve_column_type(
            RdbmsKind::Postgres,
            RdbmsKind::MySql,
            &mut col,
            &HashMap::new(),
        );
        // PG_EQUIVALENCES has no row for PgArray; REF_EQUIVALENCES has none
        // either, so it falls back to the source type.
        assert_eq!(resolved.type_class, PgArray);
    }

    #[test]
    fn override_map_wins_even_over_foreign_keys() {
        let fk_target = column(BigInt);
        let mut col = ColumnAttributes {
            foreign_key: Some(Box::new(fk_target)),
            ..column(Integer)
        };
        let mut overrides = HashMap::new();
        overrides.insert("accounts.balance".to_string(), Varchar);
        let resolved = resolve_column_type(
            RdbmsKind::MySql,
            RdbmsKind::Postgres,
            &mut col,
            &overrides,
        );
        assert_eq!(resolved.type_class, Varchar);
    }

    #[test]
    fn foreign_key_overrides_matrix_lookup_unconditionally() {
        let fk_target = column(Uuid);
        let mut col = ColumnAttributes {
            foreign_key: Some(Box::new(fk_target)),
            ..column(Integer)
        };
        let resolved = resolve_column_type(
            RdbmsKind::MySql,
            RdbmsKind::Postgres,
            &mut col,
            &HashMap::new(),
        );
        assert_eq!(resolved.type_class, Uuid);
    }

    #[test]
    fn identity_maxvalue_within_integer_range_downgrades_from_bigint() {
        let mut col = ColumnAttributes {
            identity: Some(IdentitySpec {
                cache: Some(1),
                maxvalue: Some(1000),
            }),
            asdecimal: Some(false),
            ..column(Numeric)
        };
        let resolved = resolve_column_type(
            RdbmsKind::MySql,
            RdbmsKind::Postgres,
            &mut col,
            &HashMap::new(),
        );
        assert_eq!(resolved.type_class, Integer);
    }

    #[test]
    fn identity_without_maxvalue_and_low_precision_uses_integer() {
        let mut col = ColumnAttributes {
            identity: Some(IdentitySpec {
                cache: Some(1),
                maxvalue: None,
            }),
            asdecimal: Some(false),
            precision: Some(5),
            ..column(Numeric)
        };
        let resolved = resolve_column_type(
            RdbmsKind::MySql,
            RdbmsKind::Postgres,
            &mut col,
            &HashMap::new(),
        );
        assert_eq!(resolved.type_class, Integer);
    }

    #[test]
    fn pk_numeric_with_high_precision_becomes_bigint() {
        let mut col = ColumnAttributes {
            is_primary_key: true,
            asdecimal: Some(false),
            precision: Some(25),
            ..column(Numeric)
        };
        let resolved = resolve_column_type(
            RdbmsKind::MySql,
            RdbmsKind::Postgres,
            &mut col,
            &HashMap::new(),
        );
        assert_eq!(resolved.type_class, BigInt);
    }

    #[test]
    fn postgres_identity_cache_zero_is_rewritten_to_one() {
        let mut col = ColumnAttributes {
            identity: Some(IdentitySpec {
                cache: Some(0),
                maxvalue: Some(100),
            }),
            ..column(Integer)
        };
        resolve_column_type(RdbmsKind::MySql, RdbmsKind::Postgres, &mut col, &HashMap::new());
        assert_eq!(col.identity.unwrap().cache, Some(1));
    }

    #[test]
    fn lob_columns_are_forced_nullable() {
        let mut col = ColumnAttributes {
            nullable: false,
            ..column(Blob)
        };
        let resolved = resolve_column_type(
            RdbmsKind::MySql,
            RdbmsKind::Postgres,
            &mut col,
            &HashMap::new(),
        );
        assert!(resolved.nullable);
    }
}
