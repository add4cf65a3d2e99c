//! The equivalence matrices that drive component A's resolver. Ported row
//! for row from the original type-equivalence tables, including the native
//! per-dialect matrices' sparseness (PostgreSQL and SQL Server only had a
//! couple of rows filled in, MySQL about ten) — the resolver's fallback to
//! [`REF_EQUIVALENCES`] covers the rest, so completing them further is not
//! required for correctness, only for reducing how often that fallback (or
//! the source-type fallback beneath it) is taken.

use crate::classes::TypeClass;
use crate::classes::TypeClass::*;
use common::config::RdbmsKind;

/// One row of the reference matrix: a source class and its equivalent in
/// each of [`RdbmsKind::ALL`], in that order. `None` means no reasonable
/// equivalent exists in that dialect.
pub struct RefRow(pub TypeClass, pub [Option<TypeClass>; 4]);

/// One row of a native (single source dialect) matrix: a source class and
/// its equivalent in that dialect's [`RdbmsKind::others_in_order`].
pub struct NativeRow(pub TypeClass, pub [Option<TypeClass>; 3]);

pub const REF_EQUIVALENCES: &[RefRow] = &[
    RefRow(BigInt, [Some(MsqlBigInt), Some(OrclNumber), Some(BigInt), Some(BigInt)]),
    RefRow(Binary, [Some(Binary), Some(OrclRaw), Some(PgBytea), Some(Binary)]),
    RefRow(Blob, [Some(MsqlLongBlob), Some(Clob), Some(PgBytea), Some(SqlsVarBinary)]),
    RefRow(Boolean, [Some(Boolean), None, Some(Boolean), None]),
    RefRow(Char, [Some(MsqlChar), Some(Char), Some(Char), Some(Char)]),
    RefRow(Clob, [Some(MsqlText), Some(Clob), Some(Text), None]),
    RefRow(Date, [Some(Date), Some(OrclDate), Some(Date), Some(Date)]),
    RefRow(DateTime, [Some(DateTime), Some(OrclDate), Some(PgTimestamp), Some(DateTime)]),
    RefRow(Decimal, [Some(MsqlDecimal), Some(OrclNumber), Some(Numeric), Some(Numeric)]),
    RefRow(Double, [Some(MsqlDouble), Some(OrclBinaryDouble), Some(DoublePrecision), Some(Float)]),
    RefRow(DoublePrecision, [Some(MsqlDouble), Some(OrclBinaryDouble), Some(DoublePrecision), Some(Float)]),
    RefRow(Float, [Some(MsqlFloat), Some(OrclFloat), Some(Float), Some(Float)]),
    RefRow(Integer, [Some(MsqlInteger), Some(OrclNumber), Some(Integer), Some(Integer)]),
    RefRow(Json, [Some(MsqlJson), None, Some(PgJson), Some(SqlsJson)]),
    RefRow(NChar, [Some(MsqlNChar), Some(NChar), Some(Char), Some(NChar)]),
    RefRow(Numeric, [Some(MsqlDecimal), Some(OrclNumber), Some(Numeric), Some(Numeric)]),
    RefRow(NVarchar, [Some(MsqlNVarchar), Some(NVarchar), Some(Varchar), Some(NVarchar)]),
    RefRow(Real, [Some(MsqlFloat), Some(OrclFloat), Some(Real), Some(SqlsReal)]),
    RefRow(SmallInt, [Some(MsqlSmallInt), Some(OrclNumber), Some(SmallInt), Some(SmallInt)]),
    RefRow(Text, [Some(MsqlText), Some(OrclVarchar2), Some(Text), Some(Text)]),
    RefRow(Time, [Some(MsqlTime), Some(OrclTimestamp), Some(PgTime), Some(SqlsTime)]),
    RefRow(Timestamp, [Some(MsqlTimestamp), Some(OrclTimestamp), Some(PgTimestamp), Some(DateTime)]),
    RefRow(Uuid, [Some(MsqlVarchar), Some(OrclVarchar2), Some(Uuid), Some(SqlsUniqueIdentifier)]),
    RefRow(VarBinary, [Some(VarBinary), Some(Blob), Some(PgBytea), Some(SqlsVarBinary)]),
    RefRow(Varchar, [Some(MsqlVarchar), Some(OrclVarchar2), Some(Varchar), Some(Varchar)]),
    // Generic equivalents of several rows above, kept distinct so a column
    // reflected through the generic reference class (rather than the
    // SQL-standard one) still resolves the same way.
    RefRow(Interval, [None, Some(OrclInterval), Some(PgInterval), None]),
    RefRow(Enum, [Some(MsqlEnum), None, Some(PgEnum), None]),
];

// MySQL - Oracle - PostgreSQL - SQLServer (TO BE COMPLETED, mirrors the
// original's deliberate sparseness; unlisted classes fall back to the
// reference matrix above).
pub const MSQL_EQUIVALENCES: &[NativeRow] = &[
    NativeRow(MsqlChar, [Some(Char), Some(Char), Some(Char)]),
    NativeRow(MsqlNumeric, [Some(OrclNumber), Some(Numeric), Some(Numeric)]),
    NativeRow(MsqlNVarchar, [Some(NVarchar), Some(Varchar), Some(NVarchar)]),
    NativeRow(MsqlFloat, [Some(OrclFloat), Some(Float), Some(Float)]),
    NativeRow(MsqlLongText, [Some(OrclLong), Some(Text), Some(Text)]),
    NativeRow(MsqlLongBlob, [Some(Blob), Some(PgBytea), Some(SqlsVarBinary)]),
    NativeRow(MsqlMediumBlob, [Some(Blob), Some(PgBytea), Some(SqlsVarBinary)]),
    NativeRow(MsqlText, [Some(Clob), Some(Text), Some(SqlsVarBinary)]),
    NativeRow(MsqlTimestamp, [Some(OrclTimestamp), Some(PgTimestamp), Some(SqlsTimestamp)]),
    NativeRow(MsqlVarchar, [Some(OrclVarchar2), Some(Varchar), Some(Varchar)]),
];

// Oracle - MySQL - PostgreSQL - SQLServer.
pub const ORCL_EQUIVALENCES: &[NativeRow] = &[
    NativeRow(OrclBfile, [Some(MsqlLongBlob), Some(PgBytea), Some(SqlsVarBinary)]),
    NativeRow(OrclBinaryDouble, [Some(MsqlDouble), Some(DoublePrecision), Some(Float)]),
    NativeRow(OrclBinaryFloat, [Some(MsqlFloat), Some(Real), Some(Float)]),
    NativeRow(OrclDate, [Some(DateTime), Some(PgTimestamp), Some(DateTime)]),
    NativeRow(OrclFloat, [Some(MsqlDouble), Some(DoublePrecision), Some(Float)]),
    NativeRow(OrclInterval, [None, Some(PgInterval), None]),
    NativeRow(OrclLong, [Some(MsqlLongText), Some(Text), Some(Text)]),
    NativeRow(OrclNclob, [Some(MsqlLongText), Some(Text), Some(SqlsNText)]),
    NativeRow(OrclNumber, [Some(MsqlNumeric), Some(Numeric), Some(Numeric)]),
    NativeRow(OrclRaw, [Some(VarBinary), Some(PgBytea), Some(SqlsVarBinary)]),
    NativeRow(OrclRowid, [Some(MsqlVarchar), Some(Varchar), Some(Varchar)]),
    NativeRow(OrclTimestamp, [Some(DateTime), Some(PgTimestamp), Some(DateTime)]),
    NativeRow(OrclVarchar2, [Some(MsqlVarchar), Some(Varchar), Some(Varchar)]),
    // SQLAlchemy reports Oracle's NUMBER(38,0) as the generic Integer class.
    NativeRow(Integer, [Some(BigInt), Some(BigInt), Some(MsqlBigInt)]),
];

// PostgreSQL - MySQL - Oracle - SQLServer (TO BE COMPLETED).
pub const PG_EQUIVALENCES: &[NativeRow] = &[
    NativeRow(PgBytea, [Some(MsqlLongBlob), Some(Blob), Some(SqlsVarBinary)]),
    NativeRow(PgTimestamp, [Some(MsqlTimestamp), Some(OrclTimestamp), Some(SqlsTimestamp)]),
];

// SQLServer - MySQL - Oracle - PostgreSQL (TO BE COMPLETED).
pub const SQLS_EQUIVALENCES: &[NativeRow] = &[
    NativeRow(DateTime, [Some(DateTime), Some(OrclDate), Some(PgTimestamp)]),
    NativeRow(SqlsTimestamp, [Some(MsqlTimestamp), Some(OrclTimestamp), Some(PgTimestamp)]),
    NativeRow(SqlsVarBinary, [Some(MsqlLongBlob), Some(Blob), Some(PgBytea)]),
];

pub fn native_equivalences(source: RdbmsKind) -> &'static [NativeRow] {
    match source {
        RdbmsKind::MySql => MSQL_EQUIVALENCES,
        RdbmsKind::Oracle => ORCL_EQUIVALENCES,
        RdbmsKind::Postgres => PG_EQUIVALENCES,
        RdbmsKind::SqlServer => SQLS_EQUIVALENCES,
    }
}
