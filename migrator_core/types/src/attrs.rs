//! Attribute gating for the instantiated result type, standing in for the
//! original's `hasattr(result, "...")` checks. SQLAlchemy decides this per
//! instance; here it's a fixed classification of [`TypeClass`] since the
//! resolver never has a live type object to probe.

use crate::classes::TypeClass;
use crate::classes::TypeClass::*;

pub fn supports_length(t: TypeClass) -> bool {
    matches!(
        t,
        Char | NChar
            | Varchar
            | NVarchar
            | Binary
            | VarBinary
            | MsqlChar
            | MsqlNChar
            | MsqlNVarchar
            | MsqlVarchar
            | OrclVarchar2
            | SqlsVarBinary
    )
}

pub fn supports_precision(t: TypeClass) -> bool {
    matches!(
        t,
        Numeric
            | Decimal
            | OrclNumber
            | MsqlDecimal
            | MsqlNumeric
            | Float
            | Double
            | DoublePrecision
            | Real
            | MsqlFloat
            | MsqlDouble
            | MsqlReal
            | OrclFloat
            | OrclBinaryFloat
            | OrclBinaryDouble
            | SqlsReal
            | SqlsDoublePrecision
    )
}

pub fn supports_timezone(t: TypeClass) -> bool {
    matches!(
        t,
        DateTime
            | Timestamp
            | Time
            | OrclTimestamp
            | PgTimestamp
            | PgTime
            | MsqlTimestamp
            | MsqlTime
            | SqlsTimestamp
            | SqlsTime
            | SqlsDatetime2
            | DateTimeOffset
    )
}
