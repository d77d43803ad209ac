use quarry_core::{stmt, Error, Result};
use rusqlite::types::{ToSql, ToSqlOutput, Value as SqlValue, ValueRef};

/// Binds a core value as a SQLite parameter.
///
/// SQLite has no native date, uuid, or decimal storage; those travel as
/// text in the same formats the type registry reads back.
#[derive(Debug)]
pub(crate) struct Value<'a>(pub(crate) &'a stmt::Value);

/// Converts a SQLite column value to a core value by storage class.
///
/// Declared column types are not consulted; read conversion happens
/// against the inferred schema.
pub(crate) fn from_sql(value: ValueRef<'_>) -> Result<stmt::Value> {
    Ok(match value {
        ValueRef::Null => stmt::Value::Null,
        ValueRef::Integer(v) => stmt::Value::I64(v),
        ValueRef::Real(v) => stmt::Value::F64(v),
        ValueRef::Text(v) => stmt::Value::String(
            std::str::from_utf8(v)
                .map_err(Error::driver_operation_failed)?
                .to_string(),
        ),
        ValueRef::Blob(v) => stmt::Value::Bytes(v.to_vec()),
    })
}

impl ToSql for Value<'_> {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        use stmt::Value;

        match self.0 {
            Value::Null => Ok(ToSqlOutput::Owned(SqlValue::Null)),
            Value::Bool(v) => Ok(ToSqlOutput::Owned(SqlValue::Integer(i64::from(*v)))),
            Value::I32(v) => Ok(ToSqlOutput::Owned(SqlValue::Integer(i64::from(*v)))),
            Value::I64(v) => Ok(ToSqlOutput::Owned(SqlValue::Integer(*v))),
            Value::F64(v) => Ok(ToSqlOutput::Owned(SqlValue::Real(*v))),
            Value::String(v) => Ok(ToSqlOutput::Borrowed(ValueRef::Text(v.as_bytes()))),
            Value::Bytes(v) => Ok(ToSqlOutput::Borrowed(ValueRef::Blob(&v[..]))),
            Value::Decimal(v) => text(v.to_string()),
            Value::Uuid(v) => text(v.to_string()),
            Value::Date(v) => text(v.to_string()),
            Value::Time(v) => text(v.to_string()),
            Value::Timestamp(v) => text(v.format("%Y-%m-%d %H:%M:%S%.f").to_string()),
            Value::TimestampTz(v) => text(v.to_rfc3339()),
            Value::Json(v) => text(v.to_string()),
            value @ (Value::List(_) | Value::Record(_)) => text(value.to_json().to_string()),
        }
    }
}

fn text(value: String) -> rusqlite::Result<ToSqlOutput<'static>> {
    Ok(ToSqlOutput::Owned(SqlValue::Text(value)))
}
