use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use postgres::{
    types::{private::BytesMut, to_sql_checked, FromSql, IsNull, Kind, ToSql, Type},
    Row,
};
use quarry_core::{stmt, Error, Result};
use rust_decimal::Decimal;
use uuid::Uuid;

type BoxError = Box<dyn std::error::Error + Sync + Send>;

/// Binds a core value as a PostgreSQL parameter.
///
/// The server reports the type each placeholder was inferred as; values
/// adapt to it where the conversion is lossless, so an `I64` can fill an
/// `int4` column and a decimal can fill a `float8` one.
#[derive(Debug)]
pub(crate) struct Value<'a>(pub(crate) &'a stmt::Value);

impl ToSql for Value<'_> {
    fn to_sql(&self, ty: &Type, out: &mut BytesMut) -> std::result::Result<IsNull, BoxError>
    where
        Self: Sized,
    {
        match self.0 {
            stmt::Value::Null => Ok(IsNull::Yes),
            stmt::Value::Bool(value) => value.to_sql(ty, out),
            stmt::Value::I32(value) => integer(i64::from(*value), ty, out),
            stmt::Value::I64(value) => integer(*value, ty, out),
            stmt::Value::F64(value) => match *ty {
                Type::FLOAT4 => (*value as f32).to_sql(ty, out),
                Type::NUMERIC => Decimal::try_from(*value)?.to_sql(ty, out),
                _ => value.to_sql(ty, out),
            },
            stmt::Value::Decimal(value) => match *ty {
                Type::FLOAT8 => f64::try_from(*value)?.to_sql(ty, out),
                Type::TEXT | Type::VARCHAR => value.to_string().to_sql(ty, out),
                _ => value.to_sql(ty, out),
            },
            // Text also carries enum labels and other types whose binary
            // form is their text
            stmt::Value::String(value) => value.as_str().to_sql(ty, out),
            stmt::Value::Bytes(value) => value.as_slice().to_sql(ty, out),
            stmt::Value::Uuid(value) => match *ty {
                Type::TEXT | Type::VARCHAR => value.to_string().to_sql(ty, out),
                _ => value.to_sql(ty, out),
            },
            stmt::Value::Date(value) => value.to_sql(ty, out),
            stmt::Value::Time(value) => value.to_sql(ty, out),
            stmt::Value::Timestamp(value) => value.to_sql(ty, out),
            stmt::Value::TimestampTz(value) => value.to_sql(ty, out),
            stmt::Value::Json(value) => match *ty {
                Type::TEXT | Type::VARCHAR => value.to_string().to_sql(ty, out),
                _ => value.to_sql(ty, out),
            },
            stmt::Value::List(items) => match ty.kind() {
                Kind::Array(_) => items.iter().map(Value).collect::<Vec<_>>().to_sql(ty, out),
                _ if matches!(*ty, Type::JSON | Type::JSONB) => {
                    self.0.to_json().to_sql(ty, out)
                }
                _ => Err(format!("cannot bind a list as `{ty}`").into()),
            },
            stmt::Value::Record(_) => match *ty {
                Type::JSON | Type::JSONB => self.0.to_json().to_sql(ty, out),
                _ => Err(format!("cannot bind a record as `{ty}`").into()),
            },
        }
    }

    fn accepts(_: &Type) -> bool {
        true
    }

    to_sql_checked!();
}

fn integer(value: i64, ty: &Type, out: &mut BytesMut) -> std::result::Result<IsNull, BoxError> {
    match *ty {
        Type::INT2 => i16::try_from(value)?.to_sql(ty, out),
        Type::INT4 => i32::try_from(value)?.to_sql(ty, out),
        Type::OID => u32::try_from(value)?.to_sql(ty, out),
        Type::FLOAT4 => (value as f32).to_sql(ty, out),
        Type::FLOAT8 => (value as f64).to_sql(ty, out),
        Type::NUMERIC => Decimal::from(value).to_sql(ty, out),
        Type::TEXT | Type::VARCHAR => value.to_string().to_sql(ty, out),
        _ => value.to_sql(ty, out),
    }
}

/// Undecoded column bytes, for types the driver has no mapping for.
struct Raw(Vec<u8>);

impl<'a> FromSql<'a> for Raw {
    fn from_sql(_: &Type, raw: &'a [u8]) -> std::result::Result<Self, BoxError> {
        Ok(Raw(raw.to_vec()))
    }

    fn accepts(_: &Type) -> bool {
        true
    }
}

impl Raw {
    /// Enum labels, and many extension types, are sent as their text.
    fn into_value(self) -> stmt::Value {
        match String::from_utf8(self.0) {
            Ok(text) => stmt::Value::String(text),
            Err(err) => stmt::Value::Bytes(err.into_bytes()),
        }
    }
}

/// Converts the value at `index` of a PostgreSQL row to a core value.
pub(crate) fn from_row(row: &Row, index: usize) -> Result<stmt::Value> {
    let ty = row.columns()[index].type_();

    let value = match ty.kind() {
        Kind::Array(member) => array(row, index, member)?,
        _ => scalar(row, index, ty)?,
    };

    Ok(value.unwrap_or(stmt::Value::Null))
}

fn scalar(row: &Row, index: usize, ty: &Type) -> Result<Option<stmt::Value>> {
    // NOTE: the inner representation of the type enum is not accessible,
    // so each type is matched by its constant.
    Ok(match *ty {
        Type::BOOL => get::<bool>(row, index)?.map(stmt::Value::Bool),
        Type::INT2 => get::<i16>(row, index)?.map(|v| stmt::Value::I32(v.into())),
        Type::INT4 => get::<i32>(row, index)?.map(stmt::Value::I32),
        Type::INT8 => get::<i64>(row, index)?.map(stmt::Value::I64),
        Type::OID => get::<u32>(row, index)?.map(|v| stmt::Value::I64(v.into())),
        Type::FLOAT4 => get::<f32>(row, index)?.map(|v| stmt::Value::F64(v.into())),
        Type::FLOAT8 => get::<f64>(row, index)?.map(stmt::Value::F64),
        Type::NUMERIC => get::<Decimal>(row, index)?.map(stmt::Value::Decimal),
        Type::TEXT | Type::VARCHAR | Type::BPCHAR | Type::NAME | Type::UNKNOWN => {
            get::<String>(row, index)?.map(stmt::Value::String)
        }
        Type::BYTEA => get::<Vec<u8>>(row, index)?.map(stmt::Value::Bytes),
        Type::UUID => get::<Uuid>(row, index)?.map(stmt::Value::Uuid),
        Type::DATE => get::<NaiveDate>(row, index)?.map(stmt::Value::Date),
        Type::TIME => get::<NaiveTime>(row, index)?.map(stmt::Value::Time),
        Type::TIMESTAMP => get::<NaiveDateTime>(row, index)?.map(stmt::Value::Timestamp),
        Type::TIMESTAMPTZ => get::<DateTime<Utc>>(row, index)?.map(stmt::Value::TimestampTz),
        Type::JSON | Type::JSONB => get::<serde_json::Value>(row, index)?.map(stmt::Value::Json),
        _ => get::<Raw>(row, index)?.map(Raw::into_value),
    })
}

fn array(row: &Row, index: usize, member: &Type) -> Result<Option<stmt::Value>> {
    match *member {
        Type::BOOL => list(row, index, stmt::Value::Bool),
        Type::INT2 => list(row, index, |v: i16| stmt::Value::I32(v.into())),
        Type::INT4 => list(row, index, stmt::Value::I32),
        Type::INT8 => list(row, index, stmt::Value::I64),
        Type::FLOAT4 => list(row, index, |v: f32| stmt::Value::F64(v.into())),
        Type::FLOAT8 => list(row, index, stmt::Value::F64),
        Type::NUMERIC => list(row, index, stmt::Value::Decimal),
        Type::TEXT | Type::VARCHAR | Type::BPCHAR | Type::NAME => {
            list(row, index, stmt::Value::String)
        }
        Type::UUID => list(row, index, stmt::Value::Uuid),
        Type::DATE => list(row, index, stmt::Value::Date),
        Type::TIMESTAMP => list(row, index, stmt::Value::Timestamp),
        Type::TIMESTAMPTZ => list(row, index, stmt::Value::TimestampTz),
        Type::JSON | Type::JSONB => list(row, index, stmt::Value::Json),
        _ => list(row, index, Raw::into_value),
    }
}

fn list<'a, T: FromSql<'a>>(
    row: &'a Row,
    index: usize,
    f: impl Fn(T) -> stmt::Value,
) -> Result<Option<stmt::Value>> {
    Ok(get::<Vec<Option<T>>>(row, index)?.map(|items| {
        stmt::Value::List(
            items
                .into_iter()
                .map(|item| item.map_or(stmt::Value::Null, &f))
                .collect(),
        )
    }))
}

fn get<'a, T: FromSql<'a>>(row: &'a Row, index: usize) -> Result<Option<T>> {
    row.try_get::<usize, Option<T>>(index)
        .map_err(Error::driver_operation_failed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bind(value: stmt::Value, ty: &Type) -> std::result::Result<Vec<u8>, BoxError> {
        let mut out = BytesMut::new();
        Value(&value).to_sql(ty, &mut out)?;
        Ok(out.to_vec())
    }

    #[test]
    fn integers_adapt_to_the_column_type() {
        assert_eq!(bind(stmt::Value::I64(7), &Type::INT4).unwrap(), 7i32.to_be_bytes());
        assert_eq!(bind(stmt::Value::I32(7), &Type::INT8).unwrap(), 7i64.to_be_bytes());
        assert_eq!(bind(stmt::Value::I64(7), &Type::INT2).unwrap(), 7i16.to_be_bytes());
        assert!(bind(stmt::Value::I64(i64::MAX), &Type::INT4).is_err());
    }

    #[test]
    fn text_binds_as_its_bytes() {
        assert_eq!(bind(stmt::Value::from("active"), &Type::TEXT).unwrap(), b"active");
        assert!(bind(stmt::Value::Null, &Type::TEXT).unwrap().is_empty());
    }

    #[test]
    fn lists_need_an_array_type() {
        let list = stmt::Value::List(vec![stmt::Value::I64(1)]);
        assert!(bind(list.clone(), &Type::INT8_ARRAY).is_ok());
        assert!(bind(list.clone(), &Type::JSONB).is_ok());
        assert!(bind(list, &Type::INT8).is_err());
    }

    #[test]
    fn raw_bytes_decode_as_text_when_possible() {
        assert_eq!(Raw(b"happy".to_vec()).into_value(), stmt::Value::from("happy"));
        assert_eq!(Raw(vec![0xff]).into_value(), stmt::Value::Bytes(vec![0xff]));
    }
}
