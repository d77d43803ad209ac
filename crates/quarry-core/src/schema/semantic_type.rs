use crate::{
    driver::Dialect,
    stmt::{Type, Value},
    Error, Result,
};

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use rust_decimal::Decimal;
use std::str::FromStr;

/// The resolved meaning of a native column type.
///
/// Carries the language-level kind plus the length and precision metadata
/// parsed from the native type, and converts values between their native
/// and language-level representations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SemanticType {
    /// The native type string as the database reported it.
    pub native: String,

    pub ty: Type,

    pub meta: TypeMeta,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TypeMeta {
    /// `varchar(n)`, `char(n)`
    pub max_length: Option<u32>,

    /// `numeric(p, s)`, `timestamp(p)`
    pub precision: Option<u32>,

    /// `numeric(p, s)`
    pub scale: Option<u32>,
}

impl SemanticType {
    pub fn new(native: impl Into<String>, ty: Type) -> Self {
        Self {
            native: native.into(),
            ty,
            meta: TypeMeta::default(),
        }
    }

    /// An opaque type for a native type nothing is known about. Values pass
    /// through both transforms untouched.
    pub fn raw(native: impl Into<String>) -> Self {
        let native = native.into();
        Self::new(native.clone(), Type::Custom(native))
    }

    pub fn with_meta(self, meta: TypeMeta) -> Self {
        Self { meta, ..self }
    }

    pub fn is_raw(&self) -> bool {
        matches!(&self.ty, Type::Custom(name) if *name == self.native)
    }

    /// Converts a value as returned by a gateway into its language-level
    /// representation.
    pub fn read(&self, value: Value, dialect: Dialect) -> Result<Value> {
        read(&self.ty, value, dialect)
    }

    /// Converts a language-level value into the representation the
    /// gateway binds for this column.
    pub fn write(&self, value: Value, dialect: Dialect) -> Result<Value> {
        write(&self.ty, value, dialect)
    }
}

fn read(ty: &Type, value: Value, dialect: Dialect) -> Result<Value> {
    if value.is_null() {
        return Ok(value);
    }

    Ok(match (ty, value) {
        (Type::Bool, Value::I64(v)) => Value::Bool(v != 0),
        (Type::Bool, Value::I32(v)) => Value::Bool(v != 0),
        (Type::Bool, Value::String(v)) => match &v[..] {
            "t" | "true" | "1" => Value::Bool(true),
            "f" | "false" | "0" => Value::Bool(false),
            _ => return Err(Error::type_conversion(Value::String(v), "bool")),
        },
        (Type::I32, Value::I64(v)) => match i32::try_from(v) {
            Ok(v) => Value::I32(v),
            Err(_) => return Err(Error::type_conversion(Value::I64(v), "i32")),
        },
        (Type::I64, Value::I32(v)) => Value::I64(v.into()),
        (Type::I32, Value::String(v)) => parse_text(v, "i32", |s| s.parse().ok().map(Value::I32))?,
        (Type::I64, Value::String(v)) => parse_text(v, "i64", |s| s.parse().ok().map(Value::I64))?,
        (Type::F64, Value::String(v)) => parse_text(v, "f64", |s| s.parse().ok().map(Value::F64))?,
        (Type::F64, Value::I64(v)) => Value::F64(v as f64),
        (Type::F64, Value::I32(v)) => Value::F64(v.into()),
        (Type::F64, Value::Decimal(v)) => match f64::try_from(v) {
            Ok(v) => Value::F64(v),
            Err(_) => return Err(Error::type_conversion(Value::Decimal(v), "f64")),
        },
        (Type::Decimal, Value::String(v)) => match Decimal::from_str(&v) {
            Ok(v) => Value::Decimal(v),
            Err(_) => return Err(Error::type_conversion(Value::String(v), "decimal")),
        },
        (Type::Decimal, Value::I64(v)) => Value::Decimal(v.into()),
        (Type::Decimal, Value::F64(v)) => match Decimal::try_from(v) {
            Ok(v) => Value::Decimal(v),
            Err(_) => return Err(Error::type_conversion(Value::F64(v), "decimal")),
        },
        (Type::Uuid, Value::String(v)) => Value::Uuid(v.parse()?),
        (Type::Uuid, Value::Bytes(v)) => match uuid::Uuid::from_slice(&v) {
            Ok(v) => Value::Uuid(v),
            Err(_) => return Err(Error::type_conversion(Value::Bytes(v), "uuid")),
        },
        (Type::Date, Value::String(v)) => parse_text(v, "date", |s| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d").ok().map(Value::Date)
        })?,
        (Type::Time, Value::String(v)) => parse_text(v, "time", |s| {
            NaiveTime::parse_from_str(s, "%H:%M:%S%.f").ok().map(Value::Time)
        })?,
        (Type::Timestamp, Value::String(v)) => {
            parse_text(v, "timestamp", |s| parse_naive_datetime(s).map(Value::Timestamp))?
        }
        (Type::TimestampTz, Value::String(v)) => parse_text(v, "timestamptz", |s| {
            DateTime::parse_from_rfc3339(s)
                .or_else(|_| DateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f%#z"))
                .map(|v| v.with_timezone(&Utc))
                .ok()
                .or_else(|| parse_naive_datetime(s).map(|v| v.and_utc()))
                .map(Value::TimestampTz)
        })?,
        (Type::TimestampTz, Value::Timestamp(v)) => Value::TimestampTz(v.and_utc()),
        (Type::Json, Value::String(v)) => Value::Json(serde_json::from_str(&v)?),
        (Type::List(item), Value::List(items)) => Value::List(
            items
                .into_iter()
                .map(|v| read(item, v, dialect))
                .collect::<Result<_>>()?,
        ),
        (Type::List(item), Value::String(v)) => {
            let items = if dialect.is_postgresql() {
                parse_array_literal(&v)?
            } else {
                match Value::from_json(serde_json::from_str(&v)?) {
                    Value::List(items) => items,
                    other => return Err(Error::type_conversion(other, ty.to_string())),
                }
            };

            Value::List(
                items
                    .into_iter()
                    .map(|v| read(item, v, dialect))
                    .collect::<Result<_>>()?,
            )
        }
        (Type::List(item), Value::Json(serde_json::Value::Array(items))) => Value::List(
            items
                .into_iter()
                .map(|v| read(item, Value::from_json(v), dialect))
                .collect::<Result<_>>()?,
        ),
        // Text-carried kinds accept whatever the driver decoded
        (Type::String | Type::Enum(_) | Type::Range(_) | Type::Custom(_), value) => value,
        (_, value) => value,
    })
}

fn write(ty: &Type, value: Value, dialect: Dialect) -> Result<Value> {
    if value.is_null() {
        return Ok(value);
    }

    Ok(match (ty, value) {
        (Type::Bool, Value::Bool(v)) if dialect.is_sqlite() => Value::I64(v.into()),
        (Type::I64, Value::I32(v)) => Value::I64(v.into()),
        (Type::I32, Value::I64(v)) => match i32::try_from(v) {
            Ok(v) => Value::I32(v),
            Err(_) => return Err(Error::type_conversion(Value::I64(v), "i32")),
        },
        (Type::F64, Value::I32(v)) => Value::F64(v.into()),
        (Type::F64, Value::I64(v)) => Value::F64(v as f64),
        (Type::Decimal, Value::I64(v)) => Value::Decimal(v.into()),
        (Type::Decimal, Value::Decimal(v)) if dialect.is_sqlite() => Value::String(v.to_string()),
        (Type::Uuid, Value::String(v)) => write(ty, Value::Uuid(v.parse()?), dialect)?,
        (Type::Uuid, Value::Uuid(v)) if !dialect.is_postgresql() => Value::String(v.to_string()),
        (Type::Date, Value::Date(v)) if dialect.is_sqlite() => Value::String(v.to_string()),
        (Type::Time, Value::Time(v)) if dialect.is_sqlite() => Value::String(v.to_string()),
        (Type::Timestamp, Value::Timestamp(v)) if dialect.is_sqlite() => {
            Value::String(v.format("%Y-%m-%d %H:%M:%S%.f").to_string())
        }
        (Type::TimestampTz, Value::TimestampTz(v)) if dialect.is_sqlite() => {
            Value::String(v.to_rfc3339())
        }
        (Type::Json, Value::String(v)) => write(ty, Value::Json(serde_json::from_str(&v)?), dialect)?,
        (Type::Json, value @ (Value::List(_) | Value::Record(_))) => {
            write(ty, Value::Json(value.to_json()), dialect)?
        }
        (Type::Json, Value::Json(v)) if !dialect.is_postgresql() => Value::String(v.to_string()),
        (Type::Enum(labels), Value::String(v)) => {
            if !labels.iter().any(|label| *label == v) {
                return Err(Error::type_conversion(Value::String(v), ty.to_string()));
            }
            Value::String(v)
        }
        (Type::List(item), Value::List(items)) => {
            let items = items
                .into_iter()
                .map(|v| write(item, v, dialect))
                .collect::<Result<Vec<_>>>()?;

            match &**item {
                // No client-side encoding exists for these element kinds,
                // send the array as a text literal for the server to cast.
                Type::Enum(_) | Type::Range(_) | Type::Custom(_) if dialect.is_postgresql() => {
                    Value::String(encode_array_literal(&items))
                }
                _ if dialect.is_postgresql() => Value::List(items),
                _ => Value::String(Value::List(items).to_json().to_string()),
            }
        }
        (_, value) => value,
    })
}

fn parse_text(
    text: String,
    to: &str,
    parse: impl FnOnce(&str) -> Option<Value>,
) -> Result<Value> {
    match parse(text.trim()) {
        Some(value) => Ok(value),
        None => Err(Error::type_conversion(Value::String(text), to)),
    }
}

fn parse_naive_datetime(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f"))
        .ok()
}

/// Parses a one-dimensional PostgreSQL array literal such as
/// `{1,2,"a b",NULL}` into string items. Unquoted `NULL` is null.
pub fn parse_array_literal(text: &str) -> Result<Vec<Value>> {
    let text = text.trim();

    let Some(inner) = text.strip_prefix('{').and_then(|t| t.strip_suffix('}')) else {
        return Err(Error::type_conversion(Value::String(text.to_string()), "array"));
    };

    let mut items = vec![];

    if inner.trim().is_empty() {
        return Ok(items);
    }

    let mut chars = inner.chars();
    let mut current = String::new();
    let mut quoted = false;
    let mut in_quotes = false;

    loop {
        let c = chars.next();

        match c {
            Some('\\') if in_quotes => {
                if let Some(escaped) = chars.next() {
                    current.push(escaped);
                }
            }
            Some('"') => {
                in_quotes = !in_quotes;
                quoted = true;
            }
            Some(',') | None if !in_quotes => {
                let item = if !quoted && current.trim().eq_ignore_ascii_case("null") {
                    Value::Null
                } else if quoted {
                    Value::String(std::mem::take(&mut current))
                } else {
                    Value::String(current.trim().to_string())
                };

                items.push(item);
                current.clear();
                quoted = false;

                if c.is_none() {
                    break;
                }
            }
            Some(c) => current.push(c),
            None => {
                return Err(Error::type_conversion(
                    Value::String(text.to_string()),
                    "array",
                ))
            }
        }
    }

    Ok(items)
}

/// Encodes items as a PostgreSQL array literal, quoting every non-null
/// item.
pub fn encode_array_literal(items: &[Value]) -> String {
    let mut out = String::from("{");

    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }

        let text = match item {
            Value::Null => {
                out.push_str("NULL");
                continue;
            }
            Value::String(v) => v.clone(),
            Value::Json(v) => v.to_string(),
            Value::Bool(v) => if *v { "t" } else { "f" }.to_string(),
            other => match other.to_json() {
                serde_json::Value::String(v) => v,
                json => json.to_string(),
            },
        };

        out.push('"');
        for c in text.chars() {
            if matches!(c, '"' | '\\') {
                out.push('\\');
            }
            out.push(c);
        }
        out.push('"');
    }

    out.push('}');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn round_trip(ty: Type, value: Value, dialect: Dialect) {
        let ty = SemanticType::new("test", ty);
        let written = ty.write(value.clone(), dialect).unwrap();
        assert_eq!(ty.read(written, dialect).unwrap(), value, "{dialect:?}");
    }

    #[test]
    fn literal_values_round_trip() {
        for dialect in [Dialect::Postgresql, Dialect::Mysql, Dialect::Sqlite] {
            round_trip(Type::String, Value::from("it's"), dialect);
            round_trip(Type::I64, Value::I64(-42), dialect);
            round_trip(Type::Bool, Value::Bool(true), dialect);
            round_trip(Type::Bool, Value::Null, dialect);
            round_trip(
                Type::list(Type::I64),
                Value::from(vec![1_i64, 2, 3]),
                dialect,
            );
            round_trip(
                Type::Json,
                Value::Json(serde_json::json!({"tags": ["a", "b"], "n": 1})),
                dialect,
            );
        }
    }

    #[test]
    fn sqlite_stores_booleans_as_integers() {
        let ty = SemanticType::new("boolean", Type::Bool);
        assert_eq!(
            ty.write(Value::Bool(true), Dialect::Sqlite).unwrap(),
            Value::I64(1)
        );
        assert_eq!(
            ty.write(Value::Bool(true), Dialect::Postgresql).unwrap(),
            Value::Bool(true)
        );
    }

    #[test]
    fn array_literal() {
        let items = parse_array_literal(r#"{1,2,"a b",NULL,"NULL","q\"x"}"#).unwrap();
        assert_eq!(
            items,
            vec![
                Value::from("1"),
                Value::from("2"),
                Value::from("a b"),
                Value::Null,
                Value::from("NULL"),
                Value::from("q\"x"),
            ]
        );

        assert_eq!(parse_array_literal("{}").unwrap(), vec![]);
        assert!(parse_array_literal("1,2").unwrap_err().is_type_conversion());
        assert!(parse_array_literal(r#"{"open}"#).is_err());
    }

    #[test]
    fn array_literal_is_read_into_typed_items() {
        let ty = SemanticType::new("_int4", Type::list(Type::I32));
        let value = ty
            .read(Value::from("{1,NULL,3}"), Dialect::Postgresql)
            .unwrap();

        assert_eq!(
            value,
            Value::List(vec![Value::I32(1), Value::Null, Value::I32(3)])
        );
    }

    #[test]
    fn encode_then_parse_array_literal() {
        let items = vec![Value::from("a b"), Value::Null, Value::from("x\"y")];
        let encoded = encode_array_literal(&items);
        assert_eq!(encoded, r#"{"a b",NULL,"x\"y"}"#);
        assert_eq!(parse_array_literal(&encoded).unwrap(), items);
    }

    #[test]
    fn enum_write_rejects_unknown_labels() {
        let ty = SemanticType::new("mood", Type::Enum(vec!["happy".into(), "sad".into()]));
        assert!(ty.write(Value::from("happy"), Dialect::Postgresql).is_ok());
        assert!(ty
            .write(Value::from("angry"), Dialect::Postgresql)
            .unwrap_err()
            .is_type_conversion());
    }

    #[test]
    fn sqlite_text_timestamps() {
        let ty = SemanticType::new("datetime", Type::Timestamp);
        let value = Value::Timestamp(
            NaiveDate::from_ymd_opt(2024, 5, 1)
                .unwrap()
                .and_hms_opt(12, 30, 0)
                .unwrap(),
        );
        let written = ty.write(value.clone(), Dialect::Sqlite).unwrap();
        assert_eq!(written, Value::from("2024-05-01 12:30:00"));
        assert_eq!(ty.read(written, Dialect::Sqlite).unwrap(), value);
    }
}
