use super::{Flavor, Formatter, Params, ToSql};

use quarry_core::{stmt, Error, Result};

impl ToSql for &stmt::Type {
    fn to_sql<T: Params>(self, f: &mut Formatter<'_, T>) -> Result<()> {
        let name = match f.serializer.flavor {
            Flavor::Postgresql => postgresql(self)?,
            Flavor::Sqlite => sqlite(self).to_string(),
            Flavor::Mysql => mysql(self)?.to_string(),
        };
        f.dst.push_str(&name);
        Ok(())
    }
}

fn postgresql(ty: &stmt::Type) -> Result<String> {
    use stmt::Type::*;

    Ok(match ty {
        Bool => "BOOLEAN".into(),
        I32 => "INTEGER".into(),
        I64 => "BIGINT".into(),
        F64 => "DOUBLE PRECISION".into(),
        Decimal => "NUMERIC".into(),
        String | Enum(_) => "TEXT".into(),
        Bytes => "BYTEA".into(),
        Uuid => "UUID".into(),
        Date => "DATE".into(),
        Time => "TIME".into(),
        Timestamp => "TIMESTAMP".into(),
        TimestampTz => "TIMESTAMPTZ".into(),
        Json => "JSONB".into(),
        List(item) => format!("{}[]", postgresql(item)?),
        Range(item) => match &**item {
            I32 => "INT4RANGE".into(),
            I64 => "INT8RANGE".into(),
            Decimal => "NUMRANGE".into(),
            Date => "DATERANGE".into(),
            Timestamp => "TSRANGE".into(),
            TimestampTz => "TSTZRANGE".into(),
            other => {
                return Err(Error::unsupported_feature(format!(
                    "no range type over {other}"
                )))
            }
        },
        Custom(name) => {
            if !name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | ' ' | '.' | '(' | ')' | ','))
            {
                return Err(Error::invalid_statement(format!("invalid type name `{name}`")));
            }
            name.clone()
        }
    })
}

fn sqlite(ty: &stmt::Type) -> &'static str {
    use stmt::Type::*;

    match ty {
        Bool | I32 | I64 => "INTEGER",
        F64 => "REAL",
        Decimal => "NUMERIC",
        Bytes => "BLOB",
        String | Uuid | Date | Time | Timestamp | TimestampTz | Json | List(_) | Range(_)
        | Enum(_) | Custom(_) => "TEXT",
    }
}

fn mysql(ty: &stmt::Type) -> Result<&'static str> {
    use stmt::Type::*;

    Ok(match ty {
        Bool | I32 | I64 => "SIGNED",
        F64 => "DOUBLE",
        Decimal => "DECIMAL(65, 30)",
        String | Enum(_) | Range(_) => "CHAR",
        Bytes => "BINARY",
        Uuid => "CHAR(36)",
        Date => "DATE",
        Time => "TIME",
        Timestamp | TimestampTz => "DATETIME(6)",
        Json | List(_) => "JSON",
        Custom(name) => {
            return Err(Error::unsupported_feature(format!(
                "cannot cast to `{name}` on MySQL"
            )))
        }
    })
}
