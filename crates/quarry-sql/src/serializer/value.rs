use super::{Comma, Formatter, Params, ToSql};

use quarry_core::{stmt, Result};

impl ToSql for &stmt::Value {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) -> Result<()> {
        use stmt::Value::*;

        match self {
            // PostgreSQL binds lists as native arrays; other databases
            // receive them as a parenthesized row of parameters.
            List(items) if !f.serializer.is_postgresql() => {
                fmt!(f, "(" Comma(items) ")");
            }
            Record(fields) => {
                fmt!(f, "(" Comma(fields) ")");
            }
            Json(_) if f.serializer.is_mysql() => {
                let placeholder = f.params.push(self);
                fmt!(f, "CAST(" placeholder " AS JSON)");
            }
            value => {
                let placeholder = f.params.push(value);
                fmt!(f, placeholder);
            }
        }

        Ok(())
    }
}

/// A count bound as a parameter (`LIMIT`, `OFFSET`).
pub(super) struct Count(pub(super) u64);

impl ToSql for Count {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) -> Result<()> {
        let value = i64::try_from(self.0).map_err(|_| {
            quarry_core::Error::invalid_statement(format!("row count {} out of range", self.0))
        })?;
        let placeholder = f.params.push(&stmt::Value::I64(value));
        fmt!(f, placeholder);
        Ok(())
    }
}
