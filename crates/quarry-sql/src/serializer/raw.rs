use super::{Formatter, Params, ToSql};

use quarry_core::{stmt::SourceRaw, Error, Result};

/// Caller-supplied SQL with `?` placeholders, rewritten to the dialect's
/// placeholder syntax as its parameters are bound. `??` is a literal `?`;
/// placeholders inside single-quoted strings are left alone.
pub(super) struct RawSql<'a>(pub(super) &'a SourceRaw);

impl ToSql for RawSql<'_> {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) -> Result<()> {
        let SourceRaw { sql, params, .. } = self.0;

        let sql = sql.trim().trim_end_matches(';').trim_end();
        let mut params = params.iter();
        let mut chars = sql.chars().peekable();
        let mut quoted = false;

        while let Some(c) = chars.next() {
            match c {
                '\'' => {
                    quoted = !quoted;
                    f.dst.push(c);
                }
                '?' if !quoted && chars.peek() == Some(&'?') => {
                    chars.next();
                    f.dst.push('?');
                }
                '?' if !quoted => {
                    let Some(param) = params.next() else {
                        return Err(Error::invalid_statement(format!(
                            "raw SQL has more placeholders than parameters: {sql}"
                        )));
                    };
                    let placeholder = f.params.push(param);
                    fmt!(f, placeholder);
                }
                c => f.dst.push(c),
            }
        }

        if params.next().is_some() {
            return Err(Error::invalid_statement(format!(
                "raw SQL has fewer placeholders than parameters: {sql}"
            )));
        }

        Ok(())
    }
}
