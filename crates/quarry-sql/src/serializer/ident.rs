use super::{Flavor, Formatter, Params, ToSql};
use quarry_core::Result;

/// A quoted identifier.
pub(super) struct Ident<S>(pub(super) S);

impl<S: AsRef<str>> ToSql for Ident<S> {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) -> Result<()> {
        let quote = match f.serializer.flavor {
            Flavor::Mysql => '`',
            Flavor::Postgresql | Flavor::Sqlite => '"',
        };

        f.dst.push(quote);
        for c in self.0.as_ref().chars() {
            if c == quote {
                f.dst.push(quote);
            }
            f.dst.push(c);
        }
        f.dst.push(quote);
        Ok(())
    }
}

/// An identifier optionally qualified by a relation name.
pub(super) struct Qualified<'a>(pub(super) Option<&'a str>, pub(super) &'a str);

impl ToSql for Qualified<'_> {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) -> Result<()> {
        if let Some(relation) = self.0 {
            fmt!(f, Ident(relation) ".");
        }
        fmt!(f, Ident(self.1));
        Ok(())
    }
}
