use super::Expr;

/// A row value, `(a, b, ..)`, used to compare composite keys.
#[derive(Debug, Clone, PartialEq)]
pub struct ExprRecord {
    pub fields: Vec<Expr>,
}

impl Expr {
    pub fn record<T: Into<Expr>>(fields: impl IntoIterator<Item = T>) -> Self {
        let mut fields: Vec<_> = fields.into_iter().map(Into::into).collect();

        if fields.len() == 1 {
            return fields.remove(0);
        }

        ExprRecord { fields }.into()
    }
}

impl From<ExprRecord> for Expr {
    fn from(value: ExprRecord) -> Self {
        Self::Record(value)
    }
}
