use super::Expr;

/// `column = value` in an `UPDATE` or upsert.
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub column: String,
    pub value: Expr,
}

impl Assignment {
    pub fn new(column: impl Into<String>, value: impl Into<Expr>) -> Self {
        Self {
            column: column.into(),
            value: value.into(),
        }
    }
}

impl<C, V> From<(C, V)> for Assignment
where
    C: Into<String>,
    V: Into<Expr>,
{
    fn from((column, value): (C, V)) -> Self {
        Self::new(column, value)
    }
}
