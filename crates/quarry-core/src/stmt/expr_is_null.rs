use super::Expr;

/// Whether an expression is (or is not) null. This is different from a
/// binary expression because of how databases treat null comparisons.
#[derive(Debug, Clone, PartialEq)]
pub struct ExprIsNull {
    pub expr: Box<Expr>,
    pub negate: bool,
}

impl Expr {
    pub fn is_null(self) -> Self {
        ExprIsNull {
            expr: Box::new(self),
            negate: false,
        }
        .into()
    }

    pub fn is_not_null(self) -> Self {
        ExprIsNull {
            expr: Box::new(self),
            negate: true,
        }
        .into()
    }
}

impl From<ExprIsNull> for Expr {
    fn from(value: ExprIsNull) -> Self {
        Self::IsNull(value)
    }
}
