use super::Expr;

/// `expr [NOT] LIKE pattern`, optionally case-insensitive.
#[derive(Debug, Clone, PartialEq)]
pub struct ExprLike {
    pub expr: Box<Expr>,
    pub pattern: Box<Expr>,
    pub case_insensitive: bool,
    pub negate: bool,
}

impl Expr {
    pub fn like(self, pattern: impl Into<Expr>) -> Self {
        ExprLike {
            expr: Box::new(self),
            pattern: Box::new(pattern.into()),
            case_insensitive: false,
            negate: false,
        }
        .into()
    }

    pub fn ilike(self, pattern: impl Into<Expr>) -> Self {
        ExprLike {
            expr: Box::new(self),
            pattern: Box::new(pattern.into()),
            case_insensitive: true,
            negate: false,
        }
        .into()
    }

    pub fn not_like(self, pattern: impl Into<Expr>) -> Self {
        ExprLike {
            expr: Box::new(self),
            pattern: Box::new(pattern.into()),
            case_insensitive: false,
            negate: true,
        }
        .into()
    }
}

impl From<ExprLike> for Expr {
    fn from(value: ExprLike) -> Self {
        Self::Like(value)
    }
}
