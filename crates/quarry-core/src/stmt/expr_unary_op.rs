use super::*;

#[derive(Debug, Clone, PartialEq)]
pub struct ExprUnaryOp {
    pub op: UnaryOp,
    pub expr: Box<Expr>,
}

impl Expr {
    /// Logical negation. Double negation cancels out.
    pub fn not(expr: impl Into<Self>) -> Self {
        match expr.into() {
            Self::UnaryOp(ExprUnaryOp {
                op: UnaryOp::Not,
                expr,
            }) => *expr,
            expr => ExprUnaryOp {
                op: UnaryOp::Not,
                expr: Box::new(expr),
            }
            .into(),
        }
    }

    pub fn neg(expr: impl Into<Self>) -> Self {
        ExprUnaryOp {
            op: UnaryOp::Neg,
            expr: Box::new(expr.into()),
        }
        .into()
    }
}

impl std::ops::Not for Expr {
    type Output = Expr;

    fn not(self) -> Expr {
        Expr::not(self)
    }
}

impl std::ops::Neg for Expr {
    type Output = Expr;

    fn neg(self) -> Expr {
        Expr::neg(self)
    }
}

impl From<ExprUnaryOp> for Expr {
    fn from(value: ExprUnaryOp) -> Self {
        Self::UnaryOp(value)
    }
}
