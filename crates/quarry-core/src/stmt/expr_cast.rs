use super::{Expr, Type};

#[derive(Debug, Clone, PartialEq)]
pub struct ExprCast {
    pub expr: Box<Expr>,
    pub ty: Type,
}

impl Expr {
    pub fn cast(self, ty: impl Into<Type>) -> Self {
        ExprCast {
            expr: Box::new(self),
            ty: ty.into(),
        }
        .into()
    }
}

impl From<ExprCast> for Expr {
    fn from(value: ExprCast) -> Self {
        Self::Cast(value)
    }
}
