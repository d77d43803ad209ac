use super::*;

#[derive(Debug, Clone, PartialEq)]
pub struct ExprBinaryOp {
    pub lhs: Box<Expr>,
    pub op: BinaryOp,
    pub rhs: Box<Expr>,
}

impl Expr {
    pub fn binary_op(lhs: impl Into<Self>, op: BinaryOp, rhs: impl Into<Self>) -> Self {
        ExprBinaryOp {
            lhs: Box::new(lhs.into()),
            op,
            rhs: Box::new(rhs.into()),
        }
        .into()
    }

    pub fn eq(self, rhs: impl Into<Self>) -> Self {
        Self::binary_op(self, BinaryOp::Eq, rhs)
    }

    pub fn ne(self, rhs: impl Into<Self>) -> Self {
        Self::binary_op(self, BinaryOp::Ne, rhs)
    }

    pub fn ge(self, rhs: impl Into<Self>) -> Self {
        Self::binary_op(self, BinaryOp::Ge, rhs)
    }

    pub fn gt(self, rhs: impl Into<Self>) -> Self {
        Self::binary_op(self, BinaryOp::Gt, rhs)
    }

    pub fn le(self, rhs: impl Into<Self>) -> Self {
        Self::binary_op(self, BinaryOp::Le, rhs)
    }

    pub fn lt(self, rhs: impl Into<Self>) -> Self {
        Self::binary_op(self, BinaryOp::Lt, rhs)
    }

    /// `low <= self AND self <= high`
    pub fn between(self, low: impl Into<Self>, high: impl Into<Self>) -> Self {
        Self::and(self.clone().ge(low), self.le(high))
    }

    pub fn concat(self, rhs: impl Into<Self>) -> Self {
        Self::binary_op(self, BinaryOp::Concat, rhs)
    }

    pub fn json_get(self, key: impl Into<Self>) -> Self {
        Self::binary_op(self, BinaryOp::JsonGet, key)
    }

    pub fn json_get_text(self, key: impl Into<Self>) -> Self {
        Self::binary_op(self, BinaryOp::JsonGetText, key)
    }

    pub fn json_path(self, path: impl Into<Self>) -> Self {
        Self::binary_op(self, BinaryOp::JsonPath, path)
    }

    pub fn contains(self, rhs: impl Into<Self>) -> Self {
        Self::binary_op(self, BinaryOp::Contains, rhs)
    }

    pub fn contained_by(self, rhs: impl Into<Self>) -> Self {
        Self::binary_op(self, BinaryOp::ContainedBy, rhs)
    }

    pub fn has_key(self, key: impl Into<Self>) -> Self {
        Self::binary_op(self, BinaryOp::HasKey, key)
    }

    pub fn overlaps(self, rhs: impl Into<Self>) -> Self {
        Self::binary_op(self, BinaryOp::Overlaps, rhs)
    }

    pub fn eq_any(self, array: impl Into<Self>) -> Self {
        Self::binary_op(self, BinaryOp::EqAny, array)
    }
}

impl From<ExprBinaryOp> for Expr {
    fn from(value: ExprBinaryOp) -> Self {
        Self::BinaryOp(value)
    }
}

macro_rules! impl_arith {
    ($($tr:ident :: $method:ident => $op:ident;)*) => {
        $(
            impl<T: Into<Expr>> std::ops::$tr<T> for Expr {
                type Output = Expr;

                fn $method(self, rhs: T) -> Expr {
                    Expr::binary_op(self, BinaryOp::$op, rhs)
                }
            }
        )*
    };
}

impl_arith! {
    Add::add => Add;
    Sub::sub => Sub;
    Mul::mul => Mul;
    Div::div => Div;
    Rem::rem => Mod;
}
