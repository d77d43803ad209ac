use super::{Expr, QuerySpec};

#[derive(Debug, Clone, PartialEq)]
pub struct ExprInSubquery {
    pub expr: Box<Expr>,
    pub query: Box<QuerySpec>,
    pub negate: bool,
}

impl Expr {
    pub fn in_subquery(self, query: impl Into<QuerySpec>) -> Self {
        ExprInSubquery {
            expr: Box::new(self),
            query: Box::new(query.into()),
            negate: false,
        }
        .into()
    }

    pub fn not_in_subquery(self, query: impl Into<QuerySpec>) -> Self {
        ExprInSubquery {
            expr: Box::new(self),
            query: Box::new(query.into()),
            negate: true,
        }
        .into()
    }
}

impl From<ExprInSubquery> for Expr {
    fn from(value: ExprInSubquery) -> Self {
        Self::InSubquery(value)
    }
}
