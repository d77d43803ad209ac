use super::{Expr, QuerySpec};

#[derive(Debug, Clone, PartialEq)]
pub struct ExprExists {
    pub query: Box<QuerySpec>,
    pub negate: bool,
}

impl Expr {
    pub fn exists(query: impl Into<QuerySpec>) -> Self {
        ExprExists {
            query: Box::new(query.into()),
            negate: false,
        }
        .into()
    }

    pub fn not_exists(query: impl Into<QuerySpec>) -> Self {
        ExprExists {
            query: Box::new(query.into()),
            negate: true,
        }
        .into()
    }
}

impl From<ExprExists> for Expr {
    fn from(value: ExprExists) -> Self {
        Self::Exists(value)
    }
}
