use super::Expr;

#[derive(Debug, Clone, PartialEq)]
pub struct ExprInList {
    pub expr: Box<Expr>,
    pub list: Vec<Expr>,
    pub negate: bool,
}

impl Expr {
    /// `self IN (..)`. An empty list is always false.
    pub fn in_list<T: Into<Expr>>(self, list: impl IntoIterator<Item = T>) -> Self {
        ExprInList {
            expr: Box::new(self),
            list: list.into_iter().map(Into::into).collect(),
            negate: false,
        }
        .into()
    }

    /// `self NOT IN (..)`. An empty list is always true.
    pub fn not_in_list<T: Into<Expr>>(self, list: impl IntoIterator<Item = T>) -> Self {
        ExprInList {
            expr: Box::new(self),
            list: list.into_iter().map(Into::into).collect(),
            negate: true,
        }
        .into()
    }
}

impl From<ExprInList> for Expr {
    fn from(value: ExprInList) -> Self {
        Self::InList(value)
    }
}
