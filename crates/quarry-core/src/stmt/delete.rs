use super::Expr;

#[derive(Debug, Clone, PartialEq)]
pub struct Delete {
    pub table: String,
    pub filter: Option<Expr>,
    pub returning: Option<Vec<Expr>>,
}

impl Delete {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            filter: None,
            returning: None,
        }
    }

    pub fn filter(self, filter: Option<Expr>) -> Self {
        Self { filter, ..self }
    }
}
