use super::{Assignment, Expr};

#[derive(Debug, Clone, PartialEq)]
pub struct Update {
    pub table: String,
    pub assignments: Vec<Assignment>,
    pub filter: Option<Expr>,
    pub returning: Option<Vec<Expr>>,
}

impl Update {
    pub fn new(table: impl Into<String>, assignments: Vec<Assignment>) -> Self {
        Self {
            table: table.into(),
            assignments,
            filter: None,
            returning: None,
        }
    }

    pub fn filter(self, filter: Option<Expr>) -> Self {
        Self { filter, ..self }
    }
}
