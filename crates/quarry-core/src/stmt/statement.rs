use super::{Delete, Insert, QuerySpec, Update};

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Query(QuerySpec),
    Insert(Insert),
    Update(Update),
    Delete(Delete),
}

impl Statement {
    /// `true` when executing the statement produces rows.
    pub fn returns_rows(&self) -> bool {
        match self {
            Self::Query(_) => true,
            Self::Insert(stmt) => stmt.returning.is_some(),
            Self::Update(stmt) => stmt.returning.is_some(),
            Self::Delete(stmt) => stmt.returning.is_some(),
        }
    }
}

impl From<QuerySpec> for Statement {
    fn from(value: QuerySpec) -> Self {
        Self::Query(value)
    }
}

impl From<Insert> for Statement {
    fn from(value: Insert) -> Self {
        Self::Insert(value)
    }
}

impl From<Update> for Statement {
    fn from(value: Update) -> Self {
        Self::Update(value)
    }
}

impl From<Delete> for Statement {
    fn from(value: Delete) -> Self {
        Self::Delete(value)
    }
}
