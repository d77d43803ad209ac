use super::Expr;

/// A reference to an attribute of one of the statement's sources.
///
/// `relation` names the source by its alias (or table name when it has no
/// alias). An unqualified column is resolved by the compiler against the
/// sources in scope.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExprColumn {
    pub relation: Option<String>,
    pub name: String,
}

impl ExprColumn {
    pub fn is_qualified(&self) -> bool {
        self.relation.is_some()
    }
}

impl Expr {
    /// An unqualified column reference.
    pub fn col(name: impl Into<String>) -> Self {
        ExprColumn {
            relation: None,
            name: name.into(),
        }
        .into()
    }

    /// A column reference qualified by a relation name or alias.
    pub fn qualified(relation: impl Into<String>, name: impl Into<String>) -> Self {
        ExprColumn {
            relation: Some(relation.into()),
            name: name.into(),
        }
        .into()
    }
}

impl From<ExprColumn> for Expr {
    fn from(value: ExprColumn) -> Self {
        Self::Column(value)
    }
}
