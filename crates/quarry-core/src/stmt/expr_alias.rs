use super::Expr;

/// `expr AS alias` in a projection.
#[derive(Debug, Clone, PartialEq)]
pub struct ExprAlias {
    pub expr: Box<Expr>,
    pub alias: String,
}

impl Expr {
    pub fn alias(self, alias: impl Into<String>) -> Self {
        let expr = match self {
            // Re-aliasing replaces the previous alias
            Self::Alias(ExprAlias { expr, .. }) => expr,
            expr => Box::new(expr),
        };

        ExprAlias {
            expr,
            alias: alias.into(),
        }
        .into()
    }

    /// The name the expression is projected as, when one can be determined.
    pub fn output_name(&self) -> Option<&str> {
        match self {
            Self::Alias(alias) => Some(&alias.alias),
            Self::Column(column) => Some(&column.name),
            _ => None,
        }
    }
}

impl From<ExprAlias> for Expr {
    fn from(value: ExprAlias) -> Self {
        Self::Alias(value)
    }
}
