use super::Expr;

/// `CASE [operand] WHEN .. THEN .. [ELSE ..] END`
#[derive(Debug, Clone, PartialEq)]
pub struct ExprCase {
    pub operand: Option<Box<Expr>>,
    pub when: Vec<(Expr, Expr)>,
    pub otherwise: Option<Box<Expr>>,
}

impl ExprCase {
    pub fn new() -> Self {
        Self {
            operand: None,
            when: vec![],
            otherwise: None,
        }
    }

    /// A simple case comparing `operand` against each branch.
    pub fn with_operand(operand: impl Into<Expr>) -> Self {
        Self {
            operand: Some(Box::new(operand.into())),
            ..Self::new()
        }
    }

    pub fn when(mut self, condition: impl Into<Expr>, then: impl Into<Expr>) -> Self {
        self.when.push((condition.into(), then.into()));
        self
    }

    pub fn otherwise(mut self, value: impl Into<Expr>) -> Self {
        self.otherwise = Some(Box::new(value.into()));
        self
    }
}

impl Default for ExprCase {
    fn default() -> Self {
        Self::new()
    }
}

impl From<ExprCase> for Expr {
    fn from(value: ExprCase) -> Self {
        Self::Case(value)
    }
}
