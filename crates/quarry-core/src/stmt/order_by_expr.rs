use super::{Direction, Expr, Nulls};

#[derive(Debug, Clone, PartialEq)]
pub struct OrderByExpr {
    /// The expression
    pub expr: Expr,

    /// Ascending or descending. `None` renders no direction, which databases
    /// treat as ascending.
    pub order: Option<Direction>,

    pub nulls: Option<Nulls>,
}

impl OrderByExpr {
    /// Flips the direction by which the query is ordered.
    pub fn reverse(self) -> Self {
        Self {
            expr: self.expr,
            order: match self.order {
                Some(Direction::Desc) => Some(Direction::Asc),
                _ => Some(Direction::Desc),
            },
            nulls: self.nulls.map(Nulls::reverse),
        }
    }

    pub fn nulls_first(mut self) -> Self {
        self.nulls = Some(Nulls::First);
        self
    }

    pub fn nulls_last(mut self) -> Self {
        self.nulls = Some(Nulls::Last);
        self
    }
}

impl Expr {
    pub fn asc(self) -> OrderByExpr {
        OrderByExpr {
            expr: self,
            order: Some(Direction::Asc),
            nulls: None,
        }
    }

    pub fn desc(self) -> OrderByExpr {
        OrderByExpr {
            expr: self,
            order: Some(Direction::Desc),
            nulls: None,
        }
    }
}

impl From<Expr> for OrderByExpr {
    fn from(expr: Expr) -> Self {
        Self {
            expr,
            order: None,
            nulls: None,
        }
    }
}
