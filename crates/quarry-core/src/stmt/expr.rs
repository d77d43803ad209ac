use super::*;

/// A node of the expression algebra.
///
/// Expressions are immutable values: combinators consume their operands
/// and return a new tree, so a clone of a relation's expression is never
/// affected by later composition.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// `expr AS alias`
    Alias(ExprAlias),

    /// AND a set of predicates
    And(ExprAnd),

    /// Binary expression
    BinaryOp(ExprBinaryOp),

    /// `CASE .. END`
    Case(ExprCase),

    /// Cast an expression to a different type
    Cast(ExprCast),

    /// References a column of one of the statement's sources
    Column(ExprColumn),

    /// The value proposed for insertion by an upsert, in the update branch
    Excluded(String),

    /// `[NOT] EXISTS (subquery)`
    Exists(ExprExists),

    /// Function call
    Func(ExprFunc),

    /// In list
    InList(ExprInList),

    /// The expression is contained by the given subquery
    InSubquery(ExprInSubquery),

    /// Whether an expression is (or is not) null.
    IsNull(ExprIsNull),

    /// Pattern match
    Like(ExprLike),

    /// OR a set of predicates
    Or(ExprOr),

    /// A row value
    Record(ExprRecord),

    /// `*` or `relation.*`
    Star(Option<String>),

    /// Scalar subquery
    Subquery(Box<QuerySpec>),

    /// Full-text search predicate
    TextSearch(ExprTextSearch),

    /// Unary operator
    UnaryOp(ExprUnaryOp),

    /// A constant. Always sent to the database as a bound parameter.
    Value(Value),

    /// Window function call
    Window(ExprWindow),
}

impl Expr {
    pub fn null() -> Self {
        Self::Value(Value::Null)
    }

    pub fn value(value: impl Into<Value>) -> Self {
        Self::Value(value.into())
    }

    /// `*`
    pub fn star() -> Self {
        Self::Star(None)
    }

    /// `relation.*`
    pub fn star_of(relation: impl Into<String>) -> Self {
        Self::Star(Some(relation.into()))
    }

    pub fn excluded(column: impl Into<String>) -> Self {
        Self::Excluded(column.into())
    }

    pub fn subquery(query: impl Into<QuerySpec>) -> Self {
        Self::Subquery(Box::new(query.into()))
    }

    /// Is a constant `true`
    pub fn is_true(&self) -> bool {
        matches!(self, Self::Value(Value::Bool(true)))
    }

    /// Is a constant `false`
    pub fn is_false(&self) -> bool {
        matches!(self, Self::Value(Value::Bool(false)))
    }

    pub fn is_value(&self) -> bool {
        matches!(self, Self::Value(_))
    }

    pub fn is_column(&self) -> bool {
        matches!(self, Self::Column(_))
    }

    pub fn as_column(&self) -> Option<&ExprColumn> {
        match self {
            Self::Column(column) => Some(column),
            _ => None,
        }
    }

    /// `true` when the expression contains an aggregate call outside of
    /// any subquery.
    pub fn contains_aggregate(&self) -> bool {
        let mut found = false;
        visit::for_each_expr(self, |expr| {
            if let Self::Func(func) = expr {
                found |= func.aggregate;
            }
        });
        found
    }

    /// `true` when the expression contains a window function call outside
    /// of any subquery.
    pub fn contains_window(&self) -> bool {
        let mut found = false;
        visit::for_each_expr(self, |expr| {
            found |= matches!(expr, Self::Window(_));
        });
        found
    }

    /// Qualifies every unqualified column reference with `relation`.
    pub fn qualify(self, relation: &str) -> Self {
        visit::map_columns(self, &mut |mut column| {
            if column.relation.is_none() {
                column.relation = Some(relation.to_string());
            }
            column
        })
    }
}

impl Default for Expr {
    fn default() -> Self {
        Self::Value(Value::default())
    }
}

impl From<bool> for Expr {
    fn from(value: bool) -> Self {
        Self::Value(Value::from(value))
    }
}

impl From<i32> for Expr {
    fn from(value: i32) -> Self {
        Self::Value(Value::from(value))
    }
}

impl From<i64> for Expr {
    fn from(value: i64) -> Self {
        Self::Value(Value::from(value))
    }
}

impl From<f64> for Expr {
    fn from(value: f64) -> Self {
        Self::Value(Value::from(value))
    }
}

impl From<&str> for Expr {
    fn from(value: &str) -> Self {
        Self::Value(Value::from(value))
    }
}

impl From<String> for Expr {
    fn from(value: String) -> Self {
        Self::Value(Value::from(value))
    }
}

impl From<Value> for Expr {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

impl From<serde_json::Value> for Expr {
    fn from(value: serde_json::Value) -> Self {
        Self::Value(Value::Json(value))
    }
}

impl From<&Expr> for Expr {
    fn from(value: &Expr) -> Self {
        value.clone()
    }
}
