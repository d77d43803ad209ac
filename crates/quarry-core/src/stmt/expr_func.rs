use super::{Expr, ExprWindow, OrderByExpr, WindowFrame};

/// Aggregate functions recognized by name. Calls to these are checked for
/// misuse (inside `WHERE`, `GROUP BY` or another aggregate) by the compiler.
const AGGREGATES: &[&str] = &[
    "array_agg",
    "avg",
    "bit_and",
    "bit_or",
    "bool_and",
    "bool_or",
    "count",
    "every",
    "group_concat",
    "json_agg",
    "json_group_array",
    "json_group_object",
    "json_object_agg",
    "jsonb_agg",
    "max",
    "min",
    "stddev",
    "string_agg",
    "sum",
    "total",
    "variance",
];

/// A function call expression.
///
/// # Examples
///
/// ```text
/// count(*)                              // counts all rows
/// count(DISTINCT user_id)               // counts distinct values
/// sum(amount) FILTER (WHERE paid)       // conditional aggregate
/// lower(email)                          // scalar function
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ExprFunc {
    pub name: String,
    pub args: Vec<Expr>,

    /// `DISTINCT` applied to the arguments of an aggregate.
    pub distinct: bool,

    /// `FILTER (WHERE ..)` applied to an aggregate.
    pub filter: Option<Box<Expr>>,

    pub aggregate: bool,
}

impl ExprFunc {
    pub fn new<T: Into<Expr>>(name: impl Into<String>, args: impl IntoIterator<Item = T>) -> Self {
        let name = name.into();
        let aggregate = is_aggregate_name(&name);

        Self {
            name,
            args: args.into_iter().map(Into::into).collect(),
            distinct: false,
            filter: None,
            aggregate,
        }
    }

    pub fn distinct(mut self) -> Self {
        self.distinct = true;
        self
    }

    pub fn filter(mut self, predicate: impl Into<Expr>) -> Self {
        let predicate = match self.filter.take() {
            Some(existing) => Expr::and(*existing, predicate),
            None => predicate.into(),
        };
        self.filter = Some(Box::new(predicate));
        self
    }

    /// Turns the call into a window function.
    pub fn over(self, window: Window) -> Expr {
        ExprWindow {
            func: self,
            partition_by: window.partition_by,
            order_by: window.order_by,
            frame: window.frame,
        }
        .into()
    }
}

/// The `OVER (..)` clause of a window function, built separately so one
/// window can be reused across several calls.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Window {
    pub partition_by: Vec<Expr>,
    pub order_by: Vec<OrderByExpr>,
    pub frame: Option<WindowFrame>,
}

impl Window {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn partition_by<T: Into<Expr>>(mut self, exprs: impl IntoIterator<Item = T>) -> Self {
        self.partition_by.extend(exprs.into_iter().map(Into::into));
        self
    }

    pub fn order_by<T: Into<OrderByExpr>>(mut self, exprs: impl IntoIterator<Item = T>) -> Self {
        self.order_by.extend(exprs.into_iter().map(Into::into));
        self
    }

    pub fn frame(mut self, frame: WindowFrame) -> Self {
        self.frame = Some(frame);
        self
    }
}

pub fn is_aggregate_name(name: &str) -> bool {
    AGGREGATES
        .binary_search(&name.to_ascii_lowercase().as_str())
        .is_ok()
}

impl Expr {
    /// A call to a named SQL function. Aggregates are recognized by name.
    pub fn func<T: Into<Expr>>(name: impl Into<String>, args: impl IntoIterator<Item = T>) -> Self {
        ExprFunc::new(name, args).into()
    }

    /// `count(*)`
    pub fn count_star() -> Self {
        ExprFunc::new("count", [Expr::star()]).into()
    }

    pub fn count(expr: impl Into<Expr>) -> Self {
        ExprFunc::new("count", [expr]).into()
    }

    pub fn sum(expr: impl Into<Expr>) -> Self {
        ExprFunc::new("sum", [expr]).into()
    }

    pub fn min(expr: impl Into<Expr>) -> Self {
        ExprFunc::new("min", [expr]).into()
    }

    pub fn max(expr: impl Into<Expr>) -> Self {
        ExprFunc::new("max", [expr]).into()
    }

    pub fn avg(expr: impl Into<Expr>) -> Self {
        ExprFunc::new("avg", [expr]).into()
    }

    pub fn coalesce<T: Into<Expr>>(exprs: impl IntoIterator<Item = T>) -> Self {
        ExprFunc::new("coalesce", exprs).into()
    }

    pub fn lower(expr: impl Into<Expr>) -> Self {
        ExprFunc::new("lower", [expr]).into()
    }

    pub fn upper(expr: impl Into<Expr>) -> Self {
        ExprFunc::new("upper", [expr]).into()
    }

    pub fn row_number() -> ExprFunc {
        ExprFunc::new("row_number", Vec::<Expr>::new())
    }

    pub fn rank() -> ExprFunc {
        ExprFunc::new("rank", Vec::<Expr>::new())
    }

    pub fn dense_rank() -> ExprFunc {
        ExprFunc::new("dense_rank", Vec::<Expr>::new())
    }
}

impl From<ExprFunc> for Expr {
    fn from(value: ExprFunc) -> Self {
        Self::Func(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aggregate_table_is_sorted() {
        let mut sorted = AGGREGATES.to_vec();
        sorted.sort_unstable();
        assert_eq!(sorted, AGGREGATES);
    }

    #[test]
    fn aggregates_are_recognized_by_name() {
        assert!(ExprFunc::new("COUNT", [Expr::star()]).aggregate);
        assert!(ExprFunc::new("sum", [Expr::col("amount")]).aggregate);
        assert!(!ExprFunc::new("lower", [Expr::col("email")]).aggregate);
        assert!(!Expr::row_number().aggregate);
    }
}
