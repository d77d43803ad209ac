#![allow(unused_variables)]

use super::{
    Expr, ExprAlias, ExprBinaryOp, ExprCase, ExprFunc, ExprColumn, ExprInList, ExprWindow,
    QuerySpec,
};

/// Read-only traversal of an expression tree.
///
/// Subqueries open a new scope and are handed to [`Visit::visit_query`],
/// which does not descend by default.
pub trait Visit {
    fn visit_expr(&mut self, i: &Expr) {
        visit_expr(self, i);
    }

    fn visit_expr_column(&mut self, i: &ExprColumn) {}

    fn visit_expr_func(&mut self, i: &ExprFunc) {
        visit_expr_func(self, i);
    }

    fn visit_query(&mut self, i: &QuerySpec) {}
}

pub fn visit_expr<V>(v: &mut V, node: &Expr)
where
    V: Visit + ?Sized,
{
    match node {
        Expr::Alias(ExprAlias { expr, .. }) => v.visit_expr(expr),
        Expr::And(expr) => expr.operands.iter().for_each(|e| v.visit_expr(e)),
        Expr::Or(expr) => expr.operands.iter().for_each(|e| v.visit_expr(e)),
        Expr::BinaryOp(ExprBinaryOp { lhs, rhs, .. }) => {
            v.visit_expr(lhs);
            v.visit_expr(rhs);
        }
        Expr::Case(ExprCase {
            operand,
            when,
            otherwise,
        }) => {
            if let Some(operand) = operand {
                v.visit_expr(operand);
            }
            for (condition, then) in when {
                v.visit_expr(condition);
                v.visit_expr(then);
            }
            if let Some(otherwise) = otherwise {
                v.visit_expr(otherwise);
            }
        }
        Expr::Cast(expr) => v.visit_expr(&expr.expr),
        Expr::Column(column) => v.visit_expr_column(column),
        Expr::Exists(expr) => v.visit_query(&expr.query),
        Expr::Func(func) => v.visit_expr_func(func),
        Expr::InList(ExprInList { expr, list, .. }) => {
            v.visit_expr(expr);
            list.iter().for_each(|e| v.visit_expr(e));
        }
        Expr::InSubquery(expr) => {
            v.visit_expr(&expr.expr);
            v.visit_query(&expr.query);
        }
        Expr::IsNull(expr) => v.visit_expr(&expr.expr),
        Expr::Like(expr) => {
            v.visit_expr(&expr.expr);
            v.visit_expr(&expr.pattern);
        }
        Expr::Record(expr) => expr.fields.iter().for_each(|e| v.visit_expr(e)),
        Expr::Subquery(query) => v.visit_query(query),
        Expr::TextSearch(expr) => {
            v.visit_expr(&expr.document);
            v.visit_expr(&expr.query);
        }
        Expr::UnaryOp(expr) => v.visit_expr(&expr.expr),
        Expr::Window(ExprWindow {
            func,
            partition_by,
            order_by,
            ..
        }) => {
            v.visit_expr_func(func);
            partition_by.iter().for_each(|e| v.visit_expr(e));
            order_by.iter().for_each(|e| v.visit_expr(&e.expr));
        }
        Expr::Excluded(_) | Expr::Star(_) | Expr::Value(_) => {}
    }
}

pub fn visit_expr_func<V>(v: &mut V, node: &ExprFunc)
where
    V: Visit + ?Sized,
{
    node.args.iter().for_each(|e| v.visit_expr(e));
    if let Some(filter) = &node.filter {
        v.visit_expr(filter);
    }
}

/// Calls `f` on every expression node, children first.
pub fn for_each_expr<F>(node: &Expr, f: F)
where
    F: FnMut(&Expr),
{
    struct ForEach<F> {
        f: F,
    }

    impl<F> Visit for ForEach<F>
    where
        F: FnMut(&Expr),
    {
        fn visit_expr(&mut self, node: &Expr) {
            visit_expr(self, node);
            (self.f)(node);
        }
    }

    ForEach { f }.visit_expr(node);
}

/// Rebuilds `node`, passing every column reference outside of subqueries
/// through `f`.
pub fn map_columns(node: Expr, f: &mut impl FnMut(ExprColumn) -> ExprColumn) -> Expr {
    match node {
        Expr::Alias(mut expr) => {
            expr.expr = map_box(expr.expr, f);
            expr.into()
        }
        Expr::And(mut expr) => {
            expr.operands = map_vec(expr.operands, f);
            expr.into()
        }
        Expr::Or(mut expr) => {
            expr.operands = map_vec(expr.operands, f);
            expr.into()
        }
        Expr::BinaryOp(mut expr) => {
            expr.lhs = map_box(expr.lhs, f);
            expr.rhs = map_box(expr.rhs, f);
            expr.into()
        }
        Expr::Case(mut expr) => {
            expr.operand = expr.operand.map(|e| map_box(e, f));
            expr.otherwise = expr.otherwise.map(|e| map_box(e, f));
            expr.when = expr
                .when
                .into_iter()
                .map(|(condition, then)| (map_columns(condition, f), map_columns(then, f)))
                .collect();
            expr.into()
        }
        Expr::Cast(mut expr) => {
            expr.expr = map_box(expr.expr, f);
            expr.into()
        }
        Expr::Column(column) => f(column).into(),
        Expr::Func(func) => map_func(func, f).into(),
        Expr::InList(mut expr) => {
            expr.expr = map_box(expr.expr, f);
            expr.list = map_vec(expr.list, f);
            expr.into()
        }
        Expr::InSubquery(mut expr) => {
            expr.expr = map_box(expr.expr, f);
            expr.into()
        }
        Expr::IsNull(mut expr) => {
            expr.expr = map_box(expr.expr, f);
            expr.into()
        }
        Expr::Like(mut expr) => {
            expr.expr = map_box(expr.expr, f);
            expr.pattern = map_box(expr.pattern, f);
            expr.into()
        }
        Expr::Record(mut expr) => {
            expr.fields = map_vec(expr.fields, f);
            expr.into()
        }
        Expr::TextSearch(mut expr) => {
            expr.document = map_box(expr.document, f);
            expr.query = map_box(expr.query, f);
            expr.into()
        }
        Expr::UnaryOp(mut expr) => {
            expr.expr = map_box(expr.expr, f);
            expr.into()
        }
        Expr::Window(mut expr) => {
            expr.func = map_func(expr.func, f);
            expr.partition_by = map_vec(expr.partition_by, f);
            for order_by in &mut expr.order_by {
                order_by.expr = map_columns(std::mem::take(&mut order_by.expr), f);
            }
            expr.into()
        }
        expr @ (Expr::Excluded(_)
        | Expr::Exists(_)
        | Expr::Star(_)
        | Expr::Subquery(_)
        | Expr::Value(_)) => expr,
    }
}

fn map_box(expr: Box<Expr>, f: &mut impl FnMut(ExprColumn) -> ExprColumn) -> Box<Expr> {
    Box::new(map_columns(*expr, f))
}

fn map_vec(exprs: Vec<Expr>, f: &mut impl FnMut(ExprColumn) -> ExprColumn) -> Vec<Expr> {
    exprs.into_iter().map(|e| map_columns(e, f)).collect()
}

fn map_func(mut func: ExprFunc, f: &mut impl FnMut(ExprColumn) -> ExprColumn) -> ExprFunc {
    func.args = map_vec(func.args, f);
    func.filter = func.filter.map(|e| map_box(e, f));
    func
}
