use super::{
    scope::Resolved, Clause, Comma, Delimited, Flavor, Formatter, Ident, Params, Qualified,
    Scope, ToSql,
};

use quarry_core::{
    stmt::{self, BinaryOp, Direction, Expr, Nulls},
    Error, Result,
};

impl ToSql for &stmt::Expr {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) -> Result<()> {
        use stmt::Expr::*;

        match self {
            Alias(expr) if f.clause == Clause::Projection => {
                fmt!(f, &*expr.expr " AS " Ident(&expr.alias));
            }
            Alias(expr) => expr.expr.to_sql(f)?,
            And(expr) => {
                let operands = expr.operands.iter().map(|operand| match operand {
                    Or(_) => Operand(operand, true),
                    _ => Operand(operand, false),
                });
                fmt!(f, Delimited(operands, " AND "));
            }
            BinaryOp(expr) => binary_op(f, &expr.lhs, expr.op, &expr.rhs)?,
            Case(expr) => {
                fmt!(f, "CASE");
                if let Some(operand) = &expr.operand {
                    let operand: &Expr = operand;
                    fmt!(f, " " operand);
                }
                for (condition, then) in &expr.when {
                    fmt!(f, " WHEN " condition " THEN " then);
                }
                if let Some(otherwise) = &expr.otherwise {
                    let otherwise: &Expr = otherwise;
                    fmt!(f, " ELSE " otherwise);
                }
                fmt!(f, " END");
            }
            Cast(expr) => {
                let operand: &Expr = &expr.expr;
                let ty = &expr.ty;
                fmt!(f, "CAST(" operand " AS " ty ")");
            }
            Column(column) => {
                let allow_alias = matches!(f.clause, Clause::OrderBy | Clause::GroupBy);
                let relation = match Scope::resolve(
                    &f.scopes,
                    column.relation.as_deref(),
                    &column.name,
                    allow_alias,
                )? {
                    Resolved::Column(relation) => relation,
                    Resolved::Alias => None,
                };
                fmt!(f, Qualified(relation.as_deref(), &column.name));
            }
            Excluded(column) => match f.serializer.flavor {
                Flavor::Mysql => fmt!(f, "VALUES(" Ident(column) ")"),
                Flavor::Postgresql | Flavor::Sqlite => fmt!(f, "EXCLUDED." Ident(column)),
            },
            Exists(expr) => {
                let not = if expr.negate { "NOT " } else { "" };
                let query = &*expr.query;
                fmt!(f, not "EXISTS (" query ")");
            }
            Func(func) => {
                check_aggregate(f, func)?;
                function(f, func)?;
            }
            InList(expr) if expr.list.is_empty() => {
                // Nothing is in an empty list
                let always = if expr.negate { "1 = 1" } else { "1 = 0" };
                fmt!(f, always);
            }
            InList(expr) => {
                let not = if expr.negate { "NOT " } else { "" };
                fmt!(f, Operand(&expr.expr, true) " " not "IN (" Comma(&expr.list) ")");
            }
            InSubquery(expr) => {
                let not = if expr.negate { "NOT " } else { "" };
                let query = &*expr.query;
                fmt!(f, Operand(&expr.expr, true) " " not "IN (" query ")");
            }
            IsNull(expr) => {
                let not = if expr.negate { "NOT " } else { "" };
                fmt!(f, Operand(&expr.expr, true) " IS " not "NULL");
            }
            Like(expr) => {
                let not = if expr.negate { "NOT " } else { "" };

                match (expr.case_insensitive, f.serializer.flavor) {
                    (true, Flavor::Postgresql) => {
                        fmt!(f, Operand(&expr.expr, true) " " not "ILIKE " Operand(&expr.pattern, true))
                    }
                    (true, _) => {
                        let operand: &Expr = &expr.expr;
                        let pattern: &Expr = &expr.pattern;
                        fmt!(f, "LOWER(" operand ") " not "LIKE LOWER(" pattern ")")
                    }
                    (false, _) => {
                        fmt!(f, Operand(&expr.expr, true) " " not "LIKE " Operand(&expr.pattern, true))
                    }
                }
            }
            Or(expr) => {
                let operands = expr.operands.iter().map(|operand| Operand(operand, false));
                fmt!(f, Delimited(operands, " OR "));
            }
            Record(expr) => {
                fmt!(f, "(" Comma(&expr.fields) ")");
            }
            Star(None) => fmt!(f, "*"),
            Star(Some(relation)) => {
                if !f.scopes.iter().any(|scope| scope.contains(relation)) {
                    return Err(Error::unbound_reference(format!("{relation}.*")));
                }
                fmt!(f, Ident(relation) ".*");
            }
            Subquery(query) => {
                let query = &**query;
                fmt!(f, "(" query ")");
            }
            TextSearch(expr) => text_search(f, expr)?,
            UnaryOp(expr) => match expr.op {
                stmt::UnaryOp::Not => fmt!(f, "NOT " Operand(&expr.expr, true)),
                stmt::UnaryOp::Neg => fmt!(f, "-" Operand(&expr.expr, true)),
            },
            Value(value) => value.to_sql(f)?,
            Window(window) => {
                check_window(f, &window.func)?;
                window_function(f, window)?;
            }
        }

        Ok(())
    }
}

/// An operand, parenthesized when it is a compound expression that could
/// otherwise bind to its neighbors.
struct Operand<'a>(&'a Expr, bool);

impl ToSql for Operand<'_> {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) -> Result<()> {
        let compound = matches!(
            self.0,
            Expr::And(_)
                | Expr::Or(_)
                | Expr::BinaryOp(_)
                | Expr::UnaryOp(_)
                | Expr::IsNull(_)
                | Expr::InList(_)
                | Expr::InSubquery(_)
                | Expr::Like(_)
                | Expr::TextSearch(_)
        );

        if self.1 && compound {
            fmt!(f, "(" self.0 ")");
        } else {
            fmt!(f, self.0);
        }
        Ok(())
    }
}

fn binary_op<P: Params>(f: &mut Formatter<'_, P>, lhs: &Expr, op: BinaryOp, rhs: &Expr) -> Result<()> {
    // `= NULL` never matches; compare with `IS [NOT] NULL` instead
    if matches!(op, BinaryOp::Eq | BinaryOp::Ne) {
        let not = if op == BinaryOp::Ne { "NOT " } else { "" };

        if matches!(rhs, Expr::Value(stmt::Value::Null)) {
            fmt!(f, Operand(lhs, true) " IS " not "NULL");
            return Ok(());
        }
        if matches!(lhs, Expr::Value(stmt::Value::Null)) {
            fmt!(f, Operand(rhs, true) " IS " not "NULL");
            return Ok(());
        }
    }

    if op.is_postgresql_extension() && !f.serializer.is_postgresql() {
        return Err(Error::unsupported_feature(format!(
            "operator `{op}` is only available on PostgreSQL"
        )));
    }

    match (op, f.serializer.flavor) {
        (BinaryOp::JsonGet | BinaryOp::JsonGetText, Flavor::Mysql) => {
            return Err(Error::unsupported_feature(format!(
                "operator `{op}` is not available on MySQL; use a JSON path function"
            )))
        }
        (BinaryOp::Concat, Flavor::Mysql) => {
            fmt!(f, "CONCAT(" lhs ", " rhs ")");
        }
        (BinaryOp::EqAny, _) => {
            fmt!(f, Operand(lhs, true) " = ANY(" rhs ")");
        }
        (op, _) => {
            let op = op.to_string();
            fmt!(f, Operand(lhs, true) " " op.as_str() " " Operand(rhs, true));
        }
    }

    Ok(())
}

fn clause_name(clause: Clause) -> &'static str {
    match clause {
        Clause::Projection => "the projection",
        Clause::Filter => "WHERE",
        Clause::GroupBy => "GROUP BY",
        Clause::Having => "HAVING",
        Clause::OrderBy => "ORDER BY",
        Clause::Values => "VALUES or SET",
    }
}

fn check_aggregate<P: Params>(f: &Formatter<'_, P>, func: &stmt::ExprFunc) -> Result<()> {
    if !func.aggregate {
        if func.distinct || func.filter.is_some() {
            return Err(Error::aggregate_function_misuse(format!(
                "DISTINCT and FILTER apply only to aggregates; `{}` is not one",
                func.name
            )));
        }
        return Ok(());
    }

    if f.in_aggregate {
        return Err(Error::aggregate_function_misuse(format!(
            "aggregate `{}` nested inside another aggregate",
            func.name
        )));
    }

    match f.clause {
        Clause::Projection | Clause::Having | Clause::OrderBy => Ok(()),
        clause => Err(Error::aggregate_function_misuse(format!(
            "aggregate `{}` used in {}",
            func.name,
            clause_name(clause)
        ))),
    }
}

fn check_window<P: Params>(f: &Formatter<'_, P>, func: &stmt::ExprFunc) -> Result<()> {
    if f.in_aggregate {
        return Err(Error::aggregate_function_misuse(format!(
            "window function `{}` nested inside an aggregate",
            func.name
        )));
    }

    match f.clause {
        Clause::Projection | Clause::OrderBy => Ok(()),
        clause => Err(Error::aggregate_function_misuse(format!(
            "window function `{}` used in {}",
            func.name,
            clause_name(clause)
        ))),
    }
}

fn function<P: Params>(f: &mut Formatter<'_, P>, func: &stmt::ExprFunc) -> Result<()> {
    if func.name.is_empty()
        || !func
            .name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.')
    {
        return Err(Error::invalid_statement(format!(
            "invalid function name `{}`",
            func.name
        )));
    }

    let name = func.name.to_uppercase();
    let distinct = if func.distinct { "DISTINCT " } else { "" };

    f.within_aggregate(func.aggregate, |f| {
        match &func.filter {
            // MySQL has no FILTER clause; the filter moves into each argument
            Some(filter) if f.serializer.is_mysql() => {
                let filter: &Expr = filter;
                fmt!(f, name.as_str() "(" distinct);
                let mut s = "";
                for arg in &func.args {
                    fmt!(f, s "CASE WHEN " filter " THEN ");
                    match arg {
                        Expr::Star(_) => fmt!(f, "1"),
                        arg => fmt!(f, arg),
                    }
                    fmt!(f, " END");
                    s = ", ";
                }
                fmt!(f, ")");
            }
            Some(filter) => {
                let filter: &Expr = filter;
                fmt!(f, name.as_str() "(" distinct Comma(&func.args) ") FILTER (WHERE " filter ")");
            }
            None => {
                fmt!(f, name.as_str() "(" distinct Comma(&func.args) ")");
            }
        }
        Ok(())
    })
}

fn window_function<P: Params>(f: &mut Formatter<'_, P>, window: &stmt::ExprWindow) -> Result<()> {
    function(f, &window.func)?;

    fmt!(f, " OVER (");

    let mut s = "";
    if !window.partition_by.is_empty() {
        fmt!(f, "PARTITION BY " Comma(&window.partition_by));
        s = " ";
    }

    if !window.order_by.is_empty() {
        fmt!(f, s "ORDER BY " Comma(&window.order_by));
        s = " ";
    }

    if let Some(frame) = &window.frame {
        let units = match frame.units {
            stmt::FrameUnits::Rows => "ROWS",
            stmt::FrameUnits::Range => "RANGE",
        };
        fmt!(f, s units " ");

        match frame.end {
            Some(end) => fmt!(f, "BETWEEN " frame.start " AND " end),
            None => fmt!(f, frame.start),
        }
    }

    fmt!(f, ")");
    Ok(())
}

impl ToSql for stmt::FrameBound {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) -> Result<()> {
        use stmt::FrameBound::*;

        match self {
            UnboundedPreceding => fmt!(f, "UNBOUNDED PRECEDING"),
            Preceding(n) => fmt!(f, (n as usize) " PRECEDING"),
            CurrentRow => fmt!(f, "CURRENT ROW"),
            Following(n) => fmt!(f, (n as usize) " FOLLOWING"),
            UnboundedFollowing => fmt!(f, "UNBOUNDED FOLLOWING"),
        }
        Ok(())
    }
}

fn text_search<P: Params>(f: &mut Formatter<'_, P>, expr: &stmt::ExprTextSearch) -> Result<()> {
    match f.serializer.flavor {
        Flavor::Postgresql => {
            let config = match &expr.config {
                Some(config) => {
                    if !config
                        .chars()
                        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.')
                    {
                        return Err(Error::invalid_statement(format!(
                            "invalid text search configuration `{config}`"
                        )));
                    }
                    format!("'{config}'::regconfig, ")
                }
                None => String::new(),
            };

            let config = config.as_str();
            let document: &Expr = &expr.document;
            let query: &Expr = &expr.query;
            fmt!(f, "to_tsvector(" config document ") @@ plainto_tsquery(" config query ")");
        }
        Flavor::Mysql => {
            let document = match &*expr.document {
                Expr::Record(record) => &record.fields[..],
                document => std::slice::from_ref(document),
            };
            let query = &*expr.query;
            fmt!(f, "MATCH (" Comma(document) ") AGAINST (" query " IN NATURAL LANGUAGE MODE)");
        }
        Flavor::Sqlite => {
            // FTS5 matches against the whole table or a single column
            match &*expr.document {
                document @ Expr::Column(_) => {
                    let query = &*expr.query;
                    fmt!(f, document " MATCH " query)
                }
                _ => {
                    return Err(Error::unsupported_feature(
                        "SQLite full-text search matches a table or a column",
                    ))
                }
            }
        }
    }

    Ok(())
}

impl ToSql for &stmt::OrderByExpr {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) -> Result<()> {
        // MySQL has no NULLS FIRST/LAST; order by nullness first
        if let (Some(nulls), true) = (self.nulls, f.serializer.is_mysql()) {
            let order = match nulls {
                Nulls::First => "DESC",
                Nulls::Last => "ASC",
            };
            fmt!(f, Operand(&self.expr, true) " IS NULL " order ", ");
        }

        fmt!(f, &self.expr);

        if let Some(order) = self.order {
            fmt!(f, " " order);
        }

        if let (Some(nulls), false) = (self.nulls, f.serializer.is_mysql()) {
            match nulls {
                Nulls::First => fmt!(f, " NULLS FIRST"),
                Nulls::Last => fmt!(f, " NULLS LAST"),
            }
        }

        Ok(())
    }
}

impl ToSql for Direction {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) -> Result<()> {
        match self {
            Direction::Asc => fmt!(f, "ASC"),
            Direction::Desc => fmt!(f, "DESC"),
        }
        Ok(())
    }
}
