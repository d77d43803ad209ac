use super::{
    raw::RawSql, scope, value::Count, Clause, Comma, Flavor, Formatter, Ident, Params, Qualified,
    Scope, ToSql,
};

use quarry_core::{
    stmt::{self, Expr, QuerySpec, Source},
    Error, Result,
};

impl ToSql for &stmt::Statement {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) -> Result<()> {
        use stmt::Statement::*;

        match self {
            Delete(stmt) => stmt.to_sql(f),
            Insert(stmt) => stmt.to_sql(f),
            Query(stmt) => stmt.to_sql(f),
            Update(stmt) => stmt.to_sql(f),
        }
    }
}

impl ToSql for &QuerySpec {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) -> Result<()> {
        // Raw SQL with nothing applied on top is sent as written
        if let Source::Raw(raw) = &self.source {
            if self.is_bare() {
                return RawSql(raw).to_sql(f);
            }
        }

        let scope = Scope::query(f.serializer, self);

        f.in_scope(scope, |f| {
            let distinct = if self.distinct { "DISTINCT " } else { "" };
            fmt!(f, "SELECT " distinct);

            f.in_clause(Clause::Projection, |f| projection(f, self))?;

            let source = &self.source;
            fmt!(f, " FROM " source);

            for join in &self.joins {
                fmt!(f, " " join);
            }

            if let Some(filter) = self.filter.as_ref().filter(|filter| !filter.is_true()) {
                f.in_clause(Clause::Filter, |f| {
                    fmt!(f, " WHERE " filter);
                    Ok(())
                })?;
            }

            if !self.group_by.is_empty() {
                f.in_clause(Clause::GroupBy, |f| {
                    fmt!(f, " GROUP BY " Comma(&self.group_by));
                    Ok(())
                })?;
            }

            if let Some(having) = self.having.as_ref().filter(|having| !having.is_true()) {
                f.in_clause(Clause::Having, |f| {
                    fmt!(f, " HAVING " having);
                    Ok(())
                })?;
            }

            for set_op in &self.set_ops {
                let op = set_op.op.to_string();

                let sqlite = f.serializer.flavor == Flavor::Sqlite;
                if sqlite && set_op.all && set_op.op != stmt::SetOp::Union {
                    return Err(Error::unsupported_feature(format!(
                        "SQLite does not support {op} ALL"
                    )));
                }

                let all = if set_op.all { " ALL" } else { "" };
                fmt!(f, " " op.as_str() all " " SetOperand(&set_op.query));
            }

            if !self.order_by.is_empty() {
                f.in_clause(Clause::OrderBy, |f| {
                    fmt!(f, " ORDER BY " Comma(&self.order_by));
                    Ok(())
                })?;
            }

            paging(f, self.limit, self.offset)?;

            if let Some(lock) = &self.lock {
                fmt!(f, lock);
            }

            Ok(())
        })
    }
}

/// Writes the projection; an empty projection selects every attribute of
/// the `FROM` source.
fn projection<P: Params>(f: &mut Formatter<'_, P>, query: &QuerySpec) -> Result<()> {
    if !query.projection.is_empty() {
        fmt!(f, Comma(&query.projection));
        return Ok(());
    }

    let qualifier = query.qualifier();
    let qualify = Scope::qualifies_star(&f.scopes);

    match scope::columns(f.serializer, &query.source) {
        Some(columns) if !columns.is_empty() => {
            let relation = qualify.then_some(qualifier);
            let columns = columns.iter().map(|column| Qualified(relation, column));
            fmt!(f, Comma(columns));
        }
        _ if qualify => fmt!(f, Ident(qualifier) ".*"),
        _ => fmt!(f, "*"),
    }

    Ok(())
}

fn paging<P: Params>(f: &mut Formatter<'_, P>, limit: Option<u64>, offset: Option<u64>) -> Result<()> {
    match (limit, offset, f.serializer.flavor) {
        (None, None, _) => {}
        (Some(limit), None, _) => fmt!(f, " LIMIT " Count(limit)),
        (Some(limit), Some(offset), _) => {
            fmt!(f, " LIMIT " Count(limit) " OFFSET " Count(offset))
        }
        (None, Some(offset), Flavor::Postgresql) => fmt!(f, " OFFSET " Count(offset)),
        // SQLite and MySQL only accept OFFSET after a LIMIT
        (None, Some(offset), Flavor::Sqlite) => fmt!(f, " LIMIT -1 OFFSET " Count(offset)),
        (None, Some(offset), Flavor::Mysql) => {
            fmt!(f, " LIMIT 18446744073709551615 OFFSET " Count(offset))
        }
    }
    Ok(())
}

/// A query combined by a set operation. Queries with their own ordering,
/// paging or set operations are wrapped in a derived table since not every
/// database accepts parenthesized operands.
struct SetOperand<'a>(&'a QuerySpec);

impl ToSql for SetOperand<'_> {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) -> Result<()> {
        let query = self.0;

        if query.order_by.is_empty()
            && query.limit.is_none()
            && query.offset.is_none()
            && query.set_ops.is_empty()
        {
            fmt!(f, query);
        } else {
            fmt!(f, "SELECT * FROM (" query ") AS " Ident(query.qualifier()));
        }
        Ok(())
    }
}

impl ToSql for &Source {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) -> Result<()> {
        match self {
            Source::Table(table) => {
                fmt!(f, Ident(&table.name));
                if let Some(alias) = &table.alias {
                    fmt!(f, " AS " Ident(alias));
                }
            }
            Source::Query(query) => {
                let subquery = &*query.query;
                fmt!(f, "(" subquery ") AS " Ident(&query.alias));
            }
            Source::Raw(raw) => {
                fmt!(f, "(" RawSql(raw) ") AS " Ident(&raw.alias));
            }
        }
        Ok(())
    }
}

impl ToSql for &stmt::Join {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) -> Result<()> {
        if self.kind == stmt::JoinKind::Full && f.serializer.is_mysql() {
            return Err(Error::unsupported_feature("MySQL does not support FULL JOIN"));
        }

        let kind = self.kind.to_string();
        let target = &self.target;
        fmt!(f, kind.as_str() " " target);

        match (&self.on, self.kind) {
            (None, stmt::JoinKind::Cross) => {}
            (Some(_), stmt::JoinKind::Cross) => {
                return Err(Error::invalid_statement("CROSS JOIN takes no join condition"))
            }
            (None, _) => {
                return Err(Error::invalid_statement(format!(
                    "{kind} on `{}` needs a join condition",
                    self.target.qualifier()
                )))
            }
            (Some(on), _) => f.in_clause(Clause::Filter, |f| {
                fmt!(f, " ON " on);
                Ok(())
            })?,
        }

        Ok(())
    }
}

impl ToSql for &stmt::Lock {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) -> Result<()> {
        if f.serializer.is_sqlite() {
            log::debug!("SQLite has no row locks; ignoring {:?}", self.mode);
            return Ok(());
        }

        match self.mode {
            stmt::LockMode::Update => fmt!(f, " FOR UPDATE"),
            stmt::LockMode::Share => fmt!(f, " FOR SHARE"),
        }

        match self.wait {
            stmt::LockWait::Wait => {}
            stmt::LockWait::NoWait => fmt!(f, " NOWAIT"),
            stmt::LockWait::SkipLocked => fmt!(f, " SKIP LOCKED"),
        }

        Ok(())
    }
}

impl ToSql for &stmt::Insert {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) -> Result<()> {
        let ignore = match &self.on_conflict {
            Some(on_conflict) if f.serializer.is_mysql() && on_conflict.is_nothing() => "IGNORE ",
            _ => "",
        };

        fmt!(f, "INSERT " ignore "INTO " Ident(&self.table));

        let scope = Scope::table(f.serializer, &self.table);

        f.in_scope(scope, |f| {
            match &self.source {
                stmt::InsertSource::Values(rows) => values(f, self, rows)?,
                stmt::InsertSource::Query(query) => {
                    fmt!(f, " (" Comma(self.columns.iter().map(Ident)) ") ");

                    // SQLite cannot tell `ON CONFLICT` from a join constraint
                    // after a bare SELECT.
                    let query = &**query;

                    if f.serializer.is_sqlite() && self.on_conflict.is_some() {
                        fmt!(f, "SELECT * FROM (" query ") AS " Ident(query.qualifier()) " WHERE true");
                    } else {
                        fmt!(f, query);
                    }
                }
            }

            if let Some(on_conflict) = &self.on_conflict {
                fmt!(f, on_conflict);
            }

            returning(f, self.returning.as_deref())
        })
    }
}

fn values<P: Params>(f: &mut Formatter<'_, P>, insert: &stmt::Insert, rows: &[Vec<Expr>]) -> Result<()> {
    if rows.is_empty() {
        return Err(Error::invalid_statement(format!(
            "insert into `{}` has no rows",
            insert.table
        )));
    }

    if let Some(row) = rows.iter().find(|row| row.len() != insert.columns.len()) {
        return Err(Error::invalid_statement(format!(
            "insert into `{}` names {} columns but a row has {} values",
            insert.table,
            insert.columns.len(),
            row.len()
        )));
    }

    if insert.columns.is_empty() {
        if rows.len() > 1 {
            return Err(Error::invalid_statement(
                "inserting several rows of defaults is not supported",
            ));
        }

        match f.serializer.flavor {
            Flavor::Mysql => fmt!(f, " () VALUES ()"),
            Flavor::Postgresql | Flavor::Sqlite => fmt!(f, " DEFAULT VALUES"),
        }
        return Ok(());
    }

    fmt!(f, " (" Comma(insert.columns.iter().map(Ident)) ") VALUES ");

    f.in_clause(Clause::Values, |f| {
        let rows = rows.iter().map(|row| ("(", Comma(row), ")"));
        fmt!(f, Comma(rows));
        Ok(())
    })
}

impl ToSql for &stmt::OnConflict {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) -> Result<()> {
        let assignments = match &self.action {
            stmt::ConflictAction::Update(assignments) if !assignments.is_empty() => {
                Some(assignments)
            }
            _ => None,
        };

        match (f.serializer.flavor, assignments) {
            // Rendered as `INSERT IGNORE`
            (Flavor::Mysql, None) => {}
            (Flavor::Mysql, Some(assignments)) => {
                f.in_clause(Clause::Values, |f| {
                    fmt!(f, " ON DUPLICATE KEY UPDATE " Comma(assignments));
                    Ok(())
                })?;
            }
            (_, None) if self.target.is_empty() => fmt!(f, " ON CONFLICT DO NOTHING"),
            (_, None) => {
                fmt!(f, " ON CONFLICT (" Comma(self.target.iter().map(Ident)) ") DO NOTHING")
            }
            (_, Some(_)) if self.target.is_empty() => {
                return Err(Error::invalid_statement(
                    "an upsert that updates needs a conflict target",
                ))
            }
            (_, Some(assignments)) => {
                fmt!(f, " ON CONFLICT (" Comma(self.target.iter().map(Ident)) ") DO UPDATE SET ");
                f.in_clause(Clause::Values, |f| {
                    fmt!(f, Comma(assignments));
                    Ok(())
                })?;
            }
        }

        Ok(())
    }
}

impl ToSql for &stmt::Assignment {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) -> Result<()> {
        let value = &self.value;
        fmt!(f, Ident(&self.column) " = " value);
        Ok(())
    }
}

fn returning<P: Params>(f: &mut Formatter<'_, P>, returning: Option<&[Expr]>) -> Result<()> {
    let Some(returning) = returning else {
        return Ok(());
    };

    if f.serializer.is_mysql() {
        return Err(Error::unsupported_feature("MySQL does not support RETURNING"));
    }

    f.in_clause(Clause::Projection, |f| {
        if returning.is_empty() {
            fmt!(f, " RETURNING *");
        } else {
            fmt!(f, " RETURNING " Comma(returning));
        }
        Ok(())
    })
}

impl ToSql for &stmt::Update {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) -> Result<()> {
        if self.assignments.is_empty() {
            return Err(Error::invalid_statement(format!(
                "update of `{}` assigns nothing",
                self.table
            )));
        }

        let scope = Scope::table(f.serializer, &self.table);

        f.in_scope(scope, |f| {
            fmt!(f, "UPDATE " Ident(&self.table) " SET ");

            f.in_clause(Clause::Values, |f| {
                fmt!(f, Comma(&self.assignments));
                Ok(())
            })?;

            where_clause(f, self.filter.as_ref())?;
            returning(f, self.returning.as_deref())
        })
    }
}

impl ToSql for &stmt::Delete {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) -> Result<()> {
        let scope = Scope::table(f.serializer, &self.table);

        f.in_scope(scope, |f| {
            fmt!(f, "DELETE FROM " Ident(&self.table));
            where_clause(f, self.filter.as_ref())?;
            returning(f, self.returning.as_deref())
        })
    }
}

fn where_clause<P: Params>(f: &mut Formatter<'_, P>, filter: Option<&Expr>) -> Result<()> {
    match filter {
        Some(filter) if !filter.is_true() => f.in_clause(Clause::Filter, |f| {
            fmt!(f, " WHERE " filter);
            Ok(())
        }),
        _ => Ok(()),
    }
}
