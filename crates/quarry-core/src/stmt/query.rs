use super::*;

/// The accumulated, immutable state of a relation before compilation.
///
/// Builder methods consume the spec and return the derived one; callers
/// that keep using a spec clone it first, so a spec shared as the base of
/// several queries is never affected by any of them.
#[derive(Debug, Clone, PartialEq)]
pub struct QuerySpec {
    pub source: Source,

    /// Projected expressions. Empty projects every attribute of the source.
    pub projection: Vec<Expr>,

    /// Conjunction of `WHERE` predicates
    pub filter: Option<Expr>,

    pub joins: Vec<Join>,

    pub group_by: Vec<Expr>,

    /// Conjunction of `HAVING` predicates
    pub having: Option<Expr>,

    pub order_by: Vec<OrderByExpr>,

    pub limit: Option<u64>,

    pub offset: Option<u64>,

    /// Set operations applied after this query's own clauses
    pub set_ops: Vec<SetOperation>,

    pub distinct: bool,

    pub lock: Option<Lock>,

    /// Qualify every column reference, even with a single source
    pub qualify: bool,
}

impl QuerySpec {
    pub fn new(source: impl Into<Source>) -> Self {
        Self {
            source: source.into(),
            projection: vec![],
            filter: None,
            joins: vec![],
            group_by: vec![],
            having: None,
            order_by: vec![],
            limit: None,
            offset: None,
            set_ops: vec![],
            distinct: false,
            lock: None,
            qualify: false,
        }
    }

    pub fn table(name: impl Into<String>) -> Self {
        Self::new(Source::table(name))
    }

    /// A spec selecting everything from `query` used as a derived table.
    pub fn from_query(query: QuerySpec, alias: impl Into<String>) -> Self {
        Self::new(Source::query(query, alias))
    }

    /// A spec over caller-supplied SQL.
    pub fn raw(sql: impl Into<String>, params: Vec<Value>, alias: impl Into<String>) -> Self {
        Self::new(Source::Raw(SourceRaw {
            sql: sql.into(),
            params,
            alias: alias.into(),
        }))
    }

    /// The qualifier of the `FROM` source.
    pub fn qualifier(&self) -> &str {
        self.source.qualifier()
    }

    /// `true` when the query reads from more than one source.
    pub fn has_joins(&self) -> bool {
        !self.joins.is_empty()
    }

    /// `true` when nothing has been applied on top of the source.
    pub fn is_bare(&self) -> bool {
        *self == Self::new(self.source.clone())
    }

    /// `true` when the query limits, offsets, groups or combines rows, so
    /// that it cannot be extended without a derived table.
    pub fn is_shaped(&self) -> bool {
        self.limit.is_some()
            || self.offset.is_some()
            || !self.group_by.is_empty()
            || !self.set_ops.is_empty()
            || self.distinct
    }

    pub fn select<T: Into<Expr>>(self, exprs: impl IntoIterator<Item = T>) -> Self {
        Self {
            projection: exprs.into_iter().map(Into::into).collect(),
            ..self
        }
    }

    /// Adds to the projection. Appending to the default projection keeps
    /// every source attribute.
    pub fn select_append<T: Into<Expr>>(mut self, exprs: impl IntoIterator<Item = T>) -> Self {
        if self.projection.is_empty() {
            self.projection.push(Expr::star_of(self.qualifier().to_string()));
        }
        self.projection.extend(exprs.into_iter().map(Into::into));
        self
    }

    pub fn filter(mut self, predicate: impl Into<Expr>) -> Self {
        self.filter = Some(match self.filter.take() {
            Some(existing) => Expr::and(existing, predicate),
            None => predicate.into(),
        });
        self
    }

    pub fn having(mut self, predicate: impl Into<Expr>) -> Self {
        self.having = Some(match self.having.take() {
            Some(existing) => Expr::and(existing, predicate),
            None => predicate.into(),
        });
        self
    }

    /// Replaces the ordering.
    pub fn order_by<T: Into<OrderByExpr>>(self, exprs: impl IntoIterator<Item = T>) -> Self {
        Self {
            order_by: exprs.into_iter().map(Into::into).collect(),
            ..self
        }
    }

    pub fn order_append<T: Into<OrderByExpr>>(mut self, exprs: impl IntoIterator<Item = T>) -> Self {
        self.order_by.extend(exprs.into_iter().map(Into::into));
        self
    }

    /// Flips the direction of every ordering term.
    pub fn reverse(mut self) -> Self {
        self.order_by = self.order_by.into_iter().map(OrderByExpr::reverse).collect();
        self
    }

    pub fn group_by<T: Into<Expr>>(self, exprs: impl IntoIterator<Item = T>) -> Self {
        Self {
            group_by: exprs.into_iter().map(Into::into).collect(),
            ..self
        }
    }

    pub fn join(mut self, join: Join) -> Self {
        self.joins.push(join);
        self
    }

    pub fn limit(self, limit: u64) -> Self {
        Self {
            limit: Some(limit),
            ..self
        }
    }

    pub fn offset(self, offset: u64) -> Self {
        Self {
            offset: Some(offset),
            ..self
        }
    }

    pub fn distinct(self) -> Self {
        Self {
            distinct: true,
            ..self
        }
    }

    /// Drops every `WHERE` and `HAVING` predicate.
    pub fn unfiltered(self) -> Self {
        Self {
            filter: None,
            having: None,
            ..self
        }
    }

    pub fn unordered(self) -> Self {
        Self {
            order_by: vec![],
            ..self
        }
    }

    pub fn unlimited(self) -> Self {
        Self {
            limit: None,
            offset: None,
            ..self
        }
    }

    pub fn lock(self, lock: Lock) -> Self {
        Self {
            lock: Some(lock),
            ..self
        }
    }

    pub fn qualified(self) -> Self {
        Self {
            qualify: true,
            ..self
        }
    }

    pub fn set_op(mut self, op: SetOp, all: bool, query: QuerySpec) -> Self {
        self.set_ops.push(SetOperation { op, all, query });
        self
    }

    /// Wraps the query in a derived table named after its own source, so
    /// that clauses added afterwards apply to its result.
    pub fn from_self(self) -> Self {
        let alias = self.qualifier().to_string();
        Self::from_query(self, alias)
    }
}

impl From<Source> for QuerySpec {
    fn from(value: Source) -> Self {
        Self::new(value)
    }
}

impl From<&str> for QuerySpec {
    fn from(value: &str) -> Self {
        Self::table(value)
    }
}
