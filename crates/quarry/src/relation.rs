mod batch;
mod command;
mod read;
mod restrict;

use crate::{Db, Result};

use quarry_core::{
    driver::Compiled,
    schema::Schema,
    stmt::{Expr, Join, JoinKind, Lock, OrderByExpr, QuerySpec, SetOp, Source},
    Error,
};

use std::sync::Arc;

/// A lazily built query over one table, view or raw SQL source.
///
/// Every builder method returns a new relation and leaves `self` as it was,
/// so a relation can serve as the base of any number of diverging queries.
/// Nothing touches the database until a reading method or command runs.
#[derive(Debug, Clone)]
pub struct Relation {
    pub(crate) db: Db,

    /// Catalog name of the relation; the alias for raw SQL relations
    pub(crate) name: String,

    pub(crate) spec: QuerySpec,
}

impl Relation {
    pub(crate) fn new(db: Db, name: String, spec: QuerySpec) -> Relation {
        Relation { db, name, spec }
    }

    pub(crate) fn with_spec(&self, spec: QuerySpec) -> Relation {
        Relation {
            db: self.db.clone(),
            name: self.name.clone(),
            spec,
        }
    }

    fn map(&self, f: impl FnOnce(QuerySpec) -> QuerySpec) -> Relation {
        self.with_spec(f(self.spec.clone()))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn db(&self) -> &Db {
        &self.db
    }

    pub fn spec(&self) -> &QuerySpec {
        &self.spec
    }

    /// The relation's schema. Raw SQL relations have none.
    pub fn schema(&self) -> Result<&Arc<Schema>> {
        self.db.catalog().get(&self.name)
    }

    /// The name columns of this relation are qualified with.
    pub fn qualifier(&self) -> &str {
        self.spec.qualifier()
    }

    /// A qualified reference to an attribute of this relation.
    pub fn attr(&self, name: &str) -> Result<Expr> {
        let schema = self.schema()?;

        if !schema.has_attribute(name) {
            return Err(Error::unbound_reference(format!("{}.{name}", self.name)));
        }

        Ok(Expr::qualified(self.qualifier(), name))
    }

    /// Replaces the projection.
    pub fn select<T: Into<Expr>>(&self, exprs: impl IntoIterator<Item = T>) -> Relation {
        self.map(|spec| spec.select(exprs))
    }

    pub fn project<T: Into<Expr>>(&self, exprs: impl IntoIterator<Item = T>) -> Relation {
        self.select(exprs)
    }

    pub fn select_append<T: Into<Expr>>(&self, exprs: impl IntoIterator<Item = T>) -> Relation {
        self.map(|spec| spec.select_append(exprs))
    }

    /// Restricts the relation to rows matching `predicate`. Successive
    /// restrictions are conjoined.
    pub fn filter(&self, predicate: impl Into<Expr>) -> Relation {
        self.map(|spec| spec.filter(predicate))
    }

    /// Restricts the relation to rows not matching `predicate`.
    pub fn exclude(&self, predicate: impl Into<Expr>) -> Relation {
        self.filter(Expr::not(predicate.into()))
    }

    pub fn having(&self, predicate: impl Into<Expr>) -> Relation {
        self.map(|spec| spec.having(predicate))
    }

    /// Replaces the ordering.
    pub fn order<T: Into<OrderByExpr>>(&self, exprs: impl IntoIterator<Item = T>) -> Relation {
        self.map(|spec| spec.order_by(exprs))
    }

    pub fn order_append<T: Into<OrderByExpr>>(&self, exprs: impl IntoIterator<Item = T>) -> Relation {
        self.map(|spec| spec.order_append(exprs))
    }

    /// Flips every ordering term. An unordered relation is first ordered
    /// by its primary key.
    pub fn reverse(&self) -> Relation {
        let spec = self.ordered_spec();
        self.with_spec(spec.reverse())
    }

    pub fn group<T: Into<Expr>>(&self, exprs: impl IntoIterator<Item = T>) -> Relation {
        self.map(|spec| spec.group_by(exprs))
    }

    /// Inner joins the target of the named association.
    pub fn join(&self, association: &str) -> Result<Relation> {
        self.join_association(association, JoinKind::Inner)
    }

    pub fn left_join(&self, association: &str) -> Result<Relation> {
        self.join_association(association, JoinKind::Left)
    }

    /// Joins the target of the named association. Columns of the joined
    /// query are qualified by relation in the compiled SQL.
    pub fn join_association(&self, association: &str, kind: JoinKind) -> Result<Relation> {
        let association = self.db.catalog().association(&self.name, association)?;
        let plan = association.join_plan(self.qualifier(), kind);

        Ok(self.map(|spec| plan.joins.into_iter().fold(spec, QuerySpec::join)))
    }

    /// The rows of the named association's target related to any row of
    /// this relation. The source query runs inside the database as a
    /// subquery.
    pub fn related(&self, association: &str) -> Result<Relation> {
        let association = self.db.catalog().association(&self.name, association)?;
        let spec = association.related(&self.spec);

        Ok(Relation::new(self.db.clone(), association.target.clone(), spec))
    }

    /// Joins `target` on an explicit predicate, bypassing associations.
    pub fn join_on(&self, target: impl Into<Source>, kind: JoinKind, on: impl Into<Expr>) -> Relation {
        let join = Join::new(target, kind, on);
        self.map(|spec| spec.join(join))
    }

    pub fn cross_join(&self, target: impl Into<Source>) -> Relation {
        let join = Join::cross(target);
        self.map(|spec| spec.join(join))
    }

    /// Rows of either relation, without duplicates. Clauses added afterwards
    /// apply to the combined rows.
    pub fn union(&self, other: &Relation) -> Relation {
        self.set_operation(SetOp::Union, false, other)
    }

    pub fn union_all(&self, other: &Relation) -> Relation {
        self.set_operation(SetOp::Union, true, other)
    }

    pub fn intersect(&self, other: &Relation) -> Relation {
        self.set_operation(SetOp::Intersect, false, other)
    }

    pub fn except(&self, other: &Relation) -> Relation {
        self.set_operation(SetOp::Except, false, other)
    }

    fn set_operation(&self, op: SetOp, all: bool, other: &Relation) -> Relation {
        let query = other.spec.clone();

        self.map(|spec| {
            // Ordering and paging of the left operand stay with its own rows
            let spec = if spec.order_by.is_empty()
                && spec.limit.is_none()
                && spec.offset.is_none()
                && spec.set_ops.is_empty()
            {
                spec
            } else {
                spec.from_self()
            };

            spec.set_op(op, all, query).from_self()
        })
    }

    pub fn limit(&self, limit: u64) -> Relation {
        self.map(|spec| spec.limit(limit))
    }

    pub fn offset(&self, offset: u64) -> Relation {
        self.map(|spec| spec.offset(offset))
    }

    pub fn distinct(&self) -> Relation {
        self.map(QuerySpec::distinct)
    }

    /// Drops every `WHERE` and `HAVING` restriction.
    pub fn unfiltered(&self) -> Relation {
        self.map(QuerySpec::unfiltered)
    }

    pub fn unordered(&self) -> Relation {
        self.map(QuerySpec::unordered)
    }

    /// Locks the selected rows. SQLite has no row locks and ignores it.
    pub fn lock(&self, lock: Lock) -> Relation {
        self.map(|spec| spec.lock(lock))
    }

    /// Qualifies every column reference, even without joins.
    pub fn qualified(&self) -> Relation {
        self.map(QuerySpec::qualified)
    }

    /// Projects every output column as `{prefix}_{name}`.
    pub fn prefix(&self, prefix: &str) -> Result<Relation> {
        let projection = self
            .projection()?
            .into_iter()
            .map(|expr| match expr.output_name() {
                Some(name) => {
                    let alias = format!("{prefix}_{name}");
                    expr.alias(alias)
                }
                None => expr,
            })
            .collect::<Vec<_>>();

        Ok(self.select(projection))
    }

    /// Projects the output columns named in `names` under new names. Other
    /// columns keep theirs.
    pub fn rename<K, V>(&self, names: impl IntoIterator<Item = (K, V)>) -> Result<Relation>
    where
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut projection = self.projection()?;

        for (from, to) in names {
            let from = from.as_ref();
            let Some(position) = projection.iter().position(|e| e.output_name() == Some(from)) else {
                return Err(Error::unbound_reference(format!("{}.{from}", self.name)));
            };

            let expr = projection.remove(position);
            projection.insert(position, expr.alias(to));
        }

        Ok(self.select(projection))
    }

    /// The current projection with the default spelled out as qualified
    /// attributes.
    fn projection(&self) -> Result<Vec<Expr>> {
        if !self.spec.projection.is_empty() {
            return Ok(self.spec.projection.clone());
        }

        let schema = self.schema()?;
        let qualifier = self.qualifier();

        Ok(schema
            .attribute_names()
            .map(|name| Expr::qualified(qualifier, name))
            .collect())
    }

    /// The ordering, defaulting to the primary key when there is none.
    fn ordered_spec(&self) -> QuerySpec {
        if !self.spec.order_by.is_empty() {
            return self.spec.clone();
        }

        let Ok(schema) = self.schema() else {
            return self.spec.clone();
        };

        let qualifier = self.qualifier();
        let order: Vec<OrderByExpr> = schema
            .primary_key
            .iter()
            .map(|key| Expr::qualified(qualifier, &key[..]).asc())
            .collect();

        self.spec.clone().order_by(order)
    }

    /// Compiles the relation's query.
    pub fn compile(&self) -> Result<Compiled> {
        self.db.serializer().compile_query(&self.spec)
    }

    /// The SQL text of the relation's query, parameters left as
    /// placeholders.
    pub fn to_sql(&self) -> Result<String> {
        Ok(self.compile()?.sql)
    }
}
