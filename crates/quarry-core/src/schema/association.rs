use crate::stmt::{Expr, Join, JoinKind, QuerySpec, Source, Value};

/// A relationship between two relations, derived from foreign keys or
/// declared explicitly.
#[derive(Debug, Clone, PartialEq)]
pub struct Association {
    pub name: String,

    pub kind: AssociationKind,

    /// The owning relation
    pub source: String,

    /// The associated relation
    pub target: String,

    /// Join keys as `(source attribute, target attribute)` pairs. For
    /// associations through a join table, the right-hand side names
    /// attributes of the join table instead.
    pub keys: Vec<(String, String)>,

    pub through: Option<Through>,

    /// A view (or other relation) read instead of the target table
    pub view: Option<String>,

    /// Additional equality conditions on target attributes
    pub conditions: Vec<(String, Value)>,

    /// Qualifier for the target when joined. Required to tell the two
    /// sides of a self-referencing association apart.
    pub alias: Option<String>,
}

/// The join table of a many-to-many or one-to-one-through association.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Through {
    pub relation: String,

    /// `(join table attribute, target attribute)` pairs
    pub keys: Vec<(String, String)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssociationKind {
    OneToMany,
    ManyToOne,

    /// A one-to-many association that yields at most one row
    OneToOne,

    /// One-to-many followed by many-to-one, flattened into a single hop
    /// that yields at most one row
    OneToOneThrough,

    ManyToMany,

    /// A relation associated with itself
    SelfReferencing(Cardinality),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cardinality {
    One,
    Many,
}

/// The joins that bring an association's target into a query.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinPlan {
    pub joins: Vec<Join>,

    /// Qualifier of the target in the joined query
    pub target_qualifier: String,
}

impl AssociationKind {
    /// `true` when the association yields at most one row per source row.
    pub fn is_singular(self) -> bool {
        matches!(
            self,
            Self::ManyToOne
                | Self::OneToOne
                | Self::OneToOneThrough
                | Self::SelfReferencing(Cardinality::One)
        )
    }

    /// One-to-one kinds are one-to-many kinds with an implicit `LIMIT 1`
    /// per source row.
    pub fn limits_to_one(self) -> bool {
        matches!(self, Self::OneToOne | Self::OneToOneThrough)
    }
}

impl Association {
    pub fn is_through(&self) -> bool {
        self.through.is_some()
    }

    /// The source a query over the target reads from.
    pub fn target_source(&self) -> Source {
        match (&self.view, &self.alias) {
            (Some(view), alias) => Source::aliased(view, alias.as_deref().unwrap_or(&self.target)),
            (None, Some(alias)) => Source::aliased(&self.target, alias),
            (None, None) => Source::table(&self.target),
        }
    }

    /// Qualifier of the target in joins and queries built from this
    /// association.
    pub fn target_qualifier(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.target)
    }

    /// Builds the joins from a source qualified as `source_qualifier` to
    /// the association's target.
    pub fn join_plan(&self, source_qualifier: &str, kind: JoinKind) -> JoinPlan {
        let target_qualifier = self.target_qualifier().to_string();
        let mut joins = vec![];

        let target_on = match &self.through {
            Some(through) => {
                joins.push(Join::new(
                    Source::table(&through.relation),
                    kind,
                    key_predicate(source_qualifier, &through.relation, &self.keys),
                ));
                key_predicate(&through.relation, &target_qualifier, &through.keys)
            }
            None => key_predicate(source_qualifier, &target_qualifier, &self.keys),
        };

        joins.push(Join::new(
            self.target_source(),
            kind,
            Expr::and(target_on, self.conditions_predicate(&target_qualifier)),
        ));

        JoinPlan {
            joins,
            target_qualifier,
        }
    }

    /// A query over the target rows associated with any row of `source`.
    ///
    /// Compiles to a semi-join (`IN (SELECT ..)`), so the source query is
    /// never materialized client-side. Over a source limited to one row,
    /// one-to-one kinds add `LIMIT 1`.
    pub fn related(&self, source: &QuerySpec) -> QuerySpec {
        let target_qualifier = self.target_qualifier().to_string();
        let source_qualifier = source.qualifier().to_string();

        let source_keys: Vec<_> = self.keys.iter().map(|(s, _)| s.clone()).collect();
        let mut inner = source.clone();
        inner.lock = None;

        // A paged source keeps the order its page is cut from
        let inner = if inner.limit.is_some() || inner.offset.is_some() {
            inner.from_self()
        } else {
            inner.unordered()
        };
        let inner = inner.select(
            source_keys
                .iter()
                .map(|key| Expr::qualified(&source_qualifier[..], &key[..])),
        );

        let predicate = match &self.through {
            Some(through) => {
                let link: Vec<_> = self.keys.iter().map(|(_, t)| t.clone()).collect();
                let through_query = QuerySpec::table(&through.relation[..])
                    .select(through.keys.iter().map(|(t, _)| Expr::col(&t[..])))
                    .filter(Expr::record(link.iter().map(|key| Expr::col(&key[..]))).in_subquery(inner));

                Expr::record(
                    through
                        .keys
                        .iter()
                        .map(|(_, target)| Expr::qualified(&target_qualifier[..], &target[..])),
                )
                .in_subquery(through_query)
            }
            None => Expr::record(
                self.keys
                    .iter()
                    .map(|(_, target)| Expr::qualified(&target_qualifier[..], &target[..])),
            )
            .in_subquery(inner),
        };

        let mut query = QuerySpec::new(self.target_source())
            .filter(Expr::and(predicate, self.conditions_predicate(&target_qualifier)));

        // The implicit limit is per source row
        if self.kind.limits_to_one() && source.limit == Some(1) {
            query = query.limit(1);
        }

        query
    }

    fn conditions_predicate(&self, qualifier: &str) -> Expr {
        Expr::and_from_vec(
            self.conditions
                .iter()
                .map(|(attribute, value)| {
                    let column = Expr::qualified(qualifier, &attribute[..]);
                    if value.is_null() {
                        column.is_null()
                    } else {
                        column.eq(value.clone())
                    }
                })
                .collect(),
        )
    }
}

fn key_predicate(lhs: &str, rhs: &str, keys: &[(String, String)]) -> Expr {
    Expr::and_from_vec(
        keys.iter()
            .map(|(l, r)| Expr::qualified(lhs, &l[..]).eq(Expr::qualified(rhs, &r[..])))
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parent() -> Association {
        Association {
            name: "parent".into(),
            kind: AssociationKind::SelfReferencing(Cardinality::One),
            source: "categories".into(),
            target: "categories".into(),
            keys: vec![("parent_id".into(), "id".into())],
            through: None,
            view: None,
            conditions: vec![],
            alias: Some("parent".into()),
        }
    }

    #[test]
    fn self_reference_join_uses_two_qualifiers() {
        let plan = parent().join_plan("categories", JoinKind::Inner);

        assert_eq!(plan.target_qualifier, "parent");
        assert_eq!(plan.joins.len(), 1);
        assert_eq!(plan.joins[0].target, Source::aliased("categories", "parent"));
        assert_eq!(
            plan.joins[0].on,
            Some(Expr::qualified("categories", "parent_id").eq(Expr::qualified("parent", "id")))
        );
    }

    #[test]
    fn through_join_plan_has_two_hops() {
        let tags = Association {
            name: "tags".into(),
            kind: AssociationKind::ManyToMany,
            source: "posts".into(),
            target: "tags".into(),
            keys: vec![("id".into(), "post_id".into())],
            through: Some(Through {
                relation: "posts_tags".into(),
                keys: vec![("tag_id".into(), "id".into())],
            }),
            view: None,
            conditions: vec![],
            alias: None,
        };

        let plan = tags.join_plan("posts", JoinKind::Left);
        assert_eq!(plan.joins.len(), 2);
        assert_eq!(plan.joins[0].target, Source::table("posts_tags"));
        assert_eq!(plan.joins[1].target, Source::table("tags"));
        assert_eq!(
            plan.joins[1].on,
            Some(Expr::qualified("posts_tags", "tag_id").eq(Expr::qualified("tags", "id")))
        );
    }

    #[test]
    fn one_to_one_related_is_limited() {
        let profile = Association {
            name: "profile".into(),
            kind: AssociationKind::OneToOne,
            source: "users".into(),
            target: "profiles".into(),
            keys: vec![("id".into(), "user_id".into())],
            through: None,
            view: None,
            conditions: vec![("active".into(), Value::Bool(true))],
            alias: None,
        };

        let related = profile.related(&QuerySpec::table("users").limit(1));
        assert_eq!(related.limit, Some(1));
        assert_eq!(related.source, Source::table("profiles"));
        assert!(related.filter.is_some());

        // Many users have many profiles, at most one each
        let related = profile.related(&QuerySpec::table("users"));
        assert_eq!(related.limit, None);

        let related = profile.related(&QuerySpec::table("users").limit(5));
        assert_eq!(related.limit, None);
    }
}
