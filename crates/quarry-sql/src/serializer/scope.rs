use super::Serializer;

use quarry_core::{
    stmt::{Expr, QuerySpec, Source},
    Error, Result,
};

/// The sources one query reads from, used to check and qualify column
/// references.
#[derive(Debug)]
pub(super) struct Scope {
    sources: Vec<ScopeSource>,

    /// Output names of the projection, referable from `ORDER BY` and
    /// `GROUP BY`
    aliases: Vec<String>,

    /// Qualify every column, even with a single source
    qualify: bool,
}

#[derive(Debug)]
struct ScopeSource {
    qualifier: String,

    /// Known columns. `None` when the source's shape is unknown (raw SQL,
    /// tables outside the catalog), in which case any column is accepted.
    columns: Option<Vec<String>>,
}

/// How a column reference is written once resolved.
#[derive(Debug, PartialEq)]
pub(super) enum Resolved {
    /// `"relation"."column"` or `"column"`
    Column(Option<String>),

    /// A projection alias, written bare
    Alias,
}

impl Scope {
    pub(super) fn query(serializer: &Serializer<'_>, query: &QuerySpec) -> Scope {
        let mut sources = vec![ScopeSource::new(serializer, &query.source)];
        sources.extend(
            query
                .joins
                .iter()
                .map(|join| ScopeSource::new(serializer, &join.target)),
        );

        Scope {
            sources,
            aliases: query
                .projection
                .iter()
                .filter_map(|expr| match expr {
                    Expr::Alias(alias) => Some(alias.alias.clone()),
                    _ => None,
                })
                .collect(),
            qualify: query.qualify,
        }
    }

    /// Scope of an `INSERT`, `UPDATE` or `DELETE` target.
    pub(super) fn table(serializer: &Serializer<'_>, table: &str) -> Scope {
        Scope {
            sources: vec![ScopeSource::new(serializer, &Source::table(table))],
            aliases: vec![],
            qualify: false,
        }
    }

    /// `true` when columns of this scope's sources must carry their
    /// relation qualifier.
    fn qualifies(&self) -> bool {
        self.qualify || self.sources.len() > 1
    }

    pub(super) fn contains(&self, qualifier: &str) -> bool {
        self.sources.iter().any(|source| source.qualifier == qualifier)
    }

    /// `true` when `*` should be written as `"qualifier".*`
    pub(super) fn qualifies_star(scopes: &[Scope]) -> bool {
        scopes.last().is_some_and(Scope::qualifies)
    }

    /// Resolves a column reference against the scope stack, innermost
    /// scope first.
    pub(super) fn resolve(
        scopes: &[Scope],
        relation: Option<&str>,
        name: &str,
        allow_alias: bool,
    ) -> Result<Resolved> {
        let Some(innermost) = scopes.len().checked_sub(1) else {
            return Ok(Resolved::Column(None));
        };

        if let Some(relation) = relation {
            for (depth, scope) in scopes.iter().enumerate().rev() {
                let Some(source) = scope.sources.iter().find(|s| s.qualifier == relation) else {
                    continue;
                };

                if !source.has(name).unwrap_or(true) {
                    return Err(Error::unbound_reference(format!("{relation}.{name}")));
                }

                return Ok(scope.write(source, depth != innermost));
            }

            return Err(Error::unbound_reference(format!("{relation}.{name}")));
        }

        for (depth, scope) in scopes.iter().enumerate().rev() {
            if depth == innermost
                && allow_alias
                && scope.aliases.iter().any(|alias| alias == name)
            {
                return Ok(Resolved::Alias);
            }

            let outer = depth != innermost;

            // The `FROM` source takes unqualified names first.
            let from = &scope.sources[0];
            if from.has(name).unwrap_or(true) {
                return Ok(scope.write(from, outer));
            }

            let joined = &scope.sources[1..];
            let mut matches = joined.iter().filter(|s| s.has(name) == Some(true));

            match (matches.next(), matches.next()) {
                (Some(source), None) => return Ok(scope.write(source, outer)),
                (Some(_), Some(_)) => {
                    return Err(Error::unbound_reference(format!(
                        "{name} (ambiguous between joined relations)"
                    )))
                }
                (None, _) => {}
            }

            if let Some(source) = joined.iter().find(|s| s.columns.is_none()) {
                return Ok(scope.write(source, outer));
            }
        }

        Err(Error::unbound_reference(name))
    }

    fn write(&self, source: &ScopeSource, outer: bool) -> Resolved {
        if outer || self.qualifies() {
            Resolved::Column(Some(source.qualifier.clone()))
        } else {
            Resolved::Column(None)
        }
    }
}

impl ScopeSource {
    fn new(serializer: &Serializer<'_>, source: &Source) -> ScopeSource {
        ScopeSource {
            qualifier: source.qualifier().to_string(),
            columns: columns(serializer, source),
        }
    }

    fn has(&self, name: &str) -> Option<bool> {
        self.columns
            .as_ref()
            .map(|columns| columns.iter().any(|column| column == name))
    }
}

/// Columns a source exposes, when they can be known without running it.
pub(super) fn columns(serializer: &Serializer<'_>, source: &Source) -> Option<Vec<String>> {
    match source {
        Source::Table(table) => serializer
            .catalog
            .schema(&table.name)
            .map(|schema| schema.attribute_names().map(str::to_string).collect()),
        Source::Query(query) => output_columns(serializer, &query.query),
        Source::Raw(_) => None,
    }
}

fn output_columns(serializer: &Serializer<'_>, query: &QuerySpec) -> Option<Vec<String>> {
    if query.projection.is_empty() {
        return if query.joins.is_empty() {
            columns(serializer, &query.source)
        } else {
            None
        };
    }

    query
        .projection
        .iter()
        .map(|expr| expr.output_name().map(str::to_string))
        .collect()
}
