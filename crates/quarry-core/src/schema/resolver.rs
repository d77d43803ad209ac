use super::{
    naming, Association, AssociationConfig, AssociationKind, Cardinality, DeclaredKind, ForeignKey,
    Schema, SchemaConfig, Through,
};
use crate::{Error, Result};

use indexmap::IndexMap;

/// Attributes that do not make a table more than a join table.
const INCIDENTAL_ATTRIBUTES: &[&str] = &["id", "created_at", "updated_at", "inserted_at"];

/// Derives every relation's associations from foreign keys, then applies
/// explicit declarations on top.
///
/// The result is deterministic: relations are visited in name order and
/// each relation's associations are sorted by name.
pub fn resolve(
    schemas: &IndexMap<String, Schema>,
    config: &SchemaConfig,
) -> Result<IndexMap<String, IndexMap<String, Association>>> {
    let mut resolver = Resolver {
        schemas,
        config,
        inferred: IndexMap::new(),
    };

    let mut names: Vec<_> = schemas.keys().collect();
    names.sort();

    for name in &names {
        let schema = &schemas[*name];
        for foreign_key in &schema.foreign_keys {
            resolver.infer_foreign_key(schema, foreign_key)?;
        }

        if let Some([a, b]) = join_table(schema) {
            resolver.infer_many_to_many(schema, a, b);
        }
    }

    let mut out = IndexMap::new();

    for name in names {
        let mut associations = IndexMap::new();

        // Inferred names that collide are renamed after the join relation
        // they go through, or else the foreign key column that produced them.
        let mut counts = IndexMap::<String, usize>::new();
        for (association, _) in resolver.inferred.get(name).into_iter().flatten() {
            *counts.entry(association.name.clone()).or_default() += 1;
        }

        for (mut association, column) in resolver.inferred.shift_remove(name).unwrap_or_default() {
            if counts[&association.name] > 1 {
                let via = match &association.through {
                    Some(through) => through.relation.clone(),
                    None => naming::many_to_one_name(&column, &association.target),
                };
                let renamed = format!("{}_via_{via}", association.name);
                log::trace!(
                    "association {}.{} is ambiguous; renamed to {renamed}",
                    name,
                    association.name
                );
                association.name = renamed;
            }

            if associations.contains_key(&association.name) {
                return Err(Error::ambiguous_association(
                    name.as_str(),
                    format!(
                        "inferred association `{}` is not unique; declare it explicitly",
                        association.name
                    ),
                ));
            }
            associations.insert(association.name.clone(), association);
        }

        if let Some(relation) = config.relation(name) {
            for declared in &relation.associations {
                let association = resolver.declare(&schemas[name], declared)?;

                // A declaration replaces the inferred association it
                // describes, whatever that one was named.
                associations.retain(|_, inferred: &mut Association| {
                    !(inferred.target == association.target
                        && inferred.keys == association.keys
                        && inferred.through == association.through)
                });
                log::trace!("association {}.{} declared", name, association.name);
                associations.insert(association.name.clone(), association);
            }
        }

        associations.sort_keys();
        out.insert(name.clone(), associations);
    }

    Ok(out)
}

struct Resolver<'a> {
    schemas: &'a IndexMap<String, Schema>,
    config: &'a SchemaConfig,

    /// Inferred associations per relation, with the foreign key column
    /// that produced each (used to disambiguate names)
    inferred: IndexMap<String, Vec<(Association, String)>>,
}

impl Resolver<'_> {
    fn push(&mut self, association: Association, column: &str) {
        log::trace!(
            "inferred {:?} association {}.{} -> {}",
            association.kind,
            association.source,
            association.name,
            association.target
        );
        self.inferred
            .entry(association.source.clone())
            .or_default()
            .push((association, column.to_string()));
    }

    fn infer_foreign_key(&mut self, schema: &Schema, foreign_key: &ForeignKey) -> Result<()> {
        let Some(target) = self.schemas.get(&foreign_key.target) else {
            log::trace!(
                "foreign key {}.{:?} references unknown relation {}; skipped",
                schema.name,
                foreign_key.source,
                foreign_key.target
            );
            return Ok(());
        };

        let target_attributes = if foreign_key.target_attributes.is_empty() {
            target.primary_key.clone()
        } else {
            foreign_key.target_attributes.clone()
        };

        if target_attributes.len() != foreign_key.source.len() {
            log::warn!(
                "foreign key {}.{:?} does not match the key of {}; skipped",
                schema.name,
                foreign_key.source,
                target.name
            );
            return Ok(());
        }

        let forward: Vec<(String, String)> = foreign_key
            .source
            .iter()
            .cloned()
            .zip(target_attributes.iter().cloned())
            .collect();
        let backward: Vec<(String, String)> =
            forward.iter().map(|(s, t)| (t.clone(), s.clone())).collect();

        let column = foreign_key.source[0].clone();

        if target.name == schema.name {
            let Some(config) = self.config.self_reference(&schema.name, &foreign_key.source) else {
                return Err(Error::ambiguous_association(
                    &schema.name,
                    format!(
                        "self-referencing foreign key ({}) needs an explicit alias",
                        foreign_key.source.join(", ")
                    ),
                ));
            };

            self.push(
                Association {
                    name: config.alias.clone(),
                    kind: AssociationKind::SelfReferencing(Cardinality::One),
                    source: schema.name.clone(),
                    target: schema.name.clone(),
                    keys: forward,
                    through: None,
                    view: None,
                    conditions: vec![],
                    alias: Some(config.alias.clone()),
                },
                &column,
            );

            if let Some(inverse) = &config.inverse {
                self.push(
                    Association {
                        name: inverse.clone(),
                        kind: AssociationKind::SelfReferencing(Cardinality::Many),
                        source: schema.name.clone(),
                        target: schema.name.clone(),
                        keys: backward,
                        through: None,
                        view: None,
                        conditions: vec![],
                        alias: Some(inverse.clone()),
                    },
                    &column,
                );
            }

            return Ok(());
        }

        let name = if foreign_key.is_composite() {
            naming::singularize(&target.name)
        } else {
            naming::many_to_one_name(&column, &target.name)
        };

        self.push(
            Association {
                name,
                kind: AssociationKind::ManyToOne,
                source: schema.name.clone(),
                target: target.name.clone(),
                keys: forward,
                through: None,
                view: None,
                conditions: vec![],
                alias: None,
            },
            &column,
        );

        let (kind, name) = if schema.is_unique(&foreign_key.source) {
            (AssociationKind::OneToOne, naming::singularize(&schema.name))
        } else {
            (AssociationKind::OneToMany, schema.name.clone())
        };

        self.push(
            Association {
                name,
                kind,
                source: target.name.clone(),
                target: schema.name.clone(),
                keys: backward,
                through: None,
                view: None,
                conditions: vec![],
                alias: None,
            },
            &column,
        );

        Ok(())
    }

    fn infer_many_to_many(&mut self, join: &Schema, a: &ForeignKey, b: &ForeignKey) {
        for (from, to) in [(a, b), (b, a)] {
            let (Some(source), Some(target)) =
                (self.schemas.get(&from.target), self.schemas.get(&to.target))
            else {
                continue;
            };

            let (Some(source_keys), Some(target_keys)) =
                (key_pairs(source, from, true), key_pairs(target, to, false))
            else {
                continue;
            };

            self.push(
                Association {
                    name: target.name.clone(),
                    kind: AssociationKind::ManyToMany,
                    source: source.name.clone(),
                    target: target.name.clone(),
                    keys: source_keys,
                    through: Some(Through {
                        relation: join.name.clone(),
                        keys: target_keys,
                    }),
                    view: None,
                    conditions: vec![],
                    alias: None,
                },
                &from.source[0],
            );
        }
    }

    fn declare(&self, schema: &Schema, declared: &AssociationConfig) -> Result<Association> {
        let Some(target) = self.schemas.get(&declared.target) else {
            return Err(Error::invalid_schema(format!(
                "association {}.{} targets unknown relation `{}`",
                schema.name, declared.name, declared.target
            )));
        };

        let self_referencing = target.name == schema.name;

        if self_referencing && declared.alias.is_none() {
            return Err(Error::ambiguous_association(
                &schema.name,
                format!("self-referencing association `{}` needs an alias", declared.name),
            ));
        }

        let (keys, through) = match (declared.kind, &declared.through) {
            (DeclaredKind::ManyToMany | DeclaredKind::OneToOneThrough, None) => {
                return Err(Error::invalid_schema(format!(
                    "association {}.{} needs a `through` relation",
                    schema.name, declared.name
                )))
            }
            (DeclaredKind::ManyToMany | DeclaredKind::OneToOneThrough, Some(through)) => {
                let Some(join) = self.schemas.get(through) else {
                    return Err(Error::invalid_schema(format!(
                        "association {}.{} goes through unknown relation `{through}`",
                        schema.name, declared.name
                    )));
                };

                let keys = match &declared.keys[..] {
                    [] => self.keys_between(join, schema, true, declared)?,
                    keys => keys.to_vec(),
                };
                let through_keys = match &declared.through_keys[..] {
                    [] => self.keys_between(join, target, false, declared)?,
                    keys => keys.to_vec(),
                };

                (
                    keys,
                    Some(Through {
                        relation: join.name.clone(),
                        keys: through_keys,
                    }),
                )
            }
            (DeclaredKind::ManyToOne, _) => match &declared.keys[..] {
                [] => (self.keys_between(schema, target, false, declared)?, None),
                keys => (keys.to_vec(), None),
            },
            (DeclaredKind::OneToMany | DeclaredKind::OneToOne, _) => match &declared.keys[..] {
                [] => (self.keys_between(target, schema, true, declared)?, None),
                keys => (keys.to_vec(), None),
            },
        };

        let kind = match declared.kind {
            DeclaredKind::ManyToOne | DeclaredKind::OneToOne if self_referencing => {
                AssociationKind::SelfReferencing(Cardinality::One)
            }
            DeclaredKind::OneToMany | DeclaredKind::ManyToMany if self_referencing => {
                AssociationKind::SelfReferencing(Cardinality::Many)
            }
            DeclaredKind::OneToMany => AssociationKind::OneToMany,
            DeclaredKind::ManyToOne => AssociationKind::ManyToOne,
            DeclaredKind::OneToOne => AssociationKind::OneToOne,
            DeclaredKind::OneToOneThrough => AssociationKind::OneToOneThrough,
            DeclaredKind::ManyToMany => AssociationKind::ManyToMany,
        };

        Ok(Association {
            name: declared.name.clone(),
            kind,
            source: schema.name.clone(),
            target: target.name.clone(),
            keys,
            through,
            view: declared.view.clone(),
            conditions: declared.conditions(),
            alias: declared.alias.clone(),
        })
    }

    /// Key pairs of the single foreign key from `referencing` to
    /// `referenced`, oriented from `referenced` when `reversed`.
    fn keys_between(
        &self,
        referencing: &Schema,
        referenced: &Schema,
        reversed: bool,
        declared: &AssociationConfig,
    ) -> Result<Vec<(String, String)>> {
        let mut candidates = referencing
            .foreign_keys
            .iter()
            .filter(|fk| fk.target == referenced.name);

        match (candidates.next(), candidates.next()) {
            (Some(fk), None) => key_pairs(referenced, fk, reversed).ok_or_else(|| {
                Error::invalid_schema(format!(
                    "foreign key of `{}` does not match the key of `{}`",
                    referencing.name, referenced.name
                ))
            }),
            (None, _) => Err(Error::invalid_schema(format!(
                "association `{}`: no foreign key from `{}` to `{}`; declare `keys`",
                declared.name, referencing.name, referenced.name
            ))),
            (Some(_), Some(_)) => Err(Error::ambiguous_association(
                &referencing.name,
                format!(
                    "association `{}`: several foreign keys reference `{}`; declare `keys`",
                    declared.name, referenced.name
                ),
            )),
        }
    }
}

/// Pairs a foreign key's columns with the referenced attributes. With
/// `reversed`, pairs are `(referenced, referencing)`.
fn key_pairs(referenced: &Schema, fk: &ForeignKey, reversed: bool) -> Option<Vec<(String, String)>> {
    let target_attributes = if fk.target_attributes.is_empty() {
        &referenced.primary_key
    } else {
        &fk.target_attributes
    };

    if target_attributes.len() != fk.source.len() || target_attributes.is_empty() {
        return None;
    }

    Some(
        fk.source
            .iter()
            .zip(target_attributes)
            .map(|(s, t)| {
                if reversed {
                    (t.clone(), s.clone())
                } else {
                    (s.clone(), t.clone())
                }
            })
            .collect(),
    )
}

/// A join table has exactly two foreign keys, to two distinct other
/// relations, and no attributes beyond their columns and bookkeeping.
fn join_table(schema: &Schema) -> Option<[&ForeignKey; 2]> {
    let [a, b] = &schema.foreign_keys[..] else {
        return None;
    };

    if a.target == b.target || a.target == schema.name || b.target == schema.name {
        return None;
    }

    let significant = schema.attribute_names().any(|name| {
        !a.source.iter().any(|s| s == name)
            && !b.source.iter().any(|s| s == name)
            && !INCIDENTAL_ATTRIBUTES.contains(&name)
    });

    (!significant).then_some([a, b])
}
