use super::Relation;
use crate::Result;

use quarry_core::{
    stmt::{Expr, Value},
    Error,
};

impl Relation {
    /// Restricts the relation through one of the helpers derived from its
    /// non-partial indexes, named after the index attributes
    /// (`by_email`, `by_user_id_and_title`) or after the index itself.
    ///
    /// Takes one value per indexed attribute, in index order.
    pub fn restrict_by<T: Into<Value>>(
        &self,
        restriction: &str,
        values: impl IntoIterator<Item = T>,
    ) -> Result<Relation> {
        let schema = self.schema()?;

        let Some(index) = schema.restriction(restriction) else {
            return Err(Error::invalid_statement(format!(
                "`{}` has no restriction `{restriction}`",
                self.name
            )));
        };

        let values: Vec<Value> = values.into_iter().map(Into::into).collect();
        self.restrict_to(&index.attributes, values)
    }

    /// Names of the restriction helpers available on this relation.
    pub fn restrictions(&self) -> Result<Vec<String>> {
        Ok(self.schema()?.restriction_names().map(str::to_string).collect())
    }

    /// Conjoins `attribute = value` for each pair, binding values in their
    /// written representation.
    pub(super) fn restrict_to(&self, attributes: &[String], values: Vec<Value>) -> Result<Relation> {
        if attributes.len() != values.len() {
            return Err(Error::invalid_statement(format!(
                "expected {} values for ({}), got {}",
                attributes.len(),
                attributes.join(", "),
                values.len()
            )));
        }

        let schema = self.schema()?;
        let dialect = self.db.dialect();
        let qualifier = self.qualifier();

        let predicates = attributes
            .iter()
            .zip(values)
            .map(|(name, value)| {
                let attribute = schema
                    .attribute(name)
                    .ok_or_else(|| Error::unbound_reference(format!("{}.{name}", self.name)))?;
                let column = Expr::qualified(qualifier, &name[..]);

                Ok(match attribute.ty.write(value, dialect)? {
                    Value::Null => column.is_null(),
                    value => column.eq(value),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(self.filter(Expr::and_from_vec(predicates)))
    }
}
