use super::Relation;
use crate::Result;

use quarry_core::{
    stmt::{Expr, QuerySpec, Statement, Value},
    Error,
};
use tokio_stream::Stream;

impl Relation {
    /// Splits the relation into consecutive batches of at most `size` rows.
    ///
    /// Batches are keyed on the single-column primary key: each one is a
    /// relation over a half-open key range `(after, upper]`, ordered by key,
    /// so every row is yielded exactly once even when rows are modified
    /// between batches. Key boundaries are fetched lazily, one batch ahead
    /// of the consumer.
    pub fn each_batch(&self, size: u64) -> impl Stream<Item = Result<Relation>> + Send + 'static {
        let relation = self.clone();

        async_stream::try_stream! {
            let key = relation.batch_key(size)?;

            let mut base = relation.spec.clone();
            base.lock = None;
            let base = if base.is_shaped() { base.from_self() } else { base.unordered() };

            let key = Expr::qualified(base.qualifier(), key);
            let mut after: Option<Value> = None;
            let mut batches = 0;

            loop {
                let range = |spec: QuerySpec| match &after {
                    Some(after) => spec.filter(key.clone().gt(after.clone())),
                    None => spec,
                };

                let keys = range(base.clone())
                    .select([key.clone()])
                    .order_by([key.clone().asc()])
                    .limit(size);

                let response = relation.db.execute(&Statement::Query(keys)).await?;
                let keys: Vec<Value> = response
                    .rows
                    .into_values()?
                    .into_iter()
                    .filter_map(|row| row.into_values().into_iter().next())
                    .collect();

                let Some(upper) = keys.last().cloned() else {
                    break;
                };

                let batch = range(base.clone())
                    .filter(key.clone().le(upper.clone()))
                    .order_by([key.clone().asc()]);

                batches += 1;
                yield relation.with_spec(batch);

                if (keys.len() as u64) < size {
                    break;
                }

                after = Some(upper);
            }

            log::debug!("batched `{}` into {batches} batches of up to {size}", relation.name);
        }
    }

    /// The attribute batches are keyed on.
    fn batch_key(&self, size: u64) -> Result<String> {
        if size == 0 {
            return Err(Error::invalid_statement("batch size must be positive"));
        }

        match self.schema()?.single_primary_key() {
            Some(key) => Ok(key.name.clone()),
            None => Err(Error::invalid_statement(format!(
                "batching `{}` requires a single-column primary key",
                self.name
            ))),
        }
    }
}
