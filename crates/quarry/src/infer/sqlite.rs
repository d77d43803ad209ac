use super::{flag, group_by, opt_int, opt_string, string, ColumnInfo, ForeignKeyInfo, IndexInfo, Inferrer};
use crate::Result;

use quarry_core::stmt::Value;

const RELATIONS: &str = "\
SELECT name FROM sqlite_master \
WHERE type IN ('table', 'view') AND name NOT LIKE 'sqlite_%' \
ORDER BY name";

const KIND: &str = "SELECT type AS kind FROM sqlite_master WHERE type IN ('table', 'view') AND name = ?1";

const COLUMNS: &str = "\
SELECT name, type, \"notnull\" AS not_null, dflt_value, pk, hidden \
FROM pragma_table_xinfo(?1) \
ORDER BY cid";

const INDEXES: &str = "\
SELECT il.name AS name, il.\"unique\" AS is_unique, il.origin AS origin, il.partial AS partial, \
ii.name AS attribute, m.sql AS sql \
FROM pragma_index_list(?1) AS il \
JOIN pragma_index_info(il.name) AS ii \
LEFT JOIN sqlite_master AS m ON m.type = 'index' AND m.name = il.name \
ORDER BY il.name, ii.seqno";

const FOREIGN_KEYS: &str = "\
SELECT id, \"table\" AS target, \"from\" AS attribute, \"to\" AS target_attribute \
FROM pragma_foreign_key_list(?1) \
ORDER BY id, seq";

pub(super) async fn relations(inferrer: &Inferrer<'_>) -> Result<Vec<String>> {
    inferrer
        .query(RELATIONS, vec![])
        .await?
        .iter()
        .map(|row| string(row, "name"))
        .collect()
}

pub(super) async fn kind(inferrer: &Inferrer<'_>, name: &str) -> Result<Option<bool>> {
    let rows = inferrer.query(KIND, vec![Value::from(name)]).await?;

    match rows.first() {
        Some(row) => Ok(Some(string(row, "kind")? == "view")),
        None => Ok(None),
    }
}

pub(super) async fn columns(inferrer: &Inferrer<'_>, name: &str) -> Result<Vec<ColumnInfo>> {
    let rows = inferrer.query(COLUMNS, vec![Value::from(name)]).await?;

    let mut columns = vec![];

    for row in &rows {
        // Hidden columns of virtual tables
        if opt_int(row, "hidden")? == Some(1) {
            continue;
        }

        let primary_key = opt_int(row, "pk")?.filter(|position| *position > 0);

        columns.push(ColumnInfo {
            name: string(row, "name")?,
            native: opt_string(row, "type")?.unwrap_or_default(),
            // Primary keys other than INTEGER PRIMARY KEY accept NULL unless
            // declared NOT NULL, but callers never expect one to be null.
            nullable: !flag(row, "not_null")? && primary_key.is_none(),
            default: opt_string(row, "dflt_value")?,
            primary_key,
        });
    }

    Ok(columns)
}

pub(super) async fn indexes(inferrer: &Inferrer<'_>, name: &str) -> Result<Vec<IndexInfo>> {
    let rows = inferrer.query(INDEXES, vec![Value::from(name)]).await?;

    group_by(rows, |row| string(row, "name"))?
        .into_iter()
        .map(|group| {
            let first = &group[0];

            let predicate = if flag(first, "partial")? {
                opt_string(first, "sql")?.as_deref().and_then(partial_predicate)
            } else {
                None
            };

            Ok(IndexInfo {
                name: string(first, "name")?,
                attributes: group
                    .iter()
                    .map(|row| opt_string(row, "attribute"))
                    .collect::<Result<_>>()?,
                unique: flag(first, "is_unique")?,
                primary_key: opt_string(first, "origin")?.as_deref() == Some("pk"),
                method: None,
                predicate,
            })
        })
        .collect()
}

pub(super) async fn foreign_keys(inferrer: &Inferrer<'_>, name: &str) -> Result<Vec<ForeignKeyInfo>> {
    let rows = inferrer.query(FOREIGN_KEYS, vec![Value::from(name)]).await?;

    group_by(rows, |row| opt_int(row, "id"))?
        .into_iter()
        .map(|group| {
            Ok(ForeignKeyInfo {
                name: None,
                attributes: group
                    .iter()
                    .map(|row| string(row, "attribute"))
                    .collect::<Result<_>>()?,
                target: string(&group[0], "target")?,
                target_attributes: group
                    .iter()
                    .map(|row| opt_string(row, "target_attribute"))
                    .collect::<Result<_>>()?,
            })
        })
        .collect()
}

/// The `WHERE` clause of a `CREATE INDEX` statement.
fn partial_predicate(sql: &str) -> Option<String> {
    let upper = sql.to_ascii_uppercase();
    let start = upper.rfind(" WHERE ")? + " WHERE ".len();
    let predicate = sql[start..].trim().trim_end_matches(';').trim_end();
    (!predicate.is_empty()).then(|| predicate.to_string())
}

#[cfg(test)]
mod tests {
    use super::partial_predicate;

    #[test]
    fn partial_index_predicate() {
        assert_eq!(
            partial_predicate("CREATE INDEX open_tasks ON tasks (user_id) where done = 0").as_deref(),
            Some("done = 0")
        );
        assert_eq!(partial_predicate("CREATE INDEX i ON t (a)"), None);
    }
}
