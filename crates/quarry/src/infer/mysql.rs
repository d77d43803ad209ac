use super::{flag, group_by, opt_string, string, ColumnInfo, ForeignKeyInfo, IndexInfo, Inferrer};
use crate::Result;

use quarry_core::stmt::Value;

const RELATIONS: &str = "\
SELECT table_name AS name FROM information_schema.tables \
WHERE table_schema = DATABASE() AND table_type IN ('BASE TABLE', 'VIEW') \
ORDER BY table_name";

const KIND: &str = "\
SELECT table_type AS kind FROM information_schema.tables \
WHERE table_schema = DATABASE() AND table_name = ?";

const COLUMNS: &str = "\
SELECT column_name AS name, column_type AS type, is_nullable AS nullable, \
column_default AS default_value \
FROM information_schema.columns \
WHERE table_schema = DATABASE() AND table_name = ? \
ORDER BY ordinal_position";

const INDEXES: &str = "\
SELECT index_name AS name, column_name AS attribute, non_unique, index_type AS method \
FROM information_schema.statistics \
WHERE table_schema = DATABASE() AND table_name = ? \
ORDER BY index_name, seq_in_index";

const FOREIGN_KEYS: &str = "\
SELECT constraint_name AS name, column_name AS attribute, \
referenced_table_name AS target, referenced_column_name AS target_attribute \
FROM information_schema.key_column_usage \
WHERE table_schema = DATABASE() AND table_name = ? AND referenced_table_name IS NOT NULL \
ORDER BY constraint_name, ordinal_position";

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
        Some(row) => Ok(Some(string(row, "kind")? == "VIEW")),
        None => Ok(None),
    }
}

pub(super) async fn columns(inferrer: &Inferrer<'_>, name: &str) -> Result<Vec<ColumnInfo>> {
    let rows = inferrer.query(COLUMNS, vec![Value::from(name)]).await?;

    rows.iter()
        .map(|row| {
            Ok(ColumnInfo {
                name: string(row, "name")?,
                native: string(row, "type")?,
                nullable: flag(row, "nullable")?,
                default: opt_string(row, "default_value")?,
                primary_key: None,
            })
        })
        .collect()
}

pub(super) async fn indexes(inferrer: &Inferrer<'_>, name: &str) -> Result<Vec<IndexInfo>> {
    let rows = inferrer.query(INDEXES, vec![Value::from(name)]).await?;

    group_by(rows, |row| string(row, "name"))?
        .into_iter()
        .map(|group| {
            let first = &group[0];
            let name = string(first, "name")?;

            Ok(IndexInfo {
                primary_key: name == "PRIMARY",
                name,
                attributes: group
                    .iter()
                    .map(|row| opt_string(row, "attribute"))
                    .collect::<Result<_>>()?,
                unique: !flag(first, "non_unique")?,
                method: opt_string(first, "method")?.map(|method| method.to_ascii_lowercase()),
                // MySQL has no partial indexes
                predicate: None,
            })
        })
        .collect()
}

pub(super) async fn foreign_keys(inferrer: &Inferrer<'_>, name: &str) -> Result<Vec<ForeignKeyInfo>> {
    let rows = inferrer.query(FOREIGN_KEYS, vec![Value::from(name)]).await?;

    group_by(rows, |row| string(row, "name"))?
        .into_iter()
        .map(|group| {
            let first = &group[0];
            Ok(ForeignKeyInfo {
                name: Some(string(first, "name")?),
                attributes: group
                    .iter()
                    .map(|row| string(row, "attribute"))
                    .collect::<Result<_>>()?,
                target: string(first, "target")?,
                target_attributes: group
                    .iter()
                    .map(|row| opt_string(row, "target_attribute"))
                    .collect::<Result<_>>()?,
            })
        })
        .collect()
}
