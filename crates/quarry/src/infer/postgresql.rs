use super::{flag, group_by, opt_int, opt_string, string, ColumnInfo, ForeignKeyInfo, IndexInfo, Inferrer};
use crate::Result;

use quarry_core::stmt::Value;

const RELATIONS: &str = "\
SELECT table_name::text AS name \
FROM information_schema.tables \
WHERE table_schema = current_schema() AND table_type IN ('BASE TABLE', 'VIEW') \
ORDER BY table_name";

const KIND: &str = "\
SELECT table_type::text AS kind \
FROM information_schema.tables \
WHERE table_schema = current_schema() AND table_name::text = $1";

const COLUMNS: &str = "\
SELECT column_name::text AS name, data_type::text AS data_type, udt_name::text AS udt_name, \
is_nullable::text AS nullable, column_default::text AS default_value, \
character_maximum_length::int8 AS max_length, numeric_precision::int8 AS precision, \
numeric_scale::int8 AS scale, datetime_precision::int8 AS time_precision \
FROM information_schema.columns \
WHERE table_schema = current_schema() AND table_name::text = $1 \
ORDER BY ordinal_position";

const INDEXES: &str = "\
SELECT c.relname::text AS name, a.attname::text AS attribute, i.indisunique AS is_unique, \
i.indisprimary AS is_primary, am.amname::text AS method, \
pg_get_expr(i.indpred, i.indrelid) AS predicate \
FROM pg_index i \
JOIN pg_class c ON c.oid = i.indexrelid \
JOIN pg_am am ON am.oid = c.relam \
CROSS JOIN LATERAL unnest(i.indkey::int2[]) WITH ORDINALITY AS k(attnum, ord) \
LEFT JOIN pg_attribute a ON a.attrelid = i.indrelid AND a.attnum = k.attnum \
WHERE i.indrelid = to_regclass(quote_ident($1)) \
ORDER BY c.relname, k.ord";

const FOREIGN_KEYS: &str = "\
SELECT con.conname::text AS name, src.attname::text AS attribute, \
tgt_class.relname::text AS target, tgt.attname::text AS target_attribute \
FROM pg_constraint con \
CROSS JOIN LATERAL unnest(con.conkey, con.confkey) WITH ORDINALITY AS k(src_attnum, tgt_attnum, ord) \
JOIN pg_attribute src ON src.attrelid = con.conrelid AND src.attnum = k.src_attnum \
JOIN pg_class tgt_class ON tgt_class.oid = con.confrelid \
JOIN pg_attribute tgt ON tgt.attrelid = con.confrelid AND tgt.attnum = k.tgt_attnum \
WHERE con.contype = 'f' AND con.conrelid = to_regclass(quote_ident($1)) \
ORDER BY con.conname, k.ord";

pub(super) async fn relations(inferrer: &Inferrer<'_>) -> Result<Vec<String>> {
    inferrer
        .query(RELATIONS, vec![])
        .await?
        .iter()
        .map(|row| string(row, "name"))
        .collect()
}

/// `Some(true)` for views, `Some(false)` for tables.
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
                native: native_type(
                    &string(row, "data_type")?,
                    &string(row, "udt_name")?,
                    opt_int(row, "max_length")?,
                    opt_int(row, "precision")?,
                    opt_int(row, "scale")?,
                    opt_int(row, "time_precision")?,
                ),
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
            Ok(IndexInfo {
                name: string(first, "name")?,
                attributes: group
                    .iter()
                    .map(|row| opt_string(row, "attribute"))
                    .collect::<Result<_>>()?,
                unique: flag(first, "is_unique")?,
                primary_key: flag(first, "is_primary")?,
                method: opt_string(first, "method")?,
                predicate: opt_string(first, "predicate")?,
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

/// Rebuilds the native type name from `information_schema` columns.
///
/// Arrays and user-defined types are only identified by `udt_name`
/// (`_int4`, `citext`); other types get their parameters back.
fn native_type(
    data_type: &str,
    udt_name: &str,
    max_length: Option<i64>,
    precision: Option<i64>,
    scale: Option<i64>,
    time_precision: Option<i64>,
) -> String {
    match data_type {
        "ARRAY" | "USER-DEFINED" => udt_name.to_string(),
        "character varying" | "character" | "bit" | "bit varying" => match max_length {
            Some(n) => format!("{data_type}({n})"),
            None => data_type.to_string(),
        },
        "numeric" => match (precision, scale) {
            (Some(p), Some(s)) => format!("numeric({p},{s})"),
            (Some(p), None) => format!("numeric({p})"),
            _ => data_type.to_string(),
        },
        "timestamp without time zone" | "timestamp with time zone" | "time without time zone" => {
            match time_precision {
                // 6 is the default precision
                Some(p) if p != 6 => {
                    let (base, rest) = data_type.split_at(data_type.find(' ').unwrap_or(data_type.len()));
                    format!("{base}({p}){rest}")
                }
                _ => data_type.to_string(),
            }
        }
        _ => data_type.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::native_type;

    #[test]
    fn native_type_names() {
        assert_eq!(native_type("ARRAY", "_int4", None, None, None, None), "_int4");
        assert_eq!(
            native_type("character varying", "varchar", Some(255), None, None, None),
            "character varying(255)"
        );
        assert_eq!(
            native_type("numeric", "numeric", None, Some(10), Some(2), None),
            "numeric(10,2)"
        );
        assert_eq!(native_type("integer", "int4", None, Some(32), Some(0), None), "integer");
        assert_eq!(
            native_type("timestamp with time zone", "timestamptz", None, None, None, Some(3)),
            "timestamp(3) with time zone"
        );
        assert_eq!(native_type("USER-DEFINED", "citext", None, None, None, None), "citext");
    }
}
