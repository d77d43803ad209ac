//! Translation of database-native error codes into [`ConstraintViolation`]s.
//!
//! Each gateway hands its client library's error code and message to the
//! classifier for its dialect. Errors that are not integrity violations
//! return `None` and are surfaced as driver failures.

use crate::{ConstraintKind, ConstraintViolation};

/// Fields a PostgreSQL server attaches to an error response.
#[derive(Debug, Default, Clone, Copy)]
pub struct PostgresqlFields<'a> {
    pub table: Option<&'a str>,
    pub column: Option<&'a str>,
    pub constraint: Option<&'a str>,
}

/// Classifies a PostgreSQL error by SQLSTATE.
pub fn postgresql(
    sqlstate: &str,
    message: &str,
    fields: PostgresqlFields<'_>,
) -> Option<ConstraintViolation> {
    let kind = match sqlstate {
        "23502" => ConstraintKind::NotNull,
        "23505" => ConstraintKind::Uniqueness,
        "23503" => ConstraintKind::ForeignKey,
        "23514" => ConstraintKind::Check,
        _ => return None,
    };

    let mut violation = ConstraintViolation::new(kind, message);

    if let Some(table) = fields.table {
        violation = violation.with_relation(table);
    }

    // Older servers omit the column field on not-null violations.
    let column = fields.column.map(str::to_string).or_else(|| {
        (kind == ConstraintKind::NotNull)
            .then(|| quoted_after(message, "column "))
            .flatten()
    });

    if let Some(column) = column {
        violation = violation.with_attribute(column);
    }

    if let Some(constraint) = fields.constraint {
        violation = violation.with_constraint(constraint);
    }

    Some(violation)
}

/// Classifies a SQLite error by extended result code.
///
/// SQLite reports the offending column as `table.column` after the colon
/// in the message; composite unique keys list every column and only the
/// first one is kept.
pub fn sqlite(extended_code: i32, message: &str) -> Option<ConstraintViolation> {
    let kind = match extended_code {
        // SQLITE_CONSTRAINT_NOTNULL
        1299 => ConstraintKind::NotNull,
        // SQLITE_CONSTRAINT_UNIQUE, SQLITE_CONSTRAINT_PRIMARYKEY
        2067 | 1555 => ConstraintKind::Uniqueness,
        // SQLITE_CONSTRAINT_FOREIGNKEY
        787 => ConstraintKind::ForeignKey,
        // SQLITE_CONSTRAINT_CHECK
        275 => ConstraintKind::Check,
        _ => return None,
    };

    let mut violation = ConstraintViolation::new(kind, message);

    let Some((_, detail)) = message.split_once(": ") else {
        return Some(violation);
    };

    if kind == ConstraintKind::Check {
        return Some(violation.with_constraint(detail.trim()));
    }

    let first = detail.split(',').next().unwrap_or(detail).trim();

    match first.split_once('.') {
        Some((relation, attribute)) => {
            violation = violation
                .with_relation(relation)
                .with_attribute(attribute);
        }
        None if !first.is_empty() => violation = violation.with_attribute(first),
        None => {}
    }

    Some(violation)
}

/// Classifies a MySQL error by server error number.
pub fn mysql(errno: u16, message: &str) -> Option<ConstraintViolation> {
    let violation = match errno {
        // ER_BAD_NULL_ERROR: Column 'name' cannot be null
        1048 => {
            let violation = ConstraintViolation::new(ConstraintKind::NotNull, message);
            match quoted_after(message, "Column ") {
                Some(column) => violation.with_attribute(column),
                None => violation,
            }
        }
        // ER_DUP_ENTRY: Duplicate entry 'x' for key 'users.email'
        1062 => {
            let violation = ConstraintViolation::new(ConstraintKind::Uniqueness, message);
            match quoted_after(message, "for key ") {
                Some(key) => match key.split_once('.') {
                    Some((relation, index)) => {
                        violation.with_relation(relation).with_constraint(index)
                    }
                    None => violation.with_constraint(key),
                },
                None => violation,
            }
        }
        // ER_ROW_IS_REFERENCED_2, ER_NO_REFERENCED_ROW_2
        1451 | 1452 => {
            let violation = ConstraintViolation::new(ConstraintKind::ForeignKey, message);
            match quoted_after(message, "CONSTRAINT ") {
                Some(constraint) => violation.with_constraint(constraint),
                None => violation,
            }
        }
        // ER_CHECK_CONSTRAINT_VIOLATED
        3819 => {
            let violation = ConstraintViolation::new(ConstraintKind::Check, message);
            match quoted_after(message, "constraint ") {
                Some(constraint) => violation.with_constraint(constraint),
                None => violation,
            }
        }
        _ => return None,
    };

    Some(violation)
}

/// Returns the quoted word following `prefix`, accepting `"`, `'` or
/// backtick quotes.
fn quoted_after(message: &str, prefix: &str) -> Option<String> {
    let start = message.find(prefix)? + prefix.len();
    let rest = &message[start..];
    let quote = rest.chars().next().filter(|&c| matches!(c, '"' | '\'' | '`'))?;
    let rest = &rest[quote.len_utf8()..];
    let end = rest.find(quote)?;
    Some(rest[..end].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn postgresql_not_null_uses_server_fields() {
        let violation = postgresql(
            "23502",
            "null value in column \"name\" of relation \"users\" violates not-null constraint",
            PostgresqlFields {
                table: Some("users"),
                column: Some("name"),
                constraint: None,
            },
        )
        .unwrap();

        assert_eq!(violation.kind(), ConstraintKind::NotNull);
        assert_eq!(violation.relation(), Some("users"));
        assert_eq!(violation.attribute(), Some("name"));
    }

    #[test]
    fn postgresql_not_null_falls_back_to_message() {
        let violation = postgresql(
            "23502",
            "null value in column \"email\" violates not-null constraint",
            PostgresqlFields::default(),
        )
        .unwrap();

        assert_eq!(violation.attribute(), Some("email"));
    }

    #[test]
    fn postgresql_other_codes() {
        let fields = PostgresqlFields {
            table: Some("users"),
            column: None,
            constraint: Some("users_email_key"),
        };
        let unique = postgresql("23505", "duplicate key", fields).unwrap();
        assert_eq!(unique.kind(), ConstraintKind::Uniqueness);
        assert_eq!(unique.constraint(), Some("users_email_key"));

        assert_eq!(
            postgresql("23503", "fk", fields).map(|v| v.kind()),
            Some(ConstraintKind::ForeignKey)
        );
        assert_eq!(
            postgresql("23514", "check", fields).map(|v| v.kind()),
            Some(ConstraintKind::Check)
        );
        assert!(postgresql("42P01", "relation does not exist", fields).is_none());
    }

    #[test]
    fn sqlite_codes() {
        let violation = sqlite(1299, "NOT NULL constraint failed: users.name").unwrap();
        assert_eq!(violation.kind(), ConstraintKind::NotNull);
        assert_eq!(violation.relation(), Some("users"));
        assert_eq!(violation.attribute(), Some("name"));
        assert_eq!(violation.message(), "NOT NULL constraint failed: users.name");

        let violation = sqlite(2067, "UNIQUE constraint failed: users.a, users.b").unwrap();
        assert_eq!(violation.kind(), ConstraintKind::Uniqueness);
        assert_eq!(violation.attribute(), Some("a"));

        let violation = sqlite(1555, "UNIQUE constraint failed: users.id").unwrap();
        assert_eq!(violation.kind(), ConstraintKind::Uniqueness);

        let violation = sqlite(787, "FOREIGN KEY constraint failed").unwrap();
        assert_eq!(violation.kind(), ConstraintKind::ForeignKey);
        assert_eq!(violation.attribute(), None);

        let violation = sqlite(275, "CHECK constraint failed: positive_age").unwrap();
        assert_eq!(violation.kind(), ConstraintKind::Check);
        assert_eq!(violation.constraint(), Some("positive_age"));

        assert!(sqlite(1, "SQL logic error").is_none());
    }

    #[test]
    fn mysql_codes() {
        let violation = mysql(1048, "Column 'name' cannot be null").unwrap();
        assert_eq!(violation.kind(), ConstraintKind::NotNull);
        assert_eq!(violation.attribute(), Some("name"));

        let violation = mysql(1062, "Duplicate entry 'a@b.com' for key 'users.email'").unwrap();
        assert_eq!(violation.kind(), ConstraintKind::Uniqueness);
        assert_eq!(violation.relation(), Some("users"));
        assert_eq!(violation.constraint(), Some("email"));

        let violation = mysql(
            1452,
            "Cannot add or update a child row: a foreign key constraint fails (`db`.`tasks`, CONSTRAINT `tasks_user_fk` FOREIGN KEY (`user_id`) REFERENCES `users` (`id`))",
        )
        .unwrap();
        assert_eq!(violation.kind(), ConstraintKind::ForeignKey);
        assert_eq!(violation.constraint(), Some("tasks_user_fk"));

        let violation = mysql(3819, "Check constraint 'positive_age' is violated.").unwrap();
        assert_eq!(violation.kind(), ConstraintKind::Check);
        assert_eq!(violation.constraint(), Some("positive_age"));

        assert!(mysql(1146, "Table 'db.x' doesn't exist").is_none());
    }
}
