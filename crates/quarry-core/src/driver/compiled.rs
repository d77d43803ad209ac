use crate::stmt::Value;

/// SQL text plus its bound parameters.
///
/// Compiled statements are immutable and carry everything needed to run
/// them, so a gateway may retry or re-issue one without recompiling.
#[derive(Debug, Clone, PartialEq)]
pub struct Compiled {
    /// Statement text with dialect-specific placeholders.
    pub sql: String,

    /// Parameter values, in placeholder order.
    pub params: Vec<Value>,

    /// `true` when the statement produces a result set.
    pub returns_rows: bool,
}

impl Compiled {
    /// A statement producing rows.
    pub fn query(sql: impl Into<String>, params: Vec<Value>) -> Self {
        Self {
            sql: sql.into(),
            params,
            returns_rows: true,
        }
    }

    /// A statement producing an affected-row count.
    pub fn command(sql: impl Into<String>, params: Vec<Value>) -> Self {
        Self {
            sql: sql.into(),
            params,
            returns_rows: false,
        }
    }
}
