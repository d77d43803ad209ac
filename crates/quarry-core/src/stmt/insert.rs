use super::{Assignment, Expr, QuerySpec};

#[derive(Debug, Clone, PartialEq)]
pub struct Insert {
    pub table: String,
    pub columns: Vec<String>,
    pub source: InsertSource,
    pub on_conflict: Option<OnConflict>,

    /// Expressions to return for each inserted row. Only rendered on
    /// dialects with `RETURNING`.
    pub returning: Option<Vec<Expr>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum InsertSource {
    /// One row of expressions per inserted row
    Values(Vec<Vec<Expr>>),

    /// `INSERT .. SELECT`
    Query(Box<QuerySpec>),
}

/// Conflict handling for an upsert.
#[derive(Debug, Clone, PartialEq)]
pub struct OnConflict {
    /// Columns of the unique index that detects the conflict. Ignored on
    /// MySQL, which reacts to any unique key.
    pub target: Vec<String>,
    pub action: ConflictAction,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConflictAction {
    Nothing,
    Update(Vec<Assignment>),
}

impl Insert {
    pub fn values(table: impl Into<String>, columns: Vec<String>, rows: Vec<Vec<Expr>>) -> Self {
        Self {
            table: table.into(),
            columns,
            source: InsertSource::Values(rows),
            on_conflict: None,
            returning: None,
        }
    }

    pub fn select(table: impl Into<String>, columns: Vec<String>, query: QuerySpec) -> Self {
        Self {
            table: table.into(),
            columns,
            source: InsertSource::Query(Box::new(query)),
            on_conflict: None,
            returning: None,
        }
    }

    pub fn on_conflict(self, on_conflict: OnConflict) -> Self {
        Self {
            on_conflict: Some(on_conflict),
            ..self
        }
    }

    pub fn returning(self, returning: Vec<Expr>) -> Self {
        Self {
            returning: Some(returning),
            ..self
        }
    }

    pub fn row_count(&self) -> usize {
        match &self.source {
            InsertSource::Values(rows) => rows.len(),
            InsertSource::Query(_) => 0,
        }
    }
}

impl OnConflict {
    pub fn do_nothing<T: Into<String>>(target: impl IntoIterator<Item = T>) -> Self {
        Self {
            target: target.into_iter().map(Into::into).collect(),
            action: ConflictAction::Nothing,
        }
    }

    /// Overwrites `columns` with the values proposed for insertion.
    pub fn update_columns<T: Into<String>, U: Into<String>>(
        target: impl IntoIterator<Item = T>,
        columns: impl IntoIterator<Item = U>,
    ) -> Self {
        Self {
            target: target.into_iter().map(Into::into).collect(),
            action: ConflictAction::Update(
                columns
                    .into_iter()
                    .map(|column| {
                        let column = column.into();
                        Assignment::new(column.clone(), Expr::excluded(column))
                    })
                    .collect(),
            ),
        }
    }

    pub fn update<T: Into<String>>(
        target: impl IntoIterator<Item = T>,
        assignments: Vec<Assignment>,
    ) -> Self {
        Self {
            target: target.into_iter().map(Into::into).collect(),
            action: ConflictAction::Update(assignments),
        }
    }

    /// `true` when a conflicting row is left untouched.
    pub fn is_nothing(&self) -> bool {
        match &self.action {
            ConflictAction::Nothing => true,
            ConflictAction::Update(assignments) => assignments.is_empty(),
        }
    }
}
