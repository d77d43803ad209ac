use super::{Expr, Source};

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub struct Join {
    /// The relation to join
    pub target: Source,

    pub kind: JoinKind,

    /// Join constraint. `None` only for cross joins.
    pub on: Option<Expr>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum JoinKind {
    Inner,
    Left,
    Right,
    Full,
    Cross,
}

impl Join {
    pub fn new(target: impl Into<Source>, kind: JoinKind, on: impl Into<Expr>) -> Self {
        Self {
            target: target.into(),
            kind,
            on: Some(on.into()),
        }
    }

    pub fn cross(target: impl Into<Source>) -> Self {
        Self {
            target: target.into(),
            kind: JoinKind::Cross,
            on: None,
        }
    }
}

impl fmt::Display for JoinKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Inner => "INNER JOIN".fmt(f),
            Self::Left => "LEFT JOIN".fmt(f),
            Self::Right => "RIGHT JOIN".fmt(f),
            Self::Full => "FULL JOIN".fmt(f),
            Self::Cross => "CROSS JOIN".fmt(f),
        }
    }
}
