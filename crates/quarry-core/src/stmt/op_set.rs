use super::QuerySpec;

use std::fmt;

#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub enum SetOp {
    Union,
    Except,
    Intersect,
}

/// A set operation applied to the result of the query that owns it.
#[derive(Debug, Clone, PartialEq)]
pub struct SetOperation {
    pub op: SetOp,

    /// Keep duplicates (`UNION ALL`)
    pub all: bool,

    pub query: QuerySpec,
}

impl fmt::Display for SetOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SetOp::Union => "UNION".fmt(f),
            SetOp::Except => "EXCEPT".fmt(f),
            SetOp::Intersect => "INTERSECT".fmt(f),
        }
    }
}

impl fmt::Debug for SetOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
