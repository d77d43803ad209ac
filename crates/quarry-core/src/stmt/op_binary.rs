use std::fmt;

#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    // Comparison
    Eq,
    Ne,
    Ge,
    Gt,
    Le,
    Lt,

    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Mod,

    /// String concatenation
    Concat,

    /// `->`: JSON object field or array element
    JsonGet,

    /// `->>`: JSON object field or array element, as text
    JsonGetText,

    /// `#>`: JSON value at a path
    JsonPath,

    /// `@>`: left contains right (JSON, arrays, ranges)
    Contains,

    /// `<@`: left is contained by right
    ContainedBy,

    /// `?`: JSON object has the key
    HasKey,

    /// `&&`: arrays or ranges overlap
    Overlaps,

    /// `= ANY(..)`: left equals any element of the right-hand array
    EqAny,
}

impl BinaryOp {
    pub fn is_eq(self) -> bool {
        matches!(self, Self::Eq)
    }

    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            Self::Eq | Self::Ne | Self::Ge | Self::Gt | Self::Le | Self::Lt
        )
    }

    pub fn is_arithmetic(self) -> bool {
        matches!(
            self,
            Self::Add | Self::Sub | Self::Mul | Self::Div | Self::Mod
        )
    }

    /// Operators only PostgreSQL renders natively.
    pub fn is_postgresql_extension(self) -> bool {
        matches!(
            self,
            Self::JsonPath | Self::Contains | Self::ContainedBy | Self::HasKey | Self::Overlaps | Self::EqAny
        )
    }

    /// Returns the operator with its operands swapped, if one exists.
    pub fn commute(self) -> Option<Self> {
        Some(match self {
            Self::Eq | Self::Ne | Self::Add | Self::Mul | Self::Overlaps => self,
            Self::Ge => Self::Le,
            Self::Gt => Self::Lt,
            Self::Le => Self::Ge,
            Self::Lt => Self::Gt,
            Self::Contains => Self::ContainedBy,
            Self::ContainedBy => Self::Contains,
            _ => return None,
        })
    }

    /// Logical negation of a comparison.
    pub fn negate(self) -> Option<Self> {
        Some(match self {
            Self::Eq => Self::Ne,
            Self::Ne => Self::Eq,
            Self::Ge => Self::Lt,
            Self::Gt => Self::Le,
            Self::Le => Self::Gt,
            Self::Lt => Self::Ge,
            _ => return None,
        })
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use BinaryOp::*;

        match self {
            Eq => "=".fmt(f),
            Ne => "<>".fmt(f),
            Ge => ">=".fmt(f),
            Gt => ">".fmt(f),
            Le => "<=".fmt(f),
            Lt => "<".fmt(f),
            Add => "+".fmt(f),
            Sub => "-".fmt(f),
            Mul => "*".fmt(f),
            Div => "/".fmt(f),
            Mod => "%".fmt(f),
            Concat => "||".fmt(f),
            JsonGet => "->".fmt(f),
            JsonGetText => "->>".fmt(f),
            JsonPath => "#>".fmt(f),
            Contains => "@>".fmt(f),
            ContainedBy => "<@".fmt(f),
            HasKey => "?".fmt(f),
            Overlaps => "&&".fmt(f),
            EqAny => "= ANY".fmt(f),
        }
    }
}

impl fmt::Debug for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
