/// The language-level kind of a value.
///
/// Native database types resolve to one of these through the type registry;
/// the kind decides which read and write transforms apply to a column.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    /// Boolean value
    Bool,

    /// Signed 32-bit integer
    I32,

    /// Signed 64-bit integer
    I64,

    /// Double precision float
    F64,

    /// Arbitrary precision decimal
    Decimal,

    /// Text
    String,

    /// Raw bytes
    Bytes,

    Uuid,

    /// Calendar date without a time zone
    Date,

    /// Time of day without a time zone
    Time,

    /// Date and time without a time zone
    Timestamp,

    /// Date and time in UTC
    TimestampTz,

    /// JSON document
    Json,

    /// A list of a single type
    List(Box<Type>),

    /// A range over an ordered type. Values are carried as their text
    /// representation.
    Range(Box<Type>),

    /// One of a fixed set of labels. Values are carried as strings.
    Enum(Vec<String>),

    /// A vendor type with no structured representation. Values are carried
    /// as their text representation, tagged with the native type name.
    Custom(String),
}

impl Type {
    pub fn list(ty: impl Into<Self>) -> Self {
        Self::List(Box::new(ty.into()))
    }

    pub fn range(ty: impl Into<Self>) -> Self {
        Self::Range(Box::new(ty.into()))
    }

    pub fn is_bool(&self) -> bool {
        matches!(self, Self::Bool)
    }

    pub fn is_integer(&self) -> bool {
        matches!(self, Self::I32 | Self::I64)
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::I32 | Self::I64 | Self::F64 | Self::Decimal)
    }

    pub fn is_string(&self) -> bool {
        matches!(self, Self::String)
    }

    pub fn is_list(&self) -> bool {
        matches!(self, Self::List(_))
    }

    pub fn is_json(&self) -> bool {
        matches!(self, Self::Json)
    }

    pub fn is_custom(&self) -> bool {
        matches!(self, Self::Custom(_))
    }

    /// Item type of a list, or `None` for other kinds.
    pub fn list_item(&self) -> Option<&Type> {
        match self {
            Self::List(item) => Some(item),
            _ => None,
        }
    }
}

impl core::fmt::Display for Type {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        match self {
            Self::Bool => f.write_str("bool"),
            Self::I32 => f.write_str("i32"),
            Self::I64 => f.write_str("i64"),
            Self::F64 => f.write_str("f64"),
            Self::Decimal => f.write_str("decimal"),
            Self::String => f.write_str("string"),
            Self::Bytes => f.write_str("bytes"),
            Self::Uuid => f.write_str("uuid"),
            Self::Date => f.write_str("date"),
            Self::Time => f.write_str("time"),
            Self::Timestamp => f.write_str("timestamp"),
            Self::TimestampTz => f.write_str("timestamptz"),
            Self::Json => f.write_str("json"),
            Self::List(item) => write!(f, "list<{item}>"),
            Self::Range(item) => write!(f, "range<{item}>"),
            Self::Enum(labels) => write!(f, "enum({})", labels.join(", ")),
            Self::Custom(name) => write!(f, "custom({name})"),
        }
    }
}
