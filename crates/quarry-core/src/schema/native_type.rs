use crate::driver::Dialect;

/// A native column type as reported by the database, split into its parts.
///
/// ```text
/// "character varying(255)"      -> name "character varying", params ["255"]
/// "numeric(10, 2)"              -> name "numeric", params ["10", "2"]
/// "timestamp(3) with time zone" -> name "timestamp with time zone", params ["3"]
/// "integer[]" / "_int4"         -> array of "integer" / "int4"
/// "enum('a','b')"               -> name "enum", params ["a", "b"]
/// "int(10) unsigned"            -> name "int", params ["10"], unsigned
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeType {
    /// The type string exactly as the database reported it.
    pub raw: String,

    /// Lowercased base name with parameters removed.
    pub name: String,

    /// Parameters in parentheses, with quotes stripped.
    pub params: Vec<String>,

    /// Array dimensions, `0` for scalars.
    pub dimensions: usize,

    pub unsigned: bool,
}

impl NativeType {
    pub fn parse(raw: &str, dialect: Dialect) -> NativeType {
        // `rest` keeps the original case for parameters (enum labels);
        // matching happens on the lowercased copy. ASCII lowercasing keeps
        // byte offsets aligned between the two.
        let mut rest = raw.trim();
        let mut dimensions = 0;

        while rest.ends_with("[]") {
            rest = rest[..rest.len() - 2].trim_end();
            dimensions += 1;
        }

        // information_schema reports array columns by their element udt
        // name prefixed with an underscore.
        if dialect.is_postgresql() && dimensions == 0 && rest.starts_with('_') {
            rest = &rest[1..];
            dimensions = 1;
        }

        let mut unsigned = false;
        loop {
            let lower = rest.to_ascii_lowercase();
            if lower.ends_with(" unsigned") {
                unsigned = true;
                rest = rest[..rest.len() - " unsigned".len()].trim_end();
            } else if lower.ends_with(" zerofill") {
                rest = rest[..rest.len() - " zerofill".len()].trim_end();
            } else {
                break;
            }
        }

        let (name, params) = match (rest.find('('), rest.rfind(')')) {
            (Some(open), Some(close)) if open < close => (
                format!("{} {}", &rest[..open], &rest[close + 1..]),
                split_params(&rest[open + 1..close]),
            ),
            _ => (rest.to_string(), vec![]),
        };

        NativeType {
            raw: raw.to_string(),
            name: collapse_spaces(&name.to_ascii_lowercase()),
            params,
            dimensions,
            unsigned,
        }
    }

    pub fn is_array(&self) -> bool {
        self.dimensions > 0
    }

    /// The element type of an array type.
    pub fn element(&self) -> NativeType {
        NativeType {
            dimensions: self.dimensions.saturating_sub(1),
            ..self.clone()
        }
    }

    /// Numeric parameter at `index`, e.g. the length of `varchar(255)`.
    pub fn param(&self, index: usize) -> Option<u32> {
        self.params.get(index)?.trim().parse().ok()
    }
}

/// Splits `'a','b c'` or `10, 2` on top-level commas, stripping quotes.
/// Parameter values keep their original case.
fn split_params(params: &str) -> Vec<String> {
    let mut out = vec![];
    let mut current = String::new();
    let mut quote = None;

    let mut chars = params.chars().peekable();
    while let Some(c) = chars.next() {
        match (quote, c) {
            (Some(q), c) if c == q => {
                // Doubled quotes escape the quote character
                if chars.peek() == Some(&q) {
                    current.push(q);
                    chars.next();
                } else {
                    quote = None;
                }
            }
            (Some(_), c) => current.push(c),
            (None, '\'' | '"') => quote = Some(c),
            (None, ',') => out.push(std::mem::take(&mut current).trim().to_string()),
            (None, c) => current.push(c),
        }
    }

    if !current.trim().is_empty() || !out.is_empty() {
        out.push(current.trim().to_string());
    }

    out
}

fn collapse_spaces(name: &str) -> String {
    name.split_whitespace().collect::<Vec<_>>().join(" ")
}
