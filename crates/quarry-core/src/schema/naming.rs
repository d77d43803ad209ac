//! Association naming conventions.

/// `"categories"` -> `"category"`
pub fn singularize(word: &str) -> String {
    pluralizer::pluralize(word, 1, false)
}

/// `"category"` -> `"categories"`
pub fn pluralize(word: &str) -> String {
    pluralizer::pluralize(word, 2, false)
}

/// Name of the many-to-one association for a foreign key column:
/// `"author_id"` -> `"author"`.
pub fn many_to_one_name(column: &str, target: &str) -> String {
    match column.strip_suffix("_id") {
        Some(stripped) if !stripped.is_empty() => stripped.to_string(),
        _ => singularize(target),
    }
}

/// Name of a restriction helper over the given index attributes:
/// `["first_name", "last_name"]` -> `"by_first_name_and_last_name"`.
pub fn restriction_name<S: AsRef<str>>(attributes: &[S]) -> String {
    let mut name = String::from("by_");

    for (i, attribute) in attributes.iter().enumerate() {
        if i > 0 {
            name.push_str("_and_");
        }
        name.push_str(attribute.as_ref());
    }

    name
}
