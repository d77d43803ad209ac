use super::Expr;

/// Full-text match of a search query against a document.
///
/// `document` is the searched column (or expression) and `query` is the
/// user's search text. `config` selects a text search configuration where
/// the engine has one (`english`, `simple`, ...).
#[derive(Debug, Clone, PartialEq)]
pub struct ExprTextSearch {
    pub document: Box<Expr>,
    pub query: Box<Expr>,
    pub config: Option<String>,
}

impl Expr {
    pub fn text_search(document: impl Into<Expr>, query: impl Into<Expr>) -> Self {
        ExprTextSearch {
            document: Box::new(document.into()),
            query: Box::new(query.into()),
            config: None,
        }
        .into()
    }

    pub fn text_search_with(
        document: impl Into<Expr>,
        query: impl Into<Expr>,
        config: impl Into<String>,
    ) -> Self {
        ExprTextSearch {
            document: Box::new(document.into()),
            query: Box::new(query.into()),
            config: Some(config.into()),
        }
        .into()
    }
}

impl From<ExprTextSearch> for Expr {
    fn from(value: ExprTextSearch) -> Self {
        Self::TextSearch(value)
    }
}
