pub mod db;
pub use db::{Builder, Db};

mod import;
pub use import::{ImportOptions, ImportTransaction};

pub mod infer;
pub use infer::Inferrer;

pub mod relation;
pub use relation::Relation;

pub use quarry_core::{
    driver::{self, Dialect, Gateway, Row},
    schema::{self, Catalog, Schema, SchemaConfig},
    stmt::{self, Expr, Value},
    ConstraintKind, ConstraintViolation, Error, Result,
};
