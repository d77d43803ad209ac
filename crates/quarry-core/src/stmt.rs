mod assignment;
pub use assignment::Assignment;

mod delete;
pub use delete::Delete;

mod direction;
pub use direction::{Direction, Nulls};

mod expr;
pub use expr::Expr;

mod expr_alias;
pub use expr_alias::ExprAlias;

mod expr_and;
pub use expr_and::ExprAnd;

mod expr_binary_op;
pub use expr_binary_op::ExprBinaryOp;

mod expr_case;
pub use expr_case::ExprCase;

mod expr_cast;
pub use expr_cast::ExprCast;

mod expr_column;
pub use expr_column::ExprColumn;

mod expr_exists;
pub use expr_exists::ExprExists;

mod expr_func;
pub use expr_func::{is_aggregate_name, ExprFunc, Window};

mod expr_in_list;
pub use expr_in_list::ExprInList;

mod expr_in_subquery;
pub use expr_in_subquery::ExprInSubquery;

mod expr_is_null;
pub use expr_is_null::ExprIsNull;

mod expr_like;
pub use expr_like::ExprLike;

mod expr_or;
pub use expr_or::ExprOr;

mod expr_record;
pub use expr_record::ExprRecord;

mod expr_text_search;
pub use expr_text_search::ExprTextSearch;

mod expr_unary_op;
pub use expr_unary_op::ExprUnaryOp;

mod expr_window;
pub use expr_window::{ExprWindow, FrameBound, FrameUnits, WindowFrame};

mod insert;
pub use insert::{ConflictAction, Insert, InsertSource, OnConflict};

mod join;
pub use join::{Join, JoinKind};

mod lock;
pub use lock::{Lock, LockMode, LockWait};

mod op_binary;
pub use op_binary::BinaryOp;

mod op_set;
pub use op_set::{SetOp, SetOperation};

mod op_unary;
pub use op_unary::UnaryOp;

mod order_by_expr;
pub use order_by_expr::OrderByExpr;

mod query;
pub use query::QuerySpec;

mod source;
pub use source::{Source, SourceQuery, SourceRaw, SourceTable};

mod statement;
pub use statement::Statement;

mod ty;
pub use ty::Type;

mod update;
pub use update::Update;

mod value;
pub use value::Value;

pub mod visit;
pub use visit::Visit;
