#![allow(dead_code)]

use quarry::{Db, Error, Result};
use quarry_core::{
    async_trait,
    driver::{Capability, Compiled, Response, Row},
    stmt::Value,
    Gateway,
};

use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
};

/// A gateway replying with canned results and recording what it runs.
///
/// Replies are matched on a substring of the SQL text and, optionally, on
/// the first bound parameter. A queue of replies is consumed in order, the
/// last one repeating. Unmatched queries return no rows; unmatched
/// commands affect one row.
#[derive(Debug, Clone)]
pub struct Mock {
    capability: &'static Capability,
    state: Arc<Mutex<State>>,
}

#[derive(Debug, Default)]
struct State {
    canned: Vec<Canned>,
    executed: Vec<Compiled>,
    ddl: Vec<String>,
}

#[derive(Debug)]
struct Canned {
    pattern: String,
    param: Option<Value>,
    replies: VecDeque<Reply>,
}

#[derive(Debug, Clone)]
pub enum Reply {
    Rows(Vec<Row>),
    Count(u64),
    Fail(Error),
}

impl Mock {
    pub fn new(capability: &'static Capability) -> Mock {
        Mock {
            capability,
            state: Arc::default(),
        }
    }

    pub fn sqlite() -> Mock {
        Mock::new(&Capability::SQLITE)
    }

    pub fn postgresql() -> Mock {
        Mock::new(&Capability::POSTGRESQL)
    }

    pub fn mysql() -> Mock {
        Mock::new(&Capability::MYSQL)
    }

    pub fn on(&self, pattern: &str, replies: impl IntoIterator<Item = Reply>) -> &Self {
        self.push(pattern, None, replies)
    }

    pub fn on_param(&self, pattern: &str, param: impl Into<Value>, replies: impl IntoIterator<Item = Reply>) -> &Self {
        self.push(pattern, Some(param.into()), replies)
    }

    fn push(&self, pattern: &str, param: Option<Value>, replies: impl IntoIterator<Item = Reply>) -> &Self {
        self.state.lock().unwrap().canned.push(Canned {
            pattern: pattern.to_string(),
            param,
            replies: replies.into_iter().collect(),
        });
        self
    }

    /// Statements executed so far.
    pub fn executed(&self) -> Vec<Compiled> {
        self.state.lock().unwrap().executed.clone()
    }

    pub fn executed_sql(&self) -> Vec<String> {
        self.executed().into_iter().map(|c| c.sql).collect()
    }

    pub fn ddl(&self) -> Vec<String> {
        self.state.lock().unwrap().ddl.clone()
    }

    /// Forgets recorded statements, keeping canned replies.
    pub fn clear(&self) {
        let mut state = self.state.lock().unwrap();
        state.executed.clear();
        state.ddl.clear();
    }
}

#[async_trait]
impl Gateway for Mock {
    fn capability(&self) -> &'static Capability {
        self.capability
    }

    async fn execute(&self, query: &Compiled) -> Result<Response> {
        let mut state = self.state.lock().unwrap();
        state.executed.push(query.clone());

        let reply = state
            .canned
            .iter_mut()
            .find(|canned| {
                query.sql.contains(&canned.pattern)
                    && canned
                        .param
                        .as_ref()
                        .map_or(true, |param| query.params.first() == Some(param))
            })
            .and_then(|canned| {
                if canned.replies.len() > 1 {
                    canned.replies.pop_front()
                } else {
                    canned.replies.front().cloned()
                }
            });

        match reply {
            Some(Reply::Rows(rows)) => Ok(Response::values(rows)),
            Some(Reply::Count(count)) => Ok(Response::count(count)),
            Some(Reply::Fail(err)) => Err(err),
            None if query.returns_rows => Ok(Response::values(vec![])),
            None => Ok(Response::count(1)),
        }
    }

    async fn run_ddl(&self, sql: &str) -> Result<()> {
        self.state.lock().unwrap().ddl.push(sql.to_string());
        Ok(())
    }

    async fn call_function(&self, name: &str, args: &[Value]) -> Result<Value> {
        Ok(Value::from(format!("{name}({})", args.len())))
    }
}

/// Rows sharing `columns`.
pub fn rows(columns: &[&str], values: Vec<Vec<Value>>) -> Vec<Row> {
    let columns: Arc<[String]> = columns.iter().map(|c| c.to_string()).collect();
    values
        .into_iter()
        .map(|values| Row::new(columns.clone(), values))
        .collect()
}

pub fn reply(columns: &[&str], values: Vec<Vec<Value>>) -> Reply {
    Reply::Rows(rows(columns, values))
}

fn column(name: &str, native: &str, not_null: bool, pk: i64) -> Vec<Value> {
    vec![
        name.into(),
        native.into(),
        Value::I64(not_null.into()),
        Value::Null,
        Value::I64(pk),
        Value::I64(0),
    ]
}

const COLUMNS: &[&str] = &["name", "type", "not_null", "dflt_value", "pk", "hidden"];

/// Catalog replies describing
/// `users(id INTEGER PK, name TEXT NOT NULL, email TEXT UNIQUE)` and
/// `tasks(id INTEGER PK, user_id INTEGER -> users, title TEXT, done BOOLEAN)`.
pub fn sqlite_catalog(mock: &Mock) {
    mock.on(
        "SELECT name FROM sqlite_master",
        [reply(&["name"], vec![vec!["tasks".into()], vec!["users".into()]])],
    );

    for name in ["users", "tasks"] {
        mock.on_param(
            "SELECT type AS kind FROM sqlite_master",
            name,
            [reply(&["kind"], vec![vec!["table".into()]])],
        );
    }

    mock.on_param(
        "pragma_table_xinfo",
        "users",
        [reply(
            COLUMNS,
            vec![
                column("id", "INTEGER", false, 1),
                column("name", "TEXT", true, 0),
                column("email", "TEXT", false, 0),
            ],
        )],
    );

    mock.on_param(
        "pragma_table_xinfo",
        "tasks",
        [reply(
            COLUMNS,
            vec![
                column("id", "INTEGER", false, 1),
                column("user_id", "INTEGER", false, 0),
                column("title", "TEXT", false, 0),
                column("done", "BOOLEAN", false, 0),
            ],
        )],
    );

    mock.on_param(
        "pragma_index_list",
        "users",
        [reply(
            &["name", "is_unique", "origin", "partial", "attribute", "sql"],
            vec![vec![
                "sqlite_autoindex_users_1".into(),
                Value::I64(1),
                "u".into(),
                Value::I64(0),
                "email".into(),
                Value::Null,
            ]],
        )],
    );

    mock.on_param(
        "pragma_foreign_key_list",
        "tasks",
        [reply(
            &["id", "target", "attribute", "target_attribute"],
            vec![vec![Value::I64(0), "users".into(), "user_id".into(), "id".into()]],
        )],
    );
}

/// A database over a mock answering [`sqlite_catalog`] queries, with every
/// relation inferred. Recorded statements are cleared.
pub async fn sqlite_db() -> (Db, Mock) {
    let _ = env_logger::builder().is_test(true).try_init();

    let mock = Mock::sqlite();
    sqlite_catalog(&mock);

    let db = Db::builder().infer_all().build(mock.clone()).await.unwrap();
    mock.clear();

    (db, mock)
}
